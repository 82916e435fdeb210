//! Screenplay 执行引擎
//!
//! 演员 ([`Actor`]) 按顺序执行任务 ([`Performable`]) 并检查结果 ([`Consequence`])，
//! 每个任务的失败按 [`FailureKind`] 分类后决定继续还是中止，
//! 步骤生命周期通过 [`StepReporter`](screenplay_reporting::StepReporter) 上报。

pub mod abilities;
pub mod actor;
pub mod classifier;
pub mod config;
pub mod error;
pub mod notepad;
pub mod performance;
pub mod policy;
pub mod runner;
pub mod scenario;
pub mod tally;
pub mod task;

pub use abilities::{Ability, AbilityKind, AbilityRegistry, BrowseTheWeb, CallAnApi};
pub use actor::{Actor, Reporting};
pub use classifier::FailureKind;
pub use config::{
    EnvironmentConfig, PerformanceConfig, ReportConfig, ReportFormat, ScreenplayConfig,
};
pub use error::PerformError;
pub use notepad::Notepad;
pub use policy::FailFastPolicy;
pub use runner::{ExecutionReport, ScenarioRunner};
pub use scenario::{CheckKind, Scenario, ScriptedAction, ScriptedCheck, ScriptedTask};
pub use tally::TaskTally;
pub use task::{
    see_that, Consequence, Instrumented, Performable, Question, SeeThat, Task, Verify,
};

use thiserror::Error;

/// 场景与运行器错误
#[derive(Error, Debug)]
pub enum JourneyError {
    #[error("场景加载失败: {0}")]
    ScenarioLoadFailed(String),

    #[error("无效的场景: {0}")]
    InvalidScenario(String),

    #[error("序列化错误: {0}")]
    SerdeError(String),

    #[error("配置错误: {0}")]
    ConfigError(String),

    #[error("报告错误: {0}")]
    Reporting(#[from] screenplay_reporting::ReportingError),

    #[error("IO 错误: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, JourneyError>;
