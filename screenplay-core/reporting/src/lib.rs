//! Screenplay 报告层
//!
//! 提供执行引擎使用的窄接口 [`StepReporter`]，以及它的进程级内存实现
//! [`StepEventBus`]；同时提供演员表演开始/结束事件的广播器 [`Broadcaster`]。

pub mod broadcaster;
pub mod event_bus;
pub mod outcome;
pub mod traits;

pub use broadcaster::{Broadcaster, PerformanceEvent, PerformanceListener, RecordingListener};
pub use event_bus::StepEventBus;
pub use outcome::{OutcomeSummary, StepStatus, TestOutcome, TestStep};
pub use traits::StepReporter;

use thiserror::Error;

/// 报告层错误
#[derive(Error, Debug)]
pub enum ReportingError {
    #[error("没有正在进行的测试")]
    NoTestInProgress,

    #[error("不支持的报告格式: {0}")]
    UnsupportedFormat(String),

    #[error("JSON 序列化失败: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML 序列化失败: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("IO 错误: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ReportingError>;
