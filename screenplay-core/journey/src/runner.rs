//! 场景运行器

use chrono::{DateTime, Utc};
use screenplay_reporting::{
    Broadcaster, OutcomeSummary, PerformanceEvent, RecordingListener, StepEventBus, TestOutcome,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;
use tracing::{error, info, warn};

use crate::{
    Actor, Consequence, FailFastPolicy, Instrumented, Performable, Reporting, Result, Scenario,
    ScreenplayConfig,
};

/// 场景运行器
///
/// 每次运行使用独立的步骤事件总线与广播器，互不影响。
#[derive(Debug, Clone, Default)]
pub struct ScenarioRunner {
    fail_fast: bool,
}

impl ScenarioRunner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(config: &ScreenplayConfig) -> Self {
        Self {
            fail_fast: config.performance.fail_fast,
        }
    }

    pub fn with_fail_fast(mut self, fail_fast: bool) -> Self {
        self.fail_fast = fail_fast;
        self
    }

    /// 执行场景：先执行全部任务，任务未中止时再检查结果
    pub fn run(&self, scenario: &Scenario) -> Result<ExecutionReport> {
        info!("开始执行场景: {}", scenario.name);
        let start_time = Instant::now();
        let started_at = Utc::now();

        let fail_fast = scenario.fail_fast.unwrap_or(self.fail_fast);
        let bus = Arc::new(StepEventBus::new());
        let broadcaster = Arc::new(Broadcaster::new());
        let recorder = Arc::new(RecordingListener::new());
        broadcaster.subscribe(recorder.clone());

        let actor = Actor::with_reporting(
            &scenario.actor,
            Reporting::new(
                bus.clone(),
                broadcaster,
                Arc::new(FailFastPolicy::new(fail_fast)),
            ),
        );

        bus.test_started(&scenario.name);

        let tasks: Vec<_> = scenario.tasks.iter().map(Instrumented::new).collect();
        let performables: Vec<&dyn Performable> =
            tasks.iter().map(|task| task as &dyn Performable).collect();

        let mut escaped = actor.attempts_to(&performables).err();
        let tasks_attempted = actor.performed_task_count();

        if let Some(e) = &escaped {
            warn!("任务中止，跳过结果检查: {}", e);
        } else if !scenario.consequences.is_empty() {
            let checks: Vec<&dyn Consequence> = scenario
                .consequences
                .iter()
                .map(|check| check as &dyn Consequence)
                .collect();
            escaped = actor.should(&checks).err();
        }

        let outcome = bus.test_finished()?;

        let mut report = ExecutionReport::new(&scenario.name, &scenario.actor);
        report.description = scenario.description.clone();
        report.tags = scenario.tags.clone();
        report.fail_fast = fail_fast;
        report.started_at = started_at;
        report.tasks_attempted = tasks_attempted;
        report.performance_events = recorder.events();
        report.escaped_error = escaped.map(|e| e.to_string());
        report.summary = outcome.summary();
        report.passed = outcome.passed() && report.escaped_error.is_none();
        report.outcome = outcome;
        report.duration_ms = start_time.elapsed().as_millis() as u64;

        if report.passed {
            info!("场景执行完成: {} - 通过", scenario.name);
        } else {
            error!("场景执行完成: {} - 失败", scenario.name);
        }

        Ok(report)
    }
}

/// 执行报告
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutionReport {
    /// 场景名称
    pub scenario_name: String,

    /// 场景描述
    pub description: Option<String>,

    /// 标签
    pub tags: Vec<String>,

    /// 演员名称
    pub actor: String,

    /// 是否通过
    pub passed: bool,

    /// 是否开启 fail-fast
    pub fail_fast: bool,

    /// 开始时间
    pub started_at: DateTime<Utc>,

    /// 顶层表演中尝试的任务数
    pub tasks_attempted: usize,

    /// 中止执行并返回给调用方的错误
    pub escaped_error: Option<String>,

    /// 顶层步骤统计
    pub summary: OutcomeSummary,

    /// 总耗时（毫秒）
    pub duration_ms: u64,

    /// 表演开始/结束事件
    pub performance_events: Vec<PerformanceEvent>,

    /// 步骤树
    pub outcome: TestOutcome,
}

impl ExecutionReport {
    pub fn new(name: &str, actor: &str) -> Self {
        Self {
            scenario_name: name.to_string(),
            description: None,
            tags: Vec::new(),
            actor: actor.to_string(),
            passed: true,
            fail_fast: false,
            started_at: Utc::now(),
            tasks_attempted: 0,
            escaped_error: None,
            summary: OutcomeSummary::default(),
            duration_ms: 0,
            performance_events: Vec::new(),
            outcome: TestOutcome::new(name),
        }
    }

    /// 开始与结束事件是否成对
    pub fn performances_balanced(&self) -> bool {
        let began = self
            .performance_events
            .iter()
            .filter(|event| matches!(event, PerformanceEvent::ActorBeganPerformance { .. }))
            .count();
        began * 2 == self.performance_events.len()
    }

    /// 导出为 JSON
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// 导出为 YAML
    pub fn to_yaml(&self) -> serde_yaml::Result<String> {
        serde_yaml::to_string(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{CheckKind, ScriptedAction, ScriptedCheck, ScriptedTask};
    use screenplay_reporting::StepStatus;

    fn scenario(tasks: Vec<ScriptedTask>, consequences: Vec<ScriptedCheck>) -> Scenario {
        Scenario {
            name: "runner".to_string(),
            description: None,
            actor: "Alice".to_string(),
            fail_fast: None,
            tasks,
            consequences,
            tags: vec![],
        }
    }

    #[test]
    fn test_passing_scenario() {
        let scenario = scenario(
            vec![
                ScriptedTask::new("opens the app", ScriptedAction::Succeed),
                ScriptedTask::new(
                    "notes the total",
                    ScriptedAction::Remember {
                        key: "total".to_string(),
                        value: serde_json::json!(42),
                    },
                ),
            ],
            vec![ScriptedCheck::new(
                "sees the total",
                CheckKind::RecallEquals {
                    key: "total".to_string(),
                    value: serde_json::json!(42),
                },
            )],
        );

        let report = ScenarioRunner::new().run(&scenario).unwrap();
        assert!(report.passed);
        assert_eq!(report.tasks_attempted, 2);
        assert_eq!(report.summary.total, 3);
        assert_eq!(report.summary.passed, 3);
        assert_eq!(report.performance_events.len(), 4);
        assert!(report.performances_balanced());
        assert_eq!(report.outcome.result, StepStatus::Success);
    }

    #[test]
    fn test_report_export() {
        let scenario = scenario(
            vec![ScriptedTask::new("opens the app", ScriptedAction::Succeed)],
            vec![],
        );
        let report = ScenarioRunner::new().run(&scenario).unwrap();

        let json = report.to_json().unwrap();
        assert!(json.contains("\"scenario_name\": \"runner\""));
        assert!(json.contains("actor_began_performance"));
        assert!(report.to_yaml().unwrap().contains("scenario_name: runner"));
    }
}
