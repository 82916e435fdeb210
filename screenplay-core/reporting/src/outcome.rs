//! 测试结果与步骤树

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use uuid::Uuid;

use crate::{ReportingError, Result};

/// 步骤状态
///
/// 变体按严重程度递增排列，整体结果取所有步骤中最严重的状态。
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum StepStatus {
    /// 成功
    Success,

    /// 忽略
    Ignored,

    /// 跳过
    Skipped,

    /// 待实现
    Pending,

    /// 失败
    Failed,
}

impl StepStatus {
    pub fn is_failure(&self) -> bool {
        matches!(self, StepStatus::Failed)
    }
}

impl Default for StepStatus {
    fn default() -> Self {
        StepStatus::Success
    }
}

/// 单个测试步骤 (可嵌套)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestStep {
    /// 步骤描述
    pub description: String,

    /// 步骤状态
    pub status: StepStatus,

    /// 错误信息
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    /// 开始时间
    pub started_at: DateTime<Utc>,

    /// 耗时（毫秒）
    pub duration_ms: u64,

    /// 子步骤
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<TestStep>,
}

impl TestStep {
    pub fn new(description: &str) -> Self {
        Self {
            description: description.to_string(),
            status: StepStatus::Success,
            error: None,
            started_at: Utc::now(),
            duration_ms: 0,
            children: Vec::new(),
        }
    }

    /// 创建一个已失败的步骤
    pub fn failed(description: &str, error: &str) -> Self {
        Self {
            status: StepStatus::Failed,
            error: Some(error.to_string()),
            ..Self::new(description)
        }
    }

    /// 自身与所有子步骤中最严重的状态
    pub fn worst_status(&self) -> StepStatus {
        self.children
            .iter()
            .map(TestStep::worst_status)
            .fold(self.status, std::cmp::max)
    }

    /// 自身或任一子步骤是否失败
    pub fn has_failed(&self) -> bool {
        self.worst_status().is_failure()
    }

    /// 结束步骤并记录耗时
    pub(crate) fn close(&mut self, status: StepStatus, error: Option<String>) {
        self.status = std::cmp::max(status, self.worst_status());
        if error.is_some() {
            self.error = error;
        }
        self.duration_ms = (Utc::now() - self.started_at)
            .num_milliseconds()
            .max(0) as u64;
    }
}

/// 单个测试的结果
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestOutcome {
    /// 测试 ID
    pub id: Uuid,

    /// 测试名称
    pub name: String,

    /// 开始时间
    pub started_at: DateTime<Utc>,

    /// 结束时间
    pub finished_at: Option<DateTime<Utc>>,

    /// 整体结果
    pub result: StepStatus,

    /// 测试被标记为待实现
    #[serde(default)]
    pub pending: bool,

    /// 测试被标记为跳过
    #[serde(default)]
    pub skipped: bool,

    /// 测试已挂起 (出现失败或待实现后置位)
    #[serde(default)]
    pub suspended: bool,

    /// 第一次失败的错误信息
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failure: Option<String>,

    /// 顶层步骤列表
    pub steps: Vec<TestStep>,
}

impl TestOutcome {
    pub fn new(name: &str) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.to_string(),
            started_at: Utc::now(),
            finished_at: None,
            result: StepStatus::Success,
            pending: false,
            skipped: false,
            suspended: false,
            failure: None,
            steps: Vec::new(),
        }
    }

    /// 顶层步骤数
    pub fn step_count(&self) -> usize {
        self.steps.len()
    }

    /// 是否有任一步骤 (含子步骤) 失败
    pub fn has_failed_step(&self) -> bool {
        self.steps.iter().any(TestStep::has_failed)
    }

    /// 重新计算整体结果
    pub fn update_result(&mut self) {
        let mut result = self
            .steps
            .iter()
            .map(TestStep::worst_status)
            .max()
            .unwrap_or(StepStatus::Success);

        if self.pending {
            result = result.max(StepStatus::Pending);
        }
        if self.skipped {
            result = result.max(StepStatus::Skipped);
        }

        self.result = result;
    }

    /// 测试是否通过
    pub fn passed(&self) -> bool {
        !self.result.is_failure()
    }

    /// 顶层步骤统计
    pub fn summary(&self) -> OutcomeSummary {
        let mut summary = OutcomeSummary {
            total: self.steps.len(),
            ..Default::default()
        };

        for step in &self.steps {
            match step.worst_status() {
                StepStatus::Success => summary.passed += 1,
                StepStatus::Ignored => summary.ignored += 1,
                StepStatus::Skipped => summary.skipped += 1,
                StepStatus::Pending => summary.pending += 1,
                StepStatus::Failed => summary.failed += 1,
            }
        }

        summary
    }

    /// 导出为 JSON
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// 导出为 YAML
    pub fn to_yaml(&self) -> serde_yaml::Result<String> {
        serde_yaml::to_string(self)
    }

    /// 按格式名导出 ("json" / "yaml")
    pub fn render(&self, format: &str) -> Result<String> {
        match format {
            "json" => Ok(self.to_json()?),
            "yaml" | "yml" => Ok(self.to_yaml()?),
            other => Err(ReportingError::UnsupportedFormat(other.to_string())),
        }
    }

    /// 保存到文件，格式由扩展名决定
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        let format = path
            .extension()
            .and_then(|s| s.to_str())
            .unwrap_or_default();
        let content = self.render(format)?;

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(path, content)?;

        Ok(())
    }
}

/// 顶层步骤统计
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutcomeSummary {
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub ignored: usize,
    pub pending: usize,
    pub skipped: usize,
}
