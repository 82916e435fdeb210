//! 脚本化场景定义

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::Path;
use tracing::debug;

use crate::{Actor, Consequence, Instrumented, JourneyError, PerformError, Performable};

/// 脚本化场景
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scenario {
    /// 场景名称
    pub name: String,

    /// 场景描述
    pub description: Option<String>,

    /// 演员名称
    #[serde(default = "default_actor")]
    pub actor: String,

    /// 覆盖运行器的 fail-fast 设置
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fail_fast: Option<bool>,

    /// 按顺序执行的任务
    #[serde(default)]
    pub tasks: Vec<ScriptedTask>,

    /// 任务完成后检查的结果
    #[serde(default)]
    pub consequences: Vec<ScriptedCheck>,

    /// 标签
    #[serde(default)]
    pub tags: Vec<String>,
}

fn default_actor() -> String {
    "Actor".to_string()
}

/// 脚本化任务
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScriptedTask {
    /// 任务描述
    pub description: String,

    /// 声明为待实现
    #[serde(default)]
    pub pending: bool,

    /// 任务动作
    pub action: ScriptedAction,
}

/// 任务动作
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ScriptedAction {
    /// 什么也不做，直接成功
    Succeed,

    /// 以致命错误失败
    Fail { message: String },

    /// 报告尚未实现
    Pending {
        #[serde(default)]
        reason: Option<String>,
    },

    /// 有意跳过
    Ignore {
        #[serde(default)]
        reason: Option<String>,
    },

    /// 前置条件不满足
    Assume { message: String },

    /// 记住一个值
    Remember { key: String, value: Value },

    /// 嵌套的一组任务 (开始一次新的表演)
    Group { tasks: Vec<ScriptedTask> },
}

/// 脚本化结果检查
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScriptedCheck {
    /// 检查描述
    pub description: String,

    /// 检查内容
    pub check: CheckKind,
}

/// 检查内容
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CheckKind {
    /// 记住的值等于期望值
    RecallEquals { key: String, value: Value },

    /// 记住了某个键
    RecallPresent { key: String },

    /// 以断言错误失败
    Fail { message: String },

    /// 有意跳过
    Ignore {
        #[serde(default)]
        reason: Option<String>,
    },
}

impl Scenario {
    /// 根据扩展名加载场景文件 (YAML / JSON)
    pub fn from_file<P: AsRef<Path>>(path: P) -> crate::Result<Self> {
        let path = path.as_ref();
        match path.extension().and_then(|s| s.to_str()) {
            Some("yaml") | Some("yml") => Self::from_yaml_file(path),
            Some("json") => Self::from_json_file(path),
            _ => Err(JourneyError::ScenarioLoadFailed(format!(
                "不支持的场景文件格式: {}",
                path.display()
            ))),
        }
    }

    /// 从 YAML 文件加载场景
    pub fn from_yaml_file<P: AsRef<Path>>(path: P) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&content)
    }

    /// 从 YAML 字符串加载场景
    pub fn from_yaml_str(yaml: &str) -> crate::Result<Self> {
        serde_yaml::from_str(yaml).map_err(|e| JourneyError::SerdeError(e.to_string()))
    }

    /// 从 JSON 文件加载场景
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }

    /// 从 JSON 字符串加载场景
    pub fn from_json_str(json: &str) -> crate::Result<Self> {
        serde_json::from_str(json).map_err(|e| JourneyError::SerdeError(e.to_string()))
    }

    /// 导出为 YAML
    pub fn to_yaml(&self) -> crate::Result<String> {
        serde_yaml::to_string(self).map_err(|e| JourneyError::SerdeError(e.to_string()))
    }

    /// 导出为 JSON
    pub fn to_json(&self) -> crate::Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| JourneyError::SerdeError(e.to_string()))
    }

    /// 检查场景结构
    pub fn validate(&self) -> crate::Result<()> {
        if self.name.trim().is_empty() {
            return Err(JourneyError::InvalidScenario("场景名称不能为空".to_string()));
        }
        if self.actor.trim().is_empty() {
            return Err(JourneyError::InvalidScenario("演员名称不能为空".to_string()));
        }
        if self.tasks.is_empty() && self.consequences.is_empty() {
            return Err(JourneyError::InvalidScenario(format!(
                "场景 {} 没有任务也没有结果检查",
                self.name
            )));
        }

        for task in &self.tasks {
            task.validate()?;
        }
        for check in &self.consequences {
            check.validate()?;
        }

        Ok(())
    }

    /// 任务总数 (含嵌套任务)
    pub fn task_count(&self) -> usize {
        self.tasks.iter().map(ScriptedTask::task_count).sum()
    }
}

impl ScriptedTask {
    pub fn new(description: &str, action: ScriptedAction) -> Self {
        Self {
            description: description.to_string(),
            pending: false,
            action,
        }
    }

    fn validate(&self) -> crate::Result<()> {
        if self.description.trim().is_empty() {
            return Err(JourneyError::InvalidScenario("任务描述不能为空".to_string()));
        }

        match &self.action {
            ScriptedAction::Remember { key, .. } if key.trim().is_empty() => Err(
                JourneyError::InvalidScenario(format!("任务 {} 的 key 不能为空", self.description)),
            ),
            ScriptedAction::Group { tasks } => {
                if tasks.is_empty() {
                    return Err(JourneyError::InvalidScenario(format!(
                        "任务组 {} 不能为空",
                        self.description
                    )));
                }
                tasks.iter().try_for_each(ScriptedTask::validate)
            }
            _ => Ok(()),
        }
    }

    fn task_count(&self) -> usize {
        match &self.action {
            ScriptedAction::Group { tasks } => {
                1 + tasks.iter().map(ScriptedTask::task_count).sum::<usize>()
            }
            _ => 1,
        }
    }
}

impl Performable for ScriptedTask {
    fn perform_as(&self, actor: &Actor) -> Result<(), PerformError> {
        match &self.action {
            ScriptedAction::Succeed => Ok(()),
            ScriptedAction::Fail { message } => Err(anyhow::anyhow!(message.clone()).into()),
            ScriptedAction::Pending { reason } => Err(PerformError::pending(
                reason.clone().unwrap_or_else(|| self.description.clone()),
            )),
            ScriptedAction::Ignore { reason } => Err(PerformError::ignore(
                reason.clone().unwrap_or_else(|| self.description.clone()),
            )),
            ScriptedAction::Assume { message } => Err(PerformError::assumption(message.clone())),
            ScriptedAction::Remember { key, value } => {
                debug!("{} 记住 {} = {}", actor.name(), key, value);
                actor.remember(key, value.clone());
                Ok(())
            }
            ScriptedAction::Group { tasks } => {
                let instrumented: Vec<_> = tasks.iter().map(Instrumented::new).collect();
                let performables: Vec<&dyn Performable> = instrumented
                    .iter()
                    .map(|task| task as &dyn Performable)
                    .collect();
                actor.attempts_to(&performables)
            }
        }
    }

    fn description(&self) -> String {
        self.description.clone()
    }

    fn is_pending(&self) -> bool {
        self.pending
    }
}

impl ScriptedCheck {
    pub fn new(description: &str, check: CheckKind) -> Self {
        Self {
            description: description.to_string(),
            check,
        }
    }

    fn validate(&self) -> crate::Result<()> {
        if self.description.trim().is_empty() {
            return Err(JourneyError::InvalidScenario("检查描述不能为空".to_string()));
        }
        match &self.check {
            CheckKind::RecallEquals { key, .. } | CheckKind::RecallPresent { key }
                if key.trim().is_empty() =>
            {
                Err(JourneyError::InvalidScenario(format!(
                    "检查 {} 的 key 不能为空",
                    self.description
                )))
            }
            _ => Ok(()),
        }
    }
}

impl Consequence for ScriptedCheck {
    fn evaluate_for(&self, actor: &Actor) -> Result<(), PerformError> {
        match &self.check {
            CheckKind::RecallEquals { key, value } => match actor.recall::<Value>(key) {
                Some(actual) if actual == *value => Ok(()),
                Some(actual) => Err(PerformError::assertion(format!(
                    "{} 期望为 {}，实际为 {}",
                    key, value, actual
                ))),
                None => Err(PerformError::assertion(format!("没有记住 {}", key))),
            },
            CheckKind::RecallPresent { key } => {
                if actor.recall::<Value>(key).is_some() {
                    Ok(())
                } else {
                    Err(PerformError::assertion(format!("没有记住 {}", key)))
                }
            }
            CheckKind::Fail { message } => Err(PerformError::assertion(message.clone())),
            CheckKind::Ignore { reason } => Err(PerformError::ignore(
                reason.clone().unwrap_or_else(|| self.description.clone()),
            )),
        }
    }

    fn description(&self) -> String {
        self.description.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LOGIN: &str = r#"
name: "登录"
description: "用户登录后看到自己的名字"
actor: Alice
tags: [smoke]
tasks:
  - description: "opens the login page"
    action:
      type: succeed
  - description: "logs in"
    action:
      type: group
      tasks:
        - description: "enters credentials"
          action:
            type: remember
            key: user
            value: alice
        - description: "submits"
          action:
            type: succeed
consequences:
  - description: "sees her name"
    check:
      type: recall_equals
      key: user
      value: alice
"#;

    #[test]
    fn test_parse_yaml() {
        let scenario = Scenario::from_yaml_str(LOGIN).unwrap();
        assert_eq!(scenario.name, "登录");
        assert_eq!(scenario.actor, "Alice");
        assert_eq!(scenario.tasks.len(), 2);
        assert_eq!(scenario.task_count(), 4);
        assert!(matches!(
            scenario.consequences[0].check,
            CheckKind::RecallEquals { .. }
        ));
        assert!(scenario.validate().is_ok());
    }

    #[test]
    fn test_defaults() {
        let scenario = Scenario::from_json_str(
            r#"{"name": "minimal", "tasks": [{"description": "t", "action": {"type": "succeed"}}]}"#,
        )
        .unwrap();
        assert_eq!(scenario.actor, "Actor");
        assert_eq!(scenario.fail_fast, None);
        assert!(!scenario.tasks[0].pending);
    }

    #[test]
    fn test_validate_rejects_empty_group() {
        let scenario = Scenario {
            name: "empty group".to_string(),
            description: None,
            actor: "Bob".to_string(),
            fail_fast: None,
            tasks: vec![ScriptedTask::new(
                "does nothing",
                ScriptedAction::Group { tasks: vec![] },
            )],
            consequences: vec![],
            tags: vec![],
        };
        assert!(matches!(
            scenario.validate(),
            Err(JourneyError::InvalidScenario(_))
        ));
    }

    #[test]
    fn test_invalid_yaml() {
        let result = Scenario::from_yaml_str("name: [unterminated");
        assert!(matches!(result, Err(JourneyError::SerdeError(_))));
    }

    #[test]
    fn test_unknown_extension() {
        let result = Scenario::from_file("scenario.txt");
        assert!(matches!(result, Err(JourneyError::ScenarioLoadFailed(_))));
    }
}
