//! 任务与结果检查的执行错误

use screenplay_locators::LocatorError;
use thiserror::Error;

/// 任务执行或结果检查时产生的错误
///
/// 前四个变体是显式标记，由 [`FailureKind`](crate::FailureKind) 按变体结构分类；
/// 其余错误一律视为致命错误。
#[derive(Error, Debug)]
pub enum PerformError {
    /// 有意跳过当前步骤
    #[error("步骤已忽略: {0}")]
    IgnoreStep(String),

    /// 功能尚未实现
    #[error("尚未实现: {0}")]
    Pending(String),

    /// 前置条件不满足
    #[error("前置条件不满足: {0}")]
    AssumptionFailed(String),

    #[error("断言失败: {0}")]
    AssertionFailed(String),

    #[error("演员 {actor} 不具备能力: {ability}")]
    MissingAbility { actor: String, ability: String },

    #[error("元素定位失败: {0}")]
    Locator(#[from] LocatorError),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl PerformError {
    pub fn ignore(reason: impl Into<String>) -> Self {
        PerformError::IgnoreStep(reason.into())
    }

    pub fn pending(reason: impl Into<String>) -> Self {
        PerformError::Pending(reason.into())
    }

    pub fn assumption(reason: impl Into<String>) -> Self {
        PerformError::AssumptionFailed(reason.into())
    }

    pub fn assertion(reason: impl Into<String>) -> Self {
        PerformError::AssertionFailed(reason.into())
    }

    pub fn missing_ability(actor: &str, ability: impl Into<String>) -> Self {
        PerformError::MissingAbility {
            actor: actor.to_string(),
            ability: ability.into(),
        }
    }
}
