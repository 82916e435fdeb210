//! 失败分类

use crate::PerformError;

/// 失败类别
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureKind {
    /// 有意跳过：不作为失败上报
    Ignorable,

    /// 尚未实现：步骤记为待实现，不作为失败上报
    Pending,

    /// 前置条件不满足：上报后总是向调用方抛出
    AssumptionFailure,

    /// 其余错误：上报为步骤失败，是否中止由 fail-fast 策略决定
    Fatal,
}

impl FailureKind {
    /// 按错误变体分类
    ///
    /// 包装在 `anyhow::Error` 中的 [`PerformError`] 会先取出再分类。
    pub fn of(error: &PerformError) -> FailureKind {
        match error {
            PerformError::IgnoreStep(_) => FailureKind::Ignorable,
            PerformError::Pending(_) => FailureKind::Pending,
            PerformError::AssumptionFailed(_) => FailureKind::AssumptionFailure,
            PerformError::Other(inner) => inner
                .downcast_ref::<PerformError>()
                .map(FailureKind::of)
                .unwrap_or(FailureKind::Fatal),
            PerformError::AssertionFailed(_)
            | PerformError::MissingAbility { .. }
            | PerformError::Locator(_) => FailureKind::Fatal,
        }
    }

    /// 是否由引擎吸收 (不作为步骤失败上报)
    pub fn is_absorbed(&self) -> bool {
        matches!(self, FailureKind::Ignorable | FailureKind::Pending)
    }
}
