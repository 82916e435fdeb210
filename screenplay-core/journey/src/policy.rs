//! fail-fast 策略

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, OnceLock};
use tracing::info;

static GLOBAL_POLICY: OnceLock<Arc<FailFastPolicy>> = OnceLock::new();

/// 进程级 fail-fast 开关
///
/// 引擎在每次出错时重新读取，不在表演开始时缓存。
#[derive(Debug, Default)]
pub struct FailFastPolicy {
    enabled: AtomicBool,
}

impl FailFastPolicy {
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled: AtomicBool::new(enabled),
        }
    }

    /// 进程级共享实例 (默认关闭)
    pub fn global() -> Arc<FailFastPolicy> {
        GLOBAL_POLICY
            .get_or_init(|| Arc::new(FailFastPolicy::default()))
            .clone()
    }

    pub fn enable(&self) {
        self.set(true);
    }

    pub fn disable(&self) {
        self.set(false);
    }

    pub fn set(&self, enabled: bool) {
        let previous = self.enabled.swap(enabled, Ordering::SeqCst);
        if previous != enabled {
            info!("fail-fast 策略: {}", if enabled { "开启" } else { "关闭" });
        }
    }

    /// 出错时是否立即抛出
    pub fn should_throw_errors_immediately(&self) -> bool {
        self.enabled.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toggle() {
        let policy = FailFastPolicy::default();
        assert!(!policy.should_throw_errors_immediately());

        policy.enable();
        assert!(policy.should_throw_errors_immediately());

        policy.disable();
        assert!(!policy.should_throw_errors_immediately());
    }

    #[test]
    fn test_global_is_shared() {
        assert!(Arc::ptr_eq(&FailFastPolicy::global(), &FailFastPolicy::global()));
    }
}
