//! 表演事件广播

use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex, OnceLock, PoisonError, RwLock};
use tracing::debug;

static GLOBAL_BROADCASTER: OnceLock<Arc<Broadcaster>> = OnceLock::new();

/// 表演事件
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PerformanceEvent {
    /// 演员开始一次表演
    ActorBeganPerformance { actor: String },

    /// 演员结束一次表演
    ActorEndedPerformance { actor: String },
}

impl PerformanceEvent {
    pub fn actor(&self) -> &str {
        match self {
            PerformanceEvent::ActorBeganPerformance { actor }
            | PerformanceEvent::ActorEndedPerformance { actor } => actor,
        }
    }
}

/// 表演事件监听器
pub trait PerformanceListener: Send + Sync {
    fn notify(&self, event: &PerformanceEvent);
}

/// 表演事件广播器
///
/// 发送即忘：监听器按订阅顺序同步收到事件。
#[derive(Default)]
pub struct Broadcaster {
    listeners: RwLock<Vec<Arc<dyn PerformanceListener>>>,
}

impl Broadcaster {
    pub fn new() -> Self {
        Self::default()
    }

    /// 进程级共享实例
    pub fn global() -> Arc<Broadcaster> {
        GLOBAL_BROADCASTER
            .get_or_init(|| Arc::new(Broadcaster::new()))
            .clone()
    }

    /// 订阅事件
    pub fn subscribe(&self, listener: Arc<dyn PerformanceListener>) {
        self.listeners
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(listener);
    }

    /// 移除全部监听器
    pub fn unsubscribe_all(&self) {
        self.listeners
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    pub fn listener_count(&self) -> usize {
        self.listeners
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// 发送事件
    pub fn post(&self, event: PerformanceEvent) {
        debug!("广播表演事件: {:?}", event);

        // 先复制监听器列表，监听器内部可以再次订阅
        let listeners: Vec<_> = self
            .listeners
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();

        for listener in listeners {
            listener.notify(&event);
        }
    }

    pub fn actor_began_performance(&self, actor: &str) {
        self.post(PerformanceEvent::ActorBeganPerformance {
            actor: actor.to_string(),
        });
    }

    pub fn actor_ended_performance(&self, actor: &str) {
        self.post(PerformanceEvent::ActorEndedPerformance {
            actor: actor.to_string(),
        });
    }
}

/// 记录全部事件的监听器
#[derive(Debug, Default)]
pub struct RecordingListener {
    events: Mutex<Vec<PerformanceEvent>>,
}

impl RecordingListener {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<PerformanceEvent> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn began_count(&self) -> usize {
        self.count(|event| matches!(event, PerformanceEvent::ActorBeganPerformance { .. }))
    }

    pub fn ended_count(&self) -> usize {
        self.count(|event| matches!(event, PerformanceEvent::ActorEndedPerformance { .. }))
    }

    fn count(&self, predicate: impl Fn(&PerformanceEvent) -> bool) -> usize {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .filter(|event| predicate(event))
            .count()
    }
}

impl PerformanceListener for RecordingListener {
    fn notify(&self, event: &PerformanceEvent) {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(event.clone());
    }
}
