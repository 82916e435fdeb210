//! 演员

use screenplay_reporting::{Broadcaster, StepEventBus, StepReporter};
use std::any::Any;
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;
use std::sync::Arc;
use tracing::debug;

use crate::{Ability, AbilityRegistry, FailFastPolicy, Notepad, Question, TaskTally};

/// 引擎使用的进程级协作者
#[derive(Clone)]
pub struct Reporting {
    steps: Arc<dyn StepReporter>,
    broadcaster: Arc<Broadcaster>,
    policy: Arc<FailFastPolicy>,
}

impl Reporting {
    pub fn new(
        steps: Arc<dyn StepReporter>,
        broadcaster: Arc<Broadcaster>,
        policy: Arc<FailFastPolicy>,
    ) -> Self {
        Self {
            steps,
            broadcaster,
            policy,
        }
    }

    /// 全局步骤事件总线、广播器与 fail-fast 策略
    pub fn global() -> Self {
        Self::new(
            StepEventBus::global(),
            Broadcaster::global(),
            FailFastPolicy::global(),
        )
    }

    pub fn steps(&self) -> &Arc<dyn StepReporter> {
        &self.steps
    }

    pub fn broadcaster(&self) -> &Arc<Broadcaster> {
        &self.broadcaster
    }

    pub fn policy(&self) -> &Arc<FailFastPolicy> {
        &self.policy
    }
}

impl Default for Reporting {
    fn default() -> Self {
        Self::global()
    }
}

/// 演员
///
/// 状态只在单线程内修改 (`RefCell`)。任务执行期间不持有任何借用，
/// 因此任务内部可以再次调用 `attempts_to` 开始嵌套的表演。
pub struct Actor {
    name: String,
    pub(crate) notepad: RefCell<Notepad>,
    pub(crate) abilities: RefCell<AbilityRegistry>,
    pub(crate) tally: RefCell<TaskTally>,
    pub(crate) reporting: Reporting,
}

impl Actor {
    /// 使用全局报告设施创建演员
    pub fn named(name: &str) -> Self {
        Self::with_reporting(name, Reporting::global())
    }

    pub fn with_reporting(name: &str, reporting: Reporting) -> Self {
        Self {
            name: name.to_string(),
            notepad: RefCell::new(Notepad::new()),
            abilities: RefCell::new(AbilityRegistry::new()),
            tally: RefCell::new(TaskTally::new()),
            reporting,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn reporting(&self) -> &Reporting {
        &self.reporting
    }

    /// 赋予能力，同类别的旧能力被替换
    pub fn can<A: Ability>(&self, mut ability: A) -> &Self {
        ability.as_actor(&self.name);
        debug!("{} 获得能力: {}", self.name, A::KIND);
        self.abilities.borrow_mut().register(ability);
        self
    }

    /// 取出已注册的能力，从不隐式创建
    pub fn ability_to<A: Ability>(&self) -> Option<Rc<A>> {
        self.abilities.borrow().get::<A>()
    }

    pub fn asks_for<Q: Question>(&self, question: &Q) -> Q::Answer {
        question.answered_by(self)
    }

    /// 记住一个值，覆盖同名条目
    pub fn remember<T: Any>(&self, key: &str, value: T) {
        self.notepad.borrow_mut().put(key, value);
    }

    /// 立即回答问题并记住答案
    pub fn remember_answer<Q>(&self, key: &str, question: &Q)
    where
        Q: Question,
        Q::Answer: Any,
    {
        let answer = self.asks_for(question);
        self.remember(key, answer);
    }

    /// 取回记住的值；键不存在或类型不符时返回 `None`
    pub fn recall<T: Any + Clone>(&self, key: &str) -> Option<T> {
        self.notepad.borrow().get(key)
    }

    pub fn saw_as_the<T: Any + Clone>(&self, key: &str) -> Option<T> {
        self.recall(key)
    }

    pub fn gave_as_the<T: Any + Clone>(&self, key: &str) -> Option<T> {
        self.recall(key)
    }

    /// 当前 (或最近一次) 表演中已尝试的任务数
    pub fn performed_task_count(&self) -> usize {
        self.tally.borrow().performed_task_count()
    }
}

impl fmt::Display for Actor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

impl fmt::Debug for Actor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Actor")
            .field("name", &self.name)
            .field("notepad", &self.notepad.borrow())
            .field("abilities", &self.abilities.borrow())
            .finish()
    }
}
