//! 任务、结果检查与问题

use std::fmt;
use tracing::debug;

use crate::{Actor, PerformError};

/// 演员可以执行的任务
pub trait Performable {
    fn perform_as(&self, actor: &Actor) -> Result<(), PerformError>;

    /// 任务描述，用作步骤标题
    fn description(&self) -> String;

    /// 是否声明为待实现
    fn is_pending(&self) -> bool {
        false
    }
}

impl<P: Performable + ?Sized> Performable for &P {
    fn perform_as(&self, actor: &Actor) -> Result<(), PerformError> {
        (**self).perform_as(actor)
    }

    fn description(&self) -> String {
        (**self).description()
    }

    fn is_pending(&self) -> bool {
        (**self).is_pending()
    }
}

impl<P: Performable + ?Sized> Performable for Box<P> {
    fn perform_as(&self, actor: &Actor) -> Result<(), PerformError> {
        (**self).perform_as(actor)
    }

    fn description(&self) -> String {
        (**self).description()
    }

    fn is_pending(&self) -> bool {
        (**self).is_pending()
    }
}

type Action = Box<dyn Fn(&Actor) -> Result<(), PerformError>>;

/// 由闭包构成的任务
pub struct Task {
    description: String,
    pending: bool,
    action: Action,
}

impl Task {
    /// 描述 + 执行逻辑
    pub fn where_<F>(description: &str, action: F) -> Self
    where
        F: Fn(&Actor) -> Result<(), PerformError> + 'static,
    {
        Self {
            description: description.to_string(),
            pending: false,
            action: Box::new(action),
        }
    }

    /// 声明为待实现的任务，执行时什么也不做
    pub fn pending(description: &str) -> Self {
        Self {
            description: description.to_string(),
            pending: true,
            action: Box::new(|_| Ok(())),
        }
    }

    /// 在执行前后打开/结束一个以任务描述命名的步骤
    pub fn instrumented(self) -> Instrumented<Task> {
        Instrumented::new(self)
    }
}

impl Performable for Task {
    fn perform_as(&self, actor: &Actor) -> Result<(), PerformError> {
        (self.action)(actor)
    }

    fn description(&self) -> String {
        self.description.clone()
    }

    fn is_pending(&self) -> bool {
        self.pending
    }
}

impl fmt::Debug for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Task")
            .field("description", &self.description)
            .field("pending", &self.pending)
            .finish()
    }
}

/// 自行上报步骤的任务
///
/// 执行前打开以任务描述命名的步骤，成功时结束它；失败时步骤保持打开，
/// 由引擎按失败类别关闭。声明为待实现的任务由引擎记录待实现步骤，这里不打开步骤。
#[derive(Debug)]
pub struct Instrumented<P> {
    inner: P,
}

impl<P: Performable> Instrumented<P> {
    pub fn new(inner: P) -> Self {
        Self { inner }
    }

    pub fn inner(&self) -> &P {
        &self.inner
    }
}

impl<P: Performable> Performable for Instrumented<P> {
    fn perform_as(&self, actor: &Actor) -> Result<(), PerformError> {
        if self.inner.is_pending() {
            return self.inner.perform_as(actor);
        }

        let steps = actor.reporting().steps();
        steps.begin_step(&self.inner.description());
        self.inner.perform_as(actor)?;
        steps.finish_step();
        Ok(())
    }

    fn description(&self) -> String {
        self.inner.description()
    }

    fn is_pending(&self) -> bool {
        self.inner.is_pending()
    }
}

/// 对演员状态的检查
pub trait Consequence {
    fn evaluate_for(&self, actor: &Actor) -> Result<(), PerformError>;

    fn description(&self) -> String;
}

impl<C: Consequence + ?Sized> Consequence for &C {
    fn evaluate_for(&self, actor: &Actor) -> Result<(), PerformError> {
        (**self).evaluate_for(actor)
    }

    fn description(&self) -> String {
        (**self).description()
    }
}

impl<C: Consequence + ?Sized> Consequence for Box<C> {
    fn evaluate_for(&self, actor: &Actor) -> Result<(), PerformError> {
        (**self).evaluate_for(actor)
    }

    fn description(&self) -> String {
        (**self).description()
    }
}

type Check = Box<dyn Fn(&Actor) -> Result<(), PerformError>>;

/// 由闭包构成的结果检查
pub struct Verify {
    description: String,
    check: Check,
}

impl Verify {
    pub fn that<F>(description: &str, check: F) -> Self
    where
        F: Fn(&Actor) -> Result<(), PerformError> + 'static,
    {
        Self {
            description: description.to_string(),
            check: Box::new(check),
        }
    }
}

impl Consequence for Verify {
    fn evaluate_for(&self, actor: &Actor) -> Result<(), PerformError> {
        (self.check)(actor)
    }

    fn description(&self) -> String {
        self.description.clone()
    }
}

/// 对演员的提问
pub trait Question {
    type Answer;

    fn answered_by(&self, actor: &Actor) -> Self::Answer;
}

impl<F, T> Question for F
where
    F: Fn(&Actor) -> T,
{
    type Answer = T;

    fn answered_by(&self, actor: &Actor) -> T {
        self(actor)
    }
}

/// 问题答案满足期望的检查
pub struct SeeThat<Q: Question> {
    subject: String,
    question: Q,
    expectation: String,
    predicate: Box<dyn Fn(&Q::Answer) -> bool>,
}

/// 构造 [`SeeThat`] 检查
pub fn see_that<Q, F>(subject: &str, question: Q, expectation: &str, predicate: F) -> SeeThat<Q>
where
    Q: Question,
    F: Fn(&Q::Answer) -> bool + 'static,
{
    SeeThat {
        subject: subject.to_string(),
        question,
        expectation: expectation.to_string(),
        predicate: Box::new(predicate),
    }
}

impl<Q> Consequence for SeeThat<Q>
where
    Q: Question,
    Q::Answer: fmt::Debug,
{
    fn evaluate_for(&self, actor: &Actor) -> Result<(), PerformError> {
        let answer = self.question.answered_by(actor);
        debug!("{} 的答案: {:?}", self.subject, answer);

        if (self.predicate)(&answer) {
            Ok(())
        } else {
            Err(PerformError::assertion(format!(
                "期望 {} {}，实际为 {:?}",
                self.subject, self.expectation, answer
            )))
        }
    }

    fn description(&self) -> String {
        format!("Then {} should be {}", self.subject, self.expectation)
    }
}
