//! 表演引擎
//!
//! 一次表演按顺序执行一组任务 (`attempts_to`) 或结果检查 (`should`)：
//!
//! 1. 广播开始事件，任务计数清零
//! 2. 逐个执行，失败按 [`FailureKind`] 分类后上报
//! 3. fail-fast 开启时任何失败都会中止，前置条件失败总是中止
//! 4. 广播结束事件 (由 `PerformanceScope` 保证，中止时同样发出)

use tracing::{debug, info, warn};

use crate::{Actor, Consequence, FailureKind, PerformError, Performable};

/// 一次表演的开始/结束配对
struct PerformanceScope<'a> {
    actor: &'a Actor,
}

impl<'a> PerformanceScope<'a> {
    fn begin(actor: &'a Actor) -> Self {
        debug!("{} 开始表演", actor.name());
        actor.tally.borrow_mut().begin_performance();
        actor
            .reporting
            .broadcaster()
            .actor_began_performance(actor.name());
        Self { actor }
    }
}

impl Drop for PerformanceScope<'_> {
    fn drop(&mut self) {
        self.actor
            .reporting
            .broadcaster()
            .actor_ended_performance(self.actor.name());
        self.actor.tally.borrow_mut().end_performance();
        debug!("{} 结束表演", self.actor.name());
    }
}

impl Actor {
    /// 按顺序执行任务
    ///
    /// 前置条件失败总是返回错误并跳过剩余任务；其他失败 (包括忽略与待实现)
    /// 只在 fail-fast 开启时返回。忽略与待实现不作为步骤失败上报。
    pub fn attempts_to(&self, tasks: &[&dyn Performable]) -> Result<(), PerformError> {
        let _scope = PerformanceScope::begin(self);
        for task in tasks {
            self.perform(*task)?;
        }
        Ok(())
    }

    /// 同 [`attempts_to`](Actor::attempts_to)
    pub fn has(&self, tasks: &[&dyn Performable]) -> Result<(), PerformError> {
        self.attempts_to(tasks)
    }

    /// 按顺序检查结果
    pub fn should(&self, consequences: &[&dyn Consequence]) -> Result<(), PerformError> {
        let _scope = PerformanceScope::begin(self);
        for consequence in consequences {
            self.check(*consequence)?;
        }
        Ok(())
    }

    /// 同 [`should`](Actor::should)
    pub fn can_see(&self, consequences: &[&dyn Consequence]) -> Result<(), PerformError> {
        self.should(consequences)
    }

    fn perform(&self, task: &dyn Performable) -> Result<(), PerformError> {
        let steps = self.reporting.steps();
        let description = task.description();
        let depth = steps.open_step_depth();

        let declared_pending = task.is_pending();
        if declared_pending {
            info!("{} 跳过待实现的任务: {}", self.name(), description);
            self.report_pending(&description);
        }

        let attempted = self.tally.borrow_mut().new_task();
        let result = match task.perform_as(self) {
            Ok(()) => {
                if self.out_of_step(attempted) {
                    debug!("步骤数超过已执行任务数，合并步骤: {}", description);
                    steps.merge_with_previous_step();
                }
                Ok(())
            }
            Err(error) => self.task_failed(&description, depth, declared_pending, error),
        };

        steps.update_overall_result();
        result
    }

    fn task_failed(
        &self,
        description: &str,
        depth: usize,
        declared_pending: bool,
        error: PerformError,
    ) -> Result<(), PerformError> {
        let steps = self.reporting.steps();
        let kind = FailureKind::of(&error);

        if kind.is_absorbed() {
            info!("任务未执行完: {} ({})", description, error);
            // 只关闭任务自己打开的步骤
            let left_open = steps.open_step_depth().saturating_sub(depth);
            for _ in 0..left_open {
                match kind {
                    FailureKind::Pending => steps.step_pending(),
                    _ => steps.ignore_step(),
                }
            }
            if kind == FailureKind::Pending && left_open == 0 && !declared_pending {
                self.report_pending(description);
            }
        } else {
            warn!("任务失败: {} - {}", description, error);
            steps.fail_step(description, &error);
        }

        if kind == FailureKind::AssumptionFailure
            || self.reporting.policy().should_throw_errors_immediately()
        {
            Err(error)
        } else {
            Ok(())
        }
    }

    /// 以任务描述记录一个待实现步骤
    fn report_pending(&self, description: &str) {
        let steps = self.reporting.steps();
        steps.begin_step(description);
        steps.step_pending();
    }

    /// 已有步骤失败，且上报的步骤数超过本次表演已执行的任务数
    fn out_of_step(&self, attempted: usize) -> bool {
        let steps = self.reporting.steps();
        steps.has_any_step_failed() && steps.current_step_count() > attempted
    }

    fn check(&self, consequence: &dyn Consequence) -> Result<(), PerformError> {
        let steps = self.reporting.steps();
        let description = consequence.description();

        steps.begin_step(&description);
        let cascaded =
            steps.is_current_test_suspended() || steps.has_any_step_in_current_test_failed();
        if cascaded {
            debug!("之前的步骤已失败，检查结果记为忽略: {}", description);
        }

        let result = match consequence.evaluate_for(self) {
            Ok(()) => {
                if cascaded {
                    steps.ignore_step();
                } else {
                    steps.finish_step();
                }
                Ok(())
            }
            Err(error) => match FailureKind::of(&error) {
                FailureKind::Ignorable => {
                    steps.ignore_step();
                    Ok(())
                }
                kind => {
                    warn!("检查失败: {} - {}", description, error);
                    steps.fail_step(&description, &error);
                    let propagate = kind == FailureKind::AssumptionFailure
                        || self.reporting.policy().should_throw_errors_immediately();
                    if propagate {
                        Err(error)
                    } else {
                        Ok(())
                    }
                }
            },
        };

        steps.update_overall_result();
        result
    }
}
