//! 步骤事件总线
//!
//! [`StepReporter`] 的进程级内存实现。按测试收集步骤树：
//! - `test_started` / `test_finished` 划定测试边界
//! - `begin_step` 打开步骤，嵌套打开的步骤成为子步骤
//! - `finish_step` / `ignore_step` / `step_pending` / `fail_step` 关闭最内层步骤
//!
//! 在没有调用 `test_started` 的情况下收到步骤事件时，会自动开始一个未命名测试。

use std::error::Error;
use std::sync::{Arc, Mutex, MutexGuard, OnceLock, PoisonError};
use tracing::{debug, info, warn};

use crate::{ReportingError, Result, StepReporter, StepStatus, TestOutcome, TestStep};

const UNNAMED_TEST: &str = "未命名测试";

static GLOBAL_BUS: OnceLock<Arc<StepEventBus>> = OnceLock::new();

#[derive(Debug, Default)]
struct BusState {
    /// 当前测试
    current: Option<TestOutcome>,

    /// 打开的步骤路径 (栈顶为最内层)
    open: Vec<Vec<usize>>,

    /// 已结束的测试
    finished: Vec<TestOutcome>,
}

impl BusState {
    fn outcome(&mut self) -> &mut TestOutcome {
        self.current.get_or_insert_with(|| {
            debug!("收到步骤事件但没有进行中的测试，自动开始: {}", UNNAMED_TEST);
            TestOutcome::new(UNNAMED_TEST)
        })
    }

    fn step_at(&mut self, path: &[usize]) -> Option<&mut TestStep> {
        let (first, rest) = path.split_first()?;
        let mut step = self.current.as_mut()?.steps.get_mut(*first)?;
        for index in rest {
            step = step.children.get_mut(*index)?;
        }
        Some(step)
    }

    /// 关闭最内层打开的步骤
    fn close_top(&mut self, status: StepStatus, error: Option<String>) -> bool {
        let Some(path) = self.open.pop() else {
            return false;
        };
        match self.step_at(&path) {
            Some(step) => {
                step.close(status, error);
                true
            }
            None => false,
        }
    }

    /// 在最内层打开的步骤下 (或顶层) 追加步骤，返回其路径
    fn push_step(&mut self, step: TestStep) -> Vec<usize> {
        if let Some(mut path) = self.open.last().cloned() {
            if let Some(parent) = self.step_at(&path) {
                parent.children.push(step);
                let index = parent.children.len() - 1;
                path.push(index);
                return path;
            }
        }

        let outcome = self.outcome();
        outcome.steps.push(step);
        vec![outcome.steps.len() - 1]
    }

    /// 查找描述匹配的打开步骤在栈中的位置 (从内向外)
    fn open_position(&mut self, description: &str) -> Option<usize> {
        let open = self.open.clone();
        open.iter().enumerate().rev().find_map(|(position, path)| {
            self.step_at(path)
                .filter(|step| step.description == description)
                .map(|_| position)
        })
    }
}

/// 步骤事件总线
#[derive(Debug, Default)]
pub struct StepEventBus {
    state: Mutex<BusState>,
}

impl StepEventBus {
    /// 创建新的步骤事件总线
    pub fn new() -> Self {
        Self::default()
    }

    /// 进程级共享实例
    pub fn global() -> Arc<StepEventBus> {
        GLOBAL_BUS
            .get_or_init(|| Arc::new(StepEventBus::new()))
            .clone()
    }

    fn lock(&self) -> MutexGuard<'_, BusState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// 开始新测试；若上一个测试尚未结束，会先将其结束
    pub fn test_started(&self, name: &str) {
        let mut state = self.lock();
        if let Some(mut previous) = state.current.take() {
            warn!("测试 {} 未正常结束，自动结束", previous.name);
            previous.update_result();
            previous.finished_at = Some(chrono::Utc::now());
            state.finished.push(previous);
        }
        state.open.clear();
        info!("开始测试: {}", name);
        state.current = Some(TestOutcome::new(name));
    }

    /// 结束当前测试并返回其结果
    pub fn test_finished(&self) -> Result<TestOutcome> {
        let mut state = self.lock();

        while state.close_top(StepStatus::Success, None) {}

        let mut outcome = state
            .current
            .take()
            .ok_or(ReportingError::NoTestInProgress)?;
        outcome.update_result();
        outcome.finished_at = Some(chrono::Utc::now());
        info!("测试结束: {} - {:?}", outcome.name, outcome.result);

        state.finished.push(outcome.clone());
        Ok(outcome)
    }

    /// 当前测试结果快照
    pub fn current_outcome(&self) -> Option<TestOutcome> {
        self.lock().current.clone()
    }

    /// 所有已结束的测试结果
    pub fn outcomes(&self) -> Vec<TestOutcome> {
        self.lock().finished.clone()
    }

    /// 清空全部状态 (新的测试运行)
    pub fn reset(&self) {
        let mut state = self.lock();
        *state = BusState::default();
    }
}

impl StepReporter for StepEventBus {
    fn begin_step(&self, description: &str) {
        debug!("步骤开始: {}", description);
        let mut state = self.lock();
        let path = state.push_step(TestStep::new(description));
        state.open.push(path);
    }

    fn finish_step(&self) {
        let mut state = self.lock();
        if !state.close_top(StepStatus::Success, None) {
            debug!("finish_step: 没有打开的步骤");
        }
    }

    fn ignore_step(&self) {
        let mut state = self.lock();
        if !state.close_top(StepStatus::Ignored, None) {
            debug!("ignore_step: 没有打开的步骤");
        }
    }

    fn step_pending(&self) {
        let mut state = self.lock();
        if !state.close_top(StepStatus::Pending, None) {
            let outcome = state.outcome();
            outcome.pending = true;
            outcome.suspended = true;
        }
    }

    fn fail_step(&self, subject: &str, error: &dyn Error) {
        let message = error.to_string();
        warn!("步骤失败: {} - {}", subject, message);

        let mut state = self.lock();
        match state.open_position(subject) {
            Some(position) => {
                // 先关闭位于失败步骤之内的步骤
                while state.open.len() > position + 1 {
                    state.close_top(StepStatus::Success, None);
                }
                state.close_top(StepStatus::Failed, Some(message.clone()));
            }
            None => {
                state.push_step(TestStep::failed(subject, &message));
            }
        }

        let outcome = state.outcome();
        outcome.suspended = true;
        outcome.failure.get_or_insert(message);
    }

    fn merge_with_previous_step(&self) {
        let mut state = self.lock();
        let outcome = state.outcome();
        if outcome.steps.len() < 2 {
            return;
        }

        let last_index = outcome.steps.len() - 1;
        let last_is_open = state.open.iter().any(|path| path.first() == Some(&last_index));
        if last_is_open {
            debug!("merge_with_previous_step: 最近的步骤仍未结束，跳过合并");
            return;
        }

        let outcome = state.outcome();
        if let Some(last) = outcome.steps.pop() {
            debug!("合并步骤: {}", last.description);
            if let Some(previous) = outcome.steps.last_mut() {
                previous.status = previous.status.max(last.worst_status());
                previous.children.push(last);
            }
        }
    }

    fn mark_test_skipped(&self) {
        let mut state = self.lock();
        let outcome = state.outcome();
        outcome.skipped = true;
        outcome.suspended = true;
    }

    fn mark_test_pending(&self) {
        let mut state = self.lock();
        let outcome = state.outcome();
        outcome.pending = true;
        outcome.suspended = true;
    }

    fn update_overall_result(&self) {
        let mut state = self.lock();
        if let Some(outcome) = state.current.as_mut() {
            outcome.update_result();
        }
    }

    fn current_step_count(&self) -> usize {
        self.lock()
            .current
            .as_ref()
            .map(TestOutcome::step_count)
            .unwrap_or(0)
    }

    fn open_step_depth(&self) -> usize {
        self.lock().open.len()
    }

    /// 只看当前测试，已结束的测试不影响后续测试的步骤合并
    fn has_any_step_failed(&self) -> bool {
        self.lock()
            .current
            .as_ref()
            .is_some_and(TestOutcome::has_failed_step)
    }

    fn is_current_test_suspended(&self) -> bool {
        self.lock()
            .current
            .as_ref()
            .is_some_and(|outcome| outcome.suspended)
    }

    fn has_any_step_in_current_test_failed(&self) -> bool {
        self.lock()
            .current
            .as_ref()
            .is_some_and(TestOutcome::has_failed_step)
    }
}
