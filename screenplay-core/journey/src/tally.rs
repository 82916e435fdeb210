//! 任务计数

/// 记录当前表演中已尝试的任务数
///
/// 每次表演开始时压入一个新的计数 (从 0 开始)，嵌套表演结束后恢复外层计数。
#[derive(Debug, Default, Clone)]
pub struct TaskTally {
    scopes: Vec<usize>,
    last_completed: usize,
}

impl TaskTally {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin_performance(&mut self) {
        self.scopes.push(0);
    }

    /// 记录一次任务尝试，返回当前表演中的计数
    pub fn new_task(&mut self) -> usize {
        match self.scopes.last_mut() {
            Some(count) => {
                *count += 1;
                *count
            }
            None => {
                // 表演之外直接执行任务
                self.last_completed += 1;
                self.last_completed
            }
        }
    }

    /// 当前 (或最近一次结束的) 表演中已尝试的任务数
    pub fn performed_task_count(&self) -> usize {
        self.scopes.last().copied().unwrap_or(self.last_completed)
    }

    pub fn end_performance(&mut self) {
        if let Some(count) = self.scopes.pop() {
            self.last_completed = count;
        }
    }

    /// 嵌套的表演层数
    pub fn depth(&self) -> usize {
        self.scopes.len()
    }
}
