//! 步骤报告接口

use std::error::Error;

/// 步骤报告器
///
/// 执行引擎只通过此 trait 与外部报告总线交互。实现方负责自身的生命周期
/// (每次测试运行初始化一次，测试之间重置)，引擎从不初始化或销毁它。
pub trait StepReporter: Send + Sync {
    /// 开始一个新步骤
    fn begin_step(&self, description: &str);

    /// 当前步骤成功结束
    fn finish_step(&self);

    /// 当前步骤标记为忽略
    fn ignore_step(&self);

    /// 当前步骤标记为待实现
    fn step_pending(&self);

    /// 记录步骤失败，`subject` 为失败的任务或结果检查的描述
    fn fail_step(&self, subject: &str, error: &dyn Error);

    /// 将刚结束的步骤合并到前一个步骤
    fn merge_with_previous_step(&self);

    /// 将当前测试标记为跳过
    fn mark_test_skipped(&self);

    /// 将当前测试标记为待实现
    fn mark_test_pending(&self);

    /// 重新计算当前测试的整体结果
    fn update_overall_result(&self);

    /// 当前测试已报告的 (顶层) 步骤数
    fn current_step_count(&self) -> usize;

    /// 当前打开 (尚未结束) 的步骤层数
    fn open_step_depth(&self) -> usize;

    /// 是否已有步骤失败
    ///
    /// 报告器在测试之间重置，因此只反映当前测试。
    fn has_any_step_failed(&self) -> bool;

    /// 当前测试是否已挂起 (后续步骤不再视为有效执行)
    fn is_current_test_suspended(&self) -> bool;

    /// 当前测试中是否已有步骤失败
    fn has_any_step_in_current_test_failed(&self) -> bool;
}
