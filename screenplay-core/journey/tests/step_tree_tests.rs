//! 表演引擎与步骤事件总线的联合测试

use screenplay_journey::*;
use screenplay_reporting::{Broadcaster, StepEventBus, StepReporter, StepStatus};
use std::result::Result;
use std::sync::Arc;

fn actor_on(bus: &Arc<StepEventBus>, fail_fast: bool) -> Actor {
    Actor::with_reporting(
        "Alice",
        Reporting::new(
            bus.clone(),
            Arc::new(Broadcaster::new()),
            Arc::new(FailFastPolicy::new(fail_fast)),
        ),
    )
}

/// 在自己的步骤里执行一个嵌套表演
fn parent(description: &str, inner: fn() -> Result<(), PerformError>) -> Instrumented<Task> {
    let child = description.to_string();
    Task::where_(description, move |actor| {
        let nested = Task::where_(&format!("{} (nested)", child), move |_| inner());
        actor.attempts_to(&[&nested])
    })
    .instrumented()
}

fn ignored() -> Result<(), PerformError> {
    Err(PerformError::ignore("no banner"))
}

fn pending() -> Result<(), PerformError> {
    Err(PerformError::pending("banner"))
}

fn fatal() -> Result<(), PerformError> {
    Err(PerformError::from(anyhow::anyhow!("smtp down")))
}

#[test]
fn test_ignored_nested_task_does_not_close_parent_step() {
    let bus = Arc::new(StepEventBus::new());
    bus.test_started("login");
    let alice = actor_on(&bus, false);

    let log_in = parent("log in", ignored);
    let inbox = Task::where_("open the inbox", |_| Ok(())).instrumented();
    alice.attempts_to(&[&log_in, &inbox]).unwrap();

    assert_eq!(bus.open_step_depth(), 0);
    let outcome = bus.test_finished().unwrap();
    assert_eq!(outcome.step_count(), 2);
    assert_eq!(outcome.steps[0].description, "log in");
    assert_eq!(outcome.steps[0].status, StepStatus::Success);
    assert!(outcome.steps[0].children.is_empty());
    assert_eq!(outcome.steps[1].description, "open the inbox");
    assert_eq!(outcome.steps[1].status, StepStatus::Success);
}

#[test]
fn test_pending_nested_task_is_recorded_as_child() {
    let bus = Arc::new(StepEventBus::new());
    bus.test_started("login");
    let alice = actor_on(&bus, false);

    let log_in = parent("log in", pending);
    let inbox = Task::where_("open the inbox", |_| Ok(())).instrumented();
    alice.attempts_to(&[&log_in, &inbox]).unwrap();

    assert_eq!(bus.open_step_depth(), 0);
    let outcome = bus.test_finished().unwrap();
    assert_eq!(outcome.step_count(), 2);

    let log_in = &outcome.steps[0];
    assert_eq!(log_in.children.len(), 1);
    assert_eq!(log_in.children[0].description, "log in (nested)");
    assert_eq!(log_in.children[0].status, StepStatus::Pending);
    assert_eq!(log_in.worst_status(), StepStatus::Pending);
    assert!(outcome.passed());
}

#[test]
fn test_declared_pending_nested_task_keeps_parent_open() {
    let bus = Arc::new(StepEventBus::new());
    bus.test_started("reports");
    let alice = actor_on(&bus, false);

    let generate = Task::where_("generate the report", |actor| {
        let export = Task::pending("export the report");
        let close = Task::where_("close the dialog", |_| Ok(())).instrumented();
        actor.attempts_to(&[&export, &close])
    })
    .instrumented();
    alice.attempts_to(&[&generate]).unwrap();

    assert_eq!(bus.open_step_depth(), 0);
    let outcome = bus.test_finished().unwrap();
    assert_eq!(outcome.step_count(), 1);

    let children = &outcome.steps[0].children;
    assert_eq!(children.len(), 2);
    assert_eq!(children[0].description, "export the report");
    assert_eq!(children[0].status, StepStatus::Pending);
    assert_eq!(children[1].description, "close the dialog");
    assert_eq!(children[1].status, StepStatus::Success);
}

#[test]
fn test_fatal_nested_task_is_recorded_under_parent() {
    let bus = Arc::new(StepEventBus::new());
    bus.test_started("notify");
    let alice = actor_on(&bus, false);

    let notify = parent("notify the customer", fatal);
    let archive = Task::where_("archive the order", |_| Ok(())).instrumented();
    alice.attempts_to(&[&notify, &archive]).unwrap();

    let outcome = bus.test_finished().unwrap();
    assert_eq!(outcome.step_count(), 2);

    let notify = &outcome.steps[0];
    assert_eq!(notify.status, StepStatus::Failed);
    assert_eq!(notify.children[0].description, "notify the customer (nested)");
    assert_eq!(notify.children[0].status, StepStatus::Failed);
    assert_eq!(notify.children[0].error.as_deref(), Some("smtp down"));
    assert_eq!(outcome.steps[1].status, StepStatus::Success);
    assert_eq!(outcome.result, StepStatus::Failed);
}

#[test]
fn test_ignored_task_under_fail_fast_closes_only_its_steps() {
    let bus = Arc::new(StepEventBus::new());
    bus.test_started("checkout");
    let alice = actor_on(&bus, true);

    let checkout = Task::where_("check out", |actor| {
        let coupon = Task::where_("apply a coupon", |_| Err(PerformError::ignore("no coupon")))
            .instrumented();
        actor.attempts_to(&[&coupon])
    })
    .instrumented();
    let pay = Task::where_("pay", |_| Ok(())).instrumented();

    let error = alice.attempts_to(&[&checkout, &pay]).unwrap_err();
    assert_eq!(FailureKind::of(&error), FailureKind::Ignorable);
    assert_eq!(bus.open_step_depth(), 0);

    let outcome = bus.test_finished().unwrap();
    assert_eq!(outcome.step_count(), 1);
    assert_eq!(outcome.steps[0].status, StepStatus::Ignored);
    assert_eq!(outcome.steps[0].children[0].description, "apply a coupon");
    assert_eq!(outcome.steps[0].children[0].status, StepStatus::Ignored);
    assert!(!outcome.has_failed_step());
}

#[test]
fn test_pending_consequence_is_a_failed_step() {
    let bus = Arc::new(StepEventBus::new());
    let unfinished = Verify::that("sees the refund", |_| Err(PerformError::pending("refunds")));

    bus.test_started("without fail-fast");
    assert!(actor_on(&bus, false).should(&[&unfinished]).is_ok());
    let outcome = bus.test_finished().unwrap();
    assert_eq!(outcome.steps[0].status, StepStatus::Failed);
    assert_eq!(outcome.steps[0].error.as_deref(), Some("尚未实现: refunds"));

    bus.test_started("with fail-fast");
    let error = actor_on(&bus, true).should(&[&unfinished]).unwrap_err();
    assert_eq!(FailureKind::of(&error), FailureKind::Pending);
    let outcome = bus.test_finished().unwrap();
    assert_eq!(outcome.steps[0].status, StepStatus::Failed);
}

/// 一个任务上报两个顶层步骤
fn fills_the_form() -> Task {
    Task::where_("fill the form", |actor| {
        let steps = actor.reporting().steps();
        steps.begin_step("enter the name");
        steps.finish_step();
        steps.begin_step("enter the email");
        steps.finish_step();
        Ok(())
    })
}

#[test]
fn test_failure_in_previous_test_does_not_merge_steps() {
    let bus = Arc::new(StepEventBus::new());
    let alice = actor_on(&bus, false);
    let breaks = Task::where_("break", |_| Err(PerformError::assertion("boom"))).instrumented();

    bus.test_started("first");
    alice.attempts_to(&[&breaks]).unwrap();
    bus.test_finished().unwrap();

    bus.test_started("second");
    alice.attempts_to(&[&fills_the_form()]).unwrap();
    let outcome = bus.test_finished().unwrap();
    assert_eq!(outcome.step_count(), 2);

    bus.test_started("third");
    alice.attempts_to(&[&breaks, &fills_the_form()]).unwrap();
    let outcome = bus.test_finished().unwrap();
    assert_eq!(outcome.step_count(), 2);
    assert_eq!(outcome.steps[1].description, "enter the name");
    assert_eq!(outcome.steps[1].children[0].description, "enter the email");
}
