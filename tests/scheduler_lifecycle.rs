// tests/scheduler_lifecycle.rs

mod common;
use crate::common::harness::SchedulerHarness;
use crate::common::init_tracing;

use std::error::Error;

use blocktask::errors::TaskError;
use blocktask::types::{TaskId, TaskOrigin};
use mlua::Value;

type TestResult = Result<(), Box<dyn Error>>;

#[test]
fn run_does_not_execute_until_step() -> TestResult {
    init_tracing();
    let h = SchedulerHarness::new();

    let id = h.run("results.ran = true");
    assert_eq!(h.scheduler().live_task_count(), 1);
    assert_eq!(h.result::<Option<bool>>("ran"), None);

    let state = h.state(id).ok_or("task missing")?;
    assert_eq!(state.origin, TaskOrigin::Script);
    assert!(!state.finished);
    assert!(!state.should_stop);

    let report = h.step_at(0.0);
    assert_eq!(report.resumed, vec![id]);
    assert_eq!(report.completed, vec![id]);
    assert_eq!(report.swept, 1);
    assert_eq!(h.result::<Option<bool>>("ran"), Some(true));
    assert_eq!(h.scheduler().live_task_count(), 0);
    Ok(())
}

#[test]
fn script_that_returns_immediately_completes_in_one_step() -> TestResult {
    init_tracing();
    let h = SchedulerHarness::new();

    let id = h.run("return 1 + 1");
    let report = h.step_at(0.0);

    assert_eq!(report.completed, vec![id]);
    assert!(report.failed.is_empty());
    assert_eq!(h.scheduler().live_task_count(), 0);
    assert!(h.state(id).is_none());
    Ok(())
}

#[test]
fn ids_are_allocated_in_order() -> TestResult {
    init_tracing();
    let h = SchedulerHarness::new();

    let a = h.run("return");
    let b = h.run("return");
    assert_eq!(a, TaskId(1));
    assert_eq!(b, TaskId(2));
    assert_eq!(h.scheduler().task_ids(), vec![a, b]);
    Ok(())
}

#[test]
fn wait_suspends_until_delay_has_elapsed() -> TestResult {
    init_tracing();
    let h = SchedulerHarness::new();

    let id = h.run(
        r#"
        results.before = true
        results.elapsed = task.wait(0.5)
        results.after = true
        "#,
    );

    let report = h.step_at(0.0);
    assert_eq!(report.resumed, vec![id]);
    assert!(report.completed.is_empty());
    assert_eq!(h.result::<Option<bool>>("before"), Some(true));
    assert_eq!(h.result::<Option<bool>>("after"), None);

    let state = h.state(id).ok_or("task missing")?;
    assert_eq!(state.sleep_start_time, 0.0);
    assert_eq!(state.wake_time, 0.5);

    // Not yet due.
    let report = h.step_at(0.25);
    assert!(report.resumed.is_empty());
    assert_eq!(h.result::<Option<bool>>("after"), None);

    let report = h.step_at(0.6);
    assert_eq!(report.completed, vec![id]);
    assert_eq!(h.result::<Option<bool>>("after"), Some(true));

    let elapsed: f64 = h.result("elapsed");
    assert!((elapsed - 0.6).abs() < 1e-9, "elapsed was {elapsed}");
    Ok(())
}

#[test]
fn wait_without_delay_resumes_on_next_step() -> TestResult {
    init_tracing();
    let h = SchedulerHarness::new();

    h.run(
        r#"
        results.count = 1
        task.wait()
        results.count = 2
        task.wait(-5)
        results.count = 3
        "#,
    );

    h.step_at(1.0);
    assert_eq!(h.result::<i64>("count"), 1);
    h.step_at(1.0);
    assert_eq!(h.result::<i64>("count"), 2);
    h.step_at(1.0);
    assert_eq!(h.result::<i64>("count"), 3);
    assert_eq!(h.scheduler().live_task_count(), 0);
    Ok(())
}

#[test]
fn spawned_tasks_are_deferred_to_the_next_step() -> TestResult {
    init_tracing();
    let h = SchedulerHarness::new();

    let parent = h.run(
        r#"
        results.children = 0
        for _ = 1, 3 do
            task.spawn(function()
                results.children = results.children + 1
            end)
        end
        "#,
    );

    let report = h.scheduler().resume_eligible();
    assert_eq!(report.resumed, vec![parent]);
    assert_eq!(h.scheduler().live_task_count(), 4);
    assert_eq!(h.result::<i64>("children"), 0);

    let ids = h.scheduler().task_ids();
    assert_eq!(ids[0], parent);
    assert!(h.state(parent).ok_or("parent missing")?.finished);
    for child in &ids[1..] {
        let state = h.state(*child).ok_or("child missing")?;
        assert!(!state.finished);
        assert_eq!(state.origin, TaskOrigin::Spawned);
    }

    assert_eq!(h.scheduler().sweep(), 1);
    assert_eq!(h.scheduler().live_task_count(), 3);

    let report = h.step_at(0.0);
    assert_eq!(report.completed.len(), 3);
    assert_eq!(h.result::<i64>("children"), 3);
    assert_eq!(h.scheduler().live_task_count(), 0);
    Ok(())
}

#[test]
fn each_task_is_resumed_at_most_once_per_step() -> TestResult {
    init_tracing();
    let h = SchedulerHarness::new();

    h.run(
        r#"
        results.ticks = 0
        while true do
            results.ticks = results.ticks + 1
            task.wait()
        end
        "#,
    );

    for expected in 1..=5 {
        let report = h.step_at(0.0);
        assert_eq!(report.resumed.len(), 1);
        assert_eq!(h.result::<i64>("ticks"), expected);
    }
    assert_eq!(h.scheduler().live_task_count(), 1);
    Ok(())
}

#[test]
fn stop_finishes_a_suspended_task_without_resuming_it() -> TestResult {
    init_tracing();
    let h = SchedulerHarness::new();

    let id = h.run(
        r#"
        task.wait(10)
        results.after_wait = true
        "#,
    );
    h.step_at(0.0);

    assert!(h.scheduler().request_stop(id));
    let state = h.state(id).ok_or("task missing")?;
    assert!(state.should_stop);
    assert!(!state.finished);

    let report = h.step_at(20.0);
    assert_eq!(report.stopped, vec![id]);
    assert!(report.resumed.is_empty());
    assert_eq!(h.result::<Option<bool>>("after_wait"), None);
    assert_eq!(h.scheduler().live_task_count(), 0);

    // Already gone.
    assert!(!h.scheduler().request_stop(id));
    Ok(())
}

#[test]
fn stop_before_first_resume_never_runs_the_script() -> TestResult {
    init_tracing();
    let h = SchedulerHarness::new();

    let id = h.run("results.ran = true");
    assert!(h.scheduler().request_stop(id));

    let report = h.step_at(0.0);
    assert_eq!(report.stopped, vec![id]);
    assert_eq!(h.result::<Option<bool>>("ran"), None);
    Ok(())
}

#[test]
fn stop_all_flags_every_live_task() -> TestResult {
    init_tracing();
    let h = SchedulerHarness::new();

    h.run("task.wait(1)");
    h.run("task.wait(2)");
    h.step_at(0.0);

    assert_eq!(h.scheduler().request_stop_all(), 2);
    let report = h.step_at(0.1);
    assert_eq!(report.stopped.len(), 2);
    assert_eq!(h.scheduler().live_task_count(), 0);
    Ok(())
}

#[test]
fn stop_unknown_task_is_rejected() {
    init_tracing();
    let h = SchedulerHarness::new();
    assert!(!h.scheduler().request_stop(TaskId(42)));
}

#[test]
fn wait_outside_a_task_is_an_error() -> TestResult {
    init_tracing();
    let h = SchedulerHarness::new();

    let id = h.run("task.wait(5)");
    h.step_at(0.0);
    let before = h.state(id).ok_or("task missing")?;

    let err = h
        .lua()
        .load("task.wait(1)")
        .exec()
        .expect_err("wait on the main state must fail");
    assert!(
        err.to_string().contains("outside of a running task"),
        "unexpected error: {err}"
    );

    assert_eq!(h.state(id), Some(before));
    assert_eq!(h.scheduler().live_task_count(), 1);
    Ok(())
}

#[test]
fn compile_error_is_reported_and_nothing_is_scheduled() {
    init_tracing();
    let h = SchedulerHarness::new();

    let err = h.try_run("local = = 1").expect_err("syntax error expected");
    assert!(matches!(err, TaskError::Compile(_)), "got {err:?}");
    assert_eq!(h.scheduler().live_task_count(), 0);
}

#[test]
fn runtime_error_finishes_only_the_failing_task() -> TestResult {
    init_tracing();
    let h = SchedulerHarness::new();

    let bad = h.run(r#"error("boom")"#);
    let good = h.run(
        r#"
        task.wait()
        results.good = true
        "#,
    );

    let report = h.step_at(0.0);
    assert_eq!(report.failed.len(), 1);
    let (failed_id, msg) = &report.failed[0];
    assert_eq!(*failed_id, bad);
    assert!(msg.contains("boom"), "message was {msg}");
    assert!(h.state(good).is_some());

    h.step_at(0.0);
    assert_eq!(h.result::<Option<bool>>("good"), Some(true));
    Ok(())
}

#[test]
fn spawning_a_non_function_is_rejected() -> TestResult {
    init_tracing();
    let h = SchedulerHarness::new();

    let err = h
        .scheduler()
        .spawn(h.lua(), Value::Integer(5))
        .expect_err("numbers are not callable");
    assert!(matches!(err, TaskError::InvalidArgument(_)), "got {err:?}");
    assert_eq!(h.scheduler().live_task_count(), 0);

    let id = h.run(
        r#"
        local ok, err = pcall(task.spawn, 5)
        results.ok = ok
        results.err = tostring(err)
        "#,
    );
    let report = h.step_at(0.0);
    assert_eq!(report.completed, vec![id]);
    assert!(!h.result::<bool>("ok"));
    assert!(h.result::<String>("err").contains("expects a function"));
    assert_eq!(h.scheduler().live_task_count(), 0);
    Ok(())
}

#[test]
fn scripts_get_private_globals() -> TestResult {
    init_tracing();
    let h = SchedulerHarness::new();

    h.run("counter = 1");
    h.run("results.seen = counter == nil");
    h.step_at(0.0);

    assert!(h.result::<bool>("seen"));
    assert_eq!(h.lua().globals().get::<Value>("counter")?, Value::Nil);
    Ok(())
}

#[test]
fn finished_is_never_cleared() -> TestResult {
    init_tracing();
    let h = SchedulerHarness::new();

    let id = h.run("return");
    h.scheduler().resume_eligible();
    assert!(h.state(id).ok_or("task missing")?.finished);

    // A stop request on a finished task changes nothing.
    assert!(!h.scheduler().request_stop(id));
    h.scheduler().resume_eligible();
    assert!(h.state(id).ok_or("task missing")?.finished);
    Ok(())
}

/// Expose `stop_task(id)` to scripts so a task can be flagged mid-resume.
fn install_stop_hook(h: &SchedulerHarness) -> TestResult {
    let scheduler = h.scheduler().clone();
    let stop = h
        .lua()
        .create_function(move |_, id: u64| Ok(scheduler.request_stop(TaskId(id))))?;
    h.lua().globals().set("stop_task", stop)?;
    Ok(())
}

#[test]
fn stop_pending_at_wait_ends_the_task_there() -> TestResult {
    init_tracing();
    let h = SchedulerHarness::new();
    install_stop_hook(&h)?;

    let id = h.run(
        r#"
        stop_task(1)
        results.before = true
        task.wait(0)
        results.after = true
        "#,
    );
    assert_eq!(id, TaskId(1));

    let report = h.step_at(0.0);
    assert_eq!(report.resumed, vec![id]);
    assert_eq!(report.stopped, vec![id]);
    assert!(report.failed.is_empty());
    assert!(report.completed.is_empty());
    assert_eq!(h.result::<Option<bool>>("before"), Some(true));
    assert_eq!(h.result::<Option<bool>>("after"), None);
    assert_eq!(h.scheduler().live_task_count(), 0);

    h.step_at(1.0);
    assert_eq!(h.result::<Option<bool>>("after"), None);
    Ok(())
}

#[test]
fn pcall_cannot_swallow_a_stop_at_wait() -> TestResult {
    init_tracing();
    let h = SchedulerHarness::new();
    install_stop_hook(&h)?;

    let id = h.run(
        r#"
        stop_task(1)
        local ok = pcall(task.wait, 1)
        results.ok = ok
        results.after = true
        "#,
    );

    let report = h.step_at(0.0);
    assert_eq!(report.stopped, vec![id]);
    assert!(report.completed.is_empty());
    assert!(report.failed.is_empty());

    h.step_at(5.0);
    assert_eq!(h.result::<Option<bool>>("ok"), None);
    assert_eq!(h.result::<Option<bool>>("after"), None);
    Ok(())
}

#[test]
fn stop_from_a_task_reaching_a_finished_task_is_ignored() -> TestResult {
    init_tracing();
    let h = SchedulerHarness::new();
    install_stop_hook(&h)?;

    let waiter = h.run(
        r#"
        task.wait(0)
        results.waiter_resumed = true
        "#,
    );
    h.step_at(0.0);

    let stopper = h.run("results.accepted = stop_task(1)");
    assert_eq!(waiter, TaskId(1));

    // The waiter is earlier in the collection, so it finishes before the
    // stopper runs.
    let report = h.step_at(0.0);
    assert_eq!(report.completed, vec![waiter, stopper]);
    assert!(report.stopped.is_empty());
    assert_eq!(h.result::<Option<bool>>("waiter_resumed"), Some(true));
    assert_eq!(h.result::<Option<bool>>("accepted"), Some(false));
    Ok(())
}

#[test]
fn rejected_bytecode_is_a_load_error() {
    init_tracing();
    let h = SchedulerHarness::new();

    let err = h
        .scheduler()
        .run_bytecode(h.lua(), &[0x7f, 0x00, 0x01, 0x02])
        .expect_err("unknown bytecode version");
    assert!(matches!(err, TaskError::Load(_)), "got {err:?}");
    assert_eq!(h.scheduler().live_task_count(), 0);
}
