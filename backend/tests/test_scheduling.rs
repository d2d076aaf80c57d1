//! Tests for start/stop/interval coordination with the scheduler

mod common;

use common::{quiet_engine, Recorded};
use pizza_shop_core_rs::{
    EngineConfig, ManualScheduler, ScheduleError, ScheduleHandle, Scheduler, SchedulerCall,
    ScriptedRng, SimulationEngine, SinkError, Snapshot,
};

/// Accepts the first `accepted` registrations, then refuses every one
struct FlakyScheduler {
    inner: ManualScheduler,
    accepted: usize,
}

impl Scheduler for FlakyScheduler {
    fn schedule(&mut self, period_ms: u64) -> Result<ScheduleHandle, ScheduleError> {
        if self.accepted == 0 {
            return Err(ScheduleError::Rejected("timer host unavailable".to_string()));
        }
        self.accepted -= 1;
        self.inner.schedule(period_ms)
    }

    fn cancel(&mut self, handle: ScheduleHandle) {
        self.inner.cancel(handle);
    }
}

fn flaky_engine(accepted: usize) -> (SimulationEngine, ManualScheduler, Recorded) {
    let scheduler = ManualScheduler::new();
    let recorded = Recorded::default();
    let sink_log = recorded.0.clone();

    let engine = SimulationEngine::new(EngineConfig::default())
        .unwrap()
        .with_scheduler(FlakyScheduler {
            inner: scheduler.clone(),
            accepted,
        })
        .with_rng(ScriptedRng::always_min())
        .with_sink(move |snapshot: &Snapshot| -> Result<(), SinkError> {
            sink_log.borrow_mut().push(snapshot.clone());
            Ok(())
        });

    (engine, scheduler, recorded)
}

/// Drive the engine the way a host loop would
fn pump(engine: &mut SimulationEngine, scheduler: &ManualScheduler, elapsed_ms: u64) {
    for _ in 0..scheduler.advance(elapsed_ms) {
        engine.step();
    }
}

#[test]
fn test_start_registers_at_interval() {
    let (mut engine, scheduler, recorded) = quiet_engine();

    let snapshot = engine.start().expect("first start emits");

    assert!(engine.is_running());
    assert_eq!(scheduler.period_ms(), Some(2000));
    assert_eq!(snapshot.last_message.as_deref(), Some("Started"));
    assert_eq!(recorded.len(), 1);
}

#[test]
fn test_start_twice_is_noop() {
    let (mut engine, scheduler, recorded) = quiet_engine();

    engine.start();
    assert!(engine.start().is_none());

    assert_eq!(recorded.len(), 1);
    let schedules = scheduler
        .calls()
        .iter()
        .filter(|c| matches!(c, SchedulerCall::Schedule { .. }))
        .count();
    assert_eq!(schedules, 1);
}

#[test]
fn test_stop_twice_is_noop() {
    let (mut engine, scheduler, recorded) = quiet_engine();

    engine.start();
    let stopped = engine.stop().expect("first stop emits");
    assert_eq!(stopped.last_message.as_deref(), Some("Stopped"));
    assert!(engine.stop().is_none());

    assert!(!engine.is_running());
    assert!(!scheduler.is_active());
    assert_eq!(recorded.len(), 2);
}

#[test]
fn test_stop_when_idle_emits_nothing() {
    let (mut engine, scheduler, recorded) = quiet_engine();

    assert!(engine.stop().is_none());
    assert_eq!(recorded.len(), 0);
    assert!(scheduler.calls().is_empty());
}

#[test]
fn test_scheduler_drives_steps_until_stopped() {
    let (mut engine, scheduler, _) = quiet_engine();
    engine.set_interval_ms(100);
    engine.start();

    pump(&mut engine, &scheduler, 350);
    assert_eq!(engine.current_tick(), 3);

    engine.stop();
    pump(&mut engine, &scheduler, 10_000);
    assert_eq!(engine.current_tick(), 3);
}

#[test]
fn test_set_interval_while_running_cancels_before_rescheduling() {
    let (mut engine, scheduler, recorded) = quiet_engine();
    engine.start();

    let snapshot = engine.set_interval_ms(250);

    assert_eq!(snapshot.interval_ms, 250);
    assert_eq!(
        snapshot.last_message.as_deref(),
        Some("Interval set to 250 ms")
    );
    assert!(engine.is_running());
    assert_eq!(recorded.len(), 2);

    let calls = scheduler.calls();
    assert_eq!(calls.len(), 3);
    let SchedulerCall::Schedule { handle: first, .. } = calls[0] else {
        panic!("expected initial schedule, got {:?}", calls[0]);
    };
    assert_eq!(calls[1], SchedulerCall::Cancel { handle: first });
    assert!(matches!(
        calls[2],
        SchedulerCall::Schedule { period_ms: 250, .. }
    ));
    assert_eq!(scheduler.period_ms(), Some(250));
}

#[test]
fn test_set_interval_while_stopped_does_not_schedule() {
    let (mut engine, scheduler, _) = quiet_engine();

    engine.set_interval_ms(500);

    assert!(!engine.is_running());
    assert!(scheduler.calls().is_empty());
    assert_eq!(engine.interval_ms(), 500);
}

#[test]
fn test_set_interval_clamps_to_minimum() {
    let (mut engine, _, _) = quiet_engine();

    assert_eq!(engine.set_interval_ms(3).interval_ms, 10);
    assert_eq!(engine.set_interval_ms(0).interval_ms, 10);
}

#[test]
fn test_set_interval_leaves_simulation_untouched() {
    let (mut engine, _, _) = quiet_engine();
    engine.step();
    engine.make_pizza();
    let before = engine.snapshot();

    let after = engine.set_interval_ms(750);

    assert_eq!(after.tick, before.tick);
    assert_eq!(after.customers, before.customers);
    assert_eq!(after.money, before.money);
    assert_eq!(after.ingredients, before.ingredients);
}

#[test]
fn test_reset_stops_scheduling_with_single_emission() {
    let (mut engine, scheduler, recorded) = quiet_engine();
    engine.start();
    engine.step();

    let snapshot = engine.reset();

    assert!(!engine.is_running());
    assert!(!scheduler.is_active());
    assert_eq!(snapshot.last_message.as_deref(), Some("Reset"));
    assert_eq!(recorded.len(), 3, "start, step, reset");
}

#[test]
fn test_restart_after_stop_uses_new_handle() {
    let (mut engine, scheduler, _) = quiet_engine();

    engine.start();
    let (first, _) = scheduler.active().unwrap();
    engine.stop();
    engine.start();
    let (second, _) = scheduler.active().unwrap();

    assert_ne!(first, second);
}

#[test]
fn test_refused_start_leaves_engine_stopped() {
    let (mut engine, scheduler, recorded) = flaky_engine(0);

    let snapshot = engine.start().expect("failed start still emits");

    assert!(!engine.is_running());
    assert!(!scheduler.is_active());
    assert_eq!(recorded.len(), 1);
    assert_eq!(
        snapshot.last_message.as_deref(),
        Some("Scheduler rejected the registration: timer host unavailable")
    );
    assert_eq!(engine.event_log().events_of_type("ScheduleFailed").len(), 1);
    assert!(engine.event_log().events_of_type("Started").is_empty());

    // Not running, so a retry is attempted again rather than ignored
    assert!(engine.start().is_some());
    assert!(engine.stop().is_none());
}

#[test]
fn test_refused_reschedule_stops_engine() {
    let (mut engine, scheduler, recorded) = flaky_engine(1);

    engine.start();
    assert!(scheduler.is_active());

    let snapshot = engine.set_interval_ms(500);

    assert!(!engine.is_running());
    assert!(!scheduler.is_active());
    assert_eq!(snapshot.interval_ms, 500);
    assert!(snapshot
        .last_message
        .as_deref()
        .is_some_and(|m| m.starts_with("Scheduler rejected")));
    assert_eq!(recorded.len(), 2);
    assert!(matches!(
        scheduler.calls().last(),
        Some(SchedulerCall::Cancel { .. })
    ));
    assert_eq!(scheduler.advance(10_000), 0);
}
