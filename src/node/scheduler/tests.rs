//! Unit tests for the deadline scheduler.
use super::*;

fn scheduler() -> Scheduler {
    Scheduler::new(
        Instant::from_millis(0),
        Duration::from_millis(50),
        Duration::from_secs(1),
    )
}

fn count_heartbeats(scheduler: &mut Scheduler, until_ms: u64, step_ms: u64) -> u32 {
    let mut sent = 0;
    let mut now = 0;
    while now < until_ms {
        if scheduler.heartbeat_due(Instant::from_millis(now)).is_some() {
            sent += 1;
        }
        now += step_ms;
    }
    // Final poll lands exactly on the last deadline
    if scheduler.heartbeat_due(Instant::from_millis(until_ms)).is_some() {
        sent += 1;
    }
    sent
}

#[test]
/// The first heartbeat and the first trigger fire at boot.
fn test_deadlines_start_at_boot() {
    let mut scheduler = scheduler();
    let boot = Instant::from_millis(0);
    assert_eq!(scheduler.next_deadline(), boot);
    assert_eq!(scheduler.heartbeat_due(boot), Some(0));
    assert!(scheduler.trigger_due(boot));
    assert_eq!(scheduler.next_heartbeat(), Instant::from_secs(1));
    assert_eq!(scheduler.next_trigger(), Instant::from_millis(50));
}

#[test]
/// One heartbeat per elapsed second whatever the poll rate.
fn test_one_heartbeat_per_second() {
    // 0 s .. 10 s inclusive → 11 heartbeats
    for step in [1, 7, 50, 333, 1000] {
        let mut scheduler = scheduler();
        assert_eq!(count_heartbeats(&mut scheduler, 10_000, step), 11, "step {step} ms");
    }
}

#[test]
/// Uptime is whole seconds since boot at the time of emission.
fn test_heartbeat_uptime() {
    let mut scheduler = Scheduler::new(
        Instant::from_millis(500),
        Duration::from_millis(50),
        Duration::from_secs(1),
    );
    assert_eq!(scheduler.heartbeat_due(Instant::from_millis(500)), Some(0));
    assert_eq!(scheduler.heartbeat_due(Instant::from_millis(1499)), None);
    assert_eq!(scheduler.heartbeat_due(Instant::from_millis(1500)), Some(1));
    assert_eq!(scheduler.heartbeat_due(Instant::from_millis(3700)), Some(3));
}

#[test]
/// After a stall the heartbeat catches up one per iteration.
fn test_heartbeat_catch_up() {
    let mut scheduler = scheduler();
    scheduler.heartbeat_due(Instant::from_millis(0));

    let late = Instant::from_millis(3_200);
    assert_eq!(scheduler.heartbeat_due(late), Some(3));
    assert_eq!(scheduler.heartbeat_due(late), Some(3));
    assert_eq!(scheduler.heartbeat_due(late), Some(3));
    assert_eq!(scheduler.heartbeat_due(late), None);
    assert_eq!(scheduler.next_heartbeat(), Instant::from_secs(4));
}

#[test]
/// Missed trigger periods collapse into a single trigger.
fn test_trigger_coalesces_missed_periods() {
    let mut scheduler = scheduler();
    assert!(scheduler.trigger_due(Instant::from_millis(0)));
    assert!(!scheduler.trigger_due(Instant::from_millis(49)));

    // Stall of 230 ms: periods at 50..200 were missed
    assert!(scheduler.trigger_due(Instant::from_millis(230)));
    assert!(!scheduler.trigger_due(Instant::from_millis(230)));
    assert_eq!(scheduler.next_trigger(), Instant::from_millis(250));

    // Landing exactly on a deadline keeps the grid
    assert!(scheduler.trigger_due(Instant::from_millis(250)));
    assert_eq!(scheduler.next_trigger(), Instant::from_millis(300));
}

#[test]
fn test_uptime_before_boot_is_zero() {
    let scheduler = Scheduler::new(
        Instant::from_secs(10),
        Duration::from_millis(50),
        Duration::from_secs(1),
    );
    assert_eq!(scheduler.uptime_secs(Instant::from_secs(5)), 0);
}
