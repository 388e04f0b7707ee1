//! Deadline bookkeeping for the node loop.
//!
//! Both deadlines start at boot. The heartbeat deadline moves by exactly one
//! period each time it is reached, so a stalled loop catches up one heartbeat
//! per iteration and a fast loop never sends two for the same period. The
//! trigger deadline skips every period missed during a stall: one late
//! trigger, never a burst.
use embassy_time::{Duration, Instant};

#[derive(Clone, Debug)]
pub struct Scheduler {
    boot: Instant,
    trigger_period: Duration,
    heartbeat_period: Duration,
    next_trigger: Instant,
    next_heartbeat: Instant,
}

impl Scheduler {
    /// Zero periods are raised to one tick.
    pub fn new(boot: Instant, trigger_period: Duration, heartbeat_period: Duration) -> Self {
        let min = Duration::from_ticks(1);
        Self {
            boot,
            trigger_period: trigger_period.max(min),
            heartbeat_period: heartbeat_period.max(min),
            next_trigger: boot,
            next_heartbeat: boot,
        }
    }

    pub fn boot(&self) -> Instant {
        self.boot
    }

    /// Whole seconds since boot, saturating at `u32::MAX`.
    pub fn uptime_secs(&self, now: Instant) -> u32 {
        let secs = now.saturating_duration_since(self.boot).as_secs();
        u32::try_from(secs).unwrap_or(u32::MAX)
    }

    /// If a heartbeat is due, consume its deadline and return the uptime to publish.
    pub fn heartbeat_due(&mut self, now: Instant) -> Option<u32> {
        if now < self.next_heartbeat {
            return None;
        }
        self.next_heartbeat += self.heartbeat_period;
        Some(self.uptime_secs(now))
    }

    /// If a trigger is due, move the deadline past `now` and return `true`.
    pub fn trigger_due(&mut self, now: Instant) -> bool {
        if now < self.next_trigger {
            return false;
        }
        let period = self.trigger_period.as_ticks();
        let missed = (now - self.next_trigger).as_ticks() / period;
        self.next_trigger += Duration::from_ticks((missed + 1) * period);
        true
    }

    pub fn next_trigger(&self) -> Instant {
        self.next_trigger
    }

    pub fn next_heartbeat(&self) -> Instant {
        self.next_heartbeat
    }

    /// Earliest of the two deadlines.
    pub fn next_deadline(&self) -> Instant {
        self.next_trigger.min(self.next_heartbeat)
    }
}

#[cfg(test)]
#[path = "tests.rs"]
mod tests;
