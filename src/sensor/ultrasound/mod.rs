//! Echo timing for an HC-SR04 style ultrasonic ranger.
//!
//! A ranging cycle starts with a 10 µs pulse on the trigger line. The sensor
//! answers with an echo pulse whose width is the round-trip time of flight:
//! the rising edge timestamp is stored, the falling edge closes the cycle and
//! yields a distance. Edge timestamps are wrapping 32-bit microsecond ticks.
//!
//! ## Cycle rules
//!
//! - a trigger is skipped while the previous cycle is still in flight, that is
//!   triggered or with a rising edge seen, and neither completed nor expired;
//! - a cycle with no falling edge [`ECHO_TIMEOUT`] after its trigger is dropped;
//! - a rising edge no trigger opened is timed from the iteration that first
//!   sees it and dropped as an anomaly after [`ECHO_TIMEOUT`];
//! - a falling edge with no stored rising edge is discarded and leaves the
//!   cycle open;
//! - an echo longer than [`MAX_ECHO_PULSE_US`] is discarded.
use embassy_time::{Duration, Instant};
use embedded_hal::delay::DelayNs;

use crate::core::{EdgeEvent, EdgeLevel, Tick};
use crate::error::TriggerError;
use crate::protocol::transport::traits::trigger_pin::TriggerPin;

/// Width of the trigger pulse (µs).
pub const TRIGGER_PULSE_US: u32 = 10;

/// Longest echo the sensor emits; it holds the line for ~38 ms when nothing is in range.
pub const MAX_ECHO_PULSE_US: u32 = 38_000;

/// Age after which an unanswered cycle is abandoned: the longest echo plus the
/// sensor's burst latency.
pub const ECHO_TIMEOUT: Duration = Duration::from_millis(40);

/// Centimetres travelled by sound in one microsecond (343 m/s).
pub const SOUND_CM_PER_US: f32 = 0.0343;

/// One distance reading, forwarded straight to the encoder.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RangeMeasurement {
    pub distance_cm: f32,
    /// Echo pulse width the distance was derived from.
    pub elapsed_us: u32,
}

impl RangeMeasurement {
    /// Halve the round trip (integer division) then scale to centimetres.
    pub fn from_elapsed(elapsed_us: u32) -> Self {
        Self {
            distance_cm: (elapsed_us / 2) as f32 * SOUND_CM_PER_US,
            elapsed_us,
        }
    }
}

/// Result of a trigger request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TriggerOutcome {
    /// The pulse was emitted and a new cycle is in flight.
    Fired,
    /// A previous cycle had not completed or timed out yet.
    Skipped,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RangeStats {
    pub measurements: u32,
    pub skipped_triggers: u32,
    pub timeouts: u32,
    /// Orphan falling edges and implausibly long echoes.
    pub anomalies: u32,
    pub trigger_failures: u32,
}

//==================================================================================RANGE_CYCLE
/// State of the live ranging cycle. At most one exists at a time.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct RangeCycle {
    /// Tick of the last rising edge not yet matched by a falling edge.
    start_tick: Option<Tick>,
    /// Scheduler time of the trigger that opened the cycle.
    triggered_at: Option<Instant>,
    /// When a rising edge no trigger opened was first noticed.
    stray_since: Option<Instant>,
}

impl RangeCycle {
    pub fn start_tick(&self) -> Option<Tick> {
        self.start_tick
    }

    pub fn triggered_at(&self) -> Option<Instant> {
        self.triggered_at
    }

    /// Whether the echo in flight was opened by a rising edge alone.
    pub fn is_stray(&self) -> bool {
        self.triggered_at.is_none() && self.start_tick.is_some()
    }

    /// Instant the cycle's timeout runs from.
    fn opened_at(&self) -> Option<Instant> {
        self.triggered_at.or(self.stray_since)
    }

    /// A cycle is in flight from its trigger or rising edge until completion
    /// or timeout.
    pub fn in_flight(&self, now: Instant) -> bool {
        match self.opened_at() {
            Some(at) => now.saturating_duration_since(at) < ECHO_TIMEOUT,
            None => self.start_tick.is_some(),
        }
    }

    /// Start the timeout of a stray rising edge at `now`.
    fn anchor_stray(&mut self, now: Instant) {
        if self.is_stray() && self.stray_since.is_none() {
            self.stray_since = Some(now);
        }
    }

    fn begin(&mut self, now: Instant) {
        *self = Self {
            triggered_at: Some(now),
            ..Self::default()
        };
    }

    /// Drop a cycle that outlived [`ECHO_TIMEOUT`]. Returns whether one was dropped.
    fn expire(&mut self, now: Instant) -> bool {
        match self.opened_at() {
            Some(at) if now.saturating_duration_since(at) >= ECHO_TIMEOUT => {
                *self = Self::default();
                true
            }
            _ => false,
        }
    }

    /// Close the cycle on a falling edge. Without a stored rising edge
    /// nothing changes.
    fn complete(&mut self) -> Option<Tick> {
        let start = self.start_tick.take()?;
        self.triggered_at = None;
        self.stray_since = None;
        Some(start)
    }
}

//==================================================================================RANGE_MEASURER
/// Drives the trigger line and turns echo edges into [`RangeMeasurement`]s.
pub struct RangeMeasurer<P, D> {
    trigger: P,
    delay: D,
    echo_pin: u32,
    cycle: RangeCycle,
    stats: RangeStats,
}

impl<P, D> RangeMeasurer<P, D>
where
    P: TriggerPin,
    D: DelayNs,
{
    /// `echo_pin` is the line offset whose edges belong to this sensor.
    pub fn new(trigger: P, delay: D, echo_pin: u32) -> Self {
        Self {
            trigger,
            delay,
            echo_pin,
            cycle: RangeCycle::default(),
            stats: RangeStats::default(),
        }
    }

    /// Start a ranging cycle unless one is still in flight.
    ///
    /// On a pin failure no cycle is opened; a failed set-low may leave the
    /// line high until the next successful trigger.
    pub async fn trigger(
        &mut self,
        now: Instant,
    ) -> Result<TriggerOutcome, TriggerError<P::Error>> {
        self.expire(now);
        if self.cycle.in_flight(now) {
            self.stats.skipped_triggers = self.stats.skipped_triggers.wrapping_add(1);
            trace!("trigger skipped, cycle in flight");
            return Ok(TriggerOutcome::Skipped);
        }

        if let Err(err) = self.pulse().await {
            self.stats.trigger_failures = self.stats.trigger_failures.wrapping_add(1);
            self.cycle = RangeCycle::default();
            return Err(err);
        }

        self.cycle.begin(now);
        Ok(TriggerOutcome::Fired)
    }

    async fn pulse(&mut self) -> Result<(), TriggerError<P::Error>> {
        self.trigger.set_high().await.map_err(TriggerError::SetHigh)?;
        self.delay.delay_us(TRIGGER_PULSE_US);
        self.trigger.set_low().await.map_err(TriggerError::SetLow)
    }

    /// Feed one edge of a monitored line. Edges of other lines are ignored.
    pub fn on_edge(&mut self, event: EdgeEvent) -> Option<RangeMeasurement> {
        if event.pin != self.echo_pin {
            return None;
        }

        match event.level {
            EdgeLevel::Rising => {
                self.cycle.start_tick = Some(event.tick);
                None
            }
            EdgeLevel::Falling => {
                let Some(start) = self.cycle.complete() else {
                    self.stats.anomalies = self.stats.anomalies.wrapping_add(1);
                    debug!("falling edge at {} without rising edge", event.tick.as_micros());
                    return None;
                };

                let elapsed = event.tick.elapsed_since(start);
                if elapsed > MAX_ECHO_PULSE_US {
                    self.stats.anomalies = self.stats.anomalies.wrapping_add(1);
                    debug!("echo of {} us exceeds the sensor range", elapsed);
                    return None;
                }

                self.stats.measurements = self.stats.measurements.wrapping_add(1);
                Some(RangeMeasurement::from_elapsed(elapsed))
            }
        }
    }

    /// Abandon the live cycle if it has timed out. Returns whether it did.
    ///
    /// A stray rising edge starts its timeout on the first call that sees it
    /// and counts as an anomaly when it expires.
    pub fn expire(&mut self, now: Instant) -> bool {
        self.cycle.anchor_stray(now);
        let stray = self.cycle.is_stray();
        if !self.cycle.expire(now) {
            return false;
        }

        if stray {
            self.stats.anomalies = self.stats.anomalies.wrapping_add(1);
            debug!("rising edge without trigger never fell, discarded");
        } else {
            self.stats.timeouts = self.stats.timeouts.wrapping_add(1);
            debug!("echo timeout, cycle abandoned");
        }
        true
    }

    /// Deadline of the live cycle's timeout, if one is in flight.
    pub fn cycle_deadline(&self) -> Option<Instant> {
        self.cycle.opened_at().map(|at| at + ECHO_TIMEOUT)
    }

    pub fn cycle(&self) -> &RangeCycle {
        &self.cycle
    }

    pub fn trigger_pin(&self) -> &P {
        &self.trigger
    }

    pub fn echo_pin(&self) -> u32 {
        self.echo_pin
    }

    pub fn stats(&self) -> RangeStats {
        self.stats
    }
}
