//! The ranging node: measurer, encoder, outbound queue, and scheduler under a
//! single owner.
//!
//! [`Node::step`] is one iteration of the cooperative loop. It is synchronous
//! apart from the trigger pin, which makes it easy to drive from tests with a
//! simulated clock. [`runner::NodeService`] wraps it into a task that waits for
//! edge events or the next deadline between iterations.
use embassy_time::{Duration, Instant};
use embedded_hal::delay::DelayNs;

use crate::core::EdgeEvent;
use crate::error::EnqueueError;
use crate::protocol::messages::TransferEncoder;
use crate::protocol::transport::traits::can_bus::CanBus;
use crate::protocol::transport::traits::trigger_pin::TriggerPin;
use crate::protocol::transport::transfer::Transfer;
use crate::protocol::transport::tx_queue::{DrainReport, TxQueue};
use crate::protocol::transport::TX_RETRY_INTERVAL_MS;
use crate::sensor::ultrasound::{RangeMeasurement, RangeMeasurer};

pub mod config;
pub mod runner;
pub mod scheduler;

pub use config::NodeConfig;
pub use runner::{EdgeChannel, EdgeSender, NodeRunner, NodeService};
pub use scheduler::Scheduler;

/// Default outbound queue depth, in frames.
pub const DEFAULT_TX_CAPACITY: usize = 16;

pub struct Node<B, P, D, const TX_CAP: usize = DEFAULT_TX_CAPACITY> {
    config: NodeConfig,
    bus: B,
    measurer: RangeMeasurer<P, D>,
    encoder: TransferEncoder,
    queue: TxQueue<TX_CAP>,
    scheduler: Scheduler,
}

impl<B, P, D, const TX_CAP: usize> Node<B, P, D, TX_CAP>
where
    B: CanBus,
    P: TriggerPin,
    D: DelayNs,
{
    /// Assemble a node. `boot` anchors the uptime and both deadlines.
    pub fn new(config: NodeConfig, bus: B, trigger: P, delay: D, boot: Instant) -> Self {
        info!(
            "node {} up: trigger every {} ms, heartbeat every {} ms",
            config.node_id.get(),
            config.trigger_period.as_millis(),
            config.heartbeat_period.as_millis()
        );
        Self {
            config,
            bus,
            measurer: RangeMeasurer::new(trigger, delay, config.echo_pin),
            encoder: TransferEncoder::new(),
            queue: TxQueue::new(config.node_id, config.tx_policy),
            scheduler: Scheduler::new(boot, config.trigger_period, config.heartbeat_period),
        }
    }

    /// Feed one edge event; a completed echo is published right away.
    pub fn handle_edge(&mut self, event: EdgeEvent) -> Option<RangeMeasurement> {
        let measurement = self.measurer.on_edge(event)?;
        trace!("range {} us", measurement.elapsed_us);
        let transfer = self.encoder.encode_distance(measurement.distance_cm);
        self.publish(transfer);
        Some(measurement)
    }

    /// One loop iteration after pending edges were handled: expire a stale
    /// cycle, trigger if due, publish a heartbeat if due, then drain the queue.
    pub async fn step(&mut self, now: Instant) -> DrainReport {
        self.measurer.expire(now);

        if self.scheduler.trigger_due(now) && self.measurer.trigger(now).await.is_err() {
            warn!(
                "trigger pin write failed, cycle abandoned ({} total)",
                self.measurer.stats().trigger_failures
            );
        }

        if let Some(uptime) = self.scheduler.heartbeat_due(now) {
            let transfer = self.encoder.encode_heartbeat(uptime);
            self.publish(transfer);
        }

        self.queue.drain_and_transmit(&mut self.bus)
    }

    fn publish(&mut self, transfer: Transfer) {
        let subject = transfer.subject().get();
        let transfer_id = transfer.transfer_id().get();
        if let Err(err) = self.queue.enqueue(transfer) {
            let EnqueueError::QueueFull { needed, available } = err;
            warn!(
                "subject {} tid {} dropped: queue full ({} frames needed, {} free)",
                subject,
                transfer_id,
                needed,
                available
            );
        }
    }

    /// When the loop should run again if no edge arrives first.
    ///
    /// Frames left in the queue after a failed write bring the wake-up forward
    /// to the retry interval.
    pub fn next_wake(&self, now: Instant) -> Instant {
        let mut wake = self.scheduler.next_deadline();
        if let Some(deadline) = self.measurer.cycle_deadline() {
            wake = wake.min(deadline);
        }
        if !self.queue.is_empty() {
            wake = wake.min(now + Duration::from_millis(TX_RETRY_INTERVAL_MS));
        }
        wake
    }

    pub fn config(&self) -> &NodeConfig {
        &self.config
    }

    pub fn bus(&self) -> &B {
        &self.bus
    }

    pub fn bus_mut(&mut self) -> &mut B {
        &mut self.bus
    }

    pub fn measurer(&self) -> &RangeMeasurer<P, D> {
        &self.measurer
    }

    pub fn encoder(&self) -> &TransferEncoder {
        &self.encoder
    }

    pub fn queue(&self) -> &TxQueue<TX_CAP> {
        &self.queue
    }

    pub fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }
}
