//! Outbound frame queue: segments transfers into frames, keeps them in FIFO
//! order, and drains them onto a [`CanBus`] without blocking.
//!
//! Frames of one subject leave the queue in transfer-ID order because the queue
//! is a single FIFO; nothing is promised across subjects.
use heapless::Deque;

use crate::core::NodeId;
use crate::error::{EnqueueError, TransmitError};
use crate::protocol::transport::can_frame::CanFrame;
use crate::protocol::transport::traits::can_bus::CanBus;
use crate::protocol::transport::transfer::builder::TransferFrameBuilder;
use crate::protocol::transport::transfer::Transfer;

/// What to do with the head frame when the bus refuses it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TxFailurePolicy {
    /// Keep the frame at the head and stop draining until the next iteration.
    /// Nothing is ever lost, but a dead bus lets the queue fill up.
    #[default]
    RetryNextTick,
    /// Discard the frame, count it, and keep draining.
    DropAndCount,
}

/// Running totals kept by the queue.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TxStats {
    /// Frames accepted by the bus.
    pub transmitted: u32,
    /// Failed write attempts.
    pub transmit_errors: u32,
    /// Frames discarded under [`TxFailurePolicy::DropAndCount`].
    pub dropped_frames: u32,
    /// Transfers refused at enqueue time.
    pub rejected_transfers: u32,
}

/// Outcome of one [`TxQueue::drain_and_transmit`] pass.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DrainReport {
    pub transmitted: usize,
    pub failed: usize,
    pub dropped: usize,
    /// Frames still queued after the pass.
    pub remaining: usize,
}

/// Bounded FIFO of outbound frames for one local node.
pub struct TxQueue<const CAP: usize> {
    source: NodeId,
    policy: TxFailurePolicy,
    frames: Deque<CanFrame, CAP>,
    stats: TxStats,
}

impl<const CAP: usize> TxQueue<CAP> {
    pub fn new(source: NodeId, policy: TxFailurePolicy) -> Self {
        Self {
            source,
            policy,
            frames: Deque::new(),
            stats: TxStats::default(),
        }
    }

    /// Segment `transfer` and append every frame, or none of them.
    ///
    /// Returns the number of frames queued.
    pub fn enqueue(&mut self, transfer: Transfer) -> Result<usize, EnqueueError> {
        let builder = TransferFrameBuilder::new(&transfer, self.source);
        let needed = builder.frame_count();
        let available = CAP - self.frames.len();
        if needed > available {
            self.stats.rejected_transfers = self.stats.rejected_transfers.wrapping_add(1);
            return Err(EnqueueError::QueueFull { needed, available });
        }

        for frame in builder.build() {
            // Capacity was checked above; a refusal here would mean a miscount.
            if self.frames.push_back(frame).is_err() {
                self.stats.rejected_transfers = self.stats.rejected_transfers.wrapping_add(1);
                return Err(EnqueueError::QueueFull { needed, available });
            }
        }

        trace!(
            "queued subject {} tid {} as {} frame(s)",
            transfer.subject().get(),
            transfer.transfer_id().get(),
            needed
        );
        Ok(needed)
    }

    /// Attempt to send the head frame once.
    ///
    /// Returns `Ok(true)` when a frame left the queue, `Ok(false)` when the queue
    /// is empty. On failure the frame stays at the head.
    pub fn transmit_head<B: CanBus>(
        &mut self,
        bus: &mut B,
    ) -> Result<bool, TransmitError<B::Error>> {
        let Some(frame) = self.frames.front() else {
            return Ok(false);
        };
        match bus.try_send(frame) {
            Ok(()) => {
                self.frames.pop_front();
                self.stats.transmitted = self.stats.transmitted.wrapping_add(1);
                Ok(true)
            }
            Err(err) => {
                self.stats.transmit_errors = self.stats.transmit_errors.wrapping_add(1);
                Err(TransmitError::Send(err))
            }
        }
    }

    /// Push queued frames onto the bus until the queue is empty or, under
    /// [`TxFailurePolicy::RetryNextTick`], a write fails.
    pub fn drain_and_transmit<B: CanBus>(&mut self, bus: &mut B) -> DrainReport {
        let mut report = DrainReport::default();

        loop {
            match self.transmit_head(bus) {
                Ok(true) => report.transmitted += 1,
                Ok(false) => break,
                Err(_) => {
                    report.failed += 1;
                    match self.policy {
                        TxFailurePolicy::RetryNextTick => {
                            warn!(
                                "CAN write failed ({} total), {} frame(s) kept for retry",
                                self.stats.transmit_errors,
                                self.frames.len()
                            );
                            break;
                        }
                        TxFailurePolicy::DropAndCount => {
                            self.frames.pop_front();
                            self.stats.dropped_frames = self.stats.dropped_frames.wrapping_add(1);
                            report.dropped += 1;
                            warn!(
                                "CAN write failed ({} total), frame dropped ({} dropped)",
                                self.stats.transmit_errors,
                                self.stats.dropped_frames
                            );
                        }
                    }
                }
            }
        }

        report.remaining = self.frames.len();
        report
    }

    /// Head frame, next in line for transmission.
    pub fn peek(&self) -> Option<&CanFrame> {
        self.frames.front()
    }

    /// Remove and release the head frame.
    pub fn pop(&mut self) -> Option<CanFrame> {
        self.frames.pop_front()
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn capacity(&self) -> usize {
        CAP
    }

    pub fn policy(&self) -> TxFailurePolicy {
        self.policy
    }

    pub fn stats(&self) -> TxStats {
        self.stats
    }
}

#[cfg(test)]
#[path = "tests.rs"]
mod tests;
