//! Unit tests for the outbound frame queue.
use super::*;
use crate::core::{Priority, SubjectId, TransferId};
use heapless::Vec;

/// Bus double recording frames; fails while `failures` is non-zero.
#[derive(Default)]
struct RecordingBus {
    sent: Vec<CanFrame, 32>,
    failures: usize,
}

impl CanBus for RecordingBus {
    type Error = ();

    fn try_send(&mut self, frame: &CanFrame) -> Result<(), Self::Error> {
        if self.failures > 0 {
            self.failures -= 1;
            return Err(());
        }
        self.sent.push(frame.clone()).map_err(|_| ())
    }
}

fn transfer(subject: u16, transfer_id: u8, len: usize) -> Transfer {
    let payload = [transfer_id; 64];
    Transfer::message(
        Priority::Nominal,
        SubjectId::new(subject).unwrap(),
        TransferId::from_truncating(transfer_id),
        &payload[..len],
    )
    .unwrap()
}

fn queue<const CAP: usize>(policy: TxFailurePolicy) -> TxQueue<CAP> {
    TxQueue::new(NodeId::new(42).unwrap(), policy)
}

#[test]
/// Frames leave in the order they were queued.
fn test_fifo_order_per_subject() {
    let mut queue = queue::<8>(TxFailurePolicy::RetryNextTick);
    for tid in 0..4 {
        queue.enqueue(transfer(1610, tid, 4)).unwrap();
    }
    assert_eq!(queue.len(), 4);

    let mut bus = RecordingBus::default();
    let report = queue.drain_and_transmit(&mut bus);

    assert_eq!(report.transmitted, 4);
    assert_eq!(report.remaining, 0);
    let tids: Vec<u8, 8> = bus
        .sent
        .iter()
        .map(|frame| frame.tail().unwrap().transfer_id().get())
        .collect();
    assert_eq!(&tids[..], &[0, 1, 2, 3]);
    assert!(queue.is_empty());
}

#[test]
/// A multi-frame transfer is admitted whole or not at all.
fn test_enqueue_is_all_or_nothing() {
    let mut queue = queue::<3>(TxFailurePolicy::RetryNextTick);
    queue.enqueue(transfer(1610, 0, 4)).unwrap();
    queue.enqueue(transfer(1610, 1, 4)).unwrap();

    // 10 bytes need two frames, only one slot left
    let err = queue.enqueue(transfer(1610, 2, 10)).unwrap_err();
    assert_eq!(
        err,
        EnqueueError::QueueFull {
            needed: 2,
            available: 1
        }
    );
    assert_eq!(queue.len(), 2);
    assert_eq!(queue.stats().rejected_transfers, 1);

    // A single-frame transfer still fits
    assert_eq!(queue.enqueue(transfer(1610, 3, 4)), Ok(1));
    assert_eq!(queue.len(), 3);
}

#[test]
/// Default policy: a failed write keeps the frame and stops the pass.
fn test_retry_next_tick_keeps_frame() {
    let mut queue = queue::<4>(TxFailurePolicy::RetryNextTick);
    queue.enqueue(transfer(32085, 0, 7)).unwrap();
    queue.enqueue(transfer(1610, 0, 4)).unwrap();

    let mut bus = RecordingBus {
        failures: 1,
        ..Default::default()
    };
    let report = queue.drain_and_transmit(&mut bus);
    assert_eq!(report.transmitted, 0);
    assert_eq!(report.failed, 1);
    assert_eq!(report.remaining, 2);
    assert_eq!(queue.peek().unwrap().id.subject_id().get(), 32085);

    // Next iteration: the bus recovers and both frames go out in order
    let report = queue.drain_and_transmit(&mut bus);
    assert_eq!(report.transmitted, 2);
    assert_eq!(bus.sent[0].id.subject_id().get(), 32085);
    assert_eq!(bus.sent[1].id.subject_id().get(), 1610);

    let stats = queue.stats();
    assert_eq!(stats.transmitted, 2);
    assert_eq!(stats.transmit_errors, 1);
    assert_eq!(stats.dropped_frames, 0);
}

#[test]
/// Drop policy: the failing frame is discarded and draining continues.
fn test_drop_and_count_discards_failed_frame() {
    let mut queue = queue::<4>(TxFailurePolicy::DropAndCount);
    queue.enqueue(transfer(1610, 0, 4)).unwrap();
    queue.enqueue(transfer(1610, 1, 4)).unwrap();

    let mut bus = RecordingBus {
        failures: 1,
        ..Default::default()
    };
    let report = queue.drain_and_transmit(&mut bus);

    assert_eq!(report.transmitted, 1);
    assert_eq!(report.dropped, 1);
    assert_eq!(report.remaining, 0);
    assert_eq!(bus.sent.len(), 1);
    assert_eq!(bus.sent[0].tail().unwrap().transfer_id().get(), 1);
    assert_eq!(queue.stats().dropped_frames, 1);
}

#[test]
/// Manual peek/pop mirror the drain loop one step at a time.
fn test_transmit_head_and_pop() {
    let mut queue = queue::<2>(TxFailurePolicy::RetryNextTick);
    let mut bus = RecordingBus::default();
    assert_eq!(queue.transmit_head(&mut bus).unwrap(), false);

    queue.enqueue(transfer(1610, 5, 4)).unwrap();
    queue.enqueue(transfer(1610, 6, 4)).unwrap();
    assert!(queue.transmit_head(&mut bus).unwrap());
    assert_eq!(queue.len(), 1);

    let released = queue.pop().unwrap();
    assert_eq!(released.tail().unwrap().transfer_id().get(), 6);
    assert!(queue.peek().is_none());
}
