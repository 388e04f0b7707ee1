//! Unit tests for the transfer encoder and its per-subject counters.
use super::*;
use crate::core::TransferKind;

#[test]
/// Heartbeat transfer: subject 32085, nominal priority, uptime then zeros.
fn test_encode_heartbeat() {
    let encoder = TransferEncoder::new();
    let transfer = encoder.encode_heartbeat(0x0000_0102);

    assert_eq!(transfer.subject().get(), 32085);
    assert_eq!(transfer.priority(), Priority::Nominal);
    assert_eq!(transfer.kind(), TransferKind::Message);
    assert_eq!(transfer.transfer_id().get(), 0);
    assert_eq!(transfer.payload(), &[0x02, 0x01, 0, 0, 0, 0, 0]);
}

#[test]
/// Distance transfer: subject 1610 carrying the reading bit-exactly.
fn test_encode_distance() {
    let encoder = TransferEncoder::new();
    let transfer = encoder.encode_distance(9.947);

    assert_eq!(transfer.subject().get(), 1610);
    assert_eq!(transfer.priority(), Priority::Nominal);
    assert_eq!(transfer.payload(), &9.947f32.to_le_bytes());
}

#[test]
/// Transfer IDs step by one and wrap from 31 back to 0.
fn test_transfer_id_wraps_mod_32() {
    let encoder = TransferEncoder::new();
    for expected in (0..32u8).chain(0..5) {
        assert_eq!(encoder.encode_distance(1.0).transfer_id().get(), expected);
    }
    assert_eq!(
        encoder.next_transfer_id(ULTRASOUND_DISTANCE_SUBJECT_ID),
        Some(TransferId::from_truncating(5))
    );
}

#[test]
/// Publishing on one subject leaves the other counter untouched.
fn test_counters_are_independent() {
    let encoder = TransferEncoder::new();
    for _ in 0..3 {
        encoder.encode_distance(12.5);
    }
    assert_eq!(encoder.encode_heartbeat(7).transfer_id().get(), 0);
    assert_eq!(encoder.encode_distance(12.5).transfer_id().get(), 3);
    assert_eq!(encoder.encode_heartbeat(8).transfer_id().get(), 1);

    assert_eq!(
        encoder.next_transfer_id(SubjectId::new(100).unwrap()),
        None
    );
}
