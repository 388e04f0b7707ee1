//! Tests for the transfer frame generator (`FrameIterator`).
use super::*;
use crate::core::{Priority, SubjectId};
use crate::protocol::transport::MAX_TRANSFER_PAYLOAD;

fn transfer(payload: &[u8], transfer_id: u8) -> Transfer {
    Transfer::message(
        Priority::Nominal,
        SubjectId::new(1610).unwrap(),
        TransferId::from_truncating(transfer_id),
        payload,
    )
    .unwrap()
}

fn node() -> NodeId {
    NodeId::new(42).unwrap()
}

#[test]
/// Seven bytes fit a single frame: payload then tail byte, no CRC.
fn test_builder_single_frame() {
    let payload = [1, 2, 3, 4, 5, 6, 7];
    let transfer = transfer(&payload, 3);
    let mut iter = TransferFrameBuilder::new(&transfer, node()).build();

    let frame = iter.next().unwrap();
    assert_eq!(frame.len, 8);
    assert_eq!(&frame.data[..7], &payload);
    assert_eq!(frame.data[7], 0xE3);
    assert_eq!(frame.id.subject_id().get(), 1610);
    assert_eq!(frame.id.source().get(), 42);

    // Should be the only frame
    assert!(iter.next().is_none());
}

#[test]
/// An empty transfer still produces one frame holding only the tail byte.
fn test_builder_empty_payload() {
    let transfer = transfer(&[], 0);
    let frames: heapless::Vec<CanFrame, 2> = TransferFrameBuilder::new(&transfer, node())
        .build()
        .collect();
    assert_eq!(frames.len(), 1);
    assert_eq!(frames[0].len, 1);
    assert_eq!(frames[0].data[0], 0xE0);
}

#[test]
/// Ten-byte payload split across two frames (7 + 3 bytes, then the CRC).
fn test_builder_two_frames() {
    let payload = [1, 2, 3, 4, 5, 6, 7, 8, 9, 10];
    let transfer = transfer(&payload, 7);
    let mut iter = TransferFrameBuilder::new(&transfer, node()).build();

    let mut crc = TransferCrc::default();
    crc.add_bytes(&payload);
    let crc = crc.get().to_be_bytes();

    // Frame 0: SOT, toggle set
    let frame0 = iter.next().unwrap();
    assert_eq!(&frame0.data[..7], &[1, 2, 3, 4, 5, 6, 7]);
    assert_eq!(frame0.data[7], 0xA7);
    assert_eq!(frame0.len, 8);

    // Frame 1: EOT, toggle cleared, CRC after the last payload bytes
    let frame1 = iter.next().unwrap();
    assert_eq!(&frame1.data[..3], &[8, 9, 10]);
    assert_eq!(&frame1.data[3..5], &crc);
    assert_eq!(frame1.data[5], 0x47);
    assert_eq!(frame1.len, 6);

    assert!(iter.next().is_none());
}

#[test]
/// CRC may spill over into a frame of its own.
fn test_builder_crc_only_last_frame() {
    // 14 bytes + 2 CRC = 16 → 7 + 7 + 2
    let payload = [0x55; 14];
    let transfer = transfer(&payload, 1);
    let builder = TransferFrameBuilder::new(&transfer, node());
    assert_eq!(builder.frame_count(), 3);

    let frames: heapless::Vec<CanFrame, 4> = builder.build().collect();
    assert_eq!(frames.len(), 3);
    assert_eq!(frames[2].len, 3);
    let tail = frames[2].tail().unwrap();
    assert!(tail.eot());
    assert!(tail.toggle());
}

#[test]
/// Maximum payload: toggle alternates and the stream CRC validates.
fn test_builder_max_payload() {
    let payload = [0xAA; MAX_TRANSFER_PAYLOAD];
    let transfer = transfer(&payload, 31);
    let builder = TransferFrameBuilder::new(&transfer, node());
    let expected = builder.frame_count();

    let mut crc = TransferCrc::default();
    let mut count = 0;
    let mut toggle = SOT_TOGGLE_BIT;
    for frame in builder.build() {
        let tail = frame.tail().unwrap();
        assert_eq!(tail.toggle(), toggle);
        assert_eq!(tail.sot(), count == 0);
        assert_eq!(tail.transfer_id().get(), 31);
        crc.add_bytes(frame.transfer_bytes());
        toggle = !toggle;
        count += 1;
    }

    // 64 + 2 = 66 → 10 frames
    assert_eq!(count, 10);
    assert_eq!(count, expected);
    assert_eq!(crc.get(), 0, "payload + CRC must leave a zero residue");
}

#[test]
/// Frame count helper agrees with the boundary cases.
fn test_frame_count_boundaries() {
    assert_eq!(frame_count(0), 1);
    assert_eq!(frame_count(7), 1);
    assert_eq!(frame_count(8), 2);
    assert_eq!(frame_count(12), 2);
    assert_eq!(frame_count(13), 3);
}
