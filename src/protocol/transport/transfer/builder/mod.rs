//! CAN frame generator for Cyphal/CAN transfers. Builds the single-frame or
//! multi-frame sequence of one transfer on demand.
//!
//! Multi-frame layout: the payload is followed by the big-endian transfer CRC,
//! the resulting byte stream is cut into seven-byte chunks, and each chunk gets
//! a tail byte whose toggle bit alternates starting from `1`.
use crate::core::{NodeId, TransferId};
use crate::protocol::transport::can_frame::CanFrame;
use crate::protocol::transport::can_id::CanId;
use crate::protocol::transport::transfer::{TailByte, Transfer, TransferCrc, SOT_TOGGLE_BIT};
use crate::protocol::transport::{CAN_CLASSIC_MTU, FRAME_PAYLOAD_CAPACITY};

/// Number of frames needed to carry a payload of `payload_len` bytes.
pub const fn frame_count(payload_len: usize) -> usize {
    if payload_len <= FRAME_PAYLOAD_CAPACITY {
        1
    } else {
        (payload_len + TransferCrc::LENGTH).div_ceil(FRAME_PAYLOAD_CAPACITY)
    }
}

#[derive(Debug)]
/// Shared parameters for all frames composing one transfer.
pub struct TransferFrameBuilder<'a> {
    transfer: &'a Transfer,
    source: NodeId,
}

impl<'a> TransferFrameBuilder<'a> {
    /// Prepare the segmentation of `transfer` as published by `source`.
    pub fn new(transfer: &'a Transfer, source: NodeId) -> Self {
        Self { transfer, source }
    }

    /// Frames the transfer will occupy once built.
    pub fn frame_count(&self) -> usize {
        frame_count(self.transfer.payload().len())
    }

    /// Start the iteration; each call to `next` yields the next frame.
    pub fn build(self) -> FrameIterator<'a> {
        let payload = self.transfer.payload();
        let multi_frame = payload.len() > FRAME_PAYLOAD_CAPACITY;
        let crc = if multi_frame {
            let mut crc = TransferCrc::default();
            crc.add_bytes(payload);
            crc.get().to_be_bytes()
        } else {
            [0; TransferCrc::LENGTH]
        };
        let stream_len = if multi_frame {
            payload.len() + TransferCrc::LENGTH
        } else {
            payload.len()
        };

        FrameIterator {
            id: CanId::builder(self.transfer.subject(), self.source)
                .with_priority(self.transfer.priority())
                .build(),
            transfer_id: self.transfer.transfer_id(),
            payload,
            crc,
            stream_len,
            offset: 0,
            toggle: SOT_TOGGLE_BIT,
            done: false,
        }
    }
}

/// Lazy iterator returning frames one by one as they are encoded.
pub struct FrameIterator<'a> {
    id: CanId,
    transfer_id: TransferId,
    payload: &'a [u8],
    crc: [u8; TransferCrc::LENGTH],
    stream_len: usize,
    offset: usize,
    toggle: bool,
    done: bool,
}

impl FrameIterator<'_> {
    /// Byte `index` of the payload-then-CRC stream.
    fn stream_byte(&self, index: usize) -> u8 {
        match self.payload.get(index) {
            Some(byte) => *byte,
            None => self.crc[index - self.payload.len()],
        }
    }
}

impl Iterator for FrameIterator<'_> {
    type Item = CanFrame;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        let start = self.offset;
        let end = (start + FRAME_PAYLOAD_CAPACITY).min(self.stream_len);
        let mut data = [0u8; CAN_CLASSIC_MTU];
        for (slot, index) in data.iter_mut().zip(start..end) {
            *slot = self.stream_byte(index);
        }

        let chunk_len = end - start;
        let sot = start == 0;
        let eot = end == self.stream_len;
        data[chunk_len] = TailByte::new(sot, eot, self.toggle, self.transfer_id).into();

        self.offset = end;
        self.toggle = !self.toggle;
        self.done = eot;

        Some(CanFrame {
            id: self.id,
            data,
            len: chunk_len + 1,
        })
    }
}

#[cfg(test)]
#[path = "tests.rs"]
mod tests;
