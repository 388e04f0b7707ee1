//! In-memory representation of a classic Cyphal/CAN frame.
use crate::protocol::transport::can_id::CanId;
use crate::protocol::transport::transfer::TailByte;
use crate::protocol::transport::CAN_CLASSIC_MTU;
use embedded_can::{Frame, Id};

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
/// Classic CAN data frame with an extended identifier.
pub struct CanFrame {
    /// Full 29-bit CAN identifier stored inside a `u32`.
    pub id: CanId,
    /// Payload buffer. Classic CAN frames provide at most eight bytes.
    pub data: [u8; CAN_CLASSIC_MTU],
    /// Number of valid payload bytes (Data Length Code, 0 to 8).
    pub len: usize,
}

impl CanFrame {
    /// Valid bytes of the frame, tail byte included.
    pub fn bytes(&self) -> &[u8] {
        &self.data[..self.len.min(CAN_CLASSIC_MTU)]
    }

    /// The Cyphal tail byte (last valid byte), if the frame is not empty.
    pub fn tail(&self) -> Option<TailByte> {
        self.bytes().last().copied().map(TailByte::from)
    }

    /// Transfer payload bytes carried by this frame (tail byte excluded).
    pub fn transfer_bytes(&self) -> &[u8] {
        let bytes = self.bytes();
        &bytes[..bytes.len().saturating_sub(1)]
    }
}

impl Frame for CanFrame {
    /// Only extended data frames are representable.
    fn new(id: impl Into<Id>, data: &[u8]) -> Option<Self> {
        let Id::Extended(extended) = id.into() else {
            return None;
        };
        if data.len() > CAN_CLASSIC_MTU {
            return None;
        }
        let mut buffer = [0u8; CAN_CLASSIC_MTU];
        buffer[..data.len()].copy_from_slice(data);
        Some(Self {
            id: CanId::from(extended),
            data: buffer,
            len: data.len(),
        })
    }

    fn new_remote(_id: impl Into<Id>, _dlc: usize) -> Option<Self> {
        None
    }

    fn is_extended(&self) -> bool {
        true
    }

    fn is_remote_frame(&self) -> bool {
        false
    }

    fn id(&self) -> Id {
        Id::Extended(self.id.to_extended_id())
    }

    fn dlc(&self) -> usize {
        self.len
    }

    fn data(&self) -> &[u8] {
        self.bytes()
    }
}
