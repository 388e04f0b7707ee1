//! Transfer model: one logical Cyphal message before segmentation, plus the
//! per-frame tail byte and the multi-frame transfer CRC.
//!
//! The CRC parameters are the ones the Cyphal/CAN transport fixes for
//! multi-frame transfers: CRC-16/CCITT-FALSE, polynomial 0x1021, initial value
//! 0xFFFF, no reflection, no final XOR.
use crate::core::{Priority, SubjectId, TransferId, TransferKind};
use crate::error::TransferError;
use crate::protocol::transport::MAX_TRANSFER_PAYLOAD;

pub mod builder;

//==================================================================================TRANSFER
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
/// Immutable message transfer. Ownership moves into the TX queue on enqueue.
pub struct Transfer {
    priority: Priority,
    kind: TransferKind,
    subject: SubjectId,
    transfer_id: TransferId,
    payload: [u8; MAX_TRANSFER_PAYLOAD],
    len: usize,
}

impl Transfer {
    /// Build a message transfer from an arbitrary payload slice.
    pub fn message(
        priority: Priority,
        subject: SubjectId,
        transfer_id: TransferId,
        payload: &[u8],
    ) -> Result<Self, TransferError> {
        if payload.len() > MAX_TRANSFER_PAYLOAD {
            return Err(TransferError::PayloadTooLarge {
                len: payload.len(),
                max: MAX_TRANSFER_PAYLOAD,
            });
        }
        let mut buffer = [0u8; MAX_TRANSFER_PAYLOAD];
        buffer[..payload.len()].copy_from_slice(payload);
        Ok(Self {
            priority,
            kind: TransferKind::Message,
            subject,
            transfer_id,
            payload: buffer,
            len: payload.len(),
        })
    }

    /// Build a message transfer from a fixed-size payload; the size is checked at compile time.
    pub fn from_array<const N: usize>(
        priority: Priority,
        subject: SubjectId,
        transfer_id: TransferId,
        payload: [u8; N],
    ) -> Self {
        const { assert!(N <= MAX_TRANSFER_PAYLOAD) };
        let mut buffer = [0u8; MAX_TRANSFER_PAYLOAD];
        buffer[..N].copy_from_slice(&payload);
        Self {
            priority,
            kind: TransferKind::Message,
            subject,
            transfer_id,
            payload: buffer,
            len: N,
        }
    }

    pub fn priority(&self) -> Priority {
        self.priority
    }

    pub fn kind(&self) -> TransferKind {
        self.kind
    }

    pub fn subject(&self) -> SubjectId {
        self.subject
    }

    pub fn transfer_id(&self) -> TransferId {
        self.transfer_id
    }

    /// Serialized message bytes.
    pub fn payload(&self) -> &[u8] {
        &self.payload[..self.len]
    }
}

//==================================================================================TAIL_BYTE
/// Toggle bit value of the first frame of every transfer.
pub const SOT_TOGGLE_BIT: bool = true;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
/// Last data byte of every Cyphal/CAN frame.
pub struct TailByte(u8);

impl TailByte {
    const START_OF_TRANSFER: u8 = 7;
    const END_OF_TRANSFER: u8 = 6;
    const TOGGLE_BIT: u8 = 5;
    const TRANSFER_ID_MASK: u8 = 0x1F;

    pub fn new(sot: bool, eot: bool, toggle: bool, transfer_id: TransferId) -> Self {
        Self(
            (sot as u8) << Self::START_OF_TRANSFER
                | (eot as u8) << Self::END_OF_TRANSFER
                | (toggle as u8) << Self::TOGGLE_BIT
                | (transfer_id.get() & Self::TRANSFER_ID_MASK),
        )
    }

    pub fn sot(&self) -> bool {
        (self.0 >> Self::START_OF_TRANSFER) & 0x1 != 0
    }

    pub fn eot(&self) -> bool {
        (self.0 >> Self::END_OF_TRANSFER) & 0x1 != 0
    }

    pub fn toggle(&self) -> bool {
        (self.0 >> Self::TOGGLE_BIT) & 0x1 != 0
    }

    pub fn transfer_id(&self) -> TransferId {
        TransferId::from_truncating(self.0 & Self::TRANSFER_ID_MASK)
    }
}

impl From<TailByte> for u8 {
    fn from(value: TailByte) -> Self {
        value.0
    }
}

impl From<u8> for TailByte {
    fn from(value: u8) -> Self {
        Self(value)
    }
}

//==================================================================================TRANSFER_CRC
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Running CRC over a multi-frame payload, sent big-endian after the last
/// payload byte. Check value for `"123456789"` is `0x29B1`.
pub struct TransferCrc(u16);

impl Default for TransferCrc {
    fn default() -> Self {
        Self(Self::INIT_VALUE)
    }
}

impl TransferCrc {
    /// Bytes occupied by the CRC at the end of a multi-frame transfer.
    pub const LENGTH: usize = 2;
    const INIT_VALUE: u16 = 0xFFFF;
    const POLYNOMIAL: u16 = 0x1021;

    /// Feed one byte, MSB first.
    pub fn add(&mut self, byte: u8) {
        let mut crc = self.0 ^ (u16::from(byte) << 8);
        for _ in 0..8 {
            let carry = crc & 0x8000 != 0;
            crc <<= 1;
            if carry {
                crc ^= Self::POLYNOMIAL;
            }
        }
        self.0 = crc;
    }

    pub fn add_bytes(&mut self, bytes: &[u8]) {
        for &byte in bytes {
            self.add(byte);
        }
    }

    pub fn get(&self) -> u16 {
        self.0
    }
}
