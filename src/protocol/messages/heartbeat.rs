//! `uavcan.node.Heartbeat` (alpha layout), published once per second on subject 32085.
//!
//! Wire layout, little-endian bit order:
//!
//! | Bits   | Field                       |
//! |--------|-----------------------------|
//! | 0..32  | uptime in seconds           |
//! | 32..34 | health                      |
//! | 34..37 | mode                        |
//! | 37..56 | vendor-specific status code |
use super::{check_buffer, check_payload, MessageData, HEARTBEAT_SUBJECT_ID};
use crate::core::SubjectId;
use crate::error::{DeserializationError, SerializationError};

/// Node health as reported to the bus.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum Health {
    #[default]
    Nominal = 0,
    Advisory = 1,
    Caution = 2,
    Warning = 3,
}

impl Health {
    fn from_bits(bits: u8) -> Self {
        match bits & 0x03 {
            0 => Self::Nominal,
            1 => Self::Advisory,
            2 => Self::Caution,
            _ => Self::Warning,
        }
    }
}

/// Node operating mode.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum Mode {
    #[default]
    Operational = 0,
    Initialization = 1,
    Maintenance = 2,
    SoftwareUpdate = 3,
    Offline = 7,
}

impl Mode {
    fn from_bits(bits: u8) -> Option<Self> {
        match bits & 0x07 {
            0 => Some(Self::Operational),
            1 => Some(Self::Initialization),
            2 => Some(Self::Maintenance),
            3 => Some(Self::SoftwareUpdate),
            7 => Some(Self::Offline),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Heartbeat {
    /// Whole seconds since the node booted.
    pub uptime: u32,
    pub health: Health,
    pub mode: Mode,
    /// 19-bit field; higher bits are dropped on encode.
    pub vendor_specific_status_code: u32,
}

impl Heartbeat {
    pub const SIZE: usize = 7;
    const VENDOR_CODE_MASK: u32 = 0x7_FFFF;

    /// Heartbeat of a healthy, operational node.
    pub const fn nominal(uptime: u32) -> Self {
        Self {
            uptime,
            health: Health::Nominal,
            mode: Mode::Operational,
            vendor_specific_status_code: 0,
        }
    }

    pub fn to_bytes(&self) -> [u8; Self::SIZE] {
        let mut bytes = [0u8; Self::SIZE];
        bytes[..4].copy_from_slice(&self.uptime.to_le_bytes());

        let vendor = self.vendor_specific_status_code & Self::VENDOR_CODE_MASK;
        let packed = (self.health as u32) | (self.mode as u32) << 2 | vendor << 5;
        bytes[4..].copy_from_slice(&packed.to_le_bytes()[..3]);
        bytes
    }
}

impl MessageData for Heartbeat {
    const SUBJECT_ID: SubjectId = HEARTBEAT_SUBJECT_ID;
    const SIZE: usize = Heartbeat::SIZE;

    fn to_payload(&self, buffer: &mut [u8]) -> Result<usize, SerializationError> {
        check_buffer(Self::SIZE, buffer)?;
        buffer[..Self::SIZE].copy_from_slice(&self.to_bytes());
        Ok(Self::SIZE)
    }

    fn from_payload(payload: &[u8]) -> Result<Self, DeserializationError> {
        check_payload(Self::SIZE, payload)?;
        let uptime = u32::from_le_bytes([payload[0], payload[1], payload[2], payload[3]]);
        let packed = u32::from_le_bytes([payload[4], payload[5], payload[6], 0]);

        let mode = Mode::from_bits((packed >> 2) as u8)
            .ok_or(DeserializationError::MalformedData { field: "mode" })?;
        Ok(Self {
            uptime,
            health: Health::from_bits(packed as u8),
            mode,
            vendor_specific_status_code: packed >> 5,
        })
    }
}
