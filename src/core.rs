//! Value types shared by the sensor, transport, and node layers.
//!
//! Every identifier is a validated newtype: once a [`SubjectId`] or [`NodeId`]
//! exists it is guaranteed to fit its Cyphal/CAN bit field, so the framing code
//! downstream never has to fail.
use crate::error::CanIdBuildError;

//==================================================================================TICK
/// Monotonic 32-bit microsecond timestamp delivered by the hardware edge service.
///
/// The counter wraps roughly every 71 minutes; durations must always be taken
/// with [`Tick::elapsed_since`], never with plain subtraction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Tick(pub u32);

impl Tick {
    /// Microseconds elapsed from `earlier` to `self`, wraparound-safe.
    pub const fn elapsed_since(self, earlier: Tick) -> u32 {
        self.0.wrapping_sub(earlier.0)
    }

    /// Truncate a wide microsecond count into the wrapping 32-bit tick domain.
    pub const fn from_micros_wrapping(micros: u64) -> Self {
        Self(micros as u32)
    }

    pub const fn as_micros(self) -> u32 {
        self.0
    }
}

//==================================================================================EDGE_EVENT
/// Logic level reached by the echo input after a transition.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum EdgeLevel {
    Rising,
    Falling,
}

/// One transition of a monitored GPIO line, as reported by the edge service.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct EdgeEvent {
    /// GPIO line offset that changed.
    pub pin: u32,
    pub level: EdgeLevel,
    /// Hardware timestamp of the transition.
    pub tick: Tick,
}

impl EdgeEvent {
    pub const fn new(pin: u32, level: EdgeLevel, tick: Tick) -> Self {
        Self { pin, level, tick }
    }

    pub const fn rising(pin: u32, tick: u32) -> Self {
        Self::new(pin, EdgeLevel::Rising, Tick(tick))
    }

    pub const fn falling(pin: u32, tick: u32) -> Self {
        Self::new(pin, EdgeLevel::Falling, Tick(tick))
    }
}

//==================================================================================PRIORITY
/// Cyphal transfer priority. Lower numeric value wins bus arbitration.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum Priority {
    Exceptional = 0,
    Immediate = 1,
    Fast = 2,
    High = 3,
    #[default]
    Nominal = 4,
    Low = 5,
    Slow = 6,
    Optional = 7,
}

impl Priority {
    /// Decode the 3-bit priority field, ignoring any higher bits.
    pub const fn from_code_truncating(code: u8) -> Self {
        match code & 0x07 {
            0 => Self::Exceptional,
            1 => Self::Immediate,
            2 => Self::Fast,
            3 => Self::High,
            4 => Self::Nominal,
            5 => Self::Low,
            6 => Self::Slow,
            _ => Self::Optional,
        }
    }

    pub const fn code(self) -> u8 {
        self as u8
    }
}

//==================================================================================SUBJECT_ID
/// Publish/subscribe channel identifier (15-bit field of the message CAN ID).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SubjectId(u16);

impl SubjectId {
    pub const MAX: u16 = 0x7FFF;

    pub const fn new(raw: u16) -> Result<Self, CanIdBuildError> {
        if raw > Self::MAX {
            Err(CanIdBuildError::InvalidSubjectId { subject_id: raw })
        } else {
            Ok(Self(raw))
        }
    }

    /// Keep only the low 15 bits; used when decoding received identifiers.
    pub const fn from_truncating(raw: u16) -> Self {
        Self(raw & Self::MAX)
    }

    pub const fn get(self) -> u16 {
        self.0
    }
}

//==================================================================================NODE_ID
/// Source node identifier (7-bit field of the CAN ID).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct NodeId(u8);

impl NodeId {
    pub const MAX: u8 = 0x7F;

    pub const fn new(raw: u8) -> Result<Self, CanIdBuildError> {
        if raw > Self::MAX {
            Err(CanIdBuildError::InvalidNodeId { node_id: raw })
        } else {
            Ok(Self(raw))
        }
    }

    pub const fn from_truncating(raw: u8) -> Self {
        Self(raw & Self::MAX)
    }

    pub const fn get(self) -> u8 {
        self.0
    }
}

//==================================================================================TRANSFER_ID
/// Per-subject sequence number carried in the 5 low bits of every tail byte.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TransferId(u8);

impl TransferId {
    /// Number of distinct transfer IDs before the sequence wraps.
    pub const MODULO: u8 = 32;

    pub const fn from_truncating(raw: u8) -> Self {
        Self(raw % Self::MODULO)
    }

    /// The transfer ID that follows `self` in the wrapping sequence.
    pub const fn next(self) -> Self {
        Self::from_truncating(self.0 + 1)
    }

    pub const fn get(self) -> u8 {
        self.0
    }
}

impl From<TransferId> for u8 {
    fn from(value: TransferId) -> Self {
        value.0
    }
}

//==================================================================================TRANSFER_KIND
/// Transfer category. Only broadcast messages are published by this node.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TransferKind {
    #[default]
    Message,
}
