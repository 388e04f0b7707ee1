//! Creation and extraction of the 29-bit extended CAN identifiers used by
//! Cyphal/CAN message transfers.
//!
//! ```text
//!  28 26 25  24  23  22            8   7   6      0
//! ┌─────┬───┬───┬───┬───────────────┬───┬────────┐
//! │ prio│svc│ano│ r │  subject id   │ r │ source │
//! └─────┴───┴───┴───┴───────────────┴───┴────────┘
//! ```
//! `svc` is zero for messages, `ano` is zero for nodes with an identifier and
//! both reserved bits are transmitted as zero.
use crate::core::{NodeId, Priority, SubjectId};
use embedded_can::ExtendedId;

const CAN_ID_MASK: u32 = 0x1FFF_FFFF;
const PRIORITY_OFFSET: u32 = 26;
const SUBJECT_OFFSET: u32 = 8;
const SOURCE_OFFSET: u32 = 0;

const PRIORITY_MASK: u32 = 0x07;
const SUBJECT_MASK: u32 = SubjectId::MAX as u32;
const NODE_MASK: u32 = NodeId::MAX as u32;

const SERVICE_FLAG: u32 = 1 << 25;
const ANONYMOUS_FLAG: u32 = 1 << 24;
const RESERVED_23_FLAG: u32 = 1 << 23;
const RESERVED_7_FLAG: u32 = 1 << 7;

//==================================================================================CAN_ID
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
/// Encapsulates an extended CAN identifier (29 bits) and exposes accessors
/// for priority, subject, and source.
pub struct CanId(pub u32);

impl CanId {
    // Builder entry point
    /// Creates a pre-configured `CanIdBuilder` for a subject and source node.
    pub fn builder(subject: SubjectId, source: NodeId) -> CanIdBuilder {
        CanIdBuilder::new(subject, source)
    }

    /// Returns the priority (3 bits) encoded in the CAN ID.
    pub fn priority(&self) -> Priority {
        Priority::from_code_truncating((self.0 >> PRIORITY_OFFSET) as u8)
    }

    /// True for message transfers (service flag cleared, reserved bits clear).
    pub fn is_message(&self) -> bool {
        self.0 & (SERVICE_FLAG | RESERVED_23_FLAG | RESERVED_7_FLAG) == 0
    }

    /// True when the anonymous flag is set.
    pub fn is_anonymous(&self) -> bool {
        self.0 & ANONYMOUS_FLAG != 0
    }

    /// Extracts the 15-bit subject identifier.
    pub fn subject_id(&self) -> SubjectId {
        SubjectId::from_truncating(((self.0 >> SUBJECT_OFFSET) & SUBJECT_MASK) as u16)
    }

    /// Seven-bit source node identifier.
    pub fn source(&self) -> NodeId {
        NodeId::from_truncating(((self.0 >> SOURCE_OFFSET) & NODE_MASK) as u8)
    }

    /// Converts into the `embedded-can` identifier type used by bus drivers.
    pub fn to_extended_id(&self) -> ExtendedId {
        // Identifiers are masked to 29 bits on construction, so the fallback is unreachable.
        ExtendedId::new(self.0 & CAN_ID_MASK).unwrap_or(ExtendedId::ZERO)
    }
}

impl From<ExtendedId> for CanId {
    fn from(value: ExtendedId) -> Self {
        Self(value.as_raw())
    }
}

//==================================================================================CAN_ID_BUILDER
#[derive(Debug)]
/// Fluent builder for message identifiers.
pub struct CanIdBuilder {
    pub priority: Priority,
    pub subject: SubjectId,
    pub source: NodeId,
}

impl CanIdBuilder {
    /// Initializes the builder for a given subject and source node.
    pub fn new(subject: SubjectId, source: NodeId) -> Self {
        Self {
            priority: Priority::Nominal,
            subject,
            source,
        }
    }

    /// Sets the priority to use during construction.
    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    /// Packs the fields into the message identifier layout. Every field is a
    /// validated newtype, so construction cannot fail.
    pub fn build(self) -> CanId {
        let id = ((self.priority.code() as u32 & PRIORITY_MASK) << PRIORITY_OFFSET)
            | ((self.subject.get() as u32 & SUBJECT_MASK) << SUBJECT_OFFSET)
            | ((self.source.get() as u32 & NODE_MASK) << SOURCE_OFFSET);
        CanId(id & CAN_ID_MASK)
    }
}
//==================================================================================TESTS
#[cfg(test)]
#[path = "tests.rs"]
mod tests;
