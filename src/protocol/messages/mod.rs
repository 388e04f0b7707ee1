//! Messages published by the node and the encoder that turns them into
//! sequenced transfers.
//!
//! | Subject            | ID    | Payload                                   |
//! |--------------------|-------|-------------------------------------------|
//! | Heartbeat          | 32085 | uptime (u32 LE) + health/mode/vendor (3 B) |
//! | UltrasoundDistance | 1610  | distance in cm (f32 LE)                   |
//!
//! Subject 1610 lives in the unregulated range: receivers learn its meaning by
//! out-of-band agreement, not through the protocol.
use crate::core::SubjectId;
use crate::error::{DeserializationError, SerializationError};

pub mod encoder;
pub mod heartbeat;
pub mod ultrasound_distance;

pub use encoder::TransferEncoder;
pub use heartbeat::{Health, Heartbeat, Mode};
pub use ultrasound_distance::UltrasoundDistance;

/// Fixed subject of the node heartbeat.
pub const HEARTBEAT_SUBJECT_ID: SubjectId = match SubjectId::new(32085) {
    Ok(id) => id,
    Err(_) => panic!("heartbeat subject out of range"),
};

/// Application-defined subject carrying range readings.
pub const ULTRASOUND_DISTANCE_SUBJECT_ID: SubjectId = match SubjectId::new(1610) {
    Ok(id) => id,
    Err(_) => panic!("distance subject out of range"),
};

//==================================================================================MESSAGE_DATA
/// Implemented by every published message struct.
/// Bridges the typed value and its wire payload.
pub trait MessageData: Sized {
    /// Subject the message is published on.
    const SUBJECT_ID: SubjectId;
    /// Exact serialized size in bytes.
    const SIZE: usize;

    /// Serialize the instance into the provided buffer, returning the bytes written.
    fn to_payload(&self, buffer: &mut [u8]) -> Result<usize, SerializationError>;

    /// Deserialize a payload into an instance of the struct.
    fn from_payload(payload: &[u8]) -> Result<Self, DeserializationError>;
}

/// Shared length check for `to_payload` implementations.
fn check_buffer(needed: usize, buffer: &[u8]) -> Result<(), SerializationError> {
    if buffer.len() < needed {
        return Err(SerializationError::BufferTooSmall {
            needed,
            available: buffer.len(),
        });
    }
    Ok(())
}

/// Shared length check for `from_payload` implementations.
fn check_payload(expected: usize, payload: &[u8]) -> Result<(), DeserializationError> {
    if payload.len() < expected {
        return Err(DeserializationError::InvalidDataLength {
            expected,
            actual: payload.len(),
        });
    }
    Ok(())
}
