//! Error definitions shared across library modules.
//! Each type models a specific failure scenario (identifier validation, payload
//! encoding, queue admission, bus transmission, trigger output).
//!
//! None of these errors is fatal to the node loop: the scheduler logs and counts
//! them, then moves on to the next iteration.
use thiserror_no_std::Error;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
/// Errors that can occur while validating the fields of a Cyphal/CAN identifier.
pub enum CanIdBuildError {
    /// Subject identifiers are limited to 15 bits.
    #[error("Invalid subject id {subject_id}: must be <= 32767")]
    InvalidSubjectId { subject_id: u16 },
    /// Node identifiers are limited to 7 bits.
    #[error("Invalid node id {node_id}: must be <= 127")]
    InvalidNodeId { node_id: u8 },
}

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
/// Failures while building a transfer.
pub enum TransferError {
    /// The payload does not fit the fixed transfer buffer.
    #[error("Payload too large: {len} bytes, max {max}")]
    PayloadTooLarge { len: usize, max: usize },
}

//================================================================================CODEC_ERROR

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
/// Issues encountered while serializing a message into a buffer.
pub enum SerializationError {
    /// Provided buffer is too small for the payload.
    #[error("Buffer too small -> needed: {needed}, available: {available}")]
    BufferTooSmall { needed: usize, available: usize },
}

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
/// Errors raised while decoding a payload into a message structure.
pub enum DeserializationError {
    /// Payload is shorter than the message layout.
    #[error("Invalid data length -> expected: {expected}, actual: {actual}")]
    InvalidDataLength { expected: usize, actual: usize },
    /// A bit field holds a value outside its enumeration.
    #[error("Malformed data in field {field}")]
    MalformedData { field: &'static str },
}

//==================================================================================QUEUE_ERROR
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
/// Reasons a transfer was refused by the outbound queue.
pub enum EnqueueError {
    /// Not enough free slots for every frame of the transfer.
    #[error("TX queue full -> needed: {needed} frames, available: {available}")]
    QueueFull { needed: usize, available: usize },
}

//==================================================================================SEND_ERROR
#[derive(Debug, Error)]
/// A frame could not be written to the bus.
pub enum TransmitError<E: core::fmt::Debug> {
    /// CAN layer refused or failed to send the frame.
    #[error("CAN bus send error: {0:?}")]
    Send(E),
}

#[derive(Debug, Error)]
/// The trigger output could not be driven.
pub enum TriggerError<E: core::fmt::Debug> {
    /// Driving the line high failed; no pulse was emitted.
    #[error("Trigger pin set-high failed: {0:?}")]
    SetHigh(E),
    /// Driving the line low failed; the line may be stuck high.
    #[error("Trigger pin set-low failed: {0:?}")]
    SetLow(E),
}
