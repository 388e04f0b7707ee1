//! `sonar-cyphal` library: everything an ultrasonic ranging node needs to publish
//! its readings on a Cyphal/CAN bus from a `no_std` environment. The crate exposes
//! the shared value types, the Cyphal/CAN transport (identifiers, framing, outbound
//! queue), the published messages, the echo-timing state machine, and the
//! cooperative node scheduler tying them together.
#![no_std]
#[cfg(test)]
extern crate std;
//==================================================================================
// Logging shims must be declared first so every module sees the macros.
#[macro_use]
mod fmt;
//==================================================================================
/// Value types shared by every layer (ticks, edges, identifiers, priorities).
pub mod core;
/// Domain and low-level errors (identifier validation, payload codecs, queueing,
/// transmission, and trigger output failures).
pub mod error;
/// Node assembly: configuration, scheduler, and the async runner.
pub mod node;
/// Cyphal/CAN protocol implementation: transport framing and published messages.
pub mod protocol;
/// Ultrasonic range sensor timing.
pub mod sensor;
//==================================================================================
