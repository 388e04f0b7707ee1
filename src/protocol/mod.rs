//! High-level components of the Cyphal/CAN protocol: the published message
//! types with their transfer encoder, and the CAN transport.
pub mod messages;
pub mod transport;
