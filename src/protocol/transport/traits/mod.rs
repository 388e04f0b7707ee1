//! Abstraction traits used by the transport and sensor layers (CAN bus, trigger output).
pub mod can_bus;
pub mod trigger_pin;
