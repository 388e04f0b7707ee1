//! Sensor drivers feeding the node. Only the HC-SR04 style ultrasonic ranger exists.
pub mod ultrasound;

pub use ultrasound::{RangeMeasurement, RangeMeasurer, RangeStats, TriggerOutcome};
