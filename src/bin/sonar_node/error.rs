//! Start-up failures. Every variant ends the process with exit code 1.
use std::io;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum InitError {
    /// Arguments parsed but do not describe a valid node.
    #[error("invalid argument: {0}")]
    Argument(String),
    /// The CAN interface could not be opened or configured.
    #[error("cannot open CAN interface {iface}: {source}")]
    BusInit {
        iface: String,
        #[source]
        source: io::Error,
    },
    /// The trigger or echo line could not be requested.
    #[error("cannot set up sensor lines on {chip}: {source}")]
    SensorInit {
        chip: String,
        #[source]
        source: io::Error,
    },
}
