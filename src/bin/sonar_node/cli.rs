//! Command line surface of the host node.
use clap::error::ErrorKind;
use clap::Parser;

use sonar_cyphal::core::NodeId;
use sonar_cyphal::node::config::DEFAULT_ECHO_PIN;
use sonar_cyphal::node::NodeConfig;
use sonar_cyphal::protocol::transport::tx_queue::TxFailurePolicy;

/// Trigger line offset on the reference wiring.
pub const DEFAULT_TRIGGER_PIN: u32 = 18;

/// Ultrasonic range publisher for Cyphal/CAN
#[derive(Parser, Debug)]
#[command(name = "sonar-node")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// SocketCAN interface (e.g. can0, vcan0)
    pub iface: String,

    /// Local node identifier
    #[arg(value_parser = clap::value_parser!(u8).range(0..=i64::from(NodeId::MAX)))]
    pub node_id: u8,

    /// GPIO character device holding both sensor lines
    #[arg(long, value_name = "CHIP", default_value = "gpiochip0")]
    pub gpio_chip: String,

    /// Line offset driving the sensor trigger input
    #[arg(long, value_name = "OFFSET", default_value_t = DEFAULT_TRIGGER_PIN)]
    pub trigger_pin: u32,

    /// Line offset wired to the sensor echo output
    #[arg(long, value_name = "OFFSET", default_value_t = DEFAULT_ECHO_PIN)]
    pub echo_pin: u32,

    /// Drop frames the bus refuses instead of retrying them next iteration
    #[arg(long)]
    pub drop_failed_frames: bool,
}

impl Cli {
    /// Parse the process arguments. Usage errors go to stderr with exit code 1;
    /// `--help` and `--version` exit normally.
    pub fn parse_or_exit() -> Self {
        match Self::try_parse() {
            Ok(cli) => cli,
            Err(err) => match err.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => err.exit(),
                _ => {
                    let _ = err.print();
                    std::process::exit(1)
                }
            },
        }
    }

    pub fn tx_policy(&self) -> TxFailurePolicy {
        if self.drop_failed_frames {
            TxFailurePolicy::DropAndCount
        } else {
            TxFailurePolicy::RetryNextTick
        }
    }

    pub fn node_config(&self, node_id: NodeId) -> NodeConfig {
        NodeConfig::new(node_id)
            .with_tx_policy(self.tx_policy())
            .with_echo_pin(self.echo_pin)
    }
}
