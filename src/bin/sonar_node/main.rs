//! `sonar-node`: publishes HC-SR04 range readings and a heartbeat on a
//! SocketCAN interface, timing echoes through the GPIO character device.
use std::convert::Infallible;
use std::process::ExitCode;

use embassy_sync::channel::Channel;
use embassy_time::Instant;

use sonar_cyphal::core::NodeId;
use sonar_cyphal::node::{EdgeChannel, Node, NodeService};

mod can;
mod cli;
mod error;
mod gpio;

use can::SocketCanBus;
use cli::Cli;
use error::InitError;
use gpio::{forward_echo_edges, SensorLines, SpinDelay};

/// Edges buffered between the GPIO reader and the node loop.
const EDGE_CAPACITY: usize = 32;
/// Outbound queue depth, in frames.
const TX_CAPACITY: usize = 32;

static EDGES: EdgeChannel<EDGE_CAPACITY> = Channel::new();

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse_or_exit();
    init_logging();

    match run(cli).await {
        Ok(never) => match never {},
        Err(err) => {
            eprintln!("sonar-node: {err}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<Infallible, InitError> {
    let node_id = NodeId::new(cli.node_id).map_err(|e| InitError::Argument(e.to_string()))?;
    let config = cli.node_config(node_id);

    let bus = SocketCanBus::open(&cli.iface).map_err(|source| InitError::BusInit {
        iface: cli.iface.clone(),
        source,
    })?;
    let lines = SensorLines::open(&cli.gpio_chip, cli.trigger_pin, cli.echo_pin)
        .await
        .map_err(|source| InitError::SensorInit {
            chip: cli.gpio_chip.clone(),
            source,
        })?;

    log::info!(
        "publishing on {} as node {} (trigger line {}, echo line {} on {})",
        cli.iface,
        node_id.get(),
        cli.trigger_pin,
        cli.echo_pin,
        cli.gpio_chip
    );

    let node: Node<_, _, _, TX_CAPACITY> =
        Node::new(config, bus, lines.trigger, SpinDelay, Instant::now());
    let parts = NodeService::new(node, &EDGES).into_parts();

    let never = tokio::select! {
        never = parts.runner.drive() => never,
        never = forward_echo_edges(lines.echo, cli.echo_pin, parts.edges) => never,
    };
    match never {}
}

fn init_logging() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
}
