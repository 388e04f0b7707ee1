//! Runtime configuration of a node.
use embassy_time::Duration;

use crate::core::NodeId;
use crate::protocol::transport::tx_queue::TxFailurePolicy;

/// Ranging cadence: 20 Hz.
pub const DEFAULT_TRIGGER_PERIOD: Duration = Duration::from_millis(50);
/// Heartbeat cadence: 1 Hz.
pub const DEFAULT_HEARTBEAT_PERIOD: Duration = Duration::from_secs(1);
/// Echo line offset on the reference wiring.
pub const DEFAULT_ECHO_PIN: u32 = 24;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NodeConfig {
    pub node_id: NodeId,
    pub trigger_period: Duration,
    pub heartbeat_period: Duration,
    pub tx_policy: TxFailurePolicy,
    /// Line offset whose edges are timed as echo pulses.
    pub echo_pin: u32,
}

impl NodeConfig {
    /// Default cadences and policy for the given node.
    pub const fn new(node_id: NodeId) -> Self {
        Self {
            node_id,
            trigger_period: DEFAULT_TRIGGER_PERIOD,
            heartbeat_period: DEFAULT_HEARTBEAT_PERIOD,
            tx_policy: TxFailurePolicy::RetryNextTick,
            echo_pin: DEFAULT_ECHO_PIN,
        }
    }

    pub const fn with_trigger_period(mut self, period: Duration) -> Self {
        self.trigger_period = period;
        self
    }

    pub const fn with_heartbeat_period(mut self, period: Duration) -> Self {
        self.heartbeat_period = period;
        self
    }

    pub const fn with_tx_policy(mut self, policy: TxFailurePolicy) -> Self {
        self.tx_policy = policy;
        self
    }

    pub const fn with_echo_pin(mut self, pin: u32) -> Self {
        self.echo_pin = pin;
        self
    }
}

impl Default for NodeConfig {
    /// Node 0 is only a placeholder; real deployments pick their own id.
    fn default() -> Self {
        Self::new(NodeId::from_truncating(0))
    }
}
