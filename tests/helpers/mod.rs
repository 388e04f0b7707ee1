//! Test doubles to simulate the CAN bus and the sensor lines during integration tests.
use sonar_cyphal::protocol::transport::{
    can_frame::CanFrame,
    traits::{can_bus::CanBus, trigger_pin::TriggerPin},
};
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::time::{timeout, Duration};

#[derive(Clone)]
/// Node side of an in-memory CAN bus. Can be switched offline to make writes fail.
pub struct MockCanBus {
    tx: mpsc::UnboundedSender<CanFrame>,
    offline: Arc<AtomicBool>,
}

/// Observer side of the bus: receives every frame the node wrote.
pub struct BusMonitor {
    rx: mpsc::UnboundedReceiver<CanFrame>,
    offline: Arc<AtomicBool>,
}

#[allow(dead_code)]
impl MockCanBus {
    /// Construct a connected (node bus, monitor) pair.
    pub fn create_pair() -> (Self, BusMonitor) {
        let (tx, rx) = mpsc::unbounded_channel();
        let offline = Arc::new(AtomicBool::new(false));
        (
            Self {
                tx,
                offline: Arc::clone(&offline),
            },
            BusMonitor { rx, offline },
        )
    }
}

impl CanBus for MockCanBus {
    type Error = ();

    fn try_send(&mut self, frame: &CanFrame) -> Result<(), Self::Error> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(());
        }
        self.tx.send(frame.clone()).map_err(|_| ())
    }
}

#[allow(dead_code)]
impl BusMonitor {
    /// Next frame written by the node, or `None` after `wait` without traffic.
    pub async fn recv_within(&mut self, wait: Duration) -> Option<CanFrame> {
        timeout(wait, self.rx.recv()).await.ok().flatten()
    }

    /// Frame already written, without waiting.
    pub fn try_recv(&mut self) -> Option<CanFrame> {
        self.rx.try_recv().ok()
    }

    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }
}

#[derive(Clone, Default)]
#[allow(dead_code)]
/// Trigger line counting the pulses it emitted.
pub struct MockTriggerPin {
    pulses: Arc<AtomicU32>,
    high: Arc<AtomicBool>,
}

#[allow(dead_code)]
impl MockTriggerPin {
    pub fn pulses(&self) -> u32 {
        self.pulses.load(Ordering::SeqCst)
    }

    pub fn is_high(&self) -> bool {
        self.high.load(Ordering::SeqCst)
    }
}

impl TriggerPin for MockTriggerPin {
    type Error = ();

    async fn set_high(&mut self) -> Result<(), Self::Error> {
        self.high.store(true, Ordering::SeqCst);
        self.pulses.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn set_low(&mut self) -> Result<(), Self::Error> {
        self.high.store(false, Ordering::SeqCst);
        Ok(())
    }
}

/// Delay that returns immediately; pulse width is checked in unit tests.
pub struct NoDelay;

impl embedded_hal::delay::DelayNs for NoDelay {
    fn delay_ns(&mut self, _ns: u32) {}
}
