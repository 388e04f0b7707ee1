//! Sensor lines on a Linux GPIO character device.
use std::convert::Infallible;
use std::io;
use std::time::{Duration, Instant};

use embedded_hal::delay::DelayNs;
use tokio_gpiod::{Chip, Edge, EdgeDetect, Input, Lines, Options, Output};

use sonar_cyphal::core::{EdgeEvent, EdgeLevel, Tick};
use sonar_cyphal::node::EdgeSender;
use sonar_cyphal::protocol::transport::traits::trigger_pin::TriggerPin;

const CONSUMER: &str = "sonar-node";

/// Pause after a failed echo read before trying again.
const READ_RETRY: Duration = Duration::from_millis(10);

/// Both sensor lines, requested from the same chip.
pub struct SensorLines {
    pub trigger: GpioTrigger,
    pub echo: Lines<Input>,
}

impl SensorLines {
    /// Request the trigger as an output driven low and the echo as an input
    /// reporting both edges.
    pub async fn open(chip: &str, trigger_pin: u32, echo_pin: u32) -> io::Result<Self> {
        let chip = Chip::new(chip).await?;
        let trigger = chip
            .request_lines(
                Options::output([trigger_pin])
                    .consumer(CONSUMER)
                    .values([false]),
            )
            .await?;
        let echo = chip
            .request_lines(
                Options::input([echo_pin])
                    .edge(EdgeDetect::Both)
                    .consumer(CONSUMER),
            )
            .await?;
        Ok(Self {
            trigger: GpioTrigger { lines: trigger },
            echo,
        })
    }
}

/// Trigger output backed by a single requested line.
pub struct GpioTrigger {
    lines: Lines<Output>,
}

impl TriggerPin for GpioTrigger {
    type Error = io::Error;

    async fn set_high(&mut self) -> Result<(), Self::Error> {
        self.lines.set_values([true]).await
    }

    async fn set_low(&mut self) -> Result<(), Self::Error> {
        self.lines.set_values([false]).await
    }
}

/// Forward every echo edge to the node with its kernel timestamp.
pub async fn forward_echo_edges<const N: usize>(
    mut echo: Lines<Input>,
    echo_pin: u32,
    edges: EdgeSender<'static, N>,
) -> Infallible {
    loop {
        match echo.read_event().await {
            Ok(event) => {
                let level = match event.edge {
                    Edge::Rising => EdgeLevel::Rising,
                    Edge::Falling => EdgeLevel::Falling,
                };
                let tick = Tick::from_micros_wrapping(event.time.as_micros() as u64);
                edges.post(EdgeEvent::new(echo_pin, level, tick));
            }
            Err(err) => {
                log::warn!("echo line read failed: {err}");
                tokio::time::sleep(READ_RETRY).await;
            }
        }
    }
}

/// Busy-wait delay. Microsecond holds are far below the scheduler's resolution.
pub struct SpinDelay;

impl DelayNs for SpinDelay {
    fn delay_ns(&mut self, ns: u32) {
        let start = Instant::now();
        let wait = Duration::from_nanos(u64::from(ns));
        while start.elapsed() < wait {
            std::hint::spin_loop();
        }
    }
}
