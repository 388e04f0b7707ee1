//! Asynchronous digital output driving the sensor's trigger line.
use embedded_hal::digital::OutputPin;
use futures_util::Future;

/// Output line able to start a ranging cycle.
///
/// Asynchronous so that host implementations backed by a kernel GPIO
/// character device can await the line request.
pub trait TriggerPin {
    type Error: core::fmt::Debug;
    /// Drive the trigger line high.
    fn set_high(&mut self) -> impl Future<Output = Result<(), Self::Error>> + '_;
    /// Drive the trigger line low.
    fn set_low(&mut self) -> impl Future<Output = Result<(), Self::Error>> + '_;
}

/// Adapter exposing a blocking `embedded-hal` output as a [`TriggerPin`].
pub struct BlockingTriggerPin<P>(pub P);

impl<P: OutputPin> TriggerPin for BlockingTriggerPin<P> {
    type Error = P::Error;

    async fn set_high(&mut self) -> Result<(), Self::Error> {
        self.0.set_high()
    }

    async fn set_low(&mut self) -> Result<(), Self::Error> {
        self.0.set_low()
    }
}
