//! Minimal abstraction for a non-blocking CAN bus. Allows the library to plug
//! into various implementations (embedded HAL, SocketCAN, test doubles).
use crate::protocol::transport::can_frame::CanFrame;

/// Contract to push CAN frames onto the bus without blocking.
pub trait CanBus {
    type Error: core::fmt::Debug;
    /// Attempt to emit a frame right now.
    ///
    /// Must return promptly: a full hardware mailbox or a busy socket is
    /// reported as an error and the caller decides whether to retry later.
    fn try_send(&mut self, frame: &CanFrame) -> Result<(), Self::Error>;
}

impl<T: CanBus + ?Sized> CanBus for &mut T {
    type Error = T::Error;

    fn try_send(&mut self, frame: &CanFrame) -> Result<(), Self::Error> {
        (**self).try_send(frame)
    }
}
