//! SocketCAN implementation of the library's [`CanBus`].
use std::io;

use socketcan::{CanDataFrame, CanSocket, EmbeddedFrame, Socket};

use sonar_cyphal::protocol::transport::can_frame::CanFrame;
use sonar_cyphal::protocol::transport::traits::can_bus::CanBus;

/// Raw CAN socket in non-blocking mode: a full kernel queue surfaces as
/// `WouldBlock` and the frame stays in the node's queue.
pub struct SocketCanBus {
    socket: CanSocket,
}

impl SocketCanBus {
    pub fn open(iface: &str) -> io::Result<Self> {
        let socket = CanSocket::open(iface)?;
        socket.set_nonblocking(true)?;
        Ok(Self { socket })
    }
}

impl CanBus for SocketCanBus {
    type Error = io::Error;

    fn try_send(&mut self, frame: &CanFrame) -> Result<(), Self::Error> {
        let data_frame = CanDataFrame::new(frame.id.to_extended_id(), frame.bytes())
            .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "frame exceeds 8 bytes"))?;
        self.socket.write_frame(&data_frame)
    }
}
