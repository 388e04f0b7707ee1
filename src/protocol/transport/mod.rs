//! Cyphal/CAN transport layer: 29-bit message identifiers, classic CAN frame
//! representation, transfer segmentation, the outbound frame queue, and the
//! hardware abstraction traits.
//!
//! ## Transport Constants
//!
//! Only classic CAN (8-byte MTU) is supported. Every frame spends its last data
//! byte on the tail byte, leaving seven bytes of transfer payload per frame.

pub mod can_frame;
pub mod can_id;
pub mod traits;
pub mod transfer;
pub mod tx_queue;

/// Classic CAN maximum transmission unit (bytes of data per frame).
pub const CAN_CLASSIC_MTU: usize = 8;

/// Transfer payload bytes carried by one classic CAN frame (MTU minus tail byte).
pub const FRAME_PAYLOAD_CAPACITY: usize = CAN_CLASSIC_MTU - 1;

/// Largest transfer payload accepted by [`transfer::Transfer`].
///
/// Both published messages fit in a single frame; the margin leaves room for
/// multi-frame messages without making every transfer buffer large.
pub const MAX_TRANSFER_PAYLOAD: usize = 64;

/// Interval between two transmit attempts while frames are waiting in the queue (ms).
///
/// The node loop normally sleeps until its next deadline or edge event. When a
/// write fails and frames remain queued, it wakes up after this interval instead
/// so the queue keeps draining without spinning.
pub const TX_RETRY_INTERVAL_MS: u64 = 1;
