//! Turns message values into sequenced transfers.
//!
//! Every subject owns an independent transfer-ID counter that starts at 0 and
//! advances by one (mod 32) per produced transfer.
use crate::core::{Priority, SubjectId, TransferId};
use crate::protocol::messages::{
    Heartbeat, MessageData, UltrasoundDistance, HEARTBEAT_SUBJECT_ID,
    ULTRASOUND_DISTANCE_SUBJECT_ID,
};
use crate::protocol::transport::transfer::Transfer;
#[cfg(target_has_atomic = "8")]
use core::sync::atomic::{AtomicU8, Ordering};

//==================================================================================SUBJECT_COUNTER
/// Transfer-ID sequence of one subject.
#[derive(Debug, Default)]
pub struct SubjectCounter {
    #[cfg(target_has_atomic = "8")]
    next: AtomicU8,
    #[cfg(not(target_has_atomic = "8"))]
    // Single-context targets only: the encoder is then neither shared nor Sync.
    next: core::cell::Cell<u8>,
}

impl SubjectCounter {
    /// Hand out the current transfer ID and advance the sequence.
    pub fn next(&self) -> TransferId {
        #[cfg(target_has_atomic = "8")]
        let current = self
            .next
            .fetch_update(Ordering::AcqRel, Ordering::Relaxed, |prev| {
                Some(TransferId::from_truncating(prev).next().get())
            })
            .unwrap_or_else(|prev| prev);

        #[cfg(not(target_has_atomic = "8"))]
        let current = {
            let current = self.next.get();
            self.next.set(TransferId::from_truncating(current).next().get());
            current
        };

        TransferId::from_truncating(current)
    }

    /// Transfer ID the next call to [`SubjectCounter::next`] will return.
    pub fn peek(&self) -> TransferId {
        #[cfg(target_has_atomic = "8")]
        let current = self.next.load(Ordering::Acquire);
        #[cfg(not(target_has_atomic = "8"))]
        let current = self.next.get();
        TransferId::from_truncating(current)
    }
}

//==================================================================================TRANSFER_ENCODER
/// Produces the node's outgoing transfers, one counter per published subject.
#[derive(Debug, Default)]
pub struct TransferEncoder {
    heartbeat: SubjectCounter,
    distance: SubjectCounter,
}

impl TransferEncoder {
    pub const PRIORITY: Priority = Priority::Nominal;

    pub fn new() -> Self {
        Self::default()
    }

    /// Heartbeat transfer carrying `uptime` seconds, healthy and operational.
    pub fn encode_heartbeat(&self, uptime: u32) -> Transfer {
        let transfer_id = self.heartbeat.next();
        Self::message(
            <Heartbeat as MessageData>::SUBJECT_ID,
            transfer_id,
            Heartbeat::nominal(uptime).to_bytes(),
        )
    }

    /// Distance transfer carrying `distance_cm` as a little-endian f32.
    pub fn encode_distance(&self, distance_cm: f32) -> Transfer {
        let transfer_id = self.distance.next();
        Self::message(
            <UltrasoundDistance as MessageData>::SUBJECT_ID,
            transfer_id,
            UltrasoundDistance::new(distance_cm).to_bytes(),
        )
    }

    /// Counter state of a published subject, `None` for foreign subjects.
    pub fn next_transfer_id(&self, subject: SubjectId) -> Option<TransferId> {
        if subject == HEARTBEAT_SUBJECT_ID {
            Some(self.heartbeat.peek())
        } else if subject == ULTRASOUND_DISTANCE_SUBJECT_ID {
            Some(self.distance.peek())
        } else {
            None
        }
    }

    fn message<const N: usize>(
        subject: SubjectId,
        transfer_id: TransferId,
        payload: [u8; N],
    ) -> Transfer {
        Transfer::from_array(Self::PRIORITY, subject, transfer_id, payload)
    }
}

#[cfg(test)]
#[path = "tests.rs"]
mod tests;
