//! Range reading published on subject 1610: a single IEEE-754 binary32,
//! little-endian, in centimetres.
use super::{check_buffer, check_payload, MessageData, ULTRASOUND_DISTANCE_SUBJECT_ID};
use crate::core::SubjectId;
use crate::error::{DeserializationError, SerializationError};

#[derive(Clone, Copy, Debug, PartialEq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct UltrasoundDistance {
    pub distance_cm: f32,
}

impl UltrasoundDistance {
    pub const SIZE: usize = 4;

    pub const fn new(distance_cm: f32) -> Self {
        Self { distance_cm }
    }

    pub fn to_bytes(&self) -> [u8; Self::SIZE] {
        self.distance_cm.to_le_bytes()
    }
}

impl MessageData for UltrasoundDistance {
    const SUBJECT_ID: SubjectId = ULTRASOUND_DISTANCE_SUBJECT_ID;
    const SIZE: usize = UltrasoundDistance::SIZE;

    fn to_payload(&self, buffer: &mut [u8]) -> Result<usize, SerializationError> {
        check_buffer(Self::SIZE, buffer)?;
        buffer[..Self::SIZE].copy_from_slice(&self.to_bytes());
        Ok(Self::SIZE)
    }

    fn from_payload(payload: &[u8]) -> Result<Self, DeserializationError> {
        check_payload(Self::SIZE, payload)?;
        let raw = [payload[0], payload[1], payload[2], payload[3]];
        Ok(Self::new(f32::from_le_bytes(raw)))
    }
}
