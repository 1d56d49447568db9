//! Finger rotation telemetry.
//!
//! The station streams one 64-byte block per hand: 16 packed f32 values.
//! Slots 0..11 are the non-thumb joints in enumeration order. The thumb is
//! special-cased by the hardware: slot 12 is thumb-proximal scaled down by
//! the sensor's 0.66 ceiling, slot 13 is unused, slots 14 and 15 are
//! thumb-intermediate and thumb-distal.

use crate::codec;
use crate::constants::{FINGER_ROTATION_LEN, THUMB_PROXIMAL_SCALE};
use crate::error::{Error, Result};
use crate::types::HandSide;

/// Finger joints addressable by rotation telemetry, in wire order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FingerJoint {
    LittleProximal = 0,
    LittleIntermediate = 1,
    LittleDistal = 2,
    RingProximal = 3,
    RingIntermediate = 4,
    RingDistal = 5,
    MiddleProximal = 6,
    MiddleIntermediate = 7,
    MiddleDistal = 8,
    IndexProximal = 9,
    IndexIntermediate = 10,
    IndexDistal = 11,
    ThumbProximal = 12,
    ThumbIntermediate = 13,
    ThumbDistal = 14,
    ThumbAbduction = 15,
}

impl FingerJoint {
    pub const COUNT: usize = 16;

    /// Joints filled directly from wire slots 0..11
    const DIRECT_COUNT: usize = 12;
}

/// Per-hand rotation amplitude table. 0 is straight, 1 is full deflection.
#[derive(Debug, Clone)]
pub struct FingerRotations {
    amplitude: [[f32; FingerJoint::COUNT]; HandSide::COUNT],
}

impl FingerRotations {
    pub fn new() -> Self {
        Self {
            amplitude: [[0.0; FingerJoint::COUNT]; HandSide::COUNT],
        }
    }

    /// Decode one rotation payload into the hand's amplitude table.
    ///
    /// Fails with `LengthMismatch` below 64 bytes; the caller logs and drops
    /// the frame. Thumb-abduction has no wire slot and keeps its last value.
    pub fn apply_payload(&mut self, hand: HandSide, payload: &[u8]) -> Result<()> {
        if payload.len() < FINGER_ROTATION_LEN {
            return Err(Error::LengthMismatch(format!(
                "finger rotation payload of {} bytes, need {}",
                payload.len(),
                FINGER_ROTATION_LEN
            )));
        }
        let floats = codec::decode_floats(&payload[..FINGER_ROTATION_LEN])?;
        let table = &mut self.amplitude[hand.index()];
        table[..FingerJoint::DIRECT_COUNT].copy_from_slice(&floats[..FingerJoint::DIRECT_COUNT]);
        // Thumb slots are remapped; slot 13 is unused on the wire
        table[FingerJoint::ThumbProximal as usize] = floats[12] / THUMB_PROXIMAL_SCALE;
        table[FingerJoint::ThumbIntermediate as usize] = floats[14];
        table[FingerJoint::ThumbDistal as usize] = floats[15];
        Ok(())
    }

    /// Last decoded amplitude for one joint.
    pub fn amplitude(&self, hand: HandSide, joint: FingerJoint) -> f32 {
        self.amplitude[hand.index()][joint as usize]
    }

    /// Overwrite one joint's amplitude (for retargeting layers that blend
    /// their own values in).
    pub fn set_amplitude(&mut self, hand: HandSide, joint: FingerJoint, value: f32) {
        self.amplitude[hand.index()][joint as usize] = value;
    }
}

impl Default for FingerRotations {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload_from(floats: &[f32; 16]) -> Vec<u8> {
        codec::encode_floats(floats)
    }

    #[test]
    fn test_direct_slots_map_in_order() {
        let mut rotations = FingerRotations::new();
        let mut floats = [0.0f32; 16];
        for (i, slot) in floats.iter_mut().enumerate().take(12) {
            *slot = i as f32 / 16.0;
        }
        rotations
            .apply_payload(HandSide::Left, &payload_from(&floats))
            .unwrap();
        assert_eq!(
            rotations.amplitude(HandSide::Left, FingerJoint::LittleProximal),
            0.0
        );
        assert_eq!(
            rotations.amplitude(HandSide::Left, FingerJoint::IndexDistal),
            11.0 / 16.0
        );
    }

    #[test]
    fn test_thumb_proximal_rescaled() {
        let mut rotations = FingerRotations::new();
        let mut floats = [0.0f32; 16];
        floats[12] = 0.66;
        floats[14] = 0.5;
        floats[15] = 0.25;
        rotations
            .apply_payload(HandSide::Right, &payload_from(&floats))
            .unwrap();
        let proximal = rotations.amplitude(HandSide::Right, FingerJoint::ThumbProximal);
        assert!((proximal - 1.0).abs() < 1e-6);
        assert_eq!(
            rotations.amplitude(HandSide::Right, FingerJoint::ThumbIntermediate),
            0.5
        );
        assert_eq!(
            rotations.amplitude(HandSide::Right, FingerJoint::ThumbDistal),
            0.25
        );
    }

    #[test]
    fn test_unused_slot_13_is_ignored() {
        let mut rotations = FingerRotations::new();
        let mut floats = [0.0f32; 16];
        floats[13] = 42.0;
        rotations
            .apply_payload(HandSide::Left, &payload_from(&floats))
            .unwrap();
        for joint in [
            FingerJoint::ThumbProximal,
            FingerJoint::ThumbIntermediate,
            FingerJoint::ThumbDistal,
            FingerJoint::ThumbAbduction,
        ] {
            assert_eq!(rotations.amplitude(HandSide::Left, joint), 0.0);
        }
    }

    #[test]
    fn test_short_payload_rejected_without_state_change() {
        let mut rotations = FingerRotations::new();
        rotations.set_amplitude(HandSide::Left, FingerJoint::IndexDistal, 0.8);
        assert!(rotations
            .apply_payload(HandSide::Left, &[0u8; FINGER_ROTATION_LEN - 1])
            .is_err());
        assert_eq!(
            rotations.amplitude(HandSide::Left, FingerJoint::IndexDistal),
            0.8
        );
    }

    #[test]
    fn test_hands_are_independent() {
        let mut rotations = FingerRotations::new();
        let mut floats = [0.0f32; 16];
        floats[0] = 0.9;
        rotations
            .apply_payload(HandSide::Right, &payload_from(&floats))
            .unwrap();
        assert_eq!(
            rotations.amplitude(HandSide::Left, FingerJoint::LittleProximal),
            0.0
        );
        assert_eq!(
            rotations.amplitude(HandSide::Right, FingerJoint::LittleProximal),
            0.9
        );
    }
}
