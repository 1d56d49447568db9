//! Session orchestration.
//!
//! [`GloveSession`] is the explicitly owned object tying the protocol layer
//! together: it routes inbound payloads to the right decoder, composes
//! outbound frames, and drains the pairing mailbox on the owning thread.
//! The message transport itself is an external collaborator behind the
//! [`PayloadSink`] trait; this layer never frames or parses envelopes.

use crate::channel::Channel;
use crate::constants::COLLISION_OVERLAY_LEN;
use crate::dedup::ChangeGate;
use crate::discovery::PairingDiscovery;
use crate::error::Result;
use crate::fingers::FingerRotations;
use crate::haptics::HapticsAggregator;
use crate::input::ControllerInputState;
use crate::types::HandSide;
use std::net::IpAddr;

/// Outbound seam to the external message transport.
pub trait PayloadSink {
    /// Send a byte payload on a channel
    fn send_bytes(&mut self, channel: Channel, payload: &[u8]) -> Result<()>;

    /// Send a float payload on a channel
    fn send_floats(&mut self, channel: Channel, payload: &[f32]) -> Result<()>;
}

/// One glove link session: per-hand haptic state, controller input,
/// finger telemetry, outbound dedup, and (optionally) pairing.
pub struct GloveSession {
    haptics: HapticsAggregator,
    controller: ControllerInputState,
    fingers: FingerRotations,
    gate: ChangeGate,
    discovery: Option<PairingDiscovery>,
}

impl GloveSession {
    /// Session without pairing, for hosts that already know the station.
    pub fn new() -> Self {
        Self {
            haptics: HapticsAggregator::new(),
            controller: ControllerInputState::new(),
            fingers: FingerRotations::new(),
            gate: ChangeGate::new(),
            discovery: None,
        }
    }

    /// Session that also pairs over UDP broadcast on the deployment ports.
    pub fn with_discovery() -> Result<Self> {
        let mut session = Self::new();
        session.discovery = Some(PairingDiscovery::start()?);
        Ok(session)
    }

    pub fn haptics(&self) -> &HapticsAggregator {
        &self.haptics
    }

    pub fn haptics_mut(&mut self) -> &mut HapticsAggregator {
        &mut self.haptics
    }

    pub fn controller(&self) -> &ControllerInputState {
        &self.controller
    }

    pub fn controller_mut(&mut self) -> &mut ControllerInputState {
        &mut self.controller
    }

    pub fn fingers(&self) -> &FingerRotations {
        &self.fingers
    }

    /// Latest station address from the pairing mailbox, if pairing is
    /// running and a station has announced itself. Call once per tick.
    pub fn poll_peer(&self) -> Option<IpAddr> {
        self.discovery.as_ref().and_then(|d| d.latest_peer())
    }

    /// Route one inbound transport message.
    ///
    /// Malformed frames are logged and dropped; they never propagate.
    pub fn handle_message(&mut self, address: &str, payload: &[u8]) {
        match Channel::from_address(address) {
            Some(Channel::ControllerInput) => {
                if let Err(e) = self.controller.feed(payload) {
                    log::error!("Controller frame dropped: {}", e);
                }
            }
            Some(Channel::FingerRotationLeft) => self.apply_rotation(HandSide::Left, payload),
            Some(Channel::FingerRotationRight) => self.apply_rotation(HandSide::Right, payload),
            Some(outbound) => {
                log::debug!("Ignoring inbound payload on outbound channel {:?}", outbound);
            }
            None => {
                log::debug!("Ignoring payload for unknown address {}", address);
            }
        }
    }

    fn apply_rotation(&mut self, hand: HandSide, payload: &[u8]) {
        if let Err(e) = self.fingers.apply_payload(hand, payload) {
            log::error!("{:?} finger rotation frame dropped: {}", hand, e);
        }
    }

    /// Inject an externally computed contact mask before publishing.
    pub fn apply_contact_mask(&mut self, mask: &[u8; COLLISION_OVERLAY_LEN]) -> bool {
        self.haptics.set_sticky_from_bytes(mask)
    }

    /// Compose the 6-byte haptics frame and send it if it changed since the
    /// last accepted send. Returns whether a frame went out.
    pub fn publish_haptics<S: PayloadSink>(&mut self, sink: &mut S) -> Result<bool> {
        let frame = self.haptics.encode_frame();
        if !self.gate.should_send(Channel::Haptics, &frame) {
            return Ok(false);
        }
        sink.send_bytes(Channel::Haptics, &frame)?;
        Ok(true)
    }

    /// Record and send one vibration command.
    ///
    /// Always transmitted: the duration field makes every command distinct,
    /// so the change gate is deliberately bypassed.
    pub fn send_vibration<S: PayloadSink>(
        &mut self,
        sink: &mut S,
        hand: HandSide,
        amplitude: f32,
        frequency: f32,
        duration: f32,
    ) -> Result<()> {
        self.haptics.set_vibration(hand, amplitude, frequency);
        let command = self.haptics.vibration_command(hand, duration);
        sink.send_floats(Channel::Vibration, &command)
    }

    /// Stop pairing (if running) and release the session.
    pub fn shutdown(mut self) {
        if let Some(discovery) = self.discovery.take() {
            discovery.shutdown();
        }
    }
}

impl Default for GloveSession {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec;
    use crate::constants::CONTROLLER_INPUT_LEN;
    use crate::haptics::{ActuatorPosition, FingerSection};
    use crate::input::BoolInput;
    use std::cell::Cell;
    use std::rc::Rc;

    /// Sink that records every send for assertions.
    #[derive(Default)]
    struct RecordingSink {
        bytes: Vec<(Channel, Vec<u8>)>,
        floats: Vec<(Channel, Vec<f32>)>,
    }

    impl PayloadSink for RecordingSink {
        fn send_bytes(&mut self, channel: Channel, payload: &[u8]) -> Result<()> {
            self.bytes.push((channel, payload.to_vec()));
            Ok(())
        }

        fn send_floats(&mut self, channel: Channel, payload: &[f32]) -> Result<()> {
            self.floats.push((channel, payload.to_vec()));
            Ok(())
        }
    }

    #[test]
    fn test_haptics_publish_is_gated() {
        let mut session = GloveSession::new();
        let mut sink = RecordingSink::default();

        // First frame always goes out, even all-zero
        assert!(session.publish_haptics(&mut sink).unwrap());
        assert!(!session.publish_haptics(&mut sink).unwrap());

        session
            .haptics_mut()
            .hand_mut(HandSide::Left)
            .enable(FingerSection::Thumb, ActuatorPosition::TopLeft);
        assert!(session.publish_haptics(&mut sink).unwrap());

        assert_eq!(sink.bytes.len(), 2);
        assert_eq!(sink.bytes[1].1[0], 0b0000_0001);
    }

    #[test]
    fn test_vibration_bypasses_the_gate() {
        let mut session = GloveSession::new();
        let mut sink = RecordingSink::default();
        for _ in 0..3 {
            session
                .send_vibration(&mut sink, HandSide::Right, 0.5, 60.0, 0.1)
                .unwrap();
        }
        assert_eq!(sink.floats.len(), 3);
        assert_eq!(sink.floats[0].1, vec![1.0, 60.0, 0.5, 0.1]);
    }

    #[test]
    fn test_inbound_controller_routing_dispatches_edges() {
        let mut session = GloveSession::new();
        let fired = Rc::new(Cell::new(0));
        {
            let fired = Rc::clone(&fired);
            session
                .controller_mut()
                .add_on_listener(HandSide::Left, BoolInput::A, move || {
                    fired.set(fired.get() + 1);
                });
        }

        let mut payload = vec![0u8; CONTROLLER_INPUT_LEN];
        payload[1] = 1; // A pressed, left hand
        session.handle_message(Channel::ControllerInput.address(), &payload);
        session.handle_message(Channel::ControllerInput.address(), &payload);
        assert_eq!(fired.get(), 1);
        assert!(session.controller().button(HandSide::Left, BoolInput::A));
    }

    #[test]
    fn test_short_inbound_frame_is_dropped_quietly() {
        let mut session = GloveSession::new();
        session.handle_message(Channel::ControllerInput.address(), &[0u8; 10]);
        session.handle_message(Channel::FingerRotationLeft.address(), &[0u8; 10]);
        session.handle_message("/DivingStation/Bogus", &[0u8; 64]);
        // Nothing decoded, nothing panicked
        assert!(!session.controller().button(HandSide::Left, BoolInput::A));
    }

    #[test]
    fn test_finger_rotation_routing_by_address() {
        let mut session = GloveSession::new();
        let mut floats = [0.0f32; 16];
        floats[0] = 0.4;
        session.handle_message(
            Channel::FingerRotationRight.address(),
            &codec::encode_floats(&floats),
        );
        assert_eq!(
            session
                .fingers()
                .amplitude(HandSide::Right, crate::fingers::FingerJoint::LittleProximal),
            0.4
        );
        assert_eq!(
            session
                .fingers()
                .amplitude(HandSide::Left, crate::fingers::FingerJoint::LittleProximal),
            0.0
        );
    }

    #[test]
    fn test_contact_mask_reaches_the_frame() {
        let mut session = GloveSession::new();
        let mut sink = RecordingSink::default();
        session.publish_haptics(&mut sink).unwrap();

        assert!(session.apply_contact_mask(&[0x01, 0, 0, 0]));
        assert!(session.publish_haptics(&mut sink).unwrap());
        assert_eq!(sink.bytes[1].1[0] & 1, 1);
    }
}
