//! Per-channel payload dedup.
//!
//! Steady-state frames are recomposed every tick; most ticks nothing
//! changed. The gate remembers the last payload accepted per channel and
//! suppresses byte-identical repeats so the transport only carries real
//! state changes.

use crate::channel::Channel;
use std::collections::HashMap;

/// Suppresses retransmission of unchanged payloads per channel.
#[derive(Debug, Default)]
pub struct ChangeGate {
    last_sent: HashMap<Channel, Vec<u8>>,
}

impl ChangeGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true (and records the payload as last-sent) when no payload
    /// was recorded for the channel yet, or when `payload` differs
    /// byte-for-byte from the recorded one. Returns false and leaves the
    /// record untouched when they are identical.
    pub fn should_send(&mut self, channel: Channel, payload: &[u8]) -> bool {
        match self.last_sent.get_mut(&channel) {
            None => {
                self.last_sent.insert(channel, payload.to_vec());
                true
            }
            Some(previous) if previous.as_slice() != payload => {
                previous.clear();
                previous.extend_from_slice(payload);
                true
            }
            Some(_) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_send_passes_repeat_blocked() {
        let mut gate = ChangeGate::new();
        assert!(gate.should_send(Channel::Haptics, &[1, 2, 3]));
        assert!(!gate.should_send(Channel::Haptics, &[1, 2, 3]));
    }

    #[test]
    fn test_single_byte_change_passes() {
        let mut gate = ChangeGate::new();
        assert!(gate.should_send(Channel::Haptics, &[1, 2, 3]));
        assert!(gate.should_send(Channel::Haptics, &[1, 2, 4]));
        assert!(!gate.should_send(Channel::Haptics, &[1, 2, 4]));
        // Going back to an older payload is still a change
        assert!(gate.should_send(Channel::Haptics, &[1, 2, 3]));
    }

    #[test]
    fn test_channels_are_independent() {
        let mut gate = ChangeGate::new();
        assert!(gate.should_send(Channel::Haptics, &[0; 6]));
        assert!(gate.should_send(Channel::Vibration, &[0; 6]));
        assert!(!gate.should_send(Channel::Haptics, &[0; 6]));
    }

    #[test]
    fn test_length_change_passes() {
        let mut gate = ChangeGate::new();
        assert!(gate.should_send(Channel::Haptics, &[0, 0]));
        assert!(gate.should_send(Channel::Haptics, &[0, 0, 0]));
    }
}
