//! Deployment constants for the glove link.
//!
//! Ports, pairing tags, and payload lengths are fixed by the station
//! firmware; none of these are negotiated at runtime.

use std::time::Duration;

/// UDP port the glove base station listens on for pairing replies
pub const DEVICE_PAIRING_PORT: u16 = 25800;

/// UDP port the application listens on for pairing announcements
pub const APP_PAIRING_PORT: u16 = 25801;

/// Port the external message transport receives payloads on
pub const TRANSPORT_RECEIVE_PORT: u16 = 25788;

/// Port the external message transport sends payloads to
pub const TRANSPORT_SEND_PORT: u16 = 25790;

/// Pairing broadcast sent once by the application at startup
pub const TAG_START_PAIRING: &str = "DivingStationPairing_StartPairing";

/// Station announcement: `<tag>,<station-ip>`
pub const TAG_DEVICE_IP: &str = "DivingStationPairing_DivingStationIP";

/// Application reply: `<tag>,<application-ip>`
pub const TAG_APP_IP: &str = "DivingStationPairing_ApplicationIP";

/// How often the pairing receive loop re-checks the shutdown flag
pub const PAIRING_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Controller input payload: 1 hand byte + 5 button bytes + 5 reserved + 7 f32
pub const CONTROLLER_INPUT_LEN: usize = 39;

/// Offset of the packed float block inside the controller payload
pub const CONTROLLER_FLOATS_OFFSET: usize = 11;

/// Finger rotation payload: 16 f32 per hand
pub const FINGER_ROTATION_LEN: usize = 64;

/// Raw thumb-proximal values top out at 0.66 of full deflection
pub const THUMB_PROXIMAL_SCALE: f32 = 0.66;

/// Haptic actuator bits per hand (4 finger sections x 4 modules)
pub const ACTUATOR_BITS_PER_HAND: usize = 16;

/// Encoded actuator block per hand: 16 actuator bits + 4 + 4
pub const HAND_HAPTICS_LEN: usize = 3;

/// Outgoing haptics frame: both hands back to back
pub const HAPTICS_FRAME_LEN: usize = 2 * HAND_HAPTICS_LEN;

/// Collision overlay block: 16 bits per hand
pub const COLLISION_OVERLAY_LEN: usize = 4;

/// Vibration command: `[is_right, frequency, amplitude, duration]`
pub const VIBRATION_FLOATS: usize = 4;
