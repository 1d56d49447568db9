//! MudraIO - host-side protocol layer for haptic glove peripherals
//!
//! This library bridges a wearable haptic glove and a host application over
//! a local network:
//!
//! - [`discovery`]: UDP broadcast pairing with the glove base station
//! - [`codec`]: bit-exact float/bit/byte conversions for all wire payloads
//! - [`haptics`]: reference-counted actuator bit-fields and the outgoing
//!   haptics frame
//! - [`input`]: controller payload decoding with edge-triggered dispatch
//! - [`fingers`]: finger rotation telemetry
//! - [`dedup`]: suppression of unchanged outbound payloads per channel
//! - [`session`]: orchestration and the transport seam
//!
//! The message transport that frames address+payload envelopes is an
//! external collaborator; see [`session::PayloadSink`].

pub mod channel;
pub mod codec;
pub mod config;
pub mod constants;
pub mod dedup;
pub mod discovery;
pub mod error;
pub mod fingers;
pub mod haptics;
pub mod input;
pub mod session;
pub mod types;

// Re-export commonly used types
pub use config::AppConfig;
pub use error::{Error, Result};
pub use session::GloveSession;
pub use types::HandSide;
