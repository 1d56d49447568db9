//! Configuration for MudraIO applications.
//!
//! Loads configuration from a TOML file. The defaults mirror the deployment
//! constants; a config file exists so test rigs and alternate deployments
//! can move the fixed ports without a rebuild.

use crate::constants::{
    APP_PAIRING_PORT, DEVICE_PAIRING_PORT, TRANSPORT_RECEIVE_PORT, TRANSPORT_SEND_PORT,
};
use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Top-level application configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AppConfig {
    pub pairing: PairingConfig,
    pub transport: TransportConfig,
    pub logging: LoggingConfig,
}

/// UDP pairing ports
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PairingConfig {
    /// Port the glove base station listens on for pairing replies
    pub device_port: u16,
    /// Port this application listens on for pairing announcements
    pub app_port: u16,
}

/// Ports used by the external message transport
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TransportConfig {
    /// Port inbound payloads arrive on
    pub receive_port: u16,
    /// Port outbound payloads are sent to
    pub send_port: u16,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,
}

impl AppConfig {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        let config: AppConfig = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Save configuration to a TOML file
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let contents = toml::to_string_pretty(self)?;
        fs::write(path, contents)?;
        Ok(())
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            pairing: PairingConfig {
                device_port: DEVICE_PAIRING_PORT,
                app_port: APP_PAIRING_PORT,
            },
            transport: TransportConfig {
                receive_port: TRANSPORT_RECEIVE_PORT,
                send_port: TRANSPORT_SEND_PORT,
            },
            logging: LoggingConfig {
                level: "info".to_string(),
            },
        }
    }
}
