//! mudra-pair - standalone pairing probe for the glove base station
//!
//! Runs the UDP pairing listener on its own and logs the station address as
//! soon as one announces itself. Useful for bring-up and for checking that
//! broadcast traffic makes it through the local network at all. Pairing has
//! no retry and no timeout; the probe waits until Ctrl-C.

use mudra_io::config::AppConfig;
use mudra_io::discovery::PairingDiscovery;
use mudra_io::error::Result;
use std::env;
use std::net::IpAddr;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

/// Parse config path from command line arguments.
///
/// Supports:
/// - `mudra-pair <path>` (positional)
/// - `mudra-pair --config <path>` (flag-based)
/// - `mudra-pair -c <path>` (short flag)
///
/// Defaults to `/etc/mudra.toml` if not specified.
fn parse_config_path() -> String {
    let args: Vec<String> = env::args().collect();

    for i in 1..args.len() {
        if (args[i] == "--config" || args[i] == "-c") && i + 1 < args.len() {
            return args[i + 1].clone();
        }
    }

    if args.len() > 1 && !args[1].starts_with('-') {
        return args[1].clone();
    }

    "/etc/mudra.toml".to_string()
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    log::info!("mudra-pair starting...");

    let config_path = parse_config_path();
    let config = if Path::new(&config_path).exists() {
        log::info!("Using config: {}", config_path);
        AppConfig::from_file(&config_path)?
    } else {
        log::info!("No config at {}, using deployment defaults", config_path);
        AppConfig::default()
    };

    let discovery =
        PairingDiscovery::with_ports(config.pairing.device_port, config.pairing.app_port)?;

    let running = Arc::new(AtomicBool::new(true));
    let r = Arc::clone(&running);
    ctrlc::set_handler(move || {
        log::info!("Received shutdown signal");
        r.store(false, Ordering::Relaxed);
    })
    .map_err(|e| {
        mudra_io::Error::Config(format!("Error setting Ctrl-C handler: {}", e))
    })?;

    log::info!("Waiting for a station to announce itself. Press Ctrl-C to stop.");

    let mut last_peer: Option<IpAddr> = None;
    while running.load(Ordering::Relaxed) {
        let peer = discovery.latest_peer();
        if peer != last_peer {
            match peer {
                Some(address) => log::info!("Paired with station at {}", address),
                None => log::info!("Station address cleared"),
            }
            last_peer = peer;
        }
        thread::sleep(Duration::from_millis(100));
    }

    log::info!("Shutting down...");
    discovery.shutdown();
    log::info!("mudra-pair stopped");
    Ok(())
}
