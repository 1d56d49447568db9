//! UDP broadcast pairing with the glove base station.
//!
//! # Protocol
//!
//! Three plain-text, comma-delimited datagram kinds, identified by their
//! leading tag:
//!
//! | Tag            | Direction         | Fields          |
//! |----------------|-------------------|-----------------|
//! | StartPairing   | app -> broadcast  | tag only        |
//! | DeviceIP       | station -> app    | tag, station IP |
//! | AppIP          | app -> station    | tag, app IP     |
//!
//! The application broadcasts `StartPairing` exactly once at startup. When a
//! station answers with `DeviceIP`, the receive loop records the address and
//! unicasts `AppIP` back. There is no retry and no protocol timeout: a lost
//! broadcast simply means pairing waits until the station announces itself
//! again on its own. "Not yet paired" is a normal state, not an error.
//!
//! Anything that is not exactly two comma-separated fields with the expected
//! tag is discarded silently.
//!
//! # Threading
//!
//! The receive loop runs on a dedicated background thread and publishes the
//! discovered address into a last-write-wins mailbox. The owning thread
//! drains the mailbox once per tick; no callback ever runs on the network
//! thread. Shutdown raises a flag that the loop observes within its socket
//! read timeout, then joins the thread.

use crate::constants::{
    APP_PAIRING_PORT, DEVICE_PAIRING_PORT, PAIRING_POLL_INTERVAL, TAG_APP_IP, TAG_DEVICE_IP,
    TAG_START_PAIRING,
};
use crate::error::Result;
use parking_lot::Mutex;
use std::io::ErrorKind;
use std::net::{IpAddr, Ipv4Addr, UdpSocket};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

/// Last-write-wins mailbox holding the most recently discovered station
/// address. Safe for one background writer and one foreground reader.
pub type PeerSlot = Arc<Mutex<Option<IpAddr>>>;

/// Background pairing listener. Owns the socket and the receive thread.
pub struct PairingDiscovery {
    peer: PeerSlot,
    shutdown: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl PairingDiscovery {
    /// Start pairing on the deployment ports.
    pub fn start() -> Result<Self> {
        Self::with_ports(DEVICE_PAIRING_PORT, APP_PAIRING_PORT)
    }

    /// Start pairing on explicit ports (loopback tests use ephemeral ones).
    ///
    /// Binds the application pairing socket, sends the startup broadcast
    /// once, and spawns the receive loop.
    pub fn with_ports(device_port: u16, app_port: u16) -> Result<Self> {
        let socket = UdpSocket::bind((Ipv4Addr::UNSPECIFIED, app_port))?;
        socket.set_read_timeout(Some(PAIRING_POLL_INTERVAL))?;

        // Best-effort by design: if the broadcast is lost, the station's own
        // periodic announcement still completes pairing eventually.
        if let Err(e) = broadcast_start_pairing(app_port) {
            log::warn!("Pairing broadcast failed: {}", e);
        }

        let peer: PeerSlot = Arc::new(Mutex::new(None));
        let shutdown = Arc::new(AtomicBool::new(false));

        let thread_peer = Arc::clone(&peer);
        let thread_shutdown = Arc::clone(&shutdown);
        let handle = thread::Builder::new()
            .name("pairing-discovery".to_string())
            .spawn(move || receive_loop(&socket, device_port, &thread_peer, &thread_shutdown))?;

        log::info!("Pairing listener on UDP port {}", app_port);

        Ok(Self {
            peer,
            shutdown,
            handle: Some(handle),
        })
    }

    /// Shared handle to the discovery mailbox.
    pub fn peer_slot(&self) -> PeerSlot {
        Arc::clone(&self.peer)
    }

    /// Most recently discovered station address, if any.
    pub fn latest_peer(&self) -> Option<IpAddr> {
        *self.peer.lock()
    }

    /// Stop the receive loop and join the background thread.
    pub fn shutdown(mut self) {
        self.stop();
    }

    fn stop(&mut self) {
        self.shutdown.store(true, Ordering::Relaxed);
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                log::error!("Pairing thread panicked during shutdown");
            }
        }
    }
}

impl Drop for PairingDiscovery {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Broadcast the one-shot pairing request to the application port.
fn broadcast_start_pairing(app_port: u16) -> std::io::Result<()> {
    let socket = UdpSocket::bind((Ipv4Addr::UNSPECIFIED, 0))?;
    socket.set_broadcast(true)?;
    socket.send_to(TAG_START_PAIRING.as_bytes(), (Ipv4Addr::BROADCAST, app_port))?;
    log::debug!("Pairing broadcast sent to port {}", app_port);
    Ok(())
}

fn receive_loop(socket: &UdpSocket, device_port: u16, peer: &PeerSlot, shutdown: &AtomicBool) {
    let mut buf = [0u8; 512];

    while !shutdown.load(Ordering::Relaxed) {
        let (len, from) = match socket.recv_from(&mut buf) {
            Ok(received) => received,
            Err(e) if matches!(e.kind(), ErrorKind::WouldBlock | ErrorKind::TimedOut) => continue,
            Err(e) => {
                log::error!("Pairing receive failed: {}", e);
                break;
            }
        };

        let Ok(message) = std::str::from_utf8(&buf[..len]) else {
            continue;
        };

        let fields: Vec<&str> = message.split(',').collect();
        if fields.len() != 2 || fields[0] != TAG_DEVICE_IP {
            continue;
        }

        let Ok(station_ip) = fields[1].parse::<IpAddr>() else {
            log::debug!("Unparseable station address {:?} from {}", fields[1], from);
            continue;
        };

        log::info!("Station announced itself: {} (datagram from {})", station_ip, from);
        *peer.lock() = Some(station_ip);

        if let Err(e) = send_app_ip(station_ip, device_port) {
            log::warn!("Failed to answer station {}: {}", station_ip, e);
        }
    }

    log::debug!("Pairing thread exiting");
}

/// Unicast our address back to the station.
fn send_app_ip(station_ip: IpAddr, device_port: u16) -> std::io::Result<()> {
    let socket = UdpSocket::bind((Ipv4Addr::UNSPECIFIED, 0))?;
    // The station accepts an empty address field; it still has the source IP
    let local = local_ip_address::local_ip()
        .map(|ip| ip.to_string())
        .unwrap_or_default();
    let message = format!("{},{}", TAG_APP_IP, local);
    socket.send_to(message.as_bytes(), (station_ip, device_port))?;
    Ok(())
}
