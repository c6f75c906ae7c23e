//! Local Log Receiver
//!
//! Local processes (radio monitor, video pipeline, ...) report diagnostic text
//! as UDP datagrams to a localhost port. [`LogReceiver`] owns that socket and a
//! background thread that feeds every datagram into the shared
//! [`LogAccumulator`]. [`LocalLogSender`] is the producer side.
//!
//! One datagram carries one record; see [`crate::core::log_buffer`] for the
//! payload layout.

use crate::core::log_buffer::{parse_log_payload, LogAccumulator, LogEntry};
use crate::error::Result;
use mavlink::common::MavSeverity;
use std::io;
use std::net::{Ipv4Addr, SocketAddr, UdpSocket};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

/// Receive buffer size; longer datagrams are truncated by the OS
const RECV_BUF_SIZE: usize = 1024;

/// How often the receive thread checks the stop flag
const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Background UDP receiver feeding a [`LogAccumulator`]
pub struct LogReceiver {
    local_addr: SocketAddr,
    running: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl LogReceiver {
    /// Bind `127.0.0.1:port` and start the receive thread
    ///
    /// Port 0 picks an ephemeral port; see [`local_addr`](Self::local_addr).
    pub fn spawn(port: u16, logs: Arc<LogAccumulator>) -> Result<Self> {
        let socket = UdpSocket::bind((Ipv4Addr::LOCALHOST, port))?;
        socket.set_read_timeout(Some(POLL_INTERVAL))?;
        let local_addr = socket.local_addr()?;
        let running = Arc::new(AtomicBool::new(true));

        let handle = {
            let running = Arc::clone(&running);
            thread::Builder::new()
                .name("log-receiver".into())
                .spawn(move || receive_loop(socket, logs, running))?
        };

        crate::log_info!("Log receiver listening on {}", local_addr);
        Ok(Self {
            local_addr,
            running,
            handle: Some(handle),
        })
    }

    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Stop the receive thread and wait for it
    pub fn stop(&mut self) {
        self.running.store(false, Ordering::Relaxed);
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                crate::log_error!("Log receiver thread panicked");
            }
        }
    }
}

impl Drop for LogReceiver {
    fn drop(&mut self) {
        self.stop();
    }
}

fn receive_loop(socket: UdpSocket, logs: Arc<LogAccumulator>, running: Arc<AtomicBool>) {
    let mut buf = [0u8; RECV_BUF_SIZE];

    while running.load(Ordering::Relaxed) {
        match socket.recv_from(&mut buf) {
            Ok((len, from)) => {
                if let Err(e) = logs.ingest(&buf[..len]) {
                    crate::log_debug!("Ignoring log datagram from {}: {}", from, e);
                }
            }
            Err(ref e)
                if e.kind() == io::ErrorKind::WouldBlock || e.kind() == io::ErrorKind::TimedOut => {}
            Err(e) => {
                crate::log_warn!("Log receiver error: {}", e);
                thread::sleep(POLL_INTERVAL);
            }
        }
    }

    crate::log_debug!("Log receiver stopped");
}

/// Sends log records to a [`LogReceiver`]
pub struct LocalLogSender {
    socket: UdpSocket,
    target: SocketAddr,
}

impl LocalLogSender {
    /// Send to the receiver on `127.0.0.1:port`
    pub fn new(port: u16) -> Result<Self> {
        Self::to_addr(SocketAddr::from((Ipv4Addr::LOCALHOST, port)))
    }

    pub fn to_addr(target: SocketAddr) -> Result<Self> {
        let socket = UdpSocket::bind((Ipv4Addr::LOCALHOST, 0))?;
        Ok(Self { socket, target })
    }

    /// Send one record; text beyond one STATUSTEXT payload is truncated
    ///
    /// A record the receiver would reject, such as one with no text, is
    /// refused here and nothing is sent.
    pub fn send(&self, severity: MavSeverity, text: &str) -> Result<()> {
        let payload = LogEntry::new(severity, text).to_payload();
        parse_log_payload(&payload)?;
        self.socket.send_to(&payload, self.target)?;
        Ok(())
    }
}
