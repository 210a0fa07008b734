//! Single-port TCP probe.
//!
//! One bounded-time connection attempt against one (host, port) pair,
//! collapsed into a three-way classification. Every network condition
//! is absorbed here; a probe never raises an error to its caller.

use std::io;
use std::time::Duration;

use async_trait::async_trait;
use tokio::net::TcpStream;
use tokio::time::timeout;

/// Per-probe connect timeout used when the settings store has nothing
/// better to say.
pub const DEFAULT_PROBE_TIMEOUT: Duration = Duration::from_millis(2_000);

/// Three-way classification of a single connection attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PortState {
    /// The TCP handshake completed before the timeout.
    Open,
    /// The remote actively refused or reset the attempt.
    Closed,
    /// Nothing answered before the timeout, or the transport failed
    /// outright (DNS failure, unreachable network, routing failure).
    Unreachable,
}

/// The classification of exactly one probed port.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProbeOutcome {
    pub port: u16,
    pub state: PortState,
}

/// The strategy for probing a transport-layer port.
///
/// The scanner composes this primitive under its concurrency cap;
/// test doubles and alternative probing techniques plug in here.
#[async_trait]
pub trait Prober: Send + Sync {
    /// Classifies one (host, port) pair within `probe_timeout`.
    async fn probe(&self, host: &str, port: u16, probe_timeout: Duration) -> PortState;
}

/// Probes by completing a full TCP connect through the OS socket API.
///
/// Hostname resolution happens inside [`TcpStream::connect`]; a name
/// that does not resolve classifies as `Unreachable` like any other
/// transport failure. Exactly one socket is opened per invocation and
/// released as soon as the handshake settles, without exchanging
/// application data.
#[derive(Debug, Default, Clone, Copy)]
pub struct TcpProber;

#[async_trait]
impl Prober for TcpProber {
    async fn probe(&self, host: &str, port: u16, probe_timeout: Duration) -> PortState {
        match timeout(probe_timeout, TcpStream::connect((host, port))).await {
            Ok(Ok(stream)) => {
                drop(stream);
                PortState::Open
            }
            Ok(Err(e)) => classify_error(&e),
            Err(_elapsed) => PortState::Unreachable,
        }
    }
}

fn classify_error(e: &io::Error) -> PortState {
    match e.kind() {
        io::ErrorKind::ConnectionRefused | io::ErrorKind::ConnectionReset => PortState::Closed,
        _ => PortState::Unreachable,
    }
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
