use thiserror::Error;

/// A scan request that failed validation before any probing started.
///
/// Once a request passes validation the sweep cannot fail as a whole:
/// per-port network outcomes are absorbed into the probe classification
/// and an empty result is a legitimate success.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScanError {
    #[error("target host must not be empty")]
    EmptyHost,

    /// Port 0 is reserved and never carries a listening service.
    #[error("port 0 is outside the scannable range (1-65535)")]
    PortZero,

    #[error("start port {start} is greater than end port {end}")]
    InvertedRange { start: u16, end: u16 },

    /// Surfaced only by entry points that cannot hand out a cancel
    /// handle; the primary scanner API reports cancellation through
    /// its outcome type instead.
    #[error("scan cancelled before completion")]
    Cancelled,
}
