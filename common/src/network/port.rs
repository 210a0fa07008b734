//! # Port Interval Model
//!
//! Defines the possible port inputs for a scan.
//!
//! This module handles parsing and representing port selections, which
//! can be:
//! * A single port (e.g., `443`).
//! * An inclusive interval (e.g., `1-1000`).
//! * A comma-separated list mixing both (e.g., `22,80,8000-8100`).
//! * A well-known service name (e.g., `http`, `dhcp`).

use std::fmt;
use std::str::FromStr;

use crate::error::ScanError;
use crate::network::service;

/// An inclusive, validated port interval.
///
/// Invariant: `1 <= start <= end`. The upper bound is enforced by the
/// `u16` type itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PortRange {
    pub start: u16,
    pub end: u16,
}

impl PortRange {
    pub fn new(start: u16, end: u16) -> Result<Self, ScanError> {
        if start == 0 || end == 0 {
            return Err(ScanError::PortZero);
        }
        if start > end {
            return Err(ScanError::InvertedRange { start, end });
        }
        Ok(Self { start, end })
    }

    pub fn single(port: u16) -> Result<Self, ScanError> {
        Self::new(port, port)
    }

    /// Number of ports in the interval. A validated range is never empty.
    pub fn len(&self) -> usize {
        usize::from(self.end - self.start) + 1
    }

    pub fn to_iter(&self) -> impl Iterator<Item = u16> {
        self.start..=self.end
    }

    pub fn contains(&self, port: u16) -> bool {
        self.start <= port && port <= self.end
    }
}

impl fmt::Display for PortRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.start == self.end {
            write!(f, "{}", self.start)
        } else {
            write!(f, "{}-{}", self.start, self.end)
        }
    }
}

/// Represents a distinct set of ports to be scanned.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PortSelection {
    /// Scan one inclusive interval.
    Range { range: PortRange },
    /// Holds a list of intervals, swept one after another.
    Multi { ranges: Vec<PortRange> },
}

impl PortSelection {
    pub fn ranges(&self) -> &[PortRange] {
        match self {
            PortSelection::Range { range } => std::slice::from_ref(range),
            PortSelection::Multi { ranges } => ranges,
        }
    }

    /// Total number of ports across every interval.
    pub fn total_ports(&self) -> usize {
        self.ranges().iter().map(PortRange::len).sum()
    }
}

impl FromStr for PortSelection {
    type Err = String;

    /// Parses a string into a `PortSelection`.
    ///
    /// Supported formats:
    /// * **Single**: one port number (e.g., "443").
    /// * **Range**: "Start-End" (e.g., "1-1000").
    /// * **List**: comma-separated singles/ranges/services.
    /// * **Service**: a well-known service name (case-insensitive),
    ///   resolved to its port interval (e.g., "dhcp" covers 67-68).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err("no ports given".to_string());
        }

        if s.contains(',') {
            return parse_commas(s);
        }

        if let Some(range) = parse_service(s) {
            return Ok(PortSelection::Range { range });
        }

        if let Some(range) = parse_single(s)? {
            return Ok(PortSelection::Range { range });
        }

        if let Some(range) = parse_range(s)? {
            return Ok(PortSelection::Range { range });
        }

        Err(format!("invalid port selection: {s}"))
    }
}

/// Parses a comma-separated list of selections (e.g., "22,80,8000-8100").
fn parse_commas(s: &str) -> Result<PortSelection, String> {
    let mut ranges = Vec::new();

    for part in s.split(',') {
        let part = part.trim();
        if part.is_empty() {
            continue;
        }

        let selection = PortSelection::from_str(part)
            .map_err(|e| format!("failed to parse ports '{part}': {e}"))?;
        ranges.extend_from_slice(selection.ranges());
    }

    if ranges.is_empty() {
        return Err("no ports given".to_string());
    }

    Ok(PortSelection::Multi { ranges })
}

/// Resolves a well-known service name to its port interval.
///
/// Multi-port services cover their lowest through highest port, the
/// same interval a range scan of that service would use.
fn parse_service(s: &str) -> Option<PortRange> {
    let ports = service::ports_for(s)?;
    let start = ports.iter().copied().min()?;
    let end = ports.iter().copied().max()?;
    PortRange::new(start, end).ok()
}

/// Parses a single port number.
fn parse_single(s: &str) -> Result<Option<PortRange>, String> {
    if !s.chars().all(|c| c.is_ascii_digit()) {
        return Ok(None);
    }

    let port = s
        .parse::<u16>()
        .map_err(|e| format!("invalid port '{s}': {e}"))?;

    let range = PortRange::single(port).map_err(|e| e.to_string())?;
    Ok(Some(range))
}

/// Parses a range string like "1-1000".
fn parse_range(s: &str) -> Result<Option<PortRange>, String> {
    let Some((start_str, end_str)) = s.split_once('-') else {
        return Ok(None);
    };

    let start = start_str
        .trim()
        .parse::<u16>()
        .map_err(|e| format!("invalid start port '{start_str}': {e}"))?;

    let end = end_str
        .trim()
        .parse::<u16>()
        .map_err(|e| format!("invalid end port '{end_str}': {e}"))?;

    let range = PortRange::new(start, end).map_err(|e| e.to_string())?;
    Ok(Some(range))
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
