//! # Persisted Settings
//!
//! The user-facing configuration store: a JSON key-value file in the
//! user's home directory, shared with the other NetworkPro tools.
//! Keys are camelCase on disk and unknown keys are preserved by being
//! ignored here, so this module can read a file written by an older or
//! richer tool without choking on it.
//!
//! A missing or malformed file falls back to defaults; loading never
//! fails.

use std::fs;
use std::path::PathBuf;

use anyhow::Context;
use directories::BaseDirs;
use serde::{Deserialize, Serialize};

pub const SETTINGS_FILE: &str = ".networkpro-tools.json";

pub const DEFAULT_PROBE_TIMEOUT_MS: u64 = 2_000;
pub const DEFAULT_CONCURRENCY: usize = 200;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Settings {
    /// Per-probe connect timeout in milliseconds.
    pub port_scan_timeout: u64,

    /// Maximum number of probes in flight at once.
    ///
    /// Bounds file-descriptor and ephemeral-port usage; scanning a full
    /// 1-65535 range peaks at the same concurrency as a small range.
    pub port_scan_concurrency: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            port_scan_timeout: DEFAULT_PROBE_TIMEOUT_MS,
            port_scan_concurrency: DEFAULT_CONCURRENCY,
        }
    }
}

impl Settings {
    pub fn path() -> Option<PathBuf> {
        BaseDirs::new().map(|dirs| dirs.home_dir().join(SETTINGS_FILE))
    }

    /// Loads persisted settings, falling back to defaults when the file
    /// is missing or unreadable.
    pub fn load() -> Self {
        let Some(path) = Self::path() else {
            return Self::default();
        };

        let Ok(raw) = fs::read_to_string(&path) else {
            return Self::default();
        };

        match serde_json::from_str(&raw) {
            Ok(settings) => settings,
            Err(e) => {
                tracing::warn!("ignoring malformed settings file {}: {e}", path.display());
                Self::default()
            }
        }
    }

    pub fn save(&self) -> anyhow::Result<()> {
        let path = Self::path().context("cannot determine home directory")?;
        let raw = serde_json::to_string_pretty(self)?;
        fs::write(&path, raw).with_context(|| format!("writing {}", path.display()))?;
        Ok(())
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
