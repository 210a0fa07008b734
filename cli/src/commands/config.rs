use anyhow::ensure;
use colored::*;

use netpro_common::config::Settings;
use netpro_common::success;

use crate::terminal::{colors, print};

/// Shows the persisted settings; with flags, updates and saves them
/// first.
pub fn config(timeout: Option<u64>, concurrency: Option<usize>) -> anyhow::Result<()> {
    let mut settings = Settings::load();
    let dirty: bool = timeout.is_some() || concurrency.is_some();

    if let Some(timeout) = timeout {
        ensure!(timeout > 0, "probe timeout must be at least 1 ms");
        settings.port_scan_timeout = timeout;
    }
    if let Some(concurrency) = concurrency {
        ensure!(concurrency > 0, "concurrency cap must be at least 1");
        settings.port_scan_concurrency = concurrency;
    }

    if dirty {
        settings.save()?;
        success!("settings saved");
    }

    let path: String = Settings::path()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "<no home directory>".to_string());

    print::set_key_width("portScanConcurrency".len());
    print::aligned_line("file", path);
    print::aligned_line(
        "portScanTimeout",
        format!("{} ms", settings.port_scan_timeout).color(colors::ACCENT),
    );
    print::aligned_line(
        "portScanConcurrency",
        settings
            .port_scan_concurrency
            .to_string()
            .color(colors::ACCENT),
    );

    Ok(())
}
