use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

const TICK_STRINGS: &[&str] = &[
    "▁▁▁▁▁",
    "▁▂▂▂▁",
    "▁▄▂▄▁",
    "▂▄▆▄▂",
    "▄▆█▆▄",
    "▂▄▆▄▂",
    "▁▄▂▄▁",
    "▁▂▂▂▁",
];

/// A progress bar sized to the number of ports in the sweep.
///
/// The scanner's completed-probe callback drives the position; the bar
/// renders nothing in quiet mode.
pub fn scan_bar(total_ports: u64, quiet: bool) -> ProgressBar {
    if quiet {
        return ProgressBar::hidden();
    }

    let bar = ProgressBar::new(total_ports);
    let style = ProgressStyle::with_template("{spinner:.blue} probing {pos}/{len} ports")
        .unwrap()
        .tick_strings(TICK_STRINGS);

    bar.set_style(style);
    bar.enable_steady_tick(Duration::from_millis(100));
    bar
}
