use std::time::{Duration, Instant};

use colored::*;

use netpro_common::config::Settings;
use netpro_common::network::port::PortSelection;
use netpro_common::network::service;
use netpro_common::{success, warn};
use netpro_core::scanner::{CancelToken, PortScanner, ScanOutcome, ScanRequest, ScanResult};

use crate::terminal::{colors, print, progress};

type Detail = (String, ColoredString);

pub async fn scan(
    host: String,
    ports: PortSelection,
    timeout_override: Option<u64>,
    concurrency_override: Option<usize>,
    quiet: bool,
) -> anyhow::Result<()> {
    let mut settings = Settings::load();
    if let Some(timeout) = timeout_override {
        settings.port_scan_timeout = timeout;
    }
    if let Some(concurrency) = concurrency_override {
        settings.port_scan_concurrency = concurrency;
    }

    let token = CancelToken::new();
    install_interrupt_handler(token.clone());

    let start_time: Instant = Instant::now();
    let mut results: Vec<ScanResult> = Vec::new();

    for range in ports.ranges() {
        let request = ScanRequest::new(host.as_str(), range.start, range.end)?;

        let bar = progress::scan_bar(range.len() as u64, quiet);
        let bar_handle = bar.clone();
        let scanner = PortScanner::from_settings(&settings)
            .with_cancel_token(token.clone())
            .with_progress(Box::new(move |done| bar_handle.set_position(done as u64)));

        let outcome = scanner.scan(&request).await;
        bar.finish_and_clear();

        match outcome {
            ScanOutcome::Complete(result) => results.push(result),
            ScanOutcome::Cancelled => {
                warn!("scan aborted, partial sweep discarded");
                return Ok(());
            }
        }
    }

    scan_ends(&host, &results, start_time.elapsed(), quiet);
    Ok(())
}

/// Ctrl-C abandons the sweep instead of killing the process mid-probe.
fn install_interrupt_handler(token: CancelToken) {
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            token.cancel();
        }
    });
}

fn scan_ends(host: &str, results: &[ScanResult], total_time: Duration, quiet: bool) {
    let open_total: usize = results.iter().map(|r| r.open_ports.len()).sum();

    print::header("scan results", quiet);

    if open_total == 0 {
        print::no_results();
    } else {
        for (idx, result) in results.iter().enumerate() {
            print_result_tree(result, idx);
        }
    }

    print_summary(host, results, open_total, total_time, quiet);
}

fn print_result_tree(result: &ScanResult, idx: usize) {
    if result.open_ports.is_empty() {
        return;
    }

    let label: String = format!(
        "{} ports {}-{}",
        result.host, result.start_port, result.end_port
    );
    print::tree_head(idx, &label);

    let details: Vec<Detail> = result
        .open_ports
        .iter()
        .map(|port| {
            let value: ColoredString = match service::name_for(*port) {
                Some(name) => format!("open  {name}").color(colors::PORT_OPEN),
                None => "open".color(colors::PORT_OPEN),
            };
            (format!(":{port}"), value)
        })
        .collect();

    print::as_tree_one_level(details);
}

fn print_summary(
    host: &str,
    results: &[ScanResult],
    open_total: usize,
    total_time: Duration,
    quiet: bool,
) {
    let probed: usize = results
        .iter()
        .map(|r| usize::from(r.end_port - r.start_port) + 1)
        .sum();

    let open_str: ColoredString = format!("{open_total} open ports").bold().green();
    let time_str: ColoredString = format!("{:.2}s", total_time.as_secs_f64()).bold().yellow();
    let output: String = format!("{host}: {open_str} out of {probed} probed in {time_str}");

    if quiet {
        success!("{}", output);
    } else {
        print::fat_separator();
        print::centerln(&output);
    }
}
