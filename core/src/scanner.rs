//! # Bounded-Concurrency Range Scanner
//!
//! Sweeps every port in an inclusive interval against one host, running
//! [`Prober`] invocations under a semaphore cap, and folds the
//! classifications into a single ordered result.
//!
//! Lifecycle per scan: validate synchronously, sweep with at most
//! `concurrency` probes in flight, aggregate `Open` ports ascending.
//! A scan either completes the full sweep or is abandoned through its
//! [`CancelToken`]; there is no partial result and no scan-level
//! network failure.

use std::pin::pin;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use tokio::sync::{Notify, Semaphore};
use tokio::task::JoinSet;
use tracing::debug;

use netpro_common::config::Settings;
use netpro_common::error::ScanError;
use netpro_common::network::port::PortRange;

use crate::probe::{PortState, ProbeOutcome, Prober, TcpProber};

/// Slack on top of the per-probe timeout before the sweeper gives up on
/// a probe invocation wholesale. [`TcpProber`] bounds itself; this
/// backstop only matters for a foreign [`Prober`] that ignores its
/// timeout, and keeps the per-port wait a hard bound either way.
const PROBE_GRACE: Duration = Duration::from_millis(250);

/// A validated, immutable scan request.
///
/// Construction is the validation step: a value of this type always
/// holds a non-empty host and a well-formed port interval.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanRequest {
    host: String,
    ports: PortRange,
}

impl ScanRequest {
    /// Validates synchronously; an invalid request performs no probing.
    ///
    /// The host may be a hostname or an IP literal. Whether it resolves
    /// is the transport's business, not validation's; only emptiness is
    /// rejected here.
    pub fn new(
        host: impl Into<String>,
        start_port: u16,
        end_port: u16,
    ) -> Result<Self, ScanError> {
        let host = host.into();
        if host.trim().is_empty() {
            return Err(ScanError::EmptyHost);
        }

        let ports = PortRange::new(start_port, end_port)?;
        Ok(Self { host, ports })
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn ports(&self) -> PortRange {
        self.ports
    }
}

/// The aggregate of one full sweep; owned by the caller once returned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanResult {
    pub host: String,
    pub start_port: u16,
    pub end_port: u16,
    /// Ascending and duplicate-free: each port is probed exactly once
    /// and completion order is discarded by an explicit sort.
    pub open_ports: Vec<u16>,
}

/// A sweep runs to completion or is abandoned; never anything between.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanOutcome {
    Complete(ScanResult),
    Cancelled,
}

/// Cooperative stop signal shared between a scan and its caller.
///
/// Cancelling abandons in-flight probes and dispatches no further
/// ports; the sweep reports [`ScanOutcome::Cancelled`] instead of a
/// result.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    inner: Arc<CancelInner>,
}

#[derive(Debug, Default)]
struct CancelInner {
    stop: AtomicBool,
    notify: Notify,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.inner.stop.store(true, Ordering::Relaxed);
        self.inner.notify.notify_waiters();
    }

    pub fn is_cancelled(&self) -> bool {
        self.inner.stop.load(Ordering::Relaxed)
    }

    /// Resolves once [`cancel`](Self::cancel) has been called.
    pub async fn cancelled(&self) {
        if self.is_cancelled() {
            return;
        }

        let mut notified = pin!(self.inner.notify.notified());
        // Register interest before the re-check so a cancel landing in
        // between cannot be missed.
        notified.as_mut().enable();
        if self.is_cancelled() {
            return;
        }

        notified.await;
    }
}

type ProgressFn = dyn Fn(usize) + Send + Sync;

/// Sweeps an inclusive port interval with bounded concurrency.
///
/// Holds no per-scan state; the same scanner can run any number of
/// independent sweeps.
pub struct PortScanner {
    prober: Arc<dyn Prober>,
    probe_timeout: Duration,
    concurrency: usize,
    cancel: CancelToken,
    on_probe_done: Option<Arc<ProgressFn>>,
}

impl PortScanner {
    pub fn new(probe_timeout: Duration, concurrency: usize) -> Self {
        Self {
            prober: Arc::new(TcpProber),
            probe_timeout,
            // A cap of zero would starve the sweep forever.
            concurrency: concurrency.max(1),
            cancel: CancelToken::new(),
            on_probe_done: None,
        }
    }

    /// Builds a scanner from the persisted settings store.
    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(
            Duration::from_millis(settings.port_scan_timeout),
            settings.port_scan_concurrency,
        )
    }

    /// Swaps the transport probe.
    pub fn with_prober(mut self, prober: Arc<dyn Prober>) -> Self {
        self.prober = prober;
        self
    }

    pub fn with_cancel_token(mut self, cancel: CancelToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// Registers a callback invoked with the running count of completed
    /// probes.
    pub fn with_progress(mut self, on_probe_done: Box<dyn Fn(usize) + Send + Sync>) -> Self {
        self.on_probe_done = Some(Arc::from(on_probe_done));
        self
    }

    /// Runs the full sweep: every port in the interval is probed
    /// exactly once, with at most `concurrency` probes in flight at any
    /// instant.
    pub async fn scan(&self, request: &ScanRequest) -> ScanOutcome {
        let range = request.ports();
        debug!("sweeping {} ports on {}", range.len(), request.host());

        let semaphore = Arc::new(Semaphore::new(self.concurrency));
        let done_count = Arc::new(AtomicUsize::new(0));
        let mut tasks: JoinSet<Option<ProbeOutcome>> = JoinSet::new();

        for port in range.to_iter() {
            let semaphore = Arc::clone(&semaphore);
            let prober = Arc::clone(&self.prober);
            let cancel = self.cancel.clone();
            let host = request.host().to_string();
            let probe_timeout = self.probe_timeout;
            let done_count = Arc::clone(&done_count);
            let on_probe_done = self.on_probe_done.clone();

            tasks.spawn(async move {
                // A closed semaphore means the sweep was abandoned
                // while this port was still queued.
                let Ok(_permit) = semaphore.acquire_owned().await else {
                    return None;
                };
                if cancel.is_cancelled() {
                    return None;
                }

                let state = match tokio::time::timeout(
                    probe_timeout + PROBE_GRACE,
                    prober.probe(&host, port, probe_timeout),
                )
                .await
                {
                    Ok(state) => state,
                    Err(_elapsed) => PortState::Unreachable,
                };

                let done = done_count.fetch_add(1, Ordering::Relaxed) + 1;
                if let Some(callback) = on_probe_done {
                    callback(done);
                }

                Some(ProbeOutcome { port, state })
            });
        }

        let mut open_ports: Vec<u16> = Vec::new();

        loop {
            tokio::select! {
                _ = self.cancel.cancelled() => {
                    semaphore.close();
                    tasks.abort_all();
                    debug!(
                        "sweep of {} abandoned with {} ports outstanding",
                        request.host(),
                        tasks.len()
                    );
                    return ScanOutcome::Cancelled;
                }

                joined = tasks.join_next() => {
                    match joined {
                        None => break,
                        Some(Ok(Some(outcome))) if outcome.state == PortState::Open => {
                            open_ports.push(outcome.port);
                        }
                        Some(_) => {}
                    }
                }
            }
        }

        // A cancel can race the final join; the contract is a full
        // sweep or nothing, so it still wins.
        if self.cancel.is_cancelled() {
            return ScanOutcome::Cancelled;
        }

        // Completion order is scheduler-dependent; the output order
        // must not be.
        open_ports.sort_unstable();

        ScanOutcome::Complete(ScanResult {
            host: request.host().to_string(),
            start_port: range.start,
            end_port: range.end,
            open_ports,
        })
    }
}

/// One-call convenience: sweep with the persisted settings and the
/// stock TCP prober.
pub async fn scan_ports(
    host: &str,
    start_port: u16,
    end_port: u16,
) -> Result<ScanResult, ScanError> {
    let request = ScanRequest::new(host, start_port, end_port)?;
    let scanner = PortScanner::from_settings(&Settings::load());

    match scanner.scan(&request).await {
        ScanOutcome::Complete(result) => Ok(result),
        // No cancel handle escapes this function, so this arm is
        // unreachable in practice.
        ScanOutcome::Cancelled => Err(ScanError::Cancelled),
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

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::sync::Mutex;
    use std::time::Instant;

    /// Records every probed port and answers from a fixed open set;
    /// every other port alternates between the two non-open states.
    #[derive(Default)]
    struct RecordingProber {
        open: HashSet<u16>,
        calls: Mutex<Vec<u16>>,
    }

    impl RecordingProber {
        fn with_open(open: impl IntoIterator<Item = u16>) -> Self {
            Self {
                open: open.into_iter().collect(),
                calls: Mutex::new(Vec::new()),
            }
        }

        fn calls(&self) -> Vec<u16> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait::async_trait]
    impl Prober for RecordingProber {
        async fn probe(&self, _host: &str, port: u16, _probe_timeout: Duration) -> PortState {
            self.calls.lock().unwrap().push(port);
            if self.open.contains(&port) {
                PortState::Open
            } else if port % 2 == 0 {
                PortState::Closed
            } else {
                PortState::Unreachable
            }
        }
    }

    /// Tracks the peak number of concurrently outstanding probes.
    #[derive(Default)]
    struct GaugeProber {
        in_flight: AtomicUsize,
        peak: AtomicUsize,
    }

    #[async_trait::async_trait]
    impl Prober for GaugeProber {
        async fn probe(&self, _host: &str, _port: u16, _probe_timeout: Duration) -> PortState {
            let current = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.peak.fetch_max(current, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_millis(15)).await;
            self.in_flight.fetch_sub(1, Ordering::SeqCst);
            PortState::Closed
        }
    }

    /// Completes low ports last so results arrive in reverse port
    /// order.
    struct ReversingProber {
        slowest: u16,
    }

    #[async_trait::async_trait]
    impl Prober for ReversingProber {
        async fn probe(&self, _host: &str, port: u16, _probe_timeout: Duration) -> PortState {
            let rank = u64::from(self.slowest.saturating_sub(port));
            tokio::time::sleep(Duration::from_millis(rank * 2)).await;
            PortState::Open
        }
    }

    /// Never resolves on its own; only the sweeper's backstop timeout
    /// gets rid of it.
    struct NeverProber;

    #[async_trait::async_trait]
    impl Prober for NeverProber {
        async fn probe(&self, _host: &str, _port: u16, _probe_timeout: Duration) -> PortState {
            std::future::pending::<()>().await;
            unreachable!("pending future resolved");
        }
    }

    /// Holds every probe until the test cancels the scan, counting how
    /// many were ever dispatched.
    struct StallingProber {
        dispatched: AtomicUsize,
    }

    #[async_trait::async_trait]
    impl Prober for StallingProber {
        async fn probe(&self, _host: &str, _port: u16, _probe_timeout: Duration) -> PortState {
            self.dispatched.fetch_add(1, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_secs(60)).await;
            PortState::Closed
        }
    }

    fn scanner_with(prober: Arc<dyn Prober>, concurrency: usize) -> PortScanner {
        PortScanner::new(Duration::from_millis(100), concurrency).with_prober(prober)
    }

    fn expect_complete(outcome: ScanOutcome) -> ScanResult {
        match outcome {
            ScanOutcome::Complete(result) => result,
            ScanOutcome::Cancelled => panic!("sweep was unexpectedly cancelled"),
        }
    }

    #[test]
    fn request_validation_rejects_bad_input() {
        assert_eq!(
            ScanRequest::new("", 1, 10).unwrap_err(),
            ScanError::EmptyHost
        );
        assert_eq!(
            ScanRequest::new("   ", 1, 10).unwrap_err(),
            ScanError::EmptyHost
        );
        assert_eq!(
            ScanRequest::new("host", 50, 10).unwrap_err(),
            ScanError::InvertedRange { start: 50, end: 10 }
        );
        assert_eq!(
            ScanRequest::new("host", 0, 10).unwrap_err(),
            ScanError::PortZero
        );

        assert!(ScanRequest::new("host", 1, 10).is_ok());
        assert!(ScanRequest::new("host", 1, 65535).is_ok());
    }

    #[tokio::test]
    async fn sweep_probes_every_port_exactly_once() {
        let stub = Arc::new(RecordingProber::default());
        let scanner = scanner_with(stub.clone(), 16);
        let request = ScanRequest::new("stub", 1, 100).unwrap();

        expect_complete(scanner.scan(&request).await);

        let mut calls = stub.calls();
        assert_eq!(calls.len(), 100);
        calls.sort_unstable();
        calls.dedup();
        assert_eq!(calls, (1..=100).collect::<Vec<u16>>());
    }

    #[tokio::test]
    async fn open_ports_are_ascending_regardless_of_completion_order() {
        let stub = Arc::new(ReversingProber { slowest: 40 });
        let scanner = scanner_with(stub, 40);
        let request = ScanRequest::new("stub", 1, 40).unwrap();

        let result = expect_complete(scanner.scan(&request).await);

        assert_eq!(result.open_ports, (1..=40).collect::<Vec<u16>>());
        assert!(result.open_ports.windows(2).all(|w| w[0] < w[1]));
    }

    #[tokio::test]
    async fn in_flight_probes_never_exceed_the_cap() {
        let stub = Arc::new(GaugeProber::default());
        let scanner = scanner_with(stub.clone(), 5);
        let request = ScanRequest::new("stub", 1, 60).unwrap();

        expect_complete(scanner.scan(&request).await);

        assert!(
            stub.peak.load(Ordering::SeqCst) <= 5,
            "peak concurrency {} exceeded the cap",
            stub.peak.load(Ordering::SeqCst)
        );
    }

    #[tokio::test]
    async fn only_open_classifications_reach_the_result() {
        let open = [7u16, 22, 80, 81, 100];
        let stub = Arc::new(RecordingProber::with_open(open));
        let scanner = scanner_with(stub, 8);
        let request = ScanRequest::new("stub", 1, 100).unwrap();

        let result = expect_complete(scanner.scan(&request).await);

        assert_eq!(result.open_ports, open.to_vec());
        assert_eq!(result.host, "stub");
        assert_eq!(result.start_port, 1);
        assert_eq!(result.end_port, 100);
    }

    #[tokio::test]
    async fn repeated_sweeps_against_a_stable_stub_are_identical() {
        let stub = Arc::new(RecordingProber::with_open([5u16, 25, 50]));
        let scanner = scanner_with(stub, 8);
        let request = ScanRequest::new("stub", 1, 50).unwrap();

        let first = expect_complete(scanner.scan(&request).await);
        let second = expect_complete(scanner.scan(&request).await);

        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn stalled_probes_cannot_hang_the_sweep() {
        let scanner =
            PortScanner::new(Duration::from_millis(50), 10).with_prober(Arc::new(NeverProber));
        let request = ScanRequest::new("stub", 1, 20).unwrap();

        let outcome = tokio::time::timeout(Duration::from_secs(5), scanner.scan(&request))
            .await
            .expect("sweep did not finish within the per-probe timeout bound");

        let result = expect_complete(outcome);
        assert!(result.open_ports.is_empty());
    }

    #[tokio::test]
    async fn cancellation_abandons_the_sweep_without_a_result() {
        let stub = Arc::new(StallingProber {
            dispatched: AtomicUsize::new(0),
        });
        let token = CancelToken::new();
        let scanner = PortScanner::new(Duration::from_secs(120), 4)
            .with_prober(stub.clone() as Arc<dyn Prober>)
            .with_cancel_token(token.clone());
        let request = ScanRequest::new("stub", 1, 100).unwrap();

        let scan = tokio::spawn(async move { scanner.scan(&request).await });
        tokio::time::sleep(Duration::from_millis(50)).await;

        let started = Instant::now();
        token.cancel();
        let outcome = scan.await.unwrap();

        assert_eq!(outcome, ScanOutcome::Cancelled);
        // In-flight probes are abandoned, not waited out.
        assert!(started.elapsed() < Duration::from_secs(5));

        // No further probes may be dispatched once cancellation has
        // been observed.
        let dispatched = stub.dispatched.load(Ordering::SeqCst);
        assert!(dispatched <= 4, "more probes in flight than the cap");
        tokio::time::sleep(Duration::from_millis(100)).await;
        assert_eq!(stub.dispatched.load(Ordering::SeqCst), dispatched);
    }

    #[tokio::test]
    async fn cancelling_before_the_sweep_dispatches_nothing() {
        let stub = Arc::new(RecordingProber::default());
        let token = CancelToken::new();
        token.cancel();

        let scanner = scanner_with(stub.clone(), 8).with_cancel_token(token);
        let request = ScanRequest::new("stub", 1, 50).unwrap();

        assert_eq!(scanner.scan(&request).await, ScanOutcome::Cancelled);
        assert!(stub.calls().is_empty());
    }
}
