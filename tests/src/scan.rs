use std::time::Duration;

use tokio::net::TcpListener;

use netpro_common::error::ScanError;
use netpro_core::scanner::{CancelToken, PortScanner, ScanOutcome, ScanRequest, scan_ports};

fn expect_complete(outcome: ScanOutcome) -> netpro_core::scanner::ScanResult {
    match outcome {
        ScanOutcome::Complete(result) => result,
        ScanOutcome::Cancelled => panic!("sweep was unexpectedly cancelled"),
    }
}

/// A single-port sweep against a real loopback listener classifies it
/// open.
#[tokio::test]
async fn sweep_finds_loopback_listener() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();

    let request = ScanRequest::new("127.0.0.1", port, port).unwrap();
    let scanner = PortScanner::new(Duration::from_millis(500), 16);

    let result = expect_complete(scanner.scan(&request).await);

    assert_eq!(result.host, "127.0.0.1");
    assert_eq!(result.open_ports, vec![port]);
    drop(listener);
}

/// An interval around the listener reports it among the open ports, in
/// ascending order. Neighboring ports may or may not be in use by the
/// host system; the listener itself must always appear.
#[tokio::test]
async fn sweep_reports_listener_within_interval() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();

    let start = port - 2;
    let end = port + 2;
    let request = ScanRequest::new("127.0.0.1", start, end).unwrap();
    let scanner = PortScanner::new(Duration::from_millis(500), 8);

    let result = expect_complete(scanner.scan(&request).await);

    assert_eq!(result.start_port, start);
    assert_eq!(result.end_port, end);
    assert!(result.open_ports.contains(&port));
    assert!(result.open_ports.windows(2).all(|w| w[0] < w[1]));
    drop(listener);
}

/// Validation failures surface synchronously through the public entry
/// points, before any socket is touched.
#[tokio::test]
async fn validation_errors_surface_through_the_public_api() {
    assert_eq!(
        ScanRequest::new("", 1, 10).unwrap_err(),
        ScanError::EmptyHost
    );
    assert!(ScanRequest::new("localhost", 50, 10).is_err());
    assert!(ScanRequest::new("localhost", 0, 10).is_err());

    assert_eq!(scan_ports("", 1, 10).await.unwrap_err(), ScanError::EmptyHost);
}

/// A cancelled sweep delivers no result at all.
#[tokio::test]
async fn cancelled_sweep_yields_no_result() {
    let token = CancelToken::new();
    token.cancel();

    let scanner = PortScanner::new(Duration::from_millis(200), 32).with_cancel_token(token);
    let request = ScanRequest::new("127.0.0.1", 1, 200).unwrap();

    assert_eq!(scanner.scan(&request).await, ScanOutcome::Cancelled);
}
