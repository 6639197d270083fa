//! End-to-end behavior of the TCP level listener.

use std::io::Write;
use std::net::{SocketAddr, TcpStream};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use listener::{ListenerHandle, TcpConfig, spawn};
use logging::{CaptureBuffer, Logger, Severity};

fn start(initial: Severity) -> (Arc<Logger>, ListenerHandle, SocketAddr) {
    let logger = Arc::new(
        Logger::builder()
            .threshold(initial)
            .output(CaptureBuffer::new())
            .diagnostics(CaptureBuffer::new())
            .build(),
    );
    let config = TcpConfig::new("127.0.0.1:0".parse().expect("address"))
        .with_poll_interval(Duration::from_millis(10))
        .with_read_timeout(Duration::from_millis(500));
    let handle = spawn(config.into(), Arc::clone(&logger));
    let address = handle.local_addr().expect("listener bound");
    (logger, handle, address)
}

fn send(address: SocketAddr, payload: &[u8]) {
    let mut stream = TcpStream::connect(address).expect("connect");
    stream.write_all(payload).expect("write");
}

fn wait_for(logger: &Logger, expected: Severity) -> bool {
    let deadline = Instant::now() + Duration::from_secs(5);
    while Instant::now() < deadline {
        if logger.threshold() == expected {
            return true;
        }
        thread::sleep(Duration::from_millis(10));
    }
    false
}

#[test]
fn digit_three_sets_warn() {
    let (logger, handle, address) = start(Severity::Info);
    assert!(handle.is_listening());

    send(address, b"3");
    assert!(wait_for(&logger, Severity::Warn));

    handle.shutdown().expect("clean shutdown");
}

#[test]
fn ignored_bytes_leave_threshold_unchanged() {
    let (logger, handle, address) = start(Severity::Info);

    send(address, b"0");
    send(address, b"x");
    send(address, b"9");
    drop(TcpStream::connect(address).expect("connect"));
    // A valid request after the ignored ones proves they were all consumed.
    send(address, b"1");
    assert!(wait_for(&logger, Severity::Fatal));

    handle.shutdown().expect("clean shutdown");
}

#[test]
fn only_the_first_byte_of_a_connection_counts() {
    let (logger, handle, address) = start(Severity::Info);

    send(address, b"25");
    assert!(wait_for(&logger, Severity::Error));
    thread::sleep(Duration::from_millis(50));
    assert_eq!(logger.threshold(), Severity::Error);

    handle.shutdown().expect("clean shutdown");
}

#[test]
fn shutdown_stops_the_thread() {
    let (_logger, handle, _address) = start(Severity::Info);
    let started = Instant::now();
    handle.shutdown().expect("clean shutdown");
    assert!(started.elapsed() < Duration::from_secs(2));
}

#[test]
fn zero_durations_still_serve_requests() {
    let logger = Arc::new(
        Logger::builder()
            .threshold(Severity::Info)
            .output(CaptureBuffer::new())
            .diagnostics(CaptureBuffer::new())
            .build(),
    );
    let config = TcpConfig::new("127.0.0.1:0".parse().expect("address"))
        .with_poll_interval(Duration::ZERO)
        .with_read_timeout(Duration::ZERO);
    let handle = spawn(config.into(), Arc::clone(&logger));
    let address = handle.local_addr().expect("listener bound");

    // The clamped read timeout is short, so a connection accepted before its
    // byte lands may be dropped; resend until one arrives in time.
    let deadline = Instant::now() + Duration::from_secs(5);
    while logger.threshold() != Severity::Warn && Instant::now() < deadline {
        send(address, b"3");
        thread::sleep(Duration::from_millis(20));
    }
    assert_eq!(logger.threshold(), Severity::Warn);

    handle.shutdown().expect("clean shutdown");
}
