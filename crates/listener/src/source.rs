//! crates/listener/src/source.rs
//! The [`LevelSource`] seam and the serve loop shared by every variant.

use std::fmt;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, Ordering};

use logging::{Logger, Severity, diagnostic};

use super::TRACING_TARGET;
use super::control_word::ControlWordError;
use super::error::ListenerError;

/// Outcome of waiting once for a control message.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Step {
    /// A valid request for this process; the serve loop applies it.
    Set(Severity),
    /// A message arrived but asks for nothing.
    Ignored(IgnoreReason),
    /// A message arrived that is not a control message at all.
    Rejected(ControlWordError),
    /// The poll interval elapsed without a message.
    Idle,
}

/// Why a received message left the threshold unchanged.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum IgnoreReason {
    /// The application mask does not include this process.
    NotAddressed,
    /// The requested rank is `0` or at least [`Severity::INVALID_RANK`].
    InvalidRank(u8),
    /// A TCP byte that is not a digit.
    NotADigit(u8),
    /// The TCP client closed the connection without sending anything.
    NoData,
    /// Reading the TCP level byte failed or timed out.
    ReadFailed,
}

impl fmt::Display for IgnoreReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotAddressed => f.write_str("not addressed to this application"),
            Self::InvalidRank(rank) => write!(f, "rank {rank} is not a severity"),
            Self::NotADigit(byte) => write!(f, "byte {byte:#04x} is not a digit"),
            Self::NoData => f.write_str("connection closed without data"),
            Self::ReadFailed => f.write_str("failed to read level byte"),
        }
    }
}

/// Maps a raw rank to a step: ranks `1..=5` set the threshold, anything
/// else is ignored.
#[must_use]
pub fn step_for_rank(rank: u8) -> Step {
    Severity::from_rank(rank).map_or(Step::Ignored(IgnoreReason::InvalidRank(rank)), Step::Set)
}

/// Transport delivering threshold requests.
///
/// Implementations block for at most one poll interval per call so the
/// serve loop can observe shutdown requests between calls.
pub trait LevelSource {
    /// Short variant name, e.g. `tcp`.
    fn name(&self) -> &'static str;

    /// Address the source is bound to.
    fn local_addr(&self) -> Option<SocketAddr>;

    /// Waits for the next control message.
    ///
    /// # Errors
    ///
    /// Returns a [`ListenerError`] for failures that end the listener.
    fn poll(&mut self) -> Result<Step, ListenerError>;
}

/// Drives `source` until `stop` is set or the source fails.
///
/// Valid requests replace the logger's threshold. Rejected messages and
/// terminal failures are written to the logger's diagnostics stream.
///
/// # Errors
///
/// Returns the error that ended the listener.
pub fn serve<S>(source: &mut S, logger: &Logger, stop: &AtomicBool) -> Result<(), ListenerError>
where
    S: LevelSource + ?Sized,
{
    tracing::info!(
        target: TRACING_TARGET,
        variant = source.name(),
        address = ?source.local_addr(),
        "level listener started"
    );

    while !stop.load(Ordering::Acquire) {
        match source.poll() {
            Ok(Step::Set(severity)) => {
                let previous = logger.store().replace(severity);
                tracing::debug!(
                    target: TRACING_TARGET,
                    %previous,
                    current = %severity,
                    "threshold updated"
                );
            }
            Ok(Step::Ignored(reason)) => {
                tracing::debug!(target: TRACING_TARGET, %reason, "control message ignored");
            }
            Ok(Step::Rejected(error)) => {
                diagnostic!(logger, "discarding {} control message: {error}", source.name());
            }
            Ok(Step::Idle) => {}
            Err(error) => {
                diagnostic!(logger, "{} level listener stopped: {error}", source.name());
                return Err(error);
            }
        }
    }

    tracing::info!(target: TRACING_TARGET, variant = source.name(), "level listener stopped");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;
    use std::io;

    use logging::CaptureBuffer;

    use crate::error::socket_error;

    /// Replays scripted steps, then asks the loop to stop.
    struct Scripted<'a> {
        steps: VecDeque<Result<Step, ListenerError>>,
        stop: &'a AtomicBool,
    }

    impl LevelSource for Scripted<'_> {
        fn name(&self) -> &'static str {
            "scripted"
        }

        fn local_addr(&self) -> Option<SocketAddr> {
            None
        }

        fn poll(&mut self) -> Result<Step, ListenerError> {
            let next = self.steps.pop_front().unwrap_or(Ok(Step::Idle));
            if self.steps.is_empty() {
                self.stop.store(true, Ordering::Release);
            }
            next
        }
    }

    fn logger(threshold: Severity) -> (Logger, CaptureBuffer) {
        let diagnostics = CaptureBuffer::new();
        let logger = Logger::builder()
            .threshold(threshold)
            .output(CaptureBuffer::new())
            .diagnostics(diagnostics.clone())
            .build();
        (logger, diagnostics)
    }

    #[test]
    fn rank_mapping() {
        assert_eq!(step_for_rank(0), Step::Ignored(IgnoreReason::InvalidRank(0)));
        assert_eq!(step_for_rank(3), Step::Set(Severity::Warn));
        assert_eq!(step_for_rank(6), Step::Ignored(IgnoreReason::InvalidRank(6)));
    }

    #[test]
    fn applies_steps_in_order_and_keeps_going_after_rejections() {
        let (logger, diagnostics) = logger(Severity::Info);
        let stop = AtomicBool::new(false);
        let mut source = Scripted {
            steps: VecDeque::from([
                Ok(Step::Set(Severity::Error)),
                Ok(Step::Rejected(ControlWordError::MissingPrefix)),
                Ok(Step::Ignored(IgnoreReason::NotAddressed)),
                Ok(Step::Idle),
                Ok(Step::Set(Severity::Trace)),
            ]),
            stop: &stop,
        };

        serve(&mut source, &logger, &stop).expect("clean stop");

        assert_eq!(logger.threshold(), Severity::Trace);
        let lines = diagnostics.lines();
        assert_eq!(lines.len(), 1);
        assert!(lines[0].contains(" ERR "));
        assert!(lines[0].ends_with("discarding scripted control message: control word must start with \"0x\""));
    }

    #[test]
    fn terminal_errors_are_reported_and_returned() {
        let (logger, diagnostics) = logger(Severity::Warn);
        let stop = AtomicBool::new(false);
        let mut source = Scripted {
            steps: VecDeque::from([
                Err(socket_error(
                    "accept connection on",
                    "127.0.0.1:1",
                    io::Error::from(io::ErrorKind::PermissionDenied),
                )),
                Ok(Step::Set(Severity::Trace)),
            ]),
            stop: &stop,
        };

        let error = serve(&mut source, &logger, &stop).expect_err("listener failure");
        assert!(matches!(error, ListenerError::Socket { action: "accept connection on", .. }));
        assert_eq!(logger.threshold(), Severity::Warn);
        assert!(diagnostics.to_string_lossy().contains("scripted level listener stopped"));
    }

    #[test]
    fn stop_flag_set_beforehand_skips_polling() {
        let (logger, _) = logger(Severity::Info);
        let stop = AtomicBool::new(true);
        let mut source = Scripted {
            steps: VecDeque::from([Ok(Step::Set(Severity::Fatal))]),
            stop: &stop,
        };
        serve(&mut source, &logger, &stop).expect("clean stop");
        assert_eq!(logger.threshold(), Severity::Info);
    }
}
