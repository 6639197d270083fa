//! crates/logging/src/logger.rs
//! Logging context owning the threshold and the output streams.

use std::fmt;
use std::io::{self, Write};
use std::sync::{Mutex, MutexGuard, PoisonError};

use logging_sink::{Destination, LogSink};
use time::UtcOffset;

use super::call_site::CallSite;
use super::level_store::LevelStore;
use super::record::Record;
use super::severity::Severity;
use super::timestamp::Clock;

type BoxedWriter = Box<dyn Write + Send>;

/// Both streams live behind the same lock so a diagnostic never lands in the
/// middle of a record, even when they share a terminal.
struct Streams {
    records: LogSink<BoxedWriter>,
    diagnostics: LogSink<BoxedWriter>,
}

/// Explicit logging context.
///
/// A `Logger` owns the [`LevelStore`] consulted by every call and the sinks
/// records are written to. Share it between threads with an
/// [`Arc`](std::sync::Arc); level listeners receive the same handle and are
/// the usual writers of the threshold.
///
/// Each record is gated, rendered and written while holding one mutex, which
/// also guards the reusable formatting buffer, so concurrent callers never
/// interleave bytes of two records.
///
/// # Examples
///
/// ```
/// use logging::{info_log, trace_log, Logger, Severity};
/// use logging_sink::CaptureBuffer;
///
/// let output = CaptureBuffer::new();
/// let logger = Logger::builder()
///     .threshold(Severity::Info)
///     .output(output.clone())
///     .build();
///
/// assert!(info_log!(logger, "listening on port {}", 43555));
/// assert!(!trace_log!(logger, "not emitted at INFO"));
///
/// let lines = output.lines();
/// assert_eq!(lines.len(), 1);
/// assert!(lines[0].contains(" INF "));
/// assert!(lines[0].ends_with("(): listening on port 43555"));
/// ```
pub struct Logger {
    store: LevelStore,
    clock: Clock,
    streams: Mutex<Streams>,
}

impl Logger {
    /// Creates a logger with the compile-time defaults: threshold
    /// [`Severity::DEFAULT`], records on [`Destination::DEFAULT`] and
    /// diagnostics on standard error.
    #[must_use]
    pub fn new() -> Self {
        Self::builder().build()
    }

    /// Starts building a logger.
    #[must_use]
    pub fn builder() -> LoggerBuilder {
        LoggerBuilder::default()
    }

    /// Threshold storage shared with level listeners.
    #[must_use]
    pub const fn store(&self) -> &LevelStore {
        &self.store
    }

    /// Current threshold.
    pub fn threshold(&self) -> Severity {
        self.store.get()
    }

    /// Replaces the threshold.
    pub fn set_threshold(&self, threshold: Severity) {
        self.store.set(threshold);
    }

    /// Reports whether a record at `severity` would currently be emitted.
    pub fn enabled(&self, severity: Severity) -> bool {
        self.store.enabled(severity)
    }

    fn lock_streams(&self) -> MutexGuard<'_, Streams> {
        self.streams.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Emits a record if `severity` passes the current threshold.
    ///
    /// Returns `true` when the record passed the gate. Write failures are
    /// swallowed; logging never fails the caller.
    pub fn emit(&self, severity: Severity, call_site: CallSite, message: fmt::Arguments<'_>) -> bool {
        if !self.store.enabled(severity) {
            return false;
        }

        let mut streams = self.lock_streams();
        let record = Record::new(severity, call_site, self.clock.now(), message);
        let _ = streams.records.write_line(|line| record.render_into(line));
        true
    }

    /// Writes a record to the diagnostics stream regardless of the threshold.
    ///
    /// Used for failures of the logging machinery itself, such as a level
    /// listener that could not bind its socket.
    pub fn diagnostic(&self, severity: Severity, call_site: CallSite, message: fmt::Arguments<'_>) {
        let mut streams = self.lock_streams();
        let record = Record::new(severity, call_site, self.clock.now(), message);
        let _ = streams.diagnostics.write_line(|line| record.render_into(line));
    }

    /// Flushes both streams.
    pub fn flush(&self) -> io::Result<()> {
        let mut streams = self.lock_streams();
        streams.records.flush()?;
        streams.diagnostics.flush()
    }
}

impl Default for Logger {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger")
            .field("threshold", &self.store.get())
            .field("clock", &self.clock)
            .finish_non_exhaustive()
    }
}

/// Builder for [`Logger`].
///
/// Unset fields fall back to the compile-time defaults described on
/// [`Logger::new`].
#[derive(Default)]
pub struct LoggerBuilder {
    threshold: Option<Severity>,
    destination: Option<Destination>,
    output: Option<BoxedWriter>,
    diagnostics: Option<BoxedWriter>,
    offset: Option<UtcOffset>,
}

impl LoggerBuilder {
    /// Initial threshold, overriding [`Severity::DEFAULT`].
    pub fn threshold(mut self, threshold: Severity) -> Self {
        self.threshold = Some(threshold);
        self
    }

    /// Standard stream for records. Ignored when [`output`](Self::output) is set.
    pub fn destination(mut self, destination: Destination) -> Self {
        self.destination = Some(destination);
        self
    }

    /// Arbitrary writer for records.
    pub fn output<W>(mut self, writer: W) -> Self
    where
        W: Write + Send + 'static,
    {
        self.output = Some(Box::new(writer));
        self
    }

    /// Arbitrary writer for diagnostics (standard error by default).
    pub fn diagnostics<W>(mut self, writer: W) -> Self
    where
        W: Write + Send + 'static,
    {
        self.diagnostics = Some(Box::new(writer));
        self
    }

    /// Fixed UTC offset for timestamps instead of the local offset.
    pub fn utc_offset(mut self, offset: UtcOffset) -> Self {
        self.offset = Some(offset);
        self
    }

    /// Finishes the logger.
    #[must_use]
    pub fn build(self) -> Logger {
        let records = self
            .output
            .unwrap_or_else(|| self.destination.unwrap_or_default().open());
        let diagnostics = self
            .diagnostics
            .unwrap_or_else(|| Destination::Stderr.open());
        let clock = self.offset.map_or_else(Clock::local, Clock::with_offset);

        Logger {
            store: LevelStore::new(self.threshold.unwrap_or_default()),
            clock,
            streams: Mutex::new(Streams {
                records: LogSink::new(records),
                diagnostics: LogSink::new(diagnostics),
            }),
        }
    }
}

impl fmt::Debug for LoggerBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoggerBuilder")
            .field("threshold", &self.threshold)
            .field("destination", &self.destination)
            .field("custom_output", &self.output.is_some())
            .field("custom_diagnostics", &self.diagnostics.is_some())
            .field("offset", &self.offset)
            .finish()
    }
}
