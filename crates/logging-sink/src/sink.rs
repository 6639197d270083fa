//! crates/logging-sink/src/sink.rs
//! Record sink that renders into a reusable scratch line.

use std::fmt;
use std::io::{self, Write};

/// Initial capacity reserved for the scratch line.
///
/// Sized to hold the largest bounded message plus its metadata prefix so the
/// buffer is allocated once for the lifetime of the sink.
pub const DEFAULT_SCRATCH_CAPACITY: usize = 8 * 1024 + 256;

/// Streaming sink that writes one complete line per record.
///
/// The sink owns the underlying writer together with a reusable scratch
/// [`String`]. Each call to [`write_line`](Self::write_line) clears the
/// scratch, lets the caller render into it, appends the terminating newline
/// when missing, and forwards the finished line with a single
/// [`Write::write_all`].
///
/// # Examples
///
/// ```
/// use std::fmt::Write as _;
/// use logging_sink::LogSink;
///
/// let mut sink = LogSink::new(Vec::new());
/// sink.write_line(|line| write!(line, "ERR code {}", 23))?;
/// assert_eq!(sink.get_ref().as_slice(), b"ERR code 23\n");
/// # Ok::<(), std::io::Error>(())
/// ```
#[derive(Debug)]
pub struct LogSink<W> {
    writer: W,
    scratch: String,
}

impl<W> LogSink<W> {
    /// Creates a sink with the default scratch capacity.
    #[must_use]
    pub fn new(writer: W) -> Self {
        Self::with_capacity(writer, DEFAULT_SCRATCH_CAPACITY)
    }

    /// Creates a sink whose scratch line reserves `capacity` bytes up front.
    #[must_use]
    pub fn with_capacity(writer: W, capacity: usize) -> Self {
        Self {
            writer,
            scratch: String::with_capacity(capacity),
        }
    }

    /// Borrows the underlying writer.
    #[must_use]
    pub fn get_ref(&self) -> &W {
        &self.writer
    }

    /// Consumes the sink and returns the wrapped writer.
    #[must_use]
    pub fn into_inner(self) -> W {
        self.writer
    }

    /// Returns the capacity currently held by the scratch line.
    #[must_use]
    pub fn scratch_capacity(&self) -> usize {
        self.scratch.capacity()
    }
}

impl<W> LogSink<W>
where
    W: Write,
{
    /// Renders a single line and writes it to the underlying writer.
    ///
    /// A formatting error reported by `render` discards the partially rendered
    /// line and surfaces as [`io::ErrorKind::Other`]; nothing reaches the
    /// writer in that case.
    pub fn write_line<F>(&mut self, render: F) -> io::Result<()>
    where
        F: FnOnce(&mut String) -> fmt::Result,
    {
        self.scratch.clear();
        render(&mut self.scratch).map_err(|_| io::Error::other("failed to render log line"))?;
        if !self.scratch.ends_with('\n') {
            self.scratch.push('\n');
        }
        self.writer.write_all(self.scratch.as_bytes())?;
        self.writer.flush()
    }

    /// Flushes the underlying writer.
    pub fn flush(&mut self) -> io::Result<()> {
        self.writer.flush()
    }
}
