//! crates/logging-sink/src/capture.rs
//! Shared in-memory writer for capturing rendered output.

use std::io::{self, Write};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Cloneable in-memory writer.
///
/// Every clone appends to the same buffer, which makes it possible to hand
/// one clone to a logger (that requires `Write + Send + 'static`) and keep
/// another to inspect what was written.
///
/// # Examples
///
/// ```
/// use std::io::Write;
/// use logging_sink::CaptureBuffer;
///
/// let capture = CaptureBuffer::new();
/// let mut writer = capture.clone();
/// writer.write_all(b"INF one\nINF two\n")?;
///
/// assert_eq!(capture.lines(), vec!["INF one", "INF two"]);
/// # Ok::<(), std::io::Error>(())
/// ```
#[derive(Clone, Debug, Default)]
pub struct CaptureBuffer {
    inner: Arc<Mutex<Vec<u8>>>,
}

impl CaptureBuffer {
    /// Creates an empty buffer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<u8>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Returns the captured bytes decoded as UTF-8, replacing invalid sequences.
    #[must_use]
    pub fn to_string_lossy(&self) -> String {
        String::from_utf8_lossy(&self.lock()).into_owned()
    }

    /// Returns the captured output split into lines.
    #[must_use]
    pub fn lines(&self) -> Vec<String> {
        self.to_string_lossy()
            .lines()
            .map(str::to_string)
            .collect()
    }

    /// Reports whether nothing has been captured yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Discards everything captured so far.
    pub fn clear(&self) {
        self.lock().clear();
    }
}

impl Write for CaptureBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.lock().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn write_all(&mut self, buf: &[u8]) -> io::Result<()> {
        self.lock().extend_from_slice(buf);
        Ok(())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_share_storage() {
        let capture = CaptureBuffer::new();
        let mut first = capture.clone();
        let mut second = capture.clone();

        first.write_all(b"a\n").expect("write");
        second.write_all(b"b\n").expect("write");

        assert_eq!(capture.lines(), vec!["a", "b"]);
    }

    #[test]
    fn clear_discards_output() {
        let capture = CaptureBuffer::new();
        capture.clone().write_all(b"stale").expect("write");
        capture.clear();
        assert!(capture.is_empty());
    }
}
