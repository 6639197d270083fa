//! crates/logging/src/record.rs
//! Rendering of a single log line.

use std::fmt::{self, Write as _};
use std::thread::{self, ThreadId};

use time::OffsetDateTime;

use super::call_site::CallSite;
use super::severity::Severity;
use super::timestamp::write_timestamp;

/// Largest message body, in bytes, kept in a record. Longer output is
/// silently cut at the last UTF-8 character boundary that fits.
pub const MAX_MESSAGE_LEN: usize = 8195;

/// One log line, alive only for the duration of an emit call.
///
/// Rendered as
/// `<timestamp> <TAG> [{thread_id:<id>} ]<file> [<line>] <function>(): <message>`.
#[derive(Clone, Copy, Debug)]
pub struct Record<'a> {
    severity: Severity,
    call_site: CallSite,
    timestamp: OffsetDateTime,
    thread: Option<ThreadId>,
    message: fmt::Arguments<'a>,
}

impl<'a> Record<'a> {
    /// Builds a record stamped with `timestamp`.
    ///
    /// TRACE records capture the calling thread's identifier.
    #[must_use]
    pub fn new(
        severity: Severity,
        call_site: CallSite,
        timestamp: OffsetDateTime,
        message: fmt::Arguments<'a>,
    ) -> Self {
        let thread = (severity == Severity::Trace).then(|| thread::current().id());
        Self {
            severity,
            call_site,
            timestamp,
            thread,
            message,
        }
    }

    /// Severity of the record.
    #[must_use]
    pub const fn severity(&self) -> Severity {
        self.severity
    }

    /// Where the record was emitted.
    #[must_use]
    pub const fn call_site(&self) -> CallSite {
        self.call_site
    }

    /// Thread identifier, present on TRACE records only.
    #[must_use]
    pub const fn thread(&self) -> Option<ThreadId> {
        self.thread
    }

    /// Appends the rendered line, without a trailing newline, to `out`.
    pub fn render_into(&self, out: &mut String) -> fmt::Result {
        write_timestamp(out, self.timestamp)?;
        write!(out, " {} ", self.severity.tag())?;
        if let Some(thread) = self.thread {
            out.push_str("{thread_id:");
            write_thread_id(out, thread)?;
            out.push_str("} ");
        }
        write!(
            out,
            "{} [{}] {}(): ",
            self.call_site.file(),
            self.call_site.line(),
            self.call_site.function()
        )?;
        BoundedWriter::new(out, MAX_MESSAGE_LEN).write_fmt(self.message)
    }
}

/// Writes the numeric part of a `ThreadId`'s debug form (`ThreadId(7)` -> `7`).
fn write_thread_id(out: &mut String, thread: ThreadId) -> fmt::Result {
    let start = out.len();
    write!(out, "{thread:?}")?;
    let rendered = out[start..].to_string();
    let digits = rendered
        .strip_prefix("ThreadId(")
        .and_then(|rest| rest.strip_suffix(')'));
    if let Some(digits) = digits {
        out.truncate(start);
        out.push_str(digits);
    }
    Ok(())
}

/// `fmt::Write` adapter that stops appending once `remaining` bytes are used.
struct BoundedWriter<'a> {
    out: &'a mut String,
    remaining: usize,
}

impl<'a> BoundedWriter<'a> {
    fn new(out: &'a mut String, limit: usize) -> Self {
        Self {
            out,
            remaining: limit,
        }
    }
}

impl fmt::Write for BoundedWriter<'_> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        if s.len() <= self.remaining {
            self.out.push_str(s);
            self.remaining -= s.len();
            return Ok(());
        }

        let mut cut = self.remaining;
        while !s.is_char_boundary(cut) {
            cut -= 1;
        }
        self.out.push_str(&s[..cut]);
        self.remaining = 0;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    fn at() -> OffsetDateTime {
        datetime!(2024-10-19 05:00:07 UTC)
            .replace_nanosecond(500_000_000)
            .expect("valid nanosecond")
    }

    fn render(record: &Record<'_>) -> String {
        let mut out = String::new();
        record.render_into(&mut out).expect("render");
        out
    }

    #[test]
    fn renders_non_trace_layout() {
        let site = CallSite::new("src/app.rs", 12, "start");
        let line = render(&Record::new(
            Severity::Warn,
            site,
            at(),
            format_args!("disk {}% full", 91),
        ));
        assert_eq!(
            line,
            "Oct 19 05:00:07.500000000 WRN src/app.rs [12] start(): disk 91% full"
        );
    }

    #[test]
    fn only_trace_records_capture_the_thread() {
        let site = CallSite::new("src/app.rs", 3, "poll");
        for severity in Severity::ALL {
            let thread = Record::new(severity, site, at(), format_args!("tick")).thread();
            if severity == Severity::Trace {
                assert_eq!(thread, Some(thread::current().id()));
            } else {
                assert!(thread.is_none());
            }
        }
    }

    #[test]
    fn trace_records_render_thread_id() {
        let site = CallSite::new("src/app.rs", 3, "poll");
        let line = render(&Record::new(Severity::Trace, site, at(), format_args!("tick")));

        assert!(line.starts_with("Oct 19 05:00:07.500000000 TRC {thread_id:"));
        assert!(line.ends_with("} src/app.rs [3] poll(): tick"));
        assert!(!line.contains("ThreadId("));
    }

    #[test]
    fn long_messages_are_truncated() {
        let site = CallSite::new("f.rs", 1, "f");
        let body = "x".repeat(MAX_MESSAGE_LEN + 100);
        let line = render(&Record::new(Severity::Info, site, at(), format_args!("{body}")));
        let message = line.split_once("f(): ").expect("prefix").1;
        assert_eq!(message.len(), MAX_MESSAGE_LEN);
    }

    #[test]
    fn truncation_respects_char_boundaries() {
        let mut out = String::new();
        let mut writer = BoundedWriter::new(&mut out, 5);
        writer.write_str("ab\u{e9}\u{e9}").expect("write");
        writer.write_str("ignored").expect("write");
        assert_eq!(out, "ab\u{e9}");
    }
}
