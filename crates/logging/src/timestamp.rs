//! crates/logging/src/timestamp.rs
//! Local wall-clock timestamps for record prefixes.

use std::fmt::{self, Write as _};

use time::format_description::FormatItem;
use time::macros::format_description;
use time::{OffsetDateTime, UtcOffset};

/// Second-resolution part of the record timestamp, e.g. `Oct 19 05:00:07`.
const CLOCK_FORMAT: &[FormatItem<'static>] = format_description!(
    "[month repr:short] [day padding:zero] [hour padding:zero]:[minute padding:zero]:[second padding:zero]"
);

/// Source of record timestamps in a fixed UTC offset.
///
/// The local offset is resolved once when the clock is created. Resolving it
/// on every record is not possible on most Unix targets once the process has
/// spawned threads, so a logger should be built before the listener starts.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Clock {
    offset: UtcOffset,
}

impl Clock {
    /// Clock in the local offset, falling back to UTC when it cannot be
    /// determined.
    #[must_use]
    pub fn local() -> Self {
        Self::with_offset(UtcOffset::current_local_offset().unwrap_or(UtcOffset::UTC))
    }

    /// Clock in an explicit offset.
    #[must_use]
    pub const fn with_offset(offset: UtcOffset) -> Self {
        Self { offset }
    }

    /// Offset applied to every timestamp.
    #[must_use]
    pub const fn offset(&self) -> UtcOffset {
        self.offset
    }

    /// Current time in the clock's offset.
    #[must_use]
    pub fn now(&self) -> OffsetDateTime {
        OffsetDateTime::now_utc().to_offset(self.offset)
    }
}

impl Default for Clock {
    fn default() -> Self {
        Self::local()
    }
}

/// Appends `at` as `Mon DD HH:MM:SS.nnnnnnnnn`.
pub fn write_timestamp(out: &mut String, at: OffsetDateTime) -> fmt::Result {
    let clock = at.format(CLOCK_FORMAT).map_err(|_| fmt::Error)?;
    write!(out, "{clock}.{:09}", at.nanosecond())
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    #[test]
    fn formats_month_day_time_and_nanos() {
        let mut out = String::new();
        let at = datetime!(2024-03-07 09:05:01 UTC)
            .replace_nanosecond(42)
            .expect("valid nanosecond");
        write_timestamp(&mut out, at).expect("format");
        assert_eq!(out, "Mar 07 09:05:01.000000042");
    }

    #[test]
    fn clock_applies_its_offset() {
        let offset = UtcOffset::from_hms(2, 0, 0).expect("offset");
        let clock = Clock::with_offset(offset);
        assert_eq!(clock.now().offset(), offset);
    }
}
