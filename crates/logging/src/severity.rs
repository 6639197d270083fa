//! crates/logging/src/severity.rs
//! Ordered severity levels and their wire ranks.

use std::fmt;
use std::str::FromStr;

/// Severity of a log record, ordered from most to least important.
///
/// The numeric rank doubles as the wire value used by the level listeners:
/// `1` is [`Fatal`](Self::Fatal) and `5` is [`Trace`](Self::Trace). A
/// threshold admits every severity whose rank is less than or equal to its
/// own, so a threshold of [`Warn`](Self::Warn) emits FATAL, ERROR and WARN.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
#[repr(u8)]
pub enum Severity {
    /// Unrecoverable failures.
    Fatal = 1,
    /// Failures the application survives.
    Error = 2,
    /// Suspicious conditions.
    Warn = 3,
    /// Normal operational messages.
    Info = 4,
    /// Detailed tracing, tagged with the emitting thread.
    Trace = 5,
}

impl Severity {
    /// Every severity in rank order.
    pub const ALL: [Self; 5] = [Self::Fatal, Self::Error, Self::Warn, Self::Info, Self::Trace];

    /// First rank that does not name a severity.
    pub const INVALID_RANK: u8 = 6;

    /// Threshold a new logger starts with.
    ///
    /// INFO unless the crate is built with the `verbose` feature, which
    /// starts at TRACE.
    pub const DEFAULT: Self = if cfg!(feature = "verbose") {
        Self::Trace
    } else {
        Self::Info
    };

    /// Returns the numeric rank.
    #[must_use]
    pub const fn rank(self) -> u8 {
        self as u8
    }

    /// Maps a rank back to a severity.
    ///
    /// Returns `None` for `0` and for anything at or above
    /// [`INVALID_RANK`](Self::INVALID_RANK).
    ///
    /// # Examples
    ///
    /// ```
    /// use logging::Severity;
    ///
    /// assert_eq!(Severity::from_rank(3), Some(Severity::Warn));
    /// assert_eq!(Severity::from_rank(0), None);
    /// assert_eq!(Severity::from_rank(Severity::INVALID_RANK), None);
    /// ```
    #[must_use]
    pub const fn from_rank(rank: u8) -> Option<Self> {
        match rank {
            1 => Some(Self::Fatal),
            2 => Some(Self::Error),
            3 => Some(Self::Warn),
            4 => Some(Self::Info),
            5 => Some(Self::Trace),
            _ => None,
        }
    }

    /// Three letter tag printed in every record.
    #[must_use]
    pub const fn tag(self) -> &'static str {
        match self {
            Self::Fatal => "FTL",
            Self::Error => "ERR",
            Self::Warn => "WRN",
            Self::Info => "INF",
            Self::Trace => "TRC",
        }
    }

    /// Upper-case name of the severity.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Fatal => "FATAL",
            Self::Error => "ERROR",
            Self::Warn => "WARN",
            Self::Info => "INFO",
            Self::Trace => "TRACE",
        }
    }

    /// Reports whether a threshold of `self` admits a record at `level`.
    ///
    /// This is a single ordered comparison. TRACE is the highest rank, so a
    /// TRACE record passes only when the threshold is exactly TRACE.
    ///
    /// # Examples
    ///
    /// ```
    /// use logging::Severity;
    ///
    /// assert!(Severity::Info.permits(Severity::Warn));
    /// assert!(!Severity::Info.permits(Severity::Trace));
    /// assert!(Severity::Trace.permits(Severity::Trace));
    /// ```
    #[must_use]
    pub const fn permits(self, level: Self) -> bool {
        self.rank() >= level.rank()
    }
}

impl Default for Severity {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl From<Severity> for u8 {
    fn from(severity: Severity) -> Self {
        severity.rank()
    }
}

impl TryFrom<u8> for Severity {
    type Error = SeverityParseError;

    fn try_from(rank: u8) -> Result<Self, SeverityParseError> {
        Self::from_rank(rank).ok_or(SeverityParseError::InvalidRank(rank))
    }
}

/// Error produced when text or a rank does not name a severity.
#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
pub enum SeverityParseError {
    /// The numeric rank is outside `1..=5`.
    #[error("severity rank {0} is outside 1..=5")]
    InvalidRank(u8),
    /// The text is neither a rank digit nor a severity name.
    #[error("unknown severity '{0}' (expected fatal, error, warn, info, trace or 1-5)")]
    UnknownName(String),
}

impl FromStr for Severity {
    type Err = SeverityParseError;

    /// Parses a rank digit or a case-insensitive severity name.
    ///
    /// Three letter tags (`WRN`, `TRC`, ...) are accepted as well so the
    /// output format can be fed back in.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if let Ok(rank) = trimmed.parse::<u8>() {
            return Self::try_from(rank);
        }

        match trimmed.to_ascii_lowercase().as_str() {
            "fatal" | "ftl" => Ok(Self::Fatal),
            "error" | "err" => Ok(Self::Error),
            "warn" | "warning" | "wrn" => Ok(Self::Warn),
            "info" | "inf" => Ok(Self::Info),
            "trace" | "trc" => Ok(Self::Trace),
            _ => Err(SeverityParseError::UnknownName(trimmed.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ranks_follow_declaration_order() {
        let ranks: Vec<u8> = Severity::ALL.iter().map(|s| s.rank()).collect();
        assert_eq!(ranks, vec![1, 2, 3, 4, 5]);
        assert!(Severity::Fatal < Severity::Trace);
    }

    #[test]
    fn from_rank_rejects_zero_and_sentinel() {
        assert_eq!(Severity::from_rank(0), None);
        assert_eq!(Severity::from_rank(6), None);
        assert_eq!(Severity::from_rank(7), None);
        for severity in Severity::ALL {
            assert_eq!(Severity::from_rank(severity.rank()), Some(severity));
        }
    }

    #[test]
    fn rank_conversions_round_trip() {
        assert_eq!(Severity::try_from(2u8), Ok(Severity::Error));
        assert_eq!(u8::from(Severity::Trace), 5);
        assert_eq!(
            Severity::try_from(Severity::INVALID_RANK),
            Err(SeverityParseError::InvalidRank(6))
        );
    }

    #[test]
    fn default_threshold_matches_feature() {
        let expected = if cfg!(feature = "verbose") {
            Severity::Trace
        } else {
            Severity::Info
        };
        assert_eq!(Severity::default(), expected);
    }

    #[test]
    fn tags_are_three_letters() {
        for severity in Severity::ALL {
            assert_eq!(severity.tag().len(), 3);
        }
    }

    #[test]
    fn parse_accepts_digits_names_and_tags() {
        assert_eq!("3".parse(), Ok(Severity::Warn));
        assert_eq!("Warning".parse(), Ok(Severity::Warn));
        assert_eq!("TRC".parse(), Ok(Severity::Trace));
        assert_eq!(" fatal ".parse(), Ok(Severity::Fatal));
    }

    #[test]
    fn parse_rejects_invalid_input() {
        assert_eq!(
            "0".parse::<Severity>(),
            Err(SeverityParseError::InvalidRank(0))
        );
        assert_eq!(
            "9".parse::<Severity>(),
            Err(SeverityParseError::InvalidRank(9))
        );
        assert!(matches!(
            "verbose".parse::<Severity>(),
            Err(SeverityParseError::UnknownName(_))
        ));
    }

    #[test]
    fn trace_is_exact_match_only() {
        for threshold in Severity::ALL {
            assert_eq!(
                threshold.permits(Severity::Trace),
                threshold == Severity::Trace
            );
        }
    }

    #[cfg(feature = "serde")]
    #[test]
    fn serde_uses_lowercase_names() {
        let json = serde_json::to_string(&Severity::Warn).expect("serialize");
        assert_eq!(json, "\"warn\"");
        let parsed: Severity = serde_json::from_str("\"trace\"").expect("deserialize");
        assert_eq!(parsed, Severity::Trace);
    }
}
