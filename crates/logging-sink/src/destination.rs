//! crates/logging-sink/src/destination.rs
//! Output stream selection.

use std::fmt;
use std::io::{self, Write};
use std::str::FromStr;

/// Standard stream that receives rendered records.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum Destination {
    /// Standard output.
    Stdout,
    /// Standard error.
    Stderr,
}

impl Destination {
    /// Destination selected at compile time.
    ///
    /// Standard output unless the crate is built with the `stderr` feature.
    pub const DEFAULT: Self = if cfg!(feature = "stderr") {
        Self::Stderr
    } else {
        Self::Stdout
    };

    /// Returns the lowercase stream name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Stdout => "stdout",
            Self::Stderr => "stderr",
        }
    }

    /// Opens an unlocked handle to the stream.
    ///
    /// The handle is boxed so loggers can store it next to arbitrary
    /// caller-supplied writers.
    #[must_use]
    pub fn open(self) -> Box<dyn Write + Send> {
        match self {
            Self::Stdout => Box::new(io::stdout()),
            Self::Stderr => Box::new(io::stderr()),
        }
    }
}

impl Default for Destination {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl fmt::Display for Destination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a destination name is not recognised.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ParseDestinationError {
    input: String,
}

impl fmt::Display for ParseDestinationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "unknown output destination '{}' (expected 'stdout' or 'stderr')",
            self.input
        )
    }
}

impl std::error::Error for ParseDestinationError {}

impl FromStr for Destination {
    type Err = ParseDestinationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "stdout" | "out" | "1" => Ok(Self::Stdout),
            "stderr" | "err" | "2" => Ok(Self::Stderr),
            _ => Err(ParseDestinationError {
                input: s.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_matches_feature() {
        if cfg!(feature = "stderr") {
            assert_eq!(Destination::default(), Destination::Stderr);
        } else {
            assert_eq!(Destination::default(), Destination::Stdout);
        }
    }

    #[test]
    fn parses_names_case_insensitively() {
        assert_eq!("STDOUT".parse(), Ok(Destination::Stdout));
        assert_eq!(" stderr ".parse(), Ok(Destination::Stderr));
        assert_eq!("2".parse(), Ok(Destination::Stderr));
    }

    #[test]
    fn rejects_unknown_names() {
        let error = "syslog".parse::<Destination>().expect_err("unknown");
        assert!(error.to_string().contains("syslog"));
    }

    #[test]
    fn display_round_trips_through_from_str() {
        for destination in [Destination::Stdout, Destination::Stderr] {
            assert_eq!(destination.to_string().parse(), Ok(destination));
        }
    }
}
