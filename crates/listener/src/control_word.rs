//! crates/listener/src/control_word.rs
//! Parsing and construction of the 16-bit multicast control word.

use std::fmt;
use std::str::FromStr;

use logging::Severity;
use thiserror::Error;

use super::app_index::AppIndex;

/// Reasons a datagram is not a control word.
#[derive(Clone, Debug, Error, Eq, PartialEq)]
pub enum ControlWordError {
    /// Nothing but whitespace or NUL bytes was received.
    #[error("control word is empty")]
    Empty,
    /// The datagram does not start with `0x`.
    #[error("control word must start with \"0x\"")]
    MissingPrefix,
    /// `0x` is not followed by any digit.
    #[error("control word has no hex digits after \"0x\"")]
    MissingDigits,
    /// A byte after `0x` is not a hex digit.
    #[error("invalid hex digit {0:?} in control word")]
    InvalidDigit(char),
}

/// Control word carried by a multicast datagram, written as `0xHHHH`.
///
/// Bits `[0:2]` hold the requested severity rank and bits `[3:15]` form the
/// application mask, where bit 3 addresses application 1.
///
/// # Examples
///
/// ```
/// use listener::{AppIndex, ControlWord};
///
/// let word = ControlWord::parse(b"0x000c\n").unwrap();
/// assert_eq!(word.requested_rank(), 4);
/// assert!(word.addresses(AppIndex::new(1).unwrap()));
/// assert!(!word.addresses(AppIndex::new(2).unwrap()));
/// ```
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct ControlWord(u16);

impl ControlWord {
    /// Number of low bits carrying the severity rank.
    pub const LEVEL_BITS: u32 = 3;
    /// Mask selecting the severity rank.
    pub const LEVEL_MASK: u16 = 0x0007;
    /// Bytes of a datagram that are inspected; `0x` plus four digits.
    pub const WIRE_LEN: usize = 6;

    /// Wraps raw bits.
    #[must_use]
    pub const fn from_bits(bits: u16) -> Self {
        Self(bits)
    }

    /// Builds the word requesting `level` from every application in `apps`.
    pub fn new<I>(level: Severity, apps: I) -> Self
    where
        I: IntoIterator<Item = AppIndex>,
    {
        let mask = apps
            .into_iter()
            .fold(0u16, |mask, app| mask | app.mask_bit());
        Self((mask << Self::LEVEL_BITS) | u16::from(level.rank()))
    }

    /// Parses the leading [`WIRE_LEN`](Self::WIRE_LEN) bytes of a datagram.
    ///
    /// Trailing ASCII whitespace and NUL bytes are ignored so a line typed
    /// into `nc -u` is accepted. The prefix is a lowercase `0x` followed by
    /// one to four hex digits in either case.
    ///
    /// # Errors
    ///
    /// Returns a [`ControlWordError`] describing the first problem found.
    pub fn parse(datagram: &[u8]) -> Result<Self, ControlWordError> {
        let head = &datagram[..datagram.len().min(Self::WIRE_LEN)];
        let end = head
            .iter()
            .rposition(|&byte| !(byte.is_ascii_whitespace() || byte == 0))
            .map_or(0, |last| last + 1);
        let text = &head[..end];

        if text.is_empty() {
            return Err(ControlWordError::Empty);
        }
        let digits = text
            .strip_prefix(b"0x")
            .ok_or(ControlWordError::MissingPrefix)?;
        if digits.is_empty() {
            return Err(ControlWordError::MissingDigits);
        }

        let mut bits = 0u16;
        for &byte in digits {
            let digit = char::from(byte)
                .to_digit(16)
                .ok_or(ControlWordError::InvalidDigit(char::from(byte)))?;
            bits = (bits << 4) | digit as u16;
        }
        Ok(Self(bits))
    }

    /// Raw 16-bit value.
    #[must_use]
    pub const fn bits(self) -> u16 {
        self.0
    }

    /// Rank in bits `[0:2]`, which may be `0`, `6` or `7`.
    #[must_use]
    pub const fn requested_rank(self) -> u8 {
        (self.0 & Self::LEVEL_MASK) as u8
    }

    /// Requested severity, or `None` when the rank is not one.
    #[must_use]
    pub const fn requested_severity(self) -> Option<Severity> {
        Severity::from_rank(self.requested_rank())
    }

    /// 13-bit application mask.
    #[must_use]
    pub const fn app_mask(self) -> u16 {
        self.0 >> Self::LEVEL_BITS
    }

    /// Reports whether the mask includes `app`.
    #[must_use]
    pub const fn addresses(self, app: AppIndex) -> bool {
        self.app_mask() & app.mask_bit() != 0
    }

    /// Renders the word as sent on the wire, e.g. `0x0014`.
    #[must_use]
    pub fn to_wire(self) -> String {
        self.to_string()
    }
}

impl FromStr for ControlWord {
    type Err = ControlWordError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        Self::parse(text.as_bytes())
    }
}

impl fmt::Display for ControlWord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#06x}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn app(index: u8) -> AppIndex {
        AppIndex::new(index).expect("valid index")
    }

    #[test]
    fn parses_documented_examples() {
        let word = ControlWord::parse(b"0x0014").expect("parse");
        assert_eq!(word.requested_severity(), Some(Severity::Info));
        assert!(word.addresses(app(2)));
        assert!(!word.addresses(app(1)));

        let word = ControlWord::parse(b"0xfff9").expect("parse");
        assert_eq!(word.requested_severity(), Some(Severity::Fatal));
        assert!((1..=13).all(|index| word.addresses(app(index))));
    }

    #[test]
    fn ignores_trailing_newline_and_nul() {
        assert_eq!(ControlWord::parse(b"0x0c\n"), Ok(ControlWord::from_bits(0x0c)));
        assert_eq!(ControlWord::parse(b"0x000c\0\0"), Ok(ControlWord::from_bits(0x0c)));
        assert_eq!(ControlWord::parse(b"0x1 \r\n"), Ok(ControlWord::from_bits(1)));
    }

    #[test]
    fn only_first_six_bytes_count() {
        assert_eq!(ControlWord::parse(b"0x0014zzzz"), Ok(ControlWord::from_bits(0x14)));
    }

    #[test]
    fn rejects_malformed_input() {
        assert_eq!(ControlWord::parse(b""), Err(ControlWordError::Empty));
        assert_eq!(ControlWord::parse(b"\n\0"), Err(ControlWordError::Empty));
        assert_eq!(ControlWord::parse(b"1x0005"), Err(ControlWordError::MissingPrefix));
        assert_eq!(ControlWord::parse(b"0X0005"), Err(ControlWordError::MissingPrefix));
        assert_eq!(ControlWord::parse(b"0x"), Err(ControlWordError::MissingDigits));
        assert_eq!(ControlWord::parse(b"0x00g5"), Err(ControlWordError::InvalidDigit('g')));
        assert_eq!(ControlWord::parse(b"0x0 05"), Err(ControlWordError::InvalidDigit(' ')));
    }

    #[test]
    fn builds_words_from_apps_and_level() {
        let word = ControlWord::new(Severity::Info, [app(2)]);
        assert_eq!(word.to_wire(), "0x0014");

        let word = ControlWord::new(Severity::Trace, [app(1), app(3)]);
        assert_eq!(word.bits(), (0b101 << 3) | 5);
        assert_eq!(word.to_wire(), "0x002d");
    }

    #[test]
    fn parses_from_str() {
        assert_eq!("0x000c".parse::<ControlWord>(), Ok(ControlWord::from_bits(0x0c)));
    }
}
