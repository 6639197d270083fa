//! crates/listener/src/app_index.rs
//! Application identifiers addressed by multicast control words.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Error returned for an application index outside `1..=13`.
#[derive(Clone, Debug, Error, Eq, PartialEq)]
pub enum AppIndexError {
    /// The value does not fit in the 13-bit application mask.
    #[error("application index {0} is outside {min}..={max}", min = AppIndex::MIN, max = AppIndex::MAX)]
    OutOfRange(u32),
    /// The text is not a decimal number.
    #[error("application index '{0}' is not a number")]
    NotANumber(String),
}

/// One-based application number selecting a bit of the control word mask.
///
/// Index `n` corresponds to bit `n + 2` of the 16-bit control word, i.e. bit
/// `n - 1` of the 13-bit mask above the three level bits.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct AppIndex(u8);

impl AppIndex {
    /// Smallest valid index.
    pub const MIN: u8 = 1;
    /// Largest valid index.
    pub const MAX: u8 = 13;
    /// Application 1, the lowest bit of the mask.
    pub const FIRST: Self = Self(Self::MIN);

    /// Validates `index`.
    ///
    /// # Errors
    ///
    /// Returns [`AppIndexError::OutOfRange`] for `0` and anything above
    /// [`MAX`](Self::MAX).
    pub const fn new(index: u8) -> Result<Self, AppIndexError> {
        if index >= Self::MIN && index <= Self::MAX {
            Ok(Self(index))
        } else {
            Err(AppIndexError::OutOfRange(index as u32))
        }
    }

    /// Returns the numeric index.
    #[must_use]
    pub const fn get(self) -> u8 {
        self.0
    }

    /// Bit of the 13-bit application mask owned by this index.
    #[must_use]
    pub const fn mask_bit(self) -> u16 {
        1 << (self.0 - 1)
    }
}

impl TryFrom<u8> for AppIndex {
    type Error = AppIndexError;

    fn try_from(index: u8) -> Result<Self, Self::Error> {
        Self::new(index)
    }
}

impl From<AppIndex> for u8 {
    fn from(index: AppIndex) -> Self {
        index.0
    }
}

impl FromStr for AppIndex {
    type Err = AppIndexError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let trimmed = text.trim();
        let value: u32 = trimmed
            .parse()
            .map_err(|_| AppIndexError::NotANumber(trimmed.to_owned()))?;
        u8::try_from(value)
            .map_err(|_| AppIndexError::OutOfRange(value))
            .and_then(Self::new)
    }
}

impl fmt::Display for AppIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}
