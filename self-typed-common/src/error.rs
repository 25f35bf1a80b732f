//! # Errors
//!
//! The only fallible operation in this crate is range extraction
//! ([`PersistentSequence::sublist`](crate::collection::PersistentSequence::sublist)),
//! so the taxonomy is a single invalid-argument condition carrying the
//! offending range.

use std::fmt;

/// Why a requested range was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InvalidRange {
    /// The start index is below zero.
    NegativeStart,
    /// The end index does not exceed the start index.
    EmptyRange,
}

impl fmt::Display for InvalidRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InvalidRange::NegativeStart => write!(f, "start index is negative"),
            InvalidRange::EmptyRange => write!(f, "end index must be greater than start index"),
        }
    }
}

/// Error type for persistent collection operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    #[error("invalid sublist range {from}..{to}: {reason}")]
    InvalidArgument {
        from: isize,
        to: isize,
        reason: InvalidRange,
    },
}

impl Error {
    /// Checks a `[from, to)` request, returning the indices as `usize` when valid.
    ///
    /// # Example
    ///
    /// ```
    /// use self_typed_common::error::{Error, InvalidRange};
    ///
    /// assert_eq!(Error::check_range(1, 3), Ok((1, 3)));
    /// assert_eq!(
    ///     Error::check_range(2, 2),
    ///     Err(Error::InvalidArgument { from: 2, to: 2, reason: InvalidRange::EmptyRange })
    /// );
    /// ```
    pub fn check_range(from: isize, to: isize) -> Result<(usize, usize)> {
        let reason = if from < 0 {
            InvalidRange::NegativeStart
        } else if to <= from {
            InvalidRange::EmptyRange
        } else {
            return Ok((from as usize, to as usize));
        };
        Err(Error::InvalidArgument { from, to, reason })
    }

    /// Returns the reason the range was rejected.
    #[must_use]
    pub fn reason(&self) -> InvalidRange {
        match self {
            Error::InvalidArgument { reason, .. } => *reason,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
