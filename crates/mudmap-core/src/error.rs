//! Error types shared by every mudmap crate.

use std::error::Error;
use std::fmt;

/// Errors from id allocation and boundary parsing.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CoreError {
    /// An [`IdAllocator`](crate::IdAllocator) reached `u32::MAX`.
    IdSpaceExhausted {
        /// Which id kind ran out (`"place"`, `"layer"`, ...).
        kind: &'static str,
    },
    /// An exit label outside the fixed vocabulary.
    UnknownExit {
        /// The rejected label.
        label: String,
    },
    /// A color string that is not `#rrggbb`.
    InvalidColor {
        /// The rejected input.
        input: String,
    },
}

impl fmt::Display for CoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::IdSpaceExhausted { kind } => write!(f, "{kind} id space exhausted"),
            Self::UnknownExit { label } => write!(f, "unknown exit label '{label}'"),
            Self::InvalidColor { input } => {
                write!(f, "invalid color '{input}', expected #rrggbb")
            }
        }
    }
}

impl Error for CoreError {}
