// Errors raised while reading an F0 sequence file

use std::fmt;
use std::io;

/// Failure to turn a file into an F0 sequence.
#[derive(Debug, Clone, PartialEq)]
pub enum LoadError {
    /// The file could not be opened or read
    Io { kind: io::ErrorKind, details: String },

    /// A token could not be parsed as a finite float (strict policy only)
    Malformed { index: usize, token: String },
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadError::Io { details, .. } => write!(f, "{}", details),
            LoadError::Malformed { index, token } => {
                write!(f, "non-numeric value {:?} at frame {}", token, index)
            }
        }
    }
}

impl std::error::Error for LoadError {}

impl From<io::Error> for LoadError {
    fn from(err: io::Error) -> Self {
        LoadError::Io {
            kind: err.kind(),
            details: err.to_string(),
        }
    }
}
