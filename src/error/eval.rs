// Batch evaluation error types and constants

use crate::error::{ErrorCode, LoadError};
use log::error;
use std::fmt;
use std::path::PathBuf;

/// Evaluation error code constants
///
/// These codes are also the exit codes of the `pitch_compare` binary, so
/// scripts can tell which stage of the batch failed.
pub struct EvalErrorCodes {}

impl EvalErrorCodes {
    /// Usage error or manifest could not be read
    pub const MANIFEST_READ: i32 = 1;

    /// Reference F0 file could not be read
    pub const REFERENCE_READ: i32 = 2;

    /// Test F0 file could not be read
    pub const TEST_READ: i32 = 3;

    /// Reference and test frame counts differ beyond tolerance
    pub const FRAME_COUNT_MISMATCH: i32 = 4;

    /// Report could not be written to the output stream
    pub const OUTPUT: i32 = 1;
}

/// Which side of a comparison a track belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackRole {
    Reference,
    Test,
}

/// Log an evaluation error with structured context
///
/// Fields logged:
/// - code: numeric error code (exit code of the CLI)
/// - context: where the error surfaced
/// - message: human-readable error message
pub fn log_eval_error(err: &EvalError, context: &str) {
    error!(
        "Evaluation error in {}: code={}, message={}",
        context,
        err.code(),
        err.message()
    );
}

/// Errors that abort a batch evaluation.
///
/// All of them are fatal for the whole run; nothing is retried.
#[derive(Debug, Clone, PartialEq)]
pub enum EvalError {
    /// Manifest file could not be opened or read
    ManifestRead { path: PathBuf, details: String },

    /// Reference track could not be loaded
    ReferenceRead { path: PathBuf, source: LoadError },

    /// Test track could not be loaded
    TestRead { path: PathBuf, source: LoadError },

    /// Frame counts differ by more than the configured tolerance
    FrameCountMismatch {
        item: String,
        reference_frames: usize,
        test_frames: usize,
        tolerance: usize,
    },

    /// Writing the report failed
    Output { details: String },
}

impl EvalError {
    /// Wrap a track load failure with the role of the track.
    pub fn track(role: TrackRole, path: PathBuf, source: LoadError) -> Self {
        match role {
            TrackRole::Reference => EvalError::ReferenceRead { path, source },
            TrackRole::Test => EvalError::TestRead { path, source },
        }
    }

    fn kind(&self) -> &'static str {
        match self {
            EvalError::ManifestRead { .. } => "ManifestRead",
            EvalError::ReferenceRead { .. } => "ReferenceRead",
            EvalError::TestRead { .. } => "TestRead",
            EvalError::FrameCountMismatch { .. } => "FrameCountMismatch",
            EvalError::Output { .. } => "Output",
        }
    }
}

impl ErrorCode for EvalError {
    fn code(&self) -> i32 {
        match self {
            EvalError::ManifestRead { .. } => EvalErrorCodes::MANIFEST_READ,
            EvalError::ReferenceRead { .. } => EvalErrorCodes::REFERENCE_READ,
            EvalError::TestRead { .. } => EvalErrorCodes::TEST_READ,
            EvalError::FrameCountMismatch { .. } => EvalErrorCodes::FRAME_COUNT_MISMATCH,
            EvalError::Output { .. } => EvalErrorCodes::OUTPUT,
        }
    }

    fn message(&self) -> String {
        match self {
            EvalError::ManifestRead { path, details } => {
                format!("Error reading gui file: {} ({})", path.display(), details)
            }
            EvalError::ReferenceRead { path, source } => {
                format!("Error reading ref file: {} ({})", path.display(), source)
            }
            EvalError::TestRead { path, source } => {
                format!("Error reading test file: {} ({})", path.display(), source)
            }
            EvalError::FrameCountMismatch {
                item,
                reference_frames,
                test_frames,
                tolerance,
            } => format!(
                "Error: number of frames in ref ({}) != number of frames in test ({}) for {} (tolerance {})",
                reference_frames, test_frames, item, tolerance
            ),
            EvalError::Output { details } => format!("Failed to write report: {}", details),
        }
    }
}

impl fmt::Display for EvalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "EvalError::{} (code {}): {}",
            self.kind(),
            self.code(),
            self.message()
        )
    }
}

impl std::error::Error for EvalError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            EvalError::ReferenceRead { source, .. } | EvalError::TestRead { source, .. } => {
                Some(source)
            }
            _ => None,
        }
    }
}

impl From<std::io::Error> for EvalError {
    fn from(err: std::io::Error) -> Self {
        EvalError::Output {
            details: err.to_string(),
        }
    }
}
