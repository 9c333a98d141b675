// Error types for the pitch evaluation tool
//
// This module defines the error taxonomy for batch evaluation. Every error
// carries a numeric code that doubles as the process exit code of the CLI.

mod eval;
mod load;

pub use eval::{log_eval_error, EvalError, EvalErrorCodes, TrackRole};
pub use load::LoadError;

/// Error codes for structured error reporting
///
/// This trait provides a standard way to get error codes and messages
/// from custom error types, so the CLI can map any failure onto an exit code.
pub trait ErrorCode {
    /// Get the numeric error code
    fn code(&self) -> i32;

    /// Get the human-readable error message
    fn message(&self) -> String;
}
