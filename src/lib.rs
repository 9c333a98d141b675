// Pitch Evaluation Core - F0 track scoring
// Voicing decision and pitch accuracy statistics for batches of utterances

// Module declarations
pub mod batch;
pub mod compare;
pub mod config;
pub mod error;
pub mod f0;
pub mod manifest;
pub mod report;

// Re-exports for convenience
pub use batch::{BatchSummary, BatchTotals, Evaluator, ItemReport};
pub use compare::{compare, reconcile_lengths, ComparisonResult};
pub use config::{ComparisonConfig, DataLayoutConfig, EvalConfig, ReconcileConfig};
pub use error::{ErrorCode, EvalError, LoadError};
pub use f0::{F0Track, ParsePolicy};
pub use manifest::Manifest;

/// Install the stderr log subscriber.
///
/// `log` records from library code are bridged into the same subscriber.
/// Safe to call more than once; later calls are ignored.
pub fn init_logging(level: tracing::Level) {
    let _ = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(level)
        .with_target(false)
        .try_init();
}
