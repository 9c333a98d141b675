//! Configuration management for evaluation tunables
//!
//! This module provides runtime configuration loading from JSON files, so the
//! gross-error threshold, frame tolerance and data layout can be adjusted
//! without recompilation. Defaults reproduce the classic scoring setup:
//! 20% gross threshold, 5 frames of length slack, `data/<id>.f0ref` against
//! `data/<id>.f0`, lenient number parsing.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::f0::ParsePolicy;

/// Complete evaluation configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct EvalConfig {
    #[serde(default)]
    pub comparison: ComparisonConfig,
    #[serde(default)]
    pub reconcile: ReconcileConfig,
    #[serde(default)]
    pub data: DataLayoutConfig,
    #[serde(default)]
    pub parsing: ParsePolicy,
}

/// Comparator parameters
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct ComparisonConfig {
    /// Relative error above which a voiced-voiced frame is a gross error
    pub gross_threshold: f32,
}

impl Default for ComparisonConfig {
    fn default() -> Self {
        Self {
            gross_threshold: 0.2,
        }
    }
}

/// Frame-count reconciliation parameters
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct ReconcileConfig {
    /// Maximum allowed difference between reference and test frame counts
    pub frame_tolerance: usize,
}

impl Default for ReconcileConfig {
    fn default() -> Self {
        Self { frame_tolerance: 5 }
    }
}

/// Where item files live and how they are named
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DataLayoutConfig {
    /// Directory holding `<id><reference_extension>` and `<id><test_extension>`
    pub data_dir: PathBuf,
    pub reference_extension: String,
    pub test_extension: String,
}

impl Default for DataLayoutConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            reference_extension: ".f0ref".to_string(),
            test_extension: ".f0".to_string(),
        }
    }
}

impl DataLayoutConfig {
    pub fn reference_path(&self, id: &str) -> PathBuf {
        self.data_dir
            .join(format!("{}{}", id, self.reference_extension))
    }

    pub fn test_path(&self, id: &str) -> PathBuf {
        self.data_dir.join(format!("{}{}", id, self.test_extension))
    }
}

impl EvalConfig {
    /// Load configuration from JSON file
    ///
    /// # Arguments
    /// * `path` - Path to JSON config file
    ///
    /// # Returns
    /// The parsed configuration, or the defaults when the file is missing,
    /// unreadable or invalid (a warning is logged in that case).
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Self {
        match fs::read_to_string(&path) {
            Ok(contents) => match serde_json::from_str::<EvalConfig>(&contents) {
                Ok(config) => match config.validate() {
                    Ok(()) => {
                        log::info!("[Config] Loaded configuration from {:?}", path.as_ref());
                        config
                    }
                    Err(reason) => {
                        log::warn!(
                            "[Config] Rejected configuration from {:?}: {}. Using defaults.",
                            path.as_ref(),
                            reason
                        );
                        Self::default()
                    }
                },
                Err(err) => {
                    log::warn!(
                        "[Config] Failed to parse JSON from {:?}: {}. Using defaults.",
                        path.as_ref(),
                        err
                    );
                    Self::default()
                }
            },
            Err(err) => {
                log::warn!(
                    "[Config] Failed to read config file {:?}: {}. Using defaults.",
                    path.as_ref(),
                    err
                );
                Self::default()
            }
        }
    }

    /// Check value ranges that serde cannot express.
    pub fn validate(&self) -> Result<(), String> {
        let threshold = self.comparison.gross_threshold;
        if !threshold.is_finite() || threshold <= 0.0 {
            return Err(format!(
                "gross_threshold must be a positive finite number (got {})",
                threshold
            ));
        }
        if self.data.reference_extension.is_empty() || self.data.test_extension.is_empty() {
            return Err("file extensions cannot be empty".to_string());
        }
        if self.data.reference_extension == self.data.test_extension {
            return Err("reference and test extensions must differ".to_string());
        }
        Ok(())
    }
}
