//! F0 sequence files.
//!
//! A track is plain ASCII text holding one floating-point value per analysis
//! frame, separated by ASCII whitespace. Files are tokenized as bytes, so a
//! token that is not valid UTF-8 is just another non-numeric token. `0.0` marks an unvoiced frame; any other
//! value is the fundamental frequency in Hz.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::LoadError;

/// How to treat a token that is not a finite number.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParsePolicy {
    /// Stop at the first bad token and keep the values read so far.
    ///
    /// A token with a numeric prefix (`120abc`) keeps the prefix before
    /// stopping. This matches stream-extraction readers that many existing
    /// score files were produced and checked with, so trailing junk is
    /// silently dropped.
    #[default]
    Lenient,
    /// Fail on the first bad token.
    Strict,
}

/// One pitch track, frame by frame.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct F0Track {
    values: Vec<f32>,
}

impl F0Track {
    pub fn new(values: Vec<f32>) -> Self {
        Self { values }
    }

    /// Read and parse a track file.
    pub fn load<P: AsRef<Path>>(path: P, policy: ParsePolicy) -> Result<Self, LoadError> {
        let contents = fs::read(path.as_ref())?;
        let track = Self::parse_bytes(&contents, policy)?;
        log::debug!(
            "[F0] Loaded {} frames from {:?}",
            track.len(),
            path.as_ref()
        );
        Ok(track)
    }

    /// Parse whitespace-separated values according to `policy`.
    pub fn parse(contents: &str, policy: ParsePolicy) -> Result<Self, LoadError> {
        Self::parse_bytes(contents.as_bytes(), policy)
    }

    /// Like [`F0Track::parse`], for raw file contents of unknown encoding.
    pub fn parse_bytes(contents: &[u8], policy: ParsePolicy) -> Result<Self, LoadError> {
        let mut values = Vec::new();
        let tokens = contents
            .split(u8::is_ascii_whitespace)
            .filter(|token| !token.is_empty());
        for (index, token) in tokens.enumerate() {
            if let Some(value) = parse_token(token) {
                values.push(value);
                continue;
            }
            match policy {
                ParsePolicy::Lenient => {
                    if let Some(value) = numeric_prefix(token) {
                        values.push(value);
                    }
                    log::warn!(
                        "[F0] Stopped at non-numeric token {:?} after {} frames",
                        String::from_utf8_lossy(token),
                        values.len()
                    );
                    break;
                }
                ParsePolicy::Strict => {
                    return Err(LoadError::Malformed {
                        index,
                        token: String::from_utf8_lossy(token).into_owned(),
                    });
                }
            }
        }
        Ok(Self { values })
    }

    pub fn values(&self) -> &[f32] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Number of frames with a nonzero F0.
    pub fn voiced_frames(&self) -> usize {
        self.values.iter().filter(|&&v| v != 0.0).count()
    }

    pub fn truncate(&mut self, len: usize) {
        self.values.truncate(len);
    }
}

impl From<Vec<f32>> for F0Track {
    fn from(values: Vec<f32>) -> Self {
        Self::new(values)
    }
}

fn parse_value(token: &str) -> Option<f32> {
    token.parse::<f32>().ok().filter(|v| v.is_finite())
}

fn parse_token(token: &[u8]) -> Option<f32> {
    std::str::from_utf8(token).ok().and_then(parse_value)
}

/// Longest leading run of `token` that reads as a finite number.
fn numeric_prefix(token: &[u8]) -> Option<f32> {
    (1..token.len())
        .rev()
        .find_map(|end| parse_token(&token[..end]))
}
