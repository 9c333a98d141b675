//! Item manifest ("gui" file) listing the basenames to evaluate.
//!
//! Entries are whitespace-delimited tokens, usually one per line. Order is
//! preserved because per-item reports are printed in manifest order.

use std::fs;
use std::path::Path;

use crate::error::EvalError;

/// Ordered list of item basenames.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Manifest {
    items: Vec<String>,
}

impl Manifest {
    /// Read a manifest from disk. An empty file yields an empty manifest.
    ///
    /// Bytes that are not valid UTF-8 are replaced, so such a basename simply
    /// names a file that will not be found.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, EvalError> {
        let path = path.as_ref();
        let contents = fs::read(path).map_err(|err| EvalError::ManifestRead {
            path: path.to_path_buf(),
            details: err.to_string(),
        })?;
        let manifest = Self::parse(&String::from_utf8_lossy(&contents));
        log::info!(
            "[Manifest] Loaded {} items from {:?}",
            manifest.len(),
            path
        );
        Ok(manifest)
    }

    pub fn parse(contents: &str) -> Self {
        Self {
            items: contents.split_whitespace().map(str::to_string).collect(),
        }
    }

    pub fn items(&self) -> &[String] {
        &self.items
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.items.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl FromIterator<String> for Manifest {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        Self {
            items: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;

    #[test]
    fn parses_tokens_in_order() {
        let manifest = Manifest::parse("rl001\nsb002  rl003\n\n");
        assert_eq!(manifest.items(), &["rl001", "sb002", "rl003"]);
    }

    #[test]
    fn empty_contents_are_not_an_error() {
        let manifest = Manifest::parse("");
        assert!(manifest.is_empty());
        assert_eq!(manifest.iter().count(), 0);
    }

    #[test]
    fn missing_file_maps_to_manifest_error() {
        let err = Manifest::load("no/such/list.gui").unwrap_err();
        assert_eq!(err.code(), 1);
        match err {
            EvalError::ManifestRead { path, .. } => {
                assert!(path.ends_with("list.gui"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn invalid_utf8_is_replaced_not_fatal() {
        let path = std::env::temp_dir().join(format!("pitch-eval-manifest-{}.gui", std::process::id()));
        fs::write(&path, b"rl001 sb\xff02\n").unwrap();
        let manifest = Manifest::load(&path).unwrap();
        let _ = fs::remove_file(&path);
        assert_eq!(manifest.items(), &["rl001", "sb\u{fffd}02"]);
    }
}
