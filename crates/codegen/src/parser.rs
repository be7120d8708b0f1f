//! Contract manifest parser
//!
//! Reads `*.manifest.json` files and validates them into a [`Manifest`].

use cpm_core::{Error, Manifest, Result};
use std::path::Path;

/// Neo contract manifest parser
#[derive(Debug, Default)]
pub struct ManifestParser;

impl ManifestParser {
    /// Create a new parser instance
    pub fn new() -> Self {
        Self
    }

    /// Parse a manifest file
    pub fn parse_file<P: AsRef<Path>>(&self, file_path: P) -> Result<Manifest> {
        let path = file_path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::resource(format!("can't read manifest file {}: {}", path.display(), e))
        })?;
        self.parse_content(&content).map_err(|e| match e {
            Error::Manifest(msg) => Error::manifest(format!("{}: {}", path.display(), msg)),
            other => other,
        })
    }

    /// Parse a manifest from JSON content
    pub fn parse_content(&self, content: &str) -> Result<Manifest> {
        Manifest::from_json(content)
    }
}
