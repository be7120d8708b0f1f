//! SDK code generation for Neo contracts
//!
//! Turns a contract manifest into client SDK sources for Go, Python, Java, C#
//! and TypeScript. The pipeline is a single synchronous pass:
//! manifest -> [`ContractTemplate`] (names and types resolved through a
//! [`TypeMapper`]) -> renderer -> [`OutputSink`].

pub mod cli;
pub mod generator;
pub mod mapper;
pub mod parser;
pub mod render;
pub mod sink;
pub mod template;
pub mod templates;

#[cfg(test)]
mod tests;

pub use generator::{GeneratedSdk, SdkGenerator};
pub use mapper::{mapper_for, Language, SdkMode, TypeMapper};
pub use parser::ManifestParser;
pub use sink::{FsSink, MemorySink, OutputSink};
pub use template::{Argument, ContractTemplate, EventTemplate, MethodTemplate};

use cpm_core::{Manifest, Result, ScriptHash};
use std::path::PathBuf;

/// Configuration for a single SDK generation request
#[derive(Debug, Clone)]
pub struct GenerationConfig {
    /// Contract script hash embedded in the generated code
    pub script_hash: ScriptHash,
    /// Directory the SDK files are written under
    pub destination: PathBuf,
    /// Target language
    pub language: Language,
    /// On-chain or off-chain flavour
    pub mode: SdkMode,
    /// Namespace or package for languages that need one (C#, Java)
    pub namespace: Option<String>,
    /// Print the generated files instead of writing them
    pub dry_run: bool,
}

impl GenerationConfig {
    /// Create a configuration with the default destination for the language and mode
    pub fn new(language: Language, mode: SdkMode) -> Self {
        Self {
            script_hash: ScriptHash::ZERO,
            destination: PathBuf::from(default_destination(language, mode)),
            language,
            mode,
            namespace: None,
            dry_run: false,
        }
    }

    pub fn with_destination<P: Into<PathBuf>>(mut self, destination: P) -> Self {
        self.destination = destination.into();
        self
    }

    pub fn with_script_hash(mut self, script_hash: ScriptHash) -> Self {
        self.script_hash = script_hash;
        self
    }

    pub fn with_namespace<S: Into<String>>(mut self, namespace: S) -> Self {
        self.namespace = Some(namespace.into());
        self
    }
}

/// Root directory for generated SDKs when nothing else is configured
pub const OUTPUT_ROOT: &str = "cpm_out/";

/// Default SDK destination: `cpm_out/<mode>/<language>/`
pub fn default_destination(language: Language, mode: SdkMode) -> String {
    format!("{}{}/{}/", OUTPUT_ROOT, mode, language)
}

/// Main entry point for SDK generation
pub fn generate_sdk(
    manifest: &Manifest,
    config: &GenerationConfig,
    sink: &mut dyn OutputSink,
) -> Result<GeneratedSdk> {
    let generator = SdkGenerator::new()?;
    generator.generate(manifest, config, sink)
}
