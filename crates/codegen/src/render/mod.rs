//! Renderers turning a [`ContractTemplate`] into source files
//!
//! A renderer first produces every file as a string and only then writes them
//! through an [`OutputSink`], so a failing template never leaves a partial SDK.

mod csharp;
mod golang;
mod java;
mod python;
mod typescript;

pub use csharp::CSharpRenderer;
pub use golang::{GoOffChainRenderer, GoOnChainRenderer};
pub use java::{JavaOffChainRenderer, JavaOnChainRenderer};
pub use python::{PythonOffChainRenderer, PythonOnChainRenderer};
pub use typescript::TypeScriptRenderer;

use cpm_core::{Error, Result};
use std::path::PathBuf;

use crate::mapper::{Language, SdkMode};
use crate::sink::{write_file, OutputSink};
use crate::template::{Argument, ContractTemplate};
use crate::templates::TemplateManager;
use crate::GenerationConfig;

/// A generated file, relative to the destination directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedFile {
    pub path: PathBuf,
    pub content: String,
}

impl RenderedFile {
    pub fn new(path: impl Into<PathBuf>, content: String) -> Self {
        Self {
            path: path.into(),
            content,
        }
    }
}

/// Emits the SDK for one language and mode
pub trait Renderer: Send + Sync {
    /// Render every file of the SDK without touching the sink
    fn render_files(
        &self,
        ctr: &ContractTemplate,
        config: &GenerationConfig,
        templates: &TemplateManager,
    ) -> Result<Vec<RenderedFile>>;

    /// Render and write all files under `config.destination`.
    ///
    /// Returns the written paths.
    fn render(
        &self,
        ctr: &ContractTemplate,
        sink: &mut dyn OutputSink,
        config: &GenerationConfig,
        templates: &TemplateManager,
    ) -> Result<Vec<PathBuf>> {
        let files = self.render_files(ctr, config, templates)?;
        sink.create_dir_all(&config.destination)?;

        let mut written = Vec::with_capacity(files.len());
        for file in files {
            let path = config.destination.join(&file.path);
            write_file(sink, &path, &file.content)?;
            written.push(path);
        }
        Ok(written)
    }
}

static CSHARP: CSharpRenderer = CSharpRenderer;
static GO_ON_CHAIN: GoOnChainRenderer = GoOnChainRenderer;
static GO_OFF_CHAIN: GoOffChainRenderer = GoOffChainRenderer;
static JAVA_ON_CHAIN: JavaOnChainRenderer = JavaOnChainRenderer;
static JAVA_OFF_CHAIN: JavaOffChainRenderer = JavaOffChainRenderer;
static PYTHON_ON_CHAIN: PythonOnChainRenderer = PythonOnChainRenderer;
static PYTHON_OFF_CHAIN: PythonOffChainRenderer = PythonOffChainRenderer;
static TYPESCRIPT: TypeScriptRenderer = TypeScriptRenderer;

/// Select the renderer for a language and mode
pub fn renderer_for(language: Language, mode: SdkMode) -> Result<&'static dyn Renderer> {
    match (language, mode) {
        (Language::CSharp, SdkMode::OnChain) => Ok(&CSHARP),
        (Language::Go, SdkMode::OnChain) => Ok(&GO_ON_CHAIN),
        (Language::Go, SdkMode::OffChain) => Ok(&GO_OFF_CHAIN),
        (Language::Java, SdkMode::OnChain) => Ok(&JAVA_ON_CHAIN),
        (Language::Java, SdkMode::OffChain) => Ok(&JAVA_OFF_CHAIN),
        (Language::Python, SdkMode::OnChain) => Ok(&PYTHON_ON_CHAIN),
        (Language::Python, SdkMode::OffChain) => Ok(&PYTHON_OFF_CHAIN),
        (Language::TypeScript, SdkMode::OffChain) => Ok(&TYPESCRIPT),
        (language, mode) => Err(Error::config(format!(
            "{} SDK generation is not supported for {}",
            mode, language
        ))),
    }
}

/// Join arguments as `<type> <name>` pairs or any other shape
fn join_arguments(arguments: &[Argument], f: impl Fn(&Argument) -> String) -> String {
    arguments.iter().map(f).collect::<Vec<_>>().join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sink::MemorySink;
    use crate::{mapper_for, GenerationConfig};
    use cpm_core::Manifest;

    fn manifest() -> Manifest {
        Manifest::from_value(serde_json::json!({
            "name": "Counter",
            "abi": {"methods": [
                {"name": "get", "parameters": [], "returntype": "Integer", "safe": true}
            ], "events": []}
        }))
        .unwrap()
    }

    #[test]
    fn test_unsupported_combinations() {
        assert!(renderer_for(Language::CSharp, SdkMode::OffChain).is_err());
        assert!(renderer_for(Language::TypeScript, SdkMode::OnChain).is_err());
        for language in Language::ALL {
            for mode in SdkMode::ALL {
                assert_eq!(renderer_for(language, mode).is_ok(), language.supports(mode));
            }
        }
    }

    #[test]
    fn test_render_writes_under_destination() {
        let config = GenerationConfig::new(Language::Java, SdkMode::OnChain).with_destination("out/java");
        let ctr = ContractTemplate::build(&manifest(), mapper_for(Language::Java, SdkMode::OnChain), &config).unwrap();
        let templates = TemplateManager::new().unwrap();
        let mut sink = MemorySink::new();

        let written = renderer_for(Language::Java, SdkMode::OnChain)
            .unwrap()
            .render(&ctr, &mut sink, &config, &templates)
            .unwrap();

        assert_eq!(written, vec![PathBuf::from("out/java/Counter.java")]);
        assert!(sink.file("out/java/Counter.java").unwrap().contains("public native int get();"));
    }
}
