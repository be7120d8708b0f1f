//! SDK generator
//!
//! Drives one generation request: template construction, rendering and either
//! writing through the sink or printing a dry-run preview.

use cpm_core::{Error, Manifest, Result};
use std::path::PathBuf;
use tracing::{debug, info};

use crate::mapper::mapper_for;
use crate::render::renderer_for;
use crate::sink::OutputSink;
use crate::template::ContractTemplate;
use crate::templates::TemplateManager;
use crate::GenerationConfig;

/// Result of a successful generation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedSdk {
    pub contract_name: String,
    /// Written paths, or the paths that would be written on a dry run
    pub files: Vec<PathBuf>,
}

/// Code generator for contract SDKs
pub struct SdkGenerator {
    templates: TemplateManager,
}

impl SdkGenerator {
    /// Create a generator with all templates registered
    pub fn new() -> Result<Self> {
        Ok(Self {
            templates: TemplateManager::new()?,
        })
    }

    /// Generate the SDK described by `config` for `manifest`
    pub fn generate(
        &self,
        manifest: &Manifest,
        config: &GenerationConfig,
        sink: &mut dyn OutputSink,
    ) -> Result<GeneratedSdk> {
        if !config.language.supports(config.mode) {
            return Err(Error::config(format!(
                "{} SDK generation is not supported for {}",
                config.mode, config.language
            )));
        }

        let mapper = mapper_for(config.language, config.mode);
        let renderer = renderer_for(config.language, config.mode)?;
        let ctr = ContractTemplate::build(manifest, mapper, config)?;
        debug!(
            "Built template for '{}' with {} methods and {} events",
            ctr.manifest_name,
            ctr.methods.len(),
            ctr.events.len()
        );

        let files = if config.dry_run {
            let rendered = renderer.render_files(&ctr, config, &self.templates)?;
            let mut files = Vec::with_capacity(rendered.len());
            for file in rendered {
                let path = config.destination.join(&file.path);
                println!("\n--- {} ---", path.display());
                println!("{}", file.content);
                files.push(path);
            }
            files
        } else {
            renderer.render(&ctr, sink, config, &self.templates)?
        };

        if !config.dry_run {
            info!(
                "Created {} SDK for contract '{}' at {} with contract hash {}",
                config.mode,
                manifest.name,
                config.destination.display(),
                ctr.hash
            );
        }

        Ok(GeneratedSdk {
            contract_name: ctr.contract_name,
            files,
        })
    }
}
