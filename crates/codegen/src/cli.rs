//! CLI interface for SDK generation

use clap::Args;
use cpm_core::{Error, Result, ScriptHash};
use std::path::{Path, PathBuf};
use tracing::info;

use crate::mapper::{Language, SdkMode};
use crate::parser::ManifestParser;
use crate::sink::FsSink;
use crate::{GeneratedSdk, GenerationConfig, SdkGenerator};

/// Arguments shared by every `generate <language>` subcommand
#[derive(Debug, Clone, Args)]
pub struct GenerateArgs {
    /// Path to the contract manifest JSON file
    #[arg(short = 'm', long = "manifest", value_name = "FILE")]
    pub manifest: PathBuf,

    /// Contract script hash embedded in the SDK
    #[arg(short = 'c', long = "contract", value_name = "HASH")]
    pub contract: Option<String>,

    /// Output directory for the generated SDK
    #[arg(short = 'o', long = "output", value_name = "DIR")]
    pub output: Option<PathBuf>,

    /// SDK flavour; defaults to the language's usual mode
    #[arg(short = 't', long = "type", value_enum)]
    pub mode: Option<SdkMode>,

    /// Namespace or package for C# and Java sources
    #[arg(long)]
    pub namespace: Option<String>,

    /// Preview generated code without writing files
    #[arg(long)]
    pub dry_run: bool,
}

impl GenerateArgs {
    /// Resolve the arguments into a generation config.
    ///
    /// `destination` is used when no output directory was given.
    pub fn to_config(&self, language: Language, destination: Option<PathBuf>) -> Result<GenerationConfig> {
        let mode = self.mode.unwrap_or_else(|| language.default_mode());
        validate_mode(language, mode)?;

        let mut config = GenerationConfig::new(language, mode);
        if let Some(hash) = &self.contract {
            config = config.with_script_hash(validate_script_hash(hash)?);
        }
        if let Some(output) = self.output.clone().or(destination) {
            config = config.with_destination(output);
        }
        if let Some(namespace) = &self.namespace {
            config = config.with_namespace(namespace.clone());
        }
        config.dry_run = self.dry_run;
        Ok(config)
    }
}

/// Handle `generate <language>`
pub fn handle_generate_command(
    language: Language,
    args: &GenerateArgs,
    destination: Option<PathBuf>,
) -> Result<GeneratedSdk> {
    validate_manifest_file(&args.manifest)?;
    let config = args.to_config(language, destination)?;

    let manifest = ManifestParser::new().parse_file(&args.manifest)?;
    if config.dry_run {
        info!("Performing dry run - no files will be written");
    }

    let mut sink = FsSink::new();
    SdkGenerator::new()?.generate(&manifest, &config, &mut sink)
}

fn validate_mode(language: Language, mode: SdkMode) -> Result<()> {
    if !language.supports(mode) {
        return Err(Error::config(format!(
            "{} SDK generation is not supported for {}",
            mode, language
        )));
    }
    Ok(())
}

/// Validate script hash format
fn validate_script_hash(hash: &str) -> Result<ScriptHash> {
    if hash.is_empty() {
        return Err(Error::config("Contract script hash cannot be empty"));
    }
    ScriptHash::from_str_le(hash)
        .map_err(|e| Error::config(format!("Invalid contract script hash '{}': {}", hash, e)))
}

/// Validate manifest file exists
fn validate_manifest_file(path: &Path) -> Result<()> {
    if !path.is_file() {
        return Err(Error::config(format!(
            "Manifest file not found: {}",
            path.display()
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args() -> GenerateArgs {
        GenerateArgs {
            manifest: PathBuf::from("contract.manifest.json"),
            contract: None,
            output: None,
            mode: None,
            namespace: None,
            dry_run: false,
        }
    }

    #[test]
    fn test_default_modes() {
        let config = args().to_config(Language::TypeScript, None).unwrap();
        assert_eq!(config.mode, SdkMode::OffChain);
        assert_eq!(config.destination, PathBuf::from("cpm_out/offchain/ts/"));

        let config = args().to_config(Language::Go, None).unwrap();
        assert_eq!(config.mode, SdkMode::OnChain);
    }

    #[test]
    fn test_output_overrides_destination() {
        let mut args = args();
        assert_eq!(
            args.to_config(Language::Java, Some(PathBuf::from("sdk/java"))).unwrap().destination,
            PathBuf::from("sdk/java")
        );
        args.output = Some(PathBuf::from("custom"));
        assert_eq!(
            args.to_config(Language::Java, Some(PathBuf::from("sdk/java"))).unwrap().destination,
            PathBuf::from("custom")
        );
    }

    #[test]
    fn test_unsupported_mode_is_rejected() {
        let mut args = args();
        args.mode = Some(SdkMode::OffChain);
        assert!(args.to_config(Language::CSharp, None).is_err());
    }

    #[test]
    fn test_script_hash_validation() {
        let mut args = args();
        args.contract = Some("0xef4073a0f2b305a38ec4050e4d3d28bc40ea63f5".to_string());
        let config = args.to_config(Language::Python, None).unwrap();
        assert_eq!(config.script_hash.to_string(), "0xef4073a0f2b305a38ec4050e4d3d28bc40ea63f5");

        args.contract = Some("0x1234".to_string());
        assert!(args.to_config(Language::Python, None).is_err());
    }

    #[test]
    fn test_missing_manifest() {
        let err = handle_generate_command(Language::Go, &args(), None).unwrap_err();
        assert!(err.to_string().contains("Manifest file not found"));
    }
}
