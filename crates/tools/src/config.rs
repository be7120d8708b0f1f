/// Configuration management for cpm projects (`cpm.yaml`)
use std::env;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use cpm_codegen::{default_destination, Language, SdkMode};
use cpm_core::ScriptHash;
use serde::{Deserialize, Serialize};
use tracing::info;

/// Default configuration file name
pub const DEFAULT_CONFIG_FILE: &str = "cpm.yaml";

/// Label recorded for contracts saved without a known name
pub const UNKNOWN_CONTRACT_LABEL: &str = "unknown";

/// Languages to generate for one SDK flavour
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LanguageSelection {
    #[serde(default)]
    pub languages: Vec<Language>,
}

impl LanguageSelection {
    pub fn new(languages: Vec<Language>) -> Self {
        Self { languages }
    }
}

/// Configured output directories for on-chain SDKs
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OnChainDestinations {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub csharp: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub golang: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub java: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub python: Option<String>,
}

/// Configured output directories for off-chain SDKs
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OffChainDestinations {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub golang: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub java: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub python: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ts: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SdkDestinations {
    #[serde(rename = "on-chain", default)]
    pub on_chain: OnChainDestinations,
    #[serde(rename = "off-chain", default)]
    pub off_chain: OffChainDestinations,
}

/// Project-wide defaults applied to every contract
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Defaults {
    /// Network label contracts are downloaded from
    pub contract_source_network: String,
    /// Whether SDKs are generated for downloaded contracts
    pub contract_generate_sdk: bool,
    #[serde(default)]
    pub on_chain: LanguageSelection,
    #[serde(default)]
    pub off_chain: LanguageSelection,
    #[serde(default)]
    pub sdk_destinations: SdkDestinations,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            contract_source_network: "priv".to_string(),
            contract_generate_sdk: true,
            on_chain: LanguageSelection::new(vec![Language::Python]),
            off_chain: LanguageSelection::new(vec![Language::TypeScript]),
            sdk_destinations: SdkDestinations::default(),
        }
    }
}

/// A contract tracked by the project
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ContractConfig {
    pub label: String,
    pub script_hash: ScriptHash,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_network: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contract_generate_sdk: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub on_chain: Option<LanguageSelection>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub off_chain: Option<LanguageSelection>,
}

impl ContractConfig {
    pub fn new<S: Into<String>>(label: S, script_hash: ScriptHash) -> Self {
        Self {
            label: label.into(),
            script_hash,
            source_network: None,
            contract_generate_sdk: None,
            on_chain: None,
            off_chain: None,
        }
    }

    /// Network label, falling back to the defaults
    pub fn source_network<'a>(&'a self, defaults: &'a Defaults) -> &'a str {
        self.source_network
            .as_deref()
            .unwrap_or(&defaults.contract_source_network)
    }

    /// Whether SDKs should be generated, falling back to the defaults
    pub fn generate_sdk(&self, defaults: &Defaults) -> bool {
        self.contract_generate_sdk
            .unwrap_or(defaults.contract_generate_sdk)
    }

    /// Languages to generate for `mode`, falling back to the defaults
    pub fn languages<'a>(&'a self, defaults: &'a Defaults, mode: SdkMode) -> &'a [Language] {
        let (own, default) = match mode {
            SdkMode::OnChain => (&self.on_chain, &defaults.on_chain),
            SdkMode::OffChain => (&self.off_chain, &defaults.off_chain),
        };
        &own.as_ref().unwrap_or(default).languages
    }
}

/// neo-express tool settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct NeoExpressConfig {
    pub can_generate_sdk: bool,
    pub can_download_contract: bool,
    /// Explicit `neoxp` executable; `None` means look it up in `$PATH`
    #[serde(default)]
    pub executable_path: Option<String>,
    /// neo-express instance file passed with `-i`
    pub config_path: String,
}

impl Default for NeoExpressConfig {
    fn default() -> Self {
        Self {
            can_generate_sdk: false,
            can_download_contract: true,
            executable_path: None,
            config_path: "default.neo-express".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolsConfig {
    #[serde(rename = "neo-express", default)]
    pub neo_express: NeoExpressConfig,
}

/// Named set of RPC hosts
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkConfig {
    pub label: String,
    pub hosts: Vec<String>,
}

/// Main cpm configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CpmConfig {
    #[serde(default)]
    pub defaults: Defaults,
    #[serde(default)]
    pub contracts: Vec<ContractConfig>,
    #[serde(default)]
    pub tools: ToolsConfig,
    #[serde(default)]
    pub networks: Vec<NetworkConfig>,
}

impl Default for CpmConfig {
    fn default() -> Self {
        Self {
            defaults: Defaults::default(),
            contracts: Vec::new(),
            tools: ToolsConfig::default(),
            networks: vec![
                NetworkConfig {
                    label: "mainnet".to_string(),
                    hosts: vec![
                        "https://mainnet1.neo.coz.io:443".to_string(),
                        "http://seed1.neo.org:10332".to_string(),
                    ],
                },
                NetworkConfig {
                    label: "testnet".to_string(),
                    hosts: vec![
                        "https://testnet1.neo.coz.io:443".to_string(),
                        "http://seed1t5.neo.org:20332".to_string(),
                    ],
                },
                NetworkConfig {
                    label: "priv".to_string(),
                    hosts: vec!["http://127.0.0.1:50012".to_string()],
                },
            ],
        }
    }
}

/// Configuration validation error
#[derive(Debug)]
pub struct ValidationError {
    pub field: String,
    pub message: String,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Validation error in field '{}': {}", self.field, self.message)
    }
}

/// Configuration validation result
pub type ValidationResult = std::result::Result<(), Vec<ValidationError>>;

/// Configuration validator trait
pub trait ConfigValidator {
    /// Validate the configuration
    fn validate(&self) -> ValidationResult;
}

impl ConfigValidator for CpmConfig {
    fn validate(&self) -> ValidationResult {
        let mut errors = Vec::new();

        for (i, network) in self.networks.iter().enumerate() {
            if network.label.is_empty() {
                errors.push(ValidationError {
                    field: format!("networks.{}.label", i),
                    message: "Network label cannot be empty".to_string(),
                });
            }
            if network.hosts.is_empty() {
                errors.push(ValidationError {
                    field: format!("networks.{}.hosts", network.label),
                    message: "At least one host is required".to_string(),
                });
            }
            if self.networks[..i].iter().any(|n| n.label == network.label) {
                errors.push(ValidationError {
                    field: format!("networks.{}", network.label),
                    message: "Duplicate network label".to_string(),
                });
            }
        }

        for contract in &self.contracts {
            let network = contract.source_network(&self.defaults);
            if !self.networks.iter().any(|n| n.label == network) {
                errors.push(ValidationError {
                    field: format!("contracts.{}.source-network", contract.label),
                    message: format!("Unknown network '{}'", network),
                });
            }
        }

        for mode in SdkMode::ALL {
            let (defaults, overrides): (&LanguageSelection, Vec<&LanguageSelection>) = match mode {
                SdkMode::OnChain => (
                    &self.defaults.on_chain,
                    self.contracts.iter().filter_map(|c| c.on_chain.as_ref()).collect(),
                ),
                SdkMode::OffChain => (
                    &self.defaults.off_chain,
                    self.contracts.iter().filter_map(|c| c.off_chain.as_ref()).collect(),
                ),
            };
            let languages = std::iter::once(defaults)
                .chain(overrides)
                .flat_map(|selection| selection.languages.iter());
            for language in languages {
                if !language.supports(mode) {
                    errors.push(ValidationError {
                        field: format!("{}.languages", mode),
                        message: format!("{} SDKs are not supported for {}", mode, language),
                    });
                }
            }
        }

        if self.tools.neo_express.config_path.is_empty() {
            errors.push(ValidationError {
                field: "tools.neo-express.config-path".to_string(),
                message: "neo-express config path cannot be empty".to_string(),
            });
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

/// Configuration manager for loading, validating, and saving `cpm.yaml`
#[derive(Debug)]
pub struct ConfigManager {
    config: CpmConfig,
    config_path: PathBuf,
}

impl ConfigManager {
    /// Create a new configuration manager with the default configuration
    pub fn new() -> Self {
        Self {
            config: CpmConfig::default(),
            config_path: PathBuf::from(DEFAULT_CONFIG_FILE),
        }
    }

    /// Load configuration from a file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(anyhow::anyhow!(
                "Config file {} not found. Run `cpm init` to create a default config",
                path.display()
            ));
        }
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read configuration file: {}", path.display()))?;

        let config = match path.extension().and_then(|s| s.to_str()) {
            Some("toml") => toml::from_str(&content)
                .with_context(|| format!("Failed to parse TOML configuration file: {}", path.display()))?,
            Some("json") => serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse JSON configuration file: {}", path.display()))?,
            Some("yaml") | Some("yml") => serde_yaml::from_str(&content)
                .with_context(|| format!("Failed to parse YAML configuration file: {}", path.display()))?,
            _ => return Err(anyhow::anyhow!("Unsupported configuration file format. Supported formats: .toml, .json, .yaml, .yml")),
        };

        let mut manager = Self {
            config,
            config_path: path.to_path_buf(),
        };

        // Apply environment overrides
        manager.apply_environment_overrides()?;

        Ok(manager)
    }

    /// Apply environment variable overrides
    pub fn apply_environment_overrides(&mut self) -> Result<()> {
        self.apply_overrides(|key| env::var(key).ok())
    }

    /// Apply overrides from `lookup`, keyed by environment variable name
    fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(network) = lookup("CPM_DEFAULT_NETWORK") {
            if network.is_empty() {
                return Err(anyhow::anyhow!("CPM_DEFAULT_NETWORK cannot be empty"));
            }
            self.config.defaults.contract_source_network = network;
        }
        if let Some(path) = lookup("CPM_NEOXP_PATH") {
            self.config.tools.neo_express.executable_path = Some(path);
        }
        if let Some(path) = lookup("CPM_NEOXP_CONFIG") {
            self.config.tools.neo_express.config_path = path;
        }

        Ok(())
    }

    /// Validate the current configuration
    pub fn validate(&self) -> ValidationResult {
        self.config.validate()
    }

    /// Get the configuration
    pub fn config(&self) -> &CpmConfig {
        &self.config
    }

    /// Get a mutable reference to the configuration
    pub fn config_mut(&mut self) -> &mut CpmConfig {
        &mut self.config
    }

    /// Path the configuration was loaded from
    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    /// Save the current configuration to a file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();

        let content = match path.extension().and_then(|s| s.to_str()) {
            Some("toml") => toml::to_string_pretty(&self.config)
                .with_context(|| "Failed to serialize configuration to TOML")?,
            Some("json") => serde_json::to_string_pretty(&self.config)
                .with_context(|| "Failed to serialize configuration to JSON")?,
            Some("yaml") | Some("yml") => serde_yaml::to_string(&self.config)
                .with_context(|| "Failed to serialize configuration to YAML")?,
            _ => return Err(anyhow::anyhow!("Unsupported configuration file format. Supported formats: .toml, .json, .yaml, .yml")),
        };

        fs::write(path, content)
            .with_context(|| format!("Failed to write configuration file: {}", path.display()))?;

        Ok(())
    }

    /// Save back to the file the configuration was loaded from
    pub fn save(&self) -> Result<()> {
        self.save_to_file(&self.config_path)
    }

    /// Generate a default configuration file, refusing to overwrite an existing one
    pub fn generate_default_config<P: AsRef<Path>>(path: P) -> Result<()> {
        let path = path.as_ref();
        if path.exists() {
            return Err(anyhow::anyhow!("{} already exists", path.display()));
        }

        let manager = ConfigManager {
            config: CpmConfig::default(),
            config_path: path.to_path_buf(),
        };
        manager.save()?;
        info!("Written {}", path.display());
        Ok(())
    }

    /// Hosts of the network with the given label
    pub fn hosts(&self, network_label: &str) -> Result<&[String]> {
        self.config
            .networks
            .iter()
            .find(|n| n.label == network_label)
            .map(|n| n.hosts.as_slice())
            .ok_or_else(|| anyhow::anyhow!("Could not find hosts for label: {}", network_label))
    }

    /// Output directory for an SDK, always ending in `/`
    pub fn sdk_destination(&self, language: Language, mode: SdkMode) -> String {
        let destinations = &self.config.defaults.sdk_destinations;
        let configured = match (mode, language) {
            (SdkMode::OnChain, Language::CSharp) => &destinations.on_chain.csharp,
            (SdkMode::OnChain, Language::Go) => &destinations.on_chain.golang,
            (SdkMode::OnChain, Language::Java) => &destinations.on_chain.java,
            (SdkMode::OnChain, Language::Python) => &destinations.on_chain.python,
            (SdkMode::OffChain, Language::Go) => &destinations.off_chain.golang,
            (SdkMode::OffChain, Language::Java) => &destinations.off_chain.java,
            (SdkMode::OffChain, Language::Python) => &destinations.off_chain.python,
            (SdkMode::OffChain, Language::TypeScript) => &destinations.off_chain.ts,
            _ => &None,
        };

        match configured {
            Some(path) => ensure_suffix(path),
            None => default_destination(language, mode),
        }
    }

    /// Record a contract unless one with the same script hash is already tracked.
    ///
    /// Returns whether the contract was added.
    pub fn add_contract<S: Into<String>>(&mut self, label: S, script_hash: ScriptHash) -> bool {
        if self
            .config
            .contracts
            .iter()
            .any(|c| c.script_hash == script_hash)
        {
            return false;
        }
        self.config
            .contracts
            .push(ContractConfig::new(label, script_hash));
        true
    }
}

impl Default for ConfigManager {
    fn default() -> Self {
        Self::new()
    }
}

fn ensure_suffix(path: &str) -> String {
    if path.ends_with('/') {
        path.to_string()
    } else {
        format!("{}/", path)
    }
}
