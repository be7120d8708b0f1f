//! Command handlers for the cpm binary

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use tracing::{error, info, warn};

use cpm_codegen::cli::{handle_generate_command, GenerateArgs};
use cpm_codegen::{generate_sdk, FsSink, GenerationConfig, Language, SdkMode};
use cpm_core::{Manifest, ScriptHash};
use cpm_tools::config::{ContractConfig, UNKNOWN_CONTRACT_LABEL};
use cpm_tools::{
    download_from_hosts, fetch_manifest_from_hosts, ConfigManager, Downloader,
    NeoExpressDownloader,
};

use crate::SourceArgs;

/// File `download manifest` writes to
pub const MANIFEST_FILE: &str = "contract.manifest.json";

/// `cpm init`
pub fn init(config_path: &Path) -> Result<()> {
    ConfigManager::generate_default_config(config_path)
}

/// `cpm run`
pub async fn run(config_path: &Path, download_only: bool, sdk_only: bool) -> Result<()> {
    if download_only && sdk_only {
        return Err(anyhow!("sdk-only and download-only flags are mutually exclusive."));
    }

    let manager = load_config(config_path)?;
    let config = manager.config();

    let downloader = if sdk_only {
        None
    } else {
        let neo_express = &config.tools.neo_express;
        Some(
            NeoExpressDownloader::new(
                neo_express.executable_path.clone(),
                neo_express.config_path.clone(),
            )
            .await?,
        )
    };

    run_contracts(&manager, downloader.as_ref().map(|d| d as &dyn Downloader), download_only).await
}

/// Process every configured contract.
///
/// A failing contract is logged and skipped; `run` fails after all contracts were attempted.
async fn run_contracts(
    manager: &ConfigManager,
    downloader: Option<&dyn Downloader>,
    download_only: bool,
) -> Result<()> {
    let contracts = &manager.config().contracts;
    let mut failures = 0;

    for contract in contracts {
        info!(
            "Processing contract '{}' ({})",
            contract.label, contract.script_hash
        );
        if let Err(e) = process_contract(manager, contract, downloader, download_only).await {
            error!("{:#}", e);
            failures += 1;
        }
    }

    if failures > 0 {
        return Err(anyhow!(
            "Failed to process {} of {} contract(s). Use '--log-level DEBUG' for more information",
            failures,
            contracts.len()
        ));
    }
    Ok(())
}

async fn process_contract(
    manager: &ConfigManager,
    contract: &ContractConfig,
    downloader: Option<&dyn Downloader>,
    download_only: bool,
) -> Result<()> {
    let defaults = &manager.config().defaults;
    let hosts = manager.hosts(contract.source_network(defaults))?;

    if let Some(downloader) = downloader {
        download_from_hosts(downloader, &contract.script_hash, hosts)
            .await
            .with_context(|| {
                format!(
                    "Failed to download contract '{}' ({})",
                    contract.label, contract.script_hash
                )
            })?;
    }

    if download_only || !contract.generate_sdk(defaults) {
        return Ok(());
    }

    let state = fetch_manifest_from_hosts(&contract.script_hash, hosts)
        .await
        .with_context(|| {
            format!(
                "Failed to generate SDK for contract '{}' ({})",
                contract.label, contract.script_hash
            )
        })?;
    generate_configured_sdks(manager, contract, &state.manifest)
}

/// Generate every on-chain and off-chain SDK configured for `contract`.
///
/// A failing language does not stop the others; the contract fails at the end.
fn generate_configured_sdks(
    manager: &ConfigManager,
    contract: &ContractConfig,
    manifest: &Manifest,
) -> Result<()> {
    let defaults = &manager.config().defaults;
    let mut failures = 0;

    for mode in SdkMode::ALL {
        for &language in contract.languages(defaults, mode) {
            let config = GenerationConfig::new(language, mode)
                .with_destination(manager.sdk_destination(language, mode))
                .with_script_hash(contract.script_hash);

            if let Err(e) = generate_sdk(manifest, &config, &mut FsSink::new()) {
                error!(
                    "Failed to generate {} {} SDK for contract '{}': {}",
                    mode, language, contract.label, e
                );
                failures += 1;
            }
        }
    }

    if failures > 0 {
        return Err(anyhow!(
            "Failed to generate {} SDK(s) for contract '{}' ({})",
            failures,
            contract.label,
            contract.script_hash
        ));
    }
    Ok(())
}

/// `cpm download contract`
pub async fn download_contract(
    config_path: &Path,
    source: &SourceArgs,
    neoxp_config: Option<String>,
) -> Result<()> {
    let script_hash = parse_script_hash(&source.contract)?;
    let mut manager = load_optional_config(config_path)?;
    let hosts = resolve_hosts(manager.as_ref(), source)?;

    let neo_express = manager
        .as_ref()
        .map(|m| m.config().tools.neo_express.clone())
        .unwrap_or_default();
    let downloader = NeoExpressDownloader::new(
        neo_express.executable_path,
        neoxp_config.unwrap_or(neo_express.config_path),
    )
    .await?;

    download_from_hosts(&downloader, &script_hash, &hosts).await?;

    if source.save() {
        save_contract(manager.as_mut(), config_path, UNKNOWN_CONTRACT_LABEL, script_hash)?;
    }
    Ok(())
}

/// `cpm download manifest`
pub async fn download_manifest(config_path: &Path, source: &SourceArgs) -> Result<()> {
    let script_hash = parse_script_hash(&source.contract)?;
    let mut manager = load_optional_config(config_path)?;
    let hosts = resolve_hosts(manager.as_ref(), source)?;

    let state = fetch_manifest_from_hosts(&script_hash, &hosts)
        .await
        .context("Failed to fetch manifest. Use '--log-level DEBUG' for more information")?;

    let content = serde_json::to_string_pretty(&state.manifest_json)?;
    fs::write(MANIFEST_FILE, content)
        .with_context(|| format!("Failed to write {}", MANIFEST_FILE))?;
    info!("Written manifest to {}", MANIFEST_FILE);

    if source.save() {
        save_contract(manager.as_mut(), config_path, &state.manifest.name, script_hash)?;
    }
    Ok(())
}

/// `cpm generate <language>`
pub fn generate(config_path: &Path, language: Language, args: &GenerateArgs) -> Result<()> {
    let destination = configured_destination(config_path, language, args)?;
    handle_generate_command(language, args, destination)?;
    Ok(())
}

/// SDK destination from the config file, when there is one and no `-o` was given
fn configured_destination(
    config_path: &Path,
    language: Language,
    args: &GenerateArgs,
) -> Result<Option<PathBuf>> {
    if args.output.is_some() {
        return Ok(None);
    }
    let mode = args.mode.unwrap_or_else(|| language.default_mode());
    Ok(load_optional_config(config_path)?
        .map(|manager| PathBuf::from(manager.sdk_destination(language, mode))))
}

fn load_config(config_path: &Path) -> Result<ConfigManager> {
    let manager = ConfigManager::load_from_file(config_path)?;
    if let Err(errors) = manager.validate() {
        let details: Vec<String> = errors.iter().map(|e| e.to_string()).collect();
        return Err(anyhow!(
            "Invalid configuration in {}:\n  {}",
            config_path.display(),
            details.join("\n  ")
        ));
    }
    Ok(manager)
}

fn load_optional_config(config_path: &Path) -> Result<Option<ConfigManager>> {
    if config_path.exists() {
        load_config(config_path).map(Some)
    } else {
        Ok(None)
    }
}

fn resolve_hosts(manager: Option<&ConfigManager>, source: &SourceArgs) -> Result<Vec<String>> {
    match (&source.network, &source.host) {
        (Some(_), Some(_)) => Err(anyhow!("-n and -N flags are mutually exclusive")),
        (Some(label), None) => {
            let manager = manager.ok_or_else(|| {
                anyhow!("Network label '{}' needs a config file. Run `cpm init` first", label)
            })?;
            Ok(manager.hosts(label)?.to_vec())
        }
        (None, Some(host)) => Ok(vec![host.clone()]),
        (None, None) => Err(anyhow!("Must specify either -n or -N flag")),
    }
}

fn save_contract(
    manager: Option<&mut ConfigManager>,
    config_path: &Path,
    label: &str,
    script_hash: ScriptHash,
) -> Result<()> {
    let Some(manager) = manager else {
        warn!(
            "Config file {} not found, contract {} was not saved. Run `cpm init` to create a default config",
            config_path.display(),
            script_hash
        );
        return Ok(());
    };
    if manager.add_contract(label, script_hash) {
        manager.save()?;
        info!("Added contract {} to {}", script_hash, config_path.display());
    } else {
        info!("Contract {} is already in {}", script_hash, config_path.display());
    }
    Ok(())
}

fn parse_script_hash(hash: &str) -> Result<ScriptHash> {
    ScriptHash::from_str_le(hash).with_context(|| format!("failed to convert script hash '{}'", hash))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    use async_trait::async_trait;
    use cpm_tools::config::LanguageSelection;
    use tempfile::TempDir;

    const NEO: &str = "0xef4073a0f2b305a38ec4050e4d3d28bc40ea63f5";

    fn source(network: Option<&str>, host: Option<&str>) -> SourceArgs {
        SourceArgs {
            contract: NEO.to_string(),
            network: network.map(str::to_string),
            host: host.map(str::to_string),
            save: false,
            no_save: false,
        }
    }

    fn generate_args() -> GenerateArgs {
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
    fn test_init_refuses_to_overwrite() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("cpm.yaml");

        init(&path).unwrap();
        assert!(path.exists());
        assert!(init(&path).is_err());
    }

    #[test]
    fn test_resolve_hosts() {
        let manager = ConfigManager::new();

        let hosts = resolve_hosts(Some(&manager), &source(Some("priv"), None)).unwrap();
        assert_eq!(hosts, vec!["http://127.0.0.1:50012"]);

        let hosts = resolve_hosts(None, &source(None, Some("http://node:10332"))).unwrap();
        assert_eq!(hosts, vec!["http://node:10332"]);

        assert!(resolve_hosts(None, &source(Some("priv"), None)).is_err());
        assert!(resolve_hosts(Some(&manager), &source(None, None)).is_err());
        assert!(resolve_hosts(Some(&manager), &source(Some("unknown"), None)).is_err());
    }

    #[test]
    fn test_save_contract_persists() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("cpm.yaml");
        init(&path).unwrap();

        let mut manager = load_optional_config(&path).unwrap();
        let hash = parse_script_hash(NEO).unwrap();
        save_contract(manager.as_mut(), &path, "NeoToken", hash).unwrap();
        save_contract(manager.as_mut(), &path, "NeoToken", hash).unwrap();

        let reloaded = ConfigManager::load_from_file(&path).unwrap();
        assert_eq!(reloaded.config().contracts.len(), 1);
        assert_eq!(reloaded.config().contracts[0].label, "NeoToken");

        // Saving without a config file is skipped rather than creating one
        let missing = dir.path().join("missing.yaml");
        save_contract(None, &missing, "x", hash).unwrap();
        assert!(!missing.exists());
    }

    #[test]
    fn test_generate_destination_follows_config() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("cpm.yaml");

        // Without a config file the generator falls back to its own default
        assert_eq!(configured_destination(&path, Language::Java, &generate_args()).unwrap(), None);

        init(&path).unwrap();
        let mut manager = ConfigManager::load_from_file(&path).unwrap();
        manager.config_mut().defaults.sdk_destinations.on_chain.java = Some("sdk/java".to_string());
        manager.save().unwrap();

        assert_eq!(
            configured_destination(&path, Language::Java, &generate_args()).unwrap(),
            Some(PathBuf::from("sdk/java/"))
        );

        let mut args = generate_args();
        args.output = Some(PathBuf::from("explicit"));
        assert_eq!(configured_destination(&path, Language::Java, &args).unwrap(), None);
    }

    #[test]
    fn test_generate_from_manifest_file() {
        let dir = TempDir::new().unwrap();
        let manifest = dir.path().join("contract.manifest.json");
        fs::write(
            &manifest,
            r#"{"name": "Counter", "abi": {"methods": [{"name": "get", "parameters": [], "returntype": "Integer", "safe": true}], "events": []}}"#,
        )
        .unwrap();

        let mut args = generate_args();
        args.manifest = manifest;
        args.output = Some(dir.path().join("out"));
        args.contract = Some(NEO.to_string());

        generate(&dir.path().join("cpm.yaml"), Language::CSharp, &args).unwrap();
        let content = fs::read_to_string(dir.path().join("out/Counter.cs")).unwrap();
        assert!(content.contains("public static BigInteger Get() {"));
    }

    const TOKEN_A: &str = "0x1111111111111111111111111111111111111111";
    const TOKEN_B: &str = "0x2222222222222222222222222222222222222222";

    fn localhost_binding_permitted() -> bool {
        std::net::TcpListener::bind("127.0.0.1:0").is_ok()
    }

    fn contract_state_body(hash: &str, name: &str) -> String {
        format!(
            r#"{{"jsonrpc":"2.0","id":1,"result":{{"id":7,"updatecounter":0,"hash":"{}","nef":{{}},"manifest":{{"name":"{}","groups":[],"abi":{{"methods":[{{"name":"symbol","parameters":[],"returntype":"String","offset":0,"safe":true}}],"events":[]}},"permissions":[],"trusts":[],"extra":null}}}}}}"#,
            hash, name
        )
    }

    async fn mock_contract_state(server: &mut mockito::Server, hash: &str, body: String) -> mockito::Mock {
        server
            .mock("POST", "/")
            .match_body(mockito::Matcher::Regex(format!(
                r#""method"\s*:\s*"getcontractstate".*"params"\s*:\s*\[\s*"{}"\s*\]"#,
                hash
            )))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(body)
            .create_async()
            .await
    }

    /// Two contracts on one mocked network; python output lands under a regular file
    fn two_contract_manager(host: String, dir: &Path) -> ConfigManager {
        let blocker = dir.join("blocker");
        fs::write(&blocker, "not a directory").unwrap();

        let mut manager = ConfigManager::new();
        let config = manager.config_mut();
        config.networks = vec![cpm_tools::config::NetworkConfig {
            label: "priv".to_string(),
            hosts: vec![host],
        }];
        config.defaults.contract_source_network = "priv".to_string();
        config.defaults.contract_generate_sdk = true;
        config.defaults.on_chain = LanguageSelection::new(vec![Language::Python]);
        config.defaults.off_chain = LanguageSelection::new(vec![Language::TypeScript]);
        config.defaults.sdk_destinations.on_chain.python =
            Some(blocker.join("python").to_string_lossy().into_owned());
        config.defaults.sdk_destinations.off_chain.ts =
            Some(dir.join("ts").to_string_lossy().into_owned());
        config.contracts = vec![
            ContractConfig::new("TokenA", TOKEN_A.parse().unwrap()),
            ContractConfig::new("TokenB", TOKEN_B.parse().unwrap()),
        ];
        manager
    }

    /// Fails every download of one contract
    struct RejectingDownloader {
        rejected: ScriptHash,
        attempts: Mutex<Vec<ScriptHash>>,
    }

    #[async_trait]
    impl Downloader for RejectingDownloader {
        async fn download_contract(&self, script_hash: &ScriptHash, _host: &str) -> cpm_core::Result<String> {
            self.attempts.lock().unwrap().push(*script_hash);
            if *script_hash == self.rejected {
                Err(cpm_core::Error::download("connection refused"))
            } else {
                Ok(format!("downloaded {}", script_hash))
            }
        }
    }

    #[tokio::test]
    async fn test_run_continues_after_failing_contract() {
        if !localhost_binding_permitted() {
            return;
        }
        let dir = TempDir::new().unwrap();
        let mut server = mockito::Server::new_async().await;
        let _a = mock_contract_state(
            &mut server,
            TOKEN_A,
            r#"{"jsonrpc":"2.0","id":1,"error":{"code":-100,"message":"Unknown contract"}}"#.to_string(),
        )
        .await;
        let _b = mock_contract_state(&mut server, TOKEN_B, contract_state_body(TOKEN_B, "TokenB")).await;

        let manager = two_contract_manager(server.url(), dir.path());
        let err = run_contracts(&manager, None, false).await.unwrap_err();
        assert!(err.to_string().contains("Failed to process 2 of 2 contract(s)"));

        // TokenA never got a manifest; TokenB lost python but still produced its TypeScript SDK
        assert!(!dir.path().join("ts/tokena").exists());
        assert!(dir.path().join("ts/tokenb/index.ts").exists());
        assert!(dir.path().join("ts/tokenb/TokenB.ts").exists());
    }

    #[tokio::test]
    async fn test_run_generates_after_failed_download() {
        if !localhost_binding_permitted() {
            return;
        }
        let dir = TempDir::new().unwrap();
        let mut server = mockito::Server::new_async().await;
        let _a = mock_contract_state(&mut server, TOKEN_A, contract_state_body(TOKEN_A, "TokenA")).await;
        let _b = mock_contract_state(&mut server, TOKEN_B, contract_state_body(TOKEN_B, "TokenB")).await;

        let mut manager = two_contract_manager(server.url(), dir.path());
        manager.config_mut().defaults.on_chain = LanguageSelection::default();
        let downloader = RejectingDownloader {
            rejected: TOKEN_A.parse().unwrap(),
            attempts: Mutex::new(Vec::new()),
        };

        let err = run_contracts(&manager, Some(&downloader), false).await.unwrap_err();
        assert!(err.to_string().contains("Failed to process 1 of 2 contract(s)"));
        assert_eq!(downloader.attempts.lock().unwrap().len(), 2);
        assert!(!dir.path().join("ts/tokena").exists());
        assert!(dir.path().join("ts/tokenb/index.ts").exists());

        // Download-only never reaches the network for manifests
        let downloader = RejectingDownloader {
            rejected: ScriptHash::ZERO,
            attempts: Mutex::new(Vec::new()),
        };
        fs::remove_dir_all(dir.path().join("ts")).unwrap();
        run_contracts(&manager, Some(&downloader), true).await.unwrap();
        assert!(!dir.path().join("ts").exists());
    }

    #[tokio::test]
    async fn test_run_rejects_conflicting_flags() {
        let err = run(Path::new("cpm.yaml"), true, true).await.unwrap_err();
        assert!(err.to_string().contains("mutually exclusive"));
    }
}
