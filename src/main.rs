/// cpm main entry point
use std::path::PathBuf;

use anyhow::Result;
use clap::{ArgGroup, Args, Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

use cpm_codegen::cli::GenerateArgs;
use cpm_codegen::Language;
use cpm_tools::DEFAULT_CONFIG_FILE;

mod commands;

#[derive(Parser)]
#[command(name = "cpm")]
#[command(author, version, about = "Contract Package Manager", long_about = None)]
struct Cli {
    /// Log output level
    #[arg(long, value_enum, ignore_case = true, default_value = "INFO", global = true)]
    log_level: LogLevel,

    /// Path to the project configuration file
    #[arg(long, default_value = DEFAULT_CONFIG_FILE, global = true)]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum LogLevel {
    #[value(name = "INFO")]
    Info,
    #[value(name = "DEBUG")]
    Debug,
}

impl LogLevel {
    fn directive(self) -> &'static str {
        match self {
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Create a new cpm.yaml config file
    Init,

    /// Download all contracts from cpm.yaml and generate SDKs where specified
    Run {
        /// Override config settings to only download contracts
        #[arg(long, conflicts_with = "sdk_only")]
        download_only: bool,

        /// Override config settings to only generate SDKs
        #[arg(long)]
        sdk_only: bool,
    },

    /// Download contract or manifest
    Download {
        #[command(subcommand)]
        target: DownloadCommand,
    },

    /// Generate SDK from manifest
    Generate {
        #[command(subcommand)]
        language: GenerateCommand,
    },
}

/// Where a download reads from: a network label from the config or a single host
#[derive(Debug, Clone, Args)]
#[command(group(ArgGroup::new("source").required(true).args(["network", "host"])))]
struct SourceArgs {
    /// Contract script hash
    #[arg(short = 'c', long = "contract", value_name = "HASH")]
    contract: String,

    /// Source network label, resolved to hosts through cpm.yaml
    #[arg(short = 'n', long = "network")]
    network: Option<String>,

    /// Source network host
    #[arg(short = 'N', long = "host")]
    host: Option<String>,

    /// Save the contract to the 'contracts' section of cpm.yaml (default)
    #[arg(short = 's', long = "save", overrides_with = "no_save")]
    save: bool,

    /// Do not record the contract in cpm.yaml
    #[arg(long = "no-save", overrides_with = "save")]
    no_save: bool,
}

impl SourceArgs {
    /// Whether the contract should be recorded in the config file
    fn save(&self) -> bool {
        self.save || !self.no_save
    }
}

#[derive(Subcommand)]
enum DownloadCommand {
    /// Download a single contract
    Contract {
        #[command(flatten)]
        source: SourceArgs,

        /// neo-express config file
        #[arg(short = 'i', long = "neoxp-config")]
        neoxp_config: Option<String>,
    },

    /// Download the contract manifest
    Manifest {
        #[command(flatten)]
        source: SourceArgs,
    },
}

#[derive(Subcommand)]
enum GenerateCommand {
    /// Generate an SDK for use with Golang
    #[command(name = "go", alias = "golang")]
    Go(GenerateArgs),
    /// Generate an SDK for use with Python
    Python(GenerateArgs),
    /// Generate an SDK for use with Java
    Java(GenerateArgs),
    /// Generate an on-chain SDK for use with C#
    Csharp(GenerateArgs),
    /// Generate an off-chain SDK for use with TypeScript
    #[command(name = "ts", alias = "typescript")]
    Ts(GenerateArgs),
}

impl GenerateCommand {
    fn split(&self) -> (Language, &GenerateArgs) {
        match self {
            GenerateCommand::Go(args) => (Language::Go, args),
            GenerateCommand::Python(args) => (Language::Python, args),
            GenerateCommand::Java(args) => (Language::Java, args),
            GenerateCommand::Csharp(args) => (Language::CSharp, args),
            GenerateCommand::Ts(args) => (Language::TypeScript, args),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command line arguments
    let cli = Cli::parse();

    // Initialize tracing; RUST_LOG takes precedence over --log-level
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(cli.log_level.directive()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    match cli.command {
        Commands::Init => commands::init(&cli.config),
        Commands::Run {
            download_only,
            sdk_only,
        } => commands::run(&cli.config, download_only, sdk_only).await,
        Commands::Download { target } => match target {
            DownloadCommand::Contract {
                source,
                neoxp_config,
            } => commands::download_contract(&cli.config, &source, neoxp_config).await,
            DownloadCommand::Manifest { source } => {
                commands::download_manifest(&cli.config, &source).await
            }
        },
        Commands::Generate { language } => {
            let (language, args) = language.split();
            commands::generate(&cli.config, language, args)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cpm_codegen::SdkMode;

    #[test]
    fn test_cli_is_well_formed() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_global_options() {
        let cli = Cli::try_parse_from(["cpm", "--log-level", "debug", "init"]).unwrap();
        assert_eq!(cli.log_level, LogLevel::Debug);
        assert_eq!(cli.config, PathBuf::from("cpm.yaml"));

        let cli = Cli::try_parse_from(["cpm", "init", "--config", "other.yaml"]).unwrap();
        assert_eq!(cli.log_level, LogLevel::Info);
        assert_eq!(cli.config, PathBuf::from("other.yaml"));
    }

    #[test]
    fn test_run_flags_are_exclusive() {
        assert!(Cli::try_parse_from(["cpm", "run", "--download-only"]).is_ok());
        assert!(Cli::try_parse_from(["cpm", "run", "--download-only", "--sdk-only"]).is_err());
    }

    #[test]
    fn test_download_requires_one_source() {
        let hash = "0xef4073a0f2b305a38ec4050e4d3d28bc40ea63f5";
        assert!(Cli::try_parse_from(["cpm", "download", "manifest", "-c", hash]).is_err());
        assert!(Cli::try_parse_from([
            "cpm", "download", "manifest", "-c", hash, "-n", "priv", "-N", "http://127.0.0.1:50012"
        ])
        .is_err());

        let cli = Cli::try_parse_from(["cpm", "download", "contract", "-c", hash, "-N", "http://127.0.0.1:50012", "-s"])
            .unwrap();
        match cli.command {
            Commands::Download {
                target: DownloadCommand::Contract { source, neoxp_config },
            } => {
                assert_eq!(source.host.as_deref(), Some("http://127.0.0.1:50012"));
                assert!(source.network.is_none());
                assert!(source.save());
                assert!(neoxp_config.is_none());
            }
            _ => panic!("expected download contract"),
        }
    }

    #[test]
    fn test_contracts_are_saved_unless_disabled() {
        let hash = "0xef4073a0f2b305a38ec4050e4d3d28bc40ea63f5";
        let parse = |extra: &[&str]| {
            let mut args = vec!["cpm", "download", "manifest", "-c", hash, "-n", "priv"];
            args.extend_from_slice(extra);
            match Cli::try_parse_from(args).unwrap().command {
                Commands::Download {
                    target: DownloadCommand::Manifest { source },
                } => source.save(),
                _ => panic!("expected download manifest"),
            }
        };

        assert!(parse(&[]));
        assert!(!parse(&["--no-save"]));
        assert!(parse(&["--no-save", "-s"]));
    }

    #[test]
    fn test_generate_subcommands() {
        let cli = Cli::try_parse_from(["cpm", "generate", "ts", "-m", "contract.manifest.json"]).unwrap();
        let Commands::Generate { language } = cli.command else {
            panic!("expected generate");
        };
        let (language, args) = language.split();
        assert_eq!(language, Language::TypeScript);
        assert_eq!(args.manifest, PathBuf::from("contract.manifest.json"));

        let cli = Cli::try_parse_from([
            "cpm", "generate", "golang", "-m", "m.json", "-t", "offchain", "-c",
            "0xef4073a0f2b305a38ec4050e4d3d28bc40ea63f5",
        ])
        .unwrap();
        let Commands::Generate { language } = cli.command else {
            panic!("expected generate");
        };
        let (language, args) = language.split();
        assert_eq!(language, Language::Go);
        assert_eq!(args.mode, Some(SdkMode::OffChain));
    }
}
