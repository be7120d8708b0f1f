//! Project tooling for cpm: configuration, contract downloads and manifest fetching
pub mod config;
pub mod downloader;
pub mod rpc;

pub use config::{ConfigManager, ConfigValidator, CpmConfig, DEFAULT_CONFIG_FILE};
pub use downloader::{download_from_hosts, Downloader, NeoExpressDownloader};
pub use rpc::{fetch_manifest_from_hosts, ContractState, RpcClient};
