//! Contract downloading through external tools
//!
//! Only neo-express (`neoxp`) is supported. Downloads are attempted host by
//! host until one succeeds.

use async_trait::async_trait;
use cpm_core::{Error, Result, ScriptHash};
use tokio::process::Command;
use tracing::{debug, info};

/// Prefix marking output that came from neo-express
pub const NEOXP_PREFIX: &str = "[NEOXP]";

const NEOXP: &str = "neoxp";

/// Downloads a deployed contract from a network host into the local environment
#[async_trait]
pub trait Downloader: Send + Sync {
    /// Download one contract, returning the tool's output on success
    async fn download_contract(&self, script_hash: &ScriptHash, host: &str) -> Result<String>;
}

/// Downloader backed by the `neoxp contract download` command
#[derive(Debug, Clone)]
pub struct NeoExpressDownloader {
    executable_path: Option<String>,
    config_path: String,
}

impl NeoExpressDownloader {
    /// Create a downloader after checking that `neoxp` can be started
    pub async fn new<S: Into<String>>(executable_path: Option<String>, config_path: S) -> Result<Self> {
        let downloader = Self {
            executable_path,
            config_path: config_path.into(),
        };

        let (program, args) = downloader.command_line(vec!["-h".to_string()]);
        let status = Command::new(&program).args(&args).output().await;
        match (status, &downloader.executable_path) {
            (Ok(output), _) if output.status.success() => Ok(downloader),
            (_, None) => Err(Error::download(
                "Could not find 'neoxp' executable in $PATH. Please install neoxp globally using \
                 'dotnet tool install Neo.Express -g' or specify the 'executable-path' in cpm.yaml \
                 in the neo-express tools section",
            )),
            (Ok(output), Some(path)) => Err(Error::download(format!(
                "could not run 'neoxp' at the configured executable-path {}: exit status {}",
                path, output.status
            ))),
            (Err(e), Some(path)) => Err(Error::download(format!(
                "could not find 'neoxp' executable in the configured executable-path {}: {}",
                path, e
            ))),
        }
    }

    /// Arguments for downloading `script_hash` from `host`
    fn download_args(&self, script_hash: &ScriptHash, host: &str) -> Vec<String> {
        vec![
            "contract".to_string(),
            "download".to_string(),
            "-i".to_string(),
            self.config_path.clone(),
            "--force".to_string(),
            script_hash.to_string(),
            host.to_string(),
        ]
    }

    /// Program and arguments to spawn for a neoxp invocation.
    ///
    /// A globally installed neoxp on macOS is only found through a login shell.
    fn command_line(&self, args: Vec<String>) -> (String, Vec<String>) {
        match &self.executable_path {
            Some(path) => (path.clone(), args),
            None if cfg!(target_os = "macos") => {
                let mut line = vec![NEOXP.to_string()];
                line.extend(args);
                ("bash".to_string(), vec!["-c".to_string(), line.join(" ")])
            }
            None => (NEOXP.to_string(), args),
        }
    }
}

#[async_trait]
impl Downloader for NeoExpressDownloader {
    async fn download_contract(&self, script_hash: &ScriptHash, host: &str) -> Result<String> {
        let (program, args) = self.command_line(self.download_args(script_hash, host));
        debug!("Running {} {}", program, args.join(" "));

        let output = Command::new(&program)
            .args(&args)
            .output()
            .await
            .map_err(|e| Error::download(format!("{}failed to start {}: {}", NEOXP_PREFIX, program, e)))?;

        if output.status.success() {
            Ok(format!("{}{}", NEOXP_PREFIX, String::from_utf8_lossy(&output.stdout)))
        } else {
            Err(Error::download(format!(
                "{}{}",
                NEOXP_PREFIX,
                String::from_utf8_lossy(&output.stderr)
            )))
        }
    }
}

/// Try each host in order until one download succeeds
pub async fn download_from_hosts(
    downloader: &dyn Downloader,
    script_hash: &ScriptHash,
    hosts: &[String],
) -> Result<String> {
    for host in hosts {
        debug!("Attempting to download contract {} from {}", script_hash, host);
        match downloader.download_contract(script_hash, host).await {
            Ok(message) => {
                info!("{}", message.trim_end());
                return Ok(message);
            }
            Err(e) => debug!("{}", e),
        }
    }
    Err(Error::download(format!(
        "Failed to download contract {}. Use '--log-level DEBUG' for more information",
        script_hash
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    const NEO: &str = "0xef4073a0f2b305a38ec4050e4d3d28bc40ea63f5";

    /// Fails for every host except `good`
    struct MockDownloader {
        good: &'static str,
        attempts: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl Downloader for MockDownloader {
        async fn download_contract(&self, script_hash: &ScriptHash, host: &str) -> Result<String> {
            self.attempts.lock().unwrap().push(host.to_string());
            if host == self.good {
                Ok(format!("{}downloaded {}", NEOXP_PREFIX, script_hash))
            } else {
                Err(Error::download(format!("{}connection refused", NEOXP_PREFIX)))
            }
        }
    }

    fn hosts(list: &[&str]) -> Vec<String> {
        list.iter().map(|h| h.to_string()).collect()
    }

    #[tokio::test]
    async fn test_download_stops_at_first_success() {
        let downloader = MockDownloader {
            good: "http://b",
            attempts: Mutex::new(Vec::new()),
        };
        let hash: ScriptHash = NEO.parse().unwrap();

        let message = download_from_hosts(&downloader, &hash, &hosts(&["http://a", "http://b", "http://c"]))
            .await
            .unwrap();

        assert_eq!(message, format!("[NEOXP]downloaded {}", NEO));
        assert_eq!(*downloader.attempts.lock().unwrap(), vec!["http://a", "http://b"]);
    }

    #[tokio::test]
    async fn test_download_fails_when_every_host_fails() {
        let downloader = MockDownloader {
            good: "http://nowhere",
            attempts: Mutex::new(Vec::new()),
        };

        let err = download_from_hosts(&downloader, &ScriptHash::ZERO, &hosts(&["http://a", "http://b"]))
            .await
            .unwrap_err();

        assert!(matches!(err, Error::Download(_)));
        assert!(err.to_string().contains("--log-level DEBUG"));
        assert_eq!(downloader.attempts.lock().unwrap().len(), 2);
    }

    #[test]
    fn test_download_arguments() {
        let downloader = NeoExpressDownloader {
            executable_path: Some("/opt/neoxp".to_string()),
            config_path: "default.neo-express".to_string(),
        };
        let hash: ScriptHash = NEO.parse().unwrap();

        let (program, args) = downloader.command_line(downloader.download_args(&hash, "http://127.0.0.1:50012"));
        assert_eq!(program, "/opt/neoxp");
        assert_eq!(
            args,
            vec![
                "contract",
                "download",
                "-i",
                "default.neo-express",
                "--force",
                NEO,
                "http://127.0.0.1:50012"
            ]
        );
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_neoxp_output_is_prefixed() {
        let downloader = NeoExpressDownloader::new(Some("echo".to_string()), "local.neo-express")
            .await
            .unwrap();

        let message = downloader
            .download_contract(&ScriptHash::ZERO, "http://localhost:1")
            .await
            .unwrap();
        assert!(message.starts_with("[NEOXP]contract download -i local.neo-express --force 0x"));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_unusable_executable_is_rejected() {
        let err = NeoExpressDownloader::new(Some("false".to_string()), "local.neo-express")
            .await
            .unwrap_err();
        assert!(err.to_string().contains("configured executable-path"));

        let err = NeoExpressDownloader::new(Some("/definitely/not/neoxp".to_string()), "x")
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Download(_)));
    }
}
