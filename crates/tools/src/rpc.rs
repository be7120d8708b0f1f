//! Minimal Neo JSON-RPC client used to fetch contract manifests

use cpm_core::{Error, Manifest, Result, ScriptHash};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::debug;

/// JSON-RPC error object
#[derive(Debug, Deserialize)]
struct RpcError {
    code: i64,
    message: String,
}

#[derive(Debug, Deserialize)]
struct RpcResponse {
    #[serde(default)]
    result: Option<Value>,
    #[serde(default)]
    error: Option<RpcError>,
}

/// Deployed contract as reported by `getcontractstate`
#[derive(Debug, Clone)]
pub struct ContractState {
    pub id: i64,
    pub hash: ScriptHash,
    /// Manifest exactly as the node returned it
    pub manifest_json: Value,
    pub manifest: Manifest,
}

/// JSON-RPC 2.0 client for a single node
#[derive(Debug, Clone)]
pub struct RpcClient {
    client: reqwest::Client,
    url: String,
}

impl RpcClient {
    pub fn new<S: Into<String>>(url: S) -> Self {
        Self {
            client: reqwest::Client::new(),
            url: url.into(),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Send a JSON-RPC request and return its `result`
    pub async fn call(&self, method: &str, params: Value) -> Result<Value> {
        let request = json!({
            "jsonrpc": "2.0",
            "id": 1,
            "method": method,
            "params": params,
        });

        let response = self
            .client
            .post(&self.url)
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| Error::network(format!("{} request to {} failed: {}", method, self.url, e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::network(format!(
                "{} request to {} returned HTTP {}",
                method, self.url, status
            )));
        }

        let body: RpcResponse = response
            .json()
            .await
            .map_err(|e| Error::parse(format!("invalid JSON-RPC response from {}: {}", self.url, e)))?;

        if let Some(error) = body.error {
            return Err(Error::network(format!(
                "RPC error {}: {}",
                error.code, error.message
            )));
        }

        body.result
            .ok_or_else(|| Error::network(format!("{} response from {} has no result", method, self.url)))
    }

    /// Fetch the deployed state of a contract
    pub async fn get_contract_state(&self, hash: &ScriptHash) -> Result<ContractState> {
        let result = self
            .call("getcontractstate", json!([hash.to_string()]))
            .await?;

        let id = result.get("id").and_then(Value::as_i64).unwrap_or_default();
        let hash = match result.get("hash").and_then(Value::as_str) {
            Some(s) => ScriptHash::from_str_le(s)?,
            None => *hash,
        };
        let manifest_json = result
            .get("manifest")
            .cloned()
            .ok_or_else(|| Error::manifest("contract state has no manifest"))?;
        let manifest = Manifest::from_value(manifest_json.clone())?;

        Ok(ContractState {
            id,
            hash,
            manifest_json,
            manifest,
        })
    }
}

/// Fetch a contract state from the first host that answers
pub async fn fetch_manifest_from_hosts(hash: &ScriptHash, hosts: &[String]) -> Result<ContractState> {
    for host in hosts {
        match RpcClient::new(host.as_str()).get_contract_state(hash).await {
            Ok(state) => return Ok(state),
            Err(e) => debug!("Fetching manifest of {} from {} failed: {}", hash, host, e),
        }
    }
    Err(Error::network(format!(
        "Failed to fetch manifest of {} from {} host(s)",
        hash,
        hosts.len()
    )))
}
