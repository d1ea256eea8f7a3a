use std::collections::HashMap;
use std::env;

use serde::Deserialize;

use crate::error::ConfigError;
use crate::models::Identity;

pub const DEFAULT_NETWORK: &str = "localhost";
pub const DEFAULT_NETWORK_CONFIG_FILE: &str = "config.json";

/// Ledger endpoint and deployed contract addresses for one network.
#[derive(Clone, Debug)]
pub struct ContractsConfig {
    pub network: String,
    pub rpc_url: String,
    pub app_address: Identity,
    pub data_address: Identity,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct NetworkEntry {
    url: String,
    app_address: String,
    data_address: String,
}

impl ContractsConfig {
    /// Resolve the network named by `NETWORK` from the JSON network file,
    /// then apply `LEDGER_RPC_URL` / `APP_CONTRACT_ADDRESS` /
    /// `DATA_CONTRACT_ADDRESS` overrides. When all three overrides are set
    /// the file is not read.
    pub fn from_env() -> Result<Self, ConfigError> {
        let network = env::var("NETWORK").unwrap_or_else(|_| DEFAULT_NETWORK.to_string());
        let rpc_url = env::var("LEDGER_RPC_URL").ok();
        let app_address = env::var("APP_CONTRACT_ADDRESS").ok();
        let data_address = env::var("DATA_CONTRACT_ADDRESS").ok();

        if let (Some(url), Some(app), Some(data)) = (&rpc_url, &app_address, &data_address) {
            return Ok(Self {
                network,
                rpc_url: url.clone(),
                app_address: Identity::parse(app)?,
                data_address: Identity::parse(data)?,
            });
        }

        let path = env::var("NETWORK_CONFIG_FILE")
            .unwrap_or_else(|_| DEFAULT_NETWORK_CONFIG_FILE.to_string());
        let contents = std::fs::read_to_string(&path).map_err(|source| ConfigError::Read {
            path: path.clone(),
            source,
        })?;

        let mut config = Self::from_network_file(&network, &path, &contents)?;
        if let Some(url) = rpc_url {
            config.rpc_url = url;
        }
        if let Some(app) = app_address {
            config.app_address = Identity::parse(&app)?;
        }
        if let Some(data) = data_address {
            config.data_address = Identity::parse(&data)?;
        }
        Ok(config)
    }

    /// Parse a network file shaped `{ "<network>": { "url", "appAddress", "dataAddress" } }`.
    pub fn from_network_file(network: &str, path: &str, contents: &str) -> Result<Self, ConfigError> {
        let mut networks: HashMap<String, NetworkEntry> =
            serde_json::from_str(contents).map_err(|source| ConfigError::Parse {
                path: path.to_string(),
                source,
            })?;

        let entry = networks
            .remove(network)
            .ok_or_else(|| ConfigError::UnknownNetwork(network.to_string()))?;

        Ok(Self {
            network: network.to_string(),
            rpc_url: entry.url,
            app_address: Identity::parse(&entry.app_address)?,
            data_address: Identity::parse(&entry.data_address)?,
        })
    }
}
