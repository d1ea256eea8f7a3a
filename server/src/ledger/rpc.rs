//! JSON-RPC client for the ledger gateway

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};

use super::{decode, Contract, LedgerEvent, LedgerGateway, LedgerResult, Receipt, SendOptions};
use crate::config::ContractsConfig;
use crate::error::LedgerError;
use crate::models::Identity;

const RPC_REQUEST_ID: &str = "flightsurety-node";
const REQUEST_TIMEOUT_SECONDS: u64 = 30;

pub struct RpcLedger {
    rpc_url: String,
    contracts: ContractsConfig,
    http: Client,
}

impl RpcLedger {
    pub fn new(contracts: ContractsConfig) -> Result<Self, LedgerError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECONDS))
            .build()?;

        Ok(Self {
            rpc_url: contracts.rpc_url.clone(),
            contracts,
            http,
        })
    }

    fn address(&self, contract: Contract) -> &Identity {
        match contract {
            Contract::App => &self.contracts.app_address,
            Contract::Data => &self.contracts.data_address,
        }
    }

    async fn rpc_call(&self, method: &str, params: Value) -> LedgerResult<Value> {
        let response = self
            .http
            .post(&self.rpc_url)
            .json(&json!({
                "jsonrpc": "2.0",
                "id": RPC_REQUEST_ID,
                "method": method,
                "params": params,
            }))
            .send()
            .await?
            .error_for_status()?
            .json::<Value>()
            .await?;

        if let Some(err) = response.get("error") {
            return Err(LedgerError::Rpc {
                code: err.pointer("/code").and_then(Value::as_i64).unwrap_or(-1),
                message: err
                    .pointer("/message")
                    .and_then(Value::as_str)
                    .unwrap_or("unknown error")
                    .to_string(),
            });
        }

        response
            .get("result")
            .cloned()
            .ok_or(LedgerError::MissingField("result"))
    }

    fn receipt(result: Value) -> LedgerResult<Receipt> {
        serde_json::from_value(result).map_err(|err| LedgerError::decode("receipt", err))
    }
}

#[async_trait]
impl LedgerGateway for RpcLedger {
    async fn accounts(&self) -> LedgerResult<Vec<Identity>> {
        let result = self.rpc_call("ledger_accounts", json!([])).await?;
        result
            .as_array()
            .ok_or_else(|| LedgerError::decode("accounts", "expected array"))?
            .iter()
            .map(|account| decode::as_identity(account, "account"))
            .collect()
    }

    async fn call(
        &self,
        contract: Contract,
        method: &str,
        args: Vec<Value>,
        from: &Identity,
    ) -> LedgerResult<Value> {
        self.rpc_call(
            "ledger_call",
            json!([{
                "contract": self.address(contract),
                "method": method,
                "args": args,
                "from": from,
            }]),
        )
        .await
    }

    async fn send(
        &self,
        contract: Contract,
        method: &str,
        args: Vec<Value>,
        options: SendOptions,
    ) -> LedgerResult<Receipt> {
        let mut params = json!({
            "contract": self.address(contract),
            "method": method,
            "args": args,
            "from": options.from,
        });
        if let Some(value) = options.value {
            params["value"] = json!(value.to_string());
        }
        if let Some(gas) = options.gas {
            params["gas"] = json!(gas);
        }

        let result = self.rpc_call("ledger_send", json!([params])).await?;
        Self::receipt(result)
    }

    async fn transfer(&self, from: &Identity, to: Contract, value: u128) -> LedgerResult<Receipt> {
        let result = self
            .rpc_call(
                "ledger_transfer",
                json!([{
                    "from": from,
                    "to": self.address(to),
                    "value": value.to_string(),
                }]),
            )
            .await?;
        Self::receipt(result)
    }

    async fn events(
        &self,
        contract: Contract,
        event: &str,
        from_block: u64,
    ) -> LedgerResult<Vec<LedgerEvent>> {
        let result = self
            .rpc_call(
                "ledger_getEvents",
                json!([{
                    "contract": self.address(contract),
                    "event": event,
                    "fromBlock": from_block,
                }]),
            )
            .await?;
        serde_json::from_value(result).map_err(|err| LedgerError::decode("events", err))
    }
}
