//! Ledger gateway: the remote call/send/event surface of the FlightSurety contracts
//!
//! The node never holds durable state of its own. Everything it knows about
//! airlines, flights and oracles is read through [`LedgerGateway`], and
//! everything it changes goes out as a send.

pub mod contracts;
pub mod decode;
#[cfg(test)]
pub mod mock;
pub mod rpc;
pub mod subscription;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::LedgerError;
use crate::models::Identity;

pub use contracts::FlightSurety;
pub use rpc::RpcLedger;
pub use subscription::subscribe;

pub type LedgerResult<T> = Result<T, LedgerError>;

/// The two deployed contracts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Contract {
    /// Application logic: governance, flights, oracles.
    App,
    /// Data holder: funds, insurance policies, payouts.
    Data,
}

/// Sender and payment attached to a mutating send.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SendOptions {
    pub from: Identity,
    pub value: Option<u128>,
    pub gas: Option<u64>,
}

impl SendOptions {
    pub fn from(sender: &Identity) -> Self {
        Self {
            from: sender.clone(),
            value: None,
            gas: None,
        }
    }

    pub fn value(mut self, value: u128) -> Self {
        self.value = Some(value);
        self
    }

    pub fn gas(mut self, gas: u64) -> Self {
        self.gas = Some(gas);
        self
    }
}

/// Acknowledgement that a send was issued. Says nothing about confirmation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Receipt {
    #[serde(rename = "transactionHash")]
    pub tx_hash: String,
}

/// A contract event as delivered by the gateway.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LedgerEvent {
    pub event: String,
    #[serde(rename = "blockNumber")]
    pub block_number: u64,
    #[serde(rename = "transactionHash", default)]
    pub tx_hash: Option<String>,
    #[serde(rename = "returnValues", default)]
    pub return_values: Value,
}

/// Remote-callable surface of the ledger. Implementations must be safe to
/// share across tasks.
#[async_trait]
pub trait LedgerGateway: Send + Sync {
    /// Pre-funded accounts, in ledger order.
    async fn accounts(&self) -> LedgerResult<Vec<Identity>>;

    /// Read-only contract call.
    async fn call(
        &self,
        contract: Contract,
        method: &str,
        args: Vec<Value>,
        from: &Identity,
    ) -> LedgerResult<Value>;

    /// Mutating contract call. Returns once the transaction is issued.
    async fn send(
        &self,
        contract: Contract,
        method: &str,
        args: Vec<Value>,
        options: SendOptions,
    ) -> LedgerResult<Receipt>;

    /// Plain value transfer to a contract address.
    async fn transfer(&self, from: &Identity, to: Contract, value: u128) -> LedgerResult<Receipt>;

    /// Events named `event` emitted by `contract` at or after `from_block`.
    async fn events(
        &self,
        contract: Contract,
        event: &str,
        from_block: u64,
    ) -> LedgerResult<Vec<LedgerEvent>>;
}
