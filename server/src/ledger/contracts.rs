//! Typed façade over the FlightSurety app and data contracts

use std::sync::Arc;

use serde_json::{json, Value};

use super::{decode, Contract, LedgerGateway, LedgerResult, Receipt, SendOptions};
use crate::error::LedgerError;
use crate::models::{Flight, FlightStatus, Identity, OracleIndexes, StatusResponse};

/// Gas budget attached to the heavier sends.
pub const GAS_LIMIT: u64 = 3_000_000;

/// One contract method per operation. Read-only queries are issued from the
/// owner identity unless the contract keys the answer on the caller.
#[derive(Clone)]
pub struct FlightSurety {
    ledger: Arc<dyn LedgerGateway>,
    owner: Identity,
}

impl FlightSurety {
    pub fn new(ledger: Arc<dyn LedgerGateway>, owner: Identity) -> Self {
        Self { ledger, owner }
    }

    async fn query(&self, method: &str, args: Vec<Value>) -> LedgerResult<Value> {
        self.ledger.call(Contract::App, method, args, &self.owner).await
    }

    async fn query_bool(&self, method: &'static str, args: Vec<Value>) -> LedgerResult<bool> {
        let value = self.query(method, args).await?;
        decode::as_bool(&value, method)
    }

    fn flight_args(flight: &Flight) -> Vec<Value> {
        vec![json!(flight.airline), json!(flight.code), json!(flight.timestamp)]
    }

    pub async fn is_operational(&self) -> LedgerResult<bool> {
        self.query_bool("isOperational", vec![]).await
    }

    // ----- airlines -----

    pub async fn is_airline(&self, airline: &Identity) -> LedgerResult<bool> {
        self.query_bool("isAirline", vec![json!(airline)]).await
    }

    pub async fn is_funded(&self, airline: &Identity) -> LedgerResult<bool> {
        self.query_bool("isFunded", vec![json!(airline)]).await
    }

    /// One sponsoring vote from `sponsor` for `airline`.
    pub async fn register_airline(&self, airline: &Identity, sponsor: &Identity) -> LedgerResult<Receipt> {
        self.ledger
            .send(
                Contract::App,
                "registerAirline",
                vec![json!(airline)],
                SendOptions::from(sponsor),
            )
            .await
    }

    /// Stake deposit: a plain transfer from the airline to the data contract.
    pub async fn fund_airline(&self, airline: &Identity, stake: u128) -> LedgerResult<Receipt> {
        self.ledger.transfer(airline, Contract::Data, stake).await
    }

    // ----- flights -----

    pub async fn is_flight(&self, flight: &Flight) -> LedgerResult<bool> {
        self.query_bool("isFlight", Self::flight_args(flight)).await
    }

    pub async fn register_flight(&self, flight: &Flight) -> LedgerResult<Receipt> {
        self.ledger
            .send(
                Contract::App,
                "registerFlight",
                Self::flight_args(flight),
                SendOptions::from(&self.owner).gas(GAS_LIMIT),
            )
            .await
    }

    /// Ask the app contract to emit an `OracleRequest` for this flight.
    pub async fn fetch_flight_status(&self, flight: &Flight) -> LedgerResult<Receipt> {
        self.ledger
            .send(
                Contract::App,
                "fetchFlightStatus",
                Self::flight_args(flight),
                SendOptions::from(&self.owner),
            )
            .await
    }

    pub async fn flight_status_code(&self, flight: &Flight) -> LedgerResult<FlightStatus> {
        let value = self.query("getFlightStatusCode", Self::flight_args(flight)).await?;
        let code = decode::as_u64(&value, "flight status code")?;
        u8::try_from(code)
            .ok()
            .and_then(FlightStatus::from_code)
            .ok_or_else(|| LedgerError::decode("flight status code", format!("unknown code {code}")))
    }

    // ----- oracles -----

    pub async fn registration_fee(&self) -> LedgerResult<u128> {
        let value = self.query("REGISTRATION_FEE", vec![]).await?;
        decode::as_u128(&value, "registration fee")
    }

    pub async fn is_oracle(&self, oracle: &Identity) -> LedgerResult<bool> {
        self.query_bool("isOracle", vec![json!(oracle)]).await
    }

    pub async fn register_oracle(&self, oracle: &Identity, fee: u128) -> LedgerResult<Receipt> {
        self.ledger
            .send(
                Contract::App,
                "registerOracle",
                vec![],
                SendOptions::from(oracle).value(fee).gas(GAS_LIMIT),
            )
            .await
    }

    /// Indices are keyed on the caller, so this call is issued as the oracle.
    pub async fn oracle_indexes(&self, oracle: &Identity) -> LedgerResult<OracleIndexes> {
        let value = self
            .ledger
            .call(Contract::App, "getMyIndexes", vec![], oracle)
            .await?;

        let items = value
            .as_array()
            .ok_or_else(|| LedgerError::decode("oracle indexes", "expected array"))?;
        if items.len() != 3 {
            return Err(LedgerError::decode(
                "oracle indexes",
                format!("expected 3 indexes, got {}", items.len()),
            ));
        }

        let mut indexes = [0u8; 3];
        for (slot, item) in indexes.iter_mut().zip(items) {
            let index = decode::as_u64(item, "oracle index")?;
            *slot = u8::try_from(index).map_err(|err| LedgerError::decode("oracle index", err))?;
        }
        Ok(OracleIndexes(indexes))
    }

    pub async fn submit_oracle_response(
        &self,
        oracle: &Identity,
        response: &StatusResponse,
    ) -> LedgerResult<Receipt> {
        self.ledger
            .send(
                Contract::App,
                "submitOracleResponse",
                vec![
                    json!(response.index),
                    json!(response.airline),
                    json!(response.flight),
                    json!(response.timestamp),
                    json!(response.status.code()),
                ],
                SendOptions::from(oracle).gas(GAS_LIMIT),
            )
            .await
    }

    // ----- insurance -----

    pub async fn buy(&self, passenger: &Identity, flight: &Flight, amount: u128) -> LedgerResult<Receipt> {
        self.ledger
            .send(
                Contract::Data,
                "buy",
                Self::flight_args(flight),
                SendOptions::from(passenger).value(amount).gas(GAS_LIMIT),
            )
            .await
    }

    /// Withdraw whatever the data contract has credited to `passenger`.
    pub async fn pay(&self, passenger: &Identity) -> LedgerResult<Receipt> {
        self.ledger
            .send(Contract::Data, "pay", vec![], SendOptions::from(passenger))
            .await
    }
}
