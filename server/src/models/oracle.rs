use serde::{Deserialize, Serialize};

use super::flight::FlightStatus;
use super::identity::Identity;
use crate::error::LedgerError;
use crate::ledger::decode;
use crate::ledger::LedgerEvent;

/// The three indices the app contract assigned to one oracle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OracleIndexes(pub [u8; 3]);

impl OracleIndexes {
    pub fn contains(&self, index: u8) -> bool {
        self.0.contains(&index)
    }
}

/// Decoded `OracleRequest(index, airline, flight, timestamp)` event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OracleRequest {
    pub index: u8,
    pub airline: Identity,
    pub flight: String,
    pub timestamp: u64,
}

impl OracleRequest {
    pub fn from_event(event: &LedgerEvent) -> Result<Self, LedgerError> {
        let values = &event.return_values;
        let index = decode::u64_field(values, "index")?;
        let index = u8::try_from(index).map_err(|err| LedgerError::decode("oracle index", err))?;

        Ok(Self {
            index,
            airline: decode::identity_field(values, "airline")?,
            flight: decode::string_field(values, "flight")?,
            timestamp: decode::u64_field(values, "timestamp")?,
        })
    }
}

/// One oracle's candidate answer for a request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusResponse {
    pub index: u8,
    pub airline: Identity,
    pub flight: String,
    pub timestamp: u64,
    pub status: FlightStatus,
}

impl StatusResponse {
    pub fn answering(request: &OracleRequest, status: FlightStatus) -> Self {
        Self {
            index: request.index,
            airline: request.airline.clone(),
            flight: request.flight.clone(),
            timestamp: request.timestamp,
            status,
        }
    }
}
