//! Data models for the orchestration node

pub mod flight;
pub mod identity;
pub mod oracle;

use serde::{Deserialize, Serialize};

pub use flight::{CatalogEntry, Flight, FlightStatus, ScheduledFlight, FLIGHT_CATALOG};
pub use identity::{Identity, IdentityPool};
pub use oracle::{OracleIndexes, OracleRequest, StatusResponse};

/// API response wrapper
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn err(error: impl ToString) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error.to_string()),
        }
    }
}
