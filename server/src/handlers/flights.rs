use std::sync::Arc;

use axum::extract::{Path, State};
use serde::Serialize;

use super::{respond, ApiResult};
use crate::models::ScheduledFlight;
use crate::services::passenger_service::{FlightStatusView, StatusRequested};
use crate::services::PassengerService;

#[derive(Debug, Serialize)]
pub struct OperationalStatus {
    pub operational: bool,
}

pub async fn get_operational_status(
    State(service): State<Arc<PassengerService>>,
) -> ApiResult<OperationalStatus> {
    respond(
        service
            .is_operational()
            .await
            .map(|operational| OperationalStatus { operational }),
    )
}

pub async fn list_flights(State(service): State<Arc<PassengerService>>) -> ApiResult<Vec<ScheduledFlight>> {
    respond(Ok(service.flights().await))
}

/// Trigger an oracle round for the flight in `slot`.
pub async fn fetch_flight_status(
    State(service): State<Arc<PassengerService>>,
    Path(slot): Path<u32>,
) -> ApiResult<StatusRequested> {
    respond(service.fetch_flight_status(slot).await)
}

pub async fn get_flight_status(
    State(service): State<Arc<PassengerService>>,
    Path(slot): Path<u32>,
) -> ApiResult<FlightStatusView> {
    respond(service.flight_status(slot).await)
}
