//! Route definitions for the orchestration node API

use axum::{
    routing::{get, post},
    Router,
};

use crate::app_state::AppState;
use crate::handlers::*;

pub fn app_routes(state: AppState) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health_check))
        .route("/api", get(api_info))
        .merge(flight_routes())
        .merge(insurance_routes())
        .with_state(state)
}

// Flight routes
pub fn flight_routes() -> Router<AppState> {
    Router::new()
        .route("/api/status", get(get_operational_status))
        .route("/api/flights", get(list_flights))
        .route(
            "/api/flights/:slot/status",
            get(get_flight_status).post(fetch_flight_status),
        )
}

// Insurance routes
pub fn insurance_routes() -> Router<AppState> {
    Router::new()
        .route("/api/insurance", post(buy_insurance))
        .route("/api/insurance/:passenger/payout", post(withdraw_payout))
}

async fn root() -> &'static str {
    "FlightSurety Oracle Node"
}

async fn health_check() -> &'static str {
    "OK"
}
