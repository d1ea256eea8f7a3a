//! API handlers for the orchestration node

pub mod flights;
pub mod insurance;

use axum::{http::StatusCode, Json};
use serde_json::{json, Value};

use crate::error::ServiceError;
use crate::models::ApiResponse;

pub use flights::{fetch_flight_status, get_flight_status, get_operational_status, list_flights};
pub use insurance::{buy_insurance, withdraw_payout};

pub type ApiResult<T> = (StatusCode, Json<ApiResponse<T>>);

pub async fn api_info() -> Json<Value> {
    Json(json!({
        "message": "An API for use with your Dapp!"
    }))
}

pub(crate) fn respond<T>(result: Result<T, ServiceError>) -> ApiResult<T> {
    match result {
        Ok(data) => (StatusCode::OK, Json(ApiResponse::ok(data))),
        Err(err) => {
            let status = match &err {
                ServiceError::NotFound(_) => StatusCode::NOT_FOUND,
                ServiceError::InvalidInput(_) => StatusCode::BAD_REQUEST,
                ServiceError::Ledger(_) => StatusCode::BAD_GATEWAY,
            };
            (status, Json(ApiResponse::err(err)))
        }
    }
}
