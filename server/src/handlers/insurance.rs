use std::sync::Arc;

use axum::extract::{Path, State};
use axum::Json;
use serde::Deserialize;

use super::{respond, ApiResult};
use crate::error::ServiceError;
use crate::services::passenger_service::{Payout, PolicyPurchase};
use crate::services::PassengerService;

#[derive(Debug, Deserialize)]
pub struct BuyInsuranceRequest {
    pub slot: u32,
    pub passenger: usize,
    /// Premium in base units. A string so values above 2^53 survive JSON.
    pub amount: String,
}

pub async fn buy_insurance(
    State(service): State<Arc<PassengerService>>,
    Json(request): Json<BuyInsuranceRequest>,
) -> ApiResult<PolicyPurchase> {
    let amount = match request.amount.trim().parse::<u128>() {
        Ok(amount) => amount,
        Err(err) => {
            return respond(Err(ServiceError::InvalidInput(format!(
                "amount `{}`: {err}",
                request.amount
            ))))
        }
    };

    respond(service.buy(request.slot, request.passenger, amount).await)
}

pub async fn withdraw_payout(
    State(service): State<Arc<PassengerService>>,
    Path(passenger): Path<usize>,
) -> ApiResult<Payout> {
    respond(service.pay(passenger).await)
}
