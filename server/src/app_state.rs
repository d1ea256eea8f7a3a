//! Application state shared across handlers

use std::sync::Arc;

use axum::extract::FromRef;

use crate::services::PassengerService;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub passenger_service: Arc<PassengerService>,
}

impl AppState {
    pub fn new(passenger_service: Arc<PassengerService>) -> Self {
        Self { passenger_service }
    }
}

impl FromRef<AppState> for Arc<PassengerService> {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.passenger_service.clone()
    }
}
