//! FlightSurety oracle node library
//!
//! Off-chain orchestration for the FlightSurety contracts: the governance
//! bootstrap that brings airlines and flights to an operational state, and
//! the oracle simulator that answers flight-status requests.

pub mod app_state;
pub mod config;
pub mod error;
pub mod handlers;
pub mod ledger;
pub mod models;
pub mod routes;
pub mod services;
