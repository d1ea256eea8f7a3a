//! FlightSurety Oracle Node
//!
//! Bootstraps the airline quorum and flight catalog, registers the oracle
//! pool, then reacts to ledger events for the life of the process while
//! serving the passenger API.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use flightsurety_server::app_state::AppState;
use flightsurety_server::config::AppConfig;
use flightsurety_server::ledger::{FlightSurety, LedgerGateway, RpcLedger};
use flightsurety_server::models::{IdentityPool, FLIGHT_CATALOG};
use flightsurety_server::routes;
use flightsurety_server::services::{
    EventMonitoringService, FlightStore, GovernanceBootstrapper, OracleService, PassengerService,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = AppConfig::from_env().context("invalid configuration")?;
    info!(network = %config.contracts.network, rpc_url = %config.contracts.rpc_url, "connecting to ledger");

    let ledger: Arc<dyn LedgerGateway> =
        Arc::new(RpcLedger::new(config.contracts.clone()).context("failed to build ledger client")?);

    let accounts = ledger.accounts().await.context("failed to list ledger accounts")?;
    let pool = Arc::new(IdentityPool::from_accounts(&accounts)?);
    let surety = FlightSurety::new(ledger.clone(), pool.owner.clone());

    let base_timestamp = config
        .flight_base_timestamp
        .unwrap_or_else(|| chrono::Utc::now().timestamp().max(0) as u64);
    let flights = FlightStore::new();

    // One-shot governance bootstrap.
    let bootstrapper = GovernanceBootstrapper::new(
        surety.clone(),
        pool.clone(),
        FLIGHT_CATALOG.to_vec(),
        base_timestamp,
        flights.clone(),
    );
    tokio::spawn(async move {
        bootstrapper.run().await;
    });

    // Oracle pool, then the event reactor for the rest of the process.
    let oracles = Arc::new(OracleService::register_pool(surety.clone(), &pool.oracles).await);
    let monitor = EventMonitoringService::new(ledger.clone(), oracles, config.event_poll_interval);
    tokio::spawn(async move {
        monitor.start().await;
        error!("event monitor exited");
    });

    let passenger_service = Arc::new(PassengerService::new(surety, pool, flights));
    let app = routes::app_routes(AppState::new(passenger_service))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr = SocketAddr::from(([127, 0, 0, 1], config.port));
    info!("Server starting on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    axum::serve(listener, app).await.context("server error")?;

    Ok(())
}
