//! Business logic services for the orchestration node

pub mod bootstrap;
pub mod event_monitoring_service;
pub mod flight_store;
pub mod oracle_service;
pub mod passenger_service;

pub use bootstrap::{BootstrapReport, GovernanceBootstrapper};
pub use event_monitoring_service::EventMonitoringService;
pub use flight_store::FlightStore;
pub use oracle_service::{DispatchReport, OracleService};
pub use passenger_service::PassengerService;
