//! Governance bootstrap: brings the airline quorum and the flight catalog to
//! an operational state once per process start.
//!
//! Every step checks ledger state before acting, so rerunning against an
//! already operational ledger issues no sends. Checks and sends are not
//! atomic: overlapping runs can still issue duplicates.

use std::ops::AddAssign;
use std::sync::Arc;

use futures_util::future::join_all;
use tracing::{debug, error, info, warn};

use super::flight_store::FlightStore;
use crate::ledger::FlightSurety;
use crate::models::{CatalogEntry, Identity, IdentityPool, ScheduledFlight};

/// Stake each airline deposits with the data contract: 10 native units.
pub const AIRLINE_STAKE: u128 = 10 * BASE_UNITS_PER_COIN;
pub const BASE_UNITS_PER_COIN: u128 = 1_000_000_000_000_000_000;

/// Sends issued (not confirmed) during one bootstrap pass.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct BootstrapReport {
    pub registrations_sent: usize,
    pub stakes_sent: usize,
    pub flights_registered: usize,
    pub failures: usize,
}

impl AddAssign for BootstrapReport {
    fn add_assign(&mut self, other: Self) {
        self.registrations_sent += other.registrations_sent;
        self.stakes_sent += other.stakes_sent;
        self.flights_registered += other.flights_registered;
        self.failures += other.failures;
    }
}

/// Fixed sponsorship policy by airline position: the first airline is
/// registered at genesis, the next three need one vote from the first, and
/// the fifth needs votes from the first two.
pub fn sponsors_for(airlines: &[Identity], position: usize) -> Vec<Identity> {
    match position {
        0 => Vec::new(),
        1..=3 => airlines.iter().take(1).cloned().collect(),
        _ => airlines.iter().take(2).cloned().collect(),
    }
}

pub struct GovernanceBootstrapper {
    surety: FlightSurety,
    pool: Arc<IdentityPool>,
    catalog: Vec<CatalogEntry>,
    base_timestamp: u64,
    flights: FlightStore,
}

impl GovernanceBootstrapper {
    pub fn new(
        surety: FlightSurety,
        pool: Arc<IdentityPool>,
        catalog: Vec<CatalogEntry>,
        base_timestamp: u64,
        flights: FlightStore,
    ) -> Self {
        Self {
            surety,
            pool,
            catalog,
            base_timestamp,
            flights,
        }
    }

    pub fn flights(&self) -> &FlightStore {
        &self.flights
    }

    pub async fn run(&self) -> BootstrapReport {
        info!(airlines = self.pool.airlines.len(), "Registering airlines and depositing stakes");

        let airlines = &self.pool.airlines;
        let airline_runs = airlines.iter().enumerate().map(|(position, airline)| {
            let sponsors = sponsors_for(airlines, position);
            async move { self.ensure_airline_operational(airline, &sponsors).await }
        });

        let mut report = BootstrapReport::default();
        for airline_report in join_all(airline_runs).await {
            report += airline_report;
        }

        info!(flights = self.catalog.len(), "Registering flights");
        let (scheduled, unresolved) = self.resolve_catalog();
        report.failures += unresolved;
        report += self.ensure_flight_catalog(&scheduled).await;

        info!(
            registrations_sent = report.registrations_sent,
            stakes_sent = report.stakes_sent,
            flights_registered = report.flights_registered,
            failures = report.failures,
            "bootstrap pass complete"
        );
        report
    }

    /// Issue whatever sends `airline` still needs: one `registerAirline` per
    /// sponsor while unregistered, then the stake transfer while unfunded.
    /// An empty `sponsors` list skips registration entirely.
    pub async fn ensure_airline_operational(&self, airline: &Identity, sponsors: &[Identity]) -> BootstrapReport {
        let mut report = BootstrapReport::default();

        let registered = async {
            if sponsors.is_empty() {
                None
            } else {
                Some(self.surety.is_airline(airline).await)
            }
        };
        let (registered, funded) = tokio::join!(registered, self.surety.is_funded(airline));

        match registered {
            None => debug!(%airline, "registered at genesis; skipping registration"),
            Some(Ok(true)) => debug!(%airline, "airline already registered"),
            Some(Ok(false)) => {
                let votes = sponsors.iter().map(|sponsor| async move {
                    (sponsor, self.surety.register_airline(airline, sponsor).await)
                });
                for (sponsor, outcome) in join_all(votes).await {
                    match outcome {
                        Ok(receipt) => {
                            report.registrations_sent += 1;
                            info!(%airline, %sponsor, tx = %receipt.tx_hash, "registration vote issued");
                        }
                        Err(err) => {
                            report.failures += 1;
                            error!(%airline, %sponsor, error = %err, "registration vote failed");
                        }
                    }
                }
            }
            Some(Err(err)) => {
                report.failures += 1;
                warn!(%airline, error = %err, "could not read registration state; skipping");
            }
        }

        match funded {
            Ok(true) => debug!(%airline, "airline already funded"),
            Ok(false) => match self.surety.fund_airline(airline, AIRLINE_STAKE).await {
                Ok(receipt) => {
                    report.stakes_sent += 1;
                    info!(%airline, tx = %receipt.tx_hash, "stake deposit issued");
                }
                Err(err) => {
                    report.failures += 1;
                    error!(%airline, error = %err, "stake deposit failed");
                }
            },
            Err(err) => {
                report.failures += 1;
                warn!(%airline, error = %err, "could not read funding state; skipping");
            }
        }

        report
    }

    /// Register every catalog flight the ledger does not know yet. Flights
    /// that exist, or whose registration was issued, land in the store.
    pub async fn ensure_flight_catalog(&self, catalog: &[ScheduledFlight]) -> BootstrapReport {
        let runs = catalog.iter().map(|scheduled| self.ensure_flight(scheduled));

        let mut report = BootstrapReport::default();
        for flight_report in join_all(runs).await {
            report += flight_report;
        }
        report
    }

    async fn ensure_flight(&self, scheduled: &ScheduledFlight) -> BootstrapReport {
        let mut report = BootstrapReport::default();
        let flight = &scheduled.flight;

        match self.surety.is_flight(flight).await {
            Ok(true) => {
                debug!(code = %flight.code, timestamp = flight.timestamp, "flight already registered");
                self.flights.append(scheduled.clone()).await;
            }
            Ok(false) => match self.surety.register_flight(flight).await {
                Ok(receipt) => {
                    report.flights_registered += 1;
                    info!(
                        code = %flight.code,
                        airline = %flight.airline,
                        timestamp = flight.timestamp,
                        tx = %receipt.tx_hash,
                        "flight registration issued"
                    );
                    self.flights.append(scheduled.clone()).await;
                }
                Err(err) => {
                    report.failures += 1;
                    error!(code = %flight.code, error = %err, "flight registration failed");
                }
            },
            Err(err) => {
                report.failures += 1;
                warn!(code = %flight.code, error = %err, "could not read flight state; skipping");
            }
        }

        report
    }

    /// Resolve catalog rows against the pool and base time. Rows naming an
    /// airline outside the pool, or whose departure overflows, are logged and
    /// counted as failures.
    fn resolve_catalog(&self) -> (Vec<ScheduledFlight>, usize) {
        let mut resolved = Vec::with_capacity(self.catalog.len());
        let mut unresolved = 0;

        for entry in &self.catalog {
            let Some(airline) = self.pool.airline(entry.airline_index) else {
                unresolved += 1;
                warn!(code = entry.code, airline_index = entry.airline_index, "catalog entry names unknown airline");
                continue;
            };
            match ScheduledFlight::resolve(entry, airline.clone(), self.base_timestamp) {
                Some(scheduled) => resolved.push(scheduled),
                None => {
                    unresolved += 1;
                    warn!(code = entry.code, slot = entry.slot, base = self.base_timestamp, "departure time out of range");
                }
            }
        }

        (resolved, unresolved)
    }
}
