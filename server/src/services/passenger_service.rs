//! Passenger-facing flows: flight status lookups, insurance purchase and
//! payout withdrawal.

use std::sync::Arc;

use serde::Serialize;
use tracing::info;

use super::flight_store::FlightStore;
use crate::error::ServiceError;
use crate::ledger::{FlightSurety, Receipt};
use crate::models::{FlightStatus, Identity, IdentityPool, ScheduledFlight};

#[derive(Debug, Clone, Serialize)]
pub struct StatusRequested {
    #[serde(flatten)]
    pub scheduled: ScheduledFlight,
    pub tx_hash: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct FlightStatusView {
    #[serde(flatten)]
    pub scheduled: ScheduledFlight,
    pub status_code: u8,
    pub status: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct PolicyPurchase {
    #[serde(flatten)]
    pub scheduled: ScheduledFlight,
    pub passenger: Identity,
    /// Premium in base units, as a decimal string.
    pub amount: String,
    pub tx_hash: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct Payout {
    pub passenger: Identity,
    pub tx_hash: String,
}

pub struct PassengerService {
    surety: FlightSurety,
    pool: Arc<IdentityPool>,
    flights: FlightStore,
}

impl PassengerService {
    pub fn new(surety: FlightSurety, pool: Arc<IdentityPool>, flights: FlightStore) -> Self {
        Self {
            surety,
            pool,
            flights,
        }
    }

    pub async fn is_operational(&self) -> Result<bool, ServiceError> {
        Ok(self.surety.is_operational().await?)
    }

    pub async fn flights(&self) -> Vec<ScheduledFlight> {
        self.flights.all().await
    }

    async fn resolve(&self, slot: u32) -> Result<ScheduledFlight, ServiceError> {
        self.flights
            .by_slot(slot)
            .await
            .ok_or_else(|| ServiceError::NotFound(format!("flight in slot {slot}")))
    }

    fn passenger(&self, index: usize) -> Result<&Identity, ServiceError> {
        self.pool
            .passenger(index)
            .ok_or_else(|| ServiceError::NotFound(format!("passenger {index}")))
    }

    /// Ask the oracles for this flight's status. The answer lands on the
    /// ledger later; read it back with [`PassengerService::flight_status`].
    pub async fn fetch_flight_status(&self, slot: u32) -> Result<StatusRequested, ServiceError> {
        let scheduled = self.resolve(slot).await?;
        let Receipt { tx_hash } = self.surety.fetch_flight_status(&scheduled.flight).await?;
        info!(code = %scheduled.flight.code, tx = %tx_hash, "flight status requested");
        Ok(StatusRequested { scheduled, tx_hash })
    }

    pub async fn flight_status(&self, slot: u32) -> Result<FlightStatusView, ServiceError> {
        let scheduled = self.resolve(slot).await?;
        let status: FlightStatus = self.surety.flight_status_code(&scheduled.flight).await?;
        Ok(FlightStatusView {
            scheduled,
            status_code: status.code(),
            status: status.label(),
        })
    }

    pub async fn buy(&self, slot: u32, passenger: usize, amount: u128) -> Result<PolicyPurchase, ServiceError> {
        if amount == 0 {
            return Err(ServiceError::InvalidInput("premium must be greater than 0".to_string()));
        }
        let scheduled = self.resolve(slot).await?;
        let passenger = self.passenger(passenger)?.clone();

        let receipt = self.surety.buy(&passenger, &scheduled.flight, amount).await?;
        info!(%passenger, code = %scheduled.flight.code, amount = %amount, tx = %receipt.tx_hash, "insurance purchase issued");

        Ok(PolicyPurchase {
            scheduled,
            passenger,
            amount: amount.to_string(),
            tx_hash: receipt.tx_hash,
        })
    }

    pub async fn pay(&self, passenger: usize) -> Result<Payout, ServiceError> {
        let passenger = self.passenger(passenger)?.clone();
        let receipt = self.surety.pay(&passenger).await?;
        info!(%passenger, tx = %receipt.tx_hash, "payout withdrawal issued");
        Ok(Payout {
            passenger,
            tx_hash: receipt.tx_hash,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::mock::MockLedger;
    use crate::ledger::Contract;
    use crate::models::FLIGHT_CATALOG;

    async fn setup() -> (Arc<MockLedger>, Arc<IdentityPool>, PassengerService) {
        let ledger = Arc::new(MockLedger::new(IdentityPool::REQUIRED_ACCOUNTS));
        let pool = Arc::new(IdentityPool::from_accounts(&ledger.accounts_snapshot()).unwrap());
        let surety = FlightSurety::new(ledger.clone(), pool.owner.clone());

        let flights = FlightStore::new();
        let entry = &FLIGHT_CATALOG[1];
        flights
            .append(ScheduledFlight::resolve(entry, pool.airlines[entry.airline_index].clone(), 5_000).unwrap())
            .await;

        (ledger.clone(), pool.clone(), PassengerService::new(surety, pool, flights))
    }

    #[tokio::test]
    async fn status_lookup_resolves_flight_by_slot() {
        let (ledger, pool, service) = setup().await;
        ledger.set_flight_status(&pool.airlines[1], "ND1310", 5_900, FlightStatus::LateAirline);

        let requested = service.fetch_flight_status(1).await.unwrap();
        assert_eq!(requested.scheduled.flight.timestamp, 5_900);
        assert_eq!(ledger.sent_by_method("fetchFlightStatus")[0].from, pool.owner);

        let view = service.flight_status(1).await.unwrap();
        assert_eq!(view.status_code, 20);
        assert_eq!(view.status, "Late Airline");
    }

    #[tokio::test]
    async fn unknown_slot_and_passenger_are_not_found() {
        let (_, _, service) = setup().await;
        assert!(matches!(service.flight_status(4).await, Err(ServiceError::NotFound(_))));
        assert!(matches!(service.pay(9).await, Err(ServiceError::NotFound(_))));
    }

    #[tokio::test]
    async fn buy_sends_premium_from_passenger_to_data_contract() {
        let (ledger, pool, service) = setup().await;

        let purchase = service.buy(1, 2, 500_000_000_000_000_000).await.unwrap();
        assert_eq!(purchase.passenger, pool.passengers[2]);

        let sent = ledger.sent_by_method("buy");
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].contract, Contract::Data);
        assert_eq!(sent[0].from, pool.passengers[2]);
        assert_eq!(sent[0].value, Some(500_000_000_000_000_000));

        assert!(matches!(service.buy(1, 2, 0).await, Err(ServiceError::InvalidInput(_))));
    }

    #[tokio::test]
    async fn pay_withdraws_for_passenger() {
        let (ledger, pool, service) = setup().await;
        service.pay(0).await.unwrap();
        let sent = ledger.sent_by_method("pay");
        assert_eq!(sent[0].from, pool.passengers[0]);
        assert_eq!(sent[0].contract, Contract::Data);
    }
}
