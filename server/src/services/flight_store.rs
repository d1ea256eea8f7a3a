//! Append-only record of the catalog flights known to exist on the ledger

use std::sync::Arc;

use tokio::sync::RwLock;

use crate::models::ScheduledFlight;

/// Shared between the bootstrapper (writer) and the passenger service
/// (reader). Entries are never removed or modified.
#[derive(Clone, Default)]
pub struct FlightStore {
    inner: Arc<RwLock<Vec<ScheduledFlight>>>,
}

impl FlightStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn append(&self, flight: ScheduledFlight) {
        self.inner.write().await.push(flight);
    }

    /// Look up by catalog slot. Append order is not meaningful since
    /// registrations complete concurrently.
    pub async fn by_slot(&self, slot: u32) -> Option<ScheduledFlight> {
        self.inner
            .read()
            .await
            .iter()
            .find(|scheduled| scheduled.slot == slot)
            .cloned()
    }

    pub async fn all(&self) -> Vec<ScheduledFlight> {
        let mut flights = self.inner.read().await.clone();
        flights.sort_by_key(|scheduled| scheduled.slot);
        flights
    }

    pub async fn len(&self) -> usize {
        self.inner.read().await.len()
    }
}
