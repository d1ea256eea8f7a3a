use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{error, info};

use super::oracle_service::{DispatchReport, OracleService};
use crate::ledger::{subscribe, Contract, LedgerEvent, LedgerGateway};
use crate::models::OracleRequest;

/// Subscriptions replay history from genesis on every start.
const GENESIS_BLOCK: u64 = 0;

pub const ORACLE_REQUEST_EVENT: &str = "OracleRequest";

/// Streams observed for logging only.
pub const OBSERVED_EVENTS: [(Contract, &str); 5] = [
    (Contract::App, "OracleReport"),
    (Contract::App, "FlightStatusInfo"),
    (Contract::Data, "InsuranceBought"),
    (Contract::Data, "InsureeCredited"),
    (Contract::Data, "InsureePaid"),
];

#[derive(Clone)]
pub struct EventMonitoringService {
    ledger: Arc<dyn LedgerGateway>,
    oracles: Arc<OracleService>,
    poll_interval: Duration,
}

impl EventMonitoringService {
    pub fn new(ledger: Arc<dyn LedgerGateway>, oracles: Arc<OracleService>, poll_interval: Duration) -> Self {
        Self {
            ledger,
            oracles,
            poll_interval,
        }
    }

    /// Run the reactor. Never returns while the ledger keeps the
    /// subscriptions alive.
    pub async fn start(self) {
        info!(
            responders = self.oracles.responders().len(),
            "ledger event monitor started"
        );

        for (contract, event) in OBSERVED_EVENTS {
            let rx = subscribe(self.ledger.clone(), contract, event, GENESIS_BLOCK, self.poll_interval);
            tokio::spawn(log_events(contract, rx));
        }

        let mut requests = subscribe(
            self.ledger.clone(),
            Contract::App,
            ORACLE_REQUEST_EVENT,
            GENESIS_BLOCK,
            self.poll_interval,
        );
        while let Some(event) = requests.recv().await {
            self.handle_oracle_request(event);
        }

        info!("oracle request stream closed; event monitor stopping");
    }

    /// Decode the event and spawn its fan-out so the reactor keeps draining
    /// the stream while responses go out.
    pub fn handle_oracle_request(&self, event: LedgerEvent) -> Option<JoinHandle<DispatchReport>> {
        info!(
            block = event.block_number,
            tx = event.tx_hash.as_deref().unwrap_or("-"),
            values = %event.return_values,
            "OracleRequest"
        );

        let request = match OracleRequest::from_event(&event) {
            Ok(request) => request,
            Err(err) => {
                error!(block = event.block_number, error = %err, "undecodable oracle request; skipping");
                return None;
            }
        };

        let oracles = self.oracles.clone();
        Some(tokio::spawn(async move { oracles.dispatch(&request).await }))
    }
}

async fn log_events(contract: Contract, mut rx: mpsc::Receiver<LedgerEvent>) {
    while let Some(event) = rx.recv().await {
        info!(
            ?contract,
            event = %event.event,
            block = event.block_number,
            tx = event.tx_hash.as_deref().unwrap_or("-"),
            values = %event.return_values,
            "ledger event"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::mock::MockLedger;
    use crate::ledger::FlightSurety;
    use crate::models::IdentityPool;
    use serde_json::json;
    use tokio::time::{sleep, timeout};

    async fn setup() -> (Arc<MockLedger>, Arc<IdentityPool>, EventMonitoringService) {
        let ledger = Arc::new(MockLedger::new(IdentityPool::REQUIRED_ACCOUNTS));
        let pool = Arc::new(IdentityPool::from_accounts(&ledger.accounts_snapshot()).unwrap());
        ledger.queue_oracle_assignments((0..20u8).map(|n| if n < 4 { [3, 11, 12] } else { [0, 1, 2] }));

        let surety = FlightSurety::new(ledger.clone(), pool.owner.clone());
        let oracles = Arc::new(OracleService::register_pool(surety, &pool.oracles).await);
        ledger.clear_sent();

        let service = EventMonitoringService::new(ledger.clone(), oracles, Duration::from_millis(5));
        (ledger, pool, service)
    }

    fn request_values(pool: &IdentityPool, index: u8) -> serde_json::Value {
        json!({
            "index": index.to_string(),
            "airline": pool.airlines[1],
            "flight": "ND1310",
            "timestamp": "1700000900",
        })
    }

    #[tokio::test]
    async fn oracle_request_fans_out_to_matching_oracles() {
        let (ledger, pool, service) = setup().await;
        let event = LedgerEvent {
            event: ORACLE_REQUEST_EVENT.to_string(),
            block_number: 10,
            tx_hash: None,
            return_values: request_values(&pool, 3),
        };

        let report = service.handle_oracle_request(event).unwrap().await.unwrap();

        assert_eq!(report.responders, pool.oracles[..4].to_vec());
        assert_eq!(ledger.sent_by_method("submitOracleResponse").len(), 4);
    }

    #[tokio::test]
    async fn malformed_request_is_skipped() {
        let (ledger, _, service) = setup().await;
        let event = LedgerEvent {
            event: ORACLE_REQUEST_EVENT.to_string(),
            block_number: 10,
            tx_hash: None,
            return_values: json!({ "index": "3" }),
        };

        assert!(service.handle_oracle_request(event).is_none());
        assert!(ledger.sent().is_empty());
    }

    #[tokio::test]
    async fn reactor_answers_replayed_history() {
        let (ledger, pool, service) = setup().await;
        ledger.push_event(Contract::App, ORACLE_REQUEST_EVENT, 2, request_values(&pool, 3));
        ledger.push_event(Contract::App, ORACLE_REQUEST_EVENT, 4, request_values(&pool, 12));
        ledger.push_event(Contract::Data, "InsuranceBought", 3, json!({ "amount": "1" }));

        let reactor = tokio::spawn(service.start());

        let answered = timeout(Duration::from_secs(2), async {
            loop {
                if ledger.sent_by_method("submitOracleResponse").len() >= 8 {
                    break;
                }
                sleep(Duration::from_millis(5)).await;
            }
        })
        .await;
        reactor.abort();

        assert!(answered.is_ok(), "reactor did not answer both requests");
        assert_eq!(ledger.sent_by_method("submitOracleResponse").len(), 8);
    }
}
