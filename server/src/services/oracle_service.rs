//! Oracle consensus simulator
//!
//! Registers the oracle identities once, then answers each `OracleRequest`
//! on behalf of every pooled oracle holding the requested index. Counting the
//! answers and settling the flight status happens on the ledger.

use futures_util::future::join_all;
use tracing::{debug, error, info, warn};

use crate::error::LedgerError;
use crate::ledger::FlightSurety;
use crate::models::{FlightStatus, Identity, OracleRequest, StatusResponse};

/// Outcome of one request's fan-out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchReport {
    pub status: FlightStatus,
    pub responders: Vec<Identity>,
    pub failures: usize,
}

enum OracleOutcome {
    Submitted(Identity),
    NotAddressed,
    Failed,
}

pub struct OracleService {
    surety: FlightSurety,
    responders: Vec<Identity>,
}

impl OracleService {
    /// Register every oracle the ledger does not know yet, paying the live
    /// registration fee. Oracles that fail to register, or whose state can't
    /// be read, are left out of the pool and never respond.
    pub async fn register_pool(surety: FlightSurety, oracles: &[Identity]) -> Self {
        let fee = match surety.registration_fee().await {
            Ok(fee) => fee,
            Err(err) => {
                error!(error = %err, "could not read oracle registration fee; pool is empty");
                return Self {
                    surety,
                    responders: Vec::new(),
                };
            }
        };

        let registrations = oracles.iter().map(|oracle| {
            let surety = &surety;
            async move {
                match Self::ensure_registered(surety, oracle, fee).await {
                    Ok(()) => Some(oracle.clone()),
                    Err(err) => {
                        error!(%oracle, error = %err, "oracle registration failed");
                        None
                    }
                }
            }
        });
        let responders: Vec<Identity> = join_all(registrations).await.into_iter().flatten().collect();

        info!(registered = responders.len(), requested = oracles.len(), "oracle pool ready");
        Self { surety, responders }
    }

    async fn ensure_registered(surety: &FlightSurety, oracle: &Identity, fee: u128) -> Result<(), LedgerError> {
        if surety.is_oracle(oracle).await? {
            debug!(%oracle, "oracle already registered");
            return Ok(());
        }

        let receipt = surety.register_oracle(oracle, fee).await?;
        match surety.oracle_indexes(oracle).await {
            Ok(indexes) => {
                let [a, b, c] = indexes.0;
                info!(%oracle, tx = %receipt.tx_hash, "Oracle Registered: {a}, {b}, {c}");
            }
            Err(err) => warn!(%oracle, error = %err, "oracle registered but indexes unavailable"),
        }
        Ok(())
    }

    pub fn responders(&self) -> &[Identity] {
        &self.responders
    }

    /// Answer `request` with one status drawn for the whole fan-out.
    pub async fn dispatch(&self, request: &OracleRequest) -> DispatchReport {
        let status = FlightStatus::random(&mut rand::thread_rng());
        self.dispatch_with_status(request, status).await
    }

    pub async fn dispatch_with_status(&self, request: &OracleRequest, status: FlightStatus) -> DispatchReport {
        let response = StatusResponse::answering(request, status);
        let attempts = self
            .responders
            .iter()
            .map(|oracle| self.respond(oracle, &response));

        let mut report = DispatchReport {
            status,
            responders: Vec::new(),
            failures: 0,
        };
        for outcome in join_all(attempts).await {
            match outcome {
                OracleOutcome::Submitted(oracle) => report.responders.push(oracle),
                OracleOutcome::NotAddressed => {}
                OracleOutcome::Failed => report.failures += 1,
            }
        }

        info!(
            index = request.index,
            flight = %request.flight,
            status = status.code(),
            responders = report.responders.len(),
            failures = report.failures,
            "oracle request dispatched"
        );
        report
    }

    /// Indexes are re-read on every request so a reassignment on the
    /// ledger is picked up without restarting.
    async fn respond(&self, oracle: &Identity, response: &StatusResponse) -> OracleOutcome {
        let indexes = match self.surety.oracle_indexes(oracle).await {
            Ok(indexes) => indexes,
            Err(err) => {
                warn!(%oracle, error = %err, "could not read oracle indexes");
                return OracleOutcome::Failed;
            }
        };

        if !indexes.contains(response.index) {
            return OracleOutcome::NotAddressed;
        }

        match self.surety.submit_oracle_response(oracle, response).await {
            Ok(receipt) => {
                debug!(%oracle, index = response.index, tx = %receipt.tx_hash, "oracle response submitted");
                OracleOutcome::Submitted(oracle.clone())
            }
            Err(err) => {
                error!(%oracle, index = response.index, error = %err, "oracle response failed");
                OracleOutcome::Failed
            }
        }
    }
}
