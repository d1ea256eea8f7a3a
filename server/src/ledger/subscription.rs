//! Polling event subscriptions
//!
//! A subscription is a background task that repeatedly asks the gateway for
//! events past its cursor and forwards them over a channel. Delivery errors
//! are logged and polling carries on; the task stops once the receiver is
//! dropped.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::sleep;
use tracing::{debug, warn};

use super::{Contract, LedgerEvent, LedgerGateway};

const SUBSCRIPTION_BUFFER: usize = 256;

pub fn subscribe(
    ledger: Arc<dyn LedgerGateway>,
    contract: Contract,
    event: &'static str,
    from_block: u64,
    poll_interval: Duration,
) -> mpsc::Receiver<LedgerEvent> {
    let (tx, rx) = mpsc::channel(SUBSCRIPTION_BUFFER);

    tokio::spawn(async move {
        let mut cursor = from_block;
        debug!(?contract, event, from_block, "subscription started");

        loop {
            match ledger.events(contract, event, cursor).await {
                Ok(batch) => {
                    for delivered in batch {
                        let next = delivered.block_number.saturating_add(1);
                        if tx.send(delivered).await.is_err() {
                            debug!(?contract, event, "subscriber dropped; stopping");
                            return;
                        }
                        cursor = cursor.max(next);
                    }
                }
                Err(err) => {
                    warn!(?contract, event, cursor, error = %err, "event delivery failed");
                }
            }

            tokio::select! {
                _ = tx.closed() => {
                    debug!(?contract, event, "subscriber dropped; stopping");
                    return;
                }
                _ = sleep(poll_interval) => {}
            }
        }
    });

    rx
}
