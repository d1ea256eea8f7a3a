//! In-memory ledger double for tests.
//!
//! Models just enough contract state to answer the queries the node makes,
//! applies sends immediately, records every send and transfer, and can be
//! told to fail specific methods.

use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::{json, Value};

use super::{decode, Contract, LedgerEvent, LedgerGateway, LedgerResult, Receipt, SendOptions};
use crate::error::LedgerError;
use crate::models::identity::test_identity;
use crate::models::{FlightStatus, Identity};

pub const TRANSFER: &str = "transfer";

#[derive(Debug, Clone, PartialEq)]
pub struct SentTx {
    pub contract: Contract,
    pub method: String,
    pub args: Vec<Value>,
    pub from: Identity,
    pub value: Option<u128>,
    pub gas: Option<u64>,
}

type FlightKey = (Identity, String, u64);

#[derive(Default)]
struct MockState {
    accounts: Vec<Identity>,
    operational: bool,
    fee: u128,
    airlines: Vec<Identity>,
    votes: HashMap<Identity, HashSet<Identity>>,
    funded: HashSet<Identity>,
    flights: HashSet<FlightKey>,
    statuses: HashMap<FlightKey, FlightStatus>,
    oracles: HashMap<Identity, [u8; 3]>,
    pending_assignments: VecDeque<[u8; 3]>,
    sent: Vec<SentTx>,
    failures: Vec<(String, Option<Identity>)>,
    arg_failures: Vec<(String, Value)>,
    events: Vec<(Contract, LedgerEvent)>,
    failing_event_polls: usize,
    event_polls: Vec<u64>,
    tx_counter: u64,
}

pub struct MockLedger {
    state: Mutex<MockState>,
}

impl MockLedger {
    /// Ledger with `accounts` generated identities; the first airline
    /// (account 1) is registered at genesis, as the data contract does.
    pub fn new(accounts: usize) -> Self {
        let accounts: Vec<Identity> = (0..accounts).map(test_identity).collect();
        let airlines = accounts.get(1).cloned().into_iter().collect();

        Self {
            state: Mutex::new(MockState {
                accounts,
                operational: true,
                fee: 10u128.pow(18),
                airlines,
                ..MockState::default()
            }),
        }
    }

    fn with_state<T>(&self, f: impl FnOnce(&mut MockState) -> T) -> T {
        let mut guard = self.state.lock().unwrap();
        f(&mut guard)
    }

    pub fn accounts_snapshot(&self) -> Vec<Identity> {
        self.with_state(|s| s.accounts.clone())
    }

    pub fn register_airline_directly(&self, airline: &Identity) {
        self.with_state(|s| {
            if !s.airlines.contains(airline) {
                s.airlines.push(airline.clone());
            }
        });
    }

    pub fn fund_directly(&self, airline: &Identity) {
        self.with_state(|s| {
            s.funded.insert(airline.clone());
        });
    }

    pub fn register_oracle_directly(&self, oracle: &Identity, indexes: [u8; 3]) {
        self.with_state(|s| {
            s.oracles.insert(oracle.clone(), indexes);
        });
    }

    /// Index triples handed out, in order, to oracles registering via send.
    pub fn queue_oracle_assignments(&self, assignments: impl IntoIterator<Item = [u8; 3]>) {
        self.with_state(|s| s.pending_assignments.extend(assignments));
    }

    pub fn set_flight_status(&self, airline: &Identity, code: &str, timestamp: u64, status: FlightStatus) {
        self.with_state(|s| {
            s.statuses
                .insert((airline.clone(), code.to_string(), timestamp), status);
        });
    }

    /// Make calls/sends of `method` fail, optionally only from `from`.
    pub fn fail_on(&self, method: &str, from: Option<&Identity>) {
        self.with_state(|s| s.failures.push((method.to_string(), from.cloned())));
    }

    /// Make calls/sends of `method` fail whenever one of their arguments
    /// equals `arg`.
    pub fn fail_on_args(&self, method: &str, arg: Value) {
        self.with_state(|s| s.arg_failures.push((method.to_string(), arg)));
    }

    pub fn push_event(&self, contract: Contract, event: &str, block_number: u64, values: Value) {
        self.with_state(|s| {
            s.events.push((
                contract,
                LedgerEvent {
                    event: event.to_string(),
                    block_number,
                    tx_hash: None,
                    return_values: values,
                },
            ))
        });
    }

    pub fn fail_event_polls(&self, count: usize) {
        self.with_state(|s| s.failing_event_polls = count);
    }

    pub fn event_polls_from(&self, block: u64) -> usize {
        self.with_state(|s| s.event_polls.iter().filter(|b| **b == block).count())
    }

    pub fn sent(&self) -> Vec<SentTx> {
        self.with_state(|s| s.sent.clone())
    }

    pub fn sent_by_method(&self, method: &str) -> Vec<SentTx> {
        self.sent().into_iter().filter(|tx| tx.method == method).collect()
    }

    pub fn clear_sent(&self) {
        self.with_state(|s| s.sent.clear());
    }

    pub fn is_flight(&self, airline: &Identity, code: &str, timestamp: u64) -> bool {
        self.with_state(|s| s.flights.contains(&(airline.clone(), code.to_string(), timestamp)))
    }
}

fn injected(method: &str) -> LedgerError {
    LedgerError::Rpc {
        code: -32000,
        message: format!("injected failure for {method}"),
    }
}

fn arg<'a>(args: &'a [Value], position: usize) -> LedgerResult<&'a Value> {
    args.get(position).ok_or(LedgerError::MissingField("argument"))
}

fn flight_key(args: &[Value]) -> LedgerResult<FlightKey> {
    Ok((
        decode::as_identity(arg(args, 0)?, "airline")?,
        arg(args, 1)?
            .as_str()
            .map(ToString::to_string)
            .ok_or(LedgerError::MissingField("flight"))?,
        decode::as_u64(arg(args, 2)?, "timestamp")?,
    ))
}

impl MockState {
    fn should_fail(&self, method: &str, from: &Identity, args: &[Value]) -> bool {
        let by_sender = self.failures.iter().any(|(failing, who)| {
            failing == method && who.as_ref().map(|id| id == from).unwrap_or(true)
        });
        let by_arg = self
            .arg_failures
            .iter()
            .any(|(failing, value)| failing == method && args.contains(value));
        by_sender || by_arg
    }

    fn next_receipt(&mut self) -> Receipt {
        self.tx_counter += 1;
        Receipt {
            tx_hash: format!("0x{:064x}", self.tx_counter),
        }
    }

    fn apply_send(&mut self, method: &str, args: &[Value], options: &SendOptions) -> LedgerResult<()> {
        match method {
            "registerAirline" => {
                let airline = decode::as_identity(arg(args, 0)?, "airline")?;
                if self.airlines.contains(&airline) || !self.airlines.contains(&options.from) {
                    return Ok(());
                }
                let registered = self.airlines.len();
                let votes = self.votes.entry(airline.clone()).or_default();
                votes.insert(options.from.clone());
                let required = if registered < 4 { 1 } else { registered.div_ceil(2) };
                if votes.len() >= required {
                    self.airlines.push(airline);
                }
            }
            "registerFlight" => {
                self.flights.insert(flight_key(args)?);
            }
            "registerOracle" => {
                let indexes = self.pending_assignments.pop_front().unwrap_or([0, 1, 2]);
                self.oracles.insert(options.from.clone(), indexes);
            }
            _ => {}
        }
        Ok(())
    }
}

#[async_trait]
impl LedgerGateway for MockLedger {
    async fn accounts(&self) -> LedgerResult<Vec<Identity>> {
        Ok(self.accounts_snapshot())
    }

    async fn call(
        &self,
        _contract: Contract,
        method: &str,
        args: Vec<Value>,
        from: &Identity,
    ) -> LedgerResult<Value> {
        self.with_state(|s| {
            if s.should_fail(method, from, &args) {
                return Err(injected(method));
            }
            match method {
                "isOperational" => Ok(json!(s.operational)),
                "isAirline" => {
                    let id = decode::as_identity(arg(&args, 0)?, "airline")?;
                    Ok(json!(s.airlines.contains(&id)))
                }
                "isFunded" => {
                    let id = decode::as_identity(arg(&args, 0)?, "airline")?;
                    Ok(json!(s.funded.contains(&id)))
                }
                "isFlight" => Ok(json!(s.flights.contains(&flight_key(&args)?))),
                "getFlightStatusCode" => {
                    let status = s
                        .statuses
                        .get(&flight_key(&args)?)
                        .copied()
                        .unwrap_or(FlightStatus::Unknown);
                    Ok(json!(status.code().to_string()))
                }
                "isOracle" => {
                    let id = decode::as_identity(arg(&args, 0)?, "oracle")?;
                    Ok(json!(s.oracles.contains_key(&id)))
                }
                "getMyIndexes" => match s.oracles.get(from) {
                    Some(indexes) => Ok(json!(indexes
                        .iter()
                        .map(|i| i.to_string())
                        .collect::<Vec<_>>())),
                    None => Err(LedgerError::Rpc {
                        code: -32000,
                        message: "Not registered as an oracle".to_string(),
                    }),
                },
                "REGISTRATION_FEE" => Ok(json!(s.fee.to_string())),
                other => Err(LedgerError::Rpc {
                    code: -32601,
                    message: format!("unknown method {other}"),
                }),
            }
        })
    }

    async fn send(
        &self,
        contract: Contract,
        method: &str,
        args: Vec<Value>,
        options: SendOptions,
    ) -> LedgerResult<Receipt> {
        self.with_state(|s| {
            if s.should_fail(method, &options.from, &args) {
                return Err(injected(method));
            }
            s.apply_send(method, &args, &options)?;
            s.sent.push(SentTx {
                contract,
                method: method.to_string(),
                args,
                from: options.from.clone(),
                value: options.value,
                gas: options.gas,
            });
            Ok(s.next_receipt())
        })
    }

    async fn transfer(&self, from: &Identity, to: Contract, value: u128) -> LedgerResult<Receipt> {
        self.with_state(|s| {
            if s.should_fail(TRANSFER, from, &[]) {
                return Err(injected(TRANSFER));
            }
            if to == Contract::Data && value >= 10 * 10u128.pow(18) {
                s.funded.insert(from.clone());
            }
            s.sent.push(SentTx {
                contract: to,
                method: TRANSFER.to_string(),
                args: Vec::new(),
                from: from.clone(),
                value: Some(value),
                gas: None,
            });
            Ok(s.next_receipt())
        })
    }

    async fn events(
        &self,
        contract: Contract,
        event: &str,
        from_block: u64,
    ) -> LedgerResult<Vec<LedgerEvent>> {
        self.with_state(|s| {
            s.event_polls.push(from_block);
            if s.failing_event_polls > 0 {
                s.failing_event_polls -= 1;
                return Err(injected("getEvents"));
            }
            Ok(s.events
                .iter()
                .filter(|(c, e)| *c == contract && e.event == event && e.block_number >= from_block)
                .map(|(_, e)| e.clone())
                .collect())
        })
    }
}
