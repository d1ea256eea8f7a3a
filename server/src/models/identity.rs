//! Party identities and the fixed role layout of the identity pool

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

pub const AIRLINE_COUNT: usize = 5;
pub const PASSENGER_COUNT: usize = 5;
/// Account index of the first oracle. Index 11 is left unused.
pub const FIRST_ORACLE_ACCOUNT: usize = 12;
pub const ORACLE_COUNT: usize = 20;

const ADDRESS_HEX_LEN: usize = 40;

/// Address-like handle of a ledger party, stored lowercase with its `0x` prefix.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Identity(String);

impl Identity {
    pub fn parse(raw: &str) -> Result<Self, ConfigError> {
        let trimmed = raw.trim();
        let digits = trimmed
            .strip_prefix("0x")
            .or_else(|| trimmed.strip_prefix("0X"))
            .ok_or_else(|| ConfigError::InvalidAddress(raw.to_string()))?;

        if digits.len() != ADDRESS_HEX_LEN || hex::decode(digits).is_err() {
            return Err(ConfigError::InvalidAddress(raw.to_string()));
        }

        Ok(Self(format!("0x{}", digits.to_ascii_lowercase())))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for Identity {
    type Error = ConfigError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Identity> for String {
    fn from(identity: Identity) -> Self {
        identity.0
    }
}

/// Pre-funded parties partitioned by role. Built once at startup.
#[derive(Debug, Clone)]
pub struct IdentityPool {
    pub owner: Identity,
    pub airlines: Vec<Identity>,
    pub passengers: Vec<Identity>,
    pub oracles: Vec<Identity>,
}

impl IdentityPool {
    /// Number of ledger accounts the layout consumes.
    pub const REQUIRED_ACCOUNTS: usize = FIRST_ORACLE_ACCOUNT + ORACLE_COUNT;

    /// Partition the ledger's account list: owner at 0, then airlines, then
    /// passengers, with oracles starting at [`FIRST_ORACLE_ACCOUNT`].
    pub fn from_accounts(accounts: &[Identity]) -> Result<Self, ConfigError> {
        if accounts.len() < Self::REQUIRED_ACCOUNTS {
            return Err(ConfigError::NotEnoughAccounts {
                available: accounts.len(),
                required: Self::REQUIRED_ACCOUNTS,
            });
        }

        let first_airline = 1;
        let first_passenger = first_airline + AIRLINE_COUNT;

        Ok(Self {
            owner: accounts[0].clone(),
            airlines: accounts[first_airline..first_passenger].to_vec(),
            passengers: accounts[first_passenger..first_passenger + PASSENGER_COUNT].to_vec(),
            oracles: accounts[FIRST_ORACLE_ACCOUNT..FIRST_ORACLE_ACCOUNT + ORACLE_COUNT].to_vec(),
        })
    }

    pub fn airline(&self, index: usize) -> Option<&Identity> {
        self.airlines.get(index)
    }

    pub fn passenger(&self, index: usize) -> Option<&Identity> {
        self.passengers.get(index)
    }
}

#[cfg(test)]
pub(crate) fn test_identity(n: usize) -> Identity {
    Identity(format!("0x{:040x}", n + 1))
}
