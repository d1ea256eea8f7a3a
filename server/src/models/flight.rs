//! Flight records, status codes and the static flight catalog

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::identity::Identity;

/// Spacing between consecutive catalog slots (15 minutes).
pub const SLOT_SPACING_SECS: u64 = 15 * 60;

/// Flight status codes as stored by the app contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum FlightStatus {
    Unknown,
    OnTime,
    LateAirline,
    LateWeather,
    LateTechnical,
    LateOther,
}

impl FlightStatus {
    /// Codes an oracle may report. `Unknown` is never submitted.
    pub const REPORTABLE: [FlightStatus; 5] = [
        FlightStatus::OnTime,
        FlightStatus::LateAirline,
        FlightStatus::LateWeather,
        FlightStatus::LateTechnical,
        FlightStatus::LateOther,
    ];

    pub fn code(self) -> u8 {
        match self {
            FlightStatus::Unknown => 0,
            FlightStatus::OnTime => 10,
            FlightStatus::LateAirline => 20,
            FlightStatus::LateWeather => 30,
            FlightStatus::LateTechnical => 40,
            FlightStatus::LateOther => 50,
        }
    }

    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(FlightStatus::Unknown),
            10 => Some(FlightStatus::OnTime),
            20 => Some(FlightStatus::LateAirline),
            30 => Some(FlightStatus::LateWeather),
            40 => Some(FlightStatus::LateTechnical),
            50 => Some(FlightStatus::LateOther),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            FlightStatus::Unknown => "Status Unknown",
            FlightStatus::OnTime => "On Time",
            FlightStatus::LateAirline => "Late Airline",
            FlightStatus::LateWeather => "Late Weather",
            FlightStatus::LateTechnical => "Late Technical",
            FlightStatus::LateOther => "Late Other",
        }
    }

    /// Uniform draw over [`FlightStatus::REPORTABLE`].
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        *Self::REPORTABLE
            .choose(rng)
            .unwrap_or(&FlightStatus::OnTime)
    }
}

impl TryFrom<u8> for FlightStatus {
    type Error = String;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        Self::from_code(code).ok_or_else(|| format!("unknown flight status code {code}"))
    }
}

impl From<FlightStatus> for u8 {
    fn from(status: FlightStatus) -> Self {
        status.code()
    }
}

/// A flight as keyed on the ledger.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Flight {
    pub airline: Identity,
    pub code: String,
    pub timestamp: u64,
}

/// One row of the static catalog: which airline flies it and in which slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CatalogEntry {
    pub code: &'static str,
    pub slot: u32,
    pub airline_index: usize,
}

pub const FLIGHT_CATALOG: [CatalogEntry; 5] = [
    CatalogEntry { code: "ND1309", slot: 0, airline_index: 0 },
    CatalogEntry { code: "ND1310", slot: 1, airline_index: 1 },
    CatalogEntry { code: "ND1311", slot: 2, airline_index: 2 },
    CatalogEntry { code: "ND1312", slot: 3, airline_index: 3 },
    CatalogEntry { code: "ND1313", slot: 4, airline_index: 4 },
];

/// `None` when the slot's departure would not fit in a `u64`.
pub fn slot_timestamp(base_timestamp: u64, slot: u32) -> Option<u64> {
    u64::from(slot)
        .checked_mul(SLOT_SPACING_SECS)
        .and_then(|offset| base_timestamp.checked_add(offset))
}

/// A catalog entry resolved against the identity pool and base time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduledFlight {
    pub slot: u32,
    pub airline_index: usize,
    #[serde(flatten)]
    pub flight: Flight,
}

impl ScheduledFlight {
    pub fn resolve(entry: &CatalogEntry, airline: Identity, base_timestamp: u64) -> Option<Self> {
        Some(Self {
            slot: entry.slot,
            airline_index: entry.airline_index,
            flight: Flight {
                airline,
                code: entry.code.to_string(),
                timestamp: slot_timestamp(base_timestamp, entry.slot)?,
            },
        })
    }
}
