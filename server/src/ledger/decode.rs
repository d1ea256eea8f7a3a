//! Helpers for reading loosely-typed JSON values returned by the gateway.
//!
//! Contract integers arrive either as JSON numbers or as decimal strings
//! (values wider than 53 bits are always strings), so every numeric reader
//! accepts both.

use serde_json::Value;

use crate::error::LedgerError;
use crate::models::Identity;

pub fn field<'a>(values: &'a Value, name: &'static str) -> Result<&'a Value, LedgerError> {
    values.get(name).ok_or(LedgerError::MissingField(name))
}

pub fn as_bool(value: &Value, what: &'static str) -> Result<bool, LedgerError> {
    match value {
        Value::Bool(flag) => Ok(*flag),
        Value::String(s) if s == "true" => Ok(true),
        Value::String(s) if s == "false" => Ok(false),
        other => Err(LedgerError::decode(what, format!("expected bool, got {other}"))),
    }
}

pub fn as_u128(value: &Value, what: &'static str) -> Result<u128, LedgerError> {
    match value {
        Value::Number(n) => n
            .as_u64()
            .map(u128::from)
            .ok_or_else(|| LedgerError::decode(what, format!("not an unsigned integer: {n}"))),
        Value::String(s) => parse_uint(s).map_err(|reason| LedgerError::decode(what, reason)),
        other => Err(LedgerError::decode(what, format!("expected integer, got {other}"))),
    }
}

pub fn as_u64(value: &Value, what: &'static str) -> Result<u64, LedgerError> {
    let wide = as_u128(value, what)?;
    u64::try_from(wide).map_err(|err| LedgerError::decode(what, err))
}

pub fn as_identity(value: &Value, what: &'static str) -> Result<Identity, LedgerError> {
    let raw = value
        .as_str()
        .ok_or_else(|| LedgerError::decode(what, format!("expected address, got {value}")))?;
    Identity::parse(raw).map_err(|err| LedgerError::decode(what, err))
}

pub fn u64_field(values: &Value, name: &'static str) -> Result<u64, LedgerError> {
    as_u64(field(values, name)?, name)
}

pub fn identity_field(values: &Value, name: &'static str) -> Result<Identity, LedgerError> {
    as_identity(field(values, name)?, name)
}

pub fn string_field(values: &Value, name: &'static str) -> Result<String, LedgerError> {
    field(values, name)?
        .as_str()
        .map(ToString::to_string)
        .ok_or_else(|| LedgerError::decode(name, "expected string"))
}

fn parse_uint(raw: &str) -> Result<u128, String> {
    let raw = raw.trim();
    match raw.strip_prefix("0x") {
        Some(hex_digits) => u128::from_str_radix(hex_digits, 16),
        None => raw.parse::<u128>(),
    }
    .map_err(|err| format!("`{raw}`: {err}"))
}
