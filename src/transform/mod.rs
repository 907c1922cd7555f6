//! Record normalization
//!
//! # Overview
//!
//! [`normalize`] maps one raw dashboard payload into a [`NormalizedBlock`].
//! Coercion is strict and all-or-nothing: every required field must be
//! present and coercible to its declared type, otherwise the whole record
//! is rejected with an error naming the first offending field. Counts and
//! sizes coerce to integers (floats truncate, matching the upstream's
//! habit of reporting difficulty as a float); USD-denominated measures
//! coerce to floats. Numeric strings are accepted for both.

use crate::error::{Error, Result};
use crate::source::RawBlock;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Timestamp format used by the upstream, e.g. `2011-01-10 00:00:00`
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// A fully validated, normalized block record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedBlock {
    /// Source identifier, kept verbatim
    pub id: String,
    /// Block timestamp
    pub timestamp: NaiveDateTime,
    /// Block height
    pub height: i64,
    /// Block size in bytes
    pub size: i64,
    /// Mining difficulty (truncated to integer)
    pub difficulty: i64,
    /// Compact difficulty target
    pub bits: i64,
    /// Number of transactions in the block
    pub transaction_count: i64,
    /// Total input value in USD
    pub input_usd: f64,
    /// Total output value in USD
    pub output_usd: f64,
    /// Total fees in USD
    pub fee_usd: f64,
    /// Fees per kilobyte in USD
    pub fee_per_kb_usd: f64,
    /// Block reward in USD
    pub reward_usd: f64,
}

/// Normalize one raw block payload.
///
/// Fails with [`Error::MalformedRecord`] naming the first missing or
/// uncoercible field. Never returns a partial record.
pub fn normalize(raw: &RawBlock) -> Result<NormalizedBlock> {
    Ok(NormalizedBlock {
        id: string_field(raw, "id")?,
        timestamp: timestamp_field(raw, "time")?,
        height: int_field(raw, "id")?,
        size: int_field(raw, "size")?,
        difficulty: int_field(raw, "difficulty")?,
        bits: int_field(raw, "bits")?,
        transaction_count: int_field(raw, "transaction_count")?,
        input_usd: float_field(raw, "input_total_usd")?,
        output_usd: float_field(raw, "output_total_usd")?,
        fee_usd: float_field(raw, "fee_total_usd")?,
        fee_per_kb_usd: float_field(raw, "fee_per_kb_usd")?,
        reward_usd: float_field(raw, "reward_usd")?,
    })
}

/// Look up a required field
fn require<'a>(raw: &'a RawBlock, field: &str) -> Result<&'a Value> {
    match raw.get(field) {
        Some(Value::Null) | None => Err(Error::malformed(field, "missing")),
        Some(value) => Ok(value),
    }
}

/// Coerce a field to a string: strings pass through, numbers render
fn string_field(raw: &RawBlock, field: &str) -> Result<String> {
    match require(raw, field)? {
        Value::String(s) => Ok(s.clone()),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(Error::malformed(
            field,
            format!("expected string, got {}", type_name(other)),
        )),
    }
}

/// Coerce a field to an integer: integers pass through, floats truncate,
/// numeric strings parse
fn int_field(raw: &RawBlock, field: &str) -> Result<i64> {
    let value = require(raw, field)?;
    match value {
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Ok(i)
            } else if let Some(f) = n.as_f64() {
                Ok(f.trunc() as i64)
            } else {
                Err(Error::malformed(field, "integer out of range"))
            }
        }
        Value::String(s) => coerce_str_int(s)
            .ok_or_else(|| Error::malformed(field, format!("cannot parse '{s}' as integer"))),
        other => Err(Error::malformed(
            field,
            format!("expected integer, got {}", type_name(other)),
        )),
    }
}

/// Coerce a field to a float: numbers pass through, numeric strings parse
fn float_field(raw: &RawBlock, field: &str) -> Result<f64> {
    let value = require(raw, field)?;
    match value {
        Value::Number(n) => n
            .as_f64()
            .ok_or_else(|| Error::malformed(field, "number out of range")),
        Value::String(s) => s
            .trim()
            .parse()
            .map_err(|_| Error::malformed(field, format!("cannot parse '{s}' as number"))),
        other => Err(Error::malformed(
            field,
            format!("expected number, got {}", type_name(other)),
        )),
    }
}

/// Parse a required timestamp field
fn timestamp_field(raw: &RawBlock, field: &str) -> Result<NaiveDateTime> {
    let text = match require(raw, field)? {
        Value::String(s) => s,
        other => {
            return Err(Error::malformed(
                field,
                format!("expected timestamp string, got {}", type_name(other)),
            ))
        }
    };
    NaiveDateTime::parse_from_str(text, TIMESTAMP_FORMAT)
        .map_err(|e| Error::malformed(field, format!("bad timestamp '{text}': {e}")))
}

/// Parse an integer from a string, accepting a float form that truncates
fn coerce_str_int(s: &str) -> Option<i64> {
    let trimmed = s.trim();
    if let Ok(i) = trimmed.parse::<i64>() {
        return Some(i);
    }
    trimmed.parse::<f64>().ok().map(|f| f.trunc() as i64)
}

/// Human-readable JSON type name for error messages
fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests;
