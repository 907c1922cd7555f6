//! Tests for record normalization

use super::*;
use crate::error::Error;
use pretty_assertions::assert_eq;
use serde_json::json;

/// A complete, well-formed raw payload as the dashboard API reports it
fn valid_raw() -> RawBlock {
    json!({
        "id": 100_000,
        "time": "2010-12-29 11:57:43",
        "size": 957,
        "difficulty": 14484.162361225399,
        "bits": 453_281_356,
        "transaction_count": 4,
        "input_total_usd": 171.28,
        "output_total_usd": 171.28,
        "fee_total_usd": 0.0,
        "fee_per_kb_usd": "0.0",
        "reward_usd": 13.1
    })
}

#[test]
fn test_normalize_valid_block() {
    let block = normalize(&valid_raw()).unwrap();

    assert_eq!(block.id, "100000");
    assert_eq!(block.height, 100_000);
    assert_eq!(
        block.timestamp.format(TIMESTAMP_FORMAT).to_string(),
        "2010-12-29 11:57:43"
    );
    assert_eq!(block.size, 957);
    // Float difficulty truncates to integer
    assert_eq!(block.difficulty, 14_484);
    assert_eq!(block.bits, 453_281_356);
    assert_eq!(block.transaction_count, 4);
    assert_eq!(block.input_usd, 171.28);
    assert_eq!(block.output_usd, 171.28);
    assert_eq!(block.fee_usd, 0.0);
    assert_eq!(block.fee_per_kb_usd, 0.0);
    assert_eq!(block.reward_usd, 13.1);
}

#[test]
fn test_missing_field_names_field() {
    let mut raw = valid_raw();
    raw.as_object_mut().unwrap().remove("size");

    let err = normalize(&raw).unwrap_err();
    match err {
        Error::MalformedRecord { field, message } => {
            assert_eq!(field, "size");
            assert_eq!(message, "missing");
        }
        other => panic!("expected MalformedRecord, got {other}"),
    }
}

#[test]
fn test_null_field_is_missing() {
    let mut raw = valid_raw();
    raw["reward_usd"] = json!(null);

    let err = normalize(&raw).unwrap_err();
    assert!(matches!(err, Error::MalformedRecord { field, .. } if field == "reward_usd"));
}

#[test]
fn test_uncoercible_integer_rejected() {
    let mut raw = valid_raw();
    raw["transaction_count"] = json!("lots");

    let err = normalize(&raw).unwrap_err();
    assert!(matches!(err, Error::MalformedRecord { field, .. } if field == "transaction_count"));
}

#[test]
fn test_uncoercible_float_rejected() {
    let mut raw = valid_raw();
    raw["input_total_usd"] = json!([1, 2]);

    let err = normalize(&raw).unwrap_err();
    assert!(matches!(err, Error::MalformedRecord { field, .. } if field == "input_total_usd"));
}

#[test]
fn test_numeric_strings_coerce() {
    let mut raw = valid_raw();
    raw["size"] = json!("957");
    raw["input_total_usd"] = json!(" 171.28 ");

    let block = normalize(&raw).unwrap();
    assert_eq!(block.size, 957);
    assert_eq!(block.input_usd, 171.28);
}

#[test]
fn test_float_string_truncates_for_integer_field() {
    let mut raw = valid_raw();
    raw["difficulty"] = json!("14484.16");

    let block = normalize(&raw).unwrap();
    assert_eq!(block.difficulty, 14_484);
}

#[test]
fn test_bad_timestamp_rejected() {
    let mut raw = valid_raw();
    raw["time"] = json!("2010-12-29T11:57:43Z");

    let err = normalize(&raw).unwrap_err();
    assert!(matches!(err, Error::MalformedRecord { field, .. } if field == "time"));
}

#[test]
fn test_string_id_passes_through() {
    let mut raw = valid_raw();
    raw["id"] = json!("100000");

    let block = normalize(&raw).unwrap();
    assert_eq!(block.id, "100000");
    assert_eq!(block.height, 100_000);
}

#[test]
fn test_no_partial_record_on_failure() {
    // First offending field is reported even when later ones are also bad
    let mut raw = valid_raw();
    raw["time"] = json!(12345);
    raw["reward_usd"] = json!("junk");

    let err = normalize(&raw).unwrap_err();
    assert!(matches!(err, Error::MalformedRecord { field, .. } if field == "time"));
}

#[test]
fn test_non_object_payload_rejected() {
    let raw = json!("not an object");
    assert!(normalize(&raw).is_err());
}

#[test]
fn test_roundtrips_through_serde() {
    let block = normalize(&valid_raw()).unwrap();
    let encoded = serde_json::to_string(&block).unwrap();
    let decoded: NormalizedBlock = serde_json::from_str(&encoded).unwrap();
    assert_eq!(block, decoded);
}
