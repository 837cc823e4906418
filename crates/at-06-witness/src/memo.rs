//! # Wire Memo
//!
//! The on-ledger envelope. MemoType identifies attestia memos on readback;
//! MemoData is the hex of the canonical payload JSON; MemoFormat declares
//! the media type. Decoding is strict: a foreign memo type is rejected
//! before any parsing happens.

use crate::errors::MemoError;
use crate::payload::WitnessPayload;
use serde::{Deserialize, Serialize};
use shared_crypto::{canonical_json_bytes, to_canonical_value};

/// Memo type tag identifying attestia witness memos.
pub const MEMO_TYPE: &str = "attestia/witness/v1";

/// Declared media type of the memo data.
pub const MEMO_FORMAT: &str = "application/json";

/// The three-field wire envelope, hex-encoded per ledger convention.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WitnessMemo {
    /// hex(`attestia/witness/v1`)
    #[serde(rename = "MemoType")]
    pub memo_type: String,
    /// hex(canonical JSON of the payload)
    #[serde(rename = "MemoData")]
    pub memo_data: String,
    /// hex(`application/json`)
    #[serde(rename = "MemoFormat", skip_serializing_if = "Option::is_none")]
    pub memo_format: Option<String>,
}

/// Encode a payload into its wire memo.
pub fn encode_memo(payload: &WitnessPayload) -> Result<WitnessMemo, MemoError> {
    let canonical = canonical_json_bytes(&to_canonical_value(payload)?)?;
    Ok(WitnessMemo {
        memo_type: hex::encode(MEMO_TYPE.as_bytes()),
        memo_data: hex::encode(canonical),
        memo_format: Some(hex::encode(MEMO_FORMAT.as_bytes())),
    })
}

/// Whether a memo carries the attestia witness type tag.
pub fn is_witness_memo(memo: &WitnessMemo) -> bool {
    hex::decode(&memo.memo_type)
        .map(|decoded| decoded == MEMO_TYPE.as_bytes())
        .unwrap_or(false)
}

/// Decode a wire memo back into its payload.
///
/// The decoded payload is returned as-is; callers apply
/// [`verify_payload_hash`](crate::payload::verify_payload_hash)
/// independently.
pub fn decode_memo(memo: &WitnessMemo) -> Result<WitnessPayload, MemoError> {
    if !is_witness_memo(memo) {
        return Err(MemoError::ForeignMemoType {
            memo_type: memo.memo_type.clone(),
        });
    }
    let data = hex::decode(&memo.memo_data).map_err(|err| MemoError::InvalidHex {
        detail: err.to_string(),
    })?;
    serde_json::from_slice(&data).map_err(|err| MemoError::InvalidJson {
        detail: err.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::payload::{build_registrum_payload, verify_payload_hash};
    use serde_json::json;
    use shared_types::FixedClock;

    fn payload() -> WitnessPayload {
        build_registrum_payload(
            "attestation:auditor-1",
            3,
            "auditor-1",
            Some(json!({"stateCount": 2})),
            &FixedClock::at_epoch_millis(1_749_945_600_000),
        )
        .unwrap()
    }

    #[test]
    fn test_encode_decode_round_trip() {
        let original = payload();
        let memo = encode_memo(&original).unwrap();

        assert_eq!(memo.memo_type, hex::encode("attestia/witness/v1"));
        assert_eq!(memo.memo_format.as_deref(), Some(hex::encode("application/json").as_str()));

        let decoded = decode_memo(&memo).unwrap();
        assert_eq!(decoded, original);
        assert!(verify_payload_hash(&decoded));
    }

    #[test]
    fn test_tampered_decoded_summary_fails_hash_check() {
        let memo = encode_memo(&payload()).unwrap();
        let mut decoded = decode_memo(&memo).unwrap();
        decoded.summary["stateCount"] = json!(99);
        assert!(!verify_payload_hash(&decoded));
    }

    #[test]
    fn test_foreign_memo_type_rejected() {
        let mut memo = encode_memo(&payload()).unwrap();
        memo.memo_type = hex::encode("someone/else/v9");
        assert!(matches!(
            decode_memo(&memo).unwrap_err(),
            MemoError::ForeignMemoType { .. }
        ));
    }

    #[test]
    fn test_malformed_hex_and_json_rejected() {
        let mut memo = encode_memo(&payload()).unwrap();
        memo.memo_data = "zz-not-hex".to_string();
        assert!(matches!(
            decode_memo(&memo).unwrap_err(),
            MemoError::InvalidHex { .. }
        ));

        let mut memo = encode_memo(&payload()).unwrap();
        memo.memo_data = hex::encode(b"{not json");
        assert!(matches!(
            decode_memo(&memo).unwrap_err(),
            MemoError::InvalidJson { .. }
        ));
    }

    #[test]
    fn test_wire_field_names() {
        let memo = encode_memo(&payload()).unwrap();
        let value = serde_json::to_value(&memo).unwrap();
        assert!(value.get("MemoType").is_some());
        assert!(value.get("MemoData").is_some());
        assert!(value.get("MemoFormat").is_some());
    }
}
