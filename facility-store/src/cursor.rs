//! Opaque continuation tokens for paged listings.
//!
//! A token is the base64 form of `{"skip":<offset>,"timestamp":<millis>}`.
//! The timestamp records when the token was issued and is never used to
//! reject a token. Offsets are not anchored to a snapshot, so records
//! inserted or removed between two page requests shift later pages.

use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Decoded contents of a continuation token
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageCursor {
    /// Number of records to skip
    pub skip: u64,
    /// Issuance time in milliseconds since the epoch
    #[serde(default)]
    pub timestamp: i64,
}

impl PageCursor {
    /// Creates a cursor for the given offset, stamped with the current time
    pub fn new(skip: u64) -> Self {
        Self {
            skip,
            timestamp: Utc::now().timestamp_millis(),
        }
    }

    pub fn issued_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp_millis(self.timestamp)
    }

    /// Serializes the cursor to an opaque, query-string safe token
    pub fn encode(&self) -> String {
        let json = serde_json::json!({
            "skip": self.skip,
            "timestamp": self.timestamp,
        });
        URL_SAFE_NO_PAD.encode(json.to_string())
    }

    /// Parses a token produced by [`PageCursor::encode`].
    ///
    /// Tokens in the standard base64 alphabet, padded or not, are accepted
    /// too. A `+` turned into a space by form decoding is restored. Anything
    /// that does not decode to a non-negative integer offset yields `None`,
    /// as does an offset the store cannot represent (above `i64::MAX`).
    pub fn decode(token: &str) -> Option<Self> {
        let normalized: String = token
            .trim()
            .trim_end_matches('=')
            .chars()
            .map(|c| match c {
                '+' | ' ' => '-',
                '/' => '_',
                other => other,
            })
            .collect();
        if normalized.is_empty() {
            return None;
        }

        let bytes = URL_SAFE_NO_PAD.decode(normalized).ok()?;
        let cursor: Self = serde_json::from_slice(&bytes).ok()?;
        i64::try_from(cursor.skip).is_ok().then_some(cursor)
    }
}

/// Encodes a record offset as a continuation token
pub fn encode_token(offset: u64) -> String {
    PageCursor::new(offset).encode()
}

/// Decodes a continuation token to a record offset, or `None` if malformed
pub fn decode_token(token: &str) -> Option<u64> {
    PageCursor::decode(token).map(|cursor| cursor.skip)
}
