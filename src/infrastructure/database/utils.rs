//! Small row-mapping helpers shared by the per-entity repositories.

use chrono::{DateTime, Utc};

use super::DatabaseError;

/// Parse an RFC3339 timestamp as stored by every repository's `INSERT`.
pub fn parse_datetime(s: &str) -> Result<DateTime<Utc>, DatabaseError> {
    Ok(DateTime::parse_from_rfc3339(s)?.with_timezone(&Utc))
}

/// Serialize an ordered list of task ids as the JSON array string the
/// `blocked_by` TEXT column stores.
pub fn encode_blocked_by(ids: &[String]) -> String {
    serde_json::to_string(ids).unwrap_or_else(|_| "[]".to_string())
}

/// Decode a `blocked_by` TEXT column. Per §9, malformed payloads are
/// tolerated silently as "no blockers" rather than raising — this keeps the
/// deadlock detector total.
pub fn decode_blocked_by(raw: Option<&str>) -> Vec<String> {
    raw.and_then(|s| serde_json::from_str::<Vec<String>>(s).ok())
        .unwrap_or_default()
}
