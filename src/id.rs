//! Time-sortable work item identifiers and timestamps.

use chrono::{SecondsFormat, Utc};
use uuid::Uuid;

/// Crockford base32 alphabet (no I, L, O, U).
pub const CROCKFORD_ALPHABET: &[u8; 32] = b"0123456789ABCDEFGHJKMNPQRSTVWXYZ";

/// Encoded length of a 128-bit value.
const ID_LEN: usize = 26;

/// New identifier: a UUIDv7 rendered as 26 Crockford base32 characters.
/// Identifiers created later sort after earlier ones.
pub fn generate_id() -> String {
    encode_base32(Uuid::now_v7().as_u128())
}

fn encode_base32(mut value: u128) -> String {
    let mut out = [b'0'; ID_LEN];
    for slot in out.iter_mut().rev() {
        *slot = CROCKFORD_ALPHABET[(value % 32) as usize];
        value /= 32;
    }
    out.iter().map(|&b| b as char).collect()
}

/// Current UTC time as RFC 3339 with second precision, e.g. `2024-05-01T12:00:00Z`.
pub fn now_rfc3339() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true)
}
