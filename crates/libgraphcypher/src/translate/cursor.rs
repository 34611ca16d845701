//! Relay-style connection cursors: `base64("arrayconnection:<offset>")`.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;

const PREFIX: &str = "arrayconnection:";

pub fn offset_to_cursor(offset: u64) -> String {
    STANDARD.encode(format!("{PREFIX}{offset}"))
}

pub fn cursor_to_offset(cursor: &str) -> Option<u64> {
    let decoded = STANDARD.decode(cursor).ok()?;
    let decoded = String::from_utf8(decoded).ok()?;
    decoded.strip_prefix(PREFIX)?.parse().ok()
}
