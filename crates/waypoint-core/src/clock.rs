//! Timestamps used by the manifest.
//!
//! `created` values are compared as strings when picking the latest output, so
//! the format must sort lexicographically in time order.

use chrono::Local;

const ISO_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.6f";
const SESSION_FORMAT: &str = "%Y%m%d_%H%M%S";

/// Local time as ISO-8601 with microseconds.
pub fn now_iso() -> String {
    Local::now().format(ISO_FORMAT).to_string()
}

/// Session id derived from the wall clock (`YYYYMMDD_HHMMSS`).
pub fn session_id() -> String {
    Local::now().format(SESSION_FORMAT).to_string()
}
