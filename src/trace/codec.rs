//! Trace identity <-> transport header codec.
//!
//! # Headers
//! - `X-Curr-Tid`: this hop, always written
//! - `X-Entry-Tid`: chain root, always written
//! - `X-Prev-Tid`: parent hop, written only when non-empty
//!
//! Header names compare case-insensitively; `HeaderMap` stores them lowercase.

use axum::http::{HeaderMap, HeaderName, HeaderValue};

use crate::trace::identity::TraceIdentity;

/// Canonical spelling of the current hop header.
pub const X_CURR_TID: &str = "X-Curr-Tid";
/// Canonical spelling of the previous hop header.
pub const X_PREV_TID: &str = "X-Prev-Tid";
/// Canonical spelling of the entry hop header.
pub const X_ENTRY_TID: &str = "X-Entry-Tid";

/// `X-Curr-Tid` as a `HeaderMap` key.
pub const CURR_TID: HeaderName = HeaderName::from_static("x-curr-tid");
/// `X-Prev-Tid` as a `HeaderMap` key.
pub const PREV_TID: HeaderName = HeaderName::from_static("x-prev-tid");
/// `X-Entry-Tid` as a `HeaderMap` key.
pub const ENTRY_TID: HeaderName = HeaderName::from_static("x-entry-tid");

/// Write `identity` onto `headers`, replacing any previous trace headers it sets.
///
/// The caller is responsible for passing a valid identity. An empty
/// `entry_id` falls back to `current_id`, so the written headers always parse
/// back into a valid identity when `current_id` is present.
pub fn write_headers(identity: &TraceIdentity, headers: &mut HeaderMap) {
    if !identity.previous_id.is_empty() {
        set(headers, PREV_TID, &identity.previous_id);
    }

    if identity.entry_id.is_empty() {
        set(headers, ENTRY_TID, &identity.current_id);
    } else {
        set(headers, ENTRY_TID, &identity.entry_id);
    }

    set(headers, CURR_TID, &identity.current_id);
}

/// Read a trace identity from `headers`. Missing headers become empty ids.
///
/// Values are taken verbatim, including non-ASCII UTF-8; only bytes that are
/// not UTF-8 read as empty.
///
/// Never fails; check [`TraceIdentity::is_valid`] before using the result.
pub fn read_headers(headers: &HeaderMap) -> TraceIdentity {
    TraceIdentity {
        current_id: get(headers, &CURR_TID),
        previous_id: get(headers, &PREV_TID),
        entry_id: get(headers, &ENTRY_TID),
    }
}

/// Drop every trace header from `headers`.
pub fn strip_headers(headers: &mut HeaderMap) {
    headers.remove(&CURR_TID);
    headers.remove(&PREV_TID);
    headers.remove(&ENTRY_TID);
}

fn set(headers: &mut HeaderMap, name: HeaderName, value: &str) {
    match HeaderValue::from_str(value) {
        Ok(v) => {
            headers.insert(name, v);
        }
        Err(_) => {
            tracing::warn!(header = %name, value = %value, "Trace id is not a valid header value, skipping");
        }
    }
}

fn get(headers: &HeaderMap, name: &HeaderName) -> String {
    headers
        .get(name)
        .and_then(|v| std::str::from_utf8(v.as_bytes()).ok())
        .unwrap_or_default()
        .to_string()
}
