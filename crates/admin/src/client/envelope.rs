//! Response envelopes.
//!
//! The record service is inconsistent about wrapping: the member list comes
//! back as `{ "members": [...] }` while the user list is a bare array, and
//! update responses may or may not nest the record under its singular name.
//! Both shapes are accepted for every collection.

use rollcall_core::Record;
use serde_json::Value;

use crate::error::SyncError;

fn malformed(what: &str, detail: impl std::fmt::Display) -> SyncError {
    SyncError::ServerRejection {
        status: 200,
        message: format!("Malformed {what} response: {detail}"),
    }
}

/// Decode a list response, wrapped or bare.
///
/// Either every record decodes or the whole response is rejected.
///
/// # Errors
///
/// Returns `ServerRejection` if the body is neither an array nor an object
/// holding one under [`Record::LIST_FIELD`], or if any record fails to decode.
pub fn decode_list<R: Record>(body: Value) -> Result<Vec<R>, SyncError> {
    let items = match body {
        Value::Array(items) => Value::Array(items),
        Value::Object(mut map) => map.remove(R::LIST_FIELD).ok_or_else(|| {
            malformed(
                "list",
                format_args!("missing \"{}\" field", R::LIST_FIELD),
            )
        })?,
        other => return Err(malformed("list", format_args!("unexpected {other}"))),
    };

    serde_json::from_value(items).map_err(|e| malformed("list", e))
}

/// Decode an update response into the values the service committed.
///
/// # Errors
///
/// Returns `ServerRejection` if the body is not an object, fails to decode,
/// or names a different record than `id`.
pub fn decode_item<R: Record>(id: &R::Id, body: Value) -> Result<R::Patch, SyncError> {
    let Value::Object(mut map) = body else {
        return Err(malformed("update", "expected an object"));
    };

    let record = match map.remove(R::ITEM_FIELD) {
        Some(Value::Object(inner)) => inner,
        Some(other) => {
            map.insert(R::ITEM_FIELD.to_string(), other);
            map
        }
        None => map,
    };

    if let Some(returned) = record.get("_id").and_then(Value::as_str)
        && returned != id.as_ref()
    {
        return Err(malformed(
            "update",
            format_args!("returned record {returned} instead of {id}"),
        ));
    }

    serde_json::from_value(Value::Object(record)).map_err(|e| malformed("update", e))
}
