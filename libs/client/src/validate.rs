//! Input validation applied before any network traffic
//!
//! Every facade validates its inputs with these helpers and fails with
//! `VexdbError::Validation` without touching the transport.

use crate::error::{VexdbError, VexdbResult};

const MAX_COLLECTION_NAME_LEN: usize = 255;
const MAX_BACKUP_ID_LEN: usize = 128;

/// Collection names start with an uppercase letter followed by
/// alphanumerics or underscores
pub(crate) fn collection_name(name: &str) -> VexdbResult<()> {
    let mut chars = name.chars();
    let valid = match chars.next() {
        Some(first) if first.is_ascii_uppercase() => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        _ => false,
    };
    if !valid || name.len() > MAX_COLLECTION_NAME_LEN {
        return Err(VexdbError::Validation(format!(
            "invalid collection name '{}': expected an uppercase letter followed by alphanumerics or underscores",
            name
        )));
    }
    Ok(())
}

pub(crate) fn non_empty(value: &str, what: &str) -> VexdbResult<()> {
    if value.trim().is_empty() {
        return Err(VexdbError::Validation(format!("{} must not be empty", what)));
    }
    Ok(())
}

/// Backup identifiers are lowercase alphanumerics, dashes and underscores
pub(crate) fn backup_id(id: &str) -> VexdbResult<()> {
    let valid = !id.is_empty()
        && id.len() <= MAX_BACKUP_ID_LEN
        && id
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' || c == '_');
    if !valid {
        return Err(VexdbError::Validation(format!(
            "invalid backup id '{}': expected lowercase alphanumerics, dashes or underscores",
            id
        )));
    }
    Ok(())
}

/// Object properties must serialize as a JSON object (or be omitted as Null)
pub(crate) fn object_properties(properties: &serde_json::Value) -> VexdbResult<()> {
    match properties {
        serde_json::Value::Object(_) | serde_json::Value::Null => Ok(()),
        other => Err(VexdbError::Validation(format!(
            "object properties must be a JSON object, got {}",
            value_kind(other)
        ))),
    }
}

fn value_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "an array",
        serde_json::Value::Object(_) => "an object",
    }
}
