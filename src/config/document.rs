//! Typed accessors over the loosely-typed descriptor document.
//!
//! Absent fields read as empty; present fields of the wrong JSON type are a
//! [`ConfigError::InvalidField`].
use serde_json::{Map, Value};

use crate::error::ConfigError;

/// Descriptor field holding the selector tree.
pub const SELECTORS: &str = "selectors";
/// Descriptor field mapping symlink targets to sources.
pub const SYMLINKS: &str = "symlinks";
/// Descriptor field mapping copy targets to sources.
pub const COPIES: &str = "copies";
/// Descriptor field holding environment variables.
pub const ENV: &str = "env";
/// Descriptor field listing login scripts.
pub const ONLOGIN: &str = "onlogin";

/// Read an object-valued field, returning `None` when it is absent.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidField`] if the field is not an object.
pub fn object<'d>(
    document: &'d Map<String, Value>,
    field: &str,
) -> Result<Option<&'d Map<String, Value>>, ConfigError> {
    match document.get(field) {
        None => Ok(None),
        Some(Value::Object(map)) => Ok(Some(map)),
        Some(_) => Err(invalid(field, "an object")),
    }
}

/// Read a `{ "key": "value" }` mapping in document order.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidField`] if the field is not an object or
/// any value is not a string.
pub fn string_map(
    document: &Map<String, Value>,
    field: &str,
) -> Result<Vec<(String, String)>, ConfigError> {
    let expected = "an object mapping paths to strings";
    let Some(map) = object(document, field).map_err(|_| invalid(field, expected))? else {
        return Ok(Vec::new());
    };
    map.iter()
        .map(|(key, value)| {
            value
                .as_str()
                .map(|v| (key.clone(), v.to_string()))
                .ok_or_else(|| invalid(field, expected))
        })
        .collect()
}

/// Read a list of strings.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidField`] if the field is not an array of
/// strings.
pub fn string_list(document: &Map<String, Value>, field: &str) -> Result<Vec<String>, ConfigError> {
    let expected = "a list of strings";
    match document.get(field) {
        None => Ok(Vec::new()),
        Some(Value::Array(items)) => items
            .iter()
            .map(|item| {
                item.as_str()
                    .map(ToString::to_string)
                    .ok_or_else(|| invalid(field, expected))
            })
            .collect(),
        Some(_) => Err(invalid(field, expected)),
    }
}

fn invalid(field: &str, expected: &'static str) -> ConfigError {
    ConfigError::InvalidField {
        field: field.to_string(),
        expected,
    }
}
