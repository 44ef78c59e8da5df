//! The `env` section of a descriptor.
use serde_json::{Map, Value};

use super::document;
use crate::error::ConfigError;

/// Value of one environment variable as declared by a profile.
///
/// The representation is fixed when the descriptor is parsed: a JSON string
/// is a scalar, a JSON array of strings is a path list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnvValue {
    /// Single value; a later profile overwrites an earlier one.
    Scalar(String),
    /// Ordered path fragments; later profiles append.
    PathList(Vec<String>),
}

impl EnvValue {
    /// Human-readable name of the representation.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Scalar(_) => "string",
            Self::PathList(_) => "list",
        }
    }
}

/// Parse the `env` field of `doc` in document order.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidField`] if `env` is not an object and
/// [`ConfigError::InvalidEnvValue`] for values that are neither a string nor
/// a list of strings.
pub fn parse(doc: &Map<String, Value>) -> Result<Vec<(String, EnvValue)>, ConfigError> {
    let Some(env) = document::object(doc, document::ENV)? else {
        return Ok(Vec::new());
    };
    env.iter()
        .map(|(name, value)| parse_value(name, value).map(|v| (name.clone(), v)))
        .collect()
}

fn parse_value(name: &str, value: &Value) -> Result<EnvValue, ConfigError> {
    let invalid = || ConfigError::InvalidEnvValue {
        name: name.to_string(),
    };
    match value {
        Value::String(s) => Ok(EnvValue::Scalar(s.clone())),
        Value::Array(items) => items
            .iter()
            .map(|item| item.as_str().map(ToString::to_string).ok_or_else(invalid))
            .collect::<Result<_, _>>()
            .map(EnvValue::PathList),
        _ => Err(invalid()),
    }
}
