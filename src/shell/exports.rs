//! Environment variable aggregation across active profiles.
use std::collections::HashMap;

use crate::config::env::EnvValue;
use crate::config::profiles::Profile;
use crate::error::{ConfigError, MyenvError};
use crate::platform::{self, Environment, PATH_LIST_SEPARATOR};

/// Merge the `env` sections of `active` into `(NAME, value)` pairs.
///
/// Scalars overwrite earlier values. Path lists are expanded, resolved
/// against their profile directory and appended; the ambient value of the
/// variable, if any, is prepended once. Pairs are ordered by first
/// occurrence.
///
/// # Errors
///
/// Returns [`ConfigError::EnvRepresentation`] when profiles disagree on
/// whether a variable is a scalar or a list, and propagates malformed `env`
/// sections. No partial result is returned.
pub fn build_exports(
    active: &[&Profile],
    env: &dyn Environment,
) -> Result<Vec<(String, String)>, MyenvError> {
    let mut merged: Vec<(String, EnvValue)> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for profile in active {
        for (name, value) in profile.env()? {
            let value = match value {
                EnvValue::Scalar(_) => value,
                EnvValue::PathList(fragments) => EnvValue::PathList(
                    fragments
                        .iter()
                        .map(|f| {
                            platform::resolve_against(f, &profile.path, env)
                                .map(|p| p.to_string_lossy().into_owned())
                        })
                        .collect::<Result<_, _>>()?,
                ),
            };

            let Some(slot) = index.get(&name).and_then(|&i| merged.get_mut(i)) else {
                index.insert(name.clone(), merged.len());
                merged.push((name, value));
                continue;
            };

            match (&mut slot.1, value) {
                (EnvValue::Scalar(existing), EnvValue::Scalar(new)) => *existing = new,
                (EnvValue::PathList(existing), EnvValue::PathList(new)) => existing.extend(new),
                (existing, new) => {
                    return Err(ConfigError::EnvRepresentation {
                        name,
                        expected: existing.kind(),
                        found: new.kind(),
                    }
                    .in_profile(&profile.name)
                    .into());
                }
            }
        }
    }

    Ok(merged
        .into_iter()
        .map(|(name, value)| {
            let value = match value {
                EnvValue::Scalar(s) => s,
                EnvValue::PathList(mut parts) => {
                    if let Some(ambient) = env.var(&name) {
                        parts.insert(0, ambient);
                    }
                    parts.join(&PATH_LIST_SEPARATOR.to_string())
                }
            };
            (name, value)
        })
        .collect())
}

/// Render merged pairs as `export NAME=value` lines.
#[must_use]
pub fn render_exports(exports: &[(String, String)]) -> Vec<String> {
    exports
        .iter()
        .map(|(name, value)| format!("export {name}={value}"))
        .collect()
}
