//! Parses the `selectors` object of a descriptor into a [`Selector`] list.
use serde_json::{Map, Value};

use super::Selector;
use crate::error::ConfigError;

/// Build an ordered selector list from a JSON object.
///
/// Each key is a selector kind; entries keep document order. The returned
/// list is an implicit AND.
///
/// # Errors
///
/// Returns [`ConfigError`] for unknown kinds or values of the wrong shape.
pub fn build(object: &Map<String, Value>) -> Result<Vec<Selector>, ConfigError> {
    object
        .iter()
        .map(|(kind, value)| build_one(kind, value))
        .collect()
}

fn build_one(kind: &str, value: &Value) -> Result<Selector, ConfigError> {
    match kind {
        "host" => host_names(value).map(Selector::Host),
        "dir" => string_value(kind, value).map(Selector::Dir),
        "file" => string_value(kind, value).map(Selector::File),
        "cmd" => string_value(kind, value).map(Selector::Cmd),
        "and" => build(object_value(kind, value)?).map(Selector::And),
        "or" => build(object_value(kind, value)?).map(Selector::Or),
        "not" => {
            let object = object_value(kind, value)?;
            let mut children = build(object)?;
            match (children.pop(), children.is_empty()) {
                (Some(child), true) => Ok(Selector::Not(Box::new(child))),
                _ => Err(ConfigError::NotArity {
                    count: object.len(),
                }),
            }
        }
        other => Err(ConfigError::UnknownSelector {
            kind: other.to_string(),
        }),
    }
}

fn host_names(value: &Value) -> Result<Vec<String>, ConfigError> {
    let invalid = || ConfigError::InvalidSelector {
        kind: "host".to_string(),
        expected: "a host name or a list of host names",
    };
    match value {
        Value::String(name) => Ok(vec![name.clone()]),
        Value::Array(items) => items
            .iter()
            .map(|item| item.as_str().map(ToString::to_string).ok_or_else(invalid))
            .collect(),
        _ => Err(invalid()),
    }
}

fn string_value(kind: &str, value: &Value) -> Result<String, ConfigError> {
    value
        .as_str()
        .map(ToString::to_string)
        .ok_or_else(|| ConfigError::InvalidSelector {
            kind: kind.to_string(),
            expected: "a string",
        })
}

fn object_value<'v>(kind: &str, value: &'v Value) -> Result<&'v Map<String, Value>, ConfigError> {
    value.as_object().ok_or_else(|| ConfigError::InvalidSelector {
        kind: kind.to_string(),
        expected: "an object of selectors",
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use serde_json::json;

    fn parse(value: &Value) -> Result<Vec<Selector>, ConfigError> {
        build(value.as_object().unwrap())
    }

    #[test]
    fn keeps_document_order() {
        let selectors = parse(&json!({"file": "~/a", "host": "box", "dir": "~/b"})).unwrap();
        assert_eq!(
            selectors,
            vec![
                Selector::File("~/a".to_string()),
                Selector::Host(vec!["box".to_string()]),
                Selector::Dir("~/b".to_string()),
            ]
        );
    }

    #[test]
    fn host_accepts_list() {
        let selectors = parse(&json!({"host": ["a", "b"]})).unwrap();
        assert_eq!(
            selectors,
            vec![Selector::Host(vec!["a".to_string(), "b".to_string()])]
        );
    }

    #[test]
    fn host_rejects_non_string_items() {
        let err = parse(&json!({"host": ["a", 1]})).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidSelector { ref kind, .. } if kind == "host"));
    }

    #[test]
    fn nested_and_or() {
        let selectors =
            parse(&json!({"or": {"host": "a", "and": {"dir": "/x", "file": "/y"}}})).unwrap();
        assert_eq!(
            selectors,
            vec![Selector::Or(vec![
                Selector::Host(vec!["a".to_string()]),
                Selector::And(vec![
                    Selector::Dir("/x".to_string()),
                    Selector::File("/y".to_string()),
                ]),
            ])]
        );
    }

    #[test]
    fn and_requires_object() {
        let err = parse(&json!({"and": ["host"]})).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidSelector { ref kind, .. } if kind == "and"));
    }

    #[test]
    fn not_wraps_single_child() {
        let selectors = parse(&json!({"not": {"cmd": "false"}})).unwrap();
        assert_eq!(
            selectors,
            vec![Selector::Not(Box::new(Selector::Cmd("false".to_string())))]
        );
    }

    #[test]
    fn not_with_two_children_is_rejected() {
        let err = parse(&json!({"not": {"host": "a", "dir": "/b"}})).unwrap_err();
        assert!(matches!(err, ConfigError::NotArity { count: 2 }));
    }

    #[test]
    fn not_with_no_children_is_rejected() {
        let err = parse(&json!({"not": {}})).unwrap_err();
        assert!(matches!(err, ConfigError::NotArity { count: 0 }));
    }

    #[test]
    fn unknown_kind_is_named() {
        let err = parse(&json!({"user": "bob"})).unwrap_err();
        assert_eq!(err.to_string(), "unknown selector: user");
    }

    #[test]
    fn unknown_kind_inside_composite_is_rejected() {
        let err = parse(&json!({"or": {"user": "bob"}})).unwrap_err();
        assert!(matches!(err, ConfigError::UnknownSelector { .. }));
    }

    #[test]
    fn dir_requires_string() {
        let err = parse(&json!({"dir": 3})).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidSelector { ref kind, .. } if kind == "dir"));
    }

    #[test]
    fn empty_object_is_empty_list() {
        assert!(parse(&json!({})).unwrap().is_empty());
    }
}
