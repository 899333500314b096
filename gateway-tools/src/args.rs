//! String-keyed argument sets delivered by the host.

use std::collections::BTreeMap;

use serde_json::{Map, Value};

use crate::registry::{ToolError, ToolResult};

/// Arguments for one tool call.
///
/// Hosts deliver every argument as a string; structured payloads such as the
/// macro command list travel as JSON text.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ToolArgs {
    values: BTreeMap<String, String>,
}

impl ToolArgs {
    /// Creates an empty argument set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces an argument, returning the updated set.
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(name, value);
        self
    }

    /// Adds or replaces an argument.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.values.insert(name.into(), value.into());
    }

    /// Converts a JSON object into arguments.
    ///
    /// String values are taken verbatim, `null` entries are skipped, and any
    /// other value is re-encoded as compact JSON text so a host may pass the
    /// command array inline.
    #[must_use]
    pub fn from_json_object(object: &Map<String, Value>) -> Self {
        object
            .iter()
            .filter_map(|(name, value)| match value {
                Value::Null => None,
                Value::String(text) => Some((name.clone(), text.clone())),
                other => Some((name.clone(), other.to_string())),
            })
            .collect()
    }

    /// Returns the argument value if present.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }

    /// Returns a required argument.
    ///
    /// # Errors
    ///
    /// Returns [`ToolError::MissingArgument`] when the argument is absent.
    pub fn required(&self, name: &str) -> ToolResult<&str> {
        self.get(name).ok_or_else(|| ToolError::MissingArgument {
            name: name.to_owned(),
        })
    }

    /// Number of arguments supplied.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns `true` when no arguments were supplied.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for ToolArgs
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            values: iter
                .into_iter()
                .map(|(name, value)| (name.into(), value.into()))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn required_reports_missing_name() {
        let args = ToolArgs::new().with("thought", "hmm");
        assert_eq!(args.required("thought").unwrap(), "hmm");

        let err = args.required("commandsJson").expect_err("missing");
        assert!(matches!(err, ToolError::MissingArgument { name } if name == "commandsJson"));
    }

    #[test]
    fn json_object_values_become_strings() {
        let object = json!({
            "commandsJson": [{"action": "click"}],
            "name": "demo",
            "ignored": null,
        });
        let args = ToolArgs::from_json_object(object.as_object().unwrap());

        assert_eq!(args.len(), 2);
        assert_eq!(args.get("name"), Some("demo"));
        assert_eq!(args.get("commandsJson"), Some(r#"[{"action":"click"}]"#));
        assert_eq!(args.get("ignored"), None);
    }
}
