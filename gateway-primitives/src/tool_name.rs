//! Externally visible tool names of the form `<namespace>:<verb>`.

use std::fmt::{self, Display, Formatter};

use crate::error::{Error, Result};

const MAX_NAME_LEN: usize = 64;

/// Validated tool name.
#[derive(Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct ToolName(String);

impl ToolName {
    /// Parses and validates a fully qualified tool name.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidToolName`] if the name is empty, too long, lacks a
    /// namespace or verb, or contains unsupported characters.
    pub fn new(name: impl Into<String>) -> Result<Self> {
        let name = name.into();
        validate_name(&name)?;
        Ok(Self(name))
    }

    /// Returns the full name as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for ToolName {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

fn validate_name(name: &str) -> Result<()> {
    let reject = |reason: &str| Error::InvalidToolName {
        name: name.into(),
        reason: reason.into(),
    };

    if name.is_empty() {
        return Err(reject("name cannot be empty"));
    }

    if name.len() > MAX_NAME_LEN {
        return Err(Error::InvalidToolName {
            name: name.into(),
            reason: format!("name length must be <= {MAX_NAME_LEN}"),
        });
    }

    let Some((namespace, verb)) = name.split_once(':') else {
        return Err(reject("name must have the form `<namespace>:<verb>`"));
    };

    if namespace.is_empty() || verb.is_empty() {
        return Err(reject("namespace and verb cannot be empty"));
    }

    let valid_segment = |segment: &str| {
        segment
            .chars()
            .all(|c| matches!(c, 'a'..='z' | '0'..='9' | '-' | '_'))
    };

    if !valid_segment(namespace) || !valid_segment(verb) {
        return Err(reject(
            "segments must contain lowercase alphanumeric, dash, or underscore",
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_namespaced_names() {
        let name = ToolName::new("computer-use:run_macro").expect("valid");
        assert_eq!(name.as_str(), "computer-use:run_macro");
        assert_eq!(name.to_string(), "computer-use:run_macro");
    }

    #[test]
    fn rejects_malformed_names() {
        for bad in ["", "run_macro", ":think", "computer-use:", "Computer:think", "a:b:c"] {
            let err = ToolName::new(bad).expect_err(bad);
            assert!(matches!(err, Error::InvalidToolName { .. }), "{bad}");
        }
    }

    #[test]
    fn rejects_overlong_names() {
        let long = format!("computer-use:{}", "x".repeat(MAX_NAME_LEN));
        assert!(ToolName::new(long).is_err());
    }
}
