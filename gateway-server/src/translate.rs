//! Decoding of loosely typed macro payloads into [`Command`] values.
//!
//! Absent fields take their defaults and `null` on an optional string counts
//! as absent. A present field of the wrong type rejects the whole batch, so a
//! partially translated macro never reaches the engine.

use gateway_primitives::Command;
use serde_json::{Map, Value};
use thiserror::Error;

/// Errors raised while translating a commands payload.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TranslateError {
    /// The payload is not a JSON array of objects.
    #[error("Invalid commands JSON format")]
    InvalidFormat,

    /// A command field holds a value of the wrong type.
    #[error("Invalid command at index {index}: `{field}` must be {expected}")]
    InvalidField {
        /// Zero-based position of the command in the array.
        index: usize,
        /// Wire name of the field.
        field: &'static str,
        /// Expected JSON type.
        expected: &'static str,
    },
}

/// Translates a JSON array of command objects, preserving order.
///
/// # Errors
///
/// Returns [`TranslateError::InvalidFormat`] when the text is not an array of
/// objects and [`TranslateError::InvalidField`] for the first mistyped field.
pub fn translate_commands(commands_json: &str) -> Result<Vec<Command>, TranslateError> {
    let Ok(Value::Array(elements)) = serde_json::from_str::<Value>(commands_json) else {
        return Err(TranslateError::InvalidFormat);
    };

    elements
        .iter()
        .enumerate()
        .map(|(index, element)| match element {
            Value::Object(fields) => FieldReader { index, fields }.command(),
            _ => Err(TranslateError::InvalidFormat),
        })
        .collect()
}

// Alternate spellings accepted for the same field.
const ALIASES: &[(&str, &str)] = &[
    ("window_id", "windowId"),
    ("window_name", "windowName"),
    ("scrollDirection", "scroll_direction"),
];

struct FieldReader<'a> {
    index: usize,
    fields: &'a Map<String, Value>,
}

impl FieldReader<'_> {
    fn command(&self) -> Result<Command, TranslateError> {
        Ok(Command::builder(self.string("action")?.unwrap_or_default())
            .position(self.integer("x", 0)?, self.integer("y", 0)?)
            .text(self.string("text")?)
            .key(self.string("key")?)
            .button(self.string("button")?)
            .clicks(self.integer("clicks", 1)?)
            .duration(self.integer("duration", 0)?)
            .scroll_direction(self.string("scrollDirection")?)
            .filename(self.string("filename")?)
            .window_id(self.integer("window_id", 0)?)
            .window_name(self.string("window_name")?)
            .modifiers(self.modifiers())
            .build())
    }

    fn lookup(&self, field: &str) -> Option<&Value> {
        self.fields.get(field).or_else(|| {
            ALIASES
                .iter()
                .find(|(primary, _)| *primary == field)
                .and_then(|(_, alias)| self.fields.get(*alias))
        })
    }

    fn integer(&self, field: &'static str, default: i32) -> Result<i32, TranslateError> {
        let Some(value) = self.lookup(field) else {
            return Ok(default);
        };
        value
            .as_i64()
            .and_then(|number| i32::try_from(number).ok())
            .ok_or_else(|| self.invalid(field, "a 32-bit integer"))
    }

    fn string(&self, field: &'static str) -> Result<Option<String>, TranslateError> {
        match self.lookup(field) {
            None | Some(Value::Null) => Ok(None),
            Some(Value::String(text)) => Ok(Some(text.clone())),
            Some(_) => Err(self.invalid(field, "a string")),
        }
    }

    // Loose by contract: non-string entries become "", a non-array is ignored.
    fn modifiers(&self) -> Vec<String> {
        match self.fields.get("modifiers") {
            Some(Value::Array(items)) => items
                .iter()
                .map(|item| item.as_str().unwrap_or_default().to_owned())
                .collect(),
            _ => Vec::new(),
        }
    }

    fn invalid(&self, field: &'static str, expected: &'static str) -> TranslateError {
        TranslateError::InvalidField {
            index: self.index,
            field,
            expected,
        }
    }
}
