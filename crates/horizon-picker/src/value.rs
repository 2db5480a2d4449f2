//! The bound model value.
//!
//! [`ModelValue`] is the host-owned side of the two-way binding. The adapter
//! never interprets it beyond its *textual form*, which is what gets compared
//! against the text shown in the input field.

use chrono::{DateTime, NaiveTime, Utc};
use serde_json::Value;

use horizon_picker_core::logging::targets;

use crate::error::{json_kind, PickerError, Result};

/// Separator the widget uses when it displays several selected dates.
pub const LIST_SEPARATOR: &str = ", ";

/// A value bound to the picker.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum ModelValue {
    /// Nothing selected.
    #[default]
    Null,
    /// A date-time instant.
    DateTime(DateTime<Utc>),
    /// A preformatted date string.
    Text(String),
    /// Several preformatted date strings (multiple or range selection).
    List(Vec<String>),
    /// A numeric timestamp or any other number the widget accepts.
    Number(f64),
}

impl ModelValue {
    /// Whether the value selects nothing: null, an empty string or an empty list.
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Null => true,
            Self::Text(text) => text.is_empty(),
            Self::List(items) => items.is_empty(),
            Self::DateTime(_) | Self::Number(_) => false,
        }
    }

    /// The text an input field shows for this value, or `None` for an empty field.
    ///
    /// Instants at midnight render as `YYYY-MM-DD`, others as `YYYY-MM-DD HH:MM`,
    /// matching the widget's default formats with and without a time part.
    pub fn to_text(&self) -> Option<String> {
        match self {
            Self::Null => None,
            Self::DateTime(instant) => {
                let format = if instant.time() == NaiveTime::MIN {
                    "%Y-%m-%d"
                } else {
                    "%Y-%m-%d %H:%M"
                };
                Some(instant.format(format).to_string())
            }
            Self::Text(text) => nullify(text),
            Self::List(items) => nullify(&items.join(LIST_SEPARATOR)),
            Self::Number(number) => Some(number.to_string()),
        }
    }

    /// Convert to JSON for use as a widget option.
    pub fn to_json(&self) -> Value {
        match self {
            Self::Null => Value::Null,
            Self::DateTime(instant) => Value::String(instant.to_rfc3339()),
            Self::Text(text) => Value::String(text.clone()),
            Self::List(items) => Value::Array(items.iter().cloned().map(Value::String).collect()),
            Self::Number(number) => serde_json::Number::from_f64(*number)
                .map(Value::Number)
                .unwrap_or(Value::Null),
        }
    }

    /// Convert a host-supplied JSON value, rejecting shapes the picker cannot bind.
    ///
    /// Accepted: null, strings, numbers, and arrays of strings or numbers.
    pub fn from_json(value: &Value) -> Result<Self> {
        match value {
            Value::Null => Ok(Self::Null),
            Value::String(text) => Ok(Self::Text(text.clone())),
            Value::Number(number) => number
                .as_f64()
                .map(Self::Number)
                .ok_or(PickerError::InvalidModelValue { found: "number" }),
            Value::Array(items) => items
                .iter()
                .map(|item| match item {
                    Value::String(text) => Ok(text.clone()),
                    Value::Number(number) => Ok(number.to_string()),
                    other => Err(PickerError::InvalidModelValue {
                        found: json_kind(other),
                    }),
                })
                .collect::<Result<Vec<_>>>()
                .map(Self::List),
            other => Err(PickerError::InvalidModelValue {
                found: json_kind(other),
            }),
        }
    }

    /// Like [`from_json`](Self::from_json), but never fails.
    ///
    /// Rejected shapes are logged and bound by their JSON text, so a bad value
    /// still renders.
    pub fn from_json_lossy(value: &Value) -> Self {
        match Self::from_json(value) {
            Ok(model) => model,
            Err(err) => {
                tracing::warn!(target: targets::SYNC, %err, "binding unvalidated model value");
                match value {
                    Value::Array(items) => Self::List(
                        items
                            .iter()
                            .map(|item| match item {
                                Value::String(text) => text.clone(),
                                other => other.to_string(),
                            })
                            .collect(),
                    ),
                    other => Self::Text(other.to_string()),
                }
            }
        }
    }
}

/// Keep `text` only when it is non-empty.
pub fn nullify(text: &str) -> Option<String> {
    if text.is_empty() {
        None
    } else {
        Some(text.to_owned())
    }
}

impl From<&str> for ModelValue {
    fn from(text: &str) -> Self {
        Self::Text(text.to_owned())
    }
}

impl From<String> for ModelValue {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl From<Option<String>> for ModelValue {
    fn from(text: Option<String>) -> Self {
        text.map_or(Self::Null, Self::Text)
    }
}

impl From<Vec<String>> for ModelValue {
    fn from(items: Vec<String>) -> Self {
        Self::List(items)
    }
}

impl From<f64> for ModelValue {
    fn from(number: f64) -> Self {
        Self::Number(number)
    }
}

impl From<DateTime<Utc>> for ModelValue {
    fn from(instant: DateTime<Utc>) -> Self {
        Self::DateTime(instant)
    }
}
