//! Error types for the picker adapter.
//!
//! None of these reach the host through the component handlers: the adapter
//! synchronizes on a best-effort basis, so every failure below is logged and
//! the operation becomes a no-op. They surface directly only from the
//! option loaders and the value validator.

/// Result type alias for picker operations.
pub type Result<T> = std::result::Result<T, PickerError>;

/// Errors that can occur in the picker adapter.
#[derive(Debug, thiserror::Error)]
pub enum PickerError {
    /// The model value is not one of the accepted shapes.
    #[error("invalid model value: expected null, date-time, string, array or number, got {found}")]
    InvalidModelValue { found: &'static str },

    /// An operation needed the calendar widget but none is mounted.
    #[error("no calendar widget is mounted")]
    WidgetMissing,

    /// An element was read after it left the document.
    #[error("element is no longer attached to the document")]
    DetachedElement,

    /// A hook name that is not part of the widget's event set.
    #[error("unknown widget event '{name}'")]
    UnknownEvent { name: String },

    /// Options were parsed but are not a key/value table.
    #[error("picker options must be a table, got {found}")]
    OptionsNotTable { found: &'static str },

    /// JSON option parsing failed.
    #[error("failed to parse picker options as JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML option parsing failed.
    #[error("failed to parse picker options as TOML: {0}")]
    Toml(#[from] toml::de::Error),
}

impl PickerError {
    /// Create an unknown event error.
    pub fn unknown_event(name: impl Into<String>) -> Self {
        Self::UnknownEvent { name: name.into() }
    }
}

/// Name of a JSON value's shape, for diagnostics.
pub(crate) fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "boolean",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}
