//! Logging facilities for Horizon Picker.
//!
//! Horizon Picker uses the `tracing` crate for instrumentation. Nothing is
//! printed unless the host application installs a subscriber:
//!
//! ```ignore
//! tracing_subscriber::fmt()
//!     .with_env_filter("horizon_picker=trace")
//!     .init();
//! ```
//!
//! Every subsystem logs under one of the [`targets`], so a single directive
//! such as `horizon_picker::sync=trace` isolates the value synchronization
//! decisions from the rest of the output.

/// Span names used throughout Horizon Picker for tracing.
pub mod span_names {
    /// Render-tick queue flush span.
    pub const TICK: &str = "horizon_picker::tick";
    /// Widget mount span.
    pub const MOUNT: &str = "horizon_picker::mount";
    /// Widget unmount span.
    pub const UNMOUNT: &str = "horizon_picker::unmount";
}

/// Target names for log filtering.
///
/// Use these with `tracing` directives to filter logs by subsystem.
pub mod targets {
    /// Core framework target.
    pub const CORE: &str = "horizon_picker_core";
    /// Signal/slot system target.
    pub const SIGNAL: &str = "horizon_picker_core::signal";
    /// Render-tick queue target.
    pub const TICK: &str = "horizon_picker_core::tick";
    /// Model/widget value synchronization.
    pub const SYNC: &str = "horizon_picker::sync";
    /// Widget creation and teardown.
    pub const LIFECYCLE: &str = "horizon_picker::lifecycle";
    /// Option merging and hot-reload.
    pub const CONFIG: &str = "horizon_picker::config";
    /// Widget hook forwarding.
    pub const RELAY: &str = "horizon_picker::relay";
    /// Disabled attribute propagation.
    pub const DISABLED: &str = "horizon_picker::disabled";
}

/// A guard that keeps a named span entered until dropped.
///
/// ```ignore
/// let _span = OperationSpan::new(span_names::MOUNT);
/// // ... work attributed to the mount span ...
/// ```
pub struct OperationSpan {
    #[allow(dead_code)]
    span: tracing::span::EnteredSpan,
}

impl OperationSpan {
    /// Enter a span for `name`. The span closes when the guard is dropped.
    pub fn new(name: &'static str) -> Self {
        let span = tracing::debug_span!(target: "horizon_picker::op", "op", operation = name);
        Self {
            span: span.entered(),
        }
    }
}
