//! Core systems for Horizon Picker.
//!
//! This crate provides the reactive primitives the picker components are
//! built on:
//!
//! - **Signal/Slot System**: Type-safe outward notifications
//! - **Property System**: Change-detecting value cells
//! - **Tick Queue**: Work deferred until the host's next render tick
//! - **Logging**: `tracing` targets and span names
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use horizon_picker_core::{Property, Signal, TickQueue};
//!
//! let text = Arc::new(Property::new(String::new()));
//! let text_changed = Arc::new(Signal::<String>::new());
//! let ticks = TickQueue::new();
//!
//! text_changed.connect(|value| println!("now: {value}"));
//!
//! // Read the text once the current render pass has settled
//! let (text_c, changed_c) = (text.clone(), text_changed.clone());
//! ticks.post(move || changed_c.emit(text_c.get()));
//!
//! text.set("2024-01-05".to_string());
//! ticks.flush();
//! ```

pub mod logging;
pub mod property;
pub mod signal;
pub mod tick;

pub use logging::OperationSpan;
pub use property::Property;
pub use signal::{ConnectionId, Signal};
pub use tick::TickQueue;
