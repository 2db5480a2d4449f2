//! Horizon Picker - a two-way bound date picker.
//!
//! The picker adapts an imperative calendar widget to a declarative host:
//! the host owns the bound value, the widget options, the set of forwarded
//! widget events and a disabled flag, and the picker keeps the widget in step
//! with them while reporting edits back as events.
//!
//! - [`DatePicker`]: the adapter and its `on_*` change handlers
//! - [`config`]: options, hooks and the configuration preparer
//! - [`widget`]: the calendar widget seam and a headless implementation
//! - [`dom`]: the document seam and an in-memory element
//! - [`shell`]: dialog presets shared by the hosting application
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use horizon_picker::{DatePicker, MemoryCalendarFactory, MemoryElement, PickerEvent, PickerProps};
//! use horizon_picker_core::TickQueue;
//!
//! let ticks = Arc::new(TickQueue::new());
//! let factory = Arc::new(MemoryCalendarFactory::new());
//! let picker = DatePicker::new(PickerProps::default(), factory.clone(), ticks.clone());
//!
//! picker.channel().connect(|event| {
//!     if let PickerEvent::UpdateModelValue(value) = event {
//!         println!("model is now {value:?}");
//!     }
//! });
//!
//! let input = MemoryElement::input();
//! picker.render().attach(&input.as_element());
//! picker.mount(input.as_element());
//!
//! // The user picks a date and the popup closes
//! let calendar = factory.last().unwrap();
//! calendar.pick("2024-01-05");
//! calendar.close();
//! ticks.flush();
//! ```

pub mod config;
pub mod disabled;
pub mod dom;
pub mod error;
pub mod hooks;
pub mod lifecycle;
pub mod picker;
pub mod relay;
pub mod shell;
pub mod sync;
pub mod value;
pub mod widget;

pub use config::{Config, EffectiveConfig, ReloadPlan};
pub use disabled::DisabledStateWatcher;
pub use dom::{DomEvent, DomEventKind, Element, ElementRef, MemoryElement, RenderedInput};
pub use error::{PickerError, Result};
pub use hooks::{global_hook_defaults, hook, HookArgs, HookCallback, HookDefaults, HookEvent};
pub use lifecycle::{LifecycleController, WidgetHandle};
pub use picker::{DatePicker, PickerProps};
pub use relay::{declared_events, EventRelay, PickerEvent};
pub use shell::{AlertBody, AlertPreset};
pub use sync::{SyncOutcome, ValueSynchronizer};
pub use value::{nullify, ModelValue};
pub use widget::{CalendarWidget, MemoryCalendar, MemoryCalendarFactory, WidgetFactory};
