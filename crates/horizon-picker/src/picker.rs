//! The date picker adapter.
//!
//! [`DatePicker`] wraps an imperative calendar widget behind a two-way
//! binding. The host owns four inputs ([`PickerProps`]), renders the single
//! text input the picker describes, and forwards its lifecycle and input
//! changes through the `on_*` handlers. Everything the picker reports comes
//! back on one [`Signal`] of [`PickerEvent`]s.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use horizon_picker::{DatePicker, MemoryCalendarFactory, MemoryElement, PickerProps};
//! use horizon_picker_core::TickQueue;
//!
//! let ticks = Arc::new(TickQueue::new());
//! let picker = DatePicker::new(
//!     PickerProps::default(),
//!     Arc::new(MemoryCalendarFactory::new()),
//!     ticks.clone(),
//! );
//! picker.channel().connect(|event| println!("{}", event.name()));
//!
//! let input = MemoryElement::input();
//! picker.render().attach(&input.as_element());
//! picker.mount(input.as_element());
//!
//! picker.on_model_value_changed("2024-01-05");
//! ticks.flush();
//! picker.unmount();
//! ```

use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;
use serde_json::Value;

use horizon_picker_core::logging::targets;
use horizon_picker_core::{Property, Signal, TickQueue};

use crate::config::{plan_reload, prepare, Config};
use crate::disabled::DisabledStateWatcher;
use crate::dom::{ElementRef, RenderedInput};
use crate::error::{PickerError, Result};
use crate::hooks::{global_hook_defaults, HookDefaults, HookEvent};
use crate::lifecycle::LifecycleController;
use crate::relay::{EventRelay, PickerEvent};
use crate::sync::{SyncOutcome, ValueSynchronizer};
use crate::value::ModelValue;
use crate::widget::{CalendarWidget, WidgetFactory};

/// The picker's host-owned inputs.
#[derive(Debug, Clone, PartialEq)]
pub struct PickerProps {
    /// The bound value.
    pub model_value: ModelValue,
    /// Widget options and hooks.
    pub config: Config,
    /// Widget events forwarded on the picker's channel.
    pub events: Vec<HookEvent>,
    /// Whether the input is disabled.
    pub disabled: bool,
}

impl Default for PickerProps {
    fn default() -> Self {
        Self {
            model_value: ModelValue::Null,
            config: Config::picker_default(),
            events: HookEvent::EMITTED_BY_DEFAULT.to_vec(),
            disabled: false,
        }
    }
}

/// A two-way bound date picker.
pub struct DatePicker {
    model_value: Property<ModelValue>,
    config: RwLock<Config>,
    events: Vec<HookEvent>,
    disabled: DisabledStateWatcher,
    bound: RwLock<Option<ElementRef>>,
    channel: Arc<Signal<PickerEvent>>,
    hook_defaults: Arc<HookDefaults>,
    relay: EventRelay,
    sync: ValueSynchronizer,
    lifecycle: LifecycleController,
}

impl DatePicker {
    /// Create a picker.
    ///
    /// `factory` builds the calendar widget on mount; `ticks` is the host's
    /// render-tick queue, flushed after each render pass.
    pub fn new(props: PickerProps, factory: Arc<dyn WidgetFactory>, ticks: Arc<TickQueue>) -> Self {
        let channel = Arc::new(Signal::new());
        let relay = EventRelay::new(channel.clone());
        Self {
            model_value: Property::new(props.model_value),
            config: RwLock::new(props.config),
            events: props.events,
            disabled: DisabledStateWatcher::new(props.disabled),
            bound: RwLock::new(None),
            channel,
            hook_defaults: global_hook_defaults(),
            sync: ValueSynchronizer::new(relay.clone(), ticks),
            relay,
            lifecycle: LifecycleController::new(factory),
        }
    }

    /// Use `defaults` instead of the process-wide hook registry.
    pub fn with_hook_defaults(mut self, defaults: Arc<HookDefaults>) -> Self {
        self.hook_defaults = defaults;
        self
    }

    /// The outward event channel.
    pub fn channel(&self) -> &Arc<Signal<PickerEvent>> {
        &self.channel
    }

    /// The widget events this picker forwards.
    pub fn subscribed_events(&self) -> &[HookEvent] {
        &self.events
    }

    /// Describe the input to render.
    pub fn render(&self) -> RenderedInput {
        RenderedInput {
            input_type: "text",
            disabled: self.disabled.get(),
            on_input: self.sync.input_listener(),
        }
    }

    /// Bind the rendered `element` and create the widget.
    ///
    /// Returns `false` when a widget already exists or could not be created;
    /// the element bound by an earlier mount then stays bound.
    #[tracing::instrument(skip_all, target = "horizon_picker::lifecycle", level = "debug")]
    pub fn mount(&self, element: ElementRef) -> bool {
        let config = self.config.read().clone();
        let model = self.model_value.get();
        let build = || {
            prepare(
                &config,
                &self.events,
                &model,
                &self.hook_defaults,
                &self.relay,
                self.sync.closed_callback(),
            )
        };

        match self
            .lifecycle
            .mount(&element, config.wrap(), build, self.sync.blur_listener())
        {
            Ok(true) => {
                *self.bound.write() = Some(element);
                if let Ok(focus) = self.lifecycle.focus_input() {
                    self.disabled.sync(&focus);
                }
                true
            }
            Ok(false) => false,
            Err(err) => {
                tracing::warn!(target: targets::LIFECYCLE, %err, "mount skipped");
                false
            }
        }
    }

    /// Destroy the widget and release the bound element.
    #[tracing::instrument(skip_all, target = "horizon_picker::lifecycle", level = "debug")]
    pub fn unmount(&self) -> bool {
        let destroyed = self.lifecycle.unmount();
        *self.bound.write() = None;
        destroyed
    }

    /// The host changed the bound value.
    pub fn on_model_value_changed(&self, value: impl Into<ModelValue>) -> SyncOutcome {
        let value = value.into();
        if !self.model_value.set(value.clone()) {
            return SyncOutcome::Unchanged;
        }
        let bound = self.bound.read().clone();
        let widget = self.lifecycle.widget();
        self.sync.push_inbound(&value, bound.as_ref(), widget.as_ref())
    }

    /// The host changed the bound value to a loosely typed JSON value.
    ///
    /// Shapes the picker cannot bind are logged and bound by their text.
    pub fn on_model_value_json(&self, value: &Value) -> SyncOutcome {
        self.on_model_value_changed(ModelValue::from_json_lossy(value))
    }

    /// The host replaced the configuration.
    ///
    /// A mounted widget receives the new options, minus any hooks; hooks
    /// only take effect on the next mount.
    pub fn on_config_changed(&self, config: Config) -> bool {
        let plan = {
            let mut current = self.config.write();
            if *current == config {
                return false;
            }
            *current = config;
            plan_reload(&current)
        };

        match self.lifecycle.reconfigure(&plan) {
            Ok(()) => true,
            Err(PickerError::WidgetMissing) => {
                tracing::trace!(target: targets::CONFIG, "no widget mounted, config kept for next mount");
                false
            }
            Err(err) => {
                tracing::warn!(target: targets::CONFIG, %err, "reconfiguration failed");
                false
            }
        }
    }

    /// The host toggled the disabled flag.
    pub fn on_disabled_changed(&self, disabled: bool) -> bool {
        let focus = self.lifecycle.focus_input().ok();
        self.disabled.set(disabled, focus.as_ref())
    }

    /// The current bound value.
    pub fn model_value(&self) -> ModelValue {
        self.model_value.get()
    }

    /// The current configuration.
    pub fn config(&self) -> Config {
        self.config.read().clone()
    }

    /// Whether the input is disabled.
    pub fn is_disabled(&self) -> bool {
        self.disabled.get()
    }

    /// The mounted widget.
    pub fn widget(&self) -> Option<Arc<dyn CalendarWidget>> {
        self.lifecycle.widget()
    }

    /// The mounted widget's focus input.
    pub fn focus_input(&self) -> Result<ElementRef> {
        self.lifecycle.focus_input()
    }

    /// Whether a widget is mounted.
    pub fn is_mounted(&self) -> bool {
        self.lifecycle.is_mounted()
    }
}

impl fmt::Debug for DatePicker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DatePicker")
            .field("model_value", &self.model_value.get())
            .field("config", &*self.config.read())
            .field("events", &self.events)
            .field("disabled", &self.disabled.get())
            .field("lifecycle", &self.lifecycle)
            .field("listeners", &self.channel.connection_count())
            .finish_non_exhaustive()
    }
}

static_assertions::assert_impl_all!(DatePicker: Send, Sync);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::{Element, MemoryElement};
    use crate::widget::{MemoryCalendarFactory, WidgetCall};
    use chrono::{TimeZone, Utc};

    fn picker(props: PickerProps) -> (DatePicker, Arc<MemoryCalendarFactory>) {
        let factory = Arc::new(MemoryCalendarFactory::new());
        let picker = DatePicker::new(props, factory.clone(), Arc::new(TickQueue::new()))
            .with_hook_defaults(Arc::new(HookDefaults::new()));
        (picker, factory)
    }

    #[test]
    fn test_props_default() {
        let props = PickerProps::default();
        assert_eq!(props.model_value, ModelValue::Null);
        assert_eq!(props.config, Config::picker_default());
        assert_eq!(props.events, HookEvent::EMITTED_BY_DEFAULT.to_vec());
        assert!(!props.disabled);
    }

    #[test]
    fn test_render_reflects_disabled() {
        let (picker, _) = picker(PickerProps {
            disabled: true,
            ..Default::default()
        });
        let rendered = picker.render();
        assert_eq!(rendered.input_type, "text");
        assert!(rendered.disabled);
    }

    #[test]
    fn test_unmounted_handlers_are_noops() {
        let (picker, factory) = picker(PickerProps::default());

        assert_eq!(picker.on_model_value_changed("2024-01-05"), SyncOutcome::NoWidget);
        assert!(!picker.on_config_changed(Config::new().with_option("locale", "fr")));
        assert!(!picker.on_disabled_changed(true));
        assert!(!picker.unmount());
        assert!(factory.created().is_empty());

        assert_eq!(picker.model_value(), ModelValue::from("2024-01-05"));
        assert!(picker.is_disabled());
    }

    #[test]
    fn test_mount_seeds_model_value() {
        let (picker, factory) = picker(PickerProps {
            model_value: ModelValue::from("2024-01-05"),
            ..Default::default()
        });
        let input = MemoryElement::input();
        picker.render().attach(&input.as_element());

        assert!(picker.mount(input.as_element()));
        assert_eq!(factory.last().unwrap().selected(), ModelValue::from("2024-01-05"));
        assert_eq!(input.value().as_deref(), Some("2024-01-05"));
    }

    #[test]
    fn test_mount_instant_converges_with_text() {
        let instant = Utc.with_ymd_and_hms(2024, 1, 5, 0, 0, 0).unwrap();
        let (picker, factory) = picker(PickerProps {
            model_value: ModelValue::from(instant),
            ..Default::default()
        });
        let input = MemoryElement::input();
        picker.render().attach(&input.as_element());
        picker.mount(input.as_element());

        let calendar = factory.last().unwrap();
        assert_eq!(calendar.selected(), ModelValue::from(instant));
        assert_eq!(input.value().as_deref(), Some("2024-01-05"));

        // Same date in textual form: the input already shows it
        assert_eq!(picker.on_model_value_changed("2024-01-05"), SyncOutcome::Unchanged);
        assert!(calendar.calls().is_empty());
    }

    #[test]
    fn test_second_mount_keeps_first_binding() {
        let (picker, factory) = picker(PickerProps::default());
        let first = MemoryElement::input();
        picker.render().attach(&first.as_element());
        assert!(picker.mount(first.as_element()));

        let second = MemoryElement::input();
        second.set_value("2024-01-05");
        assert!(!picker.mount(second.as_element()));
        assert_eq!(factory.created().len(), 1);

        assert_eq!(picker.on_model_value_changed("2024-01-05"), SyncOutcome::Pushed);
        assert_eq!(first.value().as_deref(), Some("2024-01-05"));
        assert_eq!(
            factory.last().unwrap().calls(),
            vec![WidgetCall::SetSelectedValue(ModelValue::from("2024-01-05"), true)]
        );
    }

    #[test]
    fn test_failed_wrap_mount_binds_nothing() {
        let (picker, factory) = picker(PickerProps {
            config: Config::picker_default().with_option("wrap", true),
            ..Default::default()
        });
        let orphan = MemoryElement::input();
        orphan.set_value("2024-01-05");

        assert!(!picker.mount(orphan.as_element()));
        assert!(factory.created().is_empty());
        assert_eq!(picker.on_model_value_changed("2024-01-05"), SyncOutcome::NoWidget);
    }

    #[test]
    fn test_same_config_is_ignored() {
        let (picker, factory) = picker(PickerProps::default());
        let input = MemoryElement::input();
        picker.render().attach(&input.as_element());
        picker.mount(input.as_element());

        assert!(!picker.on_config_changed(Config::picker_default()));
        assert!(factory.last().unwrap().calls().is_empty());
    }
}
