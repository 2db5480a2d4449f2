//! Outward event channel and hook forwarding.
//!
//! Everything the picker reports to its host travels as a [`PickerEvent`] on
//! one [`Signal`]. Widget hooks are forwarded unchanged under their
//! hyphenated name; `blur` and `update:modelValue` are the picker's own.

use std::sync::Arc;

use horizon_picker_core::logging::targets;
use horizon_picker_core::Signal;

use crate::hooks::{HookArgs, HookCallback, HookEvent};

/// Name of the blur event.
pub const BLUR_EVENT: &str = "blur";

/// Name of the value-update event.
pub const UPDATE_MODEL_VALUE_EVENT: &str = "update:modelValue";

/// An event emitted by the picker.
#[derive(Debug, Clone, PartialEq)]
pub enum PickerEvent {
    /// The focusable input lost focus; carries its normalized text.
    Blur(Option<String>),
    /// The bound value changed inside the widget.
    UpdateModelValue(Option<String>),
    /// A forwarded widget hook with the widget's own arguments.
    Hook {
        /// The widget event.
        event: HookEvent,
        /// The arguments, untouched.
        args: HookArgs,
    },
}

impl PickerEvent {
    /// The outward name: `blur`, `update:modelValue`, or the forwarded hook name.
    pub fn name(&self) -> String {
        match self {
            Self::Blur(_) => BLUR_EVENT.to_owned(),
            Self::UpdateModelValue(_) => UPDATE_MODEL_VALUE_EVENT.to_owned(),
            Self::Hook { event, .. } => event.forwarded_name(),
        }
    }
}

/// Every event name a picker can emit.
pub fn declared_events() -> Vec<String> {
    let mut names = vec![BLUR_EVENT.to_owned(), UPDATE_MODEL_VALUE_EVENT.to_owned()];
    names.extend(HookEvent::ALL.iter().map(|event| event.forwarded_name()));
    names
}

/// Builds the callbacks that re-emit widget hooks on the picker's channel.
#[derive(Clone)]
pub struct EventRelay {
    channel: Arc<Signal<PickerEvent>>,
}

impl EventRelay {
    /// Create a relay emitting on `channel`.
    pub fn new(channel: Arc<Signal<PickerEvent>>) -> Self {
        Self { channel }
    }

    /// The outward channel.
    pub fn channel(&self) -> &Arc<Signal<PickerEvent>> {
        &self.channel
    }

    /// A hook that forwards `event` with its arguments.
    pub fn forwarder(&self, event: HookEvent) -> HookCallback {
        let channel = self.channel.clone();
        Arc::new(move |args: &HookArgs| {
            tracing::trace!(target: targets::RELAY, %event, "forwarding widget hook");
            channel.emit(PickerEvent::Hook {
                event,
                args: args.clone(),
            });
        })
    }

    /// Emit a picker event directly.
    pub fn emit(&self, event: PickerEvent) {
        self.channel.emit(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use parking_lot::Mutex;

    #[test]
    fn test_forwarder_passes_arguments_through() {
        let channel = Arc::new(Signal::new());
        let received = Arc::new(Mutex::new(Vec::new()));

        let received_clone = received.clone();
        channel.connect(move |event: &PickerEvent| received_clone.lock().push(event.clone()));

        let relay = EventRelay::new(channel);
        let args = HookArgs::new(
            vec![Utc.with_ymd_and_hms(2024, 1, 5, 0, 0, 0).unwrap()],
            "2024-01-05",
        );
        relay.forwarder(HookEvent::MonthChange)(&args);

        let received = received.lock();
        assert_eq!(received.len(), 1);
        assert_eq!(received[0].name(), "on-month-change");
        assert_eq!(
            received[0],
            PickerEvent::Hook {
                event: HookEvent::MonthChange,
                args,
            }
        );
    }

    #[test]
    fn test_event_names() {
        assert_eq!(PickerEvent::Blur(None).name(), "blur");
        assert_eq!(PickerEvent::UpdateModelValue(None).name(), "update:modelValue");
    }

    #[test]
    fn test_declared_events() {
        let names = declared_events();
        assert_eq!(names.len(), 14);
        assert_eq!(names[0], "blur");
        assert_eq!(names[1], "update:modelValue");
        assert!(names.contains(&"on-pre-calendar-position".to_owned()));
    }
}
