//! Two-way value synchronization.
//!
//! Outbound, the picker reports the input's text as `update:modelValue`:
//! after each `input` event (read on the next render tick, once the widget
//! has finished rewriting the field) and whenever the calendar closes.
//! Inbound, a new model value is pushed into the widget unless the input
//! already shows it, which keeps the two directions from chasing each other.

use std::sync::Arc;

use horizon_picker_core::logging::targets;
use horizon_picker_core::TickQueue;

use crate::dom::{DomEvent, DomListener, ElementRef};
use crate::hooks::{hook, HookArgs, HookCallback};
use crate::relay::{EventRelay, PickerEvent};
use crate::value::{nullify, ModelValue};
use crate::widget::CalendarWidget;

/// What an inbound push did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncOutcome {
    /// The input already shows the value; the widget was not touched.
    Unchanged,
    /// The value was handed to the widget with change bookkeeping.
    Pushed,
    /// No widget is mounted.
    NoWidget,
    /// The picker has no readable input element.
    NotRendered,
}

/// Keeps the model value and the widget's selection in step.
#[derive(Clone)]
pub struct ValueSynchronizer {
    relay: EventRelay,
    ticks: Arc<TickQueue>,
}

impl ValueSynchronizer {
    /// Create a synchronizer emitting through `relay` and deferring on `ticks`.
    pub fn new(relay: EventRelay, ticks: Arc<TickQueue>) -> Self {
        Self { relay, ticks }
    }

    /// Listener for the rendered input's `input` event.
    ///
    /// The text is read on the next tick. If the element has left the
    /// document by then nothing is emitted.
    pub fn input_listener(&self) -> DomListener {
        let relay = self.relay.clone();
        let ticks = self.ticks.clone();
        Arc::new(move |event: &DomEvent| {
            let target = event.target.clone();
            let relay = relay.clone();
            ticks.post(move || {
                let Some(text) = target.value() else {
                    tracing::trace!(target: targets::SYNC, "input detached before deferred read");
                    return;
                };
                tracing::trace!(target: targets::SYNC, %text, "reporting edited text");
                relay.emit(PickerEvent::UpdateModelValue(nullify(&text)));
            });
        })
    }

    /// Listener for the focus input's `blur` event. Carries the element's
    /// text, empty text as `None`.
    pub fn blur_listener(&self) -> DomListener {
        let relay = self.relay.clone();
        Arc::new(move |event: &DomEvent| {
            let text = event.target.value().unwrap_or_default();
            relay.emit(PickerEvent::Blur(nullify(&text)));
        })
    }

    /// Hook appended to the widget's close hooks.
    ///
    /// Emits the widget's formatted text as is, even when it is empty or
    /// unchanged.
    pub fn closed_callback(&self) -> HookCallback {
        let relay = self.relay.clone();
        hook(move |args: &HookArgs| {
            tracing::trace!(target: targets::SYNC, date_str = %args.date_str, "calendar closed");
            relay.emit(PickerEvent::UpdateModelValue(Some(args.date_str.clone())));
        })
    }

    /// Push a host-supplied value into the widget.
    pub fn push_inbound(
        &self,
        value: &ModelValue,
        bound: Option<&ElementRef>,
        widget: Option<&Arc<dyn CalendarWidget>>,
    ) -> SyncOutcome {
        let Some(widget) = widget else {
            tracing::trace!(target: targets::SYNC, "no widget mounted, value kept for next mount");
            return SyncOutcome::NoWidget;
        };
        let Some(shown) = bound.and_then(|element| element.value()) else {
            tracing::trace!(target: targets::SYNC, "no readable input, skipping push");
            return SyncOutcome::NotRendered;
        };

        if widget.format_value(value) == nullify(&shown) {
            tracing::trace!(target: targets::SYNC, %shown, "input already shows value");
            return SyncOutcome::Unchanged;
        }

        tracing::trace!(target: targets::SYNC, ?value, "pushing value into widget");
        widget.set_selected_value(value, true);
        SyncOutcome::Pushed
    }
}
