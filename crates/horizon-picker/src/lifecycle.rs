//! Widget creation and teardown.
//!
//! At most one widget exists per picker. The controller owns it together with
//! the blur listener it installed, so teardown can undo exactly what mount
//! did.

use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;

use horizon_picker_core::logging::{span_names, targets};
use horizon_picker_core::OperationSpan;

use crate::config::{EffectiveConfig, ReloadPlan};
use crate::dom::{DomEventKind, DomListener, ElementRef, ListenerId};
use crate::error::{PickerError, Result};
use crate::widget::{focus_input, CalendarWidget, WidgetFactory};

/// A mounted widget and what was attached for it.
pub struct WidgetHandle {
    widget: Arc<dyn CalendarWidget>,
    focus_input: ElementRef,
    blur_listener: ListenerId,
}

impl WidgetHandle {
    /// The widget.
    pub fn widget(&self) -> &Arc<dyn CalendarWidget> {
        &self.widget
    }

    /// The element the blur listener sits on.
    pub fn focus_input(&self) -> &ElementRef {
        &self.focus_input
    }
}

impl fmt::Debug for WidgetHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WidgetHandle")
            .field("blur_listener", &self.blur_listener)
            .finish_non_exhaustive()
    }
}

/// Creates the widget on mount and destroys it on unmount.
pub struct LifecycleController {
    factory: Arc<dyn WidgetFactory>,
    state: Mutex<Option<WidgetHandle>>,
}

impl LifecycleController {
    /// Create a controller building widgets with `factory`.
    pub fn new(factory: Arc<dyn WidgetFactory>) -> Self {
        Self {
            factory,
            state: Mutex::new(None),
        }
    }

    /// Create the widget on `bound`, or on its parent when `wrap` is set.
    ///
    /// `build` runs only when a widget is actually created. Returns
    /// `Ok(false)` when a widget already exists.
    pub fn mount(
        &self,
        bound: &ElementRef,
        wrap: bool,
        build: impl FnOnce() -> EffectiveConfig,
        on_blur: DomListener,
    ) -> Result<bool> {
        let _span = OperationSpan::new(span_names::MOUNT);
        if self.state.lock().is_some() {
            tracing::debug!(target: targets::LIFECYCLE, "widget already mounted");
            return Ok(false);
        }

        let anchor = if wrap {
            bound.parent().ok_or(PickerError::DetachedElement)?
        } else {
            bound.clone()
        };

        // The factory may run hooks that call back into the picker
        let widget = self.factory.create(&anchor, build());

        let mut state = self.state.lock();
        if state.is_some() {
            drop(state);
            tracing::debug!(target: targets::LIFECYCLE, "concurrent mount won, discarding widget");
            widget.destroy();
            return Ok(false);
        }

        let focus = focus_input(widget.as_ref());
        let blur_listener = focus.add_event_listener(DomEventKind::Blur, on_blur);
        *state = Some(WidgetHandle {
            widget,
            focus_input: focus,
            blur_listener,
        });
        tracing::debug!(target: targets::LIFECYCLE, wrap, "widget mounted");
        Ok(true)
    }

    /// Remove the blur listener and destroy the widget. Returns `false` when
    /// nothing was mounted.
    pub fn unmount(&self) -> bool {
        let _span = OperationSpan::new(span_names::UNMOUNT);
        let Some(handle) = self.state.lock().take() else {
            tracing::trace!(target: targets::LIFECYCLE, "nothing to unmount");
            return false;
        };

        handle.focus_input.remove_event_listener(handle.blur_listener);
        handle.widget.destroy();
        tracing::debug!(target: targets::LIFECYCLE, "widget destroyed");
        true
    }

    /// The mounted widget.
    pub fn widget(&self) -> Option<Arc<dyn CalendarWidget>> {
        self.state.lock().as_ref().map(|handle| handle.widget.clone())
    }

    /// The mounted widget's focus input.
    pub fn focus_input(&self) -> Result<ElementRef> {
        self.state
            .lock()
            .as_ref()
            .map(|handle| handle.focus_input.clone())
            .ok_or(PickerError::WidgetMissing)
    }

    /// Whether a widget is mounted.
    pub fn is_mounted(&self) -> bool {
        self.state.lock().is_some()
    }

    /// Apply a configuration reload to the mounted widget.
    pub fn reconfigure(&self, plan: &ReloadPlan) -> Result<()> {
        let widget = self.widget().ok_or(PickerError::WidgetMissing)?;
        widget.set_config(&plan.partial);
        for (key, value) in &plan.keyed {
            widget.set_config_key(key, value);
        }
        tracing::debug!(
            target: targets::CONFIG,
            options = plan.partial.len(),
            keyed = plan.keyed.len(),
            "widget reconfigured"
        );
        Ok(())
    }
}

impl fmt::Debug for LifecycleController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LifecycleController")
            .field("mounted", &self.is_mounted())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{plan_reload, Config};
    use crate::dom::{DomEvent, Element, MemoryElement, WIDGET_INPUT_MARKER};
    use crate::widget::{MemoryCalendarFactory, WidgetCall};
    use serde_json::json;

    fn noop_listener() -> DomListener {
        Arc::new(|_: &DomEvent| {})
    }

    fn marked_input() -> Arc<MemoryElement> {
        let input = MemoryElement::input();
        input.set_attribute(WIDGET_INPUT_MARKER, "true");
        input
    }

    #[test]
    fn test_mount_is_idempotent() {
        let factory = Arc::new(MemoryCalendarFactory::new());
        let controller = LifecycleController::new(factory.clone());
        let input = marked_input();
        let element = input.as_element();

        assert!(controller.mount(&element, false, EffectiveConfig::default, noop_listener()).unwrap());
        let mut built = false;
        let build = || {
            built = true;
            EffectiveConfig::default()
        };
        assert!(!controller.mount(&element, false, build, noop_listener()).unwrap());

        assert!(!built);
        assert_eq!(factory.created().len(), 1);
        assert_eq!(input.listener_count(DomEventKind::Blur), 1);
    }

    #[test]
    fn test_unmount_is_idempotent() {
        let factory = Arc::new(MemoryCalendarFactory::new());
        let controller = LifecycleController::new(factory.clone());
        let input = marked_input();

        assert!(!controller.unmount());
        controller
            .mount(&input.as_element(), false, EffectiveConfig::default, noop_listener())
            .unwrap();
        assert!(controller.unmount());
        assert!(!controller.unmount());

        let widget = factory.last().unwrap();
        assert_eq!(widget.calls(), vec![WidgetCall::Destroy]);
        assert_eq!(input.listener_count(DomEventKind::Blur), 0);
        assert!(matches!(controller.focus_input(), Err(PickerError::WidgetMissing)));
    }

    #[test]
    fn test_wrap_mounts_on_parent() {
        let factory = Arc::new(MemoryCalendarFactory::new());
        let controller = LifecycleController::new(factory.clone());
        let wrapper = MemoryElement::new("div");
        let input = marked_input();
        MemoryElement::append_child(&wrapper, input.clone());

        controller
            .mount(&input.as_element(), true, EffectiveConfig::default, noop_listener())
            .unwrap();
        let focus = controller.focus_input().unwrap();
        assert!(Arc::ptr_eq(&focus, &input.as_element()));
    }

    #[test]
    fn test_wrap_without_parent_fails() {
        let controller = LifecycleController::new(Arc::new(MemoryCalendarFactory::new()));
        let input = marked_input();

        let result = controller.mount(&input.as_element(), true, EffectiveConfig::default, noop_listener());
        assert!(matches!(result, Err(PickerError::DetachedElement)));
        assert!(!controller.is_mounted());
    }

    #[test]
    fn test_reconfigure() {
        let factory = Arc::new(MemoryCalendarFactory::new());
        let controller = LifecycleController::new(factory.clone());
        let plan = plan_reload(&Config::new().with_option("locale", "fr").with_option("minDate", "today"));

        assert!(matches!(controller.reconfigure(&plan), Err(PickerError::WidgetMissing)));

        controller
            .mount(&marked_input().as_element(), false, EffectiveConfig::default, noop_listener())
            .unwrap();
        controller.reconfigure(&plan).unwrap();

        let calls = factory.last().unwrap().calls();
        assert_eq!(calls.len(), 2);
        assert!(matches!(&calls[0], WidgetCall::SetConfig(options) if options.len() == 2));
        assert_eq!(calls[1], WidgetCall::SetConfigKey("locale".into(), json!("fr")));
    }
}
