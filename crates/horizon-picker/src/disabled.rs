//! Disabled-state propagation.
//!
//! The rendered input carries the disabled flag at render time, but once the
//! widget is mounted the element the user actually interacts with may be the
//! widget's own display input. Changes to the flag are mirrored onto that
//! element.

use horizon_picker_core::logging::targets;
use horizon_picker_core::Property;

use crate::dom::{ElementRef, DISABLED_ATTRIBUTE};

/// Tracks the disabled flag and mirrors it onto the widget's focus input.
pub struct DisabledStateWatcher {
    disabled: Property<bool>,
}

impl DisabledStateWatcher {
    /// Create a watcher with the initial flag.
    pub fn new(disabled: bool) -> Self {
        Self {
            disabled: Property::new(disabled),
        }
    }

    /// The current flag.
    pub fn get(&self) -> bool {
        self.disabled.get()
    }

    /// Update the flag. When it changed and a focus input exists, the
    /// attribute is set or removed on it. Returns whether the element was
    /// touched.
    pub fn set(&self, disabled: bool, focus_input: Option<&ElementRef>) -> bool {
        if !self.disabled.set(disabled) {
            return false;
        }
        match focus_input {
            Some(element) => {
                apply(disabled, element);
                true
            }
            None => {
                tracing::trace!(target: targets::DISABLED, disabled, "no widget mounted, flag stored");
                false
            }
        }
    }

    /// Mirror the current flag onto a freshly mounted widget's focus input.
    pub fn sync(&self, focus_input: &ElementRef) {
        apply(self.get(), focus_input);
    }
}

fn apply(disabled: bool, element: &ElementRef) {
    tracing::trace!(target: targets::DISABLED, disabled, "mirroring disabled state");
    if disabled {
        element.set_attribute(DISABLED_ATTRIBUTE, "true");
    } else {
        element.remove_attribute(DISABLED_ATTRIBUTE);
    }
}
