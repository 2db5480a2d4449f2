//! Widget-native events and hook callbacks.
//!
//! The calendar widget reports what happens inside it by invoking hook
//! callbacks registered under an event name such as `onChange`. This module
//! defines that event set, the arguments the widget passes to a hook, and the
//! process-wide registry of default hooks that every picker picks up.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::{Arc, OnceLock};

use chrono::{DateTime, Utc};
use parking_lot::RwLock;

use crate::error::PickerError;

/// An event the calendar widget fires through its hooks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum HookEvent {
    /// The selection changed.
    Change,
    /// The calendar closed.
    Close,
    /// The widget was destroyed.
    Destroy,
    /// The visible month changed.
    MonthChange,
    /// The calendar opened.
    Open,
    /// The visible year changed.
    YearChange,
    /// The input's text was rewritten.
    ValueUpdate,
    /// A day cell was created.
    DayCreate,
    /// The widget finished parsing its options.
    ParseConfig,
    /// The widget finished initializing.
    Ready,
    /// The calendar is about to be positioned.
    PreCalendarPosition,
    /// A key was pressed inside the widget.
    KeyDown,
}

impl HookEvent {
    /// Every event, default subset first.
    pub const ALL: [HookEvent; 12] = [
        HookEvent::Change,
        HookEvent::Close,
        HookEvent::Destroy,
        HookEvent::MonthChange,
        HookEvent::Open,
        HookEvent::YearChange,
        HookEvent::ValueUpdate,
        HookEvent::DayCreate,
        HookEvent::ParseConfig,
        HookEvent::Ready,
        HookEvent::PreCalendarPosition,
        HookEvent::KeyDown,
    ];

    /// Events forwarded when the host does not choose a subset.
    pub const EMITTED_BY_DEFAULT: [HookEvent; 6] = [
        HookEvent::Change,
        HookEvent::Close,
        HookEvent::Destroy,
        HookEvent::MonthChange,
        HookEvent::Open,
        HookEvent::YearChange,
    ];

    /// Events forwarded only on request.
    pub const OPT_IN: [HookEvent; 6] = [
        HookEvent::ValueUpdate,
        HookEvent::DayCreate,
        HookEvent::ParseConfig,
        HookEvent::Ready,
        HookEvent::PreCalendarPosition,
        HookEvent::KeyDown,
    ];

    /// The widget's option key for this event, e.g. `onMonthChange`.
    pub const fn canonical_name(self) -> &'static str {
        match self {
            Self::Change => "onChange",
            Self::Close => "onClose",
            Self::Destroy => "onDestroy",
            Self::MonthChange => "onMonthChange",
            Self::Open => "onOpen",
            Self::YearChange => "onYearChange",
            Self::ValueUpdate => "onValueUpdate",
            Self::DayCreate => "onDayCreate",
            Self::ParseConfig => "onParseConfig",
            Self::Ready => "onReady",
            Self::PreCalendarPosition => "onPreCalendarPosition",
            Self::KeyDown => "onKeyDown",
        }
    }

    /// The name this event is forwarded under, e.g. `on-month-change`.
    pub fn forwarded_name(self) -> String {
        camel_to_kebab(self.canonical_name())
    }

    /// Whether this event belongs to the default subset.
    pub fn is_emitted_by_default(self) -> bool {
        Self::EMITTED_BY_DEFAULT.contains(&self)
    }
}

impl fmt::Display for HookEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.canonical_name())
    }
}

impl FromStr for HookEvent {
    type Err = PickerError;

    /// Parse either the canonical (`onMonthChange`) or forwarded (`on-month-change`) name.
    fn from_str(name: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|event| event.canonical_name() == name || event.forwarded_name() == name)
            .ok_or_else(|| PickerError::unknown_event(name))
    }
}

/// Rewrite a camelCase name in hyphenated lower case.
///
/// A hyphen goes between every lowercase letter that is directly followed by
/// an uppercase one; the result is then lowercased.
pub fn camel_to_kebab(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 4);
    let mut prev_lower = false;
    for ch in name.chars() {
        if prev_lower && ch.is_ascii_uppercase() {
            out.push('-');
        }
        prev_lower = ch.is_ascii_lowercase();
        out.extend(ch.to_lowercase());
    }
    out
}

/// Arguments the widget passes to every hook.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HookArgs {
    /// The currently selected dates.
    pub selected_dates: Vec<DateTime<Utc>>,
    /// The selection formatted with the widget's display format.
    pub date_str: String,
}

impl HookArgs {
    /// Create hook arguments.
    pub fn new(selected_dates: Vec<DateTime<Utc>>, date_str: impl Into<String>) -> Self {
        Self {
            selected_dates,
            date_str: date_str.into(),
        }
    }
}

/// A hook callback.
pub type HookCallback = Arc<dyn Fn(&HookArgs) + Send + Sync>;

/// Wrap a closure as a [`HookCallback`].
pub fn hook<F>(f: F) -> HookCallback
where
    F: Fn(&HookArgs) + Send + Sync + 'static,
{
    Arc::new(f)
}

/// Default hooks applied to every picker, per event.
///
/// A picker consults its registry each time it builds a widget configuration,
/// so defaults registered later only affect widgets mounted later.
#[derive(Default)]
pub struct HookDefaults {
    hooks: RwLock<HashMap<HookEvent, Vec<HookCallback>>>,
}

impl HookDefaults {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a default hook for `event`.
    pub fn set_default(&self, event: HookEvent, callback: HookCallback) {
        self.hooks.write().entry(event).or_default().push(callback);
    }

    /// The default hooks for `event`, in registration order.
    pub fn for_event(&self, event: HookEvent) -> Vec<HookCallback> {
        self.hooks.read().get(&event).cloned().unwrap_or_default()
    }

    /// Remove every default hook.
    pub fn clear(&self) {
        self.hooks.write().clear();
    }
}

impl fmt::Debug for HookDefaults {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let hooks = self.hooks.read();
        let mut map = f.debug_map();
        for (event, callbacks) in hooks.iter() {
            map.entry(event, &callbacks.len());
        }
        map.finish()
    }
}

/// The process-wide default hook registry.
pub fn global_hook_defaults() -> Arc<HookDefaults> {
    static GLOBAL: OnceLock<Arc<HookDefaults>> = OnceLock::new();
    GLOBAL.get_or_init(|| Arc::new(HookDefaults::new())).clone()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_camel_to_kebab() {
        assert_eq!(camel_to_kebab("onChange"), "on-change");
        assert_eq!(camel_to_kebab("onPreCalendarPosition"), "on-pre-calendar-position");
        assert_eq!(camel_to_kebab("blur"), "blur");
        assert_eq!(camel_to_kebab("HTMLInput"), "htmlinput");
    }

    #[test]
    fn test_forwarded_names() {
        assert_eq!(HookEvent::Close.forwarded_name(), "on-close");
        assert_eq!(HookEvent::MonthChange.forwarded_name(), "on-month-change");
        assert_eq!(HookEvent::KeyDown.forwarded_name(), "on-key-down");
    }

    #[test]
    fn test_subsets_partition_all() {
        for event in HookEvent::ALL {
            assert_ne!(
                HookEvent::EMITTED_BY_DEFAULT.contains(&event),
                HookEvent::OPT_IN.contains(&event),
                "{event}"
            );
        }
        assert!(HookEvent::Close.is_emitted_by_default());
        assert!(!HookEvent::Ready.is_emitted_by_default());
    }

    #[test]
    fn test_parse_event_names() {
        assert_eq!("onYearChange".parse::<HookEvent>().unwrap(), HookEvent::YearChange);
        assert_eq!("on-day-create".parse::<HookEvent>().unwrap(), HookEvent::DayCreate);
        assert!(matches!(
            "onWhatever".parse::<HookEvent>(),
            Err(PickerError::UnknownEvent { .. })
        ));
    }

    #[test]
    fn test_hook_defaults() {
        let defaults = HookDefaults::new();
        let calls = Arc::new(AtomicUsize::new(0));

        let calls_clone = calls.clone();
        defaults.set_default(
            HookEvent::Open,
            hook(move |_| {
                calls_clone.fetch_add(1, Ordering::SeqCst);
            }),
        );

        assert!(defaults.for_event(HookEvent::Close).is_empty());
        let open = defaults.for_event(HookEvent::Open);
        assert_eq!(open.len(), 1);
        open[0](&HookArgs::default());
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        defaults.clear();
        assert!(defaults.for_event(HookEvent::Open).is_empty());
    }

    #[test]
    fn test_global_defaults_are_shared() {
        assert!(Arc::ptr_eq(&global_hook_defaults(), &global_hook_defaults()));
    }
}
