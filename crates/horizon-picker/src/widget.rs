//! The calendar widget seam.
//!
//! The picker drives a third-party calendar through [`CalendarWidget`] and
//! creates it through a [`WidgetFactory`]. The widget's date arithmetic,
//! parsing and popup rendering stay on the other side of these traits.
//!
//! [`MemoryCalendar`] is a headless implementation that keeps its selection
//! in memory and writes the formatted text to its input, enough to drive a
//! picker without a browser.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use chrono::{DateTime, NaiveDate, Utc};
use parking_lot::{Mutex, RwLock};
use serde_json::{Map, Value};

use crate::config::{EffectiveConfig, ALT_INPUT_KEY};
use crate::dom::{DomEventKind, ElementRef, MemoryElement, WIDGET_INPUT_MARKER};
use crate::hooks::{HookArgs, HookEvent};
use crate::value::ModelValue;

/// An instantiated calendar widget.
///
/// All methods take `&self`: the widget may call back into the picker while
/// one of them runs, so implementations keep their state behind interior
/// mutability.
pub trait CalendarWidget: Send + Sync {
    /// The input the widget is bound to.
    fn input(&self) -> ElementRef;

    /// The separate display input, when the widget created one.
    fn alt_input(&self) -> Option<ElementRef> {
        None
    }

    /// Merge a partial option table into the live configuration.
    fn set_config(&self, options: &Map<String, Value>);

    /// Set a single option, running the widget's per-key reconfiguration.
    fn set_config_key(&self, key: &str, value: &Value);

    /// Select `value`. With `trigger_change` the widget runs its change
    /// bookkeeping (hooks, text refresh) as if the selection were its own.
    fn set_selected_value(&self, value: &ModelValue, trigger_change: bool);

    /// The text the widget would display for `value`.
    fn format_value(&self, value: &ModelValue) -> Option<String> {
        value.to_text()
    }

    /// Release the widget's nodes and timers.
    fn destroy(&self);
}

/// The element a widget takes focus and attributes on: its display input if
/// it has one, else its bound input.
pub fn focus_input(widget: &dyn CalendarWidget) -> ElementRef {
    widget.alt_input().unwrap_or_else(|| widget.input())
}

/// Creates calendar widgets.
pub trait WidgetFactory: Send + Sync {
    /// Instantiate a widget on `anchor` with `config`.
    fn create(&self, anchor: &ElementRef, config: EffectiveConfig) -> Arc<dyn CalendarWidget>;
}

/// A call received by a [`MemoryCalendar`].
#[derive(Debug, Clone, PartialEq)]
pub enum WidgetCall {
    /// `set_config`
    SetConfig(Map<String, Value>),
    /// `set_config_key`
    SetConfigKey(String, Value),
    /// `set_selected_value`
    SetSelectedValue(ModelValue, bool),
    /// `destroy`
    Destroy,
}

/// A headless calendar widget.
pub struct MemoryCalendar {
    input: ElementRef,
    alt_input: Option<Arc<MemoryElement>>,
    config: RwLock<EffectiveConfig>,
    selected: RwLock<ModelValue>,
    open: AtomicBool,
    destroyed: AtomicBool,
    calls: Mutex<Vec<WidgetCall>>,
}

impl MemoryCalendar {
    /// Create a widget on `anchor`.
    ///
    /// The bound input is the anchor itself when it carries the widget
    /// marker, otherwise the first marked child (wrapped markup). The initial
    /// selection comes from `defaultDate` and fires no hooks.
    pub fn new(anchor: &ElementRef, config: EffectiveConfig) -> Self {
        let input = if anchor.attribute(WIDGET_INPUT_MARKER).is_some() {
            anchor.clone()
        } else {
            anchor
                .children()
                .into_iter()
                .find(|child| child.attribute(WIDGET_INPUT_MARKER).is_some())
                .unwrap_or_else(|| anchor.clone())
        };

        let alt_input = config
            .option(ALT_INPUT_KEY)
            .and_then(Value::as_bool)
            .unwrap_or(false)
            .then(MemoryElement::input);

        let widget = Self {
            input,
            alt_input,
            selected: RwLock::new(ModelValue::Null),
            config: RwLock::new(config),
            open: AtomicBool::new(false),
            destroyed: AtomicBool::new(false),
            calls: Mutex::new(Vec::new()),
        };
        let initial = widget.config.read().default_date();
        widget.write_selection(&initial);
        widget
    }

    /// The current selection.
    pub fn selected(&self) -> ModelValue {
        self.selected.read().clone()
    }

    /// A snapshot of the live configuration.
    pub fn config(&self) -> EffectiveConfig {
        self.config.read().clone()
    }

    /// The display input, if one was created.
    pub fn alt_memory_input(&self) -> Option<Arc<MemoryElement>> {
        self.alt_input.clone()
    }

    /// Calls received through [`CalendarWidget`], oldest first.
    pub fn calls(&self) -> Vec<WidgetCall> {
        self.calls.lock().clone()
    }

    /// Whether the popup is open.
    pub fn is_open(&self) -> bool {
        self.open.load(Ordering::SeqCst)
    }

    /// Whether [`destroy`](CalendarWidget::destroy) has run.
    pub fn is_destroyed(&self) -> bool {
        self.destroyed.load(Ordering::SeqCst)
    }

    /// Open the popup.
    pub fn open(&self) {
        self.open.store(true, Ordering::SeqCst);
        self.fire(HookEvent::Open);
    }

    /// Close the popup.
    pub fn close(&self) {
        self.open.store(false, Ordering::SeqCst);
        self.fire(HookEvent::Close);
    }

    /// Pick `value` as a user would: the text is rewritten, change hooks
    /// fire, and the input dispatches `input`.
    pub fn pick(&self, value: impl Into<ModelValue>) {
        let value = value.into();
        self.write_selection(&value);
        self.fire(HookEvent::ValueUpdate);
        self.fire(HookEvent::Change);
        self.dispatch_input();
    }

    /// Page the visible month.
    pub fn change_month(&self) {
        self.fire(HookEvent::MonthChange);
    }

    /// The arguments the widget passes to its hooks right now.
    pub fn hook_args(&self) -> HookArgs {
        let selected = self.selected.read().clone();
        HookArgs::new(
            selected_dates(&selected),
            self.format_value(&selected).unwrap_or_default(),
        )
    }

    fn fire(&self, event: HookEvent) {
        let args = self.hook_args();
        // Hooks may call back into this widget
        let config = self.config.read().clone();
        config.fire(event, &args);
    }

    fn write_selection(&self, value: &ModelValue) {
        *self.selected.write() = value.clone();
        let text = self.format_value(value).unwrap_or_default();
        self.input.set_text(&text);
        if let Some(alt) = &self.alt_input {
            alt.set_value(text);
        }
    }

    fn dispatch_input(&self) {
        self.input.dispatch_event(DomEventKind::Input);
    }
}

/// Selected dates for a value. Strings are read as `YYYY-MM-DD`; anything
/// that does not parse is left out.
fn selected_dates(value: &ModelValue) -> Vec<DateTime<Utc>> {
    let parse = |text: &str| {
        NaiveDate::parse_from_str(text, "%Y-%m-%d")
            .ok()
            .and_then(|date| date.and_hms_opt(0, 0, 0))
            .map(|naive| naive.and_utc())
    };
    match value {
        ModelValue::Null | ModelValue::Number(_) => Vec::new(),
        ModelValue::DateTime(instant) => vec![*instant],
        ModelValue::Text(text) => parse(text).into_iter().collect(),
        ModelValue::List(items) => items.iter().filter_map(|item| parse(item)).collect(),
    }
}

impl CalendarWidget for MemoryCalendar {
    fn input(&self) -> ElementRef {
        self.input.clone()
    }

    fn alt_input(&self) -> Option<ElementRef> {
        self.alt_input.clone().map(|alt| alt as ElementRef)
    }

    fn set_config(&self, options: &Map<String, Value>) {
        self.calls.lock().push(WidgetCall::SetConfig(options.clone()));
        self.config.write().merge_options(options);
    }

    fn set_config_key(&self, key: &str, value: &Value) {
        self.calls
            .lock()
            .push(WidgetCall::SetConfigKey(key.to_owned(), value.clone()));
        self.config.write().set_option(key, value.clone());
    }

    fn set_selected_value(&self, value: &ModelValue, trigger_change: bool) {
        self.calls
            .lock()
            .push(WidgetCall::SetSelectedValue(value.clone(), trigger_change));
        self.write_selection(value);
        if trigger_change {
            self.fire(HookEvent::Change);
        }
    }

    fn destroy(&self) {
        self.calls.lock().push(WidgetCall::Destroy);
        self.fire(HookEvent::Destroy);
        self.destroyed.store(true, Ordering::SeqCst);
        if let Some(alt) = &self.alt_input {
            alt.detach();
        }
    }
}

/// Creates [`MemoryCalendar`]s and keeps them reachable for inspection.
#[derive(Default)]
pub struct MemoryCalendarFactory {
    created: Mutex<Vec<Arc<MemoryCalendar>>>,
}

impl MemoryCalendarFactory {
    /// Create a factory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Every widget created so far.
    pub fn created(&self) -> Vec<Arc<MemoryCalendar>> {
        self.created.lock().clone()
    }

    /// The most recently created widget.
    pub fn last(&self) -> Option<Arc<MemoryCalendar>> {
        self.created.lock().last().cloned()
    }
}

impl WidgetFactory for MemoryCalendarFactory {
    fn create(&self, anchor: &ElementRef, config: EffectiveConfig) -> Arc<dyn CalendarWidget> {
        let widget = Arc::new(MemoryCalendar::new(anchor, config));
        self.created.lock().push(widget.clone());
        widget
    }
}

static_assertions::assert_impl_all!(MemoryCalendar: Send, Sync);
