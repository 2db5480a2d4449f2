//! Picker configuration and the configuration preparer.
//!
//! A [`Config`] is what the host hands the picker: an open table of widget
//! options plus the hooks it wants installed. The picker never mutates it.
//! [`prepare`] derives the [`EffectiveConfig`] the widget is created with,
//! and [`plan_reload`] derives what to re-apply when the host swaps the
//! configuration of a mounted picker.
//!
//! # Loading options
//!
//! ```
//! use horizon_picker::config::Config;
//!
//! let config = Config::from_toml_str(r#"
//!     dateFormat = "Y-m-d"
//!     showMonths = 2
//!     wrap = false
//! "#).unwrap();
//!
//! assert_eq!(config.option("showMonths"), Some(&serde_json::json!(2)));
//! ```

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use serde_json::{Map, Value};

use horizon_picker_core::logging::targets;

use crate::error::{json_kind, PickerError, Result};
use crate::hooks::{HookArgs, HookCallback, HookDefaults, HookEvent};
use crate::relay::EventRelay;
use crate::value::ModelValue;

/// Option seeding the widget's initial selection.
pub const DEFAULT_DATE_KEY: &str = "defaultDate";

/// Option attaching the widget to the input's parent instead of the input.
pub const WRAP_KEY: &str = "wrap";

/// Option making the widget show a separate display input.
pub const ALT_INPUT_KEY: &str = "altInput";

/// Options the widget only honors when set one at a time after creation.
pub const RECONFIGURE_KEYS: [&str; 2] = ["locale", "showMonths"];

/// The hooks installed for one event: a single callback or a list.
#[derive(Clone)]
enum HookSlot {
    /// One callback.
    One(HookCallback),
    /// Several callbacks, run in order.
    Many(Vec<HookCallback>),
}

impl HookSlot {
    /// The callbacks as a list.
    fn to_list(&self) -> Vec<HookCallback> {
        match self {
            Self::One(callback) => vec![callback.clone()],
            Self::Many(callbacks) => callbacks.clone(),
        }
    }

    fn same_callbacks(&self, other: &Self) -> bool {
        let (a, b) = (self.to_list(), other.to_list());
        a.len() == b.len() && a.iter().zip(&b).all(|(x, y)| Arc::ptr_eq(x, y))
    }
}

/// Host-supplied picker configuration.
///
/// Cloning is cheap and shallow: options are copied, hook callbacks shared.
#[derive(Clone, Default)]
pub struct Config {
    options: Map<String, Value>,
    hooks: BTreeMap<HookEvent, HookSlot>,
}

impl Config {
    /// An empty configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// The configuration a picker uses when the host supplies none:
    /// `{defaultDate: null, wrap: false}`.
    pub fn picker_default() -> Self {
        Self::new()
            .with_option(DEFAULT_DATE_KEY, Value::Null)
            .with_option(WRAP_KEY, false)
    }

    /// Build from an option table.
    pub fn from_options(options: Map<String, Value>) -> Self {
        Self {
            options,
            hooks: BTreeMap::new(),
        }
    }

    /// Parse options from a JSON object.
    pub fn from_json_str(source: &str) -> Result<Self> {
        match serde_json::from_str::<Value>(source)? {
            Value::Object(options) => Ok(Self::from_options(options)),
            other => Err(PickerError::OptionsNotTable {
                found: json_kind(&other),
            }),
        }
    }

    /// Parse options from a TOML document.
    pub fn from_toml_str(source: &str) -> Result<Self> {
        let options: Map<String, Value> = toml::from_str(source)?;
        Ok(Self::from_options(options))
    }

    /// Set an option (builder form).
    pub fn with_option(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set_option(key, value);
        self
    }

    /// Set an option.
    pub fn set_option(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.options.insert(key.into(), value.into());
    }

    /// Read an option.
    pub fn option(&self, key: &str) -> Option<&Value> {
        self.options.get(key)
    }

    /// All options.
    pub fn options(&self) -> &Map<String, Value> {
        &self.options
    }

    /// Whether the widget attaches to the input's parent.
    pub fn wrap(&self) -> bool {
        self.options
            .get(WRAP_KEY)
            .and_then(Value::as_bool)
            .unwrap_or(false)
    }

    /// The configured initial selection, if any.
    pub fn default_date(&self) -> Option<ModelValue> {
        self.options
            .get(DEFAULT_DATE_KEY)
            .filter(|value| !value.is_null())
            .map(ModelValue::from_json_lossy)
    }

    /// Install a hook (builder form).
    pub fn with_hook(mut self, event: HookEvent, callback: HookCallback) -> Self {
        self.add_hook(event, callback);
        self
    }

    /// Install a hook after any already present for `event`.
    pub fn add_hook(&mut self, event: HookEvent, callback: HookCallback) {
        let slot = match self.hooks.remove(&event) {
            None => HookSlot::One(callback),
            Some(existing) => {
                let mut callbacks = existing.to_list();
                callbacks.push(callback);
                HookSlot::Many(callbacks)
            }
        };
        self.hooks.insert(event, slot);
    }

    /// The hooks installed for `event`, as a list.
    pub fn hooks(&self, event: HookEvent) -> Vec<HookCallback> {
        self.hooks.get(&event).map(HookSlot::to_list).unwrap_or_default()
    }
}

impl PartialEq for Config {
    /// Options compare by value, hooks by callback identity.
    fn eq(&self, other: &Self) -> bool {
        self.options == other.options
            && self.hooks.len() == other.hooks.len()
            && self.hooks.iter().zip(&other.hooks).all(|((ea, sa), (eb, sb))| {
                ea == eb && sa.same_callbacks(sb)
            })
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let hooks: BTreeMap<_, _> = self
            .hooks
            .iter()
            .map(|(event, slot)| (event.canonical_name(), slot.to_list().len()))
            .collect();
        f.debug_struct("Config")
            .field("options", &self.options)
            .field("hooks", &hooks)
            .finish()
    }
}

/// The configuration a widget is created with.
#[derive(Clone, Default)]
pub struct EffectiveConfig {
    options: Map<String, Value>,
    hooks: BTreeMap<HookEvent, Vec<HookCallback>>,
    // The model value behind `defaultDate`, kept typed so an instant is not
    // read back as its RFC 3339 text
    seed: Option<ModelValue>,
}

impl EffectiveConfig {
    /// Read an option.
    pub fn option(&self, key: &str) -> Option<&Value> {
        self.options.get(key)
    }

    /// All options.
    pub fn options(&self) -> &Map<String, Value> {
        &self.options
    }

    /// The initial selection seed.
    ///
    /// A seeded model value is returned as bound; otherwise the `defaultDate`
    /// option is read as JSON.
    pub fn default_date(&self) -> ModelValue {
        if let Some(seed) = &self.seed {
            return seed.clone();
        }
        self.options
            .get(DEFAULT_DATE_KEY)
            .map(ModelValue::from_json_lossy)
            .unwrap_or_default()
    }

    /// The hooks for `event`, in invocation order.
    pub fn hooks(&self, event: HookEvent) -> &[HookCallback] {
        self.hooks.get(&event).map(Vec::as_slice).unwrap_or_default()
    }

    /// Invoke every hook for `event`.
    pub fn fire(&self, event: HookEvent, args: &HookArgs) {
        for callback in self.hooks(event) {
            callback(args);
        }
    }

    /// Merge a partial option table, as the widget does on reconfiguration.
    pub fn merge_options(&mut self, partial: &Map<String, Value>) {
        for (key, value) in partial {
            self.set_option(key, value.clone());
        }
    }

    /// Set one option.
    pub fn set_option(&mut self, key: &str, value: Value) {
        if key == DEFAULT_DATE_KEY {
            self.seed = None;
        }
        self.options.insert(key.to_owned(), value);
    }
}

impl fmt::Debug for EffectiveConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let hooks: BTreeMap<_, _> = self
            .hooks
            .iter()
            .map(|(event, callbacks)| (event.canonical_name(), callbacks.len()))
            .collect();
        f.debug_struct("EffectiveConfig")
            .field("options", &self.options)
            .field("hooks", &hooks)
            .finish()
    }
}

/// Build the widget configuration for a mount.
///
/// Works on a copy of `user`. For each subscribed event (duplicates are
/// ignored) the hook list becomes: the user's hooks, then `defaults` for
/// that event, then a forwarder from `relay`. `on_close` is appended to the
/// close hooks whether or not close is subscribed. The model value seeds
/// `defaultDate` unless it is empty, in which case the user's option stays.
pub fn prepare(
    user: &Config,
    subscribed: &[HookEvent],
    model: &ModelValue,
    defaults: &HookDefaults,
    relay: &EventRelay,
    on_close: HookCallback,
) -> EffectiveConfig {
    let mut effective = EffectiveConfig {
        options: user.options.clone(),
        hooks: user
            .hooks
            .iter()
            .map(|(event, slot)| (*event, slot.to_list()))
            .collect(),
        seed: None,
    };

    let mut seen = Vec::with_capacity(subscribed.len());
    for &event in subscribed {
        if seen.contains(&event) {
            continue;
        }
        seen.push(event);

        let list = effective.hooks.entry(event).or_default();
        list.extend(defaults.for_event(event));
        list.push(relay.forwarder(event));
    }

    effective
        .hooks
        .entry(HookEvent::Close)
        .or_default()
        .push(on_close);

    if !model.is_empty() {
        effective
            .options
            .insert(DEFAULT_DATE_KEY.to_owned(), model.to_json());
        effective.seed = Some(model.clone());
    }

    tracing::trace!(
        target: targets::CONFIG,
        subscribed = seen.len(),
        seeded = !model.is_empty(),
        "prepared widget configuration"
    );
    effective
}

/// What to re-apply to a mounted widget after a configuration change.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReloadPlan {
    /// Options passed to the widget in one call. Hook entries are excluded:
    /// re-passing hooks would drop the ones installed at mount.
    pub partial: Map<String, Value>,
    /// Reconfiguration-sensitive options, re-applied one key at a time.
    pub keyed: Vec<(String, Value)>,
}

/// Derive the [`ReloadPlan`] for a new configuration.
///
/// Hooks in `config` are ignored, so hooks cannot be added after mount.
pub fn plan_reload(config: &Config) -> ReloadPlan {
    let mut partial = config.options.clone();
    for event in HookEvent::ALL {
        partial.remove(event.canonical_name());
    }

    let keyed = RECONFIGURE_KEYS
        .iter()
        .filter_map(|key| partial.get(*key).map(|value| ((*key).to_owned(), value.clone())))
        .collect();

    ReloadPlan { partial, keyed }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hooks::hook;
    use crate::relay::PickerEvent;
    use chrono::{TimeZone, Utc};
    use horizon_picker_core::Signal;
    use parking_lot::Mutex;
    use serde_json::json;

    fn relay() -> (EventRelay, Arc<Mutex<Vec<String>>>) {
        let channel = Arc::new(Signal::<PickerEvent>::new());
        let names = Arc::new(Mutex::new(Vec::new()));
        let names_clone = names.clone();
        channel.connect(move |event: &PickerEvent| names_clone.lock().push(event.name()));
        (EventRelay::new(channel), names)
    }

    fn noop() -> HookCallback {
        hook(|_| {})
    }

    #[test]
    fn test_picker_default() {
        let config = Config::picker_default();
        assert_eq!(config.option(DEFAULT_DATE_KEY), Some(&Value::Null));
        assert!(!config.wrap());
        assert_eq!(config.default_date(), None);
    }

    #[test]
    fn test_from_json() {
        let config = Config::from_json_str(r#"{"wrap": true, "defaultDate": "2024-01-05"}"#).unwrap();
        assert!(config.wrap());
        assert_eq!(config.default_date(), Some(ModelValue::from("2024-01-05")));

        assert!(matches!(
            Config::from_json_str("[1, 2]"),
            Err(PickerError::OptionsNotTable { found: "array" })
        ));
        assert!(matches!(Config::from_json_str("{"), Err(PickerError::Json(_))));
    }

    #[test]
    fn test_from_toml() {
        let config = Config::from_toml_str("locale = \"fr\"\nshowMonths = 2\n").unwrap();
        assert_eq!(config.option("locale"), Some(&json!("fr")));
        assert!(matches!(Config::from_toml_str("= nope"), Err(PickerError::Toml(_))));
    }

    #[test]
    fn test_add_hook_normalizes_to_list() {
        let first = noop();
        let second = noop();
        let mut config = Config::new().with_hook(HookEvent::Open, first.clone());
        assert_eq!(config.hooks(HookEvent::Open).len(), 1);

        config.add_hook(HookEvent::Open, second.clone());
        let hooks = config.hooks(HookEvent::Open);
        assert!(Arc::ptr_eq(&hooks[0], &first));
        assert!(Arc::ptr_eq(&hooks[1], &second));
    }

    #[test]
    fn test_prepare_orders_user_default_then_forwarder() {
        let (relay, names) = relay();
        let order = Arc::new(Mutex::new(Vec::new()));

        let user_order = order.clone();
        let user = Config::new().with_hook(
            HookEvent::Change,
            hook(move |_| user_order.lock().push("user")),
        );

        let defaults = HookDefaults::new();
        let default_order = order.clone();
        defaults.set_default(
            HookEvent::Change,
            hook(move |_| default_order.lock().push("default")),
        );

        let effective = prepare(
            &user,
            &[HookEvent::Change],
            &ModelValue::Null,
            &defaults,
            &relay,
            noop(),
        );

        assert_eq!(effective.hooks(HookEvent::Change).len(), 3);
        effective.fire(HookEvent::Change, &HookArgs::default());
        assert_eq!(*order.lock(), vec!["user", "default"]);
        assert_eq!(*names.lock(), vec!["on-change".to_owned()]);
    }

    #[test]
    fn test_prepare_always_appends_close_callback() {
        let (relay, _) = relay();
        let effective = prepare(
            &Config::new(),
            &[HookEvent::Open],
            &ModelValue::Null,
            &HookDefaults::new(),
            &relay,
            noop(),
        );

        assert_eq!(effective.hooks(HookEvent::Close).len(), 1);
        assert_eq!(effective.hooks(HookEvent::Open).len(), 1);
        assert!(effective.hooks(HookEvent::Change).is_empty());
    }

    #[test]
    fn test_prepare_subscribed_close_gets_forwarder_and_callback() {
        let (relay, _) = relay();
        let user = Config::new().with_hook(HookEvent::Close, noop());
        let effective = prepare(
            &user,
            &[HookEvent::Close, HookEvent::Close],
            &ModelValue::Null,
            &HookDefaults::new(),
            &relay,
            noop(),
        );

        // user hook, forwarder, close callback
        assert_eq!(effective.hooks(HookEvent::Close).len(), 3);
    }

    #[test]
    fn test_prepare_seeds_default_date() {
        let (relay, _) = relay();
        let user = Config::picker_default().with_option(DEFAULT_DATE_KEY, "2023-12-31");

        let seeded = prepare(
            &user,
            &[],
            &ModelValue::from("2024-01-05"),
            &HookDefaults::new(),
            &relay,
            noop(),
        );
        assert_eq!(seeded.default_date(), ModelValue::from("2024-01-05"));

        let kept = prepare(&user, &[], &ModelValue::Null, &HookDefaults::new(), &relay, noop());
        assert_eq!(kept.default_date(), ModelValue::from("2023-12-31"));

        let empty = prepare(&user, &[], &ModelValue::from(""), &HookDefaults::new(), &relay, noop());
        assert_eq!(empty.default_date(), ModelValue::from("2023-12-31"));
    }

    #[test]
    fn test_prepare_keeps_instant_seed_typed() {
        let (relay, _) = relay();
        let instant = Utc.with_ymd_and_hms(2024, 1, 5, 0, 0, 0).unwrap();

        let mut seeded = prepare(
            &Config::picker_default(),
            &[],
            &ModelValue::from(instant),
            &HookDefaults::new(),
            &relay,
            noop(),
        );
        assert_eq!(seeded.option(DEFAULT_DATE_KEY), Some(&json!("2024-01-05T00:00:00+00:00")));
        assert_eq!(seeded.default_date(), ModelValue::from(instant));

        seeded.set_option(DEFAULT_DATE_KEY, json!("2024-02-01"));
        assert_eq!(seeded.default_date(), ModelValue::from("2024-02-01"));
    }

    #[test]
    fn test_prepare_leaves_user_config_untouched() {
        let (relay, _) = relay();
        let user = Config::picker_default()
            .with_option("locale", "de")
            .with_hook(HookEvent::Change, noop());
        let snapshot = user.clone();

        for _ in 0..2 {
            let _ = prepare(
                &user,
                &HookEvent::EMITTED_BY_DEFAULT,
                &ModelValue::from("2024-01-05"),
                &HookDefaults::new(),
                &relay,
                noop(),
            );
            assert_eq!(user, snapshot);
            assert_eq!(user.hooks(HookEvent::Change).len(), 1);
            assert!(user.hooks(HookEvent::Close).is_empty());
            assert_eq!(user.option(DEFAULT_DATE_KEY), Some(&Value::Null));
        }
    }

    #[test]
    fn test_plan_reload_strips_hooks_and_collects_sensitive_keys() {
        let config = Config::from_json_str(
            r#"{"locale": "fr", "showMonths": 2, "onChange": "ignored", "onKeyDown": 1, "minDate": "today"}"#,
        )
        .unwrap()
        .with_hook(HookEvent::Open, noop());

        let plan = plan_reload(&config);
        assert!(!plan.partial.contains_key("onChange"));
        assert!(!plan.partial.contains_key("onKeyDown"));
        assert_eq!(plan.partial.get("minDate"), Some(&json!("today")));
        assert_eq!(
            plan.keyed,
            vec![
                ("locale".to_owned(), json!("fr")),
                ("showMonths".to_owned(), json!(2)),
            ]
        );
    }

    #[test]
    fn test_plan_reload_without_sensitive_keys() {
        let plan = plan_reload(&Config::picker_default());
        assert!(plan.keyed.is_empty());
        assert_eq!(plan.partial.len(), 2);
    }
}
