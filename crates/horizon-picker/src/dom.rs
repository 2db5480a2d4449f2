//! The document seam.
//!
//! The adapter only touches the document through the [`Element`] trait: it
//! reads an input's text, toggles attributes, and listens for `input` and
//! `blur`. A browser host implements the trait over its real nodes;
//! [`MemoryElement`] is an in-memory implementation for headless hosts and
//! tests.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Weak};

use parking_lot::{Mutex, RwLock};
use slotmap::{new_key_type, SlotMap};

new_key_type! {
    /// Identifies a listener registered on an element.
    pub struct ListenerId;
}

/// Attribute marking the input the calendar widget attaches to.
pub const WIDGET_INPUT_MARKER: &str = "data-input";

/// Attribute toggled to disable an input.
pub const DISABLED_ATTRIBUTE: &str = "disabled";

/// Shared reference to a document element.
pub type ElementRef = Arc<dyn Element>;

/// The DOM events the adapter listens for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DomEventKind {
    /// The element's text was edited.
    Input,
    /// The element lost focus.
    Blur,
}

/// A dispatched DOM event.
#[derive(Clone)]
pub struct DomEvent {
    /// What happened.
    pub kind: DomEventKind,
    /// The element it happened on.
    pub target: ElementRef,
}

impl fmt::Debug for DomEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DomEvent").field("kind", &self.kind).finish_non_exhaustive()
    }
}

/// A DOM event listener.
pub type DomListener = Arc<dyn Fn(&DomEvent) + Send + Sync>;

/// A document element as seen by the adapter.
pub trait Element: Send + Sync {
    /// The element's current text, or `None` once it has left the document.
    fn value(&self) -> Option<String>;

    /// Replace the element's text without dispatching anything.
    fn set_text(&self, text: &str);

    /// Dispatch `kind` on the element as if the user caused it.
    fn dispatch_event(&self, kind: DomEventKind);

    /// Read an attribute.
    fn attribute(&self, name: &str) -> Option<String>;

    /// Set an attribute.
    fn set_attribute(&self, name: &str, value: &str);

    /// Remove an attribute. Removing a missing attribute does nothing.
    fn remove_attribute(&self, name: &str);

    /// The containing element.
    fn parent(&self) -> Option<ElementRef>;

    /// Direct children, in document order.
    fn children(&self) -> Vec<ElementRef>;

    /// Register a listener for `kind`.
    fn add_event_listener(&self, kind: DomEventKind, listener: DomListener) -> ListenerId;

    /// Remove a listener. Returns `false` if it was not registered.
    fn remove_event_listener(&self, id: ListenerId) -> bool;
}

/// The single element the picker renders.
///
/// The host creates a text input from this description and routes its
/// `input` events to [`on_input`](Self::on_input). The calendar popup itself
/// is never part of it.
#[derive(Clone)]
pub struct RenderedInput {
    /// Always `"text"`.
    pub input_type: &'static str,
    /// Whether the input renders disabled.
    pub disabled: bool,
    /// Handler for raw `input` events.
    pub on_input: DomListener,
}

impl RenderedInput {
    /// Attributes to place on the rendered element.
    pub fn attributes(&self) -> Vec<(&'static str, String)> {
        let mut attributes = vec![
            ("type", self.input_type.to_owned()),
            (WIDGET_INPUT_MARKER, "true".to_owned()),
        ];
        if self.disabled {
            attributes.push((DISABLED_ATTRIBUTE, "true".to_owned()));
        }
        attributes
    }

    /// Apply this description to `element` and bind the input handler.
    pub fn attach(&self, element: &ElementRef) -> ListenerId {
        for (name, value) in self.attributes() {
            element.set_attribute(name, &value);
        }
        if !self.disabled {
            element.remove_attribute(DISABLED_ATTRIBUTE);
        }
        element.add_event_listener(DomEventKind::Input, self.on_input.clone())
    }
}

impl fmt::Debug for RenderedInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RenderedInput")
            .field("input_type", &self.input_type)
            .field("disabled", &self.disabled)
            .finish_non_exhaustive()
    }
}

/// An attribute mutation recorded by [`MemoryElement`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttributeChange {
    /// `set_attribute(name, value)`
    Set(String, String),
    /// `remove_attribute(name)` on a present attribute
    Removed(String),
}

/// An in-memory [`Element`].
///
/// Create one with [`MemoryElement::new`]; elements are always handled
/// through `Arc` so that dispatched events can carry their target.
pub struct MemoryElement {
    tag: String,
    self_ref: Weak<MemoryElement>,
    value: RwLock<String>,
    connected: AtomicBool,
    attributes: RwLock<BTreeMap<String, String>>,
    attribute_log: Mutex<Vec<AttributeChange>>,
    listeners: Mutex<SlotMap<ListenerId, (DomEventKind, DomListener)>>,
    parent: RwLock<Weak<MemoryElement>>,
    children: RwLock<Vec<Arc<MemoryElement>>>,
}

impl MemoryElement {
    /// Create a detached-from-parent element with the given tag.
    pub fn new(tag: impl Into<String>) -> Arc<Self> {
        let tag = tag.into();
        Arc::new_cyclic(|self_ref| Self {
            tag,
            self_ref: self_ref.clone(),
            value: RwLock::new(String::new()),
            connected: AtomicBool::new(true),
            attributes: RwLock::new(BTreeMap::new()),
            attribute_log: Mutex::new(Vec::new()),
            listeners: Mutex::new(SlotMap::with_key()),
            parent: RwLock::new(Weak::new()),
            children: RwLock::new(Vec::new()),
        })
    }

    /// Create an `<input>` element.
    pub fn input() -> Arc<Self> {
        Self::new("input")
    }

    /// The element's tag name.
    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// Append `child` to `parent`.
    pub fn append_child(parent: &Arc<Self>, child: Arc<Self>) {
        *child.parent.write() = Arc::downgrade(parent);
        parent.children.write().push(child);
    }

    /// This element as an [`ElementRef`].
    pub fn as_element(self: &Arc<Self>) -> ElementRef {
        self.clone()
    }

    /// Replace the text without dispatching anything.
    pub fn set_value(&self, text: impl Into<String>) {
        *self.value.write() = text.into();
    }

    /// Replace the text and dispatch `input`, as typing would.
    pub fn type_text(&self, text: impl Into<String>) {
        self.set_value(text);
        self.dispatch(DomEventKind::Input);
    }

    /// Dispatch `blur`.
    pub fn blur(&self) {
        self.dispatch(DomEventKind::Blur);
    }

    /// Dispatch an event to the listeners registered for `kind`.
    ///
    /// Listeners run with the listener table unlocked.
    pub fn dispatch(&self, kind: DomEventKind) {
        let Some(target) = self.self_ref.upgrade() else {
            return;
        };
        let listeners: Vec<DomListener> = self
            .listeners
            .lock()
            .values()
            .filter(|(k, _)| *k == kind)
            .map(|(_, listener)| listener.clone())
            .collect();
        let event = DomEvent {
            kind,
            target,
        };
        for listener in listeners {
            listener(&event);
        }
    }

    /// Remove the element (and its subtree) from the document.
    pub fn detach(&self) {
        self.mark_disconnected();
        if let Some(parent) = self.parent.read().upgrade() {
            parent
                .children
                .write()
                .retain(|child| !std::ptr::eq(Arc::as_ptr(child), self));
        }
    }

    fn mark_disconnected(&self) {
        self.connected.store(false, Ordering::SeqCst);
        for child in self.children.read().iter() {
            child.mark_disconnected();
        }
    }

    /// Whether the element is still in the document.
    pub fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }

    /// Number of registered listeners for `kind`.
    pub fn listener_count(&self, kind: DomEventKind) -> usize {
        self.listeners
            .lock()
            .values()
            .filter(|(k, _)| *k == kind)
            .count()
    }

    /// Every attribute mutation so far, oldest first.
    pub fn attribute_log(&self) -> Vec<AttributeChange> {
        self.attribute_log.lock().clone()
    }
}

impl Element for MemoryElement {
    fn value(&self) -> Option<String> {
        self.is_connected().then(|| self.value.read().clone())
    }

    fn set_text(&self, text: &str) {
        self.set_value(text);
    }

    fn dispatch_event(&self, kind: DomEventKind) {
        self.dispatch(kind);
    }

    fn attribute(&self, name: &str) -> Option<String> {
        self.attributes.read().get(name).cloned()
    }

    fn set_attribute(&self, name: &str, value: &str) {
        self.attributes.write().insert(name.to_owned(), value.to_owned());
        self.attribute_log
            .lock()
            .push(AttributeChange::Set(name.to_owned(), value.to_owned()));
    }

    fn remove_attribute(&self, name: &str) {
        if self.attributes.write().remove(name).is_some() {
            self.attribute_log
                .lock()
                .push(AttributeChange::Removed(name.to_owned()));
        }
    }

    fn parent(&self) -> Option<ElementRef> {
        self.parent.read().upgrade().map(|parent| parent as ElementRef)
    }

    fn children(&self) -> Vec<ElementRef> {
        self.children
            .read()
            .iter()
            .map(|child| child.clone() as ElementRef)
            .collect()
    }

    fn add_event_listener(&self, kind: DomEventKind, listener: DomListener) -> ListenerId {
        self.listeners.lock().insert((kind, listener))
    }

    fn remove_event_listener(&self, id: ListenerId) -> bool {
        self.listeners.lock().remove(id).is_some()
    }
}

impl fmt::Debug for MemoryElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemoryElement")
            .field("tag", &self.tag)
            .field("value", &*self.value.read())
            .field("connected", &self.is_connected())
            .field("attributes", &*self.attributes.read())
            .finish()
    }
}

static_assertions::assert_impl_all!(MemoryElement: Send, Sync);
