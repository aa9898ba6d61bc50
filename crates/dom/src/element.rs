use crate::definition::{CustomElementDefinition, PropertyWrite};
use crate::microtask::MicrotaskQueue;
use core_types::{Callback, ElementId, Event, PropKey, Value};
use indexmap::IndexMap;
use std::any::Any;
use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};
use std::sync::Arc;

/// Getter/setter pair installed directly on one element instance.
#[derive(Clone)]
pub struct OwnAccessor {
    pub get: Rc<dyn Fn(&Element) -> Value>,
    pub set: Option<Rc<dyn Fn(&Element, Value)>>,
}

#[derive(Clone)]
enum OwnProperty {
    Data(Value),
    Accessor(OwnAccessor),
}

struct Listener {
    kind: Arc<str>,
    callback: Callback,
}

/// Listener installed on behalf of an `on*` property.
struct HandlerBinding {
    event: Arc<str>,
    callback: Callback,
}

pub(crate) struct ElementData {
    id: ElementId,
    tag: Arc<str>,
    attributes: RefCell<Vec<(Arc<str>, String)>>,
    own: RefCell<IndexMap<PropKey, OwnProperty>>,
    listeners: RefCell<Vec<Listener>>,
    handlers: RefCell<IndexMap<Arc<str>, HandlerBinding>>,
    handlers_detached: Cell<bool>,
    connected: Cell<bool>,
    definition: RefCell<Option<Rc<dyn CustomElementDefinition>>>,
    state: RefCell<Option<Rc<dyn Any>>>,
    microtasks: MicrotaskQueue,
}

/// Shared handle to an element node. Clones refer to the same node.
#[derive(Clone)]
pub struct Element {
    data: Rc<ElementData>,
}

/// Non-owning element handle, used by deferred work that must not keep an
/// element alive.
#[derive(Clone)]
pub struct WeakElement {
    data: Weak<ElementData>,
}

impl WeakElement {
    pub fn upgrade(&self) -> Option<Element> {
        self.data.upgrade().map(|data| Element { data })
    }
}

impl PartialEq for Element {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.data, &other.data)
    }
}

impl fmt::Debug for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Element")
            .field("id", &self.data.id)
            .field("tag", &self.data.tag)
            .field("upgraded", &self.is_upgraded())
            .field("connected", &self.is_connected())
            .finish()
    }
}

impl Element {
    pub(crate) fn new(id: ElementId, tag: Arc<str>, microtasks: MicrotaskQueue) -> Self {
        Self {
            data: Rc::new(ElementData {
                id,
                tag,
                attributes: RefCell::new(Vec::new()),
                own: RefCell::new(IndexMap::new()),
                listeners: RefCell::new(Vec::new()),
                handlers: RefCell::new(IndexMap::new()),
                handlers_detached: Cell::new(false),
                connected: Cell::new(false),
                definition: RefCell::new(None),
                state: RefCell::new(None),
                microtasks,
            }),
        }
    }

    pub fn id(&self) -> ElementId {
        self.data.id
    }

    pub fn tag_name(&self) -> &str {
        &self.data.tag
    }

    pub fn downgrade(&self) -> WeakElement {
        WeakElement {
            data: Rc::downgrade(&self.data),
        }
    }

    pub fn is_connected(&self) -> bool {
        self.data.connected.get()
    }

    pub(crate) fn set_connected(&self, connected: bool) {
        self.data.connected.set(connected);
    }

    pub fn is_upgraded(&self) -> bool {
        self.data.definition.borrow().is_some()
    }

    pub fn definition(&self) -> Option<Rc<dyn CustomElementDefinition>> {
        self.data.definition.borrow().clone()
    }

    /// Runs the upgrade steps: construct, replay present observed attributes,
    /// then `connected` if already in the document. No-op if already upgraded.
    pub(crate) fn upgrade(&self, definition: Rc<dyn CustomElementDefinition>) {
        if self.is_upgraded() {
            return;
        }
        *self.data.definition.borrow_mut() = Some(Rc::clone(&definition));
        log::debug!(target: "dom", "upgrading <{}> #{}", self.data.tag, self.data.id);
        definition.construct(self);

        let present: Vec<(Arc<str>, String)> = self
            .data
            .attributes
            .borrow()
            .iter()
            .filter(|(name, _)| definition.is_observed(name))
            .cloned()
            .collect();
        for (name, value) in present {
            definition.attribute_changed(self, &name, None, Some(&value));
        }

        if self.is_connected() {
            definition.connected(self);
        }
    }

    // --- attributes -------------------------------------------------------

    pub fn get_attribute(&self, name: &str) -> Option<String> {
        let name = name.to_ascii_lowercase();
        self.data
            .attributes
            .borrow()
            .iter()
            .find(|(n, _)| **n == *name)
            .map(|(_, v)| v.clone())
    }

    pub fn has_attribute(&self, name: &str) -> bool {
        self.get_attribute(name).is_some()
    }

    pub fn attribute_names(&self) -> Vec<Arc<str>> {
        self.data
            .attributes
            .borrow()
            .iter()
            .map(|(n, _)| Arc::clone(n))
            .collect()
    }

    pub fn set_attribute(&self, name: &str, value: &str) {
        let name: Arc<str> = Arc::from(name.to_ascii_lowercase());
        let old = {
            let mut attrs = self.data.attributes.borrow_mut();
            match attrs.iter_mut().find(|(n, _)| *n == name) {
                Some((_, existing)) => Some(std::mem::replace(existing, value.to_string())),
                None => {
                    attrs.push((Arc::clone(&name), value.to_string()));
                    None
                }
            }
        };
        self.attribute_changed(&name, old.as_deref(), Some(value));
    }

    pub fn remove_attribute(&self, name: &str) {
        let name = name.to_ascii_lowercase();
        let old = {
            let mut attrs = self.data.attributes.borrow_mut();
            let Some(pos) = attrs.iter().position(|(n, _)| **n == *name) else {
                return;
            };
            attrs.remove(pos).1
        };
        self.attribute_changed(&name, Some(&old), None);
    }

    fn attribute_changed(&self, name: &str, old: Option<&str>, new: Option<&str>) {
        let Some(definition) = self.definition() else {
            return;
        };
        if definition.is_observed(name) {
            log::trace!(target: "dom", "attributeChanged <{}> {name}: {old:?} -> {new:?}", self.data.tag);
            definition.attribute_changed(self, name, old, new);
        }
    }

    // --- properties -------------------------------------------------------

    /// Property read: own property, then the definition, else `Undefined`.
    pub fn get(&self, key: impl Into<PropKey>) -> Value {
        let key = key.into();
        let own = self.data.own.borrow().get(&key).cloned();
        match own {
            Some(OwnProperty::Data(value)) => value,
            Some(OwnProperty::Accessor(accessor)) => (accessor.get)(self),
            None => self
                .definition()
                .and_then(|def| def.get_property(self, &key))
                .unwrap_or_default(),
        }
    }

    /// Property write: own property, then the definition, else a new own data
    /// property.
    pub fn set(&self, key: impl Into<PropKey>, value: impl Into<Value>) {
        let key = key.into();
        let value = value.into();
        let own_setter = {
            let mut own = self.data.own.borrow_mut();
            match own.get_mut(&key) {
                Some(OwnProperty::Data(slot)) => {
                    *slot = value;
                    return;
                }
                Some(OwnProperty::Accessor(accessor)) => Some(accessor.set.clone()),
                None => None,
            }
        };
        match own_setter {
            Some(Some(set)) => set(self, value),
            Some(None) => {
                log::debug!(target: "dom", "ignoring write to getter-only own property {key}");
            }
            None => {
                let value = match self.definition() {
                    Some(def) => match def.set_property(self, &key, value) {
                        PropertyWrite::Handled => return,
                        PropertyWrite::Unhandled(value) => value,
                    },
                    None => value,
                };
                self.data.own.borrow_mut().insert(key, OwnProperty::Data(value));
            }
        }
    }

    pub fn define_own_accessor(&self, key: impl Into<PropKey>, accessor: OwnAccessor) {
        self.data
            .own
            .borrow_mut()
            .insert(key.into(), OwnProperty::Accessor(accessor));
    }

    pub fn define_own_data(&self, key: impl Into<PropKey>, value: impl Into<Value>) {
        self.data
            .own
            .borrow_mut()
            .insert(key.into(), OwnProperty::Data(value.into()));
    }

    pub fn has_own_data(&self, key: &PropKey) -> bool {
        matches!(self.data.own.borrow().get(key), Some(OwnProperty::Data(_)))
    }

    pub fn has_own_property(&self, key: &PropKey) -> bool {
        self.data.own.borrow().contains_key(key)
    }

    pub fn delete_own(&self, key: &PropKey) -> bool {
        self.data.own.borrow_mut().shift_remove(key).is_some()
    }

    /// Removes every own data property and returns them in insertion order.
    /// Own accessors stay in place.
    pub fn take_own_data_properties(&self) -> Vec<(PropKey, Value)> {
        let mut own = self.data.own.borrow_mut();
        let keys: Vec<PropKey> = own
            .iter()
            .filter(|(_, p)| matches!(p, OwnProperty::Data(_)))
            .map(|(k, _)| k.clone())
            .collect();
        keys.into_iter()
            .filter_map(|key| match own.shift_remove(&key) {
                Some(OwnProperty::Data(value)) => Some((key, value)),
                _ => None,
            })
            .collect()
    }

    pub fn own_keys(&self) -> Vec<PropKey> {
        self.data.own.borrow().keys().cloned().collect()
    }

    // --- per-instance state owned by the definition ------------------------

    pub fn set_instance_state(&self, state: Rc<dyn Any>) {
        *self.data.state.borrow_mut() = Some(state);
    }

    pub fn instance_state<T: 'static>(&self) -> Option<Rc<T>> {
        let state = self.data.state.borrow().clone()?;
        state.downcast::<T>().ok()
    }

    pub fn queue_microtask(&self, task: impl FnOnce() + 'static) {
        self.data.microtasks.queue(task);
    }

    // --- events -----------------------------------------------------------

    pub fn add_event_listener(&self, kind: &str, callback: Callback) {
        let mut listeners = self.data.listeners.borrow_mut();
        let duplicate = listeners
            .iter()
            .any(|l| &*l.kind == kind && l.callback.ptr_eq(&callback));
        if !duplicate {
            listeners.push(Listener {
                kind: Arc::from(kind),
                callback,
            });
        }
    }

    pub fn remove_event_listener(&self, kind: &str, callback: &Callback) {
        self.data
            .listeners
            .borrow_mut()
            .retain(|l| !(&*l.kind == kind && l.callback.ptr_eq(callback)));
    }

    pub fn listener_count(&self, kind: &str) -> usize {
        self.data
            .listeners
            .borrow()
            .iter()
            .filter(|l| &*l.kind == kind)
            .count()
    }

    /// Invokes listeners for `kind` in registration order. Returns how many ran.
    pub fn dispatch_event(&self, kind: &str) -> usize {
        let event = Event::new(kind);
        let callbacks: Vec<Callback> = self
            .data
            .listeners
            .borrow()
            .iter()
            .filter(|l| &*l.kind == kind)
            .map(|l| l.callback.clone())
            .collect();
        for callback in &callbacks {
            callback.call(&event);
        }
        callbacks.len()
    }

    /// Replaces the listener bound to `property` (an `on*` handler property).
    ///
    /// The previous callback is removed from `event` listeners; the new one is
    /// added unless handlers are currently detached.
    pub fn set_event_handler(&self, property: &str, event: &str, callback: Option<Callback>) {
        let previous = self.data.handlers.borrow_mut().shift_remove(property);
        if let Some(previous) = previous {
            self.remove_event_listener(&previous.event, &previous.callback);
        }
        let Some(callback) = callback else {
            return;
        };
        if !self.data.handlers_detached.get() {
            self.add_event_listener(event, callback.clone());
        }
        self.data.handlers.borrow_mut().insert(
            Arc::from(property),
            HandlerBinding {
                event: Arc::from(event),
                callback,
            },
        );
    }

    /// Removes every handler-property listener, keeping the bindings so they
    /// can be re-attached.
    pub fn detach_event_handlers(&self) {
        if self.data.handlers_detached.replace(true) {
            return;
        }
        let bound: Vec<(Arc<str>, Callback)> = self
            .data
            .handlers
            .borrow()
            .values()
            .map(|b| (Arc::clone(&b.event), b.callback.clone()))
            .collect();
        for (event, callback) in bound {
            self.remove_event_listener(&event, &callback);
        }
    }

    pub fn reattach_event_handlers(&self) {
        if !self.data.handlers_detached.replace(false) {
            return;
        }
        let bound: Vec<(Arc<str>, Callback)> = self
            .data
            .handlers
            .borrow()
            .values()
            .map(|b| (Arc::clone(&b.event), b.callback.clone()))
            .collect();
        for (event, callback) in bound {
            self.add_event_listener(&event, callback);
        }
    }
}
