//! Property interceptor: the single read/write path for reactive and
//! attribute-backed properties.
//!
//! Writes from the attribute path arrive as `Str`/`Null`; writes from script
//! may be any value. Both land here, so a string assigned to the property
//! coerces exactly like the attribute would, and `Null` restores the default
//! exactly like removing the attribute.

use crate::attribute_map::AttributePropSpec;
use crate::instance::InstanceState;
use core_types::Value;
use dom::Element;
use signals::untrack;
use std::fmt;
use std::rc::Rc;
use std::sync::Arc;

/// How the property was declared, fixed when the class is built.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PropertyKind {
    /// Class field or auto-accessor; the core owns the storage.
    Field,
    /// Author getter/setter pair; the author owns the storage.
    Accessor,
}

pub type Getter = Rc<dyn Fn(&Element) -> Value>;
pub type Setter = Rc<dyn Fn(&Element, Value)>;

pub(crate) enum Storage {
    Signal,
    Slot,
    Delegate { get: Getter, set: Setter },
}

pub(crate) struct PropertyDef {
    pub(crate) key: Arc<str>,
    pub(crate) kind: PropertyKind,
    storage: Storage,
    /// Only consulted for `Delegate`: reads track and writes notify a trigger.
    reactive: bool,
    pub(crate) attribute: Option<Rc<AttributePropSpec>>,
}

impl fmt::Debug for PropertyDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let storage = match self.storage {
            Storage::Signal => "signal",
            Storage::Slot => "slot",
            Storage::Delegate { .. } => "delegate",
        };
        f.debug_struct("PropertyDef")
            .field("key", &self.key)
            .field("kind", &self.kind)
            .field("storage", &storage)
            .field("attribute", &self.attribute.as_ref().map(|s| &s.attribute))
            .finish()
    }
}

impl PropertyDef {
    pub(crate) fn field(
        key: Arc<str>,
        signal: bool,
        attribute: Option<Rc<AttributePropSpec>>,
    ) -> Self {
        Self {
            key,
            kind: PropertyKind::Field,
            storage: if signal { Storage::Signal } else { Storage::Slot },
            reactive: signal,
            attribute,
        }
    }

    pub(crate) fn accessor(
        key: Arc<str>,
        get: Getter,
        set: Setter,
        reactive: bool,
        attribute: Option<Rc<AttributePropSpec>>,
    ) -> Self {
        Self {
            key,
            kind: PropertyKind::Accessor,
            storage: Storage::Delegate { get, set },
            reactive,
            attribute,
        }
    }

    pub(crate) fn is_attribute_interceptor(&self) -> bool {
        self.attribute.is_some()
    }

    pub(crate) fn is_signal_backed(&self) -> bool {
        matches!(self.storage, Storage::Signal)
    }

    pub(crate) fn get(&self, element: &Element) -> Value {
        let Some(state) = InstanceState::of(element) else {
            return Value::Undefined;
        };
        match &self.storage {
            Storage::Signal => state.signal(&self.key).get(),
            Storage::Slot => state.slot(&self.key),
            Storage::Delegate { get, .. } => {
                if self.reactive {
                    state.trigger(&self.key).track();
                }
                get(element)
            }
        }
    }

    /// Assignment from script or from `attributeChangedCallback`.
    pub(crate) fn set(&self, element: &Element, value: Value) {
        let value = match &self.attribute {
            Some(spec) if value.is_attribute_like() => spec.handle_attribute_value(value),
            _ => value,
        };
        let Some(state) = InstanceState::of(element) else {
            log::debug!(target: "elements", "write to {} before construction dropped", self.key);
            return;
        };
        state.mark_assigned(&self.key);
        self.run_side_effect(element, &value);
        self.store(element, &state, value);
    }

    /// Construction-time write of the initial value: no coercion, not counted
    /// as an assignment, author setters are not called.
    pub(crate) fn initialize(&self, element: &Element, state: &InstanceState, value: Value) {
        self.run_side_effect(element, &value);
        match &self.storage {
            Storage::Delegate { .. } => {
                if self.reactive {
                    state.trigger(&self.key);
                }
            }
            _ => self.store(element, state, value),
        }
    }

    /// Current value without registering a dependency.
    pub(crate) fn peek(&self, element: &Element) -> Value {
        untrack(|| self.get(element))
    }

    fn run_side_effect(&self, element: &Element, value: &Value) {
        let Some(effect) = self
            .attribute
            .as_ref()
            .and_then(|spec| spec.handler.side_effect.clone())
        else {
            return;
        };
        untrack(|| effect(element, &self.key, value));
    }

    fn store(&self, element: &Element, state: &InstanceState, value: Value) {
        match &self.storage {
            Storage::Signal => state.write_signal(&self.key, value),
            Storage::Slot => state.write_slot(&self.key, value),
            Storage::Delegate { set, .. } => {
                set(element, value);
                if self.reactive {
                    state.trigger(&self.key).notify();
                }
            }
        }
    }
}
