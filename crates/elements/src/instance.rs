//! Per-element backing storage owned by the element core.

use core_types::{PropKey, Value};
use dom::Element;
use indexmap::IndexMap;
use signals::{Signal, Trigger};
use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::rc::Rc;
use std::sync::Arc;

#[derive(Default)]
pub(crate) struct InstanceState {
    signals: RefCell<HashMap<Arc<str>, Signal<Value>>>,
    slots: RefCell<HashMap<Arc<str>, Value>>,
    triggers: RefCell<HashMap<Arc<str>, Trigger>>,
    /// Properties written through an interceptor since construction.
    assigned: RefCell<HashSet<Arc<str>>>,
    /// Own data properties captured from the un-upgraded element.
    pub(crate) pre_upgrade: RefCell<IndexMap<PropKey, Value>>,
}

impl InstanceState {
    pub(crate) fn of(element: &Element) -> Option<Rc<InstanceState>> {
        element.instance_state::<InstanceState>()
    }

    /// The property's signal, created holding `Undefined` on first use so a
    /// read before any write still registers a dependency.
    pub(crate) fn signal(&self, key: &Arc<str>) -> Signal<Value> {
        self.signals
            .borrow_mut()
            .entry(Arc::clone(key))
            .or_insert_with(|| Signal::new(Value::Undefined))
            .clone()
    }

    /// The map borrow is released before `set` notifies dependents.
    pub(crate) fn write_signal(&self, key: &Arc<str>, value: Value) {
        let signal = self.signal(key);
        signal.set(value);
    }

    pub(crate) fn slot(&self, key: &str) -> Value {
        self.slots.borrow().get(key).cloned().unwrap_or_default()
    }

    pub(crate) fn write_slot(&self, key: &Arc<str>, value: Value) {
        self.slots.borrow_mut().insert(Arc::clone(key), value);
    }

    pub(crate) fn trigger(&self, key: &Arc<str>) -> Trigger {
        self.triggers
            .borrow_mut()
            .entry(Arc::clone(key))
            .or_default()
            .clone()
    }

    pub(crate) fn mark_assigned(&self, key: &Arc<str>) {
        self.assigned.borrow_mut().insert(Arc::clone(key));
    }

    pub(crate) fn was_assigned(&self, key: &PropKey) -> bool {
        match key.as_name() {
            Some(name) => self.assigned.borrow().contains(name),
            None => false,
        }
    }
}
