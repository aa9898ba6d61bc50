//! Pre-upgrade value reconciliation.
//!
//! An element node can exist before its class is defined. Script writes to it
//! in that window land as plain own data properties, which would shadow the
//! class's accessors forever once the element upgrades. Construction captures
//! and removes them first; a microtask per captured key then re-assigns the
//! value through whatever accessor now exists.
//!
//! States per key: captured -> (untouched | overwritten) -> reconciled.
//! The store entry is removed before the re-assignment, so a key is applied at
//! most once.

use crate::instance::InstanceState;
use core_types::PropKey;
use dom::Element;
use std::rc::Rc;

/// Moves the element's own data properties into the pre-upgrade store and
/// queues their reconciliation. Must run before any field initializer.
pub(crate) fn capture(element: &Element, state: &Rc<InstanceState>) {
    let captured = element.take_own_data_properties();
    if captured.is_empty() {
        return;
    }
    log::debug!(
        target: "elements",
        "<{}> #{}: captured {} pre-upgrade value(s)",
        element.tag_name(),
        element.id(),
        captured.len()
    );
    let keys: Vec<PropKey> = captured.iter().map(|(k, _)| k.clone()).collect();
    state.pre_upgrade.borrow_mut().extend(captured);

    for key in keys {
        let weak = element.downgrade();
        element.queue_microtask(move || {
            // An element dropped before the checkpoint has nothing to restore.
            if let Some(element) = weak.upgrade() {
                reconcile(&element, &key);
            }
        });
    }
}

/// Re-applies one captured value.
///
/// Skipped when the property was assigned through its interceptor since
/// construction (the newer write wins), when a plain own data property with
/// the same key was defined again in the meantime, or when the definition has
/// no accessor for the key to route the value through.
pub(crate) fn reconcile(element: &Element, key: &PropKey) {
    let Some(state) = InstanceState::of(element) else {
        return;
    };
    let Some(value) = state.pre_upgrade.borrow_mut().shift_remove(key) else {
        return;
    };
    if state.was_assigned(key) {
        log::debug!(target: "elements", "pre-upgrade value for {key} superseded by a later write");
        return;
    }
    if element.has_own_data(key) {
        log::debug!(target: "elements", "pre-upgrade value for {key} superseded by an own property");
        return;
    }
    let routed = element
        .definition()
        .is_some_and(|definition| definition.has_accessor(key));
    if !routed {
        log::debug!(target: "elements", "pre-upgrade value for {key} dropped: no accessor to route it through");
        return;
    }
    element.set(key.clone(), value);
}

/// Keys still waiting for reconciliation.
pub fn pending_pre_upgrade_keys(element: &Element) -> Vec<PropKey> {
    InstanceState::of(element)
        .map(|state| state.pre_upgrade.borrow().keys().cloned().collect())
        .unwrap_or_default()
}
