//! Custom element reactions for built classes.
//!
//! Construction order per element:
//! 1. fresh instance state is attached
//! 2. pre-upgrade own data properties are captured
//! 3. members are initialized class by class, root first
//!
//! All of it runs untracked, so creating an element inside an effect never
//! makes that effect depend on the element's properties.

use crate::class::{ClassProperty, ElementClass};
use crate::instance::InstanceState;
use crate::member::{Initializer, Member, MemberKind};
use crate::upgrade;
use core_types::{PropKey, Value};
use dom::{CustomElementDefinition, Element, PropertyWrite};
use signals::untrack;
use std::any::Any;
use std::rc::Rc;
use std::sync::Arc;

impl CustomElementDefinition for ElementClass {
    fn observed_attributes(&self) -> &[Arc<str>] {
        &self.observed
    }

    fn is_observed(&self, name: &str) -> bool {
        self.observed.iter().any(|a| a.eq_ignore_ascii_case(name))
    }

    fn construct(&self, element: &Element) {
        untrack(|| {
            let state = Rc::new(InstanceState::default());
            element.set_instance_state(Rc::clone(&state) as Rc<dyn Any>);
            upgrade::capture(element, &state);
            for class in self.chain() {
                for member in &class.members {
                    self.initialize_member(class, member, element, &state);
                }
            }
        });
        log::trace!(target: "elements", "constructed <{}> #{} as {}", element.tag_name(), element.id(), self.name);
    }

    fn attribute_changed(
        &self,
        element: &Element,
        name: &str,
        old_value: Option<&str>,
        new_value: Option<&str>,
    ) {
        if let Some(hook) = self.nearest_hook(|h| h.attribute_changed.clone()) {
            untrack(|| hook(element, name, old_value, new_value));
        }
        let Some(spec) = self.attribute_spec(name) else {
            return;
        };
        let value = Value::from_attribute(new_value);
        untrack(|| element.set(PropKey::Name(Arc::clone(&spec.name)), value));
    }

    fn connected(&self, element: &Element) {
        element.reattach_event_handlers();
        if let Some(hook) = self.nearest_hook(|h| h.connected.clone()) {
            untrack(|| hook(element));
        }
    }

    fn disconnected(&self, element: &Element) {
        element.detach_event_handlers();
        if let Some(hook) = self.nearest_hook(|h| h.disconnected.clone()) {
            untrack(|| hook(element));
        }
    }

    fn has_accessor(&self, key: &PropKey) -> bool {
        matches!(
            self.resolve(key),
            Some(ClassProperty::Reactive(_) | ClassProperty::Accessor { .. })
        )
    }

    fn get_property(&self, element: &Element, key: &PropKey) -> Option<Value> {
        match self.resolve(key)? {
            ClassProperty::Reactive(def) => Some(def.get(element)),
            ClassProperty::Accessor { get, .. } => Some(get(element)),
            ClassProperty::Method(body) => Some(Value::Function(body.clone())),
        }
    }

    fn set_property(&self, element: &Element, key: &PropKey, value: Value) -> PropertyWrite {
        match self.resolve(key) {
            Some(ClassProperty::Reactive(def)) => {
                let def = Rc::clone(def);
                def.set(element, value);
                PropertyWrite::Handled
            }
            Some(ClassProperty::Accessor { set: Some(set), .. }) => {
                let set = Rc::clone(set);
                set(element, value);
                PropertyWrite::Handled
            }
            Some(ClassProperty::Accessor { set: None, .. }) => {
                log::debug!(target: "elements", "{}: ignoring write to getter-only {key}", self.name);
                PropertyWrite::Handled
            }
            // Assigning over a method shadows it on the instance.
            Some(ClassProperty::Method(_)) | None => PropertyWrite::Unhandled(value),
        }
    }
}

impl ElementClass {
    /// Runs one member's initializer. `class` is the class declaring the
    /// member; storage goes through the most-derived definition of the key.
    fn initialize_member(
        &self,
        class: &ElementClass,
        member: &Member,
        element: &Element,
        state: &InstanceState,
    ) {
        let key = member.key();
        let live = self.resolve_reactive(key);
        match class.properties.get(key) {
            Some(ClassProperty::Reactive(own)) => {
                let initial = match member.initializer() {
                    Some(Initializer::Inherited) => live.as_ref().unwrap_or(own).peek(element),
                    Some(init) => evaluate(init, element),
                    None => own.peek(element),
                };
                if let Some(spec) = &own.attribute {
                    spec.resolve_default(&initial);
                }
                if matches!(member.initializer(), Some(Initializer::Inherited)) && initial.is_undefined() {
                    return;
                }
                let target = live.as_ref().unwrap_or(own);
                target.initialize(element, state, initial);
            }
            Some(ClassProperty::Accessor { .. } | ClassProperty::Method(_)) => {}
            None => {
                let MemberKind::Field(init) = &member.kind else {
                    return;
                };
                let value = evaluate(init, element);
                match live {
                    // A plain field redeclaring an inherited reactive property
                    // keeps the inherited interceptor.
                    Some(def) => def.initialize(element, state, value),
                    None => element.define_own_data(key.clone(), value),
                }
            }
        }
    }
}

fn evaluate(init: &Initializer, element: &Element) -> Value {
    match init {
        Initializer::Value(v) => v.clone(),
        Initializer::Compute(f) => f(element),
        Initializer::Inherited => Value::Undefined,
    }
}
