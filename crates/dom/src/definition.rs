use crate::element::Element;
use core_types::{PropKey, Value};
use std::sync::Arc;

/// Result of offering a property write to a definition.
#[derive(Debug)]
pub enum PropertyWrite {
    /// The definition owns the key and consumed the value.
    Handled,
    /// The definition has nothing for this key; the value is handed back so the
    /// element can store it as an own property.
    Unhandled(Value),
}

/// Behaviour an upgraded element delegates to.
///
/// This is the seam between the host and a class system: the host calls these
/// reactions at the points the custom element lifecycle prescribes, the class
/// system decides what they mean.
pub trait CustomElementDefinition {
    /// Attribute names (lowercase) that trigger [`attribute_changed`](Self::attribute_changed).
    fn observed_attributes(&self) -> &[Arc<str>];

    fn is_observed(&self, name: &str) -> bool {
        self.observed_attributes().iter().any(|a| &**a == name)
    }

    /// Runs once per element, when it is created with the definition in place
    /// or when an existing element is upgraded.
    fn construct(&self, element: &Element);

    /// Called for observed attributes only. Invoked on every `set_attribute`,
    /// even when the value does not change.
    fn attribute_changed(
        &self,
        element: &Element,
        name: &str,
        old_value: Option<&str>,
        new_value: Option<&str>,
    );

    fn connected(&self, _element: &Element) {}

    fn disconnected(&self, _element: &Element) {}

    /// Whether the definition provides an accessor (or interceptor) for
    /// `key`, so a write to it is routed somewhere other than an own data
    /// property.
    fn has_accessor(&self, _key: &PropKey) -> bool {
        false
    }

    /// Class-level property read. `None` when the definition has no such key.
    fn get_property(&self, element: &Element, key: &PropKey) -> Option<Value>;

    /// Class-level property write.
    fn set_property(&self, element: &Element, key: &PropKey, value: Value) -> PropertyWrite;
}
