//! Inheritable attribute name -> property mapping.
//!
//! Each class that registers attribute-backed properties owns one
//! [`AttributeMap`] level holding only its own registrations plus a pointer to
//! the nearest ancestor's level. Lookups walk the chain, so a subclass can add
//! or override entries without touching its ancestors' maps, and classes that
//! register nothing share their parent's level.

use crate::attribute::AttributeHandler;
use crate::property::PropertyKind;
use core_types::Value;
use indexmap::IndexMap;
use std::cell::OnceCell;
use std::fmt;
use std::rc::Rc;
use std::sync::Arc;

/// One (attribute, property) registration of one class.
pub struct AttributePropSpec {
    /// Property name.
    pub name: Arc<str>,
    pub attribute: Arc<str>,
    pub handler: Rc<AttributeHandler>,
    pub kind: PropertyKind,
    default: OnceCell<Value>,
}

impl AttributePropSpec {
    pub(crate) fn new(
        name: Arc<str>,
        attribute: Arc<str>,
        handler: Rc<AttributeHandler>,
        kind: PropertyKind,
    ) -> Self {
        Self {
            name,
            attribute,
            handler,
            kind,
            default: OnceCell::new(),
        }
    }

    /// Fixes the removal default the first time it is called: the handler's
    /// explicit default, else `initial` unless it is `Undefined`, else the
    /// kind's empty value. Later calls return the first result.
    pub(crate) fn resolve_default(&self, initial: &Value) -> &Value {
        self.default.get_or_init(|| match &self.handler.default {
            Some(explicit) => explicit.clone(),
            None if !initial.is_undefined() => initial.clone(),
            None => self.fallback_default(),
        })
    }

    pub fn is_default_resolved(&self) -> bool {
        self.default.get().is_some()
    }

    /// Value the property takes when its attribute is absent.
    pub fn default_value(&self) -> Value {
        match self.default.get() {
            Some(v) => v.clone(),
            None => self
                .handler
                .default
                .clone()
                .unwrap_or_else(|| self.fallback_default()),
        }
    }

    fn fallback_default(&self) -> Value {
        match self.kind {
            PropertyKind::Field => Value::Null,
            PropertyKind::Accessor => Value::Undefined,
        }
    }

    /// Normalises an attribute-path input: `Null` becomes the default, a
    /// string runs through the handler's coercion.
    pub fn handle_attribute_value(&self, value: Value) -> Value {
        match value {
            Value::Null => self.default_value(),
            Value::Str(raw) => self.handler.parse(&raw),
            other => other,
        }
    }
}

impl fmt::Debug for AttributePropSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AttributePropSpec")
            .field("name", &self.name)
            .field("attribute", &self.attribute)
            .field("kind", &self.kind)
            .field("default", &self.default.get())
            .finish()
    }
}

#[derive(Default)]
pub struct AttributeMap {
    own: IndexMap<Arc<str>, Rc<AttributePropSpec>>,
    parent: Option<Rc<AttributeMap>>,
}

impl AttributeMap {
    pub(crate) fn child_of(parent: Option<Rc<AttributeMap>>) -> Self {
        Self {
            own: IndexMap::new(),
            parent,
        }
    }

    pub(crate) fn insert(&mut self, spec: Rc<AttributePropSpec>) {
        self.own.insert(Arc::clone(&spec.attribute), spec);
    }

    pub fn parent(&self) -> Option<&Rc<AttributeMap>> {
        self.parent.as_ref()
    }

    pub fn own_len(&self) -> usize {
        self.own.len()
    }

    /// Nearest registration for `attribute`.
    pub fn lookup(&self, attribute: &str) -> Option<&Rc<AttributePropSpec>> {
        let mut level = Some(self);
        while let Some(map) = level {
            if let Some(spec) = map.own.get(attribute) {
                return Some(spec);
            }
            level = map.parent.as_deref();
        }
        None
    }

    /// Nearest registration whose property is `property`. Within one level
    /// the latest registration wins.
    pub fn lookup_property(&self, property: &str) -> Option<&Rc<AttributePropSpec>> {
        let mut level = Some(self);
        while let Some(map) = level {
            if let Some(spec) = map.own.values().rev().find(|s| &*s.name == property) {
                return Some(spec);
            }
            level = map.parent.as_deref();
        }
        None
    }

    /// Every attribute name in the chain, root level first, deduplicated.
    pub fn attribute_names(&self) -> Vec<Arc<str>> {
        let mut levels = Vec::new();
        let mut level = Some(self);
        while let Some(map) = level {
            levels.push(map);
            level = map.parent.as_deref();
        }
        let mut names: Vec<Arc<str>> = Vec::new();
        for map in levels.into_iter().rev() {
            for name in map.own.keys() {
                if !names.contains(name) {
                    names.push(Arc::clone(name));
                }
            }
        }
        names
    }
}

impl fmt::Debug for AttributeMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AttributeMap")
            .field("own", &self.own.keys().collect::<Vec<_>>())
            .field("parent", &self.parent)
            .finish()
    }
}
