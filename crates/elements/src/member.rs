//! Class member declarations and their reactive annotations.

use crate::attribute::AttributeHandler;
use crate::property::{Getter, Setter};
use core_types::{Callback, PropKey, Value};
use dom::Element;
use std::rc::Rc;

/// Initial value of a field.
#[derive(Clone)]
pub enum Initializer {
    Value(Value),
    /// Evaluated once per instance, during construction.
    Compute(Rc<dyn Fn(&Element) -> Value>),
    /// Keep whatever an ancestor's initializer stored. Used for properties
    /// made attribute-backed only through a class-level handler map.
    Inherited,
}

#[derive(Clone)]
pub enum MemberKind {
    Field(Initializer),
    /// `accessor name = value`: field-like storage behind a getter/setter.
    AutoAccessor(Initializer),
    GetterSetter {
        get: Getter,
        set: Option<Setter>,
    },
    Method(Callback),
}

#[derive(Clone, Debug)]
pub(crate) enum Annotation {
    Attribute {
        handler: Option<AttributeHandler>,
        signal: bool,
    },
    Signal,
}

/// One class member. Built with the constructors below, then annotated.
///
/// ```
/// use elements::{Member, attribute};
///
/// let num = Member::field("num", 123).attribute(attribute::number());
/// let label = Member::field("label", "hi").signal();
/// ```
#[derive(Clone)]
pub struct Member {
    pub(crate) key: PropKey,
    pub(crate) kind: MemberKind,
    pub(crate) is_static: bool,
    pub(crate) is_private: bool,
    pub(crate) readonly: bool,
    pub(crate) annotation: Option<Annotation>,
}

impl Member {
    fn new(key: PropKey, kind: MemberKind) -> Self {
        Self {
            key,
            kind,
            is_static: false,
            is_private: false,
            readonly: false,
            annotation: None,
        }
    }

    pub fn field(key: impl Into<PropKey>, initial: impl Into<Value>) -> Self {
        Self::new(key.into(), MemberKind::Field(Initializer::Value(initial.into())))
    }

    pub fn field_with(key: impl Into<PropKey>, init: impl Fn(&Element) -> Value + 'static) -> Self {
        Self::new(key.into(), MemberKind::Field(Initializer::Compute(Rc::new(init))))
    }

    pub fn accessor(key: impl Into<PropKey>, initial: impl Into<Value>) -> Self {
        Self::new(
            key.into(),
            MemberKind::AutoAccessor(Initializer::Value(initial.into())),
        )
    }

    pub fn getter_setter(
        key: impl Into<PropKey>,
        get: impl Fn(&Element) -> Value + 'static,
        set: impl Fn(&Element, Value) + 'static,
    ) -> Self {
        Self::new(
            key.into(),
            MemberKind::GetterSetter {
                get: Rc::new(get),
                set: Some(Rc::new(set)),
            },
        )
    }

    /// Getter without a setter: read-only.
    pub fn getter(key: impl Into<PropKey>, get: impl Fn(&Element) -> Value + 'static) -> Self {
        Self::new(
            key.into(),
            MemberKind::GetterSetter {
                get: Rc::new(get),
                set: None,
            },
        )
    }

    pub fn method(key: impl Into<PropKey>, body: Callback) -> Self {
        Self::new(key.into(), MemberKind::Method(body))
    }

    pub fn static_member(mut self) -> Self {
        self.is_static = true;
        self
    }

    pub fn private(mut self) -> Self {
        self.is_private = true;
        self
    }

    /// Non-writable field.
    pub fn readonly(mut self) -> Self {
        self.readonly = true;
        self
    }

    /// Attribute-backed and signal-backed, with `handler` coercion.
    pub fn attribute(mut self, handler: AttributeHandler) -> Self {
        self.annotation = Some(Annotation::Attribute {
            handler: Some(handler),
            signal: true,
        });
        self
    }

    /// Attribute-backed with the identity handler.
    pub fn attribute_default(mut self) -> Self {
        self.annotation = Some(Annotation::Attribute {
            handler: None,
            signal: true,
        });
        self
    }

    /// Reactive without an attribute. On an attribute member this is already
    /// the default.
    pub fn signal(mut self) -> Self {
        match &mut self.annotation {
            Some(Annotation::Attribute { signal, .. }) => *signal = true,
            _ => self.annotation = Some(Annotation::Signal),
        }
        self
    }

    /// Attribute member stored in a plain slot instead of a signal.
    pub fn no_signal(mut self) -> Self {
        match &mut self.annotation {
            Some(Annotation::Attribute { signal, .. }) => *signal = false,
            Some(Annotation::Signal) => self.annotation = None,
            None => {}
        }
        self
    }

    pub fn key(&self) -> &PropKey {
        &self.key
    }

    pub(crate) fn is_annotated(&self) -> bool {
        self.annotation.is_some()
    }

    pub(crate) fn has_attribute_annotation(&self) -> bool {
        matches!(self.annotation, Some(Annotation::Attribute { .. }))
    }

    pub(crate) fn initializer(&self) -> Option<&Initializer> {
        match &self.kind {
            MemberKind::Field(init) | MemberKind::AutoAccessor(init) => Some(init),
            _ => None,
        }
    }
}
