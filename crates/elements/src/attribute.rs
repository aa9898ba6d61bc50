//! Attribute handlers: how an attribute string becomes a property value.
//!
//! A handler bundles the string -> value coercion (`from`), an optional
//! default used when the attribute is removed, an optional side effect run on
//! every resolved write, and the options that derive the attribute name.

use crate::naming;
use core_types::{Callback, Value};
use dom::Element;
use std::fmt;
use std::rc::Rc;

pub type FromAttribute = Rc<dyn Fn(&str) -> Value>;
pub type ToAttribute = Rc<dyn Fn(&Value) -> Option<String>>;
pub type SideEffect = Rc<dyn Fn(&Element, &str, &Value)>;

#[derive(Clone)]
pub struct AttributeHandler {
    /// Attribute string to property value. Identity when `None`.
    pub from: Option<FromAttribute>,
    /// Property value to attribute string. Kept for reflection, which is not
    /// performed at runtime.
    pub to: Option<ToAttribute>,
    /// Value used when the attribute is removed. When `None` the property's
    /// initial value is captured on first instantiation instead.
    pub default: Option<Value>,
    pub side_effect: Option<SideEffect>,
    pub dashcase: bool,
    /// Explicit attribute name, overriding derivation from the property name.
    pub name: Option<String>,
    /// Suppress attribute-name collision warnings for this property.
    pub no_warn: bool,
}

impl Default for AttributeHandler {
    fn default() -> Self {
        Self {
            from: None,
            to: None,
            default: None,
            side_effect: None,
            dashcase: true,
            name: None,
            no_warn: false,
        }
    }
}

impl fmt::Debug for AttributeHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AttributeHandler")
            .field("from", &self.from.is_some())
            .field("default", &self.default)
            .field("side_effect", &self.side_effect.is_some())
            .field("dashcase", &self.dashcase)
            .field("name", &self.name)
            .field("no_warn", &self.no_warn)
            .finish()
    }
}

impl AttributeHandler {
    pub fn with_from(mut self, from: impl Fn(&str) -> Value + 'static) -> Self {
        self.from = Some(Rc::new(from));
        self
    }

    pub fn with_default(mut self, default: impl Into<Value>) -> Self {
        self.default = Some(default.into());
        self
    }

    pub fn with_side_effect(mut self, f: impl Fn(&Element, &str, &Value) + 'static) -> Self {
        self.side_effect = Some(Rc::new(f));
        self
    }

    pub fn named(mut self, name: &str) -> Self {
        self.name = Some(name.to_string());
        self
    }

    pub fn dashcase(mut self, dashcase: bool) -> Self {
        self.dashcase = dashcase;
        self
    }

    pub fn no_warn(mut self) -> Self {
        self.no_warn = true;
        self
    }

    /// Coerces an attribute string. Never fails; bad input yields whatever
    /// the coercion naturally produces (`NaN` for numbers).
    pub fn parse(&self, raw: &str) -> Value {
        match &self.from {
            Some(from) => from(raw),
            None => Value::Str(raw.to_string()),
        }
    }

    pub fn to_attribute(&self, value: &Value) -> Option<String> {
        match &self.to {
            Some(to) => to(value),
            None => (!value.is_nullish()).then(|| value.to_string()),
        }
    }

    pub fn attribute_name_for(&self, property: &str) -> String {
        naming::attribute_name(property, self.name.as_deref(), self.dashcase)
    }
}

/// Turns inline handler source (`onclick="..."`) into a callable.
pub trait ScriptCompiler {
    fn compile(&self, source: &str) -> Callback;
}

/// Compiler used by [`event`]: the host has no script engine, so the
/// callback only records that it ran.
#[derive(Clone, Copy, Debug, Default)]
pub struct InertScriptCompiler;

impl ScriptCompiler for InertScriptCompiler {
    fn compile(&self, source: &str) -> Callback {
        let src = source.to_string();
        Callback::labeled(source, move |event| {
            log::debug!(target: "elements", "inline {} handler invoked: {src}", event.kind);
        })
    }
}

/// Attribute passed through unchanged.
pub fn string() -> AttributeHandler {
    AttributeHandler {
        to: Some(Rc::new(|v: &Value| (!v.is_nullish()).then(|| v.to_string()))),
        ..AttributeHandler::default()
    }
}

/// Numeric coercion with script semantics: `""` is `0`, garbage is `NaN`.
pub fn number() -> AttributeHandler {
    AttributeHandler {
        to: Some(Rc::new(|v: &Value| (!v.is_nullish()).then(|| v.to_string()))),
        ..AttributeHandler::default()
    }
    .with_from(|s| Value::Number(to_number(s)))
}

/// Any string other than `"false"`, including the empty string, is `true`.
pub fn boolean() -> AttributeHandler {
    AttributeHandler {
        to: Some(Rc::new(|v: &Value| match v {
            Value::Bool(true) => Some(String::new()),
            _ => None,
        })),
        ..AttributeHandler::default()
    }
    .with_from(|s| Value::Bool(s != "false"))
}

/// Event handler property (`onfoo`) compiled with [`InertScriptCompiler`].
pub fn event() -> AttributeHandler {
    event_with(Rc::new(InertScriptCompiler))
}

/// Event handler property. The attribute string is compiled into a callback;
/// every write swaps the listener for the event named by the property
/// without its `on` prefix.
pub fn event_with(compiler: Rc<dyn ScriptCompiler>) -> AttributeHandler {
    AttributeHandler {
        dashcase: false,
        ..AttributeHandler::default()
    }
    .with_from(move |source| Value::Function(compiler.compile(source)))
    .with_side_effect(|element, property, value| {
        let event = naming::event_name(property);
        element.set_event_handler(property, &event, value.as_function().cloned());
    })
}

/// Script `Number(str)`: whitespace-trimmed, empty is zero, `0x`/`0o`/`0b`
/// prefixes, `Infinity`, and `NaN` for anything else.
pub fn to_number(raw: &str) -> f64 {
    let s = raw.trim_matches(|c: char| c.is_whitespace() || c == '\u{feff}');
    if s.is_empty() {
        return 0.0;
    }
    match s {
        "Infinity" | "+Infinity" => return f64::INFINITY,
        "-Infinity" => return f64::NEG_INFINITY,
        _ => {}
    }
    let radix = match s.get(..2) {
        Some("0x" | "0X") => 16,
        Some("0o" | "0O") => 8,
        Some("0b" | "0B") => 2,
        _ => 10,
    };
    if radix != 10 {
        let digits = &s[2..];
        if digits.is_empty() {
            return f64::NAN;
        }
        let mut acc = 0.0;
        for c in digits.chars() {
            match c.to_digit(radix) {
                Some(d) => acc = acc * radix as f64 + d as f64,
                None => return f64::NAN,
            }
        }
        return acc;
    }
    let decimal_chars = s
        .bytes()
        .all(|b| b.is_ascii_digit() || matches!(b, b'.' | b'e' | b'E' | b'+' | b'-'));
    if !decimal_chars {
        return f64::NAN;
    }
    s.parse::<f64>().unwrap_or(f64::NAN)
}
