use std::fmt;
use std::rc::Rc;
use std::sync::Arc;

/// Event passed to listeners by `dispatch_event`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Event {
    pub kind: Arc<str>,
}

impl Event {
    pub fn new(kind: &str) -> Self {
        Self {
            kind: Arc::from(kind),
        }
    }
}

/// Shared event callback.
///
/// Clones share identity: two callbacks are equal only if they wrap the same
/// closure allocation.
#[derive(Clone)]
pub struct Callback {
    f: Rc<dyn Fn(&Event)>,
    label: Option<Arc<str>>,
}

impl Callback {
    pub fn new(f: impl Fn(&Event) + 'static) -> Self {
        Self {
            f: Rc::new(f),
            label: None,
        }
    }

    /// A callback carrying the source text it was compiled from.
    pub fn labeled(label: &str, f: impl Fn(&Event) + 'static) -> Self {
        Self {
            f: Rc::new(f),
            label: Some(Arc::from(label)),
        }
    }

    pub fn call(&self, event: &Event) {
        (self.f)(event)
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    pub fn ptr_eq(&self, other: &Callback) -> bool {
        Rc::ptr_eq(&self.f, &other.f)
    }
}

impl PartialEq for Callback {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl fmt::Debug for Callback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.label {
            Some(label) => write!(f, "Callback({label:?})"),
            None => f.write_str("Callback(<native>)"),
        }
    }
}

/// Dynamically typed property value.
///
/// Attribute-backed properties accept typed values from property writes and
/// `Str`/`Null` from the attribute path, so the store has to hold either.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum Value {
    #[default]
    Undefined,
    Null,
    Bool(bool),
    Number(f64),
    Str(String),
    Function(Callback),
}

impl Value {
    /// Attribute values are a string when present and `Null` when absent.
    pub fn from_attribute(value: Option<&str>) -> Self {
        match value {
            Some(s) => Value::Str(s.to_string()),
            None => Value::Null,
        }
    }

    pub fn is_nullish(&self) -> bool {
        matches!(self, Value::Undefined | Value::Null)
    }

    pub fn is_undefined(&self) -> bool {
        matches!(self, Value::Undefined)
    }

    /// `true` for the inputs the attribute path can produce.
    pub fn is_attribute_like(&self) -> bool {
        matches!(self, Value::Str(_) | Value::Null)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_function(&self) -> Option<&Callback> {
        match self {
            Value::Function(cb) => Some(cb),
            _ => None,
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Undefined => "undefined",
            Value::Null => "null",
            Value::Bool(_) => "boolean",
            Value::Number(_) => "number",
            Value::Str(_) => "string",
            Value::Function(_) => "function",
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Undefined => f.write_str("undefined"),
            Value::Null => f.write_str("null"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Number(n) if n.is_nan() => f.write_str("NaN"),
            Value::Number(n) if n.is_infinite() => {
                f.write_str(if *n > 0.0 { "Infinity" } else { "-Infinity" })
            }
            Value::Number(n) => write!(f, "{n}"),
            Value::Str(s) => f.write_str(s),
            Value::Function(cb) => write!(f, "{cb:?}"),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Number(n as f64)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<Callback> for Value {
    fn from(cb: Callback) -> Self {
        Value::Function(cb)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        match v {
            Some(v) => v.into(),
            None => Value::Null,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nan_is_not_equal_to_itself() {
        assert_ne!(Value::Number(f64::NAN), Value::Number(f64::NAN));
        assert_eq!(Value::Number(1.0), Value::from(1));
    }

    #[test]
    fn callbacks_compare_by_identity() {
        let a = Callback::new(|_| {});
        let b = Callback::new(|_| {});
        assert_eq!(Value::from(a.clone()), Value::from(a.clone()));
        assert_ne!(Value::from(a), Value::from(b));
    }

    #[test]
    fn attribute_values_map_to_str_or_null() {
        assert_eq!(Value::from_attribute(Some("x")), Value::from("x"));
        assert_eq!(Value::from_attribute(None), Value::Null);
        assert!(Value::Null.is_attribute_like());
        assert!(!Value::Undefined.is_attribute_like());
    }

    #[test]
    fn display_follows_script_number_formatting() {
        assert_eq!(Value::Number(f64::NAN).to_string(), "NaN");
        assert_eq!(Value::Number(456.0).to_string(), "456");
        assert_eq!(Value::Number(f64::NEG_INFINITY).to_string(), "-Infinity");
    }
}
