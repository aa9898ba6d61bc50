use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};

static NEXT_SYMBOL: AtomicU32 = AtomicU32::new(1);

/// Unique, non-string property key.
///
/// Two symbols created with the same description are still distinct.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct SymbolKey {
    id: u32,
    description: Arc<str>,
}

impl SymbolKey {
    pub fn new(description: &str) -> Self {
        Self {
            id: NEXT_SYMBOL.fetch_add(1, Ordering::Relaxed),
            description: Arc::from(description),
        }
    }

    pub fn description(&self) -> &str {
        &self.description
    }
}

/// Property key on an element instance or class.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum PropKey {
    Name(Arc<str>),
    Symbol(SymbolKey),
}

impl PropKey {
    pub fn name(name: &str) -> Self {
        PropKey::Name(Arc::from(name))
    }

    /// Returns the string name, or `None` for symbol keys.
    pub fn as_name(&self) -> Option<&str> {
        match self {
            PropKey::Name(name) => Some(name),
            PropKey::Symbol(_) => None,
        }
    }

    pub fn is_symbol(&self) -> bool {
        matches!(self, PropKey::Symbol(_))
    }
}

impl fmt::Display for PropKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropKey::Name(name) => f.write_str(name),
            PropKey::Symbol(sym) => write!(f, "Symbol({})", sym.description),
        }
    }
}

impl From<&str> for PropKey {
    fn from(name: &str) -> Self {
        PropKey::name(name)
    }
}

impl From<String> for PropKey {
    fn from(name: String) -> Self {
        PropKey::Name(Arc::from(name))
    }
}

impl From<Arc<str>> for PropKey {
    fn from(name: Arc<str>) -> Self {
        PropKey::Name(name)
    }
}

impl From<SymbolKey> for PropKey {
    fn from(sym: SymbolKey) -> Self {
        PropKey::Symbol(sym)
    }
}
