use dom::DomError;
use thiserror::Error;

/// Configuration errors raised while building a class. They are never
/// recovered internally.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ElementError {
    #[error("{class}: symbol-keyed member {key} cannot be reactive or attribute-backed")]
    SymbolKey { class: String, key: String },

    #[error("{class}: private member {key} cannot be reactive or attribute-backed")]
    PrivateMember { class: String, key: String },

    #[error("{class}: static member {key} cannot be reactive or attribute-backed")]
    StaticMember { class: String, key: String },

    #[error("{class}: {key} is a method; only fields, accessors and getter/setter pairs can be reactive")]
    UnsupportedMember { class: String, key: String },

    #[error("{class}: {key} is read-only; attribute-backed and reactive properties must be writable")]
    ReadOnly { class: String, key: String },

    #[error("{class}: member {key} is declared more than once")]
    DuplicateMember { class: String, key: String },

    #[error("{class} has no element name to define")]
    MissingElementName { class: String },

    #[error(transparent)]
    Dom(#[from] DomError),
}

pub type Result<T> = std::result::Result<T, ElementError>;
