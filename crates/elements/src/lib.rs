//! Attribute-backed reactive properties for custom elements.
//!
//! A class built with [`ClassBuilder`] implements
//! [`dom::CustomElementDefinition`]. Its annotated members become properties
//! that can be written both as typed values and as attribute strings, and
//! both paths normalise through one handler and one backing store.
//!
//! Invariants:
//! - Attribute maps and observed-attribute lists are immutable once a class is
//!   built; subclasses get their own level and never touch an ancestor's.
//! - An attribute handler's removal default is resolved once, on the first
//!   instantiation of the declaring class.
//! - Side effects, lifecycle hooks and construction run untracked.
//! - A pre-upgrade value is re-applied at most once, and never over a write
//!   made after construction.

pub mod attribute;
mod attribute_map;
mod class;
mod config;
mod error;
mod instance;
mod lifecycle;
mod member;
pub mod naming;
mod property;
mod upgrade;
mod warning;

pub use attribute::{AttributeHandler, ScriptCompiler};
pub use attribute_map::{AttributeMap, AttributePropSpec};
pub use class::{AttributeChangedHook, ClassBuilder, ElementClass, LifecycleHook};
pub use config::ElementsConfig;
pub use error::{ElementError, Result};
pub use member::{Initializer, Member, MemberKind};
pub use property::{Getter, PropertyKind, Setter};
pub use upgrade::pending_pre_upgrade_keys;
pub use warning::ConfigWarning;
