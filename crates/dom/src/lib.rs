//! Minimal DOM host for custom elements.
//!
//! Only the parts of the platform the element core talks to are modelled:
//! - element nodes with attributes, own properties and event listeners
//! - a custom element registry with upgrade of already-created elements
//! - a microtask queue drained at explicit checkpoints
//! - connection to a flat document body
//!
//! Invariants:
//! - Element and attribute names are canonical ASCII-lowercase.
//! - No `RefCell` borrow of element state is held while calling into a
//!   [`CustomElementDefinition`]; definitions may freely re-enter the element.
//! - Own properties shadow whatever the definition provides for the same key.

mod definition;
mod document;
mod element;
mod error;
mod microtask;

pub use definition::{CustomElementDefinition, PropertyWrite};
pub use document::{Document, DocumentConfig};
pub use element::{Element, OwnAccessor, WeakElement};
pub use error::DomError;
pub use microtask::MicrotaskQueue;
