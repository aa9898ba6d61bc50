//! Leaf types shared by the signal store, the DOM host and the element core.

mod key;
mod value;

pub use key::{PropKey, SymbolKey};
pub use value::{Callback, Event, Value};

pub type ElementId = u32;
