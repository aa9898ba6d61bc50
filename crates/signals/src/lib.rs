//! # signals
//!
//! Synchronous, single-threaded fine-grained reactivity.
//!
//! - [`Signal`]: a value cell; reads inside an [`Effect`] register a
//!   dependency, writes of a different value notify dependents.
//! - [`Trigger`]: a dependency without a value, for state kept elsewhere.
//! - [`Effect`]: runs immediately and again, synchronously, whenever one of
//!   the signals it read during its last run changes.
//! - [`untrack`]: runs a closure with dependency tracking suspended.
//!
//! Notifications are not batched: a write re-runs dependents before the
//! writing call returns.
//!
//! ```
//! use signals::{Effect, Signal};
//! use std::cell::Cell;
//! use std::rc::Rc;
//!
//! let count = Signal::new(1);
//! let seen = Rc::new(Cell::new(0));
//! let _effect = Effect::new({
//!     let count = count.clone();
//!     let seen = seen.clone();
//!     move || seen.set(count.get())
//! });
//! count.set(5);
//! assert_eq!(seen.get(), 5);
//! ```

mod effect;
mod observer;
mod signal;

pub use effect::Effect;
pub use observer::{is_tracking, untrack};
pub use signal::{Signal, Trigger};
