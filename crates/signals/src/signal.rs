use crate::observer::Subscribers;
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

/// Reactive value cell. Clones share the same cell.
pub struct Signal<T> {
    inner: Rc<SignalInner<T>>,
}

struct SignalInner<T> {
    value: RefCell<T>,
    subscribers: Rc<Subscribers>,
}

impl<T> Clone for Signal<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Signal<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Signal").field(&*self.inner.value.borrow()).finish()
    }
}

impl<T: Clone + PartialEq + 'static> Signal<T> {
    pub fn new(value: T) -> Self {
        Self {
            inner: Rc::new(SignalInner {
                value: RefCell::new(value),
                subscribers: Rc::new(Subscribers::default()),
            }),
        }
    }

    /// Reads the value and registers a dependency on the running effect.
    pub fn get(&self) -> T {
        self.inner.subscribers.track();
        self.inner.value.borrow().clone()
    }

    pub fn get_untracked(&self) -> T {
        self.inner.value.borrow().clone()
    }

    /// Borrows the value without cloning it. Tracks like [`Signal::get`].
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        self.inner.subscribers.track();
        f(&self.inner.value.borrow())
    }

    /// Stores `value` and notifies dependents.
    ///
    /// Writing a value equal to the current one is a no-op. Returns whether
    /// the value changed.
    pub fn set(&self, value: T) -> bool {
        {
            let mut current = self.inner.value.borrow_mut();
            if *current == value {
                return false;
            }
            *current = value;
        }
        self.inner.subscribers.notify();
        true
    }

    pub fn update(&self, f: impl FnOnce(&mut T)) -> bool {
        let mut next = self.get_untracked();
        f(&mut next);
        self.set(next)
    }

    pub fn subscriber_count(&self) -> usize {
        self.inner.subscribers.len()
    }

    pub fn ptr_eq(&self, other: &Signal<T>) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

/// Dependency without a stored value.
///
/// Used when the state lives elsewhere (an author-provided getter/setter) but
/// reads and writes should still participate in tracking.
#[derive(Clone, Default)]
pub struct Trigger {
    subscribers: Rc<Subscribers>,
}

impl Trigger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn track(&self) {
        self.subscribers.track();
    }

    /// Notifies every dependent. Unlike [`Signal::set`] there is no equality
    /// check.
    pub fn notify(&self) {
        self.subscribers.notify();
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }
}

impl fmt::Debug for Trigger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Trigger")
            .field("subscribers", &self.subscribers.len())
            .finish()
    }
}
