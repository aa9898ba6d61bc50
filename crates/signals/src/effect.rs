use crate::observer::{ObserverScope, Subscribers};
use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

/// Upper bound on back-to-back re-runs caused by an effect invalidating
/// itself. Hitting it almost always means the effect writes a value it reads.
const MAX_RERUNS: u32 = 100;

/// A computation that re-runs when the signals it read change.
///
/// The effect runs once on creation. It stops when dropped or disposed, so
/// callers keep the handle alive for as long as the effect should react
/// (bind it to a named variable, not `_`).
pub struct Effect {
    inner: Rc<EffectInner>,
}

impl Effect {
    pub fn new(f: impl FnMut() + 'static) -> Self {
        let inner = Rc::new(EffectInner {
            f: RefCell::new(Box::new(f)),
            sources: RefCell::new(Vec::new()),
            running: Cell::new(false),
            dirty: Cell::new(false),
            disposed: Cell::new(false),
        });
        inner.run();
        Self { inner }
    }

    /// Stops the effect and drops its dependencies.
    pub fn dispose(&self) {
        self.inner.disposed.set(true);
        self.inner.clear_sources();
    }

    pub fn is_disposed(&self) -> bool {
        self.inner.disposed.get()
    }

    /// Number of sources recorded during the last run.
    pub fn dependency_count(&self) -> usize {
        self.inner
            .sources
            .borrow()
            .iter()
            .filter(|s| s.strong_count() > 0)
            .count()
    }
}

impl Drop for Effect {
    fn drop(&mut self) {
        self.dispose();
    }
}

pub(crate) struct EffectInner {
    f: RefCell<Box<dyn FnMut()>>,
    sources: RefCell<Vec<Weak<Subscribers>>>,
    running: Cell<bool>,
    dirty: Cell<bool>,
    disposed: Cell<bool>,
}

impl EffectInner {
    pub(crate) fn add_source(&self, source: Weak<Subscribers>) {
        let mut sources = self.sources.borrow_mut();
        if !sources.iter().any(|s| Weak::ptr_eq(s, &source)) {
            sources.push(source);
        }
    }

    fn clear_sources(&self) {
        let sources = std::mem::take(&mut *self.sources.borrow_mut());
        for source in sources {
            if let Some(source) = source.upgrade() {
                source.unsubscribe(self as *const EffectInner);
            }
        }
    }

    pub(crate) fn run(self: &Rc<Self>) {
        if self.disposed.get() {
            return;
        }
        if self.running.get() {
            // Invalidated by its own run; picked up by the loop below.
            self.dirty.set(true);
            return;
        }
        self.running.set(true);
        let mut reruns = 0;
        loop {
            self.dirty.set(false);
            self.clear_sources();
            {
                let _scope = ObserverScope::enter(Some(Rc::clone(self)));
                (&mut *self.f.borrow_mut())();
            }
            if !self.dirty.get() || self.disposed.get() {
                break;
            }
            reruns += 1;
            if reruns >= MAX_RERUNS {
                log::warn!(
                    target: "signals",
                    "effect invalidated itself {MAX_RERUNS} times in a row; giving up"
                );
                break;
            }
        }
        self.running.set(false);
    }
}
