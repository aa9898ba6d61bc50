//! Tracking context and subscriber bookkeeping.

use crate::effect::EffectInner;
use std::cell::RefCell;
use std::rc::{Rc, Weak};

thread_local! {
    static OBSERVER: RefCell<Option<Rc<EffectInner>>> = const { RefCell::new(None) };
}

/// Restores the previous observer when dropped, so a panicking closure does
/// not leave a stale observer installed.
pub(crate) struct ObserverScope {
    prev: Option<Rc<EffectInner>>,
}

impl ObserverScope {
    pub(crate) fn enter(observer: Option<Rc<EffectInner>>) -> Self {
        let prev = OBSERVER.with(|o| o.replace(observer));
        Self { prev }
    }
}

impl Drop for ObserverScope {
    fn drop(&mut self) {
        let prev = self.prev.take();
        OBSERVER.with(|o| *o.borrow_mut() = prev);
    }
}

fn current_observer() -> Option<Rc<EffectInner>> {
    OBSERVER.with(|o| o.borrow().clone())
}

/// Returns `true` while an effect is collecting dependencies.
pub fn is_tracking() -> bool {
    OBSERVER.with(|o| o.borrow().is_some())
}

/// Runs `f` without registering any reads as dependencies of the
/// surrounding effect.
pub fn untrack<R>(f: impl FnOnce() -> R) -> R {
    let _scope = ObserverScope::enter(None);
    f()
}

/// Effects depending on one source.
#[derive(Default)]
pub(crate) struct Subscribers {
    list: RefCell<Vec<Weak<EffectInner>>>,
}

impl Subscribers {
    /// Registers the current observer, if any, as a dependent.
    pub(crate) fn track(self: &Rc<Self>) {
        let Some(observer) = current_observer() else {
            return;
        };
        {
            let mut list = self.list.borrow_mut();
            let already = list
                .iter()
                .any(|w| std::ptr::eq(w.as_ptr(), Rc::as_ptr(&observer)));
            if already {
                return;
            }
            list.push(Rc::downgrade(&observer));
        }
        observer.add_source(Rc::downgrade(self));
    }

    /// Re-runs every live dependent, in subscription order.
    pub(crate) fn notify(&self) {
        let snapshot: Vec<Rc<EffectInner>> = {
            let mut list = self.list.borrow_mut();
            list.retain(|w| w.strong_count() > 0);
            list.iter().filter_map(Weak::upgrade).collect()
        };
        for effect in snapshot {
            effect.run();
        }
    }

    pub(crate) fn unsubscribe(&self, effect: *const EffectInner) {
        self.list
            .borrow_mut()
            .retain(|w| !std::ptr::eq(w.as_ptr(), effect));
    }

    pub(crate) fn len(&self) -> usize {
        self.list
            .borrow()
            .iter()
            .filter(|w| w.strong_count() > 0)
            .count()
    }
}
