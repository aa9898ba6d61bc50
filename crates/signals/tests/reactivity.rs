use signals::{Effect, Signal, Trigger, is_tracking, untrack};
use std::cell::{Cell, RefCell};
use std::rc::Rc;

fn counter() -> Rc<Cell<u32>> {
    Rc::new(Cell::new(0))
}

#[test]
fn effect_runs_immediately_and_on_change() {
    let s = Signal::new(1);
    let runs = counter();
    let _e = Effect::new({
        let s = s.clone();
        let runs = runs.clone();
        move || {
            s.get();
            runs.set(runs.get() + 1);
        }
    });
    assert_eq!(runs.get(), 1);
    assert!(s.set(2));
    assert_eq!(runs.get(), 2);
}

#[test]
fn equal_write_does_not_notify() {
    let s = Signal::new("a".to_string());
    let runs = counter();
    let _e = Effect::new({
        let s = s.clone();
        let runs = runs.clone();
        move || {
            s.get();
            runs.set(runs.get() + 1);
        }
    });
    assert!(!s.set("a".to_string()));
    assert_eq!(runs.get(), 1);
}

#[test]
fn untracked_reads_are_not_dependencies() {
    let a = Signal::new(0);
    let b = Signal::new(0);
    let runs = counter();
    let _e = Effect::new({
        let a = a.clone();
        let b = b.clone();
        let runs = runs.clone();
        move || {
            a.get();
            untrack(|| {
                assert!(!is_tracking());
                b.get()
            });
            runs.set(runs.get() + 1);
        }
    });
    b.set(1);
    assert_eq!(runs.get(), 1);
    a.set(1);
    assert_eq!(runs.get(), 2);
}

#[test]
fn dependencies_are_recollected_each_run() {
    let flag = Signal::new(true);
    let a = Signal::new(0);
    let b = Signal::new(0);
    let runs = counter();
    let _e = Effect::new({
        let (flag, a, b, runs) = (flag.clone(), a.clone(), b.clone(), runs.clone());
        move || {
            if flag.get() { a.get() } else { b.get() };
            runs.set(runs.get() + 1);
        }
    });
    flag.set(false);
    assert_eq!(runs.get(), 2);
    a.set(5);
    assert_eq!(runs.get(), 2, "a is no longer a dependency");
    b.set(5);
    assert_eq!(runs.get(), 3);
}

#[test]
fn dropping_effect_stops_it() {
    let s = Signal::new(0);
    let runs = counter();
    let e = Effect::new({
        let s = s.clone();
        let runs = runs.clone();
        move || {
            s.get();
            runs.set(runs.get() + 1);
        }
    });
    drop(e);
    s.set(1);
    assert_eq!(runs.get(), 1);
    assert_eq!(s.subscriber_count(), 0);
}

#[test]
fn self_invalidating_effect_reruns_after_current_run() {
    let s = Signal::new(0);
    let seen = Rc::new(RefCell::new(Vec::new()));
    let _e = Effect::new({
        let s = s.clone();
        let seen = seen.clone();
        move || {
            let v = s.get();
            seen.borrow_mut().push(v);
            if v < 3 {
                s.set(v + 1);
            }
        }
    });
    assert_eq!(*seen.borrow(), vec![0, 1, 2, 3]);
}

#[test]
fn trigger_notifies_without_equality_check() {
    let t = Trigger::new();
    let runs = counter();
    let _e = Effect::new({
        let t = t.clone();
        let runs = runs.clone();
        move || {
            t.track();
            runs.set(runs.get() + 1);
        }
    });
    t.notify();
    t.notify();
    assert_eq!(runs.get(), 3);
    assert_eq!(t.subscriber_count(), 1);
}

#[test]
fn nested_effect_restores_outer_observer() {
    let outer_dep = Signal::new(0);
    let inner_dep = Signal::new(0);
    let outer_runs = counter();
    let inner_holder: Rc<RefCell<Vec<Effect>>> = Rc::new(RefCell::new(Vec::new()));
    let _outer = Effect::new({
        let (outer_dep, inner_dep, outer_runs, holder) = (
            outer_dep.clone(),
            inner_dep.clone(),
            outer_runs.clone(),
            inner_holder.clone(),
        );
        move || {
            let inner_dep = inner_dep.clone();
            holder.borrow_mut().push(Effect::new(move || {
                inner_dep.get();
            }));
            outer_dep.get();
            outer_runs.set(outer_runs.get() + 1);
        }
    });
    inner_dep.set(1);
    assert_eq!(outer_runs.get(), 1);
    outer_dep.set(1);
    assert_eq!(outer_runs.get(), 2);
}
