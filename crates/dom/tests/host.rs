use core_types::{Callback, PropKey, Value};
use dom::{CustomElementDefinition, Document, DomError, Element, OwnAccessor, PropertyWrite};
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::sync::Arc;

/// Definition that records every reaction and owns a single `level` property.
#[derive(Default)]
struct Recorder {
    observed: Vec<Arc<str>>,
    log: RefCell<Vec<String>>,
    level: RefCell<Value>,
}

impl Recorder {
    fn observing(names: &[&str]) -> Rc<Self> {
        Rc::new(Self {
            observed: names.iter().map(|n| Arc::from(*n)).collect(),
            ..Default::default()
        })
    }

    fn log(&self) -> Vec<String> {
        self.log.borrow().clone()
    }
}

impl CustomElementDefinition for Recorder {
    fn observed_attributes(&self) -> &[Arc<str>] {
        &self.observed
    }

    fn construct(&self, element: &Element) {
        self.log.borrow_mut().push(format!("construct #{}", element.id()));
    }

    fn attribute_changed(&self, _: &Element, name: &str, old: Option<&str>, new: Option<&str>) {
        self.log
            .borrow_mut()
            .push(format!("attr {name} {old:?} -> {new:?}"));
    }

    fn connected(&self, _: &Element) {
        self.log.borrow_mut().push("connected".into());
    }

    fn disconnected(&self, _: &Element) {
        self.log.borrow_mut().push("disconnected".into());
    }

    fn get_property(&self, _: &Element, key: &PropKey) -> Option<Value> {
        (key.as_name() == Some("level")).then(|| self.level.borrow().clone())
    }

    fn set_property(&self, _: &Element, key: &PropKey, value: Value) -> PropertyWrite {
        if key.as_name() == Some("level") {
            *self.level.borrow_mut() = value;
            PropertyWrite::Handled
        } else {
            PropertyWrite::Unhandled(value)
        }
    }
}

#[test]
fn define_upgrades_existing_elements_and_replays_attributes() {
    let doc = Document::new();
    let el = doc.create_element("X-Rec");
    assert_eq!(el.tag_name(), "x-rec");
    el.set_attribute("Mode", "fast");
    el.set_attribute("ignored", "1");
    doc.append(&el);
    assert!(!el.is_upgraded());

    let def = Recorder::observing(&["mode"]);
    doc.define("x-rec", def.clone()).unwrap();

    assert!(el.is_upgraded());
    assert_eq!(
        def.log(),
        vec![
            format!("construct #{}", el.id()),
            "attr mode None -> Some(\"fast\")".to_string(),
            "connected".to_string(),
        ]
    );
}

#[test]
fn set_attribute_always_reacts_remove_only_when_present() {
    let doc = Document::new();
    let def = Recorder::observing(&["mode"]);
    doc.define("x-rec", def.clone()).unwrap();
    let el = doc.create_element("x-rec");

    el.set_attribute("mode", "a");
    el.set_attribute("mode", "a");
    el.remove_attribute("mode");
    el.remove_attribute("mode");

    assert_eq!(
        def.log()[1..],
        [
            "attr mode None -> Some(\"a\")".to_string(),
            "attr mode Some(\"a\") -> Some(\"a\")".to_string(),
            "attr mode Some(\"a\") -> None".to_string(),
        ]
    );
}

#[test]
fn define_rejects_invalid_and_duplicate_names() {
    let doc = Document::new();
    assert_eq!(
        doc.define("nohyphen", Recorder::observing(&[])),
        Err(DomError::InvalidName("nohyphen".into()))
    );
    doc.define("x-a", Recorder::observing(&[])).unwrap();
    assert_eq!(
        doc.define("x-a", Recorder::observing(&[])),
        Err(DomError::AlreadyDefined("x-a".into()))
    );
}

#[test]
fn own_properties_shadow_the_definition() {
    let doc = Document::new();
    let el = doc.create_element("x-rec");
    el.set("level", 3);
    assert!(el.has_own_data(&PropKey::from("level")));

    doc.define("x-rec", Recorder::observing(&[])).unwrap();
    assert_eq!(el.get("level"), Value::from(3));

    let taken = el.take_own_data_properties();
    assert_eq!(taken, vec![(PropKey::from("level"), Value::from(3))]);
    assert_eq!(el.get("level"), Value::Undefined);
    el.set("level", 7);
    assert!(!el.has_own_data(&PropKey::from("level")));
    assert_eq!(el.get("level"), Value::from(7));
}

#[test]
fn own_accessors_survive_data_capture() {
    let doc = Document::new();
    let el = doc.create_element("x-plain");
    let store = Rc::new(Cell::new(0.0));
    el.define_own_accessor(
        "n",
        OwnAccessor {
            get: Rc::new({
                let store = store.clone();
                move |_| Value::Number(store.get())
            }),
            set: Some(Rc::new({
                let store = store.clone();
                move |_, v| store.set(v.as_number().unwrap_or(0.0))
            })),
        },
    );
    el.set("n", 4);
    el.set("other", "x");
    let taken = el.take_own_data_properties();
    assert_eq!(taken.len(), 1);
    assert_eq!(el.get("n"), Value::Number(4.0));
}

#[test]
fn event_handler_bindings_detach_and_reattach() {
    let doc = Document::new();
    let el = doc.create_element("x-plain");
    let hits = Rc::new(Cell::new(0));
    let cb = Callback::new({
        let hits = hits.clone();
        move |_| hits.set(hits.get() + 1)
    });
    el.set_event_handler("onping", "ping", Some(cb));
    assert_eq!(el.dispatch_event("ping"), 1);

    el.detach_event_handlers();
    assert_eq!(el.dispatch_event("ping"), 0);
    el.reattach_event_handlers();
    assert_eq!(el.dispatch_event("ping"), 1);

    el.set_event_handler("onping", "ping", None);
    assert_eq!(el.listener_count("ping"), 0);
    assert_eq!(hits.get(), 2);
}

#[test]
fn microtasks_drain_including_nested() {
    let doc = Document::new();
    let el = doc.create_element("x-plain");
    let order = Rc::new(RefCell::new(Vec::new()));
    {
        let order = order.clone();
        let el2 = el.clone();
        el.queue_microtask(move || {
            order.borrow_mut().push(1);
            let order = order.clone();
            el2.queue_microtask(move || order.borrow_mut().push(3));
        });
    }
    {
        let order = order.clone();
        el.queue_microtask(move || order.borrow_mut().push(2));
    }
    assert_eq!(doc.run_microtasks(), 3);
    assert_eq!(*order.borrow(), vec![1, 2, 3]);
    assert!(doc.microtasks().is_empty());
}
