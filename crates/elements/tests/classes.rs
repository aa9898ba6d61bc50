use core_types::{Callback, SymbolKey, Value};
use dom::{Document, DomError};
use elements::{
    ClassBuilder, ConfigWarning, ElementError, ElementsConfig, Member, attribute,
};
use std::cell::RefCell;
use std::rc::Rc;

fn names(list: &[std::sync::Arc<str>]) -> Vec<&str> {
    list.iter().map(|n| &**n).collect()
}

#[test]
fn subclass_default_does_not_leak_into_base() {
    let doc = Document::new();
    let base = ClassBuilder::new("Base")
        .member(Member::field("prop", "base").attribute(attribute::string()))
        .build()
        .unwrap();
    let sub = ClassBuilder::new("Sub")
        .extends(&base)
        .member(Member::field("prop", "sub").attribute(attribute::string()))
        .build()
        .unwrap();
    base.define_as(&doc, "x-base").unwrap();
    sub.define_as(&doc, "x-sub").unwrap();

    let s = doc.create_element("x-sub");
    assert_eq!(s.get("prop"), Value::from("sub"));
    s.set_attribute("prop", "other");
    s.remove_attribute("prop");
    assert_eq!(s.get("prop"), Value::from("sub"));

    let b = doc.create_element("x-base");
    assert_eq!(b.get("prop"), Value::from("base"));
    b.set_attribute("prop", "other");
    b.remove_attribute("prop");
    assert_eq!(b.get("prop"), Value::from("base"));

    assert!(sub
        .warnings()
        .iter()
        .any(|w| matches!(w, ConfigWarning::AttributeOverride { .. })));
}

#[test]
fn observed_attributes_are_copied_per_class() {
    let base = ClassBuilder::new("Base")
        .member(Member::field("num", 1).attribute(attribute::number()))
        .build()
        .unwrap();
    let sub = ClassBuilder::new("Sub")
        .extends(&base)
        .member(Member::field("extraValue", "").attribute(attribute::string()))
        .member(Member::field("NUM2", 0).attribute(attribute::number().named("Num")))
        .build()
        .unwrap();
    let leaf = ClassBuilder::new("Leaf")
        .extends(&sub)
        .member(Member::field("plain", 0))
        .build()
        .unwrap();

    assert_eq!(names(base.observed_attribute_names()), vec!["num"]);
    assert_eq!(names(sub.observed_attribute_names()), vec!["num", "extra-value"]);
    assert!(sub.owns_observed_attributes());
    assert!(!leaf.owns_observed_attributes());
    assert!(!leaf.has_own_attribute_map());
    assert!(sub.has_own_attribute_map());
    assert_eq!(names(leaf.observed_attribute_names()), vec!["num", "extra-value"]);

    // "num" now maps to NUM2 on Sub and below, but still to num on Base.
    assert_eq!(sub.property_for_attribute("num").as_deref(), Some("NUM2"));
    assert_eq!(base.property_for_attribute("num").as_deref(), Some("num"));
    assert!(base.attribute_spec("extra-value").is_none());
}

#[test]
fn renamed_attribute_in_subclass_keeps_both_names() {
    let doc = Document::new();
    let base = ClassBuilder::new("Base")
        .member(Member::field("num", 1).attribute(attribute::number()))
        .build()
        .unwrap();
    let sub = ClassBuilder::new("Sub")
        .extends(&base)
        .member(Member::field("num", 2).attribute(attribute::number().named("count")))
        .build()
        .unwrap();
    sub.define_as(&doc, "x-renamed").unwrap();
    assert_eq!(names(sub.observed_attribute_names()), vec!["num", "count"]);
    assert_eq!(names(base.observed_attribute_names()), vec!["num"]);

    let el = doc.create_element("x-renamed");
    assert_eq!(el.get("num"), Value::from(2));
    el.set_attribute("num", "5");
    assert_eq!(el.get("num"), Value::from(5));
    el.set_attribute("count", "6");
    assert_eq!(el.get("num"), Value::from(6));
    // The old name resolves through the subclass interceptor and default.
    el.remove_attribute("num");
    assert_eq!(el.get("num"), Value::from(2));
}

#[test]
fn differently_named_properties_sharing_an_attribute_warn() {
    let build = |config: ElementsConfig, no_warn: bool| {
        let mut handler = attribute::string().named("foo-bar");
        if no_warn {
            handler = handler.no_warn();
        }
        ClassBuilder::new("Clash")
            .with_config(config)
            .member(Member::field("fooBar", "").attribute(attribute::string()))
            .member(Member::field("other", "").attribute(handler))
            .build()
            .unwrap()
    };

    let class = build(ElementsConfig::default(), false);
    assert_eq!(class.warnings().len(), 1);
    assert!(class.warnings()[0].is_collision());
    // Last registration wins.
    assert_eq!(class.property_for_attribute("foo-bar").as_deref(), Some("other"));
    assert_eq!(names(class.observed_attribute_names()), vec!["foo-bar"]);

    assert!(build(ElementsConfig::default(), true).warnings().is_empty());
    let quiet = ElementsConfig {
        warn_collisions: false,
        ..ElementsConfig::default()
    };
    assert!(build(quiet, false).warnings().is_empty());
}

#[test]
fn handler_map_matches_member_annotations() {
    let doc = Document::new();
    let class = ClassBuilder::new("Mapped")
        .member(Member::field("count", 5))
        .observed_attribute_handlers([
            ("count", attribute::number()),
            ("isOpen", attribute::boolean().with_default(false)),
        ])
        .build()
        .unwrap();
    class.define_as(&doc, "x-mapped").unwrap();
    assert_eq!(names(class.observed_attribute_names()), vec!["count", "is-open"]);

    let el = doc.create_element("x-mapped");
    assert_eq!(el.get("count"), Value::from(5));
    el.set_attribute("count", "9");
    assert_eq!(el.get("count"), Value::from(9));
    el.remove_attribute("count");
    assert_eq!(el.get("count"), Value::from(5));

    assert_eq!(el.get("isOpen"), Value::Undefined);
    el.set_attribute("is-open", "");
    assert_eq!(el.get("isOpen"), Value::Bool(true));
    el.remove_attribute("is-open");
    assert_eq!(el.get("isOpen"), Value::Bool(false));
}

#[test]
fn handler_map_keeps_value_initialized_by_base_class() {
    let doc = Document::new();
    let base = ClassBuilder::new("Base").member(Member::field("level", 3)).build().unwrap();
    let sub = ClassBuilder::new("Sub")
        .extends(&base)
        .observed_attribute_handlers([("level", attribute::number())])
        .build()
        .unwrap();
    sub.define_as(&doc, "x-level").unwrap();

    let el = doc.create_element("x-level");
    assert_eq!(el.get("level"), Value::from(3));
    el.set_attribute("level", "8");
    assert_eq!(el.get("level"), Value::from(8));
    el.remove_attribute("level");
    assert_eq!(el.get("level"), Value::from(3));
}

#[test]
fn annotation_wins_over_handler_map() {
    let class = ClassBuilder::new("Mixed")
        .member(Member::field("size", 1).attribute(attribute::number().named("sz")))
        .observed_attribute_handlers([("size", attribute::string())])
        .build()
        .unwrap();
    assert_eq!(names(class.observed_attribute_names()), vec!["sz"]);
    assert!(matches!(
        class.warnings(),
        [ConfigWarning::MixedConfiguration { property, .. }] if property == "size"
    ));
}

#[test]
fn invalid_annotations_are_rejected() {
    let build = |member: Member| ClassBuilder::new("Bad").member(member).build().map(|_| ());

    assert!(matches!(
        build(Member::field(SymbolKey::new("s"), 1).attribute(attribute::number())),
        Err(ElementError::SymbolKey { .. })
    ));
    assert!(matches!(
        build(Member::field("secret", 1).private().attribute_default()),
        Err(ElementError::PrivateMember { .. })
    ));
    assert!(matches!(
        build(Member::field("shared", 1).static_member().signal()),
        Err(ElementError::StaticMember { .. })
    ));
    assert!(matches!(
        build(Member::method("run", Callback::new(|_| {})).attribute_default()),
        Err(ElementError::UnsupportedMember { .. })
    ));
    assert!(matches!(
        build(Member::getter("total", |_| Value::from(1)).attribute_default()),
        Err(ElementError::ReadOnly { .. })
    ));
    assert!(matches!(
        build(Member::field("fixed", 1).readonly().signal()),
        Err(ElementError::ReadOnly { .. })
    ));

    let err = ClassBuilder::new("Twice")
        .member(Member::field("a", 1))
        .member(Member::field("a", 2))
        .build()
        .unwrap_err();
    assert_eq!(
        err,
        ElementError::DuplicateMember {
            class: "Twice".into(),
            key: "a".into()
        }
    );
    assert_eq!(err.to_string(), "Twice: member a is declared more than once");
}

#[test]
fn handler_map_entries_are_validated_too() {
    let err = ClassBuilder::new("Bad")
        .member(Member::getter("total", |_| Value::from(1)))
        .observed_attribute_handlers([("total", attribute::number())])
        .build()
        .unwrap_err();
    assert!(matches!(err, ElementError::ReadOnly { .. }));
}

#[test]
fn define_needs_a_valid_element_name() {
    let doc = Document::new();
    let anonymous = ClassBuilder::new("Anon").build().unwrap();
    assert_eq!(
        anonymous.define(&doc),
        Err(ElementError::MissingElementName { class: "Anon".into() })
    );

    let bad = ClassBuilder::new("Bad").element_name("nodash").build().unwrap();
    assert_eq!(
        bad.define(&doc),
        Err(ElementError::Dom(DomError::InvalidName("nodash".into())))
    );
}

#[test]
fn finish_defines_unless_auto_define_is_off() {
    let doc = Document::new();
    let class = ClassBuilder::new("Auto").element_name("x-auto").finish(&doc).unwrap();
    assert!(doc.is_defined("x-auto"));
    assert_eq!(class.element_name().as_deref(), Some("x-auto"));

    // Same name again is skipped, not an error.
    ClassBuilder::new("Again").element_name("x-auto").finish(&doc).unwrap();

    ClassBuilder::new("Manual")
        .element_name("x-manual")
        .auto_define(false)
        .finish(&doc)
        .unwrap();
    assert!(!doc.is_defined("x-manual"));

    let off = ElementsConfig {
        auto_define: false,
        ..ElementsConfig::default()
    };
    ClassBuilder::new("Configured")
        .with_config(off)
        .element_name("x-configured")
        .finish(&doc)
        .unwrap();
    assert!(!doc.is_defined("x-configured"));

    // Statics are inherited, so a subclass shares the opt-out.
    let base = ClassBuilder::new("Base")
        .auto_define(false)
        .element_name("x-off")
        .build()
        .unwrap();
    let sub = ClassBuilder::new("Sub")
        .extends(&base)
        .element_name("x-off-sub")
        .finish(&doc)
        .unwrap();
    assert_eq!(sub.static_value("autoDefine"), Some(Value::Bool(false)));
    assert!(!doc.is_defined("x-off-sub"));
}

#[test]
fn lifecycle_hooks_run_nearest_first() {
    let log = Rc::new(RefCell::new(Vec::<String>::new()));
    let doc = Document::new();
    let base = ClassBuilder::new("Base")
        .member(Member::field("num", 0).attribute(attribute::number()))
        .on_attribute_changed({
            let log = log.clone();
            move |_, name, old, new| log.borrow_mut().push(format!("base {name} {old:?} {new:?}"))
        })
        .on_connected({
            let log = log.clone();
            move |_| log.borrow_mut().push("base connected".into())
        })
        .build()
        .unwrap();
    let sub = ClassBuilder::new("Sub")
        .extends(&base)
        .on_connected({
            let log = log.clone();
            move |el| log.borrow_mut().push(format!("sub connected num={}", el.get("num")))
        })
        .build()
        .unwrap();
    sub.define_as(&doc, "x-hooks").unwrap();

    let el = doc.create_element("x-hooks");
    el.set_attribute("num", "4");
    doc.append(&el);
    assert_eq!(
        *log.borrow(),
        vec![
            "base num None Some(\"4\")".to_string(),
            "sub connected num=4".to_string(),
        ]
    );
}

#[test]
fn unannotated_members_keep_their_plain_behaviour() {
    let doc = Document::new();
    let class = ClassBuilder::new("Plain")
        .member(Member::field("plain", 1))
        .member(Member::accessor("slot", 2))
        .member(Member::getter("double", |el| {
            Value::from(el.get("slot").as_number().unwrap_or_default() * 2.0)
        }))
        .member(Member::method("greet", Callback::labeled("greet", |_| {})))
        .build()
        .unwrap();
    class.define_as(&doc, "x-plain").unwrap();
    assert!(class.is_reactive_property("slot"));
    assert!(!class.is_signal_property("slot"));
    assert!(!class.is_reactive_property("plain"));

    let el = doc.create_element("x-plain");
    assert!(el.has_own_data(&"plain".into()));
    assert_eq!(el.get("slot"), Value::from(2));
    assert_eq!(el.get("double"), Value::from(4));
    el.set("double", 10);
    assert_eq!(el.get("double"), Value::from(4));
    assert_eq!(
        el.get("greet").as_function().and_then(|f| f.label()),
        Some("greet")
    );
}
