use core_types::Value;
use dom::Document;
use elements::{ClassBuilder, Member, attribute};
use signals::Effect;
use tracing_subscriber::EnvFilter;

fn main() -> elements::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let doc = Document::new();

    // Created before the class exists, like a parsed or cloned template.
    let early = doc.create_element("x-counter");
    early.set("count", "41");
    early.set_attribute("open", "");
    doc.append(&early);

    let counter = ClassBuilder::new("Counter")
        .element_name("x-counter")
        .member(Member::field("count", 0).attribute(attribute::number()))
        .member(Member::field("open", false).attribute(attribute::boolean()))
        .member(Member::field("onIncrement", Value::Null).attribute(attribute::event()))
        .on_connected(|el| println!("<{}> connected", el.tag_name()))
        .finish(&doc)?;
    log::info!(target: "elemental", "{} defined: {}", counter.name(), doc.is_defined("x-counter"));
    println!("observed attributes: {:?}", counter.observed_attribute_names());

    let _render = Effect::new({
        let el = early.clone();
        move || println!("render: count={} open={}", el.get("count"), el.get("open"))
    });

    doc.run_microtasks();
    early.set_attribute("count", "42");
    early.set("count", Value::Null);
    early.remove_attribute("open");

    early.set_attribute("onincrement", "count++");
    println!("increment listeners run: {}", early.dispatch_event("increment"));

    for warning in counter.warnings() {
        println!("warning: {warning}");
    }
    Ok(())
}
