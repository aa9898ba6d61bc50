use crate::definition::CustomElementDefinition;
use crate::element::{Element, WeakElement};
use crate::error::DomError;
use crate::microtask::MicrotaskQueue;
use core_types::ElementId;
use indexmap::IndexMap;
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::sync::Arc;

/// Names the HTML standard reserves even though they contain a hyphen.
const RESERVED_NAMES: &[&str] = &[
    "annotation-xml",
    "color-profile",
    "font-face",
    "font-face-src",
    "font-face-uri",
    "font-face-format",
    "font-face-name",
    "missing-glyph",
];

#[derive(Clone, Copy, Debug)]
pub struct DocumentConfig {
    /// Upper bound on tasks run by one [`Document::run_microtasks`] call.
    pub max_microtasks_per_checkpoint: usize,
}

impl Default for DocumentConfig {
    fn default() -> Self {
        Self {
            max_microtasks_per_checkpoint: 10_000,
        }
    }
}

struct DocumentData {
    config: DocumentConfig,
    registry: RefCell<IndexMap<Arc<str>, Rc<dyn CustomElementDefinition>>>,
    elements: RefCell<Vec<WeakElement>>,
    body: RefCell<Vec<Element>>,
    microtasks: MicrotaskQueue,
    next_id: Cell<ElementId>,
}

/// Owner of elements, the custom element registry and the microtask queue.
#[derive(Clone)]
pub struct Document {
    inner: Rc<DocumentData>,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    pub fn new() -> Self {
        Self::with_config(DocumentConfig::default())
    }

    pub fn with_config(config: DocumentConfig) -> Self {
        Self {
            inner: Rc::new(DocumentData {
                config,
                registry: RefCell::new(IndexMap::new()),
                elements: RefCell::new(Vec::new()),
                body: RefCell::new(Vec::new()),
                microtasks: MicrotaskQueue::new(),
                next_id: Cell::new(1),
            }),
        }
    }

    pub fn microtasks(&self) -> &MicrotaskQueue {
        &self.inner.microtasks
    }

    /// Creates an element. If `tag` is already defined the element is
    /// constructed before this returns; otherwise it stays un-upgraded until
    /// [`Document::define`] is called for its tag.
    pub fn create_element(&self, tag: &str) -> Element {
        let tag: Arc<str> = Arc::from(tag.to_ascii_lowercase());
        let id = self.inner.next_id.get();
        self.inner.next_id.set(id.wrapping_add(1));
        let element = Element::new(id, Arc::clone(&tag), self.inner.microtasks.clone());
        {
            let mut elements = self.inner.elements.borrow_mut();
            elements.retain(|w| w.upgrade().is_some());
            elements.push(element.downgrade());
        }
        if let Some(definition) = self.get_definition(&tag) {
            element.upgrade(definition);
        }
        element
    }

    pub fn is_defined(&self, name: &str) -> bool {
        self.inner.registry.borrow().contains_key(name)
    }

    pub fn get_definition(&self, name: &str) -> Option<Rc<dyn CustomElementDefinition>> {
        self.inner.registry.borrow().get(name).cloned()
    }

    /// Registers `definition` under `name` and upgrades every existing element
    /// with that tag, in creation order.
    pub fn define(
        &self,
        name: &str,
        definition: Rc<dyn CustomElementDefinition>,
    ) -> Result<(), DomError> {
        if !is_valid_custom_element_name(name) {
            return Err(DomError::InvalidName(name.to_string()));
        }
        if self.is_defined(name) {
            return Err(DomError::AlreadyDefined(name.to_string()));
        }
        self.inner
            .registry
            .borrow_mut()
            .insert(Arc::from(name), Rc::clone(&definition));
        log::debug!(target: "dom", "defined <{name}>");

        let pending: Vec<Element> = self
            .inner
            .elements
            .borrow()
            .iter()
            .filter_map(WeakElement::upgrade)
            .filter(|el| el.tag_name() == name && !el.is_upgraded())
            .collect();
        for element in pending {
            element.upgrade(Rc::clone(&definition));
        }
        Ok(())
    }

    /// Connects `element` to the document body.
    pub fn append(&self, element: &Element) {
        if element.is_connected() {
            return;
        }
        element.set_connected(true);
        self.inner.body.borrow_mut().push(element.clone());
        if let Some(definition) = element.definition() {
            definition.connected(element);
        }
    }

    pub fn remove(&self, element: &Element) {
        if !element.is_connected() {
            return;
        }
        element.set_connected(false);
        self.inner.body.borrow_mut().retain(|el| el != element);
        if let Some(definition) = element.definition() {
            definition.disconnected(element);
        }
    }

    pub fn connected_elements(&self) -> Vec<Element> {
        self.inner.body.borrow().clone()
    }

    /// Microtask checkpoint: runs queued tasks, including ones queued while
    /// draining, until the queue is empty. Returns the number of tasks run.
    pub fn run_microtasks(&self) -> usize {
        let limit = self.inner.config.max_microtasks_per_checkpoint;
        let mut ran = 0;
        while let Some(task) = self.inner.microtasks.pop() {
            task();
            ran += 1;
            if ran >= limit {
                log::warn!(
                    target: "dom",
                    "microtask checkpoint stopped after {ran} tasks; {} still queued",
                    self.inner.microtasks.len()
                );
                break;
            }
        }
        log::trace!(target: "dom", "microtask checkpoint ran {ran} tasks");
        ran
    }
}

pub(crate) fn is_valid_custom_element_name(name: &str) -> bool {
    let mut chars = name.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    if !first.is_ascii_lowercase() || !name.contains('-') {
        return false;
    }
    if RESERVED_NAMES.contains(&name) {
        return false;
    }
    chars.all(|c| {
        c == '-' || c == '.' || c == '_' || c.is_ascii_digit() || c.is_ascii_lowercase() || !c.is_ascii()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn custom_element_names() {
        assert!(is_valid_custom_element_name("x-foo"));
        assert!(is_valid_custom_element_name("my-el.v2_a"));
        assert!(!is_valid_custom_element_name("foo"));
        assert!(!is_valid_custom_element_name("X-foo"));
        assert!(!is_valid_custom_element_name("x-Foo"));
        assert!(!is_valid_custom_element_name("1-foo"));
        assert!(!is_valid_custom_element_name("font-face"));
        assert!(!is_valid_custom_element_name(""));
    }
}
