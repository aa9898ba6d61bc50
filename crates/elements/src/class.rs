//! Element classes and the builder that stands in for decorators.
//!
//! A class is declared once with [`ClassBuilder`] and is immutable after
//! [`ClassBuilder::build`]. Building runs an explicit, ordered list of setup
//! steps over a [`ClassSetup`]; nothing is collected in global state, so
//! building several classes in any order cannot interfere.

use crate::attribute::AttributeHandler;
use crate::attribute_map::{AttributeMap, AttributePropSpec};
use crate::config::ElementsConfig;
use crate::error::{ElementError, Result};
use crate::member::{Annotation, Initializer, Member, MemberKind};
use crate::property::{Getter, PropertyDef, PropertyKind, Setter};
use crate::warning::ConfigWarning;
use core_types::{Callback, PropKey, Value};
use dom::{Document, Element};
use indexmap::IndexMap;
use std::collections::HashSet;
use std::fmt;
use std::rc::Rc;
use std::sync::Arc;

pub type AttributeChangedHook = Rc<dyn Fn(&Element, &str, Option<&str>, Option<&str>)>;
pub type LifecycleHook = Rc<dyn Fn(&Element)>;

const ELEMENT_NAME: &str = "elementName";
const AUTO_DEFINE: &str = "autoDefine";

#[derive(Clone, Default)]
pub(crate) struct Hooks {
    pub(crate) attribute_changed: Option<AttributeChangedHook>,
    pub(crate) connected: Option<LifecycleHook>,
    pub(crate) disconnected: Option<LifecycleHook>,
}

/// What a class contributes for one key, looked up through the class chain.
pub(crate) enum ClassProperty {
    Reactive(Rc<PropertyDef>),
    Accessor { get: Getter, set: Option<Setter> },
    Method(Callback),
}

pub struct ElementClass {
    pub(crate) name: Arc<str>,
    pub(crate) parent: Option<Rc<ElementClass>>,
    /// Own instance members in declaration order.
    pub(crate) members: Vec<Member>,
    statics: IndexMap<Arc<str>, Value>,
    pub(crate) properties: IndexMap<PropKey, ClassProperty>,
    pub(crate) attribute_map: Option<Rc<AttributeMap>>,
    pub(crate) observed: Rc<Vec<Arc<str>>>,
    pub(crate) hooks: Hooks,
    warnings: Vec<ConfigWarning>,
}

impl fmt::Debug for ElementClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ElementClass")
            .field("name", &self.name)
            .field("parent", &self.parent.as_ref().map(|p| &p.name))
            .field("observed", &self.observed)
            .finish()
    }
}

impl ElementClass {
    pub fn builder(name: &str) -> ClassBuilder {
        ClassBuilder::new(name)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn parent(&self) -> Option<&Rc<ElementClass>> {
        self.parent.as_ref()
    }

    /// Root class first, `self` last.
    pub(crate) fn chain(&self) -> Vec<&ElementClass> {
        let mut chain = Vec::new();
        let mut class = Some(self);
        while let Some(c) = class {
            chain.push(c);
            class = c.parent.as_deref();
        }
        chain.reverse();
        chain
    }

    /// Nearest class in the chain that contributes `key`.
    pub(crate) fn resolve(&self, key: &PropKey) -> Option<&ClassProperty> {
        let mut class = Some(self);
        while let Some(c) = class {
            if let Some(prop) = c.properties.get(key) {
                return Some(prop);
            }
            class = c.parent.as_deref();
        }
        None
    }

    pub(crate) fn resolve_reactive(&self, key: &PropKey) -> Option<Rc<PropertyDef>> {
        match self.resolve(key) {
            Some(ClassProperty::Reactive(def)) => Some(Rc::clone(def)),
            _ => None,
        }
    }

    pub(crate) fn nearest_hook<T>(&self, pick: impl Fn(&Hooks) -> Option<T>) -> Option<T> {
        let mut class = Some(self);
        while let Some(c) = class {
            if let Some(hook) = pick(&c.hooks) {
                return Some(hook);
            }
            class = c.parent.as_deref();
        }
        None
    }

    /// Flat attribute list handed to the platform.
    pub fn observed_attribute_names(&self) -> &[Arc<str>] {
        &self.observed
    }

    /// `false` when the list is shared with the parent class unchanged.
    pub fn owns_observed_attributes(&self) -> bool {
        match &self.parent {
            Some(parent) => !Rc::ptr_eq(&self.observed, &parent.observed),
            None => true,
        }
    }

    pub fn attribute_map(&self) -> Option<&Rc<AttributeMap>> {
        self.attribute_map.as_ref()
    }

    /// `true` when this class registered attribute properties of its own.
    pub fn has_own_attribute_map(&self) -> bool {
        match (&self.attribute_map, self.parent.as_ref().and_then(|p| p.attribute_map.as_ref())) {
            (Some(own), Some(inherited)) => !Rc::ptr_eq(own, inherited),
            (Some(_), None) => true,
            (None, _) => false,
        }
    }

    pub fn attribute_spec(&self, attribute: &str) -> Option<Rc<AttributePropSpec>> {
        let attribute = attribute.to_ascii_lowercase();
        self.attribute_map
            .as_ref()
            .and_then(|m| m.lookup(&attribute))
            .cloned()
    }

    pub fn attribute_for_property(&self, property: &str) -> Option<Arc<str>> {
        self.attribute_map
            .as_ref()
            .and_then(|m| m.lookup_property(property))
            .map(|spec| Arc::clone(&spec.attribute))
    }

    pub fn property_for_attribute(&self, attribute: &str) -> Option<Arc<str>> {
        self.attribute_spec(attribute)
            .map(|spec| Arc::clone(&spec.name))
    }

    pub fn is_reactive_property(&self, property: &str) -> bool {
        self.resolve_reactive(&PropKey::name(property)).is_some()
    }

    pub fn is_signal_property(&self, property: &str) -> bool {
        self.resolve_reactive(&PropKey::name(property))
            .is_some_and(|def| def.is_signal_backed())
    }

    pub fn property_kind(&self, property: &str) -> Option<PropertyKind> {
        self.resolve_reactive(&PropKey::name(property))
            .map(|def| def.kind)
    }

    pub fn warnings(&self) -> &[ConfigWarning] {
        &self.warnings
    }

    /// Static value, inherited from ancestors when not set on this class.
    pub fn static_value(&self, name: &str) -> Option<Value> {
        let mut class = Some(self);
        while let Some(c) = class {
            if let Some(v) = c.statics.get(name) {
                return Some(v.clone());
            }
            class = c.parent.as_deref();
        }
        None
    }

    pub fn element_name(&self) -> Option<String> {
        self.static_value(ELEMENT_NAME)
            .and_then(|v| v.as_str().map(str::to_string))
    }

    /// Registers the class under its `elementName`.
    pub fn define(self: &Rc<Self>, document: &Document) -> Result<()> {
        let name = self.element_name().ok_or_else(|| ElementError::MissingElementName {
            class: self.name.to_string(),
        })?;
        self.define_as(document, &name)
    }

    pub fn define_as(self: &Rc<Self>, document: &Document, name: &str) -> Result<()> {
        document.define(name, Rc::clone(self) as Rc<dyn dom::CustomElementDefinition>)?;
        Ok(())
    }
}

/// Declarative class definition.
///
/// ```
/// use elements::{ClassBuilder, Member, attribute};
///
/// let class = ClassBuilder::new("Counter")
///     .element_name("x-counter")
///     .member(Member::field("count", 0).attribute(attribute::number()))
///     .build()
///     .unwrap();
/// assert_eq!(&*class.observed_attribute_names()[0], "count");
/// ```
pub struct ClassBuilder {
    name: String,
    parent: Option<Rc<ElementClass>>,
    members: Vec<Member>,
    handler_map: IndexMap<String, AttributeHandler>,
    hooks: Hooks,
    config: ElementsConfig,
}

impl ClassBuilder {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            parent: None,
            members: Vec::new(),
            handler_map: IndexMap::new(),
            hooks: Hooks::default(),
            config: ElementsConfig::default(),
        }
    }

    pub fn with_config(mut self, config: ElementsConfig) -> Self {
        self.config = config;
        self
    }

    pub fn extends(mut self, parent: &Rc<ElementClass>) -> Self {
        self.parent = Some(Rc::clone(parent));
        self
    }

    pub fn member(mut self, member: Member) -> Self {
        self.members.push(member);
        self
    }

    pub fn members(mut self, members: impl IntoIterator<Item = Member>) -> Self {
        self.members.extend(members);
        self
    }

    /// Class-level alternative to member annotations: property name to
    /// handler. Properties without a member of their own become reactive
    /// fields that keep any inherited initial value.
    pub fn observed_attribute_handlers<'a>(
        mut self,
        handlers: impl IntoIterator<Item = (&'a str, AttributeHandler)>,
    ) -> Self {
        for (property, handler) in handlers {
            self.handler_map.insert(property.to_string(), handler);
        }
        self
    }

    pub fn static_field(self, name: &str, value: impl Into<Value>) -> Self {
        self.member(Member::field(name, value).static_member())
    }

    pub fn element_name(self, name: &str) -> Self {
        self.static_field(ELEMENT_NAME, name)
    }

    pub fn auto_define(self, auto: bool) -> Self {
        self.static_field(AUTO_DEFINE, auto)
    }

    pub fn on_attribute_changed(
        mut self,
        hook: impl Fn(&Element, &str, Option<&str>, Option<&str>) + 'static,
    ) -> Self {
        self.hooks.attribute_changed = Some(Rc::new(hook));
        self
    }

    pub fn on_connected(mut self, hook: impl Fn(&Element) + 'static) -> Self {
        self.hooks.connected = Some(Rc::new(hook));
        self
    }

    pub fn on_disconnected(mut self, hook: impl Fn(&Element) + 'static) -> Self {
        self.hooks.disconnected = Some(Rc::new(hook));
        self
    }

    pub fn build(self) -> Result<Rc<ElementClass>> {
        let mut setup = ClassSetup::new(self);
        for step in SETUP_STEPS {
            step(&mut setup)?;
        }
        Ok(setup.finish())
    }

    /// Builds, then defines the class when auto-define is on (the class's
    /// `autoDefine` static, else the config default) and an element name is
    /// known. A name already taken in `document` is left alone.
    pub fn finish(self, document: &Document) -> Result<Rc<ElementClass>> {
        let default_auto = self.config.auto_define;
        let class = self.build()?;
        let auto = class
            .static_value(AUTO_DEFINE)
            .and_then(|v| v.as_bool())
            .unwrap_or(default_auto);
        if !auto {
            return Ok(class);
        }
        let Some(name) = class.element_name() else {
            return Ok(class);
        };
        if document.is_defined(&name) {
            log::debug!(target: "elements", "{}: <{name}> already defined, not auto-defining", class.name);
            return Ok(class);
        }
        class.define_as(document, &name)?;
        Ok(class)
    }
}

type SetupStep = fn(&mut ClassSetup) -> Result<()>;

/// Order matters: annotations are validated before statics are split off, and
/// the handler map is merged before properties are installed.
const SETUP_STEPS: [SetupStep; 5] = [
    check_duplicates,
    validate_annotations,
    collect_statics,
    merge_handler_map,
    install_properties,
];

pub(crate) struct ClassSetup {
    name: Arc<str>,
    parent: Option<Rc<ElementClass>>,
    config: ElementsConfig,
    members: Vec<Member>,
    handler_map: IndexMap<String, AttributeHandler>,
    hooks: Hooks,
    statics: IndexMap<Arc<str>, Value>,
    properties: IndexMap<PropKey, ClassProperty>,
    own_map: Option<AttributeMap>,
    observed: Option<Vec<Arc<str>>>,
    warnings: Vec<ConfigWarning>,
}

impl ClassSetup {
    fn new(builder: ClassBuilder) -> Self {
        Self {
            name: Arc::from(builder.name),
            parent: builder.parent,
            config: builder.config,
            members: builder.members,
            handler_map: builder.handler_map,
            hooks: builder.hooks,
            statics: IndexMap::new(),
            properties: IndexMap::new(),
            own_map: None,
            observed: None,
            warnings: Vec::new(),
        }
    }

    fn warn(&mut self, warning: ConfigWarning) {
        warning.emit();
        self.warnings.push(warning);
    }

    fn parent_map(&self) -> Option<Rc<AttributeMap>> {
        self.parent.as_ref().and_then(|p| p.attribute_map.clone())
    }

    fn lookup_attribute(&self, attribute: &str) -> Option<Rc<AttributePropSpec>> {
        match &self.own_map {
            Some(map) => map.lookup(attribute).cloned(),
            None => self
                .parent_map()
                .and_then(|map| map.lookup(attribute).cloned()),
        }
    }

    /// Registers one attribute -> property pair on this class.
    fn set_up_attribute(&mut self, spec: Rc<AttributePropSpec>) {
        // Own copy of the observed list, seeded from the parent's.
        let inherited = self.parent.as_ref().map(|p| p.observed.clone());
        let observed = self
            .observed
            .get_or_insert_with(|| inherited.map(|o| (*o).clone()).unwrap_or_default());
        if !observed
            .iter()
            .any(|a| a.eq_ignore_ascii_case(&spec.attribute))
        {
            observed.push(Arc::clone(&spec.attribute));
        }

        match self.lookup_attribute(&spec.attribute) {
            Some(existing) if existing.name != spec.name => {
                if self.config.warn_collisions && !spec.handler.no_warn {
                    self.warn(ConfigWarning::AttributeCollision {
                        class: self.name.to_string(),
                        attribute: spec.attribute.to_string(),
                        existing: existing.name.to_string(),
                        property: spec.name.to_string(),
                    });
                }
            }
            Some(_) => self.warn(ConfigWarning::AttributeOverride {
                class: self.name.to_string(),
                attribute: spec.attribute.to_string(),
                property: spec.name.to_string(),
            }),
            None => {}
        }

        let parent_map = self.parent_map();
        self.own_map
            .get_or_insert_with(|| AttributeMap::child_of(parent_map))
            .insert(spec);
    }

    fn finish(self) -> Rc<ElementClass> {
        let inherited_map = self.parent_map();
        let observed = match (self.observed, &self.parent) {
            (Some(own), _) => Rc::new(own),
            (None, Some(parent)) => Rc::clone(&parent.observed),
            (None, None) => Rc::new(Vec::new()),
        };
        Rc::new(ElementClass {
            name: self.name,
            parent: self.parent,
            members: self.members,
            statics: self.statics,
            properties: self.properties,
            attribute_map: self.own_map.map(Rc::new).or(inherited_map),
            observed,
            hooks: self.hooks,
            warnings: self.warnings,
        })
    }
}

fn check_duplicates(setup: &mut ClassSetup) -> Result<()> {
    let mut instance = HashSet::new();
    let mut statics = HashSet::new();
    for member in &setup.members {
        let seen = if member.is_static {
            &mut statics
        } else {
            &mut instance
        };
        if !seen.insert(member.key.clone()) {
            return Err(ElementError::DuplicateMember {
                class: setup.name.to_string(),
                key: member.key.to_string(),
            });
        }
    }
    Ok(())
}

fn validate_annotations(setup: &mut ClassSetup) -> Result<()> {
    for member in setup.members.iter().filter(|m| m.is_annotated()) {
        let class = setup.name.to_string();
        let key = member.key.to_string();
        if member.key.is_symbol() {
            return Err(ElementError::SymbolKey { class, key });
        }
        if member.is_private {
            return Err(ElementError::PrivateMember { class, key });
        }
        if member.is_static {
            return Err(ElementError::StaticMember { class, key });
        }
        match &member.kind {
            MemberKind::Method(_) => return Err(ElementError::UnsupportedMember { class, key }),
            MemberKind::GetterSetter { set: None, .. } => {
                return Err(ElementError::ReadOnly { class, key });
            }
            MemberKind::Field(_) | MemberKind::AutoAccessor(_) if member.readonly => {
                return Err(ElementError::ReadOnly { class, key });
            }
            _ => {}
        }
    }
    Ok(())
}

fn collect_statics(setup: &mut ClassSetup) -> Result<()> {
    let (statics, instance): (Vec<Member>, Vec<Member>) =
        std::mem::take(&mut setup.members)
            .into_iter()
            .partition(|m| m.is_static);
    setup.members = instance;
    for member in statics {
        let Some(name) = member.key.as_name() else {
            continue;
        };
        let value = match &member.kind {
            MemberKind::Field(Initializer::Value(v)) | MemberKind::AutoAccessor(Initializer::Value(v)) => {
                v.clone()
            }
            MemberKind::Method(body) => Value::Function(body.clone()),
            _ => {
                log::debug!(target: "elements", "{}: static {name} has no constant value", setup.name);
                Value::Undefined
            }
        };
        setup.statics.insert(Arc::from(name), value);
    }
    Ok(())
}

fn merge_handler_map(setup: &mut ClassSetup) -> Result<()> {
    let handler_map = std::mem::take(&mut setup.handler_map);
    for (property, handler) in handler_map {
        let key = PropKey::name(&property);
        let index = setup.members.iter().position(|m| m.key == key);
        match index {
            Some(i) if setup.members[i].has_attribute_annotation() => {
                let warning = ConfigWarning::MixedConfiguration {
                    class: setup.name.to_string(),
                    property: property.clone(),
                };
                setup.warn(warning);
            }
            Some(i) => {
                let member = &mut setup.members[i];
                let signal = !matches!(member.kind, MemberKind::GetterSetter { .. })
                    || matches!(member.annotation, Some(Annotation::Signal));
                member.annotation = Some(Annotation::Attribute {
                    handler: Some(handler),
                    signal,
                });
            }
            None => {
                let mut member = Member::field(key, Value::Undefined).attribute(handler);
                member.kind = MemberKind::Field(Initializer::Inherited);
                setup.members.push(member);
            }
        }
    }
    // Synthesized members go through the same checks as declared ones.
    validate_annotations(setup)
}

fn install_properties(setup: &mut ClassSetup) -> Result<()> {
    let members = setup.members.clone();
    for member in &members {
        let key = member.key.clone();
        let property = match (&member.annotation, &member.kind) {
            (None, MemberKind::Field(_)) => continue,
            (None, MemberKind::AutoAccessor(_)) => {
                let Some(name) = key.as_name() else { continue };
                ClassProperty::Reactive(Rc::new(PropertyDef::field(Arc::from(name), false, None)))
            }
            (None, MemberKind::GetterSetter { get, set }) => ClassProperty::Accessor {
                get: Rc::clone(get),
                set: set.clone(),
            },
            (None, MemberKind::Method(body)) => ClassProperty::Method(body.clone()),
            (Some(annotation), kind) => {
                ClassProperty::Reactive(Rc::new(reactive_property(setup, &key, annotation, kind)?))
            }
        };
        if let (ClassProperty::Reactive(_), Some(parent)) = (&property, &setup.parent) {
            if parent.resolve_reactive(&key).is_some() {
                log::debug!(
                    target: "elements",
                    "{}: {key} replaces the inherited interceptor",
                    setup.name
                );
            }
        }
        setup.properties.insert(key, property);
    }
    Ok(())
}

fn reactive_property(
    setup: &mut ClassSetup,
    key: &PropKey,
    annotation: &Annotation,
    kind: &MemberKind,
) -> Result<PropertyDef> {
    let class = setup.name.to_string();
    let Some(name) = key.as_name() else {
        return Err(ElementError::SymbolKey {
            class,
            key: key.to_string(),
        });
    };
    let name: Arc<str> = Arc::from(name);
    let property_kind = match kind {
        MemberKind::GetterSetter { .. } => PropertyKind::Accessor,
        _ => PropertyKind::Field,
    };

    let (spec, signal) = match annotation {
        Annotation::Attribute { handler, signal } => {
            let handler = handler.clone().unwrap_or_default();
            let attribute: Arc<str> = Arc::from(handler.attribute_name_for(&name));
            let spec = Rc::new(AttributePropSpec::new(
                Arc::clone(&name),
                attribute,
                Rc::new(handler),
                property_kind,
            ));
            setup.set_up_attribute(Rc::clone(&spec));
            (Some(spec), *signal)
        }
        Annotation::Signal => (None, true),
    };

    match kind {
        MemberKind::GetterSetter { get, set: Some(set) } => Ok(PropertyDef::accessor(
            name,
            Rc::clone(get),
            Rc::clone(set),
            signal,
            spec,
        )),
        MemberKind::GetterSetter { set: None, .. } => Err(ElementError::ReadOnly {
            class,
            key: name.to_string(),
        }),
        MemberKind::Method(_) => Err(ElementError::UnsupportedMember {
            class,
            key: name.to_string(),
        }),
        MemberKind::Field(_) | MemberKind::AutoAccessor(_) => {
            Ok(PropertyDef::field(name, signal, spec))
        }
    }
}
