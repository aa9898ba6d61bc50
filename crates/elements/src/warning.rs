use std::fmt;

/// Non-fatal configuration findings, recorded on the built class and logged.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ConfigWarning {
    /// Two different properties map to the same attribute name; the later
    /// registration wins for that attribute.
    AttributeCollision {
        class: String,
        attribute: String,
        existing: String,
        property: String,
    },
    /// A subclass re-registered an attribute for the same property. Legal and
    /// expected; advisory only.
    AttributeOverride {
        class: String,
        attribute: String,
        property: String,
    },
    /// A property is attribute-backed through both a member annotation and
    /// the class-level handler map; the annotation is used.
    MixedConfiguration { class: String, property: String },
}

impl ConfigWarning {
    pub fn is_collision(&self) -> bool {
        matches!(self, ConfigWarning::AttributeCollision { .. })
    }

    pub(crate) fn emit(&self) {
        match self {
            ConfigWarning::AttributeOverride { .. } => log::debug!(target: "elements", "{self}"),
            _ => log::warn!(target: "elements", "{self}"),
        }
    }
}

impl fmt::Display for ConfigWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigWarning::AttributeCollision {
                class,
                attribute,
                existing,
                property,
            } => write!(
                f,
                "{class}: attribute '{attribute}' of property '{property}' collides with property '{existing}'"
            ),
            ConfigWarning::AttributeOverride {
                class,
                attribute,
                property,
            } => write!(
                f,
                "{class}: attribute '{attribute}' re-registered for inherited property '{property}'"
            ),
            ConfigWarning::MixedConfiguration { class, property } => write!(
                f,
                "{class}: property '{property}' is configured by both a member annotation and observed_attribute_handlers"
            ),
        }
    }
}
