use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomError {
    #[error("'{0}' is not a valid custom element name")]
    InvalidName(String),

    #[error("a custom element named '{0}' is already defined")]
    AlreadyDefined(String),
}
