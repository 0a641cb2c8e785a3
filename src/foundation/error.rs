/// Convenience result type used across the crate.
pub type OpafResult<T> = Result<T, OpafError>;

/// Top-level error taxonomy shared by the parser, packager and compiler.
///
/// Every failure is raised where it is detected and carries the offending
/// definition name; nothing in the pipeline recovers from one.
#[derive(thiserror::Error, Debug)]
pub enum OpafError {
    /// Malformed root or namespace, unrecognized elements, duplicate
    /// definitions, unresolvable includes.
    #[error("structure error: {0}")]
    Structure(String),

    /// An action, block, chart, color or image name that is not defined.
    #[error("reference error: {0}")]
    Reference(String),

    /// Missing or empty parameters and disallowed config/color values.
    #[error("parameter error: {0}")]
    Parameter(String),

    /// An embedded `${...}` expression or condition failed to evaluate.
    #[error("expression error: {0}")]
    Expression(String),

    /// A requested stitch count or chart address cannot be satisfied.
    #[error("stitch count error: {0}")]
    Stitch(String),

    /// The XML reader rejected the source text.
    #[error("xml error: {0}")]
    Xml(String),

    /// Filesystem failure while reading sources or images.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Wrapped lower-level error from dependencies.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl OpafError {
    /// Build an [`OpafError::Structure`] value.
    pub fn structure(msg: impl Into<String>) -> Self {
        Self::Structure(msg.into())
    }

    /// Build an [`OpafError::Reference`] value.
    pub fn reference(msg: impl Into<String>) -> Self {
        Self::Reference(msg.into())
    }

    /// Build an [`OpafError::Parameter`] value.
    pub fn parameter(msg: impl Into<String>) -> Self {
        Self::Parameter(msg.into())
    }

    /// Build an [`OpafError::Expression`] value.
    pub fn expression(msg: impl Into<String>) -> Self {
        Self::Expression(msg.into())
    }

    /// Build an [`OpafError::Stitch`] value.
    pub fn stitch(msg: impl Into<String>) -> Self {
        Self::Stitch(msg.into())
    }

    /// Build an [`OpafError::Xml`] value.
    pub fn xml(msg: impl Into<String>) -> Self {
        Self::Xml(msg.into())
    }
}

impl From<roxmltree::Error> for OpafError {
    fn from(e: roxmltree::Error) -> Self {
        Self::Xml(e.to_string())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
