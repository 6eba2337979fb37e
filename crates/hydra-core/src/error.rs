//! Error types surfaced by the element lifecycle.

use thiserror::Error;

/// A rejected attribute value. The previous valid value stays in effect.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid `{attribute}` value {value:?}: expected {expected}")]
pub struct ParseError {
    /// Attribute name as written in markup.
    pub attribute: &'static str,
    /// The raw value that failed to parse.
    pub value: String,
    /// What the attribute accepts, e.g. "a positive integer".
    pub expected: &'static str,
}

impl ParseError {
    pub fn new(attribute: &'static str, value: &str, expected: &'static str) -> Self {
        Self {
            attribute,
            value: value.to_string(),
            expected,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ElementError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// The engine handle already exists. Callers treat this as a no-op.
    #[error("engine already constructed")]
    AlreadyConstructed,

    #[error("engine not constructed yet")]
    EngineNotConstructed,

    /// The engine rejected its surface or options.
    #[error("engine construction failed: {0}")]
    EngineConstructionFailure(String),

    #[error("invalid engine options: {0}")]
    InvalidOverrides(String),
}

impl ElementError {
    /// Whether the host should be told about this error.
    pub fn is_reportable(&self) -> bool {
        !matches!(self, ElementError::AlreadyConstructed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_error_message_names_attribute_and_value() {
        let err = ParseError::new("width", "abc", "a positive integer");
        assert_eq!(
            err.to_string(),
            r#"invalid `width` value "abc": expected a positive integer"#
        );
    }

    #[test]
    fn already_constructed_is_not_reported() {
        assert!(!ElementError::AlreadyConstructed.is_reportable());
        assert!(ElementError::EngineConstructionFailure("no gl".into()).is_reportable());
    }
}
