//! Typed parsing of the element's text attributes.
//!
//! Built on `winnow` 0.7. Every value is parsed in full: surrounding ASCII
//! whitespace is tolerated, trailing garbage (`"640px"`) is not.

use crate::error::ParseError;
use crate::options::Precision;
use std::num::NonZeroU32;
use winnow::ascii::{dec_uint, multispace0};
use winnow::combinator::alt;
use winnow::error::ContextError;
use winnow::prelude::*;
use winnow::token::take_while;

/// Attributes the element observes, in declaration order.
pub const OBSERVED_ATTRIBUTES: [&str; 6] =
    ["width", "height", "audio", "sources", "outputs", "precision"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Attribute {
    Width,
    Height,
    Audio,
    Sources,
    Outputs,
    Precision,
}

impl Attribute {
    /// Resolve an attribute name. Unrecognized names yield `None`.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "width" => Some(Attribute::Width),
            "height" => Some(Attribute::Height),
            "audio" => Some(Attribute::Audio),
            "sources" => Some(Attribute::Sources),
            "outputs" => Some(Attribute::Outputs),
            "precision" => Some(Attribute::Precision),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Attribute::Width => "width",
            Attribute::Height => "height",
            Attribute::Audio => "audio",
            Attribute::Sources => "sources",
            Attribute::Outputs => "outputs",
            Attribute::Precision => "precision",
        }
    }
}

/// Parse a surface dimension: an integer ≥ 1.
pub fn parse_dimension(attr: Attribute, value: &str) -> Result<NonZeroU32, ParseError> {
    parse_full(unsigned, value)
        .and_then(NonZeroU32::new)
        .ok_or_else(|| ParseError::new(attr.name(), value, "a positive integer"))
}

/// Parse a buffer count: a non-negative integer.
pub fn parse_count(attr: Attribute, value: &str) -> Result<u32, ParseError> {
    parse_full(unsigned, value)
        .ok_or_else(|| ParseError::new(attr.name(), value, "a non-negative integer"))
}

/// Parse a boolean flag written as the literal `true` or `false`.
pub fn parse_flag(attr: Attribute, value: &str) -> Result<bool, ParseError> {
    parse_full(flag, value).ok_or_else(|| ParseError::new(attr.name(), value, "`true` or `false`"))
}

/// Parse a shader precision keyword. The keyword is kept verbatim.
pub fn parse_precision(attr: Attribute, value: &str) -> Result<Precision, ParseError> {
    parse_full(precision, value)
        .ok_or_else(|| ParseError::new(attr.name(), value, "`highp`, `mediump` or `lowp`"))
}

// ─── Parsers ─────────────────────────────────────────────────────────────

/// Run `parser` over `value`, requiring all input to be consumed.
fn parse_full<O>(mut parser: impl FnMut(&mut &str) -> ModalResult<O>, value: &str) -> Option<O> {
    let mut rest = value;
    skip_space(&mut rest);
    let out = parser(&mut rest).ok()?;
    skip_space(&mut rest);
    rest.is_empty().then_some(out)
}

fn skip_space(input: &mut &str) {
    let _: ModalResult<&str> = multispace0.parse_next(input);
}

fn unsigned(input: &mut &str) -> ModalResult<u32> {
    dec_uint.parse_next(input)
}

fn flag(input: &mut &str) -> ModalResult<bool> {
    alt(("true".value(true), "false".value(false))).parse_next(input)
}

fn precision(input: &mut &str) -> ModalResult<Precision> {
    let keyword = take_while(1.., |c: char| c.is_ascii_alphabetic()).parse_next(input)?;
    Precision::from_keyword(keyword)
        .ok_or_else(|| winnow::error::ErrMode::Backtrack(ContextError::new()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn attribute_names_roundtrip() {
        for name in OBSERVED_ATTRIBUTES {
            let attr = Attribute::from_name(name).unwrap();
            assert_eq!(attr.name(), name);
        }
        assert_eq!(Attribute::from_name("class"), None);
        assert_eq!(Attribute::from_name("Width"), None);
    }

    #[test]
    fn dimension_accepts_integers() {
        let dim = |attr: Attribute, v: &str| parse_dimension(attr, v).map(NonZeroU32::get);
        assert_eq!(dim(Attribute::Width, "640"), Ok(640));
        assert_eq!(dim(Attribute::Width, " 480 "), Ok(480));
        assert_eq!(dim(Attribute::Height, "1"), Ok(1));
    }

    #[test]
    fn dimension_rejects_garbage_and_zero() {
        for bad in ["abc", "", "0", "-5", "640px", "6 40", "1.5", "99999999999"] {
            let err = parse_dimension(Attribute::Width, bad).unwrap_err();
            assert_eq!(err.attribute, "width");
            assert_eq!(err.value, bad);
        }
    }

    #[test]
    fn count_allows_zero() {
        assert_eq!(parse_count(Attribute::Sources, "0"), Ok(0));
        assert_eq!(parse_count(Attribute::Outputs, "2"), Ok(2));
        assert!(parse_count(Attribute::Outputs, "two").is_err());
    }

    #[test]
    fn flag_literals_only() {
        assert_eq!(parse_flag(Attribute::Audio, "true"), Ok(true));
        assert_eq!(parse_flag(Attribute::Audio, "false"), Ok(false));
        assert!(parse_flag(Attribute::Audio, "yes").is_err());
        assert!(parse_flag(Attribute::Audio, "TRUE").is_err());
        assert!(parse_flag(Attribute::Audio, "truely").is_err());
    }

    #[test]
    fn precision_keywords() {
        assert_eq!(parse_precision(Attribute::Precision, "lowp"), Ok(Precision::Lowp));
        assert_eq!(
            parse_precision(Attribute::Precision, "mediump"),
            Ok(Precision::Mediump)
        );
        assert!(parse_precision(Attribute::Precision, "ultrap").is_err());
        assert!(parse_precision(Attribute::Precision, "").is_err());
    }
}
