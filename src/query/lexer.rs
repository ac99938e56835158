//! Comparator detection at the start of a raw parameter value.

use tracing::trace;

use crate::query::ast::Comparator;

/// Operator prefixes in match priority. Longer tokens sharing a first
/// character must precede their shorter forms.
const PREFIXES: &[(&str, Comparator)] = &[
    ("<=", Comparator::LessThanOrEqual),
    (">=", Comparator::GreaterThanOrEqual),
    ("<>", Comparator::NotEqual),
    ("=*", Comparator::EqualIgnoreCase),
    ("==", Comparator::Equal),
    ("=", Comparator::Equal),
    ("<", Comparator::LessThan),
    (">", Comparator::GreaterThan),
    ("∃", Comparator::Exists),
    ("!∅", Comparator::NotNull),
    ("∅", Comparator::Null),
];

/// Comparator and remaining literal extracted from a raw value.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Lexeme<'a> {
    /// Detected operator; [`Comparator::Equal`] when no prefix matched.
    pub comparator: Comparator,
    /// Literal following the operator, `None` for exists/null markers.
    pub literal: Option<&'a str>,
}

/// Splits `raw` into a comparator and residual literal.
///
/// The literal is returned verbatim; no whitespace is trimmed. Anything
/// following an exists/null marker is ignored.
pub fn lex(raw: &str) -> Lexeme<'_> {
    for &(prefix, comparator) in PREFIXES {
        if let Some(rest) = raw.strip_prefix(prefix) {
            let literal = (!comparator.is_unary()).then_some(rest);
            trace!(raw, %comparator, ?literal, "lexed operator prefix");
            return Lexeme {
                comparator,
                literal,
            };
        }
    }
    Lexeme {
        comparator: Comparator::Equal,
        literal: Some(raw),
    }
}
