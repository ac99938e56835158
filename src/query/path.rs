//! Dotted parameter key resolution against a schema.

use tracing::trace;

use crate::query::ast::AttributeChain;
use crate::query::errors::ParseError;
use crate::query::metadata::{SchemaProvider, ValueType};
use crate::query::Result;

/// Key suffix marking every raw value as an independent predicate.
pub const ARRAY_SUFFIX: &str = "[]";

/// Parameter key with the array marker split off.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct ParamKey<'a> {
    /// Dotted attribute path.
    pub path: &'a str,
    /// `true` when the key carried a trailing `[]`.
    pub independent: bool,
}

impl<'a> ParamKey<'a> {
    /// Strips a trailing `[]` from `key`.
    pub fn parse(key: &'a str) -> Self {
        match key.strip_suffix(ARRAY_SUFFIX) {
            Some(path) => Self {
                path,
                independent: true,
            },
            None => Self {
                path: key,
                independent: false,
            },
        }
    }
}

/// Walks `path` segment by segment starting at `root`.
///
/// Relations switch the lookup schema for the next segment. The path may end
/// on a relation only when that relation is identifier-typed, since any other
/// relation has no value to compare against.
pub fn resolve_path<S>(schema: &S, root: &str, path: &str) -> Result<AttributeChain>
where
    S: SchemaProvider + ?Sized,
{
    let mut chain = AttributeChain::default();
    let mut current: Option<String> = Some(root.to_owned());

    for segment in path.split('.') {
        if segment.is_empty() {
            return Err(ParseError::malformed_path(path, "empty path segment"));
        }
        let Some(schema_name) = current.take() else {
            let previous = chain.terminal().map(|a| a.name().to_owned()).unwrap_or_default();
            return Err(ParseError::malformed_path(
                path,
                format!("'{previous}' is not a relation and cannot be traversed"),
            ));
        };
        let attribute = schema
            .resolve(&schema_name, segment)
            .ok_or_else(|| ParseError::unknown_attribute(segment, &schema_name))?;
        trace!(segment, schema = %schema_name, target = ?attribute.target(), "resolved segment");
        current = attribute.target().map(str::to_owned);
        chain.push(attribute);
    }

    if let Some(terminal) = chain.terminal() {
        let comparable = matches!(terminal.value_type(), ValueType::Identifier { .. });
        if terminal.is_relation() && !comparable {
            return Err(ParseError::malformed_path(
                path,
                format!("relation '{}' needs a sub-attribute", terminal.name()),
            ));
        }
    }
    Ok(chain)
}
