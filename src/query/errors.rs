#![forbid(unsafe_code)]

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

use crate::query::metadata::ValueKind;

/// Structured errors emitted while turning query parameters into predicates
/// and orders.
///
/// Every variant aborts the whole parse call; callers never observe a partial
/// predicate or order list.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// A path segment does not exist on the schema it was resolved against.
    #[error("unknown attribute '{segment}' on schema '{schema}'")]
    UnknownAttribute {
        /// Offending path segment.
        segment: String,
        /// Schema the segment was looked up in.
        schema: String,
    },
    /// A literal could not be converted to the declared attribute type.
    #[error("cannot coerce '{literal}' to {target}")]
    Coercion {
        /// Raw literal after operator stripping.
        literal: String,
        /// Declared type of the terminal attribute.
        target: ValueKind,
    },
    /// A `direction` token outside `asc`/`desc`.
    #[error("direction '{token}' must be 'asc' or 'desc'")]
    InvalidDirection {
        /// Unrecognized token.
        token: String,
    },
    /// A dotted path that cannot denote a comparable attribute.
    #[error("malformed path '{path}': {reason}")]
    MalformedPath {
        /// Full dotted path as supplied by the caller.
        path: String,
        /// Human-readable explanation.
        reason: String,
    },
}

impl ParseError {
    /// Builds a [`ParseError::UnknownAttribute`].
    pub fn unknown_attribute(segment: impl Into<String>, schema: impl Into<String>) -> Self {
        ParseError::UnknownAttribute {
            segment: segment.into(),
            schema: schema.into(),
        }
    }

    /// Builds a [`ParseError::Coercion`].
    pub fn coercion(literal: impl Into<String>, target: ValueKind) -> Self {
        ParseError::Coercion {
            literal: literal.into(),
            target,
        }
    }

    /// Builds a [`ParseError::MalformedPath`].
    pub fn malformed_path(path: impl Into<String>, reason: impl Into<String>) -> Self {
        ParseError::MalformedPath {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Returns a machine-readable code for the error variant.
    pub fn code(&self) -> &'static str {
        match self {
            ParseError::UnknownAttribute { .. } => "UnknownAttribute",
            ParseError::Coercion { .. } => "CoercionError",
            ParseError::InvalidDirection { .. } => "InvalidDirection",
            ParseError::MalformedPath { .. } => "MalformedPath",
        }
    }
}

/// Convenience wrapper that formats parse errors with their codes.
pub struct ParseErrorWithCode<'a>(pub &'a ParseError);

impl fmt::Display for ParseErrorWithCode<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.0.code(), self.0)
    }
}

/// Errors raised while loading or validating a schema registry.
#[derive(Debug, Error)]
pub enum SchemaError {
    /// Schema file could not be read.
    #[error("failed to read schema file {path}: {source}")]
    Read {
        /// File that was being read.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },
    /// Schema document is not valid TOML or has the wrong shape.
    #[error("failed to parse schema document: {0}")]
    Parse(#[from] toml::de::Error),
    /// Attribute type name was not recognized.
    #[error("attribute '{schema}.{attribute}' has unsupported type '{ty}'")]
    UnsupportedType {
        /// Schema declaring the attribute.
        schema: String,
        /// Attribute name.
        attribute: String,
        /// Type name as written.
        ty: String,
    },
    /// Relation points at a schema that was never declared.
    #[error("relation '{schema}.{attribute}' targets unknown schema '{target}'")]
    UnknownRelationTarget {
        /// Schema declaring the relation.
        schema: String,
        /// Relation attribute name.
        attribute: String,
        /// Missing target schema.
        target: String,
    },
    /// Enumeration declared without members.
    #[error("enumeration '{schema}.{attribute}' declares no members")]
    EmptyEnumeration {
        /// Schema declaring the attribute.
        schema: String,
        /// Attribute name.
        attribute: String,
    },
    /// Attribute name that cannot appear in a dotted path.
    #[error("attribute name '{attribute}' on schema '{schema}' is not addressable")]
    InvalidAttributeName {
        /// Schema declaring the attribute.
        schema: String,
        /// Attribute name.
        attribute: String,
    },
}
