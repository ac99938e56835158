#![forbid(unsafe_code)]

//! Query-parameter grammar engine.
//!
//! Raw parameters flow through the components leaf-first: the comparator
//! lexer splits an operator off each raw value, the path resolver walks dotted
//! keys through the schema, the coercer types the remaining literal, and the
//! predicate and order builders assemble the results.

/// Predicate, order and attribute chain value objects.
pub mod ast;

/// Predicate construction and multi-value semantics.
pub mod builder;

/// Literal coercion into declared attribute types.
pub mod coerce;

/// Error types for parsing and schema loading.
pub mod errors;

/// Comparator prefix detection.
pub mod lexer;

/// Schema provider abstraction and the in-memory registry.
pub mod metadata;

/// Sort directive construction.
pub mod order;

/// Ordered multi-valued parameter map.
pub mod params;

/// Parser entry point and options.
pub mod parser;

/// Dotted path resolution.
pub mod path;

/// Coerced scalar values.
pub mod value;

pub use ast::{AttributeChain, Comparator, Direction, Operand, Order, ParsedQuery, Predicate};
pub use errors::{ParseError, ParseErrorWithCode, SchemaError};
pub use lexer::{lex, Lexeme};
pub use metadata::{AttributeDescriptor, SchemaProvider, SchemaRegistry, ValueKind, ValueType};
pub use params::QueryParams;
pub use parser::{ParserOptions, QueryParser};
pub use value::Value;

/// Result alias for parse operations.
pub type Result<T> = std::result::Result<T, ParseError>;
