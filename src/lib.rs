//! Paramql turns HTTP query parameters into schema-validated predicates and
//! sort orders that a persistence layer can execute.

#![warn(missing_docs)]

pub mod query;

pub use query::{
    lex, AttributeDescriptor, Comparator, Direction, Operand, Order, ParseError, ParsedQuery,
    ParserOptions, Predicate, QueryParams, QueryParser, Result, SchemaError, SchemaProvider,
    SchemaRegistry, Value, ValueType,
};
