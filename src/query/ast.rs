//! Output model of a parse call: predicates and orders over attribute chains.
//!
//! Everything here is an immutable value object. The parser builds them once
//! per call and hands them to the execution layer, which decides how an
//! attribute chain maps onto joins or nested lookups.

use std::fmt;
use std::sync::Arc;

use serde::ser::{SerializeSeq, Serializer};
use serde::Serialize;
use smallvec::SmallVec;

use crate::query::metadata::AttributeDescriptor;
use crate::query::Value;

/// Comparison operator carried by a predicate.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum Comparator {
    /// Exact equality.
    Equal,
    /// Case-insensitive equality.
    EqualIgnoreCase,
    /// Inequality.
    NotEqual,
    /// Strictly greater than.
    GreaterThan,
    /// Greater than or equal.
    GreaterThanOrEqual,
    /// Strictly less than.
    LessThan,
    /// Less than or equal.
    LessThanOrEqual,
    /// Attribute is present; carries no value.
    Exists,
    /// Attribute is not null; carries no value.
    NotNull,
    /// Attribute is null; carries no value.
    Null,
    /// Attribute equals any member of the value sequence.
    ContainsAny,
}

impl Comparator {
    /// Canonical symbol used for display and for re-lexing.
    pub const fn symbol(self) -> &'static str {
        match self {
            Comparator::Equal => "==",
            Comparator::EqualIgnoreCase => "=*",
            Comparator::NotEqual => "<>",
            Comparator::GreaterThan => ">",
            Comparator::GreaterThanOrEqual => ">=",
            Comparator::LessThan => "<",
            Comparator::LessThanOrEqual => "<=",
            Comparator::Exists => "∃",
            Comparator::NotNull => "!∅",
            Comparator::Null => "∅",
            Comparator::ContainsAny => "*",
        }
    }

    /// Returns `true` for comparators that never carry a value.
    pub const fn is_unary(self) -> bool {
        matches!(
            self,
            Comparator::Exists | Comparator::NotNull | Comparator::Null
        )
    }
}

impl fmt::Display for Comparator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

impl Serialize for Comparator {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.symbol())
    }
}

/// Sort direction of an order directive.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Smallest first.
    #[default]
    Asc,
    /// Largest first.
    Desc,
}

impl Direction {
    /// Parses `asc` / `desc` in any letter case.
    pub fn from_token(token: &str) -> Option<Self> {
        if token.eq_ignore_ascii_case("asc") {
            Some(Direction::Asc)
        } else if token.eq_ignore_ascii_case("desc") {
            Some(Direction::Desc)
        } else {
            None
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Asc => f.write_str("ASC"),
            Direction::Desc => f.write_str("DESC"),
        }
    }
}

/// Attributes visited while walking a dotted path from the root schema.
///
/// Never empty once produced by the resolver; every element after the first
/// belongs to the target schema of the element before it.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AttributeChain(SmallVec<[Arc<AttributeDescriptor>; 4]>);

impl AttributeChain {
    pub(crate) fn push(&mut self, attribute: Arc<AttributeDescriptor>) {
        self.0.push(attribute);
    }

    /// Number of attributes in the chain.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if the chain holds no attributes.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Attribute the predicate or order ultimately applies to.
    pub fn terminal(&self) -> Option<&AttributeDescriptor> {
        self.0.last().map(AsRef::as_ref)
    }

    /// Iterates the chain from root to terminal.
    pub fn iter(&self) -> impl Iterator<Item = &AttributeDescriptor> {
        self.0.iter().map(AsRef::as_ref)
    }

    /// Attribute at `idx`, counting from the root.
    pub fn get(&self, idx: usize) -> Option<&AttributeDescriptor> {
        self.0.get(idx).map(AsRef::as_ref)
    }

    /// Dotted path reconstructed from attribute names.
    pub fn path(&self) -> String {
        let names: Vec<&str> = self.iter().map(AttributeDescriptor::name).collect();
        names.join(".")
    }
}

impl fmt::Display for AttributeChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

impl Serialize for AttributeChain {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.len()))?;
        for attribute in self.iter() {
            seq.serialize_element(attribute.name())?;
        }
        seq.end()
    }
}

/// Value operand of a predicate.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Operand {
    /// Exists/null checks carry nothing.
    None,
    /// Single coerced scalar.
    Single(Value),
    /// Ordered membership set for [`Comparator::ContainsAny`].
    Many(Vec<Value>),
}

impl Operand {
    /// Returns the scalar operand, if any.
    pub fn as_single(&self) -> Option<&Value> {
        match self {
            Operand::Single(value) => Some(value),
            _ => None,
        }
    }

    /// Returns the membership set, if any.
    pub fn as_many(&self) -> Option<&[Value]> {
        match self {
            Operand::Many(values) => Some(values),
            _ => None,
        }
    }
}

/// Single typed filter condition.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Predicate {
    attributes: AttributeChain,
    comparator: Comparator,
    value: Operand,
}

impl Predicate {
    pub(crate) fn new(attributes: AttributeChain, comparator: Comparator, value: Operand) -> Self {
        Self {
            attributes,
            comparator,
            value,
        }
    }

    /// Full attribute chain.
    pub fn attributes(&self) -> &AttributeChain {
        &self.attributes
    }

    /// Terminal attribute the condition applies to.
    pub fn attribute(&self) -> &AttributeDescriptor {
        // The resolver never yields an empty chain.
        self.attributes
            .terminal()
            .unwrap_or_else(|| unreachable!("predicate built over an empty attribute chain"))
    }

    /// Comparison operator.
    pub fn comparator(&self) -> Comparator {
        self.comparator
    }

    /// Coerced operand.
    pub fn value(&self) -> &Operand {
        &self.value
    }
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.attributes, self.comparator)?;
        match &self.value {
            Operand::None => Ok(()),
            Operand::Single(value) => write!(f, " {value}"),
            Operand::Many(values) => {
                let rendered: Vec<String> = values.iter().map(ToString::to_string).collect();
                write!(f, " [{}]", rendered.join(", "))
            }
        }
    }
}

/// Single sort directive.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Order {
    attributes: AttributeChain,
    direction: Direction,
}

impl Order {
    pub(crate) fn new(attributes: AttributeChain, direction: Direction) -> Self {
        Self {
            attributes,
            direction,
        }
    }

    /// Attribute chain of the sort field.
    pub fn attributes(&self) -> &AttributeChain {
        &self.attributes
    }

    /// Sort direction.
    pub fn direction(&self) -> Direction {
        self.direction
    }
}

impl fmt::Display for Order {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.attributes, self.direction)
    }
}

/// Result of [`QueryParser::parse`](crate::query::QueryParser::parse).
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct ParsedQuery {
    /// Filter conditions in parameter order.
    pub predicates: Vec<Predicate>,
    /// Sort directives in `sort` order.
    pub orders: Vec<Order>,
}
