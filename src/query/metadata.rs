//! Schema metadata consumed by the path resolver.
//!
//! The parser never inspects entity types directly. It asks a
//! [`SchemaProvider`] for the descriptor of one attribute at a time, which keeps
//! it independent of whatever metamodel the host application maintains.
//! [`SchemaRegistry`] is the in-memory provider used by the CLI and tests; it
//! can be assembled programmatically or loaded from a TOML document.

use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::Path;
use std::sync::Arc;

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::query::errors::SchemaError;

/// Tag-only view of a [`ValueType`], used in error reports.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueKind {
    /// Free-form text.
    Text,
    /// Signed 64-bit integer.
    Integer,
    /// 64-bit floating point number.
    Decimal,
    /// `true` / `false`.
    Boolean,
    /// Calendar date without time of day.
    Date,
    /// Closed set of named members.
    Enumeration,
    /// Entity identifier.
    Identifier,
}

impl ValueKind {
    /// Lowercase name matching the schema document spelling.
    pub fn as_str(self) -> &'static str {
        match self {
            ValueKind::Text => "text",
            ValueKind::Integer => "integer",
            ValueKind::Decimal => "decimal",
            ValueKind::Boolean => "boolean",
            ValueKind::Date => "date",
            ValueKind::Enumeration => "enumeration",
            ValueKind::Identifier => "identifier",
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Declared value type of an attribute.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ValueType {
    /// Free-form text, compared verbatim.
    Text,
    /// Signed 64-bit integer.
    Integer,
    /// 64-bit floating point number.
    Decimal,
    /// `true` / `false`.
    Boolean,
    /// Calendar date in `YYYY-MM-DD` form.
    Date,
    /// Closed set of member names, matched case-sensitively.
    Enumeration(Vec<String>),
    /// Entity identifier; numeric identifiers must parse as integers.
    Identifier {
        /// Whether identifier literals must be integers.
        numeric: bool,
    },
}

impl ValueType {
    /// Numeric identifier, the common case for surrogate keys.
    pub const ID: ValueType = ValueType::Identifier { numeric: true };

    /// Builds an enumeration type from member names.
    pub fn enumeration<I, S>(members: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        ValueType::Enumeration(members.into_iter().map(Into::into).collect())
    }

    /// Returns the tag of this type.
    pub fn kind(&self) -> ValueKind {
        match self {
            ValueType::Text => ValueKind::Text,
            ValueType::Integer => ValueKind::Integer,
            ValueType::Decimal => ValueKind::Decimal,
            ValueType::Boolean => ValueKind::Boolean,
            ValueType::Date => ValueKind::Date,
            ValueType::Enumeration(_) => ValueKind::Enumeration,
            ValueType::Identifier { .. } => ValueKind::Identifier,
        }
    }
}

/// Read-only description of one schema attribute.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct AttributeDescriptor {
    name: String,
    value_type: ValueType,
    target: Option<String>,
}

impl AttributeDescriptor {
    /// Describes a scalar attribute.
    pub fn new(name: impl Into<String>, value_type: ValueType) -> Self {
        Self {
            name: name.into(),
            value_type,
            target: None,
        }
    }

    /// Describes a relation attribute whose path continues in `target`.
    pub fn relation(
        name: impl Into<String>,
        value_type: ValueType,
        target: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            value_type,
            target: Some(target.into()),
        }
    }

    /// Attribute name as it appears in parameter keys.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declared value type.
    pub fn value_type(&self) -> &ValueType {
        &self.value_type
    }

    /// Target schema when the attribute is a relation.
    pub fn target(&self) -> Option<&str> {
        self.target.as_deref()
    }

    /// Returns `true` if the attribute points at another schema.
    pub fn is_relation(&self) -> bool {
        self.target.is_some()
    }
}

/// Resolves attribute names against named schemas.
///
/// Implementations must behave as immutable for the duration of a parse call.
pub trait SchemaProvider {
    /// Looks up `attribute` on `schema`, returning `None` when either is unknown.
    fn resolve(&self, schema: &str, attribute: &str) -> Option<Arc<AttributeDescriptor>>;
}

impl<T: SchemaProvider + ?Sized> SchemaProvider for &T {
    fn resolve(&self, schema: &str, attribute: &str) -> Option<Arc<AttributeDescriptor>> {
        (**self).resolve(schema, attribute)
    }
}

impl<T: SchemaProvider + ?Sized> SchemaProvider for Arc<T> {
    fn resolve(&self, schema: &str, attribute: &str) -> Option<Arc<AttributeDescriptor>> {
        (**self).resolve(schema, attribute)
    }
}

/// Attributes of one schema, in insertion order. Schemas loaded from TOML
/// insert their attributes in lexical name order.
#[derive(Clone, Debug, Default)]
pub struct Schema {
    attributes: Vec<Arc<AttributeDescriptor>>,
    by_name: FxHashMap<String, usize>,
}

impl Schema {
    fn insert(&mut self, attribute: AttributeDescriptor) {
        let attribute = Arc::new(attribute);
        if let Some(&idx) = self.by_name.get(attribute.name()) {
            self.attributes[idx] = attribute;
            return;
        }
        self.by_name
            .insert(attribute.name().to_owned(), self.attributes.len());
        self.attributes.push(attribute);
    }

    /// Looks up an attribute by name.
    pub fn get(&self, name: &str) -> Option<&Arc<AttributeDescriptor>> {
        self.by_name.get(name).map(|&idx| &self.attributes[idx])
    }

    /// Iterates attributes in insertion order.
    pub fn attributes(&self) -> impl Iterator<Item = &AttributeDescriptor> {
        self.attributes.iter().map(AsRef::as_ref)
    }
}

/// In-memory schema provider populated once and then shared read-only.
#[derive(Clone, Debug, Default)]
pub struct SchemaRegistry {
    schemas: FxHashMap<String, Schema>,
}

impl SchemaRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Declares a schema with no attributes.
    pub fn with_schema(mut self, schema: impl Into<String>) -> Self {
        self.schemas.entry(schema.into()).or_default();
        self
    }

    /// Registers an attribute on `schema`, replacing any previous one with
    /// the same name.
    pub fn with_attribute(
        mut self,
        schema: impl Into<String>,
        attribute: AttributeDescriptor,
    ) -> Self {
        self.insert(schema, attribute);
        self
    }

    /// Registers an attribute on `schema` in place.
    pub fn insert(&mut self, schema: impl Into<String>, attribute: AttributeDescriptor) {
        self.schemas
            .entry(schema.into())
            .or_default()
            .insert(attribute);
    }

    /// Returns the named schema.
    pub fn schema(&self, name: &str) -> Option<&Schema> {
        self.schemas.get(name)
    }

    /// Returns registered schema names in lexical order.
    pub fn schema_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.schemas.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Checks that every relation targets a declared schema and every
    /// enumeration has members.
    pub fn validate(&self) -> Result<(), SchemaError> {
        for name in self.schema_names() {
            let Some(schema) = self.schemas.get(name) else {
                continue;
            };
            for attribute in schema.attributes() {
                if attribute.name().is_empty()
                    || attribute.name().contains('.')
                    || attribute.name().ends_with("[]")
                {
                    return Err(SchemaError::InvalidAttributeName {
                        schema: name.to_owned(),
                        attribute: attribute.name().to_owned(),
                    });
                }
                if let ValueType::Enumeration(members) = attribute.value_type() {
                    if members.is_empty() {
                        return Err(SchemaError::EmptyEnumeration {
                            schema: name.to_owned(),
                            attribute: attribute.name().to_owned(),
                        });
                    }
                }
                if let Some(target) = attribute.target() {
                    if !self.schemas.contains_key(target) {
                        return Err(SchemaError::UnknownRelationTarget {
                            schema: name.to_owned(),
                            attribute: attribute.name().to_owned(),
                            target: target.to_owned(),
                        });
                    }
                }
            }
        }
        Ok(())
    }

    /// Parses and validates a TOML schema document.
    ///
    /// ```toml
    /// [schemas.Recurso]
    /// id = "identifier"
    /// nome = "text"
    /// aplicacao = { type = "identifier", relation = "Aplicacao" }
    ///
    /// [schemas.Aplicacao]
    /// tipo = { type = "enumeration", members = ["A", "B"] }
    /// ```
    pub fn from_toml_str(input: &str) -> Result<Self, SchemaError> {
        let raw: RawSchemaDocument = toml::from_str(input)?;
        let mut registry = SchemaRegistry::new();
        for (schema, attributes) in raw.schemas {
            registry = registry.with_schema(schema.as_str());
            for (name, raw_attr) in attributes {
                let attribute = convert_attribute(&schema, name, raw_attr)?;
                registry.insert(schema.clone(), attribute);
            }
        }
        registry.validate()?;
        Ok(registry)
    }

    /// Reads a TOML schema document from disk.
    pub fn load(path: &Path) -> Result<Self, SchemaError> {
        let contents = fs::read_to_string(path).map_err(|source| SchemaError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&contents)
    }
}

impl SchemaProvider for SchemaRegistry {
    fn resolve(&self, schema: &str, attribute: &str) -> Option<Arc<AttributeDescriptor>> {
        self.schemas.get(schema)?.get(attribute).cloned()
    }
}

#[derive(Debug, Default, Deserialize)]
struct RawSchemaDocument {
    #[serde(default)]
    schemas: BTreeMap<String, BTreeMap<String, RawAttribute>>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawAttribute {
    Short(String),
    Full {
        #[serde(rename = "type")]
        ty: String,
        #[serde(default)]
        relation: Option<String>,
        #[serde(default)]
        members: Vec<String>,
        #[serde(default)]
        numeric: Option<bool>,
    },
}

fn convert_attribute(
    schema: &str,
    name: String,
    raw: RawAttribute,
) -> Result<AttributeDescriptor, SchemaError> {
    let (ty, relation, members, numeric) = match raw {
        RawAttribute::Short(ty) => (ty, None, Vec::new(), None),
        RawAttribute::Full {
            ty,
            relation,
            members,
            numeric,
        } => (ty, relation, members, numeric),
    };
    let value_type = match ty.trim().to_ascii_lowercase().as_str() {
        "text" | "string" => ValueType::Text,
        "integer" | "int" | "long" => ValueType::Integer,
        "decimal" | "float" | "double" => ValueType::Decimal,
        "boolean" | "bool" => ValueType::Boolean,
        "date" => ValueType::Date,
        "enumeration" | "enum" => ValueType::Enumeration(members),
        "identifier" | "id" => ValueType::Identifier {
            numeric: numeric.unwrap_or(true),
        },
        _ => {
            return Err(SchemaError::UnsupportedType {
                schema: schema.to_owned(),
                attribute: name,
                ty,
            })
        }
    };
    Ok(match relation {
        Some(target) => AttributeDescriptor::relation(name, value_type, target),
        None => AttributeDescriptor::new(name, value_type),
    })
}
