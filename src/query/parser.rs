//! Parser entry point tying key partitioning, predicates and orders together.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::query::ast::{Order, ParsedQuery, Predicate};
use crate::query::builder::PredicateBuilder;
use crate::query::metadata::SchemaProvider;
use crate::query::order::OrderBuilder;
use crate::query::params::QueryParams;
use crate::query::path::resolve_path;
use crate::query::Result;

/// Reserved parameter names and list handling.
#[derive(Clone, Debug, Eq, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ParserOptions {
    /// Parameter holding sort fields.
    pub sort_key: String,
    /// Parameter holding sort directions.
    pub direction_key: String,
    /// Parameters skipped entirely, typically pagination.
    pub ignored_keys: Vec<String>,
    /// Separator for comma-joined `sort`/`direction` values; `None` keeps
    /// each raw value whole.
    pub list_separator: Option<char>,
}

impl Default for ParserOptions {
    fn default() -> Self {
        Self {
            sort_key: "sort".into(),
            direction_key: "direction".into(),
            ignored_keys: vec!["page".into(), "per_page".into()],
            list_separator: Some(','),
        }
    }
}

impl ParserOptions {
    fn is_reserved(&self, key: &str) -> bool {
        key == self.sort_key
            || key == self.direction_key
            || self.ignored_keys.iter().any(|ignored| ignored == key)
    }
}

/// Translates query parameters into predicates and orders for a schema.
///
/// The parser holds no per-call state; one instance can serve concurrent
/// callers as long as the schema provider is `Sync`.
pub struct QueryParser<S> {
    schema: S,
    options: ParserOptions,
}

impl<S: SchemaProvider> QueryParser<S> {
    /// Creates a parser with default options.
    pub fn new(schema: S) -> Self {
        Self::with_options(schema, ParserOptions::default())
    }

    /// Creates a parser with explicit options.
    pub fn with_options(schema: S, options: ParserOptions) -> Self {
        Self { schema, options }
    }

    /// Options in effect.
    pub fn options(&self) -> &ParserOptions {
        &self.options
    }

    /// Builds both predicates and orders for `root`.
    pub fn parse(&self, params: &QueryParams, root: &str) -> Result<ParsedQuery> {
        let predicates = self.predicates(params, root)?;
        let orders = self.orders(params, root)?;
        debug!(
            root,
            predicates = predicates.len(),
            orders = orders.len(),
            "parsed query parameters"
        );
        Ok(ParsedQuery { predicates, orders })
    }

    /// Builds predicates from every non-reserved parameter, in parameter order.
    pub fn predicates(&self, params: &QueryParams, root: &str) -> Result<Vec<Predicate>> {
        let filters = params.iter().filter(|(key, _)| !self.options.is_reserved(key));
        PredicateBuilder::new(&self.schema, root).build(filters)
    }

    /// Builds orders from the reserved sort and direction parameters.
    pub fn orders(&self, params: &QueryParams, root: &str) -> Result<Vec<Order>> {
        OrderBuilder::new(&self.schema, root)
            .with_separator(self.options.list_separator)
            .build(
                params.get(&self.options.sort_key),
                params.get(&self.options.direction_key),
            )
    }

    /// Resolves `path` and builds a predicate from one raw value.
    ///
    /// The value is lexed for its comparator exactly as a single-valued
    /// parameter would be.
    pub fn coerce(&self, root: &str, path: &str, raw: &str) -> Result<Predicate> {
        let chain = resolve_path(&self.schema, root, path)?;
        PredicateBuilder::new(&self.schema, root).lexed(chain, raw)
    }
}
