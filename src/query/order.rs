//! Sort directive construction from the reserved ordering parameters.

use tracing::debug;

use crate::query::ast::{Direction, Order};
use crate::query::errors::ParseError;
use crate::query::metadata::SchemaProvider;
use crate::query::path::resolve_path;
use crate::query::Result;

/// Builds [`Order`]s by zipping sort fields with directions.
pub struct OrderBuilder<'s, S: ?Sized> {
    schema: &'s S,
    root: &'s str,
    separator: Option<char>,
}

impl<'s, S> OrderBuilder<'s, S>
where
    S: SchemaProvider + ?Sized,
{
    /// Creates a builder that treats every raw value as one item.
    pub fn new(schema: &'s S, root: &'s str) -> Self {
        Self {
            schema,
            root,
            separator: None,
        }
    }

    /// Additionally splits raw values on `separator` (`sort=a,b`).
    pub fn with_separator(mut self, separator: Option<char>) -> Self {
        self.separator = separator;
        self
    }

    /// Produces one order per sort field.
    ///
    /// Field `i` takes `direction[i % direction.len()]`, so a short direction
    /// list repeats across a longer sort list. Without directions every
    /// field sorts ascending. All direction tokens are validated up front,
    /// including ones no field ends up using; an empty token is invalid.
    pub fn build(&self, sort: &[String], direction: &[String]) -> Result<Vec<Order>> {
        let directions = self
            .items(direction)
            .map(|token| {
                Direction::from_token(token).ok_or_else(|| ParseError::InvalidDirection {
                    token: token.to_owned(),
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let mut orders = Vec::new();
        let fields = self.items(sort).filter(|item| !item.is_empty());
        for (idx, field) in fields.enumerate() {
            let attributes = resolve_path(self.schema, self.root, field)?;
            let direction = if directions.is_empty() {
                Direction::Asc
            } else {
                directions[idx % directions.len()]
            };
            debug!(field, %direction, "built order");
            orders.push(Order::new(attributes, direction));
        }
        Ok(orders)
    }

    fn items<'a>(&self, raw: &'a [String]) -> impl Iterator<Item = &'a str> + 'a {
        let separator = self.separator;
        raw.iter()
            .flat_map(move |value| -> Box<dyn Iterator<Item = &'a str> + 'a> {
                match separator {
                    Some(sep) => Box::new(value.split(sep)),
                    None => Box::new(std::iter::once(value.as_str())),
                }
            })
    }
}
