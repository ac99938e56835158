//! Predicate construction from filter parameters.

use tracing::debug;

use crate::query::ast::{AttributeChain, Comparator, Operand, Predicate};
use crate::query::coerce::{coerce, coerce_all};
use crate::query::errors::ParseError;
use crate::query::lexer::lex;
use crate::query::metadata::{AttributeDescriptor, SchemaProvider};
use crate::query::path::{resolve_path, ParamKey};
use crate::query::Result;

/// Turns filter keys and their raw values into predicates over one root schema.
pub struct PredicateBuilder<'s, S: ?Sized> {
    schema: &'s S,
    root: &'s str,
}

impl<'s, S> PredicateBuilder<'s, S>
where
    S: SchemaProvider + ?Sized,
{
    /// Creates a builder resolving keys against `root`.
    pub fn new(schema: &'s S, root: &'s str) -> Self {
        Self { schema, root }
    }

    /// Builds predicates for every entry, preserving entry order.
    ///
    /// Fails on the first unresolvable key or uncoercible literal.
    pub fn build<'a, I>(&self, entries: I) -> Result<Vec<Predicate>>
    where
        I: IntoIterator<Item = (&'a str, &'a [String])>,
    {
        let mut predicates = Vec::new();
        for (key, values) in entries {
            self.push_key(key, values, &mut predicates)?;
        }
        Ok(predicates)
    }

    /// Appends the predicates produced by a single key to `out`.
    ///
    /// A `[]` key yields one predicate per value. Otherwise several values
    /// collapse into one membership predicate over their lexed literals, and
    /// a single value is lexed for its comparator. Exists/null markers have
    /// no literal and cannot be members.
    pub fn push_key(
        &self,
        key: &str,
        values: &[String],
        out: &mut Vec<Predicate>,
    ) -> Result<()> {
        if values.is_empty() {
            return Ok(());
        }
        let key = ParamKey::parse(key);
        let chain = resolve_path(self.schema, self.root, key.path)?;

        if key.independent {
            let built = values
                .iter()
                .map(|raw| self.lexed(chain.clone(), raw))
                .collect::<Result<Vec<_>>>()?;
            out.extend(built);
        } else if values.len() > 1 {
            let value_type = terminal(&chain)?.value_type();
            let residuals = values
                .iter()
                .map(|raw| {
                    lex(raw)
                        .literal
                        .ok_or_else(|| ParseError::coercion(raw.as_str(), value_type.kind()))
                })
                .collect::<Result<Vec<_>>>()?;
            let members = coerce_all(value_type, residuals)?;
            out.push(Predicate::new(
                chain,
                Comparator::ContainsAny,
                Operand::Many(members),
            ));
        } else {
            out.push(self.lexed(chain, &values[0])?);
        }
        debug!(
            key = key.path,
            values = values.len(),
            independent = key.independent,
            "built predicates"
        );
        Ok(())
    }

    /// Lexes `raw` and coerces its literal against the chain's terminal attribute.
    pub fn lexed(&self, chain: AttributeChain, raw: &str) -> Result<Predicate> {
        let lexeme = lex(raw);
        let operand = match lexeme.literal {
            None => Operand::None,
            Some(literal) => {
                let terminal = terminal(&chain)?;
                Operand::Single(coerce(terminal.value_type(), literal)?)
            }
        };
        Ok(Predicate::new(chain, lexeme.comparator, operand))
    }
}

fn terminal(chain: &AttributeChain) -> Result<&AttributeDescriptor> {
    chain
        .terminal()
        .ok_or_else(|| ParseError::malformed_path(chain.path(), "path resolves to no attribute"))
}
