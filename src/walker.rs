//! The specification walker.
//!
//! [`Walker::walk`] descends the specification tree top-down. Every node
//! writes at most one slot of the container it is handed: a field of an
//! object or the next position of an array. The document is only ever read.

use indexmap::IndexMap;
use serde_json::Value as JsonValue;
use tracing::{debug, trace};

use crate::{
    error::TransformError,
    query::QueryEvaluator,
    spec::{ArrayOptions, Key, SpecNode},
    value::Value,
};

/// Field used when a node writes into an object without naming a key.
/// Only the top-level entry does this, and it unwraps the slot afterwards.
pub(crate) const ROOT_SLOT: &str = "\u{0}root";

/// A key after dynamic keys have been evaluated.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Slot {
    Field(String),
    Index(usize),
}

/// Recursive dispatcher over [`SpecNode`]s.
#[derive(Debug, Clone, Default)]
pub struct Walker<E> {
    evaluator: E,
}

impl<E: QueryEvaluator> Walker<E> {
    pub fn new(evaluator: E) -> Self {
        Walker { evaluator }
    }

    /// Walk `node` against `document`, writing its result into `container`
    /// under `key`.
    ///
    /// `container` must be an object or an array. With `key` set to `None`,
    /// an object mapping fills `container` directly while any other node
    /// writes the root placeholder slot.
    pub fn walk(
        &self,
        document: &JsonValue,
        node: &SpecNode,
        container: &mut Value,
        key: Option<&Key>,
    ) -> Result<(), TransformError> {
        let slot = match key {
            Some(key) => match self.resolve_key(document, key)? {
                Some(slot) => Some(slot),
                None => {
                    debug!(key = %key, "dynamic key matched nothing, skipping");
                    return Ok(());
                }
            },
            None => None,
        };

        let value = match node {
            SpecNode::Literal(text) => Value::String(text.clone()),
            SpecNode::Query(query) => self.seek_single(document, query)?,
            SpecNode::Array {
                expression,
                sub,
                options,
            } => self.seek_array(document, expression, sub.as_deref(), options)?,
            SpecNode::Object(entries) => match slot {
                None => return self.fill_object(document, entries, container),
                Some(_) => {
                    let mut object = Value::object();
                    self.fill_object(document, entries, &mut object)?;
                    object
                }
            },
            SpecNode::Custom(handler) => handler(document)?,
            SpecNode::Unrecognized => {
                debug!(?slot, "unrecognized specification node, leaving slot unset");
                return Ok(());
            }
        };

        assign(container, slot, value);
        Ok(())
    }

    fn resolve_key(&self, document: &JsonValue, key: &Key) -> Result<Option<Slot>, TransformError> {
        Ok(match key {
            Key::Name(name) => Some(Slot::Field(name.clone())),
            Key::Index(i) => Some(Slot::Index(*i)),
            Key::Dynamic(query) => self
                .evaluator
                .evaluate(document, query)?
                .first()
                .map(|matched| Slot::Field(key_text(matched))),
        })
    }

    fn seek_single(&self, document: &JsonValue, query: &str) -> Result<Value, TransformError> {
        let matches = self.evaluator.evaluate(document, query)?;
        Ok(matches.first().map_or(Value::Absent, |v| Value::from(*v)))
    }

    fn seek_array(
        &self,
        document: &JsonValue,
        expression: &str,
        sub: Option<&SpecNode>,
        options: &ArrayOptions,
    ) -> Result<Value, TransformError> {
        let matches = self.evaluator.evaluate(document, expression)?;

        let sub = match sub {
            Some(sub) if !matches.is_empty() => sub,
            _ => {
                return Ok(Value::Array(
                    matches.into_iter().map(Value::from).collect(),
                ));
            }
        };

        debug!(expression, matches = matches.len(), "mapping array items");

        let mut output = Value::Array(Vec::new());
        for matched in matches {
            let items = match matched {
                JsonValue::Array(items) => items.as_slice(),
                single => std::slice::from_ref(single),
            };
            for item in items {
                let next = Key::Index(array_len(&output));
                self.walk(item, sub, &mut output, Some(&next))?;
            }
        }

        if options.merge {
            return Ok(merge_objects(output));
        }
        Ok(output)
    }

    fn fill_object(
        &self,
        document: &JsonValue,
        entries: &[(Key, SpecNode)],
        target: &mut Value,
    ) -> Result<(), TransformError> {
        for (key, child) in entries {
            self.walk(document, child, target, Some(key))?;
        }
        Ok(())
    }
}

fn array_len(value: &Value) -> usize {
    match value {
        Value::Array(items) => items.len(),
        _ => 0,
    }
}

/// Field name for a dynamic key's match: strings verbatim, anything else as
/// compact JSON.
fn key_text(matched: &JsonValue) -> String {
    match matched {
        JsonValue::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn assign(container: &mut Value, slot: Option<Slot>, value: Value) {
    let slot = slot.unwrap_or_else(|| Slot::Field(ROOT_SLOT.to_string()));
    trace!(?slot, "assigning slot");
    match (container, slot) {
        (Value::Object(map), Slot::Field(name)) => {
            map.insert(name, value);
        }
        (Value::Object(map), Slot::Index(i)) => {
            map.insert(i.to_string(), value);
        }
        (Value::Array(items), Slot::Index(i)) if i < items.len() => items[i] = value,
        (Value::Array(items), _) => items.push(value),
        (other, slot) => debug!(?slot, ?other, "container cannot hold a slot, dropping value"),
    }
}

/// Fold the objects of an array left to right into one object. Later fields
/// overwrite earlier ones; entries that are not objects contribute nothing.
fn merge_objects(items: Value) -> Value {
    let Value::Array(items) = items else {
        return items;
    };
    let mut merged = IndexMap::new();
    for item in items {
        match item {
            Value::Object(fields) => merged.extend(fields),
            other => trace!(?other, "skipping non-object during merge"),
        }
    }
    Value::Object(merged)
}
