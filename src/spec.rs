//! # Specification model
//!
//! A specification describes the shape of the output document. It is written
//! as JSON and resolved once, when loaded, into a tree of [`SpecNode`]s:
//!
//! | JSON shape                          | Node                     |
//! |-------------------------------------|--------------------------|
//! | string without the query trigger    | [`SpecNode::Literal`]    |
//! | string with the query trigger       | [`SpecNode::Query`]      |
//! | `[expression, subSpec?, options?]`  | [`SpecNode::Array`]      |
//! | object                              | [`SpecNode::Object`]     |
//! | anything else                       | [`SpecNode::Unrecognized`] |
//!
//! Object keys are classified the same way: a key containing the query
//! trigger becomes a [`Key::Dynamic`] and is evaluated against the document
//! to name the output slot.
//!
//! ## Example
//!
//! ```text
//! {
//!   "foo": ["$.some.crazy", { "bar": "$.example" }, { "merge": true }],
//!   "kind": "static text",
//!   "$.id": "$.value"
//! }
//! ```

use std::{
    fmt, fs,
    path::Path,
    str::FromStr,
    sync::{Arc, LazyLock},
};

use regex::Regex;
use serde_json::Value as JsonValue;

use crate::{error::TransformError, value::Value};

/// Default query trigger: the string contains `$.`.
pub const DEFAULT_TRIGGER: &str = r"\$\.";

/// Opt-in trigger that also treats a leading `$[` and a bare `$` as queries,
/// for bracket-notation paths and the current item.
pub const BRACKET_TRIGGER: &str = r"\$\.|^\$\[|^\$$";

static DEFAULT_TRIGGER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(DEFAULT_TRIGGER).expect("default trigger pattern compiles"));

/// Decides whether a specification string is a query or a literal.
#[derive(Debug, Clone)]
pub struct Trigger(Regex);

impl Trigger {
    pub fn new(pattern: &str) -> Result<Self, TransformError> {
        Ok(Trigger(Regex::new(pattern)?))
    }

    pub fn is_query(&self, text: &str) -> bool {
        self.0.is_match(text)
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl Default for Trigger {
    fn default() -> Self {
        Trigger(DEFAULT_TRIGGER_RE.clone())
    }
}

/// The slot a node writes its value into.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Key {
    /// Literal field name
    Name(String),
    /// Query whose first match names the field
    Dynamic(String),
    /// Array position
    Index(usize),
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::Name(name) => write!(f, "{:?}", name),
            Key::Dynamic(query) => write!(f, "[{}]", query),
            Key::Index(i) => write!(f, "{}", i),
        }
    }
}

/// Modifiers of an array mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ArrayOptions {
    /// Collapse the per-item results into one shallow-merged object
    pub merge: bool,
}

impl ArrayOptions {
    pub fn merge() -> Self {
        ArrayOptions { merge: true }
    }

    /// Read options leniently: anything but an object, or a `merge` that is
    /// not a boolean, leaves the defaults in place.
    fn from_json(value: Option<&JsonValue>) -> Self {
        let merge = value
            .and_then(|v| v.get("merge"))
            .and_then(JsonValue::as_bool)
            .unwrap_or(false);
        ArrayOptions { merge }
    }
}

/// Function backing a [`SpecNode::Custom`] node. It receives the document
/// the node is evaluated against and returns the value for its slot.
pub type Handler = Arc<dyn Fn(&JsonValue) -> Result<Value, TransformError> + Send + Sync>;

/// One node of a specification tree.
#[derive(Clone)]
pub enum SpecNode {
    /// Constant assigned verbatim
    Literal(String),

    /// Query whose first match is assigned
    Query(String),

    /// Select a collection and map `sub` over each selected item
    Array {
        expression: String,
        sub: Option<Box<SpecNode>>,
        options: ArrayOptions,
    },

    /// Nested output object, entries in declaration order
    Object(Vec<(Key, SpecNode)>),

    /// Programmatic leaf
    Custom(Handler),

    /// Any other shape; walking it writes nothing
    Unrecognized,
}

impl SpecNode {
    /// Classify a JSON value as a specification node.
    ///
    /// Loading never fails: shapes that mean nothing to the walker become
    /// [`SpecNode::Unrecognized`] and are skipped during the transform.
    pub fn from_json(value: &JsonValue, trigger: &Trigger) -> Self {
        match value {
            JsonValue::String(s) => Self::leaf(s, trigger),
            JsonValue::Array(parts) => match parts.first() {
                Some(JsonValue::String(expression)) => {
                    let sub = parts
                        .get(1)
                        .filter(|v| !v.is_null())
                        .map(|v| Box::new(SpecNode::from_json(v, trigger)));
                    SpecNode::Array {
                        expression: expression.clone(),
                        sub,
                        options: ArrayOptions::from_json(parts.get(2)),
                    }
                }
                _ => SpecNode::Unrecognized,
            },
            JsonValue::Object(entries) => SpecNode::Object(
                entries
                    .iter()
                    .map(|(name, child)| {
                        let key = if trigger.is_query(name) {
                            Key::Dynamic(name.clone())
                        } else {
                            Key::Name(name.clone())
                        };
                        (key, SpecNode::from_json(child, trigger))
                    })
                    .collect(),
            ),
            JsonValue::Null | JsonValue::Bool(_) | JsonValue::Number(_) => SpecNode::Unrecognized,
        }
    }

    fn leaf(text: &str, trigger: &Trigger) -> Self {
        if trigger.is_query(text) {
            SpecNode::Query(text.to_string())
        } else {
            SpecNode::Literal(text.to_string())
        }
    }

    pub fn literal(text: impl Into<String>) -> Self {
        SpecNode::Literal(text.into())
    }

    pub fn query(expression: impl Into<String>) -> Self {
        SpecNode::Query(expression.into())
    }

    /// Array mapping without options. Pass `None` as `sub` to assign the raw
    /// matches.
    pub fn array(expression: impl Into<String>, sub: Option<SpecNode>) -> Self {
        SpecNode::Array {
            expression: expression.into(),
            sub: sub.map(Box::new),
            options: ArrayOptions::default(),
        }
    }

    /// Array mapping whose per-item results are merged into one object.
    pub fn merged(expression: impl Into<String>, sub: SpecNode) -> Self {
        SpecNode::Array {
            expression: expression.into(),
            sub: Some(Box::new(sub)),
            options: ArrayOptions::merge(),
        }
    }

    pub fn object<K, I>(entries: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, SpecNode)>,
    {
        SpecNode::Object(
            entries
                .into_iter()
                .map(|(name, node)| (Key::Name(name.into()), node))
                .collect(),
        )
    }

    pub fn custom<F>(handler: F) -> Self
    where
        F: Fn(&JsonValue) -> Result<Value, TransformError> + Send + Sync + 'static,
    {
        SpecNode::Custom(Arc::new(handler))
    }

    /// Short name of the node kind, used in logs and outlines.
    pub fn kind(&self) -> &'static str {
        match self {
            SpecNode::Literal(_) => "literal",
            SpecNode::Query(_) => "query",
            SpecNode::Array { options, .. } if options.merge => "array-mapping (merge)",
            SpecNode::Array { .. } => "array-mapping",
            SpecNode::Object(_) => "object-mapping",
            SpecNode::Custom(_) => "custom",
            SpecNode::Unrecognized => "unrecognized",
        }
    }

    fn write_outline(&self, f: &mut fmt::Formatter<'_>, label: &str, depth: usize) -> fmt::Result {
        let pad = "  ".repeat(depth);
        match self {
            SpecNode::Literal(text) => writeln!(f, "{pad}{label}literal {:?}", text),
            SpecNode::Query(query) => writeln!(f, "{pad}{label}query {}", query),
            SpecNode::Array { expression, sub, .. } => {
                writeln!(f, "{pad}{label}{} {}", self.kind(), expression)?;
                match sub {
                    Some(sub) => sub.write_outline(f, "each: ", depth + 1),
                    None => Ok(()),
                }
            }
            SpecNode::Object(entries) => {
                writeln!(f, "{pad}{label}object-mapping")?;
                for (key, child) in entries {
                    child.write_outline(f, &format!("{}: ", key), depth + 1)?;
                }
                Ok(())
            }
            SpecNode::Custom(_) | SpecNode::Unrecognized => {
                writeln!(f, "{pad}{label}{}", self.kind())
            }
        }
    }
}

impl fmt::Debug for SpecNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SpecNode::Literal(text) => f.debug_tuple("Literal").field(text).finish(),
            SpecNode::Query(query) => f.debug_tuple("Query").field(query).finish(),
            SpecNode::Array {
                expression,
                sub,
                options,
            } => f
                .debug_struct("Array")
                .field("expression", expression)
                .field("sub", sub)
                .field("options", options)
                .finish(),
            SpecNode::Object(entries) => f.debug_tuple("Object").field(entries).finish(),
            SpecNode::Custom(_) => f.write_str("Custom(..)"),
            SpecNode::Unrecognized => f.write_str("Unrecognized"),
        }
    }
}

/// A loaded specification.
///
/// Besides the root node it remembers whether the root was written as a JSON
/// array, which decides the root-array handling of the transform.
#[derive(Debug, Clone)]
pub struct Spec {
    root: SpecNode,
    sequence_root: bool,
}

impl Spec {
    /// Load a specification with the default query trigger.
    ///
    /// # Examples
    ///
    /// ```
    /// use jsonpath_transform::spec::{Spec, SpecNode};
    /// use serde_json::json;
    ///
    /// let spec = Spec::from_json(&json!({ "name": "$.user.name", "kind": "user" }));
    /// let SpecNode::Object(entries) = spec.root() else { panic!() };
    /// assert_eq!(entries[0].1.kind(), "query");
    /// assert_eq!(entries[1].1.kind(), "literal");
    /// ```
    pub fn from_json(value: &JsonValue) -> Self {
        Self::with_trigger(value, &Trigger::default())
    }

    pub fn with_trigger(value: &JsonValue, trigger: &Trigger) -> Self {
        Spec {
            root: SpecNode::from_json(value, trigger),
            sequence_root: value.is_array(),
        }
    }

    /// Wrap a programmatically built node.
    pub fn from_node(root: SpecNode) -> Self {
        let sequence_root = matches!(root, SpecNode::Array { .. });
        Spec {
            root,
            sequence_root,
        }
    }

    /// Read a specification from a JSON file.
    pub fn from_path(path: impl AsRef<Path>, trigger: &Trigger) -> Result<Self, TransformError> {
        let text = fs::read_to_string(path)?;
        let value: JsonValue = serde_json::from_str(&text)?;
        Ok(Self::with_trigger(&value, trigger))
    }

    pub fn root(&self) -> &SpecNode {
        &self.root
    }

    /// Whether the specification was written as a top-level JSON array.
    pub fn is_sequence_root(&self) -> bool {
        self.sequence_root
    }
}

impl FromStr for Spec {
    type Err = TransformError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value: JsonValue = serde_json::from_str(s)?;
        Ok(Spec::from_json(&value))
    }
}

/// Indented outline of how every node was classified.
impl fmt::Display for Spec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.root.write_outline(f, "", 0)
    }
}
