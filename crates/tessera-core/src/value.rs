//! Dynamic result values produced by rule evaluation.
//!
//! Grammars are assembled at runtime, so rule results are dynamically shaped
//! rather than statically typed: a matched token, extracted text, a
//! positional tuple (from sequences), an ordered record (from structs), a
//! list (from repetitions), or a finished AST node.
//!
//! Values serialize to JSON with nodes rendered as
//! `{"type": .., "properties": .., "tokens": [[start, end], ..]}`, the shape
//! consumed by downstream type-declaration tooling.

use serde::ser::{Serialize, SerializeMap, SerializeSeq, Serializer};

use crate::span::Span;
use crate::token::Token;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    /// Absence of a value: `empty`, a failed `optional`, anonymous fields.
    Null,
    Token(Token),
    Text(String),
    List(Vec<Value>),
    Tuple(Vec<Value>),
    /// Named fields in evaluation order.
    Record(Vec<(String, Value)>),
    Node(Box<AstNode>),
}

impl Value {
    /// Field lookup on record values; `None` for everything else.
    pub fn get(&self, name: &str) -> Option<&Value> {
        match self {
            Value::Record(fields) => fields.iter().find(|(k, _)| k == name).map(|(_, v)| v),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_node(&self) -> Option<&AstNode> {
        match self {
            Value::Node(node) => Some(node),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }
}

/// A typed AST node.
///
/// `kind` is one of the closed set of node types declared by the grammar.
/// `value` holds the node's properties: a record of named fields or a
/// positional tuple/list, depending on the rule body. `tokens` records the
/// span of every leaf token consumed while producing this node, in
/// consumption order; it is informational and never consulted for parsing
/// decisions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AstNode {
    pub kind: String,
    pub value: Value,
    pub tokens: Vec<Span>,
}

impl AstNode {
    pub fn new(kind: impl Into<String>, value: Value) -> Self {
        Self {
            kind: kind.into(),
            value,
            tokens: Vec::new(),
        }
    }

    pub fn with_tokens(kind: impl Into<String>, value: Value, tokens: Vec<Span>) -> Self {
        Self {
            kind: kind.into(),
            value,
            tokens,
        }
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Null => serializer.serialize_none(),
            Value::Token(token) => {
                let mut map = serializer.serialize_map(Some(2))?;
                map.serialize_entry("kind", &token.kind.index())?;
                map.serialize_entry("span", &token.span)?;
                map.end()
            }
            Value::Text(text) => serializer.serialize_str(text),
            Value::List(items) | Value::Tuple(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            Value::Record(fields) => {
                let mut map = serializer.serialize_map(Some(fields.len()))?;
                for (name, value) in fields {
                    map.serialize_entry(name, value)?;
                }
                map.end()
            }
            Value::Node(node) => node.serialize(serializer),
        }
    }
}

impl Serialize for AstNode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(3))?;
        map.serialize_entry("type", &self.kind)?;
        map.serialize_entry("properties", &self.value)?;
        map.serialize_entry("tokens", &self.tokens)?;
        map.end()
    }
}
