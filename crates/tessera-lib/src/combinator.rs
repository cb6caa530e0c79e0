//! The combinator algebra: rule expressions and their constructors.
//!
//! A grammar body is a tree of [`RuleExpr`]s built with the free functions
//! in this module. Expressions mention other rules by name; references stay
//! symbolic until [`GrammarBuilder::build`](crate::GrammarBuilder::build)
//! resolves them against the finished rule set, which is what makes mutual
//! recursion work without forward declarations.

use std::fmt;
use std::sync::Arc;

use tessera_core::Value;

/// A pure value transform attached to a [`RuleExpr::Map`].
#[derive(Clone)]
pub struct MapFn(Arc<dyn Fn(Value) -> Value + Send + Sync>);

impl MapFn {
    pub fn new(f: impl Fn(Value) -> Value + Send + Sync + 'static) -> Self {
        Self(Arc::new(f))
    }

    pub fn apply(&self, value: Value) -> Value {
        (self.0)(value)
    }
}

impl fmt::Debug for MapFn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("MapFn")
    }
}

/// One field of a [`RuleExpr::Struct`].
///
/// Anonymous fields are parsed but dropped from the resulting record.
#[derive(Debug, Clone)]
pub struct Field {
    pub name: Option<String>,
    pub expr: RuleExpr,
}

/// Body of a grammar rule, before name resolution.
#[derive(Debug, Clone)]
pub enum RuleExpr {
    /// Reference by name: resolves to a token kind if the name is declared
    /// as a token, otherwise to the rule of that name.
    Ref(String),
    /// Reference that must resolve to a declared token kind.
    Token(String),
    Empty,
    Eof,
    Optional(Box<RuleExpr>),
    Sequence(Vec<RuleExpr>),
    Choice(Vec<RuleExpr>),
    ZeroOrMore(Box<RuleExpr>),
    OneOrMore(Box<RuleExpr>),
    List {
        item: Box<RuleExpr>,
        separator: Box<RuleExpr>,
        min_len: usize,
    },
    Map(Box<RuleExpr>, MapFn),
    Text(Box<RuleExpr>),
    Struct(Vec<Field>),
    Node(String, Box<RuleExpr>),
}

/// Matches one token of the named kind and yields it.
pub fn token(name: impl Into<String>) -> RuleExpr {
    RuleExpr::Token(name.into())
}

/// References the rule (or token) of the given name.
pub fn rule(name: impl Into<String>) -> RuleExpr {
    RuleExpr::Ref(name.into())
}

/// Always succeeds with `Null`, consuming nothing.
pub fn empty() -> RuleExpr {
    RuleExpr::Empty
}

/// Succeeds only past the last token.
pub fn eof() -> RuleExpr {
    RuleExpr::Eof
}

/// Yields the inner value on success, `Null` (without advancing) otherwise.
pub fn optional(inner: RuleExpr) -> RuleExpr {
    RuleExpr::Optional(Box::new(inner))
}

/// All items in order; yields a positional tuple.
pub fn sequence(items: Vec<RuleExpr>) -> RuleExpr {
    RuleExpr::Sequence(items)
}

/// First matching alternative wins; on total failure the reported error is
/// the one that got furthest.
pub fn choice(alternatives: Vec<RuleExpr>) -> RuleExpr {
    RuleExpr::Choice(alternatives)
}

pub fn zero_or_more(inner: RuleExpr) -> RuleExpr {
    RuleExpr::ZeroOrMore(Box::new(inner))
}

pub fn one_or_more(inner: RuleExpr) -> RuleExpr {
    RuleExpr::OneOrMore(Box::new(inner))
}

/// Separated list, possibly empty. Separator values are dropped; a trailing
/// separator is left unconsumed so the enclosing rule fails at it.
pub fn list(item: RuleExpr, separator: RuleExpr) -> RuleExpr {
    list_min(item, separator, 0)
}

/// Separated list with a minimum number of items.
pub fn list_min(item: RuleExpr, separator: RuleExpr, min_len: usize) -> RuleExpr {
    RuleExpr::List {
        item: Box::new(item),
        separator: Box::new(separator),
        min_len,
    }
}

/// Transforms the inner value; state threading and errors pass through.
pub fn map(inner: RuleExpr, f: impl Fn(Value) -> Value + Send + Sync + 'static) -> RuleExpr {
    RuleExpr::Map(Box::new(inner), MapFn::new(f))
}

/// Yields the concatenated source text of every token the inner rule
/// consumed.
pub fn text(inner: RuleExpr) -> RuleExpr {
    RuleExpr::Text(Box::new(inner))
}

/// A named struct field.
pub fn field(name: impl Into<String>, expr: RuleExpr) -> Field {
    Field {
        name: Some(name.into()),
        expr,
    }
}

/// An anonymous struct field: parsed, then dropped from the record.
pub fn anon(expr: RuleExpr) -> Field {
    Field { name: None, expr }
}

/// Field rules in order; yields a record of the named fields.
pub fn structure(fields: Vec<Field>) -> RuleExpr {
    RuleExpr::Struct(fields)
}

/// Wraps the inner value and its consumed token spans into an AST node.
///
/// Rules with uppercase names get this wrapper automatically; an explicit
/// `node` is only needed for ad-hoc kinds inside handwritten rule bodies.
pub fn node(kind: impl Into<String>, inner: RuleExpr) -> RuleExpr {
    RuleExpr::Node(kind.into(), Box::new(inner))
}
