//! Indexed rule storage: the executable form of a grammar.
//!
//! [`lower`] flattens [`RuleExpr`] trees into an arena of [`RuleNode`]s
//! addressed by [`RuleId`]. Every named rule owns a pre-allocated entry
//! slot, and name references lower to the slot id - an indirection cell
//! that lets mutually recursive rules mention each other before their
//! bodies exist. Nothing is dereferenced until evaluation.

use indexmap::IndexMap;

use tessera_core::TokenKind;

use crate::combinator::{MapFn, RuleExpr};

use super::GrammarError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct RuleId(u32);

impl RuleId {
    #[inline]
    fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Debug)]
pub(crate) enum RuleNode {
    Token(TokenKind),
    Empty,
    Eof,
    /// Indirection cell standing in for a named alias rule.
    Alias(RuleId),
    Optional(RuleId),
    Sequence(Vec<RuleId>),
    Choice(Vec<RuleId>),
    ZeroOrMore(RuleId),
    OneOrMore(RuleId),
    List {
        item: RuleId,
        separator: RuleId,
        min_len: usize,
    },
    Map {
        inner: RuleId,
        f: MapFn,
    },
    Text(RuleId),
    Struct(Vec<(Option<String>, RuleId)>),
    Node {
        kind: String,
        inner: RuleId,
    },
}

#[derive(Debug)]
pub(crate) struct RuleTable {
    nodes: Vec<RuleNode>,
    token_names: Vec<String>,
}

impl RuleTable {
    #[inline]
    pub fn node(&self, id: RuleId) -> &RuleNode {
        &self.nodes[id.index()]
    }

    #[inline]
    pub fn token_name(&self, kind: TokenKind) -> &str {
        &self.token_names[kind.index()]
    }
}

pub(crate) struct Lowered {
    pub table: RuleTable,
    pub entries: IndexMap<String, RuleId>,
    pub node_types: Vec<String>,
    pub root: String,
}

/// Whether a rule name denotes a node rule (vs. a pass-through alias).
pub(crate) fn is_node_rule(name: &str) -> bool {
    name.chars().next().is_some_and(char::is_uppercase)
}

/// Lowers a full rule set. Rules with uppercase names are wrapped in a node
/// of the same name; the first of them is the root.
pub(crate) fn lower(
    tokens: &IndexMap<String, TokenKind>,
    bodies: &IndexMap<String, RuleExpr>,
) -> Result<Lowered, GrammarError> {
    let mut lowering = Lowering {
        nodes: Vec::with_capacity(bodies.len()),
        tokens,
        entries: IndexMap::with_capacity(bodies.len()),
        node_types: Vec::new(),
    };

    // Reserve one slot per named rule so bodies can reference any of them.
    for name in bodies.keys() {
        let id = lowering.push(RuleNode::Empty);
        lowering.entries.insert(name.clone(), id);
        if is_node_rule(name) {
            lowering.node_types.push(name.clone());
        }
    }
    let root = lowering
        .node_types
        .first()
        .cloned()
        .ok_or(GrammarError::MissingRoot)?;

    for (name, body) in bodies {
        let inner = lowering.lower_expr(body)?;
        let slot = lowering.entries[name];
        lowering.nodes[slot.index()] = if is_node_rule(name) {
            RuleNode::Node {
                kind: name.clone(),
                inner,
            }
        } else {
            RuleNode::Alias(inner)
        };
    }

    let token_names = tokens.keys().cloned().collect();
    Ok(Lowered {
        table: RuleTable {
            nodes: lowering.nodes,
            token_names,
        },
        entries: lowering.entries,
        node_types: lowering.node_types,
        root,
    })
}

struct Lowering<'a> {
    nodes: Vec<RuleNode>,
    tokens: &'a IndexMap<String, TokenKind>,
    entries: IndexMap<String, RuleId>,
    node_types: Vec<String>,
}

impl Lowering<'_> {
    fn push(&mut self, node: RuleNode) -> RuleId {
        let id = RuleId(self.nodes.len() as u32);
        self.nodes.push(node);
        id
    }

    fn lower_expr(&mut self, expr: &RuleExpr) -> Result<RuleId, GrammarError> {
        let node = match expr {
            RuleExpr::Ref(name) => {
                if let Some(kind) = self.tokens.get(name) {
                    RuleNode::Token(*kind)
                } else if let Some(id) = self.entries.get(name) {
                    RuleNode::Alias(*id)
                } else {
                    return Err(GrammarError::UndefinedReference(name.clone()));
                }
            }
            RuleExpr::Token(name) => match self.tokens.get(name) {
                Some(kind) => RuleNode::Token(*kind),
                None => return Err(GrammarError::UndefinedReference(name.clone())),
            },
            RuleExpr::Empty => RuleNode::Empty,
            RuleExpr::Eof => RuleNode::Eof,
            RuleExpr::Optional(inner) => RuleNode::Optional(self.lower_expr(inner)?),
            RuleExpr::Sequence(items) => {
                let items = self.lower_all(items)?;
                RuleNode::Sequence(items)
            }
            RuleExpr::Choice(alternatives) => {
                let alternatives = self.lower_all(alternatives)?;
                RuleNode::Choice(alternatives)
            }
            RuleExpr::ZeroOrMore(inner) => RuleNode::ZeroOrMore(self.lower_expr(inner)?),
            RuleExpr::OneOrMore(inner) => RuleNode::OneOrMore(self.lower_expr(inner)?),
            RuleExpr::List {
                item,
                separator,
                min_len,
            } => RuleNode::List {
                item: self.lower_expr(item)?,
                separator: self.lower_expr(separator)?,
                min_len: *min_len,
            },
            RuleExpr::Map(inner, f) => RuleNode::Map {
                inner: self.lower_expr(inner)?,
                f: f.clone(),
            },
            RuleExpr::Text(inner) => RuleNode::Text(self.lower_expr(inner)?),
            RuleExpr::Struct(fields) => {
                let mut lowered = Vec::with_capacity(fields.len());
                for field in fields {
                    lowered.push((field.name.clone(), self.lower_expr(&field.expr)?));
                }
                RuleNode::Struct(lowered)
            }
            RuleExpr::Node(kind, inner) => {
                if !self.node_types.iter().any(|k| k == kind) {
                    self.node_types.push(kind.clone());
                }
                RuleNode::Node {
                    kind: kind.clone(),
                    inner: self.lower_expr(inner)?,
                }
            }
        };
        Ok(self.push(node))
    }

    fn lower_all(&mut self, exprs: &[RuleExpr]) -> Result<Vec<RuleId>, GrammarError> {
        exprs.iter().map(|e| self.lower_expr(e)).collect()
    }
}
