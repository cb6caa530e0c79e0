//! Factory surface: token and node constructors keyed by declared name.
//!
//! Built automatically from the grammar's token declarations and node
//! rules. Test code uses these to assemble expected values; downstream
//! type-declaration generators read the name sets.

use tessera_core::{AstNode, Span, Token, TokenKind, Value};

use crate::grammar::Grammar;

/// View over a grammar's declared token kinds.
pub struct Tokens<'g> {
    grammar: &'g Grammar,
}

impl<'g> Tokens<'g> {
    pub(crate) fn new(grammar: &'g Grammar) -> Self {
        Self { grammar }
    }

    /// Declared kind names, in declaration order.
    pub fn names(&self) -> impl Iterator<Item = &'g str> {
        self.grammar.token_decls().iter().map(|d| d.name.as_str())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.grammar.token_kind(name).is_some()
    }

    pub fn kind(&self, name: &str) -> Option<TokenKind> {
        self.grammar.token_kind(name)
    }

    /// Builds a token of the named kind over `span`.
    pub fn make(&self, name: &str, span: Span) -> Option<Token> {
        Some(Token::new(self.grammar.token_kind(name)?, span))
    }
}

/// View over a grammar's declared node types.
pub struct Nodes<'g> {
    grammar: &'g Grammar,
}

impl<'g> Nodes<'g> {
    pub(crate) fn new(grammar: &'g Grammar) -> Self {
        Self { grammar }
    }

    /// Declared node types, in declaration order.
    pub fn names(&self) -> impl Iterator<Item = &'g str> {
        self.grammar.node_types().iter().map(String::as_str)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.grammar.node_types().iter().any(|n| n == name)
    }

    /// Builds a node of the named type with the given properties and no
    /// recorded token spans.
    pub fn make(&self, name: &str, value: Value) -> Option<AstNode> {
        self.contains(name).then(|| AstNode::new(name, value))
    }

    /// Builds a node of the named type with explicit token spans.
    pub fn make_with_tokens(
        &self,
        name: &str,
        value: Value,
        tokens: Vec<Span>,
    ) -> Option<AstNode> {
        self.contains(name)
            .then(|| AstNode::with_tokens(name, value, tokens))
    }
}
