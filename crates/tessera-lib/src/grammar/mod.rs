//! Grammar assembly and the parse driver.
//!
//! A [`Grammar`] is immutable once built: the token patterns are compiled,
//! every rule reference is resolved into an indexed rule table, and the
//! root is fixed. Parsing is a pure function of the grammar and the source,
//! so one grammar can serve concurrent `parse` calls.

mod builder;
pub(crate) mod table;


use indexmap::IndexMap;
use serde::Serialize;

use tessera_core::{AstNode, Token, TokenDecl, TokenKind, Value};

use crate::combinator::RuleExpr;
use crate::diagnostics::{ErrorKind, ParseError, RuleError};
use crate::eval::Evaluator;
use crate::factory::{Nodes, Tokens};
use crate::lexer::Lexer;
use crate::printer::AstPrinter;
use crate::{Error, dsl};

pub use builder::{GrammarBuilder, GrammarError};

use table::{Lowered, RuleId, RuleTable};

/// The name surface of a grammar: token declarations, rule names, node
/// types, and the root, in declaration order.
///
/// This is everything a downstream type-declaration generator needs to
/// mirror the closed kind sets into another language; it serializes to
/// JSON together with the DSL AST from [`dsl::parse`](crate::dsl::parse).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GrammarSummary {
    pub tokens: Vec<TokenDecl>,
    pub rules: Vec<String>,
    pub node_types: Vec<String>,
    pub root: String,
}

/// A compiled grammar: lexer, resolved rule table, root, and the factory
/// surface over the declared token and node names.
#[derive(Debug)]
pub struct Grammar {
    decls: Vec<TokenDecl>,
    token_kinds: IndexMap<String, TokenKind>,
    bodies: IndexMap<String, RuleExpr>,
    lexer: Lexer,
    table: RuleTable,
    entries: IndexMap<String, RuleId>,
    node_types: Vec<String>,
    root: String,
}

impl Grammar {
    /// Parses a grammar description in the DSL and lowers it into a new
    /// grammar. The DSL is parsed by this crate's own bootstrap grammar, so
    /// this is just another `parse` call followed by a structural rewrite.
    pub fn from_dsl(source: &str) -> Result<Grammar, Error> {
        let ast = dsl::parse(source)?;
        let builder = dsl::lower_program(&ast)?;
        Ok(builder.build()?)
    }

    pub(crate) fn assemble(
        decls: Vec<TokenDecl>,
        rules: Vec<(String, RuleExpr)>,
    ) -> Result<Grammar, GrammarError> {
        let mut tokens = IndexMap::with_capacity(decls.len());
        for (index, decl) in decls.iter().enumerate() {
            let kind = TokenKind::new(index as u16);
            if tokens.insert(decl.name.clone(), kind).is_some() {
                return Err(GrammarError::DuplicateName(decl.name.clone()));
            }
        }

        let mut bodies: IndexMap<String, RuleExpr> = IndexMap::with_capacity(rules.len());
        for (name, body) in rules {
            if tokens.contains_key(&name) || bodies.insert(name.clone(), body).is_some() {
                return Err(GrammarError::DuplicateName(name));
            }
        }

        let lexer = Lexer::compile(&decls)?;
        let Lowered {
            table,
            entries,
            node_types,
            root,
        } = table::lower(&tokens, &bodies)?;

        Ok(Grammar {
            decls,
            token_kinds: tokens,
            bodies,
            lexer,
            table,
            entries,
            node_types,
            root,
        })
    }

    /// Parses source text into the root AST node.
    ///
    /// Fails fast on the first unsatisfied rule; a successful parse must
    /// consume the entire token stream.
    pub fn parse(&self, source: &str) -> Result<AstNode, ParseError> {
        let root = self.entries[&self.root];
        let value = self.eval_entry(root, source)?;
        match value {
            Value::Node(node) => Ok(*node),
            _ => unreachable!("the root rule is a node rule"),
        }
    }

    /// Runs the lexer standalone.
    pub fn tokenize(&self, source: &str) -> Result<Vec<Token>, ParseError> {
        self.lexer
            .tokenize(source)
            .map_err(|e| ParseError::new(e, source))
    }

    /// Evaluates a single named rule over the whole source and returns its
    /// raw value. Like [`parse`](Self::parse), the rule must consume every
    /// token.
    ///
    /// # Panics
    /// Panics if no rule of that name exists.
    pub fn parse_rule(&self, rule: &str, source: &str) -> Result<Value, ParseError> {
        let id = self
            .entries
            .get(rule)
            .copied()
            .unwrap_or_else(|| panic!("no rule named `{rule}` in this grammar"));
        self.eval_entry(id, source)
    }

    fn eval_entry(&self, id: RuleId, source: &str) -> Result<Value, ParseError> {
        let tokens = self.tokenize(source)?;
        let evaluator = Evaluator::new(&self.table, source, &tokens);
        let matched = evaluator
            .run(id, 0)
            .map_err(|e| ParseError::new(e, source))?;
        if matched.pos < tokens.len() {
            let error = RuleError::new(ErrorKind::ExpectedEndOfInput, tokens[matched.pos].span);
            return Err(ParseError::new(error, source));
        }
        Ok(matched.value)
    }

    /// Returns a new grammar with `rules` merged over this one's rule map.
    /// Overriding rules keep their original position; new rules append.
    /// This grammar is left untouched.
    pub fn extend(
        &self,
        rules: impl IntoIterator<Item = (String, RuleExpr)>,
    ) -> Result<Grammar, GrammarError> {
        let mut bodies = self.bodies.clone();
        for (name, body) in rules {
            bodies.insert(name, body);
        }
        Grammar::assemble(self.decls.clone(), bodies.into_iter().collect())
    }

    /// The factory view over declared token kinds.
    pub fn tokens(&self) -> Tokens<'_> {
        Tokens::new(self)
    }

    /// The factory view over declared node types.
    pub fn nodes(&self) -> Nodes<'_> {
        Nodes::new(self)
    }

    /// The node type produced by a successful [`parse`](Self::parse).
    pub fn root_type(&self) -> &str {
        &self.root
    }

    /// Token declarations, in order.
    pub fn token_decls(&self) -> &[TokenDecl] {
        &self.decls
    }

    /// Rule names, in declaration order.
    pub fn rule_names(&self) -> impl Iterator<Item = &str> {
        self.bodies.keys().map(String::as_str)
    }

    /// The closed set of node types, in declaration order.
    pub fn node_types(&self) -> &[String] {
        &self.node_types
    }

    pub fn token_kind(&self, name: &str) -> Option<TokenKind> {
        self.token_kinds.get(name).copied()
    }

    /// Resolves a token kind back to its declared name.
    pub fn kind_name(&self, kind: TokenKind) -> &str {
        self.table.token_name(kind)
    }

    /// The grammar's name surface, detached from the grammar itself.
    pub fn summary(&self) -> GrammarSummary {
        GrammarSummary {
            tokens: self.decls.clone(),
            rules: self.bodies.keys().cloned().collect(),
            node_types: self.node_types.clone(),
            root: self.root.clone(),
        }
    }

    /// Renders a parsed node as an indented tree, resolving token kinds
    /// against this grammar and slicing token text from `source`.
    pub fn dump(&self, node: &AstNode, source: &str) -> String {
        AstPrinter::new(self, source).dump(node)
    }
}
