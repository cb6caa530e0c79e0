//! Grammar construction from primitives.

use tessera_core::{Pattern, TokenDecl};

use crate::combinator::RuleExpr;

use super::Grammar;

/// Errors raised while assembling a grammar.
///
/// A grammar is only returned if fully valid; nothing is resolved lazily at
/// parse time.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GrammarError {
    /// No rule with an uppercase name to serve as the AST root.
    #[error("grammar has no root: declare at least one rule with an uppercase name")]
    MissingRoot,
    #[error("reference to undefined rule or token `{0}`")]
    UndefinedReference(String),
    #[error("duplicate declaration of `{0}`")]
    DuplicateName(String),
    #[error("invalid pattern for token `{name}`: {message}")]
    Pattern { name: String, message: String },
    #[error("invalid escape sequence `{0}`")]
    InvalidEscape(String),
}

/// Builds a [`Grammar`] from token declarations and rule definitions - the
/// low-level surface under the DSL, and what the DSL itself lowers to.
///
/// Declaration order matters twice: token order is the lexer's tie-break,
/// and the first uppercase rule becomes the AST root.
#[derive(Debug, Default)]
pub struct GrammarBuilder {
    decls: Vec<TokenDecl>,
    rules: Vec<(String, RuleExpr)>,
}

impl GrammarBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declares a token kind.
    pub fn token(&mut self, name: impl Into<String>, pattern: Pattern) -> &mut Self {
        self.decls.push(TokenDecl::new(name, pattern));
        self
    }

    /// Registers a rule. Uppercase names become node rules, wrapped in an
    /// AST node of the same name; lowercase names are pass-through aliases.
    pub fn rule(&mut self, name: impl Into<String>, body: RuleExpr) -> &mut Self {
        self.rules.push((name.into(), body));
        self
    }

    pub fn build(self) -> Result<Grammar, GrammarError> {
        Grammar::assemble(self.decls, self.rules)
    }
}
