//! tessera: a parser-combinator engine with a self-hosted grammar DSL.
//!
//! A grammar description - written in the DSL or assembled from primitives
//! with [`GrammarBuilder`] - compiles into an immutable [`Grammar`] whose
//! [`parse`](Grammar::parse) turns source text into a typed AST:
//!
//! ```
//! use tessera_lib::Grammar;
//!
//! let grammar = Grammar::from_dsl(
//!     "NUMBER ::= /[0-9]+/\nCOMMA ::= \",\"\n<Numbers> ::= [ <- NUMBER , COMMA ]\n",
//! )
//! .expect("grammar is well-formed");
//!
//! let root = grammar.parse("4,8,15").expect("input matches");
//! assert_eq!(root.kind, "Numbers");
//! assert_eq!(root.value.as_list().map(|items| items.len()), Some(3));
//! ```
//!
//! The pipeline is two-phase and fails fast: a greedy lexer produces a
//! position-indexed token stream from the grammar's declared patterns, then
//! a recursive-descent evaluator drives the resolved combinator graph over
//! it and finalises the root node. Failures render as caret-annotated
//! snippets ([`ParseError`]). The DSL frontend is self-hosted: grammar
//! descriptions are parsed by a fixed grammar expressed in the same algebra
//! ([`dsl`]).

pub mod combinator;
pub mod diagnostics;
pub mod dsl;
pub mod factory;
pub mod grammar;

mod eval;
mod lexer;
mod printer;

#[cfg(test)]
mod eval_tests;

pub use tessera_core::{AstNode, Pattern, Span, Token, TokenDecl, TokenKind, Value, token_text};

pub use diagnostics::{ErrorKind, ParseError};
pub use factory::{Nodes, Tokens};
pub use grammar::{Grammar, GrammarBuilder, GrammarError, GrammarSummary};

/// Either kind of failure from entry points that both parse and build, like
/// [`Grammar::from_dsl`].
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Grammar(#[from] GrammarError),
}
