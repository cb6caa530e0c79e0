//! Shared data model for the tessera parsing engine.
//!
//! This crate holds the types that flow between the lexer, the rule
//! evaluator, and downstream consumers of parsed trees:
//! - [`Span`] - byte ranges into source text
//! - [`Token`] / [`TokenKind`] - span-based tokens (text is sliced from the
//!   source on demand, never stored)
//! - [`Pattern`] / [`TokenDecl`] - the lexical layer of a grammar description
//! - [`Value`] / [`AstNode`] - dynamically shaped rule results and finished
//!   AST nodes

pub mod pattern;
pub mod span;
pub mod token;
pub mod value;

#[cfg(test)]
mod value_tests;

pub use pattern::{Pattern, TokenDecl};
pub use span::Span;
pub use token::{Token, TokenKind, token_text};
pub use value::{AstNode, Value};
