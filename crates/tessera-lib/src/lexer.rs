//! Greedy lexer over runtime-declared token patterns.
//!
//! Patterns are tried in declaration order, anchored at the current
//! position; the first pattern matching a non-empty prefix wins. There is no
//! maximal munch across kinds and no retry of alternate tokenisations on a
//! later parser failure - each pattern is responsible for its own greediness.

use regex_automata::meta::Regex;
use regex_automata::{Anchored, Input};

use tessera_core::{Pattern, Span, Token, TokenDecl, TokenKind};

use crate::diagnostics::{ErrorKind, RuleError};
use crate::grammar::GrammarError;

#[derive(Debug)]
pub(crate) struct Lexer {
    patterns: Vec<(TokenKind, Regex)>,
}

impl Lexer {
    /// Compiles the declared patterns. Literal declarations are escaped into
    /// the equivalent "match this exact text" regex.
    pub fn compile(decls: &[TokenDecl]) -> Result<Self, GrammarError> {
        let mut patterns = Vec::with_capacity(decls.len());
        for (index, decl) in decls.iter().enumerate() {
            let source = match &decl.pattern {
                Pattern::Literal(text) => regex_syntax::escape(text),
                Pattern::Regex(regex) => regex.clone(),
            };
            let regex = Regex::new(&source).map_err(|e| GrammarError::Pattern {
                name: decl.name.clone(),
                message: e.to_string(),
            })?;
            patterns.push((TokenKind::new(index as u16), regex));
        }
        Ok(Self { patterns })
    }

    /// Tokenizes the whole source, or fails at the first unrecognized
    /// character. The error span covers the full character so it never
    /// splits a code point.
    ///
    /// Zero-length matches are rejected here; empty productions are a
    /// combinator concern, never a lexical one.
    pub fn tokenize(&self, source: &str) -> Result<Vec<Token>, RuleError> {
        let mut tokens = Vec::new();
        let mut pos = 0;
        while pos < source.len() {
            match self.match_at(source, pos) {
                Some(token) => {
                    pos = token.span.end;
                    tokens.push(token);
                }
                None => {
                    let width = source[pos..].chars().next().map_or(1, char::len_utf8);
                    return Err(RuleError::new(
                        ErrorKind::UnrecognizedToken,
                        Span::new(pos, pos + width),
                    ));
                }
            }
        }
        Ok(tokens)
    }

    fn match_at(&self, source: &str, pos: usize) -> Option<Token> {
        for (kind, regex) in &self.patterns {
            let input = Input::new(source).range(pos..).anchored(Anchored::Yes);
            if let Some(m) = regex.find(input) {
                if m.end() > pos {
                    return Some(Token::new(*kind, Span::new(pos, m.end())));
                }
            }
        }
        None
    }
}
