//! Error types and human-readable rendering.
//!
//! Failures come in three layers. Lexical and rule failures share
//! [`RuleError`]: an error kind plus the span at which the rule could not
//! proceed. The evaluator driver wraps the innermost rule error into a
//! [`ParseError`] with the source attached, which renders as a
//! caret-annotated snippet. Grammar authoring problems are raised at
//! construction time as [`GrammarError`](crate::GrammarError)s and never
//! reach this module.

mod render;


use std::fmt;

use tessera_core::Span;

pub use render::line_col;
pub(crate) use render::render_snippet;

/// The closed set of failure messages.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ErrorKind {
    /// No declared pattern matches at the current position.
    #[error("Unrecognized token")]
    UnrecognizedToken,
    #[error("Expected token: {0}")]
    ExpectedToken(String),
    #[error("Expected end of input")]
    ExpectedEndOfInput,
    /// A `choice` with zero alternatives - a grammar authoring bug caught at
    /// evaluation time.
    #[error("No choices available")]
    NoChoices,
    /// The evaluation depth guard tripped.
    #[error("Recursion limit exceeded")]
    RecursionLimit,
}

/// A failing rule: what went wrong and where.
///
/// On failure the caller's position is untouched; combinators never commit
/// partial progress.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct RuleError {
    pub kind: ErrorKind,
    pub span: Span,
}

impl RuleError {
    pub fn new(kind: ErrorKind, span: Span) -> Self {
        Self { kind, span }
    }

    /// Fatal errors abort the whole parse: suppressing combinators
    /// (`optional`, `choice`, repetitions) must propagate them instead of
    /// swallowing them.
    pub fn is_fatal(&self) -> bool {
        matches!(self.kind, ErrorKind::RecursionLimit)
    }
}

/// A failed parse, carrying the source for rendering.
///
/// `Display` produces the full snippet:
///
/// ```text
/// Expected token: RPAREN at [2:7]
/// 2 | (+ 1 2
///   |       ^
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    pub kind: ErrorKind,
    pub span: Span,
    source: String,
}

impl ParseError {
    pub(crate) fn new(error: RuleError, source: &str) -> Self {
        Self {
            kind: error.kind,
            span: error.span,
            source: source.to_owned(),
        }
    }

    /// The message without location information, e.g. `Expected token: A`.
    pub fn message(&self) -> String {
        self.kind.to_string()
    }

    /// 1-based line and column of the failure position.
    pub fn line_col(&self) -> (usize, usize) {
        line_col(&self.source, self.span.start)
    }

    /// The caret-annotated source snippet, as rendered by `Display`.
    pub fn snippet(&self) -> String {
        render_snippet(&self.source, self.span, &self.kind.to_string())
    }

    /// The source text the failed parse ran over.
    pub fn source_text(&self) -> &str {
        &self.source
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.snippet())
    }
}

impl std::error::Error for ParseError {}
