//! Indented tree rendering of parsed values.
//!
//! The printer resolves token kinds against the owning grammar and slices
//! token text from the source, so dumps read like the grammar that produced
//! them:
//!
//! ```text
//! Program
//!   statements:
//!     Symbol
//!       value: "+"
//! ```

use tessera_core::{AstNode, Value};

use crate::grammar::Grammar;

pub(crate) struct AstPrinter<'g, 'src> {
    grammar: &'g Grammar,
    source: &'src str,
}

impl<'g, 'src> AstPrinter<'g, 'src> {
    pub fn new(grammar: &'g Grammar, source: &'src str) -> Self {
        Self { grammar, source }
    }

    pub fn dump(&self, node: &AstNode) -> String {
        let mut out = String::new();
        self.render_node(&mut out, node, 0);
        out
    }

    fn line(&self, out: &mut String, indent: usize, text: &str) {
        out.push_str(&"  ".repeat(indent));
        out.push_str(text);
        out.push('\n');
    }

    fn render_node(&self, out: &mut String, node: &AstNode, indent: usize) {
        self.line(out, indent, &node.kind);
        if !node.value.is_null() {
            self.render_body(out, &node.value, indent + 1);
        }
    }

    /// Renders a value's contents at `indent`; scalars get their own line.
    fn render_body(&self, out: &mut String, value: &Value, indent: usize) {
        match value {
            Value::Record(fields) => {
                for (name, field_value) in fields {
                    match self.scalar(field_value) {
                        Some(text) => self.line(out, indent, &format!("{name}: {text}")),
                        None => {
                            self.line(out, indent, &format!("{name}:"));
                            self.render_body(out, field_value, indent + 1);
                        }
                    }
                }
            }
            Value::List(items) | Value::Tuple(items) => {
                for item in items {
                    match self.scalar(item) {
                        Some(text) => self.line(out, indent, &text),
                        None => self.render_body(out, item, indent),
                    }
                }
            }
            Value::Node(node) => self.render_node(out, node, indent),
            scalar => {
                let text = self.scalar(scalar).expect("non-composite values are scalar");
                self.line(out, indent, &text);
            }
        }
    }

    fn scalar(&self, value: &Value) -> Option<String> {
        match value {
            Value::Null => Some("null".to_string()),
            Value::Text(text) => Some(format!("{text:?}")),
            Value::Token(token) => {
                let name = self.grammar.kind_name(token.kind);
                let text = self
                    .source
                    .get(token.span.start..token.span.end)
                    .unwrap_or("<out of range>");
                Some(format!("{name} {text:?}"))
            }
            _ => None,
        }
    }
}
