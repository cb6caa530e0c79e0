//! Unescaping of DSL string literals and regex bodies.
//!
//! String literals carry JSON-style escapes; regex bodies pass through
//! untouched except for the `\/` delimiter escape, which the regex engine
//! must not see.

use crate::grammar::GrammarError;

/// Unescapes the body of a quoted string literal (quotes already stripped).
pub(crate) fn unescape_string(raw: &str) -> Result<String, GrammarError> {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('"') => out.push('"'),
            Some('\\') => out.push('\\'),
            Some('/') => out.push('/'),
            Some('b') => out.push('\u{0008}'),
            Some('f') => out.push('\u{000C}'),
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('t') => out.push('\t'),
            Some('u') => {
                let digits: String = chars.by_ref().take(4).collect();
                let code = (digits.len() == 4)
                    .then(|| u32::from_str_radix(&digits, 16).ok())
                    .flatten()
                    .and_then(char::from_u32);
                match code {
                    Some(c) => out.push(c),
                    None => return Err(GrammarError::InvalidEscape(format!("\\u{digits}"))),
                }
            }
            other => {
                let mut escape = String::from('\\');
                if let Some(c) = other {
                    escape.push(c);
                }
                return Err(GrammarError::InvalidEscape(escape));
            }
        }
    }
    Ok(out)
}

/// Unescapes a regex body (delimiting slashes already stripped): `\/`
/// becomes `/`, every other escape is left for the regex engine.
pub(crate) fn unescape_regex(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('/') => out.push('/'),
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_strings_pass_through() {
        assert_eq!(unescape_string("if").unwrap(), "if");
    }

    #[test]
    fn json_escapes() {
        assert_eq!(unescape_string(r#"a\"b"#).unwrap(), "a\"b");
        assert_eq!(unescape_string(r"a\\b").unwrap(), "a\\b");
        assert_eq!(unescape_string(r"a\nb\tc").unwrap(), "a\nb\tc");
        assert_eq!(unescape_string(r"caf\u00e9").unwrap(), "café");
    }

    #[test]
    fn bad_escapes_are_rejected() {
        assert!(unescape_string(r"\q").is_err());
        assert!(unescape_string(r"\u12").is_err());
        assert!(unescape_string("\\").is_err());
    }

    #[test]
    fn regex_bodies_keep_their_escapes() {
        assert_eq!(unescape_regex(r"\d+"), r"\d+");
        assert_eq!(unescape_regex(r"a\/b"), "a/b");
        assert_eq!(unescape_regex(r"\\/"), r"\\/");
    }
}
