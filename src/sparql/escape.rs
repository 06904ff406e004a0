//! Safe interpolation of external text into SPARQL query strings
//!
//! Nothing supplied from outside the process is spliced into a query without
//! going through this module: string values become escaped literals and
//! identifiers must be plain local names.

/// Render `value` as a double-quoted SPARQL string literal.
///
/// Quotes, backslashes and the `ECHAR` control characters are escaped, so
/// the literal can never terminate early. A backslash is always doubled, which
/// also keeps `\uXXXX` sequences in the input from being decoded into a quote
/// by endpoints that pre-process codepoint escapes.
pub fn string_literal(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for c in value.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\'' => out.push_str("\\'"),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\u{08}' => out.push_str("\\b"),
            '\u{0C}' => out.push_str("\\f"),
            _ => out.push(c),
        }
    }
    out.push('"');
    out
}

/// Control characters `string_literal` has no escape for
pub fn has_unescapable_control(value: &str) -> bool {
    value
        .chars()
        .any(|c| c.is_control() && !matches!(c, '\n' | '\r' | '\t' | '\u{08}' | '\u{0C}'))
}

/// Whether `name` is usable as the local part of an ontology IRI.
///
/// Accepts ASCII letters, digits, `_`, `-` and `.`; must not start with `-`
/// or `.` and must not end with `.`.
pub fn is_local_name(name: &str) -> bool {
    let Some(first) = name.chars().next() else {
        return false;
    };
    if first == '-' || first == '.' || name.ends_with('.') {
        return false;
    }
    name.chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'))
}
