//! CSS identifier escaping

use std::fmt::Write;

/// Is `c` allowed unescaped inside a CSS identifier?
#[inline]
pub fn is_css_ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '-' || c as u32 >= 0xa0
}

/// Does `value` match `-{0,2}[A-Za-z_][A-Za-z0-9_-]*` in full?
pub fn is_css_identifier(value: &str) -> bool {
    let body = value
        .strip_prefix("--")
        .or_else(|| value.strip_prefix('-'))
        .unwrap_or(value);
    let mut chars = body.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}

/// Escape `ident` so it can be used as a class or id token in a selector.
///
/// Valid identifiers come back unchanged. Otherwise every character that
/// is not ident-safe is written as `\<hex>` followed by a space (no space
/// after the final character); a leading digit, or a leading `-` followed
/// by a digit or `-`, is escaped the same way.
pub fn escape_identifier(ident: &str) -> String {
    if is_css_identifier(ident) {
        return ident.to_string();
    }

    let escape_first = needs_first_char_escape(ident);
    let last = ident.chars().count().saturating_sub(1);
    let mut out = String::with_capacity(ident.len() + 8);

    for (i, c) in ident.chars().enumerate() {
        if (escape_first && i == 0) || !is_css_ident_char(c) {
            escape_char(c, i == last, &mut out);
        } else {
            out.push(c);
        }
    }
    out
}

fn needs_first_char_escape(ident: &str) -> bool {
    let mut chars = ident.chars();
    match (chars.next(), chars.next()) {
        (Some(c), _) if c.is_ascii_digit() => true,
        (Some('-'), Some(c)) => c.is_ascii_digit() || c == '-',
        (Some('-'), None) => true,
        _ => false,
    }
}

fn escape_char(c: char, is_last: bool, out: &mut String) {
    // Writing to a String cannot fail
    let _ = write!(out, "\\{:02x}", c as u32);
    if !is_last {
        out.push(' ');
    }
}
