//! Vimscript literal encoding for expressions sent to the editor.

use std::fmt::Write;

/// Encode `s` as a double-quoted Vimscript string. Control characters are
/// written as escapes so the expression stays on one line. NUL is dropped:
/// Vim ends a string at the first one.
pub fn vim_str(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\x1b' => out.push_str("\\e"),
            '\0' => {}
            // `\x` inserts a raw byte, so C1 controls need `\u` to stay UTF-8.
            c if c.is_control() && (c as u32) < 0x80 => {
                let _ = write!(out, "\\x{:02x}", c as u32);
            }
            c if c.is_control() => {
                let _ = write!(out, "\\u{:04x}", c as u32);
            }
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

/// Encode a list of strings as a Vimscript list literal.
pub fn vim_list(items: &[String]) -> String {
    let inner: Vec<String> = items.iter().map(|s| vim_str(s)).collect();
    format!("[{}]", inner.join(", "))
}
