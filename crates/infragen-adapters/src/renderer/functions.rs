//! Function library exposed to templates.
//!
//! Plain Rust functions over minijinja values; `register` wires them into an
//! environment. Arithmetic and ordering work on integers only.

use minijinja::{Environment, Error, ErrorKind, Value};

/// Register every helper as a global function, and the serialization and
/// formatting helpers as filters too.
pub fn register(env: &mut Environment<'_>) {
    env.add_function("toJson", to_json);
    env.add_function("toYaml", to_yaml);

    env.add_function("indent", indent);
    env.add_function("quote", quote);
    env.add_function("upper", upper);
    env.add_function("lower", lower);
    env.add_function("replace", replace);
    env.add_function("trim", trim);

    env.add_function("has", has);
    env.add_function("join", join);
    env.add_function("split", split);

    env.add_function("add", add);
    env.add_function("sub", sub);
    env.add_function("mul", mul);
    env.add_function("div", div);

    env.add_function("eq", eq);
    env.add_function("ne", ne);
    env.add_function("lt", lt);
    env.add_function("gt", gt);
    env.add_function("and", and);
    env.add_function("or", or);
    env.add_function("not", not);

    env.add_function("until", until);
    env.add_function("seq", seq);

    env.add_filter("toJson", to_json);
    env.add_filter("toYaml", to_yaml);
    env.add_filter("indent", |s: &str, spaces: usize| indent(spaces, s));
    env.add_filter("quote", quote);
}

// ── Serialization ────────────────────────────────────────────────────────────

pub fn to_json(value: Value) -> Result<String, Error> {
    serde_json::to_string(&value).map_err(|e| invalid(format!("toJson: {e}")))
}

pub fn to_yaml(value: Value) -> Result<String, Error> {
    serde_yaml::to_string(&value).map_err(|e| invalid(format!("toYaml: {e}")))
}

// ── Strings ──────────────────────────────────────────────────────────────────

/// Prefix every non-empty line with `spaces` spaces.
pub fn indent(spaces: usize, s: &str) -> String {
    let padding = " ".repeat(spaces);
    s.split('\n')
        .map(|line| {
            if line.is_empty() {
                String::new()
            } else {
                format!("{padding}{line}")
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Double-quote with backslash escapes for quotes, backslashes and
/// non-printing characters. ASCII controls become `\xNN`; other controls,
/// spaces other than U+0020, and invisible format characters become
/// `\uNNNN` (or `\UNNNNNNNN` above the BMP).
pub fn quote(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\u{07}' => out.push_str("\\a"),
            '\u{08}' => out.push_str("\\b"),
            '\u{0c}' => out.push_str("\\f"),
            '\u{0b}' => out.push_str("\\v"),
            c if c.is_control() && (c as u32) < 0x80 => {
                out.push_str(&format!("\\x{:02x}", c as u32));
            }
            c if !is_printable(c) => {
                if (c as u32) < 0x10000 {
                    out.push_str(&format!("\\u{:04x}", c as u32));
                } else {
                    out.push_str(&format!("\\U{:08x}", c as u32));
                }
            }
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

fn is_printable(c: char) -> bool {
    if c == ' ' {
        return true;
    }
    let format = matches!(
        c,
        '\u{ad}'
            | '\u{600}'..='\u{605}'
            | '\u{180e}'
            | '\u{200b}'..='\u{200f}'
            | '\u{202a}'..='\u{202e}'
            | '\u{2060}'..='\u{2064}'
            | '\u{2066}'..='\u{206f}'
            | '\u{feff}'
            | '\u{fff9}'..='\u{fffb}'
            | '\u{e000}'..='\u{f8ff}'
            | '\u{e0001}'
            | '\u{e0020}'..='\u{e007f}'
            | '\u{f0000}'..='\u{10ffff}'
    );
    !(c.is_control() || c.is_whitespace() || format)
}

pub fn upper(s: &str) -> String {
    s.to_uppercase()
}

pub fn lower(s: &str) -> String {
    s.to_lowercase()
}

pub fn replace(s: &str, old: &str, new: &str) -> String {
    s.replace(old, new)
}

pub fn trim(s: &str) -> String {
    s.trim().to_owned()
}

// ── Sequences ────────────────────────────────────────────────────────────────

pub fn has(needle: Value, haystack: Value) -> Result<bool, Error> {
    Ok(haystack.try_iter()?.any(|item| item == needle))
}

pub fn join(list: Value, sep: &str) -> Result<String, Error> {
    Ok(list
        .try_iter()?
        .map(|item| item.to_string())
        .collect::<Vec<_>>()
        .join(sep))
}

/// An empty separator splits into characters.
pub fn split(s: &str, sep: &str) -> Vec<String> {
    if sep.is_empty() {
        return s.chars().map(String::from).collect();
    }
    s.split(sep).map(str::to_owned).collect()
}

// ── Arithmetic ───────────────────────────────────────────────────────────────

pub fn add(a: i64, b: i64) -> i64 {
    a.wrapping_add(b)
}

pub fn sub(a: i64, b: i64) -> i64 {
    a.wrapping_sub(b)
}

pub fn mul(a: i64, b: i64) -> i64 {
    a.wrapping_mul(b)
}

/// Integer division; dividing by zero yields zero.
pub fn div(a: i64, b: i64) -> i64 {
    if b == 0 { 0 } else { a.wrapping_div(b) }
}

// ── Comparison and logic ─────────────────────────────────────────────────────

pub fn eq(a: Value, b: Value) -> bool {
    a == b
}

pub fn ne(a: Value, b: Value) -> bool {
    a != b
}

pub fn lt(a: i64, b: i64) -> bool {
    a < b
}

pub fn gt(a: i64, b: i64) -> bool {
    a > b
}

pub fn and(a: bool, b: bool) -> bool {
    a && b
}

pub fn or(a: bool, b: bool) -> bool {
    a || b
}

pub fn not(a: bool) -> bool {
    !a
}

// ── Ranges ───────────────────────────────────────────────────────────────────

/// `0..n`; empty for `n <= 0`.
pub fn until(n: i64) -> Vec<i64> {
    (0..n.max(0)).collect()
}

/// `start..=end`; empty when `start > end`.
pub fn seq(start: i64, end: i64) -> Vec<i64> {
    (start..=end).collect()
}

fn invalid(msg: String) -> Error {
    Error::new(ErrorKind::InvalidOperation, msg)
}
