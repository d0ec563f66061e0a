//! Literal escaping for the SQLite dialect. Nothing user-typed reaches a fragment without passing
//! through one of these.

/// Single-quoted string literal.
pub fn quote(value: &str) -> String {
    let cleaned: String = value.chars().filter(|&c| c != '\0').collect();
    format!("'{}'", cleaned.replace('\'', "''"))
}

/// Escapes LIKE wildcards with `\`. Pair with `ESCAPE '\'`.
pub fn escape_like(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        if LIKE_SPECIAL.contains(&ch) {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}

/// `'%value%'`, ready to follow `LIKE`.
pub fn like_contains(value: &str) -> String {
    quote(&format!("%{}%", escape_like(value)))
}

/// Characters `escape_like` escapes.
pub const LIKE_SPECIAL: &[char] = &['\\', '%', '_'];

/// Characters with a meaning outside a character class in a regex.
pub const REGEX_SPECIAL: &[char] = &[
    '\\', '.', '+', '*', '?', '(', ')', '[', ']', '{', '}', '|', '^', '$',
];

/// A column expression with each of `special` backslash-escaped by nested `REPLACE` calls, for
/// splicing row values into a pattern. `special` must start with `\`.
pub fn escaped_column(column: &str, special: &[char]) -> String {
    special.iter().fold(column.to_string(), |expr, ch| {
        format!(
            "REPLACE({}, {}, {})",
            expr,
            quote(&ch.to_string()),
            quote(&format!("\\{}", ch))
        )
    })
}

/// Plain SQL identifier, safe to splice as a table alias.
pub fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        _ => false,
    }
}
