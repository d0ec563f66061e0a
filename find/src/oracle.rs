use regex::Regex;

lazy_static::lazy_static! {
    static ref REMINDER_TEXT: Regex = Regex::new(r"\([^)]*\)").unwrap();
}

/// Oracle text without parenthesized reminder text, as searched by `o:`.
pub fn strip_reminder_text(text: &str) -> String {
    let stripped = REMINDER_TEXT.replace_all(text, "");
    stripped
        .lines()
        .map(|line| line.split_whitespace().collect::<Vec<_>>().join(" "))
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}
