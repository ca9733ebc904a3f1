use crate::regex::Regex;
use crate::Author;
use once_cell::sync::Lazy;
use std::borrow::Cow;

static PARENTHETICAL: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+\([^)]+\)").unwrap());

/// Escapes regex metacharacters so vocabulary words can be embedded into
/// compiled patterns verbatim.
pub(crate) fn regex_escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        if matches!(
            c,
            '\\' | '.' | '+' | '*' | '?' | '(' | ')' | '|' | '[' | ']' | '{' | '}' | '^' | '$'
                | '#' | '&' | '-' | '~'
        ) {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// Removes parenthetical asides such as `(ed.)` or `(toim.)` from an author
/// segment. Only parentheticals preceded by whitespace are touched, so a
/// segment that consists solely of a parenthesized word keeps it.
pub(crate) fn strip_parentheticals(segment: &str) -> Cow<'_, str> {
    PARENTHETICAL.replace_all(segment, "")
}

/// Splits an author chunk on the first comma into family and given parts,
/// trimming the whitespace that followed the comma.
pub(crate) fn split_family_given(chunk: &str) -> Author {
    match chunk.split_once(',') {
        Some((family, given)) => Author::new(family, Some(given.trim_start().into())),
        None => Author::new(chunk, None),
    }
}

/// Splits `text` on every match of `separator`, keeping the pieces between
/// matches. Works with either regex engine.
pub(crate) fn split_on<'a>(text: &'a str, separator: &Regex) -> Vec<&'a str> {
    let mut parts = Vec::new();
    let mut start = 0;
    let mut from = 0;
    while let Some(m) = separator.find(&text[from..]) {
        if m.end() == m.start() {
            break;
        }
        parts.push(&text[start..from + m.start()]);
        start = from + m.end();
        from = start;
    }
    parts.push(&text[start..]);
    parts
}

/// Splits `text` *before* every match of `pattern`, which must consume the
/// preceding whitespace and capture the following token in group 1. The
/// whitespace is dropped, the token starts the next piece — the equivalent
/// of splitting on a lookahead.
pub(crate) fn split_before<'a>(text: &'a str, pattern: &Regex) -> Vec<&'a str> {
    let mut parts = Vec::new();
    let mut tok_start = 0;
    let mut from = 0;
    while let Some(caps) = pattern.captures(&text[from..]) {
        let sep = caps.get(0).expect("match");
        let marker = caps.get(1).expect("marker group");
        if marker.start() == 0 {
            // Pattern matched without leading whitespace; nothing to split.
            break;
        }
        parts.push(&text[tok_start..from + sep.start()]);
        tok_start = from + marker.start();
        from = tok_start;
    }
    parts.push(&text[tok_start..]);
    parts
}
