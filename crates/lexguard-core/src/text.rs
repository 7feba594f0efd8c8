//! Text utilities shared by the checks.

use std::collections::HashSet;

/// Lower-cased alphanumeric tokens, in order.
pub fn words(text: &str) -> Vec<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .map(|w| w.to_lowercase())
        .collect()
}

/// Distinct lower-cased tokens.
pub fn word_set(text: &str) -> HashSet<String> {
    words(text).into_iter().collect()
}

/// Sørensen–Dice coefficient over word sets, in [0, 1].
pub fn similarity(a: &str, b: &str) -> f64 {
    let set_a = word_set(a);
    let set_b = word_set(b);
    let total = set_a.len() + set_b.len();
    if total == 0 {
        return 0.0;
    }
    let shared = set_a.intersection(&set_b).count();
    (2 * shared) as f64 / total as f64
}

/// Abbreviations whose trailing period never ends a sentence.
const ABBREVIATIONS: &[&str] = &["no", "jo", "ps"];

/// Split text into trimmed, non-empty sentences.
///
/// A run of `.`, `!` or `?` ends a sentence only when followed by
/// whitespace or the end of the text, so `1.000` stays whole. A lone period
/// after an abbreviation such as `No.` does not end a sentence. Newlines
/// always do.
pub fn sentences(text: &str) -> Vec<&str> {
    let mut out = Vec::new();
    let mut start = 0;
    let mut chars = text.char_indices().peekable();

    while let Some((i, c)) = chars.next() {
        match c {
            '\n' => {}
            '.' | '!' | '?' => {
                let mut only_periods = c == '.';
                while let Some(&(_, next)) = chars.peek() {
                    if !matches!(next, '.' | '!' | '?') {
                        break;
                    }
                    only_periods &= next == '.';
                    chars.next();
                }

                let at_break = chars.peek().map_or(true, |&(_, next)| next.is_whitespace());
                if !at_break || (only_periods && ends_with_abbreviation(&text[start..i])) {
                    continue;
                }
            }
            _ => continue,
        }

        push_sentence(&mut out, &text[start..i]);
        start = chars.peek().map_or(text.len(), |&(j, _)| j);
    }

    push_sentence(&mut out, &text[start..]);
    out
}

fn push_sentence<'a>(out: &mut Vec<&'a str>, fragment: &'a str) {
    let fragment = fragment.trim();
    if !fragment.is_empty() {
        out.push(fragment);
    }
}

fn ends_with_abbreviation(fragment: &str) -> bool {
    fragment
        .rsplit(|c: char| !c.is_alphanumeric())
        .next()
        .is_some_and(|word| ABBREVIATIONS.contains(&word.to_lowercase().as_str()))
}

/// Collapse whitespace runs to single spaces and lower-case.
pub fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Length in characters, not bytes.
pub fn char_len(text: &str) -> usize {
    text.chars().count()
}

/// Non-overlapping occurrences of `needle` in `haystack`.
pub fn count_occurrences(haystack: &str, needle: &str) -> usize {
    if needle.is_empty() {
        return 0;
    }
    haystack.matches(needle).count()
}

/// Character offset of a byte index.
pub fn char_offset(text: &str, byte_index: usize) -> usize {
    text[..byte_index].chars().count()
}

/// Whether `needle` occurs in `haystack` as a whole phrase: neither
/// preceded nor followed by an alphanumeric character. Both arguments are
/// expected lower-cased.
pub fn contains_bounded(haystack: &str, needle: &str) -> bool {
    if needle.is_empty() {
        return false;
    }
    haystack.match_indices(needle).any(|(start, m)| {
        let before = haystack[..start].chars().next_back();
        let after = haystack[start + m.len()..].chars().next();
        before.map_or(true, |c| !c.is_alphanumeric()) && after.map_or(true, |c| !c.is_alphanumeric())
    })
}
