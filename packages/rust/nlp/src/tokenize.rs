//! Sentence tokenizer.

use std::sync::LazyLock;

use regex::Regex;

/// Words (letters, digits, underscore) with inner `-`, `'`, `’` or `.`
/// joiners, or any other single non-space character.
static TOKEN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[\p{L}\p{N}_]+(?:['’.\-][\p{L}\p{N}_]+)*|\S").expect("valid regex")
});

/// Split a sentence into surface tokens.
///
/// Possessive `'s` and the negation clitic `n't` become tokens of their own,
/// so `class's` yields `class` + `'s` and `don't` yields `do` + `n't`.
pub(crate) fn tokenize(sentence: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    for m in TOKEN_RE.find_iter(sentence) {
        let word = m.as_str();
        if let Some((base, clitic)) = split_clitic(word) {
            tokens.push(base.to_string());
            tokens.push(clitic.to_string());
        } else {
            tokens.push(word.to_string());
        }
    }
    tokens
}

fn split_clitic(word: &str) -> Option<(&str, &str)> {
    let lower = word.to_lowercase();
    for clitic in ["n't", "n’t", "'s", "’s"] {
        if lower.ends_with(clitic) && lower.len() > clitic.len() {
            let cut = word.len() - clitic.len();
            if word.is_char_boundary(cut) {
                return Some((&word[..cut], &word[cut..]));
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_words_and_punctuation() {
        assert_eq!(
            tokenize("Use `final` fields, always."),
            vec!["Use", "`", "final", "`", "fields", ",", "always", "."]
        );
    }

    #[test]
    fn keeps_joined_words_together() {
        assert_eq!(
            tokenize("camel-case java.util.List v1.2"),
            vec!["camel-case", "java.util.List", "v1.2"]
        );
    }

    #[test]
    fn splits_possessives_and_negation() {
        assert_eq!(tokenize("the class's name"), vec!["the", "class", "'s", "name"]);
        assert_eq!(tokenize("Don't"), vec!["Do", "n't"]);
    }

    #[test]
    fn trailing_period_is_separate() {
        assert_eq!(tokenize("fox jumps."), vec!["fox", "jumps", "."]);
    }
}
