//! Rule-based sentence splitting.

/// Words that end with a period without ending the sentence.
const ABBREVIATIONS: &[&str] = &[
    "e.g", "i.e", "etc", "vs", "cf", "al", "approx", "fig", "no", "mr", "mrs", "ms", "dr",
    "st", "jr", "sr", "inc", "ltd", "eq", "ch", "sec", "vol",
];

/// Split text into trimmed, non-empty sentences.
///
/// A sentence ends at `.`, `!` or `?` (plus any closing quotes or brackets)
/// followed by whitespace or the end of the text. A period after a known
/// abbreviation or a single letter, or one followed by a lowercase word,
/// does not end the sentence.
pub(crate) fn split_sentences(text: &str) -> Vec<String> {
    let chars: Vec<(usize, char)> = text.char_indices().collect();
    let mut sentences = Vec::new();
    let mut start = 0;
    let mut i = 0;

    while i < chars.len() {
        let (_, c) = chars[i];
        if !matches!(c, '.' | '!' | '?') {
            i += 1;
            continue;
        }

        // Absorb runs like "?!" or "..." and trailing closers.
        let mut j = i + 1;
        while j < chars.len() && matches!(chars[j].1, '.' | '!' | '?' | '"' | '\'' | ')' | ']') {
            j += 1;
        }

        let at_end = j >= chars.len();
        if !at_end && !chars[j].1.is_whitespace() {
            i = j;
            continue;
        }

        if c == '.' && !at_end && !ends_sentence(text, chars[i].0, &chars[j..]) {
            i = j;
            continue;
        }

        let end = if at_end { text.len() } else { chars[j].0 };
        push_trimmed(&mut sentences, &text[start..end]);
        start = end;
        i = j;
    }

    push_trimmed(&mut sentences, &text[start..]);
    sentences
}

/// Decide whether the period at byte `dot` closes a sentence.
fn ends_sentence(text: &str, dot: usize, rest: &[(usize, char)]) -> bool {
    let word = text[..dot]
        .rsplit(|c: char| c.is_whitespace() || c == '(')
        .next()
        .unwrap_or("");
    let lower = word.to_lowercase();

    if ABBREVIATIONS.contains(&lower.as_str()) {
        return false;
    }
    // Initials such as "J. Smith".
    if word.chars().count() == 1 && word.chars().all(char::is_alphabetic) {
        return false;
    }

    match rest.iter().map(|(_, c)| *c).find(|c| !c.is_whitespace()) {
        Some(next) => !next.is_lowercase(),
        None => true,
    }
}

fn push_trimmed(sentences: &mut Vec<String>, piece: &str) {
    let piece = piece.trim();
    if !piece.is_empty() {
        sentences.push(piece.to_string());
    }
}
