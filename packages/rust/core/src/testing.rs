//! Deterministic engine for unit tests.
//!
//! Whitespace tokens, a handful of fixed tags, and one NP per run of
//! non-verb tokens. A run containing `of` is split into two nested NPs
//! under the run's NP, the way a real parser nests `NP of NP`.

use mdlex_nlp::{NlpEngine, ParseTree, TaggedToken};

#[derive(Debug, Default)]
pub(crate) struct StubEngine;

const VERBS: &[&str] = &["use", "uses", "jumps", "avoid", "hunts", "sleeps"];

impl StubEngine {
    fn words(sentence: &str) -> Vec<String> {
        sentence
            .split_whitespace()
            .map(|w| w.trim_matches(|c: char| c == '.' || c == ',').to_string())
            .filter(|w| !w.is_empty())
            .collect()
    }

    fn tag(word: &str) -> &'static str {
        let lower = word.to_lowercase();
        match lower.as_str() {
            "the" | "a" | "an" => "DT",
            "and" | "or" => "CC",
            "of" => "IN",
            _ if VERBS.contains(&lower.as_str()) => "VB",
            _ if lower.chars().all(|c| c.is_ascii_digit()) => "CD",
            _ => "NN",
        }
    }

    fn lemma(word: &str) -> String {
        let lower = word.to_lowercase();
        match lower.strip_suffix('s') {
            Some(stem) if stem.len() > 2 && !stem.ends_with('s') => stem.to_string(),
            _ => lower,
        }
    }
}

impl NlpEngine for StubEngine {
    fn name(&self) -> &'static str {
        "stub"
    }

    fn split_sentences(&self, text: &str) -> Vec<String> {
        text.split('.')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect()
    }

    fn annotate(&self, sentence: &str) -> Vec<TaggedToken> {
        Self::words(sentence)
            .into_iter()
            .map(|w| {
                let pos = Self::tag(&w);
                let lemma = Self::lemma(&w);
                TaggedToken::new(w, lemma, pos)
            })
            .collect()
    }

    fn parse_constituents(&self, sentence: &str) -> ParseTree {
        let words = Self::words(sentence);
        let mut children = Vec::new();
        let mut start = 0;

        for i in 0..=words.len() {
            let boundary = i == words.len() || Self::tag(&words[i]) == "VB";
            if !boundary {
                continue;
            }
            if start < i {
                let mut np = ParseTree::new("NP", start, i);
                if let Some(of) = (start..i).find(|&k| words[k].eq_ignore_ascii_case("of")) {
                    if start < of && of + 1 < i {
                        np = np.with_children(vec![
                            ParseTree::new("NP", start, of),
                            ParseTree::new("NP", of + 1, i),
                        ]);
                    }
                }
                children.push(np);
            }
            start = i + 1;
        }

        ParseTree::new("S", 0, words.len()).with_children(children)
    }
}
