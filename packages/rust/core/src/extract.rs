//! Keyword extraction from plain-text blocks.
//!
//! Two kinds of keys come out of a block:
//! - code tokens: backtick spans whose content is a configured code keyword,
//!   recorded verbatim;
//! - noun-phrase lemmas: lowercased lemmas of the tokens inside the innermost
//!   noun phrases, minus function-word tags and pure numbers.

use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::LazyLock;

use regex::Regex;
use tracing::trace;

use mdlex_nlp::{NOUN_PHRASE, NlpEngine, ParseTree};
use mdlex_shared::{Dictionary, DocumentTree, LocationTag, Vocabulary};

static CODE_SPAN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"`(.*?)`").expect("valid regex"));

// ---------------------------------------------------------------------------
// Posting accumulator
// ---------------------------------------------------------------------------

/// Mutable key → locations map filled during one build pass.
///
/// Locations are kept in document order until [`freeze`](Self::freeze)
/// sorts them canonically and folds canonical duplicates into the first
/// inserted location.
#[derive(Debug, Default)]
pub struct PostingAccumulator {
    postings: BTreeMap<String, BTreeSet<LocationTag>>,
}

impl PostingAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `key` at `location`. Returns `false` if the pair was already present.
    pub fn insert(&mut self, key: impl Into<String>, location: LocationTag) -> bool {
        self.postings.entry(key.into()).or_default().insert(location)
    }

    /// Number of distinct keys.
    pub fn len(&self) -> usize {
        self.postings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.postings.is_empty()
    }

    /// Sort every posting list in canonical order, drop canonical duplicates
    /// and hand back the frozen dictionary.
    pub fn freeze(self, tree: &DocumentTree) -> Dictionary {
        let frozen: BTreeMap<String, Vec<LocationTag>> = self
            .postings
            .into_iter()
            .map(|(key, set)| {
                let mut locations: Vec<LocationTag> = set.into_iter().collect();
                locations.sort_by(|a, b| tree.compare_locations(*a, *b));
                locations.dedup_by(|later, earlier| {
                    tree.compare_locations(*earlier, *later) == Ordering::Equal
                });
                (key, locations)
            })
            .collect();
        Dictionary::from(frozen)
    }
}

// ---------------------------------------------------------------------------
// Extractor
// ---------------------------------------------------------------------------

/// Turns plain-text blocks into dictionary keys.
pub struct KeywordExtractor<'a> {
    engine: &'a dyn NlpEngine,
    vocabulary: &'a Vocabulary,
}

impl<'a> KeywordExtractor<'a> {
    pub fn new(engine: &'a dyn NlpEngine, vocabulary: &'a Vocabulary) -> Self {
        Self { engine, vocabulary }
    }

    /// Extract the keys of the block at `location` into `postings`.
    ///
    /// Returns the number of new (key, location) pairs. A location that does
    /// not resolve to a block contributes nothing.
    pub fn extract(
        &self,
        tree: &DocumentTree,
        location: LocationTag,
        postings: &mut PostingAccumulator,
    ) -> usize {
        let Some(block) = tree.block(location) else {
            return 0;
        };
        let keys = self.keys(&block.content);
        trace!(node = %location.node, block = location.block, keys = keys.len(), "extracted keys");

        keys.into_iter()
            .filter(|key| postings.insert(key.clone(), location))
            .count()
    }

    /// All keys of one block of text.
    pub fn keys(&self, text: &str) -> BTreeSet<String> {
        let mut keys = BTreeSet::new();

        for captures in CODE_SPAN_RE.captures_iter(text) {
            let token = &captures[1];
            if self.vocabulary.is_code_keyword(token) {
                keys.insert(token.to_string());
            }
        }

        for sentence in self.engine.split_sentences(text) {
            let analysis = self.engine.analyze(&sentence);
            for (start, end) in innermost_noun_phrases(&analysis.tree) {
                let span = analysis.tokens.get(start..end).unwrap_or_default();
                for token in span {
                    if self.vocabulary.is_skipped_pos(&token.pos) {
                        continue;
                    }
                    let lemma = token.lemma.to_lowercase();
                    if lemma.is_empty() || lemma.bytes().all(|b| b.is_ascii_digit()) {
                        continue;
                    }
                    keys.insert(lemma);
                }
            }
        }

        keys
    }
}

/// Distinct NP spans that do not properly contain another NP span.
fn innermost_noun_phrases(tree: &ParseTree) -> Vec<(usize, usize)> {
    let mut spans: Vec<(usize, usize)> = tree
        .spans_labelled(NOUN_PHRASE)
        .into_iter()
        .filter(|(start, end)| start < end)
        .collect();
    spans.sort_unstable();
    spans.dedup();

    spans
        .iter()
        .copied()
        .filter(|&(start, end)| {
            !spans
                .iter()
                .any(|&(s, e)| (s, e) != (start, end) && start <= s && e <= end)
        })
        .collect()
}
