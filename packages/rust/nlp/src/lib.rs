//! Natural-language annotation capability used by indexing and search.
//!
//! The index core only talks to the [`NlpEngine`] trait: sentence splitting,
//! token annotation (surface, lemma, part of speech) and constituency parsing.
//! [`RuleEngine`] is a self-contained English implementation built from
//! lexicons and suffix rules; heavier engines can be plugged in through the
//! same trait.
//!
//! Part-of-speech tags follow the Penn Treebank tag set and phrase labels use
//! Penn bracket labels (`S`, `NP`, `VP`, `PP`).

mod chunk;
mod engine;
mod lemma;
mod sentence;
mod tagger;
mod tokenize;

pub use engine::RuleEngine;

/// Phrase label of a noun phrase.
pub const NOUN_PHRASE: &str = "NP";

// ---------------------------------------------------------------------------
// Public types
// ---------------------------------------------------------------------------

/// One annotated token of a sentence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaggedToken {
    /// Text as it appears in the sentence.
    pub surface: String,
    /// Dictionary form, e.g. `class` for `classes`.
    pub lemma: String,
    /// Penn Treebank part-of-speech tag.
    pub pos: String,
}

impl TaggedToken {
    pub fn new(surface: impl Into<String>, lemma: impl Into<String>, pos: impl Into<String>) -> Self {
        Self {
            surface: surface.into(),
            lemma: lemma.into(),
            pos: pos.into(),
        }
    }
}

/// A labelled constituent covering tokens `start..end` of its sentence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseTree {
    pub label: String,
    pub start: usize,
    pub end: usize,
    pub children: Vec<ParseTree>,
}

impl ParseTree {
    pub fn new(label: impl Into<String>, start: usize, end: usize) -> Self {
        Self {
            label: label.into(),
            start,
            end,
            children: Vec::new(),
        }
    }

    pub fn with_children(mut self, children: Vec<ParseTree>) -> Self {
        self.children = children;
        self
    }

    /// Whether this span covers `other`'s span (equal spans included).
    pub fn covers(&self, other: &ParseTree) -> bool {
        self.start <= other.start && other.end <= self.end
    }

    /// All constituents of the tree in pre-order, this node first.
    pub fn constituents(&self) -> Vec<&ParseTree> {
        let mut out = Vec::new();
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            out.push(node);
            stack.extend(node.children.iter().rev());
        }
        out
    }

    /// Spans of every constituent carrying `label`, in pre-order.
    pub fn spans_labelled(&self, label: &str) -> Vec<(usize, usize)> {
        self.constituents()
            .into_iter()
            .filter(|c| c.label == label)
            .map(|c| (c.start, c.end))
            .collect()
    }
}

/// Token annotations and parse of one sentence, index-aligned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Analysis {
    pub tokens: Vec<TaggedToken>,
    pub tree: ParseTree,
}

// ---------------------------------------------------------------------------
// Engine trait
// ---------------------------------------------------------------------------

/// Annotation engine shared by the index builder and the searcher.
///
/// Engines are constructed once per process and shared behind an `Arc`;
/// every call is synchronous. Token indices of [`parse_constituents`]
/// must line up with the tokens returned by [`annotate`] for the same
/// sentence.
///
/// [`parse_constituents`]: NlpEngine::parse_constituents
/// [`annotate`]: NlpEngine::annotate
pub trait NlpEngine: Send + Sync {
    /// Short engine name for logs.
    fn name(&self) -> &'static str;

    /// Split free text into sentences.
    fn split_sentences(&self, text: &str) -> Vec<String>;

    /// Tokenize, tag and lemmatize a single sentence.
    fn annotate(&self, sentence: &str) -> Vec<TaggedToken>;

    /// Constituency parse of a single sentence.
    fn parse_constituents(&self, sentence: &str) -> ParseTree;

    /// Annotate and parse in one call. Engines that share work between the
    /// two steps should override this.
    fn analyze(&self, sentence: &str) -> Analysis {
        Analysis {
            tokens: self.annotate(sentence),
            tree: self.parse_constituents(sentence),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> ParseTree {
        // (S (NP (NP 0..2) (PP 2..5 (NP 3..5))) (VP 5..7))
        ParseTree::new("S", 0, 7).with_children(vec![
            ParseTree::new("NP", 0, 5).with_children(vec![
                ParseTree::new("NP", 0, 2),
                ParseTree::new("PP", 2, 5).with_children(vec![ParseTree::new("NP", 3, 5)]),
            ]),
            ParseTree::new("VP", 5, 7),
        ])
    }

    #[test]
    fn constituents_are_preorder() {
        let tree = sample();
        let labels: Vec<_> = tree.constituents().iter().map(|c| c.label.as_str()).collect();
        assert_eq!(labels, vec!["S", "NP", "NP", "PP", "NP", "VP"]);
    }

    #[test]
    fn spans_labelled_filters_by_label() {
        assert_eq!(
            sample().spans_labelled(NOUN_PHRASE),
            vec![(0, 5), (0, 2), (3, 5)]
        );
    }

    #[test]
    fn covers_includes_equal_spans() {
        let a = ParseTree::new("NP", 1, 4);
        assert!(a.covers(&ParseTree::new("NP", 1, 4)));
        assert!(a.covers(&ParseTree::new("NP", 2, 3)));
        assert!(!a.covers(&ParseTree::new("NP", 0, 3)));
    }
}
