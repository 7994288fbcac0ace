use tracing::trace;

use crate::tagger::Tagger;
use crate::{Analysis, NlpEngine, ParseTree, TaggedToken, chunk, lemma, sentence, tokenize};

/// Self-contained English engine: regex tokenizer, lexicon tagger,
/// rule lemmatizer and shallow phrase chunker.
///
/// Construction builds the tagger lexicon; build one engine per process
/// and share it.
#[derive(Debug)]
pub struct RuleEngine {
    tagger: Tagger,
}

impl RuleEngine {
    pub fn new() -> Self {
        Self {
            tagger: Tagger::new(),
        }
    }
}

impl Default for RuleEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl NlpEngine for RuleEngine {
    fn name(&self) -> &'static str {
        "rule"
    }

    fn split_sentences(&self, text: &str) -> Vec<String> {
        sentence::split_sentences(text)
    }

    fn annotate(&self, sentence: &str) -> Vec<TaggedToken> {
        self.analyze(sentence).tokens
    }

    fn parse_constituents(&self, sentence: &str) -> ParseTree {
        self.analyze(sentence).tree
    }

    fn analyze(&self, sentence: &str) -> Analysis {
        let words = tokenize::tokenize(sentence);
        let tags = self.tagger.tag(&words);
        let tree = chunk::parse(&words, &tags);
        trace!(tokens = words.len(), "analyzed sentence");

        let tokens = words
            .into_iter()
            .zip(tags)
            .map(|(surface, pos)| {
                let lemma = lemma::lemmatize(&surface, pos);
                TaggedToken::new(surface, lemma, pos)
            })
            .collect();

        Analysis { tokens, tree }
    }
}
