//! Query evaluation and ranking over a loaded index.

use std::collections::{BTreeSet, HashMap};
use std::path::Path;
use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, info, instrument};

use mdlex_nlp::NlpEngine;
use mdlex_shared::{DocumentTree, LocationTag, MdlexError, Result, SearchIndex, Vocabulary};

use crate::index::{self, BuildSummary, ProgressReporter};
use crate::store;

/// Match counts of one location for one query.
///
/// Field order is significant: the derived ordering compares distinct
/// lemmas first, then total matches.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct Score {
    /// Number of different query lemmas found at the location.
    pub distinct_matches: usize,
    /// Number of query lemma occurrences found at the location.
    pub total_matches: usize,
}

/// One ranked search result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SearchHit {
    pub location: LocationTag,
    pub score: Score,
}

/// Holds the engine, the vocabulary and at most one current index.
///
/// Loading or building replaces the current index only on success.
pub struct Searcher {
    engine: Arc<dyn NlpEngine>,
    vocabulary: Arc<Vocabulary>,
    index: Option<SearchIndex>,
}

impl Searcher {
    pub fn new(engine: Arc<dyn NlpEngine>, vocabulary: Arc<Vocabulary>) -> Self {
        Self {
            engine,
            vocabulary,
            index: None,
        }
    }

    pub fn is_loaded(&self) -> bool {
        self.index.is_some()
    }

    pub fn index(&self) -> Option<&SearchIndex> {
        self.index.as_ref()
    }

    /// Make `index` the current index.
    pub fn set_index(&mut self, index: SearchIndex) {
        self.index = Some(index);
    }

    /// Load a saved index and make it current.
    #[instrument(skip_all, fields(path = %path.display()))]
    pub fn load(&mut self, path: &Path) -> Result<()> {
        let index = store::load_index(path)?;
        info!(
            nodes = index.tree.len(),
            keys = index.dictionary.len(),
            "index loaded"
        );
        self.index = Some(index);
        Ok(())
    }

    /// Build `source`, save it to `output` and make the new index current.
    pub fn build(
        &mut self,
        source: &Path,
        output: &Path,
        progress: &dyn ProgressReporter,
    ) -> Result<BuildSummary> {
        let (index, summary) = index::build_index(
            source,
            output,
            self.engine.as_ref(),
            &self.vocabulary,
            progress,
        )?;
        self.index = Some(index);
        Ok(summary)
    }

    /// Lowercased lemmas of a query, annotated as a single sentence.
    pub fn query_lemmas(&self, query: &str) -> Vec<String> {
        self.engine
            .annotate(query.trim())
            .into_iter()
            .map(|token| token.lemma.to_lowercase())
            .collect()
    }

    /// Rank every location matching at least one query lemma.
    #[instrument(skip_all, fields(query = %query))]
    pub fn search(&self, query: &str) -> Result<Vec<SearchHit>> {
        let index = self.index.as_ref().ok_or(MdlexError::IndexNotLoaded)?;
        if query.trim().is_empty() {
            return Ok(Vec::new());
        }

        let lemmas = self.query_lemmas(query);
        let mut tallies: HashMap<LocationTag, (BTreeSet<&str>, usize)> = HashMap::new();
        for lemma in &lemmas {
            let Some(locations) = index.dictionary.get(lemma) else {
                continue;
            };
            for location in locations {
                let (distinct, total) = tallies.entry(*location).or_default();
                distinct.insert(lemma.as_str());
                *total += 1;
            }
        }

        let hits: Vec<SearchHit> = tallies
            .into_iter()
            .map(|(location, (distinct, total))| SearchHit {
                location,
                score: Score {
                    distinct_matches: distinct.len(),
                    total_matches: total,
                },
            })
            .collect();
        let hits = rank(&index.tree, hits);

        debug!(lemmas = ?lemmas, hits = hits.len(), "query evaluated");
        Ok(hits)
    }
}

/// Best first: score, then shorter description, then canonical order.
fn rank(tree: &DocumentTree, hits: Vec<SearchHit>) -> Vec<SearchHit> {
    let mut keyed: Vec<(SearchHit, usize)> = hits
        .into_iter()
        .map(|hit| (hit, tree.describe(hit.location).chars().count()))
        .collect();

    keyed.sort_by(|(a, a_len), (b, b_len)| {
        b.score
            .cmp(&a.score)
            .then(a_len.cmp(b_len))
            .then_with(|| tree.compare_locations(a.location, b.location))
            .then_with(|| a.location.cmp(&b.location))
    });

    keyed.into_iter().map(|(hit, _)| hit).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::{IndexBuilder, SilentProgress};
    use crate::testing::StubEngine;
    use mdlex_nlp::RuleEngine;
    use mdlex_shared::NodeId;

    fn searcher_over(engine: Arc<dyn NlpEngine>, text: &str) -> Searcher {
        let vocabulary = Arc::new(Vocabulary::default());
        let index = IndexBuilder::new(engine.as_ref(), &vocabulary).build_from_str(text);
        let mut searcher = Searcher::new(engine, vocabulary);
        searcher.set_index(index);
        searcher
    }

    fn describe_hits(searcher: &Searcher, hits: &[SearchHit]) -> Vec<String> {
        let tree = &searcher.index().unwrap().tree;
        hits.iter().map(|h| tree.describe(h.location)).collect()
    }

    const ANIMALS: &str = "\
# Animals
The quick brown fox
A lazy dog sleeps all day.
## Foxes
The fox hunts at night.
";

    #[test]
    fn search_without_index_fails() {
        let searcher = Searcher::new(Arc::new(StubEngine), Arc::new(Vocabulary::default()));
        assert!(!searcher.is_loaded());
        assert!(matches!(
            searcher.search("anything"),
            Err(MdlexError::IndexNotLoaded)
        ));
    }

    #[test]
    fn blank_query_returns_nothing() {
        let searcher = searcher_over(Arc::new(StubEngine), ANIMALS);
        assert!(searcher.search("").unwrap().is_empty());
        assert!(searcher.search("   \t ").unwrap().is_empty());
    }

    #[test]
    fn more_distinct_lemmas_rank_first() {
        let searcher = searcher_over(Arc::new(RuleEngine::new()), ANIMALS);
        let hits = searcher.search("quick fox").unwrap();

        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].location, LocationTag::new(NodeId::ROOT, 0));
        assert_eq!(
            hits[0].score,
            Score {
                distinct_matches: 2,
                total_matches: 2
            }
        );
        assert_eq!(hits[1].score.distinct_matches, 1);
        assert_eq!(
            describe_hits(&searcher, &hits)[1],
            "## Foxes\nThe fox hunts at night."
        );
    }

    #[test]
    fn repeated_query_lemmas_raise_total_only() {
        let searcher = searcher_over(Arc::new(StubEngine), "# Notes\nquick fox\nquick dog\n");
        let hits = searcher.search("fox fox quick").unwrap();

        assert_eq!(
            hits[0].score,
            Score {
                distinct_matches: 2,
                total_matches: 3
            }
        );
        assert_eq!(
            hits[1].score,
            Score {
                distinct_matches: 1,
                total_matches: 1
            }
        );
    }

    #[test]
    fn equal_scores_prefer_shorter_text() {
        let searcher = searcher_over(
            Arc::new(StubEngine),
            "# Notes\nfox with a very long tail indeed\nsmall fox\n",
        );
        let hits = searcher.search("fox").unwrap();

        assert_eq!(hits[0].location, LocationTag::new(NodeId::ROOT, 1));
        assert_eq!(hits[1].location, LocationTag::new(NodeId::ROOT, 0));
    }

    #[test]
    fn equal_length_ties_use_canonical_order() {
        let searcher = searcher_over(Arc::new(StubEngine), "# Notes\nred fox\nbig fox\n");
        let texts = describe_hits(&searcher, &searcher.search("fox").unwrap());
        assert_eq!(texts, vec!["# Notes\nbig fox", "# Notes\nred fox"]);
    }

    #[test]
    fn each_location_appears_once() {
        let searcher = searcher_over(Arc::new(StubEngine), "# Notes\nquick brown fox\n");
        let hits = searcher.search("quick brown fox").unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].score.distinct_matches, 3);
    }

    #[test]
    fn unknown_lemmas_match_nothing() {
        let searcher = searcher_over(Arc::new(StubEngine), ANIMALS);
        assert!(searcher.search("zebra").unwrap().is_empty());
    }

    #[test]
    fn build_then_load_gives_same_results() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("animals.md");
        let output = dir.path().join("animals.idx");
        std::fs::write(&source, ANIMALS).unwrap();

        let engine: Arc<dyn NlpEngine> = Arc::new(RuleEngine::new());
        let vocabulary = Arc::new(Vocabulary::default());

        let mut built = Searcher::new(Arc::clone(&engine), Arc::clone(&vocabulary));
        built.build(&source, &output, &SilentProgress).unwrap();
        assert!(built.is_loaded());

        let mut loaded = Searcher::new(engine, vocabulary);
        loaded.load(&output).unwrap();

        assert_eq!(built.index(), loaded.index());
        for query in ["quick fox", "dog", "night fox day"] {
            assert_eq!(built.search(query).unwrap(), loaded.search(query).unwrap());
        }
    }

    #[test]
    fn failed_load_keeps_current_index() {
        let dir = tempfile::tempdir().unwrap();
        let bad = dir.path().join("bad.idx");
        std::fs::write(&bad, "{}").unwrap();

        let mut searcher = searcher_over(Arc::new(StubEngine), ANIMALS);
        let err = searcher.load(&bad).unwrap_err();

        assert!(matches!(err, MdlexError::Format { .. }));
        assert!(searcher.is_loaded());
        assert!(!searcher.search("fox").unwrap().is_empty());
    }
}
