//! Index building: Markdown source → section tree + posting dictionary.

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use tracing::{debug, info, instrument};

use mdlex_markdown::{DocumentBuilder, raw_lines};
use mdlex_nlp::NlpEngine;
use mdlex_shared::{MdlexError, Result, SearchIndex, Vocabulary};

use crate::extract::{KeywordExtractor, PostingAccumulator};
use crate::store::{self, IndexArtifact, IndexCounts};

/// Result of a completed build.
#[derive(Debug, Clone)]
pub struct BuildSummary {
    pub source: PathBuf,
    pub output: PathBuf,
    pub counts: IndexCounts,
    pub source_sha256: String,
    pub elapsed: Duration,
}

/// Progress callback for reporting build status.
pub trait ProgressReporter: Send + Sync {
    /// Called when entering a new phase.
    fn phase(&self, name: &str);
    /// Called after each plain-text block has been indexed.
    fn block_indexed(&self, count: usize);
    /// Called when the build completes.
    fn done(&self, summary: &BuildSummary);
}

/// No-op progress reporter for headless/test usage.
pub struct SilentProgress;

impl ProgressReporter for SilentProgress {
    fn phase(&self, _name: &str) {}
    fn block_indexed(&self, _count: usize) {}
    fn done(&self, _summary: &BuildSummary) {}
}

// ---------------------------------------------------------------------------
// Builder
// ---------------------------------------------------------------------------

/// Drives one build pass: tree building, keyword extraction, freezing.
pub struct IndexBuilder<'a> {
    engine: &'a dyn NlpEngine,
    vocabulary: &'a Vocabulary,
}

impl<'a> IndexBuilder<'a> {
    pub fn new(engine: &'a dyn NlpEngine, vocabulary: &'a Vocabulary) -> Self {
        Self { engine, vocabulary }
    }

    /// Build an index from in-memory Markdown text.
    pub fn build_from_str(&self, text: &str) -> SearchIndex {
        self.build_with_progress(text, &SilentProgress)
    }

    /// Read a Markdown file and build its index.
    pub fn build_from_path(&self, path: &Path) -> Result<SearchIndex> {
        let text = std::fs::read_to_string(path).map_err(|e| MdlexError::io(path, e))?;
        Ok(self.build_from_str(&text))
    }

    #[instrument(skip_all, fields(engine = self.engine.name(), bytes = text.len()))]
    fn build_with_progress(&self, text: &str, progress: &dyn ProgressReporter) -> SearchIndex {
        let extractor = KeywordExtractor::new(self.engine, self.vocabulary);
        let mut builder = DocumentBuilder::new();
        let mut postings = PostingAccumulator::new();
        let mut indexed = 0;

        for raw in raw_lines(text) {
            if let Some(location) = builder.push_line(raw) {
                extractor.extract(builder.tree(), location, &mut postings);
                indexed += 1;
                progress.block_indexed(indexed);
            }
        }

        let tree = builder.finish();
        let dictionary = postings.freeze(&tree);
        debug!(
            blocks_indexed = indexed,
            keys = dictionary.len(),
            postings = dictionary.posting_count(),
            "dictionary frozen"
        );

        SearchIndex { tree, dictionary }
    }
}

// ---------------------------------------------------------------------------
// Build and persist
// ---------------------------------------------------------------------------

/// Build the index of `source` and save it to `output`.
pub fn build(
    source: &Path,
    output: &Path,
    engine: &dyn NlpEngine,
    vocabulary: &Vocabulary,
    progress: &dyn ProgressReporter,
) -> Result<BuildSummary> {
    build_index(source, output, engine, vocabulary, progress).map(|(_, summary)| summary)
}

/// Build and save, handing back the in-memory index as well.
#[instrument(skip_all, fields(source = %source.display(), output = %output.display()))]
pub(crate) fn build_index(
    source: &Path,
    output: &Path,
    engine: &dyn NlpEngine,
    vocabulary: &Vocabulary,
    progress: &dyn ProgressReporter,
) -> Result<(SearchIndex, BuildSummary)> {
    let start = Instant::now();

    progress.phase("reading");
    let bytes = std::fs::read(source).map_err(|e| MdlexError::io(source, e))?;
    let text = String::from_utf8(bytes).map_err(|e| {
        MdlexError::io(
            source,
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.utf8_error()),
        )
    })?;
    let source_sha256 = store::sha256_hex(text.as_bytes());

    progress.phase("indexing");
    let index = IndexBuilder::new(engine, vocabulary).build_with_progress(&text, progress);

    progress.phase("writing");
    let artifact = IndexArtifact::new(index, source_sha256);
    store::save(output, &artifact)?;

    let summary = BuildSummary {
        source: source.to_path_buf(),
        output: output.to_path_buf(),
        counts: artifact.counts,
        source_sha256: artifact.source_sha256.clone(),
        elapsed: start.elapsed(),
    };

    info!(
        nodes = summary.counts.nodes,
        keys = summary.counts.keys,
        elapsed_ms = summary.elapsed.as_millis() as u64,
        "index built"
    );
    progress.done(&summary);

    Ok((artifact.into_index(), summary))
}
