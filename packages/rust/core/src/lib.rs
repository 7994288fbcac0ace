//! Indexing and search over Markdown section trees.
//!
//! [`IndexBuilder`] streams a document through the section-tree builder and
//! the [`KeywordExtractor`], freezing the collected postings into a
//! [`Dictionary`](mdlex_shared::Dictionary). [`store`] persists the result;
//! [`Searcher`] loads it and ranks sections for free-text queries.

pub mod extract;
pub mod index;
pub mod search;
pub mod store;

#[cfg(test)]
mod testing;

pub use extract::{KeywordExtractor, PostingAccumulator};
pub use index::{BuildSummary, IndexBuilder, ProgressReporter, SilentProgress, build};
pub use search::{Score, SearchHit, Searcher};
pub use store::{IndexArtifact, IndexCounts, SCHEMA_VERSION};
