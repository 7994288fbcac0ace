//! Shared types, error model, and configuration for mdlex.
//!
//! This crate is the foundation depended on by all other mdlex crates.
//! It provides:
//! - [`MdlexError`], the unified error type
//! - Document and index types ([`DocumentTree`], [`Node`], [`Block`],
//!   [`LocationTag`], [`Dictionary`], [`SearchIndex`])
//! - Configuration ([`AppConfig`], [`Vocabulary`], config loading)

pub mod config;
pub mod error;
pub mod types;

// Re-export public API at crate root for ergonomic imports.
pub use config::{
    AppConfig, DEFAULT_VOCABULARY, DefaultsConfig, Vocabulary, VocabularyConfig, config_dir,
    config_file_path, init_config, load_config, load_config_from,
};
pub use error::{MdlexError, Result};
pub use types::{
    Block, BlockKind, CanonicalKey, Dictionary, DocumentTree, LocationTag, Node, NodeId,
    SearchIndex,
};
