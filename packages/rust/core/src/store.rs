//! Index artifact persistence.
//!
//! An index is saved as one pretty-printed JSON document holding a small
//! header, the document tree and the posting dictionary. Writes go through a
//! temp file and a rename so a crash never leaves a truncated artifact.

use std::path::Path;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::{debug, info, instrument};

use mdlex_shared::{Dictionary, DocumentTree, MdlexError, Result, SearchIndex};

/// Artifact layout version understood by this build.
pub const SCHEMA_VERSION: u32 = 1;

/// Summary counts stored in the artifact header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexCounts {
    pub nodes: usize,
    pub blocks: usize,
    pub keys: usize,
    pub postings: usize,
}

impl IndexCounts {
    pub fn of(index: &SearchIndex) -> Self {
        Self {
            nodes: index.tree.len(),
            blocks: index.tree.locations().count(),
            keys: index.dictionary.len(),
            postings: index.dictionary.posting_count(),
        }
    }
}

/// On-disk form of a [`SearchIndex`].
///
/// Carries no timestamps: byte-identical sources give byte-identical
/// artifacts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexArtifact {
    pub schema_version: u32,
    pub tool_version: String,
    /// Hex SHA-256 of the source document bytes.
    pub source_sha256: String,
    pub counts: IndexCounts,
    pub tree: DocumentTree,
    pub dictionary: Dictionary,
}

impl IndexArtifact {
    pub fn new(index: SearchIndex, source_sha256: impl Into<String>) -> Self {
        let counts = IndexCounts::of(&index);
        Self {
            schema_version: SCHEMA_VERSION,
            tool_version: env!("CARGO_PKG_VERSION").to_string(),
            source_sha256: source_sha256.into(),
            counts,
            tree: index.tree,
            dictionary: index.dictionary,
        }
    }

    pub fn into_index(self) -> SearchIndex {
        SearchIndex {
            tree: self.tree,
            dictionary: self.dictionary,
        }
    }
}

/// Hex-encoded SHA-256 digest of `bytes`.
pub fn sha256_hex(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    format!("{:x}", hasher.finalize())
}

// ---------------------------------------------------------------------------
// Save / load
// ---------------------------------------------------------------------------

/// Write `artifact` to `path`, creating parent directories as needed.
#[instrument(skip_all, fields(path = %path.display()))]
pub fn save(path: &Path, artifact: &IndexArtifact) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| MdlexError::io(parent, e))?;
    }
    write_json(path, artifact)?;
    info!(
        keys = artifact.counts.keys,
        postings = artifact.counts.postings,
        "index saved"
    );
    Ok(())
}

/// Read and validate an artifact.
///
/// Fails with [`MdlexError::Io`] when the file cannot be read and with
/// [`MdlexError::Format`] when its content is not a valid index.
#[instrument(skip_all, fields(path = %path.display()))]
pub fn load(path: &Path) -> Result<IndexArtifact> {
    let content = std::fs::read(path).map_err(|e| MdlexError::io(path, e))?;

    // Check the version before decoding the body so old layouts get a clear message.
    let header: ArtifactHeader = serde_json::from_slice(&content)
        .map_err(|e| MdlexError::format(format!("malformed JSON: {e}")))?;
    if header.schema_version != SCHEMA_VERSION {
        return Err(MdlexError::format(format!(
            "unsupported schema_version: {} (expected {SCHEMA_VERSION})",
            header.schema_version
        )));
    }

    let artifact: IndexArtifact = serde_json::from_slice(&content)
        .map_err(|e| MdlexError::format(format!("malformed index: {e}")))?;

    let index = SearchIndex {
        tree: artifact.tree,
        dictionary: artifact.dictionary,
    };
    index.check().map_err(MdlexError::format)?;

    debug!(
        nodes = index.tree.len(),
        keys = index.dictionary.len(),
        "index validated"
    );

    Ok(IndexArtifact {
        tree: index.tree,
        dictionary: index.dictionary,
        ..artifact
    })
}

/// Load an artifact and keep only the index.
pub fn load_index(path: &Path) -> Result<SearchIndex> {
    load(path).map(IndexArtifact::into_index)
}

#[derive(Deserialize)]
struct ArtifactHeader {
    schema_version: u32,
}

/// Write a JSON file (pretty-printed) via temp file and rename.
fn write_json<T: Serialize>(path: &Path, data: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(data)
        .map_err(|e| MdlexError::format(format!("JSON serialization failed: {e}")))?;

    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "index".to_string());
    let temp = path.with_file_name(format!(".{file_name}.tmp"));

    std::fs::write(&temp, json).map_err(|e| MdlexError::io(&temp, e))?;
    if let Err(e) = std::fs::rename(&temp, path) {
        let _ = std::fs::remove_file(&temp);
        return Err(MdlexError::io(path, e));
    }

    debug!(path = %path.display(), "wrote JSON file");
    Ok(())
}
