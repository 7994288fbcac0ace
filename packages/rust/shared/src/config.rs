//! Application configuration for mdlex.
//!
//! User config lives at `~/.mdlex/mdlex.toml`.
//! CLI flags override config file values, which override defaults.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use serde::{Deserialize, Serialize};

use crate::error::{MdlexError, Result};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "mdlex.toml";

/// Default config directory name under the user's home.
const CONFIG_DIR_NAME: &str = ".mdlex";

/// Java reserved words, indexed verbatim when they appear inside backticks.
const DEFAULT_CODE_KEYWORDS: &[&str] = &[
    "abstract", "assert", "boolean", "break", "byte", "case", "catch", "char", "class", "const",
    "continue", "default", "do", "double", "else", "enum", "extends", "final", "finally", "float",
    "for", "goto", "if", "implements", "import", "instanceof", "int", "interface", "long",
    "native", "new", "package", "private", "protected", "public", "return", "strictfp", "short",
    "static", "super", "switch", "synchronized", "this", "throw", "throws", "transient", "try",
    "var", "void", "volatile", "while",
];

/// Part-of-speech tags whose tokens never become index keys.
const DEFAULT_SKIPPED_POS: &[&str] = &[
    "CC", "DT", "PRP", "PRP$", "POS", ".", ",", ":", "``", "''", "`", "*", "_", "HYPH", "SYM",
    "-LRB-", "-RRB-", "-LSB-", "-RSB-",
];

/// Vocabulary built from the compiled-in defaults.
pub static DEFAULT_VOCABULARY: LazyLock<Vocabulary> = LazyLock::new(Vocabulary::default);

// ---------------------------------------------------------------------------
// Config structs (matching mdlex.toml schema)
// ---------------------------------------------------------------------------

/// Top-level application config, deserialized from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Global defaults.
    #[serde(default)]
    pub defaults: DefaultsConfig,

    /// Indexing vocabularies.
    #[serde(default)]
    pub vocabulary: VocabularyConfig,
}

/// `[defaults]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DefaultsConfig {
    /// Maximum number of hits printed by `mdlex search`.
    #[serde(default = "default_max_results")]
    pub max_results: usize,

    /// Extension used when deriving an index path from a source path.
    #[serde(default = "default_index_extension")]
    pub index_extension: String,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            max_results: default_max_results(),
            index_extension: default_index_extension(),
        }
    }
}

fn default_max_results() -> usize {
    10
}
fn default_index_extension() -> String {
    "idx".into()
}

/// `[vocabulary]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VocabularyConfig {
    /// Reserved words matched exactly inside inline code spans.
    #[serde(default = "default_code_keywords")]
    pub code_keywords: Vec<String>,

    /// Part-of-speech tags skipped during noun-phrase extraction.
    #[serde(default = "default_skipped_pos")]
    pub skipped_pos: Vec<String>,
}

impl Default for VocabularyConfig {
    fn default() -> Self {
        Self {
            code_keywords: default_code_keywords(),
            skipped_pos: default_skipped_pos(),
        }
    }
}

fn default_code_keywords() -> Vec<String> {
    DEFAULT_CODE_KEYWORDS.iter().map(|s| (*s).to_string()).collect()
}
fn default_skipped_pos() -> Vec<String> {
    DEFAULT_SKIPPED_POS.iter().map(|s| (*s).to_string()).collect()
}

// ---------------------------------------------------------------------------
// Vocabulary (runtime, built once from config)
// ---------------------------------------------------------------------------

/// Immutable lookup sets used by keyword extraction.
///
/// Constructed once at startup and shared by reference; never mutated.
#[derive(Debug, Clone)]
pub struct Vocabulary {
    code_keywords: HashSet<String>,
    skipped_pos: HashSet<String>,
}

impl Vocabulary {
    /// Build a vocabulary from explicit word lists.
    pub fn new<K, P>(code_keywords: K, skipped_pos: P) -> Self
    where
        K: IntoIterator,
        K::Item: Into<String>,
        P: IntoIterator,
        P::Item: Into<String>,
    {
        Self {
            code_keywords: code_keywords.into_iter().map(Into::into).collect(),
            skipped_pos: skipped_pos.into_iter().map(Into::into).collect(),
        }
    }

    /// Whether `token` is a reserved code keyword.
    pub fn is_code_keyword(&self, token: &str) -> bool {
        self.code_keywords.contains(token)
    }

    /// Whether tokens tagged `pos` are excluded from the index.
    pub fn is_skipped_pos(&self, pos: &str) -> bool {
        self.skipped_pos.contains(pos)
    }
}

impl Default for Vocabulary {
    fn default() -> Self {
        Self::new(
            DEFAULT_CODE_KEYWORDS.iter().copied(),
            DEFAULT_SKIPPED_POS.iter().copied(),
        )
    }
}

impl From<&AppConfig> for Vocabulary {
    fn from(config: &AppConfig) -> Self {
        Self::new(
            config.vocabulary.code_keywords.iter().cloned(),
            config.vocabulary.skipped_pos.iter().cloned(),
        )
    }
}

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Get the path to the config directory (`~/.mdlex/`).
pub fn config_dir() -> Result<PathBuf> {
    let home =
        dirs::home_dir().ok_or_else(|| MdlexError::config("could not determine home directory"))?;
    Ok(home.join(CONFIG_DIR_NAME))
}

/// Get the path to the config file (`~/.mdlex/mdlex.toml`).
pub fn config_file_path() -> Result<PathBuf> {
    Ok(config_dir()?.join(CONFIG_FILE_NAME))
}

/// Load the application config from disk. Returns defaults if the file does not exist.
pub fn load_config() -> Result<AppConfig> {
    let path = config_file_path()?;

    if !path.exists() {
        tracing::debug!(?path, "config file not found, using defaults");
        return Ok(AppConfig::default());
    }

    load_config_from(&path)
}

/// Load the application config from a specific file path.
pub fn load_config_from(path: &Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| MdlexError::io(path, e))?;

    toml::from_str(&content)
        .map_err(|e| MdlexError::config(format!("failed to parse {}: {e}", path.display())))
}

/// Create the config directory and write a default config file.
/// Returns the path to the created file.
pub fn init_config() -> Result<PathBuf> {
    let dir = config_dir()?;
    std::fs::create_dir_all(&dir).map_err(|e| MdlexError::io(&dir, e))?;

    let path = dir.join(CONFIG_FILE_NAME);
    let config = AppConfig::default();
    let content =
        toml::to_string_pretty(&config).map_err(|e| MdlexError::config(e.to_string()))?;

    std::fs::write(&path, content).map_err(|e| MdlexError::io(&path, e))?;
    tracing::info!(?path, "created default config file");

    Ok(path)
}
