//! CLI command definitions, routing, and tracing setup.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::{Parser, Subcommand};
use color_eyre::eyre::{Result, eyre};
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use tracing::info;

use mdlex_core::store;
use mdlex_core::{BuildSummary, ProgressReporter, SearchHit, Searcher};
use mdlex_nlp::{NlpEngine, RuleEngine};
use mdlex_shared::{AppConfig, DocumentTree, NodeId, Vocabulary, init_config, load_config};

// ---------------------------------------------------------------------------
// CLI structure
// ---------------------------------------------------------------------------

/// mdlex: section-level search over Markdown guides.
#[derive(Parser)]
#[command(
    name = "mdlex",
    version,
    about = "Index Markdown guides by section and search them with plain-English queries.",
    long_about = None,
)]
pub(crate) struct Cli {
    /// Log format: text (default) or json.
    #[arg(long, default_value = "text", global = true)]
    pub log_format: LogFormat,

    /// Verbosity level (-v, -vv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// Log output format.
#[derive(Clone, Debug, clap::ValueEnum)]
pub(crate) enum LogFormat {
    Text,
    Json,
}

/// Top-level CLI subcommands.
#[derive(Subcommand)]
pub(crate) enum Command {
    /// Build an index file from a Markdown document.
    Build {
        /// Markdown source document.
        source: PathBuf,

        /// Index output path (defaults to the source path with the index extension).
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Search an index and print the best matching sections.
    Search {
        /// Index file to search.
        #[arg(short, long)]
        index: PathBuf,

        /// Maximum number of hits to print (defaults to `max_results` from config).
        #[arg(short = 'n', long)]
        limit: Option<usize>,

        /// Print the whole owning section instead of the matching block.
        #[arg(long)]
        section: bool,

        /// Emit hits as JSON.
        #[arg(long)]
        json: bool,

        /// Query words.
        #[arg(required = true)]
        query: Vec<String>,
    },

    /// Show the heading outline and dictionary statistics of an index.
    Inspect {
        /// Index file to inspect.
        path: PathBuf,
    },

    /// Configuration management.
    Config {
        /// Config subcommand.
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Config subcommands.
#[derive(Subcommand)]
pub(crate) enum ConfigAction {
    /// Initialize config file with defaults.
    Init,
    /// Show resolved configuration.
    Show,
}

// ---------------------------------------------------------------------------
// Tracing setup
// ---------------------------------------------------------------------------

/// Initialize tracing based on CLI flags.
pub(crate) fn init_tracing(cli: &Cli) {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = match cli.verbose {
        0 => "mdlex=warn",
        1 => "mdlex=debug",
        _ => "mdlex=trace",
    };

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    match cli.log_format {
        LogFormat::Text => {
            fmt()
                .with_env_filter(env_filter)
                .with_target(false)
                .with_writer(std::io::stderr)
                .init();
        }
        LogFormat::Json => {
            fmt()
                .json()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }
}

// ---------------------------------------------------------------------------
// Command dispatch
// ---------------------------------------------------------------------------

/// Run the CLI command.
pub(crate) fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Build { source, output } => cmd_build(&source, output.as_deref()),
        Command::Search {
            index,
            limit,
            section,
            json,
            query,
        } => cmd_search(&index, limit, section, json, &query.join(" ")),
        Command::Inspect { path } => cmd_inspect(&path),
        Command::Config { action } => match action {
            ConfigAction::Init => cmd_config_init(),
            ConfigAction::Show => cmd_config_show(),
        },
    }
}

/// Engine and vocabulary shared by every command of one process.
fn searcher(config: &AppConfig) -> Searcher {
    let engine: Arc<dyn NlpEngine> = Arc::new(RuleEngine::new());
    Searcher::new(engine, Arc::new(Vocabulary::from(config)))
}

fn cmd_build(source: &Path, output: Option<&Path>) -> Result<()> {
    let config = load_config()?;
    let output = output
        .map(Path::to_path_buf)
        .unwrap_or_else(|| default_index_path(source, &config.defaults.index_extension));

    info!(source = %source.display(), output = %output.display(), "building index");

    let mut searcher = searcher(&config);
    let reporter = CliProgress::new();
    let summary = searcher.build(source, &output, &reporter)?;

    println!();
    println!("  Index built successfully!");
    println!("  Source:   {}", summary.source.display());
    println!("  Output:   {}", summary.output.display());
    println!("  Sections: {}", summary.counts.nodes);
    println!("  Blocks:   {}", summary.counts.blocks);
    println!("  Keys:     {}", summary.counts.keys);
    println!("  Postings: {}", summary.counts.postings);
    println!("  Time:     {:.1}s", summary.elapsed.as_secs_f64());
    println!();

    Ok(())
}

fn cmd_search(index: &Path, limit: Option<usize>, section: bool, json: bool, query: &str) -> Result<()> {
    let config = load_config()?;
    let limit = limit.unwrap_or(config.defaults.max_results);

    let mut searcher = searcher(&config);
    searcher.load(index)?;
    let hits = searcher.search(query)?;
    let tree = &searcher
        .index()
        .ok_or_else(|| eyre!("index '{}' did not load", index.display()))?
        .tree;

    info!(query, hits = hits.len(), limit, "search complete");

    let shown: Vec<&SearchHit> = hits.iter().take(limit).collect();

    if json {
        let rows: Vec<HitRow> = shown
            .iter()
            .enumerate()
            .map(|(i, hit)| HitRow::new(i + 1, hit, tree, section))
            .collect();
        println!("{}", serde_json::to_string_pretty(&rows)?);
        return Ok(());
    }

    if shown.is_empty() {
        println!("No matches for '{query}'.");
        return Ok(());
    }

    for (i, hit) in shown.iter().enumerate() {
        println!(
            "{:>3}. [{} lemma(s), {} match(es)]",
            i + 1,
            hit.score.distinct_matches,
            hit.score.total_matches
        );
        for line in hit_text(tree, hit, section).lines() {
            println!("     {line}");
        }
        println!();
    }
    if hits.len() > shown.len() {
        println!("  ({} more not shown)", hits.len() - shown.len());
    }

    Ok(())
}

fn cmd_inspect(path: &Path) -> Result<()> {
    let artifact = store::load(path)?;

    println!();
    println!("  Schema:   {}", artifact.schema_version);
    println!("  Tool:     {}", artifact.tool_version);
    println!("  Source:   sha256 {}", artifact.source_sha256);
    println!("  Sections: {}", artifact.counts.nodes);
    println!("  Blocks:   {}", artifact.counts.blocks);
    println!("  Keys:     {}", artifact.counts.keys);
    println!("  Postings: {}", artifact.counts.postings);
    println!();

    println!("  Outline:");
    for line in outline(&artifact.tree) {
        println!("    {line}");
    }
    println!();

    let mut keys: Vec<(&str, usize)> = artifact
        .dictionary
        .iter()
        .map(|(key, locations)| (key, locations.len()))
        .collect();
    keys.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(b.0)));

    println!("  Most frequent keys:");
    for (key, count) in keys.iter().take(10) {
        println!("    {key:<24} {count}");
    }
    println!();

    Ok(())
}

fn cmd_config_init() -> Result<()> {
    let path = init_config()?;
    println!("Config initialized at: {}", path.display());
    Ok(())
}

fn cmd_config_show() -> Result<()> {
    let config: AppConfig = load_config()?;
    let toml_str = toml::to_string_pretty(&config)?;
    println!("{toml_str}");
    Ok(())
}

// ---------------------------------------------------------------------------
// Rendering helpers
// ---------------------------------------------------------------------------

/// Source path with its extension replaced by `extension`.
///
/// A source that already carries the index extension gets it appended
/// instead, so the source is never overwritten.
fn default_index_path(source: &Path, extension: &str) -> PathBuf {
    let derived = source.with_extension(extension);
    if derived == source {
        let mut name = source.as_os_str().to_os_string();
        name.push(format!(".{extension}"));
        PathBuf::from(name)
    } else {
        derived
    }
}

/// Text shown for a hit: the matching block under its heading, or the
/// whole section.
fn hit_text(tree: &DocumentTree, hit: &SearchHit, section: bool) -> String {
    if section {
        tree.node(hit.location.node)
            .map(|node| node.to_string())
            .unwrap_or_default()
    } else {
        tree.describe(hit.location)
    }
}

/// Heading outline, indented by depth, with block counts.
fn outline(tree: &DocumentTree) -> Vec<String> {
    tree.preorder(NodeId::ROOT)
        .into_iter()
        .filter_map(|id| {
            let node = tree.node(id)?;
            let heading = if node.heading.is_empty() {
                "(untitled)"
            } else {
                node.heading.as_str()
            };
            Some(format!(
                "{}{heading} ({} blocks)",
                "  ".repeat(tree.depth(id)),
                node.blocks.len()
            ))
        })
        .collect()
}

/// JSON row printed by `search --json`.
#[derive(Debug, Serialize)]
struct HitRow {
    rank: usize,
    node: usize,
    block: usize,
    heading: String,
    distinct_matches: usize,
    total_matches: usize,
    text: String,
}

impl HitRow {
    fn new(rank: usize, hit: &SearchHit, tree: &DocumentTree, section: bool) -> Self {
        Self {
            rank,
            node: hit.location.node.0,
            block: hit.location.block,
            heading: tree
                .node(hit.location.node)
                .map(|n| n.heading.clone())
                .unwrap_or_default(),
            distinct_matches: hit.score.distinct_matches,
            total_matches: hit.score.total_matches,
            text: hit_text(tree, hit, section),
        }
    }
}

// ---------------------------------------------------------------------------
// CLI progress reporter
// ---------------------------------------------------------------------------

/// CLI progress reporter using an indicatif spinner.
struct CliProgress {
    spinner: ProgressBar,
}

impl CliProgress {
    fn new() -> Self {
        let spinner = ProgressBar::new_spinner();
        let style = ProgressStyle::with_template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]);
        spinner.set_style(style);
        spinner.enable_steady_tick(std::time::Duration::from_millis(80));
        Self { spinner }
    }
}

impl ProgressReporter for CliProgress {
    fn phase(&self, name: &str) {
        self.spinner.set_message(name.to_string());
    }

    fn block_indexed(&self, count: usize) {
        self.spinner.set_message(format!("Indexing [{count} blocks]"));
    }

    fn done(&self, _summary: &BuildSummary) {
        self.spinner.finish_and_clear();
    }
}
