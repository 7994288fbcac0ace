//! mdlex CLI: index Markdown guides and search them by section.
//!
//! Builds a keyword index over the heading tree of a Markdown document and
//! ranks sections for free-text queries.

mod commands;

use clap::Parser;
use color_eyre::eyre::Result;

use commands::Cli;

fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    commands::init_tracing(&cli);
    commands::run(cli)
}
