//! CLI command definitions and dispatch.
//!
//! Each subcommand is implemented in its own submodule:
//! - `tag`: the batch pipeline (scan, resolve, write, move)
//! - `identify`: resolve one file and print the match, writing nothing
//! - `query`: offline inspection of seed tags and derived queries
//!
//! Flags override values from the configuration file.

mod identify;
mod query;
mod tag;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use tokio::runtime::Runtime;

use crate::config::{self, Config};

pub use identify::cmd_identify;
pub use query::cmd_query;
pub use tag::cmd_tag;

/// Tag audio files with metadata from the iTunes catalog and lyrics sites
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Configuration file (default: <config dir>/autotagger/config.toml)
    #[arg(long, global = true, env = "AUTOTAGGER_CONFIG")]
    pub config: Option<PathBuf>,

    /// Print progress and failures
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Also write the log to this file
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Tag a file, or every supported file in a directory
    Tag(TagArgs),
    /// Look up one file and print what would be written
    Identify {
        /// Path to the audio file
        file: PathBuf,
        #[command(flatten)]
        strict: StrictArgs,
    },
    /// Show the tags and search queries derived from a file, offline
    Query {
        /// Path to the audio file
        file: PathBuf,
    },
}

/// Options of the `tag` command
#[derive(Args, Debug, Default)]
pub struct TagArgs {
    /// File or directory to process
    pub source: PathBuf,

    /// Directory processed files are moved to (default: next to the source)
    #[arg(short, long)]
    pub dest: Option<PathBuf>,

    /// Convert files to this format first (m4a, mp3, alac, flac, aiff, aif, ogg)
    #[arg(short, long)]
    pub format: Option<String>,

    /// Bitrate for conversion, in kbit/s
    #[arg(short, long)]
    pub bitrate: Option<u32>,

    /// Delete the source file once the tagged copy is in place
    #[arg(long)]
    pub remove_original: bool,

    /// Do not write the watermark comment
    #[arg(long)]
    pub no_watermark: bool,

    /// Name files "Artist - Title" from the resolved metadata
    #[arg(long)]
    pub rename: bool,

    /// Replace existing files at the destination
    #[arg(long)]
    pub overwrite: bool,

    /// Scan sub-directories too
    #[arg(short, long)]
    pub recursive: bool,

    /// Do not reproduce the source hierarchy under the destination
    #[arg(long)]
    pub flatten: bool,

    #[command(flatten)]
    pub strict: StrictArgs,
}

/// Matching strictness flags shared by `tag` and `identify`
#[derive(Args, Debug, Default, Clone, Copy)]
pub struct StrictArgs {
    /// Take the first catalog result and never retry with a shorter query
    #[arg(long)]
    pub strict_meta: bool,

    /// Never retry lyrics searches with a shorter query
    #[arg(long)]
    pub strict_lyrics: bool,
}

impl StrictArgs {
    fn apply(&self, config: &mut Config) {
        config.catalog.strict |= self.strict_meta;
        config.lyrics.strict |= self.strict_lyrics;
    }
}

impl TagArgs {
    fn apply(&self, config: &mut Config) {
        if let Some(dest) = &self.dest {
            config.output.destination = Some(dest.clone());
        }
        if let Some(format) = &self.format {
            config.conversion.format = Some(format.clone());
        }
        if let Some(bitrate) = self.bitrate {
            config.conversion.bitrate = Some(bitrate);
        }
        if self.no_watermark {
            config.tagging.watermark = false;
        }
        config.output.remove_original |= self.remove_original;
        config.output.rename |= self.rename;
        config.output.overwrite |= self.overwrite;
        config.output.flatten |= self.flatten;
        config.scan.recursive |= self.recursive;
        self.strict.apply(config);
    }
}

impl Cli {
    /// Load the configuration file and apply the command-line overrides.
    ///
    /// An explicitly named file must exist and parse; the default location
    /// is optional.
    pub fn load_config(&self) -> anyhow::Result<Config> {
        let mut config = match &self.config {
            Some(path) => config::load_from(path)
                .with_context(|| format!("loading configuration {}", path.display()))?,
            None => config::load(),
        };
        self.apply_overrides(&mut config);
        Ok(config)
    }

    /// Apply flags on top of file values
    pub fn apply_overrides(&self, config: &mut Config) {
        config.logging.verbose |= self.verbose;
        if let Some(path) = &self.log_file {
            config.logging.file = Some(path.clone());
        }
        match &self.command {
            Commands::Tag(args) => args.apply(config),
            Commands::Identify { strict, .. } => strict.apply(config),
            Commands::Query { .. } => {}
        }
    }
}

/// Run the parsed command with the final configuration.
pub fn run_command(cli: &Cli, config: &Config) -> anyhow::Result<()> {
    match &cli.command {
        Commands::Tag(args) => {
            let rt = Runtime::new()?;
            cmd_tag(&rt, config, &args.source)
        }
        Commands::Identify { file, .. } => {
            let rt = Runtime::new()?;
            cmd_identify(&rt, config, file)
        }
        Commands::Query { file } => cmd_query(file),
    }
}
