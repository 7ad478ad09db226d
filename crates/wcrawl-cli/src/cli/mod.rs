//! CLI for the wcrawl page fetcher.

mod commands;

use anyhow::Result;
use clap::{Args, CommandFactory, Parser, Subcommand};
use std::path::{Path, PathBuf};
use wcrawl_core::config::{self, WcrawlConfig};

use commands::{run_checksum, run_completions, run_fetch, run_pipeline, run_scan};

/// Top-level CLI for wcrawl.
#[derive(Debug, Parser)]
#[command(name = "wcrawl", version)]
#[command(about = "wcrawl: concurrent page fetcher and corpus word counter", long_about = None)]
pub struct Cli {
    /// Read settings from this file instead of ~/.config/wcrawl/config.toml.
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: CliCommand,
}

/// Options shared by `fetch` and `run`.
#[derive(Debug, Clone, Args)]
pub struct FetchArgs {
    /// File with one http:// or https:// URL per line.
    pub urls: PathBuf,

    /// Corpus directory for page files (default: current directory).
    #[arg(short, long, value_name = "DIR")]
    pub out: Option<PathBuf>,

    /// Maximum number of pages fetched at once.
    #[arg(short, long, value_name = "N")]
    pub jobs: Option<usize>,

    /// Per-page timeout in seconds.
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Maximum number of URLs taken from the list.
    #[arg(long, value_name = "N")]
    pub max_urls: Option<usize>,
}

impl FetchArgs {
    /// Overlay command-line values on the loaded config.
    pub fn apply(&self, cfg: &mut WcrawlConfig) {
        if let Some(jobs) = self.jobs {
            cfg.max_concurrent = jobs;
        }
        if let Some(timeout) = self.timeout {
            cfg.fetch_timeout_secs = timeout;
        }
        if let Some(max_urls) = self.max_urls {
            cfg.max_urls = max_urls;
        }
    }

    pub fn out_dir(&self) -> Result<PathBuf> {
        match &self.out {
            Some(dir) => Ok(dir.clone()),
            None => Ok(std::env::current_dir()?),
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Fetch every URL in the list into page<N>.html files.
    Fetch {
        #[command(flatten)]
        args: FetchArgs,

        /// Print the run summary as JSON on stdout.
        #[arg(long)]
        json: bool,
    },

    /// Count vocabulary terms in every file of a corpus directory.
    Scan {
        /// Corpus directory to scan.
        dir: PathBuf,

        /// Term to count (repeatable; default: configured vocabulary).
        #[arg(short = 'w', long = "word", value_name = "WORD")]
        words: Vec<String>,

        /// File name to leave out of the scan (repeatable).
        #[arg(long, value_name = "NAME")]
        exclude: Vec<String>,
    },

    /// Fetch the list, then scan the resulting corpus.
    Run {
        #[command(flatten)]
        args: FetchArgs,

        /// Term to count (repeatable; default: configured vocabulary).
        #[arg(short = 'w', long = "word", value_name = "WORD")]
        words: Vec<String>,
    },

    /// Print the SHA-256 of every page file in a corpus directory.
    Checksum {
        /// Corpus directory.
        dir: PathBuf,
    },

    /// Generate shell completions.
    Completions {
        shell: clap_complete::Shell,
    },
}

fn load_config(path: Option<&Path>) -> Result<WcrawlConfig> {
    let cfg = match path {
        Some(p) => config::load_from_path(p)?,
        None => config::load_or_init()?,
    };
    tracing::debug!("loaded config: {:?}", cfg);
    Ok(cfg)
}

impl CliCommand {
    pub fn run_from_args() -> Result<()> {
        let cli = Cli::parse();
        let config_path = cli.config.as_deref();

        match cli.command {
            CliCommand::Fetch { args, json } => {
                let mut cfg = load_config(config_path)?;
                args.apply(&mut cfg);
                cfg.validate()?;
                run_fetch(&cfg, &args.urls, &args.out_dir()?, json)?;
            }
            CliCommand::Scan {
                dir,
                words,
                exclude,
            } => {
                run_scan(&load_config(config_path)?, &dir, &words, &exclude)?;
            }
            CliCommand::Run { args, words } => {
                let mut cfg = load_config(config_path)?;
                args.apply(&mut cfg);
                cfg.validate()?;
                run_pipeline(&cfg, &args.urls, &args.out_dir()?, &words)?;
            }
            CliCommand::Checksum { dir } => run_checksum(&load_config(config_path)?, &dir)?,
            CliCommand::Completions { shell } => run_completions(shell, &mut Cli::command()),
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests;
