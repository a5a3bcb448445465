//! CLI for the ytq download queue.

mod commands;
mod control_socket;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use ytq_core::config;
use ytq_core::queue_db::QueueDb;

use commands::{
    print_completions, print_man, run_add, run_cancel, run_downloads, run_remove, run_retry,
    run_show, run_status,
};

/// Top-level CLI for the ytq download queue.
#[derive(Debug, Parser)]
#[command(name = "ytq")]
#[command(about = "ytq: queue links and playlists and download them as audio with yt-dlp", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Add one or more links (videos or playlists) to the queue.
    Add {
        /// Links to add. Use `-` to read links from stdin, one per line.
        urls: Vec<String>,

        /// Read links from a file, one per line.
        #[arg(long, value_name = "PATH")]
        file: Option<PathBuf>,

        /// Do not look up titles or expand playlists.
        #[arg(long)]
        no_resolve: bool,
    },

    /// Remove items from the queue by ID.
    Remove {
        /// Item identifiers.
        #[arg(required = true)]
        ids: Vec<i64>,

        /// Also delete the downloaded audio files.
        #[arg(long)]
        delete_files: bool,
    },

    /// Show the queue with per-item progress and status.
    Status,

    /// Download every item in the queue.
    Run {
        /// Maximum concurrent downloads (default: `max_workers` from config).
        #[arg(long, value_name = "N")]
        jobs: Option<usize>,

        /// Download folder for this run (default: `download_dir` from config).
        #[arg(long, value_name = "DIR")]
        dir: Option<PathBuf>,
    },

    /// Cancel the active run, or a single item when an ID is given.
    Cancel {
        /// Item identifier.
        id: Option<i64>,
    },

    /// Download a single item again right now.
    Retry {
        /// Item identifier.
        id: i64,

        /// Download folder (default: `download_dir` from config).
        #[arg(long, value_name = "DIR")]
        dir: Option<PathBuf>,
    },

    /// Reveal an item's audio file in the file manager.
    Show {
        /// Item identifier.
        id: i64,

        /// Folder to search (default: `download_dir` from config).
        #[arg(long, value_name = "DIR")]
        dir: Option<PathBuf>,
    },

    /// Print shell completions.
    Completions {
        /// Target shell.
        shell: clap_complete::Shell,
    },

    /// Print the man page (roff).
    Man,
}

impl CliCommand {
    pub async fn run_from_args() -> Result<()> {
        let cli = Cli::parse();

        // Generated output must not touch config or the queue.
        match cli.command {
            CliCommand::Completions { shell } => return print_completions(shell),
            CliCommand::Man => return print_man(),
            _ => {}
        }

        let cfg = config::load_or_init()?;
        tracing::debug!("loaded config: {:?}", cfg);
        let db = QueueDb::open_default().await?;

        match cli.command {
            CliCommand::Add {
                urls,
                file,
                no_resolve,
            } => run_add(&db, &cfg, &urls, file.as_deref(), !no_resolve).await?,
            CliCommand::Remove { ids, delete_files } => {
                run_remove(&db, &ids, delete_files).await?
            }
            CliCommand::Status => run_status(&db).await?,
            CliCommand::Run { jobs, dir } => {
                run_downloads(&db, &cfg, jobs, dir.as_deref()).await?
            }
            CliCommand::Cancel { id } => run_cancel(&db, id).await?,
            CliCommand::Retry { id, dir } => run_retry(&db, &cfg, id, dir.as_deref()).await?,
            CliCommand::Show { id, dir } => run_show(&db, &cfg, id, dir.as_deref()).await?,
            CliCommand::Completions { .. } | CliCommand::Man => {}
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests;
