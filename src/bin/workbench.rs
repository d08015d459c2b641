// SPDX-License-Identifier: MIT OR Apache-2.0

//! Workbench CLI — informational listings for the experiment repository.
//!
//! # Commands
//!
//! - `workbench projects list`: list project modules under `projects/`
//! - `workbench notes list`: list note categories under `notes/`
//!
//! Exit code 1 when the target directory is missing, 0 otherwise.

use std::path::Path;

use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, EnvFilter};

use candle_embed::workbench;

/// Informational listings for the experiment workbench.
#[derive(Parser)]
#[command(name = "workbench")]
#[command(version)]
#[command(about = "List project modules and note categories of the workbench repo")]
#[command(propagate_version = true)]
struct Cli {
    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Packaged project module commands
    Projects {
        #[command(subcommand)]
        action: ProjectsAction,
    },
    /// Markdown note commands
    Notes {
        #[command(subcommand)]
        action: NotesAction,
    },
}

#[derive(Subcommand)]
enum ProjectsAction {
    /// List project modules under the repo `projects/` folder
    List,
}

#[derive(Subcommand)]
enum NotesAction {
    /// List note categories under the repo `notes/` folder
    List,
}

fn main() {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };
    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let exit_code = match cli.command {
        Commands::Projects {
            action: ProjectsAction::List,
        } => list_and_print(
            "projects",
            "(no packaged project modules yet)",
            workbench::list_project_modules,
        ),
        Commands::Notes {
            action: NotesAction::List,
        } => list_and_print(
            "notes",
            "(no note categories yet)",
            workbench::list_note_categories,
        ),
    };

    std::process::exit(exit_code);
}

/// List a workbench subdirectory and print one name per line.
fn list_and_print(
    subdir: &str,
    empty_msg: &str,
    lister: fn(&Path) -> candle_embed::Result<Vec<String>>,
) -> i32 {
    let dir = workbench::find_repo_root().join(subdir);
    tracing::debug!(dir = %dir.display(), "listing workbench directory");

    match lister(&dir) {
        Ok(names) if names.is_empty() => {
            println!("{empty_msg}");
            0
        }
        Ok(names) => {
            println!("{}", names.join("\n"));
            0
        }
        Err(err) => {
            eprintln!("No {subdir} directory found: {} ({err})", dir.display());
            1
        }
    }
}
