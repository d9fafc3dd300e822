//! # ghup
//!
//! Ensure a branch exists on GitHub and create or update one file on it.
//!
//! - `ghup run` creates the branch from its base if needed, then upserts the file
//! - `ghup branch` only ensures the branch
//! - `ghup put` only upserts the file on an existing branch
//! - `ghup config-path` prints where `config.toml` is read from
//!
//! The token comes from `--token`, `GITHUB_TOKEN`, or `token` in config.toml.

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use ghup::{Connection, ContentSource, cmd_branch, cmd_config_path, cmd_put, cmd_run, logging};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "ghup",
    version,
    about = "ghup - ensure a GitHub branch and upsert a file on it",
    arg_required_else_help = true
)]
struct Cli {
    /// GitHub token (overrides GITHUB_TOKEN and config.toml)
    #[arg(long, global = true)]
    token: Option<String>,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    cmd: Option<Cmd>,
}

/// File content options shared by `put` and `run`.
#[derive(Args, Debug)]
struct ContentArgs {
    /// Entry for a flat JSON object, as key:value (repeatable)
    #[arg(
        long = "set",
        value_name = "KEY:VALUE",
        required_unless_present = "file",
        conflicts_with = "file"
    )]
    set: Vec<String>,

    /// Read content from a JSON file ("-" for stdin)
    #[arg(long, short = 'f', value_name = "PATH")]
    file: Option<PathBuf>,

    /// Upload the file bytes as-is instead of re-formatting JSON
    #[arg(long, requires = "file")]
    raw: bool,

    /// Commit message
    #[arg(long, short = 'm')]
    message: String,
}

impl ContentArgs {
    fn source(&self) -> ContentSource {
        match &self.file {
            Some(path) => ContentSource::File {
                path: path.clone(),
                raw: self.raw,
            },
            None => ContentSource::Pairs(self.set.clone()),
        }
    }
}

#[derive(Subcommand, Debug)]
enum Cmd {
    /// Create <branch> from --base unless it already exists
    Branch {
        /// Repository as owner/name
        repo: String,
        branch: String,
        /// Base branch (default: base_branch from config.toml, else main)
        #[arg(long)]
        base: Option<String>,
    },
    /// Create or update a file on an existing branch
    Put {
        repo: String,
        branch: String,
        /// Repository-relative file path
        path: String,
        #[command(flatten)]
        content: ContentArgs,
    },
    /// Ensure the branch, then create or update the file on it
    Run {
        repo: String,
        branch: String,
        path: String,
        #[arg(long)]
        base: Option<String>,
        #[command(flatten)]
        content: ContentArgs,
    },
    /// Print the config.toml path
    ConfigPath,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose)?;

    let conn = Connection { token: cli.token };
    let Some(cmd) = cli.cmd else {
        return Ok(());
    };

    match cmd {
        Cmd::Branch { repo, branch, base } => cmd_branch(&conn, &repo, &branch, base.as_deref()),
        Cmd::Put {
            repo,
            branch,
            path,
            content,
        } => cmd_put(
            &conn,
            &repo,
            &branch,
            &path,
            &content.source(),
            &content.message,
        ),
        Cmd::Run {
            repo,
            branch,
            path,
            base,
            content,
        } => cmd_run(
            &conn,
            &repo,
            &branch,
            base.as_deref(),
            &path,
            &content.source(),
            &content.message,
        ),
        Cmd::ConfigPath => cmd_config_path(),
    }
}
