//! Command implementations behind the `ghup` binary.
//!
//! Each `cmd_*` resolves config, builds the client (failing early when no
//! token is available), runs one library operation under a spinner and
//! prints the locator on stdout.

use anyhow::{Context, Result};
use colored::Colorize;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::{fs, io};

use crate::branch::{BranchOutcome, ensure_branch};
use crate::config::{Config, load_config};
use crate::content::{object_from_pairs, parse_json, parse_pair};
use crate::file::{FileAction, FileWrite, to_json_bytes, upsert_file};
use crate::paths::paths;
use crate::progress::Step;
use crate::repo::{BranchName, RepoId, RepoPath};
use crate::workflow::{Stage, UpsertRequest, ensure_branch_and_upsert_file};

/// Where file content comes from.
#[derive(Debug, Clone)]
pub enum ContentSource {
    /// `key:value` entries assembled into a flat JSON object.
    Pairs(Vec<String>),
    /// A JSON file on disk, or `-` for stdin.
    File { path: PathBuf, raw: bool },
}

impl ContentSource {
    /// Produce the bytes to upload. JSON input is re-serialized canonically
    /// unless `raw` is set, in which case the bytes are sent untouched.
    pub fn load(&self) -> Result<Vec<u8>> {
        match self {
            ContentSource::Pairs(lines) => {
                let pairs = lines
                    .iter()
                    .map(|l| parse_pair(l))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(to_json_bytes(&object_from_pairs(pairs))?)
            }
            ContentSource::File { path, raw } => {
                let bytes = read_input(path)?;
                if *raw {
                    return Ok(bytes);
                }
                let value = parse_json(&bytes)
                    .with_context(|| format!("in {}", path.display()))?;
                Ok(to_json_bytes(&value)?)
            }
        }
    }
}

fn read_input(path: &Path) -> Result<Vec<u8>> {
    if path == Path::new("-") {
        let mut buf = Vec::new();
        io::stdin().read_to_end(&mut buf).context("failed to read stdin")?;
        return Ok(buf);
    }
    fs::read(path).with_context(|| format!("failed to read {}", path.display()))
}

/// Common connection options shared by every remote subcommand.
#[derive(Debug, Clone, Default)]
pub struct Connection {
    pub token: Option<String>,
}

fn branch_message(out: &BranchOutcome, base: &BranchName) -> String {
    let r = out.branch_ref();
    match out {
        BranchOutcome::Created(_) => format!(
            "created branch {} from {} at {}",
            r.name,
            base,
            short(&r.sha)
        ),
        BranchOutcome::AlreadyExists(_) => {
            format!("branch {} already exists at {}", r.name, short(&r.sha))
        }
    }
}

fn file_message(w: &FileWrite) -> String {
    let verb = match w.action {
        FileAction::Created => "created",
        FileAction::Updated => "updated",
    };
    format!("{} {}", verb, w.revision.path)
}

fn short(sha: &str) -> &str {
    sha.get(..7).unwrap_or(sha)
}

fn client_and_config(conn: &Connection) -> Result<(Config, crate::github::GitHubClient)> {
    let cfg = load_config()?;
    let client = cfg.client(conn.token.as_deref())?;
    Ok((cfg, client))
}

fn base_or_default(cfg: &Config, base: Option<&str>) -> Result<BranchName> {
    Ok(BranchName::new(base.unwrap_or(cfg.base_branch()))?)
}

/// `ghup branch <repo> <branch> [--base B]`
pub fn cmd_branch(conn: &Connection, repo: &str, branch: &str, base: Option<&str>) -> Result<()> {
    let repo: RepoId = repo.parse()?;
    let branch = BranchName::new(branch)?;
    let (cfg, client) = client_and_config(conn)?;
    let base = base_or_default(&cfg, base)?;

    let step = Step::start(format!("ensuring branch {} in {}", branch, repo));
    match ensure_branch(&client, &repo, &branch, &base) {
        Ok(out) => {
            step.ok(branch_message(&out, &base));
            Ok(())
        }
        Err(e) => {
            step.fail(format!("branch {} (error: {})", branch, e));
            Err(e.into())
        }
    }
}

/// `ghup put <repo> <branch> <path> ...`: upsert only, the branch must exist.
pub fn cmd_put(
    conn: &Connection,
    repo: &str,
    branch: &str,
    path: &str,
    content: &ContentSource,
    message: &str,
) -> Result<()> {
    let repo: RepoId = repo.parse()?;
    let branch = BranchName::new(branch)?;
    let path = RepoPath::new(path)?;
    let bytes = content.load()?;
    let (_, client) = client_and_config(conn)?;

    let step = Step::start(format!("writing {} on {}", path, branch));
    match upsert_file(&client, &repo, &branch, &path, &bytes, message) {
        Ok(w) => {
            step.ok(file_message(&w));
            println!("{}", w.locator);
            Ok(())
        }
        Err(e) => {
            step.fail(format!("writing {} (error: {})", path, e));
            Err(e.into())
        }
    }
}

/// `ghup run ...`: ensure the branch, then upsert the file.
pub fn cmd_run(
    conn: &Connection,
    repo: &str,
    branch: &str,
    base: Option<&str>,
    path: &str,
    content: &ContentSource,
    message: &str,
) -> Result<()> {
    let repo: RepoId = repo.parse()?;
    let branch = BranchName::new(branch)?;
    let path = RepoPath::new(path)?;
    let bytes = content.load()?;
    let (cfg, client) = client_and_config(conn)?;
    let base = base_or_default(&cfg, base)?;

    let req = UpsertRequest {
        repo,
        branch,
        base,
        path,
        content: bytes,
        message: message.to_string(),
    };

    let step = Step::start(format!(
        "upserting {} on {} in {}",
        req.path, req.branch, req.repo
    ));
    match ensure_branch_and_upsert_file(&client, &req) {
        Ok(out) => {
            step.done_line(&branch_message(&out.branch, &req.base));
            step.ok(file_message(&out.file));
            println!("{}", out.locator());
            Ok(())
        }
        Err(e) => {
            let hint = match e.stage {
                Stage::BranchPending => "no changes were made",
                _ => "branch is in place; rerun to retry the file write",
            };
            step.fail(format!("{} ({})", e, hint.dimmed()));
            Err(e.into())
        }
    }
}

/// `ghup config-path`
pub fn cmd_config_path() -> Result<()> {
    println!("{}", paths()?.config.display());
    Ok(())
}
