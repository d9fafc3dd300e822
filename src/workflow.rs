//! Branch-then-file composition.
//!
//! A run moves through `BranchPending -> BranchReady -> FileWritten`, or ends
//! in `Failed` from either of the first two stages. A failed branch step
//! stops the run before any file is touched. A branch created by a run whose
//! file write later fails is left in place; running again picks it up as
//! already existing.

use std::fmt;
use tracing::{debug, error, info};

use crate::branch::{BranchOutcome, ensure_branch};
use crate::error::{Error, ErrorKind};
use crate::file::{FileWrite, upsert_file};
use crate::host::RepoHost;
use crate::repo::{BranchName, RepoId, RepoPath};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    BranchPending,
    BranchReady,
    FileWritten,
    Failed,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Stage::BranchPending => "branch-pending",
            Stage::BranchReady => "branch-ready",
            Stage::FileWritten => "file-written",
            Stage::Failed => "failed",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone)]
pub struct UpsertRequest {
    pub repo: RepoId,
    pub branch: BranchName,
    pub base: BranchName,
    pub path: RepoPath,
    pub content: Vec<u8>,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Upserted {
    pub branch: BranchOutcome,
    pub file: FileWrite,
}

impl Upserted {
    pub fn locator(&self) -> &str {
        &self.file.locator
    }
}

/// A failed run. `stage` is where the run was when the error hit:
/// `BranchPending` means nothing was written, `BranchReady` means the
/// branch exists but the file write failed.
#[derive(Debug, thiserror::Error)]
#[error("{stage}: {source}")]
pub struct WorkflowError {
    pub stage: Stage,
    #[source]
    pub source: Error,
}

impl WorkflowError {
    pub fn kind(&self) -> ErrorKind {
        self.source.kind()
    }
}

/// Ensure `req.branch` exists (from `req.base`) and upsert `req.path` on it.
pub fn ensure_branch_and_upsert_file<H: RepoHost>(
    host: &H,
    req: &UpsertRequest,
) -> Result<Upserted, WorkflowError> {
    let mut stage = Stage::BranchPending;
    debug!(%stage, repo = %req.repo, branch = %req.branch, base = %req.base);

    let fail = |stage: Stage, source: Error| {
        error!(%stage, to = %Stage::Failed, error = %source, "upsert workflow failed");
        WorkflowError { stage, source }
    };

    let branch = ensure_branch(host, &req.repo, &req.branch, &req.base)
        .map_err(|e| fail(stage, e))?;
    stage = Stage::BranchReady;
    debug!(%stage, created = branch.created());

    let file = upsert_file(
        host,
        &req.repo,
        &req.branch,
        &req.path,
        &req.content,
        &req.message,
    )
    .map_err(|e| fail(stage, e))?;
    stage = Stage::FileWritten;
    info!(%stage, locator = %file.locator);

    Ok(Upserted { branch, file })
}
