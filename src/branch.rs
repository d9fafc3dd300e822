use tracing::{info, warn};

use crate::error::{Error, Result};
use crate::host::RepoHost;
use crate::repo::{BranchName, BranchRef, RepoId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BranchOutcome {
    /// Created at the base branch's head commit.
    Created(BranchRef),
    /// Already present; left exactly where it was.
    AlreadyExists(BranchRef),
}

impl BranchOutcome {
    pub fn branch_ref(&self) -> &BranchRef {
        match self {
            BranchOutcome::Created(r) | BranchOutcome::AlreadyExists(r) => r,
        }
    }

    pub fn created(&self) -> bool {
        matches!(self, BranchOutcome::Created(_))
    }
}

/// Make sure `branch` exists in `repo`, creating it from `base`'s head if absent.
///
/// Order of checks:
/// 1. The repository must resolve (`NotFound` otherwise).
/// 2. `base` must resolve to a commit (`NotFound` otherwise).
/// 3. If `branch` already exists, report it and stop. Existing refs are never moved.
/// 4. Otherwise create `refs/heads/<branch>` at the base commit.
///
/// If the create races with another writer and the host answers with a
/// conflict, the branch is looked up again and reported as already existing.
pub fn ensure_branch<H: RepoHost>(
    host: &H,
    repo: &RepoId,
    branch: &BranchName,
    base: &BranchName,
) -> Result<BranchOutcome> {
    if host.repository(repo)?.is_none() {
        warn!(%repo, "repository not found");
        return Err(Error::NotFound(format!("repository {}", repo)));
    }

    let base_ref = host.branch(repo, base)?.ok_or_else(|| {
        warn!(%repo, %base, "base branch not found");
        Error::NotFound(format!("base branch '{}' in {}", base, repo))
    })?;

    if branch == base {
        info!(%repo, %branch, "branch already exists");
        return Ok(BranchOutcome::AlreadyExists(base_ref));
    }

    if let Some(existing) = host.branch(repo, branch)? {
        info!(%repo, %branch, sha = %existing.sha, "branch already exists");
        return Ok(BranchOutcome::AlreadyExists(existing));
    }

    match host.create_branch(repo, branch, &base_ref.sha) {
        Ok(created) => {
            info!(%repo, %branch, sha = %created.sha, %base, "created branch");
            Ok(BranchOutcome::Created(created))
        }
        Err(Error::Conflict(msg)) => match host.branch(repo, branch)? {
            Some(existing) => {
                info!(%repo, %branch, "branch appeared concurrently");
                Ok(BranchOutcome::AlreadyExists(existing))
            }
            None => Err(Error::Conflict(msg)),
        },
        Err(e) => {
            warn!(%repo, %branch, error = %e, "failed to create branch");
            Err(e)
        }
    }
}
