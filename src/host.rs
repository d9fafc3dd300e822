//! Remote host abstraction.
//!
//! The workflow only depends on [`RepoHost`]; the GitHub REST client in
//! [`crate::github`] is the production backend. Keeping the seam here lets the
//! branch and file logic run against an in-memory host in tests.

use crate::error::Result;
use crate::repo::{BranchName, BranchRef, FileRevision, RepoId, RepoPath, Repository};

pub const DEFAULT_WEB_URL: &str = "https://github.com";

/// Operations the upsert workflow needs from a source-hosting service.
///
/// Lookups return `Ok(None)` when the target does not exist; `Err` is
/// reserved for real failures (auth, network, bad input).
pub trait RepoHost {
    /// Base URL for human-browsable links, e.g. `https://github.com`.
    fn web_url(&self) -> &str {
        DEFAULT_WEB_URL
    }

    fn repository(&self, repo: &RepoId) -> Result<Option<Repository>>;

    fn branch(&self, repo: &RepoId, branch: &BranchName) -> Result<Option<BranchRef>>;

    /// Create `refs/heads/<branch>` pointing at `sha`.
    fn create_branch(&self, repo: &RepoId, branch: &BranchName, sha: &str) -> Result<BranchRef>;

    fn file(
        &self,
        repo: &RepoId,
        branch: &BranchName,
        path: &RepoPath,
    ) -> Result<Option<FileRevision>>;

    fn create_file(
        &self,
        repo: &RepoId,
        branch: &BranchName,
        path: &RepoPath,
        content: &[u8],
        message: &str,
    ) -> Result<FileRevision>;

    /// Replace the file whose current revision is `sha`. Hosts reject a
    /// stale `sha` with a conflict.
    fn update_file(
        &self,
        repo: &RepoId,
        branch: &BranchName,
        path: &RepoPath,
        content: &[u8],
        message: &str,
        sha: &str,
    ) -> Result<FileRevision>;
}

impl<H: RepoHost + ?Sized> RepoHost for &H {
    fn web_url(&self) -> &str {
        (**self).web_url()
    }

    fn repository(&self, repo: &RepoId) -> Result<Option<Repository>> {
        (**self).repository(repo)
    }

    fn branch(&self, repo: &RepoId, branch: &BranchName) -> Result<Option<BranchRef>> {
        (**self).branch(repo, branch)
    }

    fn create_branch(&self, repo: &RepoId, branch: &BranchName, sha: &str) -> Result<BranchRef> {
        (**self).create_branch(repo, branch, sha)
    }

    fn file(
        &self,
        repo: &RepoId,
        branch: &BranchName,
        path: &RepoPath,
    ) -> Result<Option<FileRevision>> {
        (**self).file(repo, branch, path)
    }

    fn create_file(
        &self,
        repo: &RepoId,
        branch: &BranchName,
        path: &RepoPath,
        content: &[u8],
        message: &str,
    ) -> Result<FileRevision> {
        (**self).create_file(repo, branch, path, content, message)
    }

    fn update_file(
        &self,
        repo: &RepoId,
        branch: &BranchName,
        path: &RepoPath,
        content: &[u8],
        message: &str,
        sha: &str,
    ) -> Result<FileRevision> {
        (**self).update_file(repo, branch, path, content, message, sha)
    }
}
