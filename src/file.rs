use serde::Serialize;
use tracing::{info, warn};

use crate::error::{Error, Result};
use crate::host::RepoHost;
use crate::repo::{BranchName, FileRevision, RepoId, RepoPath};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileAction {
    Created,
    Updated,
}

/// Result of a successful upsert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileWrite {
    pub action: FileAction,
    /// Revision of the file after the write.
    pub revision: FileRevision,
    pub locator: String,
}

/// Browsable link to `path` on `branch`: `<web_url>/<owner>/<name>/blob/<branch>/<path>`.
///
/// The link is built locally and may 404 for a short while after a write.
pub fn locator(web_url: &str, repo: &RepoId, branch: &BranchName, path: &RepoPath) -> String {
    format!(
        "{}/{}/blob/{}/{}",
        web_url.trim_end_matches('/'),
        repo,
        branch,
        path
    )
}

/// Serialize `value` as two-space indented JSON, keeping map key order.
pub fn to_json_bytes<T: Serialize + ?Sized>(value: &T) -> Result<Vec<u8>> {
    serde_json::to_vec_pretty(value)
        .map_err(|e| Error::InvalidInput(format!("content is not serializable: {}", e)))
}

/// Create `path` on `branch` if absent, otherwise update it in place.
///
/// The current revision is read fresh; when present its `sha` is sent with
/// the update so the host can reject a concurrent writer. Exactly one of
/// create or update is issued per call and nothing is retried.
pub fn upsert_file<H: RepoHost>(
    host: &H,
    repo: &RepoId,
    branch: &BranchName,
    path: &RepoPath,
    content: &[u8],
    message: &str,
) -> Result<FileWrite> {
    if message.trim().is_empty() {
        return Err(Error::InvalidInput("commit message is empty".into()));
    }

    let written = match host.file(repo, branch, path)? {
        Some(current) => host
            .update_file(repo, branch, path, content, message, &current.sha)
            .map(|rev| (FileAction::Updated, rev)),
        None => host
            .create_file(repo, branch, path, content, message)
            .map(|rev| (FileAction::Created, rev)),
    };

    let (action, revision) = written.inspect_err(|e| {
        warn!(%repo, %branch, %path, error = %e, "failed to write file");
    })?;

    match action {
        FileAction::Created => info!(%repo, %branch, %path, "created file"),
        FileAction::Updated => info!(%repo, %branch, %path, "updated file"),
    }

    Ok(FileWrite {
        action,
        revision,
        locator: locator(host.web_url(), repo, branch, path),
    })
}

/// [`upsert_file`] for a structured value, serialized with [`to_json_bytes`].
pub fn upsert_json<H: RepoHost, T: Serialize + ?Sized>(
    host: &H,
    repo: &RepoId,
    branch: &BranchName,
    path: &RepoPath,
    value: &T,
    message: &str,
) -> Result<FileWrite> {
    let bytes = to_json_bytes(value)?;
    upsert_file(host, repo, branch, path, &bytes, message)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::host::fake::FakeHost;
    use serde_json::json;

    const REPO: &str = "acme/widgets";

    fn ids() -> (RepoId, BranchName, RepoPath) {
        (
            REPO.parse().unwrap(),
            BranchName::new("feature-x").unwrap(),
            RepoPath::new("config/settings.json").unwrap(),
        )
    }

    #[test]
    fn locator_is_deterministic() {
        let (repo, branch, path) = ids();
        assert_eq!(
            locator("https://github.com", &repo, &branch, &path),
            "https://github.com/acme/widgets/blob/feature-x/config/settings.json"
        );
        assert_eq!(
            locator("https://github.com/", &repo, &branch, &path),
            "https://github.com/acme/widgets/blob/feature-x/config/settings.json"
        );
    }

    #[test]
    fn absent_file_is_created_once() {
        let host = FakeHost::with_repo(REPO, "main");
        let (repo, branch, path) = ids();

        let w = upsert_file(&host, &repo, &branch, &path, b"{}", "add settings").unwrap();
        assert_eq!(w.action, FileAction::Created);
        assert_eq!(host.file_creates.get(), 1);
        assert_eq!(host.file_updates.get(), 0);
        assert_eq!(
            w.locator,
            "https://github.com/acme/widgets/blob/feature-x/config/settings.json"
        );
    }

    #[test]
    fn present_file_is_updated_with_its_sha() {
        let host = FakeHost::with_repo(REPO, "main");
        host.add_file(REPO, "feature-x", "config/settings.json", "def456", b"old");
        let (repo, branch, path) = ids();

        let w = upsert_file(&host, &repo, &branch, &path, b"new", "update").unwrap();
        assert_eq!(w.action, FileAction::Updated);
        assert_eq!(host.file_creates.get(), 0);
        assert_eq!(host.file_updates.get(), 1);
        assert_eq!(
            host.file_body(REPO, "feature-x", "config/settings.json").unwrap(),
            b"new"
        );
    }

    #[test]
    fn repeat_upsert_updates_instead_of_creating() {
        let host = FakeHost::with_repo(REPO, "main");
        let (repo, branch, path) = ids();

        let first = upsert_file(&host, &repo, &branch, &path, b"same", "m").unwrap();
        let second = upsert_file(&host, &repo, &branch, &path, b"same", "m").unwrap();
        assert_eq!(first.action, FileAction::Created);
        assert_eq!(second.action, FileAction::Updated);
        assert_eq!(host.file_creates.get(), 1);
        assert_eq!(host.file_updates.get(), 1);
        assert_ne!(first.revision.sha, second.revision.sha);
    }

    #[test]
    fn empty_message_is_rejected_before_any_call() {
        let host = FakeHost::with_repo(REPO, "main");
        let (repo, branch, path) = ids();

        let err = upsert_file(&host, &repo, &branch, &path, b"x", "  ").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidInput);
        assert_eq!(host.file_reads.get(), 0);
    }

    #[test]
    fn host_failure_surfaces_typed_error() {
        let host = FakeHost::with_repo(REPO, "main");
        *host.fail_all.borrow_mut() = Some("timed out".into());
        let (repo, branch, path) = ids();

        let err = upsert_file(&host, &repo, &branch, &path, b"x", "m").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Transient);
    }

    #[test]
    fn json_keeps_caller_key_order_and_indent() {
        let v = json!({ "name": "Project Config", "version": "1.0.0", "features": { "login": true } });
        let out = String::from_utf8(to_json_bytes(&v).unwrap()).unwrap();
        assert_eq!(
            out,
            "{\n  \"name\": \"Project Config\",\n  \"version\": \"1.0.0\",\n  \"features\": {\n    \"login\": true\n  }\n}"
        );
    }

    #[test]
    fn upsert_json_writes_pretty_bytes() {
        let host = FakeHost::with_repo(REPO, "main");
        let (repo, branch, path) = ids();

        upsert_json(&host, &repo, &branch, &path, &json!({ "a": 1 }), "m").unwrap();
        assert_eq!(
            host.file_body(REPO, "feature-x", "config/settings.json").unwrap(),
            b"{\n  \"a\": 1\n}"
        );
    }
}
