//! Validated identifiers for the things the workflow touches on the remote
//! host: a repository, a branch, and a file path inside the repository.
//!
//! Validation happens once at construction so that the host backend can
//! build URLs from these values without re-checking them.

use regex::Regex;
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use crate::error::{Error, Result};

/// Characters git refuses anywhere in a ref name, plus ASCII controls.
static FORBIDDEN_REF_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\x00-\x20\x7f~^:?*\[\\]").unwrap());

/// `owner/name` pair identifying a repository.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RepoId {
    owner: String,
    name: String,
}

impl RepoId {
    pub fn new(owner: &str, name: &str) -> Result<Self> {
        for (what, part) in [("owner", owner), ("name", name)] {
            if part.is_empty() {
                return Err(Error::InvalidInput(format!("repository {} is empty", what)));
            }
            if part == "." || part == ".." {
                return Err(Error::InvalidInput(format!(
                    "repository {} '{}' is not a valid name",
                    what, part
                )));
            }
            if part.contains('/') || part.chars().any(char::is_whitespace) {
                return Err(Error::InvalidInput(format!(
                    "repository {} '{}' contains '/' or whitespace",
                    what, part
                )));
            }
        }
        Ok(Self {
            owner: owner.to_string(),
            name: name.to_string(),
        })
    }

    pub fn owner(&self) -> &str {
        &self.owner
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl FromStr for RepoId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let (owner, name) = s.split_once('/').ok_or_else(|| {
            Error::InvalidInput(format!("repository '{}' is not in owner/name form", s))
        })?;
        RepoId::new(owner, name)
    }
}

impl fmt::Display for RepoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

/// A branch name accepted by `git check-ref-format --branch`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BranchName(String);

impl BranchName {
    pub fn new(name: &str) -> Result<Self> {
        let bad = |why: &str| Err(Error::InvalidInput(format!("branch '{}' {}", name, why)));

        if name.is_empty() {
            return bad("is empty");
        }
        if name == "@" {
            return bad("is reserved");
        }
        if name.starts_with("refs/") {
            return bad("must be a short name, not a full ref");
        }
        if name.starts_with('-') {
            return bad("must not start with '-'");
        }
        if name.starts_with('/') || name.ends_with('/') || name.contains("//") {
            return bad("has an empty path component");
        }
        if name.ends_with('.') || name.ends_with(".lock") {
            return bad("must not end with '.' or '.lock'");
        }
        if name.contains("..") || name.contains("@{") {
            return bad("contains '..' or '@{'");
        }
        if name.split('/').any(|c| c.starts_with('.')) {
            return bad("has a component starting with '.'");
        }
        if FORBIDDEN_REF_CHARS.is_match(name) {
            return bad("contains a character not allowed in ref names");
        }
        Ok(Self(name.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Fully qualified ref, e.g. `refs/heads/feature-x`.
    pub fn full_ref(&self) -> String {
        format!("refs/heads/{}", self.0)
    }
}

impl FromStr for BranchName {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        BranchName::new(s)
    }
}

impl fmt::Display for BranchName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Repository-relative file path, `/`-separated.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RepoPath(String);

impl RepoPath {
    pub fn new(path: &str) -> Result<Self> {
        if path.is_empty() {
            return Err(Error::InvalidInput("file path is empty".into()));
        }
        if path.starts_with('/') || path.ends_with('/') {
            return Err(Error::InvalidInput(format!(
                "file path '{}' must be relative and name a file",
                path
            )));
        }
        if path.split('/').any(|seg| seg.is_empty() || seg == "." || seg == "..") {
            return Err(Error::InvalidInput(format!(
                "file path '{}' has an empty, '.' or '..' segment",
                path
            )));
        }
        Ok(Self(path.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.0.split('/')
    }
}

impl FromStr for RepoPath {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        RepoPath::new(s)
    }
}

impl fmt::Display for RepoPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Host-side view of a repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Repository {
    pub full_name: String,
    pub default_branch: String,
}

/// A branch and the commit it points at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BranchRef {
    pub name: BranchName,
    pub sha: String,
}

/// The stored version of a file on a branch.
///
/// `sha` is the revision token the host demands on update. `content` is
/// only present when the host inlines the blob (small files).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRevision {
    pub path: RepoPath,
    pub sha: String,
    pub content: Option<Vec<u8>>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn repo_id_parses_owner_and_name() {
        let r: RepoId = "acme/widgets".parse().unwrap();
        assert_eq!(r.owner(), "acme");
        assert_eq!(r.name(), "widgets");
        assert_eq!(r.to_string(), "acme/widgets");
    }

    #[test]
    fn repo_id_rejects_malformed() {
        for s in [
            "acme",
            "/widgets",
            "acme/",
            "acme/wid/gets",
            "ac me/widgets",
            "",
            "acme/.",
            "acme/..",
            "../widgets",
        ] {
            let err = s.parse::<RepoId>().unwrap_err();
            assert_eq!(err.kind(), ErrorKind::InvalidInput, "{:?}", s);
        }
    }

    #[test]
    fn branch_name_accepts_common_names() {
        for s in ["main", "feature-x", "feature/x", "release-1.2", "user/jd/wip_2"] {
            assert!(BranchName::new(s).is_ok(), "{}", s);
        }
    }

    #[test]
    fn branch_name_rejects_reserved_syntax() {
        for s in [
            "",
            "@",
            "refs/heads/main",
            "-x",
            "/x",
            "x/",
            "a//b",
            "x.",
            "x.lock",
            "a..b",
            "a@{1}",
            ".hidden",
            "a/.b",
            "has space",
            "a~1",
            "a^",
            "a:b",
            "a?",
            "a*",
            "a[b",
            "a\\b",
            "tab\tname",
        ] {
            assert!(BranchName::new(s).is_err(), "{:?} should be rejected", s);
        }
    }

    #[test]
    fn branch_full_ref() {
        let b = BranchName::new("feature/x").unwrap();
        assert_eq!(b.full_ref(), "refs/heads/feature/x");
    }

    #[test]
    fn repo_path_validation() {
        assert!(RepoPath::new("config/settings.json").is_ok());
        assert!(RepoPath::new("a.json").is_ok());
        for s in ["", "/abs.json", "dir/", "a//b", "./a", "a/../b"] {
            assert!(RepoPath::new(s).is_err(), "{:?}", s);
        }
    }

    #[test]
    fn repo_path_segments() {
        let p = RepoPath::new("config/nested/settings.json").unwrap();
        let segs: Vec<_> = p.segments().collect();
        assert_eq!(segs, vec!["config", "nested", "settings.json"]);
    }
}
