//! Crate entry point for **ghup**.
//!
//! Ensures a branch exists on a GitHub repository and creates or updates a
//! single file on it. The library side is host-agnostic through [`RepoHost`];
//! [`GitHubClient`] is the REST implementation used by the `ghup` CLI.
//!
//! ```no_run
//! use ghup::{BranchName, GitHubClient, RepoPath, UpsertRequest, ensure_branch_and_upsert_file};
//!
//! # fn main() -> anyhow::Result<()> {
//! let client = GitHubClient::new(ghup::DEFAULT_API_URL, "ghp_token", ghup::DEFAULT_USER_AGENT)?;
//! let req = UpsertRequest {
//!     repo: "acme/widgets".parse()?,
//!     branch: BranchName::new("feature-x")?,
//!     base: BranchName::new("main")?,
//!     path: RepoPath::new("config/settings.json")?,
//!     content: br#"{ "env": "dev" }"#.to_vec(),
//!     message: "Add configuration settings".into(),
//! };
//! let done = ensure_branch_and_upsert_file(&client, &req)?;
//! println!("{}", done.locator());
//! # Ok(())
//! # }
//! ```

mod branch;
mod cli;
mod config;
mod content;
mod error;
mod file;
mod github;
mod host;
mod paths;
mod progress;
mod repo;
mod workflow;

pub mod logging;

pub use branch::{BranchOutcome, ensure_branch};
pub use cli::{Connection, ContentSource, cmd_branch, cmd_config_path, cmd_put, cmd_run};
pub use config::{Config, DEFAULT_BASE_BRANCH, load_config, load_config_from};
pub use content::{object_from_pairs, parse_json, parse_pair};
pub use error::{Error, ErrorKind, Result};
pub use file::{FileAction, FileWrite, locator, to_json_bytes, upsert_file, upsert_json};
pub use github::{DEFAULT_API_URL, DEFAULT_USER_AGENT, GitHubClient};
pub use host::{DEFAULT_WEB_URL, RepoHost};
pub use paths::ghup_home;
pub use repo::{BranchName, BranchRef, FileRevision, RepoId, RepoPath, Repository};
pub use workflow::{Stage, UpsertRequest, Upserted, WorkflowError, ensure_branch_and_upsert_file};
