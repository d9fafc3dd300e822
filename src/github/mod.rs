//! GitHub REST backend for [`RepoHost`].
//!
//! Blocking `reqwest` client with GitHub's JSON media type and a bearer
//! token preset as default headers. No timeout is configured beyond the
//! transport default and nothing is retried here.

mod wire;

use reqwest::Url;
use reqwest::blocking::{Client, RequestBuilder, Response};
use reqwest::header::{ACCEPT, AUTHORIZATION, HeaderMap, HeaderValue, USER_AGENT};
use tracing::debug;

use crate::error::{Error, Result};
use crate::host::{DEFAULT_WEB_URL, RepoHost};
use crate::repo::{BranchName, BranchRef, FileRevision, RepoId, RepoPath, Repository};
use wire::{
    ContentBody, CreateRefBody, PutContentBody, PutContentResponse, RefBody, RepoBody, classify,
};

pub const DEFAULT_API_URL: &str = "https://api.github.com";
pub const DEFAULT_USER_AGENT: &str = concat!("ghup/", env!("CARGO_PKG_VERSION"));

pub struct GitHubClient {
    http: Client,
    api: Url,
    web: String,
}

impl GitHubClient {
    /// Build a client for `api_url` authenticating with `token`.
    ///
    /// An empty token is a configuration error: it is reported here, once,
    /// rather than as an authorization failure on the first call.
    pub fn new(api_url: &str, token: &str, user_agent: &str) -> Result<Self> {
        if token.trim().is_empty() {
            return Err(Error::Config(
                "GitHub token is required: pass --token, set GITHUB_TOKEN or add `token` to config.toml"
                    .into(),
            ));
        }
        let api = Url::parse(api_url)
            .map_err(|e| Error::Config(format!("invalid api_url '{}': {}", api_url, e)))?;
        if api.cannot_be_a_base() {
            return Err(Error::Config(format!("invalid api_url '{}'", api_url)));
        }

        let mut headers = HeaderMap::new();
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("application/vnd.github+json"),
        );
        headers.insert(
            "x-github-api-version",
            HeaderValue::from_static("2022-11-28"),
        );
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(user_agent)
                .map_err(|e| Error::Config(format!("invalid user_agent: {}", e)))?,
        );
        let mut auth = HeaderValue::from_str(&format!("Bearer {}", token.trim()))
            .map_err(|_| Error::Config("token contains invalid characters".into()))?;
        auth.set_sensitive(true);
        headers.insert(AUTHORIZATION, auth);

        let http = Client::builder().default_headers(headers).build()?;
        Ok(Self {
            http,
            api,
            web: DEFAULT_WEB_URL.to_string(),
        })
    }

    /// Override the base used for file locators (GitHub Enterprise).
    pub fn with_web_url(mut self, web_url: &str) -> Self {
        self.web = web_url.trim_end_matches('/').to_string();
        self
    }

    /// `<api>/repos/<owner>/<name>/<tail...>` with each segment percent-encoded.
    fn repo_url<'a>(&self, repo: &RepoId, tail: impl IntoIterator<Item = &'a str>) -> Result<Url> {
        let mut url = self.api.clone();
        url.path_segments_mut()
            .map_err(|_| Error::Config(format!("invalid api_url '{}'", self.api)))?
            .pop_if_empty()
            .extend(["repos", repo.owner(), repo.name()])
            .extend(tail);
        Ok(url)
    }

    fn send(&self, req: RequestBuilder, what: &str) -> Result<Response> {
        let resp = req.send()?;
        if resp.status().is_success() {
            return Ok(resp);
        }
        Err(error_from(resp, what))
    }

    /// Like [`Self::send`], but a 404 becomes `Ok(None)`.
    fn lookup(&self, req: RequestBuilder, what: &str) -> Result<Option<Response>> {
        let resp = req.send()?;
        let status = resp.status();
        debug!(%status, "{}", what);
        if status == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if status.is_success() {
            return Ok(Some(resp));
        }
        Err(error_from(resp, what))
    }

    fn put_content(
        &self,
        repo: &RepoId,
        branch: &BranchName,
        path: &RepoPath,
        content: &[u8],
        message: &str,
        sha: Option<&str>,
    ) -> Result<FileRevision> {
        let url = self.repo_url(repo, std::iter::once("contents").chain(path.segments()))?;
        let verb = if sha.is_some() { "update" } else { "create" };
        debug!(%url, verb, bytes = content.len(), "PUT contents");
        let body = PutContentBody::new(message, content, branch.as_str(), sha);
        let resp = self.send(
            self.http.put(url).json(&body),
            &format!("{} {} on {}", verb, path, branch),
        )?;
        let out: PutContentResponse = resp.json()?;
        Ok(FileRevision {
            path: path.clone(),
            sha: out.content.sha,
            content: None,
        })
    }
}

fn error_from(resp: Response, what: &str) -> Error {
    let status = resp.status();
    let rate_limited = resp
        .headers()
        .get("x-ratelimit-remaining")
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.trim() == "0");
    let body = resp.text().unwrap_or_default();
    classify(status, rate_limited, &body, what)
}

impl RepoHost for GitHubClient {
    fn web_url(&self) -> &str {
        &self.web
    }

    fn repository(&self, repo: &RepoId) -> Result<Option<Repository>> {
        let url = self.repo_url(repo, [])?;
        let Some(resp) = self.lookup(self.http.get(url), &format!("get repository {}", repo))?
        else {
            return Ok(None);
        };
        let body: RepoBody = resp.json()?;
        Ok(Some(Repository {
            full_name: body.full_name,
            default_branch: body.default_branch,
        }))
    }

    fn branch(&self, repo: &RepoId, branch: &BranchName) -> Result<Option<BranchRef>> {
        let url = self.repo_url(
            repo,
            ["git", "ref", "heads"]
                .into_iter()
                .chain(branch.as_str().split('/')),
        )?;
        let Some(resp) = self.lookup(self.http.get(url), &format!("get ref {}", branch))? else {
            return Ok(None);
        };
        let body: RefBody = resp.json()?;
        if body.reference != branch.full_ref() {
            return Ok(None);
        }
        Ok(Some(BranchRef {
            name: branch.clone(),
            sha: body.object.sha,
        }))
    }

    fn create_branch(&self, repo: &RepoId, branch: &BranchName, sha: &str) -> Result<BranchRef> {
        let url = self.repo_url(repo, ["git", "refs"])?;
        let full = branch.full_ref();
        debug!(%url, reference = %full, sha, "POST ref");
        let resp = self.send(
            self.http.post(url).json(&CreateRefBody {
                reference: &full,
                sha,
            }),
            &format!("create ref {}", branch),
        )?;
        let body: RefBody = resp.json()?;
        Ok(BranchRef {
            name: branch.clone(),
            sha: body.object.sha,
        })
    }

    fn file(
        &self,
        repo: &RepoId,
        branch: &BranchName,
        path: &RepoPath,
    ) -> Result<Option<FileRevision>> {
        let url = self.repo_url(repo, std::iter::once("contents").chain(path.segments()))?;
        let req = self.http.get(url).query(&[("ref", branch.as_str())]);
        let Some(resp) = self.lookup(req, &format!("get {} on {}", path, branch))? else {
            return Ok(None);
        };
        let value: serde_json::Value = resp.json()?;
        if value.is_array() {
            return Err(Error::InvalidInput(format!("{} is a directory", path)));
        }
        let body: ContentBody = serde_json::from_value(value)
            .map_err(|e| Error::Transient(format!("unexpected contents response: {}", e)))?;
        if body.kind != "file" {
            return Err(Error::InvalidInput(format!(
                "{} is a {}, not a file",
                path, body.kind
            )));
        }
        let content = body.decoded();
        Ok(Some(FileRevision {
            path: path.clone(),
            sha: body.sha,
            content,
        }))
    }

    fn create_file(
        &self,
        repo: &RepoId,
        branch: &BranchName,
        path: &RepoPath,
        content: &[u8],
        message: &str,
    ) -> Result<FileRevision> {
        self.put_content(repo, branch, path, content, message, None)
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
        self.put_content(repo, branch, path, content, message, Some(sha))
    }
}
