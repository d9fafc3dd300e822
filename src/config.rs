use anyhow::{Context, Result};
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::Path;

use crate::error::Error;
use crate::github::{DEFAULT_API_URL, DEFAULT_USER_AGENT, GitHubClient};
use crate::host::DEFAULT_WEB_URL;
use crate::paths::paths;

pub const DEFAULT_BASE_BRANCH: &str = "main";

/// Settings loaded from `config.toml`.
///
/// Every key is optional; a missing file behaves like an empty one.
///
/// Example TOML:
/// ```toml
/// api_url     = "https://ghe.example.com/api/v3"
/// web_url     = "https://ghe.example.com"
/// base_branch = "develop"
/// token       = "ghp_..."
/// ```
#[derive(Debug, Default, Deserialize, Clone)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub api_url: Option<String>,
    #[serde(default)]
    pub web_url: Option<String>,
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub base_branch: Option<String>,
    #[serde(default)]
    pub user_agent: Option<String>,
}

impl Config {
    pub fn api_url(&self) -> &str {
        self.api_url.as_deref().unwrap_or(DEFAULT_API_URL)
    }

    pub fn web_url(&self) -> &str {
        self.web_url.as_deref().unwrap_or(DEFAULT_WEB_URL)
    }

    pub fn base_branch(&self) -> &str {
        self.base_branch.as_deref().unwrap_or(DEFAULT_BASE_BRANCH)
    }

    pub fn user_agent(&self) -> &str {
        self.user_agent.as_deref().unwrap_or(DEFAULT_USER_AGENT)
    }

    /// Pick the credential: explicit flag, then `GITHUB_TOKEN`, then the file.
    /// A blank value counts as unset and falls through to the next source.
    pub fn resolve_token(&self, flag: Option<&str>) -> Option<String> {
        let nonblank = |t: &String| !t.trim().is_empty();
        flag.map(str::to_string)
            .filter(nonblank)
            .or_else(|| env::var("GITHUB_TOKEN").ok().filter(nonblank))
            .or_else(|| self.token.clone().filter(nonblank))
    }

    /// Build the REST client. A missing token fails here, at startup.
    pub fn client(&self, token_flag: Option<&str>) -> Result<GitHubClient, Error> {
        let token = self.resolve_token(token_flag).unwrap_or_default();
        Ok(GitHubClient::new(self.api_url(), &token, self.user_agent())?
            .with_web_url(self.web_url()))
    }
}

/// Parse the config file at `path`; a missing file yields defaults.
pub fn load_config_from(path: &Path) -> Result<Config> {
    let txt = match fs::read_to_string(path) {
        Ok(t) => t,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Config::default()),
        Err(e) => {
            return Err(e).with_context(|| format!("failed to read {}", path.display()));
        }
    };
    let cfg: Config = toml::from_str(&txt)
        .with_context(|| format!("failed to parse {}", path.display()))?;
    Ok(cfg)
}

/// Load `config.toml` from [`paths()`].
pub fn load_config() -> Result<Config> {
    let p = paths()?;
    load_config_from(&p.config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use serial_test::serial;
    use tempfile::tempdir;

    struct TokenEnv(Option<String>);

    impl TokenEnv {
        fn set(v: Option<&str>) -> Self {
            let old = env::var("GITHUB_TOKEN").ok();
            unsafe {
                match v {
                    Some(v) => env::set_var("GITHUB_TOKEN", v),
                    None => env::remove_var("GITHUB_TOKEN"),
                }
            }
            TokenEnv(old)
        }
    }

    impl Drop for TokenEnv {
        fn drop(&mut self) {
            unsafe {
                match &self.0 {
                    Some(v) => env::set_var("GITHUB_TOKEN", v),
                    None => env::remove_var("GITHUB_TOKEN"),
                }
            }
        }
    }

    #[test]
    fn missing_file_gives_defaults() {
        let td = tempdir().unwrap();
        let cfg = load_config_from(&td.path().join("config.toml")).unwrap();
        assert_eq!(cfg.api_url(), "https://api.github.com");
        assert_eq!(cfg.web_url(), "https://github.com");
        assert_eq!(cfg.base_branch(), "main");
    }

    #[test]
    fn parses_all_keys() {
        let td = tempdir().unwrap();
        let path = td.path().join("config.toml");
        fs::write(
            &path,
            r#"
api_url = "https://ghe.example.com/api/v3"
web_url = "https://ghe.example.com"
base_branch = "develop"
token = "from-file"
user_agent = "ci-bot"
"#,
        )
        .unwrap();
        let cfg = load_config_from(&path).unwrap();
        assert_eq!(cfg.api_url(), "https://ghe.example.com/api/v3");
        assert_eq!(cfg.web_url(), "https://ghe.example.com");
        assert_eq!(cfg.base_branch(), "develop");
        assert_eq!(cfg.user_agent(), "ci-bot");
        assert_eq!(cfg.token.as_deref(), Some("from-file"));
    }

    #[test]
    fn unknown_key_is_an_error() {
        let td = tempdir().unwrap();
        let path = td.path().join("config.toml");
        fs::write(&path, "api = \"typo\"\n").unwrap();
        let err = load_config_from(&path).unwrap_err();
        assert!(format!("{:#}", err).contains("failed to parse"));
    }

    #[test]
    #[serial]
    fn token_precedence_flag_env_file() {
        let cfg = Config {
            token: Some("file".into()),
            ..Config::default()
        };

        let _env = TokenEnv::set(Some("env"));
        assert_eq!(cfg.resolve_token(Some("flag")).as_deref(), Some("flag"));
        assert_eq!(cfg.resolve_token(None).as_deref(), Some("env"));

        let _env = TokenEnv::set(None);
        assert_eq!(cfg.resolve_token(None).as_deref(), Some("file"));
    }

    #[test]
    #[serial]
    fn empty_env_token_falls_through_to_file() {
        let cfg = Config {
            token: Some("from-file".into()),
            ..Config::default()
        };
        let _env = TokenEnv::set(Some(""));
        assert_eq!(cfg.resolve_token(None).as_deref(), Some("from-file"));
        assert_eq!(cfg.resolve_token(Some("  ")).as_deref(), Some("from-file"));
    }

    #[test]
    #[serial]
    fn empty_flag_falls_through_to_env() {
        let cfg = Config::default();
        let _env = TokenEnv::set(Some("env"));
        assert_eq!(cfg.resolve_token(Some("")).as_deref(), Some("env"));
    }

    #[test]
    #[serial]
    fn blank_everywhere_is_no_token() {
        let cfg = Config {
            token: Some(" ".into()),
            ..Config::default()
        };
        let _env = TokenEnv::set(Some(""));
        assert_eq!(cfg.resolve_token(Some("")), None);
        assert_eq!(cfg.client(Some("")).err().unwrap().kind(), ErrorKind::Config);
    }

    #[test]
    #[serial]
    fn missing_token_fails_at_client_build() {
        let _env = TokenEnv::set(None);
        let err = Config::default().client(None).err().unwrap();
        assert_eq!(err.kind(), ErrorKind::Config);
    }
}
