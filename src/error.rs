use std::fmt;

/// Failure kinds surfaced by every remote operation.
///
/// Callers branch on the kind rather than on message text: only
/// [`ErrorKind::Transient`] is worth retrying, while [`ErrorKind::InvalidInput`]
/// will fail the same way every time.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Startup problem: missing credential, unreadable config, bad base URL.
    #[error("configuration error: {0}")]
    Config(String),
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("not found: {0}")]
    NotFound(String),
    /// Stale revision token or a ref that appeared concurrently.
    #[error("conflict: {0}")]
    Conflict(String),
    #[error("unauthorized: {0}")]
    Unauthorized(String),
    /// Network failure, rate limit, or 5xx from the host.
    #[error("transient failure: {0}")]
    Transient(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Config,
    InvalidInput,
    NotFound,
    Conflict,
    Unauthorized,
    Transient,
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Config(_) => ErrorKind::Config,
            Error::InvalidInput(_) => ErrorKind::InvalidInput,
            Error::NotFound(_) => ErrorKind::NotFound,
            Error::Conflict(_) => ErrorKind::Conflict,
            Error::Unauthorized(_) => ErrorKind::Unauthorized,
            Error::Transient(_) => ErrorKind::Transient,
        }
    }

    pub fn is_retryable(&self) -> bool {
        self.kind() == ErrorKind::Transient
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ErrorKind::Config => "config",
            ErrorKind::InvalidInput => "invalid-input",
            ErrorKind::NotFound => "not-found",
            ErrorKind::Conflict => "conflict",
            ErrorKind::Unauthorized => "unauthorized",
            ErrorKind::Transient => "transient",
        };
        f.write_str(s)
    }
}

impl From<reqwest::Error> for Error {
    fn from(e: reqwest::Error) -> Self {
        if e.is_builder() {
            Error::Config(e.to_string())
        } else if e.is_decode() {
            Error::Transient(format!("unexpected response body: {}", e))
        } else {
            Error::Transient(e.to_string())
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_transient_is_retryable() {
        assert!(Error::Transient("503".into()).is_retryable());
        assert!(!Error::Conflict("stale sha".into()).is_retryable());
        assert!(!Error::InvalidInput("bad path".into()).is_retryable());
        assert!(!Error::Unauthorized("401".into()).is_retryable());
    }

    #[test]
    fn display_includes_kind_prefix() {
        let e = Error::NotFound("branch 'main'".into());
        assert_eq!(e.to_string(), "not found: branch 'main'");
        assert_eq!(e.kind().to_string(), "not-found");
    }
}
