//! Error types for the extraction endpoint.
//!
//! Every failure is a variant of [`ExtractError`]. Handlers keep the tagged
//! value for logging and only flatten it to the `ERROR: ...` body text at the
//! response boundary.

use std::fmt;

/// Prefix of every failure body returned by `/extract`.
pub const ERROR_PREFIX: &str = "ERROR: ";

/// Coarse classification of an [`ExtractError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Missing or wrong auth key
    Auth,
    /// The caller's URL could not be used
    Input,
    /// Network failure, timeout or upstream refusal
    Fetch,
    /// The page was fetched but no content could be extracted
    Extraction,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Auth => "auth",
            Self::Input => "input",
            Self::Fetch => "fetch",
            Self::Extraction => "extraction",
        };
        f.write_str(s)
    }
}

/// Failure while serving an extraction request.
#[derive(Debug, thiserror::Error)]
pub enum ExtractError {
    #[error("Invalid auth key.")]
    InvalidAuthKey,

    #[error("Missing url parameter")]
    MissingUrl,

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("Unsupported URL scheme: {0}")]
    UnsupportedScheme(String),

    #[error("Fetch timed out: {0}")]
    Timeout(String),

    #[error("Fetch failed: {0}")]
    Fetch(String),

    #[error("Upstream returned {0}")]
    UpstreamStatus(u16),

    #[error("Page exceeds {limit} bytes")]
    PageTooLarge { limit: usize },

    #[error("Extraction failed: {0}")]
    Extraction(String),
}

impl ExtractError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidAuthKey => ErrorKind::Auth,
            Self::MissingUrl | Self::InvalidUrl(_) | Self::UnsupportedScheme(_) => {
                ErrorKind::Input
            }
            Self::Timeout(_)
            | Self::Fetch(_)
            | Self::UpstreamStatus(_)
            | Self::PageTooLarge { .. } => ErrorKind::Fetch,
            Self::Extraction(_) => ErrorKind::Extraction,
        }
    }

    /// Flatten to the plain-text body sent to callers.
    pub fn to_wire_body(&self) -> String {
        format!("{ERROR_PREFIX}{self}")
    }
}

impl From<reqwest::Error> for ExtractError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            return ExtractError::Timeout(err.to_string());
        }
        match err.status() {
            Some(status) => ExtractError::UpstreamStatus(status.as_u16()),
            None => ExtractError::Fetch(err.to_string()),
        }
    }
}

/// Convenience type alias for extraction results.
pub type ExtractResult<T> = Result<T, ExtractError>;
