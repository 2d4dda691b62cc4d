use reqwest::StatusCode;
use std::path::PathBuf;

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Base error for everything the Open Data Platform client can fail with.
///
/// Fetch operations only ever produce [`Error::Connection`] or [`Error::Data`];
/// [`Error::Config`] is limited to client construction.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Connection(#[from] ConnectionError),

    #[error(transparent)]
    Data(#[from] DataError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Coarse classification of an [`Error`], for callers that match on kind only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Connection,
    Data,
    Config,
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Connection(_) => ErrorKind::Connection,
            Error::Data(_) => ErrorKind::Data,
            Error::Config(_) => ErrorKind::Config,
        }
    }
}

/// Transport-level failure. The underlying reqwest error is kept as `source()`.
#[derive(Debug, thiserror::Error)]
pub enum ConnectionError {
    #[error("Timeout occurred while connecting to the Open Data Platform API")]
    Timeout(#[source] reqwest::Error),

    #[error("Error occurred while communicating with the Open Data Platform API")]
    Transport(#[source] reqwest::Error),

    // Non-2xx responses are reported as connection failures.
    #[error("Open Data Platform API responded with an error status{}", fmt_status(.0.status()))]
    Status(#[source] reqwest::Error),
}

impl ConnectionError {
    pub(crate) fn from_reqwest(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ConnectionError::Timeout(err)
        } else if err.is_status() {
            ConnectionError::Status(err)
        } else {
            ConnectionError::Transport(err)
        }
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, ConnectionError::Timeout(_))
    }

    /// HTTP status of the response, when the failure came from a non-2xx reply.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ConnectionError::Status(err) => err.status(),
            _ => None,
        }
    }
}

fn fmt_status(status: Option<StatusCode>) -> String {
    status.map(|s| format!(" (HTTP {s})")).unwrap_or_default()
}

/// Content-level failure: the server answered 2xx but not with usable GeoJSON.
#[derive(Debug, thiserror::Error)]
pub enum DataError {
    #[error(
        "Unexpected content type response from the Open Data Platform API: {content_type:?}"
    )]
    UnexpectedContentType { content_type: String, body: String },

    #[error("Open Data Platform API returned a body that is not valid JSON")]
    InvalidJson(#[source] serde_json::Error),

    #[error("Open Data Platform API returned JSON that is not a feature collection")]
    InvalidFeatureCollection(#[source] serde_json::Error),
}

impl DataError {
    /// Content type reported by the server, for content-type mismatches.
    pub fn content_type(&self) -> Option<&str> {
        match self {
            DataError::UnexpectedContentType { content_type, .. } => Some(content_type),
            _ => None,
        }
    }

    /// Raw response text, for content-type mismatches.
    pub fn body(&self) -> Option<&str> {
        match self {
            DataError::UnexpectedContentType { body, .. } => Some(body),
            _ => None,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read configuration file {}", path.display())]
    ReadRc {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid timeout {value:?} (expected a positive number of seconds)")]
    InvalidTimeout { value: String },
}
