//! Error types for request building and dispatch.
//!
//! # Design
//! `NetworkError` is a closed set of failure reasons. Every variant exposes a
//! human-readable `message()` and a numeric `code()`: the HTTP status for
//! `RequestFailed`, the transport's own code for `Transport`, and 500 for
//! everything synthesized inside the crate. Nothing here carries retry state;
//! the dispatcher never retries.

use thiserror::Error;

/// Code reported for errors synthesized by this crate rather than a server
/// or transport.
pub const DEFAULT_ERROR_CODE: i32 = 500;

/// Code reported when an in-flight request was cancelled via
/// `Dispatcher::cancel`.
pub const CANCELLED_CODE: i32 = 499;

pub type Result<T, E = NetworkError> = std::result::Result<T, E>;

/// Errors surfaced by `RequestBuilder`, `Dispatcher` and `Response`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NetworkError {
    /// Neither the override URI nor the environment plus path formed a valid URL.
    #[error("Missing URL")]
    MissingUrl,

    /// The transport answered with a status other than 200.
    #[error("Request Failed (HTTP {status})")]
    RequestFailed { status: u16 },

    /// Parameters could not be encoded, or a response body was not JSON.
    #[error("Error with object parse: {detail}")]
    ParseFailed { detail: String },

    /// A response body was valid JSON but did not match the requested shape.
    #[error("Wrong Structure: {detail}")]
    WrongStructure { detail: String },

    /// Pass-through of an error raised by the transport itself.
    #[error("{message}")]
    Transport { message: String, code: i32 },
}

impl NetworkError {
    /// Wrap a transport failure, keeping its description and native code.
    pub fn from_transport<E: TransportError>(error: &E) -> Self {
        NetworkError::Transport {
            message: error.to_string(),
            code: error.code(),
        }
    }

    pub(crate) fn cancelled() -> Self {
        NetworkError::Transport {
            message: "request cancelled".to_string(),
            code: CANCELLED_CODE,
        }
    }

    pub(crate) fn parse_failed(detail: impl ToString) -> Self {
        NetworkError::ParseFailed {
            detail: detail.to_string(),
        }
    }

    pub fn message(&self) -> String {
        self.to_string()
    }

    pub fn code(&self) -> i32 {
        match self {
            NetworkError::RequestFailed { status } => i32::from(*status),
            NetworkError::Transport { code, .. } => *code,
            NetworkError::MissingUrl
            | NetworkError::ParseFailed { .. }
            | NetworkError::WrongStructure { .. } => DEFAULT_ERROR_CODE,
        }
    }

    /// True when this error was produced by `Dispatcher::cancel`.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, NetworkError::Transport { code, .. } if *code == CANCELLED_CODE)
    }
}

/// Errors raised by a `Transport` implementation.
///
/// The numeric code is forwarded verbatim into `NetworkError::Transport`.
pub trait TransportError: std::error::Error + Send + Sync + 'static {
    fn code(&self) -> i32;
}

/// Errors raised while loading an `Environment` from configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("missing configuration variable {0}")]
    MissingVar(String),

    #[error("unsupported scheme {0:?}, expected \"http\" or \"https\"")]
    InvalidScheme(String),
}
