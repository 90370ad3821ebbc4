//! Crate error handling
//!
//! Every failure surfaced by this crate falls into one of a small number of
//! classes, reported by [`Error::kind`]. Callers (and tests) should match on
//! the kind rather than on message text.

pub use std::result::Result;
use thiserror::Error as ThisError;

/// Coarse classification of an [`Error`]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Bad local configuration, detected before any network call
    Config,
    /// Credentials or token rejected by the server
    Auth,
    /// Connection or network failure
    Transport,
    /// Server answered with a non-OK status
    Protocol,
    /// Authenticated key unwrap failed
    Integrity,
    /// Unwrapped payload could not be decoded
    MalformedPayload,
    /// Call was cancelled or its deadline passed
    Cancelled,
    /// Invalid argument passed by the caller
    InvalidParameter,
}

/// Error enum that rolls-up all error messages in this crate
#[derive(Clone, Debug, ThisError)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Authentication error: {0}")]
    Auth(String),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Server returned status {code}: {message}")]
    Protocol { code: i32, message: String },

    #[error("Key unwrap failed integrity check: {0}")]
    Integrity(String),

    #[error("Malformed payload: {0}")]
    MalformedPayload(String),

    #[error("Call cancelled: {0}")]
    Cancelled(String),

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),
}

impl Error {
    /// Returns the class of this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Config(_) => ErrorKind::Config,
            Error::Auth(_) => ErrorKind::Auth,
            Error::Transport(_) => ErrorKind::Transport,
            Error::Protocol { .. } => ErrorKind::Protocol,
            Error::Integrity(_) => ErrorKind::Integrity,
            Error::MalformedPayload(_) => ErrorKind::MalformedPayload,
            Error::Cancelled(_) => ErrorKind::Cancelled,
            Error::InvalidParameter(_) => ErrorKind::InvalidParameter,
        }
    }
}

impl From<base64::DecodeError> for Error {
    fn from(e: base64::DecodeError) -> Error {
        Error::Config(format!("KIK is not valid base64: {}", e))
    }
}

impl From<uuid::Error> for Error {
    fn from(e: uuid::Error) -> Error {
        Error::Config(format!("KIK id is not a valid uuid: {}", e))
    }
}

impl From<getrandom::Error> for Error {
    fn from(_: getrandom::Error) -> Error {
        Error::Config(String::from("no entropy source available"))
    }
}
