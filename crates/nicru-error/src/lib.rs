//! Structured error types for the Nic.ru API client.
//!
//! Failures coming out of the transport are split into two classes the
//! caller can act on: validation problems (`Error`) that will fail again if
//! retried, and operational problems (`Runtime`) such as network or I/O
//! trouble. Anything the transport could not classify is carried through
//! untouched in `Other`.

use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};
use std::fmt;
use thiserror::Error;

pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

pub type Result<T> = std::result::Result<T, NicRuError>;

#[derive(Error, Debug)]
pub enum NicRuError {
    /// Logic or validation failure, e.g. a malformed request.
    #[error("{0}")]
    Error(String),
    /// Operational failure: network, I/O, timeout.
    #[error("{0}")]
    Runtime(String),
    /// Response body did not match the requested shape.
    #[error("Decode error: {0}")]
    Decode(String),
    #[error(transparent)]
    Other(BoxError),
}

/// Stable, serialisable classification of a `NicRuError`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorKind {
    Error,
    Runtime,
    Decode,
    Other,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Error => write!(f, "error"),
            Self::Runtime => write!(f, "runtime"),
            Self::Decode => write!(f, "decode"),
            Self::Other => write!(f, "other"),
        }
    }
}

impl NicRuError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Error(_) => ErrorKind::Error,
            Self::Runtime(_) => ErrorKind::Runtime,
            Self::Decode(_) => ErrorKind::Decode,
            Self::Other(_) => ErrorKind::Other,
        }
    }

    /// Only operational failures are worth retrying; nothing here retries.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Runtime(_))
    }

    pub fn other<E>(err: E) -> Self
    where
        E: Into<BoxError>,
    {
        Self::Other(err.into())
    }
}

impl From<serde_json::Error> for NicRuError {
    fn from(err: serde_json::Error) -> Self {
        Self::Decode(err.to_string())
    }
}

impl Serialize for NicRuError {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("NicRuError", 2)?;
        state.serialize_field("kind", &self.kind())?;
        state.serialize_field("message", &self.to_string())?;
        state.end()
    }
}
