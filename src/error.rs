//! Error types used throughout the crate.
//!
//! Internally, fallible functions return `Res<T>` which is an `anyhow::Result`. At the public
//! boundaries (commands and `Config`), errors are converted into `Error`, which carries an
//! `ErrorType` so that callers can tell configuration problems apart from request failures and
//! validation failures.

use serde::{Deserialize, Serialize};
use std::fmt::{Debug, Display, Formatter};

pub(crate) type Res<T> = std::result::Result<T, anyhow::Error>;

/// The public result type of this library.
pub type Result<T> = std::result::Result<T, Error>;

/// Broad classification of what went wrong.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorType {
    /// The configuration directory or file is missing or invalid.
    Config,
    /// A request to the remote transaction service failed.
    Request,
    /// User input was rejected before anything was sent.
    Validation,
    /// There is no signed-in user.
    Session,
}

serde_plain::derive_display_from_serialize!(ErrorType);
serde_plain::derive_fromstr_from_deserialize!(ErrorType);

/// The public error type: an `ErrorType` along with the chain of causes.
pub struct Error {
    error_type: ErrorType,
    inner: anyhow::Error,
}

impl Error {
    pub(crate) fn new(error_type: ErrorType, inner: anyhow::Error) -> Self {
        Self { error_type, inner }
    }

    pub fn error_type(&self) -> ErrorType {
        self.error_type
    }
}

impl Debug for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} error: {:?}", self.error_type, self.inner)
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:#}", self.inner)
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.inner.source()
    }
}

/// Converts an internal `anyhow` result into the public `Result`.
pub(crate) trait IntoResult<T> {
    fn pub_result(self, error_type: ErrorType) -> Result<T>;
}

impl<T> IntoResult<T> for Res<T> {
    fn pub_result(self, error_type: ErrorType) -> Result<T> {
        self.map_err(|e| Error::new(error_type, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Context;

    #[test]
    fn test_pub_result_keeps_type_and_chain() {
        let res: Res<()> = Err(anyhow::anyhow!("connection refused")).context("Unable to load");
        let err = res.pub_result(ErrorType::Request).unwrap_err();
        assert_eq!(err.error_type(), ErrorType::Request);
        assert_eq!(err.to_string(), "Unable to load: connection refused");
    }

    #[test]
    fn test_error_type_display() {
        assert_eq!(ErrorType::Validation.to_string(), "validation");
        assert_eq!("session".parse::<ErrorType>().unwrap(), ErrorType::Session);
    }
}
