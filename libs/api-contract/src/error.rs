//! Errors raised while loading a contract document.

use std::path::PathBuf;

use thiserror::Error;

/// Failure to turn a document into a usable [`crate::Contract`].
#[derive(Debug, Error)]
pub enum ContractError {
    #[error("failed to read contract document {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("contract document is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("contract document is missing `{0}`")]
    MissingField(&'static str),

    #[error("unsupported OpenAPI version `{0}`, expected 3.x")]
    UnsupportedVersion(String),

    #[error("cannot route path `{path}`: {reason}")]
    InvalidPath { path: String, reason: String },

    #[error("unresolvable reference `{0}`")]
    UnresolvedRef(String),

    #[error("invalid schema at {location}: {reason}")]
    InvalidSchema { location: String, reason: String },
}
