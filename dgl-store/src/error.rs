//! Error types for dgl-store.

use std::path::PathBuf;

use thiserror::Error;

use dgl_core::Fingerprint;

/// All errors that can arise from fingerprinting, cache I/O and liveness probes.
#[derive(Debug, Error)]
pub enum StoreError {
    /// An I/O error, with annotated path for context.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Any failure reported by the embedded database.
    #[error("cache database error: {0}")]
    Database(#[from] redb::Error),

    /// JSON serialization/deserialization error (stored records).
    #[error("cache record JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unable to find id \"{fingerprint}\"")]
    NotFound { fingerprint: Fingerprint },

    /// An operation was attempted while the store was closed.
    #[error("cache store is not connected")]
    NotConnected,

    #[error("record {fingerprint} has no remote path to probe")]
    EmptyUrl { fingerprint: Fingerprint },

    #[error("invalid url {url}: {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    /// The probe could not reach the remote at all (DNS, TLS, connection).
    #[error("liveness probe for {url} failed: {source}")]
    Probe {
        url: String,
        #[source]
        source: Box<ureq::Transport>,
    },
}

impl StoreError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound { .. })
    }
}

/// Convenience constructor for [`StoreError::Io`].
pub(crate) fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> StoreError {
    StoreError::Io {
        path: path.into(),
        source,
    }
}

/// Funnel the per-stage redb error types into [`StoreError::Database`].
pub(crate) fn db_err(err: impl Into<redb::Error>) -> StoreError {
    StoreError::Database(err.into())
}
