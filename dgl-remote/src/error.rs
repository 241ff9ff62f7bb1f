//! Error types for dgl-remote.

use std::path::PathBuf;

use thiserror::Error;

use dgl_core::ConfigError;

/// All errors that can arise while talking to the sharing API.
#[derive(Debug, Error)]
pub enum RemoteError {
    /// The client refuses to send requests with an unusable configuration.
    #[error("client is not valid: {0}")]
    InvalidConfig(#[from] ConfigError),

    /// The API could not be reached at all.
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: Box<ureq::Transport>,
    },

    /// The access token was rejected; retrying cannot help.
    #[error("dropbox rejected the access token (status {status})")]
    Unauthorized { status: u16 },

    /// No shared link exists yet for the path.
    #[error("no existing link for {path}")]
    NotFound { path: String },

    /// A shared link already exists; the create call lost the race or skipped the lookup.
    #[error("a shared link already exists for {path}")]
    Conflict { path: String },

    /// The file is not present on the Dropbox side.
    #[error("{path} does not exist in dropbox")]
    SourceNotFound { path: String },

    /// Any other non-success status.
    #[error("dropbox returned a {status}")]
    Rejected { status: u16, body: String },

    #[error("filepath does not contain the dropbox path [{}]", root.display())]
    OutsideRoot { path: PathBuf, root: PathBuf },

    #[error("invalid shared link url {url}: {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    /// Response body did not match the expected JSON shape.
    #[error("failed to decode dropbox response: {0}")]
    Decode(#[source] std::io::Error),
}

impl RemoteError {
    /// Credentials or configuration are broken; the process should stop.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            RemoteError::Unauthorized { .. } | RemoteError::InvalidConfig(_)
        )
    }

    /// The "no link yet" answer that drives the create path.
    pub fn is_not_found(&self) -> bool {
        matches!(self, RemoteError::NotFound { .. })
    }
}
