//! Error types for dgl-sync.

use std::path::PathBuf;

use thiserror::Error;

use dgl_core::{Fingerprint, InputError};
use dgl_remote::RemoteError;
use dgl_store::StoreError;

/// Why a dropped path did not produce a link.
///
/// Every variant names the path or fingerprint it was working on.
#[derive(Debug, Error)]
pub enum ReconcileError {
    #[error(transparent)]
    Input(#[from] InputError),

    #[error("could not read {}: {source}", path.display())]
    Fingerprint {
        path: PathBuf,
        #[source]
        source: StoreError,
    },

    #[error("cache lookup for {fingerprint} failed: {source}")]
    Lookup {
        fingerprint: Fingerprint,
        #[source]
        source: StoreError,
    },

    #[error("could not check the cached link for {fingerprint}: {source}")]
    Liveness {
        fingerprint: Fingerprint,
        #[source]
        source: StoreError,
    },

    #[error("could not evict stale record {fingerprint}: {source}")]
    Evict {
        fingerprint: Fingerprint,
        #[source]
        source: StoreError,
    },

    #[error("dropbox request for {} failed: {source}", path.display())]
    Remote {
        path: PathBuf,
        #[source]
        source: RemoteError,
    },

    #[error("could not save {fingerprint}: {source}")]
    Persist {
        fingerprint: Fingerprint,
        #[source]
        source: StoreError,
    },

    #[error("no gif selected")]
    NoCurrent,

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl ReconcileError {
    /// Authentication or configuration is broken; the session must end.
    pub fn is_fatal(&self) -> bool {
        match self {
            ReconcileError::Remote { source, .. } => source.is_fatal(),
            _ => false,
        }
    }
}
