//! # dgl-store
//!
//! Content fingerprints and the local link cache.
//!
//! [`fingerprint`] hashes a file, [`CacheStore`] persists [`dgl_core::ShareRecord`]s
//! keyed by that hash, and [`LivenessProbe`] answers whether a cached public
//! URL still resolves.

pub mod cache;
pub mod error;
pub mod fingerprint;
pub mod liveness;

pub use cache::{CacheStore, Insertion, GIFS_TABLE};
pub use error::StoreError;
pub use fingerprint::fingerprint;
pub use liveness::{HttpProbe, LivenessProbe};
