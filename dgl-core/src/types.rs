//! Domain types for the gif link cache.
//!
//! A [`ShareRecord`] is what the cache stores per [`Fingerprint`]: enough of
//! the Dropbox shared-link metadata to rebuild a directly embeddable URL
//! without talking to the API again.

use std::fmt;

use serde::{Deserialize, Serialize};
use url::form_urlencoded;

/// Host that serves raw shared-link content (no preview page).
pub const CONTENT_BASE_URL: &str = "https://dl.dropboxusercontent.com";

// ---------------------------------------------------------------------------
// Newtypes
// ---------------------------------------------------------------------------

/// Hex content digest of a file. Primary key of the cache.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Fingerprint(pub String);

impl Fingerprint {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<String> for Fingerprint {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for Fingerprint {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

// ---------------------------------------------------------------------------
// ShareRecord
// ---------------------------------------------------------------------------

fn default_use_count() -> u64 {
    1
}

/// One cached, shareable gif.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShareRecord {
    #[serde(rename = "checksum")]
    pub fingerprint: Fingerprint,
    pub base_name: String,
    /// Parent directory relative to the configured gifs directory, always
    /// starting with a separator (`/` for files at the top level).
    pub directory: String,
    pub file_size: u64,
    pub shared_link_id: String,
    /// Remote handle such as `/s/xyz`; joined with `base_name` to build [`ShareRecord::url`].
    pub remote_path: String,
    /// Query string kept from the shared link (e.g. `rlkey=...`), without the `?`.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub query: String,
    /// Records written before the counter existed load as `1`.
    #[serde(default = "default_use_count")]
    pub use_count: u64,
    #[serde(skip)]
    persisted: bool,
}

impl ShareRecord {
    /// Fresh, unsaved record. `use_count` stays `0` until the store assigns it.
    pub fn new(
        fingerprint: Fingerprint,
        base_name: impl Into<String>,
        directory: impl Into<String>,
        file_size: u64,
        shared_link_id: impl Into<String>,
        remote_path: impl Into<String>,
    ) -> Self {
        Self {
            fingerprint,
            base_name: base_name.into(),
            directory: directory.into(),
            file_size,
            shared_link_id: shared_link_id.into(),
            remote_path: remote_path.into(),
            query: String::new(),
            use_count: 0,
            persisted: false,
        }
    }

    /// Attach the query string the public URL must carry.
    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        self.query = query.into();
        self
    }

    /// Whether this value reflects a row currently in the store.
    pub fn is_persisted(&self) -> bool {
        self.persisted
    }

    /// Set by the cache store after a successful read, write or delete.
    #[doc(hidden)]
    pub fn mark_persisted(&mut self, persisted: bool) {
        self.persisted = persisted;
    }

    /// Directory rendered as a comma-separated tag list.
    ///
    /// `/taylor swift/excited` → `taylor swift, excited`
    pub fn tags(&self) -> String {
        self.directory
            .trim_start_matches(['/', '\\'])
            .split(['/', '\\'])
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Directly fetchable URL on the content host.
    pub fn url(&self) -> String {
        let name: String = form_urlencoded::byte_serialize(self.base_name.as_bytes()).collect();
        let remote = self.remote_path.trim_matches('/');
        let mut url = if remote.is_empty() {
            format!("{CONTENT_BASE_URL}/{name}")
        } else {
            format!("{CONTENT_BASE_URL}/{remote}/{name}")
        };
        if !self.query.is_empty() {
            url.push('?');
            url.push_str(&self.query);
        }
        url
    }

    pub fn markdown(&self) -> String {
        format!("![{}]({})", self.base_name, self.url())
    }

    pub fn bbcode(&self) -> String {
        format!("[img]{}[/img]", self.url())
    }
}

/// Equality over the stored fields; the in-memory `persisted` flag is ignored.
impl PartialEq for ShareRecord {
    fn eq(&self, other: &Self) -> bool {
        self.fingerprint == other.fingerprint
            && self.base_name == other.base_name
            && self.directory == other.directory
            && self.file_size == other.file_size
            && self.shared_link_id == other.shared_link_id
            && self.remote_path == other.remote_path
            && self.query == other.query
            && self.use_count == other.use_count
    }
}

impl Eq for ShareRecord {}

impl fmt::Display for ShareRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {} ({})",
            self.tags(),
            self.base_name,
            human_bytes(self.file_size)
        )
    }
}

// ---------------------------------------------------------------------------
// Sizes
// ---------------------------------------------------------------------------

/// SI-unit byte count: `3456` → `3.5 kB`, `2078402` → `2.1 MB`.
pub fn human_bytes(bytes: u64) -> String {
    const UNITS: [&str; 7] = ["B", "kB", "MB", "GB", "TB", "PB", "EB"];
    if bytes < 10 {
        return format!("{bytes} B");
    }
    let exp = ((bytes as f64).ln() / 1000f64.ln()).floor() as usize;
    let exp = exp.min(UNITS.len() - 1);
    let value = ((bytes as f64 / 1000f64.powi(exp as i32)) * 10.0 + 0.5).floor() / 10.0;
    if value < 10.0 {
        format!("{value:.1} {}", UNITS[exp])
    } else {
        format!("{value:.0} {}", UNITS[exp])
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
