//! # dgl-remote
//!
//! Dropbox sharing API: look up an existing shared link for a path or create
//! a public one, and turn the returned preview URL into a direct content URL.

pub mod client;
pub mod error;
pub mod link;

pub use client::{DropboxClient, LinkService};
pub use error::RemoteError;
pub use link::{build_public_url, truncate, SharedLink, CONTENT_HOST};
