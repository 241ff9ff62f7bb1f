//! Shared building blocks for the gif linker.
//!
//! Public API surface:
//! - [`types`]: [`ShareRecord`] and the [`Fingerprint`] newtype
//! - [`config`]: `~/.dgl.json` loading and the [`ConfigProvider`] capability
//! - [`input`]: cleaning of drag-and-dropped path lines
//! - [`error`]: [`ConfigError`], [`InputError`]

pub mod config;
pub mod error;
pub mod input;
pub mod types;

pub use config::{Config, ConfigProvider, CONFIG_FILENAME, DEFAULT_API_HOST};
pub use error::{ConfigError, InputError};
pub use types::{human_bytes, Fingerprint, ShareRecord, CONTENT_BASE_URL};
