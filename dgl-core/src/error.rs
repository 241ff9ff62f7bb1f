//! Error types for dgl-core.

use std::path::PathBuf;

use thiserror::Error;

/// All errors that can arise from loading or validating the configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Underlying I/O failure while reading the config file.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// JSON parse error on load, with the file path.
    #[error("failed to parse config at {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// The config file did not exist at the expected path.
    #[error("config not found at {path}; see README for the expected format")]
    NotFound { path: PathBuf },

    /// `dirs::home_dir()` returned `None`.
    #[error("cannot determine home directory; set $HOME or equivalent")]
    HomeNotFound,

    #[error("the config is incomplete")]
    Incomplete,

    #[error("the dropbox_path should be \"/{value}\" instead of \"{value}\"")]
    InvalidDropboxPath { value: String },

    #[error("the dropbox_gif_dir should be \"/{value}\" instead of \"{value}\"")]
    InvalidGifDir { value: String },
}

/// Rejections produced while cleaning a raw input line.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InputError {
    #[error("not a gif [{0}]")]
    NotAGif(String),

    #[error("multiple gifs detected in {0}")]
    MultipleGifs(String),
}

/// Convenience constructor for [`ConfigError::Io`].
pub(crate) fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> ConfigError {
    ConfigError::Io {
        path: path.into(),
        source,
    }
}
