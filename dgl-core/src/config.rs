//! JSON configuration at `~/.dgl.json`.
//!
//! ```json
//! {
//!   "dropbox_path": "~/Dropbox",
//!   "dropbox_gif_dir": "/gifs",
//!   "dropbox_api_token": "..."
//! }
//! ```
//!
//! # API pattern
//!
//! - `load_at(home)`: explicit home; used in tests with `TempDir`
//! - `load()`: derives home from `dirs::home_dir()`, delegates to `load_at`
//!
//! Loading never validates; callers check [`ConfigProvider::validate`] and
//! treat a failure as fatal.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{io_err, ConfigError};

pub const CONFIG_FILENAME: &str = ".dgl.json";
pub const DEFAULT_API_HOST: &str = "https://api.dropboxapi.com";

/// Hidden directory (inside the gifs dir) holding the cache database.
const DATABASE_DIR: &str = ".gifs";
const DATABASE_FILE: &str = "gifs.redb";

// ---------------------------------------------------------------------------
// Capability
// ---------------------------------------------------------------------------

/// What the link service and the reconciler need to know about the setup.
///
/// Kept narrow so tests can hand in a plain struct.
pub trait ConfigProvider {
    /// Local Dropbox root, stripped from absolute paths to build remote paths.
    fn root_path(&self) -> &Path;

    /// Gifs directory inside Dropbox, with a leading `/` (e.g. `/gifs`).
    fn gifs_path(&self) -> &str;

    fn token(&self) -> &str;

    fn validate(&self) -> Result<(), ConfigError>;

    fn api_host(&self) -> &str {
        DEFAULT_API_HOST
    }

    /// Local gifs directory: root joined with the gifs path.
    fn full_path(&self) -> PathBuf {
        self.root_path()
            .join(self.gifs_path().trim_start_matches('/'))
    }

    /// `<full_path>/.gifs/gifs.redb`
    fn database_path(&self) -> PathBuf {
        self.full_path().join(DATABASE_DIR).join(DATABASE_FILE)
    }

    fn valid(&self) -> bool {
        self.validate().is_ok()
    }
}

// ---------------------------------------------------------------------------
// File-backed config
// ---------------------------------------------------------------------------

fn default_api_host() -> String {
    DEFAULT_API_HOST.to_string()
}

/// Contents of `~/.dgl.json` plus where it was loaded from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub dropbox_path: String,
    #[serde(default, rename = "dropbox_gif_dir")]
    pub gif_dir: String,
    #[serde(default, rename = "dropbox_api_token")]
    pub api_token: String,
    #[serde(default = "default_api_host", rename = "dropbox_api_host")]
    pub api_host: String,
    #[serde(skip)]
    loaded_from: Option<PathBuf>,
}

impl Config {
    /// Build a config in memory (no file involved).
    pub fn new(
        dropbox_path: impl Into<String>,
        gif_dir: impl Into<String>,
        api_token: impl Into<String>,
    ) -> Self {
        let mut config = Self {
            dropbox_path: dropbox_path.into(),
            gif_dir: gif_dir.into(),
            api_token: api_token.into(),
            api_host: default_api_host(),
            loaded_from: None,
        };
        config.fix_gif_dir();
        config
    }

    /// `<home>/.dgl.json`. Pure, no I/O.
    pub fn path_at(home: &Path) -> PathBuf {
        home.join(CONFIG_FILENAME)
    }

    /// Load `<home>/.dgl.json`, expanding `~/` in `dropbox_path` against `home`.
    pub fn load_at(home: &Path) -> Result<Self, ConfigError> {
        Self::load_from(&Self::path_at(home), home)
    }

    /// `load_at` convenience wrapper.
    pub fn load() -> Result<Self, ConfigError> {
        let home = dirs::home_dir().ok_or(ConfigError::HomeNotFound)?;
        Self::load_at(&home)
    }

    /// Load an explicit config file. `home` is only used for `~/` expansion.
    ///
    /// Returns `ConfigError::NotFound` if absent, `ConfigError::Parse` if malformed.
    pub fn load_from(path: &Path, home: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::NotFound {
                path: path.to_path_buf(),
            });
        }
        let contents = std::fs::read_to_string(path).map_err(|e| io_err(path, e))?;
        let mut config: Config =
            serde_json::from_str(&contents).map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        config.fix_gif_dir();
        config.expand_home(home);
        config.loaded_from = Some(path.to_path_buf());
        tracing::debug!(path = %path.display(), "loaded config");
        Ok(config)
    }

    /// File this config was read from, if any.
    pub fn loaded_from(&self) -> Option<&Path> {
        self.loaded_from.as_deref()
    }

    /// `gifs/` → `/gifs/`
    fn fix_gif_dir(&mut self) {
        if !self.gif_dir.is_empty() && !self.gif_dir.starts_with('/') {
            self.gif_dir = format!("/{}", self.gif_dir);
        }
    }

    fn expand_home(&mut self, home: &Path) {
        if let Some(rest) = self.dropbox_path.strip_prefix("~/") {
            self.dropbox_path = home.join(rest).to_string_lossy().into_owned();
        } else if self.dropbox_path == "~" {
            self.dropbox_path = home.to_string_lossy().into_owned();
        }
    }
}

impl ConfigProvider for Config {
    fn root_path(&self) -> &Path {
        Path::new(&self.dropbox_path)
    }

    fn gifs_path(&self) -> &str {
        &self.gif_dir
    }

    fn token(&self) -> &str {
        &self.api_token
    }

    fn api_host(&self) -> &str {
        &self.api_host
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.dropbox_path.is_empty() || self.gif_dir.is_empty() || self.api_token.is_empty() {
            return Err(ConfigError::Incomplete);
        }
        let rooted = self.dropbox_path.starts_with("~/")
            || self.dropbox_path.starts_with('/')
            || Path::new(&self.dropbox_path).is_absolute();
        if !rooted {
            return Err(ConfigError::InvalidDropboxPath {
                value: self.dropbox_path.clone(),
            });
        }
        if !self.gif_dir.starts_with('/') {
            return Err(ConfigError::InvalidGifDir {
                value: self.gif_dir.clone(),
            });
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
