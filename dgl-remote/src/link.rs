//! Wire types for the Dropbox sharing endpoints and URL helpers.

use std::path::{Component, Path};

use serde::{Deserialize, Serialize};
use url::{form_urlencoded, Url};

use crate::error::RemoteError;

/// Host serving raw shared content instead of the preview page.
pub const CONTENT_HOST: &str = "dl.dropboxusercontent.com";

/// Query parameter that toggles the preview page (`dl=0`).
const PREVIEW_PARAM: &str = "dl";

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

/// `list_shared_links` body.
#[derive(Debug, Clone, Serialize)]
pub(crate) struct ExistingPayload<'a> {
    pub path: &'a str,
    /// Only links to the file itself, not to a parent folder.
    pub direct_only: bool,
}

impl<'a> ExistingPayload<'a> {
    pub fn direct(path: &'a str) -> Self {
        Self {
            path,
            direct_only: true,
        }
    }
}

/// `create_shared_link_with_settings` body.
#[derive(Debug, Clone, Serialize)]
pub(crate) struct CreationPayload<'a> {
    pub path: &'a str,
    pub settings: SettingsPayload,
}

#[derive(Debug, Clone, Serialize)]
pub(crate) struct SettingsPayload {
    pub requested_visibility: &'static str,
}

impl<'a> CreationPayload<'a> {
    pub fn public(path: &'a str) -> Self {
        Self {
            path,
            settings: SettingsPayload {
                requested_visibility: "public",
            },
        }
    }
}

// ---------------------------------------------------------------------------
// Responses
// ---------------------------------------------------------------------------

/// One shared link as returned by the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SharedLink {
    /// `file` or `folder`.
    #[serde(rename = ".tag", default)]
    pub tag: String,
    /// Web-facing preview URL, e.g. `https://www.dropbox.com/s/xyz/cat.gif?dl=0`.
    pub url: String,
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    /// Canonical lower-cased Dropbox path.
    #[serde(default)]
    pub path_lower: String,
    #[serde(default)]
    pub size: Option<u64>,
}

impl SharedLink {
    pub fn is_file(&self) -> bool {
        self.tag == "file"
    }

    /// URL path without the trailing file name: `/s/xyz/cat.gif` → `/s/xyz`.
    pub fn remote_path(&self) -> Result<String, RemoteError> {
        let url = parse(&self.url)?;
        let path = url.path().trim_end_matches('/');
        let dir = path.rsplit_once('/').map(|(dir, _)| dir).unwrap_or("");
        Ok(dir.to_string())
    }

    /// Query of the link URL minus the preview toggle, e.g. `rlkey=k1`.
    pub fn public_query(&self) -> Result<String, RemoteError> {
        let url = parse(&self.url)?;
        let kept: Vec<(String, String)> = url
            .query_pairs()
            .filter(|(key, _)| key != PREVIEW_PARAM)
            .map(|(key, value)| (key.into_owned(), value.into_owned()))
            .collect();
        Ok(form_urlencoded::Serializer::new(String::new())
            .extend_pairs(kept)
            .finish())
    }

    pub fn public_url(&self) -> Result<String, RemoteError> {
        build_public_url(self)
    }
}

/// `list_shared_links` response.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ListSharedLinks {
    #[serde(default)]
    pub links: Vec<SharedLink>,
    #[serde(default)]
    pub has_more: bool,
}

/// Error body on 409 responses.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ApiErrorBody {
    #[serde(default)]
    pub error_summary: String,
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Directly fetchable URL: content host substituted, preview toggle removed.
///
/// `https://www.dropbox.com/s/xyz/cat.gif?dl=0` → `https://dl.dropboxusercontent.com/s/xyz/cat.gif`
pub fn build_public_url(link: &SharedLink) -> Result<String, RemoteError> {
    let mut url = parse(&link.url)?;
    url.set_host(Some(CONTENT_HOST))
        .map_err(|source| RemoteError::InvalidUrl {
            url: link.url.clone(),
            source,
        })?;

    let query = link.public_query()?;
    url.set_query((!query.is_empty()).then_some(query.as_str()));
    Ok(url.into())
}

/// Strip the local Dropbox `root` from `local`, yielding the API path.
///
/// `/Users/me/Dropbox/gifs/cat.gif` under `/Users/me/Dropbox` → `/gifs/cat.gif`
pub fn truncate(root: &Path, local: &Path) -> Result<String, RemoteError> {
    let outside = || RemoteError::OutsideRoot {
        path: local.to_path_buf(),
        root: root.to_path_buf(),
    };
    if root.as_os_str().is_empty() {
        return Err(outside());
    }
    let relative = local.strip_prefix(root).map_err(|_| outside())?;

    let mut remote = String::new();
    for component in relative.components() {
        match component {
            Component::Normal(part) => {
                remote.push('/');
                remote.push_str(&part.to_string_lossy());
            }
            Component::CurDir => {}
            _ => return Err(outside()),
        }
    }
    if remote.is_empty() {
        return Err(outside());
    }
    Ok(remote)
}

fn parse(raw: &str) -> Result<Url, RemoteError> {
    Url::parse(raw).map_err(|source| RemoteError::InvalidUrl {
        url: raw.to_string(),
        source,
    })
}
