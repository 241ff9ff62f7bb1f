//! Blocking client for the two Dropbox sharing endpoints the linker needs.

use std::path::Path;
use std::time::Duration;

use serde::Serialize;

use dgl_core::ConfigProvider;

use crate::error::RemoteError;
use crate::link::{truncate, ApiErrorBody, CreationPayload, ExistingPayload, ListSharedLinks, SharedLink};

const API_VERSION: u32 = 2;
const USER_AGENT: &str = "Dropbox Gif Linker";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Source of shared links for a Dropbox path.
///
/// Split out so the reconciler can be driven by an in-memory fake.
pub trait LinkService {
    /// The shared link whose path matches `remote_path` exactly.
    /// [`RemoteError::NotFound`] when no such link exists.
    fn find_existing(&self, remote_path: &str) -> Result<SharedLink, RemoteError>;

    /// Create a public shared link for `remote_path`.
    fn create(&self, remote_path: &str) -> Result<SharedLink, RemoteError>;

    /// Map a local file under the Dropbox root to its API path.
    fn remote_path_for(&self, local: &Path) -> Result<String, RemoteError>;
}

/// Talks to `https://api.dropboxapi.com/2/sharing/*`.
#[derive(Debug, Clone)]
pub struct DropboxClient<C: ConfigProvider> {
    host: String,
    version: u32,
    config: C,
    agent: ureq::Agent,
}

impl<C: ConfigProvider> DropboxClient<C> {
    pub fn new(config: C) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout(REQUEST_TIMEOUT)
            .user_agent(USER_AGENT)
            .build();
        Self {
            host: config.api_host().trim_end_matches('/').to_string(),
            version: API_VERSION,
            config,
            agent,
        }
    }

    /// Point the client at another API host (tests, proxies).
    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into().trim_end_matches('/').to_string();
        self
    }

    pub fn config(&self) -> &C {
        &self.config
    }

    pub fn existing_url(&self) -> String {
        format!("{}/{}/sharing/list_shared_links", self.host, self.version)
    }

    pub fn creation_url(&self) -> String {
        format!(
            "{}/{}/sharing/create_shared_link_with_settings",
            self.host, self.version
        )
    }

    fn post<T: Serialize>(
        &self,
        url: &str,
        remote_path: &str,
        payload: &T,
    ) -> Result<ureq::Response, RemoteError> {
        self.config.validate()?;

        tracing::debug!(%url, path = remote_path, "dropbox request");
        let result = self
            .agent
            .post(url)
            .set("Authorization", &format!("Bearer {}", self.config.token()))
            .set("Content-Type", "application/json")
            .send_json(payload);

        match result {
            Ok(response) => Ok(response),
            Err(ureq::Error::Status(status, response)) => {
                let body = response.into_string().unwrap_or_default();
                tracing::debug!(%url, status, %body, "dropbox rejected request");
                Err(classify(status, body, remote_path))
            }
            Err(ureq::Error::Transport(transport)) => Err(RemoteError::Transport {
                url: url.to_string(),
                source: Box::new(transport),
            }),
        }
    }
}

impl<C: ConfigProvider> LinkService for DropboxClient<C> {
    fn find_existing(&self, remote_path: &str) -> Result<SharedLink, RemoteError> {
        let response = self.post(
            &self.existing_url(),
            remote_path,
            &ExistingPayload::direct(remote_path),
        )?;
        let listed: ListSharedLinks = response.into_json().map_err(RemoteError::Decode)?;
        tracing::debug!(
            path = remote_path,
            links = listed.links.len(),
            has_more = listed.has_more,
            "listed shared links"
        );

        let wanted = remote_path.to_lowercase();
        listed
            .links
            .into_iter()
            .find(|link| link.is_file() && link.path_lower == wanted)
            .ok_or_else(|| RemoteError::NotFound {
                path: remote_path.to_string(),
            })
    }

    fn create(&self, remote_path: &str) -> Result<SharedLink, RemoteError> {
        let response = self.post(
            &self.creation_url(),
            remote_path,
            &CreationPayload::public(remote_path),
        )?;
        let link: SharedLink = response.into_json().map_err(RemoteError::Decode)?;
        tracing::info!(path = remote_path, url = %link.url, "created shared link");
        Ok(link)
    }

    fn remote_path_for(&self, local: &Path) -> Result<String, RemoteError> {
        truncate(self.config.root_path(), local)
    }
}

/// Map a non-success status onto the error taxonomy.
fn classify(status: u16, body: String, remote_path: &str) -> RemoteError {
    let path = remote_path.to_string();
    match status {
        401 => RemoteError::Unauthorized { status },
        400 if body.contains("access token") => RemoteError::Unauthorized { status },
        409 => {
            let summary = serde_json::from_str::<ApiErrorBody>(&body)
                .map(|err| err.error_summary)
                .unwrap_or_default();
            if summary.starts_with("shared_link_already_exists") {
                RemoteError::Conflict { path }
            } else if summary.contains("not_found") {
                RemoteError::SourceNotFound { path }
            } else {
                RemoteError::Rejected { status, body }
            }
        }
        _ => RemoteError::Rejected { status, body },
    }
}
