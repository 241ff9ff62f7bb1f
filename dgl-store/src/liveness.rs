//! Remote liveness: does a cached public URL still resolve?

use std::time::Duration;

use url::Url;

use dgl_core::ShareRecord;

use crate::error::StoreError;

const PROBE_TIMEOUT: Duration = Duration::from_secs(15);
const USER_AGENT: &str = concat!("dropbox-gif-linker/", env!("CARGO_PKG_VERSION"));

/// Issues the request behind a liveness check.
pub trait LivenessProbe {
    /// `Ok(true)` for a 2xx answer, `Ok(false)` for any other status.
    /// Unreachable or malformed URLs are errors, not "dead".
    fn is_live(&self, url: &str) -> Result<bool, StoreError>;
}

/// Probe backed by a blocking `ureq` GET.
#[derive(Debug, Clone)]
pub struct HttpProbe {
    agent: ureq::Agent,
}

impl HttpProbe {
    pub fn new() -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout_connect(PROBE_TIMEOUT)
            .timeout_read(PROBE_TIMEOUT)
            .user_agent(USER_AGENT)
            .build();
        Self { agent }
    }
}

impl Default for HttpProbe {
    fn default() -> Self {
        Self::new()
    }
}

impl LivenessProbe for HttpProbe {
    fn is_live(&self, url: &str) -> Result<bool, StoreError> {
        let parsed = Url::parse(url).map_err(|source| StoreError::InvalidUrl {
            url: url.to_string(),
            source,
        })?;

        match self.agent.request_url("GET", &parsed).call() {
            Ok(response) => Ok((200..300).contains(&response.status())),
            Err(ureq::Error::Status(status, _)) => {
                tracing::debug!(%url, status, "liveness probe answered with non-success");
                Ok(false)
            }
            Err(ureq::Error::Transport(transport)) => Err(StoreError::Probe {
                url: url.to_string(),
                source: Box::new(transport),
            }),
        }
    }
}

/// Probe the public URL rebuilt from `record`.
pub fn check(record: &ShareRecord, probe: &dyn LivenessProbe) -> Result<bool, StoreError> {
    if record.remote_path.trim_matches('/').is_empty() {
        return Err(StoreError::EmptyUrl {
            fingerprint: record.fingerprint.clone(),
        });
    }
    let url = record.url();
    let live = probe.is_live(&url)?;
    tracing::debug!(%url, live, "liveness checked");
    Ok(live)
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use dgl_core::Fingerprint;

    use super::*;

    struct RecordingProbe {
        answer: bool,
        seen: RefCell<Vec<String>>,
    }

    impl LivenessProbe for RecordingProbe {
        fn is_live(&self, url: &str) -> Result<bool, StoreError> {
            self.seen.borrow_mut().push(url.to_string());
            Ok(self.answer)
        }
    }

    fn record(remote_path: &str) -> ShareRecord {
        ShareRecord::new(
            Fingerprint::from("abc123"),
            "cat.gif",
            "/",
            10,
            "id1",
            remote_path,
        )
    }

    #[test]
    fn check_probes_reconstructed_url() {
        let probe = RecordingProbe {
            answer: true,
            seen: RefCell::new(Vec::new()),
        };
        assert!(check(&record("/s/xyz"), &probe).unwrap());
        assert_eq!(
            probe.seen.borrow().as_slice(),
            ["https://dl.dropboxusercontent.com/s/xyz/cat.gif".to_string()]
        );
    }

    #[test]
    fn check_reports_dead_links() {
        let probe = RecordingProbe {
            answer: false,
            seen: RefCell::new(Vec::new()),
        };
        assert!(!check(&record("/s/xyz"), &probe).unwrap());
    }

    #[test]
    fn empty_remote_path_is_a_hard_error() {
        let probe = RecordingProbe {
            answer: true,
            seen: RefCell::new(Vec::new()),
        };
        let err = check(&record(""), &probe).unwrap_err();
        assert!(matches!(err, StoreError::EmptyUrl { .. }), "got: {err}");
        assert!(probe.seen.borrow().is_empty());
    }

    #[test]
    fn http_probe_rejects_malformed_url() {
        let err = HttpProbe::new().is_live("not a url").unwrap_err();
        assert!(matches!(err, StoreError::InvalidUrl { .. }), "got: {err}");
    }
}
