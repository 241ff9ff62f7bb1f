//! Turn one dropped path into a live public link.
//!
//! Order of work for a line: clean, fingerprint, cache lookup (with a
//! liveness check on hits), remote lookup or creation on misses, persist.
//! The cache file is opened around each of those steps and closed again
//! before returning to the caller.

use std::path::{Component, Path, PathBuf};

use dgl_core::{input, ConfigProvider, Fingerprint, ShareRecord};
use dgl_remote::{LinkService, RemoteError, SharedLink};
use dgl_store::{CacheStore, Insertion, LivenessProbe};

use crate::error::ReconcileError;

/// Where the emitted link came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Cached record whose link still resolves.
    Cached,
    /// Existing shared link found on Dropbox.
    Found,
    /// Shared link created just now.
    Created,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reconciled {
    pub record: ShareRecord,
    pub outcome: Outcome,
}

/// Owns the cache handle, the link service and the probe, plus the record
/// most recently emitted.
pub struct Reconciler<L: LinkService, P: LivenessProbe> {
    store: CacheStore,
    links: L,
    probe: P,
    gifs_root: PathBuf,
    current: Option<ShareRecord>,
}

impl<L: LinkService, P: LivenessProbe> Reconciler<L, P> {
    /// `gifs_root` is the local gifs directory; record directories are relative to it.
    pub fn new(store: CacheStore, links: L, probe: P, gifs_root: impl Into<PathBuf>) -> Self {
        Self {
            store,
            links,
            probe,
            gifs_root: gifs_root.into(),
            current: None,
        }
    }

    /// Store at [`ConfigProvider::database_path`], records relative to [`ConfigProvider::full_path`].
    pub fn from_config(config: &impl ConfigProvider, links: L, probe: P) -> Self {
        Self::new(
            CacheStore::new(config.database_path()),
            links,
            probe,
            config.full_path(),
        )
    }

    pub fn current(&self) -> Option<&ShareRecord> {
        self.current.as_ref()
    }

    pub fn store(&self) -> &CacheStore {
        &self.store
    }

    pub fn count(&mut self) -> Result<u64, ReconcileError> {
        Ok(self.store.scoped(|store| store.count())?)
    }

    /// Remove the current record from the cache. It stays selected on failure.
    pub fn delete_current(&mut self) -> Result<ShareRecord, ReconcileError> {
        let mut record = self.current.take().ok_or(ReconcileError::NoCurrent)?;
        match self.store.scoped(|store| store.delete(&mut record)) {
            Ok(()) => {
                tracing::info!(fingerprint = %record.fingerprint, "record deleted");
                Ok(record)
            }
            Err(err) => {
                self.current = Some(record);
                Err(err.into())
            }
        }
    }

    // -----------------------------------------------------------------------
    // Reconciliation
    // -----------------------------------------------------------------------

    /// Resolve one raw input line to a shareable record.
    ///
    /// On success the record becomes current. On failure the previously
    /// current record is re-read from the cache; if it has since been
    /// deleted there is no current record, and if the cache cannot be read
    /// the in-memory copy is kept.
    pub fn reconcile(&mut self, raw: &str) -> Result<Reconciled, ReconcileError> {
        let previous = self.current.take();
        match self.resolve(raw) {
            Ok(done) => {
                tracing::info!(
                    fingerprint = %done.record.fingerprint,
                    outcome = ?done.outcome,
                    uses = done.record.use_count,
                    "reconciled"
                );
                self.current = Some(done.record.clone());
                Ok(done)
            }
            Err(err) => {
                self.current = self.restore(previous);
                Err(err)
            }
        }
    }

    fn resolve(&mut self, raw: &str) -> Result<Reconciled, ReconcileError> {
        let path = input::clean(raw)?;
        let fingerprint =
            dgl_store::fingerprint(&path).map_err(|source| ReconcileError::Fingerprint {
                path: path.clone(),
                source,
            })?;

        if let Some(mut cached) = self.lookup(&fingerprint)? {
            let live = self
                .store
                .check_remote_liveness(&cached, &self.probe)
                .map_err(|source| ReconcileError::Liveness {
                    fingerprint: fingerprint.clone(),
                    source,
                })?;
            if live {
                let record = self
                    .store
                    .scoped(|store| store.record_hit(&fingerprint))
                    .map_err(|source| ReconcileError::Persist {
                        fingerprint: fingerprint.clone(),
                        source,
                    })?;
                return Ok(Reconciled {
                    record,
                    outcome: Outcome::Cached,
                });
            }

            tracing::info!(%fingerprint, url = %cached.url(), "cached link is dead, evicting");
            self.store
                .scoped(|store| store.delete(&mut cached))
                .map_err(|source| ReconcileError::Evict {
                    fingerprint: fingerprint.clone(),
                    source,
                })?;
        }

        let (link, outcome) = self.resolve_remote(&path)?;
        let record = self.assemble(&path, fingerprint.clone(), &link)?;

        let insertion = self
            .store
            .scoped(|store| store.insert_new(record))
            .map_err(|source| ReconcileError::Persist {
                fingerprint: fingerprint.clone(),
                source,
            })?;
        let done = match insertion {
            Insertion::Created(record) => Reconciled { record, outcome },
            Insertion::Existing(record) => Reconciled {
                record,
                outcome: Outcome::Cached,
            },
        };
        Ok(done)
    }

    fn lookup(&mut self, fingerprint: &Fingerprint) -> Result<Option<ShareRecord>, ReconcileError> {
        match self.store.scoped(|store| store.get(fingerprint)) {
            Ok(record) => Ok(Some(record)),
            Err(err) if err.is_not_found() => Ok(None),
            Err(source) => Err(ReconcileError::Lookup {
                fingerprint: fingerprint.clone(),
                source,
            }),
        }
    }

    /// Existing link for the file, or a newly created one.
    fn resolve_remote(&self, path: &Path) -> Result<(SharedLink, Outcome), ReconcileError> {
        let remote_err = |source: RemoteError| ReconcileError::Remote {
            path: path.to_path_buf(),
            source,
        };

        let remote_path = self.links.remote_path_for(path).map_err(remote_err)?;
        match self.links.find_existing(&remote_path) {
            Ok(link) => Ok((link, Outcome::Found)),
            Err(err) if err.is_not_found() => {
                tracing::debug!(path = %remote_path, "no shared link yet, creating one");
                let link = self.links.create(&remote_path).map_err(remote_err)?;
                Ok((link, Outcome::Created))
            }
            Err(err) => Err(remote_err(err)),
        }
    }

    fn assemble(
        &self,
        path: &Path,
        fingerprint: Fingerprint,
        link: &SharedLink,
    ) -> Result<ShareRecord, ReconcileError> {
        let remote_err = |source: RemoteError| ReconcileError::Remote {
            path: path.to_path_buf(),
            source,
        };
        let remote_path = link.remote_path().map_err(remote_err)?;
        let query = link.public_query().map_err(remote_err)?;

        let base_name = if link.name.is_empty() {
            path.file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_default()
        } else {
            link.name.clone()
        };
        let file_size = link
            .size
            .or_else(|| std::fs::metadata(path).ok().map(|meta| meta.len()))
            .unwrap_or(0);

        Ok(ShareRecord::new(
            fingerprint,
            base_name,
            self.directory_of(path),
            file_size,
            link.id.clone(),
            remote_path,
        )
        .with_query(query))
    }

    /// Parent of `path` relative to the gifs root, `/`-separated with a leading `/`.
    fn directory_of(&self, path: &Path) -> String {
        let parent = path.parent().unwrap_or_else(|| Path::new(""));
        let relative = parent.strip_prefix(&self.gifs_root).unwrap_or(parent);
        let parts: Vec<String> = relative
            .components()
            .filter_map(|component| match component {
                Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
                _ => None,
            })
            .collect();
        format!("/{}", parts.join("/"))
    }

    fn restore(&mut self, previous: Option<ShareRecord>) -> Option<ShareRecord> {
        let previous = previous?;
        match self.store.scoped(|store| store.get(&previous.fingerprint)) {
            Ok(record) => Some(record),
            Err(err) if err.is_not_found() => None,
            Err(err) => {
                tracing::warn!(
                    fingerprint = %previous.fingerprint,
                    error = %err,
                    "could not re-read previous record, keeping in-memory copy"
                );
                Some(previous)
            }
        }
    }
}

impl<L: LinkService, P: LivenessProbe> std::fmt::Debug for Reconciler<L, P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Reconciler")
            .field("store", &self.store)
            .field("gifs_root", &self.gifs_root)
            .field("current", &self.current)
            .finish()
    }
}
