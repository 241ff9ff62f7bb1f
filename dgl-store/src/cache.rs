//! Fingerprint-keyed [`ShareRecord`]s in a single redb file.
//!
//! One table, `gifs`, maps the fingerprint string to the JSON-encoded record.
//! The handle is opened right before a discrete operation and closed right
//! after (see [`CacheStore::scoped`]) so the file lock is never held while
//! the session waits on input. redb serialises write transactions, and the
//! read-modify-write helpers ([`CacheStore::record_hit`],
//! [`CacheStore::insert_new`]) each run inside one write transaction.

use std::path::{Path, PathBuf};

use redb::{Database, ReadableTable, ReadableTableMetadata, TableDefinition};

use dgl_core::{Fingerprint, ShareRecord};

use crate::error::{db_err, io_err, StoreError};
use crate::liveness::{self, LivenessProbe};

/// fingerprint -> ShareRecord (JSON)
pub const GIFS_TABLE: TableDefinition<'static, &'static str, &'static [u8]> =
    TableDefinition::new("gifs");

/// Outcome of [`CacheStore::insert_new`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Insertion {
    /// No row existed; the record was written with `use_count = 1`.
    Created(ShareRecord),
    /// A row for the fingerprint already existed; its counter was bumped instead.
    Existing(ShareRecord),
}

/// Handle on the cache file. Holds no connection until [`CacheStore::open`].
pub struct CacheStore {
    path: PathBuf,
    db: Option<Database>,
}

impl std::fmt::Debug for CacheStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CacheStore")
            .field("path", &self.path)
            .field("connected", &self.db.is_some())
            .finish()
    }
}

impl CacheStore {
    /// Pure, no I/O.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            db: None,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn is_connected(&self) -> bool {
        self.db.is_some()
    }

    // -----------------------------------------------------------------------
    // Connection lifecycle
    // -----------------------------------------------------------------------

    /// Connect, creating parent directories, the file and the `gifs` table as needed.
    ///
    /// Calling it on an open store is a no-op.
    pub fn open(&mut self) -> Result<(), StoreError> {
        if self.db.is_some() {
            return Ok(());
        }
        if let Some(dir) = self.path.parent() {
            std::fs::create_dir_all(dir).map_err(|e| io_err(dir, e))?;
        }

        let db = Database::create(&self.path).map_err(db_err)?;
        let txn = db.begin_write().map_err(db_err)?;
        txn.open_table(GIFS_TABLE).map_err(db_err)?;
        txn.commit().map_err(db_err)?;

        tracing::debug!(path = %self.path.display(), "cache store opened");
        self.db = Some(db);
        Ok(())
    }

    /// Release the file. Safe to call when already closed.
    pub fn close(&mut self) {
        if self.db.take().is_some() {
            tracing::debug!(path = %self.path.display(), "cache store closed");
        }
    }

    /// Open (if needed), run `op`, and close again if this call did the opening.
    pub fn scoped<T>(
        &mut self,
        op: impl FnOnce(&CacheStore) -> Result<T, StoreError>,
    ) -> Result<T, StoreError> {
        let was_connected = self.is_connected();
        self.open()?;
        let result = op(self);
        if !was_connected {
            self.close();
        }
        result
    }

    fn db(&self) -> Result<&Database, StoreError> {
        self.db.as_ref().ok_or(StoreError::NotConnected)
    }

    // -----------------------------------------------------------------------
    // Record operations
    // -----------------------------------------------------------------------

    /// Look up a record by fingerprint. The returned record is marked persisted.
    pub fn get(&self, fingerprint: &Fingerprint) -> Result<ShareRecord, StoreError> {
        let txn = self.db()?.begin_read().map_err(db_err)?;
        let table = txn.open_table(GIFS_TABLE).map_err(db_err)?;
        let Some(value) = table.get(fingerprint.as_str()).map_err(db_err)? else {
            return Err(StoreError::NotFound {
                fingerprint: fingerprint.clone(),
            });
        };
        let mut record: ShareRecord = serde_json::from_slice(value.value())?;
        record.mark_persisted(true);
        Ok(record)
    }

    /// Write `record` under its fingerprint, replacing any existing row.
    ///
    /// A record that was never counted is stored with `use_count = 1`.
    pub fn put(&self, record: &mut ShareRecord) -> Result<(), StoreError> {
        if record.use_count == 0 {
            record.use_count = 1;
        }
        let encoded = serde_json::to_vec(&*record)?;

        let txn = self.db()?.begin_write().map_err(db_err)?;
        {
            let mut table = txn.open_table(GIFS_TABLE).map_err(db_err)?;
            table
                .insert(record.fingerprint.as_str(), encoded.as_slice())
                .map_err(db_err)?;
        }
        txn.commit().map_err(db_err)?;

        record.mark_persisted(true);
        tracing::debug!(fingerprint = %record.fingerprint, "cache record saved");
        Ok(())
    }

    /// Remove the row for `record`. Removing an absent key succeeds.
    pub fn delete(&self, record: &mut ShareRecord) -> Result<(), StoreError> {
        let txn = self.db()?.begin_write().map_err(db_err)?;
        {
            let mut table = txn.open_table(GIFS_TABLE).map_err(db_err)?;
            table
                .remove(record.fingerprint.as_str())
                .map_err(db_err)?;
        }
        txn.commit().map_err(db_err)?;

        record.mark_persisted(false);
        tracing::debug!(fingerprint = %record.fingerprint, "cache record deleted");
        Ok(())
    }

    /// Number of cached records.
    pub fn count(&self) -> Result<u64, StoreError> {
        let txn = self.db()?.begin_read().map_err(db_err)?;
        let table = txn.open_table(GIFS_TABLE).map_err(db_err)?;
        table.len().map_err(db_err)
    }

    /// Increment the counter of an existing record in one write transaction.
    pub fn record_hit(&self, fingerprint: &Fingerprint) -> Result<ShareRecord, StoreError> {
        let txn = self.db()?.begin_write().map_err(db_err)?;
        let mut record = {
            let mut table = txn.open_table(GIFS_TABLE).map_err(db_err)?;
            let existing = table
                .get(fingerprint.as_str())
                .map_err(db_err)?
                .map(|guard| guard.value().to_vec());
            let Some(bytes) = existing else {
                return Err(StoreError::NotFound {
                    fingerprint: fingerprint.clone(),
                });
            };
            let mut record: ShareRecord = serde_json::from_slice(&bytes)?;
            record.use_count = record.use_count.saturating_add(1).max(1);
            let encoded = serde_json::to_vec(&record)?;
            table
                .insert(fingerprint.as_str(), encoded.as_slice())
                .map_err(db_err)?;
            record
        };
        txn.commit().map_err(db_err)?;

        record.mark_persisted(true);
        tracing::debug!(fingerprint = %fingerprint, uses = record.use_count, "cache hit recorded");
        Ok(record)
    }

    /// Store a freshly resolved record, or count a hit if the key already exists.
    ///
    /// Both branches run inside a single write transaction, so two
    /// resolutions of the same fingerprint never lose an update.
    pub fn insert_new(&self, mut record: ShareRecord) -> Result<Insertion, StoreError> {
        let key = record.fingerprint.clone();
        let txn = self.db()?.begin_write().map_err(db_err)?;
        let outcome = {
            let mut table = txn.open_table(GIFS_TABLE).map_err(db_err)?;
            let existing = table
                .get(key.as_str())
                .map_err(db_err)?
                .map(|guard| guard.value().to_vec());
            match existing {
                Some(bytes) => {
                    let mut stored: ShareRecord = serde_json::from_slice(&bytes)?;
                    stored.use_count = stored.use_count.saturating_add(1).max(1);
                    let encoded = serde_json::to_vec(&stored)?;
                    table
                        .insert(key.as_str(), encoded.as_slice())
                        .map_err(db_err)?;
                    Insertion::Existing(stored)
                }
                None => {
                    record.use_count = 1;
                    let encoded = serde_json::to_vec(&record)?;
                    table
                        .insert(key.as_str(), encoded.as_slice())
                        .map_err(db_err)?;
                    Insertion::Created(record)
                }
            }
        };
        txn.commit().map_err(db_err)?;

        let outcome = match outcome {
            Insertion::Created(mut r) => {
                r.mark_persisted(true);
                Insertion::Created(r)
            }
            Insertion::Existing(mut r) => {
                tracing::info!(fingerprint = %key, "record already cached; counted as a hit");
                r.mark_persisted(true);
                Insertion::Existing(r)
            }
        };
        Ok(outcome)
    }

    /// Whether the record's public URL still answers with a 2xx.
    ///
    /// Needs no connection; the probe performs the request.
    pub fn check_remote_liveness(
        &self,
        record: &ShareRecord,
        probe: &dyn LivenessProbe,
    ) -> Result<bool, StoreError> {
        liveness::check(record, probe)
    }
}
