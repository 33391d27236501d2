//! Registry of image tasks.
//!
//! Owns the ordered collection of [`ImageRecord`]s behind a single lock.
//! Callers only ever see cloned records; the backing collection is never
//! exposed, and every mutating operation takes the write half of the lock for
//! exactly one logical operation.

use tokio::sync::RwLock;

use recognition_common::{ImageRecord, InferenceOutcome, NewImage};

use crate::error::{Error, Result};

/// Outcome of a batch create: the accepted subset plus whether any entry was
/// skipped for lacking a URL. The API layer picks 201 vs 410 from the flag.
#[derive(Debug, Clone)]
pub struct BatchCreate {
    pub created: Vec<ImageRecord>,
    pub missing_url: bool,
}

/// Ordered collection of image records plus the monotonic id counter.
///
/// Ids are unique for the lifetime of the registry: the counter only moves
/// forward, so deleting a record never frees its id for reuse.
pub struct TaskRegistry {
    inner: RwLock<Inner>,
}

struct Inner {
    records: Vec<ImageRecord>,
    next_id: u64,
}

impl Inner {
    fn insert(
        &mut self,
        url: String,
        title: String,
        results: Option<InferenceOutcome>,
    ) -> ImageRecord {
        let record = ImageRecord {
            id: self.next_id,
            title,
            url,
            results,
            resize: false,
            size: String::new(),
        };
        self.next_id += 1;
        self.records.push(record.clone());
        record
    }
}

/// A URL is usable only if present and non-empty.
fn entry_url(entry: &NewImage) -> Option<&str> {
    entry.url.as_deref().filter(|url| !url.is_empty())
}

impl TaskRegistry {
    /// Create an empty registry; the first record gets id 1.
    pub fn new() -> Self {
        Self::with_records(Vec::new())
    }

    /// Create a registry seeded with existing records. The id counter starts
    /// above the highest seeded id.
    pub fn with_records(records: Vec<ImageRecord>) -> Self {
        let next_id = records.iter().map(|r| r.id).max().unwrap_or(0) + 1;
        Self {
            inner: RwLock::new(Inner { records, next_id }),
        }
    }

    /// Snapshot of all records in insertion order.
    pub async fn list(&self) -> Vec<ImageRecord> {
        self.inner.read().await.records.clone()
    }

    /// Look up a single record by id.
    pub async fn get(&self, id: u64) -> Result<ImageRecord> {
        self.inner
            .read()
            .await
            .records
            .iter()
            .find(|r| r.id == id)
            .cloned()
            .ok_or(Error::NotFound)
    }

    /// Create a single record. The entry must carry a non-empty URL.
    pub async fn create(&self, entry: NewImage) -> Result<ImageRecord> {
        let url = entry_url(&entry).ok_or(Error::MissingUrl)?.to_string();
        let title = entry.title.unwrap_or_default();

        let mut inner = self.inner.write().await;
        Ok(inner.insert(url, title, entry.results))
    }

    /// Create one record per entry that has a URL.
    ///
    /// Entries lacking a URL are skipped, never retried, and never abort the
    /// batch; the flag in the result reports whether any were skipped. The
    /// whole batch runs under one write lock so readers never observe it half
    /// applied.
    pub async fn create_batch(&self, entries: Vec<NewImage>) -> BatchCreate {
        let mut inner = self.inner.write().await;

        let mut created = Vec::new();
        let mut missing_url = false;
        for entry in entries {
            let Some(url) = entry_url(&entry).map(str::to_string) else {
                missing_url = true;
                continue;
            };
            let title = entry.title.unwrap_or_default();
            created.push(inner.insert(url, title, entry.results));
        }

        BatchCreate {
            created,
            missing_url,
        }
    }

    /// Remove a record. Its id stays retired forever.
    pub async fn delete(&self, id: u64) -> Result<()> {
        let mut inner = self.inner.write().await;
        let position = inner
            .records
            .iter()
            .position(|r| r.id == id)
            .ok_or(Error::NotFound)?;
        inner.records.remove(position);
        Ok(())
    }

    /// Attach a computed outcome to a record, overwriting any previous one.
    ///
    /// Fails `NotFound` if the record was deleted between scheduling and
    /// completion of inference; the outcome is dropped rather than
    /// resurrecting the record.
    pub async fn set_results(&self, id: u64, outcome: InferenceOutcome) -> Result<ImageRecord> {
        let mut inner = self.inner.write().await;
        let record = inner
            .records
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or(Error::NotFound)?;
        record.results = Some(outcome);
        Ok(record.clone())
    }

    /// Ids of records that have no computed outcome yet, in insertion order.
    pub async fn pending_ids(&self) -> Vec<u64> {
        self.inner
            .read()
            .await
            .records
            .iter()
            .filter(|r| r.is_pending())
            .map(|r| r.id)
            .collect()
    }
}

impl Default for TaskRegistry {
    fn default() -> Self {
        Self::new()
    }
}
