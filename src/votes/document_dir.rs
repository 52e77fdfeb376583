use std::{
    cell::Cell,
    fs::{self, File, OpenOptions},
    io::ErrorKind,
    path::{Path, PathBuf},
    sync::atomic::{AtomicU64, Ordering},
};

use tracing::{debug, warn};

use crate::{
    foundation::error::{TricolorError, TricolorResult},
    votes::store::{
        CounterStore, CountsCallback, Subscribers, Subscription, VOTES_COLLECTION, VoteCounts,
        VoteRecord, now_unix_ms, validate_counter_key,
    },
};

/// Name of the lock file inside the collection directory.
const LOCK_FILE: &str = ".lock";

static TMP_SEQ: AtomicU64 = AtomicU64::new(0);

/// Document store kept as one JSON file per record under
/// `<root>/freedom_fighter_votes/<id>.json`.
///
/// This is the "remote" store the CLI talks to. Each write replaces the record through a
/// temporary file and a rename, so readers never observe a half-written document. Increments
/// hold an exclusive lock on `<collection>/.lock` from read to rename, so several processes can
/// vote at once without losing counts. Every IO or decoding failure surfaces as
/// [`TricolorError::StoreUnavailable`].
pub struct DocumentDirStore {
    dir: PathBuf,
    online: Cell<bool>,
    subscribers: Subscribers,
}

impl DocumentDirStore {
    /// Open (creating if needed) the collection directory below `root`.
    pub fn open(root: impl AsRef<Path>) -> TricolorResult<Self> {
        let dir = root.as_ref().join(VOTES_COLLECTION);
        fs::create_dir_all(&dir).map_err(|e| {
            TricolorError::store_unavailable(format!(
                "create collection dir '{}': {e}",
                dir.display()
            ))
        })?;
        Ok(Self {
            dir,
            online: Cell::new(true),
            subscribers: Subscribers::new(),
        })
    }

    /// Treat the store as unreachable without touching the files.
    pub fn set_online(&self, online: bool) {
        self.online.set(online);
    }

    pub fn collection_dir(&self) -> &Path {
        &self.dir
    }

    fn ensure_online(&self) -> TricolorResult<()> {
        if !self.online.get() {
            return Err(TricolorError::store_unavailable("document store is offline"));
        }
        if !self.dir.is_dir() {
            return Err(TricolorError::store_unavailable(format!(
                "collection dir '{}' is missing",
                self.dir.display()
            )));
        }
        Ok(())
    }

    fn record_path(&self, id: &str) -> PathBuf {
        self.dir.join(format!("{id}.json"))
    }

    fn read_record(&self, id: &str) -> TricolorResult<Option<VoteRecord>> {
        let path = self.record_path(id);
        let text = match fs::read_to_string(&path) {
            Ok(t) => t,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(TricolorError::store_unavailable(format!(
                    "read '{}': {e}",
                    path.display()
                )));
            }
        };
        let rec = serde_json::from_str::<VoteRecord>(&text).map_err(|e| {
            TricolorError::store_unavailable(format!("corrupt record '{}': {e}", path.display()))
        })?;
        Ok(Some(rec))
    }

    fn write_record(&self, rec: &VoteRecord) -> TricolorResult<()> {
        let path = self.record_path(&rec.fighter_id);
        let tmp = self.dir.join(format!(
            ".{}.{}.{}.tmp",
            rec.fighter_id,
            std::process::id(),
            TMP_SEQ.fetch_add(1, Ordering::Relaxed)
        ));
        let bytes = serde_json::to_vec_pretty(rec)?;
        fs::write(&tmp, bytes)
            .and_then(|()| fs::rename(&tmp, &path))
            .map_err(|e| {
                let _ = fs::remove_file(&tmp);
                TricolorError::store_unavailable(format!("write '{}': {e}", path.display()))
            })
    }

    /// Exclusive lock over the collection; released when the returned file is dropped.
    fn lock(&self) -> TricolorResult<File> {
        let path = self.dir.join(LOCK_FILE);
        let file = OpenOptions::new()
            .create(true)
            .truncate(false)
            .write(true)
            .open(&path)
            .map_err(|e| {
                TricolorError::store_unavailable(format!("open '{}': {e}", path.display()))
            })?;
        file.lock().map_err(|e| {
            TricolorError::store_unavailable(format!("lock '{}': {e}", path.display()))
        })?;
        Ok(file)
    }

    fn counts(&self) -> TricolorResult<VoteCounts> {
        let rd = fs::read_dir(&self.dir).map_err(|e| {
            TricolorError::store_unavailable(format!("list '{}': {e}", self.dir.display()))
        })?;

        let mut out = VoteCounts::new();
        for entry in rd.flatten() {
            let path = entry.path();
            let Some(name) = path.file_name().and_then(|s| s.to_str()) else {
                continue;
            };
            if name.starts_with('.') {
                continue;
            }
            let Some(id) = name.strip_suffix(".json") else {
                continue;
            };
            if let Some(rec) = self.read_record(id)? {
                out.insert(rec.fighter_id, rec.count);
            }
        }
        Ok(out)
    }

    fn add(&self, id: &str, delta: u64) -> TricolorResult<()> {
        let rec = {
            let _lock = self.lock()?;
            let mut rec = self.read_record(id)?.unwrap_or_else(|| VoteRecord {
                fighter_id: id.to_string(),
                count: 0,
                last_updated: 0,
            });
            rec.count = rec.count.saturating_add(delta);
            rec.last_updated = now_unix_ms();
            self.write_record(&rec)?;
            rec
        };
        debug!(id, count = rec.count, "vote document written");

        // The write is committed; a failed rescan must not be reported as a failed vote.
        if self.subscribers.len() > 0 {
            match self.counts() {
                Ok(counts) => self.subscribers.notify(counts),
                Err(e) => warn!(error = %e, "could not rescan collection; skipping notification"),
            }
        }
        Ok(())
    }
}

impl CounterStore for DocumentDirStore {
    fn get(&self, id: &str) -> TricolorResult<Option<u64>> {
        validate_counter_key(id)?;
        self.ensure_online()?;
        Ok(self.read_record(id)?.map(|r| r.count))
    }

    fn increment(&self, id: &str) -> TricolorResult<()> {
        validate_counter_key(id)?;
        self.ensure_online()?;
        self.add(id, 1)
    }

    fn merge_add(&self, id: &str, delta: u64) -> TricolorResult<()> {
        validate_counter_key(id)?;
        self.ensure_online()?;
        if delta == 0 {
            return Ok(());
        }
        self.add(id, delta)
    }

    fn snapshot(&self) -> TricolorResult<VoteCounts> {
        self.ensure_online()?;
        self.counts()
    }

    fn subscribe_all(&self, callback: CountsCallback) -> TricolorResult<Subscription> {
        self.ensure_online()?;
        let current = self.counts()?;
        Ok(self.subscribers.insert(callback, &current))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/votes/document_dir.rs"]
mod tests;
