use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use jobwatch_core::KnownJobsState;
use jobwatch_logging::{watch_debug, watch_info};
use serde::Serialize;
use thiserror::Error;

use crate::persist::{AtomicFileWriter, PersistError};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to read known jobs {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("known jobs record {path:?} is malformed: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to serialize known jobs: {0}")]
    Serialize(#[source] serde_json::Error),
    #[error("failed to write known jobs: {0}")]
    Persist(#[from] PersistError),
}

/// Persistence for the known-jobs record.
///
/// `load` returns an empty state when no record exists yet; `save` replaces
/// the whole record.
pub trait StateStore {
    fn load(&self) -> Result<KnownJobsState, StoreError>;
    fn save(&self, state: &KnownJobsState) -> Result<(), StoreError>;
}

/// Known jobs stored as a pretty-printed JSON object on disk.
#[derive(Debug, Clone)]
pub struct JsonFileStateStore {
    writer: AtomicFileWriter,
}

impl JsonFileStateStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            writer: AtomicFileWriter::new(path),
        }
    }

    pub fn path(&self) -> &Path {
        self.writer.target()
    }
}

impl StateStore for JsonFileStateStore {
    fn load(&self) -> Result<KnownJobsState, StoreError> {
        let path = self.path();
        let content = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                watch_info!("No known jobs at {:?}; starting fresh", path);
                return Ok(KnownJobsState::new());
            }
            Err(source) => {
                return Err(StoreError::Read {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };

        let state: KnownJobsState =
            serde_json::from_str(&content).map_err(|source| StoreError::Parse {
                path: path.to_path_buf(),
                source,
            })?;

        watch_info!(
            "Loaded {} known jobs for {} companies from {:?}",
            state.link_count(),
            state.len(),
            path
        );
        Ok(state)
    }

    fn save(&self, state: &KnownJobsState) -> Result<(), StoreError> {
        let mut content = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
        let mut serializer = serde_json::Serializer::with_formatter(&mut content, formatter);
        state
            .serialize(&mut serializer)
            .map_err(StoreError::Serialize)?;
        content.push(b'\n');

        let path = self.writer.write(&content)?;
        watch_debug!("Saved {} known jobs to {:?}", state.link_count(), path);
        Ok(())
    }
}

/// In-memory store for tests and dry runs.
#[derive(Debug, Default)]
pub struct MemoryStateStore {
    state: Mutex<Option<KnownJobsState>>,
    saves: AtomicUsize,
}

impl MemoryStateStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_state(state: KnownJobsState) -> Self {
        Self {
            state: Mutex::new(Some(state)),
            saves: AtomicUsize::new(0),
        }
    }

    /// Last saved (or seeded) state, if any.
    pub fn snapshot(&self) -> Option<KnownJobsState> {
        self.lock().clone()
    }

    pub fn save_count(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }

    // The guarded value is replaced whole, so a panic elsewhere cannot leave it half-written.
    fn lock(&self) -> MutexGuard<'_, Option<KnownJobsState>> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl StateStore for MemoryStateStore {
    fn load(&self) -> Result<KnownJobsState, StoreError> {
        Ok(self.snapshot().unwrap_or_default())
    }

    fn save(&self, state: &KnownJobsState) -> Result<(), StoreError> {
        *self.lock() = Some(state.clone());
        self.saves.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::thread;

    use super::*;

    #[test]
    fn memory_store_keeps_working_after_a_panic_while_locked() {
        let store = Arc::new(MemoryStateStore::new());
        let poisoner = Arc::clone(&store);
        let _ = thread::spawn(move || {
            let _guard = poisoner.state.lock().unwrap();
            panic!("panic while holding the state lock");
        })
        .join();
        assert!(store.state.is_poisoned());

        let state: KnownJobsState = [("Acme", vec!["/job/1"])].into_iter().collect();
        store.save(&state).unwrap();

        assert_eq!(store.save_count(), 1);
        assert_eq!(store.snapshot(), Some(state.clone()));
        assert_eq!(store.load().unwrap(), state);
    }
}
