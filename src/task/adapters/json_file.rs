//! Snapshot store persisting the task collection as a JSON document.
//!
//! File access goes through a directory capability and runs on the blocking
//! thread pool so the async executor is never stalled by disk I/O.

use crate::task::{
    domain::Task,
    ports::{SnapshotStoreError, SnapshotStoreResult, TaskSnapshotStore},
};
use async_trait::async_trait;
use camino::{Utf8Path, Utf8PathBuf};
use cap_std::{ambient_authority, fs_utf8::Dir};
use std::{io, sync::Arc};
use tracing::{debug, warn};

/// Default document name inside the storage directory.
pub const DEFAULT_TASKS_FILE: &str = "tasks.json";

/// JSON document store scoped to a single directory capability.
///
/// A missing document loads as an empty collection. Saves write a sibling
/// temporary file and rename it over the document.
#[derive(Debug)]
pub struct JsonFileSnapshotStore {
    dir: Arc<Dir>,
    file_name: Utf8PathBuf,
}

impl JsonFileSnapshotStore {
    /// Creates a store for `file_name` inside `dir`.
    #[must_use]
    pub fn new(dir: Dir, file_name: impl Into<Utf8PathBuf>) -> Self {
        Self {
            dir: Arc::new(dir),
            file_name: file_name.into(),
        }
    }

    /// Opens `path` with ambient authority and stores [`DEFAULT_TASKS_FILE`]
    /// inside it.
    ///
    /// # Errors
    ///
    /// Returns the I/O error when the directory cannot be opened.
    pub fn open_ambient(path: &Utf8Path) -> io::Result<Self> {
        let dir = Dir::open_ambient_dir(path, ambient_authority())?;
        Ok(Self::new(dir, DEFAULT_TASKS_FILE))
    }

    fn temp_name(&self) -> Utf8PathBuf {
        let mut name = self.file_name.clone().into_string();
        name.push_str(".tmp");
        Utf8PathBuf::from(name)
    }
}

/// Runs a blocking file operation on the blocking thread pool.
async fn run_blocking<F, T>(f: F) -> SnapshotStoreResult<T>
where
    F: FnOnce() -> SnapshotStoreResult<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(SnapshotStoreError::storage)?
}

#[async_trait]
impl TaskSnapshotStore for JsonFileSnapshotStore {
    async fn load_all(&self) -> SnapshotStoreResult<Vec<Task>> {
        let dir = Arc::clone(&self.dir);
        let file_name = self.file_name.clone();
        let contents = run_blocking(move || match dir.read_to_string(&file_name) {
            Ok(contents) => Ok(Some(contents)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(SnapshotStoreError::storage(err)),
        })
        .await?;

        let Some(document) = contents else {
            debug!(file = %self.file_name, "task document missing, starting empty");
            return Ok(Vec::new());
        };
        let tasks: Vec<Task> = serde_json::from_str(&document).inspect_err(|err| {
            warn!(file = %self.file_name, error = %err, "task document is unreadable");
        })?;
        debug!(file = %self.file_name, task_count = tasks.len(), "read task document");
        Ok(tasks)
    }

    async fn save_all(&self, tasks: &[Task]) -> SnapshotStoreResult<()> {
        let document = serde_json::to_string_pretty(tasks)?;
        let dir = Arc::clone(&self.dir);
        let file_name = self.file_name.clone();
        let temp_name = self.temp_name();
        run_blocking(move || {
            dir.write(&temp_name, document)
                .map_err(SnapshotStoreError::storage)?;
            dir.rename(&temp_name, &dir, &file_name)
                .map_err(SnapshotStoreError::storage)
        })
        .await?;
        debug!(file = %self.file_name, task_count = tasks.len(), "wrote task document");
        Ok(())
    }
}
