//! JSON slot repository: the whole task list lives in one named file.

use super::records::{self, StoredBlob};
use crate::task::{
    domain::{NewTask, Task, TaskId},
    ports::{TaskRepository, TaskRepositoryError, TaskRepositoryResult},
};
use async_trait::async_trait;
use camino::Utf8Path;
use cap_std::ambient_authority;
use cap_std::fs_utf8::Dir;
use std::collections::BTreeMap;
use std::io;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::debug;

/// Slot name used by the original browser client.
pub const DEFAULT_SLOT: &str = "smarttodo-tasks.json";

/// Task repository persisting the full list as a JSON blob.
///
/// The slot is read once when the repository is opened. Every mutation
/// rewrites the slot in full on the blocking pool; the in-memory copy only
/// changes after the write succeeds.
#[derive(Debug, Clone)]
pub struct JsonFileTaskRepository {
    state: Arc<Mutex<JsonSlotState>>,
}

#[derive(Debug)]
struct JsonSlotState {
    dir: Dir,
    slot: String,
    tasks: BTreeMap<TaskId, Task>,
    last_id: u64,
}

impl JsonFileTaskRepository {
    /// Opens the slot inside an already opened directory.
    ///
    /// A missing or blank slot yields an empty repository.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::Persistence`] when the slot cannot be
    /// read or does not contain a valid task blob.
    pub fn open(dir: Dir, slot: impl Into<String>) -> TaskRepositoryResult<Self> {
        let slot = slot.into();
        let decoded = match dir.read_to_string(&slot) {
            Ok(contents) if contents.trim().is_empty() => records::DecodedSlot::default(),
            Ok(contents) => serde_json::from_str::<StoredBlob>(&contents)
                .map_err(TaskRepositoryError::persistence)?
                .decode()
                .map_err(TaskRepositoryError::persistence)?,
            Err(err) if err.kind() == io::ErrorKind::NotFound => records::DecodedSlot::default(),
            Err(err) => return Err(TaskRepositoryError::persistence(err)),
        };

        debug!(
            slot = %slot,
            tasks = decoded.tasks.len(),
            last_id = decoded.last_id,
            "loaded task slot"
        );

        Ok(Self {
            state: Arc::new(Mutex::new(JsonSlotState {
                dir,
                slot,
                tasks: decoded.tasks,
                last_id: decoded.last_id,
            })),
        })
    }

    /// Opens the slot inside `path`, creating the directory when needed.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::Persistence`] when the directory cannot
    /// be created or opened, or when [`Self::open`] fails.
    pub fn open_ambient(path: &Utf8Path, slot: impl Into<String>) -> TaskRepositoryResult<Self> {
        Dir::create_ambient_dir_all(path, ambient_authority())
            .map_err(TaskRepositoryError::persistence)?;
        let dir = Dir::open_ambient_dir(path, ambient_authority())
            .map_err(TaskRepositoryError::persistence)?;
        Self::open(dir, slot)
    }

    fn lock(&self) -> TaskRepositoryResult<MutexGuard<'_, JsonSlotState>> {
        self.state.lock().map_err(poisoned)
    }

    /// Runs a mutation on the blocking pool while holding the slot lock.
    async fn run_blocking<F, T>(&self, f: F) -> TaskRepositoryResult<T>
    where
        F: FnOnce(&mut JsonSlotState) -> TaskRepositoryResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let state = Arc::clone(&self.state);
        tokio::task::spawn_blocking(move || {
            let mut guard = state.lock().map_err(poisoned)?;
            f(&mut guard)
        })
        .await
        .map_err(TaskRepositoryError::persistence)?
    }
}

fn poisoned(err: impl ToString) -> TaskRepositoryError {
    TaskRepositoryError::persistence(io::Error::other(err.to_string()))
}

impl JsonSlotState {
    /// Writes the candidate list and adopts it once the slot is updated.
    ///
    /// The staging file is removed when the write or the rename fails, and
    /// the adopted state is left unchanged.
    fn commit(&mut self, tasks: BTreeMap<TaskId, Task>, last_id: u64) -> TaskRepositoryResult<()> {
        let blob = records::encode(&tasks, last_id);
        let bytes = serde_json::to_vec_pretty(&blob).map_err(TaskRepositoryError::persistence)?;

        let staging = format!("{}.tmp", self.slot);
        let written = self
            .dir
            .write(&staging, bytes)
            .and_then(|()| self.dir.rename(&staging, &self.dir, &self.slot));
        if let Err(err) = written {
            let _removed = self.dir.remove_file(&staging);
            return Err(TaskRepositoryError::persistence(err));
        }

        self.tasks = tasks;
        self.last_id = last_id;
        Ok(())
    }
}

#[async_trait]
impl TaskRepository for JsonFileTaskRepository {
    async fn store(&self, draft: &NewTask) -> TaskRepositoryResult<Task> {
        let draft = draft.clone();
        self.run_blocking(move |state| {
            let next = state.last_id.saturating_add(1);
            let id = TaskId::new(next).map_err(TaskRepositoryError::persistence)?;

            let task = draft.into_task(id);
            let mut tasks = state.tasks.clone();
            tasks.insert(id, task.clone());
            state.commit(tasks, next)?;
            Ok(task)
        })
        .await
    }

    async fn update(&self, task: &Task) -> TaskRepositoryResult<()> {
        let task = task.clone();
        self.run_blocking(move |state| {
            if !state.tasks.contains_key(&task.id()) {
                return Err(TaskRepositoryError::NotFound(task.id()));
            }

            let mut tasks = state.tasks.clone();
            tasks.insert(task.id(), task);
            let last_id = state.last_id;
            state.commit(tasks, last_id)
        })
        .await
    }

    async fn find_by_id(&self, id: TaskId) -> TaskRepositoryResult<Option<Task>> {
        let state = self.lock()?;
        Ok(state.tasks.get(&id).cloned())
    }

    async fn list(&self) -> TaskRepositoryResult<Vec<Task>> {
        let state = self.lock()?;
        Ok(state.tasks.values().cloned().collect())
    }

    async fn delete(&self, id: TaskId) -> TaskRepositoryResult<()> {
        self.run_blocking(move |state| {
            let mut tasks = state.tasks.clone();
            if tasks.remove(&id).is_none() {
                return Err(TaskRepositoryError::NotFound(id));
            }

            let last_id = state.last_id;
            state.commit(tasks, last_id)
        })
        .await
    }

    async fn clear(&self) -> TaskRepositoryResult<usize> {
        self.run_blocking(|state| {
            let removed = state.tasks.len();
            let last_id = state.last_id;
            state.commit(BTreeMap::new(), last_id)?;
            Ok(removed)
        })
        .await
    }
}
