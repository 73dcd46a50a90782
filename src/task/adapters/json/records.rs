//! Serialized blob layout for the JSON slot adapter.

use crate::task::domain::{
    PersistedTaskData, Task, TaskDescription, TaskDomainError, TaskId,
};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

/// Current blob format version.
pub(super) const BLOB_VERSION: u32 = 1;

/// On-disk representation of one task.
///
/// Field names follow the records written by the original browser client so
/// existing slots stay readable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub(super) struct TaskRecord {
    pub id: u64,
    pub task: String,
    #[serde(default)]
    pub completed: bool,
    #[serde(default)]
    pub due_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
}

impl From<&Task> for TaskRecord {
    fn from(task: &Task) -> Self {
        Self {
            id: task.id().value(),
            task: task.description().as_str().to_owned(),
            completed: task.is_completed(),
            due_date: task.due_date(),
            created_at: task.created_at(),
        }
    }
}

/// Versioned envelope written by this adapter.
#[derive(Debug, Serialize, Deserialize)]
pub(super) struct VersionedBlob {
    pub version: u32,
    pub next_id: u64,
    pub tasks: Vec<TaskRecord>,
}

/// Every layout accepted when reading a slot.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(super) enum StoredBlob {
    Versioned(VersionedBlob),
    /// Bare array of records, as written by the original browser client.
    Legacy(Vec<TaskRecord>),
}

/// Reasons a slot's contents cannot be turned into tasks.
#[derive(Debug, Error)]
pub(super) enum BlobError {
    #[error("unsupported task blob version {0}")]
    UnsupportedVersion(u32),

    #[error("duplicate task identifier {0} in blob")]
    DuplicateId(TaskId),

    #[error("invalid task record {id}: {source}")]
    InvalidRecord { id: u64, source: TaskDomainError },

    #[error("next identifier {next_id} is not above stored identifier {max_id}")]
    StaleCounter { next_id: u64, max_id: u64 },
}

/// Tasks decoded from a slot, plus the last identifier handed out.
#[derive(Debug, Default)]
pub(super) struct DecodedSlot {
    pub tasks: BTreeMap<TaskId, Task>,
    pub last_id: u64,
}

impl StoredBlob {
    pub(super) fn decode(self) -> Result<DecodedSlot, BlobError> {
        let (records, next_id) = match self {
            Self::Versioned(blob) => {
                if blob.version != BLOB_VERSION {
                    return Err(BlobError::UnsupportedVersion(blob.version));
                }
                (blob.tasks, Some(blob.next_id))
            }
            Self::Legacy(records) => (records, None),
        };

        let mut tasks = BTreeMap::new();
        for record in records {
            let task = record_to_task(record)?;
            let id = task.id();
            if tasks.insert(id, task).is_some() {
                return Err(BlobError::DuplicateId(id));
            }
        }

        let max_id = tasks.keys().next_back().map_or(0, |id| id.value());
        let last_id = match next_id {
            Some(next) if next <= max_id => {
                return Err(BlobError::StaleCounter {
                    next_id: next,
                    max_id,
                });
            }
            Some(next) => next.saturating_sub(1),
            None => max_id,
        };

        Ok(DecodedSlot { tasks, last_id })
    }
}

pub(super) fn encode(tasks: &BTreeMap<TaskId, Task>, last_id: u64) -> VersionedBlob {
    VersionedBlob {
        version: BLOB_VERSION,
        next_id: last_id.saturating_add(1),
        tasks: tasks.values().map(TaskRecord::from).collect(),
    }
}

fn record_to_task(record: TaskRecord) -> Result<Task, BlobError> {
    let TaskRecord {
        id: raw_id,
        task: raw_description,
        completed,
        due_date,
        created_at,
    } = record;

    let invalid = |source| BlobError::InvalidRecord { id: raw_id, source };
    let id = TaskId::new(raw_id).map_err(invalid)?;
    // Length limits apply at creation only.
    let description = TaskDescription::new(raw_description, usize::MAX).map_err(invalid)?;

    Ok(Task::from_persisted(PersistedTaskData {
        id,
        description,
        completed,
        due_date,
        created_at,
    }))
}
