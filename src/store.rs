use anyhow::Context;
use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use crate::fs::SlotStorage;
use crate::models::{NewTask, Task};

/// Default name of the persisted slot
pub const DEFAULT_STORAGE_KEY: &str = "studyTasks";

/// Result of a mutation addressed by id
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mutation {
    /// The collection changed and was persisted
    Applied,
    /// The task exists but was already in the requested state
    Unchanged,
    /// No task has this id
    NotFound,
}

/// Owns the authoritative task collection and mirrors it into one slot.
///
/// Every mutation writes the whole collection back before returning.
pub struct TaskStore<S: SlotStorage> {
    storage: S,
    key: String,
    tasks: Vec<Task>,
}

impl<S: SlotStorage> TaskStore<S> {
    /// Read the persisted collection; missing or corrupt data yields an empty store,
    /// a malformed record is skipped on its own
    #[tracing::instrument(skip(storage))]
    pub fn load(storage: S, key: &str) -> Self {
        let tasks = match storage.get(key) {
            Ok(Some(raw)) => match serde_json::from_str::<Vec<serde_json::Value>>(&raw) {
                Ok(records) => parse_records(key, records),
                Err(err) => {
                    warn!(key, error = %err, "persisted tasks are unparseable, starting empty");
                    Vec::new()
                }
            },
            Ok(None) => {
                debug!(key, "no persisted tasks yet");
                Vec::new()
            }
            Err(err) => {
                warn!(key, error = %err, "failed reading persisted tasks, starting empty");
                Vec::new()
            }
        };

        info!(key, count = tasks.len(), "loaded tasks");

        Self {
            storage,
            key: key.to_string(),
            tasks,
        }
    }

    pub fn all(&self) -> &[Task] {
        &self.tasks
    }

    pub fn get(&self, id: u64) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    #[cfg(test)]
    pub fn storage_mut(&mut self) -> &mut S {
        &mut self.storage
    }

    pub fn add(&mut self, new_task: NewTask) -> anyhow::Result<Task> {
        self.add_at(new_task, Utc::now())
    }

    /// Append a task created at `now`.
    ///
    /// The task is kept in memory even when the write fails; the error tells
    /// the caller that the slot is now behind.
    #[tracing::instrument(skip(self, new_task), fields(title = %new_task.title))]
    pub fn add_at(&mut self, new_task: NewTask, now: DateTime<Utc>) -> anyhow::Result<Task> {
        let id = self.next_id(now)?;
        let task = Task::new(id, new_task, now);
        self.tasks.push(task.clone());
        info!(id, due = %task.due_date, priority = %task.priority, "added task");

        self.persist()?;
        Ok(task)
    }

    #[tracing::instrument(skip(self))]
    pub fn complete(&mut self, id: u64) -> anyhow::Result<Mutation> {
        let Some(task) = self.tasks.iter_mut().find(|t| t.id == id) else {
            debug!(id, "complete: task not found");
            return Ok(Mutation::NotFound);
        };

        if task.completed {
            return Ok(Mutation::Unchanged);
        }

        task.completed = true;
        info!(id, "completed task");
        self.persist()?;
        Ok(Mutation::Applied)
    }

    #[tracing::instrument(skip(self))]
    pub fn delete(&mut self, id: u64) -> anyhow::Result<Mutation> {
        let before = self.tasks.len();
        self.tasks.retain(|t| t.id != id);

        if self.tasks.len() == before {
            debug!(id, "delete: task not found");
            return Ok(Mutation::NotFound);
        }

        info!(id, remaining = self.tasks.len(), "deleted task");
        self.persist()?;
        Ok(Mutation::Applied)
    }

    /// Write the full collection into the slot
    pub fn persist(&mut self) -> anyhow::Result<()> {
        let json = serde_json::to_string(&self.tasks)?;
        self.storage
            .set(&self.key, &json)
            .with_context(|| format!("failed to save tasks to slot '{}'", self.key))?;
        debug!(key = %self.key, count = self.tasks.len(), "persisted tasks");
        Ok(())
    }

    /// Timestamp-derived id, bumped past the largest existing id
    fn next_id(&self, now: DateTime<Utc>) -> anyhow::Result<u64> {
        let millis = u64::try_from(now.timestamp_millis()).unwrap_or(0);
        let max_id = self.tasks.iter().map(|t| t.id).max().unwrap_or(0);
        match max_id.checked_add(1) {
            Some(next) => Ok(millis.max(next)),
            None => {
                // 最大 id 已到 u64::MAX：从当前时间起取第一个未占用的 id
                warn!(max_id, "task ids exhausted at the top, searching for a free one");
                (millis..=u64::MAX)
                    .find(|id| self.get(*id).is_none())
                    .context("no free task id left")
            }
        }
    }
}

/// 逐条解析记录；不符合格式的记录被丢弃，其余照常加载
fn parse_records(key: &str, records: Vec<serde_json::Value>) -> Vec<Task> {
    records
        .into_iter()
        .enumerate()
        .filter_map(|(index, record)| match serde_json::from_value::<Task>(record) {
            Ok(task) => Some(task),
            Err(err) => {
                warn!(key, index, error = %err, "dropping unparseable task record");
                None
            }
        })
        .collect()
}
