// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! In-memory task registry
//!
//! Single source of truth for task lifecycle state. Records are cloned
//! out under the read lock and mutated whole under the write lock, so a
//! concurrent reader observes either the pre- or post-mutation record,
//! never a torn (status, result) pair. The lock is held only for map
//! operations, never across awaits, so unrelated tasks do not serialize
//! on it.

use chrono::Utc;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::RwLock;
use std::time::Duration;
use tracing::{debug, warn};
use uuid::Uuid;

use super::types::{RegistryError, TaskKind, TaskPayload, TaskRecord, TaskStatus};

/// Registry of all tasks submitted during the life of the process
///
/// Terminal records are retained for `retention` after completion so
/// clients have time to poll the result, then pruned on the next insert.
/// If the map still exceeds `max_entries`, the oldest terminal records
/// are evicted; in-flight tasks are never evicted.
pub struct TaskRegistry {
    tasks: RwLock<HashMap<Uuid, TaskRecord>>,
    retention: Duration,
    max_entries: usize,
}

impl TaskRegistry {
    /// Create a new registry
    ///
    /// # Arguments
    /// * `retention_secs` - How long terminal records stay pollable
    /// * `max_entries` - Soft cap on retained records
    pub fn new(retention_secs: u64, max_entries: usize) -> Self {
        Self {
            tasks: RwLock::new(HashMap::new()),
            retention: Duration::from_secs(retention_secs),
            max_entries,
        }
    }

    /// Insert a new task in `scheduled` status
    ///
    /// Callers generate fresh random ids; a `Duplicate` means an id was
    /// reused.
    pub fn create(
        &self,
        id: Uuid,
        kind: TaskKind,
        payload: TaskPayload,
    ) -> Result<(), RegistryError> {
        let mut tasks = self.tasks.write().unwrap_or_else(|e| e.into_inner());

        Self::prune(&mut tasks, self.retention, self.max_entries);

        if tasks.contains_key(&id) {
            return Err(RegistryError::Duplicate(id));
        }

        tasks.insert(
            id,
            TaskRecord {
                id,
                kind,
                payload,
                status: TaskStatus::Scheduled,
                result: None,
                created_at: Utc::now(),
                finished_at: None,
            },
        );

        debug!("Task {} registered", id);
        Ok(())
    }

    /// Get a snapshot of a task
    pub fn get(&self, id: Uuid) -> Result<TaskRecord, RegistryError> {
        self.tasks
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .get(&id)
            .cloned()
            .ok_or(RegistryError::NotFound(id))
    }

    /// Transition a task from `scheduled` to `running`
    ///
    /// Called exactly once, by the execution unit that owns the task.
    pub fn mark_running(&self, id: Uuid) -> Result<(), RegistryError> {
        let mut tasks = self.tasks.write().unwrap_or_else(|e| e.into_inner());
        let record = tasks.get_mut(&id).ok_or(RegistryError::NotFound(id))?;

        if record.status != TaskStatus::Scheduled {
            warn!(
                "Refusing transition of task {} from {} to running",
                id, record.status
            );
            return Ok(());
        }

        record.status = TaskStatus::Running;
        Ok(())
    }

    /// Write a task's terminal status and result in one atomic update
    ///
    /// A second completion attempt is refused: terminal states are
    /// absorbing and the result field is written at most once.
    pub fn complete(
        &self,
        id: Uuid,
        status: TaskStatus,
        result: Value,
    ) -> Result<(), RegistryError> {
        debug_assert!(status.is_terminal());

        let mut tasks = self.tasks.write().unwrap_or_else(|e| e.into_inner());
        let record = tasks.get_mut(&id).ok_or(RegistryError::NotFound(id))?;

        if record.status.is_terminal() {
            warn!(
                "Refusing to overwrite terminal status {} of task {}",
                record.status, id
            );
            return Ok(());
        }

        record.status = status;
        record.result = Some(result);
        record.finished_at = Some(Utc::now());
        Ok(())
    }

    /// Number of retained records
    pub fn len(&self) -> usize {
        self.tasks.read().unwrap_or_else(|e| e.into_inner()).len()
    }

    /// Whether the registry is empty
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn prune(tasks: &mut HashMap<Uuid, TaskRecord>, retention: Duration, max_entries: usize) {
        let cutoff = Utc::now()
            - chrono::Duration::from_std(retention).unwrap_or(chrono::Duration::zero());

        tasks.retain(|_, record| match record.finished_at {
            Some(finished_at) => finished_at > cutoff,
            None => true,
        });

        while tasks.len() >= max_entries {
            let oldest_terminal = tasks
                .values()
                .filter(|r| r.status.is_terminal())
                .min_by_key(|r| r.finished_at)
                .map(|r| r.id);

            match oldest_terminal {
                Some(id) => {
                    tasks.remove(&id);
                }
                None => break, // only in-flight tasks left, nothing evictable
            }
        }
    }
}
