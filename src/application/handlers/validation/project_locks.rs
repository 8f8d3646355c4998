//! Per-project async locks for single-flight validation work.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::sync::OwnedMutexGuard;

use crate::domain::foundation::ProjectId;

/// Serialises ledger work per project inside one process.
///
/// Entries are dropped again once nobody holds or waits for them.
#[derive(Debug, Default)]
pub struct ProjectLocks {
    locks: Mutex<HashMap<ProjectId, Arc<tokio::sync::Mutex<()>>>>,
}

/// Held while a project's ledger is being changed.
pub struct ProjectLockGuard<'a> {
    owner: &'a ProjectLocks,
    project_id: ProjectId,
    guard: Option<OwnedMutexGuard<()>>,
}

impl ProjectLocks {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn acquire(&self, project_id: ProjectId) -> ProjectLockGuard<'_> {
        let lock = {
            let mut locks = self.locks.lock().unwrap_or_else(|p| p.into_inner());
            locks.entry(project_id).or_default().clone()
        };
        ProjectLockGuard {
            owner: self,
            project_id,
            guard: Some(lock.lock_owned().await),
        }
    }

    fn release(&self, project_id: &ProjectId) {
        let mut locks = self.locks.lock().unwrap_or_else(|p| p.into_inner());
        if locks
            .get(project_id)
            .is_some_and(|lock| Arc::strong_count(lock) == 1)
        {
            locks.remove(project_id);
        }
    }

    #[cfg(test)]
    fn tracked(&self) -> usize {
        self.locks.lock().unwrap_or_else(|p| p.into_inner()).len()
    }
}

impl Drop for ProjectLockGuard<'_> {
    fn drop(&mut self) {
        // The owned guard keeps an Arc to the mutex; drop it first.
        self.guard.take();
        self.owner.release(&self.project_id);
    }
}
