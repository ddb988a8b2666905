//! Per-period reader/writer locks.
//!
//! Aggregation, edits, transitions and deletes take the period's write
//! lock. Reads and exports take its read lock, so they run concurrently
//! with each other but never against an in-flight write.

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::{OwnedRwLockReadGuard, OwnedRwLockWriteGuard, RwLock};

use crate::vat::PeriodKey;

/// In-process lock table keyed by period.
#[derive(Debug, Default)]
pub struct PeriodLocks {
    locks: DashMap<PeriodKey, Arc<RwLock<()>>>,
}

impl PeriodLocks {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Waits for exclusive access to `period`.
    pub async fn write(&self, period: &PeriodKey) -> OwnedRwLockWriteGuard<()> {
        self.lock_for(period).write_owned().await
    }

    /// Waits for shared access to `period`.
    pub async fn read(&self, period: &PeriodKey) -> OwnedRwLockReadGuard<()> {
        self.lock_for(period).read_owned().await
    }

    /// Drops the entry for `period` if nobody holds or awaits it.
    pub fn prune(&self, period: &PeriodKey) {
        self.locks
            .remove_if(period, |_, lock| Arc::strong_count(lock) == 1);
    }

    /// Number of periods with a lock entry.
    #[must_use]
    pub fn len(&self) -> usize {
        self.locks.len()
    }

    /// Returns true if no period has a lock entry.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.locks.is_empty()
    }

    fn lock_for(&self, period: &PeriodKey) -> Arc<RwLock<()>> {
        // The shard guard is released before awaiting.
        Arc::clone(self.locks.entry(*period).or_default().value())
    }
}
