//! Per-root serialization of structural mutations.
//!
//! Rename, move, copy, delete and grant changes perform several record
//! writes with no cross-record transaction, so two of them must never
//! interleave on the same subtree. Every root path segment maps to one
//! async mutex; an operation locks every root it touches, in sorted
//! order, before its first read-for-write.

use std::collections::BTreeSet;
use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::{Mutex, OwnedMutexGuard};
use tracing::debug;
use uuid::Uuid;

use treehub_core::error::AppError;
use treehub_core::path;
use treehub_core::result::AppResult;
use treehub_database::Stores;

/// Attempts before giving up on a subtree whose root keeps changing.
const MAX_LOCK_ATTEMPTS: usize = 8;

type LockTable = DashMap<String, Arc<Mutex<()>>>;

/// The lock table. Shared by every service through an `Arc`.
///
/// An entry lives only while some guard holds or waits on it.
#[derive(Debug, Default)]
pub struct SubtreeLocks {
    locks: Arc<LockTable>,
}

/// Held locks. Dropping the guard releases them.
#[derive(Debug)]
pub struct SubtreeGuard {
    keys: BTreeSet<String>,
    guards: Vec<OwnedMutexGuard<()>>,
    table: Arc<LockTable>,
}

impl SubtreeGuard {
    /// Whether every key in `keys` is held.
    pub fn covers(&self, keys: &BTreeSet<String>) -> bool {
        keys.is_subset(&self.keys)
    }

    /// The held keys, sorted.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.keys.iter().map(String::as_str)
    }
}

impl Drop for SubtreeGuard {
    fn drop(&mut self) {
        self.guards.clear();
        // A waiter clones the mutex under the shard lock, so a count of
        // one means nobody else can still reach it.
        for key in &self.keys {
            self.table
                .remove_if(key, |_, mutex| Arc::strong_count(mutex) == 1);
        }
    }
}

impl SubtreeLocks {
    /// Create an empty lock table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Lock every key, in sorted order.
    pub async fn acquire(&self, keys: BTreeSet<String>) -> SubtreeGuard {
        let mut guard = SubtreeGuard {
            guards: Vec::with_capacity(keys.len()),
            keys,
            table: Arc::clone(&self.locks),
        };
        for key in guard.keys.clone() {
            let mutex = self
                .locks
                .entry(key)
                .or_insert_with(|| Arc::new(Mutex::new(())))
                .clone();
            guard.guards.push(mutex.lock_owned().await);
        }
        guard
    }

    /// Number of roots currently locked or awaited.
    pub fn active(&self) -> usize {
        self.locks.len()
    }

    /// Lock the roots of the given folders and files plus `extra` keys.
    ///
    /// Paths are read before locking, so a concurrent root rename can
    /// change the key set while we wait. The keys are re-read under the
    /// lock and the acquisition is repeated until they are stable.
    /// Unknown ids contribute no key; the caller reports them.
    pub async fn lock_nodes(
        &self,
        stores: &Stores,
        folders: &[Uuid],
        files: &[Uuid],
        extra: &[String],
    ) -> AppResult<SubtreeGuard> {
        let mut keys = resolve_keys(stores, folders, files, extra).await?;
        for attempt in 1..=MAX_LOCK_ATTEMPTS {
            let guard = self.acquire(keys).await;
            let current = resolve_keys(stores, folders, files, extra).await?;
            if guard.covers(&current) {
                return Ok(guard);
            }
            debug!(attempt, "Subtree roots changed while locking, retrying");
            drop(guard);
            keys = current;
        }
        Err(AppError::store_unavailable(
            "Subtree kept changing while acquiring locks",
        ))
    }
}

async fn resolve_keys(
    stores: &Stores,
    folders: &[Uuid],
    files: &[Uuid],
    extra: &[String],
) -> AppResult<BTreeSet<String>> {
    let mut keys: BTreeSet<String> = extra.iter().cloned().collect();
    for folder in stores.folders.find_by_ids(folders).await? {
        if let Some(segment) = path::root_segment(&folder.path) {
            keys.insert(segment.to_string());
        }
    }
    for file in stores.files.find_by_ids(files).await? {
        if let Some(segment) = path::root_segment(&file.logical_path) {
            keys.insert(segment.to_string());
        }
    }
    Ok(keys)
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    fn keys(items: &[&str]) -> BTreeSet<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[tokio::test]
    async fn test_same_root_is_serialized() {
        let locks = Arc::new(SubtreeLocks::new());
        let guard = locks.acquire(keys(&["acme"])).await;

        let contender = {
            let locks = Arc::clone(&locks);
            tokio::spawn(async move { locks.acquire(keys(&["acme"])).await })
        };
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(!contender.is_finished());

        drop(guard);
        let second = contender.await.unwrap();
        assert!(second.covers(&keys(&["acme"])));
    }

    #[tokio::test]
    async fn test_disjoint_roots_do_not_block() {
        let locks = SubtreeLocks::new();
        let _a = locks.acquire(keys(&["acme"])).await;
        let b = tokio::time::timeout(
            Duration::from_millis(50),
            locks.acquire(keys(&["globex"])),
        )
        .await;
        assert!(b.is_ok());
    }

    #[tokio::test]
    async fn test_guard_reports_sorted_keys() {
        let locks = SubtreeLocks::new();
        let guard = locks.acquire(keys(&["zeta", "alpha", "mid"])).await;
        assert_eq!(guard.keys().collect::<Vec<_>>(), vec!["alpha", "mid", "zeta"]);
        assert!(!guard.covers(&keys(&["other"])));
    }

    #[tokio::test]
    async fn test_released_roots_leave_the_table() {
        let locks = Arc::new(SubtreeLocks::new());
        let first = locks.acquire(keys(&["acme", "globex"])).await;
        assert_eq!(locks.active(), 2);

        let waiter = {
            let locks = Arc::clone(&locks);
            tokio::spawn(async move { locks.acquire(keys(&["acme"])).await })
        };
        tokio::time::sleep(Duration::from_millis(20)).await;

        drop(first);
        // "acme" still has a waiter, "globex" is gone.
        let second = waiter.await.unwrap();
        assert_eq!(locks.active(), 1);

        drop(second);
        assert_eq!(locks.active(), 0);
    }
}
