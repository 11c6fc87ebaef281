//! Per-key async mutual exclusion.
//!
//! Services serialize work on one owner (default switch, quota check) or one
//! domain (verification, SSL check) without blocking unrelated keys. Entries
//! are dropped from the map once the last holder or waiter releases them, so
//! the map only ever contains keys with work in flight.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

type LockMap = HashMap<String, Arc<AsyncMutex<()>>>;

/// A set of named async locks.
#[derive(Clone, Default)]
pub struct KeyedLocks {
    map: Arc<Mutex<LockMap>>,
}

impl KeyedLocks {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait for exclusive access to `key`.
    pub async fn lock(&self, key: &str) -> KeyedLockGuard {
        let mutex = {
            let mut map = lock_map(&self.map);
            Arc::clone(map.entry(key.to_string()).or_default())
        };
        let guard = mutex.lock_owned().await;
        KeyedLockGuard {
            key: key.to_string(),
            map: Arc::clone(&self.map),
            guard: Some(guard),
        }
    }

    /// Number of keys currently held or waited on.
    #[must_use]
    pub fn len(&self) -> usize {
        lock_map(&self.map).len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

// the map is never left half-updated, so a poisoned lock is still usable
fn lock_map(map: &Mutex<LockMap>) -> MutexGuard<'_, LockMap> {
    map.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Held access to one key; released on drop.
pub struct KeyedLockGuard {
    key: String,
    map: Arc<Mutex<LockMap>>,
    guard: Option<OwnedMutexGuard<()>>,
}

impl KeyedLockGuard {
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }
}

impl Drop for KeyedLockGuard {
    fn drop(&mut self) {
        // release first so the strong count reflects only the map and waiters
        self.guard.take();
        let mut map = lock_map(&self.map);
        if map
            .get(&self.key)
            .is_some_and(|entry| Arc::strong_count(entry) == 1)
        {
            map.remove(&self.key);
        }
    }
}
