use crate::path;
use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, Mutex, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Hands out one lock per collection name, created the first time the name is seen.
///
/// The registry mutex is only held while looking up or inserting an entry, never
/// while the caller works on the collection, so unrelated collections do not
/// wait on each other. Entries are never evicted.
#[derive(Debug, Default)]
pub struct LockRegistry {
    locks: Mutex<HashMap<String, Arc<RwLock<()>>>>,
}

impl LockRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the lock for `collection`, creating and caching it if absent.
    ///
    /// Names are keyed by their normalized path, so `users`, `users/` and
    /// `./users` share one lock since they name the same directory.
    pub fn acquire(&self, collection: &str) -> Arc<RwLock<()>> {
        let key = path::normalize(Path::new(collection))
            .to_string_lossy()
            .into_owned();
        let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(locks.entry(key).or_default())
    }

    /// Number of collections a lock has been created for.
    pub fn len(&self) -> usize {
        self.locks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

// The locks guard `()`, so a panic while held leaves nothing inconsistent
// behind and poisoning can be ignored.

/// Take the lock exclusively, for writes and deletes.
pub fn exclusive(lock: &RwLock<()>) -> RwLockWriteGuard<'_, ()> {
    lock.write().unwrap_or_else(PoisonError::into_inner)
}

/// Take the lock in shared mode, for strict-consistency reads.
pub fn shared(lock: &RwLock<()>) -> RwLockReadGuard<'_, ()> {
    lock.read().unwrap_or_else(PoisonError::into_inner)
}
