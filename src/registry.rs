// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Au-Zone Technologies. All Rights Reserved.

//! Process-wide callback registry.
//!
//! The vendor runtime can only carry a pointer-sized integer context back
//! through its callback ABI, never a typed reference.  This registry is the
//! translation point: sessions register themselves and hand the returned
//! integer id to the runtime; the event bridge turns the id back into a live
//! target with [`Registry::lookup`].  Raw pointers to managed objects are
//! never round-tripped through native code.
//!
//! All process-wide mutable state of the crate is deliberately concentrated
//! in the single [`sessions`] instance, with process lifetime.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, OnceLock};

use crate::session::SessionShared;

/// Synchronized `id -> target` table with ids from an atomic counter.
///
/// Ids are monotonically increasing and never reused while the process runs.
/// The counter is 32 bits wide to fit the pointer-sized context on every
/// platform; it wraps after ~4 billion registrations per process, at which
/// point id reuse becomes possible.  The vendor ABI shares this limitation.
pub struct Registry<T> {
    entries: Mutex<HashMap<u32, T>>,
    next: AtomicU32,
}

impl<T> Default for Registry<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Registry<T> {
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            next: AtomicU32::new(1),
        }
    }

    // A poisoned map only means another thread panicked mid-insert/remove;
    // the map itself is still consistent, so recover instead of propagating
    // the panic into the native callback path.
    fn entries(&self) -> MutexGuard<'_, HashMap<u32, T>> {
        match self.entries.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    /// Store `target` under a fresh id and return the id.
    pub fn register(&self, target: T) -> u32 {
        let id = self.next.fetch_add(1, Ordering::Relaxed);
        self.entries().insert(id, target);
        id
    }

    /// Remove the entry; a no-op if `id` was never registered or already
    /// removed.
    pub fn unregister(&self, id: u32) {
        self.entries().remove(&id);
    }

    /// Number of live entries.
    pub fn len(&self) -> usize {
        self.entries().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<T: Clone> Registry<T> {
    /// Resolve an id back to its target, or `None` if the id is absent
    /// (never registered, or already unregistered).
    pub fn lookup(&self, id: u32) -> Option<T> {
        self.entries().get(&id).cloned()
    }
}

/// The session table shared between [`crate::session::Camera`] and the event
/// bridge.
pub(crate) fn sessions() -> &'static Registry<Arc<SessionShared>> {
    static SESSIONS: OnceLock<Registry<Arc<SessionShared>>> = OnceLock::new();
    SESSIONS.get_or_init(Registry::new)
}

/// Number of sessions currently registered in the process-wide table.
pub fn active_sessions() -> usize {
    sessions().len()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn lookup_after_unregister_is_none() {
        let registry = Registry::new();
        let id = registry.register("target");
        assert_eq!(registry.lookup(id), Some("target"));

        registry.unregister(id);
        assert_eq!(registry.lookup(id), None);

        // idempotent
        registry.unregister(id);
        assert_eq!(registry.lookup(id), None);
        assert!(registry.is_empty());
    }

    #[test]
    fn never_registered_id_is_none() {
        let registry: Registry<u8> = Registry::new();
        assert_eq!(registry.lookup(42), None);
    }

    #[test]
    fn concurrent_registrations_yield_distinct_ids() {
        const THREADS: usize = 8;
        const PER_THREAD: usize = 1000;

        let registry = Arc::new(Registry::new());
        let handles: Vec<_> = (0..THREADS)
            .map(|t| {
                let registry = Arc::clone(&registry);
                thread::spawn(move || {
                    (0..PER_THREAD).map(|i| registry.register(t * PER_THREAD + i)).collect::<Vec<_>>()
                })
            })
            .collect();

        let mut ids = HashSet::new();
        for handle in handles {
            for id in handle.join().expect("worker panicked") {
                assert!(ids.insert(id), "id {id} handed out twice");
            }
        }

        assert_eq!(ids.len(), THREADS * PER_THREAD);
        assert_eq!(registry.len(), THREADS * PER_THREAD);
    }

    #[test]
    fn ids_are_monotonic() {
        let registry: Registry<()> = Registry::new();
        let a = registry.register(());
        let b = registry.register(());
        let c = registry.register(());
        assert!(a < b && b < c);
    }
}
