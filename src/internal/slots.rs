//! Instance slots and the per-owner instance table.
//!
//! A slot is the synchronization cell that guarantees at-most-one
//! construction per (owner, key, descriptor index). The table maps each key
//! to its slot array and keeps the completion-order log that drives
//! reverse-order teardown.

use std::collections::HashMap;
use std::sync::Mutex;

use once_cell::sync::OnceCell;

use crate::key::Key;
use crate::registration::AnyArc;

/// A concurrency-safe once-cell holding zero or one materialized instance.
///
/// Exactly one caller transitions the cell from empty to initialized; all
/// concurrent callers block inside `materialize` until the winner publishes
/// the value (the cell provides the release/acquire boundary). A factory
/// that panics leaves the cell empty, so waiters and later callers re-run
/// the factory.
pub(crate) struct InstanceSlot {
    cell: OnceCell<AnyArc>,
}

impl InstanceSlot {
    fn new() -> Self {
        Self {
            cell: OnceCell::new(),
        }
    }

    /// The published instance, if this slot already reached Ready.
    pub(crate) fn get(&self) -> Option<&AnyArc> {
        self.cell.get()
    }

    /// Returns the published instance, running `build` if this caller wins
    /// the claim race. The bool reports whether this caller was the winner.
    ///
    /// `build` runs with no table lock held; it may recursively resolve
    /// other services, including ones cached in the same table.
    pub(crate) fn materialize(&self, build: impl FnOnce() -> AnyArc) -> (AnyArc, bool) {
        let mut won = false;
        let value = self
            .cell
            .get_or_init(|| {
                won = true;
                build()
            })
            .clone();
        (value, won)
    }
}

/// Per-owner instance storage: the key-to-slot-array table plus the
/// completion-order log.
///
/// The root provider owns one table for singletons (and for scoped services
/// requested outside any scope); each scope owns its own table for scoped
/// services. The table mutex only guards the structural operation of
/// creating or fetching a key's slot array; individual slots synchronize
/// themselves. The log has its own lock so that a winner appending a freshly
/// built instance never holds the table lock.
pub(crate) struct InstanceTable {
    slots: Mutex<HashMap<Key, std::sync::Arc<[InstanceSlot]>>>,
    completion_order: Mutex<Vec<AnyArc>>,
}

impl InstanceTable {
    pub(crate) fn new() -> Self {
        Self {
            slots: Mutex::new(HashMap::new()),
            completion_order: Mutex::new(Vec::new()),
        }
    }

    /// Fetches the slot array for a key, creating it sized to the key's
    /// descriptor list on first use. The lock is released before the caller
    /// touches any individual slot.
    pub(crate) fn slots_for(&self, key: &Key, len: usize) -> std::sync::Arc<[InstanceSlot]> {
        let mut map = self.slots.lock().unwrap();
        map.entry(key.clone())
            .or_insert_with(|| (0..len).map(|_| InstanceSlot::new()).collect())
            .clone()
    }

    /// Appends an instance that just reached Ready to the completion log.
    pub(crate) fn record_completion(&self, instance: AnyArc) {
        self.completion_order.lock().unwrap().push(instance);
    }

    #[cfg(test)]
    pub(crate) fn completed_count(&self) -> usize {
        self.completion_order.lock().unwrap().len()
    }
}

impl Drop for InstanceTable {
    fn drop(&mut self) {
        // Drop the slot references first so the log holds the deciding
        // reference to each instance, then pop back-to-front: instances
        // destruct in exact reverse completion order.
        self.slots.get_mut().unwrap().clear();
        let log = self.completion_order.get_mut().unwrap();
        while log.pop().is_some() {}
    }
}
