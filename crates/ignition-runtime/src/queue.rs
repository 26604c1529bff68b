//! Ordered unique provider queue.
//!
//! An append-only, deduplicating, insertion-ordered sequence of provider
//! handles. Two instances back the orchestrator's lifecycle: one for pending
//! registers, one for pending boots. The queue may grow while a drain is in
//! progress (a provider's `register` can register further providers), so the
//! lock is never held across a visitor callback.

use std::sync::{Arc, RwLock};

use ignition_domain::Provider;
use tracing::debug;

/// Deduplicated, insertion-ordered sequence of provider handles.
///
/// Identity is pointer equality on the `Arc`, or equality of the provider's
/// name - two handles with the same name count as the same provider.
///
/// Out-of-range positional access is a silent no-op: `offset_get` returns
/// `None`, `offset_unset` does nothing, `offset_set` falls back to `add`.
#[derive(Default)]
pub struct ProviderQueue {
    items: RwLock<Vec<Arc<dyn Provider>>>,
}

impl ProviderQueue {
    /// Create an empty queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a queue from a sequence of handles, deduplicating as it goes.
    pub fn of(items: impl IntoIterator<Item = Arc<dyn Provider>>) -> Self {
        let queue = Self::new();
        for item in items {
            queue.add(item);
        }
        queue
    }

    /// Whether an equal handle (by identity or by name) is already present.
    pub fn exists(&self, item: &Arc<dyn Provider>) -> bool {
        let items = self.items.read().expect("queue lock poisoned");
        items
            .iter()
            .any(|it| Arc::ptr_eq(it, item) || it.name() == item.name())
    }

    /// Append a handle if it is not already present. Returns whether an
    /// insertion occurred.
    pub fn add(&self, item: Arc<dyn Provider>) -> bool {
        let mut items = self.items.write().expect("queue lock poisoned");
        let duplicate = items
            .iter()
            .any(|it| Arc::ptr_eq(it, &item) || it.name() == item.name());
        if duplicate {
            return false;
        }
        debug!(provider = item.name(), "queued provider");
        items.push(item);
        true
    }

    /// Number of pending handles.
    pub fn count(&self) -> usize {
        self.items.read().expect("queue lock poisoned").len()
    }

    /// True when nothing is pending.
    pub fn empty(&self) -> bool {
        self.count() == 0
    }

    /// Positional read; `None` when `index` is out of range.
    pub fn offset_get(&self, index: usize) -> Option<Arc<dyn Provider>> {
        let items = self.items.read().expect("queue lock poisoned");
        items.get(index).cloned()
    }

    /// Positional write. In range replaces the element; out of range falls
    /// back to `add` (dedup preserved).
    pub fn offset_set(&self, index: usize, item: Arc<dyn Provider>) {
        {
            let mut items = self.items.write().expect("queue lock poisoned");
            if index < items.len() {
                items[index] = item;
                return;
            }
        }
        self.add(item);
    }

    /// Remove the element at `index`, shifting later elements down by one.
    /// Out-of-range indices are ignored.
    pub fn offset_unset(&self, index: usize) {
        let mut items = self.items.write().expect("queue lock poisoned");
        if index < items.len() {
            let removed = items.remove(index);
            debug!(provider = removed.name(), "unqueued provider");
        }
    }

    /// Remove and return the first pending handle.
    pub fn pop_front(&self) -> Option<Arc<dyn Provider>> {
        let mut items = self.items.write().expect("queue lock poisoned");
        if items.is_empty() {
            None
        } else {
            Some(items.remove(0))
        }
    }

    /// Remove and return the last pending handle.
    pub fn pop_back(&self) -> Option<Arc<dyn Provider>> {
        self.items.write().expect("queue lock poisoned").pop()
    }

    /// Iterate positions `0..count`, tolerating the sequence shrinking while
    /// the visitor runs.
    ///
    /// The visitor returns `false` to stop. The lock is not held across the
    /// callback, so the visitor may call `offset_unset` on the position it was
    /// just given; the index only advances when the length did not shrink on
    /// that step (the former `index + 1` element slid into `index`).
    pub fn foreach(&self, mut visit: impl FnMut(usize, Arc<dyn Provider>) -> bool) {
        let mut index = 0;
        loop {
            let (len, item) = {
                let items = self.items.read().expect("queue lock poisoned");
                (items.len(), items.get(index).cloned())
            };
            if len == 0 || index >= len {
                break;
            }
            let item = item.expect("index checked against length");
            if !visit(index, item) {
                break;
            }
            let current = self.count();
            if current == len {
                index += 1;
            }
            if current == 0 {
                break;
            }
        }
    }

    /// Consume the queue front-to-back, releasing the lock around each
    /// callback so the visitor may append new handles; those are processed in
    /// the same pass.
    pub fn drain(&self, mut visit: impl FnMut(Arc<dyn Provider>)) {
        while let Some(item) = self.pop_front() {
            visit(item);
        }
    }

    /// Snapshot copy of the handles matching `predicate`.
    pub fn filter(&self, predicate: impl Fn(usize, &Arc<dyn Provider>) -> bool) -> ProviderQueue {
        let items = self.items.read().expect("queue lock poisoned");
        Self::of(
            items
                .iter()
                .enumerate()
                .filter(|(i, it)| predicate(*i, it))
                .map(|(_, it)| Arc::clone(it)),
        )
    }

    /// Snapshot copy of the tail starting at `index`; empty when out of range.
    pub fn start(&self, index: usize) -> ProviderQueue {
        let items = self.items.read().expect("queue lock poisoned");
        if index >= items.len() {
            return Self::new();
        }
        Self::of(items[index..].iter().cloned())
    }
}

impl std::fmt::Debug for ProviderQueue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let items = self.items.read().expect("queue lock poisoned");
        f.debug_list().entries(items.iter().map(|it| it.name())).finish()
    }
}
