use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::{Batch, KvStore, StoreError};

/// An in-memory [`KvStore`] for the `spec.md` §8 end-to-end test scenarios:
/// a store that never finds anything, and one that fails its `n`th write.
pub struct MockStore {
    data: Mutex<HashMap<Vec<u8>, Vec<u8>>>,
    always_miss: bool,
    writes_until_failure: AtomicUsize,
}

impl MockStore {
    /// A normal in-memory store.
    pub fn new() -> Self {
        Self {
            data: Mutex::new(HashMap::new()),
            always_miss: false,
            writes_until_failure: AtomicUsize::new(usize::MAX),
        }
    }

    /// Every `get` reports `NotFound`, no matter what was written.
    /// `spec.md` §8: "the DB stage never publishes a result; driver waits."
    pub fn always_miss() -> Self {
        Self {
            data: Mutex::new(HashMap::new()),
            always_miss: true,
            writes_until_failure: AtomicUsize::new(usize::MAX),
        }
    }

    /// The `n`th call to `apply_batch` (counting from 0) fails; every call
    /// before it succeeds normally. `spec.md` §8 fault-injection scenario.
    pub fn failing_after_writes(n: usize) -> Self {
        Self {
            data: Mutex::new(HashMap::new()),
            always_miss: false,
            writes_until_failure: AtomicUsize::new(n),
        }
    }
}

impl Default for MockStore {
    fn default() -> Self {
        Self::new()
    }
}

impl KvStore for MockStore {
    fn apply_batch(&self, batch: Batch) -> Result<(), StoreError> {
        if batch.is_empty() {
            return Ok(());
        }
        let remaining = self.writes_until_failure.load(Ordering::SeqCst);
        if remaining == 0 {
            self.writes_until_failure.store(usize::MAX, Ordering::SeqCst);
            return Err(StoreError::Write("injected write failure".to_string()));
        }
        if remaining != usize::MAX {
            self.writes_until_failure.fetch_sub(1, Ordering::SeqCst);
        }
        let mut data = self.data.lock().expect("mock store lock poisoned");
        for (key, value) in batch.into_writes() {
            data.insert(key, value);
        }
        Ok(())
    }

    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, StoreError> {
        if self.always_miss {
            return Ok(None);
        }
        let data = self.data.lock().expect("mock store lock poisoned");
        Ok(data.get(key).cloned())
    }
}
