use crate::{Batch, StoreError};

/// The ordered-write/point-read engine interface the DB stage consumes
/// (`spec.md` §6). Owned exclusively by the DB stage for the run's duration
/// (`spec.md` §9); the trait exists so tests can substitute a [`crate::mock::MockStore`].
pub trait KvStore: Send {
    /// Commits every write in `batch` atomically. A no-op (and always `Ok`)
    /// for an empty batch.
    fn apply_batch(&self, batch: Batch) -> Result<(), StoreError>;

    /// Point lookup; `Ok(None)` is a normal miss, not an error.
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, StoreError>;
}
