/// A builder for a set of writes to commit atomically (`spec.md` §4.1
/// "atomic batched put"). Store-engine-agnostic so [`crate::mock::MockStore`]
/// doesn't need to depend on `sled::Batch`.
#[derive(Debug, Default)]
pub struct Batch {
    writes: Vec<(Vec<u8>, Vec<u8>)>,
}

impl Batch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: &[u8], value: &[u8]) {
        self.writes.push((key.to_vec(), value.to_vec()));
    }

    pub fn is_empty(&self) -> bool {
        self.writes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.writes.len()
    }

    pub(crate) fn into_writes(self) -> Vec<(Vec<u8>, Vec<u8>)> {
        self.writes
    }
}
