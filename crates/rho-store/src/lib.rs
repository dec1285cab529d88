//! The persistent KV store (`spec.md` §6): "ordered-write/point-read engine
//! supporting atomic batched writes." Owned exclusively by the DB stage for
//! the run's duration.

mod batch;
mod error;
mod kv;
mod mock;
mod sled_store;

pub use batch::Batch;
pub use error::StoreError;
pub use kv::KvStore;
pub use mock::MockStore;
pub use sled_store::SledStore;
