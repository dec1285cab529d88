use std::path::PathBuf;

use thiserror::Error;

/// Every fatal-to-the-DB-stage outcome from `spec.md` §7 that originates in
/// the store. Errors are carried as rendered strings rather than wrapping
/// `sled::Error` directly so [`crate::mock::MockStore`] can synthesize a
/// failure injection without depending on `sled`'s internal error shape.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("store path {path} already exists (refusing to reuse a prior run's data)")]
    AlreadyExists { path: PathBuf },
    #[error("failed to open store: {0}")]
    Open(String),
    #[error("failed to commit a write batch: {0}")]
    Write(String),
    #[error("failed to read a key: {0}")]
    Read(String),
    #[error("failed to destroy store directory: {0}")]
    Destroy(String),
}
