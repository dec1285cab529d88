//! Data model and truncation math shared by every stage of the collision
//! search (`spec.md` §3).
//!
//! This crate has no I/O and no threads: it is the vocabulary the other
//! crates share.

mod counters;
mod hash;
mod request;
mod result;
mod width;

pub use counters::Counter;
pub use hash::{HASH_BYTES, Hash};
pub use request::{HashPair, Request, RequestKind};
pub use result::{CollisionResult, Outcome};
pub use width::{MAX_BITLEN, TruncationWidth, WidthError};
