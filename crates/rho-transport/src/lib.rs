//! Transport primitives shared by every stage: the lock-free bounded SPSC
//! queue and cooperative cancellation (`spec.md` §4.1, §5).

mod cancel;
mod ring;

pub use cancel::{CancelToken, interruptible_sleep_1ms};
pub use ring::{Consumer, Producer, spsc_channel};
