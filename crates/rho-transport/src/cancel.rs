//! Cooperative cancellation (`spec.md` §5): a shared flag polled at every
//! suspension point, plus the interruptible 1 ms backpressure sleep.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

const BACKPRESSURE_SLEEP: Duration = Duration::from_millis(1);

/// A cloneable handle to a single stop flag. The driver holds the only
/// writer; stages only ever read it.
#[derive(Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self(Arc::new(AtomicBool::new(false)))
    }

    /// Requests cancellation. Idempotent.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

/// The backpressure sleep used at every retry loop in the hasher and DB
/// stages (`spec.md` §4.1, §9): 1 ms, checked for cancellation both before
/// and after so a cancelled stage doesn't pay the full sleep before noticing.
///
/// Returns `true` if cancellation was observed.
pub fn interruptible_sleep_1ms(token: &CancelToken) -> bool {
    if token.is_cancelled() {
        return true;
    }
    std::thread::sleep(BACKPRESSURE_SLEEP);
    token.is_cancelled()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_uncancelled() {
        let token = CancelToken::new();
        assert!(!token.is_cancelled());
    }

    #[test]
    fn cancel_is_visible_through_clones() {
        let token = CancelToken::new();
        let clone = token.clone();
        clone.cancel();
        assert!(token.is_cancelled());
    }

    #[test]
    fn sleep_returns_immediately_once_cancelled() {
        let token = CancelToken::new();
        token.cancel();
        let start = std::time::Instant::now();
        assert!(interruptible_sleep_1ms(&token));
        // No actual sleep should have happened.
        assert!(start.elapsed() < Duration::from_millis(1));
    }
}
