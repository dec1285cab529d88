//! The hasher stage (`spec.md` §4.2): drives the iteration, consults the
//! membership filter, and emits write/read requests to the DB stage.
//!
//! The loop performs no fallible I/O — `rho_digest::step` cannot fail, and
//! queue-full is backpressure, not an error (`spec.md` §4.2 "Failure
//! semantics"). The one failure mode the spec attributes to this stage, a
//! digest-primitive initialization error, is therefore not a runtime error
//! at all here: it surfaces earlier, as `rho_core::TruncationWidth::new`
//! rejecting an out-of-range `k` before a `HasherStage` can be built.

use rho_core::{Counter, Hash, HashPair, Request, TruncationWidth};
use rho_filter::MembershipFilter;
use rho_transport::{CancelToken, Producer, interruptible_sleep_1ms};

/// Owns everything the hasher stage needs for the run's duration: the
/// membership filter (mutated and read only here, per `spec.md` §5) and the
/// producing half of the request queue.
pub struct HasherStage<F: MembershipFilter> {
    width: TruncationWidth,
    filter: F,
    requests: Producer<Request>,
    hash_count: Producer<u64>,
    cancel: CancelToken,
}

impl<F: MembershipFilter> HasherStage<F> {
    pub fn new(
        width: TruncationWidth,
        filter: F,
        requests: Producer<Request>,
        hash_count: Producer<u64>,
        cancel: CancelToken,
    ) -> Self {
        Self { width, filter, requests, hash_count, cancel }
    }

    /// Runs the loop from `spec.md` §4.2 starting at `x0`, until cancelled.
    /// Returns the number of hashes processed, having also published that
    /// count on the result queue.
    pub fn run(mut self, x0: Hash) -> u64 {
        let mut prev = x0;
        let mut hashes = Counter::new();

        loop {
            if self.cancel.is_cancelled() {
                break;
            }

            let image = rho_digest::step(&prev, self.width);
            let pair = HashPair::new(prev, image);
            let key = image.prefix(self.width);

            if self.filter.contains(key) {
                if !self.push_interruptible(Request::read(pair)) {
                    break;
                }
            }

            if !self.push_interruptible(Request::write(pair)) {
                break;
            }

            self.filter.insert(key);

            prev = image;
            hashes.increment();

            if self.cancel.is_cancelled() {
                break;
            }
        }

        self.publish_final_count(hashes.value());
        hashes.value()
    }

    /// Pushes `request`, retrying on a 1 ms interruptible backpressure sleep
    /// (`spec.md` §4.1, §5). Returns `false` if cancellation interrupted the
    /// retry before the push succeeded — the caller then abandons the loop.
    fn push_interruptible(&self, request: Request) -> bool {
        let mut pending = request;
        loop {
            match self.requests.push(pending) {
                Ok(()) => return true,
                Err(returned) => {
                    pending = returned;
                    if interruptible_sleep_1ms(&self.cancel) {
                        return false;
                    }
                }
            }
        }
    }

    /// Publishes the final hash count, retrying unconditionally — "with
    /// interruption disabled so shutdown makes progress" (`spec.md` §4.2).
    fn publish_final_count(&self, count: u64) {
        let mut pending = count;
        loop {
            match self.hash_count.push(pending) {
                Ok(()) => return,
                Err(returned) => {
                    pending = returned;
                    std::thread::sleep(std::time::Duration::from_millis(1));
                }
            }
        }
    }
}
