//! The DB stage (`spec.md` §4.3): drains the request queue, coalesces
//! writes into atomic batches, and confirms filter hits against the
//! store's ground truth.

use std::time::Duration;

use rho_core::{CollisionResult, Hash, Request, RequestKind, TruncationWidth};
use rho_store::{Batch, KvStore, StoreError};
use rho_transport::{CancelToken, Consumer, Producer, interruptible_sleep_1ms};
use thiserror::Error;

/// Everything fatal inside the DB stage (`spec.md` §7). The store is the
/// only source of fatal errors here — an unrecognised request tag can't
/// occur in Rust, since `RequestKind` is an exhaustive two-variant enum.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DbError {
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// How a [`DbStage::run`] call ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DbOutcome {
    /// An authoritative `get` confirmed a filter hit (`spec.md` §4.3 step 2b).
    Collision(CollisionResult),
    /// A store operation failed; the stage exits without a result.
    Failed(DbError),
    /// The driver forced an early shutdown before any discovery
    /// (`spec.md` §5: "if the driver ever needs to terminate DB early").
    /// Not reachable in a normal run; exercised by test harnesses only.
    Cancelled,
}

/// Owns the request queue's consuming half, the store, and the result
/// queue's producing half for the run's duration (`spec.md` §9).
pub struct DbStage<S: KvStore> {
    width: TruncationWidth,
    requests: Consumer<Request>,
    store: S,
    result: Producer<DbOutcome>,
    cancel: CancelToken,
    queries: u64,
}

impl<S: KvStore> DbStage<S> {
    pub fn new(
        width: TruncationWidth,
        requests: Consumer<Request>,
        store: S,
        result: Producer<DbOutcome>,
        cancel: CancelToken,
    ) -> Self {
        Self { width, requests, store, result, cancel, queries: 0 }
    }

    /// Runs the loop from `spec.md` §4.3 until discovery, a fatal store
    /// error, or a forced shutdown, publishing the outcome on the result
    /// queue (except [`DbOutcome::Cancelled`], which has no result to
    /// publish). Hands the store back to the caller, who owns destroying it
    /// (`spec.md` §4.4).
    pub fn run(mut self) -> (DbOutcome, S) {
        let mut pending = Vec::new();

        let outcome = 'search: loop {
            pending.clear();
            let drained = self.requests.drain_into(&mut pending);

            if !drained {
                if interruptible_sleep_1ms(&self.cancel) {
                    break DbOutcome::Cancelled;
                }
                continue;
            }

            let mut batch = Batch::new();

            for request in pending.drain(..) {
                match request.kind {
                    RequestKind::Write => {
                        let key = request.pair.image.prefix(self.width);
                        let value = request.pair.preimage.prefix(self.width);
                        batch.insert(key, value);
                    }
                    RequestKind::Read => {
                        if !batch.is_empty() {
                            if let Err(e) = self.store.apply_batch(std::mem::take(&mut batch)) {
                                break 'search DbOutcome::Failed(e.into());
                            }
                        }

                        self.queries += 1;
                        let key = request.pair.image.prefix(self.width);
                        match self.store.get(key) {
                            Ok(Some(found)) => {
                                let stored_preimage = Hash::from_prefix(&found, self.width);
                                let result = CollisionResult {
                                    stored_preimage,
                                    probed_preimage: request.pair.preimage,
                                    image: request.pair.image,
                                    confirming_reads: self.queries,
                                };
                                break 'search DbOutcome::Collision(result);
                            }
                            Ok(None) => {
                                // Filter false positive; keep searching.
                            }
                            Err(e) => break 'search DbOutcome::Failed(e.into()),
                        }
                    }
                }
            }

            // Invariant §3/1: a pure-WRITE burst must not sit uncommitted
            // indefinitely, or a later filter hit could race the flush.
            if !batch.is_empty() {
                if let Err(e) = self.store.apply_batch(batch) {
                    break DbOutcome::Failed(e.into());
                }
            }

            if self.cancel.is_cancelled() {
                break DbOutcome::Cancelled;
            }
        };

        if outcome != DbOutcome::Cancelled {
            self.publish(outcome.clone());
        }
        (outcome, self.store)
    }

    /// Publishes `outcome` on the result queue, retrying unconditionally —
    /// the driver is blocked waiting for exactly this message.
    fn publish(&self, outcome: DbOutcome) {
        let mut pending = outcome;
        loop {
            match self.result.push(pending) {
                Ok(()) => return,
                Err(returned) => {
                    pending = returned;
                    std::thread::sleep(Duration::from_millis(1));
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rho_core::HashPair;
    use rho_store::MockStore;
    use rho_transport::spsc_channel;

    fn width(k: u16) -> TruncationWidth {
        TruncationWidth::new(k).unwrap()
    }

    #[test]
    fn confirms_a_collision_via_the_store() {
        let w = width(8);
        let (req_p, req_c) = spsc_channel::<Request>(16);
        let (res_p, res_c) = spsc_channel::<DbOutcome>(1);
        let cancel = CancelToken::new();
        let store = MockStore::new();

        let a = Hash::from_bytes([1u8; 32]).truncate(w);
        let b = Hash::from_bytes([2u8; 32]).truncate(w);
        let img = Hash::from_bytes([9u8; 32]).truncate(w);

        req_p.push(Request::write(HashPair::new(a, img))).unwrap();
        req_p.push(Request::read(HashPair::new(b, img))).unwrap();

        let stage = DbStage::new(w, req_c, store, res_p, cancel);
        let (outcome, _store) = stage.run();

        match &outcome {
            DbOutcome::Collision(r) => {
                assert_eq!(r.stored_preimage, a);
                assert_eq!(r.probed_preimage, b);
                assert_eq!(r.image, img);
                assert_eq!(r.confirming_reads, 1);
            }
            other => panic!("expected a collision, got {other:?}"),
        }
        assert_eq!(res_c.pop(), Some(outcome));
    }

    #[test]
    fn always_miss_store_never_publishes_and_responds_to_cancellation() {
        let w = width(8);
        let (req_p, req_c) = spsc_channel::<Request>(16);
        let (res_p, _res_c) = spsc_channel::<DbOutcome>(1);
        let cancel = CancelToken::new();
        let store = MockStore::always_miss();

        let a = Hash::from_bytes([1u8; 32]).truncate(w);
        let img = Hash::from_bytes([9u8; 32]).truncate(w);
        req_p.push(Request::write(HashPair::new(a, img))).unwrap();
        req_p.push(Request::read(HashPair::new(a, img))).unwrap();

        let stage = DbStage::new(w, req_c, store, res_p, cancel.clone());
        let handle = std::thread::spawn(move || stage.run());

        std::thread::sleep(Duration::from_millis(20));
        cancel.cancel();
        let (outcome, _store) = handle.join().unwrap();
        assert_eq!(outcome, DbOutcome::Cancelled);
    }

    #[test]
    fn store_write_failure_is_reported_as_failed() {
        let w = width(8);
        let (req_p, req_c) = spsc_channel::<Request>(16);
        let (res_p, res_c) = spsc_channel::<DbOutcome>(1);
        let cancel = CancelToken::new();
        let store = MockStore::failing_after_writes(0);

        let a = Hash::from_bytes([1u8; 32]).truncate(w);
        let img = Hash::from_bytes([9u8; 32]).truncate(w);
        req_p.push(Request::write(HashPair::new(a, img))).unwrap();
        req_p.push(Request::read(HashPair::new(a, img))).unwrap();

        let stage = DbStage::new(w, req_c, store, res_p, cancel);
        let (outcome, _store) = stage.run();

        assert!(matches!(outcome, DbOutcome::Failed(DbError::Store(StoreError::Write(_)))));
        assert_eq!(res_c.pop(), Some(outcome));
    }
}
