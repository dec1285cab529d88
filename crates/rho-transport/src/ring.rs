//! Lock-free bounded single-producer/single-consumer ring buffer
//! (`spec.md` §4.1, §9 "Lock-free SPSC queue").
//!
//! One writer advances `tail`, one reader advances `head`; each side only
//! ever reads the other's cursor, never writes it. `tail` is published with
//! `Release` after the slot write so the reader's `Acquire` load of `tail`
//! synchronizes-with it; symmetrically for `head` on the return path. This
//! is the same head/tail-with-cached-view protocol used by SPSC ring
//! buffers generally; see e.g. `ringmpsc`'s `Ring<T>` for a more aggressively
//! optimized (cache-line-padded, sequence-cached) variant of the same idea,
//! which this module also follows for dropping any still-queued elements on
//! teardown. We keep the simpler two-atomics version here since this queue's
//! capacity (`--batch-size`, default 10,000) and 1 ms backpressure sleep mean
//! it is nowhere near contended enough to need cached cursors.

use std::cell::UnsafeCell;
use std::mem::MaybeUninit;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

struct Slot<T>(UnsafeCell<MaybeUninit<T>>);

/// Padding to a cache line keeps the producer's `tail` and the consumer's
/// `head` from false-sharing a line, which would otherwise bounce it
/// between cores on every push/pop.
#[repr(align(64))]
struct CachePadded<T>(T);

struct Ring<T> {
    buffer: Box<[Slot<T>]>,
    mask: usize,
    head: CachePadded<AtomicUsize>,
    tail: CachePadded<AtomicUsize>,
}

// Safety: `Ring<T>` is only ever reached through one `Producer<T>` and one
// `Consumer<T>`, each with exclusive access to its own cursor and to slots
// it currently owns (unwritten slots belong to the producer, written-but-
// unread slots belong to the consumer). No slot is ever touched by both
// sides at once, so sharing the buffer across the producer/consumer thread
// pair is sound as long as `T: Send`.
unsafe impl<T: Send> Send for Ring<T> {}
unsafe impl<T: Send> Sync for Ring<T> {}

impl<T> Ring<T> {
    fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1).next_power_of_two();
        let buffer = (0..capacity)
            .map(|_| Slot(UnsafeCell::new(MaybeUninit::uninit())))
            .collect::<Vec<_>>()
            .into_boxed_slice();
        Self {
            buffer,
            mask: capacity - 1,
            head: CachePadded(AtomicUsize::new(0)),
            tail: CachePadded(AtomicUsize::new(0)),
        }
    }

    fn capacity(&self) -> usize {
        self.buffer.len()
    }

    /// Attempts to enqueue `value`. On failure (queue full), returns the
    /// value back to the caller so a retry loop doesn't need to keep a
    /// separate copy around.
    fn push(&self, value: T) -> Result<(), T> {
        let tail = self.tail.0.load(Ordering::Relaxed);
        let head = self.head.0.load(Ordering::Acquire);
        if tail.wrapping_sub(head) >= self.capacity() {
            return Err(value);
        }
        let idx = tail & self.mask;
        // Safety: this slot is not readable by the consumer until `tail` is
        // published below, and no other producer exists to race this write.
        unsafe {
            (*self.buffer[idx].0.get()).write(value);
        }
        self.tail.0.store(tail.wrapping_add(1), Ordering::Release);
        Ok(())
    }

    /// Dequeues one value, or `None` if the queue is empty.
    fn pop(&self) -> Option<T> {
        let head = self.head.0.load(Ordering::Relaxed);
        let tail = self.tail.0.load(Ordering::Acquire);
        if head == tail {
            return None;
        }
        let idx = head & self.mask;
        // Safety: this slot was published by the producer's `Release` store
        // of `tail` above, observed through the `Acquire` load of `tail`,
        // and no other consumer exists to race this read.
        let value = unsafe { (*self.buffer[idx].0.get()).assume_init_read() };
        self.head.0.store(head.wrapping_add(1), Ordering::Release);
        Some(value)
    }
}

impl<T> Drop for Ring<T> {
    fn drop(&mut self) {
        // Walk [head, tail) and drop every slot still holding a value — a
        // queue torn down mid-run (e.g. on cancellation) can have entries
        // neither side ever popped.
        let head = *self.head.0.get_mut();
        let tail = *self.tail.0.get_mut();
        let mut idx = head;
        while idx != tail {
            let slot = idx & self.mask;
            unsafe {
                (*self.buffer[slot].0.get()).assume_init_drop();
            }
            idx = idx.wrapping_add(1);
        }
    }
}

/// The producing half of an [`spsc_channel`] pair.
pub struct Producer<T> {
    ring: Arc<Ring<T>>,
}

/// The consuming half of an [`spsc_channel`] pair.
pub struct Consumer<T> {
    ring: Arc<Ring<T>>,
}

impl<T> Producer<T> {
    /// Matches the transport contract in `spec.md` §4.1: returns
    /// success/failure; never blocks. On failure the caller owns backpressure
    /// (an interruptible 1 ms sleep, per `spec.md` §9).
    pub fn push(&self, value: T) -> Result<(), T> {
        self.ring.push(value)
    }
}

impl<T> Consumer<T> {
    /// One pop, or `None` if nothing is currently available.
    pub fn pop(&self) -> Option<T> {
        self.ring.pop()
    }

    /// Drains every element currently available into `sink`, in FIFO order.
    /// Returns whether anything was moved — the DB stage uses this to decide
    /// whether to sleep (`spec.md` §4.3 step 1).
    pub fn drain_into(&self, sink: &mut Vec<T>) -> bool {
        let mut moved = false;
        while let Some(v) = self.ring.pop() {
            sink.push(v);
            moved = true;
        }
        moved
    }
}

/// Creates a bounded SPSC channel with room for at least `capacity`
/// elements (rounded up to a power of two internally).
pub fn spsc_channel<T>(capacity: usize) -> (Producer<T>, Consumer<T>) {
    let ring = Arc::new(Ring::with_capacity(capacity));
    (Producer { ring: ring.clone() }, Consumer { ring })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn fifo_order_single_threaded() {
        let (p, c) = spsc_channel::<u32>(4);
        for i in 0..4 {
            p.push(i).unwrap();
        }
        for i in 0..4 {
            assert_eq!(c.pop(), Some(i));
        }
        assert_eq!(c.pop(), None);
    }

    #[test]
    fn push_fails_when_full_and_returns_the_value() {
        let (p, _c) = spsc_channel::<u32>(2);
        p.push(1).unwrap();
        p.push(2).unwrap();
        assert_eq!(p.push(3), Err(3));
    }

    #[test]
    fn drain_into_moves_everything_available() {
        let (p, c) = spsc_channel::<u32>(8);
        for i in 0..5 {
            p.push(i).unwrap();
        }
        let mut sink = Vec::new();
        assert!(c.drain_into(&mut sink));
        assert_eq!(sink, vec![0, 1, 2, 3, 4]);
        let mut empty_sink = Vec::new();
        assert!(!c.drain_into(&mut empty_sink));
    }

    #[test]
    fn dropping_the_ring_drops_every_still_queued_value() {
        use std::rc::Rc;
        use std::cell::Cell;

        let count = Rc::new(Cell::new(0));

        struct CountsDrops(Rc<Cell<u32>>);
        impl Drop for CountsDrops {
            fn drop(&mut self) {
                self.0.set(self.0.get() + 1);
            }
        }

        {
            let (p, c) = spsc_channel::<CountsDrops>(4);
            p.push(CountsDrops(count.clone())).unwrap();
            p.push(CountsDrops(count.clone())).unwrap();
            p.push(CountsDrops(count.clone())).unwrap();
            // Pop one so head != 0, leaving two queued when the ring drops.
            drop(c.pop());
            assert_eq!(count.get(), 1);
        }

        assert_eq!(count.get(), 3, "both still-queued values must be dropped with the ring");
    }

    #[test]
    fn capacity_rounds_up_to_a_power_of_two() {
        let (p, _c) = spsc_channel::<u32>(3);
        // Requested 3, rounds to 4: four pushes should all succeed.
        for i in 0..4 {
            assert!(p.push(i).is_ok());
        }
        assert_eq!(p.push(4), Err(4));
    }

    #[test]
    fn one_producer_one_consumer_threads_preserve_order() {
        const N: u32 = 20_000;
        let (p, c) = spsc_channel::<u32>(64);
        let producer = thread::spawn(move || {
            for i in 0..N {
                loop {
                    match p.push(i) {
                        Ok(()) => break,
                        Err(_) => thread::yield_now(),
                    }
                }
            }
        });
        let consumer = thread::spawn(move || {
            let mut received = Vec::with_capacity(N as usize);
            while received.len() < N as usize {
                let mut batch = Vec::new();
                if c.drain_into(&mut batch) {
                    received.extend(batch);
                } else {
                    thread::yield_now();
                }
            }
            received
        });
        producer.join().unwrap();
        let received = consumer.join().unwrap();
        let expected: Vec<u32> = (0..N).collect();
        assert_eq!(received, expected);
    }
}
