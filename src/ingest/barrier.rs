//! Completion barrier for outstanding work units
//!
//! The pool has no completion notification of its own, so the dispatcher
//! acquires a permit per submitted unit and the unit releases it when it
//! finishes. The orchestrator blocks in `await_zero` until every permit is
//! back.
//!
//! All counter changes and every wait check happen under one mutex. A
//! release that brings the count to zero notifies waiters before the mutex
//! is dropped, so a waiter can never observe a non-zero count and then miss
//! the wake-up.

use std::sync::{Arc, Condvar, Mutex};
use std::time::Duration;

#[derive(Debug, Default)]
struct Counts {
    outstanding: usize,
    acquired: u64,
    released: u64,
}

/// Point-in-time view of the barrier's counters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BarrierStats {
    /// Units acquired over the barrier's lifetime
    pub acquired: u64,
    /// Units released over the barrier's lifetime
    pub released: u64,
    pub outstanding: usize,
}

/// Counter of outstanding work with a blocking wait-for-zero
#[derive(Debug, Default)]
pub struct CompletionBarrier {
    counts: Mutex<Counts>,
    zero: Condvar,
}

impl CompletionBarrier {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Register one outstanding unit.
    ///
    /// The returned permit releases the unit when dropped, which covers
    /// early returns and panics inside the unit.
    pub fn acquire(self: &Arc<Self>) -> BarrierPermit {
        let mut counts = self.counts.lock().unwrap();
        counts.outstanding += 1;
        counts.acquired += 1;
        BarrierPermit {
            barrier: Arc::clone(self),
        }
    }

    /// Mark one unit as finished.
    ///
    /// Called by `BarrierPermit` on drop. Releasing more units than were
    /// acquired is a defect and panics.
    pub fn release(&self) {
        let mut counts = self.counts.lock().unwrap();
        assert!(
            counts.outstanding > 0,
            "completion barrier released more units than were acquired"
        );
        counts.outstanding -= 1;
        counts.released += 1;
        if counts.outstanding == 0 {
            self.zero.notify_all();
        }
    }

    /// Block until no units are outstanding.
    ///
    /// Returns immediately if the count is already zero.
    pub fn await_zero(&self) {
        let _counts = self
            .zero
            .wait_while(self.counts.lock().unwrap(), |counts| counts.outstanding > 0)
            .unwrap();
    }

    /// Like `await_zero`, but gives up after `timeout`.
    ///
    /// Returns `true` if the count reached zero.
    pub fn await_zero_timeout(&self, timeout: Duration) -> bool {
        let (counts, _) = self
            .zero
            .wait_timeout_while(self.counts.lock().unwrap(), timeout, |counts| {
                counts.outstanding > 0
            })
            .unwrap();
        counts.outstanding == 0
    }

    pub fn outstanding(&self) -> usize {
        self.counts.lock().unwrap().outstanding
    }

    pub fn stats(&self) -> BarrierStats {
        let counts = self.counts.lock().unwrap();
        BarrierStats {
            acquired: counts.acquired,
            released: counts.released,
            outstanding: counts.outstanding,
        }
    }
}

/// One acquired unit of outstanding work
#[must_use = "dropping a permit immediately releases the unit"]
#[derive(Debug)]
pub struct BarrierPermit {
    barrier: Arc<CompletionBarrier>,
}

impl Drop for BarrierPermit {
    fn drop(&mut self) {
        self.barrier.release();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::thread;
    use std::time::Instant;

    #[test]
    fn await_zero_returns_immediately_when_idle() {
        let barrier = CompletionBarrier::new();
        barrier.await_zero();
        assert!(barrier.await_zero_timeout(Duration::from_millis(1)));
        assert_eq!(barrier.stats(), BarrierStats::default());
    }

    #[test]
    fn permit_drop_releases() {
        let barrier = CompletionBarrier::new();
        let permit = barrier.acquire();
        assert_eq!(barrier.outstanding(), 1);
        drop(permit);
        assert_eq!(barrier.outstanding(), 0);
        assert_eq!(
            barrier.stats(),
            BarrierStats {
                acquired: 1,
                released: 1,
                outstanding: 0
            }
        );
    }

    #[test]
    fn bounded_wait_times_out_while_work_is_outstanding() {
        let barrier = CompletionBarrier::new();
        let _permit = barrier.acquire();
        let start = Instant::now();
        assert!(!barrier.await_zero_timeout(Duration::from_millis(50)));
        assert!(start.elapsed() >= Duration::from_millis(50));
        assert_eq!(barrier.outstanding(), 1);
    }

    #[test]
    fn await_zero_waits_for_every_permit() {
        let barrier = CompletionBarrier::new();
        let finished = Arc::new(AtomicUsize::new(0));

        let handles: Vec<_> = (0..16)
            .map(|i| {
                let permit = barrier.acquire();
                let finished = Arc::clone(&finished);
                thread::spawn(move || {
                    let _permit = permit;
                    thread::sleep(Duration::from_millis(5 * (i % 4)));
                    finished.fetch_add(1, Ordering::SeqCst);
                })
            })
            .collect();

        barrier.await_zero();
        assert_eq!(finished.load(Ordering::SeqCst), 16);
        assert_eq!(barrier.outstanding(), 0);

        for handle in handles {
            handle.join().unwrap();
        }
        let stats = barrier.stats();
        assert_eq!(stats.acquired, 16);
        assert_eq!(stats.released, 16);
        assert_eq!(stats.outstanding, 0);
    }

    #[test]
    fn acquires_racing_with_a_waiter_are_not_missed() {
        let barrier = CompletionBarrier::new();
        let seed = barrier.acquire();

        // Each unit spawns its successor before releasing itself, so the
        // count only reaches zero once the whole chain has run.
        fn chain(barrier: Arc<CompletionBarrier>, permit: BarrierPermit, remaining: usize, done: Arc<AtomicUsize>) {
            thread::spawn(move || {
                let _permit = permit;
                done.fetch_add(1, Ordering::SeqCst);
                if remaining > 0 {
                    let next = barrier.acquire();
                    chain(Arc::clone(&barrier), next, remaining - 1, done);
                }
            });
        }

        let done = Arc::new(AtomicUsize::new(0));
        chain(Arc::clone(&barrier), seed, 20, Arc::clone(&done));
        barrier.await_zero();
        assert_eq!(done.load(Ordering::SeqCst), 21);
        assert_eq!(barrier.stats().released, 21);
    }

    #[test]
    fn panicking_unit_still_releases() {
        let barrier = CompletionBarrier::new();
        let permit = barrier.acquire();
        let handle = thread::spawn(move || {
            let _permit = permit;
            panic!("unit failed");
        });
        assert!(handle.join().is_err());
        barrier.await_zero();
        assert_eq!(barrier.stats().released, 1);
    }

    #[test]
    #[should_panic(expected = "released more units")]
    fn release_without_acquire_is_a_defect() {
        let barrier = CompletionBarrier::new();
        barrier.release();
    }
}
