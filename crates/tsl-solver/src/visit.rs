//! Cycle-safe memoized traversal of type graphs.
//!
//! # Design
//!
//! `VisitState` is the per-run context every recursive analysis threads
//! through its calls. It combines:
//! 1. **Cycle detection** via an in-flight map keyed by identity. Re-entering a
//!    key that is still being computed yields the caller's *optimistic default*
//!    instead of recursing.
//! 2. **Memoization** of finished results, so each identity's shape is
//!    computed once no matter how many paths reach it.
//!
//! Identities are only valid for one type-checking session: a `VisitState`
//! is created at the start of a run and dropped at its end.
//!
//! # Provisional results
//!
//! A result computed while one of its dependencies was answered with the
//! optimistic default of a still-open frame is *provisional*. Every frame
//! remembers where the provisional log stood when it was entered. When a frame
//! finishes:
//! - with any value other than its optimistic default, every provisional
//!   result logged since it was entered is dropped from the memo, whether or
//!   not the frame is the root of its cycle. Tracking only the lowest frame a
//!   result rests on is not enough here: a result that read both this frame
//!   and an older ancestor carries the ancestor's index, yet it still used the
//!   refuted default;
//! - with the optimistic value while resting on an older frame, whatever
//!   rested on it now rests on that frame;
//! - with the optimistic value as the root of its cycle, the surviving
//!   provisional results that rested on it become final.
//!
//! Dropped results are recomputed by a later query against finished values.
//! Analyses built from conjunctions and disjunctions over a two-point lattice,
//! with the optimistic default on top, therefore agree with their greatest
//! fixpoint (readonlyness with `Immutable`, leak detection with "no leak").
//!
//! # Usage
//!
//! ```ignore
//! let mut state = VisitState::new();
//! let verdict = state.walk(ty, Verdict::Immutable, |state| visit_shape(ty, state));
//! ```

use rustc_hash::FxHashMap;
use std::fmt::Debug;
use std::hash::Hash;
use tracing::trace;

// ---------------------------------------------------------------------------
// VisitEntry
// ---------------------------------------------------------------------------

/// Outcome of [`VisitState::enter`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VisitEntry<R> {
    /// Proceed with the computation; the caller must call
    /// [`finish`](VisitState::finish) with the same key.
    Entered,
    /// The key was already computed.
    Finished(R),
    /// The key is being computed further up the stack; this is the
    /// optimistic default it was entered with.
    InFlight(R),
}

/// Work counters for one run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct VisitStats {
    /// Visits that ran to completion.
    pub computed: u32,
    /// Lookups answered from the memo.
    pub cache_hits: u32,
    /// Re-entries of an in-flight key.
    pub cycle_hits: u32,
    /// Provisional results dropped because their assumption was refuted.
    pub invalidated: u32,
}

struct Frame<K, R> {
    key: K,
    optimistic: R,
    /// Lowest stack index this frame's result depends on.
    low: usize,
    /// Provisional log position when this frame was entered.
    mark: u64,
}

#[derive(Clone, Copy)]
struct Provisional {
    /// Index of the open frame the result rests on.
    low: usize,
    /// Position in the provisional log.
    seq: u64,
}

// ---------------------------------------------------------------------------
// VisitState
// ---------------------------------------------------------------------------

/// In-flight set plus memo table for one analysis run.
///
/// # Debug-mode safety
///
/// In debug builds, dropping a state with entries still in flight panics, and
/// finishing a key other than the innermost entered one panics.
pub struct VisitState<K: Hash + Eq + Copy + Debug, R: Copy + PartialEq> {
    stack: Vec<Frame<K, R>>,
    in_flight: FxHashMap<K, usize>,
    finished: FxHashMap<K, R>,
    /// Memoized keys whose result still rests on an open frame.
    provisional: FxHashMap<K, Provisional>,
    next_seq: u64,
    stats: VisitStats,
}

impl<K: Hash + Eq + Copy + Debug, R: Copy + PartialEq> Default for VisitState<K, R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Hash + Eq + Copy + Debug, R: Copy + PartialEq> VisitState<K, R> {
    pub fn new() -> Self {
        Self {
            stack: Vec::new(),
            in_flight: FxHashMap::default(),
            finished: FxHashMap::default(),
            provisional: FxHashMap::default(),
            next_seq: 0,
            stats: VisitStats::default(),
        }
    }

    // -----------------------------------------------------------------------
    // Core enter / finish API
    // -----------------------------------------------------------------------

    /// Try to start computing `key`.
    ///
    /// `optimistic` is returned to any re-entry of `key` while it is in flight.
    pub fn enter(&mut self, key: K, optimistic: R) -> VisitEntry<R> {
        if let Some(&result) = self.finished.get(&key) {
            self.stats.cache_hits += 1;
            if let Some(low) = self.provisional.get(&key).map(|p| p.low) {
                self.depend_on(low);
            }
            return VisitEntry::Finished(result);
        }

        if let Some(&index) = self.in_flight.get(&key) {
            self.stats.cycle_hits += 1;
            trace!(?key, depth = self.stack.len(), "cycle, using optimistic default");
            self.depend_on(index);
            return VisitEntry::InFlight(self.stack[index].optimistic);
        }

        let index = self.stack.len();
        self.stack.push(Frame {
            key,
            optimistic,
            low: index,
            mark: self.next_seq,
        });
        self.in_flight.insert(key, index);
        VisitEntry::Entered
    }

    /// Record the result for the innermost entered key and return it.
    ///
    /// **Must** be called exactly once after every [`VisitEntry::Entered`].
    pub fn finish(&mut self, key: K, result: R) -> R {
        let Some(frame) = self.stack.pop() else {
            if cfg!(debug_assertions) {
                panic!("VisitState::finish({key:?}) called without a matching enter()");
            }
            return result;
        };
        debug_assert!(
            frame.key == key,
            "VisitState::finish({key:?}) does not match the innermost entered key {:?}",
            frame.key
        );
        self.in_flight.remove(&frame.key);
        self.stats.computed += 1;

        let index = self.stack.len();
        if result != frame.optimistic {
            self.invalidate_since(frame.key, frame.mark);
        }

        if frame.low < index {
            // Rests on an open ancestor: anything that rested on this frame
            // now rests on that ancestor instead.
            for entry in self.provisional.values_mut() {
                if entry.low >= index {
                    entry.low = frame.low;
                }
            }
            self.depend_on(frame.low);
            let seq = self.next_seq;
            self.next_seq += 1;
            self.provisional.insert(
                frame.key,
                Provisional {
                    low: frame.low,
                    seq,
                },
            );
        } else {
            self.provisional.retain(|_, entry| entry.low < index);
        }
        self.finished.insert(frame.key, result);
        result
    }

    /// Memoized, cycle-safe computation of `key`.
    ///
    /// Returns the cached result if `key` is finished, `optimistic` if `key`
    /// is in flight, and otherwise runs `visit` and caches its result.
    pub fn walk(&mut self, key: K, optimistic: R, visit: impl FnOnce(&mut Self) -> R) -> R {
        match self.enter(key, optimistic) {
            VisitEntry::Finished(result) | VisitEntry::InFlight(result) => result,
            VisitEntry::Entered => {
                let result = visit(self);
                self.finish(key, result)
            }
        }
    }

    /// Drop every provisional result logged at or after `mark`.
    fn invalidate_since(&mut self, key: K, mark: u64) {
        let finished = &mut self.finished;
        let mut invalidated = 0;
        self.provisional.retain(|stale, entry| {
            if entry.seq >= mark {
                finished.remove(stale);
                invalidated += 1;
                false
            } else {
                true
            }
        });
        if invalidated > 0 {
            trace!(?key, invalidated, "optimistic assumption refuted");
            self.stats.invalidated += invalidated;
        }
    }

    fn depend_on(&mut self, index: usize) {
        if let Some(top) = self.stack.last_mut() {
            top.low = top.low.min(index);
        }
    }

    // -----------------------------------------------------------------------
    // Query API
    // -----------------------------------------------------------------------

    #[inline]
    pub fn is_in_flight(&self, key: &K) -> bool {
        self.in_flight.contains_key(key)
    }

    /// Cached result for `key`, if any.
    #[inline]
    pub fn finished(&self, key: &K) -> Option<R> {
        self.finished.get(key).copied()
    }

    #[inline]
    pub fn is_provisional(&self, key: &K) -> bool {
        self.provisional.contains_key(key)
    }

    /// Number of keys currently being computed.
    #[inline]
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    #[inline]
    pub fn stats(&self) -> VisitStats {
        self.stats
    }
}

// ---------------------------------------------------------------------------
// Debug-mode leak detection
// ---------------------------------------------------------------------------

#[cfg(debug_assertions)]
impl<K: Hash + Eq + Copy + Debug, R: Copy + PartialEq> Drop for VisitState<K, R> {
    fn drop(&mut self) {
        if !std::thread::panicking() && !self.stack.is_empty() {
            panic!(
                "VisitState dropped with {} keys still in flight. \
                 This indicates enter() calls without matching finish() calls.",
                self.stack.len(),
            );
        }
    }
}

#[cfg(test)]
#[path = "../tests/visit_tests.rs"]
mod visit_tests;
