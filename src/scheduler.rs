//! Discrete-event scheduler driving delayed state transitions.

use crate::error::SimError;
use crate::grid::CellId;
use std::cmp::Ordering;
use std::collections::BinaryHeap;

/// Closed set of event payloads the scheduler can carry.
///
/// Kept as a small tagged variant instead of boxed callbacks so the
/// simulation loop dispatches fired events with an exhaustive match.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Event {
    /// Turn the depleted grass patch at `cell` back to grown.
    RegrowGrass { cell: CellId },
}

#[derive(Clone, Debug)]
struct Entry {
    fire_at: u64,
    /// Insertion counter, FIFO tie-break among equal fire times.
    seq: u64,
    event: Event,
}

impl PartialEq for Entry {
    fn eq(&self, other: &Self) -> bool {
        self.fire_at == other.fire_at && self.seq == other.seq
    }
}

impl Eq for Entry {}

impl Ord for Entry {
    // Reversed so the BinaryHeap pops the lowest (fire_at, seq) first.
    fn cmp(&self, other: &Self) -> Ordering {
        (other.fire_at, other.seq).cmp(&(self.fire_at, self.seq))
    }
}

impl PartialOrd for Entry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Time-ordered queue of pending events, keyed by future tick.
///
/// Single-threaded and pull-based: the simulation loop drains due events at
/// the start of each tick. Fired events are returned to the caller rather
/// than invoked in place, so anything scheduled while applying a batch is
/// structurally deferred to a later drain and a flush can never recurse.
///
/// Determinism: ordering depends only on the sequence of `schedule` calls;
/// no wall clock and no randomness.
#[derive(Clone, Debug, Default)]
pub struct Scheduler {
    queue: BinaryHeap<Entry>,
    next_seq: u64,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule an event at an absolute tick.
    pub fn schedule_at(&mut self, fire_at: u64, event: Event) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.queue.push(Entry {
            fire_at,
            seq,
            event,
        });
    }

    /// Schedule an event `delay` ticks after `now`. A delay of 0 fires on
    /// the next drain at `now`; a negative delay is a programming error.
    pub fn schedule_in(&mut self, now: u64, delay: i64, event: Event) -> Result<(), SimError> {
        if delay < 0 {
            return Err(SimError::invalid_argument(format!(
                "negative scheduling delay: {}",
                delay
            )));
        }
        self.schedule_at(now + delay as u64, event);
        Ok(())
    }

    /// Pop all events with `fire_at <= tick`, in (fire time, insertion)
    /// order.
    pub fn advance_to(&mut self, tick: u64) -> Vec<Event> {
        let mut fired = Vec::new();
        while let Some(head) = self.queue.peek() {
            if head.fire_at > tick {
                break;
            }
            if let Some(entry) = self.queue.pop() {
                fired.push(entry.event);
            }
        }
        fired
    }

    /// Number of pending events.
    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    /// Iterate over pending events in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = (u64, Event)> + '_ {
        self.queue.iter().map(|e| (e.fire_at, e.event))
    }
}
