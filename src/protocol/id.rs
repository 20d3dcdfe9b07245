//! Request id sources
//!
//! Each outgoing request carries a fresh id which the server echoes back.
//! Ids are drawn from an explicit source so tests can pin them down.

use rand::Rng;

/// Supplies ids for outgoing packets
pub trait IdSource: Send {
    /// Next request id. Must never return `BAD_AUTH_ID`.
    fn next_id(&mut self) -> i32;
}

/// Uniformly random non-negative ids
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomIds;

impl IdSource for RandomIds {
    fn next_id(&mut self) -> i32 {
        rand::thread_rng().gen_range(0..=i32::MAX)
    }
}

/// Deterministic ids counting up from a starting value
#[derive(Debug, Clone, Copy)]
pub struct SequentialIds {
    next: i32,
}

impl SequentialIds {
    /// Start counting at `first` (clamped to be non-negative)
    pub fn starting_at(first: i32) -> Self {
        Self { next: first.max(0) }
    }
}

impl Default for SequentialIds {
    fn default() -> Self {
        Self::starting_at(1)
    }
}

impl IdSource for SequentialIds {
    fn next_id(&mut self) -> i32 {
        let id = self.next;
        // wrap back to 0 rather than into negative ids
        self.next = if self.next == i32::MAX { 0 } else { self.next + 1 };
        id
    }
}
