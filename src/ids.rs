//! Id generation for tasks and categories.
//!
//! Ids look like millisecond timestamps so they stay compatible with data
//! written by earlier versions, but each generator hands out strictly
//! increasing values so two creations in the same millisecond never collide.

use chrono::Utc;

#[derive(Debug, Clone, Default)]
pub struct IdGenerator {
    last: u64,
}

impl IdGenerator {
    /// Start after the highest id already in use.
    pub fn seeded<I: IntoIterator<Item = u64>>(existing: I) -> Self {
        IdGenerator {
            last: existing.into_iter().max().unwrap_or(0),
        }
    }

    /// Next id based on the current wall clock.
    pub fn next_id(&mut self) -> u64 {
        let now = u64::try_from(Utc::now().timestamp_millis()).unwrap_or(0);
        self.next_at(now)
    }

    /// Next id given a clock reading; above the last one unless the id space
    /// is used up, in which case counting restarts from the clock and callers
    /// must skip ids still taken.
    pub fn next_at(&mut self, now_ms: u64) -> u64 {
        self.last = match self.last.checked_add(1) {
            Some(next) => now_ms.max(next),
            None => now_ms,
        };
        self.last
    }

    /// Like [`next_id`](Self::next_id), skipping any id for which `taken` holds.
    pub fn next_free(&mut self, taken: impl Fn(u64) -> bool) -> u64 {
        loop {
            let id = self.next_id();
            if !taken(id) {
                return id;
            }
        }
    }
}
