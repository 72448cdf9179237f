//! Bounded survivor bookkeeping for truncated Viterbi decoding.
//!
//! Both tables are rings of `window` rows, one row per decoding step and one column per
//! state. The row for step `t` lives at `t % window`, so recording step `t` silently
//! replaces step `t - window`.

use crate::coding::Metric;

/// The winning transition into a state at a single step.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "ser", derive(Serialize, Deserialize))]
pub struct Survivor<M> {
    /// Predecessor state.
    pub from: usize,
    /// Decoded input bit on the transition.
    pub bit: u8,
    /// Branch metric of the transition.
    pub metric: M,
    /// Path metric after taking the transition.
    pub cost: M,
    /// Step that wrote this entry.
    pub time: u64,
    /// Whether the entry holds a decision.
    pub committed: bool,
}

impl<M: Metric> Default for Survivor<M> {
    fn default() -> Self {
        Survivor {
            from: 0,
            bit: 0,
            metric: M::zero(),
            cost: M::infinity(),
            time: 0,
            committed: false,
        }
    }
}

/// Time-tagged ring of survivor entries for every state.
pub struct SurvivorStore<M: Metric> {
    entries: Vec<Survivor<M>>,
    states: usize,
    window: usize,
}

impl<M: Metric> SurvivorStore<M> {
    /// Construct a new `SurvivorStore` holding `window` steps for the given number of
    /// states.
    pub fn new(states: usize, window: usize) -> SurvivorStore<M> {
        assert!(window > 0);

        SurvivorStore {
            entries: vec![Survivor::default(); states * window],
            states: states,
            window: window,
        }
    }

    /// Number of steps retained.
    pub fn window(&self) -> usize { self.window }

    /// Earliest step still retained once `now` steps have been recorded.
    pub fn oldest(&self, now: u64) -> u64 {
        now.saturating_sub(self.window as u64)
    }

    fn slot(&self, time: u64) -> usize {
        (time % self.window as u64) as usize
    }

    fn idx(&self, state: usize, time: u64) -> usize {
        assert!(state < self.states);
        self.slot(time) * self.states + state
    }

    /// Record the survivor of the given state at the given step, overwriting whatever the
    /// slot held.
    pub fn record(&mut self, state: usize, time: u64, entry: Survivor<M>) {
        let idx = self.idx(state, time);

        self.entries[idx] = Survivor {
            time: time,
            committed: true,
            ..entry
        };
    }

    /// Get the survivor of the given state at the given step, if it's still retained.
    pub fn lookup(&self, state: usize, time: u64) -> Option<&Survivor<M>> {
        let entry = &self.entries[self.idx(state, time)];

        if entry.committed && entry.time == time {
            Some(entry)
        } else {
            None
        }
    }

    /// Get the row of entries for the given step, indexed by state.
    pub fn row_mut(&mut self, time: u64) -> &mut [Survivor<M>] {
        let start = self.slot(time) * self.states;
        &mut self.entries[start..start + self.states]
    }

    /// Forget every entry.
    pub fn reset(&mut self) {
        for e in self.entries.iter_mut() {
            *e = Survivor::default();
        }
    }
}

/// Ring of the register bit that each state's survivor shifted out at each step.
///
/// Combined with a destination state, the bit identifies the predecessor, which makes the
/// table an independent check on the `from` field of the survivor entries.
pub struct WindowHistory {
    bits: Vec<u8>,
    states: usize,
    window: usize,
}

impl WindowHistory {
    /// Construct a new `WindowHistory` holding `window` steps for the given number of
    /// states.
    pub fn new(states: usize, window: usize) -> WindowHistory {
        assert!(window > 0);

        WindowHistory {
            bits: vec![0; states * window],
            states: states,
            window: window,
        }
    }

    fn idx(&self, time: u64, state: usize) -> usize {
        assert!(state < self.states);
        (time % self.window as u64) as usize * self.states + state
    }

    /// Record the bit shifted out to reach the given state at the given step.
    pub fn record(&mut self, time: u64, state: usize, bit: u8) {
        let idx = self.idx(time, state);
        self.bits[idx] = bit;
    }

    /// Get the bit shifted out to reach the given state at the given step.
    pub fn get(&self, time: u64, state: usize) -> u8 {
        self.bits[self.idx(time, state)]
    }

    /// Clear every bit.
    pub fn reset(&mut self) {
        for b in self.bits.iter_mut() {
            *b = 0;
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn entry(from: usize, bit: u8, cost: u32) -> Survivor<u32> {
        Survivor {
            from: from,
            bit: bit,
            metric: 1,
            cost: cost,
            ..Survivor::default()
        }
    }

    #[test]
    fn test_survivor_ring() {
        let mut s = SurvivorStore::<u32>::new(4, 3);
        assert_eq!(s.window(), 3);
        assert!(s.lookup(0, 0).is_none());

        s.record(2, 0, entry(1, 0, 5));
        s.record(2, 1, entry(3, 1, 6));

        let e = s.lookup(2, 0).unwrap();
        assert_eq!(e.from, 1);
        assert_eq!(e.cost, 5);
        assert_eq!(e.time, 0);
        assert!(e.committed);
        assert!(s.lookup(2, 2).is_none());
        assert!(s.lookup(1, 0).is_none());

        // Step 3 reuses the slot of step 0.
        s.record(2, 3, entry(0, 1, 9));
        assert!(s.lookup(2, 0).is_none());
        assert_eq!(s.lookup(2, 3).unwrap().from, 0);
        assert_eq!(s.lookup(2, 1).unwrap().from, 3);

        assert_eq!(s.oldest(2), 0);
        assert_eq!(s.oldest(4), 1);

        s.reset();
        assert!(s.lookup(2, 3).is_none());
    }

    #[test]
    fn test_row() {
        let mut s = SurvivorStore::<u32>::new(4, 2);

        for (state, e) in s.row_mut(5).iter_mut().enumerate() {
            *e = Survivor {
                time: 5,
                committed: true,
                ..entry(state, 1, state as u32)
            };
        }

        assert_eq!(s.lookup(3, 5).unwrap().cost, 3);
        assert!(s.lookup(3, 3).is_none());
    }

    #[test]
    fn test_window_history() {
        let mut w = WindowHistory::new(8, 4);

        w.record(1, 5, 1);
        assert_eq!(w.get(1, 5), 1);
        assert_eq!(w.get(5, 5), 1);
        assert_eq!(w.get(1, 4), 0);

        w.record(5, 5, 0);
        assert_eq!(w.get(1, 5), 0);

        w.record(2, 7, 1);
        w.reset();
        assert_eq!(w.get(2, 7), 0);
    }
}
