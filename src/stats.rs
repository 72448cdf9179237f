//! Runtime statistics.

/// Tracks counters for a decoder.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "ser", derive(Serialize, Deserialize))]
pub struct DecoderStats {
    /// Number of received symbols.
    pub symbols: usize,
    /// Number of erased symbol components.
    pub erasures: usize,
    /// Number of survivor selections between two equal finite path metrics.
    pub ties: usize,
    /// Number of completed tracebacks.
    pub tracebacks: usize,
    /// Number of tracebacks cut short by the survivor window.
    pub truncated: usize,
}

impl DecoderStats {
    /// Record that a symbol was received with the given number of erased components and
    /// that its survivor selection hit the given number of ties.
    pub fn record_step(&mut self, erasures: usize, ties: usize) {
        debug_assert!(erasures <= 2);

        self.symbols += 1;
        self.erasures += erasures;
        self.ties += ties;
    }

    /// Record a traceback, noting whether it was truncated.
    pub fn record_traceback(&mut self, truncated: bool) {
        self.tracebacks += 1;
        self.truncated += truncated as usize;
    }

    /// Merge in the stats from the given object and clear the other stats.
    pub fn merge(&mut self, other: &mut DecoderStats) {
        self.symbols += other.symbols;
        self.erasures += other.erasures;
        self.ties += other.ties;
        self.tracebacks += other.tracebacks;
        self.truncated += other.truncated;

        other.clear();
    }

    /// Clear all stats.
    pub fn clear(&mut self) {
        *self = DecoderStats::default();
    }
}

/// Indicates that a type captures statistics.
pub trait HasStats {
    /// Retrieve captured statistics.
    fn stats(&mut self) -> &mut DecoderStats;
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_decoder_stats() {
        let mut a = DecoderStats::default();
        let mut b = DecoderStats::default();

        a.record_step(0, 3);
        a.record_step(2, 0);
        a.record_traceback(false);
        assert_eq!(a.symbols, 2);
        assert_eq!(a.erasures, 2);
        assert_eq!(a.ties, 3);
        assert_eq!(a.tracebacks, 1);
        assert_eq!(a.truncated, 0);

        b.record_step(1, 1);
        b.record_traceback(true);
        b.record_traceback(true);
        assert_eq!(b.symbols, 1);
        assert_eq!(b.truncated, 2);

        a.merge(&mut b);
        assert_eq!(a.symbols, 3);
        assert_eq!(a.erasures, 3);
        assert_eq!(a.ties, 4);
        assert_eq!(a.tracebacks, 3);
        assert_eq!(a.truncated, 2);
        assert_eq!(b, DecoderStats::default());

        a.clear();
        assert_eq!(a, DecoderStats::default());
    }
}
