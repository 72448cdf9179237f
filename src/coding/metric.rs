//! Branch metrics for a single received symbol.

use collect_slice::CollectSlice;

use crate::bits::{Dibit, ReceivedSymbol};
use crate::coding::trellis::Trellis;
use crate::coding::Metric;

/// Cost of every trellis edge for the current received symbol, indexed by source state
/// and input bit.
pub struct BranchMetrics<M: Metric> {
    table: Vec<M>,
    /// Coded pair on each edge, cached from the trellis.
    outputs: Vec<Dibit>,
}

impl<M: Metric> BranchMetrics<M> {
    /// Construct a new `BranchMetrics` for the edges of the given trellis, with every edge
    /// initially free.
    pub fn new(trellis: &Trellis) -> BranchMetrics<M> {
        let edges = trellis.states() * 2;

        let mut outputs = vec![Dibit::default(); edges];
        trellis.edges().map(|e| e.output).collect_slice_checked(&mut outputs[..]);

        BranchMetrics {
            table: vec![M::zero(); edges],
            outputs: outputs,
        }
    }

    /// Recompute the table for the given symbol, where a coded 1 is expected to arrive as
    /// the given full-scale value.
    pub fn compute(&mut self, sym: ReceivedSymbol, full_scale: u8) {
        // Only four coded pairs exist, so cost each once.
        let mut costs = [M::zero(); 4];

        (0..4u8)
            .map(|bits| M::from_distance(distance(sym, Dibit::new(bits), full_scale)))
            .collect_slice_checked(&mut costs[..]);

        self.outputs.iter()
            .map(|out| costs[out.bits() as usize])
            .collect_slice_checked(&mut self.table[..]);
    }

    /// Get the metric of the edge leaving the given state on the given input bit.
    pub fn get(&self, state: usize, bit: u8) -> M {
        self.table[state << 1 | bit as usize]
    }
}

/// Compute the magnitude distance between a received symbol and an expected coded pair.
/// Erased components contribute nothing.
pub fn distance(sym: ReceivedSymbol, expected: Dibit, full_scale: u8) -> u32 {
    let part = |erased: bool, bit: u8, rx: u8| {
        if erased {
            0
        } else {
            (bit as i32 * full_scale as i32 - rx as i32).unsigned_abs()
        }
    };

    part(sym.erased_a, expected.hi(), sym.a) + part(sym.erased_b, expected.lo(), sym.b)
}

#[cfg(test)]
mod test {
    use super::*;

    fn trellis() -> Trellis {
        Trellis::new(7, 0b110110, 0b100111).unwrap()
    }

    #[test]
    fn test_distance() {
        let s = ReceivedSymbol::new(1, 0);
        assert_eq!(distance(s, Dibit::new(0b10), 1), 0);
        assert_eq!(distance(s, Dibit::new(0b11), 1), 1);
        assert_eq!(distance(s, Dibit::new(0b01), 1), 2);

        let s = s.with_erasures(true, false);
        assert_eq!(distance(s, Dibit::new(0b01), 1), 1);
        assert_eq!(distance(ReceivedSymbol::erased(), Dibit::new(0b01), 1), 0);

        let s = ReceivedSymbol::new(5, 2);
        assert_eq!(distance(s, Dibit::new(0b10), 7), 4);
        assert_eq!(distance(s, Dibit::new(0b01), 7), 10);
    }

    #[test]
    fn test_table() {
        let t = trellis();
        let mut bm = BranchMetrics::<u32>::new(&t);

        assert_eq!(bm.get(17, 1), 0);

        bm.compute(ReceivedSymbol::new(1, 1), 1);

        for e in t.edges() {
            let expect = distance(ReceivedSymbol::new(1, 1), e.output, 1);
            assert_eq!(bm.get(e.state, e.bit), expect);
        }

        assert_eq!(bm.get(0, 0), 2);
        assert_eq!(bm.get(0, 1), 0);
        assert_eq!(bm.get(1, 0), 1);

        bm.compute(ReceivedSymbol::erased(), 1);
        assert!(t.edges().all(|e| bm.get(e.state, e.bit) == 0));
    }

    #[test]
    fn test_saturate() {
        let t = trellis();
        let mut bm = BranchMetrics::<u8>::new(&t);

        bm.compute(ReceivedSymbol::new(0, 0), 200);
        assert_eq!(bm.get(0, 1), 255);
        assert_eq!(bm.get(0, 0), 0);
    }
}
