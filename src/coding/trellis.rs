//! Trellis model of the rate-1/2 convolutional code and the encoder state machine that
//! walks it.
//!
//! The register holds the K - 1 most recent input bits, with the newest bit in the LSB.
//! Each coded output is the parity of the register bits selected by a tap mask, XORed
//! with the incoming bit. Feeding a bit shifts the register left, so the predecessors of
//! any state differ only in the bit vacated from the top of the register.

use crate::bits::Dibit;
use crate::consts;
use crate::error::{ConfigError, Result};

/// Fixed description of a convolutional code's state machine.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Trellis {
    /// Constraint length K.
    constraint: u8,
    /// Tap masks for the first and second coded outputs.
    taps: [u32; 2],
    /// Mask covering the K - 1 register bits.
    mask: usize,
}

/// A single edge of the trellis.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "ser", derive(Serialize, Deserialize))]
pub struct Transition {
    /// Source state.
    pub state: usize,
    /// Input bit driving the transition.
    pub bit: u8,
    /// Coded pair emitted on the edge.
    pub output: Dibit,
    /// Destination state.
    pub next: usize,
}

impl Trellis {
    /// Construct a new `Trellis` for the code with the given constraint length and
    /// generator tap masks.
    pub fn new(constraint: u8, taps_a: u32, taps_b: u32) -> Result<Trellis> {
        if constraint < consts::MIN_CONSTRAINT_LENGTH ||
           constraint > consts::MAX_CONSTRAINT_LENGTH
        {
            return Err(ConfigError::ConstraintLength(constraint).into());
        }

        let states = 1usize << (constraint - 1);
        let mask = states - 1;

        for &taps in &[taps_a, taps_b] {
            if taps as usize & !mask != 0 {
                return Err(ConfigError::TapsOutOfRange {
                    taps: taps,
                    states: states,
                }.into());
            }
        }

        Ok(Trellis {
            constraint: constraint,
            taps: [taps_a, taps_b],
            mask: mask,
        })
    }

    /// Constraint length K.
    pub fn constraint(&self) -> u8 { self.constraint }

    /// Tap masks for the first and second coded outputs.
    pub fn taps(&self) -> (u32, u32) { (self.taps[0], self.taps[1]) }

    /// Number of states, 2^(K-1).
    pub fn states(&self) -> usize { self.mask + 1 }

    /// Mask of the oldest register bit, which is vacated on each transition.
    pub fn high_bit(&self) -> usize { self.states() >> 1 }

    /// Get the state reached from the given state on the given input bit.
    pub fn next_state(&self, state: usize, bit: u8) -> usize {
        self.check(state, bit);
        (state << 1 | bit as usize) & self.mask
    }

    /// Get the coded pair emitted when leaving the given state on the given input bit.
    pub fn output(&self, state: usize, bit: u8) -> Dibit {
        self.check(state, bit);

        let a = parity(state as u32 & self.taps[0]) ^ bit;
        let b = parity(state as u32 & self.taps[1]) ^ bit;

        Dibit::from_pair(a, b)
    }

    /// Get the full transition leaving the given state on the given input bit.
    pub fn transition(&self, state: usize, bit: u8) -> Transition {
        Transition {
            state: state,
            bit: bit,
            output: self.output(state, bit),
            next: self.next_state(state, bit),
        }
    }

    /// Get the two states that lead into the given state, along with the input bit on
    /// those edges. The predecessor with the high bit clear comes first.
    pub fn predecessors(&self, dest: usize) -> [(usize, u8); 2] {
        assert!(dest <= self.mask);

        let low = dest >> 1;
        let bit = (dest & 1) as u8;

        [(low, bit), (low | self.high_bit(), bit)]
    }

    /// Get the register bit shifted out when leaving the given state.
    pub fn aged_out(&self, state: usize) -> u8 {
        assert!(state <= self.mask);
        (state & self.high_bit() != 0) as u8
    }

    /// Iterate over every edge, ordered by source state and then input bit.
    pub fn edges(&self) -> impl Iterator<Item = Transition> {
        let trellis = *self;

        (0..self.states()).flat_map(move |s| {
            (0..2).map(move |b| trellis.transition(s, b))
        })
    }

    fn check(&self, state: usize, bit: u8) {
        assert!(state <= self.mask, "state {} outside trellis", state);
        assert!(bit >> 1 == 0);
    }
}

/// Parity of the set bits in the given word.
fn parity(word: u32) -> u8 {
    (word.count_ones() & 1) as u8
}

/// Convolutional encoder that drives a `Trellis` forward one input bit at a time.
pub struct Encoder {
    trellis: Trellis,
    /// Current state.
    state: usize,
}

impl Encoder {
    /// Construct a new `Encoder` at the all-zero initial state.
    pub fn new(trellis: Trellis) -> Encoder {
        Encoder {
            trellis: trellis,
            state: 0,
        }
    }

    /// Current register contents.
    pub fn state(&self) -> usize { self.state }

    /// Return to the all-zero state.
    pub fn reset(&mut self) { self.state = 0; }

    /// Apply the given bit to the state machine and return the coded pair on the
    /// transition.
    pub fn feed(&mut self, bit: u8) -> Dibit {
        let t = self.trellis.transition(self.state, bit);
        self.state = t.next;
        t.output
    }

    /// Encode each of the given bits in order.
    pub fn encode(&mut self, bits: &[u8]) -> Vec<Dibit> {
        bits.iter().map(|&b| self.feed(b)).collect()
    }

    /// Flush the register with K - 1 zero bits, returning to the initial state, and return
    /// the coded pairs of the flush.
    pub fn finish(&mut self) -> Vec<Dibit> {
        (1..self.trellis.constraint()).map(|_| self.feed(0)).collect()
    }
}
