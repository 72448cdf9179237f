//! Coded bit pairs and received channel symbols.

/// Two coded bits emitted on a single trellis transition.
#[derive(Copy, Clone, Default, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "ser", derive(Serialize, Deserialize))]
pub struct Dibit(u8);

impl Dibit {
    /// Construct a new `Dibit` with the two given bits in the LSB position.
    pub fn new(bits: u8) -> Dibit {
        assert!(bits >> 2 == 0);
        Dibit(bits)
    }

    /// Construct a new `Dibit` from the first (A) and second (B) coded outputs.
    pub fn from_pair(a: u8, b: u8) -> Dibit {
        assert!(a >> 1 == 0 && b >> 1 == 0);
        Dibit(a << 1 | b)
    }

    /// Get the wrapped dibit, which is guaranteed to have only 2 LSBs.
    pub fn bits(&self) -> u8 { self.0 }
    /// Get the MSB, the first coded output.
    pub fn hi(&self) -> u8 { self.0 >> 1 }
    /// Get the LSB, the second coded output.
    pub fn lo(&self) -> u8 { self.0 & 1 }
}

/// A received pair of symbol components, each with an erasure flag.
///
/// Component values are hard bits for hard-decision decoding or quantized reliability
/// magnitudes when the decoder is configured with a larger full scale.
#[derive(Copy, Clone, Default, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "ser", derive(Serialize, Deserialize))]
pub struct ReceivedSymbol {
    /// Value received for the first coded output.
    pub a: u8,
    /// Value received for the second coded output.
    pub b: u8,
    /// Whether the first component should be ignored.
    pub erased_a: bool,
    /// Whether the second component should be ignored.
    pub erased_b: bool,
}

impl ReceivedSymbol {
    /// Construct a symbol with both components present.
    pub fn new(a: u8, b: u8) -> ReceivedSymbol {
        ReceivedSymbol {
            a: a,
            b: b,
            erased_a: false,
            erased_b: false,
        }
    }

    /// Construct a symbol with both components erased.
    pub fn erased() -> ReceivedSymbol {
        ReceivedSymbol::new(0, 0).with_erasures(true, true)
    }

    /// Mark the given components as erased.
    pub fn with_erasures(mut self, erased_a: bool, erased_b: bool) -> Self {
        self.erased_a = erased_a;
        self.erased_b = erased_b;
        self
    }

    /// Construct a soft symbol by scaling the coded pair to the given full scale.
    pub fn scaled(dibit: Dibit, full_scale: u8) -> ReceivedSymbol {
        ReceivedSymbol::new(dibit.hi() * full_scale, dibit.lo() * full_scale)
    }

    /// Number of erased components.
    pub fn erasures(&self) -> usize {
        self.erased_a as usize + self.erased_b as usize
    }
}

impl From<Dibit> for ReceivedSymbol {
    fn from(dibit: Dibit) -> Self {
        ReceivedSymbol::new(dibit.hi(), dibit.lo())
    }
}

/// Groups a flat stream of coded bits, first output first, into hard-decision symbols.
pub struct Pairs<T: Iterator<Item = u8>> {
    /// Source of coded bits.
    src: T,
}

impl<T: Iterator<Item = u8>> Pairs<T> {
    /// Construct a new `Pairs` over the given bit source.
    pub fn new(src: T) -> Pairs<T> {
        Pairs { src: src }
    }
}

impl<T: Iterator<Item = u8>> Iterator for Pairs<T> {
    type Item = ReceivedSymbol;

    fn next(&mut self) -> Option<Self::Item> {
        match (self.src.next(), self.src.next()) {
            (Some(a), Some(b)) => Some(ReceivedSymbol::new(a, b)),
            (Some(a), None) => {
                warn!("dropping unpaired coded bit {}", a);
                None
            },
            (None, _) => None,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_dibit() {
        let d = Dibit::new(0b10);
        assert_eq!(d.hi(), 1);
        assert_eq!(d.lo(), 0);
        assert_eq!(Dibit::from_pair(0, 1), Dibit::new(0b01));
        assert_eq!(Dibit::from_pair(1, 1).bits(), 0b11);
    }

    #[test]
    #[should_panic]
    fn test_dibit_range() {
        Dibit::new(0b100);
    }

    #[test]
    fn test_symbol() {
        let s = ReceivedSymbol::from(Dibit::new(0b01));
        assert_eq!(s, ReceivedSymbol::new(0, 1));
        assert_eq!(s.erasures(), 0);

        let s = ReceivedSymbol::new(1, 0).with_erasures(false, true);
        assert_eq!(s.erasures(), 1);
        assert!(!s.erased_a);
        assert!(s.erased_b);

        assert_eq!(ReceivedSymbol::erased().erasures(), 2);
        assert_eq!(ReceivedSymbol::scaled(Dibit::new(0b10), 7), ReceivedSymbol::new(7, 0));
    }

    #[test]
    fn test_pairs() {
        let bits = [1, 0, 0, 1, 1, 1];
        let mut p = Pairs::new(bits.iter().cloned());

        assert_eq!(p.next(), Some(ReceivedSymbol::new(1, 0)));
        assert_eq!(p.next(), Some(ReceivedSymbol::new(0, 1)));
        assert_eq!(p.next(), Some(ReceivedSymbol::new(1, 1)));
        assert_eq!(p.next(), None);

        let bits = [1, 0, 1];
        let syms = Pairs::new(bits.iter().cloned()).collect::<Vec<_>>();
        assert_eq!(syms, vec![ReceivedSymbol::new(1, 0)]);
    }
}
