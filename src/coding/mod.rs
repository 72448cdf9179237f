//! Encoding and decoding of the rate-1/2 convolutional code.

use std::fmt::Debug;

use num::traits::{NumCast, PrimInt, Unsigned};

pub mod history;
pub mod metric;
pub mod trellis;
pub mod viterbi;

/// Unsigned integer type used to accumulate branch and path metrics. The maximum value
/// stands for an unreachable state and all additions saturate.
pub trait Metric: PrimInt + Unsigned + Debug + Send + Sync {
    /// Path metric of a state that hasn't been reached.
    fn infinity() -> Self { Self::max_value() }

    /// Convert the given distance, saturating if it doesn't fit.
    fn from_distance(dist: u32) -> Self {
        <Self as NumCast>::from(dist).unwrap_or_else(Self::infinity)
    }
}

impl<T: PrimInt + Unsigned + Debug + Send + Sync> Metric for T {}

#[cfg(test)]
mod test {
    use super::*;
    use num::traits::Saturating;

    #[test]
    fn test_metric() {
        assert_eq!(<u8 as Metric>::infinity(), 255);
        assert_eq!(u8::from_distance(12), 12);
        assert_eq!(u8::from_distance(300), 255);
        assert_eq!(u32::from_distance(300), 300);
        assert_eq!(Saturating::saturating_add(250u8, 10), 255);
    }
}
