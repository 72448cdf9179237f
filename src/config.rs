//! Code and decoder parameters.

use crate::coding::trellis::Trellis;
use crate::consts;
use crate::error::{ConfigError, Result};

/// Rule for choosing between two predecessors that reach a state with equal path
/// metrics.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "ser", derive(Serialize, Deserialize))]
pub enum TieBreak {
    /// Keep the predecessor with the vacated high bit clear.
    LowerPredecessor,
    /// Keep the predecessor with the vacated high bit set.
    HigherPredecessor,
}

impl Default for TieBreak {
    fn default() -> Self { TieBreak::LowerPredecessor }
}

/// Parameters for a `ViterbiDecoder`.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "ser", derive(Serialize, Deserialize))]
pub struct DecoderConfig {
    /// Constraint length K. The register holds K - 1 bits.
    pub constraint_length: u8,
    /// Register bits XORed into the first coded output.
    pub taps_a: u32,
    /// Register bits XORed into the second coded output.
    pub taps_b: u32,
    /// Number of steps kept in the survivor history.
    pub window: usize,
    /// Resolution of equal-cost predecessors.
    pub tie_break: TieBreak,
    /// Received value corresponding to a coded 1. Hard decisions use 1; quantized
    /// reliability values use their maximum level.
    pub full_scale: u8,
}

impl Default for DecoderConfig {
    fn default() -> Self {
        DecoderConfig {
            constraint_length: consts::CONSTRAINT_LENGTH,
            taps_a: consts::TAPS_A,
            taps_b: consts::TAPS_B,
            window: consts::WINDOW,
            tie_break: TieBreak::default(),
            full_scale: consts::HARD_SCALE,
        }
    }
}

impl DecoderConfig {
    /// Use the given constraint length and generator taps.
    pub fn with_code(mut self, constraint_length: u8, taps_a: u32, taps_b: u32) -> Self {
        self.constraint_length = constraint_length;
        self.taps_a = taps_a;
        self.taps_b = taps_b;
        self
    }

    /// Keep the given number of steps of survivor history.
    pub fn with_window(mut self, window: usize) -> Self {
        self.window = window;
        self
    }

    /// Resolve ties with the given rule.
    pub fn with_tie_break(mut self, tie_break: TieBreak) -> Self {
        self.tie_break = tie_break;
        self
    }

    /// Interpret received values as soft magnitudes in `0..=full_scale`.
    pub fn with_full_scale(mut self, full_scale: u8) -> Self {
        self.full_scale = full_scale;
        self
    }

    /// Build the trellis described by the code parameters.
    pub fn trellis(&self) -> Result<Trellis> {
        Trellis::new(self.constraint_length, self.taps_a, self.taps_b)
    }

    /// Check every parameter, returning the trellis on success.
    pub fn validate(&self) -> Result<Trellis> {
        let trellis = self.trellis()?;

        if self.window == 0 {
            return Err(ConfigError::ZeroWindow.into());
        }

        match trellis.states().checked_mul(self.window) {
            Some(n) if n <= consts::MAX_HISTORY => {},
            _ => return Err(ConfigError::WindowTooLarge {
                window: self.window,
                states: trellis.states(),
            }.into()),
        }

        if self.full_scale == 0 {
            return Err(ConfigError::ZeroScale.into());
        }

        Ok(trellis)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::error::ViterbiError;

    #[test]
    fn test_defaults() {
        let c = DecoderConfig::default();
        assert_eq!(c.constraint_length, 7);
        assert_eq!(c.taps_a, 0b110110);
        assert_eq!(c.taps_b, 0b100111);
        assert_eq!(c.window, 1000);
        assert_eq!(c.tie_break, TieBreak::LowerPredecessor);
        assert_eq!(c.full_scale, 1);

        let t = c.validate().unwrap();
        assert_eq!(t.states(), 64);
    }

    #[test]
    fn test_builders() {
        let c = DecoderConfig::default()
            .with_code(5, 0b1011, 0b0111)
            .with_window(32)
            .with_tie_break(TieBreak::HigherPredecessor)
            .with_full_scale(7);

        assert_eq!(c.constraint_length, 5);
        assert_eq!(c.taps_a, 0b1011);
        assert_eq!(c.taps_b, 0b0111);
        assert_eq!(c.window, 32);
        assert_eq!(c.tie_break, TieBreak::HigherPredecessor);
        assert_eq!(c.full_scale, 7);
        assert_eq!(c.validate().unwrap().states(), 16);
    }

    #[test]
    fn test_rejects() {
        assert_eq!(
            DecoderConfig::default().with_window(0).validate().unwrap_err(),
            ViterbiError::Configuration(ConfigError::ZeroWindow)
        );
        assert_eq!(
            DecoderConfig::default().with_full_scale(0).validate().unwrap_err(),
            ViterbiError::Configuration(ConfigError::ZeroScale)
        );
        assert_eq!(
            DecoderConfig::default().with_code(1, 0, 0).validate().unwrap_err(),
            ViterbiError::Configuration(ConfigError::ConstraintLength(1))
        );
        assert_eq!(
            DecoderConfig::default().with_code(17, 1, 1).validate().unwrap_err(),
            ViterbiError::Configuration(ConfigError::ConstraintLength(17))
        );
        assert_eq!(
            DecoderConfig::default().with_code(7, 0b1000000, 1).validate().unwrap_err(),
            ViterbiError::Configuration(ConfigError::TapsOutOfRange {
                taps: 0b1000000,
                states: 64,
            })
        );
    }

    #[test]
    fn test_window_limit() {
        assert_eq!(
            DecoderConfig::default().with_window(usize::MAX / 2).validate().unwrap_err(),
            ViterbiError::Configuration(ConfigError::WindowTooLarge {
                window: usize::MAX / 2,
                states: 64,
            })
        );
        assert_eq!(
            DecoderConfig::default().with_window(consts::MAX_HISTORY / 32).validate().unwrap_err(),
            ViterbiError::Configuration(ConfigError::WindowTooLarge {
                window: consts::MAX_HISTORY / 32,
                states: 64,
            })
        );
        assert!(DecoderConfig::default().with_window(consts::MAX_HISTORY / 64).validate().is_ok());
        assert!(DecoderConfig::default()
            .with_code(16, 1, 1)
            .with_window(2048)
            .validate()
            .is_ok());
    }
}
