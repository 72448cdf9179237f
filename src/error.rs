//! Errors that may occur when configuring the code or decoding a stream.

use thiserror::Error;

/// Rejected code or decoder configuration.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Error)]
pub enum ConfigError {
    /// Constraint length outside the supported range.
    #[error("constraint length {0} not supported")]
    ConstraintLength(u8),
    /// A generator tap mask selects bits outside the shift register.
    #[error("tap mask {taps:#b} exceeds register of {states} states")]
    TapsOutOfRange { taps: u32, states: usize },
    /// The survivor window must hold at least one step.
    #[error("traceback window is empty")]
    ZeroWindow,
    /// The survivor history for `window` steps of `states` states is too large to hold.
    #[error("window {window} too large for {states} states")]
    WindowTooLarge { window: usize, states: usize },
    /// Soft values must have a nonzero full-scale magnitude.
    #[error("full-scale symbol magnitude is zero")]
    ZeroScale,
    /// A streaming decision delay doesn't fit in the survivor window.
    #[error("decision delay {delay} must be less than window {window}")]
    DelayExceedsWindow { delay: usize, window: usize },
}

/// Decoder runtime errors.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Error)]
pub enum ViterbiError {
    /// The decoder can't be built with the given parameters.
    #[error("invalid configuration: {0}")]
    Configuration(#[from] ConfigError),
    /// Traceback was requested before any symbol reached a finite path metric.
    #[error("no symbols have been processed")]
    NotReady,
    /// Traceback was requested at a horizon whose step isn't in the survivor history.
    /// `oldest..=latest` is the range of horizons that can still be decoded.
    #[error("horizon {requested} outside decodable range {oldest}..={latest}")]
    InvalidHorizon { requested: u64, oldest: u64, latest: u64 },
    /// The survivor window didn't reach back to the start of the stream.
    #[error("traceback covers {available} of {requested} steps")]
    TracebackTruncated { requested: u64, available: u64 },
    /// A traceback walked into a slot tagged with a different step.
    #[error("survivor history for state {state} at step {time} was overwritten")]
    CorruptHistory { time: u64, state: usize },
    /// The window history disagrees with the recorded survivor predecessor.
    #[error("window history disagrees with survivor of state {state} at step {time}")]
    HistoryMismatch { time: u64, state: usize },
}

/// Standard result using `ViterbiError`.
pub type Result<T> = std::result::Result<T, ViterbiError>;

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_config_conversion() {
        let err: ViterbiError = ConfigError::ZeroWindow.into();
        assert_eq!(err, ViterbiError::Configuration(ConfigError::ZeroWindow));
    }

    #[test]
    fn test_display() {
        assert_eq!(ViterbiError::NotReady.to_string(), "no symbols have been processed");
        assert_eq!(
            ConfigError::TapsOutOfRange { taps: 0b1000000, states: 64 }.to_string(),
            "tap mask 0b1000000 exceeds register of 64 states"
        );
        assert_eq!(
            ViterbiError::InvalidHorizon { requested: 12, oldest: 1, latest: 10 }.to_string(),
            "horizon 12 outside decodable range 1..=10"
        );
    }
}
