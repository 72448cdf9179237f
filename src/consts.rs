/// Default constraint length, giving a 6-bit register and 64 trellis states.
pub const CONSTRAINT_LENGTH: u8 = 7;
/// Smallest supported constraint length.
pub const MIN_CONSTRAINT_LENGTH: u8 = 2;
/// Largest supported constraint length (32768 states).
pub const MAX_CONSTRAINT_LENGTH: u8 = 16;
/// Default taps for the first coded output: register bits 5, 4, 2, 1.
pub const TAPS_A: u32 = 0b110110;
/// Default taps for the second coded output: register bits 5, 2, 1, 0.
pub const TAPS_B: u32 = 0b100111;
/// Default number of steps kept in the survivor history.
pub const WINDOW: usize = 1000;
/// Largest survivor history, in entries of one state at one step.
pub const MAX_HISTORY: usize = 1 << 26;
/// Full-scale magnitude of a hard-decision symbol component.
pub const HARD_SCALE: u8 = 1;
