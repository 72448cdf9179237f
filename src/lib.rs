//! Trellis model and truncated Viterbi decoder for a rate-1/2 convolutional code.
//!
//! The code is parameterized by its constraint length and two generator tap masks. The
//! decoder keeps a bounded, time-tagged survivor history so it can run over an unbounded
//! stream of received symbols.

#[macro_use]
extern crate log;

#[cfg(feature = "ser")]
#[macro_use]
extern crate serde_derive;

pub mod bits;
pub mod coding;
pub mod config;
pub mod consts;
pub mod error;
pub mod stats;

pub use bits::{Dibit, ReceivedSymbol};
pub use coding::trellis::{Encoder, Trellis};
pub use coding::viterbi::{StreamDecoder, Traceback, ViterbiDecoder};
pub use config::{DecoderConfig, TieBreak};
pub use error::{ConfigError, Result, ViterbiError};
