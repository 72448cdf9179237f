//! Decodes a received symbol stream to the most likely input bit sequence using the
//! truncated Viterbi algorithm.
//!
//! Each received symbol advances every state's path metric by one add-compare-select step
//! and records the winning transition in a fixed-size survivor ring. A traceback picks
//! the cheapest state at some horizon and follows the recorded predecessors back as far
//! as the ring reaches.

use std::collections::VecDeque;
use std::mem;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::bits::ReceivedSymbol;
use crate::coding::history::{Survivor, SurvivorStore, WindowHistory};
use crate::coding::metric::BranchMetrics;
use crate::coding::trellis::Trellis;
use crate::coding::Metric;
use crate::config::{DecoderConfig, TieBreak};
use crate::error::{ConfigError, Result, ViterbiError};
use crate::stats::{DecoderStats, HasStats};

/// Decoder lifecycle.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "ser", derive(Serialize, Deserialize))]
pub enum Phase {
    /// Symbols are being applied and nothing has been decoded since the last one.
    Accumulating,
    /// A traceback has been taken since the last symbol.
    Drained,
}

/// Result of walking the survivor history back from a horizon.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "ser", derive(Serialize, Deserialize))]
pub struct Traceback<M> {
    /// Step of the first decoded bit.
    pub start: u64,
    /// Horizon the walk began at, one past the step of the last decoded bit.
    pub end: u64,
    /// State the walk began at.
    pub state: usize,
    /// Path metric of that state at the horizon.
    pub cost: M,
    /// Decoded bits for steps `start..end`, in order.
    pub bits: Vec<u8>,
}

impl<M> Traceback<M> {
    /// Whether the survivor window cut the walk short of the first step.
    pub fn truncated(&self) -> bool { self.start > 0 }
}

/// Read-only view of the path metrics at the current step.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "ser", derive(Serialize, Deserialize))]
pub struct Snapshot<M> {
    /// Number of steps applied.
    pub time: u64,
    /// Current lifecycle phase.
    pub phase: Phase,
    /// Path metric of each state.
    pub costs: Vec<M>,
    /// Cheapest reachable state and its path metric.
    pub best: Option<(usize, M)>,
}

/// Truncated Viterbi decoder over a configurable rate-1/2 trellis.
pub struct ViterbiDecoder<M: Metric = u32> {
    config: DecoderConfig,
    trellis: Trellis,
    /// Branch metrics for the symbol being applied.
    metrics: BranchMetrics<M>,
    /// Path metrics as of the latest step.
    costs: Vec<M>,
    /// Buffer the next step's path metrics are written into before swapping.
    next: Vec<M>,
    survivors: SurvivorStore<M>,
    window: WindowHistory,
    /// Number of symbols applied.
    time: u64,
    phase: Phase,
    stats: DecoderStats,
}

impl<M: Metric> ViterbiDecoder<M> {
    /// Construct a new `ViterbiDecoder` at the all-zero starting state.
    pub fn new(config: DecoderConfig) -> Result<ViterbiDecoder<M>> {
        let trellis = config.validate()?;
        let states = trellis.states();

        debug!("decoder for K={} ({} states), window {}",
               trellis.constraint(), states, config.window);

        Ok(ViterbiDecoder {
            config: config,
            trellis: trellis,
            metrics: BranchMetrics::new(&trellis),
            costs: initial_costs(states),
            next: vec![M::infinity(); states],
            survivors: SurvivorStore::new(states, config.window),
            window: WindowHistory::new(states, config.window),
            time: 0,
            phase: Phase::Accumulating,
            stats: DecoderStats::default(),
        })
    }

    /// Parameters the decoder was built with.
    pub fn config(&self) -> &DecoderConfig { &self.config }

    /// Trellis being decoded.
    pub fn trellis(&self) -> &Trellis { &self.trellis }

    /// Number of symbols applied since construction or the last reset.
    pub fn time(&self) -> u64 { self.time }

    /// Current lifecycle phase.
    pub fn phase(&self) -> Phase { self.phase }

    /// Path metric of each state as of the latest step.
    pub fn costs(&self) -> &[M] { &self.costs[..] }

    /// Capture the current path metrics.
    pub fn snapshot(&self) -> Snapshot<M> {
        Snapshot {
            time: self.time,
            phase: self.phase,
            costs: self.costs.clone(),
            best: cheapest(self.costs.iter().cloned()),
        }
    }

    /// Get the survivor into the given state at the given step, if still retained.
    pub fn survivor(&self, state: usize, time: u64) -> Option<Survivor<M>> {
        self.survivors.lookup(state, time).cloned()
    }

    /// Get the register bit vacated by the survivor into the given state at the given
    /// step, if still retained.
    pub fn window_bit(&self, state: usize, time: u64) -> Option<u8> {
        self.survivors.lookup(state, time).map(|_| self.window.get(time, state))
    }

    /// Earliest step still held in the survivor history.
    fn oldest(&self) -> u64 { self.survivors.oldest(self.time) }

    /// Return to the all-zero starting state and forget all history.
    pub fn reset(&mut self) {
        debug!("reset after {} steps", self.time);

        self.costs = initial_costs(self.trellis.states());
        self.survivors.reset();
        self.window.reset();
        self.time = 0;
        self.phase = Phase::Accumulating;
    }

    /// Apply the given received symbol, advancing every state's path metric by one step.
    pub fn step(&mut self, sym: ReceivedSymbol) {
        let time = self.time;

        self.metrics.compute(sym, self.config.full_scale);

        let acs = Acs {
            trellis: &self.trellis,
            metrics: &self.metrics,
            prev: &self.costs[..],
            tie_break: self.config.tie_break,
            time: time,
        };

        let row = self.survivors.row_mut(time);
        let ties = acs.run(&mut self.next[..], row);

        for (state, s) in row.iter().enumerate() {
            self.window.record(time, state, self.trellis.aged_out(s.from));
        }

        mem::swap(&mut self.costs, &mut self.next);

        self.time += 1;
        self.phase = Phase::Accumulating;
        self.stats.record_step(sym.erasures(), ties);

        if log_enabled!(log::Level::Trace) {
            trace!("step {}: best {:?}, {} ties", time, cheapest(self.costs.iter().cloned()),
                   ties);
        }

        if self.costs.iter().all(|&c| c == M::infinity()) {
            warn!("every path metric saturated at step {}", time);
        }
    }

    /// Get the cheapest state at the given horizon, preferring the lowest-numbered state
    /// among equals.
    pub fn best(&self, horizon: u64) -> Result<(usize, M)> {
        self.check_horizon(horizon)?;

        let step = horizon - 1;
        let mut costs = Vec::with_capacity(self.trellis.states());

        for state in 0..self.trellis.states() {
            costs.push(self.entry(state, step)?.cost);
        }

        cheapest(costs.into_iter()).ok_or(ViterbiError::NotReady)
    }

    /// Walk back from the cheapest state at the given horizon over every retained step.
    pub fn traceback(&self, horizon: u64) -> Result<Traceback<M>> {
        let (state, _) = self.best(horizon)?;
        self.traceback_from(horizon, state)
    }

    /// Walk back from the given state at the given horizon over every retained step.
    pub fn traceback_from(&self, horizon: u64, state: usize) -> Result<Traceback<M>> {
        self.check_horizon(horizon)?;
        assert!(state < self.trellis.states());

        let cost = self.entry(state, horizon - 1)?.cost;
        let start = self.oldest();
        let bits = self.walk(horizon, state, (horizon - start) as usize)?;

        if start > 0 {
            debug!("traceback from {} truncated to {} steps", horizon, bits.len());
        }

        Ok(Traceback {
            start: start,
            end: horizon,
            state: state,
            cost: cost,
            bits: bits,
        })
    }

    /// Decode the bits leading up to the given horizon. If the horizon is further back
    /// than the survivor window, only the retained steps are decoded.
    pub fn decode(&mut self, horizon: u64) -> Result<Vec<u8>> {
        let tb = self.traceback(horizon)?;
        self.drain(&tb);

        Ok(tb.bits)
    }

    /// Decode every bit up to the given horizon, failing if the survivor window no longer
    /// reaches the first step.
    pub fn decode_exact(&mut self, horizon: u64) -> Result<Vec<u8>> {
        let tb = self.traceback(horizon)?;
        self.drain(&tb);

        if tb.truncated() {
            return Err(ViterbiError::TracebackTruncated {
                requested: horizon,
                available: horizon - tb.start,
            });
        }

        Ok(tb.bits)
    }

    /// Decode a stream that was terminated by flushing the encoder back to the zero
    /// state, dropping the flush bits.
    pub fn decode_flushed(&mut self) -> Result<Vec<u8>> {
        let tb = self.traceback_from(self.time, 0)?;
        self.drain(&tb);

        let flush = self.trellis.constraint() as usize - 1;
        let mut bits = tb.bits;
        let keep = bits.len().saturating_sub(flush);
        bits.truncate(keep);

        Ok(bits)
    }

    /// Decode a complete block of symbols from a fresh start.
    pub fn decode_block(&mut self, symbols: &[ReceivedSymbol]) -> Result<Vec<u8>> {
        self.reset();
        self.extend(symbols.iter().cloned());

        let now = self.time;
        self.decode(now)
    }

    /// Verify every retained survivor against the window history, rebuilding each
    /// predecessor from the destination state and the bit it vacated.
    pub fn cross_check(&self) -> Result<()> {
        let high = self.trellis.high_bit();

        for time in self.oldest()..self.time {
            for state in 0..self.trellis.states() {
                let entry = self.entry(state, time)?;
                let vacated = if self.window.get(time, state) == 1 { high } else { 0 };

                if (state >> 1 | vacated) != entry.from {
                    return Err(ViterbiError::HistoryMismatch {
                        time: time,
                        state: state,
                    });
                }
            }
        }

        Ok(())
    }

    fn check_horizon(&self, horizon: u64) -> Result<()> {
        if self.time == 0 {
            return Err(ViterbiError::NotReady);
        }

        let oldest = self.oldest();

        if horizon == 0 || horizon > self.time || horizon <= oldest {
            return Err(ViterbiError::InvalidHorizon {
                requested: horizon,
                oldest: oldest + 1,
                latest: self.time,
            });
        }

        Ok(())
    }

    fn entry(&self, state: usize, time: u64) -> Result<&Survivor<M>> {
        self.survivors.lookup(state, time).ok_or(ViterbiError::CorruptHistory {
            time: time,
            state: state,
        })
    }

    /// Follow survivors back `depth` steps from the given state at the given horizon and
    /// return the decoded bits in order.
    fn walk(&self, horizon: u64, mut state: usize, depth: usize) -> Result<Vec<u8>> {
        let mut bits = Vec::with_capacity(depth);

        for time in (horizon - depth as u64..horizon).rev() {
            let entry = self.entry(state, time)?;

            bits.push(entry.bit);
            state = entry.from;
        }

        bits.reverse();

        Ok(bits)
    }

    fn drain(&mut self, tb: &Traceback<M>) {
        self.stats.record_traceback(tb.truncated());
        self.phase = Phase::Drained;
    }
}

impl<M: Metric> Extend<ReceivedSymbol> for ViterbiDecoder<M> {
    fn extend<I: IntoIterator<Item = ReceivedSymbol>>(&mut self, iter: I) {
        for sym in iter {
            self.step(sym);
        }
    }
}

impl<M: Metric> HasStats for ViterbiDecoder<M> {
    fn stats(&mut self) -> &mut DecoderStats { &mut self.stats }
}

/// Path metrics of a decoder that knows it starts in state 0.
fn initial_costs<M: Metric>(states: usize) -> Vec<M> {
    (0..states).map(|s| if s == 0 { M::zero() } else { M::infinity() }).collect()
}

/// Find the cheapest finite cost, preferring the lowest index among equals.
fn cheapest<M: Metric, I: Iterator<Item = M>>(costs: I) -> Option<(usize, M)> {
    costs.enumerate().fold(None, |best, (s, c)| match best {
        _ if c == M::infinity() => best,
        Some((_, min)) if min <= c => best,
        _ => Some((s, c)),
    })
}

/// Add-compare-select over one step, reading only the previous step's path metrics.
struct Acs<'a, M: Metric> {
    trellis: &'a Trellis,
    metrics: &'a BranchMetrics<M>,
    prev: &'a [M],
    tie_break: TieBreak,
    time: u64,
}

impl<'a, M: Metric> Acs<'a, M> {
    /// Select the survivor into the given state and whether it won a tie.
    fn select(&self, dest: usize) -> (Survivor<M>, bool) {
        let [lo, hi] = self.trellis.predecessors(dest);

        let candidate = |(from, bit): (usize, u8)| {
            let metric = self.metrics.get(from, bit);
            (from, bit, metric, self.prev[from].saturating_add(metric))
        };

        let lo = candidate(lo);
        let hi = candidate(hi);

        let tie = lo.3 == hi.3 && lo.3 != M::infinity();
        let take_hi = hi.3 < lo.3 || (hi.3 == lo.3 && self.tie_break == TieBreak::HigherPredecessor);
        let (from, bit, metric, cost) = if take_hi { hi } else { lo };

        (Survivor {
            from: from,
            bit: bit,
            metric: metric,
            cost: cost,
            time: self.time,
            committed: true,
        }, tie)
    }

    fn commit(&self, dest: usize, cost: &mut M, entry: &mut Survivor<M>) -> usize {
        let (survivor, tie) = self.select(dest);

        *cost = survivor.cost;
        *entry = survivor;

        tie as usize
    }

    /// Fill the next path metrics and survivor row, returning the number of ties.
    #[cfg(not(feature = "parallel"))]
    fn run(&self, next: &mut [M], row: &mut [Survivor<M>]) -> usize {
        next.iter_mut()
            .zip(row.iter_mut())
            .enumerate()
            .map(|(dest, (cost, entry))| self.commit(dest, cost, entry))
            .sum()
    }

    /// Fill the next path metrics and survivor row, returning the number of ties.
    #[cfg(feature = "parallel")]
    fn run(&self, next: &mut [M], row: &mut [Survivor<M>]) -> usize {
        next.par_iter_mut()
            .zip(row.par_iter_mut())
            .enumerate()
            .map(|(dest, (cost, entry))| self.commit(dest, cost, entry))
            .sum()
    }
}

/// Decodes a symbol stream bit by bit, committing to each bit a fixed number of steps
/// after its symbol arrives.
pub struct StreamDecoder<T, M = u32> where
    T: Iterator<Item = ReceivedSymbol>, M: Metric
{
    decoder: ViterbiDecoder<M>,
    /// Source of received symbols.
    src: T,
    /// Steps to wait before committing a bit.
    delay: usize,
    /// Decoded bits waiting to be yielded.
    pending: VecDeque<u8>,
    /// Step whose bit is queued next. Starts at the decoder's step count, so a decoder
    /// that already has history only yields bits for symbols taken from `src`.
    queued: u64,
    done: bool,
}

impl<T, M> StreamDecoder<T, M> where
    T: Iterator<Item = ReceivedSymbol>, M: Metric
{
    /// Construct a new `StreamDecoder` over the given source, committing each bit after
    /// `delay` further symbols. The delay must fit in the decoder's survivor window.
    pub fn new(decoder: ViterbiDecoder<M>, src: T, delay: usize) -> Result<Self> {
        let window = decoder.config().window;

        if delay >= window {
            return Err(ConfigError::DelayExceedsWindow {
                delay: delay,
                window: window,
            }.into());
        }

        let queued = decoder.time();

        Ok(StreamDecoder {
            decoder: decoder,
            src: src,
            delay: delay,
            pending: VecDeque::new(),
            queued: queued,
            done: false,
        })
    }

    /// Underlying decoder.
    pub fn decoder(&self) -> &ViterbiDecoder<M> { &self.decoder }

    /// Consume the stream, returning the underlying decoder.
    pub fn into_inner(self) -> ViterbiDecoder<M> { self.decoder }

    fn fill(&mut self) -> Result<()> {
        let sym = match self.src.next() {
            Some(sym) => sym,
            None => return self.flush(),
        };

        self.decoder.step(sym);

        let now = self.decoder.time();

        if now - self.queued > self.delay as u64 {
            let (state, _) = self.decoder.best(now)?;
            let bits = self.decoder.walk(now, state, self.delay + 1)?;

            self.pending.push_back(bits[0]);
            self.queued += 1;
        }

        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        self.done = true;

        let now = self.decoder.time();

        if now == self.queued {
            return Ok(());
        }

        let tb = self.decoder.traceback(now)?;
        self.decoder.drain(&tb);

        let skip = (self.queued - tb.start) as usize;
        self.pending.extend(tb.bits[skip..].iter().cloned());
        self.queued = now;

        Ok(())
    }
}

impl<T, M> Iterator for StreamDecoder<T, M> where
    T: Iterator<Item = ReceivedSymbol>, M: Metric
{
    type Item = Result<u8>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(bit) = self.pending.pop_front() {
                return Some(Ok(bit));
            }

            if self.done {
                return None;
            }

            if let Err(e) = self.fill() {
                self.done = true;
                return Some(Err(e));
            }
        }
    }
}
