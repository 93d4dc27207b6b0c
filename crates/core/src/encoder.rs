//! Quadrature encoder position tracking.
//!
//! The hardware exposes a free-running 16-bit tick counter that wraps
//! modulo 65536. [`PositionTracker`] samples it once per axis-task cycle
//! and folds the raw difference back into the smallest-magnitude signed
//! step, so the accumulated position stays continuous across wraparound.

/// Full range of the hardware counter.
pub const COUNTER_RANGE: i32 = 65_536;

const HALF_RANGE: i32 = COUNTER_RANGE / 2;

/// Free-running 16-bit tick counter seam.
///
/// Platform implementations wrap the quadrature timer peripheral; the sim
/// derives the count from the modeled shaft angle.
pub trait EncoderCounter {
    /// Current raw counter value.
    fn count(&mut self) -> u16;
}

/// One tracker sample: accumulated position plus the folded step that
/// produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct EncoderSample {
    /// Unbounded accumulated tick position, continuous across wraparound.
    pub position: i64,
    /// Signed tick change since the previous sample, after folding.
    pub delta: i32,
}

/// Accumulates a continuous position from raw 16-bit counter samples.
#[derive(Debug, Default)]
pub struct PositionTracker {
    last_raw: u16,
    position: i64,
    delta: i32,
}

impl PositionTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one raw counter reading into the accumulated position.
    ///
    /// The raw difference is reduced by the full counter range whenever it
    /// reaches half the range, recovering the true signed motion: a raw
    /// step of +32768 folds to the negative branch (tie-break), anything
    /// smaller in magnitude passes through unchanged.
    pub fn sample(&mut self, raw: u16) -> EncoderSample {
        let mut delta = raw as i32 - self.last_raw as i32;
        self.last_raw = raw;
        if delta >= HALF_RANGE {
            delta -= COUNTER_RANGE;
        } else if delta <= -HALF_RANGE {
            delta += COUNTER_RANGE;
        }
        self.delta = delta;
        self.position += delta as i64;
        EncoderSample {
            position: self.position,
            delta,
        }
    }

    /// Zero the position, delta and stored raw count.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Accumulated tick position.
    pub fn position(&self) -> i64 {
        self.position
    }

    /// Folded delta of the most recent sample.
    pub fn delta(&self) -> i32 {
        self.delta
    }
}
