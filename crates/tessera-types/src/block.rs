//! Block context handed to every state-changing operation.
//!
//! Voting uses block numbers as its clock (snapshots, deadlines, checkpoints),
//! the timelock uses block timestamps in seconds.

/// A point on either clock.
pub type Timepoint = u64;

/// The block a call is admitted in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BlockContext {
    /// Block height
    pub number: Timepoint,
    /// Block timestamp (seconds)
    pub timestamp: Timepoint,
}

impl BlockContext {
    pub const fn new(number: Timepoint, timestamp: Timepoint) -> Self {
        Self { number, timestamp }
    }

    /// The block following this one, `block_time` seconds later.
    pub fn next(&self, block_time: u64) -> Self {
        Self {
            number: self.number.saturating_add(1),
            timestamp: self.timestamp.saturating_add(block_time),
        }
    }

    /// Same height, clock moved forward by `seconds`.
    pub fn with_time_increased(&self, seconds: u64) -> Self {
        Self {
            number: self.number,
            timestamp: self.timestamp.saturating_add(seconds),
        }
    }
}
