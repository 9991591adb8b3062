//! Append-only value histories keyed by timepoint.

use crate::error::TokenError;
use tessera_types::{Amount, Timepoint};

/// A value recorded at a timepoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Checkpoint {
    pub timepoint: Timepoint,
    pub value: Amount,
}

/// Ordered history of checkpoints.
///
/// Timepoints are strictly increasing. A write at the timepoint of the last
/// entry replaces that entry's value; earlier entries are never touched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Checkpoints {
    entries: Vec<Checkpoint>,
}

impl Checkpoints {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `value` at `timepoint`.
    ///
    /// # Errors
    /// `StaleTimepoint` if `timepoint` is before the last recorded one.
    pub fn push(&mut self, timepoint: Timepoint, value: Amount) -> Result<(), TokenError> {
        match self.entries.last_mut() {
            Some(last) if last.timepoint > timepoint => Err(TokenError::StaleTimepoint {
                timepoint,
                latest: last.timepoint,
            }),
            Some(last) if last.timepoint == timepoint => {
                last.value = value;
                Ok(())
            }
            _ => {
                self.entries.push(Checkpoint { timepoint, value });
                Ok(())
            }
        }
    }

    /// Most recent value, 0 if empty.
    pub fn latest(&self) -> Amount {
        self.entries.last().map_or(0, |c| c.value)
    }

    /// Value of the checkpoint with the greatest timepoint `<= timepoint`,
    /// 0 if there is none.
    pub fn upper_lookup(&self, timepoint: Timepoint) -> Amount {
        let idx = self.entries.partition_point(|c| c.timepoint <= timepoint);
        if idx == 0 {
            0
        } else {
            self.entries[idx - 1].value
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Checkpoint> {
        self.entries.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Checkpoint> {
        self.entries.iter()
    }
}
