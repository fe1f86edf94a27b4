//! Update-count schedules: the animation sweep and the rearrangement cadence.
use serde::{Deserialize, Serialize};

use crate::error::PlotError;

/// Arithmetic sequence of update counts visited by an animation.
///
/// Follows half-open range semantics unless `include_end` is set, in which
/// case `end` is visited too whenever it lies on the step grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sweep {
    start: u64,
    end: u64,
    step: u64,
    include_end: bool,
}

impl Sweep {
    pub fn new(start: u64, end: u64, step: u64, include_end: bool) -> Result<Self, PlotError> {
        if step == 0 || end < start {
            return Err(PlotError::InvalidSweep { start, end, step });
        }
        Ok(Self {
            start,
            end,
            step,
            include_end,
        })
    }

    pub fn len(&self) -> usize {
        let span = self.end - self.start;
        let full_steps = span / self.step;
        let on_grid = span % self.step == 0;
        let count = if on_grid && !self.include_end {
            full_steps
        } else {
            full_steps + 1
        };
        count as usize
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn iter(&self) -> SweepIter {
        SweepIter {
            next: self.start,
            remaining: self.len(),
            step: self.step,
        }
    }
}

impl IntoIterator for Sweep {
    type Item = u64;
    type IntoIter = SweepIter;

    fn into_iter(self) -> SweepIter {
        self.iter()
    }
}

#[derive(Debug, Clone)]
pub struct SweepIter {
    next: u64,
    remaining: usize,
    step: u64,
}

impl Iterator for SweepIter {
    type Item = u64;

    fn next(&mut self) -> Option<u64> {
        if self.remaining == 0 {
            return None;
        }
        let current = self.next;
        self.remaining -= 1;
        self.next = self.next.saturating_add(self.step);
        Some(current)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for SweepIter {}

/// Periodic reorganisation events of the upstream estimator.
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct RearrangementCadence {
    pub start: u64,
    pub period: u64,
}

impl RearrangementCadence {
    pub fn validate(&self) -> Result<(), PlotError> {
        if self.period == 0 {
            return Err(PlotError::InvalidCadence {
                start: self.start,
                period: self.period,
            });
        }
        Ok(())
    }

    /// Every `start + k * period` (k >= 0) inside `[count_min, count_max]`.
    pub fn markers(&self, count_min: u64, count_max: u64) -> Result<Vec<u64>, PlotError> {
        self.validate()?;
        let mut markers = Vec::new();
        let mut count = self.start;
        while count <= count_max {
            if count >= count_min {
                markers.push(count);
            }
            match count.checked_add(self.period) {
                Some(next) => count = next,
                None => break,
            }
        }
        Ok(markers)
    }
}
