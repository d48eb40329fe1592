// Per-region accumulator for the hierarchical timer
//
// One node of the timing tree. Owns its children outright; the path that
// leads to a node is reconstructed from the timer's stack, so there are no
// back references.

use crate::error::{Result, TimerError};
use std::collections::HashMap;

/// Accumulated timing for one named region at one position in the tree
#[derive(Debug, Clone, Default)]
pub struct RegionAccumulator {
    /// Seconds accumulated over all completed start/stop cycles
    total_time: f64,

    /// Number of completed start/stop cycles
    call_count: u64,

    /// Clock reading at the unmatched start, if running
    pending_start: Option<f64>,

    /// Child regions in first-start order
    children: Vec<(String, RegionAccumulator)>,

    /// Child name -> position in `children`
    index: HashMap<String, usize>,
}

impl RegionAccumulator {
    /// Create an idle accumulator with no recorded time
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `now` as the start of a new interval
    ///
    /// Fails if an interval is already in flight.
    pub fn start_increment(&mut self, now: f64) -> Result<()> {
        if self.pending_start.is_some() {
            return Err(TimerError::InvalidState(
                "start_increment called on a running region",
            ));
        }
        self.pending_start = Some(now);
        Ok(())
    }

    /// Close the in-flight interval at `now` and fold it into the totals
    ///
    /// Fails if no interval is in flight.
    pub fn stop_increment(&mut self, now: f64) -> Result<()> {
        let started = self.pending_start.take().ok_or(TimerError::InvalidState(
            "stop_increment called on an idle region",
        ))?;
        self.total_time += now - started;
        self.call_count += 1;
        Ok(())
    }

    pub fn total_time(&self) -> f64 {
        self.total_time
    }

    pub fn call_count(&self) -> u64 {
        self.call_count
    }

    /// Whether an interval is currently in flight
    pub fn is_running(&self) -> bool {
        self.pending_start.is_some()
    }

    /// Mean seconds per completed cycle, NaN before the first cycle completes
    pub fn average_time(&self) -> f64 {
        if self.call_count > 0 {
            self.total_time / self.call_count as f64
        } else {
            f64::NAN
        }
    }

    /// Children in the order they were first started
    pub fn children(&self) -> impl Iterator<Item = (&str, &RegionAccumulator)> {
        self.children.iter().map(|(name, acc)| (name.as_str(), acc))
    }

    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }

    pub fn child(&self, name: &str) -> Option<&RegionAccumulator> {
        self.index.get(name).map(|&i| &self.children[i].1)
    }

    pub(crate) fn child_mut(&mut self, name: &str) -> Option<&mut RegionAccumulator> {
        let i = self.index.get(name).copied()?;
        Some(&mut self.children[i].1)
    }

    /// Child `name`, created idle if this is its first use
    pub(crate) fn child_or_insert(&mut self, name: &str) -> &mut RegionAccumulator {
        let i = match self.index.get(name).copied() {
            Some(i) => i,
            None => {
                let i = self.children.len();
                self.children.push((name.to_string(), RegionAccumulator::new()));
                self.index.insert(name.to_string(), i);
                i
            }
        };
        &mut self.children[i].1
    }

    /// Sum of the direct children's totals
    pub fn children_time(&self) -> f64 {
        self.children.iter().map(|(_, acc)| acc.total_time).sum()
    }

    /// Time in this region not covered by any direct child
    ///
    /// `None` when there are no children to compare against.
    pub fn other_time(&self) -> Option<f64> {
        if self.has_children() {
            Some(self.total_time - self.children_time())
        } else {
            None
        }
    }

    /// `part` as a percentage of this region's total, 0.0 when the total is zero
    pub fn percent_of_total(&self, part: f64) -> f64 {
        if self.total_time == 0.0 {
            0.0
        } else {
            part / self.total_time * 100.0
        }
    }
}
