// Stack-driven hierarchical timer
//
// The stack holds the names of the open regions, outermost first. Every
// start/stop walks the tree from the implicit root through those names to
// find the accumulator it acts on, so the same name under two different
// parents is always two different accumulators.

use super::accumulator::RegionAccumulator;
use super::report::{self, ReportStyle};
use crate::clock::{ClockSource, MonotonicClock};
use crate::error::{Result, TimerError};
use crate::json_output::JsonReport;
use std::fmt;

/// Tree of named, strictly nested timing regions
///
/// # Example
/// ```
/// use hitimer::{HierarchicalTimer, ManualClock};
///
/// let clock = ManualClock::new();
/// let mut timer = HierarchicalTimer::with_clock(clock.clone());
///
/// timer.start("solve").unwrap();
/// timer.start("setup").unwrap();
/// clock.advance(1.0);
/// timer.stop("setup").unwrap();
/// clock.advance(3.0);
/// timer.stop("solve").unwrap();
///
/// let setup = timer.region(&["solve", "setup"]).unwrap();
/// assert_eq!(setup.call_count(), 1);
/// assert_eq!(timer.region(&["solve"]).unwrap().total_time(), 4.0);
/// ```
#[derive(Debug, Clone)]
pub struct HierarchicalTimer<C: ClockSource = MonotonicClock> {
    clock: C,
    /// Implicit root; never started, its children are the top-level regions
    root: RegionAccumulator,
    /// Open regions, outermost first
    stack: Vec<String>,
}

impl HierarchicalTimer<MonotonicClock> {
    /// Create an empty timer on the monotonic clock
    pub fn new() -> Self {
        Self::with_clock(MonotonicClock::new())
    }
}

impl Default for HierarchicalTimer<MonotonicClock> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: ClockSource> HierarchicalTimer<C> {
    /// Create an empty timer reading time from `clock`
    pub fn with_clock(clock: C) -> Self {
        Self {
            clock,
            root: RegionAccumulator::new(),
            stack: Vec::new(),
        }
    }

    /// Open region `name` inside the innermost open region
    ///
    /// The accumulator for that path is created on first use.
    pub fn start(&mut self, name: &str) -> Result<()> {
        let now = self.clock.now();

        let mut node = &mut self.root;
        for open in &self.stack {
            node = node
                .child_mut(open)
                .ok_or_else(|| TimerError::NotFound(open.clone()))?;
        }
        node.child_or_insert(name).start_increment(now)?;

        self.stack.push(name.to_string());
        tracing::trace!(region = name, depth = self.stack.len(), "region started");
        Ok(())
    }

    /// Close region `name`, which must be the innermost open region
    ///
    /// A mismatch leaves the stack untouched.
    pub fn stop(&mut self, name: &str) -> Result<()> {
        if self.stack.last().map(String::as_str) != Some(name) {
            return Err(TimerError::MismatchedTimer {
                expected: self.stack.last().cloned(),
                found: name.to_string(),
            });
        }
        let now = self.clock.now();
        self.stack.pop();

        let mut node = &mut self.root;
        for open in &self.stack {
            node = node
                .child_mut(open)
                .ok_or_else(|| TimerError::NotFound(open.clone()))?;
        }
        node.child_mut(name)
            .ok_or_else(|| TimerError::NotFound(name.to_string()))?
            .stop_increment(now)?;

        tracing::trace!(region = name, depth = self.stack.len(), "region stopped");
        Ok(())
    }

    /// Run `f` inside region `name`
    ///
    /// # Example
    /// ```
    /// use hitimer::HierarchicalTimer;
    ///
    /// let mut timer = HierarchicalTimer::new();
    /// let value = timer.measure("work", || 6 * 7).unwrap();
    /// assert_eq!(value, 42);
    /// assert_eq!(timer.region(&["work"]).unwrap().call_count(), 1);
    /// ```
    pub fn measure<F, R>(&mut self, name: &str, f: F) -> Result<R>
    where
        F: FnOnce() -> R,
    {
        self.start(name)?;
        let result = f();
        self.stop(name)?;
        Ok(result)
    }

    /// Discard every region and the open-region stack
    ///
    /// Open regions are dropped without being stopped.
    pub fn reset(&mut self) {
        if !self.stack.is_empty() {
            tracing::warn!(
                open = ?self.stack,
                "resetting hierarchical timer with open regions; their partial time is discarded"
            );
        }
        self.root = RegionAccumulator::new();
        self.stack.clear();
        tracing::debug!("hierarchical timer reset");
    }

    /// Report in the default fixed-width layout
    pub fn report(&self) -> String {
        self.report_with(&ReportStyle::default())
    }

    /// Report using a custom column layout
    pub fn report_with(&self, style: &ReportStyle) -> String {
        report::render(&self.root, style)
    }

    /// Serializable view of the whole tree
    pub fn snapshot(&self) -> JsonReport {
        JsonReport::from_tree(&self.root, &self.stack)
    }

    /// Current nesting depth
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    /// Names of the open regions, outermost first
    pub fn open_regions(&self) -> &[String] {
        &self.stack
    }

    /// Accumulator at `path` from the top level, if it has been started
    pub fn region(&self, path: &[&str]) -> Option<&RegionAccumulator> {
        let (first, rest) = path.split_first()?;
        let mut node = self.root.child(first)?;
        for name in rest {
            node = node.child(name)?;
        }
        Some(node)
    }

    /// Top-level regions in first-start order
    pub fn regions(&self) -> impl Iterator<Item = (&str, &RegionAccumulator)> {
        self.root.children()
    }

    pub fn is_empty(&self) -> bool {
        !self.root.has_children()
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }
}

impl<C: ClockSource> fmt::Display for HierarchicalTimer<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.report())
    }
}
