//! hitimer - hierarchical region timers and tic/toc stopwatches
//!
//! This library measures elapsed wall-clock time across nested, named
//! regions of code. [`HierarchicalTimer`] keeps a call-stack style tree of
//! per-region totals, call counts and percentage-of-parent breakdowns;
//! [`TicTocTimer`] is the flat delta stopwatch for sequential scripts.

pub mod cli;
pub mod clock;
pub mod error;
pub mod hierarchical;
pub mod json_output;
pub mod replay;
pub mod tictoc;

pub use clock::{ClockSource, ManualClock, MonotonicClock};
pub use error::{Result, TimerError};
pub use hierarchical::{HierarchicalTimer, RegionAccumulator, ReportStyle};
pub use tictoc::{tic, toc, TicTocTimer};
