//! Error types for region timers and tic/toc stopwatches
//!
//! Every variant is a contract violation by the caller (or internal
//! corruption). None of them are retried or suppressed; they propagate
//! straight back to whoever issued the offending call.

use thiserror::Error;

/// Errors raised by [`HierarchicalTimer`](crate::HierarchicalTimer),
/// [`RegionAccumulator`](crate::RegionAccumulator) and
/// [`TicTocTimer`](crate::TicTocTimer)
#[derive(Error, Debug)]
pub enum TimerError {
    /// An accumulator was asked for a transition its state does not allow
    #[error("Invalid state transition: {0}")]
    InvalidState(&'static str),

    /// `stop(name)` did not match the most recently opened region
    #[error(
        "Mismatched timer: attempted to stop '{found}' but {}",
        describe_open(.expected)
    )]
    MismatchedTimer {
        /// Region currently on top of the stack, if any
        expected: Option<String>,
        /// Region the caller tried to stop
        found: String,
    },

    /// An accumulator that must already exist was not in the tree
    #[error("Could not find timer '{0}'")]
    NotFound(String),

    /// `stop()` on a tic/toc timer that is not running
    #[error("Stopping a TicTocTimer that was already stopped")]
    AlreadyStopped,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

fn describe_open(expected: &Option<String>) -> String {
    match expected {
        Some(name) => format!("the innermost open region is '{}'", name),
        None => "no region is open".to_string(),
    }
}

/// Result type for timer operations
pub type Result<T> = std::result::Result<T, TimerError>;
