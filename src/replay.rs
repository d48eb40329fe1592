//! Event-log replay for the hierarchical timer
//!
//! Rebuilds a [`HierarchicalTimer`] from a recorded log of region events,
//! driving a [`ManualClock`] with the logged timestamps. One event per line:
//!
//! ```text
//! # seconds  event  region name
//! 0.000      start  solve
//! 0.125      start  setup
//! 0.500      stop   setup
//! 2.000      stop   solve
//! ```
//!
//! Blank lines and lines starting with `#` are ignored. Region names run to
//! the end of the line and may contain spaces.

use crate::clock::ManualClock;
use crate::error::TimerError;
use crate::hierarchical::HierarchicalTimer;
use std::io::{self, BufRead};
use thiserror::Error;

/// Errors that can occur while reading or replaying an event log
#[derive(Error, Debug)]
pub enum ReplayError {
    #[error("line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error("line {line}: timestamp {timestamp} is earlier than the previous event at {previous}")]
    NonMonotonic {
        line: usize,
        timestamp: f64,
        previous: f64,
    },

    #[error("line {line}: {source}")]
    Timer {
        line: usize,
        #[source]
        source: TimerError,
    },

    #[error("event log ended with open regions: {}", .0.join(" > "))]
    Unclosed(Vec<String>),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

/// Result type for replay operations
pub type Result<T> = std::result::Result<T, ReplayError>;

/// Region boundary recorded in the log
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    Start,
    Stop,
}

/// One parsed log line
#[derive(Debug, Clone, PartialEq)]
pub struct Event {
    /// 1-based line number in the source log
    pub line: usize,
    /// Clock reading in seconds
    pub timestamp: f64,
    pub kind: EventKind,
    /// Region name
    pub name: String,
}

/// Parse one line; `Ok(None)` for blank and comment lines
pub fn parse_line(line: usize, text: &str) -> Result<Option<Event>> {
    let text = text.trim();
    if text.is_empty() || text.starts_with('#') {
        return Ok(None);
    }

    let parse_error = |message: String| ReplayError::Parse { line, message };

    let (timestamp, rest) = text
        .split_once(char::is_whitespace)
        .ok_or_else(|| parse_error(format!("expected '<seconds> start|stop <name>', got '{}'", text)))?;
    let timestamp: f64 = timestamp
        .parse()
        .map_err(|_| parse_error(format!("invalid timestamp '{}'", timestamp)))?;
    if !timestamp.is_finite() {
        return Err(parse_error(format!("timestamp must be finite, got {}", timestamp)));
    }

    let rest = rest.trim_start();
    let (kind, name) = rest.split_once(char::is_whitespace).unwrap_or((rest, ""));
    let kind = match kind {
        "start" => EventKind::Start,
        "stop" => EventKind::Stop,
        other => {
            return Err(parse_error(format!(
                "unknown event '{}' (expected 'start' or 'stop')",
                other
            )))
        }
    };

    let name = name.trim();
    if name.is_empty() {
        return Err(parse_error("missing region name".to_string()));
    }

    Ok(Some(Event {
        line,
        timestamp,
        kind,
        name: name.to_string(),
    }))
}

/// Parse a whole event log held in memory
pub fn parse_events(input: &str) -> Result<Vec<Event>> {
    let mut events = Vec::new();
    for (i, text) in input.lines().enumerate() {
        if let Some(event) = parse_line(i + 1, text)? {
            events.push(event);
        }
    }
    Ok(events)
}

/// Parse an event log from a reader
pub fn read_events<R: BufRead>(reader: R) -> Result<Vec<Event>> {
    let mut events = Vec::new();
    for (i, text) in reader.lines().enumerate() {
        if let Some(event) = parse_line(i + 1, &text?)? {
            events.push(event);
        }
    }
    Ok(events)
}

/// Replay `events` into a fresh timer
///
/// With `require_closed`, regions still open after the last event are an
/// error; otherwise they are left open in the returned timer.
///
/// # Example
/// ```
/// use hitimer::replay::{parse_events, replay};
///
/// let events = parse_events("0 start solve\n1.5 stop solve\n").unwrap();
/// let timer = replay(&events, true).unwrap();
/// assert_eq!(timer.region(&["solve"]).unwrap().total_time(), 1.5);
/// ```
pub fn replay(events: &[Event], require_closed: bool) -> Result<HierarchicalTimer<ManualClock>> {
    let origin = events.first().map_or(0.0, |event| event.timestamp);
    let clock = ManualClock::starting_at(origin);
    let mut timer = HierarchicalTimer::with_clock(clock.clone());

    let mut previous = origin;
    for event in events {
        if event.timestamp < previous {
            return Err(ReplayError::NonMonotonic {
                line: event.line,
                timestamp: event.timestamp,
                previous,
            });
        }
        previous = event.timestamp;
        clock.set(event.timestamp);

        let applied = match event.kind {
            EventKind::Start => timer.start(&event.name),
            EventKind::Stop => timer.stop(&event.name),
        };
        applied.map_err(|source| ReplayError::Timer {
            line: event.line,
            source,
        })?;
    }

    if timer.depth() > 0 {
        if require_closed {
            return Err(ReplayError::Unclosed(timer.open_regions().to_vec()));
        }
        tracing::warn!(
            open = ?timer.open_regions(),
            "event log ended with open regions"
        );
    }

    tracing::debug!(events = events.len(), "event log replayed");
    Ok(timer)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_line_start_and_stop() {
        let start = parse_line(3, "0.25 start solve").unwrap().unwrap();
        assert_eq!(start.line, 3);
        assert_eq!(start.timestamp, 0.25);
        assert_eq!(start.kind, EventKind::Start);
        assert_eq!(start.name, "solve");

        let stop = parse_line(4, "  1e-3\tstop   linear solve  ").unwrap().unwrap();
        assert_eq!(stop.kind, EventKind::Stop);
        assert_eq!(stop.timestamp, 0.001);
        assert_eq!(stop.name, "linear solve");
    }

    #[test]
    fn test_parse_line_skips_blank_and_comments() {
        assert!(parse_line(1, "").unwrap().is_none());
        assert!(parse_line(2, "   ").unwrap().is_none());
        assert!(parse_line(3, "# header").unwrap().is_none());
    }

    #[test]
    fn test_parse_errors_carry_line_numbers() {
        let cases = [
            "nonsense",
            "abc start x",
            "1.0 pause x",
            "1.0 start",
            "inf start x",
        ];
        for text in cases {
            match parse_line(7, text) {
                Err(ReplayError::Parse { line, .. }) => assert_eq!(line, 7, "case {:?}", text),
                other => panic!("case {:?}: unexpected {:?}", text, other),
            }
        }
    }

    #[test]
    fn test_parse_events_numbers_physical_lines() {
        let events = parse_events("# log\n\n0 start a\n1 stop a\n").unwrap();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].line, 3);
        assert_eq!(events[1].line, 4);
    }

    #[test]
    fn test_read_events_from_reader() {
        let input = "0 start a\n2 stop a\n";
        let events = read_events(input.as_bytes()).unwrap();
        assert_eq!(events.len(), 2);
    }

    #[test]
    fn test_replay_builds_tree() {
        let events = parse_events(
            "10.0 start solve\n\
             10.0 start setup\n\
             11.0 stop setup\n\
             11.0 start setup\n\
             11.5 stop setup\n\
             14.0 stop solve\n",
        )
        .unwrap();
        let timer = replay(&events, true).unwrap();

        let solve = timer.region(&["solve"]).unwrap();
        assert_eq!(solve.total_time(), 4.0);
        assert_eq!(solve.call_count(), 1);
        let setup = timer.region(&["solve", "setup"]).unwrap();
        assert_eq!(setup.call_count(), 2);
        assert_eq!(setup.total_time(), 1.5);
    }

    #[test]
    fn test_replay_rejects_time_going_backwards() {
        let events = parse_events("5 start a\n4 stop a\n").unwrap();
        match replay(&events, false) {
            Err(ReplayError::NonMonotonic { line, previous, .. }) => {
                assert_eq!(line, 2);
                assert_eq!(previous, 5.0);
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_replay_reports_mismatch_with_line() {
        let events = parse_events("0 start a\n0 start b\n1 stop a\n").unwrap();
        match replay(&events, false) {
            Err(ReplayError::Timer { line, source }) => {
                assert_eq!(line, 3);
                assert!(matches!(source, TimerError::MismatchedTimer { .. }));
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_replay_open_regions() {
        let events = parse_events("0 start a\n0 start b\n1 stop b\n").unwrap();

        let timer = replay(&events, false).unwrap();
        assert_eq!(timer.open_regions(), &["a".to_string()]);

        match replay(&events, true) {
            Err(ReplayError::Unclosed(open)) => assert_eq!(open, vec!["a".to_string()]),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_replay_empty_log() {
        let timer = replay(&[], true).unwrap();
        assert!(timer.is_empty());
        assert_eq!(timer.report(), "");
    }
}
