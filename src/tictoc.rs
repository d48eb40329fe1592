//! Flat tic/toc stopwatch
//!
//! A single-counter timer for sequential scripts. `toc` reports the time
//! since the previous `tic`/`toc`; `start`/`stop` switch it into
//! cumulative mode where only the started intervals count.
//!
//! Messages go to the configured stream, to `tracing` at INFO level when
//! logging is enabled, and to stdout when neither is configured:
//!
//! ```text
//! [+   1.25] task 1             delta since last tic/toc
//! [    3.50] checkpoint         seconds since the timer was created
//! [    2.00|   3] solve loop    cumulative seconds | number of starts
//! ```

use crate::clock::{ClockSource, MonotonicClock};
use crate::error::{Result, TimerError};
use once_cell::sync::Lazy;
use std::fmt;
use std::io::{self, Write};
use std::panic::Location;
use std::sync::{Mutex, MutexGuard, PoisonError};

const TIC_MESSAGE: &str = "Resetting the tic/toc delta timer";

/// Delta / cumulative stopwatch
///
/// # Example
/// ```
/// use hitimer::{ManualClock, TicTocTimer};
///
/// let clock = ManualClock::new();
/// let mut timer = TicTocTimer::with_clock(clock.clone()).with_stream(std::io::sink());
///
/// clock.advance(1.5);
/// let elapsed = timer.toc(Some("task 1")).unwrap();
/// assert_eq!(elapsed, 1.5);
/// ```
pub struct TicTocTimer<C: ClockSource = MonotonicClock> {
    clock: C,
    /// Reading at construction, the origin for non-delta messages
    load_time: f64,
    /// Reference for the next delta; `None` while stopped
    last_time: Option<f64>,
    /// Number of `start()` calls; non-zero switches to cumulative mode
    start_count: u32,
    /// Seconds accumulated by `stop()`
    cumulative: f64,
    stream: Option<Box<dyn Write + Send>>,
    log: bool,
}

impl TicTocTimer<MonotonicClock> {
    /// Create a running timer on the monotonic clock
    pub fn new() -> Self {
        Self::with_clock(MonotonicClock::new())
    }
}

impl Default for TicTocTimer<MonotonicClock> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: ClockSource> TicTocTimer<C> {
    /// Create a running timer reading time from `clock`
    pub fn with_clock(clock: C) -> Self {
        let now = clock.now();
        Self {
            clock,
            load_time: now,
            last_time: Some(now),
            start_count: 0,
            cumulative: 0.0,
            stream: None,
            log: false,
        }
    }

    /// Write messages to `stream` instead of stdout
    pub fn with_stream<W>(mut self, stream: W) -> Self
    where
        W: Write + Send + 'static,
    {
        self.stream = Some(Box::new(stream));
        self
    }

    /// Also emit messages through `tracing::info!`
    ///
    /// With logging on and no stream configured, nothing goes to stdout.
    pub fn with_logging(mut self, enabled: bool) -> Self {
        self.log = enabled;
        self
    }

    /// Reset the delta reference to now
    ///
    /// `None` prints the default reset message, `Some("")` prints nothing.
    #[track_caller]
    pub fn tic(&mut self, msg: Option<&str>) -> Result<()> {
        self.last_time = Some(self.clock.now());
        let msg = msg.unwrap_or(TIC_MESSAGE);
        if !msg.is_empty() {
            self.report(Some(msg), false, None, None)?;
        }
        Ok(())
    }

    /// Print and return the seconds since the last `tic`/`toc`
    ///
    /// `None` labels the message with the caller's source location,
    /// `Some("")` prints nothing.
    #[track_caller]
    pub fn toc(&mut self, msg: Option<&str>) -> Result<f64> {
        self.report(msg, true, None, None)
    }

    /// `toc` with explicit mode, an optional one-off output stream and an
    /// optional logging override
    ///
    /// With `delta == false` the reported time is measured from the
    /// timer's creation and the delta reference is left alone. `log: None`
    /// keeps the setting from [`TicTocTimer::with_logging`].
    #[track_caller]
    pub fn toc_with(
        &mut self,
        msg: Option<&str>,
        delta: bool,
        out: Option<&mut dyn Write>,
        log: Option<bool>,
    ) -> Result<f64> {
        self.report(msg, delta, out, log)
    }

    /// Stop the timer, folding the running interval into the cumulative total
    pub fn stop(&mut self) -> Result<f64> {
        let last = self.last_time.take().ok_or(TimerError::AlreadyStopped)?;
        let delta = self.clock.now() - last;
        self.cumulative += delta;
        Ok(delta)
    }

    /// Start a cumulative interval, stopping the current one first
    pub fn start(&mut self) {
        if let Some(last) = self.last_time {
            self.cumulative += self.clock.now() - last;
        }
        self.start_count += 1;
        self.last_time = Some(self.clock.now());
    }

    pub fn is_running(&self) -> bool {
        self.last_time.is_some()
    }

    pub fn start_count(&self) -> u32 {
        self.start_count
    }

    /// Seconds accumulated by completed `start`/`stop` intervals
    pub fn cumulative(&self) -> f64 {
        self.cumulative
    }

    #[track_caller]
    fn report(
        &mut self,
        msg: Option<&str>,
        delta: bool,
        out: Option<&mut dyn Write>,
        log: Option<bool>,
    ) -> Result<f64> {
        let label = match msg {
            Some(text) => text.to_string(),
            None => {
                let caller = Location::caller();
                format!("File \"{}\", line {}", caller.file(), caller.line())
            }
        };

        let now = self.clock.now();
        let last_time = self.last_time;
        let (elapsed, line) = match last_time {
            Some(last) if self.start_count == 0 && delta => {
                self.last_time = Some(now);
                let elapsed = now - last;
                (elapsed, format!("[+{:7.2}] {}\n", elapsed, label))
            }
            Some(_) if self.start_count == 0 => {
                let elapsed = now - self.load_time;
                (elapsed, format!("[{:8.2}] {}\n", elapsed, label))
            }
            running => {
                let elapsed = self.cumulative + running.map_or(0.0, |last| now - last);
                (
                    elapsed,
                    format!("[{:8.2}|{:4}] {}\n", elapsed, self.start_count, label),
                )
            }
        };

        if !label.is_empty() {
            self.emit(&line, out, log.unwrap_or(self.log))?;
        }
        Ok(elapsed)
    }

    fn emit(&mut self, line: &str, out: Option<&mut dyn Write>, log: bool) -> Result<()> {
        match (out, self.stream.as_mut()) {
            (Some(out), _) => out.write_all(line.as_bytes())?,
            (None, Some(stream)) => stream.write_all(line.as_bytes())?,
            (None, None) if !log => io::stdout().lock().write_all(line.as_bytes())?,
            (None, None) => {}
        }
        if log {
            tracing::info!("{}", line.trim_end());
        }
        Ok(())
    }
}

impl<C: ClockSource> fmt::Debug for TicTocTimer<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TicTocTimer")
            .field("load_time", &self.load_time)
            .field("last_time", &self.last_time)
            .field("start_count", &self.start_count)
            .field("cumulative", &self.cumulative)
            .field("has_stream", &self.stream.is_some())
            .field("log", &self.log)
            .finish()
    }
}

static GLOBAL_TIMER: Lazy<Mutex<TicTocTimer>> = Lazy::new(|| Mutex::new(TicTocTimer::new()));

/// Process-wide default timer behind [`tic`] and [`toc`]
///
/// Created on first use; its creation time is the origin for non-delta
/// messages. Code that needs isolation should build its own
/// [`TicTocTimer`] instead.
pub fn global() -> &'static Mutex<TicTocTimer> {
    &GLOBAL_TIMER
}

fn lock_global() -> MutexGuard<'static, TicTocTimer> {
    // A panic mid-call leaves the timer's numbers valid, so keep using it
    global().lock().unwrap_or_else(PoisonError::into_inner)
}

/// [`TicTocTimer::tic`] on the global timer
#[track_caller]
pub fn tic(msg: Option<&str>) -> Result<()> {
    lock_global().tic(msg)
}

/// [`TicTocTimer::toc`] on the global timer
#[track_caller]
pub fn toc(msg: Option<&str>) -> Result<f64> {
    lock_global().toc(msg)
}
