//! CLI argument parsing for hitimer

use crate::hierarchical::ReportStyle;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Output format for the replayed report
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Fixed-width text table (default)
    Text,
    /// JSON format for machine parsing
    Json,
}

#[derive(Parser, Debug)]
#[command(name = "hitimer")]
#[command(version)]
#[command(about = "Replay a region event log and print the hierarchical timing report", long_about = None)]
pub struct Cli {
    /// Event log to replay ('-' reads stdin)
    #[arg(value_name = "EVENT_LOG")]
    pub event_log: PathBuf,

    /// Output format (text or json)
    #[arg(long = "format", value_enum, default_value = "text")]
    pub format: OutputFormat,

    /// Width of the region name column
    #[arg(
        long = "name-width",
        value_name = "COLS",
        default_value = "30",
        value_parser = clap::builder::RangedU64ValueParser::<usize>::new().range(1..)
    )]
    pub name_width: usize,

    /// Width of each numeric column
    #[arg(
        long = "column-width",
        value_name = "COLS",
        default_value = "15",
        value_parser = clap::builder::RangedU64ValueParser::<usize>::new().range(1..)
    )]
    pub column_width: usize,

    /// Spaces of indentation per nesting level
    #[arg(long = "indent-width", value_name = "COLS", default_value = "4")]
    pub indent_width: usize,

    /// Fail if regions are still open at the end of the log
    #[arg(long = "require-closed")]
    pub require_closed: bool,

    /// Enable debug tracing output to stderr
    #[arg(long = "debug")]
    pub debug: bool,
}

impl Cli {
    /// Report layout selected on the command line
    pub fn report_style(&self) -> ReportStyle {
        ReportStyle {
            name_width: self.name_width,
            column_width: self.column_width,
            indent_width: self.indent_width,
        }
    }

    /// Whether the event log comes from stdin
    pub fn reads_stdin(&self) -> bool {
        self.event_log.as_os_str() == "-"
    }
}
