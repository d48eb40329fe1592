use anyhow::{Context, Result};
use clap::Parser;
use hitimer::cli::{Cli, OutputFormat};
use hitimer::replay;
use std::fs::File;
use std::io::{self, BufReader};
use tracing_subscriber::EnvFilter;

/// Initialize tracing subscriber for debug output
fn init_tracing(debug: bool) {
    if debug {
        tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::from_default_env().add_directive(tracing::Level::TRACE.into()),
            )
            .with_writer(std::io::stderr)
            .init();
    }
}

/// Read and parse the event log named on the command line
fn load_events(args: &Cli) -> Result<Vec<replay::Event>> {
    let events = if args.reads_stdin() {
        replay::read_events(io::stdin().lock()).context("Failed to read event log from stdin")?
    } else {
        let file = File::open(&args.event_log)
            .with_context(|| format!("Failed to open {}", args.event_log.display()))?;
        replay::read_events(BufReader::new(file))
            .with_context(|| format!("Failed to read {}", args.event_log.display()))?
    };
    Ok(events)
}

fn main() -> Result<()> {
    let args = Cli::parse();

    // Initialize tracing if --debug flag is set
    init_tracing(args.debug);

    let events = load_events(&args)?;
    let timer = replay::replay(&events, args.require_closed)?;

    match args.format {
        OutputFormat::Text => print!("{}", timer.report_with(&args.report_style())),
        OutputFormat::Json => println!("{}", timer.snapshot().to_json_pretty()?),
    }

    Ok(())
}
