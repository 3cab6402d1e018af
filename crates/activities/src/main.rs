use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

use activities::{
    ActivityMetadata, OrderingPolicy, OutputFormat, ReduceOptions, TrackReducer,
    ZeroDurationPolicy, reduce_file,
    sink::{ActivitySink, JsonSink},
};
use anyhow::{Context, Result};
use clap::Parser;
use rayon::prelude::*;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about = "Reduce GPS track files into activity reports", long_about = None)]
struct Cli {
    /// Track files (GPX, TCX or FIT)
    #[arg(required = true)]
    files: Vec<PathBuf>,

    /// Start time to report instead of the track's first timestamp (RFC 3339)
    #[arg(long, value_parser = parse_rfc3339)]
    start_time: Option<OffsetDateTime>,

    #[arg(long, default_value_t = 0)]
    calories: i64,

    #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
    latitude_offset: f64,

    #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
    longitude_offset: f64,

    #[arg(long, default_value_t = 0)]
    step_count: i64,

    /// Sport type code (0 = run)
    #[arg(long, default_value_t = 0)]
    sport_type: i32,

    /// Duration in seconds to report instead of the track's own
    #[arg(long)]
    duration: Option<i64>,

    #[arg(long, value_enum, env = "ACTIVITIES_FORMAT", default_value_t = OutputFormat::Legacy)]
    format: OutputFormat,

    #[arg(long, value_enum, env = "ACTIVITIES_ZERO_DURATION", default_value_t = ZeroDurationPolicy::Reject)]
    zero_duration: ZeroDurationPolicy,

    #[arg(long, value_enum, env = "ACTIVITIES_ORDERING", default_value_t = OrderingPolicy::Strict)]
    ordering: OrderingPolicy,

    /// Write to this file instead of stdout
    #[arg(long, short)]
    output: Option<PathBuf>,

    #[arg(long)]
    pretty: bool,
}

impl Cli {
    fn metadata(&self) -> ActivityMetadata {
        ActivityMetadata {
            start_time: self.start_time,
            calories: self.calories,
            latitude_offset: self.latitude_offset,
            longitude_offset: self.longitude_offset,
            step_count: self.step_count,
            sport_type: self.sport_type,
            duration: self.duration,
        }
    }

    fn options(&self) -> ReduceOptions {
        ReduceOptions::default()
            .with_zero_duration(self.zero_duration)
            .with_ordering(self.ordering)
    }
}

fn parse_rfc3339(s: &str) -> Result<OffsetDateTime, time::error::Parse> {
    OffsetDateTime::parse(s, &Rfc3339)
}

fn init_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();
}

fn main() -> Result<()> {
    init_logging();
    let cli = Cli::parse();

    if cli.start_time.is_some() && cli.files.len() > 1 {
        tracing::warn!("--start-time applies to every file");
    }

    let metadata = cli.metadata();
    let reducer = TrackReducer::new(cli.options());

    let activities = cli
        .files
        .par_iter()
        .map(|path| {
            reduce_file(path, &metadata, &reducer)
                .map_err(|e| e.logged(&path.display().to_string()))
                .with_context(|| format!("failed to reduce {}", path.display()))
        })
        .collect::<Result<Vec<_>>>()?;

    let writer: Box<dyn Write> = match &cli.output {
        Some(path) => Box::new(BufWriter::new(
            File::create(path).with_context(|| format!("failed to create {}", path.display()))?,
        )),
        None => Box::new(io::stdout().lock()),
    };

    let mut sink = JsonSink::new(writer, cli.format).pretty(cli.pretty);
    sink.submit(&activities)?;

    Ok(())
}
