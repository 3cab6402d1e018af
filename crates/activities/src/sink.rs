//! Hand-off of reduced activities to their consumer.

use std::io::Write;

use thiserror::Error;
use tracing::info;

use crate::{config::OutputFormat, models::Activity, wire::ReportHistory};

#[derive(Error, Debug)]
pub enum SinkError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Destination for reduced activities.
pub trait ActivitySink {
    fn submit(&mut self, activities: &[Activity]) -> Result<(), SinkError>;
}

/// Writes activities as one JSON document per submission.
#[derive(Debug)]
pub struct JsonSink<W> {
    writer: W,
    format: OutputFormat,
    pretty: bool,
}

impl<W: Write> JsonSink<W> {
    pub fn new(writer: W, format: OutputFormat) -> Self {
        Self {
            writer,
            format,
            pretty: false,
        }
    }

    pub fn pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    pub fn into_inner(self) -> W {
        self.writer
    }

    fn write_json<T: serde::Serialize>(&mut self, value: &T) -> Result<(), SinkError> {
        if self.pretty {
            serde_json::to_writer_pretty(&mut self.writer, value)?;
        } else {
            serde_json::to_writer(&mut self.writer, value)?;
        }
        self.writer.write_all(b"\n")?;
        Ok(())
    }
}

impl<W: Write> ActivitySink for JsonSink<W> {
    fn submit(&mut self, activities: &[Activity]) -> Result<(), SinkError> {
        match self.format {
            OutputFormat::Legacy => {
                let history: ReportHistory = activities.iter().collect();
                self.write_json(&history)?;
            }
            OutputFormat::Clean => self.write_json(&activities)?,
        }
        self.writer.flush()?;

        info!(count = activities.len(), format = ?self.format, "submitted activities");
        Ok(())
    }
}
