// src/sink/mod.rs
//! # Sinks
//!
//! Everything downstream of the extractor. Two capabilities:
//!
//! - [`RecordSink`] receives parsed [`Record`]s in input order (CSV/TSV, JSON,
//!   relational).
//! - [`LineSink`] receives every raw line before parsing (the plain-text dump).
//!   It is kept apart on purpose: its output does not depend on parsing at all.
//!
//! A sink error ends that sink's run. The runner drops the sink, reports the
//! error and keeps feeding the others.

use crate::error::SinkError;
use crate::extract::Record;

pub mod delimited;
pub mod json;
pub mod raw;
pub mod relational;

pub use delimited::DelimitedSink;
pub use json::JsonSink;
pub use raw::RawSink;
pub use relational::{MemoryTable, RelationalSink, SqlScript, Table};
#[cfg(feature = "postgres")]
pub use relational::PgTable;

pub trait RecordSink {
    /// Short label for logs and error reports.
    fn name(&self) -> &str;

    fn accept(&mut self, record: &Record) -> Result<(), SinkError>;

    /// Flush/serialize at end of stream. Called once, only if no `accept` failed.
    fn finish(&mut self) -> Result<(), SinkError> {
        Ok(())
    }
}

pub trait LineSink {
    fn name(&self) -> &str;

    fn accept_line(&mut self, line: &str) -> Result<(), SinkError>;

    fn finish(&mut self) -> Result<(), SinkError> {
        Ok(())
    }
}

impl<T: RecordSink + ?Sized> RecordSink for Box<T> {
    fn name(&self) -> &str { (**self).name() }
    fn accept(&mut self, record: &Record) -> Result<(), SinkError> { (**self).accept(record) }
    fn finish(&mut self) -> Result<(), SinkError> { (**self).finish() }
}

impl<T: LineSink + ?Sized> LineSink for Box<T> {
    fn name(&self) -> &str { (**self).name() }
    fn accept_line(&mut self, line: &str) -> Result<(), SinkError> { (**self).accept_line(line) }
    fn finish(&mut self) -> Result<(), SinkError> { (**self).finish() }
}

/// Collects records in memory. Handy for callers that just want a `Vec`.
#[derive(Debug, Default)]
pub struct VecSink {
    pub records: Vec<Record>,
}

impl RecordSink for VecSink {
    fn name(&self) -> &str { "memory" }

    fn accept(&mut self, record: &Record) -> Result<(), SinkError> {
        self.records.push(record.clone());
        Ok(())
    }
}
