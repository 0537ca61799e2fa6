// src/sink/json.rs
//
// Records are held in memory and written as one JSON array in `finish`.
// Nothing reaches the writer before that.

use std::{fs::File, io::{BufWriter, Write}, path::Path};

use crate::error::SinkError;
use crate::extract::Record;
use crate::file::create_file;

use super::RecordSink;

pub struct JsonSink<W: Write> {
    out: W,
    pretty: bool,
    records: Vec<Record>,
    done: bool,
}

impl JsonSink<BufWriter<File>> {
    pub fn create(path: &Path, pretty: bool) -> Result<Self, SinkError> {
        Ok(Self::new(BufWriter::new(create_file(path)?), pretty))
    }
}

impl<W: Write> JsonSink<W> {
    pub fn new(out: W, pretty: bool) -> Self {
        Self { out, pretty, records: Vec::new(), done: false }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> RecordSink for JsonSink<W> {
    fn name(&self) -> &str { "json" }

    fn accept(&mut self, record: &Record) -> Result<(), SinkError> {
        self.records.push(record.clone());
        Ok(())
    }

    fn finish(&mut self) -> Result<(), SinkError> {
        if self.done {
            return Ok(());
        }
        if self.pretty {
            serde_json::to_writer_pretty(&mut self.out, &self.records)?;
        } else {
            serde_json::to_writer(&mut self.out, &self.records)?;
        }
        writeln!(self.out)?;
        self.out.flush()?;
        self.done = true;
        logd!("json: wrote {} records", self.records.len());
        Ok(())
    }
}
