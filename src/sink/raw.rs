// src/sink/raw.rs
//
// Plain-text dump of the input lines, one per line, before any parsing.

use std::{fs::File, io::{BufWriter, Write}, path::Path};

use crate::error::SinkError;
use crate::file::create_file;

use super::LineSink;

pub struct RawSink<W: Write> {
    out: W,
}

impl RawSink<BufWriter<File>> {
    pub fn create(path: &Path) -> Result<Self, SinkError> {
        Ok(Self::new(BufWriter::new(create_file(path)?)))
    }
}

impl<W: Write> RawSink<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> LineSink for RawSink<W> {
    fn name(&self) -> &str { "raw" }

    fn accept_line(&mut self, line: &str) -> Result<(), SinkError> {
        writeln!(self.out, "{line}")?;
        Ok(())
    }

    fn finish(&mut self) -> Result<(), SinkError> {
        self.out.flush()?;
        Ok(())
    }
}
