// src/sink/delimited.rs
//
// CSV/TSV writer. One header row, then one row per record, `\n` terminated.

use std::{fs::File, io::{self, BufWriter, Write}, path::Path};

use crate::config::consts::CSV_HEADER;
use crate::config::options::Quoting;
use crate::core::sanitize::strip_commas;
use crate::error::SinkError;
use crate::extract::Record;
use crate::file::create_file;

use super::RecordSink;

fn needs_quotes(field: &str, sep: char) -> bool {
    field.contains(sep) || field.contains('"') || field.contains('\n') || field.contains('\r')
}

/// Write a single CSV/TSV row to any writer.
pub fn write_row<W: Write>(mut w: W, row: &[&str], sep: char, quoting: Quoting) -> io::Result<()> {
    let mut first = true;
    for cell in row {
        if !first { write!(w, "{sep}")?; } else { first = false; }
        if quoting == Quoting::Rfc4180 && needs_quotes(cell, sep) {
            let escaped = cell.replace('"', "\"\"");
            write!(w, "\"{escaped}\"")?;
        } else {
            write!(w, "{cell}")?;
        }
    }
    writeln!(w)
}

pub struct DelimitedSink<W: Write> {
    out: W,
    sep: char,
    quoting: Quoting,
    include_header: bool,
    wrote_header: bool,
}

impl DelimitedSink<BufWriter<File>> {
    pub fn create(path: &Path, sep: char, quoting: Quoting, include_header: bool) -> Result<Self, SinkError> {
        Ok(Self::new(BufWriter::new(create_file(path)?), sep, quoting, include_header))
    }
}

impl<W: Write> DelimitedSink<W> {
    pub fn new(out: W, sep: char, quoting: Quoting, include_header: bool) -> Self {
        Self { out, sep, quoting, include_header, wrote_header: false }
    }

    pub fn csv(out: W) -> Self {
        Self::new(out, ',', Quoting::Rfc4180, true)
    }

    pub fn tsv(out: W) -> Self {
        Self::new(out, '\t', Quoting::Rfc4180, true)
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    // Header goes out even for an empty record stream.
    fn ensure_header(&mut self) -> io::Result<()> {
        if self.include_header && !self.wrote_header {
            write_row(&mut self.out, &CSV_HEADER, self.sep, self.quoting)?;
            self.wrote_header = true;
        }
        Ok(())
    }
}

impl<W: Write> RecordSink for DelimitedSink<W> {
    fn name(&self) -> &str {
        if self.sep == '\t' { "tsv" } else { "csv" }
    }

    fn accept(&mut self, record: &Record) -> Result<(), SinkError> {
        self.ensure_header()?;
        match self.quoting {
            Quoting::Rfc4180 => write_row(&mut self.out, &record.fields(), self.sep, self.quoting)?,
            Quoting::Never => {
                let word = strip_commas(&record.word);
                write_row(&mut self.out, &[word.as_str(), record.kind.as_str(), record.definition.as_str()], self.sep, self.quoting)?
            }
        }
        Ok(())
    }

    fn finish(&mut self) -> Result<(), SinkError> {
        self.ensure_header()?;
        self.out.flush()?;
        Ok(())
    }
}
