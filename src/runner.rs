// src/runner.rs
use std::path::PathBuf;

use crate::{
    config::options::{AppOptions, ExportFormat, ExportOptions},
    error::{RunError, SinkError},
    extract::{extract, ExtractStats},
    progress::{NullProgress, Progress},
    sink::{DelimitedSink, JsonSink, LineSink, RawSink, RecordSink, RelationalSink, SqlScript},
    source,
};

/// A sink that was dropped mid-run.
#[derive(Debug)]
pub struct SinkFailure {
    pub sink: String,
    pub error: SinkError,
}

/// Summary of what was produced.
#[derive(Debug, Default)]
pub struct RunSummary {
    pub lines: usize,
    pub stats: ExtractStats,
    /// Files of sinks that finished cleanly.
    pub files_written: Vec<PathBuf>,
    pub failures: Vec<SinkFailure>,
}

impl RunSummary {
    pub fn is_ok(&self) -> bool {
        self.failures.is_empty()
    }

    /// Collapse into a single error: the first sink failure, if any.
    pub fn into_result(mut self) -> Result<Self, RunError> {
        if self.failures.is_empty() {
            return Ok(self);
        }
        let SinkFailure { sink, error } = self.failures.remove(0);
        Err(RunError::Sink { sink, source: error })
    }
}

/// The sinks for one run plus the file each one writes (if any).
#[derive(Default)]
pub struct Sinks {
    pub records: Vec<(Box<dyn RecordSink>, Option<PathBuf>)>,
    pub lines: Vec<(Box<dyn LineSink>, Option<PathBuf>)>,
}

/// Top-level runner: load lines, extract, fan out to every configured sink.
/// Source errors abort; sink errors only drop that sink (see `RunSummary::failures`).
pub fn run(
    opts: &AppOptions,
    progress: Option<&mut dyn Progress>,
) -> Result<RunSummary, RunError> {
    let mut null = NullProgress;
    let progress: &mut dyn Progress = match progress { Some(p) => p, None => &mut null };

    let lines = match source::load_lines(&opts.source) {
        Ok(l) => l,
        Err(e) => {
            loge!("Source unavailable: {e}");
            progress.finish();
            return Err(e.into());
        }
    };

    let (mut sinks, mut failures) = build_sinks(&opts.export);
    for f in &failures {
        progress.sink_failed(&f.sink, &f.error.to_string());
    }

    let (stats, mut run_failures) = {
        let mut rs: Vec<&mut dyn RecordSink> = sinks.records.iter_mut().map(|(s, _)| &mut **s as &mut dyn RecordSink).collect();
        let mut ls: Vec<&mut dyn LineSink> = sinks.lines.iter_mut().map(|(s, _)| &mut **s as &mut dyn LineSink).collect();
        drive(&lines, &mut rs, &mut ls, progress)
    };
    failures.append(&mut run_failures);

    let failed = |name: &str| failures.iter().any(|f| f.sink == name);
    let files_written: Vec<PathBuf> = sinks.lines.iter()
        .filter_map(|(s, p)| p.clone().filter(|_| !failed(s.name())))
        .chain(sinks.records.iter().filter_map(|(s, p)| p.clone().filter(|_| !failed(s.name()))))
        .collect();

    logf!(
        "{} lines, {} records, {} skipped, {} files",
        lines.len(), stats.records, stats.skipped, files_written.len()
    );
    Ok(RunSummary { lines: lines.len(), stats, files_written, failures })
}

/// I/O-free core of a run: raw lines to every line sink, records to every
/// record sink, in input order. Sinks are finished at the end.
pub fn run_lines<S: AsRef<str>>(
    lines: &[S],
    record_sinks: &mut [&mut dyn RecordSink],
    line_sinks: &mut [&mut dyn LineSink],
    progress: Option<&mut dyn Progress>,
) -> (ExtractStats, Vec<SinkFailure>) {
    let mut null = NullProgress;
    let progress: &mut dyn Progress = match progress { Some(p) => p, None => &mut null };
    drive(lines, record_sinks, line_sinks, progress)
}

fn drive<S: AsRef<str>>(
    lines: &[S],
    record_sinks: &mut [&mut dyn RecordSink],
    line_sinks: &mut [&mut dyn LineSink],
    progress: &mut dyn Progress,
) -> (ExtractStats, Vec<SinkFailure>) {
    let mut failures = Vec::new();
    progress.begin(lines.len());

    // Raw passthrough
    let mut live = vec![true; line_sinks.len()];
    for line in lines {
        for (i, sink) in line_sinks.iter_mut().enumerate() {
            if !live[i] { continue; }
            if let Err(e) = sink.accept_line(line.as_ref()) {
                live[i] = false;
                report(progress, &mut failures, sink.name(), e);
            }
        }
    }
    for (i, sink) in line_sinks.iter_mut().enumerate() {
        if !live[i] { continue; }
        if let Err(e) = sink.finish() {
            report(progress, &mut failures, sink.name(), e);
        }
    }

    // Parsed records
    let mut live = vec![true; record_sinks.len()];
    let mut records = extract(lines);
    for (n, record) in records.by_ref().enumerate() {
        for (i, sink) in record_sinks.iter_mut().enumerate() {
            if !live[i] { continue; }
            if let Err(e) = sink.accept(&record) {
                live[i] = false;
                report(progress, &mut failures, sink.name(), e);
            }
        }
        progress.record_done(n + 1);
    }
    for (i, sink) in record_sinks.iter_mut().enumerate() {
        if !live[i] { continue; }
        if let Err(e) = sink.finish() {
            report(progress, &mut failures, sink.name(), e);
        }
    }

    let stats = records.stats();
    if stats.skipped > 0 {
        logw!("Skipped {} malformed definition lines", stats.skipped);
        progress.log(&format!("Skipped {} malformed definition lines", stats.skipped));
    }
    progress.finish();
    (stats, failures)
}

fn report(
    progress: &mut dyn Progress,
    failures: &mut Vec<SinkFailure>,
    sink: &str,
    error: SinkError,
) {
    loge!("{sink} sink failed: {error}");
    progress.sink_failed(sink, &error.to_string());
    failures.push(SinkFailure { sink: s!(sink), error });
}

/// Open one sink per requested format. A sink that cannot be opened is
/// returned as a failure; the rest still run.
pub fn build_sinks(export: &ExportOptions) -> (Sinks, Vec<SinkFailure>) {
    let mut sinks = Sinks::default();
    let mut failures = Vec::new();
    let mut seen: Vec<ExportFormat> = Vec::new();

    for &format in &export.formats {
        if seen.contains(&format) { continue; }
        seen.push(format);

        let path = export.path_for(format);
        match open_sink(export, format, path.as_deref()) {
            Ok(Opened::Line(s)) => sinks.lines.push((s, path)),
            Ok(Opened::Record(s)) => sinks.records.push((s, path)),
            Err(error) => {
                loge!("{format} sink could not be opened: {error}");
                failures.push(SinkFailure { sink: s!(format.name()), error });
            }
        }
    }
    (sinks, failures)
}

enum Opened {
    Line(Box<dyn LineSink>),
    Record(Box<dyn RecordSink>),
}

fn open_sink(
    export: &ExportOptions,
    format: ExportFormat,
    path: Option<&std::path::Path>,
) -> Result<Opened, SinkError> {
    let need_path = || path.ok_or_else(|| SinkError::NoPath(s!(format.name())));
    Ok(match format {
        ExportFormat::Raw => Opened::Line(Box::new(RawSink::create(need_path()?)?)),
        ExportFormat::Csv => Opened::Record(Box::new(
            DelimitedSink::create(need_path()?, ',', export.quoting, export.include_header)?,
        )),
        ExportFormat::Tsv => Opened::Record(Box::new(
            DelimitedSink::create(need_path()?, '\t', export.quoting, export.include_header)?,
        )),
        ExportFormat::Json => Opened::Record(Box::new(JsonSink::create(need_path()?, export.pretty_json)?)),
        ExportFormat::Sql => Opened::Record(Box::new(
            RelationalSink::new(SqlScript::create(need_path()?, &export.table)?).with_name("sql"),
        )),
        ExportFormat::Postgres => Opened::Record(open_postgres(export)?),
    })
}

#[cfg(feature = "postgres")]
fn open_postgres(export: &ExportOptions) -> Result<Box<dyn RecordSink>, SinkError> {
    let url = export.database_url.as_deref()
        .ok_or_else(|| SinkError::Database(s!("no database URL (set DATABASE_URL or --database-url)")))?;
    let table = crate::sink::PgTable::connect(url, &export.table)?;
    Ok(Box::new(RelationalSink::new(table).with_name("postgres")))
}

#[cfg(not(feature = "postgres"))]
fn open_postgres(_export: &ExportOptions) -> Result<Box<dyn RecordSink>, SinkError> {
    Err(SinkError::Database(s!("built without the `postgres` feature")))
}
