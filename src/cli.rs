// src/cli.rs
use std::process::ExitCode;

use clap::{ArgAction, Parser};

use crate::config::options::{AppOptions, ExportFormat, Input, Quoting};
use crate::file::normalize_separators;
use crate::progress::Progress;
use crate::runner::{self, RunSummary};

/// Scrape the DawgSpeak slang dictionary into raw, CSV, JSON and SQL outputs.
#[derive(Parser, Debug)]
#[command(name = "dawg_scrape", version)]
#[command(about = "Scrape the DawgSpeak slang dictionary")]
pub struct Args {
    /// Page to fetch (http:// only). Defaults to the dictionary page or $DAWG_URL.
    #[arg(long, conflicts_with_all = ["html", "text"])]
    pub url: Option<String>,

    /// Saved HTML page to read instead of fetching
    #[arg(long, conflicts_with = "text")]
    pub html: Option<String>,

    /// Pre-extracted text file, one raw line per line
    #[arg(long)]
    pub text: Option<String>,

    /// Element selector, `tag.class>tag` form
    #[arg(long)]
    pub selector: Option<String>,

    /// Output directory
    #[arg(short, long)]
    pub out: Option<String>,

    /// Output formats: raw, csv, tsv, json, sql, postgres (repeat or comma-separate)
    #[arg(short = 'f', long = "format", value_delimiter = ',')]
    pub formats: Vec<ExportFormat>,

    /// Omit the header row from CSV/TSV
    #[arg(long)]
    pub no_header: bool,

    /// Plain comma join without quoting; commas are dropped from words
    #[arg(long)]
    pub legacy_csv: bool,

    /// Indent the JSON output
    #[arg(long)]
    pub pretty: bool,

    /// Table name for SQL and Postgres output
    #[arg(long)]
    pub table: Option<String>,

    /// Postgres connection string (overrides $DATABASE_URL)
    #[arg(long)]
    pub database_url: Option<String>,

    /// More logging (-v debug, -vv trace). RUST_LOG takes precedence.
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

impl Args {
    /// Apply the flags on top of `base` (defaults plus environment).
    pub fn apply(self, mut opts: AppOptions) -> AppOptions {
        if let Some(url) = self.url {
            opts.source.input = Input::Url(url);
        } else if let Some(p) = self.html {
            opts.source.input = Input::Html(normalize_separators(&p));
        } else if let Some(p) = self.text {
            opts.source.input = Input::Text(normalize_separators(&p));
        }
        if let Some(sel) = self.selector {
            opts.source.selector = sel;
        }

        let export = &mut opts.export;
        if let Some(dir) = self.out {
            export.out_dir = normalize_separators(&dir);
        }
        if !self.formats.is_empty() {
            export.formats = self.formats;
        }
        if self.no_header {
            export.include_header = false;
        }
        if self.legacy_csv {
            export.quoting = Quoting::Never;
        }
        export.pretty_json |= self.pretty;
        if let Some(t) = self.table {
            export.table = t;
        }
        if self.database_url.is_some() {
            export.database_url = self.database_url;
        }
        opts
    }
}

/// Status on stderr, one line per event.
pub struct CliProgress;

impl Progress for CliProgress {
    fn begin(&mut self, lines: usize) {
        eprintln!("Processing {lines} raw lines");
    }

    fn log(&mut self, msg: &str) {
        eprintln!("{msg}");
    }

    fn sink_failed(&mut self, sink: &str, err: &str) {
        eprintln!("{sink}: {err} (output dropped)");
    }
}

pub fn run() -> color_eyre::Result<ExitCode> {
    let args = Args::parse();
    crate::log::init(args.verbose);

    let opts = args.apply(AppOptions::from_env());
    logd!("Input {:?}, formats {:?}", opts.source.input, opts.export.formats);

    let mut progress = CliProgress;
    let summary = runner::run(&opts, Some(&mut progress))?;
    print_summary(&summary);

    Ok(if summary.is_ok() { ExitCode::SUCCESS } else { ExitCode::FAILURE })
}

fn print_summary(summary: &RunSummary) {
    for path in &summary.files_written {
        println!("{}", path.display());
    }
    eprintln!(
        "{} records from {} lines ({} skipped)",
        summary.stats.records, summary.lines, summary.stats.skipped
    );
    for f in &summary.failures {
        eprintln!("FAILED {}: {}", f.sink, f.error);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn parse(argv: &[&str]) -> AppOptions {
        let args = Args::try_parse_from(std::iter::once("dawg_scrape").chain(argv.iter().copied())).unwrap();
        args.apply(AppOptions::default())
    }

    #[test]
    fn no_flags_keeps_defaults() {
        assert_eq!(parse(&[]), AppOptions::default());
    }

    #[test]
    fn formats_repeat_and_comma_split() {
        let opts = parse(&["-f", "csv,json", "--format", "sql"]);
        assert_eq!(opts.export.formats, vec![ExportFormat::Csv, ExportFormat::Json, ExportFormat::Sql]);
    }

    #[test]
    fn text_input_and_export_switches() {
        let opts = parse(&[
            "--text", "dump.txt", "-o", "build/out", "--no-header", "--legacy-csv", "--pretty", "--table", "Slang",
        ]);
        assert_eq!(opts.source.input, Input::Text(PathBuf::from("dump.txt")));
        assert_eq!(opts.export.out_dir, normalize_separators("build/out"));
        assert!(!opts.export.include_header);
        assert_eq!(opts.export.quoting, Quoting::Never);
        assert!(opts.export.pretty_json);
        assert_eq!(opts.export.table, "Slang");
    }

    #[test]
    fn conflicting_inputs_rejected() {
        let res = Args::try_parse_from(["dawg_scrape", "--url", "http://a/", "--text", "x.txt"]);
        assert!(res.is_err());
    }

    #[test]
    fn unknown_format_rejected() {
        assert!(Args::try_parse_from(["dawg_scrape", "-f", "xml"]).is_err());
    }

    #[test]
    fn verbosity_counts() {
        let args = Args::try_parse_from(["dawg_scrape", "-vv"]).unwrap();
        assert_eq!(args.verbose, 2);
    }
}
