// tests/export_files.rs
use std::fs;
use std::path::PathBuf;

use dawg_scrape::config::options::{AppOptions, ExportFormat, Input, Quoting};
use dawg_scrape::error::{RunError, SourceError};
use dawg_scrape::extract::Record;
use dawg_scrape::runner;

fn tmp_dir(name: &str) -> PathBuf {
    let mut p = std::env::temp_dir();
    p.push(format!("dawg_e2e_{}", name));
    let _ = fs::remove_dir_all(&p);
    fs::create_dir_all(&p).unwrap();
    p
}

const PAGE: &str = r#"<!DOCTYPE html>
<html><head><title>DawgSpeak</title>
<script>var row = "<div class='row'>";</script>
</head><body>
<div class="container">
  <div class="row">
    <div class="col-md-3"><strong>12</strong></div>
    <div class="col-md-9"><em>(noun)</em> If someone says &#8220;12&#8221;, they mean police.</div>
  </div>
  <!-- <div class="row"><div>ghost</div></div> -->
  <div class="row">
    <div class="col-md-3">on fleek</div>
    <div class="col-md-9">(adj) perfect, flawless</div>
  </div>
  <div class="row">
    <div class="col-md-3">broken</div>
    <div class="col-md-9">no type given</div>
  </div>
</div>
</body></html>
"#;

fn opts_for(input: Input, out: PathBuf, formats: Vec<ExportFormat>) -> AppOptions {
    let mut opts = AppOptions::default();
    opts.source.input = input;
    opts.export.out_dir = out;
    opts.export.formats = formats;
    opts
}

#[test]
fn saved_page_to_every_file_format() {
    let dir = tmp_dir("page");
    let page = dir.join("page.html");
    fs::write(&page, PAGE).unwrap();
    let out = dir.join("out");

    let opts = opts_for(
        Input::Html(page),
        out.clone(),
        vec![ExportFormat::Raw, ExportFormat::Csv, ExportFormat::Tsv, ExportFormat::Json, ExportFormat::Sql],
    );
    let summary = runner::run(&opts, None).unwrap();

    assert!(summary.is_ok());
    assert_eq!(summary.lines, 6);
    assert_eq!(summary.stats.records, 2);
    assert_eq!(summary.stats.skipped, 1);
    assert_eq!(summary.files_written.len(), 5);

    let raw = fs::read_to_string(out.join("results.txt")).unwrap();
    assert_eq!(raw.lines().count(), 6);
    assert_eq!(raw.lines().nth(2), Some("on fleek"));

    let csv = fs::read_to_string(out.join("words.csv")).unwrap();
    assert_eq!(
        csv,
        "word,type,definition\n\
         12,noun,\"If someone says \"\"12\"\", they mean police.\"\n\
         on fleek,adj,\"perfect, flawless\"\n"
    );

    let tsv = fs::read_to_string(out.join("words.tsv")).unwrap();
    assert!(tsv.starts_with("word\ttype\tdefinition\n12\tnoun\t"));

    let json: Vec<Record> = serde_json::from_str(&fs::read_to_string(out.join("words.json")).unwrap()).unwrap();
    assert_eq!(json[1], Record::new("on fleek", "adj", "perfect, flawless"));

    let sql = fs::read_to_string(out.join("words.sql")).unwrap();
    assert_eq!(sql.lines().filter(|l| l.starts_with("INSERT INTO DawgSpeak ")).count(), 2);
}

#[test]
fn text_input_with_legacy_csv() {
    let dir = tmp_dir("text");
    let text = dir.join("dump.txt");
    fs::write(&text, "on fleek, fr\r\n(adj) perfect, flawless\r\n").unwrap();

    let mut opts = opts_for(Input::Text(text), dir.clone(), vec![ExportFormat::Csv, ExportFormat::Csv]);
    opts.export.quoting = Quoting::Never;
    opts.export.include_header = false;

    let summary = runner::run(&opts, None).unwrap();
    assert_eq!(summary.files_written, vec![dir.join("words.csv")]);
    assert_eq!(
        fs::read_to_string(dir.join("words.csv")).unwrap(),
        "on fleek fr,adj,perfect, flawless\n"
    );
}

#[test]
fn unopenable_sink_is_reported_others_still_written() {
    let dir = tmp_dir("badtable");
    let text = dir.join("dump.txt");
    fs::write(&text, "bet\n(interj) okay\n").unwrap();

    let mut opts = opts_for(Input::Text(text), dir.clone(), vec![ExportFormat::Sql, ExportFormat::Json]);
    opts.export.table = "no good".into();

    let summary = runner::run(&opts, None).unwrap();
    assert!(!summary.is_ok());
    assert_eq!(summary.failures.len(), 1);
    assert_eq!(summary.failures[0].sink, "sql");
    assert_eq!(summary.files_written, vec![dir.join("words.json")]);
    assert!(matches!(summary.into_result(), Err(RunError::Sink { .. })));
}

#[test]
fn missing_input_aborts_before_any_output() {
    let dir = tmp_dir("missing");
    let out = dir.join("out");
    let opts = opts_for(Input::Text(dir.join("nope.txt")), out.clone(), vec![ExportFormat::Raw]);

    let err = runner::run(&opts, None).unwrap_err();
    assert!(matches!(err, RunError::Source(SourceError::Io(_))));
    assert!(!out.exists());
}

#[test]
fn page_without_rows_is_unavailable() {
    let dir = tmp_dir("norows");
    let page = dir.join("page.html");
    fs::write(&page, "<html><body><p>Service unavailable</p></body></html>").unwrap();

    let opts = opts_for(Input::Html(page), dir.join("out"), vec![ExportFormat::Json]);
    let err = runner::run(&opts, None).unwrap_err();
    assert!(matches!(err, RunError::Source(SourceError::NoMatches(_))));
}
