// src/config/options.rs
use std::{fmt, path::PathBuf, str::FromStr, time::Duration};

use super::consts::*;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AppOptions {
    pub source: SourceOptions,
    pub export: ExportOptions,
}

impl AppOptions {
    /// Defaults with environment overrides applied.
    pub fn from_env() -> Self {
        Self::from_lookup(|k| std::env::var(k).ok())
    }

    /// Same as `from_env`, reading variables through `get`.
    pub fn from_lookup<F>(get: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut opts = Self::default();
        let lookup = |k: &str| get(k).filter(|v| !v.trim().is_empty());

        if let Some(url) = lookup(ENV_URL) {
            opts.source.input = Input::Url(url);
        }
        if let Some(ua) = lookup(ENV_USER_AGENT) {
            opts.source.user_agent = ua;
        }
        if let Some(dir) = lookup(ENV_OUT_DIR) {
            opts.export.out_dir = PathBuf::from(dir);
        }
        opts.export.database_url = lookup(ENV_DATABASE_URL);
        opts
    }
}

/// Where the raw lines come from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Input {
    /// Live page, fetched then run through the selector.
    Url(String),
    /// Saved HTML page, run through the selector.
    Html(PathBuf),
    /// Already-extracted text, one raw line per line.
    Text(PathBuf),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SourceOptions {
    pub input: Input,
    pub selector: String,
    pub user_agent: String,
    pub timeout: Duration,
}

impl Default for SourceOptions {
    fn default() -> Self {
        Self {
            input: Input::Url(s!(DEFAULT_URL)),
            selector: s!(DEFAULT_SELECTOR),
            user_agent: s!(USER_AGENT),
            timeout: Duration::from_secs(NET_TIMEOUT_SECS),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ExportFormat {
    /// Every raw line, unparsed.
    Raw,
    Csv,
    Tsv,
    Json,
    /// INSERT script for the relational table.
    Sql,
    /// Live inserts; needs the `postgres` feature and a database URL.
    Postgres,
}

impl ExportFormat {
    pub const ALL: [ExportFormat; 6] = [
        ExportFormat::Raw, ExportFormat::Csv, ExportFormat::Tsv,
        ExportFormat::Json, ExportFormat::Sql, ExportFormat::Postgres,
    ];

    pub fn ext(&self) -> &'static str {
        match self {
            ExportFormat::Raw => "txt",
            ExportFormat::Csv => "csv",
            ExportFormat::Tsv => "tsv",
            ExportFormat::Json => "json",
            ExportFormat::Sql => "sql",
            ExportFormat::Postgres => "",
        }
    }

    /// File written under the output directory; `None` when nothing is written.
    pub fn default_file_name(&self) -> Option<String> {
        match self {
            ExportFormat::Raw => Some(s!(RAW_FILE)),
            ExportFormat::Postgres => None,
            other => Some(join!(WORDS_STEM, ".", other.ext())),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ExportFormat::Raw => "raw",
            ExportFormat::Csv => "csv",
            ExportFormat::Tsv => "tsv",
            ExportFormat::Json => "json",
            ExportFormat::Sql => "sql",
            ExportFormat::Postgres => "postgres",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "raw" | "txt" | "text" => Ok(ExportFormat::Raw),
            "csv" => Ok(ExportFormat::Csv),
            "tsv" => Ok(ExportFormat::Tsv),
            "json" => Ok(ExportFormat::Json),
            "sql" => Ok(ExportFormat::Sql),
            "postgres" | "pg" => Ok(ExportFormat::Postgres),
            other => Err(format!("Unknown format: {other}")),
        }
    }
}

/// How delimited output treats fields that contain the delimiter.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Quoting {
    /// Quote fields holding the delimiter, quotes or line breaks.
    #[default]
    Rfc4180,
    /// Plain join, as the old exporter did. Commas are stripped from the word.
    Never,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExportOptions {
    pub out_dir: PathBuf,
    pub formats: Vec<ExportFormat>,
    pub include_header: bool,
    pub quoting: Quoting,
    pub pretty_json: bool,
    pub table: String,
    pub database_url: Option<String>,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            out_dir: PathBuf::from(DEFAULT_OUT_DIR),
            formats: vec![ExportFormat::Raw, ExportFormat::Csv, ExportFormat::Json],
            include_header: true,
            quoting: Quoting::Rfc4180,
            pretty_json: false,
            table: s!(DEFAULT_TABLE),
            database_url: None,
        }
    }
}

impl ExportOptions {
    /// Output path for a file-backed format.
    pub fn path_for(&self, format: ExportFormat) -> Option<PathBuf> {
        format.default_file_name().map(|name| self.out_dir.join(name))
    }
}
