// src/error.rs
//
// Malformed definition lines are not errors: the extractor skips them and
// counts them in `ExtractStats`. Everything here is I/O on either side of it.

use std::io;

/// The input could not be obtained. Fatal for the run, never retried here.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("URL has no host: {0}")]
    MalformedUrl(String),

    #[error("unsupported URL scheme '{0}' (only http:// is supported)")]
    UnsupportedScheme(String),

    #[error("HTTP error: {status}")]
    Http { status: String },

    #[error("malformed HTTP response")]
    MalformedResponse,

    #[error("invalid selector '{0}' (expected tag, tag.class or parent>child)")]
    InvalidSelector(String),

    #[error("selector '{0}' matched nothing")]
    NoMatches(String),
}

/// A sink could not store a record. Fatal for that sink only.
#[derive(Debug, thiserror::Error)]
pub enum SinkError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{0} output has no file path")]
    NoPath(String),

    #[error("invalid table name '{0}'")]
    InvalidTable(String),

    #[error("database error: {0}")]
    Database(String),
}

#[cfg(feature = "postgres")]
impl From<sqlx::Error> for SinkError {
    fn from(e: sqlx::Error) -> Self {
        SinkError::Database(e.to_string())
    }
}

/// Error type for callers that want one error out of a whole run.
#[derive(Debug, thiserror::Error)]
pub enum RunError {
    #[error("source unavailable: {0}")]
    Source(#[from] SourceError),

    #[error("sink '{sink}' failed: {source}")]
    Sink {
        sink: String,
        #[source]
        source: SinkError,
    },
}
