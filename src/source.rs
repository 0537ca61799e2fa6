// src/source.rs
//
// Turns the configured input into the ordered raw lines the extractor eats.
// Knows nothing about words or definitions.

use std::{fs, path::Path};

use crate::config::options::{Input, SourceOptions};
use crate::core::{html::Selector, net};
use crate::error::SourceError;

/// Fetch/read the input and return its raw lines in document order.
pub fn load_lines(opts: &SourceOptions) -> Result<Vec<String>, SourceError> {
    let lines = match &opts.input {
        Input::Url(url) => {
            let selector = Selector::parse(&opts.selector)?;
            logf!("Fetching {url}");
            let doc = net::http_get(url, &opts.user_agent, opts.timeout)?;
            select_lines(&doc, &selector, &opts.selector)?
        }
        Input::Html(path) => {
            let selector = Selector::parse(&opts.selector)?;
            logf!("Reading {}", path.display());
            let doc = read_lossy(path)?;
            select_lines(&doc, &selector, &opts.selector)?
        }
        Input::Text(path) => {
            logf!("Reading {}", path.display());
            text_lines(&read_lossy(path)?)
        }
    };
    logf!("Loaded {} raw lines", lines.len());
    Ok(lines)
}

/// Run `selector` over an HTML document. A page with no matches is treated
/// as unavailable: the markup changed or we got an error page.
pub fn select_lines(doc: &str, selector: &Selector, raw_selector: &str) -> Result<Vec<String>, SourceError> {
    let lines = selector.select_text(doc);
    if lines.is_empty() {
        return Err(SourceError::NoMatches(raw_selector.to_string()));
    }
    Ok(lines)
}

/// One raw line per text line; line endings dropped, content kept as-is.
pub fn text_lines(text: &str) -> Vec<String> {
    text.lines().map(str::to_string).collect()
}

fn read_lossy(path: &Path) -> Result<String, SourceError> {
    let bytes = fs::read(path)?;
    Ok(match String::from_utf8(bytes) {
        Ok(s) => s,
        Err(e) => String::from_utf8_lossy(&e.into_bytes()).into_owned(),
    })
}
