// src/extract.rs
//! Line-to-record extraction.
//!
//! The scraped page is a flat list of text fragments that alternate
//! word / definition:
//!
//! ```text
//! 12
//! (noun) If someone says 12, they are referring to the police.
//! ```
//!
//! A definition line must carry its grammatical type in the first `(...)`.
//! When it doesn't, the line is dropped together with the pending word and
//! pairing restarts on the next line (resynchronization). Drops are never
//! errors; they are counted in [`ExtractStats`].
//!
//! Each call to [`extract`] owns its own state, so independent passes can
//! run side by side.

use std::mem::take;

use serde::{Deserialize, Serialize};

use crate::core::sanitize::normalize_punctuation;

/// One dictionary entry.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    pub word: String,
    /// Grammatical type, verbatim from between the parentheses.
    #[serde(rename = "type")]
    pub kind: String,
    pub definition: String,
}

impl Record {
    pub fn new(word: impl Into<String>, kind: impl Into<String>, definition: impl Into<String>) -> Self {
        Self { word: word.into(), kind: kind.into(), definition: definition.into() }
    }

    /// Fields in column order: word, type, definition.
    pub fn fields(&self) -> [&str; 3] {
        [&self.word, &self.kind, &self.definition]
    }
}

/// What happened during one pass.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ExtractStats {
    pub records: usize,
    /// Definition lines without a usable `(...)`; their words are gone too.
    pub skipped: usize,
    /// Input ended right after a word line.
    pub dangling_word: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum State {
    ExpectWord,
    ExpectDefinition,
}

/// Lazy record iterator over a line source. Built by [`extract`].
#[derive(Clone, Debug)]
pub struct Records<I> {
    lines: I,
    state: State,
    word: String,
    stats: ExtractStats,
}

impl<I> Records<I> {
    /// Counters so far; final once the iterator has returned `None`.
    pub fn stats(&self) -> ExtractStats {
        self.stats
    }
}

impl<I, S> Iterator for Records<I>
where
    I: Iterator<Item = S>,
    S: AsRef<str>,
{
    type Item = Record;

    fn next(&mut self) -> Option<Record> {
        loop {
            let Some(line) = self.lines.next() else {
                self.stats.dangling_word = self.state == State::ExpectDefinition;
                return None;
            };
            let line = line.as_ref();

            match self.state {
                State::ExpectWord => {
                    self.word = line.trim().to_string();
                    self.state = State::ExpectDefinition;
                }
                State::ExpectDefinition => {
                    self.state = State::ExpectWord;
                    match split_definition(line) {
                        Some((kind, definition)) => {
                            self.stats.records += 1;
                            return Some(Record {
                                word: take(&mut self.word),
                                kind: kind.to_string(),
                                definition,
                            });
                        }
                        None => {
                            self.stats.skipped += 1;
                            logd!("skipping {:?}: no (type) in {:?}", self.word, line);
                            self.word.clear();
                        }
                    }
                }
            }
        }
    }
}

/// Start a fresh extraction pass over `lines`.
pub fn extract<I>(lines: I) -> Records<I::IntoIter>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    Records {
        lines: lines.into_iter(),
        state: State::ExpectWord,
        word: s!(),
        stats: ExtractStats::default(),
    }
}

/// Eager form of [`extract`].
pub fn extract_all<I>(lines: I) -> (Vec<Record>, ExtractStats)
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    let mut records = extract(lines);
    let out: Vec<Record> = records.by_ref().collect();
    (out, records.stats())
}

/// `(type) definition` → `(type, normalized definition)`.
/// Needs a `(` and a first `)` after it; text before the `(` is ignored.
pub fn split_definition(line: &str) -> Option<(&str, String)> {
    let lp = line.find('(')?;
    let rp = line.find(')')?;
    if rp <= lp {
        return None;
    }
    Some((&line[lp + 1..rp], normalize_punctuation(&line[rp + 1..])))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_entry() {
        let (recs, stats) = extract_all(["12", "(noun) If someone says 12, they mean police."]);
        assert_eq!(recs, vec![Record::new("12", "noun", "If someone says 12, they mean police.")]);
        assert_eq!(stats, ExtractStats { records: 1, skipped: 0, dangling_word: false });
    }

    #[test]
    fn empty_input() {
        let (recs, stats) = extract_all(Vec::<String>::new());
        assert!(recs.is_empty());
        assert_eq!(stats, ExtractStats::default());
    }

    #[test]
    fn missing_parens_resynchronizes() {
        let (recs, stats) = extract_all(["shook", "so confused"]);
        assert!(recs.is_empty());
        assert_eq!(stats.skipped, 1);
        assert!(!stats.dangling_word);

        // the line after the bad one is a new word, not a definition
        let (recs, _) = extract_all(["shook", "so confused", "bet", "(interj) okay"]);
        assert_eq!(recs, vec![Record::new("bet", "interj", "okay")]);
    }

    #[test]
    fn malformed_line_is_not_retried_as_word() {
        // "(adj) fine" would be a valid definition for "a"; it's consumed as the word instead.
        let (recs, stats) = extract_all(["a", "no type here", "(adj) fine", "(noun) thing"]);
        assert_eq!(recs, vec![Record::new("(adj) fine", "noun", "thing")]);
        assert_eq!(stats.skipped, 1);
    }

    #[test]
    fn trailing_word_dropped() {
        let (recs, stats) = extract_all(["fire", "(adj) great", "lit"]);
        assert_eq!(recs, vec![Record::new("fire", "adj", "great")]);
        assert!(stats.dangling_word);
    }

    #[test]
    fn close_before_open_is_malformed() {
        assert_eq!(split_definition("a) b (c"), None);
        assert_eq!(split_definition("()"), Some(("", s!())));
        assert_eq!(split_definition("no parens"), None);
        assert_eq!(split_definition("(open only"), None);
        assert_eq!(split_definition("close only)"), None);
    }

    #[test]
    fn type_is_verbatim_definition_normalized() {
        let (kind, def) = split_definition("x ( adj.) \u{201C}dope\u{201D} \u{2014} it\u{2019}s good (really) ").unwrap();
        assert_eq!(kind, " adj.");
        assert_eq!(def, "\"dope\" - it's good (really)");
    }

    #[test]
    fn even_length_well_formed_yields_half() {
        let mut lines = Vec::new();
        for i in 0..50 {
            lines.push(format!("word{i}"));
            lines.push(format!("(t{i}) def {i}"));
        }
        let (recs, stats) = extract_all(&lines);
        assert_eq!(recs.len(), lines.len() / 2);
        assert_eq!(stats.records, 50);
        for (i, r) in recs.iter().enumerate() {
            assert_eq!(r.word, format!("word{i}"));
            assert_eq!(r.kind, format!("t{i}"));
            assert_eq!(r.definition, format!("def {i}"));
        }
    }

    #[test]
    fn empty_word_line_is_accepted() {
        let (recs, _) = extract_all(["", "(noun) nameless"]);
        assert_eq!(recs, vec![Record::new("", "noun", "nameless")]);
    }

    #[test]
    fn word_keeps_commas_and_is_trimmed() {
        let (recs, _) = extract_all(["  on fleek, fr ", "(adj) perfect"]);
        assert_eq!(recs[0].word, "on fleek, fr");
    }

    #[test]
    fn passes_are_independent() {
        let lines = ["a", "(n) one", "dangling"];
        let mut first = extract(lines);
        assert!(first.next().is_some());
        // a new pass starts from scratch, whatever the first one is doing
        let (recs, _) = extract_all(lines);
        assert_eq!(recs.len(), 1);
        assert!(first.next().is_none());
        assert!(first.stats().dangling_word);
    }

    #[test]
    fn lazy_consumption() {
        let mut pulled = 0usize;
        let lines = ["a", "(n) one", "b", "(n) two"].into_iter().inspect(|_| pulled += 1);
        let mut it = extract(lines);
        assert_eq!(it.next().map(|r| r.word), Some(s!("a")));
        drop(it);
        assert_eq!(pulled, 2);
    }

    #[test]
    fn records_are_send() {
        fn assert_send<T: Send>(_: &T) {}
        assert_send(&extract(vec![s!("a")]));
    }

    #[test]
    fn serializes_type_key() {
        let json = serde_json::to_string(&Record::new("w", "noun", "d")).unwrap();
        assert_eq!(json, r#"{"word":"w","type":"noun","definition":"d"}"#);
    }
}
