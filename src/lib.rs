// src/lib.rs
// #![allow(dead_code)]
// #![allow(unused)]

#[macro_use]
pub mod macros;
#[macro_use]
pub mod log;

#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod extract;

pub mod file;
pub mod progress;
pub mod runner;
pub mod sink;
pub mod source;

pub use error::{RunError, SinkError, SourceError};
pub use extract::{extract, extract_all, ExtractStats, Record};
