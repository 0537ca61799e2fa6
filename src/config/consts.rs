// src/config/consts.rs

// Source
pub const DEFAULT_URL: &str = "http://www.english.uga.edu/def/";
/// A browser UA; the site has been known to turn away obvious bots.
pub const USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10.6; rv:16.0) Gecko/20100101 Firefox/16.0";
pub const DEFAULT_SELECTOR: &str = "div.row>div";
pub const NET_TIMEOUT_SECS: u64 = 15;

// Export
pub const DEFAULT_OUT_DIR: &str = "out";
pub const RAW_FILE: &str = "results.txt";
pub const WORDS_STEM: &str = "words";
pub const CSV_HEADER: [&str; 3] = ["word", "type", "definition"];

// Relational
pub const DEFAULT_TABLE: &str = "DawgSpeak";

// Environment overrides
pub const ENV_URL: &str = "DAWG_URL";
pub const ENV_USER_AGENT: &str = "DAWG_USER_AGENT";
pub const ENV_OUT_DIR: &str = "DAWG_OUT_DIR";
pub const ENV_DATABASE_URL: &str = "DATABASE_URL";
