// src/file.rs

use std::{
    fs::{self, File},
    io,
    path::{Path, PathBuf},
};

/// Create/truncate `path`, making its parent directory first if needed.
pub fn create_file(path: &Path) -> io::Result<File> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            ensure_directory(parent)?;
        }
    }
    File::create(path)
}

pub fn ensure_directory(dir: &Path) -> io::Result<()> {
    if dir.exists() && !dir.is_dir() {
        return Err(io::Error::new(
            io::ErrorKind::AlreadyExists,
            format!("Path exists but is not a directory: {}", dir.display()),
        ));
    }
    if !dir.exists() { fs::create_dir_all(dir)?; }
    Ok(())
}

/// Accept both `/` and `\` from the command line.
pub fn normalize_separators(p: &str) -> PathBuf {
    let sep = std::path::MAIN_SEPARATOR;
    PathBuf::from(p.chars().map(|c| if c == '/' || c == '\\' { sep } else { c }).collect::<String>())
}
