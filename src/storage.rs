// src/storage.rs
//! Whole-file writes via temp file + rename, so a killed run leaves the
//! previous file untouched.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::error::{FeedError, Result};

fn tmp_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

pub fn write_atomic(path: &Path, contents: &str) -> Result<()> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        fs::create_dir_all(dir).map_err(|e| FeedError::io(dir, e))?;
    }
    let tmp = tmp_path(path);
    let mut f = fs::File::create(&tmp).map_err(|e| FeedError::io(&tmp, e))?;
    f.write_all(contents.as_bytes())
        .and_then(|()| f.sync_all())
        .map_err(|e| FeedError::io(&tmp, e))?;
    fs::rename(&tmp, path).map_err(|e| FeedError::io(path, e))?;
    Ok(())
}
