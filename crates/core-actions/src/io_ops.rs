//! File IO helpers.
//!
//! Files are read and written verbatim: line endings are kept as-is (a
//! `'\r'` before `'\n'` occupies an offset but no screen column).

use anyhow::{Context, Result};
use core_text::Buffer;
use std::path::Path;
use tracing::{error, info};

/// Buffer name for a path: its final component.
pub fn buffer_name_for(path: &Path) -> String {
    path.file_name()
        .and_then(|s| s.to_str())
        .map(str::to_string)
        .unwrap_or_else(|| path.display().to_string())
}

/// Read `path` into a new buffer named after the file. A missing file yields
/// an empty buffer bound to that path, so saving creates it.
pub fn open_file(path: &Path) -> Result<Buffer> {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            info!(target: "io", path = %path.display(), "new_file");
            String::new()
        }
        Err(e) => {
            error!(target: "io", path = %path.display(), error = %e, "file_open_error");
            return Err(e).with_context(|| format!("cannot read {}", path.display()));
        }
    };
    let mut buffer = Buffer::from_str(buffer_name_for(path), &content)?;
    buffer.file_name = Some(path.to_path_buf());
    info!(target: "io", path = %path.display(), chars = buffer.len(), "file_opened");
    Ok(buffer)
}

/// Result of a write attempt.
#[derive(Debug, PartialEq, Eq)]
pub enum WriteFileResult {
    /// Bytes written.
    Success(usize),
    NoFilename,
}

/// Write the buffer to `target`, or to its own file name. On success the
/// target becomes the buffer's file name and the modified flag is cleared.
pub fn write_file(buffer: &mut Buffer, target: Option<&Path>) -> Result<WriteFileResult> {
    let path = match (target, buffer.file_name.as_ref()) {
        (Some(p), _) => p.to_path_buf(),
        (None, Some(existing)) => existing.clone(),
        (None, None) => return Ok(WriteFileResult::NoFilename),
    };
    let content = buffer.contents();
    std::fs::write(&path, content.as_bytes()).with_context(|| {
        error!(target: "io", path = %path.display(), "file_write_error");
        format!("cannot write {}", path.display())
    })?;
    info!(target: "io", path = %path.display(), bytes = content.len(), "file_written");
    buffer.file_name = Some(path);
    buffer.modified = false;
    Ok(WriteFileResult::Success(content.len()))
}
