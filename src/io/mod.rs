pub mod window_io;
pub mod workbook_io;

use std::io::{self, Write};
use std::path::Path;

use tempfile::NamedTempFile;

/// Writes `content` next to `path` first, then renames it into place.
pub(crate) fn atomic_write_string(path: &Path, content: &str) -> io::Result<()> {
    let parent = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };
    let mut staged = NamedTempFile::new_in(parent)?;
    staged.write_all(content.as_bytes())?;
    staged.as_file().sync_all()?;

    staged.persist(path).map(|_| ()).or_else(|err| {
        if err.error.kind() != io::ErrorKind::AlreadyExists {
            return Err(err.error);
        }
        std::fs::remove_file(path)?;
        err.file.persist(path).map(|_| ()).map_err(|e| e.error)
    })
}
