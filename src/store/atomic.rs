//! Write-to-temporary-then-rename file replacement

use crate::store::{StoreError, StoreResult};
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

/// Sibling path used while `path` is being rewritten (`<path>.tmp`)
pub fn temp_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".tmp");
    PathBuf::from(name)
}

/// Replaces `path` with whatever `write` produces, atomically
///
/// Content goes to [`temp_path`] in the same directory, is flushed to disk,
/// then renamed over `path`. If any step fails the temporary file is removed
/// and `path` keeps its previous content.
pub fn write_atomic<F>(path: &Path, write: F) -> StoreResult<()>
where
    F: FnOnce(&mut dyn Write) -> io::Result<()>,
{
    let tmp = temp_path(path);

    let result = write_then_rename(&tmp, path, write);
    if let Err(source) = result {
        if tmp.exists() {
            if let Err(e) = fs::remove_file(&tmp) {
                tracing::warn!("Failed to remove {}: {}", tmp.display(), e);
            }
        }
        return Err(StoreError::Write {
            path: path.to_path_buf(),
            source,
        });
    }

    Ok(())
}

fn write_then_rename<F>(tmp: &Path, path: &Path, write: F) -> io::Result<()>
where
    F: FnOnce(&mut dyn Write) -> io::Result<()>,
{
    let mut writer = BufWriter::new(File::create(tmp)?);
    write(&mut writer)?;
    let file = writer.into_inner().map_err(|e| e.into_error())?;
    file.sync_all()?;
    drop(file);

    fs::rename(tmp, path)
}
