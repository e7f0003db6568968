// Document I/O - directory creation and crash-safe record writes

use std::fs::{self, DirBuilder, File, OpenOptions};
use std::io::{self, Write};
use std::path::Path;

#[cfg(unix)]
const DIR_MODE: u32 = 0o755;
#[cfg(unix)]
const FILE_MODE: u32 = 0o644;

/// Recursively create `path` (rwxr-xr-x on Unix). Succeeds if it already exists.
pub fn create_dir_all(path: &Path) -> io::Result<()> {
    let mut builder = DirBuilder::new();
    builder.recursive(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::DirBuilderExt;
        builder.mode(DIR_MODE);
    }
    builder.create(path)
}

/// Make sure `path` is a directory. Returns true if it had to be created.
pub fn ensure_dir(path: &Path) -> io::Result<bool> {
    if path.is_dir() {
        return Ok(false);
    }
    create_dir_all(path)?;
    Ok(true)
}

/// Write `bytes` to `temp`, sync it, then rename it over `target`.
///
/// Readers of `target` see either its previous content or all of `bytes`.
/// If anything fails before the rename, `target` is left untouched and the
/// temp file is removed when possible. A crash between the two steps can
/// leave `temp` behind.
pub fn write_atomic(target: &Path, temp: &Path, bytes: &[u8]) -> io::Result<()> {
    if let Err(e) = write_synced(temp, bytes) {
        let _ = fs::remove_file(temp);
        return Err(e);
    }
    if let Err(e) = fs::rename(temp, target) {
        let _ = fs::remove_file(temp);
        return Err(e);
    }
    Ok(())
}

fn write_synced(path: &Path, bytes: &[u8]) -> io::Result<()> {
    let mut file = create_file(path)?;
    file.write_all(bytes)?;
    file.sync_all()
}

fn create_file(path: &Path) -> io::Result<File> {
    let mut options = OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(FILE_MODE);
    }
    options.open(path)
}
