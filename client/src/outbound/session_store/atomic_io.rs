//! Atomic file replacement inside a capability directory.
//!
//! The session blob is written to a hidden temporary file next to the
//! target and renamed over it, so a crash mid-write never leaves a truncated
//! session behind.

use std::io::{self, Write};
use std::sync::atomic::{AtomicU64, Ordering};

use cap_std::fs::{Dir, OpenOptions};

static TEMP_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Replace `file_name` in `dir` with `contents`.
///
/// # Errors
///
/// Returns the underlying I/O error when the temporary file cannot be
/// written or renamed. The temporary file is removed on failure.
pub(super) fn write_atomic(dir: &Dir, file_name: &str, contents: &[u8]) -> io::Result<()> {
    let counter = TEMP_COUNTER.fetch_add(1, Ordering::Relaxed);
    let tmp_name = format!(".{file_name}.tmp.{}.{counter}", std::process::id());

    if let Err(error) = write_temp(dir, &tmp_name, contents) {
        discard(dir, &tmp_name);
        return Err(error);
    }
    if let Err(error) = replace(dir, &tmp_name, file_name) {
        discard(dir, &tmp_name);
        return Err(error);
    }
    sync_directory(dir);
    Ok(())
}

fn write_temp(dir: &Dir, tmp_name: &str, contents: &[u8]) -> io::Result<()> {
    let mut options = OpenOptions::new();
    options.write(true).create_new(true);
    let mut file = dir.open_with(tmp_name, &options)?;
    file.write_all(contents)?;
    file.sync_all()
}

#[cfg(windows)]
fn replace(dir: &Dir, tmp_name: &str, target_name: &str) -> io::Result<()> {
    // Windows rename fails if the target exists.
    match dir.remove_file(target_name) {
        Ok(()) => {}
        Err(error) if error.kind() == io::ErrorKind::NotFound => {}
        Err(error) => return Err(error),
    }
    dir.rename(tmp_name, dir, target_name)
}

#[cfg(not(windows))]
fn replace(dir: &Dir, tmp_name: &str, target_name: &str) -> io::Result<()> {
    dir.rename(tmp_name, dir, target_name)
}

fn discard(dir: &Dir, tmp_name: &str) {
    drop(dir.remove_file(tmp_name));
}

fn sync_directory(dir: &Dir) {
    drop(dir.open(".").and_then(|handle| handle.sync_all()));
}
