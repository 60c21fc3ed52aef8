#[cfg(target_os = "windows")]
pub mod windows;

use std::io;
use std::path::Path;

/// True when the error means another process currently holds the file open.
#[cfg(target_os = "windows")]
pub fn is_sharing_violation(err: &io::Error) -> bool {
    windows::is_sharing_violation(err)
}

#[cfg(not(target_os = "windows"))]
pub fn is_sharing_violation(err: &io::Error) -> bool {
    err.kind() == io::ErrorKind::ResourceBusy
}

/// True when the OS rejected the path for being too long.
#[cfg(target_os = "windows")]
pub fn is_path_too_long(err: &io::Error) -> bool {
    windows::is_path_too_long(err)
}

#[cfg(not(target_os = "windows"))]
pub fn is_path_too_long(err: &io::Error) -> bool {
    err.kind() == io::ErrorKind::InvalidFilename
}

/// Rename `from` to `to`, failing with `AlreadyExists` instead of replacing an existing file.
#[cfg(target_os = "windows")]
pub fn rename_no_replace(from: &Path, to: &Path) -> io::Result<()> {
    windows::move_file_no_replace(from, to)
}

#[cfg(not(target_os = "windows"))]
pub fn rename_no_replace(from: &Path, to: &Path) -> io::Result<()> {
    // Not atomic with the rename itself; a file appearing in between is overwritten.
    if std::fs::symlink_metadata(to).is_ok() {
        return Err(io::Error::new(
            io::ErrorKind::AlreadyExists,
            format!("destination {} already exists", to.display()),
        ));
    }
    std::fs::rename(from, to)
}
