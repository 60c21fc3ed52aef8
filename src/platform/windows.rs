extern crate winapi;

use std::io;
use std::os::windows::ffi::OsStrExt;
use std::path::Path;
use winapi::shared::winerror::{ERROR_FILENAME_EXCED_RANGE, ERROR_SHARING_VIOLATION};
use winapi::um::winbase::{MoveFileExW, MOVEFILE_WRITE_THROUGH};

fn to_wide(path: &Path) -> Vec<u16> {
    path.as_os_str()
        .encode_wide()
        .chain(std::iter::once(0))
        .collect()
}

pub(crate) fn is_sharing_violation(err: &io::Error) -> bool {
    err.raw_os_error() == Some(ERROR_SHARING_VIOLATION as i32)
}

pub(crate) fn is_path_too_long(err: &io::Error) -> bool {
    err.raw_os_error() == Some(ERROR_FILENAME_EXCED_RANGE as i32)
}

/// `MoveFileExW` without `MOVEFILE_REPLACE_EXISTING`, so an existing destination
/// surfaces as `ERROR_ALREADY_EXISTS` rather than being overwritten.
pub(crate) fn move_file_no_replace(from: &Path, to: &Path) -> io::Result<()> {
    let from_wide = to_wide(from);
    let dest_wide = to_wide(to);

    let moved =
        unsafe { MoveFileExW(from_wide.as_ptr(), dest_wide.as_ptr(), MOVEFILE_WRITE_THROUGH) };

    if moved == 0 {
        return Err(io::Error::last_os_error());
    }
    Ok(())
}
