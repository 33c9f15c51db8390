use std::{fs, path::Path};

use crate::error::{FileSystemError, FileSystemResult};

/// Removes the specified file or directory, ignoring a missing path.
///
/// A directory is removed recursively together with its contents, a file is
/// removed directly. A path that does not exist is not an error.
pub fn safe_remove<P: AsRef<Path>>(path: P) -> FileSystemResult<()> {
    let path = path.as_ref();

    if !path.exists() {
        return Ok(());
    }

    let result = if path.is_dir() {
        fs::remove_dir_all(path)
    } else {
        fs::remove_file(path)
    };

    result.map_err(|err| FileSystemError::File {
        path: path.to_path_buf(),
        action: "remove",
        source: err,
    })
}

/// Creates a directory structure if it doesn't exist.
///
/// If the path exists but is not a directory, this function returns an error.
pub fn ensure_dir_exists<P: AsRef<Path>>(path: P) -> FileSystemResult<()> {
    let path = path.as_ref();
    if !path.exists() {
        fs::create_dir_all(path).map_err(|err| FileSystemError::Directory {
            path: path.to_path_buf(),
            action: "create",
            source: err,
        })?;
    } else if !path.is_dir() {
        return Err(FileSystemError::NotADirectory {
            path: path.to_path_buf(),
        });
    }

    Ok(())
}
