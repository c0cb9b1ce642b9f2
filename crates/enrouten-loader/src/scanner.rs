//! Recursive directory scanning.
//!
//! [`scan`] walks a directory tree depth-first and calls a visitor for every
//! file it finds. Entries whose name starts with `.` are skipped at every
//! depth, together with everything below them. Children are visited in
//! byte-wise name order, so the walk is the same on every platform.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use enrouten_core::{EnroutenError, EnroutenResult};

/// Walks `basedir` and calls `visitor(basedir, ancestors, file_name)` for
/// every file below it.
///
/// `ancestors` is the directory path from `basedir` to the file (empty for
/// files directly inside `basedir`). A visitor error stops the walk and is
/// returned as is.
///
/// # Errors
///
/// Returns [`EnroutenError::DirectoryUnreadable`] if `basedir` or any
/// directory below it cannot be listed.
pub fn scan<F>(basedir: &Path, mut visitor: F) -> EnroutenResult<()>
where
    F: FnMut(&Path, &Path, &str) -> EnroutenResult<()>,
{
    let metadata = fs::metadata(basedir).map_err(|source| unreadable(basedir, source))?;
    if !metadata.is_dir() {
        return Err(unreadable(basedir, io::Error::other("not a directory")));
    }
    walk(basedir, Path::new(""), &mut visitor)
}

fn walk<F>(basedir: &Path, ancestors: &Path, visitor: &mut F) -> EnroutenResult<()>
where
    F: FnMut(&Path, &Path, &str) -> EnroutenResult<()>,
{
    let dir = basedir.join(ancestors);
    let mut names = Vec::new();
    for entry in fs::read_dir(&dir).map_err(|source| unreadable(&dir, source))? {
        let entry = entry.map_err(|source| unreadable(&dir, source))?;
        match entry.file_name().into_string() {
            Ok(name) => names.push(name),
            Err(name) => {
                tracing::warn!(dir = %dir.display(), name = ?name, "Skipping entry with non UTF-8 name");
            }
        }
    }
    names.sort_unstable();

    for name in names {
        if name.starts_with('.') {
            continue;
        }
        let path = dir.join(&name);
        // Follows symlinks.
        let metadata = fs::metadata(&path).map_err(|source| unreadable(&path, source))?;
        if metadata.is_dir() {
            walk(basedir, &ancestors.join(&name), visitor)?;
        } else if metadata.is_file() {
            visitor(basedir, ancestors, &name)?;
        }
    }
    Ok(())
}

fn unreadable(path: &Path, source: io::Error) -> EnroutenError {
    EnroutenError::DirectoryUnreadable {
        path: PathBuf::from(path),
        source,
    }
}
