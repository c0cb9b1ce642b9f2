//! Path resolution for configured files and directories.

use std::path::{Path, PathBuf};

/// Resolves `file` against `basedir`.
///
/// Absolute paths are returned unchanged; relative ones are joined onto
/// `basedir`. No filesystem access takes place.
///
/// # Examples
///
/// ```
/// use std::path::{Path, PathBuf};
/// use enrouten_loader::resolve::resolve;
///
/// assert_eq!(resolve(Path::new("/app"), Path::new("controllers")), PathBuf::from("/app/controllers"));
/// assert_eq!(resolve(Path::new("/app"), Path::new("/srv/routes")), PathBuf::from("/srv/routes"));
/// ```
pub fn resolve(basedir: &Path, file: &Path) -> PathBuf {
    if file.is_absolute() {
        file.to_path_buf()
    } else {
        basedir.join(file)
    }
}
