//! Loading the single index module.
//!
//! The index module is applied straight to the root router, without a mount
//! point. The configured path may name the file itself, the file without its
//! extension, or a directory holding an `index` file.

use std::path::{Path, PathBuf};

use enrouten_core::{EnroutenError, EnroutenResult};
use enrouten_http::router::Router;

use crate::module::{Module, ModuleLoader};

/// Finds the file `path` refers to, trying in order: `path` itself,
/// `path.<ext>` for each loadable extension, then `path/index.<ext>`.
///
/// Returns `None` if none of the candidates is a file on disk.
pub fn locate(path: &Path, loader: &dyn ModuleLoader) -> Option<PathBuf> {
    if path.is_file() {
        return Some(path.to_path_buf());
    }
    let with_extension = loader.extensions().iter().map(|ext| {
        let mut candidate = path.as_os_str().to_owned();
        candidate.push(".");
        candidate.push(ext);
        PathBuf::from(candidate)
    });
    let in_directory = loader
        .extensions()
        .iter()
        .map(|ext| path.join(format!("index.{ext}")));
    with_extension.chain(in_directory).find(|candidate| candidate.is_file())
}

/// Loads the module at `path` and lets it declare its routes on `router`.
///
/// # Errors
///
/// Returns [`EnroutenError::ModuleNotFound`] if `path` does not lead to a
/// file, and [`EnroutenError::InvalidModule`] if that file is not a route
/// module. Errors from the module itself are passed through.
pub fn load_index(router: &mut Router, path: &Path, loader: &dyn ModuleLoader) -> EnroutenResult<()> {
    let file = locate(path, loader).ok_or_else(|| EnroutenError::ModuleNotFound(path.to_path_buf()))?;
    match loader.load(&file) {
        Some(Module::Factory(module)) => {
            tracing::debug!(path = %file.display(), "Loading index module");
            module.register(router)
        }
        Some(Module::Opaque) | None => Err(EnroutenError::InvalidModule(file)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::fs;

    use enrouten_core::RouterOptions;
    use enrouten_http::middleware::handler_fn;

    use crate::module::ModuleTable;

    fn touch(root: &Path, rel: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, "").unwrap();
    }

    fn table(root: &Path, key: &str) -> ModuleTable {
        ModuleTable::new()
            .factory(key, |router| {
                router.named("index").get("/", handler_fn(|_req| async { "index" }))?;
                Ok(())
            })
            .rebase(root)
    }

    fn load(root: &Path, key: &str, configured: &str) -> EnroutenResult<Router> {
        let modules = table(root, key);
        let mut router = Router::new(RouterOptions::default());
        load_index(&mut router, &root.join(configured), &modules)?;
        Ok(router)
    }

    #[test]
    fn test_exact_file() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "app/index.rs");
        let router = load(dir.path(), "app/index.rs", "app/index.rs").unwrap();
        assert_eq!(router.routes()[0].name.as_deref(), Some("index"));
    }

    #[test]
    fn test_without_extension() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "routes.rs");
        let router = load(dir.path(), "routes.rs", "routes").unwrap();
        assert_eq!(router.routes().len(), 1);
    }

    #[test]
    fn test_directory_implies_index_file() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "app/index.rs");
        let router = load(dir.path(), "app/index.rs", "app").unwrap();
        assert_eq!(router.routes().len(), 1);
    }

    #[test]
    fn test_custom_extension_candidates() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "app/index.customscript");
        let modules = table(dir.path(), "app/index.customscript").with_extension("customscript");
        assert_eq!(
            locate(&dir.path().join("app"), &modules),
            Some(dir.path().join("app/index.customscript"))
        );
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = load(dir.path(), "nope.rs", "nope").unwrap_err();
        assert!(matches!(err, EnroutenError::ModuleNotFound(ref p) if *p == dir.path().join("nope")));
        assert!(err.to_string().starts_with("Cannot find module"));
    }

    #[test]
    fn test_file_without_module_is_invalid() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "plain.rs");
        let err = load(dir.path(), "other.rs", "plain.rs").unwrap_err();
        assert!(matches!(err, EnroutenError::InvalidModule(_)));
    }

    #[test]
    fn test_opaque_module_is_invalid() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "helpers.rs");
        let modules = ModuleTable::new().opaque("helpers.rs").rebase(dir.path());
        let mut router = Router::new(RouterOptions::default());
        let result = load_index(&mut router, &dir.path().join("helpers.rs"), &modules);
        assert!(matches!(result, Err(EnroutenError::InvalidModule(_))));
    }
}
