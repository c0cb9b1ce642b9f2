//! Mounting route modules discovered in a directory tree.
//!
//! Every loadable file under the scanned directory that holds a route module
//! gets its own sub-router, mounted at a path derived from where the file
//! sits:
//!
//! | file | mount point |
//! |---|---|
//! | `index.rs` | `/` |
//! | `users.rs` | `/users` |
//! | `admin/index.rs` | `/admin` |
//! | `admin/users.rs` | `/admin/users` |
//!
//! Named routes of each sub-router are registered with the mount point in
//! front of their path.

use std::path::Path;

use enrouten_core::EnroutenResult;
use enrouten_http::router::Router;
use enrouten_http::urls::registry::NamedRoutes;

use crate::module::{Module, ModuleLoader};
use crate::scanner::scan;

/// Derives the mount point for `file` found under `ancestors`.
///
/// # Examples
///
/// ```
/// use std::path::Path;
/// use enrouten_loader::directory::mount_point;
///
/// assert_eq!(mount_point(Path::new("a/b"), "c.rs"), "/a/b/c");
/// assert_eq!(mount_point(Path::new("a/b"), "index.rs"), "/a/b");
/// assert_eq!(mount_point(Path::new(""), "index.rs"), "/");
/// ```
pub fn mount_point(ancestors: &Path, file: &str) -> String {
    let mut segments: Vec<String> = ancestors
        .iter()
        .map(|segment| segment.to_string_lossy().into_owned())
        .collect();
    let stem = Path::new(file)
        .file_stem()
        .map_or_else(|| file.to_string(), |s| s.to_string_lossy().into_owned());
    if stem != "index" {
        segments.push(stem);
    }
    format!("/{}", segments.join("/"))
}

/// Scans `dir` and mounts every route module found on `router`.
///
/// Files the loader cannot load, and loadable files that are not route
/// modules, are skipped. Returns the number of modules mounted.
///
/// # Errors
///
/// Fails if `dir` cannot be scanned, a module fails to register its routes,
/// or a route name is already taken.
pub fn bind_directory(
    router: &mut Router,
    names: &mut NamedRoutes,
    dir: &Path,
    loader: &dyn ModuleLoader,
) -> EnroutenResult<usize> {
    let mut mounted = 0;
    scan(dir, |basedir, ancestors, current| {
        let path = basedir.join(ancestors).join(current);
        if !loader.handles(&path) {
            return Ok(());
        }
        let module = match loader.load(&path) {
            Some(Module::Factory(module)) => module,
            Some(Module::Opaque) | None => {
                tracing::debug!(path = %path.display(), "Skipping file without a route module");
                return Ok(());
            }
        };

        let at = mount_point(ancestors, current);
        tracing::debug!(file = current, mount_point = %at, "Mounting route module");

        let mut sub = Router::new(router.router_options());
        module.register(&mut sub)?;
        router.mount(&at, sub.middleware());

        let prefix = at.strip_suffix('/').unwrap_or(&at);
        for entry in sub.routes() {
            if let Some(name) = &entry.name {
                names.register(name, &format!("{prefix}{}", entry.path))?;
            }
        }
        mounted += 1;
        Ok(())
    })?;
    Ok(mounted)
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::fs;

    use enrouten_core::{EnroutenError, RouterOptions};
    use enrouten_http::middleware::handler_fn;

    use crate::module::ModuleTable;

    fn touch(root: &Path, rel: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, "").unwrap();
    }

    fn named_root(name: &'static str) -> impl Fn(&mut Router) -> EnroutenResult<()> + Send + Sync {
        move |router: &mut Router| {
            router.named(name).get("/", handler_fn(|_req| async { "ok" }))?;
            Ok(())
        }
    }

    #[test]
    fn test_mount_point() {
        assert_eq!(mount_point(Path::new(""), "controller.rs"), "/controller");
        assert_eq!(mount_point(Path::new(""), "index.rs"), "/");
        assert_eq!(
            mount_point(Path::new("sub/subsub"), "leaf.rs"),
            "/sub/subsub/leaf"
        );
        assert_eq!(mount_point(Path::new("sub"), "index.rs"), "/sub");
        assert_eq!(mount_point(Path::new(""), "archive.tar.rs"), "/archive.tar");
    }

    #[test]
    fn test_binds_modules_and_registers_names() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "index.rs");
        touch(dir.path(), "users.rs");
        touch(dir.path(), "admin/index.rs");
        let modules = ModuleTable::new()
            .factory("index.rs", named_root("home"))
            .factory("users.rs", named_root("users"))
            .factory("admin/index.rs", named_root("admin"))
            .rebase(dir.path());

        let mut router = Router::new(RouterOptions::default());
        let mut names = NamedRoutes::new("/foo");
        let mounted = bind_directory(&mut router, &mut names, dir.path(), &modules).unwrap();

        assert_eq!(mounted, 3);
        assert_eq!(names.path("home"), Some("/foo"));
        assert_eq!(names.path("users"), Some("/foo/users"));
        assert_eq!(names.path("admin"), Some("/foo/admin"));
        assert!(router.routes().is_empty());
    }

    #[test]
    fn test_skips_unloadable_opaque_and_unregistered() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "notes.txt");
        touch(dir.path(), "helpers.rs");
        touch(dir.path(), "stray.rs");
        touch(dir.path(), ".hidden/secret.rs");
        let modules = ModuleTable::new()
            .factory("notes.txt", named_root("notes"))
            .opaque("helpers.rs")
            .factory(".hidden/secret.rs", named_root("secret"))
            .rebase(dir.path());

        let mut router = Router::new(RouterOptions::default());
        let mut names = NamedRoutes::new("");
        let mounted = bind_directory(&mut router, &mut names, dir.path(), &modules).unwrap();

        assert_eq!(mounted, 0);
        assert!(names.is_empty());
    }

    #[test]
    fn test_duplicate_name_fails() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "a.rs");
        touch(dir.path(), "b.rs");
        let modules = ModuleTable::new()
            .factory("a.rs", named_root("same"))
            .factory("b.rs", named_root("same"))
            .rebase(dir.path());

        let mut router = Router::new(RouterOptions::default());
        let mut names = NamedRoutes::new("");
        let err = bind_directory(&mut router, &mut names, dir.path(), &modules).unwrap_err();
        assert!(matches!(err, EnroutenError::DuplicateRouteName(ref n) if n == "same"));
    }

    #[test]
    fn test_module_error_aborts() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "bad.rs");
        let modules = ModuleTable::new()
            .factory("bad.rs", |_router| {
                Err(EnroutenError::ImproperlyConfigured("bad module".into()))
            })
            .rebase(dir.path());

        let mut router = Router::new(RouterOptions::default());
        let mut names = NamedRoutes::new("");
        let result = bind_directory(&mut router, &mut names, dir.path(), &modules);
        assert!(matches!(result, Err(EnroutenError::ImproperlyConfigured(_))));
    }

    #[test]
    fn test_missing_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        let mut router = Router::new(RouterOptions::default());
        let mut names = NamedRoutes::new("");
        let result = bind_directory(
            &mut router,
            &mut names,
            &dir.path().join("missing"),
            &ModuleTable::new(),
        );
        assert!(matches!(result, Err(EnroutenError::DirectoryUnreadable { .. })));
    }
}
