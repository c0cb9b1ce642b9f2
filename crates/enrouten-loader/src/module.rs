//! Route modules and the table that finds them.
//!
//! A route module is a factory that declares routes on a [`Router`] it is
//! handed. Rust has no runtime module loading, so the embedding application
//! registers its modules up front in a [`ModuleTable`], keyed by the file
//! path the module lives at. The scanners then ask the table, through the
//! [`ModuleLoader`] trait, what each discovered file is.
//!
//! # Examples
//!
//! ```
//! use std::path::Path;
//! use enrouten_http::middleware::handler_fn;
//! use enrouten_loader::module::{Module, ModuleLoader, ModuleTable};
//!
//! let modules = ModuleTable::new()
//!     .factory("controllers/users.rs", |router| {
//!         router.named("user-list").get("/", handler_fn(|_req| async { "users" }))?;
//!         Ok(())
//!     })
//!     .opaque("controllers/helpers.rs")
//!     .rebase(Path::new("/app"));
//!
//! assert!(matches!(modules.load(Path::new("/app/controllers/users.rs")), Some(Module::Factory(_))));
//! assert!(matches!(modules.load(Path::new("/app/controllers/helpers.rs")), Some(Module::Opaque)));
//! assert!(modules.load(Path::new("/app/controllers/other.rs")).is_none());
//! ```

use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use enrouten_core::EnroutenResult;
use enrouten_http::router::Router;

use crate::resolve::resolve;

/// A factory that declares routes on the router it is given.
pub trait RouteModule: Send + Sync {
    /// Declares this module's routes on `router`.
    ///
    /// # Errors
    ///
    /// Any error aborts setup.
    fn register(&self, router: &mut Router) -> EnroutenResult<()>;
}

impl<F> RouteModule for F
where
    F: Fn(&mut Router) -> EnroutenResult<()> + Send + Sync,
{
    fn register(&self, router: &mut Router) -> EnroutenResult<()> {
        self(router)
    }
}

/// What a loadable file turned out to contain.
#[derive(Clone)]
pub enum Module {
    /// A route module factory.
    Factory(Arc<dyn RouteModule>),
    /// A loadable file that is not a route module (helpers, shared code).
    Opaque,
}

impl fmt::Debug for Module {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Factory(_) => f.write_str("Factory(..)"),
            Self::Opaque => f.write_str("Opaque"),
        }
    }
}

/// Maps file paths to modules.
pub trait ModuleLoader: Send + Sync {
    /// File extensions (without the dot) this loader can load.
    fn extensions(&self) -> &[String];

    /// Returns the module at `path`, or `None` if nothing is registered there.
    fn load(&self, path: &Path) -> Option<Module>;

    /// Returns `true` if `path` has one of the loadable extensions.
    fn handles(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| self.extensions().iter().any(|known| known == ext))
    }
}

/// The default [`ModuleLoader`]: an explicit path → module table.
///
/// Keys may be relative; [`rebase`](Self::rebase) resolves them against the
/// directory the application is configured from. Only `.rs` files are
/// loadable unless more extensions are added with
/// [`with_extension`](Self::with_extension).
#[derive(Clone)]
pub struct ModuleTable {
    extensions: Vec<String>,
    modules: HashMap<PathBuf, Module>,
}

impl ModuleTable {
    pub fn new() -> Self {
        Self {
            extensions: vec!["rs".to_string()],
            modules: HashMap::new(),
        }
    }

    /// Adds a loadable extension. A leading dot is ignored.
    #[must_use]
    pub fn with_extension(mut self, extension: &str) -> Self {
        let extension = extension.trim_start_matches('.').to_string();
        if !self.extensions.contains(&extension) {
            self.extensions.push(extension);
        }
        self
    }

    /// Registers a closure factory at `path`.
    #[must_use]
    pub fn factory<F>(self, path: impl AsRef<Path>, factory: F) -> Self
    where
        F: Fn(&mut Router) -> EnroutenResult<()> + Send + Sync + 'static,
    {
        self.module(path, factory)
    }

    /// Registers a [`RouteModule`] at `path`.
    #[must_use]
    pub fn module(mut self, path: impl AsRef<Path>, module: impl RouteModule + 'static) -> Self {
        self.modules.insert(
            path.as_ref().to_path_buf(),
            Module::Factory(Arc::new(module)),
        );
        self
    }

    /// Marks `path` as a loadable file that is not a route module.
    #[must_use]
    pub fn opaque(mut self, path: impl AsRef<Path>) -> Self {
        self.modules
            .insert(path.as_ref().to_path_buf(), Module::Opaque);
        self
    }

    /// Resolves every relative key against `basedir`.
    #[must_use]
    pub fn rebase(self, basedir: &Path) -> Self {
        let modules = self
            .modules
            .into_iter()
            .map(|(path, module)| (resolve(basedir, &path), module))
            .collect();
        Self {
            extensions: self.extensions,
            modules,
        }
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }
}

impl Default for ModuleTable {
    fn default() -> Self {
        Self::new()
    }
}

impl ModuleLoader for ModuleTable {
    fn extensions(&self) -> &[String] {
        &self.extensions
    }

    fn load(&self, path: &Path) -> Option<Module> {
        self.modules.get(path).cloned()
    }
}

impl fmt::Debug for ModuleTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut paths: Vec<_> = self.modules.keys().collect();
        paths.sort();
        f.debug_struct("ModuleTable")
            .field("extensions", &self.extensions)
            .field("modules", &paths)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use enrouten_core::RouterOptions;
    use enrouten_http::middleware::handler_fn;

    struct Users;

    impl RouteModule for Users {
        fn register(&self, router: &mut Router) -> EnroutenResult<()> {
            router.named("users").get("/", handler_fn(|_req| async { "users" }))?;
            Ok(())
        }
    }

    #[test]
    fn test_default_extensions() {
        let table = ModuleTable::new();
        assert_eq!(table.extensions(), &["rs".to_string()]);
        assert!(table.handles(Path::new("/a/b.rs")));
        assert!(!table.handles(Path::new("/a/b.txt")));
        assert!(!table.handles(Path::new("/a/rs")));
    }

    #[test]
    fn test_with_extension() {
        let table = ModuleTable::new()
            .with_extension(".customscript")
            .with_extension("customscript");
        assert_eq!(table.extensions().len(), 2);
        assert!(table.handles(Path::new("x.customscript")));
    }

    #[test]
    fn test_factory_and_struct_modules_register() {
        let table = ModuleTable::new()
            .factory("/a.rs", |router| {
                router.get("/a", handler_fn(|_req| async { "a" }))?;
                Ok(())
            })
            .module("/b.rs", Users);

        let mut router = Router::new(RouterOptions::default());
        for path in ["/a.rs", "/b.rs"] {
            match table.load(Path::new(path)) {
                Some(Module::Factory(module)) => module.register(&mut router).unwrap(),
                other => panic!("expected a factory at {path}, got {other:?}"),
            }
        }
        assert_eq!(router.routes().len(), 2);
        assert_eq!(router.routes()[1].name.as_deref(), Some("users"));
    }

    #[test]
    fn test_rebase_resolves_relative_keys() {
        let table = ModuleTable::new()
            .opaque("rel/x.rs")
            .opaque("/abs/y.rs")
            .rebase(Path::new("/base"));

        assert!(table.load(Path::new("/base/rel/x.rs")).is_some());
        assert!(table.load(Path::new("/abs/y.rs")).is_some());
        assert!(table.load(Path::new("rel/x.rs")).is_none());
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn test_lookup_is_component_wise() {
        let table = ModuleTable::new().opaque("/base/a/b.rs");
        assert!(table.load(Path::new("/base//a/./b.rs")).is_some());
    }
}
