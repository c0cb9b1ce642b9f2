//! Setup configuration for enrouten-rs.
//!
//! [`Settings`] holds the serializable part of an `enrouten` setup call: where
//! to look for route modules, the mount path the resulting middleware will
//! live under, and the [`RouterOptions`] forwarded to every router created
//! during setup. Handlers and module factories are code, not configuration,
//! and are supplied separately by the embedding application.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Options forwarded to every router and sub-router created during setup.
///
/// # Examples
///
/// ```
/// use enrouten_core::settings::RouterOptions;
///
/// let options = RouterOptions::default();
/// assert!(!options.case_sensitive);
/// assert!(!options.strict);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouterOptions {
    /// Whether path matching distinguishes `/Foo` from `/foo`.
    pub case_sensitive: bool,
    /// Whether a trailing slash on the request path must match the route exactly.
    pub strict: bool,
}

/// The complete set of setup settings.
///
/// # Examples
///
/// ```
/// use enrouten_core::settings::Settings;
///
/// let settings = Settings::default();
/// assert!(settings.debug);
/// assert_eq!(settings.normalized_mountpath(), "");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    // ── Core ─────────────────────────────────────────────────────────

    /// Whether debug mode is enabled.
    pub debug: bool,
    /// The log level filter (e.g. "info", "debug", "enrouten_loader=debug").
    pub log_level: String,
    /// The address `App::run` binds when none is given explicitly.
    pub bind_address: String,

    // ── Route sources ────────────────────────────────────────────────

    /// Directory relative paths are resolved against. Defaults to the
    /// process working directory when unset.
    pub basedir: Option<PathBuf>,
    /// URL prefix the assembled middleware is mounted under.
    pub mountpath: Option<String>,
    /// A single route module applied to the root router without a prefix.
    pub index: Option<PathBuf>,
    /// A directory scanned for route modules, one mount point per file.
    pub directory: Option<PathBuf>,

    // ── Router ───────────────────────────────────────────────────────

    /// Options forwarded to every router created during setup.
    pub router: RouterOptions,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            debug: true,
            log_level: "info".to_string(),
            bind_address: "127.0.0.1:8000".to_string(),
            basedir: None,
            mountpath: None,
            index: None,
            directory: None,
            router: RouterOptions::default(),
        }
    }
}

impl Settings {
    /// Returns the mount path with `/` and empty both collapsed to `""` and
    /// any trailing slash removed.
    pub fn normalized_mountpath(&self) -> String {
        normalize_mountpath(self.mountpath.as_deref().unwrap_or(""))
    }

    /// Returns the configured base directory, or the working directory when
    /// none was configured.
    pub fn resolved_basedir(&self) -> std::io::Result<PathBuf> {
        match &self.basedir {
            Some(dir) => Ok(dir.clone()),
            None => std::env::current_dir(),
        }
    }

    /// Sets the base directory.
    #[must_use]
    pub fn with_basedir(mut self, basedir: impl AsRef<Path>) -> Self {
        self.basedir = Some(basedir.as_ref().to_path_buf());
        self
    }

    /// Sets the mount path.
    #[must_use]
    pub fn with_mountpath(mut self, mountpath: impl Into<String>) -> Self {
        self.mountpath = Some(mountpath.into());
        self
    }

    /// Sets the index module path.
    #[must_use]
    pub fn with_index(mut self, index: impl AsRef<Path>) -> Self {
        self.index = Some(index.as_ref().to_path_buf());
        self
    }

    /// Sets the directory to scan for route modules.
    #[must_use]
    pub fn with_directory(mut self, directory: impl AsRef<Path>) -> Self {
        self.directory = Some(directory.as_ref().to_path_buf());
        self
    }

    /// Sets the router options.
    #[must_use]
    pub const fn with_router_options(mut self, router: RouterOptions) -> Self {
        self.router = router;
        self
    }
}

/// Normalizes a mount path: `/` and `""` become `""`, one trailing slash is stripped.
pub fn normalize_mountpath(mountpath: &str) -> String {
    if mountpath.is_empty() || mountpath == "/" {
        return String::new();
    }
    mountpath
        .strip_suffix('/')
        .unwrap_or(mountpath)
        .to_string()
}
