//! The named-route table.
//!
//! [`NamedRoutes`] maps route names to fully composed path templates. Every
//! source of named routes (index module, directory modules, explicit
//! definitions) funnels through [`NamedRoutes::register`], so a name can be
//! claimed exactly once across the whole application.

use std::collections::BTreeMap;

use enrouten_core::settings::normalize_mountpath;
use enrouten_core::{EnroutenError, EnroutenResult};

use super::template::PathTemplate;

/// Name → path template table, prefixed with a fixed mount path.
#[derive(Debug, Clone, Default)]
pub struct NamedRoutes {
    mountpath: String,
    routes: BTreeMap<String, PathTemplate>,
}

impl NamedRoutes {
    /// Creates an empty table. The mount path is normalized first, so `/`
    /// and `""` both mean "no prefix" and `/foo/` becomes `/foo`.
    pub fn new(mountpath: &str) -> Self {
        Self {
            mountpath: normalize_mountpath(mountpath),
            routes: BTreeMap::new(),
        }
    }

    /// The normalized mount path every registered path is prefixed with.
    pub fn mountpath(&self) -> &str {
        &self.mountpath
    }

    /// Registers `name` for `path`, prefixed with the mount path.
    ///
    /// Empty names are ignored. Returns the composed path that was stored.
    ///
    /// # Errors
    ///
    /// Returns [`EnroutenError::DuplicateRouteName`] if `name` is already
    /// registered. The existing entry is left untouched.
    pub fn register(&mut self, name: &str, path: &str) -> EnroutenResult<Option<&PathTemplate>> {
        if name.is_empty() {
            return Ok(None);
        }
        if self.routes.contains_key(name) {
            return Err(EnroutenError::DuplicateRouteName(name.to_string()));
        }

        let composed = compose_path(&self.mountpath, path);
        tracing::debug!(name, path = %composed, "Registered named route");
        let template = self
            .routes
            .entry(name.to_string())
            .or_insert_with(|| PathTemplate::parse(&composed));
        Ok(Some(template))
    }

    /// Looks up the template registered for `name`.
    pub fn get(&self, name: &str) -> Option<&PathTemplate> {
        self.routes.get(name)
    }

    /// Looks up the composed path string registered for `name`.
    pub fn path(&self, name: &str) -> Option<&str> {
        self.routes.get(name).map(PathTemplate::as_str)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.routes.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// Iterates `(name, template)` pairs in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &PathTemplate)> {
        self.routes.iter().map(|(name, t)| (name.as_str(), t))
    }

    /// Snapshot of the table as plain `name → path` strings.
    pub fn to_map(&self) -> BTreeMap<String, String> {
        self.routes
            .iter()
            .map(|(name, t)| (name.clone(), t.as_str().to_string()))
            .collect()
    }
}

/// Joins a normalized mount path and a route path, stripping one trailing
/// slash unless the result is exactly `/`.
///
/// # Examples
///
/// ```
/// use enrouten_http::urls::registry::compose_path;
///
/// assert_eq!(compose_path("/foo", "/"), "/foo");
/// assert_eq!(compose_path("", "/bar/"), "/bar");
/// assert_eq!(compose_path("", "/"), "/");
/// ```
pub fn compose_path(mountpath: &str, path: &str) -> String {
    let mut composed = format!("{mountpath}{path}");
    if composed.len() > 1 && composed.ends_with('/') {
        composed.pop();
    }
    composed
}
