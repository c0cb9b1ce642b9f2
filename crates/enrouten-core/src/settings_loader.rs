//! Settings loading from configuration files.
//!
//! This module provides functions to load [`Settings`] from TOML files, JSON
//! files, and to apply environment variable overrides.
//!
//! ## Loading Order
//!
//! 1. Start with default settings.
//! 2. Load from a TOML or JSON file (overriding defaults).
//! 3. Apply environment variable overrides (highest priority).
//!
//! ## Environment Variable Mapping
//!
//! | Env Var | Setting |
//! |---|---|
//! | `ENROUTEN_DEBUG` | `debug` |
//! | `ENROUTEN_LOG_LEVEL` | `log_level` |
//! | `ENROUTEN_BIND_ADDRESS` | `bind_address` |
//! | `ENROUTEN_BASEDIR` | `basedir` |
//! | `ENROUTEN_MOUNTPATH` | `mountpath` |
//! | `ENROUTEN_INDEX` | `index` |
//! | `ENROUTEN_DIRECTORY` | `directory` |
//! | `ENROUTEN_CASE_SENSITIVE` | `router.case_sensitive` |
//! | `ENROUTEN_STRICT` | `router.strict` |
//!
//! ## Examples
//!
//! ```rust,no_run
//! use enrouten_core::settings_loader;
//!
//! let settings = settings_loader::from_toml_file("config/routes.toml").unwrap();
//! let settings = settings_loader::from_toml_file_with_env("config/routes.toml").unwrap();
//! ```

use std::path::{Path, PathBuf};

use crate::error::EnroutenError;
use crate::settings::Settings;

/// Loads settings from a TOML string.
///
/// Any fields not present in the TOML keep their default values.
///
/// # Errors
///
/// Returns an error if the TOML is malformed or cannot be deserialized.
pub fn from_toml_str(toml_str: &str) -> Result<Settings, EnroutenError> {
    // TOML is converted to JSON and merged over the serialized defaults, so
    // partial files (including partial `[router]` tables) keep the defaults.
    let toml_value: toml::Value = toml::from_str(toml_str)
        .map_err(|e| EnroutenError::ConfigurationError(format!("Failed to parse TOML: {e}")))?;

    let json_value = toml_to_json(toml_value);
    merge_over_defaults(json_value, "TOML")
}

/// Loads settings from a TOML file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or the TOML is malformed.
pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Settings, EnroutenError> {
    let content = read_config(path.as_ref(), "TOML")?;
    from_toml_str(&content)
}

/// Loads settings from a TOML file and then applies environment variable overrides.
///
/// # Errors
///
/// Returns an error if the file cannot be read or the TOML is malformed.
pub fn from_toml_file_with_env(path: impl AsRef<Path>) -> Result<Settings, EnroutenError> {
    let mut settings = from_toml_file(path)?;
    apply_env_overrides(&mut settings);
    Ok(settings)
}

/// Loads settings from a JSON string.
///
/// # Errors
///
/// Returns an error if the JSON is malformed or cannot be deserialized.
pub fn from_json_str(json_str: &str) -> Result<Settings, EnroutenError> {
    let json_value: serde_json::Value = serde_json::from_str(json_str)
        .map_err(|e| EnroutenError::ConfigurationError(format!("Failed to parse JSON: {e}")))?;
    merge_over_defaults(json_value, "JSON")
}

/// Loads settings from a JSON file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or the JSON is malformed.
pub fn from_json_file(path: impl AsRef<Path>) -> Result<Settings, EnroutenError> {
    let content = read_config(path.as_ref(), "JSON")?;
    from_json_str(&content)
}

/// Loads settings from a JSON file and then applies environment variable overrides.
///
/// # Errors
///
/// Returns an error if the file cannot be read or the JSON is malformed.
pub fn from_json_file_with_env(path: impl AsRef<Path>) -> Result<Settings, EnroutenError> {
    let mut settings = from_json_file(path)?;
    apply_env_overrides(&mut settings);
    Ok(settings)
}

/// Loads settings from just environment variables (starting from defaults).
pub fn from_env() -> Settings {
    let mut settings = Settings::default();
    apply_env_overrides(&mut settings);
    settings
}

/// Applies `ENROUTEN_*` environment variable overrides to a settings struct.
///
/// Boolean variables accept "true", "1" and "yes" (case-insensitive) as true;
/// anything else is false.
pub fn apply_env_overrides(settings: &mut Settings) {
    if let Ok(val) = std::env::var("ENROUTEN_DEBUG") {
        settings.debug = parse_flag(&val);
    }

    if let Ok(val) = std::env::var("ENROUTEN_LOG_LEVEL") {
        settings.log_level = val;
    }

    if let Ok(val) = std::env::var("ENROUTEN_BIND_ADDRESS") {
        settings.bind_address = val;
    }

    if let Ok(val) = std::env::var("ENROUTEN_BASEDIR") {
        settings.basedir = Some(PathBuf::from(val));
    }

    if let Ok(val) = std::env::var("ENROUTEN_MOUNTPATH") {
        settings.mountpath = Some(val);
    }

    if let Ok(val) = std::env::var("ENROUTEN_INDEX") {
        settings.index = Some(PathBuf::from(val));
    }

    if let Ok(val) = std::env::var("ENROUTEN_DIRECTORY") {
        settings.directory = Some(PathBuf::from(val));
    }

    if let Ok(val) = std::env::var("ENROUTEN_CASE_SENSITIVE") {
        settings.router.case_sensitive = parse_flag(&val);
    }

    if let Ok(val) = std::env::var("ENROUTEN_STRICT") {
        settings.router.strict = parse_flag(&val);
    }
}

// ============================================================
// Helpers
// ============================================================

fn parse_flag(val: &str) -> bool {
    matches!(val.to_lowercase().as_str(), "true" | "1" | "yes")
}

fn read_config(path: &Path, format: &str) -> Result<String, EnroutenError> {
    std::fs::read_to_string(path).map_err(|e| {
        EnroutenError::ConfigurationError(format!(
            "Failed to read {format} file '{}': {e}",
            path.display()
        ))
    })
}

fn merge_over_defaults(
    value: serde_json::Value,
    format: &str,
) -> Result<Settings, EnroutenError> {
    let default_json = serde_json::to_value(Settings::default()).map_err(|e| {
        EnroutenError::ConfigurationError(format!("Failed to serialize default settings: {e}"))
    })?;

    let merged = merge_json(default_json, value);
    serde_json::from_value(merged).map_err(|e| {
        EnroutenError::ConfigurationError(format!(
            "Failed to deserialize settings from {format}: {e}"
        ))
    })
}

/// Converts a TOML value to a `serde_json::Value`.
fn toml_to_json(value: toml::Value) -> serde_json::Value {
    match value {
        toml::Value::String(s) => serde_json::Value::String(s),
        toml::Value::Integer(i) => serde_json::json!(i),
        toml::Value::Float(f) => serde_json::json!(f),
        toml::Value::Boolean(b) => serde_json::Value::Bool(b),
        toml::Value::Datetime(dt) => serde_json::Value::String(dt.to_string()),
        toml::Value::Array(arr) => {
            serde_json::Value::Array(arr.into_iter().map(toml_to_json).collect())
        }
        toml::Value::Table(table) => {
            let map: serde_json::Map<String, serde_json::Value> = table
                .into_iter()
                .map(|(k, v)| (k, toml_to_json(v)))
                .collect();
            serde_json::Value::Object(map)
        }
    }
}

/// Deep-merges two JSON values. The `override_val` takes precedence.
fn merge_json(base: serde_json::Value, override_val: serde_json::Value) -> serde_json::Value {
    match (base, override_val) {
        (serde_json::Value::Object(mut base_map), serde_json::Value::Object(override_map)) => {
            for (key, override_v) in override_map {
                let merged = if let Some(base_v) = base_map.remove(&key) {
                    merge_json(base_v, override_v)
                } else {
                    override_v
                };
                base_map.insert(key, merged);
            }
            serde_json::Value::Object(base_map)
        }
        (_, override_val) => override_val,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::Mutex;

    // Environment variables are process-global; tests touching them take this lock.
    static ENV_LOCK: Mutex<()> = Mutex::new(());

    // ── TOML loading ────────────────────────────────────────────────

    #[test]
    fn test_from_toml_str_basic() {
        let toml = r#"
            mountpath = "/foo"
            directory = "controllers"
            debug = false
        "#;

        let settings = from_toml_str(toml).unwrap();
        assert_eq!(settings.mountpath.as_deref(), Some("/foo"));
        assert_eq!(settings.directory, Some(PathBuf::from("controllers")));
        assert!(!settings.debug);
        // Defaults preserved
        assert_eq!(settings.log_level, "info");
        assert!(settings.index.is_none());
    }

    #[test]
    fn test_from_toml_str_partial_router_table() {
        let toml = r"
            [router]
            strict = true
        ";

        let settings = from_toml_str(toml).unwrap();
        assert!(settings.router.strict);
        assert!(!settings.router.case_sensitive);
    }

    #[test]
    fn test_from_toml_str_empty() {
        let settings = from_toml_str("").unwrap();
        assert!(settings.debug);
        assert!(settings.basedir.is_none());
    }

    #[test]
    fn test_from_toml_str_invalid() {
        let result = from_toml_str("[[invalid toml content");
        assert!(matches!(result, Err(EnroutenError::ConfigurationError(_))));
    }

    #[test]
    fn test_from_toml_str_wrong_type() {
        let result = from_toml_str("debug = \"sometimes\"");
        assert!(result.is_err());
    }

    // ── JSON loading ────────────────────────────────────────────────

    #[test]
    fn test_from_json_str_basic() {
        let json = r#"{
            "index": "routes/index",
            "router": { "case_sensitive": true },
            "log_level": "debug"
        }"#;

        let settings = from_json_str(json).unwrap();
        assert_eq!(settings.index, Some(PathBuf::from("routes/index")));
        assert!(settings.router.case_sensitive);
        assert!(!settings.router.strict);
        assert_eq!(settings.log_level, "debug");
    }

    #[test]
    fn test_from_json_str_empty_object() {
        let settings = from_json_str("{}").unwrap();
        assert!(settings.debug);
        assert!(settings.mountpath.is_none());
    }

    #[test]
    fn test_from_json_str_invalid() {
        assert!(from_json_str("{invalid json").is_err());
    }

    // ── File loading ────────────────────────────────────────────────

    #[test]
    fn test_from_toml_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("enrouten.toml");
        std::fs::write(&path, "mountpath = \"/api/\"\ndebug = false\n").unwrap();

        let settings = from_toml_file(&path).unwrap();
        assert_eq!(settings.normalized_mountpath(), "/api");
        assert!(!settings.debug);
    }

    #[test]
    fn test_from_json_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("enrouten.json");
        std::fs::write(&path, r#"{"directory": "routes", "debug": false}"#).unwrap();

        let settings = from_json_file(&path).unwrap();
        assert_eq!(settings.directory, Some(PathBuf::from("routes")));
        assert!(!settings.debug);
    }

    #[test]
    fn test_from_toml_file_missing() {
        let result = from_toml_file("/nonexistent/path/enrouten.toml");
        assert!(result.is_err());
    }

    #[test]
    fn test_from_json_file_missing() {
        let result = from_json_file("/nonexistent/path/enrouten.json");
        assert!(result.is_err());
    }

    // ── Environment variable overrides ──────────────────────────────

    #[test]
    fn test_apply_env_overrides_paths() {
        let _guard = ENV_LOCK.lock().unwrap();
        let mut settings = Settings::default();
        std::env::set_var("ENROUTEN_BASEDIR", "/srv/app");
        std::env::set_var("ENROUTEN_DIRECTORY", "controllers");
        std::env::set_var("ENROUTEN_MOUNTPATH", "/foo");
        apply_env_overrides(&mut settings);
        assert_eq!(settings.basedir, Some(PathBuf::from("/srv/app")));
        assert_eq!(settings.directory, Some(PathBuf::from("controllers")));
        assert_eq!(settings.mountpath.as_deref(), Some("/foo"));
        std::env::remove_var("ENROUTEN_BASEDIR");
        std::env::remove_var("ENROUTEN_DIRECTORY");
        std::env::remove_var("ENROUTEN_MOUNTPATH");
    }

    #[test]
    fn test_apply_env_overrides_router_flags() {
        let _guard = ENV_LOCK.lock().unwrap();
        let mut settings = Settings::default();
        std::env::set_var("ENROUTEN_CASE_SENSITIVE", "1");
        std::env::set_var("ENROUTEN_STRICT", "YES");
        apply_env_overrides(&mut settings);
        assert!(settings.router.case_sensitive);
        assert!(settings.router.strict);
        std::env::remove_var("ENROUTEN_CASE_SENSITIVE");
        std::env::remove_var("ENROUTEN_STRICT");
    }

    #[test]
    fn test_apply_env_overrides_debug_false() {
        let _guard = ENV_LOCK.lock().unwrap();
        let mut settings = Settings::default();
        std::env::set_var("ENROUTEN_DEBUG", "false");
        apply_env_overrides(&mut settings);
        assert!(!settings.debug);
        std::env::remove_var("ENROUTEN_DEBUG");
    }

    #[test]
    fn test_from_env() {
        let _guard = ENV_LOCK.lock().unwrap();
        std::env::set_var("ENROUTEN_LOG_LEVEL", "debug");
        std::env::set_var("ENROUTEN_INDEX", "routes");
        let settings = from_env();
        assert_eq!(settings.log_level, "debug");
        assert_eq!(settings.index, Some(PathBuf::from("routes")));
        std::env::remove_var("ENROUTEN_LOG_LEVEL");
        std::env::remove_var("ENROUTEN_INDEX");
    }

    #[test]
    fn test_toml_with_env_override() {
        let _guard = ENV_LOCK.lock().unwrap();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("enrouten_env.toml");
        std::fs::write(&path, "bind_address = \"0.0.0.0:3000\"\ndebug = true\n").unwrap();

        std::env::set_var("ENROUTEN_BIND_ADDRESS", "127.0.0.1:9000");
        std::env::set_var("ENROUTEN_DEBUG", "false");

        let settings = from_toml_file_with_env(&path).unwrap();
        assert_eq!(settings.bind_address, "127.0.0.1:9000");
        assert!(!settings.debug);

        std::env::remove_var("ENROUTEN_BIND_ADDRESS");
        std::env::remove_var("ENROUTEN_DEBUG");
    }

    // ── merge_json helper ───────────────────────────────────────────

    #[test]
    fn test_merge_json_nested() {
        let base = serde_json::json!({"outer": {"a": 1, "b": 2}});
        let over = serde_json::json!({"outer": {"b": 3}});
        let merged = merge_json(base, over);
        assert_eq!(merged["outer"]["a"], 1);
        assert_eq!(merged["outer"]["b"], 3);
    }

    #[test]
    fn test_merge_json_array_override() {
        let base = serde_json::json!({"list": [1, 2, 3]});
        let over = serde_json::json!({"list": [4, 5]});
        let merged = merge_json(base, over);
        assert_eq!(merged["list"], serde_json::json!([4, 5]));
    }

    #[test]
    fn test_toml_to_json() {
        let toml_val: toml::Value = toml::from_str(
            r#"
            name = "test"
            count = 42
            flag = true
            [nested]
            key = "value"
        "#,
        )
        .unwrap();

        let json = toml_to_json(toml_val);
        assert_eq!(json["name"], "test");
        assert_eq!(json["count"], 42);
        assert_eq!(json["flag"], true);
        assert_eq!(json["nested"]["key"], "value");
    }
}
