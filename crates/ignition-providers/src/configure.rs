//! Configuration provider - merged file and environment configuration.

use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use figment::providers::{Env, Format, Toml};
use figment::Figment;
use ignition_domain::value::shared;
use ignition_domain::{keys, AppContext, Provider, RunMode, SupportFlags};
use serde_json::Value;
use tracing::{debug, warn};

/// Environment prefix for configuration overrides
/// (`IGNITION_SERVER__PORT=9000` sets `server.port`).
const ENV_PREFIX: &str = "IGNITION_";

/// Read-only view over the merged configuration tree.
///
/// Values are addressed by dotted path (`server.port`). Typed getters return
/// `None` when the path is absent or the value has a different shape.
#[derive(Debug, Clone, Default)]
pub struct Configuration {
    root: Value,
}

impl Configuration {
    /// An empty configuration.
    pub fn empty() -> Self {
        Self { root: Value::Null }
    }

    /// Wrap an already-built value tree (used by tests).
    pub fn from_value(root: Value) -> Self {
        Self { root }
    }

    /// Raw value at a dotted path.
    pub fn any(&self, path: &str) -> Option<&Value> {
        let mut node = &self.root;
        for segment in path.split('.') {
            node = node.get(segment)?;
        }
        Some(node)
    }

    /// Whether a dotted path exists.
    pub fn exists(&self, path: &str) -> bool {
        self.any(path).is_some()
    }

    /// String value at a dotted path.
    pub fn str(&self, path: &str) -> Option<&str> {
        self.any(path).and_then(Value::as_str)
    }

    /// String value with a default.
    pub fn str_or<'a>(&'a self, path: &str, default: &'a str) -> &'a str {
        self.str(path).unwrap_or(default)
    }

    /// Boolean value at a dotted path.
    pub fn bool(&self, path: &str) -> Option<bool> {
        self.any(path).and_then(Value::as_bool)
    }

    /// Integer value at a dotted path.
    pub fn int(&self, path: &str) -> Option<i64> {
        self.any(path).and_then(Value::as_i64)
    }

    /// Float value at a dotted path.
    pub fn float(&self, path: &str) -> Option<f64> {
        self.any(path).and_then(Value::as_f64)
    }

    /// String array at a dotted path; non-string elements are skipped.
    pub fn strings(&self, path: &str) -> Vec<String> {
        self.any(path)
            .and_then(Value::as_array)
            .map(|items| {
                items
                    .iter()
                    .filter_map(Value::as_str)
                    .map(String::from)
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Child key names under a dotted path (empty for non-objects).
    pub fn keys(&self, path: &str) -> Vec<String> {
        self.any(path)
            .and_then(Value::as_object)
            .map(|map| map.keys().cloned().collect())
            .unwrap_or_default()
    }
}

/// Loads `app.toml` plus the run-mode overlay (`app.<mode>.toml`) from the
/// configuration directory, applies `IGNITION_*` environment overrides, and
/// binds the result under [`keys::CONFIG`].
///
/// Loading never aborts the bootstrap: on failure an empty configuration is
/// bound and the error is logged.
pub struct ConfigureProvider {
    app: OnceLock<AppContext>,
}

impl Default for ConfigureProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigureProvider {
    pub fn new() -> Self {
        Self {
            app: OnceLock::new(),
        }
    }

    fn config_dir(app: &AppContext) -> Option<PathBuf> {
        app.get_profile(keys::CONFIG_DIR)
            .and_then(|v| v.downcast_ref::<PathBuf>().cloned())
    }

    fn run_mode(app: &AppContext) -> RunMode {
        app.get_profile(keys::RUN_MODE)
            .and_then(|v| v.downcast_ref::<RunMode>().copied())
            .unwrap_or_default()
    }

    fn load(dir: &Path, mode: RunMode) -> Result<Value, figment::Error> {
        Figment::new()
            .merge(Toml::file(dir.join("app.toml")))
            .merge(Toml::file(dir.join(format!("app.{}.toml", mode.as_str()))))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()
    }
}

impl Provider for ConfigureProvider {
    fn name(&self) -> &str {
        keys::CONFIG
    }

    fn init(&self, app: AppContext) {
        let _ = self.app.set(app);
    }

    fn support(&self) -> SupportFlags {
        SupportFlags::both()
    }

    fn register(&self) {
        let app = self.app.get().expect("provider initialized");
        let mode = Self::run_mode(app);
        let config = match Self::config_dir(app) {
            Some(dir) => match Self::load(&dir, mode) {
                Ok(root) => {
                    debug!(dir = %dir.display(), mode = mode.as_str(), "configuration loaded");
                    Configuration::from_value(root)
                }
                Err(err) => {
                    warn!(%err, "configuration load failed, using empty configuration");
                    Configuration::empty()
                }
            },
            None => Configuration::empty(),
        };
        app.bind(keys::CONFIG, shared(config));
        app.alias(keys::CONFIG, keys::CONFIGURE_ALIAS);
        app.alias(keys::CONFIG, keys::CONFIGURATION_ALIAS);
    }

    fn boot(&self) {
        debug!("configuration service ready");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn dotted_paths_reach_nested_values() {
        let config = Configuration::from_value(json!({
            "server": { "port": 8080, "host": "0.0.0.0", "tls": false },
            "tags": ["a", "b", 3],
        }));

        assert_eq!(config.int("server.port"), Some(8080));
        assert_eq!(config.str("server.host"), Some("0.0.0.0"));
        assert_eq!(config.bool("server.tls"), Some(false));
        assert_eq!(config.strings("tags"), ["a", "b"]);
        assert!(config.exists("server"));
        assert!(!config.exists("server.missing"));
    }

    #[test]
    fn typed_getters_reject_mismatched_shapes() {
        let config = Configuration::from_value(json!({ "port": "8080" }));
        assert_eq!(config.int("port"), None);
        assert_eq!(config.str_or("host", "localhost"), "localhost");
    }

    #[test]
    fn run_mode_overlay_wins_over_the_base_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("app.toml"),
            "name = \"demo\"\n[server]\nport = 8080\n",
        )
        .unwrap();
        std::fs::write(
            dir.path().join("app.test.toml"),
            "[server]\nport = 9090\n",
        )
        .unwrap();

        let root = ConfigureProvider::load(dir.path(), RunMode::Test).unwrap();
        let config = Configuration::from_value(root);

        assert_eq!(config.str("name"), Some("demo"));
        assert_eq!(config.int("server.port"), Some(9090));
    }

    #[test]
    fn missing_files_produce_an_empty_tree() {
        let dir = tempfile::tempdir().unwrap();
        let root = ConfigureProvider::load(dir.path(), RunMode::Dev).unwrap();
        let config = Configuration::from_value(root);
        assert!(!config.exists("anything"));
    }
}
