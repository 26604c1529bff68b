//! Environment provider - process environment snapshot plus `.env` overlay.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use ignition_domain::value::shared;
use ignition_domain::{keys, AppContext, Provider, SupportFlags};
use tracing::{debug, warn};

/// Immutable snapshot of the process environment.
///
/// Variables from an optional `.env` file in the application base path are
/// overlaid on top of the real environment, so file entries win for keys
/// present in both.
#[derive(Debug, Clone, Default)]
pub struct EnvStore {
    vars: HashMap<String, String>,
}

impl EnvStore {
    /// Snapshot the current process environment.
    pub fn from_process() -> Self {
        Self {
            vars: std::env::vars().collect(),
        }
    }

    /// Build a store from explicit pairs (used by tests).
    pub fn from_pairs(pairs: impl IntoIterator<Item = (String, String)>) -> Self {
        Self {
            vars: pairs.into_iter().collect(),
        }
    }

    /// Overlay `KEY=VALUE` lines from a dotenv-style file. Missing files are
    /// fine; unreadable ones are logged and skipped.
    pub fn overlay_file(&mut self, path: &Path) {
        let contents = match std::fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return,
            Err(err) => {
                warn!(path = %path.display(), %err, "skipping unreadable env file");
                return;
            }
        };
        for line in contents.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            if let Some((key, value)) = line.split_once('=') {
                let key = key.trim();
                if key.is_empty() {
                    continue;
                }
                let value = value.trim().trim_matches('"');
                self.vars.insert(key.to_string(), value.to_string());
            }
        }
    }

    /// Look up a variable.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.vars.get(key).map(String::as_str)
    }

    /// Look up a variable, falling back to a default.
    pub fn get_or<'a>(&'a self, key: &str, default: &'a str) -> &'a str {
        self.get(key).unwrap_or(default)
    }

    /// Whether a variable is set.
    pub fn contains(&self, key: &str) -> bool {
        self.vars.contains_key(key)
    }

    /// Number of variables in the snapshot.
    pub fn len(&self) -> usize {
        self.vars.len()
    }

    /// Whether the snapshot is empty.
    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }

    /// Expand `${VAR}` references in `input` against this snapshot. Unknown
    /// variables expand to the empty string.
    pub fn expand(&self, input: &str) -> String {
        let mut out = String::with_capacity(input.len());
        let mut rest = input;
        while let Some(start) = rest.find("${") {
            out.push_str(&rest[..start]);
            match rest[start + 2..].find('}') {
                Some(end) => {
                    let name = &rest[start + 2..start + 2 + end];
                    if let Some(value) = self.get(name) {
                        out.push_str(value);
                    }
                    rest = &rest[start + 2 + end + 1..];
                }
                None => {
                    // Unterminated reference, keep the raw text.
                    out.push_str(&rest[start..]);
                    rest = "";
                }
            }
        }
        out.push_str(rest);
        out
    }
}

/// Publishes an [`EnvStore`] under [`keys::ENVIRONMENT`] with the short alias
/// [`keys::ENV_ALIAS`].
pub struct EnvironmentProvider {
    app: OnceLock<AppContext>,
}

impl Default for EnvironmentProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl EnvironmentProvider {
    pub fn new() -> Self {
        Self {
            app: OnceLock::new(),
        }
    }

    fn base_path(app: &AppContext) -> Option<PathBuf> {
        app.get_profile(keys::BASE_PATH)
            .and_then(|v| v.downcast_ref::<PathBuf>().cloned())
    }
}

impl Provider for EnvironmentProvider {
    fn name(&self) -> &str {
        keys::ENVIRONMENT
    }

    fn init(&self, app: AppContext) {
        let _ = self.app.set(app);
    }

    fn support(&self) -> SupportFlags {
        SupportFlags::register_only()
    }

    fn register(&self) {
        let app = self.app.get().expect("provider initialized");
        let mut store = EnvStore::from_process();
        if let Some(base) = Self::base_path(app) {
            store.overlay_file(&base.join(".env"));
        }
        debug!(vars = store.len(), "environment snapshot published");
        app.bind(keys::ENVIRONMENT, shared(store));
        app.alias(keys::ENVIRONMENT, keys::ENV_ALIAS);
    }
}
