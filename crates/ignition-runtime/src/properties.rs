//! Application property store and built-in default properties.
//!
//! The property store is a concurrent key -> value map holding one-time init
//! flags (`init_<phase>_state`), monotonic phase counters, the control-channel
//! sender, and arbitrary profile values. [`DefaultProps`] backs `get_profile`
//! for well-known keys that were never explicitly set.

use std::path::PathBuf;

use dashmap::DashMap;
use ignition_domain::value::shared;
use ignition_domain::{keys, RunMode, SharedService};

/// Concurrent key -> value map for process-wide state.
///
/// Counters only increase; a phase's init flag, once set, stays set for the
/// process lifetime.
#[derive(Default)]
pub struct PropertyStore {
    map: DashMap<String, SharedService>,
}

impl PropertyStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a value under `key`, replacing any previous value.
    pub fn put(&self, key: &str, value: SharedService) {
        self.map.insert(key.to_string(), value);
    }

    /// Read the value under `key`.
    pub fn get(&self, key: &str) -> Option<SharedService> {
        self.map.get(key).map(|entry| entry.value().clone())
    }

    /// Whether `key` is present.
    pub fn contains(&self, key: &str) -> bool {
        self.map.contains_key(key)
    }

    /// Read a boolean flag; absent or non-boolean values read as `false`.
    pub fn flag(&self, key: &str) -> bool {
        self.get(key)
            .and_then(|v| v.downcast_ref::<bool>().copied())
            .unwrap_or(false)
    }

    /// Read a monotonic counter; absent counters read as zero.
    pub fn counter(&self, key: &str) -> usize {
        self.get(key)
            .and_then(|v| v.downcast_ref::<usize>().copied())
            .unwrap_or(0)
    }

    /// Increment a monotonic counter, returning the new value.
    pub fn incr(&self, key: &str) -> usize {
        let mut entry = self
            .map
            .entry(key.to_string())
            .or_insert_with(|| shared(0usize));
        let next = entry
            .value()
            .downcast_ref::<usize>()
            .copied()
            .unwrap_or(0)
            + 1;
        *entry.value_mut() = shared(next);
        next
    }

    /// The one-time state key for a lifecycle phase.
    pub fn state_key(phase: &str) -> String {
        format!("init_{phase}_state")
    }

    /// Whether the phase's one-time flag is set.
    pub fn is_init(&self, phase: &str) -> bool {
        self.flag(&Self::state_key(phase))
    }

    /// Set the phase's one-time flag. Never reset within a process lifetime.
    pub fn set_init(&self, phase: &str) {
        self.put(&Self::state_key(phase), shared(true));
    }

    /// Visit every stored key/value pair.
    pub fn for_each(&self, mut visit: impl FnMut(&str, &SharedService)) {
        for entry in self.map.iter() {
            visit(entry.key(), entry.value());
        }
    }
}

impl std::fmt::Debug for PropertyStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let keys: Vec<String> = self.map.iter().map(|e| e.key().clone()).collect();
        f.debug_struct("PropertyStore").field("keys", &keys).finish()
    }
}

/// Built-in default properties detected from the process environment.
///
/// `get_profile` falls back to these for well-known keys; the lookup accepts
/// the canonical name plus its lower/snake_case synonyms.
#[derive(Debug, Clone)]
pub struct DefaultProps {
    /// Application name.
    pub app_name: String,
    /// Application version.
    pub version: String,
    /// Process base path (current working directory).
    pub base_path: PathBuf,
    /// Deployment run mode, from `RUN_MODE` (default `dev`).
    pub run_mode: RunMode,
    /// Configuration directory, from `CONFIG_DIR` (default `<base>/configs`).
    pub config_dir: PathBuf,
    /// Recognized configuration file suffixes.
    pub config_suffixes: Vec<String>,
}

impl DefaultProps {
    /// Detect defaults from the environment.
    pub fn detect() -> Self {
        let base_path = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        let run_mode = std::env::var(keys::RUN_MODE_ENV)
            .ok()
            .and_then(|mode| mode.parse().ok())
            .unwrap_or_default();
        let config_dir = std::env::var(keys::CONFIG_DIR_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|_| base_path.join("configs"));
        Self {
            app_name: "app".to_string(),
            version: "1.0.0".to_string(),
            base_path,
            run_mode,
            config_dir,
            config_suffixes: vec![".toml".to_string()],
        }
    }

    /// The canonical profile keys this default set answers for.
    pub fn keys() -> &'static [&'static str] {
        &[
            keys::APP_NAME,
            keys::VERSION,
            keys::BASE_PATH,
            keys::RUN_MODE,
            keys::CONFIG_DIR,
            keys::CONFIG_FILES_SUFFIX,
        ]
    }

    /// Resolve a well-known profile key, accepting common synonyms.
    pub fn get(&self, key: &str) -> Option<SharedService> {
        match key {
            keys::APP_NAME | "appname" | "app_name" => Some(shared(self.app_name.clone())),
            keys::VERSION | "version" => Some(shared(self.version.clone())),
            keys::BASE_PATH | "basepath" | "base_path" => Some(shared(self.base_path.clone())),
            keys::RUN_MODE | "runmode" | "run_mode" => Some(shared(self.run_mode)),
            keys::CONFIG_DIR | "configdir" | "config_dir" => Some(shared(self.config_dir.clone())),
            keys::CONFIG_FILES_SUFFIX | "configfilessuffix" | "config_files_suffix" => {
                Some(shared(self.config_suffixes.clone()))
            }
            _ => None,
        }
    }

    /// Visit every canonical key with its value.
    pub fn for_each(&self, mut visit: impl FnMut(&str, SharedService) -> bool) {
        for key in Self::keys() {
            let Some(value) = self.get(key) else { continue };
            if !visit(key, value) {
                break;
            }
        }
    }
}
