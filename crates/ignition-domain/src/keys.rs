//! Well-known container and profile keys.
//!
//! Keys shared between the runtime and the default providers. Providers bind
//! their services under these names so consumers never couple to concrete
//! provider types.

/// Container key the application binds itself under during IoC init.
pub const APP: &str = "app";

/// Container key resolved on every health tick; must hold a
/// [`HealthCheck`](crate::value::HealthCheck).
pub const APP_HEALTH: &str = "app.health";

/// Profile flag requesting the run loop exit before entering its wait state
/// (set by `--help` handling or by `stop()` racing ahead of `start_up()`).
pub const HELP_STOP: &str = "_stop";

/// Container key for the parsed command-line options service.
pub const COMMAND_LINE: &str = "commandLine";

/// Container key for the environment snapshot service.
pub const ENVIRONMENT: &str = "environment";

/// Short alias for [`ENVIRONMENT`].
pub const ENV_ALIAS: &str = "env";

/// Container key for the merged configuration service.
pub const CONFIG: &str = "config";

/// Aliases for [`CONFIG`].
pub const CONFIGURE_ALIAS: &str = "configure";
pub const CONFIGURATION_ALIAS: &str = "Configuration";

/// Container key for the logger handle.
pub const LOGGER: &str = "logger";

/// Profile keys for the default property set.
pub const APP_NAME: &str = "AppName";
pub const VERSION: &str = "Version";
pub const BASE_PATH: &str = "BasePath";
pub const RUN_MODE: &str = "RunMode";
pub const CONFIG_DIR: &str = "ConfigDir";
pub const CONFIG_FILES_SUFFIX: &str = "ConfigFilesSuffix";

/// Environment variables consulted when detecting default properties.
pub const RUN_MODE_ENV: &str = "RUN_MODE";
pub const CONFIG_DIR_ENV: &str = "CONFIG_DIR";
