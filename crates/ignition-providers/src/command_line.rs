//! Command-line provider - parses process arguments into a shared service.

use std::path::PathBuf;
use std::sync::OnceLock;

use clap::error::ErrorKind;
use clap::Parser;
use ignition_domain::value::shared;
use ignition_domain::{keys, AppContext, Provider, SupportFlags};
use tracing::{debug, warn};

/// Options recognised on the process command line.
#[derive(Parser, Debug, Clone, Default, PartialEq, Eq)]
#[command(name = "ignition", version)]
pub struct CliOptions {
    /// Configuration file to load instead of the discovered defaults.
    #[arg(short = 'f', long = "file")]
    pub file: Option<PathBuf>,

    /// Extra directories searched for configuration files.
    #[arg(short = 'p', long = "paths", value_delimiter = ',')]
    pub paths: Vec<PathBuf>,

    /// Reader script or binary used to preprocess configuration input.
    #[arg(short = 'r', long = "reader")]
    pub reader: Option<PathBuf>,
}

/// Parses the process arguments during `register` and binds the result under
/// [`keys::COMMAND_LINE`].
///
/// `--help` and `--version` print their output and raise the stop flag so the
/// run loop exits before waiting; any other parse failure falls back to the
/// default options rather than aborting the bootstrap.
pub struct CommandLineProvider {
    app: OnceLock<AppContext>,
    args: Vec<String>,
}

impl Default for CommandLineProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl CommandLineProvider {
    /// Parse the real process arguments.
    pub fn new() -> Self {
        Self {
            app: OnceLock::new(),
            args: std::env::args().collect(),
        }
    }

    /// Parse a fixed argument vector (argv[0] included).
    pub fn from_args(args: Vec<String>) -> Self {
        Self {
            app: OnceLock::new(),
            args,
        }
    }
}

impl Provider for CommandLineProvider {
    fn name(&self) -> &str {
        keys::COMMAND_LINE
    }

    fn init(&self, app: AppContext) {
        let _ = self.app.set(app);
    }

    fn support(&self) -> SupportFlags {
        SupportFlags::both()
    }

    fn register(&self) {
        let app = self.app.get().expect("provider initialized");
        let options = match CliOptions::try_parse_from(&self.args) {
            Ok(options) => options,
            Err(err)
                if matches!(
                    err.kind(),
                    ErrorKind::DisplayHelp | ErrorKind::DisplayVersion
                ) =>
            {
                let _ = err.print();
                app.put_profile(keys::HELP_STOP, shared(true));
                CliOptions::default()
            }
            Err(err) => {
                warn!(error = %err, "command line parse failed, using defaults");
                CliOptions::default()
            }
        };
        app.bind(keys::COMMAND_LINE, shared(options));
    }

    fn boot(&self) {
        debug!("command line options published");
    }
}
