//! Run mode - the deployment profile the process runs under.

use std::fmt;
use std::str::FromStr;

/// Supported run modes, mirroring the `RUN_MODE` environment variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RunMode {
    /// Local development (the default).
    #[default]
    Dev,
    /// Test runs.
    Test,
    /// Local integration.
    Local,
    /// Production.
    Prod,
    /// Staging.
    Staging,
}

impl RunMode {
    /// Canonical short name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Dev => "dev",
            Self::Test => "test",
            Self::Local => "local",
            Self::Prod => "prod",
            Self::Staging => "stg",
        }
    }

    /// All supported modes.
    pub fn supported() -> &'static [RunMode] {
        &[
            Self::Dev,
            Self::Test,
            Self::Local,
            Self::Prod,
            Self::Staging,
        ]
    }
}

impl fmt::Display for RunMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RunMode {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "dev" => Ok(Self::Dev),
            "test" => Ok(Self::Test),
            "local" => Ok(Self::Local),
            "prod" => Ok(Self::Prod),
            "stg" => Ok(Self::Staging),
            other => Err(crate::Error::configuration(format!(
                "unsupported run mode: {other}"
            ))),
        }
    }
}
