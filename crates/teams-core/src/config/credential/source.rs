//! Where a resolved credential came from

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

/// Credential origin, in precedence order: CLI flag, profile file, environment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CredentialSource {
    /// From a command-line flag
    CliArgument {
        /// Flag name (e.g. "--refresh-token")
        arg_name: String,
    },
    /// From the profile JSON file
    Profile {
        path: PathBuf,
    },
    /// From an environment variable
    Environment {
        var_name: String,
    },
}

impl CredentialSource {
    pub fn cli(arg_name: impl Into<String>) -> Self {
        CredentialSource::CliArgument {
            arg_name: arg_name.into(),
        }
    }

    pub fn profile(path: impl AsRef<Path>) -> Self {
        CredentialSource::Profile {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn env(var_name: impl Into<String>) -> Self {
        CredentialSource::Environment {
            var_name: var_name.into(),
        }
    }

    pub fn is_cli(&self) -> bool {
        matches!(self, CredentialSource::CliArgument { .. })
    }

    pub fn is_profile(&self) -> bool {
        matches!(self, CredentialSource::Profile { .. })
    }
}

impl fmt::Display for CredentialSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CredentialSource::CliArgument { arg_name } => write!(f, "CLI argument ({})", arg_name),
            CredentialSource::Profile { path } => write!(f, "profile ({})", path.display()),
            CredentialSource::Environment { var_name } => write!(f, "environment ({})", var_name),
        }
    }
}
