//! Named credential profiles stored as JSON under the home directory

use crate::error::{TeamsError, TeamsResult};
use chrono::Utc;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

pub const DEFAULT_PROFILE_NAME: &str = "default";

/// Directory under `$HOME` holding named profiles
pub const DEFAULT_PROFILE_DIR: &str = ".teams-cli";

/// Label reported for a profile given by explicit path
pub const PROFILE_JSON_LABEL: &str = "profile-json";

static UNSAFE_NAME_CHARS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^a-zA-Z0-9._-]").expect("valid profile name regex"));

/// On-disk profile contents
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileFile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
    /// Declared lifetime of `refresh_token`, seconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token_expires_in: Option<u64>,
    /// When `refresh_token` was issued, epoch milliseconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token_updated_at: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ests_auth_persistent: Option<String>,
    /// Last write, RFC 3339
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

impl ProfileFile {
    /// Store a refresh token; the issue time moves only when the token changed
    pub fn record_refresh_token(&mut self, refresh_token: &str, expires_in: Option<u64>) {
        let refresh_token = refresh_token.trim();
        if self.refresh_token.as_deref() != Some(refresh_token) {
            self.refresh_token = Some(refresh_token.to_string());
            self.refresh_token_updated_at = Some(Utc::now().timestamp_millis());
        }
        if expires_in.is_some() {
            self.refresh_token_expires_in = expires_in;
        }
    }

    pub fn record_ests_auth_persistent(&mut self, cookie: &str) {
        let cookie = cookie.trim();
        if !cookie.is_empty() {
            self.ests_auth_persistent = Some(cookie.to_string());
        }
    }

    fn normalized(mut self) -> Self {
        self.refresh_token = non_blank(self.refresh_token);
        self.ests_auth_persistent = non_blank(self.ests_auth_persistent);
        self
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Replace every character outside `[A-Za-z0-9._-]` with `_`; blank → `default`
pub fn normalize_profile_name(name: &str) -> String {
    let normalized = UNSAFE_NAME_CHARS.replace_all(name.trim(), "_");
    if normalized.is_empty() {
        DEFAULT_PROFILE_NAME.to_string()
    } else {
        normalized.into_owned()
    }
}

/// Location of one profile file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileStore {
    path: PathBuf,
    label: String,
}

impl ProfileStore {
    /// Resolve `--profile-json` (with `~` expansion) or `~/.teams-cli/<name>.json`
    pub fn resolve(profile_name: &str, profile_json: Option<&str>) -> TeamsResult<Self> {
        if let Some(explicit) = profile_json.map(str::trim).filter(|p| !p.is_empty()) {
            let expanded = shellexpand::tilde(explicit);
            return Ok(Self::new(PathBuf::from(expanded.as_ref()), PROFILE_JSON_LABEL));
        }

        let home = dirs::home_dir()
            .ok_or_else(|| TeamsError::config("Cannot resolve home directory"))?;
        Ok(Self::in_directory(home.join(DEFAULT_PROFILE_DIR), profile_name))
    }

    /// Named profile inside `directory`
    pub fn in_directory(directory: impl AsRef<Path>, profile_name: &str) -> Self {
        let name = normalize_profile_name(profile_name);
        let path = directory.as_ref().join(format!("{}.json", name));
        Self::new(path, name)
    }

    pub fn new(path: impl Into<PathBuf>, label: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            label: label.into(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Profile name, or `profile-json` for an explicit path
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Read the profile. Missing, unreadable or malformed files give an empty profile.
    pub fn load(&self) -> ProfileFile {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) => {
                debug!("No readable profile at {}: {}", self.path.display(), e);
                return ProfileFile::default();
            }
        };

        match serde_json::from_str::<ProfileFile>(&content) {
            Ok(profile) => profile.normalized(),
            Err(e) => {
                warn!("Ignoring malformed profile {}: {}", self.path.display(), e);
                ProfileFile::default()
            }
        }
    }

    /// Write the profile, stamping `updatedAt`. The file is owner-only on Unix.
    pub fn save(&self, profile: &ProfileFile) -> TeamsResult<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| {
                TeamsError::io_with_path(
                    format!("Failed to create profile directory: {}", e),
                    parent.display().to_string(),
                )
            })?;
        }

        let mut stamped = profile.clone();
        stamped.updated_at = Some(Utc::now().to_rfc3339());
        let content = serde_json::to_string_pretty(&stamped)?;

        fs::write(&self.path, content).map_err(|e| {
            TeamsError::io_with_path(
                format!("Failed to write profile: {}", e),
                self.path.display().to_string(),
            )
        })?;
        restrict_permissions(&self.path)?;

        debug!("Saved profile {} to {}", self.label, self.path.display());
        Ok(())
    }
}

#[cfg(unix)]
fn restrict_permissions(path: &Path) -> TeamsResult<()> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(0o600)).map_err(|e| {
        TeamsError::io_with_path(
            format!("Failed to restrict profile permissions: {}", e),
            path.display().to_string(),
        )
    })
}

#[cfg(not(unix))]
fn restrict_permissions(_path: &Path) -> TeamsResult<()> {
    Ok(())
}
