//! Credential resolver
//!
//! Picks the refresh token and session cookie for a run and decides whether
//! the session bootstrap should run before the first API call.

use super::source::CredentialSource;
use crate::config::profile::ProfileFile;
use crate::error::{TeamsError, TeamsResult};
use chrono::{DateTime, Utc};
use std::env;
use std::path::Path;
use tracing::debug;

pub const REFRESH_TOKEN_ENV: &str = "REFRESH_TOKEN";
pub const ESTS_AUTH_PERSISTENT_ENV: &str = "ESTSAUTHPERSISTENT";

/// A profile refresh token this close to its declared expiry is replaced up front
pub const REFRESH_TOKEN_RENEWAL_MARGIN_SECS: i64 = 60 * 60;

/// Values given on the command line
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CliOverrides {
    pub refresh_token: Option<String>,
    pub ests_auth_persistent: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedCredential {
    pub value: String,
    pub source: CredentialSource,
}

impl ResolvedCredential {
    pub fn new(value: impl Into<String>, source: CredentialSource) -> Self {
        Self {
            value: value.into(),
            source,
        }
    }
}

/// Outcome of a resolution
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedCredentials {
    pub refresh_token: Option<ResolvedCredential>,
    pub ests_auth_persistent: Option<ResolvedCredential>,
    /// Declared lifetime of the profile's refresh token, seconds
    pub refresh_token_expires_in: Option<u64>,
    /// Issue time of the profile's refresh token, epoch milliseconds
    pub refresh_token_updated_at: Option<i64>,
}

impl ResolvedCredentials {
    /// Fail when neither a refresh token nor a session cookie is available
    pub fn ensure_available(&self) -> TeamsResult<()> {
        if self.refresh_token.is_none() && self.ests_auth_persistent.is_none() {
            return Err(TeamsError::config(
                "No refresh token found. Use --ests-auth-persistent, run `teams login`, \
                 --profile-json file, or set ESTSAUTHPERSISTENT / REFRESH_TOKEN in env.",
            ));
        }
        Ok(())
    }

    /// Whether the session bootstrap should replace the refresh token before any API call.
    ///
    /// Requires a session cookie. True when no refresh token resolved, or when the
    /// profile's token is within [`REFRESH_TOKEN_RENEWAL_MARGIN_SECS`] of its declared
    /// expiry. A token given by flag is never replaced.
    pub fn needs_eager_refresh(&self, now: DateTime<Utc>) -> bool {
        if self.ests_auth_persistent.is_none() {
            return false;
        }

        let Some(refresh_token) = &self.refresh_token else {
            return true;
        };
        if !refresh_token.source.is_profile() {
            return false;
        }

        match (self.refresh_token_updated_at, self.refresh_token_expires_in) {
            (Some(updated_at_ms), Some(expires_in)) => {
                let lifetime_ms = i64::try_from(expires_in)
                    .unwrap_or(i64::MAX)
                    .saturating_mul(1000);
                let renew_at_ms = updated_at_ms
                    .saturating_add(lifetime_ms)
                    .saturating_sub(REFRESH_TOKEN_RENEWAL_MARGIN_SECS * 1000);
                renew_at_ms <= now.timestamp_millis()
            }
            _ => false,
        }
    }
}

/// Resolves credentials: CLI flag, then profile file, then environment
pub struct CredentialResolver {
    overrides: CliOverrides,
    env_lookup: fn(&str) -> Option<String>,
}

impl CredentialResolver {
    pub fn new(overrides: CliOverrides) -> Self {
        Self {
            overrides,
            env_lookup: |name| env::var(name).ok(),
        }
    }

    /// Replace the environment lookup (tests)
    pub fn with_env_lookup(mut self, lookup: fn(&str) -> Option<String>) -> Self {
        self.env_lookup = lookup;
        self
    }

    pub fn resolve(&self, profile: &ProfileFile, profile_path: &Path) -> ResolvedCredentials {
        let refresh_token = self.resolve_one(
            self.overrides.refresh_token.as_deref(),
            "--refresh-token",
            profile.refresh_token.as_deref(),
            profile_path,
            REFRESH_TOKEN_ENV,
        );
        let ests_auth_persistent = self.resolve_one(
            self.overrides.ests_auth_persistent.as_deref(),
            "--ests-auth-persistent",
            profile.ests_auth_persistent.as_deref(),
            profile_path,
            ESTS_AUTH_PERSISTENT_ENV,
        );

        let from_profile = refresh_token
            .as_ref()
            .is_some_and(|token| token.source.is_profile());

        ResolvedCredentials {
            refresh_token,
            ests_auth_persistent,
            refresh_token_expires_in: from_profile
                .then_some(profile.refresh_token_expires_in)
                .flatten(),
            refresh_token_updated_at: from_profile
                .then_some(profile.refresh_token_updated_at)
                .flatten(),
        }
    }

    fn resolve_one(
        &self,
        cli_value: Option<&str>,
        arg_name: &str,
        profile_value: Option<&str>,
        profile_path: &Path,
        env_var: &str,
    ) -> Option<ResolvedCredential> {
        if let Some(value) = non_blank(cli_value) {
            debug!("Using {} from CLI argument", arg_name);
            return Some(ResolvedCredential::new(value, CredentialSource::cli(arg_name)));
        }

        if let Some(value) = non_blank(profile_value) {
            debug!("Using {} from profile {}", env_var, profile_path.display());
            return Some(ResolvedCredential::new(
                value,
                CredentialSource::profile(profile_path),
            ));
        }

        let from_env = (self.env_lookup)(env_var);
        if let Some(value) = non_blank(from_env.as_deref()) {
            debug!("Using {} from environment", env_var);
            return Some(ResolvedCredential::new(value, CredentialSource::env(env_var)));
        }

        None
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    fn full_env(name: &str) -> Option<String> {
        match name {
            REFRESH_TOKEN_ENV => Some("env-token".to_string()),
            ESTS_AUTH_PERSISTENT_ENV => Some("env-cookie".to_string()),
            _ => None,
        }
    }

    fn profile_with_token(updated_at: Option<i64>, expires_in: Option<u64>) -> ProfileFile {
        ProfileFile {
            refresh_token: Some("profile-token".to_string()),
            refresh_token_updated_at: updated_at,
            refresh_token_expires_in: expires_in,
            ests_auth_persistent: Some("profile-cookie".to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_precedence_cli_profile_env() {
        let path = Path::new("/tmp/p.json");
        let profile = profile_with_token(None, None);

        let resolved = CredentialResolver::new(CliOverrides {
            refresh_token: Some("cli-token".to_string()),
            ests_auth_persistent: None,
        })
        .with_env_lookup(full_env)
        .resolve(&profile, path);
        let token = resolved.refresh_token.unwrap();
        assert_eq!(token.value, "cli-token");
        assert!(token.source.is_cli());
        let cookie = resolved.ests_auth_persistent.unwrap();
        assert_eq!(cookie.value, "profile-cookie");
        assert_eq!(cookie.source, CredentialSource::profile(path));

        let resolved = CredentialResolver::new(CliOverrides::default())
            .with_env_lookup(full_env)
            .resolve(&ProfileFile::default(), path);
        assert_eq!(resolved.refresh_token.unwrap().value, "env-token");
        assert_eq!(
            resolved.ests_auth_persistent.unwrap().source,
            CredentialSource::env(ESTS_AUTH_PERSISTENT_ENV)
        );
    }

    #[test]
    fn test_blank_values_fall_through() {
        let resolved = CredentialResolver::new(CliOverrides {
            refresh_token: Some("   ".to_string()),
            ests_auth_persistent: Some(String::new()),
        })
        .with_env_lookup(no_env)
        .resolve(&ProfileFile::default(), Path::new("/tmp/p.json"));
        assert!(resolved.refresh_token.is_none());
        assert!(resolved.ests_auth_persistent.is_none());
        assert!(resolved.ensure_available().is_err());
    }

    #[test]
    fn test_lifetime_only_tracked_for_profile_token() {
        let profile = profile_with_token(Some(1_000), Some(3600));
        let resolved = CredentialResolver::new(CliOverrides {
            refresh_token: Some("cli-token".to_string()),
            ests_auth_persistent: None,
        })
        .with_env_lookup(no_env)
        .resolve(&profile, Path::new("/tmp/p.json"));
        assert!(resolved.refresh_token_updated_at.is_none());
        assert!(resolved.refresh_token_expires_in.is_none());
    }

    #[test]
    fn test_eager_refresh_without_refresh_token() {
        let profile = ProfileFile {
            ests_auth_persistent: Some("cookie".to_string()),
            ..Default::default()
        };
        let resolved = CredentialResolver::new(CliOverrides::default())
            .with_env_lookup(no_env)
            .resolve(&profile, Path::new("/tmp/p.json"));
        assert!(resolved.ensure_available().is_ok());
        assert!(resolved.needs_eager_refresh(Utc::now()));
    }

    #[test]
    fn test_eager_refresh_near_expiry() {
        let now = Utc::now();
        let issued = now - Duration::hours(23);
        let profile = profile_with_token(Some(issued.timestamp_millis()), Some(24 * 3600));
        let resolved = CredentialResolver::new(CliOverrides::default())
            .with_env_lookup(no_env)
            .resolve(&profile, Path::new("/tmp/p.json"));
        assert!(resolved.needs_eager_refresh(now));

        let issued = now - Duration::hours(1);
        let profile = profile_with_token(Some(issued.timestamp_millis()), Some(24 * 3600));
        let resolved = CredentialResolver::new(CliOverrides::default())
            .with_env_lookup(no_env)
            .resolve(&profile, Path::new("/tmp/p.json"));
        assert!(!resolved.needs_eager_refresh(now));
    }

    #[test]
    fn test_no_eager_refresh_for_flag_token_or_unknown_lifetime() {
        let now = Utc::now();
        let stale = profile_with_token(Some(0), Some(60));

        let resolved = CredentialResolver::new(CliOverrides {
            refresh_token: Some("cli-token".to_string()),
            ests_auth_persistent: None,
        })
        .with_env_lookup(no_env)
        .resolve(&stale, Path::new("/tmp/p.json"));
        assert!(!resolved.needs_eager_refresh(now));

        let unknown = profile_with_token(None, None);
        let resolved = CredentialResolver::new(CliOverrides::default())
            .with_env_lookup(no_env)
            .resolve(&unknown, Path::new("/tmp/p.json"));
        assert!(!resolved.needs_eager_refresh(now));
    }

    #[test]
    fn test_huge_declared_lifetime_never_renews() {
        let now = Utc::now();
        let issued = now - Duration::hours(23);
        let profile = profile_with_token(Some(issued.timestamp_millis()), Some(u64::MAX));
        let resolved = CredentialResolver::new(CliOverrides::default())
            .with_env_lookup(no_env)
            .resolve(&profile, Path::new("/tmp/p.json"));
        assert!(!resolved.needs_eager_refresh(now));
    }

    #[test]
    fn test_no_eager_refresh_without_cookie() {
        let mut profile = profile_with_token(Some(0), Some(60));
        profile.ests_auth_persistent = None;
        let resolved = CredentialResolver::new(CliOverrides::default())
            .with_env_lookup(no_env)
            .resolve(&profile, Path::new("/tmp/p.json"));
        assert!(!resolved.needs_eager_refresh(Utc::now()));
    }
}
