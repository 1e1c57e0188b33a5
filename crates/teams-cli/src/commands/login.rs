//! `teams login`
//!
//! Stores session credentials in the selected profile. A session cookie is
//! exchanged for a refresh token right away; a bare refresh token is stored
//! as given.

use super::{CommandOutput, LoginSummary};
use crate::console::RenderContext;
use crate::progress::with_spinner;
use crate::session::session_bootstrap;
use dialoguer::Password;
use std::io::IsTerminal;
use teams_core::config::{CliOverrides, CredentialResolver, ProfileFile, ProfileStore};
use teams_core::error::{TeamsError, TeamsResult};
use tracing::{info, warn};

const LOGIN_USAGE: &str =
    "login requires --ests-auth-persistent (recommended) or --refresh-token (deprecated).";

const COOKIE_INSTRUCTIONS: &str = "No login token was provided.
Use a browser other than Microsoft Edge, then open
https://login.microsoftonline.com/common/oauth2/v2.0/authorize,
then open DevTools > Application > Cookies, copy ESTSAUTHPERSISTENT, and paste it below.";

/// Credential given to `login`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginCredential {
    SessionCookie(String),
    RefreshToken(String),
}

pub async fn run(
    overrides: CliOverrides,
    store: &ProfileStore,
    context: &RenderContext,
) -> TeamsResult<CommandOutput> {
    run_with_resolver(CredentialResolver::new(overrides), store, context).await
}

/// `login` with credentials looked up through `resolver`
pub async fn run_with_resolver(
    resolver: CredentialResolver,
    store: &ProfileStore,
    context: &RenderContext,
) -> TeamsResult<CommandOutput> {
    let credential = match provided_credential(resolver, store) {
        Some(credential) => credential,
        None if context.is_interactive() && std::io::stdin().is_terminal() => {
            LoginCredential::SessionCookie(prompt_session_cookie()?)
        }
        None => return Err(TeamsError::invalid_input(LOGIN_USAGE)),
    };

    let mut profile = store.load();
    match credential {
        LoginCredential::SessionCookie(cookie) => {
            let grant = with_spinner(
                context,
                "Signing in with session cookie...",
                session_bootstrap()?.login_from_ests_auth_persistent(&cookie),
            )
            .await?;
            profile.refresh_token_expires_in = None;
            profile.record_refresh_token(&grant.refresh_token, grant.refresh_token_expires_in);
            profile.record_ests_auth_persistent(&cookie);
        }
        LoginCredential::RefreshToken(token) => {
            warn!("Storing a bare refresh token is deprecated; use --ests-auth-persistent");
            profile.refresh_token_expires_in = None;
            profile.record_refresh_token(&token, None);
        }
    }

    store.save(&profile)?;
    info!("Stored credentials in profile {}", store.label());
    Ok(CommandOutput::Login(LoginSummary {
        profile: store.label().to_string(),
        profile_path: store.path().display().to_string(),
    }))
}

/// Cookie or refresh token from the flags or environment; the stored profile is ignored
fn provided_credential(
    resolver: CredentialResolver,
    store: &ProfileStore,
) -> Option<LoginCredential> {
    let provided = resolver.resolve(&ProfileFile::default(), store.path());
    provided
        .ests_auth_persistent
        .map(|cookie| LoginCredential::SessionCookie(cookie.value))
        .or_else(|| {
            provided
                .refresh_token
                .map(|token| LoginCredential::RefreshToken(token.value))
        })
}

fn prompt_session_cookie() -> TeamsResult<String> {
    eprintln!("{}", COOKIE_INSTRUCTIONS);
    let input = Password::new()
        .with_prompt("ESTSAUTHPERSISTENT")
        .allow_empty_password(true)
        .interact()
        .map_err(|e| TeamsError::io(format!("Failed to read session cookie: {}", e)))?;

    let cookie = input.trim();
    if cookie.is_empty() {
        return Err(TeamsError::invalid_input(format!(
            "Token input was empty. {}",
            LOGIN_USAGE
        )));
    }
    Ok(cookie.to_string())
}
