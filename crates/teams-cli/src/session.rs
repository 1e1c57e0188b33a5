//! Auth wiring for one invocation: HTTP clients, eager renewal, token manager,
//! and writing the rotated refresh token back to the profile.

use crate::console::RenderContext;
use crate::progress::with_spinner;
use chrono::Utc;
use teams_core::auth::{EstsCookieProvider, SessionBootstrap, TokenManager};
use teams_core::client::TeamsClient;
use teams_core::config::timeouts::with_default_timeouts;
use teams_core::config::{ProfileFile, ResolvedCredentials};
use teams_core::error::{TeamsError, TeamsResult};
use teams_core::utils::mask_secret;
use tracing::{debug, info};

/// HTTP client for token grants and REST calls
pub fn api_http_client() -> TeamsResult<reqwest::Client> {
    with_default_timeouts(reqwest::Client::builder())
        .build()
        .map_err(|e| TeamsError::http(format!("failed to build HTTP client: {}", e)))
}

/// Session bootstrap with timeouts and redirects disabled
pub fn session_bootstrap() -> TeamsResult<SessionBootstrap> {
    let http = with_default_timeouts(SessionBootstrap::http_client_builder())
        .build()
        .map_err(|e| TeamsError::http(format!("failed to build HTTP client: {}", e)))?;
    Ok(SessionBootstrap::new()?.with_http_client(http))
}

/// Authenticated client plus the cookie it may fall back on
pub struct Session {
    pub client: TeamsClient<TokenManager>,
    pub session_cookie: Option<String>,
}

/// Build the client for an API command.
///
/// Renews the refresh token from the session cookie first when the stored one
/// is missing or close to expiry.
pub async fn open(
    credentials: &ResolvedCredentials,
    context: &RenderContext,
) -> TeamsResult<Session> {
    credentials.ensure_available()?;
    let session_cookie = credentials
        .ests_auth_persistent
        .as_ref()
        .map(|cookie| cookie.value.clone());

    let (refresh_token, expires_in) = match (&session_cookie, &credentials.refresh_token) {
        (Some(cookie), _) if credentials.needs_eager_refresh(Utc::now()) => {
            info!("Renewing refresh token from session cookie");
            let grant = with_spinner(
                context,
                "Renewing session...",
                session_bootstrap()?.login_from_ests_auth_persistent(cookie),
            )
            .await?;
            (grant.refresh_token, grant.refresh_token_expires_in)
        }
        (_, Some(token)) => {
            debug!(
                "Using refresh token {} from {}",
                mask_secret(&token.value),
                token.source
            );
            (token.value.clone(), credentials.refresh_token_expires_in)
        }
        (_, None) => {
            // ensure_available passed, so a cookie exists and renewal was due
            return Err(TeamsError::config(
                "No refresh token found and the session cookie could not be used",
            ));
        }
    };

    let http = api_http_client()?;
    let mut manager = TokenManager::new(refresh_token)
        .with_refresh_token_expires_in(expires_in)
        .with_http_client(http.clone());
    if let Some(cookie) = &session_cookie {
        let fallback = EstsCookieProvider::new(session_bootstrap()?, cookie.clone());
        manager = manager.with_fallback(fallback);
    }

    Ok(Session {
        client: TeamsClient::new(manager).with_http_client(http),
        session_cookie,
    })
}

/// Copy the (possibly rotated) refresh token and the session cookie into `profile`
pub fn write_back(profile: &mut ProfileFile, manager: &TokenManager, session_cookie: Option<&str>) {
    if profile.refresh_token.as_deref() != Some(manager.refresh_token()) {
        info!("Storing rotated refresh token {}", mask_secret(manager.refresh_token()));
        if manager.refresh_token_expires_in().is_none() {
            profile.refresh_token_expires_in = None;
        }
    }
    profile.record_refresh_token(manager.refresh_token(), manager.refresh_token_expires_in());
    if let Some(cookie) = session_cookie {
        profile.record_ests_auth_persistent(cookie);
    }
}
