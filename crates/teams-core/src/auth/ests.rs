//! Session bootstrap from a persistent browser session cookie
//!
//! The `ESTSAUTHPERSISTENT` cookie is presented to the authorize endpoint with
//! `prompt=none`. A live session answers with a redirect whose fragment holds
//! an authorization code, which is then exchanged (PKCE) for a refresh token.

use super::endpoints::{
    AADSSO_COOKIE, AuthEndpoints, BROWSER_USER_AGENT, CODE_CURRENT_TELEMETRY, MSAL_LAST_TELEMETRY,
    MSAL_LIB_CAPABILITY, MSAL_SKU, MSAL_VERSION,
};
use super::pkce::{DEFAULT_CODE_VERIFIER_LENGTH, PkcePair, generate_nonce};
use super::token_manager::{RefreshTokenGrant, RefreshTokenProvider};
use crate::error::{TeamsError, TeamsResult};
use crate::utils::{mask_secret, sanitize_error_body};
use async_trait::async_trait;
use reqwest::header::{COOKIE, LOCATION, ORIGIN, REFERER, USER_AGENT};
use serde::Deserialize;
use tracing::{debug, info, instrument};
use url::Url;
use uuid::Uuid;

/// Client-capabilities claim requested on the authorize call
const CP1_CLAIMS: &str = r#"{"access_token":{"xms_cc":{"values":["CP1"]}}}"#;

#[derive(Debug, Deserialize)]
struct CodeExchangeResponse {
    #[serde(default)]
    refresh_token: Option<String>,
    #[serde(default)]
    refresh_token_expires_in: Option<u64>,
}

/// Performs the silent authorize + code exchange
#[derive(Debug, Clone)]
pub struct SessionBootstrap {
    endpoints: AuthEndpoints,
    http: reqwest::Client,
    verifier_length: usize,
}

impl SessionBootstrap {
    /// Create a bootstrap against the production authority
    pub fn new() -> TeamsResult<Self> {
        let http = Self::http_client_builder()
            .build()
            .map_err(|e| TeamsError::http(format!("failed to build HTTP client: {}", e)))?;
        Ok(Self {
            endpoints: AuthEndpoints::default(),
            http,
            verifier_length: DEFAULT_CODE_VERIFIER_LENGTH,
        })
    }

    /// Client builder with redirect following disabled.
    ///
    /// Any client handed to [`SessionBootstrap::with_http_client`] must be built
    /// from this, otherwise the authorize redirect is followed and lost.
    pub fn http_client_builder() -> reqwest::ClientBuilder {
        reqwest::Client::builder().redirect(reqwest::redirect::Policy::none())
    }

    pub fn with_endpoints(mut self, endpoints: AuthEndpoints) -> Self {
        self.endpoints = endpoints;
        self
    }

    pub fn with_http_client(mut self, client: reqwest::Client) -> Self {
        self.http = client;
        self
    }

    /// Override the PKCE verifier length (validated when a login runs)
    pub fn with_verifier_length(mut self, length: usize) -> Self {
        self.verifier_length = length;
        self
    }

    pub fn endpoints(&self) -> &AuthEndpoints {
        &self.endpoints
    }

    /// Obtain a fresh refresh token from a session cookie
    #[instrument(skip_all)]
    pub async fn login_from_ests_auth_persistent(
        &self,
        session_cookie: &str,
    ) -> TeamsResult<RefreshTokenGrant> {
        let session_cookie = session_cookie.trim();
        if session_cookie.is_empty() {
            return Err(TeamsError::invalid_credential(
                "ESTSAUTHPERSISTENT must be a non-empty string",
            ));
        }

        let pkce = PkcePair::generate(self.verifier_length)?;
        let code = self.request_authorization_code(session_cookie, &pkce).await?;
        let grant = self.exchange_code(&code, &pkce).await?;

        info!(
            refresh_token = %mask_secret(&grant.refresh_token),
            expires_in = ?grant.refresh_token_expires_in,
            "Session bootstrap issued a refresh token"
        );
        Ok(grant)
    }

    fn authorize_url(&self, pkce: &PkcePair) -> TeamsResult<Url> {
        let nonce = generate_nonce();
        let request_id = Uuid::new_v4().to_string();
        let url = Url::parse_with_params(
            &self.endpoints.authorize_url,
            &[
                ("client_id", self.endpoints.client_id.as_str()),
                ("scope", self.endpoints.bootstrap_scope.as_str()),
                ("redirect_uri", self.endpoints.bootstrap_redirect_uri.as_str()),
                ("response_mode", "fragment"),
                ("response_type", "code"),
                ("x-client-SKU", MSAL_SKU),
                ("x-client-VER", MSAL_VERSION),
                ("client_info", "1"),
                ("code_challenge", pkce.code_challenge()),
                ("code_challenge_method", pkce.method()),
                ("prompt", "none"),
                ("nonce", nonce.as_str()),
                ("claims", CP1_CLAIMS),
                ("a", "0"),
                ("mscrid", request_id.as_str()),
            ],
        )?;
        Ok(url)
    }

    async fn request_authorization_code(
        &self,
        session_cookie: &str,
        pkce: &PkcePair,
    ) -> TeamsResult<String> {
        let authorize_url = self.authorize_url(pkce)?;
        debug!(authorize_url = %self.endpoints.authorize_url, "Requesting silent authorization");

        let response = self
            .http
            .get(authorize_url.clone())
            .header(
                COOKIE,
                format!(
                    "AADSSO={}; ESTSAUTHPERSISTENT={};",
                    AADSSO_COOKIE, session_cookie
                ),
            )
            .header(USER_AGENT, BROWSER_USER_AGENT)
            .send()
            .await?;

        let status = response.status();
        if !status.is_redirection() {
            return Err(TeamsError::silent_auth_failed(status.as_u16()));
        }

        let location = response
            .headers()
            .get(LOCATION)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| TeamsError::protocol("No location header"))?;

        extract_code_from_location(&authorize_url, location)
    }

    async fn exchange_code(&self, code: &str, pkce: &PkcePair) -> TeamsResult<RefreshTokenGrant> {
        let form = [
            ("client_id", self.endpoints.client_id.as_str()),
            ("redirect_uri", self.endpoints.bootstrap_redirect_uri.as_str()),
            ("scope", self.endpoints.bootstrap_scope.as_str()),
            ("code", code),
            ("x-client-SKU", MSAL_SKU),
            ("x-client-VER", MSAL_VERSION),
            ("x-ms-lib-capability", MSAL_LIB_CAPABILITY),
            ("x-client-current-telemetry", CODE_CURRENT_TELEMETRY),
            ("x-client-last-telemetry", MSAL_LAST_TELEMETRY),
            ("code_verifier", pkce.code_verifier()),
            ("grant_type", "authorization_code"),
            ("client_info", "1"),
        ];
        let request_id = format!("Core-{}", Uuid::new_v4());

        debug!(token_url = %self.endpoints.code_token_url, "Exchanging authorization code");
        let response = self
            .http
            .post(&self.endpoints.code_token_url)
            .query(&[("client-request-id", request_id.as_str())])
            .header(REFERER, &self.endpoints.referrer)
            .header(ORIGIN, &self.endpoints.origin)
            .form(&form)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(TeamsError::http_status(
                format!(
                    "Authorization code exchange failed: {} {}",
                    status.as_u16(),
                    sanitize_error_body(&body)
                ),
                self.endpoints.code_token_url.clone(),
                status.as_u16(),
            ));
        }

        let body: CodeExchangeResponse = response.json().await.map_err(|e| {
            TeamsError::protocol(format!("unreadable code exchange response: {}", e))
        })?;

        match body.refresh_token {
            Some(refresh_token) if !refresh_token.is_empty() => Ok(RefreshTokenGrant {
                refresh_token,
                refresh_token_expires_in: body.refresh_token_expires_in,
            }),
            _ => Err(TeamsError::protocol(
                "Code exchange response did not include a refresh token",
            )),
        }
    }
}

/// Read the `code` parameter from the fragment of a redirect `Location`.
///
/// Relative locations are resolved against `base`.
pub fn extract_code_from_location(base: &Url, location: &str) -> TeamsResult<String> {
    let resolved = base.join(location)?;
    let fragment = resolved.fragment().unwrap_or_default();

    let mut code = None;
    let mut oauth_error = None;
    for (key, value) in url::form_urlencoded::parse(fragment.as_bytes()) {
        match key.as_ref() {
            "code" if !value.is_empty() => code = Some(value.into_owned()),
            "error" => oauth_error = Some(value.into_owned()),
            _ => {}
        }
    }

    match (code, oauth_error) {
        (Some(code), _) => Ok(code),
        (None, Some(error)) => Err(TeamsError::protocol(format!(
            "No code in location hash (authorize error: {})",
            error
        ))),
        (None, None) => Err(TeamsError::protocol("No code in location hash")),
    }
}

/// Fallback provider that re-runs the bootstrap with a stored cookie
#[derive(Debug, Clone)]
pub struct EstsCookieProvider {
    bootstrap: SessionBootstrap,
    session_cookie: String,
}

impl EstsCookieProvider {
    pub fn new(bootstrap: SessionBootstrap, session_cookie: impl Into<String>) -> Self {
        Self {
            bootstrap,
            session_cookie: session_cookie.into(),
        }
    }
}

#[async_trait]
impl RefreshTokenProvider for EstsCookieProvider {
    async fn fetch_refresh_token(&self) -> TeamsResult<RefreshTokenGrant> {
        self.bootstrap
            .login_from_ests_auth_persistent(&self.session_cookie)
            .await
    }
}
