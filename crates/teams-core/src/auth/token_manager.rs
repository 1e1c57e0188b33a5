//! Scope-keyed access token cache with refresh-token rotation
//!
//! [`TokenManager`] owns the current refresh token for one process. Access
//! tokens are cached per scope string and renewed through the refresh-token
//! grant. When the grant is rejected with `invalid_grant`, an optional
//! [`RefreshTokenProvider`] gets exactly one chance to supply a replacement
//! refresh token before the call fails.

use super::endpoints::{
    AuthEndpoints, MSAL_LAST_TELEMETRY, MSAL_LIB_CAPABILITY, MSAL_SKU, MSAL_VERSION,
    REFRESH_CURRENT_TELEMETRY,
};
use crate::error::{TeamsError, TeamsResult};
use crate::utils::mask_secret;
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use reqwest::StatusCode;
use reqwest::header::{ORIGIN, REFERER};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

/// Seconds subtracted from the server-declared access token lifetime
pub const ACCESS_TOKEN_EXPIRY_MARGIN_SECS: i64 = 5 * 60;

/// A refresh token together with its declared lifetime in seconds
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefreshTokenGrant {
    pub refresh_token: String,
    #[serde(default)]
    pub refresh_token_expires_in: Option<u64>,
}

/// Source of a replacement refresh token, tried once when the held one is rejected
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RefreshTokenProvider: Send + Sync {
    async fn fetch_refresh_token(&self) -> TeamsResult<RefreshTokenGrant>;
}

/// Anything that can hand out a bearer token for a scope
#[async_trait]
pub trait ScopeTokenProvider: Send {
    async fn token_for_scope(&mut self, scope: &str) -> TeamsResult<String>;
}

/// Successful refresh-grant response
#[derive(Debug, Deserialize)]
struct RefreshGrantResponse {
    #[serde(default)]
    token_type: Option<String>,
    #[serde(default)]
    scope: Option<String>,
    expires_in: i64,
    access_token: String,
    #[serde(default)]
    refresh_token: Option<String>,
    #[serde(default)]
    refresh_token_expires_in: Option<u64>,
}

/// OAuth error body, read best effort
#[derive(Debug, Deserialize)]
struct OAuthErrorBody {
    #[serde(default)]
    error: Option<String>,
}

#[derive(Debug, Clone)]
struct CachedAccessToken {
    token: String,
    expires_at: DateTime<Utc>,
}

/// A refresh grant the token endpoint turned down
#[derive(Debug)]
struct GrantRejection {
    status: StatusCode,
    oauth_error: Option<String>,
}

impl GrantRejection {
    fn is_invalid_grant(&self) -> bool {
        self.oauth_error.as_deref() == Some("invalid_grant")
    }

    fn into_error(self) -> TeamsError {
        TeamsError::token_refresh_failed(self.status, self.oauth_error)
    }
}

/// Token lifecycle manager for one session
pub struct TokenManager {
    refresh_token: String,
    refresh_token_expires_in: Option<u64>,
    fallback: Option<Box<dyn RefreshTokenProvider>>,
    cache: HashMap<String, CachedAccessToken>,
    endpoints: AuthEndpoints,
    http: reqwest::Client,
    expiry_margin: Duration,
}

impl TokenManager {
    /// Create a manager holding `refresh_token`
    pub fn new(refresh_token: impl Into<String>) -> Self {
        Self {
            refresh_token: refresh_token.into(),
            refresh_token_expires_in: None,
            fallback: None,
            cache: HashMap::new(),
            endpoints: AuthEndpoints::default(),
            http: reqwest::Client::new(),
            expiry_margin: Duration::seconds(ACCESS_TOKEN_EXPIRY_MARGIN_SECS),
        }
    }

    /// Set the declared lifetime of the initial refresh token
    pub fn with_refresh_token_expires_in(mut self, expires_in: Option<u64>) -> Self {
        self.refresh_token_expires_in = expires_in;
        self
    }

    /// Install the fallback used after an `invalid_grant` rejection
    pub fn with_fallback(mut self, provider: impl RefreshTokenProvider + 'static) -> Self {
        self.fallback = Some(Box::new(provider));
        self
    }

    /// Override the authority endpoints
    pub fn with_endpoints(mut self, endpoints: AuthEndpoints) -> Self {
        self.endpoints = endpoints;
        self
    }

    /// Use a custom HTTP client (timeouts, proxies, testing)
    pub fn with_http_client(mut self, client: reqwest::Client) -> Self {
        self.http = client;
        self
    }

    /// Override the safety margin subtracted from access token lifetimes
    pub fn with_expiry_margin(mut self, margin: Duration) -> Self {
        self.expiry_margin = margin;
        self
    }

    /// The refresh token currently held (rotated after every successful grant)
    pub fn refresh_token(&self) -> &str {
        &self.refresh_token
    }

    /// Declared lifetime of the held refresh token, in seconds
    pub fn refresh_token_expires_in(&self) -> Option<u64> {
        self.refresh_token_expires_in
    }

    /// Whether a fallback provider is installed
    pub fn has_fallback(&self) -> bool {
        self.fallback.is_some()
    }

    /// Internal expiry of the cached access token for `scope`
    pub fn cached_expiry(&self, scope: &str) -> Option<DateTime<Utc>> {
        self.cache.get(scope).map(|entry| entry.expires_at)
    }

    /// Alias of [`TokenManager::get_token_from_scope`]
    pub async fn get_token(&mut self, scope: &str) -> TeamsResult<String> {
        self.get_token_from_scope(scope).await
    }

    /// Return a valid access token for `scope`, refreshing when the cache has none.
    ///
    /// At most two refresh grants and one fallback invocation happen per call.
    #[instrument(skip(self), level = "debug")]
    pub async fn get_token_from_scope(&mut self, scope: &str) -> TeamsResult<String> {
        if let Some(entry) = self.cache.get(scope) {
            if Utc::now() < entry.expires_at {
                debug!("Access token cache hit");
                return Ok(entry.token.clone());
            }
        }
        debug!("Access token cache miss");

        let rejection = match self.request_refresh_grant(scope).await? {
            Ok(token) => return Ok(token),
            Err(rejection) => rejection,
        };

        let fallback = match &self.fallback {
            Some(fallback) if rejection.is_invalid_grant() => fallback,
            _ => return Err(rejection.into_error()),
        };

        warn!("Refresh token rejected with invalid_grant, requesting a replacement");
        let grant = fallback.fetch_refresh_token().await?;
        info!(
            refresh_token = %mask_secret(&grant.refresh_token),
            "Adopted replacement refresh token"
        );
        self.refresh_token = grant.refresh_token;
        self.refresh_token_expires_in = grant.refresh_token_expires_in;

        match self.request_refresh_grant(scope).await? {
            Ok(token) => Ok(token),
            Err(rejection) => Err(rejection.into_error()),
        }
    }

    /// One refresh-token grant. Transport failures are the outer error,
    /// a non-2xx answer is the inner one.
    async fn request_refresh_grant(
        &mut self,
        scope: &str,
    ) -> TeamsResult<Result<String, GrantRejection>> {
        let form = [
            ("client_id", self.endpoints.client_id.as_str()),
            ("redirect_uri", self.endpoints.refresh_redirect_uri.as_str()),
            ("scope", scope),
            ("grant_type", "refresh_token"),
            ("client_info", "1"),
            ("x-client-SKU", MSAL_SKU),
            ("x-client-VER", MSAL_VERSION),
            ("x-ms-lib-capability", MSAL_LIB_CAPABILITY),
            ("x-client-current-telemetry", REFRESH_CURRENT_TELEMETRY),
            ("x-client-last-telemetry", MSAL_LAST_TELEMETRY),
            ("refresh_token", self.refresh_token.as_str()),
        ];
        let request_id = format!("Core-{}", Uuid::new_v4());

        debug!(token_url = %self.endpoints.token_url, "Submitting refresh-token grant");
        let response = self
            .http
            .post(&self.endpoints.token_url)
            .query(&[("client-request-id", request_id.as_str())])
            .header(ORIGIN, &self.endpoints.origin)
            .header(REFERER, &self.endpoints.referrer)
            .form(&form)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            // A malformed error body must not mask the HTTP failure itself
            let oauth_error = response
                .json::<OAuthErrorBody>()
                .await
                .ok()
                .and_then(|body| body.error);
            debug!(status = status.as_u16(), ?oauth_error, "Refresh-token grant rejected");
            return Ok(Err(GrantRejection {
                status,
                oauth_error,
            }));
        }

        let body: RefreshGrantResponse = response.json().await.map_err(|e| {
            TeamsError::protocol(format!("unreadable refresh-token grant response: {}", e))
        })?;
        debug!(
            token_type = body.token_type.as_deref().unwrap_or("unknown"),
            granted_scope = body.scope.as_deref().unwrap_or(""),
            expires_in = body.expires_in,
            "Refresh-token grant succeeded"
        );

        match body.refresh_token {
            Some(rotated) if !rotated.is_empty() => {
                info!(refresh_token = %mask_secret(&rotated), "Refresh token rotated");
                self.refresh_token = rotated;
            }
            _ => debug!("Grant response carried no refresh token, keeping the held one"),
        }
        self.refresh_token_expires_in = body.refresh_token_expires_in;

        let expires_at = Duration::try_seconds(body.expires_in)
            .and_then(|lifetime| Utc::now().checked_add_signed(lifetime))
            .and_then(|at| at.checked_sub_signed(self.expiry_margin))
            .ok_or_else(|| {
                TeamsError::protocol(format!(
                    "access token lifetime out of range: {} seconds",
                    body.expires_in
                ))
            })?;
        self.cache.insert(
            scope.to_string(),
            CachedAccessToken {
                token: body.access_token.clone(),
                expires_at,
            },
        );

        Ok(Ok(body.access_token))
    }
}

#[async_trait]
impl ScopeTokenProvider for TokenManager {
    async fn token_for_scope(&mut self, scope: &str) -> TeamsResult<String> {
        self.get_token_from_scope(scope).await
    }
}

impl std::fmt::Debug for TokenManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenManager")
            .field("refresh_token", &mask_secret(&self.refresh_token))
            .field("refresh_token_expires_in", &self.refresh_token_expires_in)
            .field("has_fallback", &self.fallback.is_some())
            .field("cached_scopes", &self.cache.keys().collect::<Vec<_>>())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_string_contains, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn grant_body(access: &str, expires_in: i64, refresh: &str) -> serde_json::Value {
        json!({
            "token_type": "Bearer",
            "scope": "svc/.default",
            "expires_in": expires_in,
            "ext_expires_in": expires_in,
            "access_token": access,
            "refresh_token": refresh,
            "refresh_token_expires_in": 86400,
            "id_token": "id",
            "client_info": "info"
        })
    }

    fn manager_for(server: &MockServer, refresh_token: &str) -> TokenManager {
        TokenManager::new(refresh_token)
            .with_endpoints(AuthEndpoints::default().with_authority(server.uri()))
    }

    async fn mount_grant(
        server: &MockServer,
        refresh_token: &str,
        response: ResponseTemplate,
        expected_calls: u64,
    ) {
        Mock::given(method("POST"))
            .and(path(AuthEndpoints::tenant_token_path()))
            .and(body_string_contains("grant_type=refresh_token"))
            .and(body_string_contains(format!("refresh_token={}", refresh_token)))
            .respond_with(response)
            .expect(expected_calls)
            .mount(server)
            .await;
    }

    fn invalid_grant() -> ResponseTemplate {
        ResponseTemplate::new(400).set_body_json(json!({
            "error": "invalid_grant",
            "error_description": "AADSTS70043: The refresh token has expired"
        }))
    }

    #[tokio::test]
    async fn test_rotates_refresh_token_and_caches() {
        let server = MockServer::start().await;
        mount_grant(
            &server,
            "R1",
            ResponseTemplate::new(200).set_body_json(grant_body("A1", 3600, "R2")),
            1,
        )
        .await;

        let mut manager = manager_for(&server, "R1");
        let before = Utc::now();
        let token = manager.get_token_from_scope("svc/.default").await.unwrap();
        let after = Utc::now();

        assert_eq!(token, "A1");
        assert_eq!(manager.refresh_token(), "R2");
        assert_eq!(manager.refresh_token_expires_in(), Some(86400));

        let expires_at = manager.cached_expiry("svc/.default").unwrap();
        assert!(expires_at >= before + Duration::seconds(3300));
        assert!(expires_at <= after + Duration::seconds(3300));
    }

    #[tokio::test]
    async fn test_cache_hit_skips_network() {
        let server = MockServer::start().await;
        mount_grant(
            &server,
            "R1",
            ResponseTemplate::new(200).set_body_json(grant_body("A1", 3600, "R2")),
            1,
        )
        .await;

        let mut manager = manager_for(&server, "R1");
        let first = manager.get_token("svc/.default").await.unwrap();
        let second = manager.get_token("svc/.default").await.unwrap();
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_short_lived_token_is_immediately_stale() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(AuthEndpoints::tenant_token_path()))
            .respond_with(ResponseTemplate::new(200).set_body_json(grant_body("A1", 300, "R1")))
            .expect(2)
            .mount(&server)
            .await;

        let mut manager = manager_for(&server, "R1");
        manager.get_token_from_scope("svc/.default").await.unwrap();
        manager.get_token_from_scope("svc/.default").await.unwrap();
    }

    #[tokio::test]
    async fn test_cache_is_partitioned_by_scope() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(AuthEndpoints::tenant_token_path()))
            .and(body_string_contains("scope=scope-a"))
            .respond_with(ResponseTemplate::new(200).set_body_json(grant_body("A", 3600, "R1")))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path(AuthEndpoints::tenant_token_path()))
            .and(body_string_contains("scope=scope-b"))
            .respond_with(ResponseTemplate::new(200).set_body_json(grant_body("B", 3600, "R1")))
            .expect(1)
            .mount(&server)
            .await;

        let mut manager = manager_for(&server, "R1");
        assert_eq!(manager.get_token_from_scope("scope-a").await.unwrap(), "A");
        assert_eq!(manager.get_token_from_scope("scope-b").await.unwrap(), "B");
        assert_eq!(manager.get_token_from_scope("scope-a").await.unwrap(), "A");
        assert!(manager.cached_expiry("scope-c").is_none());
    }

    #[tokio::test]
    async fn test_invalid_grant_uses_fallback_once() {
        let server = MockServer::start().await;
        mount_grant(&server, "R1", invalid_grant(), 1).await;
        mount_grant(
            &server,
            "RF",
            ResponseTemplate::new(200).set_body_json(grant_body("A1", 3600, "R2")),
            1,
        )
        .await;

        let mut fallback = MockRefreshTokenProvider::new();
        fallback.expect_fetch_refresh_token().times(1).returning(|| {
            Ok(RefreshTokenGrant {
                refresh_token: "RF".to_string(),
                refresh_token_expires_in: Some(7200),
            })
        });

        let mut manager = manager_for(&server, "R1").with_fallback(fallback);
        let token = manager.get_token_from_scope("svc/.default").await.unwrap();
        assert_eq!(token, "A1");
        assert_eq!(manager.refresh_token(), "R2");
    }

    #[tokio::test]
    async fn test_second_failure_after_fallback_is_terminal() {
        let server = MockServer::start().await;
        mount_grant(&server, "R1", invalid_grant(), 1).await;
        mount_grant(&server, "RF", invalid_grant(), 1).await;

        let mut fallback = MockRefreshTokenProvider::new();
        fallback.expect_fetch_refresh_token().times(1).returning(|| {
            Ok(RefreshTokenGrant {
                refresh_token: "RF".to_string(),
                refresh_token_expires_in: Some(7200),
            })
        });

        let mut manager = manager_for(&server, "R1").with_fallback(fallback);
        let err = manager
            .get_token_from_scope("svc/.default")
            .await
            .unwrap_err();

        match err {
            TeamsError::TokenRefreshFailed {
                status,
                status_text,
                oauth_error,
            } => {
                assert_eq!(status, 400);
                assert_eq!(status_text, "Bad Request");
                assert_eq!(oauth_error.as_deref(), Some("invalid_grant"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
        // The fallback's token stays held even though it was rejected
        assert_eq!(manager.refresh_token(), "RF");
        assert_eq!(manager.refresh_token_expires_in(), Some(7200));
    }

    #[tokio::test]
    async fn test_invalid_grant_without_fallback_fails_immediately() {
        let server = MockServer::start().await;
        mount_grant(&server, "R1", invalid_grant(), 1).await;

        let mut manager = manager_for(&server, "R1");
        let err = manager.get_token_from_scope("svc/.default").await.unwrap_err();
        assert!(matches!(err, TeamsError::TokenRefreshFailed { status: 400, .. }));
        assert_eq!(manager.refresh_token(), "R1");
    }

    #[tokio::test]
    async fn test_other_oauth_errors_skip_fallback() {
        let server = MockServer::start().await;
        mount_grant(
            &server,
            "R1",
            ResponseTemplate::new(400).set_body_json(json!({"error": "invalid_scope"})),
            1,
        )
        .await;

        let mut fallback = MockRefreshTokenProvider::new();
        fallback.expect_fetch_refresh_token().times(0);

        let mut manager = manager_for(&server, "R1").with_fallback(fallback);
        let err = manager.get_token_from_scope("svc/.default").await.unwrap_err();
        match err {
            TeamsError::TokenRefreshFailed { oauth_error, .. } => {
                assert_eq!(oauth_error.as_deref(), Some("invalid_scope"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_malformed_error_body_keeps_http_status() {
        let server = MockServer::start().await;
        mount_grant(
            &server,
            "R1",
            ResponseTemplate::new(503).set_body_string("<html>upstream down</html>"),
            1,
        )
        .await;

        let mut fallback = MockRefreshTokenProvider::new();
        fallback.expect_fetch_refresh_token().times(0);

        let mut manager = manager_for(&server, "R1").with_fallback(fallback);
        let err = manager.get_token_from_scope("svc/.default").await.unwrap_err();
        match err {
            TeamsError::TokenRefreshFailed {
                status,
                status_text,
                oauth_error,
            } => {
                assert_eq!(status, 503);
                assert_eq!(status_text, "Service Unavailable");
                assert!(oauth_error.is_none());
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_fallback_error_propagates() {
        let server = MockServer::start().await;
        mount_grant(&server, "R1", invalid_grant(), 1).await;

        let mut fallback = MockRefreshTokenProvider::new();
        fallback
            .expect_fetch_refresh_token()
            .times(1)
            .returning(|| Err(TeamsError::silent_auth_failed(200)));

        let mut manager = manager_for(&server, "R1").with_fallback(fallback);
        let err = manager.get_token_from_scope("svc/.default").await.unwrap_err();
        assert!(matches!(err, TeamsError::SilentAuthFailed { status: 200 }));
        assert_eq!(manager.refresh_token(), "R1");
    }

    #[tokio::test]
    async fn test_missing_rotated_token_keeps_current() {
        let server = MockServer::start().await;
        mount_grant(
            &server,
            "R1",
            ResponseTemplate::new(200).set_body_json(json!({
                "token_type": "Bearer",
                "expires_in": 3600,
                "access_token": "A1"
            })),
            1,
        )
        .await;

        let mut manager = manager_for(&server, "R1");
        assert_eq!(manager.get_token("svc/.default").await.unwrap(), "A1");
        assert_eq!(manager.refresh_token(), "R1");
        assert_eq!(manager.refresh_token_expires_in(), None);
    }

    #[tokio::test]
    async fn test_out_of_range_lifetime_is_a_protocol_error() {
        let server = MockServer::start().await;
        mount_grant(
            &server,
            "R1",
            ResponseTemplate::new(200).set_body_json(grant_body("A1", 10_000_000_000_000, "R2")),
            1,
        )
        .await;

        let mut manager = manager_for(&server, "R1");
        let err = manager.get_token_from_scope("s").await.unwrap_err();
        assert!(matches!(err, TeamsError::Protocol { .. }));
        assert!(manager.cached_expiry("s").is_none());
        // The rotated refresh token is still adopted
        assert_eq!(manager.refresh_token(), "R2");
    }

    #[tokio::test]
    async fn test_refresh_grant_sends_client_identity() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(AuthEndpoints::tenant_token_path()))
            .and(body_string_contains("client_id=5e3ce6c0-2b1f-4285-8d4b-75ee78787346"))
            .and(body_string_contains("client_info=1"))
            .and(body_string_contains("x-client-SKU=msal.js.browser"))
            .and(body_string_contains("scope=svc%2F.default"))
            .respond_with(ResponseTemplate::new(200).set_body_json(grant_body("A1", 3600, "R2")))
            .expect(1)
            .mount(&server)
            .await;

        let mut manager = manager_for(&server, "R1");
        manager.get_token_from_scope("svc/.default").await.unwrap();
    }

    #[test]
    fn test_debug_masks_refresh_token() {
        let manager = TokenManager::new("0.AXYZ-very-long-refresh-token-value");
        let rendered = format!("{:?}", manager);
        assert!(!rendered.contains("very-long-refresh-token"));
    }
}
