//! Fixed authority and public client identity used by the auth core

use serde::{Deserialize, Serialize};

const AUTHORITY: &str = "https://login.microsoftonline.com";
const TENANT_ID: &str = "83d9219c-a57d-4d58-b3e5-4abef53925a2";
const CLIENT_ID: &str = "5e3ce6c0-2b1f-4285-8d4b-75ee78787346";
const APP_ORIGIN: &str = "https://teams.cloud.microsoft";

/// Scope requested by the session bootstrap
pub const BOOTSTRAP_SCOPE: &str =
    "https://api.spaces.skype.com/.default openid profile offline_access";

/// Companion cookie sent next to `ESTSAUTHPERSISTENT`
pub const AADSSO_COOKIE: &str = "NA|NoExtension";

/// Browser user agent presented to the authorize endpoint
pub const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/145.0.0.0 Safari/537.36";

/// MSAL library identity fields sent on every token request
pub(crate) const MSAL_SKU: &str = "msal.js.browser";
pub(crate) const MSAL_VERSION: &str = "3.30.0";
pub(crate) const MSAL_LIB_CAPABILITY: &str = "retry-after, h429";
pub(crate) const MSAL_LAST_TELEMETRY: &str = "5|0|||0,0";
pub(crate) const REFRESH_CURRENT_TELEMETRY: &str = "5|61,0,,,|";
pub(crate) const CODE_CURRENT_TELEMETRY: &str = "5|863,0,,,|,";

/// Endpoints and client identity for the OAuth flows.
///
/// `Default` gives the production values. Tests point the URLs at a mock server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthEndpoints {
    /// Tenant authorize endpoint (silent SSO)
    pub authorize_url: String,
    /// Tenant token endpoint (refresh-token grant)
    pub token_url: String,
    /// Common token endpoint (authorization-code exchange)
    pub code_token_url: String,
    /// Public client id
    pub client_id: String,
    /// Redirect URI registered for the refresh-token grant
    pub refresh_redirect_uri: String,
    /// Redirect URI registered for the authorization-code flow
    pub bootstrap_redirect_uri: String,
    /// `origin` header value
    pub origin: String,
    /// `referer` header value
    pub referrer: String,
    /// Scope requested during the session bootstrap
    pub bootstrap_scope: String,
}

impl Default for AuthEndpoints {
    fn default() -> Self {
        Self {
            authorize_url: format!("{}/{}/oauth2/v2.0/authorize", AUTHORITY, TENANT_ID),
            token_url: format!("{}/{}/oauth2/v2.0/token", AUTHORITY, TENANT_ID),
            code_token_url: format!("{}/common/oauth2/v2.0/token", AUTHORITY),
            client_id: CLIENT_ID.to_string(),
            refresh_redirect_uri: format!("{}/v2/auth", APP_ORIGIN),
            bootstrap_redirect_uri: format!("{}/v2", APP_ORIGIN),
            origin: APP_ORIGIN.to_string(),
            referrer: format!("{}/", APP_ORIGIN),
            bootstrap_scope: BOOTSTRAP_SCOPE.to_string(),
        }
    }
}

impl AuthEndpoints {
    /// Point every endpoint at `base` keeping the production paths.
    ///
    /// `base` is e.g. a mock server URL without trailing slash.
    pub fn with_authority(mut self, base: impl AsRef<str>) -> Self {
        let base = base.as_ref().trim_end_matches('/');
        self.authorize_url = format!("{}/{}/oauth2/v2.0/authorize", base, TENANT_ID);
        self.token_url = format!("{}/{}/oauth2/v2.0/token", base, TENANT_ID);
        self.code_token_url = format!("{}/common/oauth2/v2.0/token", base);
        self
    }

    /// Path of the tenant token endpoint under any authority
    pub fn tenant_token_path() -> String {
        format!("/{}/oauth2/v2.0/token", TENANT_ID)
    }

    /// Path of the tenant authorize endpoint under any authority
    pub fn tenant_authorize_path() -> String {
        format!("/{}/oauth2/v2.0/authorize", TENANT_ID)
    }

    /// Path of the common token endpoint under any authority
    pub fn common_token_path() -> &'static str {
        "/common/oauth2/v2.0/token"
    }
}
