//! Bearer-authenticated JSON requests against the Teams web API

use super::scopes::{TEAMS_API_BASE, TEAMS_WORKER_REFERRER};
use crate::auth::ScopeTokenProvider;
use crate::error::{TeamsError, TeamsResult};
use reqwest::Method;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, REFERER};
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};

/// Where the service routes live
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TeamsEndpoints {
    pub api_base: String,
}

impl Default for TeamsEndpoints {
    fn default() -> Self {
        Self {
            api_base: TEAMS_API_BASE.to_string(),
        }
    }
}

impl TeamsEndpoints {
    pub fn with_api_base(mut self, base: impl AsRef<str>) -> Self {
        self.api_base = base.as_ref().trim_end_matches('/').to_string();
        self
    }

    /// Join an absolute route path onto the API base
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.api_base, path)
    }
}

/// Per-request extras
#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    /// Query pairs appended to the URL, in order
    pub query: Vec<(String, String)>,
    /// JSON body, sent as `application/json;charset=UTF-8`
    pub json_body: Option<serde_json::Value>,
    /// Overrides the client's default referrer
    pub referrer: Option<String>,
}

impl RequestOptions {
    pub fn with_query(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.query.push((key.into(), value.to_string()));
        self
    }

    pub fn with_json_body(mut self, body: serde_json::Value) -> Self {
        self.json_body = Some(body);
        self
    }
}

/// REST transport that owns the token provider
pub struct RestClient<P> {
    token_provider: P,
    http: reqwest::Client,
    endpoints: TeamsEndpoints,
    referrer: String,
}

impl<P: ScopeTokenProvider> RestClient<P> {
    pub fn new(token_provider: P) -> Self {
        Self {
            token_provider,
            http: reqwest::Client::new(),
            endpoints: TeamsEndpoints::default(),
            referrer: TEAMS_WORKER_REFERRER.to_string(),
        }
    }

    pub fn with_http_client(mut self, client: reqwest::Client) -> Self {
        self.http = client;
        self
    }

    pub fn with_endpoints(mut self, endpoints: TeamsEndpoints) -> Self {
        self.endpoints = endpoints;
        self
    }

    pub fn with_referrer(mut self, referrer: impl Into<String>) -> Self {
        self.referrer = referrer.into();
        self
    }

    pub fn endpoints(&self) -> &TeamsEndpoints {
        &self.endpoints
    }

    pub fn token_provider(&self) -> &P {
        &self.token_provider
    }

    pub fn token_provider_mut(&mut self) -> &mut P {
        &mut self.token_provider
    }

    pub fn into_token_provider(self) -> P {
        self.token_provider
    }

    /// Send a request authorized for `scope` and decode the JSON response
    #[instrument(skip(self, options), level = "debug")]
    pub async fn request<T: DeserializeOwned>(
        &mut self,
        method: Method,
        url: &str,
        scope: &str,
        options: RequestOptions,
    ) -> TeamsResult<T> {
        let token = self.token_provider.token_for_scope(scope).await?;

        let referrer = options.referrer.as_deref().unwrap_or(&self.referrer);
        let mut request = self
            .http
            .request(method.clone(), url)
            .header(AUTHORIZATION, format!("Bearer {}", token))
            .header(REFERER, referrer);

        if !options.query.is_empty() {
            request = request.query(&options.query);
        }
        if let Some(body) = &options.json_body {
            request = request
                .header(CONTENT_TYPE, "application/json;charset=UTF-8")
                .body(serde_json::to_vec(body)?);
        }

        debug!("Sending request");
        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(TeamsError::http_status(
                format!(
                    "Failed request {} {}: {} {}",
                    method,
                    url,
                    status.as_u16(),
                    status.canonical_reason().unwrap_or_default()
                ),
                url,
                status.as_u16(),
            ));
        }

        let bytes = response.bytes().await?;
        serde_json::from_slice(&bytes).map_err(|e| {
            TeamsError::json(format!("Failed to decode response from {}: {}", url, e))
        })
    }

    pub async fn get<T: DeserializeOwned>(
        &mut self,
        url: &str,
        scope: &str,
        options: RequestOptions,
    ) -> TeamsResult<T> {
        self.request(Method::GET, url, scope, options).await
    }

    pub async fn post<T: DeserializeOwned>(
        &mut self,
        url: &str,
        scope: &str,
        options: RequestOptions,
    ) -> TeamsResult<T> {
        self.request(Method::POST, url, scope, options).await
    }
}

impl<P> std::fmt::Debug for RestClient<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RestClient")
            .field("endpoints", &self.endpoints)
            .field("referrer", &self.referrer)
            .finish_non_exhaustive()
    }
}
