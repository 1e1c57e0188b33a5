//! Authenticated REST transport and service routes

pub(crate) mod client;
pub mod routes;
mod scopes;

pub use client::{RequestOptions, RestClient, TeamsEndpoints};
pub use routes::{ChannelQueryOptions, ConversationMessagesOptions, FetchShortProfileOptions};
pub use scopes::{SCOPES, ServiceScopes, TEAMS_API_BASE, TEAMS_WORKER_REFERRER};
