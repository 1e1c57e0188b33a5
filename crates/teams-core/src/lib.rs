//! Teams Core Library
//!
//! Client for the Teams web API as used by the browser app: the auth core
//! (PKCE, session bootstrap from `ESTSAUTHPERSISTENT`, refresh-token manager),
//! the authenticated REST transport with its routes, typed payloads, and the
//! profile and credential handling used by the command-line front end.

pub mod auth;
pub mod client;
pub mod config;
pub mod error;
pub mod rest;
pub mod types;
pub mod utils;

// Re-export commonly used types
pub use auth::{
    AuthEndpoints, EstsCookieProvider, PkcePair, RefreshTokenGrant, RefreshTokenProvider,
    ScopeTokenProvider, SessionBootstrap, TokenManager,
};
pub use client::TeamsClient;
pub use config::{CredentialResolver, ProfileFile, ProfileStore};
pub use error::{TeamsError, TeamsResult};
pub use rest::{RestClient, SCOPES, TeamsEndpoints};
pub use types::*;
