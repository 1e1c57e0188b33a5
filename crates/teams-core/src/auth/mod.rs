//! Authentication core
//!
//! - [`pkce`]: code verifier / challenge generation
//! - [`ests`]: session bootstrap from the `ESTSAUTHPERSISTENT` cookie
//! - [`token_manager`]: scope-keyed access token cache with refresh-token rotation

pub mod endpoints;
pub mod ests;
pub mod pkce;
pub mod token_manager;

pub use endpoints::{AuthEndpoints, BOOTSTRAP_SCOPE};
pub use ests::{EstsCookieProvider, SessionBootstrap, extract_code_from_location};
pub use pkce::{
    DEFAULT_CODE_VERIFIER_LENGTH, PkcePair, create_code_challenge, create_code_verifier,
};
pub use token_manager::{
    ACCESS_TOKEN_EXPIRY_MARGIN_SECS, RefreshTokenGrant, RefreshTokenProvider, ScopeTokenProvider,
    TokenManager,
};
