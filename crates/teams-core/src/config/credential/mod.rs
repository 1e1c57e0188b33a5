//! Credential resolution across CLI flags, the profile file and the environment

mod resolver;
mod source;

pub use resolver::{
    CliOverrides, CredentialResolver, ESTS_AUTH_PERSISTENT_ENV, REFRESH_TOKEN_ENV,
    REFRESH_TOKEN_RENEWAL_MARGIN_SECS, ResolvedCredential, ResolvedCredentials,
};
pub use source::CredentialSource;
