//! Profile persistence, credential resolution and timeouts

pub mod credential;
pub mod profile;
pub mod timeouts;

pub use credential::{
    CliOverrides, CredentialResolver, CredentialSource, ResolvedCredential, ResolvedCredentials,
};
pub use profile::{DEFAULT_PROFILE_DIR, DEFAULT_PROFILE_NAME, ProfileFile, ProfileStore};
