//! PKCE (Proof Key for Code Exchange) helpers
//!
//! RFC 7636: https://tools.ietf.org/html/rfc7636

use crate::error::{TeamsError, TeamsResult};
use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use rand::RngCore;
use rand::rngs::OsRng;
use sha2::{Digest, Sha256};

/// Unreserved URI characters allowed in a code verifier
const UNRESERVED: &[u8; 66] =
    b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789-._~";

/// Shortest verifier RFC 7636 allows
pub const MIN_CODE_VERIFIER_LENGTH: usize = 43;

/// Longest verifier RFC 7636 allows
pub const MAX_CODE_VERIFIER_LENGTH: usize = 128;

/// Verifier length used by the session bootstrap
pub const DEFAULT_CODE_VERIFIER_LENGTH: usize = 96;

const NONCE_LENGTH: usize = 32;

/// Random string of `length` unreserved characters.
///
/// Each OS-random byte is mapped modulo 66; the slight bias is acceptable for
/// verifiers and nonces.
pub fn random_string(length: usize) -> String {
    let mut bytes = vec![0u8; length];
    OsRng.fill_bytes(&mut bytes);
    bytes
        .iter()
        .map(|b| UNRESERVED[(*b as usize) % UNRESERVED.len()] as char)
        .collect()
}

/// Create a code verifier of the given length (43..=128)
pub fn create_code_verifier(length: usize) -> TeamsResult<String> {
    if !(MIN_CODE_VERIFIER_LENGTH..=MAX_CODE_VERIFIER_LENGTH).contains(&length) {
        return Err(TeamsError::invalid_parameter_named(
            format!(
                "PKCE code_verifier length must be between {} and {}, got {}",
                MIN_CODE_VERIFIER_LENGTH, MAX_CODE_VERIFIER_LENGTH, length
            ),
            "code_verifier",
        ));
    }
    Ok(random_string(length))
}

/// S256 challenge: `BASE64URL(SHA256(verifier))` without padding
pub fn create_code_challenge(verifier: &str) -> String {
    let digest = Sha256::digest(verifier.as_bytes());
    URL_SAFE_NO_PAD.encode(digest)
}

/// Random nonce for authorize requests
pub fn generate_nonce() -> String {
    random_string(NONCE_LENGTH)
}

/// A freshly generated verifier with its challenge. Single use, never persisted.
#[derive(Debug, Clone)]
pub struct PkcePair {
    code_verifier: String,
    code_challenge: String,
}

impl PkcePair {
    /// Generate a pair whose verifier has `verifier_length` characters
    pub fn generate(verifier_length: usize) -> TeamsResult<Self> {
        let code_verifier = create_code_verifier(verifier_length)?;
        let code_challenge = create_code_challenge(&code_verifier);
        Ok(Self {
            code_verifier,
            code_challenge,
        })
    }

    pub fn code_verifier(&self) -> &str {
        &self.code_verifier
    }

    pub fn code_challenge(&self) -> &str {
        &self.code_challenge
    }

    /// The challenge method (always S256)
    pub fn method(&self) -> &'static str {
        "S256"
    }
}
