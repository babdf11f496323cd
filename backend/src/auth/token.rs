//! HMAC-signed bearer tokens
//!
//! Token format: `hex(user_id) "." hex(hmac_sha256(secret, user_id))`. The
//! id half is hex-encoded so the separator can never appear inside it.

use hmac::{Hmac, Mac};
use sha2::Sha256;
use thiserror::Error;

type HmacSha256 = Hmac<Sha256>;

/// Bearer-token verification failures
#[derive(Debug, Error)]
pub enum AuthError {
    /// Token does not have the `id.signature` hex shape
    #[error("malformed bearer token")]
    Malformed,

    /// Token signature does not match the user id
    #[error("bearer token signature mismatch")]
    InvalidSignature,
}

/// Verifies (and, for tooling and tests, issues) bearer tokens
pub struct TokenVerifier {
    secret: Vec<u8>,
}

impl TokenVerifier {
    /// Creates a verifier for the given shared secret
    #[must_use]
    pub fn new(secret: &str) -> Self {
        Self {
            secret: secret.as_bytes().to_vec(),
        }
    }

    fn mac(&self, user_id: &[u8]) -> HmacSha256 {
        let mut mac =
            HmacSha256::new_from_slice(&self.secret).expect("HMAC accepts keys of any length");
        mac.update(user_id);
        mac
    }

    /// Issues a token for `user_id`
    #[must_use]
    pub fn issue(&self, user_id: &str) -> String {
        let signature = self.mac(user_id.as_bytes()).finalize().into_bytes();
        format!(
            "{}.{}",
            hex::encode(user_id.as_bytes()),
            hex::encode(signature)
        )
    }

    /// Verifies a token and returns the user id it was issued for
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Malformed` when the token does not parse and
    /// `AuthError::InvalidSignature` when the HMAC does not match.
    pub fn verify(&self, token: &str) -> Result<String, AuthError> {
        let (id_hex, signature_hex) = token.split_once('.').ok_or(AuthError::Malformed)?;
        let user_id = hex::decode(id_hex).map_err(|_| AuthError::Malformed)?;
        let signature = hex::decode(signature_hex).map_err(|_| AuthError::Malformed)?;

        // Constant-time comparison via the Mac trait
        self.mac(&user_id)
            .verify_slice(&signature)
            .map_err(|_| AuthError::InvalidSignature)?;

        String::from_utf8(user_id).map_err(|_| AuthError::Malformed)
    }
}
