use anyhow::{Context, Result};
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JwtClaims {
    pub sub: String,      // User ID
    pub username: String, // Username as registered with the identity provider
    pub exp: usize,       // Expiration time
    pub iat: usize,       // Issued at
    pub aud: Option<String>,
    pub iss: Option<String>,
}

pub fn decode_jwt(token: &str, secret: &str) -> Result<JwtClaims> {
    // The identity provider signs with HS256
    let mut validation = Validation::new(Algorithm::HS256);

    // Allow for some clock skew
    validation.leeway = 60;
    validation.validate_aud = false;

    let decoding_key = DecodingKey::from_secret(secret.as_bytes());

    let token_data = decode::<JwtClaims>(token, &decoding_key, &validation)
        .context("Failed to decode JWT token")?;

    Ok(token_data.claims)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_token_with_bad_signature() {
        let secret = "test-secret-key-for-testing-only-min-32-chars";

        let forged = "eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9.eyJzdWIiOiIxMjM0NTY3ODkwIiwidXNlcm5hbWUiOiJ0ZXN0IiwiaWF0IjoxNTE2MjM5MDIyLCJleHAiOjk5OTk5OTk5OTl9.invalid";

        let result = decode_jwt(forged, secret);
        assert!(result.is_err());
    }

    #[test]
    fn rejects_garbage_token() {
        let secret = "test-secret-key-for-testing-only-min-32-chars";
        assert!(decode_jwt("not-a-jwt", secret).is_err());
    }
}
