//! HS256 access-token validation.

use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Audience the auth provider stamps on signed-in user tokens.
pub const DEFAULT_AUDIENCE: &str = "authenticated";

/// Claims read from a provider-issued access token.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject: the provider's user id, which is also `profiles.id`.
    pub sub: Uuid,
    /// Expiration time (UTC Unix timestamp).
    pub exp: i64,
    #[serde(default)]
    pub iat: Option<i64>,
    #[serde(default)]
    pub aud: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

/// Token verification settings.
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// Shared signing secret. Admin routes answer 503 while it is unset.
    pub jwt_secret: Option<String>,
    pub audience: String,
}

/// Validate and decode an access token.
///
/// Checks the signature, expiry and audience.
pub fn validate_token(
    token: &str,
    secret: &str,
    audience: &str,
) -> Result<Claims, jsonwebtoken::errors::Error> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_audience(&[audience]);
    let data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )?;
    Ok(data.claims)
}

#[cfg(test)]
mod tests {
    use jsonwebtoken::{encode, EncodingKey, Header};

    use super::*;

    const SECRET: &str = "test-secret";

    fn token(aud: &str, exp_offset: i64) -> (Uuid, String) {
        let sub = Uuid::new_v4();
        let now = chrono::Utc::now().timestamp();
        let claims = Claims {
            sub,
            exp: now + exp_offset,
            iat: Some(now),
            aud: Some(aud.into()),
            email: Some("admin@studio.example".into()),
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .unwrap();
        (sub, token)
    }

    #[test]
    fn valid_token_yields_subject() {
        let (sub, token) = token(DEFAULT_AUDIENCE, 3600);
        let claims = validate_token(&token, SECRET, DEFAULT_AUDIENCE).unwrap();
        assert_eq!(claims.sub, sub);
        assert_eq!(claims.email.as_deref(), Some("admin@studio.example"));
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let (_, token) = token(DEFAULT_AUDIENCE, 3600);
        assert!(validate_token(&token, "other-secret", DEFAULT_AUDIENCE).is_err());
    }

    #[test]
    fn wrong_audience_is_rejected() {
        let (_, token) = token("anon", 3600);
        assert!(validate_token(&token, SECRET, DEFAULT_AUDIENCE).is_err());
    }

    #[test]
    fn expired_token_is_rejected() {
        let (_, token) = token(DEFAULT_AUDIENCE, -3600);
        assert!(validate_token(&token, SECRET, DEFAULT_AUDIENCE).is_err());
    }
}
