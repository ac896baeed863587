use std::sync::LazyLock;

use axum::{RequestPartsExt, extract::FromRequestParts, http::request::Parts};
use axum_extra::{
    TypedHeader,
    headers::{Authorization, authorization::Bearer},
};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::ServiceError;

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    exp: usize,
}

impl<S> FromRequestParts<S> for Claims
where
    S: Send + Sync,
{
    type Rejection = ServiceError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let TypedHeader(Authorization(bearer)) = parts
            .extract::<TypedHeader<Authorization<Bearer>>>()
            .await
            .map_err(|_| ServiceError::Unauthorized("Missing bearer token".to_string()))?;
        validate_jwt(bearer.token())
            .map_err(|_| ServiceError::Unauthorized("Invalid token".to_string()))
    }
}

struct Keys {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl Keys {
    fn new(secret: &[u8]) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
        }
    }
}

static KEYS: LazyLock<Keys> = LazyLock::new(|| {
    let secret = read_or_generate_secret();
    Keys::new(&secret)
});

fn read_or_generate_secret() -> Vec<u8> {
    if let Ok(secret) = std::env::var("CRICKET_JWT_SECRET") {
        secret.as_bytes().to_vec()
    } else {
        // Tokens from previous runs become invalid; fine for development.
        log::warn!("JWT secret not found, generating a random one");
        Uuid::new_v4().as_bytes().to_vec()
    }
}

pub fn generate_jwt(username: &str) -> String {
    let claims = Claims {
        sub: username.to_string(),
        exp: (chrono::Utc::now() + chrono::Duration::hours(24)).timestamp() as usize,
    };
    encode(&Header::default(), &claims, &KEYS.encoding).unwrap()
}

pub fn validate_jwt(token: &str) -> Result<Claims, String> {
    match decode::<Claims>(token, &KEYS.decoding, &Validation::default()) {
        Ok(data) => Ok(data.claims),
        Err(_) => Err("Invalid token".to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_jwt_round_trip() {
        let token = generate_jwt("alice");
        assert_eq!(validate_jwt(&token).unwrap().sub, "alice");
    }

    #[test]
    fn test_rejects_tampered_token() {
        let mut token = generate_jwt("alice");
        token.push('x');
        assert!(validate_jwt(&token).is_err());
    }
}
