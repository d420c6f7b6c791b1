//! Bearer token verification.
//!
//! The service never issues tokens; it only verifies HS256 JWTs minted by the
//! identity service. A [`TokenVerifier`] is built once from config and handed
//! to the auth middleware, so every request is checked against an explicit
//! verifier value rather than process-global state.

use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::AppError;

/// JWT claims minted by the identity service.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub sub: String,
    pub exp: usize,
    pub iat: usize,
}

#[derive(Clone)]
pub struct TokenVerifier {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl TokenVerifier {
    pub fn new(secret: &str) -> Self {
        Self {
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation: Validation::new(Algorithm::HS256),
        }
    }

    /// Verifies a raw token and returns the caller's user id.
    pub fn verify(&self, token: &str) -> Result<Uuid, AppError> {
        let data = decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map_err(|_| AppError::Unauthorized("Invalid or expired token".to_string()))?;

        Uuid::parse_str(&data.claims.sub)
            .map_err(|_| AppError::Unauthorized("Invalid token subject".to_string()))
    }

    /// Verifies an `Authorization` header value using the Bearer scheme.
    pub fn verify_bearer(&self, header: &str) -> Result<Uuid, AppError> {
        let token = header
            .strip_prefix("Bearer ")
            .ok_or_else(|| AppError::Unauthorized("Authorization must use Bearer scheme".to_string()))?;
        self.verify(token)
    }
}
