// ABOUTME: JWT authentication manager and Authorization header helpers
// ABOUTME: Issues and validates HS256 tokens carrying the caller's identity
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Juris Labs

//! Authentication primitives.
//!
//! Identity is carried in a signed JWT presented as a Bearer token. Token
//! issuance lives with the auth provider in production; the manager here
//! validates inbound tokens and mints them for tests and tooling.

use crate::errors::{AppError, AppResult};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Extract the token from an `Authorization` header value.
///
/// Returns `None` unless the value uses the exact `Bearer ` scheme prefix.
#[must_use]
pub fn extract_bearer_token(header: &str) -> Option<&str> {
    header.strip_prefix("Bearer ")
}

/// JWT claims for user authentication
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// User ID
    pub sub: String,
    /// User email
    pub email: String,
    /// Issued at timestamp
    pub iat: i64,
    /// Expiration timestamp
    pub exp: i64,
}

/// Resolved caller identity after successful authentication
#[derive(Debug, Clone)]
pub struct AuthResult {
    /// Authenticated user ID
    pub user_id: Uuid,
    /// Authenticated user email
    pub email: String,
}

/// Authentication manager for HS256 JWT tokens
pub struct AuthManager {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    token_expiry_hours: i64,
}

impl AuthManager {
    /// Create a new authentication manager from a shared secret
    #[must_use]
    pub fn new(jwt_secret: &[u8], token_expiry_hours: i64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(jwt_secret),
            decoding_key: DecodingKey::from_secret(jwt_secret),
            token_expiry_hours,
        }
    }

    /// Generate a JWT token for a user
    ///
    /// # Errors
    ///
    /// Returns an error if JWT encoding fails.
    pub fn generate_token(&self, user_id: Uuid, email: &str) -> AppResult<String> {
        let now = Utc::now();
        let expiry = now + Duration::hours(self.token_expiry_hours);

        let claims = Claims {
            sub: user_id.to_string(),
            email: email.to_owned(),
            iat: now.timestamp(),
            exp: expiry.timestamp(),
        };

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| AppError::internal(format!("JWT encoding failed: {e}")))
    }

    /// Validate a JWT token and resolve the caller's identity
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Token signature is invalid
    /// - Token has expired
    /// - Token is malformed or carries an invalid user ID
    pub fn validate_token(&self, token: &str) -> AppResult<AuthResult> {
        let data = decode::<Claims>(token, &self.decoding_key, &Validation::default()).map_err(
            |e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => AppError::auth_expired(),
                _ => AppError::auth_invalid(format!("JWT validation failed: {e}")),
            },
        )?;

        let user_id = Uuid::parse_str(&data.claims.sub)
            .map_err(|_| AppError::auth_invalid("Invalid user ID in token"))?;

        Ok(AuthResult {
            user_id,
            email: data.claims.email,
        })
    }
}
