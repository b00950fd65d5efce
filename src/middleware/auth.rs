// ABOUTME: Authentication middleware resolving caller identity from request headers
// ABOUTME: Validates Bearer JWTs and produces an AuthResult for route handlers
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Juris Labs

use crate::auth::{extract_bearer_token, AuthManager, AuthResult};
use crate::errors::{AppError, AppResult};
use std::sync::Arc;

/// Middleware for request authentication
///
/// Route handlers call [`AuthMiddleware::authenticate_request`] with the raw
/// `Authorization` header value; everything else about the request stays out
/// of scope here.
#[derive(Clone)]
pub struct AuthMiddleware {
    auth_manager: Arc<AuthManager>,
}

impl AuthMiddleware {
    /// Create new auth middleware
    #[must_use]
    pub fn new(auth_manager: Arc<AuthManager>) -> Self {
        Self { auth_manager }
    }

    /// Authenticate a request and extract the caller's identity
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The authorization header is missing or malformed
    /// - JWT token validation fails
    #[tracing::instrument(
        skip(self, auth_header),
        fields(user_id = tracing::field::Empty, success = tracing::field::Empty)
    )]
    pub fn authenticate_request(&self, auth_header: Option<&str>) -> AppResult<AuthResult> {
        let Some(header) = auth_header else {
            tracing::warn!("Authentication failed: missing authorization header");
            return Err(AppError::auth_required());
        };

        let Some(token) = extract_bearer_token(header) else {
            tracing::Span::current().record("success", false);
            tracing::warn!("Authentication failed: authorization header is not a Bearer token");
            return Err(AppError::auth_invalid(
                "Invalid authorization header format - must be 'Bearer <token>'",
            ));
        };

        match self.auth_manager.validate_token(token) {
            Ok(result) => {
                tracing::Span::current()
                    .record("user_id", result.user_id.to_string())
                    .record("success", true);
                tracing::debug!("JWT authentication successful");
                Ok(result)
            }
            Err(e) => {
                tracing::Span::current().record("success", false);
                tracing::warn!("JWT authentication failed: {e}");
                Err(e)
            }
        }
    }

    /// Get reference to the auth manager for testing purposes
    #[must_use]
    pub fn auth_manager(&self) -> &AuthManager {
        &self.auth_manager
    }
}
