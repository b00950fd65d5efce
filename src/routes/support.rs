// ABOUTME: Support email route validating requests and reporting delivery
// ABOUTME: Thin handler over the injected support mailer collaborator
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Juris Labs

//! Support email route.
//!
//! Accepts a structured support request, validates the required fields and
//! forwards it to the mailer collaborator. A delivery declined by the email
//! service is reported as a 400 with the service's reason; only transport
//! failures surface as 5xx.

use crate::errors::AppError;
use crate::server::ServerResources;
use crate::services::support_email::SupportEmailRequest;
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use std::sync::Arc;

/// Support routes handler
pub struct SupportRoutes;

impl SupportRoutes {
    /// Create all support routes
    #[must_use]
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/api/support/email", post(Self::send_email))
            .with_state(resources)
    }

    /// Validate and forward a support request
    async fn send_email(
        State(resources): State<Arc<ServerResources>>,
        Json(request): Json<SupportEmailRequest>,
    ) -> Result<Response, AppError> {
        validate_request(&request)?;

        let delivery = resources.support_mailer.send(&request).await?;

        if delivery.success {
            Ok((
                StatusCode::OK,
                Json(serde_json::json!({"success": true})),
            )
                .into_response())
        } else {
            let reason = delivery
                .error
                .unwrap_or_else(|| "Email delivery failed".to_owned());
            Ok((
                StatusCode::BAD_REQUEST,
                Json(serde_json::json!({"success": false, "error": reason})),
            )
                .into_response())
        }
    }
}

fn validate_request(request: &SupportEmailRequest) -> Result<(), AppError> {
    if request.name.trim().is_empty() {
        return Err(AppError::missing_field("name"));
    }
    if request.email.trim().is_empty() {
        return Err(AppError::missing_field("email"));
    }
    // Minimal shape check; full validation belongs to the email service.
    if !request.email.contains('@') {
        return Err(AppError::invalid_input("Invalid email address"));
    }
    if request.subject.trim().is_empty() {
        return Err(AppError::missing_field("subject"));
    }
    if request.message.trim().is_empty() {
        return Err(AppError::missing_field("message"));
    }
    Ok(())
}
