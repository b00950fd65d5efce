// ABOUTME: Health check route for load balancers and uptime monitors
// ABOUTME: Reports service name, version, and current timestamp
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Juris Labs

//! Health check route.

use axum::{response::IntoResponse, routing::get, Json, Router};
use serde::{Deserialize, Serialize};

/// Health check response body
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Always "ok" when the process is serving
    pub status: String,
    /// Service name
    pub service: String,
    /// Crate version
    pub version: String,
    /// Current server time (RFC 3339)
    pub timestamp: String,
}

/// Health routes handler
pub struct HealthRoutes;

impl HealthRoutes {
    /// Create all health routes
    #[must_use]
    pub fn routes() -> Router {
        Router::new().route("/health", get(Self::health))
    }

    async fn health() -> impl IntoResponse {
        Json(HealthResponse {
            status: "ok".to_owned(),
            service: env!("CARGO_PKG_NAME").to_owned(),
            version: env!("CARGO_PKG_VERSION").to_owned(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        })
    }
}
