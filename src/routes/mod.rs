// ABOUTME: Route module organization for Juris HTTP endpoints
// ABOUTME: Centralized route definitions organized by domain with thin handlers
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Juris Labs

//! Route module for the Juris API server.
//!
//! Each domain module contains only route definitions and thin handler
//! functions that delegate to the injected collaborator services.

/// Chat session routes
pub mod chat;
/// Health check routes
pub mod health;
/// Maintenance status routes
pub mod maintenance;
/// Support email routes
pub mod support;

pub use chat::ChatRoutes;
pub use health::HealthRoutes;
pub use maintenance::MaintenanceRoutes;
pub use support::SupportRoutes;

use crate::server::ServerResources;
use axum::http::HeaderValue;
use axum::Router;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Build the full application router
#[must_use]
pub fn router(resources: Arc<ServerResources>) -> Router {
    let cors = cors_layer(&resources.config.cors_origins);

    Router::new()
        .merge(ChatRoutes::routes(resources.clone()))
        .merge(MaintenanceRoutes::routes(resources.clone()))
        .merge(SupportRoutes::routes(resources))
        .merge(HealthRoutes::routes())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}

/// Build the CORS layer from configured origins
fn cors_layer(origins: &[String]) -> CorsLayer {
    let base = CorsLayer::new()
        .allow_methods(Any)
        .allow_headers(Any);

    if origins.iter().any(|o| o == "*") {
        base.allow_origin(Any)
    } else {
        let parsed: Vec<HeaderValue> = origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        base.allow_origin(parsed)
    }
}
