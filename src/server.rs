// ABOUTME: Centralized resource container and HTTP server entry point
// ABOUTME: Holds shared collaborator services and runs the axum server
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Juris Labs

//! # Server Resources and Serving
//!
//! Centralized resource container for dependency injection. Route handlers
//! receive one `Arc<ServerResources>` as axum state instead of reaching for
//! ambient framework magic; collaborators are injected explicitly here.

use crate::config::ServerConfig;
use crate::middleware::AuthMiddleware;
use crate::services::{ChatHistoryService, MaintenanceStore, SupportMailer};
use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::info;

/// Centralized resource container for dependency injection
#[derive(Clone)]
pub struct ServerResources {
    /// Loaded server configuration
    pub config: Arc<ServerConfig>,
    /// Authentication middleware
    pub auth_middleware: Arc<AuthMiddleware>,
    /// Chat history collaborator
    pub chat_history: Arc<dyn ChatHistoryService>,
    /// Maintenance status collaborator
    pub maintenance: Arc<dyn MaintenanceStore>,
    /// Support email collaborator
    pub support_mailer: Arc<dyn SupportMailer>,
}

impl ServerResources {
    /// Create new server resources
    #[must_use]
    pub fn new(
        config: Arc<ServerConfig>,
        auth_middleware: Arc<AuthMiddleware>,
        chat_history: Arc<dyn ChatHistoryService>,
        maintenance: Arc<dyn MaintenanceStore>,
        support_mailer: Arc<dyn SupportMailer>,
    ) -> Self {
        Self {
            config,
            auth_middleware,
            chat_history,
            maintenance,
            support_mailer,
        }
    }
}

/// Run the HTTP server until a shutdown signal arrives
///
/// # Errors
///
/// Returns an error if the listener cannot bind or the server fails.
pub async fn serve(resources: Arc<ServerResources>) -> Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], resources.config.http_port));
    let app = crate::routes::router(resources);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("HTTP server listening on {addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("shutdown signal received");
    }
}
