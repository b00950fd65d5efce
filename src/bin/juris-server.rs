// ABOUTME: Production server binary for the Juris chat and support backend
// ABOUTME: Loads configuration, wires hosted collaborators, and serves HTTP
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Juris Labs

//! # Juris API Server Binary
//!
//! Starts the Juris backend with JWT authentication, hosted chat history,
//! and support email delivery.

use anyhow::Result;
use clap::Parser;
use juris_server::{
    auth::AuthManager,
    config::environment::ServerConfig,
    logging,
    middleware::AuthMiddleware,
    server::{self, ServerResources},
    services::{HostedChatHistoryClient, HostedMaintenanceStore, HttpSupportMailer},
};
use std::sync::Arc;
use tracing::{error, info};

#[derive(Parser)]
#[command(name = "juris-server")]
#[command(about = "Juris - chat and support API backend for the Juris legal assistance product")]
pub struct Args {
    /// Override HTTP port
    #[arg(long)]
    http_port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Handle container environments where clap may not work properly
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(e) => {
            eprintln!("Argument parsing failed: {e}");
            eprintln!("Using default configuration");
            Args { http_port: None }
        }
    };

    // Load configuration from environment
    let mut config = ServerConfig::from_env()?;

    // Override port if specified
    if let Some(http_port) = args.http_port {
        config.http_port = http_port;
    }

    // Initialize production logging
    logging::init_from_env()?;

    info!("Starting Juris API Server");
    info!("{}", config.summary());

    // Initialize authentication
    let auth_manager = AuthManager::new(
        config.auth.jwt_secret.as_bytes(),
        config.auth.token_expiry_hours,
    );
    let auth_middleware = Arc::new(AuthMiddleware::new(Arc::new(auth_manager)));
    info!("Authentication manager initialized");

    // Wire hosted collaborators
    let chat_history = Arc::new(HostedChatHistoryClient::new(config.backend.clone()));
    let maintenance = Arc::new(HostedMaintenanceStore::new(config.backend.clone()));
    let support_mailer = Arc::new(HttpSupportMailer::new(config.email.clone()));

    let resources = Arc::new(ServerResources::new(
        Arc::new(config.clone()),
        auth_middleware,
        chat_history,
        maintenance,
        support_mailer,
    ));

    display_available_endpoints(&config);

    if let Err(e) = server::serve(resources).await {
        error!("Server error: {e}");
        return Err(e);
    }

    Ok(())
}

/// Display all available API endpoints with their port
fn display_available_endpoints(config: &ServerConfig) {
    let host = std::env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
    let port = config.http_port;

    info!("=== Available API Endpoints ===");
    info!("Chat:");
    info!("   Create Session:    POST http://{host}:{port}/api/chat/sessions");
    info!("   List Sessions:     GET  http://{host}:{port}/api/chat/sessions");
    info!("   Get Session:       GET  http://{host}:{port}/api/chat/sessions/{{session_id}}");
    info!("   Rename Session:    PATCH http://{host}:{port}/api/chat/sessions/{{session_id}}");
    info!("   Delete Session:    DELETE http://{host}:{port}/api/chat/sessions/{{session_id}}");
    info!("   Stream Reply:      POST http://{host}:{port}/api/chat/sessions/{{session_id}}/stream");
    info!("Support & Status:");
    info!("   Maintenance Status: GET  http://{host}:{port}/api/maintenance/status");
    info!("   Support Email:      POST http://{host}:{port}/api/support/email");
    info!("   Health Check:       GET  http://{host}:{port}/health");
    info!("=== End of Endpoint List ===");
}
