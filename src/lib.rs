// ABOUTME: Main library entry point for the Juris chat and support backend
// ABOUTME: Provides chat session APIs, SSE reply streaming, and support tooling
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Juris Labs

#![deny(unsafe_code)]

//! # Juris Server
//!
//! Backend API server for the Juris legal assistance product. Provides chat
//! session management with streamed assistant replies over Server-Sent
//! Events, a maintenance status endpoint, and support email delivery.
//! Persistence and reply generation are delegated to a hosted backend; this
//! server authenticates callers, shapes requests, and relays streams.
//!
//! ## Architecture
//!
//! - **Routes**: Thin axum handlers organized by domain
//! - **Services**: Trait seams over the hosted backend and the email API
//! - **SSE**: The wire encoder producing `data: <json>\n\n` frames
//! - **Auth**: Bearer token extraction and JWT validation
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use juris_server::config::environment::ServerConfig;
//!
//! fn main() -> anyhow::Result<()> {
//!     let config = ServerConfig::from_env()?;
//!     println!("Juris server configured with port: HTTP={}", config.http_port);
//!     Ok(())
//! }
//! ```

// ── Public API ──────────────────────────────────────────────────────────
// These modules are used by binary crates (src/bin/) and integration tests
// (tests/). They must remain `pub` so external consumers can access them.

/// Authentication and token validation
pub mod auth;

/// Configuration management
pub mod config;

/// Unified error handling system with standard error codes and HTTP responses
pub mod errors;

/// Structured logging configuration
pub mod logging;

/// Request middleware (authentication)
pub mod middleware;

/// HTTP routes organized by domain
pub mod routes;

/// Resource container and server entry point
pub mod server;

/// Collaborator services for the hosted backend and email delivery
pub mod services;

/// Server-Sent Events wire encoding
pub mod sse;
