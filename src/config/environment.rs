// ABOUTME: Environment configuration management for deployment-specific settings
// ABOUTME: Handles environment variables and runtime configuration parsing
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Juris Labs

//! Environment-based configuration management for production deployment

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::env;

/// Default HTTP port when `HTTP_PORT` is unset
const DEFAULT_HTTP_PORT: u16 = 8081;

/// Top-level server configuration, loaded from the environment
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Port the HTTP server binds to
    pub http_port: u16,
    /// Allowed CORS origins (`*` permits any origin)
    pub cors_origins: Vec<String>,
    /// Authentication settings
    pub auth: AuthConfig,
    /// Hosted database backend settings
    pub backend: BackendConfig,
    /// Support email delivery settings
    pub email: EmailConfig,
}

/// Authentication configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Shared secret for HS256 JWT validation
    #[serde(skip_serializing)]
    pub jwt_secret: String,
    /// Token lifetime in hours (used when minting tokens)
    pub token_expiry_hours: i64,
}

/// Hosted REST database backend configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendConfig {
    /// Base URL of the hosted database REST interface
    pub base_url: String,
    /// Service API key sent with every backend request
    #[serde(skip_serializing)]
    pub api_key: String,
    /// Per-request timeout in seconds
    pub request_timeout_secs: u64,
}

/// Support email delivery configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmailConfig {
    /// Base URL of the email delivery API
    pub base_url: String,
    /// Email delivery API key
    #[serde(skip_serializing)]
    pub api_key: String,
    /// Sender address for outgoing support mail
    pub from_address: String,
    /// Mailbox that receives support requests
    pub support_recipient: String,
}

impl ServerConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    ///
    /// Returns an error when a required variable (`JWT_SECRET`,
    /// `BACKEND_BASE_URL`, `BACKEND_API_KEY`, `EMAIL_API_KEY`) is missing or
    /// a numeric variable cannot be parsed.
    pub fn from_env() -> Result<Self> {
        let http_port = env_var_or("HTTP_PORT", &DEFAULT_HTTP_PORT.to_string())?
            .parse::<u16>()
            .context("HTTP_PORT must be a valid port number")?;

        let cors_origins = parse_origins(&env_var_or("CORS_ORIGINS", "*")?);

        let auth = AuthConfig {
            jwt_secret: env::var("JWT_SECRET").context("JWT_SECRET must be set")?,
            token_expiry_hours: env_var_or("TOKEN_EXPIRY_HOURS", "24")?
                .parse::<i64>()
                .context("TOKEN_EXPIRY_HOURS must be an integer")?,
        };

        let backend = BackendConfig {
            base_url: env::var("BACKEND_BASE_URL").context("BACKEND_BASE_URL must be set")?,
            api_key: env::var("BACKEND_API_KEY").context("BACKEND_API_KEY must be set")?,
            request_timeout_secs: env_var_or("BACKEND_TIMEOUT_SECS", "10")?
                .parse::<u64>()
                .context("BACKEND_TIMEOUT_SECS must be an integer")?,
        };

        let email = EmailConfig {
            base_url: env_var_or("EMAIL_API_BASE_URL", "https://api.resend.com")?,
            api_key: env::var("EMAIL_API_KEY").context("EMAIL_API_KEY must be set")?,
            from_address: env_var_or("EMAIL_FROM_ADDRESS", "support@juris.example")?,
            support_recipient: env_var_or("SUPPORT_RECIPIENT", "helpdesk@juris.example")?,
        };

        Ok(Self {
            http_port,
            cors_origins,
            auth,
            backend,
            email,
        })
    }

    /// Human-readable configuration summary for startup logging.
    ///
    /// Secrets are never included.
    #[must_use]
    pub fn summary(&self) -> String {
        format!(
            "http_port={} backend={} email_api={} cors_origins={:?}",
            self.http_port, self.backend.base_url, self.email.base_url, self.cors_origins
        )
    }
}

/// Get environment variable or default value
fn env_var_or(key: &str, default: &str) -> Result<String> {
    Ok(env::var(key).unwrap_or_else(|_| default.to_owned()))
}

/// Parse comma-separated CORS origins
fn parse_origins(origins_str: &str) -> Vec<String> {
    if origins_str == "*" {
        vec!["*".to_owned()]
    } else {
        origins_str
            .split(',')
            .map(|s| s.trim().to_owned())
            .filter(|s| !s.is_empty())
            .collect()
    }
}
