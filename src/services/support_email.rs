// ABOUTME: Support email collaborator delegating delivery to an HTTP email API
// ABOUTME: Trait seam plus a reqwest client carrying the delivery result back
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Juris Labs

//! Support email delivery.
//!
//! Delivery is performed by a third-party email API; this module forwards
//! the structured support request and reports the service's success flag and
//! error message without interpretation.

use crate::config::environment::EmailConfig;
use crate::errors::{AppError, AppResult};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Name used in external-service error messages
const SERVICE: &str = "support email";

/// Outbound request timeout for the email API
const REQUEST_TIMEOUT_SECS: u64 = 15;

/// A structured support request from a user
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SupportEmailRequest {
    /// Sender's display name
    pub name: String,
    /// Sender's reply address
    pub email: String,
    /// Subject line
    pub subject: String,
    /// Message body
    pub message: String,
}

/// Result of a delivery attempt
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmailDelivery {
    /// Whether the service accepted the message
    pub success: bool,
    /// Service-provided error message when `success` is false
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Call contract for the support email collaborator
#[async_trait]
pub trait SupportMailer: Send + Sync {
    /// Deliver a support request
    async fn send(&self, request: &SupportEmailRequest) -> AppResult<EmailDelivery>;
}

#[derive(Debug, Serialize)]
struct OutboundEmail<'a> {
    from: &'a str,
    to: &'a str,
    reply_to: &'a str,
    subject: String,
    text: String,
}

/// Support mailer backed by an HTTP email delivery API
pub struct HttpSupportMailer {
    config: EmailConfig,
    http_client: reqwest::Client,
}

impl HttpSupportMailer {
    /// Create a new mailer
    #[must_use]
    pub fn new(config: EmailConfig) -> Self {
        Self {
            config,
            http_client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl SupportMailer for HttpSupportMailer {
    async fn send(&self, request: &SupportEmailRequest) -> AppResult<EmailDelivery> {
        let url = format!("{}/emails", self.config.base_url);

        let outbound = OutboundEmail {
            from: &self.config.from_address,
            to: &self.config.support_recipient,
            reply_to: &request.email,
            subject: format!("[Support] {}", request.subject),
            text: format!("From: {} <{}>\n\n{}", request.name, request.email, request.message),
        };

        let response = self
            .http_client
            .post(&url)
            .bearer_auth(&self.config.api_key)
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .json(&outbound)
            .send()
            .await
            .map_err(|e| AppError::external_service(SERVICE, e.to_string()))?;

        if response.status().is_success() {
            Ok(EmailDelivery {
                success: true,
                error: None,
            })
        } else {
            // The service declined delivery; report the reason instead of
            // treating it as a transport failure.
            let body = response.text().await.unwrap_or_default();
            Ok(EmailDelivery {
                success: false,
                error: Some(body),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_delivery_error_skipped_when_absent() {
        let ok = EmailDelivery {
            success: true,
            error: None,
        };
        assert_eq!(serde_json::to_string(&ok).unwrap(), r#"{"success":true}"#);

        let failed = EmailDelivery {
            success: false,
            error: Some("rejected".to_owned()),
        };
        let json = serde_json::to_string(&failed).unwrap();
        assert!(json.contains("rejected"));
    }
}
