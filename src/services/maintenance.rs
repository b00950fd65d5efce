// ABOUTME: Maintenance-status collaborator backed by the hosted database
// ABOUTME: Fetches the single maintenance record consulted on each status request
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Juris Labs

//! Maintenance status store.
//!
//! The maintenance flag is a single key-value style row in the hosted
//! database, fetched on each request. The fail-open policy (treat a fetch
//! failure as "not in maintenance") is applied by the route layer, not
//! here; this module reports errors faithfully.

use crate::config::environment::BackendConfig;
use crate::errors::{AppError, AppResult};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Name used in external-service error messages
const SERVICE: &str = "maintenance store";

/// The maintenance record as stored in the backend
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MaintenanceRecord {
    /// Whether maintenance mode is active
    pub is_active: bool,
    /// Operator-facing message shown to users
    #[serde(default)]
    pub message: String,
    /// Whether admin users may bypass the maintenance gate
    #[serde(default = "default_allow_admin")]
    pub allow_admin: bool,
    /// Scheduled start (RFC 3339), if announced
    #[serde(default)]
    pub start_time: Option<String>,
    /// Scheduled end (RFC 3339), if announced
    #[serde(default)]
    pub end_time: Option<String>,
}

fn default_allow_admin() -> bool {
    true
}

/// Call contract for the maintenance-status collaborator
#[async_trait]
pub trait MaintenanceStore: Send + Sync {
    /// Fetch the current maintenance record
    async fn fetch_status(&self) -> AppResult<MaintenanceRecord>;
}

/// Maintenance store client for the hosted database REST interface
pub struct HostedMaintenanceStore {
    config: BackendConfig,
    http_client: reqwest::Client,
}

impl HostedMaintenanceStore {
    /// Create a new client
    #[must_use]
    pub fn new(config: BackendConfig) -> Self {
        Self {
            config,
            http_client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl MaintenanceStore for HostedMaintenanceStore {
    async fn fetch_status(&self) -> AppResult<MaintenanceRecord> {
        let url = format!("{}/rest/v1/maintenance_status", self.config.base_url);

        let response = self
            .http_client
            .get(&url)
            .header("apikey", &self.config.api_key)
            .bearer_auth(&self.config.api_key)
            .timeout(Duration::from_secs(self.config.request_timeout_secs))
            .query(&[("limit", "1"), ("order", "created_at.desc")])
            .send()
            .await
            .map_err(|e| AppError::external_service(SERVICE, e.to_string()))?;

        if !response.status().is_success() {
            return Err(AppError::external_service(
                SERVICE,
                format!(
                    "HTTP {}: {}",
                    response.status(),
                    response.text().await.unwrap_or_default()
                ),
            ));
        }

        let mut rows: Vec<MaintenanceRecord> = response
            .json()
            .await
            .map_err(|e| AppError::external_service(SERVICE, format!("JSON parse error: {e}")))?;

        rows.pop()
            .ok_or_else(|| AppError::external_service(SERVICE, "no maintenance record found"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_defaults_on_sparse_row() {
        let record: MaintenanceRecord =
            serde_json::from_str(r#"{"is_active": true}"#).unwrap();
        assert!(record.is_active);
        assert!(record.allow_admin);
        assert!(record.message.is_empty());
        assert!(record.start_time.is_none());
        assert!(record.end_time.is_none());
    }
}
