// ABOUTME: Maintenance status route reporting whether the product is gated
// ABOUTME: Fails open so a backend outage never locks users out of the app
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Juris Labs

//! Maintenance status route.
//!
//! A single public endpoint consulted by clients at startup. When the
//! status record cannot be fetched the endpoint reports "not in
//! maintenance" rather than an error, so a backend outage degrades to
//! normal operation instead of a lockout.

use crate::server::ServerResources;
use crate::services::maintenance::MaintenanceRecord;
use axum::{extract::State, response::IntoResponse, routing::get, Json, Router};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::warn;

/// Maintenance status reported to clients
///
/// The `start_time`/`end_time` keys are always present, as `null` when no
/// window is announced.
#[derive(Debug, Serialize, Deserialize)]
pub struct MaintenanceStatusResponse {
    /// Whether maintenance mode is active
    pub is_active: bool,
    /// Operator-facing message, empty when not in maintenance
    pub message: String,
    /// Whether admin users may bypass the gate
    pub allow_admin: bool,
    /// Scheduled start (RFC 3339), if announced
    pub start_time: Option<String>,
    /// Scheduled end (RFC 3339), if announced
    pub end_time: Option<String>,
}

impl MaintenanceStatusResponse {
    /// The fail-open default: not in maintenance
    #[must_use]
    pub fn inactive() -> Self {
        Self {
            is_active: false,
            message: String::new(),
            allow_admin: true,
            start_time: None,
            end_time: None,
        }
    }
}

impl From<MaintenanceRecord> for MaintenanceStatusResponse {
    fn from(record: MaintenanceRecord) -> Self {
        Self {
            is_active: record.is_active,
            message: record.message,
            allow_admin: record.allow_admin,
            start_time: record.start_time,
            end_time: record.end_time,
        }
    }
}

/// Maintenance routes handler
pub struct MaintenanceRoutes;

impl MaintenanceRoutes {
    /// Create all maintenance routes
    #[must_use]
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/api/maintenance/status", get(Self::status))
            .with_state(resources)
    }

    /// Report the current maintenance status, failing open on fetch errors
    async fn status(State(resources): State<Arc<ServerResources>>) -> impl IntoResponse {
        match resources.maintenance.fetch_status().await {
            Ok(record) => Json(MaintenanceStatusResponse::from(record)),
            Err(e) => {
                warn!("Maintenance status fetch failed, failing open: {e}");
                Json(MaintenanceStatusResponse::inactive())
            }
        }
    }
}
