// ABOUTME: External collaborator services behind trait seams
// ABOUTME: Chat history, maintenance status, and support email delivery
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Juris Labs

//! External collaborators.
//!
//! Business logic, persistence and delivery all live outside this server.
//! Each collaborator is described by a trait so route handlers receive the
//! dependency explicitly, and each has a reqwest-backed implementation
//! against the hosted backend.

/// Chat session and message persistence plus assistant reply streaming
pub mod chat_history;
/// Maintenance-status record store
pub mod maintenance;
/// Support email delivery
pub mod support_email;

pub use chat_history::{ChatHistoryService, HostedChatHistoryClient};
pub use maintenance::{HostedMaintenanceStore, MaintenanceStore};
pub use support_email::{HttpSupportMailer, SupportMailer};
