// ABOUTME: Request middleware module for cross-cutting HTTP concerns
// ABOUTME: Currently hosts the Authorization header authentication middleware
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Juris Labs

//! Request middleware.

/// Authorization header authentication
pub mod auth;

pub use auth::AuthMiddleware;
