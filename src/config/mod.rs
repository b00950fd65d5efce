// ABOUTME: Configuration module for deployment-specific settings
// ABOUTME: Environment-only configuration, no config files
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Juris Labs

//! Configuration management.

/// Environment-based configuration
pub mod environment;

pub use environment::ServerConfig;
