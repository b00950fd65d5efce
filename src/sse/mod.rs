// ABOUTME: Server-Sent Events support for streaming chat responses
// ABOUTME: Exposes the wire-format encoder used by every streaming route
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Juris Labs

//! Server-Sent Events (SSE) support.
//!
//! The only stateful thing about SSE in this server is the transport; the
//! framing itself is a pure transform implemented in [`encoder`].

pub mod encoder;

pub use encoder::{encode, MEDIA_TYPE};
