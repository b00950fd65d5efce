// ABOUTME: SSE wire-format encoder producing `data: <json>\n\n` frames
// ABOUTME: Pure one-shot transform from a JSON-serializable payload to framed text
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Juris Labs

//! SSE message framing.
//!
//! Each Server-Sent Events message is a `data: ` line carrying a JSON
//! payload, terminated by a blank line. The correctness-critical property is
//! that the JSON body never contains a bare newline: SSE treats a bare `\n`
//! as a field terminator, so a multi-line string value inside the payload
//! would otherwise split the frame. `serde_json` always escapes control
//! characters inside strings, which is exactly the guarantee we need.

use crate::errors::{AppError, AppResult};
use serde::Serialize;

/// Content type for SSE responses
pub const MEDIA_TYPE: &str = "text/event-stream";

/// Encode a payload as a single framed SSE message.
///
/// The output is exactly `data: ` followed by the compact JSON serialization
/// of `event` and two trailing newline characters. The payload is a generic
/// envelope; no particular key is assumed to be present.
///
/// # Errors
///
/// Returns a `SerializationError` if the payload cannot be represented as
/// JSON. No partial output is produced; the caller decides whether to abort
/// the stream or emit a fallback error event.
pub fn encode<T: Serialize + ?Sized>(event: &T) -> AppResult<String> {
    let json = serde_json::to_string(event)
        .map_err(|e| AppError::serialization(format!("SSE payload is not valid JSON: {e}")))?;
    Ok(format!("data: {json}\n\n"))
}
