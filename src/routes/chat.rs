// ABOUTME: Chat route handlers for legal-assistance conversation management
// ABOUTME: REST endpoints for session CRUD and SSE streaming of assistant replies
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Juris Labs

//! Chat session routes.
//!
//! This module handles chat session management: creating, listing, renaming
//! and deleting sessions, plus streaming assistant replies over SSE. All
//! handlers require Bearer authentication; persistence is delegated to the
//! chat history collaborator.

use crate::auth::AuthResult;
use crate::errors::AppError;
use crate::server::ServerResources;
use crate::services::chat_history::{ChatSession, MessageRole, StoredMessage};
use crate::sse;
use axum::{
    body::Body,
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{delete, get, patch, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use std::sync::Arc;
use tokio_stream::StreamExt;

// ============================================================================
// Request/Response Types
// ============================================================================

/// Request to create a new session
#[derive(Debug, Deserialize)]
pub struct CreateSessionRequest {
    /// Session title
    pub title: String,
}

/// Request to rename a session
#[derive(Debug, Deserialize)]
pub struct UpdateSessionRequest {
    /// New title
    pub title: String,
}

/// Request to send a message on the streaming endpoint
#[derive(Debug, Deserialize)]
pub struct SendMessageRequest {
    /// Message content
    pub content: String,
}

/// Response for a single session
#[derive(Debug, Serialize, Deserialize)]
pub struct SessionResponse {
    /// Session ID
    pub id: String,
    /// Session title
    pub title: String,
    /// Creation timestamp
    pub created_at: String,
    /// Last update timestamp
    pub updated_at: String,
    /// Messages in the session, oldest first
    pub messages: Vec<MessageResponse>,
}

impl From<ChatSession> for SessionResponse {
    fn from(session: ChatSession) -> Self {
        Self {
            id: session.id,
            title: session.title,
            created_at: session.created_at,
            updated_at: session.updated_at,
            messages: session.messages.into_iter().map(Into::into).collect(),
        }
    }
}

/// Summary of a session for listing
#[derive(Debug, Serialize, Deserialize)]
pub struct SessionSummaryResponse {
    /// Session ID
    pub id: String,
    /// Session title
    pub title: String,
    /// Message count
    pub message_count: i64,
    /// Creation timestamp
    pub created_at: String,
    /// Last update timestamp
    pub updated_at: String,
}

/// Response for listing sessions
#[derive(Debug, Serialize, Deserialize)]
pub struct SessionListResponse {
    /// List of sessions
    pub sessions: Vec<SessionSummaryResponse>,
    /// Count of sessions returned
    pub total: usize,
}

/// Response for a message
#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    /// Message ID
    pub id: String,
    /// Role (user/assistant)
    pub role: String,
    /// Message content
    pub content: String,
    /// Creation timestamp
    pub created_at: String,
}

impl From<StoredMessage> for MessageResponse {
    fn from(message: StoredMessage) -> Self {
        Self {
            id: message.id,
            role: message.role,
            content: message.content,
            created_at: message.created_at,
        }
    }
}

/// Query parameters for listing sessions
#[derive(Debug, Deserialize)]
pub struct ListSessionsQuery {
    /// Maximum number of sessions to return
    #[serde(default = "default_limit")]
    pub limit: i64,
    /// Offset for pagination
    #[serde(default)]
    pub offset: i64,
}

const fn default_limit() -> i64 {
    20
}

// ============================================================================
// Chat Routes
// ============================================================================

/// Chat routes handler
pub struct ChatRoutes;

impl ChatRoutes {
    /// Create all chat routes
    #[must_use]
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/api/chat/sessions", post(Self::create_session))
            .route("/api/chat/sessions", get(Self::list_sessions))
            .route("/api/chat/sessions/:session_id", get(Self::get_session))
            .route(
                "/api/chat/sessions/:session_id",
                patch(Self::update_session),
            )
            .route(
                "/api/chat/sessions/:session_id",
                delete(Self::delete_session),
            )
            .route(
                "/api/chat/sessions/:session_id/stream",
                post(Self::send_message_stream),
            )
            .with_state(resources)
    }

    /// Extract and authenticate the caller from the authorization header
    fn authenticate(
        headers: &axum::http::HeaderMap,
        resources: &Arc<ServerResources>,
    ) -> Result<AuthResult, AppError> {
        let auth_header = headers.get("authorization").and_then(|h| h.to_str().ok());
        resources.auth_middleware.authenticate_request(auth_header)
    }

    // ========================================================================
    // Session Handlers
    // ========================================================================

    /// Create a new session
    async fn create_session(
        State(resources): State<Arc<ServerResources>>,
        headers: axum::http::HeaderMap,
        Json(request): Json<CreateSessionRequest>,
    ) -> Result<Response, AppError> {
        let auth = Self::authenticate(&headers, &resources)?;

        let title = request.title.trim();
        if title.is_empty() {
            return Err(AppError::invalid_input("Session title must not be empty"));
        }

        let session = resources
            .chat_history
            .create_session(&auth.user_id.to_string(), title)
            .await?;

        Ok((StatusCode::CREATED, Json(SessionResponse::from(session))).into_response())
    }

    /// List the caller's sessions
    async fn list_sessions(
        State(resources): State<Arc<ServerResources>>,
        headers: axum::http::HeaderMap,
        Query(query): Query<ListSessionsQuery>,
    ) -> Result<Response, AppError> {
        let auth = Self::authenticate(&headers, &resources)?;

        let sessions = resources
            .chat_history
            .list_sessions(&auth.user_id.to_string(), query.limit, query.offset)
            .await?;

        let total = sessions.len();
        let response = SessionListResponse {
            sessions: sessions
                .into_iter()
                .map(|s| SessionSummaryResponse {
                    id: s.id,
                    title: s.title,
                    message_count: s.message_count,
                    created_at: s.created_at,
                    updated_at: s.updated_at,
                })
                .collect(),
            total,
        };

        Ok((StatusCode::OK, Json(response)).into_response())
    }

    /// Get a specific session with its messages
    async fn get_session(
        State(resources): State<Arc<ServerResources>>,
        headers: axum::http::HeaderMap,
        Path(session_id): Path<String>,
    ) -> Result<Response, AppError> {
        let auth = Self::authenticate(&headers, &resources)?;

        let session = resources
            .chat_history
            .get_session(&session_id, &auth.user_id.to_string())
            .await?
            .ok_or_else(|| AppError::not_found("Session"))?;

        Ok((StatusCode::OK, Json(SessionResponse::from(session))).into_response())
    }

    /// Rename a session
    async fn update_session(
        State(resources): State<Arc<ServerResources>>,
        headers: axum::http::HeaderMap,
        Path(session_id): Path<String>,
        Json(request): Json<UpdateSessionRequest>,
    ) -> Result<Response, AppError> {
        let auth = Self::authenticate(&headers, &resources)?;

        let title = request.title.trim();
        if title.is_empty() {
            return Err(AppError::invalid_input("Session title must not be empty"));
        }

        let updated = resources
            .chat_history
            .rename_session(&session_id, &auth.user_id.to_string(), title)
            .await?;

        if !updated {
            return Err(AppError::not_found("Session"));
        }

        Ok((StatusCode::OK, Json(serde_json::json!({"success": true}))).into_response())
    }

    /// Delete a session
    async fn delete_session(
        State(resources): State<Arc<ServerResources>>,
        headers: axum::http::HeaderMap,
        Path(session_id): Path<String>,
    ) -> Result<Response, AppError> {
        let auth = Self::authenticate(&headers, &resources)?;

        let deleted = resources
            .chat_history
            .delete_session(&session_id, &auth.user_id.to_string())
            .await?;

        if !deleted {
            return Err(AppError::not_found("Session"));
        }

        Ok((StatusCode::NO_CONTENT, ()).into_response())
    }

    // ========================================================================
    // Streaming Handler
    // ========================================================================

    /// Send a message and stream the assistant reply via SSE
    async fn send_message_stream(
        State(resources): State<Arc<ServerResources>>,
        headers: axum::http::HeaderMap,
        Path(session_id): Path<String>,
        Json(request): Json<SendMessageRequest>,
    ) -> Result<Response, AppError> {
        let auth = Self::authenticate(&headers, &resources)?;
        let user_id = auth.user_id.to_string();

        if request.content.trim().is_empty() {
            return Err(AppError::invalid_input("Message content must not be empty"));
        }

        // Verify the caller owns this session before touching it.
        resources
            .chat_history
            .get_session(&session_id, &user_id)
            .await?
            .ok_or_else(|| AppError::not_found("Session"))?;

        let user_msg = resources
            .chat_history
            .append_message(&session_id, MessageRole::User, &request.content)
            .await?;

        let mut reply = resources
            .chat_history
            .stream_reply(&session_id, &user_id, &request.content)
            .await?;

        let chat_history = resources.chat_history.clone();
        let stream = async_stream::stream! {
            let mut full_content = String::new();

            // Echo the persisted user message first so the client can render
            // it with its backend-assigned id and timestamp.
            let user_event = serde_json::json!({
                "type": "user_message",
                "message": {
                    "id": user_msg.id,
                    "role": "user",
                    "content": user_msg.content,
                    "created_at": user_msg.created_at
                }
            });
            match sse::encode(&user_event) {
                Ok(frame) => yield Ok::<_, Infallible>(frame),
                Err(e) => {
                    yield Ok(error_frame(&e));
                    return;
                }
            }

            // Relay assistant chunks.
            while let Some(chunk_result) = reply.next().await {
                match chunk_result {
                    Ok(chunk) => {
                        full_content.push_str(&chunk.delta);

                        let chunk_event = serde_json::json!({
                            "type": "chunk",
                            "delta": chunk.delta,
                            "is_final": chunk.is_final
                        });
                        match sse::encode(&chunk_event) {
                            Ok(frame) => yield Ok(frame),
                            Err(e) => {
                                yield Ok(error_frame(&e));
                                return;
                            }
                        }
                    }
                    Err(e) => {
                        yield Ok(error_frame(&e));
                        return;
                    }
                }
            }

            // Persist the complete assistant reply.
            match chat_history
                .append_message(&session_id, MessageRole::Assistant, &full_content)
                .await
            {
                Ok(assistant_msg) => {
                    let done_event = serde_json::json!({
                        "type": "done",
                        "message": {
                            "id": assistant_msg.id,
                            "role": "assistant",
                            "content": full_content,
                            "created_at": assistant_msg.created_at
                        }
                    });
                    match sse::encode(&done_event) {
                        Ok(frame) => yield Ok(frame),
                        Err(e) => yield Ok(error_frame(&e)),
                    }
                }
                Err(e) => yield Ok(error_frame(&e)),
            }
        };

        Response::builder()
            .status(StatusCode::OK)
            .header(header::CONTENT_TYPE, sse::MEDIA_TYPE)
            .header(header::CACHE_CONTROL, "no-cache")
            .body(Body::from_stream(stream))
            .map_err(|e| AppError::internal(format!("Failed to build SSE response: {e}")))
    }
}

/// Encode a terminal error event, falling back to a static frame when even
/// the error payload cannot be serialized.
fn error_frame(error: &AppError) -> String {
    let event = serde_json::json!({
        "type": "error",
        "message": error.to_string()
    });
    sse::encode(&event)
        .unwrap_or_else(|_| "data: {\"type\":\"error\",\"message\":\"stream failed\"}\n\n".to_owned())
}
