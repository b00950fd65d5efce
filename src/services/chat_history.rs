// ABOUTME: Chat history collaborator for session and message persistence
// ABOUTME: Trait seam plus a reqwest client against the hosted database REST interface
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Juris Labs

//! Chat history service.
//!
//! Session and message persistence is owned by the hosted backend; this
//! module only describes the call contract and implements a thin REST
//! client for it. The assistant reply itself is produced upstream and
//! relayed as a stream of [`ReplyChunk`] values.

use crate::config::environment::BackendConfig;
use crate::errors::{AppError, AppResult};
use async_trait::async_trait;
use futures_util::{Stream, StreamExt};
use serde::{Deserialize, Serialize};
use std::mem;
use std::pin::Pin;
use std::time::Duration;

/// Name used in external-service error messages
const SERVICE: &str = "chat history";

/// Role of a stored chat message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    User,
    Assistant,
}

impl MessageRole {
    /// Wire representation of the role
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Assistant => "assistant",
        }
    }
}

/// A persisted chat session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatSession {
    /// Session ID
    pub id: String,
    /// Owning user ID
    pub user_id: String,
    /// Session title
    pub title: String,
    /// Creation timestamp (RFC 3339, backend-assigned)
    pub created_at: String,
    /// Last update timestamp
    pub updated_at: String,
    /// Messages in the session, oldest first
    #[serde(default)]
    pub messages: Vec<StoredMessage>,
}

/// Summary of a session for listing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatSessionSummary {
    /// Session ID
    pub id: String,
    /// Session title
    pub title: String,
    /// Number of messages in the session
    #[serde(default)]
    pub message_count: i64,
    /// Creation timestamp
    pub created_at: String,
    /// Last update timestamp
    pub updated_at: String,
}

/// A persisted chat message
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredMessage {
    /// Message ID
    pub id: String,
    /// Role (user/assistant)
    pub role: String,
    /// Message content
    pub content: String,
    /// Creation timestamp
    pub created_at: String,
}

/// One increment of a streamed assistant reply
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReplyChunk {
    /// Text delta for this chunk
    pub delta: String,
    /// Whether this is the final chunk
    #[serde(default)]
    pub is_final: bool,
    /// Finish reason when the reply is complete
    #[serde(default)]
    pub finish_reason: Option<String>,
}

/// Stream of assistant reply chunks
pub type ReplyStream = Pin<Box<dyn Stream<Item = AppResult<ReplyChunk>> + Send>>;

/// Call contract for the chat history collaborator
#[async_trait]
pub trait ChatHistoryService: Send + Sync {
    /// Create a new session owned by `user_id`
    async fn create_session(&self, user_id: &str, title: &str) -> AppResult<ChatSession>;

    /// List the caller's sessions, most recently updated first
    async fn list_sessions(
        &self,
        user_id: &str,
        limit: i64,
        offset: i64,
    ) -> AppResult<Vec<ChatSessionSummary>>;

    /// Fetch one session with its messages; `None` when the session does not
    /// exist or belongs to another user
    async fn get_session(&self, session_id: &str, user_id: &str)
        -> AppResult<Option<ChatSession>>;

    /// Rename a session; `false` when no matching session was updated
    async fn rename_session(&self, session_id: &str, user_id: &str, title: &str)
        -> AppResult<bool>;

    /// Delete a session; `false` when no matching session was deleted
    async fn delete_session(&self, session_id: &str, user_id: &str) -> AppResult<bool>;

    /// Append a message to a session
    async fn append_message(
        &self,
        session_id: &str,
        role: MessageRole,
        content: &str,
    ) -> AppResult<StoredMessage>;

    /// Send a user message upstream and stream back the assistant reply
    async fn stream_reply(
        &self,
        session_id: &str,
        user_id: &str,
        content: &str,
    ) -> AppResult<ReplyStream>;
}

// ============================================================================
// Hosted backend client
// ============================================================================

#[derive(Debug, Serialize)]
struct CreateSessionBody<'a> {
    user_id: &'a str,
    title: &'a str,
}

#[derive(Debug, Serialize)]
struct RenameSessionBody<'a> {
    title: &'a str,
}

#[derive(Debug, Serialize)]
struct AppendMessageBody<'a> {
    session_id: &'a str,
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct StreamReplyBody<'a> {
    session_id: &'a str,
    user_id: &'a str,
    content: &'a str,
}

/// Chat history client for the hosted database REST interface
pub struct HostedChatHistoryClient {
    config: BackendConfig,
    http_client: reqwest::Client,
}

impl HostedChatHistoryClient {
    /// Create a new client
    #[must_use]
    pub fn new(config: BackendConfig) -> Self {
        Self {
            config,
            http_client: reqwest::Client::new(),
        }
    }

    fn table_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{table}", self.config.base_url)
    }

    fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.config.request_timeout_secs)
    }

    /// Attach the backend credentials to a request
    fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        request
            .header("apikey", &self.config.api_key)
            .bearer_auth(&self.config.api_key)
    }

    async fn check_status(response: reqwest::Response) -> AppResult<reqwest::Response> {
        if response.status().is_success() {
            Ok(response)
        } else {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            Err(AppError::external_service(
                SERVICE,
                format!("HTTP {status}: {body}"),
            ))
        }
    }
}

#[async_trait]
impl ChatHistoryService for HostedChatHistoryClient {
    async fn create_session(&self, user_id: &str, title: &str) -> AppResult<ChatSession> {
        let response = self
            .authorize(self.http_client.post(self.table_url("chat_sessions")))
            .header("Prefer", "return=representation")
            .timeout(self.request_timeout())
            .json(&CreateSessionBody { user_id, title })
            .send()
            .await
            .map_err(|e| AppError::external_service(SERVICE, e.to_string()))?;

        let mut rows: Vec<ChatSession> = Self::check_status(response)
            .await?
            .json()
            .await
            .map_err(|e| AppError::external_service(SERVICE, format!("JSON parse error: {e}")))?;

        rows.pop()
            .ok_or_else(|| AppError::external_service(SERVICE, "create returned no row"))
    }

    async fn list_sessions(
        &self,
        user_id: &str,
        limit: i64,
        offset: i64,
    ) -> AppResult<Vec<ChatSessionSummary>> {
        let response = self
            .authorize(self.http_client.get(self.table_url("chat_sessions")))
            .timeout(self.request_timeout())
            .query(&[
                ("user_id", format!("eq.{user_id}")),
                ("order", "updated_at.desc".to_owned()),
                ("limit", limit.to_string()),
                ("offset", offset.to_string()),
                (
                    "select",
                    "id,title,message_count,created_at,updated_at".to_owned(),
                ),
            ])
            .send()
            .await
            .map_err(|e| AppError::external_service(SERVICE, e.to_string()))?;

        Self::check_status(response)
            .await?
            .json()
            .await
            .map_err(|e| AppError::external_service(SERVICE, format!("JSON parse error: {e}")))
    }

    async fn get_session(
        &self,
        session_id: &str,
        user_id: &str,
    ) -> AppResult<Option<ChatSession>> {
        let response = self
            .authorize(self.http_client.get(self.table_url("chat_sessions")))
            .timeout(self.request_timeout())
            .query(&[
                ("id", format!("eq.{session_id}")),
                ("user_id", format!("eq.{user_id}")),
                ("select", "*,messages:chat_messages(*)".to_owned()),
            ])
            .send()
            .await
            .map_err(|e| AppError::external_service(SERVICE, e.to_string()))?;

        let mut rows: Vec<ChatSession> = Self::check_status(response)
            .await?
            .json()
            .await
            .map_err(|e| AppError::external_service(SERVICE, format!("JSON parse error: {e}")))?;

        Ok(rows.pop())
    }

    async fn rename_session(
        &self,
        session_id: &str,
        user_id: &str,
        title: &str,
    ) -> AppResult<bool> {
        let response = self
            .authorize(self.http_client.patch(self.table_url("chat_sessions")))
            .header("Prefer", "return=representation")
            .timeout(self.request_timeout())
            .query(&[
                ("id", format!("eq.{session_id}")),
                ("user_id", format!("eq.{user_id}")),
            ])
            .json(&RenameSessionBody { title })
            .send()
            .await
            .map_err(|e| AppError::external_service(SERVICE, e.to_string()))?;

        let rows: Vec<serde_json::Value> = Self::check_status(response)
            .await?
            .json()
            .await
            .map_err(|e| AppError::external_service(SERVICE, format!("JSON parse error: {e}")))?;

        Ok(!rows.is_empty())
    }

    async fn delete_session(&self, session_id: &str, user_id: &str) -> AppResult<bool> {
        let response = self
            .authorize(self.http_client.delete(self.table_url("chat_sessions")))
            .header("Prefer", "return=representation")
            .timeout(self.request_timeout())
            .query(&[
                ("id", format!("eq.{session_id}")),
                ("user_id", format!("eq.{user_id}")),
            ])
            .send()
            .await
            .map_err(|e| AppError::external_service(SERVICE, e.to_string()))?;

        let rows: Vec<serde_json::Value> = Self::check_status(response)
            .await?
            .json()
            .await
            .map_err(|e| AppError::external_service(SERVICE, format!("JSON parse error: {e}")))?;

        Ok(!rows.is_empty())
    }

    async fn append_message(
        &self,
        session_id: &str,
        role: MessageRole,
        content: &str,
    ) -> AppResult<StoredMessage> {
        let response = self
            .authorize(self.http_client.post(self.table_url("chat_messages")))
            .header("Prefer", "return=representation")
            .timeout(self.request_timeout())
            .json(&AppendMessageBody {
                session_id,
                role: role.as_str(),
                content,
            })
            .send()
            .await
            .map_err(|e| AppError::external_service(SERVICE, e.to_string()))?;

        let mut rows: Vec<StoredMessage> = Self::check_status(response)
            .await?
            .json()
            .await
            .map_err(|e| AppError::external_service(SERVICE, format!("JSON parse error: {e}")))?;

        rows.pop()
            .ok_or_else(|| AppError::external_service(SERVICE, "append returned no row"))
    }

    async fn stream_reply(
        &self,
        session_id: &str,
        user_id: &str,
        content: &str,
    ) -> AppResult<ReplyStream> {
        let url = format!("{}/functions/v1/chat-stream", self.config.base_url);

        // No request timeout here: the reply stream is long-lived by design.
        let response = self
            .authorize(self.http_client.post(&url))
            .json(&StreamReplyBody {
                session_id,
                user_id,
                content,
            })
            .send()
            .await
            .map_err(|e| AppError::external_service(SERVICE, e.to_string()))?;

        let response = Self::check_status(response).await?;

        let mut bytes = response.bytes_stream();
        let stream = async_stream::stream! {
            let mut parser = SseLineBuffer::new();
            while let Some(chunk) = bytes.next().await {
                let chunk = match chunk {
                    Ok(chunk) => chunk,
                    Err(e) => {
                        yield Err(AppError::external_service(SERVICE, e.to_string()));
                        return;
                    }
                };
                for event in parser.feed(&chunk) {
                    match event {
                        UpstreamEvent::Data(json) => {
                            match serde_json::from_str::<ReplyChunk>(&json) {
                                Ok(chunk) => yield Ok(chunk),
                                Err(e) => {
                                    yield Err(AppError::external_service(
                                        SERVICE,
                                        format!("malformed reply chunk: {e}"),
                                    ));
                                    return;
                                }
                            }
                        }
                        UpstreamEvent::Done => return,
                    }
                }
            }
            // The upstream may end without terminating the final line.
            if let Some(UpstreamEvent::Data(json)) = parser.flush() {
                match serde_json::from_str::<ReplyChunk>(&json) {
                    Ok(chunk) => yield Ok(chunk),
                    Err(e) => {
                        yield Err(AppError::external_service(
                            SERVICE,
                            format!("malformed reply chunk: {e}"),
                        ));
                    }
                }
            }
        };

        Ok(Box::pin(stream))
    }
}

// ============================================================================
// Upstream SSE parsing
// ============================================================================

/// A parsed event from the upstream reply stream
#[derive(Debug, Clone, PartialEq, Eq)]
enum UpstreamEvent {
    /// A `data:` payload with the JSON string (prefix stripped)
    Data(String),
    /// The `data: [DONE]` termination signal
    Done,
}

/// Line-buffering SSE parser for the upstream reply stream.
///
/// TCP does not align network chunks with SSE event boundaries: one chunk
/// may carry several events, and one event may be split across chunks. The
/// buffer accumulates bytes and emits events only when a full line is
/// available.
#[derive(Debug, Default)]
struct SseLineBuffer {
    buffer: String,
}

impl SseLineBuffer {
    fn new() -> Self {
        Self::default()
    }

    /// Feed raw bytes, returning any complete events
    fn feed(&mut self, bytes: &[u8]) -> Vec<UpstreamEvent> {
        self.buffer.push_str(&String::from_utf8_lossy(bytes));

        let mut events = Vec::new();
        while let Some(newline_pos) = self.buffer.find('\n') {
            let line = self.buffer[..newline_pos].trim_end_matches('\r').to_owned();
            self.buffer = self.buffer[newline_pos + 1..].to_owned();

            if let Some(event) = Self::parse_line(&line) {
                events.push(event);
            }
        }
        events
    }

    /// Flush a trailing partial line when the byte stream ends
    fn flush(&mut self) -> Option<UpstreamEvent> {
        let remaining = mem::take(&mut self.buffer);
        Self::parse_line(&remaining)
    }

    fn parse_line(line: &str) -> Option<UpstreamEvent> {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            return None;
        }
        if trimmed == "data: [DONE]" {
            return Some(UpstreamEvent::Done);
        }
        // Non-data fields (event:, id:, retry:, comments) are ignored.
        trimmed
            .strip_prefix("data: ")
            .filter(|data| !data.trim().is_empty())
            .map(|data| UpstreamEvent::Data(data.to_owned()))
    }
}
