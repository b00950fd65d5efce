// ABOUTME: Shared test fixtures for integration tests
// ABOUTME: In-memory collaborator mocks and server resource builders

#![allow(dead_code)]
#![allow(missing_docs)]
#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(clippy::cast_possible_wrap)]

use async_trait::async_trait;
use juris_server::auth::AuthManager;
use juris_server::config::environment::{
    AuthConfig, BackendConfig, EmailConfig, ServerConfig,
};
use juris_server::errors::{AppError, AppResult};
use juris_server::middleware::AuthMiddleware;
use juris_server::server::ServerResources;
use juris_server::services::chat_history::{
    ChatHistoryService, ChatSession, ChatSessionSummary, MessageRole, ReplyChunk, ReplyStream,
    StoredMessage,
};
use juris_server::services::maintenance::{MaintenanceRecord, MaintenanceStore};
use juris_server::services::support_email::{EmailDelivery, SupportEmailRequest, SupportMailer};
use std::sync::{Arc, Mutex};
use uuid::Uuid;

pub const TEST_JWT_SECRET: &[u8] = b"integration-test-secret-32-bytes!!";

/// Build a server configuration for tests. No external service is contacted;
/// the URLs are placeholders for mocked collaborators.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        http_port: 0,
        cors_origins: vec!["*".to_owned()],
        auth: AuthConfig {
            jwt_secret: String::from_utf8_lossy(TEST_JWT_SECRET).into_owned(),
            token_expiry_hours: 24,
        },
        backend: BackendConfig {
            base_url: "http://backend.invalid".to_owned(),
            api_key: "test-backend-key".to_owned(),
            request_timeout_secs: 5,
        },
        email: EmailConfig {
            base_url: "http://email.invalid".to_owned(),
            api_key: "test-email-key".to_owned(),
            from_address: "support@juris.example".to_owned(),
            support_recipient: "helpdesk@juris.example".to_owned(),
        },
    }
}

/// Assemble server resources around the given collaborator mocks
pub fn test_resources(
    chat_history: Arc<dyn ChatHistoryService>,
    maintenance: Arc<dyn MaintenanceStore>,
    support_mailer: Arc<dyn SupportMailer>,
) -> Arc<ServerResources> {
    let config = test_config();
    let auth_manager = Arc::new(AuthManager::new(
        config.auth.jwt_secret.as_bytes(),
        config.auth.token_expiry_hours,
    ));
    Arc::new(ServerResources::new(
        Arc::new(config),
        Arc::new(AuthMiddleware::new(auth_manager)),
        chat_history,
        maintenance,
        support_mailer,
    ))
}

/// Mint a Bearer header value for the given user
pub fn bearer_for(resources: &ServerResources, user_id: Uuid) -> String {
    let token = resources
        .auth_middleware
        .auth_manager()
        .generate_token(user_id, "tester@example.com")
        .expect("token generation");
    format!("Bearer {token}")
}

// ============================================================================
// Chat history mock
// ============================================================================

/// In-memory chat history with scripted reply streams
#[derive(Default)]
pub struct MockChatHistory {
    sessions: Mutex<Vec<ChatSession>>,
    /// Chunks returned by `stream_reply`
    pub reply_chunks: Vec<ReplyChunk>,
    /// When set, `stream_reply` yields this error after the scripted chunks
    pub stream_error: Option<String>,
}

impl MockChatHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_reply(chunks: Vec<ReplyChunk>) -> Self {
        Self {
            reply_chunks: chunks,
            ..Self::default()
        }
    }

    fn now() -> String {
        chrono::Utc::now().to_rfc3339()
    }
}

#[async_trait]
impl ChatHistoryService for MockChatHistory {
    async fn create_session(&self, user_id: &str, title: &str) -> AppResult<ChatSession> {
        let now = Self::now();
        let session = ChatSession {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.to_owned(),
            title: title.to_owned(),
            created_at: now.clone(),
            updated_at: now,
            messages: Vec::new(),
        };
        self.sessions.lock().unwrap().push(session.clone());
        Ok(session)
    }

    async fn list_sessions(
        &self,
        user_id: &str,
        limit: i64,
        offset: i64,
    ) -> AppResult<Vec<ChatSessionSummary>> {
        let sessions = self.sessions.lock().unwrap();
        Ok(sessions
            .iter()
            .filter(|s| s.user_id == user_id)
            .skip(usize::try_from(offset).unwrap_or(0))
            .take(usize::try_from(limit).unwrap_or(usize::MAX))
            .map(|s| ChatSessionSummary {
                id: s.id.clone(),
                title: s.title.clone(),
                message_count: s.messages.len() as i64,
                created_at: s.created_at.clone(),
                updated_at: s.updated_at.clone(),
            })
            .collect())
    }

    async fn get_session(
        &self,
        session_id: &str,
        user_id: &str,
    ) -> AppResult<Option<ChatSession>> {
        let sessions = self.sessions.lock().unwrap();
        Ok(sessions
            .iter()
            .find(|s| s.id == session_id && s.user_id == user_id)
            .cloned())
    }

    async fn rename_session(
        &self,
        session_id: &str,
        user_id: &str,
        title: &str,
    ) -> AppResult<bool> {
        let mut sessions = self.sessions.lock().unwrap();
        match sessions
            .iter_mut()
            .find(|s| s.id == session_id && s.user_id == user_id)
        {
            Some(session) => {
                session.title = title.to_owned();
                session.updated_at = Self::now();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete_session(&self, session_id: &str, user_id: &str) -> AppResult<bool> {
        let mut sessions = self.sessions.lock().unwrap();
        let before = sessions.len();
        sessions.retain(|s| !(s.id == session_id && s.user_id == user_id));
        Ok(sessions.len() < before)
    }

    async fn append_message(
        &self,
        session_id: &str,
        role: MessageRole,
        content: &str,
    ) -> AppResult<StoredMessage> {
        let message = StoredMessage {
            id: Uuid::new_v4().to_string(),
            role: role.as_str().to_owned(),
            content: content.to_owned(),
            created_at: Self::now(),
        };
        let mut sessions = self.sessions.lock().unwrap();
        let session = sessions
            .iter_mut()
            .find(|s| s.id == session_id)
            .ok_or_else(|| AppError::not_found("Session"))?;
        session.messages.push(message.clone());
        Ok(message)
    }

    async fn stream_reply(
        &self,
        _session_id: &str,
        _user_id: &str,
        _content: &str,
    ) -> AppResult<ReplyStream> {
        let chunks = self.reply_chunks.clone();
        let error = self.stream_error.clone();
        let stream = async_stream::stream! {
            for chunk in chunks {
                yield Ok(chunk);
            }
            if let Some(message) = error {
                yield Err(AppError::external_service("chat history", message));
            }
        };
        Ok(Box::pin(stream))
    }
}

// ============================================================================
// Maintenance mock
// ============================================================================

/// Maintenance store returning a fixed record, or an error when `None`
pub struct MockMaintenanceStore {
    pub record: Option<MaintenanceRecord>,
}

impl MockMaintenanceStore {
    pub fn active(message: &str) -> Self {
        Self {
            record: Some(MaintenanceRecord {
                is_active: true,
                message: message.to_owned(),
                allow_admin: true,
                start_time: None,
                end_time: None,
            }),
        }
    }

    pub fn inactive() -> Self {
        Self {
            record: Some(MaintenanceRecord {
                is_active: false,
                message: String::new(),
                allow_admin: true,
                start_time: None,
                end_time: None,
            }),
        }
    }

    pub fn failing() -> Self {
        Self { record: None }
    }
}

#[async_trait]
impl MaintenanceStore for MockMaintenanceStore {
    async fn fetch_status(&self) -> AppResult<MaintenanceRecord> {
        self.record
            .clone()
            .ok_or_else(|| AppError::external_service("maintenance store", "connection refused"))
    }
}

// ============================================================================
// Support mailer mock
// ============================================================================

/// Support mailer returning a scripted delivery result
pub struct MockSupportMailer {
    pub delivery: Result<EmailDelivery, String>,
    pub sent: Mutex<Vec<SupportEmailRequest>>,
}

impl MockSupportMailer {
    pub fn accepting() -> Self {
        Self {
            delivery: Ok(EmailDelivery {
                success: true,
                error: None,
            }),
            sent: Mutex::new(Vec::new()),
        }
    }

    pub fn declining(reason: &str) -> Self {
        Self {
            delivery: Ok(EmailDelivery {
                success: false,
                error: Some(reason.to_owned()),
            }),
            sent: Mutex::new(Vec::new()),
        }
    }

    pub fn unreachable() -> Self {
        Self {
            delivery: Err("connection refused".to_owned()),
            sent: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl SupportMailer for MockSupportMailer {
    async fn send(&self, request: &SupportEmailRequest) -> AppResult<EmailDelivery> {
        self.sent.lock().unwrap().push(request.clone());
        match &self.delivery {
            Ok(delivery) => Ok(delivery.clone()),
            Err(message) => Err(AppError::external_service("support email", message.clone())),
        }
    }
}
