// ABOUTME: Integration tests for the chat route handlers
// ABOUTME: Tests session CRUD, validation, and authentication flows

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;
mod helpers;

use common::{bearer_for, test_resources, MockChatHistory, MockMaintenanceStore, MockSupportMailer};
use helpers::axum_test::AxumTestRequest;
use juris_server::routes::chat::{ChatRoutes, SessionListResponse, SessionResponse};

use axum::http::StatusCode;
use serde_json::json;
use std::sync::Arc;
use uuid::Uuid;

// ============================================================================
// Test Helpers
// ============================================================================

fn setup_test_environment() -> (axum::Router, String) {
    let resources = test_resources(
        Arc::new(MockChatHistory::new()),
        Arc::new(MockMaintenanceStore::inactive()),
        Arc::new(MockSupportMailer::accepting()),
    );
    let auth = bearer_for(&resources, Uuid::new_v4());
    (ChatRoutes::routes(resources), auth)
}

// ============================================================================
// Session CRUD Tests
// ============================================================================

#[tokio::test]
async fn test_create_session() {
    let (router, auth_token) = setup_test_environment();

    let response = AxumTestRequest::post("/api/chat/sessions")
        .header("authorization", &auth_token)
        .json(&json!({"title": "Lease dispute"}))
        .send(router)
        .await;

    assert_eq!(response.status_code(), StatusCode::CREATED);

    let session: SessionResponse = response.json();
    assert_eq!(session.title, "Lease dispute");
    assert!(session.messages.is_empty());
    assert!(!session.id.is_empty());
}

#[tokio::test]
async fn test_create_session_blank_title_rejected() {
    let (router, auth_token) = setup_test_environment();

    let response = AxumTestRequest::post("/api/chat/sessions")
        .header("authorization", &auth_token)
        .json(&json!({"title": "   "}))
        .send(router)
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_create_session_requires_auth() {
    let (router, _auth_token) = setup_test_environment();

    let response = AxumTestRequest::post("/api/chat/sessions")
        .json(&json!({"title": "No auth"}))
        .send(router)
        .await;

    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_list_sessions() {
    let (router, auth_token) = setup_test_environment();

    let create_response = AxumTestRequest::post("/api/chat/sessions")
        .header("authorization", &auth_token)
        .json(&json!({"title": "First session"}))
        .send(router.clone())
        .await;
    assert_eq!(create_response.status_code(), StatusCode::CREATED);

    let list_response = AxumTestRequest::get("/api/chat/sessions")
        .header("authorization", &auth_token)
        .send(router)
        .await;

    assert_eq!(list_response.status_code(), StatusCode::OK);

    let list: SessionListResponse = list_response.json();
    assert_eq!(list.total, 1);
    assert_eq!(list.sessions.len(), 1);
    assert_eq!(list.sessions[0].title, "First session");
}

#[tokio::test]
async fn test_list_sessions_excludes_other_users() {
    let resources = test_resources(
        Arc::new(MockChatHistory::new()),
        Arc::new(MockMaintenanceStore::inactive()),
        Arc::new(MockSupportMailer::accepting()),
    );
    let alice = bearer_for(&resources, Uuid::new_v4());
    let bob = bearer_for(&resources, Uuid::new_v4());
    let router = ChatRoutes::routes(resources);

    AxumTestRequest::post("/api/chat/sessions")
        .header("authorization", &alice)
        .json(&json!({"title": "Alice's session"}))
        .send(router.clone())
        .await;

    let list_response = AxumTestRequest::get("/api/chat/sessions")
        .header("authorization", &bob)
        .send(router)
        .await;

    let list: SessionListResponse = list_response.json();
    assert_eq!(list.total, 0);
}

#[tokio::test]
async fn test_get_session() {
    let (router, auth_token) = setup_test_environment();

    let created: SessionResponse = AxumTestRequest::post("/api/chat/sessions")
        .header("authorization", &auth_token)
        .json(&json!({"title": "Get test"}))
        .send(router.clone())
        .await
        .json();

    let get_response = AxumTestRequest::get(&format!("/api/chat/sessions/{}", created.id))
        .header("authorization", &auth_token)
        .send(router)
        .await;

    assert_eq!(get_response.status_code(), StatusCode::OK);

    let session: SessionResponse = get_response.json();
    assert_eq!(session.id, created.id);
    assert_eq!(session.title, "Get test");
}

#[tokio::test]
async fn test_get_missing_session_returns_404() {
    let (router, auth_token) = setup_test_environment();

    let response = AxumTestRequest::get("/api/chat/sessions/no-such-session")
        .header("authorization", &auth_token)
        .send(router)
        .await;

    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_rename_session() {
    let (router, auth_token) = setup_test_environment();

    let created: SessionResponse = AxumTestRequest::post("/api/chat/sessions")
        .header("authorization", &auth_token)
        .json(&json!({"title": "Old title"}))
        .send(router.clone())
        .await
        .json();

    let patch_response = AxumTestRequest::patch(&format!("/api/chat/sessions/{}", created.id))
        .header("authorization", &auth_token)
        .json(&json!({"title": "New title"}))
        .send(router.clone())
        .await;

    assert_eq!(patch_response.status_code(), StatusCode::OK);
    let body: serde_json::Value = patch_response.json();
    assert_eq!(body["success"], true);

    let session: SessionResponse = AxumTestRequest::get(&format!("/api/chat/sessions/{}", created.id))
        .header("authorization", &auth_token)
        .send(router)
        .await
        .json();
    assert_eq!(session.title, "New title");
}

#[tokio::test]
async fn test_rename_missing_session_returns_404() {
    let (router, auth_token) = setup_test_environment();

    let response = AxumTestRequest::patch("/api/chat/sessions/no-such-session")
        .header("authorization", &auth_token)
        .json(&json!({"title": "New title"}))
        .send(router)
        .await;

    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete_session() {
    let (router, auth_token) = setup_test_environment();

    let created: SessionResponse = AxumTestRequest::post("/api/chat/sessions")
        .header("authorization", &auth_token)
        .json(&json!({"title": "Doomed"}))
        .send(router.clone())
        .await
        .json();

    let delete_response = AxumTestRequest::delete(&format!("/api/chat/sessions/{}", created.id))
        .header("authorization", &auth_token)
        .send(router.clone())
        .await;

    assert_eq!(delete_response.status_code(), StatusCode::NO_CONTENT);

    let get_response = AxumTestRequest::get(&format!("/api/chat/sessions/{}", created.id))
        .header("authorization", &auth_token)
        .send(router)
        .await;
    assert_eq!(get_response.status_code(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete_other_users_session_returns_404() {
    let resources = test_resources(
        Arc::new(MockChatHistory::new()),
        Arc::new(MockMaintenanceStore::inactive()),
        Arc::new(MockSupportMailer::accepting()),
    );
    let owner = bearer_for(&resources, Uuid::new_v4());
    let intruder = bearer_for(&resources, Uuid::new_v4());
    let router = ChatRoutes::routes(resources);

    let created: SessionResponse = AxumTestRequest::post("/api/chat/sessions")
        .header("authorization", &owner)
        .json(&json!({"title": "Private"}))
        .send(router.clone())
        .await
        .json();

    let response = AxumTestRequest::delete(&format!("/api/chat/sessions/{}", created.id))
        .header("authorization", &intruder)
        .send(router)
        .await;

    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_invalid_token_rejected() {
    let (router, _auth_token) = setup_test_environment();

    let response = AxumTestRequest::get("/api/chat/sessions")
        .header("authorization", "Bearer not-a-real-token")
        .send(router)
        .await;

    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
}
