// ABOUTME: Test helper module organization
// ABOUTME: Re-exports HTTP testing utilities shared by integration tests

pub mod axum_test;
