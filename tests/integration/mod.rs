//! Integration tests for the relay
//!
//! These tests drive the real router through axum-test with a wiremock
//! upstream standing in for the completion API.

mod chat;
mod health;
