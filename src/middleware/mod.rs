//! Middleware module
//!
//! Contains the origin guard and the relay key check.

pub mod auth;
pub mod origin;
