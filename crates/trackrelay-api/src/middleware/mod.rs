//! HTTP middleware for authentication and request processing.

pub mod auth;
