//! Integration tests with mock HTTP server

pub mod auth;
pub mod mock_server;
pub mod parameters;
pub mod retry;
