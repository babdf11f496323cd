//! Image Vault backend service

#![deny(
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    missing_docs,
    dead_code
)]

/// Bearer-token authentication
pub mod auth;

/// Blob storage gateway adapter
pub mod blob_storage;

/// Handler modules
pub mod handlers;

/// Ownership guard
pub mod ownership;

/// Server assembly and serve loop
pub mod server;

/// Application state
pub mod state;

/// Environment configuration and error handling
pub mod types;
