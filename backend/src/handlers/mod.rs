use axum::{routing::get, Router};

use crate::state::AppState;

/// Health check endpoint
pub mod health;
mod images;

/// Upload cap for a single file part (15 MiB)
pub const MAX_FILE_BYTES: usize = 15 * 1024 * 1024;

/// Creates the router with the image resource routes
///
/// Every route here requires an authenticated user; the auth middleware is
/// layered on by the server so tests can wire their own state first.
#[must_use]
pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/v1/images",
            get(images::list_images).post(images::create_image),
        )
        .route(
            "/v1/images/{id}",
            get(images::get_image)
                .patch(images::update_image)
                .delete(images::delete_image),
        )
}
