//! Bearer-token authentication middleware
//!
//! Authentication is established ahead of the resource handlers: the
//! middleware resolves the `Bearer` token to an [`AuthenticatedUser`] stored
//! in request extensions, and handlers pull it out through an extractor.

mod token;

use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header::AUTHORIZATION, request::Parts, StatusCode},
    middleware::Next,
    response::Response,
};

pub use token::{AuthError, TokenVerifier};

use crate::state::AppState;
use crate::types::AppError;

/// The acting identity behind a request
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    /// Identifier of the authenticated identity
    pub user_id: String,
}

/// Axum extractor for the authenticated user
///
/// Use this in handlers behind [`auth_middleware`]:
/// ```ignore
/// async fn protected_handler(
///     user: AuthenticatedUser,
///     // ... other extractors
/// ) -> Result<impl IntoResponse, AppError> {
///     // Access user.user_id
///     Ok("Protected content")
/// }
/// ```
impl<S> FromRequestParts<S> for AuthenticatedUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts.extensions.get::<Self>().cloned().ok_or_else(|| {
            AppError::new(
                StatusCode::UNAUTHORIZED,
                "missing_auth",
                "Authentication required but user not found in request extensions",
                false,
            )
        })
    }
}

/// Bearer-token authentication middleware
///
/// This middleware:
/// 1. Extracts the Bearer token from the Authorization header
/// 2. Verifies it with the injected [`TokenVerifier`]
/// 3. Adds [`AuthenticatedUser`] to request extensions
/// 4. Returns 401 for invalid/missing tokens
///
/// In development, the `DISABLE_AUTH` environment variable makes the raw
/// token the user id.
///
/// # Errors
///
/// - `AppError` - Invalid/missing token with 401 status code
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    // Extract Authorization header
    let stripped_auth_header = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|header| header.to_str().ok())
        .and_then(|header| header.strip_prefix("Bearer "));

    // If auth is disabled, we skip token verification and use the token as
    // the user id
    if state.environment.disable_auth() {
        if let Some(token) = stripped_auth_header {
            let authenticated_user = AuthenticatedUser {
                user_id: token.to_string(),
            };
            request.extensions_mut().insert(authenticated_user);
        }

        return Ok(next.run(request).await);
    }

    let token = stripped_auth_header.ok_or_else(|| {
        AppError::new(
            StatusCode::UNAUTHORIZED,
            "missing_token",
            "Authorization header must contain a valid Bearer token",
            false,
        )
    })?;

    let user_id = state.token_verifier.verify(token)?;

    // Add authenticated user to request extensions
    request
        .extensions_mut()
        .insert(AuthenticatedUser { user_id });

    Ok(next.run(request).await)
}
