use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::{middleware::Next, response::Response};
use std::sync::Arc;
use tracing::debug;

use crate::common::UserId;
use crate::domains::auth::{AuthError, JwtService};

/// Authenticated user information from JWT
#[derive(Clone, Debug)]
pub struct AuthUser {
    pub user_id: UserId,
}

/// Marker left in the request extensions when a token was supplied but
/// failed verification, so the extractor can tell "no token" apart from
/// "bad token".
#[derive(Clone, Copy, Debug)]
struct InvalidAuthToken;

/// JWT authentication middleware
///
/// Extracts JWT token from Authorization header, verifies it, and adds AuthUser
/// to request extensions. The request always continues; protected handlers
/// reject via the `AuthUser` extractor.
pub async fn jwt_auth_middleware(
    jwt_service: Arc<JwtService>,
    mut request: axum::http::Request<axum::body::Body>,
    next: Next,
) -> Response {
    match extract_auth_user(&request, &jwt_service) {
        Ok(Some(user)) => {
            debug!("Authenticated user: {}", user.user_id);
            request.extensions_mut().insert(user);
        }
        Ok(None) => {
            debug!("No authentication token");
        }
        Err(_) => {
            debug!("Invalid authentication token");
            request.extensions_mut().insert(InvalidAuthToken);
        }
    }

    next.run(request).await
}

/// Extract and verify JWT token from request.
///
/// `Ok(None)` means no token was supplied; `Err` means a token was supplied
/// but did not verify.
fn extract_auth_user(
    request: &axum::http::Request<axum::body::Body>,
    jwt_service: &JwtService,
) -> Result<Option<AuthUser>, AuthError> {
    // Get Authorization header
    let Some(auth_header) = request.headers().get("authorization") else {
        return Ok(None);
    };
    let auth_str = auth_header.to_str().map_err(|_| AuthError::InvalidToken)?;

    // Extract token (handle both "Bearer <token>" and raw token)
    let token = auth_str.strip_prefix("Bearer ").unwrap_or(auth_str);

    // Verify token
    let claims = jwt_service
        .verify_token(token)
        .map_err(|_| AuthError::InvalidToken)?;

    Ok(Some(AuthUser {
        user_id: UserId::from_uuid(claims.user_id),
    }))
}

/// Extractor for handlers that require authentication: rejects with 401
/// before the handler body runs.
#[axum::async_trait]
impl<S: Send + Sync> FromRequestParts<S> for AuthUser {
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        if let Some(user) = parts.extensions.get::<AuthUser>() {
            return Ok(user.clone());
        }
        if parts.extensions.get::<InvalidAuthToken>().is_some() {
            return Err(AuthError::InvalidToken);
        }
        Err(AuthError::AuthenticationRequired)
    }
}
