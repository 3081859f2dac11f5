//! Authentication middleware for protected routes.

use axum::{
    extract::{FromRequestParts, Request, State},
    http::{Method, header::AUTHORIZATION, request::Parts},
    middleware::Next,
    response::{IntoResponse, Response},
};
use tracing::debug;

use crate::{AppState, error::ApiError};
use dataguard_shared::{AppError, Claims, JwtError, TenantScope, WorkspaceRole};

/// Extracts the bearer token from the Authorization header.
fn extract_bearer_token(header: &str) -> Option<&str> {
    header
        .strip_prefix("Bearer ")
        .or_else(|| header.strip_prefix("bearer "))
}

fn is_read_only(method: &Method) -> bool {
    matches!(*method, Method::GET | Method::HEAD | Method::OPTIONS)
}

/// Authentication middleware that validates JWT tokens.
///
/// This middleware:
/// 1. Extracts the Bearer token from the Authorization header
/// 2. Validates the token using the JWT service
/// 3. Rejects unknown roles, and writes by viewers
/// 4. Stores the claims in request extensions for handlers to access
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let auth_header = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok());

    let Some(token) = auth_header.and_then(extract_bearer_token) else {
        return ApiError(AppError::Unauthorized(
            "Authorization header with Bearer token is required".to_string(),
        ))
        .into_response();
    };

    let claims = match state.jwt_service.validate_token(token) {
        Ok(claims) => claims,
        Err(JwtError::Expired) => {
            return ApiError(AppError::Unauthorized("Token has expired".to_string())).into_response();
        }
        Err(e) => {
            debug!(error = %e, "Rejected bearer token");
            return ApiError(AppError::Unauthorized("Invalid or malformed token".to_string()))
                .into_response();
        }
    };

    let Some(role) = claims.workspace_role() else {
        return ApiError(AppError::Forbidden(format!(
            "Unknown workspace role '{}'",
            claims.role
        )))
        .into_response();
    };
    if !role.can_write() && !is_read_only(request.method()) {
        return ApiError(AppError::Forbidden(
            "Viewers have read-only access to this workspace".to_string(),
        ))
        .into_response();
    }

    request.extensions_mut().insert(claims);
    next.run(request).await
}

/// Extractor for the authenticated caller.
///
/// ```ignore
/// async fn handler(auth: AuthUser) -> impl IntoResponse {
///     let scope = auth.scope();
///     // ...
/// }
/// ```
#[derive(Debug, Clone)]
pub struct AuthUser(pub Claims);

impl AuthUser {
    /// Returns the user ID from the claims.
    #[must_use]
    pub const fn user_id(&self) -> uuid::Uuid {
        self.0.user_id()
    }

    /// Tenant, workspace and user the request acts for.
    #[must_use]
    pub const fn scope(&self) -> TenantScope {
        self.0.scope()
    }

    /// Returns the caller's workspace role.
    #[must_use]
    pub fn role(&self) -> Option<WorkspaceRole> {
        self.0.workspace_role()
    }
}

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Claims>()
            .cloned()
            .map(AuthUser)
            .ok_or_else(|| ApiError(AppError::Unauthorized("Authentication required".to_string())))
    }
}
