use axum::{
    extract::{Request, State},
    http::{HeaderMap, StatusCode},
    middleware::Next,
    response::{IntoResponse, Json, Response},
};
use serde_json::json;
use std::sync::Arc;

use crate::auth::TokenValidator;
use crate::config::SecurityConfig;

use super::tenant::TenantContext;

/// Paths served without a token. `/` only matches exactly.
const PUBLIC_PREFIXES: &[&str] = &[
    "/swagger-ui",
    "/v3/api-docs",
    "/api-docs",
    "/actuator",
    "/health",
];

pub const MSG_TOKEN_MISSING: &str = "Authentication token not provided";
pub const MSG_TOKEN_INVALID: &str = "Token invalid or expired";
pub const MSG_AUTH_ERROR: &str = "Authentication error";

/// Everything the gate needs to authenticate a request
#[derive(Clone)]
pub struct AuthState {
    validator: Arc<TokenValidator>,
    header: String,
    prefix: String,
}

impl AuthState {
    pub fn new(validator: TokenValidator, header: impl Into<String>, prefix: impl Into<String>) -> Self {
        Self {
            validator: Arc::new(validator),
            header: header.into(),
            prefix: prefix.into(),
        }
    }

    pub fn from_config(security: &SecurityConfig) -> Self {
        Self::new(
            TokenValidator::from_config(security),
            security.jwt_header.clone(),
            security.jwt_prefix.clone(),
        )
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum BearerError {
    /// Header absent, empty, or not using the configured scheme
    Missing,
    /// Header present but not readable as text
    Unreadable,
}

/// Authenticates every protected request and exposes the tenant to handlers
/// through a request-owned [`TenantContext`].
pub async fn tenant_gate(State(auth): State<AuthState>, mut request: Request, next: Next) -> Response {
    let path = request.uri().path().to_owned();

    if is_public_path(&path) {
        tracing::debug!("Public endpoint accessed: {}", path);
        return next.run(request).await;
    }

    let context = TenantContext::new();
    // Cleared when this function returns, whichever branch it takes
    let _scope = context.scope();

    let token = match extract_token(request.headers(), &auth.header, &auth.prefix) {
        Ok(token) => token,
        Err(BearerError::Missing) => {
            tracing::warn!("Request without token for protected endpoint: {}", path);
            return unauthorized_response(MSG_TOKEN_MISSING);
        }
        Err(BearerError::Unreadable) => {
            tracing::error!("Unreadable {} header on {}", auth.header, path);
            return unauthorized_response(MSG_AUTH_ERROR);
        }
    };

    match auth.validator.extract_tenant_id(&token) {
        Ok(tenant_id) => {
            context.set(tenant_id.into_inner());
            tracing::debug!("Authenticated request for {:?} on {}", context.get_or_none(), path);
            request.extensions_mut().insert(context.clone());
            next.run(request).await
        }
        Err(e) => {
            tracing::error!("Invalid or expired token: {}", e);
            unauthorized_response(MSG_TOKEN_INVALID)
        }
    }
}

pub fn is_public_path(path: &str) -> bool {
    path == "/" || PUBLIC_PREFIXES.iter().any(|prefix| path.starts_with(prefix))
}

/// Extract the token from `<header>: <prefix> <token>`
pub fn extract_token(headers: &HeaderMap, header: &str, prefix: &str) -> Result<String, BearerError> {
    let value = headers.get(header).ok_or(BearerError::Missing)?;
    let value = value.to_str().map_err(|_| BearerError::Unreadable)?;

    let token = value
        .strip_prefix(prefix)
        .and_then(|rest| rest.strip_prefix(' '))
        .ok_or(BearerError::Missing)?;

    if token.trim().is_empty() {
        return Err(BearerError::Missing);
    }
    Ok(token.to_string())
}

/// 401 body shared by every gate rejection
pub fn unauthorized_response(message: &str) -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({
            "timestamp": chrono::Utc::now(),
            "status": 401,
            "error": "Unauthorized",
            "message": message,
        })),
    )
        .into_response()
}
