use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header::AUTHORIZATION, request::Parts, HeaderMap},
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

use crate::error::ApiError;
use crate::state::AppState;

/// Caller identity resolved from the session token
#[derive(Clone, Debug, PartialEq)]
pub struct AuthUser {
    pub user_id: Uuid,
}

/// Session gate for mutating routes.
///
/// The raw `Authorization` header value is the session's lookup key; there is no
/// scheme prefix. Resolved users are injected into request extensions.
pub async fn session_auth_middleware(
    State(state): State<AppState>,
    headers: HeaderMap,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = extract_session_token(&headers)?;

    let user_id = state
        .sessions
        .resolve(token)
        .await
        .map_err(|e| {
            tracing::error!("Session lookup failed: {}", e);
            ApiError::internal_server_error("Internal Server Error.")
        })?
        .ok_or_else(|| {
            tracing::warn!("Rejected request with unknown session token");
            ApiError::unauthorized("Unauthorized. Invalid token.")
        })?;

    request.extensions_mut().insert(AuthUser { user_id });

    Ok(next.run(request).await)
}

fn extract_session_token(headers: &HeaderMap) -> Result<&str, ApiError> {
    let token = headers
        .get(AUTHORIZATION)
        .ok_or_else(|| ApiError::unauthorized("Unauthorized. No token provided."))?
        .to_str()
        .map_err(|_| ApiError::unauthorized("Unauthorized. Invalid token."))?
        .trim();

    if token.is_empty() {
        return Err(ApiError::unauthorized("Unauthorized. No token provided."));
    }
    Ok(token)
}

#[axum::async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthUser>()
            .cloned()
            .ok_or_else(|| ApiError::unauthorized("Unauthorized. No token provided."))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn missing_header_is_unauthorized() {
        let err = extract_session_token(&HeaderMap::new()).unwrap_err();
        assert_eq!(err.status_code(), 401);
        assert_eq!(err.message(), "Unauthorized. No token provided.");
    }

    #[test]
    fn blank_header_is_unauthorized() {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_static("   "));
        assert!(extract_session_token(&headers).is_err());
    }

    #[test]
    fn raw_token_is_used_verbatim() {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_static("65f0c2a9e1"));
        assert_eq!(extract_session_token(&headers).unwrap(), "65f0c2a9e1");
    }
}
