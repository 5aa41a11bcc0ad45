//! Admin key authentication middleware

use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts},
};
use tracing::debug;

use crate::api::state::AppState;
use crate::api::types::ApiError;

/// Extractor that requires the configured admin API key
///
/// Extracts the key from either:
/// - Authorization header: `Bearer <key>`
/// - X-API-Key header: `<key>`
///
/// When no admin key is configured, the admin surface is locked and every
/// request is rejected.
#[derive(Debug, Clone)]
pub struct RequireAdminKey;

impl FromRequestParts<AppState> for RequireAdminKey {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let Some(ref expected) = state.admin_api_key else {
            return Err(ApiError::unauthorized(
                "Admin API key is not configured; admin endpoints are locked",
            ));
        };

        let supplied = extract_api_key_from_headers(&parts.headers)?;

        if supplied != expected.as_ref() {
            debug!("Admin request with invalid API key");
            return Err(ApiError::forbidden("Invalid admin API key"));
        }

        Ok(RequireAdminKey)
    }
}

fn extract_api_key_from_headers(headers: &axum::http::HeaderMap) -> Result<String, ApiError> {
    // Try Authorization header first (Bearer token)
    if let Some(auth_header) = headers.get(header::AUTHORIZATION) {
        let auth_str = auth_header
            .to_str()
            .map_err(|_| ApiError::bad_request("Invalid Authorization header encoding"))?;

        if let Some(token) = auth_str.strip_prefix("Bearer ") {
            return Ok(token.trim().to_string());
        }
    }

    // Try X-API-Key header
    if let Some(api_key_header) = headers.get("x-api-key") {
        let key = api_key_header
            .to_str()
            .map_err(|_| ApiError::bad_request("Invalid X-API-Key header encoding"))?;

        return Ok(key.trim().to_string());
    }

    Err(ApiError::unauthorized(
        "Admin API key required. Provide via 'Authorization: Bearer <key>' or 'X-API-Key: <key>' header",
    ))
}
