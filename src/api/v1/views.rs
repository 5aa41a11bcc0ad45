//! View resolution endpoint
//!
//! The visitor-facing entry point: given an entry link and the email the
//! visitor typed into the access form, returns the link that should render
//! and its access requirements. Routing misses are not errors; the entry
//! link's own configuration comes back unchanged.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::api::state::AppState;
use crate::api::types::ApiError;
use crate::domain::{AccessPolicy, Link, LinkKind};
use crate::infrastructure::services::ResolvedView;

/// Request to resolve a view of an entry link
#[derive(Debug, Clone, Deserialize)]
pub struct ResolveViewApiRequest {
    /// The entry link the visitor opened
    pub link_id: String,

    /// Email captured from the access form, if any
    #[serde(default)]
    pub email: Option<String>,
}

/// The link a visitor should see
#[derive(Debug, Clone, Serialize)]
pub struct ViewLinkResponse {
    pub id: String,
    pub name: String,
    pub kind: LinkKind,
    pub access: AccessPolicy,
}

impl From<&Link> for ViewLinkResponse {
    fn from(link: &Link) -> Self {
        Self {
            id: link.id().as_str().to_string(),
            name: link.name().to_string(),
            kind: link.kind(),
            access: link.access(),
        }
    }
}

/// Resolved view response
#[derive(Debug, Clone, Serialize)]
pub struct ResolveViewApiResponse {
    /// Whether a routing step matched and redirected the visitor
    pub matched: bool,

    /// The link to render; its own access rules still apply
    pub link: ViewLinkResponse,
}

impl From<&ResolvedView> for ResolveViewApiResponse {
    fn from(view: &ResolvedView) -> Self {
        Self {
            matched: view.is_routed(),
            link: ViewLinkResponse::from(&view.link),
        }
    }
}

/// POST /v1/views
pub async fn resolve_view(
    State(state): State<AppState>,
    Json(request): Json<ResolveViewApiRequest>,
) -> Result<Json<ResolveViewApiResponse>, ApiError> {
    debug!(link_id = %request.link_id, "Resolving view");

    let view = state
        .view_service
        .resolve_view(&request.link_id, request.email.as_deref())
        .await
        .map_err(ApiError::from)?;

    Ok(Json(ResolveViewApiResponse::from(&view)))
}
