//! Link management admin endpoints

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::api::middleware::RequireAdminKey;
use crate::api::state::AppState;
use crate::api::types::ApiError;
use crate::domain::{AccessPolicy, Link, LinkKind};
use crate::infrastructure::services::{CreateLinkRequest, UpdateLinkRequest};

/// Request to create a new link
#[derive(Debug, Clone, Deserialize)]
pub struct CreateLinkApiRequest {
    pub id: String,
    pub team_id: String,
    pub name: String,
    #[serde(default)]
    pub kind: LinkKind,
    #[serde(default)]
    pub access: AccessPolicy,
    #[serde(default = "default_true")]
    pub enabled: bool,
}

fn default_true() -> bool {
    true
}

/// Request to update a link
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateLinkApiRequest {
    pub name: Option<String>,
    pub access: Option<AccessPolicy>,
    pub enabled: Option<bool>,
}

/// Query parameters for listing links
#[derive(Debug, Clone, Deserialize, Default)]
pub struct ListLinksQuery {
    pub team_id: Option<String>,
}

/// Link response for admin API
#[derive(Debug, Clone, Serialize)]
pub struct LinkResponse {
    pub id: String,
    pub team_id: String,
    pub name: String,
    pub kind: LinkKind,
    pub access: AccessPolicy,
    pub enabled: bool,
    pub created_at: String,
    pub updated_at: String,
}

impl From<&Link> for LinkResponse {
    fn from(link: &Link) -> Self {
        Self {
            id: link.id().as_str().to_string(),
            team_id: link.team_id().as_str().to_string(),
            name: link.name().to_string(),
            kind: link.kind(),
            access: link.access(),
            enabled: link.is_enabled(),
            created_at: link.created_at().to_rfc3339(),
            updated_at: link.updated_at().to_rfc3339(),
        }
    }
}

/// List links response
#[derive(Debug, Clone, Serialize)]
pub struct ListLinksResponse {
    pub links: Vec<LinkResponse>,
    pub total: usize,
}

/// GET /admin/links
pub async fn list_links(
    State(state): State<AppState>,
    _: RequireAdminKey,
    Query(query): Query<ListLinksQuery>,
) -> Result<Json<ListLinksResponse>, ApiError> {
    let links = match query.team_id {
        Some(ref team_id) => state
            .link_service
            .list_by_team(team_id)
            .await
            .map_err(ApiError::from)?,
        None => state.link_service.list().await.map_err(ApiError::from)?,
    };

    let links: Vec<LinkResponse> = links.iter().map(LinkResponse::from).collect();
    let total = links.len();

    Ok(Json(ListLinksResponse { links, total }))
}

/// POST /admin/links
pub async fn create_link(
    State(state): State<AppState>,
    _: RequireAdminKey,
    Json(request): Json<CreateLinkApiRequest>,
) -> Result<Json<LinkResponse>, ApiError> {
    debug!(link_id = %request.id, "Admin creating link");

    let create_request = CreateLinkRequest {
        id: request.id,
        team_id: request.team_id,
        name: request.name,
        kind: request.kind,
        access: request.access,
        enabled: request.enabled,
    };

    let link = state
        .link_service
        .create(create_request)
        .await
        .map_err(ApiError::from)?;

    Ok(Json(LinkResponse::from(&link)))
}

/// GET /admin/links/:link_id
pub async fn get_link(
    State(state): State<AppState>,
    _: RequireAdminKey,
    Path(link_id): Path<String>,
) -> Result<Json<LinkResponse>, ApiError> {
    let link = state
        .link_service
        .get(&link_id)
        .await
        .map_err(ApiError::from)?
        .ok_or_else(|| ApiError::not_found(format!("Link '{}' not found", link_id)))?;

    Ok(Json(LinkResponse::from(&link)))
}

/// PUT /admin/links/:link_id
pub async fn update_link(
    State(state): State<AppState>,
    _: RequireAdminKey,
    Path(link_id): Path<String>,
    Json(request): Json<UpdateLinkApiRequest>,
) -> Result<Json<LinkResponse>, ApiError> {
    debug!(link_id = %link_id, "Admin updating link");

    let update_request = UpdateLinkRequest {
        name: request.name,
        access: request.access,
        enabled: request.enabled,
    };

    let link = state
        .link_service
        .update(&link_id, update_request)
        .await
        .map_err(ApiError::from)?;

    Ok(Json(LinkResponse::from(&link)))
}

/// DELETE /admin/links/:link_id
pub async fn delete_link(
    State(state): State<AppState>,
    _: RequireAdminKey,
    Path(link_id): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    debug!(link_id = %link_id, "Admin deleting link");

    state
        .link_service
        .delete(&link_id)
        .await
        .map_err(ApiError::from)?;

    Ok(Json(serde_json::json!({
        "deleted": true,
        "id": link_id
    })))
}
