//! Team management admin endpoints

use axum::{
    extract::{Path, State},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::api::middleware::RequireAdminKey;
use crate::api::state::AppState;
use crate::api::types::ApiError;
use crate::domain::{SubscriptionPlan, Team, TeamStatus};
use crate::infrastructure::services::{CreateTeamRequest, UpdateTeamRequest};

/// Request to create a new team
#[derive(Debug, Clone, Deserialize)]
pub struct CreateTeamApiRequest {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub plan: SubscriptionPlan,
}

/// Request to update a team
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateTeamApiRequest {
    pub name: Option<String>,
    pub description: Option<Option<String>>,
    pub plan: Option<SubscriptionPlan>,
}

/// Team response for admin API
#[derive(Debug, Clone, Serialize)]
pub struct TeamResponse {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub plan: SubscriptionPlan,
    pub status: TeamStatus,
    pub created_at: String,
    pub updated_at: String,
}

impl From<&Team> for TeamResponse {
    fn from(team: &Team) -> Self {
        Self {
            id: team.id().as_str().to_string(),
            name: team.name().to_string(),
            description: team.description().map(String::from),
            plan: team.plan(),
            status: team.status(),
            created_at: team.created_at().to_rfc3339(),
            updated_at: team.updated_at().to_rfc3339(),
        }
    }
}

/// List teams response
#[derive(Debug, Clone, Serialize)]
pub struct ListTeamsResponse {
    pub teams: Vec<TeamResponse>,
    pub total: usize,
}

/// GET /admin/teams
pub async fn list_teams(
    State(state): State<AppState>,
    _: RequireAdminKey,
) -> Result<Json<ListTeamsResponse>, ApiError> {
    let teams = state.team_service.list().await.map_err(ApiError::from)?;

    let teams: Vec<TeamResponse> = teams.iter().map(TeamResponse::from).collect();
    let total = teams.len();

    Ok(Json(ListTeamsResponse { teams, total }))
}

/// POST /admin/teams
pub async fn create_team(
    State(state): State<AppState>,
    _: RequireAdminKey,
    Json(request): Json<CreateTeamApiRequest>,
) -> Result<Json<TeamResponse>, ApiError> {
    debug!(team_id = %request.id, "Admin creating team");

    let create_request = CreateTeamRequest {
        id: request.id,
        name: request.name,
        description: request.description,
        plan: request.plan,
    };

    let team = state
        .team_service
        .create(create_request)
        .await
        .map_err(ApiError::from)?;

    Ok(Json(TeamResponse::from(&team)))
}

/// GET /admin/teams/:team_id
pub async fn get_team(
    State(state): State<AppState>,
    _: RequireAdminKey,
    Path(team_id): Path<String>,
) -> Result<Json<TeamResponse>, ApiError> {
    let team = state
        .team_service
        .get(&team_id)
        .await
        .map_err(ApiError::from)?
        .ok_or_else(|| ApiError::not_found(format!("Team '{}' not found", team_id)))?;

    Ok(Json(TeamResponse::from(&team)))
}

/// PUT /admin/teams/:team_id
pub async fn update_team(
    State(state): State<AppState>,
    _: RequireAdminKey,
    Path(team_id): Path<String>,
    Json(request): Json<UpdateTeamApiRequest>,
) -> Result<Json<TeamResponse>, ApiError> {
    debug!(team_id = %team_id, "Admin updating team");

    let update_request = UpdateTeamRequest {
        name: request.name,
        description: request.description,
        plan: request.plan,
    };

    let team = state
        .team_service
        .update(&team_id, update_request)
        .await
        .map_err(ApiError::from)?;

    Ok(Json(TeamResponse::from(&team)))
}

/// DELETE /admin/teams/:team_id
pub async fn delete_team(
    State(state): State<AppState>,
    _: RequireAdminKey,
    Path(team_id): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    debug!(team_id = %team_id, "Admin deleting team");

    state
        .team_service
        .delete(&team_id)
        .await
        .map_err(ApiError::from)?;

    Ok(Json(serde_json::json!({
        "deleted": true,
        "id": team_id
    })))
}
