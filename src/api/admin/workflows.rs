//! Workflow and step management admin endpoints

use axum::{
    extract::{Path, State},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::api::middleware::RequireAdminKey;
use crate::api::state::AppState;
use crate::api::types::ApiError;
use crate::domain::workflow::{ConditionSet, StepAction, Visitor, WorkflowStep};
use crate::domain::{RoutingDecision, Workflow};
use crate::infrastructure::services::{
    CreateStepRequest, CreateWorkflowRequest, UpdateStepRequest, UpdateWorkflowRequest,
};

/// Request to create a new workflow
#[derive(Debug, Clone, Deserialize)]
pub struct CreateWorkflowApiRequest {
    pub id: String,
    pub team_id: String,
    pub entry_link_id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

fn default_true() -> bool {
    true
}

/// Request to update a workflow (the entry link is immutable)
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateWorkflowApiRequest {
    pub name: Option<String>,
    pub description: Option<Option<String>>,
    pub is_active: Option<bool>,
}

/// Request to add a step
#[derive(Debug, Clone, Deserialize)]
pub struct CreateStepApiRequest {
    pub name: String,
    pub conditions: ConditionSet,
    pub target_link_id: String,
}

/// Request to update a step
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateStepApiRequest {
    pub name: Option<String>,
    pub conditions: Option<ConditionSet>,
    pub target_link_id: Option<String>,
    pub step_order: Option<u32>,
}

/// Request to renumber all steps
#[derive(Debug, Clone, Deserialize)]
pub struct ReorderStepsApiRequest {
    pub step_ids: Vec<String>,
}

/// Request to preview a routing decision
#[derive(Debug, Clone, Deserialize)]
pub struct PreviewRouteApiRequest {
    #[serde(default)]
    pub email: Option<String>,
}

/// Routing decision response
#[derive(Debug, Clone, Serialize)]
pub struct RoutingDecisionResponse {
    pub matched: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub step_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub step_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_link_id: Option<String>,
}

impl From<&RoutingDecision> for RoutingDecisionResponse {
    fn from(decision: &RoutingDecision) -> Self {
        match decision {
            RoutingDecision::Matched {
                step_id,
                step_name,
                target_link_id,
            } => Self {
                matched: true,
                step_id: Some(step_id.as_str().to_string()),
                step_name: Some(step_name.clone()),
                target_link_id: Some(target_link_id.as_str().to_string()),
            },
            RoutingDecision::NoMatch => Self {
                matched: false,
                step_id: None,
                step_name: None,
                target_link_id: None,
            },
        }
    }
}

/// Step response
#[derive(Debug, Clone, Serialize)]
pub struct StepResponse {
    pub id: String,
    pub name: String,
    pub step_order: u32,
    pub conditions: ConditionSet,
    pub action: StepAction,
    pub created_at: String,
}

impl From<&WorkflowStep> for StepResponse {
    fn from(step: &WorkflowStep) -> Self {
        Self {
            id: step.id().as_str().to_string(),
            name: step.name().to_string(),
            step_order: step.step_order(),
            conditions: step.conditions().clone(),
            action: step.action().clone(),
            created_at: step.created_at().to_rfc3339(),
        }
    }
}

/// Workflow response for admin API; steps come back in evaluation order
#[derive(Debug, Clone, Serialize)]
pub struct WorkflowResponse {
    pub id: String,
    pub team_id: String,
    pub entry_link_id: String,
    pub name: String,
    pub description: Option<String>,
    pub is_active: bool,
    pub steps: Vec<StepResponse>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<&Workflow> for WorkflowResponse {
    fn from(workflow: &Workflow) -> Self {
        Self {
            id: workflow.id().as_str().to_string(),
            team_id: workflow.team_id().as_str().to_string(),
            entry_link_id: workflow.entry_link_id().as_str().to_string(),
            name: workflow.name().to_string(),
            description: workflow.description().map(String::from),
            is_active: workflow.is_active(),
            steps: workflow
                .ordered_steps()
                .into_iter()
                .map(StepResponse::from)
                .collect(),
            created_at: workflow.created_at().to_rfc3339(),
            updated_at: workflow.updated_at().to_rfc3339(),
        }
    }
}

/// List workflows response
#[derive(Debug, Clone, Serialize)]
pub struct ListWorkflowsResponse {
    pub workflows: Vec<WorkflowResponse>,
    pub total: usize,
}

/// GET /admin/workflows
pub async fn list_workflows(
    State(state): State<AppState>,
    _: RequireAdminKey,
) -> Result<Json<ListWorkflowsResponse>, ApiError> {
    let workflows = state.workflow_service.list().await.map_err(ApiError::from)?;

    let workflows: Vec<WorkflowResponse> = workflows.iter().map(WorkflowResponse::from).collect();
    let total = workflows.len();

    Ok(Json(ListWorkflowsResponse { workflows, total }))
}

/// POST /admin/workflows
pub async fn create_workflow(
    State(state): State<AppState>,
    _: RequireAdminKey,
    Json(request): Json<CreateWorkflowApiRequest>,
) -> Result<Json<WorkflowResponse>, ApiError> {
    debug!(workflow_id = %request.id, "Admin creating workflow");

    let create_request = CreateWorkflowRequest {
        id: request.id,
        team_id: request.team_id,
        entry_link_id: request.entry_link_id,
        name: request.name,
        description: request.description,
        is_active: request.is_active,
    };

    let workflow = state
        .workflow_service
        .create(create_request)
        .await
        .map_err(ApiError::from)?;

    Ok(Json(WorkflowResponse::from(&workflow)))
}

/// GET /admin/workflows/:workflow_id
pub async fn get_workflow(
    State(state): State<AppState>,
    _: RequireAdminKey,
    Path(workflow_id): Path<String>,
) -> Result<Json<WorkflowResponse>, ApiError> {
    let workflow = state
        .workflow_service
        .get(&workflow_id)
        .await
        .map_err(ApiError::from)?
        .ok_or_else(|| ApiError::not_found(format!("Workflow '{}' not found", workflow_id)))?;

    Ok(Json(WorkflowResponse::from(&workflow)))
}

/// PUT /admin/workflows/:workflow_id
pub async fn update_workflow(
    State(state): State<AppState>,
    _: RequireAdminKey,
    Path(workflow_id): Path<String>,
    Json(request): Json<UpdateWorkflowApiRequest>,
) -> Result<Json<WorkflowResponse>, ApiError> {
    debug!(workflow_id = %workflow_id, "Admin updating workflow");

    let update_request = UpdateWorkflowRequest {
        name: request.name,
        description: request.description,
        is_active: request.is_active,
    };

    let workflow = state
        .workflow_service
        .update(&workflow_id, update_request)
        .await
        .map_err(ApiError::from)?;

    Ok(Json(WorkflowResponse::from(&workflow)))
}

/// DELETE /admin/workflows/:workflow_id
pub async fn delete_workflow(
    State(state): State<AppState>,
    _: RequireAdminKey,
    Path(workflow_id): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    debug!(workflow_id = %workflow_id, "Admin deleting workflow");

    state
        .workflow_service
        .delete(&workflow_id)
        .await
        .map_err(ApiError::from)?;

    Ok(Json(serde_json::json!({
        "deleted": true,
        "id": workflow_id
    })))
}

/// POST /admin/workflows/:workflow_id/activate
pub async fn activate_workflow(
    State(state): State<AppState>,
    _: RequireAdminKey,
    Path(workflow_id): Path<String>,
) -> Result<Json<WorkflowResponse>, ApiError> {
    let workflow = state
        .workflow_service
        .activate(&workflow_id)
        .await
        .map_err(ApiError::from)?;

    Ok(Json(WorkflowResponse::from(&workflow)))
}

/// POST /admin/workflows/:workflow_id/deactivate
pub async fn deactivate_workflow(
    State(state): State<AppState>,
    _: RequireAdminKey,
    Path(workflow_id): Path<String>,
) -> Result<Json<WorkflowResponse>, ApiError> {
    let workflow = state
        .workflow_service
        .deactivate(&workflow_id)
        .await
        .map_err(ApiError::from)?;

    Ok(Json(WorkflowResponse::from(&workflow)))
}

/// POST /admin/workflows/:workflow_id/steps
pub async fn create_step(
    State(state): State<AppState>,
    _: RequireAdminKey,
    Path(workflow_id): Path<String>,
    Json(request): Json<CreateStepApiRequest>,
) -> Result<Json<StepResponse>, ApiError> {
    debug!(workflow_id = %workflow_id, step_name = %request.name, "Admin adding step");

    let create_request =
        CreateStepRequest::new(request.name, request.conditions, request.target_link_id);

    let step = state
        .workflow_service
        .add_step(&workflow_id, create_request)
        .await
        .map_err(ApiError::from)?;

    Ok(Json(StepResponse::from(&step)))
}

/// PUT /admin/workflows/:workflow_id/steps/:step_id
pub async fn update_step(
    State(state): State<AppState>,
    _: RequireAdminKey,
    Path((workflow_id, step_id)): Path<(String, String)>,
    Json(request): Json<UpdateStepApiRequest>,
) -> Result<Json<StepResponse>, ApiError> {
    debug!(workflow_id = %workflow_id, step_id = %step_id, "Admin updating step");

    let update_request = UpdateStepRequest {
        name: request.name,
        conditions: request.conditions,
        target_link_id: request.target_link_id,
        step_order: request.step_order,
    };

    let step = state
        .workflow_service
        .update_step(&workflow_id, &step_id, update_request)
        .await
        .map_err(ApiError::from)?;

    Ok(Json(StepResponse::from(&step)))
}

/// DELETE /admin/workflows/:workflow_id/steps/:step_id
pub async fn delete_step(
    State(state): State<AppState>,
    _: RequireAdminKey,
    Path((workflow_id, step_id)): Path<(String, String)>,
) -> Result<Json<serde_json::Value>, ApiError> {
    debug!(workflow_id = %workflow_id, step_id = %step_id, "Admin deleting step");

    let deleted = state
        .workflow_service
        .delete_step(&workflow_id, &step_id)
        .await
        .map_err(ApiError::from)?;

    Ok(Json(serde_json::json!({
        "deleted": deleted,
        "id": step_id
    })))
}

/// POST /admin/workflows/:workflow_id/route
///
/// Dry-runs the routing decision for a visitor identity without rendering
/// anything, so operators can check where a given email would land.
pub async fn preview_route(
    State(state): State<AppState>,
    _: RequireAdminKey,
    Path(workflow_id): Path<String>,
    Json(request): Json<PreviewRouteApiRequest>,
) -> Result<Json<RoutingDecisionResponse>, ApiError> {
    let visitor = Visitor::from_email(request.email.as_deref());

    let decision = state
        .workflow_service
        .route(&workflow_id, &visitor)
        .await
        .map_err(ApiError::from)?;

    Ok(Json(RoutingDecisionResponse::from(&decision)))
}

/// POST /admin/workflows/:workflow_id/steps/reorder
pub async fn reorder_steps(
    State(state): State<AppState>,
    _: RequireAdminKey,
    Path(workflow_id): Path<String>,
    Json(request): Json<ReorderStepsApiRequest>,
) -> Result<Json<WorkflowResponse>, ApiError> {
    debug!(workflow_id = %workflow_id, "Admin reordering steps");

    let workflow = state
        .workflow_service
        .reorder_steps(&workflow_id, &request.step_ids)
        .await
        .map_err(ApiError::from)?;

    Ok(Json(WorkflowResponse::from(&workflow)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::workflow::{Condition, ConditionLogic};

    #[test]
    fn test_create_workflow_request_deserialization() {
        let json = r#"{
            "id": "investor-routing",
            "team_id": "acme",
            "entry_link_id": "pitch-deck",
            "name": "Investor Routing",
            "description": "Routes investors by firm"
        }"#;

        let request: CreateWorkflowApiRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.id, "investor-routing");
        assert_eq!(request.entry_link_id, "pitch-deck");
        assert!(request.is_active);
    }

    #[test]
    fn test_create_step_request_deserialization() {
        let json = r#"{
            "name": "Route Acme",
            "conditions": {
                "logic": "OR",
                "items": [
                    {"type": "domain", "values": ["acme.com"]},
                    {"type": "email", "values": ["vip@guest.com"]}
                ]
            },
            "target_link_id": "deck-b"
        }"#;

        let request: CreateStepApiRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.name, "Route Acme");
        assert_eq!(request.conditions.logic, ConditionLogic::Or);
        assert_eq!(request.conditions.items.len(), 2);
        assert!(matches!(request.conditions.items[0], Condition::Domain(_)));
    }

    #[test]
    fn test_create_step_request_accepts_and_logic() {
        let json = r#"{
            "name": "Strict",
            "conditions": {
                "logic": "AND",
                "items": [{"type": "domain", "values": ["acme.com"]}]
            },
            "target_link_id": "deck-b"
        }"#;

        let request: CreateStepApiRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.conditions.logic, ConditionLogic::And);
    }

    #[test]
    fn test_update_step_request_deserialization() {
        let json = r#"{"step_order": 3}"#;

        let request: UpdateStepApiRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.step_order, Some(3));
        assert!(request.conditions.is_none());
    }

    #[test]
    fn test_reorder_request_deserialization() {
        let json = r#"{"step_ids": ["a-b-c", "d-e-f"]}"#;

        let request: ReorderStepsApiRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.step_ids.len(), 2);
    }

    #[test]
    fn test_routing_decision_response_shapes() {
        let no_match = RoutingDecisionResponse::from(&RoutingDecision::NoMatch);
        let json = serde_json::to_string(&no_match).unwrap();
        assert_eq!(json, r#"{"matched":false}"#);

        let matched = RoutingDecisionResponse {
            matched: true,
            step_id: Some("step-1".to_string()),
            step_name: Some("A".to_string()),
            target_link_id: Some("deck-a".to_string()),
        };
        let json = serde_json::to_string(&matched).unwrap();
        assert!(json.contains("\"matched\":true"));
        assert!(json.contains("\"target_link_id\":\"deck-a\""));
    }
}
