//! Admin API endpoints for managing teams, links and workflows

pub mod links;
pub mod teams;
pub mod workflows;

use axum::{
    routing::{delete, get, post, put},
    Router,
};

use super::state::AppState;

/// Create admin API router
pub fn create_admin_router() -> Router<AppState> {
    Router::new()
        // Team management
        .route("/teams", get(teams::list_teams))
        .route("/teams", post(teams::create_team))
        .route("/teams/{team_id}", get(teams::get_team))
        .route("/teams/{team_id}", put(teams::update_team))
        .route("/teams/{team_id}", delete(teams::delete_team))
        // Link management
        .route("/links", get(links::list_links))
        .route("/links", post(links::create_link))
        .route("/links/{link_id}", get(links::get_link))
        .route("/links/{link_id}", put(links::update_link))
        .route("/links/{link_id}", delete(links::delete_link))
        // Workflow management
        .route("/workflows", get(workflows::list_workflows))
        .route("/workflows", post(workflows::create_workflow))
        .route("/workflows/{workflow_id}", get(workflows::get_workflow))
        .route("/workflows/{workflow_id}", put(workflows::update_workflow))
        .route("/workflows/{workflow_id}", delete(workflows::delete_workflow))
        .route(
            "/workflows/{workflow_id}/activate",
            post(workflows::activate_workflow),
        )
        .route(
            "/workflows/{workflow_id}/deactivate",
            post(workflows::deactivate_workflow),
        )
        .route(
            "/workflows/{workflow_id}/route",
            post(workflows::preview_route),
        )
        // Step management
        .route("/workflows/{workflow_id}/steps", post(workflows::create_step))
        .route(
            "/workflows/{workflow_id}/steps/{step_id}",
            put(workflows::update_step),
        )
        .route(
            "/workflows/{workflow_id}/steps/{step_id}",
            delete(workflows::delete_step),
        )
        .route(
            "/workflows/{workflow_id}/steps/reorder",
            post(workflows::reorder_steps),
        )
}
