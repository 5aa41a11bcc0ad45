//! Application state for shared services

use std::sync::Arc;

use crate::infrastructure::services::{LinkService, TeamService, ViewService, WorkflowService};

/// Application state containing shared services
#[derive(Clone)]
pub struct AppState {
    pub team_service: Arc<TeamService>,
    pub link_service: Arc<LinkService>,
    pub workflow_service: Arc<WorkflowService>,
    pub view_service: Arc<ViewService>,

    /// Static key guarding the admin surface; `None` locks admin endpoints
    pub admin_api_key: Option<Arc<str>>,
}

impl AppState {
    pub fn new(
        team_service: Arc<TeamService>,
        link_service: Arc<LinkService>,
        workflow_service: Arc<WorkflowService>,
        view_service: Arc<ViewService>,
        admin_api_key: Option<String>,
    ) -> Self {
        Self {
            team_service,
            link_service,
            workflow_service,
            view_service,
            admin_api_key: admin_api_key.map(Arc::from),
        }
    }
}
