//! Application services - CRUD and entry resolution over storage

mod link_service;
mod team_service;
mod view_service;
mod workflow_service;

pub use link_service::{CreateLinkRequest, LinkService, StorageLinkResolver, UpdateLinkRequest};
pub use team_service::{CreateTeamRequest, TeamService, UpdateTeamRequest};
pub use view_service::{ResolvedView, ViewService};
pub use workflow_service::{
    CreateStepRequest, CreateWorkflowRequest, UpdateStepRequest, UpdateWorkflowRequest,
    WorkflowService,
};
