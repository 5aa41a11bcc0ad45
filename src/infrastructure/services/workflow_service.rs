//! Workflow service - CRUD and step management for routing workflows
//!
//! All validation lives here, at the service boundary: id format checks
//! before any lookup, condition normalization, non-empty condition sets, and
//! target-link team ownership. The router downstream trusts what this layer
//! persisted.

use std::sync::Arc;

use crate::domain::storage::Storage;
use crate::domain::workflow::{
    Condition, ConditionSet, DomainCondition, EmailCondition, StepAction, StepId, Visitor,
    WorkflowRouter, WorkflowStep,
};
use crate::domain::{DomainError, Link, LinkId, RoutingDecision, Workflow, WorkflowId};

use super::link_service::{parse_link_id, StorageLinkResolver};
use super::team_service::parse_team_id;

/// Request to create a new workflow
#[derive(Debug, Clone)]
pub struct CreateWorkflowRequest {
    pub id: String,
    pub team_id: String,
    pub entry_link_id: String,
    pub name: String,
    pub description: Option<String>,
    pub is_active: bool,
}

impl CreateWorkflowRequest {
    pub fn new(
        id: impl Into<String>,
        team_id: impl Into<String>,
        entry_link_id: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            team_id: team_id.into(),
            entry_link_id: entry_link_id.into(),
            name: name.into(),
            description: None,
            is_active: true,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_active(mut self, is_active: bool) -> Self {
        self.is_active = is_active;
        self
    }
}

/// Request to update an existing workflow
///
/// The entry link is immutable after creation and deliberately absent here.
#[derive(Debug, Clone, Default)]
pub struct UpdateWorkflowRequest {
    pub name: Option<String>,
    pub description: Option<Option<String>>,
    pub is_active: Option<bool>,
}

impl UpdateWorkflowRequest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_description(mut self, description: Option<String>) -> Self {
        self.description = Some(description);
        self
    }

    pub fn with_active(mut self, is_active: bool) -> Self {
        self.is_active = Some(is_active);
        self
    }
}

/// Request to add a step to a workflow
#[derive(Debug, Clone)]
pub struct CreateStepRequest {
    pub name: String,
    pub conditions: ConditionSet,
    pub target_link_id: String,
}

impl CreateStepRequest {
    pub fn new(
        name: impl Into<String>,
        conditions: ConditionSet,
        target_link_id: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            conditions,
            target_link_id: target_link_id.into(),
        }
    }
}

/// Request to update an existing step
#[derive(Debug, Clone, Default)]
pub struct UpdateStepRequest {
    pub name: Option<String>,
    pub conditions: Option<ConditionSet>,
    pub target_link_id: Option<String>,
    pub step_order: Option<u32>,
}

impl UpdateStepRequest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_conditions(mut self, conditions: ConditionSet) -> Self {
        self.conditions = Some(conditions);
        self
    }

    pub fn with_target_link_id(mut self, target_link_id: impl Into<String>) -> Self {
        self.target_link_id = Some(target_link_id.into());
        self
    }

    pub fn with_step_order(mut self, step_order: u32) -> Self {
        self.step_order = Some(step_order);
        self
    }
}

const MAX_STEP_NAME_LENGTH: usize = 100;

/// Workflow service for CRUD, step operations and routing
pub struct WorkflowService {
    storage: Arc<dyn Storage<Workflow>>,
    links: Arc<dyn Storage<Link>>,
    router: WorkflowRouter,
}

impl std::fmt::Debug for WorkflowService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WorkflowService").finish()
    }
}

impl WorkflowService {
    pub fn new(storage: Arc<dyn Storage<Workflow>>, links: Arc<dyn Storage<Link>>) -> Self {
        let router = WorkflowRouter::new(Arc::new(StorageLinkResolver::new(links.clone())));
        Self {
            storage,
            links,
            router,
        }
    }

    /// Produce a routing decision for a visitor against a workflow
    pub async fn route(
        &self,
        id: &str,
        visitor: &Visitor,
    ) -> Result<RoutingDecision, DomainError> {
        let workflow = self.get_required(id).await?;
        self.router.route(&workflow, visitor).await
    }

    /// Route against an already-fetched workflow
    pub async fn route_workflow(
        &self,
        workflow: &Workflow,
        visitor: &Visitor,
    ) -> Result<RoutingDecision, DomainError> {
        self.router.route(workflow, visitor).await
    }

    /// Get a workflow by ID
    pub async fn get(&self, id: &str) -> Result<Option<Workflow>, DomainError> {
        let workflow_id = parse_workflow_id(id)?;
        self.storage.get(&workflow_id).await
    }

    /// List all workflows
    pub async fn list(&self) -> Result<Vec<Workflow>, DomainError> {
        self.storage.list().await
    }

    /// Find the workflow owning the given entry link, if any
    pub async fn find_by_entry_link(
        &self,
        entry_link_id: &LinkId,
    ) -> Result<Option<Workflow>, DomainError> {
        let workflows = self.storage.list().await?;
        Ok(workflows
            .into_iter()
            .find(|w| w.entry_link_id() == entry_link_id))
    }

    /// Create a new workflow
    pub async fn create(&self, request: CreateWorkflowRequest) -> Result<Workflow, DomainError> {
        let workflow_id = parse_workflow_id(&request.id)?;
        let team_id = parse_team_id(&request.team_id)?;
        let entry_link_id = parse_link_id(&request.entry_link_id)?;

        if self.storage.exists(&workflow_id).await? {
            return Err(DomainError::conflict(format!(
                "Workflow '{}' already exists",
                request.id
            )));
        }

        // The entry link must exist and belong to the owning team
        let entry_link = self
            .links
            .get(&entry_link_id)
            .await?
            .ok_or_else(|| {
                DomainError::validation(format!(
                    "Entry link '{}' does not exist",
                    request.entry_link_id
                ))
            })?;

        if !entry_link.is_owned_by(&team_id) {
            return Err(DomainError::validation(format!(
                "Entry link '{}' is not owned by team '{}'",
                request.entry_link_id, request.team_id
            )));
        }

        // One workflow per entry link: routing must be unambiguous
        if self.find_by_entry_link(&entry_link_id).await?.is_some() {
            return Err(DomainError::conflict(format!(
                "Entry link '{}' already has a workflow",
                request.entry_link_id
            )));
        }

        if request.name.is_empty() {
            return Err(DomainError::validation("Workflow name cannot be empty"));
        }

        let mut workflow = Workflow::new(workflow_id, team_id, entry_link_id, request.name)
            .with_active(request.is_active);

        if let Some(description) = request.description {
            workflow = workflow.with_description(description);
        }

        self.storage.create(workflow).await
    }

    /// Update an existing workflow
    pub async fn update(
        &self,
        id: &str,
        request: UpdateWorkflowRequest,
    ) -> Result<Workflow, DomainError> {
        let mut workflow = self.get_required(id).await?;

        if let Some(name) = request.name {
            if name.is_empty() {
                return Err(DomainError::validation("Workflow name cannot be empty"));
            }
            workflow.set_name(name);
        }

        if let Some(description) = request.description {
            workflow.set_description(description);
        }

        if let Some(is_active) = request.is_active {
            workflow.set_active(is_active);
        }

        self.storage.update(workflow).await
    }

    /// Delete a workflow (its steps go with it)
    pub async fn delete(&self, id: &str) -> Result<bool, DomainError> {
        let workflow_id = parse_workflow_id(id)?;
        self.storage.delete(&workflow_id).await
    }

    /// Activate a workflow
    pub async fn activate(&self, id: &str) -> Result<Workflow, DomainError> {
        self.update(id, UpdateWorkflowRequest::new().with_active(true))
            .await
    }

    /// Deactivate a workflow; steps are kept, routing stops
    pub async fn deactivate(&self, id: &str) -> Result<Workflow, DomainError> {
        self.update(id, UpdateWorkflowRequest::new().with_active(false))
            .await
    }

    /// Add a step at the end of the evaluation order
    pub async fn add_step(
        &self,
        workflow_id: &str,
        request: CreateStepRequest,
    ) -> Result<WorkflowStep, DomainError> {
        let mut workflow = self.get_required(workflow_id).await?;

        validate_step_name(&request.name)?;
        let conditions = normalize_conditions(request.conditions)?;
        let target = self
            .validate_target(&workflow, &request.target_link_id)
            .await?;

        let step = WorkflowStep::new(request.name, conditions, StepAction::route(target))
            .with_order(workflow.next_step_order());

        workflow.add_step(step.clone());
        self.storage.update(workflow).await?;

        Ok(step)
    }

    /// Update a step; step_order only changes when explicitly requested
    pub async fn update_step(
        &self,
        workflow_id: &str,
        step_id: &str,
        request: UpdateStepRequest,
    ) -> Result<WorkflowStep, DomainError> {
        let mut workflow = self.get_required(workflow_id).await?;
        let step_id = parse_step_id(step_id)?;

        if let Some(ref name) = request.name {
            validate_step_name(name)?;
        }

        let conditions = request.conditions.map(normalize_conditions).transpose()?;

        let target = match request.target_link_id {
            Some(ref target_link_id) => Some(self.validate_target(&workflow, target_link_id).await?),
            None => None,
        };

        let step = workflow.step_mut(&step_id).ok_or_else(|| {
            DomainError::not_found(format!("Step '{}' not found", step_id))
        })?;

        if let Some(name) = request.name {
            step.set_name(name);
        }

        if let Some(conditions) = conditions {
            step.set_conditions(conditions);
        }

        if let Some(target) = target {
            step.set_action(StepAction::route(target));
        }

        if let Some(step_order) = request.step_order {
            step.set_order(step_order);
        }

        let updated = step.clone();
        self.storage.update(workflow).await?;

        Ok(updated)
    }

    /// Delete a step; remaining orders keep their values (gaps are fine)
    pub async fn delete_step(&self, workflow_id: &str, step_id: &str) -> Result<bool, DomainError> {
        let mut workflow = self.get_required(workflow_id).await?;
        let step_id = parse_step_id(step_id)?;

        if !workflow.remove_step(&step_id) {
            return Ok(false);
        }

        self.storage.update(workflow).await?;
        Ok(true)
    }

    /// Renumber all steps to the given permutation of step ids
    pub async fn reorder_steps(
        &self,
        workflow_id: &str,
        step_ids: &[String],
    ) -> Result<Workflow, DomainError> {
        let mut workflow = self.get_required(workflow_id).await?;

        let order: Vec<StepId> = step_ids
            .iter()
            .map(|id| parse_step_id(id))
            .collect::<Result<_, _>>()?;

        workflow
            .reorder_steps(&order)
            .map_err(|e| DomainError::validation(e.to_string()))?;

        self.storage.update(workflow).await
    }

    async fn get_required(&self, id: &str) -> Result<Workflow, DomainError> {
        let workflow_id = parse_workflow_id(id)?;
        self.storage
            .get(&workflow_id)
            .await?
            .ok_or_else(|| DomainError::not_found(format!("Workflow '{}' not found", id)))
    }

    /// Validate that a step target resolves to a link owned by the
    /// workflow's team
    async fn validate_target(
        &self,
        workflow: &Workflow,
        target_link_id: &str,
    ) -> Result<LinkId, DomainError> {
        let link_id = parse_link_id(target_link_id)?;

        let link = self.links.get(&link_id).await?.ok_or_else(|| {
            DomainError::validation(format!(
                "Target link '{}' does not exist",
                target_link_id
            ))
        })?;

        if !link.is_owned_by(workflow.team_id()) {
            return Err(DomainError::validation(format!(
                "Target link '{}' is not owned by team '{}'",
                target_link_id,
                workflow.team_id()
            )));
        }

        Ok(link_id)
    }
}

/// Parse and validate a workflow ID supplied from outside
pub(crate) fn parse_workflow_id(id: &str) -> Result<WorkflowId, DomainError> {
    WorkflowId::new(id).map_err(|e| DomainError::invalid_id(e.to_string()))
}

/// Parse and validate a step ID supplied from outside
pub(crate) fn parse_step_id(id: &str) -> Result<StepId, DomainError> {
    StepId::new(id).map_err(|e| DomainError::invalid_id(e.to_string()))
}

fn validate_step_name(name: &str) -> Result<(), DomainError> {
    if name.is_empty() {
        return Err(DomainError::validation("Step name cannot be empty"));
    }

    if name.len() > MAX_STEP_NAME_LENGTH {
        return Err(DomainError::validation(format!(
            "Step name too long (max {} characters)",
            MAX_STEP_NAME_LENGTH
        )));
    }

    Ok(())
}

/// Normalize a condition set at the boundary and validate it
///
/// Values are rebuilt through the condition constructors (lower-cased,
/// trimmed, `@` stripped from domains) so stored data is always canonical,
/// regardless of which client sent it.
fn normalize_conditions(conditions: ConditionSet) -> Result<ConditionSet, DomainError> {
    if conditions.items.is_empty() {
        return Err(DomainError::validation(
            "Step requires at least one email or domain condition",
        ));
    }

    let items: Vec<Condition> = conditions
        .items
        .into_iter()
        .map(|condition| match condition {
            Condition::Email(c) => Condition::Email(EmailCondition::new(c.values)),
            Condition::Domain(c) => Condition::Domain(DomainCondition::new(c.values)),
        })
        .collect();

    for condition in &items {
        condition
            .validate()
            .map_err(|e| DomainError::validation(e.to_string()))?;
    }

    Ok(ConditionSet::new(conditions.logic, items))
}
