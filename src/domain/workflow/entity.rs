//! Workflow domain entity

use std::fmt;

use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use super::error::WorkflowError;
use super::step::{StepId, WorkflowStep};
use crate::domain::link::LinkId;
use crate::domain::storage::{StorageEntity, StorageKey};
use crate::domain::team::TeamId;

/// Maximum length for workflow IDs
pub const MAX_ID_LENGTH: usize = 50;

/// Regex pattern for valid workflow IDs: alphanumeric and hyphens
static ID_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-zA-Z0-9][a-zA-Z0-9-]*[a-zA-Z0-9]$|^[a-zA-Z0-9]$").unwrap());

/// Validated workflow identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct WorkflowId(String);

impl WorkflowId {
    /// Create a new validated workflow ID
    pub fn new(id: impl Into<String>) -> Result<Self, WorkflowError> {
        let id = id.into();
        validate_workflow_id(&id)?;
        Ok(Self(id))
    }

    /// Get the ID as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for WorkflowId {
    type Error = WorkflowError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<WorkflowId> for String {
    fn from(id: WorkflowId) -> Self {
        id.0
    }
}

impl fmt::Display for WorkflowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl StorageKey for WorkflowId {
    fn as_str(&self) -> &str {
        &self.0
    }
}

/// Validate a workflow ID string
pub fn validate_workflow_id(id: &str) -> Result<(), WorkflowError> {
    if id.is_empty() {
        return Err(WorkflowError::validation("Workflow ID cannot be empty"));
    }

    if id.len() > MAX_ID_LENGTH {
        return Err(WorkflowError::validation(format!(
            "Workflow ID exceeds maximum length of {} characters",
            MAX_ID_LENGTH
        )));
    }

    if !ID_PATTERN.is_match(id) {
        return Err(WorkflowError::validation(format!(
            "Invalid workflow ID '{}': must be alphanumeric with hyphens, start and end with alphanumeric",
            id
        )));
    }

    Ok(())
}

/// A visitor routing workflow
///
/// Owns an ordered list of steps evaluated against each incoming visitor.
/// The entry link is the stable public-facing URL and never changes after
/// creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Workflow {
    /// Unique workflow identifier
    id: WorkflowId,

    /// Owning team
    team_id: TeamId,

    /// The link visitors originally open
    entry_link_id: LinkId,

    /// Human-readable name
    name: String,

    /// Optional description
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<String>,

    /// Inactive workflows never redirect
    is_active: bool,

    /// Routing steps; evaluation order is step_order ascending
    steps: Vec<WorkflowStep>,

    /// When the workflow was created
    created_at: DateTime<Utc>,

    /// When the workflow was last updated
    updated_at: DateTime<Utc>,
}

impl Workflow {
    /// Create a new active workflow with no steps
    pub fn new(
        id: WorkflowId,
        team_id: TeamId,
        entry_link_id: LinkId,
        name: impl Into<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id,
            team_id,
            entry_link_id,
            name: name.into(),
            description: None,
            is_active: true,
            steps: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    // Builder methods

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_step(mut self, step: WorkflowStep) -> Self {
        self.steps.push(step);
        self
    }

    pub fn with_active(mut self, is_active: bool) -> Self {
        self.is_active = is_active;
        self
    }

    // Getters

    pub fn id(&self) -> &WorkflowId {
        &self.id
    }

    pub fn team_id(&self) -> &TeamId {
        &self.team_id
    }

    pub fn entry_link_id(&self) -> &LinkId {
        &self.entry_link_id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn is_active(&self) -> bool {
        self.is_active
    }

    pub fn steps(&self) -> &[WorkflowStep] {
        &self.steps
    }

    pub fn step_count(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Get a step by ID
    pub fn step(&self, id: &StepId) -> Option<&WorkflowStep> {
        self.steps.iter().find(|s| s.id() == id)
    }

    /// Steps in evaluation order: ascending step_order, ties broken by
    /// creation time (stable sort keeps insertion order beyond that)
    pub fn ordered_steps(&self) -> Vec<&WorkflowStep> {
        let mut ordered: Vec<&WorkflowStep> = self.steps.iter().collect();
        ordered.sort_by_key(|s| (s.step_order(), s.created_at()));
        ordered
    }

    /// The step_order to assign to a newly appended step
    pub fn next_step_order(&self) -> u32 {
        self.steps
            .iter()
            .map(|s| s.step_order() + 1)
            .max()
            .unwrap_or(0)
    }

    // Mutators (update timestamp)

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
        self.touch();
    }

    pub fn set_description(&mut self, description: Option<String>) {
        self.description = description;
        self.touch();
    }

    pub fn set_active(&mut self, is_active: bool) {
        self.is_active = is_active;
        self.touch();
    }

    /// Append a step at the end of the evaluation order
    pub fn add_step(&mut self, step: WorkflowStep) {
        self.steps.push(step);
        self.touch();
    }

    /// Get a mutable step by ID
    pub fn step_mut(&mut self, id: &StepId) -> Option<&mut WorkflowStep> {
        let found = self.steps.iter_mut().find(|s| s.id() == id);
        if found.is_some() {
            self.updated_at = Utc::now();
        }
        found
    }

    /// Remove a step; remaining step_order values are left untouched (gaps
    /// are fine, ordering by value still holds)
    pub fn remove_step(&mut self, id: &StepId) -> bool {
        let before = self.steps.len();
        self.steps.retain(|s| s.id() != id);

        if self.steps.len() != before {
            self.touch();
            true
        } else {
            false
        }
    }

    /// Renumber all steps to the given permutation of step ids
    ///
    /// The permutation must cover exactly the current steps; orders are
    /// rewritten densely (0..n).
    pub fn reorder_steps(&mut self, order: &[StepId]) -> Result<(), WorkflowError> {
        if order.len() != self.steps.len() {
            return Err(WorkflowError::validation(format!(
                "Reorder must list all {} steps, got {}",
                self.steps.len(),
                order.len()
            )));
        }

        for id in order {
            if self.step(id).is_none() {
                return Err(WorkflowError::step_not_found(id.as_str()));
            }
        }

        let mut seen = std::collections::HashSet::new();
        for id in order {
            if !seen.insert(id) {
                return Err(WorkflowError::validation(format!(
                    "Step '{}' listed more than once",
                    id
                )));
            }
        }

        for (position, id) in order.iter().enumerate() {
            if let Some(step) = self.steps.iter_mut().find(|s| s.id() == id) {
                step.set_order(position as u32);
            }
        }

        self.touch();
        Ok(())
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }
}

impl StorageEntity for Workflow {
    type Key = WorkflowId;

    fn key(&self) -> &Self::Key {
        &self.id
    }
}
