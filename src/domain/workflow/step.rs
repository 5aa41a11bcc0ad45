//! Workflow step, condition and action types
//!
//! Conditions and actions are closed tagged unions, validated and normalized
//! at the service boundary so routing never branches on unknown shapes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

use super::error::WorkflowError;
use super::visitor::Visitor;
use crate::domain::link::LinkId;

/// Step identifier - a UUID assigned at creation
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct StepId(String);

impl StepId {
    /// Generate a fresh step ID
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Parse and validate a step ID supplied from outside
    pub fn new(id: impl Into<String>) -> Result<Self, WorkflowError> {
        let id = id.into();
        Uuid::parse_str(&id)
            .map_err(|_| WorkflowError::validation(format!("Invalid step ID '{}'", id)))?;
        Ok(Self(id))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for StepId {
    type Error = WorkflowError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<StepId> for String {
    fn from(id: StepId) -> Self {
        id.0
    }
}

impl std::fmt::Display for StepId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// How the items of a condition set combine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum ConditionLogic {
    /// Every item must match
    And,
    /// At least one item must match
    #[default]
    Or,
}

/// Accepts either a single string or a list of strings
///
/// Older clients stored singleton values as a bare string; both shapes decode
/// to a list.
fn one_or_many<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany {
        One(String),
        Many(Vec<String>),
    }

    Ok(match OneOrMany::deserialize(deserializer)? {
        OneOrMany::One(value) => vec![value],
        OneOrMany::Many(values) => values,
    })
}

/// Email allow-list condition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailCondition {
    /// Full email addresses, stored lower-cased
    #[serde(alias = "value", deserialize_with = "one_or_many")]
    pub values: Vec<String>,
}

impl EmailCondition {
    /// Build a normalized email condition: entries trimmed and lower-cased,
    /// blanks dropped
    pub fn new(values: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            values: normalize_values(values, false),
        }
    }

    fn matches(&self, visitor: &Visitor) -> bool {
        match visitor.email() {
            Some(email) => self.values.iter().any(|v| v == email),
            None => false,
        }
    }
}

/// Domain allow-list condition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DomainCondition {
    /// Bare domains without the `@` prefix, stored lower-cased
    #[serde(alias = "value", deserialize_with = "one_or_many")]
    pub values: Vec<String>,
}

impl DomainCondition {
    /// Build a normalized domain condition: entries trimmed, lower-cased and
    /// stripped of any leading `@` (a presentation-layer convention), blanks
    /// dropped
    pub fn new(values: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            values: normalize_values(values, true),
        }
    }

    fn matches(&self, visitor: &Visitor) -> bool {
        match visitor.domain() {
            Some(domain) => self.values.iter().any(|v| v == domain),
            None => false,
        }
    }
}

fn normalize_values(
    values: impl IntoIterator<Item = impl Into<String>>,
    strip_at_prefix: bool,
) -> Vec<String> {
    values
        .into_iter()
        .map(|v| {
            let v = v.into().trim().to_lowercase();
            if strip_at_prefix {
                v.trim_start_matches('@').to_string()
            } else {
                v
            }
        })
        .filter(|v| !v.is_empty())
        .collect()
}

/// A single routing condition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Condition {
    /// Match the visitor's full email address against an allow-list
    Email(EmailCondition),

    /// Match the visitor's email domain against an allow-list
    Domain(DomainCondition),
}

impl Condition {
    /// Evaluate against a visitor; absent identity never matches
    pub fn matches(&self, visitor: &Visitor) -> bool {
        match self {
            Self::Email(c) => c.matches(visitor),
            Self::Domain(c) => c.matches(visitor),
        }
    }

    /// Validate a condition before it is persisted
    pub fn validate(&self) -> Result<(), WorkflowError> {
        match self {
            Self::Email(c) => {
                if c.values.is_empty() {
                    return Err(WorkflowError::validation(
                        "Email condition requires at least one address",
                    ));
                }
                for value in &c.values {
                    if !value.contains('@') {
                        return Err(WorkflowError::validation(format!(
                            "'{}' is not a valid email address",
                            value
                        )));
                    }
                }
            }
            Self::Domain(c) => {
                if c.values.is_empty() {
                    return Err(WorkflowError::validation(
                        "Domain condition requires at least one domain",
                    ));
                }
                for value in &c.values {
                    if value.contains('@') || !value.contains('.') {
                        return Err(WorkflowError::validation(format!(
                            "'{}' is not a valid domain",
                            value
                        )));
                    }
                }
            }
        }

        Ok(())
    }
}

/// The condition set of a step
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConditionSet {
    #[serde(default)]
    pub logic: ConditionLogic,

    #[serde(default)]
    pub items: Vec<Condition>,
}

impl ConditionSet {
    pub fn new(logic: ConditionLogic, items: Vec<Condition>) -> Self {
        Self { logic, items }
    }

    /// Evaluate the whole set against a visitor
    ///
    /// An empty set never matches, regardless of logic: a step saved without
    /// actionable conditions must not route everyone.
    pub fn matches(&self, visitor: &Visitor) -> bool {
        if self.items.is_empty() {
            return false;
        }

        match self.logic {
            ConditionLogic::And => self.items.iter().all(|c| c.matches(visitor)),
            ConditionLogic::Or => self.items.iter().any(|c| c.matches(visitor)),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Route the visitor to a different link
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteAction {
    /// The link matching visitors are sent to
    pub target_link_id: LinkId,
}

/// What a matched step does
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StepAction {
    Route(RouteAction),
}

impl StepAction {
    pub fn route(target_link_id: LinkId) -> Self {
        Self::Route(RouteAction { target_link_id })
    }

    /// The link this action targets
    pub fn target_link_id(&self) -> &LinkId {
        match self {
            Self::Route(action) => &action.target_link_id,
        }
    }
}

/// A single step in a routing workflow
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkflowStep {
    /// Unique step identifier
    id: StepId,

    /// Human-readable name
    name: String,

    /// Evaluation priority; lower runs first
    step_order: u32,

    /// Conditions a visitor must satisfy
    conditions: ConditionSet,

    /// Action taken when the conditions match
    action: StepAction,

    /// When the step was created (tie-break for equal step_order)
    created_at: DateTime<Utc>,
}

impl WorkflowStep {
    /// Create a new step with a generated ID and order 0
    pub fn new(name: impl Into<String>, conditions: ConditionSet, action: StepAction) -> Self {
        Self {
            id: StepId::generate(),
            name: name.into(),
            step_order: 0,
            conditions,
            action,
            created_at: Utc::now(),
        }
    }

    /// Set the evaluation priority
    pub fn with_order(mut self, step_order: u32) -> Self {
        self.step_order = step_order;
        self
    }

    // Getters

    pub fn id(&self) -> &StepId {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn step_order(&self) -> u32 {
        self.step_order
    }

    pub fn conditions(&self) -> &ConditionSet {
        &self.conditions
    }

    pub fn action(&self) -> &StepAction {
        &self.action
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    // Mutators

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn set_conditions(&mut self, conditions: ConditionSet) {
        self.conditions = conditions;
    }

    pub fn set_action(&mut self, action: StepAction) {
        self.action = action;
    }

    pub fn set_order(&mut self, step_order: u32) {
        self.step_order = step_order;
    }
}
