//! Domain layer - Core business logic and entities

pub mod error;
pub mod link;
pub mod storage;
pub mod team;
pub mod workflow;

pub use error::DomainError;
pub use link::{AccessPolicy, Link, LinkId, LinkKind, LinkValidationError};
pub use storage::{Storage, StorageEntity, StorageKey};
pub use team::{SubscriptionPlan, Team, TeamId, TeamStatus, TeamValidationError};
pub use workflow::{
    Condition, ConditionLogic, ConditionSet, DomainCondition, EmailCondition, LinkResolver,
    RouteAction, RoutingDecision, StepAction, StepId, Visitor, Workflow, WorkflowError,
    WorkflowId, WorkflowRouter, WorkflowStep,
};
