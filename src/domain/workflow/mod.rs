//! Workflow domain - visitor routing workflows
//!
//! A workflow owns an ordered list of steps. Each step pairs a condition set
//! (email/domain allow-lists) with a route action pointing at a target link.
//! The router evaluates steps in priority order against a visitor's identity
//! and picks the first match.

mod entity;
mod error;
mod router;
mod step;
mod visitor;

pub use entity::{validate_workflow_id, Workflow, WorkflowId};
pub use error::WorkflowError;
pub use router::{LinkResolver, RoutingDecision, WorkflowRouter};
pub use step::{
    Condition, ConditionLogic, ConditionSet, DomainCondition, EmailCondition, RouteAction,
    StepAction, StepId, WorkflowStep,
};
pub use visitor::Visitor;
