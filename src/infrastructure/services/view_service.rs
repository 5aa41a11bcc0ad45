//! View service - entry resolution for incoming visitors
//!
//! Translates a request for a public entry link into the link that should
//! actually render: the routed target when the entry link's workflow matches
//! the visitor, the entry link itself otherwise. Routing failures are
//! invisible to the visitor; at worst they see the entry link's own content.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::domain::storage::Storage;
use crate::domain::{DomainError, Link, RoutingDecision, Visitor, Workflow, WorkflowId};

use super::link_service::parse_link_id;
use super::workflow_service::WorkflowService;

/// The outcome of resolving an entry link for one visitor
#[derive(Debug, Clone)]
pub struct ResolvedView {
    /// The link to render; its own access rules still apply
    pub link: Link,

    /// The workflow consulted, if the entry link has one
    pub workflow_id: Option<WorkflowId>,

    /// The routing decision that produced this view
    pub decision: RoutingDecision,
}

impl ResolvedView {
    /// Whether the visitor was routed away from the entry link
    pub fn is_routed(&self) -> bool {
        self.decision.is_match()
    }
}

/// Entry resolution service
pub struct ViewService {
    links: Arc<dyn Storage<Link>>,
    workflows: Arc<WorkflowService>,
}

impl std::fmt::Debug for ViewService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ViewService").finish()
    }
}

impl ViewService {
    pub fn new(links: Arc<dyn Storage<Link>>, workflows: Arc<WorkflowService>) -> Self {
        Self { links, workflows }
    }

    /// Resolve the link a visitor should see when opening an entry link
    pub async fn resolve_view(
        &self,
        entry_link_id: &str,
        email: Option<&str>,
    ) -> Result<ResolvedView, DomainError> {
        let entry_link_id = parse_link_id(entry_link_id)?;

        let entry_link = self
            .links
            .get(&entry_link_id)
            .await?
            .filter(|l| l.is_enabled())
            .ok_or_else(|| {
                DomainError::not_found(format!("Link '{}' not found", entry_link_id))
            })?;

        let Some(workflow) = self.workflows.find_by_entry_link(&entry_link_id).await? else {
            return Ok(ResolvedView {
                link: entry_link,
                workflow_id: None,
                decision: RoutingDecision::NoMatch,
            });
        };

        let visitor = Visitor::from_email(email);
        let decision = self.workflows.route_workflow(&workflow, &visitor).await?;

        let Some(target_id) = decision.target_link_id().cloned() else {
            return Ok(ResolvedView {
                link: entry_link,
                workflow_id: Some(workflow.id().clone()),
                decision,
            });
        };

        debug!(
            workflow_id = %workflow.id(),
            target_link_id = %target_id,
            "Visitor routed"
        );

        match self.links.get(&target_id).await? {
            Some(target) => Ok(ResolvedView {
                link: target,
                workflow_id: Some(workflow.id().clone()),
                decision,
            }),
            // The target vanished between the routing decision and this
            // fetch; fall back to the entry link.
            None => {
                warn!(
                    workflow_id = %workflow.id(),
                    target_link_id = %target_id,
                    "Routed target disappeared; serving entry link"
                );
                Ok(ResolvedView {
                    link: entry_link,
                    workflow_id: Some(workflow.id().clone()),
                    decision: RoutingDecision::NoMatch,
                })
            }
        }
    }

    /// The workflow consulted for an entry link, if any (admin/debug surface)
    pub async fn workflow_for_link(
        &self,
        entry_link_id: &str,
    ) -> Result<Option<Workflow>, DomainError> {
        let entry_link_id = parse_link_id(entry_link_id)?;
        self.workflows.find_by_entry_link(&entry_link_id).await
    }
}
