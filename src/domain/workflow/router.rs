//! Workflow router - first-match-wins routing decisions
//!
//! Evaluation is pure over already-fetched data: no locks, no retries, no
//! shared mutable state. Concurrent visitors route independently.

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::warn;

use super::entity::Workflow;
use super::step::StepId;
use super::visitor::Visitor;
use crate::domain::link::{Link, LinkId};
use crate::domain::team::TeamId;
use crate::domain::DomainError;

/// Resolves a step's target link, scoped to the owning team
///
/// Returns `None` when the link does not exist or belongs to another team.
/// Ownership is re-checked here even though step creation validates it: a
/// link's team can change after the step was saved.
#[async_trait]
pub trait LinkResolver: Send + Sync {
    async fn resolve(
        &self,
        link_id: &LinkId,
        team_id: &TeamId,
    ) -> Result<Option<Link>, DomainError>;
}

/// The outcome of routing one visitor through a workflow
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum RoutingDecision {
    /// A step matched; the visitor is sent to its target link
    Matched {
        step_id: StepId,
        step_name: String,
        target_link_id: LinkId,
    },

    /// No step matched; the entry link serves its own default content
    NoMatch,
}

impl RoutingDecision {
    pub fn is_match(&self) -> bool {
        matches!(self, Self::Matched { .. })
    }

    /// The target link, when a step matched
    pub fn target_link_id(&self) -> Option<&LinkId> {
        match self {
            Self::Matched { target_link_id, .. } => Some(target_link_id),
            Self::NoMatch => None,
        }
    }
}

/// Routes visitors through a workflow's prioritized step list
pub struct WorkflowRouter {
    links: Arc<dyn LinkResolver>,
}

impl std::fmt::Debug for WorkflowRouter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WorkflowRouter").finish()
    }
}

impl WorkflowRouter {
    pub fn new(links: Arc<dyn LinkResolver>) -> Self {
        Self { links }
    }

    /// Produce a routing decision for one visitor
    ///
    /// Steps run in ascending step_order; the first whose conditions match
    /// wins. A matching step whose target no longer resolves (deleted,
    /// disabled, or moved to another team) is skipped so a single broken step
    /// cannot break routing for all visitors.
    pub async fn route(
        &self,
        workflow: &Workflow,
        visitor: &Visitor,
    ) -> Result<RoutingDecision, DomainError> {
        if !workflow.is_active() {
            return Ok(RoutingDecision::NoMatch);
        }

        for step in workflow.ordered_steps() {
            if !step.conditions().matches(visitor) {
                continue;
            }

            let target_id = step.action().target_link_id();

            match self.links.resolve(target_id, workflow.team_id()).await? {
                Some(link) if link.is_enabled() => {
                    return Ok(RoutingDecision::Matched {
                        step_id: step.id().clone(),
                        step_name: step.name().to_string(),
                        target_link_id: target_id.clone(),
                    });
                }
                Some(_) => {
                    warn!(
                        workflow_id = %workflow.id(),
                        step_id = %step.id(),
                        target_link_id = %target_id,
                        "Routing step targets a disabled link; skipping"
                    );
                }
                None => {
                    warn!(
                        workflow_id = %workflow.id(),
                        step_id = %step.id(),
                        target_link_id = %target_id,
                        "Routing step targets an unresolvable link; skipping"
                    );
                }
            }
        }

        Ok(RoutingDecision::NoMatch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::link::LinkId;
    use crate::domain::workflow::entity::WorkflowId;
    use crate::domain::workflow::step::{
        Condition, ConditionLogic, ConditionSet, DomainCondition, EmailCondition, StepAction,
        WorkflowStep,
    };
    use std::collections::HashMap;

    /// Map-backed resolver mirroring the production lookup: id match plus
    /// team ownership.
    struct MapResolver {
        links: HashMap<String, Link>,
    }

    impl MapResolver {
        fn new(links: Vec<Link>) -> Arc<Self> {
            Arc::new(Self {
                links: links
                    .into_iter()
                    .map(|l| (l.id().as_str().to_string(), l))
                    .collect(),
            })
        }
    }

    #[async_trait]
    impl LinkResolver for MapResolver {
        async fn resolve(
            &self,
            link_id: &LinkId,
            team_id: &TeamId,
        ) -> Result<Option<Link>, DomainError> {
            Ok(self
                .links
                .get(link_id.as_str())
                .filter(|l| l.is_owned_by(team_id))
                .cloned())
        }
    }

    fn team() -> TeamId {
        TeamId::new("acme").unwrap()
    }

    fn link(id: &str) -> Link {
        Link::new(LinkId::new(id).unwrap(), team(), format!("Link {}", id)).unwrap()
    }

    fn domain_step(name: &str, order: u32, domain: &str, target: &str) -> WorkflowStep {
        WorkflowStep::new(
            name,
            ConditionSet::new(
                ConditionLogic::Or,
                vec![Condition::Domain(DomainCondition::new([domain]))],
            ),
            StepAction::route(LinkId::new(target).unwrap()),
        )
        .with_order(order)
    }

    fn email_step(name: &str, order: u32, email: &str, target: &str) -> WorkflowStep {
        WorkflowStep::new(
            name,
            ConditionSet::new(
                ConditionLogic::Or,
                vec![Condition::Email(EmailCondition::new([email]))],
            ),
            StepAction::route(LinkId::new(target).unwrap()),
        )
        .with_order(order)
    }

    fn workflow_with(steps: Vec<WorkflowStep>) -> Workflow {
        let mut workflow = Workflow::new(
            WorkflowId::new("routing").unwrap(),
            team(),
            LinkId::new("entry").unwrap(),
            "Routing",
        );
        for step in steps {
            workflow.add_step(step);
        }
        workflow
    }

    #[tokio::test]
    async fn test_first_match_wins() {
        // Both steps match the visitor; the lower step_order must win.
        let workflow = workflow_with(vec![
            domain_step("A", 0, "acme.com", "deck-a"),
            domain_step("B", 1, "acme.com", "deck-b"),
        ]);
        let router = WorkflowRouter::new(MapResolver::new(vec![link("deck-a"), link("deck-b")]));

        let decision = router
            .route(&workflow, &Visitor::from_email(Some("jane@acme.com")))
            .await
            .unwrap();

        assert_eq!(decision.target_link_id().unwrap().as_str(), "deck-a");
    }

    #[tokio::test]
    async fn test_routing_is_deterministic() {
        let workflow = workflow_with(vec![
            domain_step("A", 0, "acme.com", "deck-a"),
            email_step("B", 1, "vip@guest.com", "deck-b"),
        ]);
        let router = WorkflowRouter::new(MapResolver::new(vec![link("deck-a"), link("deck-b")]));
        let visitor = Visitor::from_email(Some("jane@acme.com"));

        let first = router.route(&workflow, &visitor).await.unwrap();
        for _ in 0..10 {
            let again = router.route(&workflow, &visitor).await.unwrap();
            assert_eq!(first, again);
        }
    }

    #[tokio::test]
    async fn test_example_scenario() {
        // Step A routes the company-a.com domain, step B a single VIP email.
        let workflow = workflow_with(vec![
            domain_step("A", 0, "company-a.com", "link-a"),
            email_step("B", 1, "vip@guest.com", "link-b"),
        ]);
        let router = WorkflowRouter::new(MapResolver::new(vec![link("link-a"), link("link-b")]));

        let alice = router
            .route(&workflow, &Visitor::from_email(Some("alice@company-a.com")))
            .await
            .unwrap();
        assert_eq!(alice.target_link_id().unwrap().as_str(), "link-a");

        let vip = router
            .route(&workflow, &Visitor::from_email(Some("vip@guest.com")))
            .await
            .unwrap();
        assert_eq!(vip.target_link_id().unwrap().as_str(), "link-b");

        let bob = router
            .route(&workflow, &Visitor::from_email(Some("bob@other.com")))
            .await
            .unwrap();
        assert_eq!(bob, RoutingDecision::NoMatch);

        let anonymous = router.route(&workflow, &Visitor::anonymous()).await.unwrap();
        assert_eq!(anonymous, RoutingDecision::NoMatch);
    }

    #[tokio::test]
    async fn test_inactive_workflow_short_circuits() {
        let workflow = workflow_with(vec![domain_step("A", 0, "acme.com", "deck-a")])
            .with_active(false);
        let router = WorkflowRouter::new(MapResolver::new(vec![link("deck-a")]));

        let decision = router
            .route(&workflow, &Visitor::from_email(Some("jane@acme.com")))
            .await
            .unwrap();

        assert_eq!(decision, RoutingDecision::NoMatch);
    }

    #[tokio::test]
    async fn test_empty_conditions_never_match() {
        let step = WorkflowStep::new(
            "Empty",
            ConditionSet::new(ConditionLogic::Or, vec![]),
            StepAction::route(LinkId::new("deck-a").unwrap()),
        );
        let workflow = workflow_with(vec![step]);
        let router = WorkflowRouter::new(MapResolver::new(vec![link("deck-a")]));

        let decision = router
            .route(&workflow, &Visitor::from_email(Some("jane@acme.com")))
            .await
            .unwrap();

        assert_eq!(decision, RoutingDecision::NoMatch);
    }

    #[tokio::test]
    async fn test_broken_target_is_skipped() {
        // Step A matches but its target was deleted; step B must win.
        let workflow = workflow_with(vec![
            domain_step("A", 0, "acme.com", "deleted-link"),
            domain_step("B", 1, "acme.com", "deck-b"),
        ]);
        let router = WorkflowRouter::new(MapResolver::new(vec![link("deck-b")]));

        let decision = router
            .route(&workflow, &Visitor::from_email(Some("jane@acme.com")))
            .await
            .unwrap();

        assert_eq!(decision.target_link_id().unwrap().as_str(), "deck-b");
    }

    #[tokio::test]
    async fn test_disabled_target_is_skipped() {
        let disabled = link("deck-a").with_enabled(false);
        let workflow = workflow_with(vec![
            domain_step("A", 0, "acme.com", "deck-a"),
            domain_step("B", 1, "acme.com", "deck-b"),
        ]);
        let router = WorkflowRouter::new(MapResolver::new(vec![disabled, link("deck-b")]));

        let decision = router
            .route(&workflow, &Visitor::from_email(Some("jane@acme.com")))
            .await
            .unwrap();

        assert_eq!(decision.target_link_id().unwrap().as_str(), "deck-b");
    }

    #[tokio::test]
    async fn test_cross_team_target_is_skipped() {
        let foreign = Link::new(
            LinkId::new("deck-a").unwrap(),
            TeamId::new("rival").unwrap(),
            "Rival Deck",
        )
        .unwrap();
        let workflow = workflow_with(vec![
            domain_step("A", 0, "acme.com", "deck-a"),
            domain_step("B", 1, "acme.com", "deck-b"),
        ]);
        let router = WorkflowRouter::new(MapResolver::new(vec![foreign, link("deck-b")]));

        let decision = router
            .route(&workflow, &Visitor::from_email(Some("jane@acme.com")))
            .await
            .unwrap();

        assert_eq!(decision.target_link_id().unwrap().as_str(), "deck-b");
    }

    #[tokio::test]
    async fn test_mixed_conditions_under_or_match_on_domain_alone() {
        // One step with both an email and a domain item under OR: a visitor
        // matching only the domain item still routes.
        let step = WorkflowStep::new(
            "Mixed",
            ConditionSet::new(
                ConditionLogic::Or,
                vec![
                    Condition::Email(EmailCondition::new(["vip@guest.com"])),
                    Condition::Domain(DomainCondition::new(["acme.com"])),
                ],
            ),
            StepAction::route(LinkId::new("deck-a").unwrap()),
        );
        let workflow = workflow_with(vec![step]);
        let router = WorkflowRouter::new(MapResolver::new(vec![link("deck-a")]));

        let decision = router
            .route(&workflow, &Visitor::from_email(Some("someone@acme.com")))
            .await
            .unwrap();

        assert!(decision.is_match());
    }

    #[tokio::test]
    async fn test_domain_matching_is_case_insensitive() {
        let workflow = workflow_with(vec![domain_step("A", 0, "acme.com", "deck-a")]);
        let router = WorkflowRouter::new(MapResolver::new(vec![link("deck-a")]));

        let matched = router
            .route(&workflow, &Visitor::from_email(Some("Jane@ACME.com")))
            .await
            .unwrap();
        assert!(matched.is_match());

        let missed = router
            .route(&workflow, &Visitor::from_email(Some("jane@notacme.com")))
            .await
            .unwrap();
        assert_eq!(missed, RoutingDecision::NoMatch);
    }

    #[tokio::test]
    async fn test_duplicate_order_resolved_by_creation_time() {
        let older = domain_step("Older", 1, "acme.com", "deck-a");
        std::thread::sleep(std::time::Duration::from_millis(5));
        let newer = domain_step("Newer", 1, "acme.com", "deck-b");

        // Insertion order reversed; creation time must still decide.
        let workflow = workflow_with(vec![newer, older]);
        let router = WorkflowRouter::new(MapResolver::new(vec![link("deck-a"), link("deck-b")]));

        let decision = router
            .route(&workflow, &Visitor::from_email(Some("jane@acme.com")))
            .await
            .unwrap();

        assert_eq!(decision.target_link_id().unwrap().as_str(), "deck-a");
    }

    #[test]
    fn test_decision_serialization() {
        let decision = RoutingDecision::Matched {
            step_id: StepId::generate(),
            step_name: "A".to_string(),
            target_link_id: LinkId::new("deck-a").unwrap(),
        };

        let json = serde_json::to_string(&decision).unwrap();
        assert!(json.contains("\"outcome\":\"matched\""));
        assert!(json.contains("\"target_link_id\":\"deck-a\""));

        let json = serde_json::to_string(&RoutingDecision::NoMatch).unwrap();
        assert!(json.contains("\"outcome\":\"no_match\""));
    }
}
