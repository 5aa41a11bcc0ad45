//! Deckroom Gateway
//!
//! A document-sharing gateway whose core is the visitor routing workflow
//! engine: prioritized, conditional routing of incoming viewers to target
//! links based on their email identity. Supports:
//! - Teams owning links and workflows
//! - Ordered routing steps with email/domain allow-list conditions
//! - First-match-wins routing with fail-closed defaults
//! - In-memory and PostgreSQL storage backends

pub mod api;
pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;

use std::sync::Arc;

use tracing::{info, warn};

use api::state::AppState;
use domain::storage::Storage;
use domain::workflow::{
    Condition, ConditionLogic, ConditionSet, DomainCondition, EmailCondition, StepAction,
    WorkflowStep,
};
use domain::{
    AccessPolicy, Link, LinkId, LinkKind, SubscriptionPlan, Team, TeamId, Workflow, WorkflowId,
};
use infrastructure::services::{LinkService, TeamService, ViewService, WorkflowService};
use infrastructure::storage::{InMemoryStorage, PostgresStorage, StorageType};

/// Create the application state with all services initialized
pub async fn create_app_state() -> anyhow::Result<AppState> {
    create_app_state_with_config(&AppConfig::default()).await
}

/// Create the application state with custom configuration
pub async fn create_app_state_with_config(config: &AppConfig) -> anyhow::Result<AppState> {
    let storage_backend =
        StorageType::parse(&config.storage.backend).unwrap_or(StorageType::InMemory);

    info!("Storage backend: {:?}", storage_backend);

    let (team_storage, link_storage, workflow_storage): (
        Arc<dyn Storage<Team>>,
        Arc<dyn Storage<Link>>,
        Arc<dyn Storage<Workflow>>,
    ) = match storage_backend {
        StorageType::Postgres => {
            let database_url = config
                .storage
                .database_url
                .clone()
                .or_else(|| std::env::var("DATABASE_URL").ok())
                .ok_or_else(|| {
                    anyhow::anyhow!("DATABASE_URL is required for the postgres storage backend")
                })?;

            info!("Connecting to PostgreSQL...");
            let pool = sqlx::PgPool::connect(&database_url)
                .await
                .map_err(|e| anyhow::anyhow!("Failed to connect to PostgreSQL: {}", e))?;
            info!("PostgreSQL connection established");

            let teams = PostgresStorage::<Team>::new(pool.clone(), "teams");
            teams.ensure_table().await?;
            let links = PostgresStorage::<Link>::new(pool.clone(), "links");
            links.ensure_table().await?;
            let workflows = PostgresStorage::<Workflow>::new(pool, "workflows");
            workflows.ensure_table().await?;

            (Arc::new(teams), Arc::new(links), Arc::new(workflows))
        }
        StorageType::InMemory => {
            info!("Using in-memory storage with demo entities");
            (
                Arc::new(InMemoryStorage::with_entities(default_teams())),
                Arc::new(InMemoryStorage::with_entities(default_links())),
                Arc::new(InMemoryStorage::with_entities(default_workflows())),
            )
        }
    };

    let team_service = Arc::new(TeamService::new(team_storage.clone()));
    let link_service = Arc::new(LinkService::new(link_storage.clone(), team_storage));
    let workflow_service = Arc::new(WorkflowService::new(
        workflow_storage,
        link_storage.clone(),
    ));
    let view_service = Arc::new(ViewService::new(link_storage, workflow_service.clone()));

    let admin_api_key = config
        .auth
        .admin_api_key
        .clone()
        .or_else(|| std::env::var("ADMIN_API_KEY").ok());

    if admin_api_key.is_none() {
        warn!(
            "No admin API key configured (auth.admin_api_key or ADMIN_API_KEY). \
            Admin endpoints are locked."
        );
    }

    Ok(AppState::new(
        team_service,
        link_service,
        workflow_service,
        view_service,
        admin_api_key,
    ))
}

// ============================================================================
// Default Entities
// ============================================================================

fn demo_team_id() -> TeamId {
    TeamId::new("demo-team").unwrap()
}

fn default_teams() -> Vec<Team> {
    vec![Team::new(demo_team_id(), "Demo Team")
        .unwrap()
        .with_description("Seed team for the in-memory backend")
        .with_plan(SubscriptionPlan::Business)]
}

fn default_links() -> Vec<Link> {
    vec![
        Link::new(
            LinkId::new("pitch-deck").unwrap(),
            demo_team_id(),
            "Pitch Deck",
        )
        .unwrap()
        .with_access(AccessPolicy {
            requires_email: true,
            ..Default::default()
        }),
        Link::new(
            LinkId::new("investor-room").unwrap(),
            demo_team_id(),
            "Investor Data Room",
        )
        .unwrap()
        .with_kind(LinkKind::Dataroom)
        .with_access(AccessPolicy {
            requires_email: true,
            requires_nda: true,
            ..Default::default()
        }),
        Link::new(
            LinkId::new("partner-deck").unwrap(),
            demo_team_id(),
            "Partner Deck",
        )
        .unwrap()
        .with_access(AccessPolicy {
            requires_email: true,
            allow_download: true,
            ..Default::default()
        }),
    ]
}

fn default_workflows() -> Vec<Workflow> {
    let workflow = Workflow::new(
        WorkflowId::new("investor-routing").unwrap(),
        demo_team_id(),
        LinkId::new("pitch-deck").unwrap(),
        "Investor Routing",
    )
    .with_description("Routes known investor firms to the data room")
    .with_step(
        WorkflowStep::new(
            "Investor firms",
            ConditionSet::new(
                ConditionLogic::Or,
                vec![Condition::Domain(DomainCondition::new([
                    "sequoia.com",
                    "a16z.com",
                ]))],
            ),
            StepAction::route(LinkId::new("investor-room").unwrap()),
        )
        .with_order(0),
    )
    .with_step(
        WorkflowStep::new(
            "Partner contacts",
            ConditionSet::new(
                ConditionLogic::Or,
                vec![Condition::Email(EmailCondition::new([
                    "partners@example.com",
                ]))],
            ),
            StepAction::route(LinkId::new("partner-deck").unwrap()),
        )
        .with_order(1),
    );

    vec![workflow]
}
