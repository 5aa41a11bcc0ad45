//! Team service - CRUD operations for teams

use std::sync::Arc;

use crate::domain::storage::Storage;
use crate::domain::{DomainError, SubscriptionPlan, Team, TeamId};

/// Request to create a new team
#[derive(Debug, Clone)]
pub struct CreateTeamRequest {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub plan: SubscriptionPlan,
}

impl CreateTeamRequest {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: None,
            plan: SubscriptionPlan::default(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_plan(mut self, plan: SubscriptionPlan) -> Self {
        self.plan = plan;
        self
    }
}

/// Request to update an existing team
#[derive(Debug, Clone, Default)]
pub struct UpdateTeamRequest {
    pub name: Option<String>,
    pub description: Option<Option<String>>,
    pub plan: Option<SubscriptionPlan>,
}

impl UpdateTeamRequest {
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

    pub fn with_plan(mut self, plan: SubscriptionPlan) -> Self {
        self.plan = Some(plan);
        self
    }
}

/// Team service for CRUD operations
pub struct TeamService {
    storage: Arc<dyn Storage<Team>>,
}

impl std::fmt::Debug for TeamService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TeamService").finish()
    }
}

impl TeamService {
    pub fn new(storage: Arc<dyn Storage<Team>>) -> Self {
        Self { storage }
    }

    /// Get a team by ID
    pub async fn get(&self, id: &str) -> Result<Option<Team>, DomainError> {
        let team_id = parse_team_id(id)?;
        self.storage.get(&team_id).await
    }

    /// List all teams
    pub async fn list(&self) -> Result<Vec<Team>, DomainError> {
        self.storage.list().await
    }

    /// Create a new team
    pub async fn create(&self, request: CreateTeamRequest) -> Result<Team, DomainError> {
        let team_id = parse_team_id(&request.id)?;

        if self.storage.exists(&team_id).await? {
            return Err(DomainError::conflict(format!(
                "Team '{}' already exists",
                request.id
            )));
        }

        let mut team = Team::new(team_id, request.name)
            .map_err(|e| DomainError::validation(e.to_string()))?
            .with_plan(request.plan);

        if let Some(description) = request.description {
            team = team.with_description(description);
        }

        self.storage.create(team).await
    }

    /// Update an existing team
    pub async fn update(&self, id: &str, request: UpdateTeamRequest) -> Result<Team, DomainError> {
        let team_id = parse_team_id(id)?;

        let mut team = self
            .storage
            .get(&team_id)
            .await?
            .ok_or_else(|| DomainError::not_found(format!("Team '{}' not found", id)))?;

        if let Some(name) = request.name {
            team.set_name(name)
                .map_err(|e| DomainError::validation(e.to_string()))?;
        }

        if let Some(description) = request.description {
            team.set_description(description);
        }

        if let Some(plan) = request.plan {
            team.set_plan(plan);
        }

        self.storage.update(team).await
    }

    /// Delete a team
    pub async fn delete(&self, id: &str) -> Result<bool, DomainError> {
        let team_id = parse_team_id(id)?;
        self.storage.delete(&team_id).await
    }
}

/// Parse and validate a team ID supplied from outside
pub(crate) fn parse_team_id(id: &str) -> Result<TeamId, DomainError> {
    TeamId::new(id).map_err(|e| DomainError::invalid_id(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::storage::mock::MockStorage;

    fn service() -> TeamService {
        TeamService::new(Arc::new(MockStorage::<Team>::new()))
    }

    fn service_with(team: Team) -> TeamService {
        TeamService::new(Arc::new(MockStorage::<Team>::new().with_entity(team)))
    }

    fn team(id: &str) -> Team {
        Team::new(TeamId::new(id).unwrap(), format!("Team {}", id)).unwrap()
    }

    #[tokio::test]
    async fn test_create_team() {
        let service = service();

        let request = CreateTeamRequest::new("acme", "Acme Corp")
            .with_description("A test team")
            .with_plan(SubscriptionPlan::Business);

        let created = service.create(request).await.unwrap();

        assert_eq!(created.id().as_str(), "acme");
        assert_eq!(created.description(), Some("A test team"));
        assert_eq!(created.plan(), SubscriptionPlan::Business);
    }

    #[tokio::test]
    async fn test_create_duplicate() {
        let service = service_with(team("acme"));

        let result = service.create(CreateTeamRequest::new("acme", "Again")).await;
        assert!(result.unwrap_err().to_string().contains("already exists"));
    }

    #[tokio::test]
    async fn test_create_invalid_id() {
        let service = service();

        let result = service.create(CreateTeamRequest::new("-bad-", "Bad")).await;
        assert!(matches!(result, Err(DomainError::InvalidId { .. })));
    }

    #[tokio::test]
    async fn test_get_and_list() {
        let service = service_with(team("acme"));

        assert!(service.get("acme").await.unwrap().is_some());
        assert!(service.get("other").await.unwrap().is_none());
        assert_eq!(service.list().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_update_team() {
        let service = service_with(team("acme"));

        let updated = service
            .update(
                "acme",
                UpdateTeamRequest::new()
                    .with_name("Renamed")
                    .with_plan(SubscriptionPlan::Datarooms),
            )
            .await
            .unwrap();

        assert_eq!(updated.name(), "Renamed");
        assert_eq!(updated.plan(), SubscriptionPlan::Datarooms);
    }

    #[tokio::test]
    async fn test_update_not_found() {
        let service = service();

        let result = service
            .update("ghost", UpdateTeamRequest::new().with_name("X"))
            .await;
        assert!(result.unwrap_err().to_string().contains("not found"));
    }

    #[tokio::test]
    async fn test_delete_team() {
        let service = service_with(team("acme"));

        assert!(service.delete("acme").await.unwrap());
        assert!(!service.delete("acme").await.unwrap());
    }
}
