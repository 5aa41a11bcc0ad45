//! Link service - CRUD operations and team-scoped resolution for links

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::storage::Storage;
use crate::domain::workflow::LinkResolver;
use crate::domain::{AccessPolicy, DomainError, Link, LinkId, LinkKind, Team, TeamId};

use super::team_service::parse_team_id;

/// Request to create a new link
#[derive(Debug, Clone)]
pub struct CreateLinkRequest {
    pub id: String,
    pub team_id: String,
    pub name: String,
    pub kind: LinkKind,
    pub access: AccessPolicy,
    pub enabled: bool,
}

impl CreateLinkRequest {
    pub fn new(
        id: impl Into<String>,
        team_id: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            team_id: team_id.into(),
            name: name.into(),
            kind: LinkKind::default(),
            access: AccessPolicy::default(),
            enabled: true,
        }
    }

    pub fn with_kind(mut self, kind: LinkKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn with_access(mut self, access: AccessPolicy) -> Self {
        self.access = access;
        self
    }

    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }
}

/// Request to update an existing link
#[derive(Debug, Clone, Default)]
pub struct UpdateLinkRequest {
    pub name: Option<String>,
    pub access: Option<AccessPolicy>,
    pub enabled: Option<bool>,
}

impl UpdateLinkRequest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_access(mut self, access: AccessPolicy) -> Self {
        self.access = Some(access);
        self
    }

    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = Some(enabled);
        self
    }
}

/// Link service for CRUD operations
pub struct LinkService {
    storage: Arc<dyn Storage<Link>>,
    teams: Arc<dyn Storage<Team>>,
}

impl std::fmt::Debug for LinkService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LinkService").finish()
    }
}

impl LinkService {
    pub fn new(storage: Arc<dyn Storage<Link>>, teams: Arc<dyn Storage<Team>>) -> Self {
        Self { storage, teams }
    }

    /// Get a link by ID
    pub async fn get(&self, id: &str) -> Result<Option<Link>, DomainError> {
        let link_id = parse_link_id(id)?;
        self.storage.get(&link_id).await
    }

    /// List all links
    pub async fn list(&self) -> Result<Vec<Link>, DomainError> {
        self.storage.list().await
    }

    /// List links owned by a team
    pub async fn list_by_team(&self, team_id: &str) -> Result<Vec<Link>, DomainError> {
        let team_id = parse_team_id(team_id)?;
        let links = self.storage.list().await?;
        Ok(links
            .into_iter()
            .filter(|l| l.is_owned_by(&team_id))
            .collect())
    }

    /// Create a new link
    pub async fn create(&self, request: CreateLinkRequest) -> Result<Link, DomainError> {
        let link_id = parse_link_id(&request.id)?;
        let team_id = parse_team_id(&request.team_id)?;

        if !self.teams.exists(&team_id).await? {
            return Err(DomainError::not_found(format!(
                "Team '{}' not found",
                request.team_id
            )));
        }

        if self.storage.exists(&link_id).await? {
            return Err(DomainError::conflict(format!(
                "Link '{}' already exists",
                request.id
            )));
        }

        let link = Link::new(link_id, team_id, request.name)
            .map_err(|e| DomainError::validation(e.to_string()))?
            .with_kind(request.kind)
            .with_access(request.access)
            .with_enabled(request.enabled);

        self.storage.create(link).await
    }

    /// Update an existing link
    pub async fn update(&self, id: &str, request: UpdateLinkRequest) -> Result<Link, DomainError> {
        let link_id = parse_link_id(id)?;

        let mut link = self
            .storage
            .get(&link_id)
            .await?
            .ok_or_else(|| DomainError::not_found(format!("Link '{}' not found", id)))?;

        if let Some(name) = request.name {
            link.set_name(name)
                .map_err(|e| DomainError::validation(e.to_string()))?;
        }

        if let Some(access) = request.access {
            link.set_access(access);
        }

        if let Some(enabled) = request.enabled {
            link.set_enabled(enabled);
        }

        self.storage.update(link).await
    }

    /// Delete a link
    pub async fn delete(&self, id: &str) -> Result<bool, DomainError> {
        let link_id = parse_link_id(id)?;
        self.storage.delete(&link_id).await
    }
}

/// Parse and validate a link ID supplied from outside
pub(crate) fn parse_link_id(id: &str) -> Result<LinkId, DomainError> {
    LinkId::new(id).map_err(|e| DomainError::invalid_id(e.to_string()))
}

/// Storage-backed resolver handed to the workflow router
pub struct StorageLinkResolver {
    storage: Arc<dyn Storage<Link>>,
}

impl StorageLinkResolver {
    pub fn new(storage: Arc<dyn Storage<Link>>) -> Self {
        Self { storage }
    }
}

#[async_trait]
impl LinkResolver for StorageLinkResolver {
    async fn resolve(
        &self,
        link_id: &LinkId,
        team_id: &TeamId,
    ) -> Result<Option<Link>, DomainError> {
        Ok(self
            .storage
            .get(link_id)
            .await?
            .filter(|link| link.is_owned_by(team_id)))
    }
}
