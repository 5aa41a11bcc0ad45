//! Link entity and access policy

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::validation::{validate_link_id, validate_link_name, LinkValidationError};
use crate::domain::storage::{StorageEntity, StorageKey};
use crate::domain::team::TeamId;

/// Link identifier - alphanumeric + hyphens, max 50 characters
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct LinkId(String);

impl LinkId {
    /// Create a new LinkId after validation
    pub fn new(id: impl Into<String>) -> Result<Self, LinkValidationError> {
        let id = id.into();
        validate_link_id(&id)?;
        Ok(Self(id))
    }

    /// Get the inner string value
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for LinkId {
    type Error = LinkValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<LinkId> for String {
    fn from(id: LinkId) -> Self {
        id.0
    }
}

impl std::fmt::Display for LinkId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl StorageKey for LinkId {
    fn as_str(&self) -> &str {
        &self.0
    }
}

/// What a link points at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum LinkKind {
    /// A single shared document
    #[default]
    Document,
    /// A data room with multiple documents
    Dataroom,
}

/// Access requirements a link enforces on its visitors
///
/// Routing selects *which* link's policy applies; it never bypasses the
/// policy itself. The presentation layer enforces these.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct AccessPolicy {
    /// Visitor must supply a password
    #[serde(default)]
    pub password_protected: bool,

    /// Visitor must identify with an email address
    #[serde(default)]
    pub requires_email: bool,

    /// Visitor must accept an NDA before viewing
    #[serde(default)]
    pub requires_nda: bool,

    /// Visitor may download the underlying file(s)
    #[serde(default)]
    pub allow_download: bool,
}

/// A shareable link owned by a team
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Link {
    /// Unique link identifier (public-facing URL slug)
    id: LinkId,

    /// Owning team
    team_id: TeamId,

    /// Human-readable name
    name: String,

    /// Document or data room
    #[serde(default)]
    kind: LinkKind,

    /// Access requirements enforced when this link is rendered
    #[serde(default)]
    access: AccessPolicy,

    /// Disabled links never render content
    enabled: bool,

    /// When the link was created
    created_at: DateTime<Utc>,

    /// When the link was last updated
    updated_at: DateTime<Utc>,
}

impl Link {
    /// Create a new enabled link
    pub fn new(
        id: LinkId,
        team_id: TeamId,
        name: impl Into<String>,
    ) -> Result<Self, LinkValidationError> {
        let name = name.into();
        validate_link_name(&name)?;
        let now = Utc::now();

        Ok(Self {
            id,
            team_id,
            name,
            kind: LinkKind::default(),
            access: AccessPolicy::default(),
            enabled: true,
            created_at: now,
            updated_at: now,
        })
    }

    // Builder methods

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

    // Getters

    pub fn id(&self) -> &LinkId {
        &self.id
    }

    pub fn team_id(&self) -> &TeamId {
        &self.team_id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> LinkKind {
        self.kind
    }

    pub fn access(&self) -> AccessPolicy {
        self.access
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Check whether this link belongs to the given team
    pub fn is_owned_by(&self, team_id: &TeamId) -> bool {
        &self.team_id == team_id
    }

    // Mutators

    pub fn set_name(&mut self, name: impl Into<String>) -> Result<(), LinkValidationError> {
        let name = name.into();
        validate_link_name(&name)?;
        self.name = name;
        self.touch();
        Ok(())
    }

    pub fn set_access(&mut self, access: AccessPolicy) {
        self.access = access;
        self.touch();
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
        self.touch();
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

impl StorageEntity for Link {
    type Key = LinkId;

    fn key(&self) -> &Self::Key {
        &self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn team() -> TeamId {
        TeamId::new("acme").unwrap()
    }

    #[test]
    fn test_link_id_valid() {
        assert!(LinkId::new("pitch-deck").is_ok());
        assert!(LinkId::new("deck2024").is_ok());
    }

    #[test]
    fn test_link_id_invalid() {
        assert!(LinkId::new("").is_err());
        assert!(LinkId::new("-deck").is_err());
        assert!(LinkId::new("deck room").is_err());
    }

    #[test]
    fn test_link_creation() {
        let link = Link::new(LinkId::new("pitch-deck").unwrap(), team(), "Pitch Deck").unwrap();

        assert_eq!(link.id().as_str(), "pitch-deck");
        assert_eq!(link.name(), "Pitch Deck");
        assert_eq!(link.kind(), LinkKind::Document);
        assert!(link.is_enabled());
        assert!(!link.access().requires_nda);
    }

    #[test]
    fn test_link_builder() {
        let link = Link::new(LinkId::new("room").unwrap(), team(), "Investor Room")
            .unwrap()
            .with_kind(LinkKind::Dataroom)
            .with_access(AccessPolicy {
                password_protected: true,
                requires_email: true,
                requires_nda: true,
                allow_download: false,
            });

        assert_eq!(link.kind(), LinkKind::Dataroom);
        assert!(link.access().password_protected);
        assert!(link.access().requires_nda);
    }

    #[test]
    fn test_link_ownership() {
        let link = Link::new(LinkId::new("deck").unwrap(), team(), "Deck").unwrap();

        assert!(link.is_owned_by(&team()));
        assert!(!link.is_owned_by(&TeamId::new("other").unwrap()));
    }

    #[test]
    fn test_link_disable_touches_timestamp() {
        let mut link = Link::new(LinkId::new("deck").unwrap(), team(), "Deck").unwrap();
        let original = link.updated_at();

        std::thread::sleep(std::time::Duration::from_millis(10));
        link.set_enabled(false);

        assert!(!link.is_enabled());
        assert!(link.updated_at() > original);
    }

    #[test]
    fn test_link_serialization() {
        let link = Link::new(LinkId::new("deck").unwrap(), team(), "Deck")
            .unwrap()
            .with_kind(LinkKind::Dataroom);

        let json = serde_json::to_string(&link).unwrap();
        assert!(json.contains("\"kind\":\"dataroom\""));

        let deserialized: Link = serde_json::from_str(&json).unwrap();
        assert_eq!(deserialized.id().as_str(), "deck");
        assert_eq!(deserialized.kind(), LinkKind::Dataroom);
    }
}
