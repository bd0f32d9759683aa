//! Invitation and public alias entities (database row mappings).

use chrono::{DateTime, Utc};
use domain::models::{InvitationRecord, PublicInvitation};
use sqlx::types::Json;
use sqlx::FromRow;
use uuid::Uuid;

/// Database row mapping for the invitations table.
#[derive(Debug, Clone, FromRow)]
pub struct InvitationEntity {
    pub owner_id: Uuid,
    pub id: String,
    pub data: Json<serde_json::Value>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<InvitationEntity> for InvitationRecord {
    type Error = serde_json::Error;

    fn try_from(entity: InvitationEntity) -> Result<Self, Self::Error> {
        Ok(Self {
            id: entity.id,
            owner_id: entity.owner_id,
            data: serde_json::from_value(entity.data.0)?,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        })
    }
}

/// Database row mapping for the public_invitations table.
#[derive(Debug, Clone, FromRow)]
pub struct PublicInvitationEntity {
    pub id: String,
    pub owner_id: Option<String>,
    pub updated_at: DateTime<Utc>,
}

impl From<PublicInvitationEntity> for PublicInvitation {
    fn from(entity: PublicInvitationEntity) -> Self {
        Self {
            id: entity.id,
            owner_id: entity.owner_id,
            updated_at: entity.updated_at,
        }
    }
}
