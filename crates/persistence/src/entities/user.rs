//! User account entity (database row mapping).

use chrono::{DateTime, Utc};
use domain::models::{Role, User};
use sqlx::FromRow;
use uuid::Uuid;

/// Database row mapping for the users table.
#[derive(Debug, Clone, FromRow)]
pub struct UserEntity {
    pub id: Uuid,
    pub email: String,
    pub password_hash: String,
    pub name: Option<String>,
    pub phone: Option<String>,
    pub role: String,
    pub wallet_balance: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<UserEntity> for User {
    fn from(entity: UserEntity) -> Self {
        Self {
            id: entity.id,
            email: entity.email,
            password_hash: entity.password_hash,
            name: entity.name,
            phone: entity.phone,
            role: entity.role.parse().unwrap_or_default(),
            wallet_balance: entity.wallet_balance,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        }
    }
}
