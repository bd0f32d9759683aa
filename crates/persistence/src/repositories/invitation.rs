//! Invitation repository for database operations.

use async_trait::async_trait;
use domain::models::{merge_document, InvitationData, InvitationRecord, PublicInvitation};
use domain::services::lookup::{LookupError, OwnerDocuments, PublicIndex};
use sqlx::types::Json;
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use crate::entities::{InvitationEntity, PublicInvitationEntity};
use crate::metrics::QueryTimer;
use crate::store::{parse_document, to_document, InvitationStore, PageCursor, StoreError};

const INVITATION_COLUMNS: &str = "owner_id, id, data, created_at, updated_at";

/// Repository for invitation documents and their public aliases.
#[derive(Clone)]
pub struct InvitationRepository {
    pool: PgPool,
}

impl InvitationRepository {
    /// Creates a new InvitationRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Returns a reference to the connection pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    async fn find_alias(
        &self,
        id: &str,
    ) -> Result<Option<PublicInvitationEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_public_invitation");
        let result = sqlx::query_as::<_, PublicInvitationEntity>(
            r#"
            SELECT id, owner_id, updated_at
            FROM public_invitations
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    async fn find(&self, owner_id: Uuid, id: &str) -> Result<Option<InvitationEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_invitation");
        let result = sqlx::query_as::<_, InvitationEntity>(&format!(
            "SELECT {} FROM invitations WHERE owner_id = $1 AND id = $2",
            INVITATION_COLUMNS
        ))
        .bind(owner_id)
        .bind(id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }
}

/// Points the public alias at `owner_id`, refusing to take over an alias held
/// by a different owner.
async fn claim_alias(
    tx: &mut Transaction<'_, Postgres>,
    owner_id: Uuid,
    id: &str,
) -> Result<(), StoreError> {
    let timer = QueryTimer::new("upsert_public_invitation");
    let claimed = sqlx::query(
        r#"
        INSERT INTO public_invitations (id, owner_id, updated_at)
        VALUES ($1, $2, NOW())
        ON CONFLICT (id) DO UPDATE
            SET updated_at = NOW()
            WHERE public_invitations.owner_id = EXCLUDED.owner_id
        "#,
    )
    .bind(id)
    .bind(owner_id.to_string())
    .execute(&mut **tx)
    .await;
    timer.record();

    if claimed?.rows_affected() == 0 {
        return Err(StoreError::Conflict(format!(
            "Invitation id {} belongs to another owner",
            id
        )));
    }
    Ok(())
}

async fn write_document(
    tx: &mut Transaction<'_, Postgres>,
    owner_id: Uuid,
    id: &str,
    document: serde_json::Value,
) -> Result<InvitationEntity, sqlx::Error> {
    let timer = QueryTimer::new("upsert_invitation");
    let result = sqlx::query_as::<_, InvitationEntity>(&format!(
        r#"
        INSERT INTO invitations (owner_id, id, data)
        VALUES ($1, $2, $3)
        ON CONFLICT (owner_id, id) DO UPDATE
            SET data = EXCLUDED.data, updated_at = NOW()
        RETURNING {}
        "#,
        INVITATION_COLUMNS
    ))
    .bind(owner_id)
    .bind(id)
    .bind(Json(document))
    .fetch_one(&mut **tx)
    .await;
    timer.record();
    result
}

fn to_records(entities: Vec<InvitationEntity>) -> Result<Vec<InvitationRecord>, StoreError> {
    entities
        .into_iter()
        .map(|e| InvitationRecord::try_from(e).map_err(StoreError::from))
        .collect()
}

#[async_trait]
impl PublicIndex for InvitationRepository {
    async fn public_record(&self, id: &str) -> Result<Option<PublicInvitation>, LookupError> {
        let alias = self.find_alias(id).await.map_err(StoreError::from)?;
        Ok(alias.map(PublicInvitation::from))
    }
}

#[async_trait]
impl OwnerDocuments for InvitationRepository {
    async fn owner_document(
        &self,
        owner_id: Uuid,
        id: &str,
    ) -> Result<Option<InvitationRecord>, LookupError> {
        Ok(self.get(owner_id, id).await?)
    }
}

#[async_trait]
impl InvitationStore for InvitationRepository {
    async fn create(
        &self,
        owner_id: Uuid,
        id: &str,
        data: &InvitationData,
    ) -> Result<InvitationRecord, StoreError> {
        let document = to_document(data)?;
        let mut tx = self.pool.begin().await?;

        let timer = QueryTimer::new("insert_public_invitation");
        let inserted = sqlx::query(
            r#"
            INSERT INTO public_invitations (id, owner_id, updated_at)
            VALUES ($1, $2, NOW())
            ON CONFLICT (id) DO NOTHING
            "#,
        )
        .bind(id)
        .bind(owner_id.to_string())
        .execute(&mut *tx)
        .await;
        timer.record();
        if inserted?.rows_affected() == 0 {
            return Err(StoreError::Conflict(format!("Invitation id {} is taken", id)));
        }

        let entity = write_document(&mut tx, owner_id, id, document).await?;
        tx.commit().await?;
        Ok(entity.try_into()?)
    }

    async fn get(&self, owner_id: Uuid, id: &str) -> Result<Option<InvitationRecord>, StoreError> {
        match self.find(owner_id, id).await? {
            Some(entity) => Ok(Some(entity.try_into()?)),
            None => Ok(None),
        }
    }

    async fn merge(
        &self,
        owner_id: Uuid,
        id: &str,
        patch: serde_json::Value,
    ) -> Result<InvitationRecord, StoreError> {
        let mut tx = self.pool.begin().await?;

        let timer = QueryTimer::new("lock_invitation");
        let current = sqlx::query_scalar::<_, Json<serde_json::Value>>(
            r#"
            SELECT data FROM invitations
            WHERE owner_id = $1 AND id = $2
            FOR UPDATE
            "#,
        )
        .bind(owner_id)
        .bind(id)
        .fetch_optional(&mut *tx)
        .await;
        timer.record();

        let mut document = current?.map(|json| json.0).ok_or(StoreError::NotFound)?;
        merge_document(&mut document, patch);
        let data = parse_document(document)?;

        claim_alias(&mut tx, owner_id, id).await?;
        let entity = write_document(&mut tx, owner_id, id, to_document(&data)?).await?;
        tx.commit().await?;
        Ok(entity.try_into()?)
    }

    async fn replace(
        &self,
        owner_id: Uuid,
        id: &str,
        data: &InvitationData,
    ) -> Result<InvitationRecord, StoreError> {
        let document = to_document(data)?;
        let mut tx = self.pool.begin().await?;

        let timer = QueryTimer::new("replace_invitation");
        let entity = sqlx::query_as::<_, InvitationEntity>(&format!(
            r#"
            UPDATE invitations
            SET data = $3, updated_at = NOW()
            WHERE owner_id = $1 AND id = $2
            RETURNING {}
            "#,
            INVITATION_COLUMNS
        ))
        .bind(owner_id)
        .bind(id)
        .bind(Json(document))
        .fetch_optional(&mut *tx)
        .await;
        timer.record();

        let entity = entity?.ok_or(StoreError::NotFound)?;
        claim_alias(&mut tx, owner_id, id).await?;
        tx.commit().await?;
        Ok(entity.try_into()?)
    }

    async fn delete(&self, owner_id: Uuid, id: &str) -> Result<bool, StoreError> {
        let mut tx = self.pool.begin().await?;

        let timer = QueryTimer::new("delete_invitation");
        let deleted = sqlx::query("DELETE FROM invitations WHERE owner_id = $1 AND id = $2")
            .bind(owner_id)
            .bind(id)
            .execute(&mut *tx)
            .await;
        timer.record();
        let deleted = deleted?.rows_affected() > 0;

        if deleted {
            let timer = QueryTimer::new("delete_public_invitation");
            let result = sqlx::query("DELETE FROM public_invitations WHERE id = $1 AND owner_id = $2")
                .bind(id)
                .bind(owner_id.to_string())
                .execute(&mut *tx)
                .await;
            timer.record();
            result?;
        }

        tx.commit().await?;
        Ok(deleted)
    }

    async fn list_for_owner(
        &self,
        owner_id: Uuid,
        after: Option<&PageCursor>,
        limit: u32,
    ) -> Result<Vec<InvitationRecord>, StoreError> {
        let timer = QueryTimer::new("list_invitations_for_owner");
        let result = sqlx::query_as::<_, InvitationEntity>(&format!(
            r#"
            SELECT {}
            FROM invitations
            WHERE owner_id = $1
              AND ($2::timestamptz IS NULL OR (updated_at, id) < ($2, $3))
            ORDER BY updated_at DESC, id DESC
            LIMIT $4
            "#,
            INVITATION_COLUMNS
        ))
        .bind(owner_id)
        .bind(after.map(|c| c.updated_at))
        .bind(after.map(|c| c.id.clone()))
        .bind(i64::from(limit))
        .fetch_all(&self.pool)
        .await;
        timer.record();
        to_records(result?)
    }

    async fn list_all(
        &self,
        after: Option<&PageCursor>,
        limit: u32,
    ) -> Result<Vec<InvitationRecord>, StoreError> {
        let timer = QueryTimer::new("list_all_invitations");
        let result = sqlx::query_as::<_, InvitationEntity>(&format!(
            r#"
            SELECT {}
            FROM invitations
            WHERE ($1::timestamptz IS NULL OR (updated_at, id) < ($1, $2))
            ORDER BY updated_at DESC, id DESC
            LIMIT $3
            "#,
            INVITATION_COLUMNS
        ))
        .bind(after.map(|c| c.updated_at))
        .bind(after.map(|c| c.id.clone()))
        .bind(i64::from(limit))
        .fetch_all(&self.pool)
        .await;
        timer.record();
        to_records(result?)
    }
}
