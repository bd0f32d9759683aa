//! In-memory stores for local development and tests.

use async_trait::async_trait;
use chrono::Utc;
use domain::models::{
    merge_document, InvitationData, InvitationRecord, NewUser, PublicInvitation, User,
};
use domain::services::lookup::{LookupError, OwnerDocuments, PublicIndex};
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::store::{
    parse_document, to_document, InvitationStore, PageCursor, StoreError, UserStore,
};

#[derive(Default)]
struct InvitationTables {
    documents: HashMap<(Uuid, String), InvitationRecord>,
    public: HashMap<String, PublicInvitation>,
}

impl InvitationTables {
    fn claim_alias(&mut self, owner_id: Uuid, id: &str) -> Result<(), StoreError> {
        if let Some(existing) = self.public.get(id) {
            if existing.owner() != Some(owner_id) {
                return Err(StoreError::Conflict(format!(
                    "Invitation id {} belongs to another owner",
                    id
                )));
            }
        }
        self.public
            .insert(id.to_string(), PublicInvitation::new(id, owner_id));
        Ok(())
    }
}

#[derive(Default)]
pub struct MemoryInvitationStore {
    tables: RwLock<InvitationTables>,
}

impl MemoryInvitationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Writes a raw public index record, bypassing the owner check. Used to
    /// seed records migrated from older stores.
    pub async fn insert_public_record(&self, record: PublicInvitation) {
        self.tables
            .write()
            .await
            .public
            .insert(record.id.clone(), record);
    }
}

fn page(
    mut records: Vec<InvitationRecord>,
    after: Option<&PageCursor>,
    limit: u32,
) -> Vec<InvitationRecord> {
    records.sort_by(|a, b| {
        b.updated_at
            .cmp(&a.updated_at)
            .then_with(|| b.id.cmp(&a.id))
    });
    records
        .into_iter()
        .filter(|r| match after {
            Some(c) => (r.updated_at, r.id.as_str()) < (c.updated_at, c.id.as_str()),
            None => true,
        })
        .take(limit as usize)
        .collect()
}

#[async_trait]
impl PublicIndex for MemoryInvitationStore {
    async fn public_record(&self, id: &str) -> Result<Option<PublicInvitation>, LookupError> {
        Ok(self.tables.read().await.public.get(id).cloned())
    }
}

#[async_trait]
impl OwnerDocuments for MemoryInvitationStore {
    async fn owner_document(
        &self,
        owner_id: Uuid,
        id: &str,
    ) -> Result<Option<InvitationRecord>, LookupError> {
        Ok(self.get(owner_id, id).await?)
    }
}

#[async_trait]
impl InvitationStore for MemoryInvitationStore {
    async fn create(
        &self,
        owner_id: Uuid,
        id: &str,
        data: &InvitationData,
    ) -> Result<InvitationRecord, StoreError> {
        let mut tables = self.tables.write().await;
        if tables.public.contains_key(id) {
            return Err(StoreError::Conflict(format!("Invitation id {} is taken", id)));
        }
        tables.claim_alias(owner_id, id)?;

        let now = Utc::now();
        let record = InvitationRecord {
            id: id.to_string(),
            owner_id,
            data: data.clone(),
            created_at: now,
            updated_at: now,
        };
        tables
            .documents
            .insert((owner_id, id.to_string()), record.clone());
        Ok(record)
    }

    async fn get(&self, owner_id: Uuid, id: &str) -> Result<Option<InvitationRecord>, StoreError> {
        Ok(self
            .tables
            .read()
            .await
            .documents
            .get(&(owner_id, id.to_string()))
            .cloned())
    }

    async fn merge(
        &self,
        owner_id: Uuid,
        id: &str,
        patch: serde_json::Value,
    ) -> Result<InvitationRecord, StoreError> {
        let mut tables = self.tables.write().await;
        let key = (owner_id, id.to_string());
        let now = Utc::now();

        let existing = tables.documents.get(&key).ok_or(StoreError::NotFound)?;
        let created_at = existing.created_at;
        let mut document = to_document(&existing.data)?;
        merge_document(&mut document, patch);
        let data = parse_document(document)?;

        tables.claim_alias(owner_id, id)?;
        let record = InvitationRecord {
            id: id.to_string(),
            owner_id,
            data,
            created_at,
            updated_at: now,
        };
        tables.documents.insert(key, record.clone());
        Ok(record)
    }

    async fn replace(
        &self,
        owner_id: Uuid,
        id: &str,
        data: &InvitationData,
    ) -> Result<InvitationRecord, StoreError> {
        let mut tables = self.tables.write().await;
        let record = {
            let existing = tables
                .documents
                .get_mut(&(owner_id, id.to_string()))
                .ok_or(StoreError::NotFound)?;
            existing.data = data.clone();
            existing.updated_at = Utc::now();
            existing.clone()
        };
        tables.claim_alias(owner_id, id)?;
        Ok(record)
    }

    async fn delete(&self, owner_id: Uuid, id: &str) -> Result<bool, StoreError> {
        let mut tables = self.tables.write().await;
        let removed = tables
            .documents
            .remove(&(owner_id, id.to_string()))
            .is_some();
        if removed {
            tables.public.remove(id);
        }
        Ok(removed)
    }

    async fn list_for_owner(
        &self,
        owner_id: Uuid,
        after: Option<&PageCursor>,
        limit: u32,
    ) -> Result<Vec<InvitationRecord>, StoreError> {
        let tables = self.tables.read().await;
        let records = tables
            .documents
            .values()
            .filter(|r| r.owner_id == owner_id)
            .cloned()
            .collect();
        Ok(page(records, after, limit))
    }

    async fn list_all(
        &self,
        after: Option<&PageCursor>,
        limit: u32,
    ) -> Result<Vec<InvitationRecord>, StoreError> {
        let tables = self.tables.read().await;
        Ok(page(tables.documents.values().cloned().collect(), after, limit))
    }
}

#[derive(Default)]
pub struct MemoryUserStore {
    users: RwLock<HashMap<Uuid, User>>,
}

impl MemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn create(&self, new: NewUser) -> Result<User, StoreError> {
        let mut users = self.users.write().await;
        if users.values().any(|u| u.email == new.email) {
            return Err(StoreError::Conflict("Email already registered".into()));
        }
        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4(),
            email: new.email,
            password_hash: new.password_hash,
            name: new.name,
            phone: new.phone,
            role: new.role,
            wallet_balance: 0,
            created_at: now,
            updated_at: now,
        };
        users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        Ok(self.users.read().await.get(&id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        Ok(self
            .users
            .read()
            .await
            .values()
            .find(|u| u.email == email)
            .cloned())
    }

    async fn update_profile(
        &self,
        id: Uuid,
        name: &str,
        phone: &str,
    ) -> Result<Option<User>, StoreError> {
        let mut users = self.users.write().await;
        Ok(users.get_mut(&id).map(|user| {
            user.name = Some(name.to_string());
            user.phone = Some(phone.to_string());
            user.updated_at = Utc::now();
            user.clone()
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain::models::{Role, StyleField};
    use domain::services::lookup::InvitationResolver;
    use serde_json::json;

    fn new_user(email: &str) -> NewUser {
        NewUser {
            email: email.to_string(),
            password_hash: "hash".to_string(),
            name: None,
            phone: None,
            role: Role::User,
        }
    }

    #[tokio::test]
    async fn test_create_writes_public_alias() {
        let store = MemoryInvitationStore::new();
        let owner = Uuid::new_v4();
        store
            .create(owner, "aB3dE5gH7k", &InvitationData::initial())
            .await
            .unwrap();

        let alias = store.public_record("aB3dE5gH7k").await.unwrap().unwrap();
        assert_eq!(alias.owner(), Some(owner));
        assert!(store.public_record("aB3dE5gH7k").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_create_rejects_taken_id() {
        let store = MemoryInvitationStore::new();
        store
            .create(Uuid::new_v4(), "aB3dE5gH7k", &InvitationData::default())
            .await
            .unwrap();
        let err = store
            .create(Uuid::new_v4(), "aB3dE5gH7k", &InvitationData::default())
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_merge_keeps_sibling_keys() {
        let store = MemoryInvitationStore::new();
        let owner = Uuid::new_v4();
        let mut data = InvitationData::initial();
        data.style.set_font(StyleField::BrideName, "font-yatra");
        store.create(owner, "aB3dE5gH7k", &data).await.unwrap();

        let record = store
            .merge(
                owner,
                "aB3dE5gH7k",
                json!({"groomName": "अमोल", "fonts": {"place": "font-gotu"}}),
            )
            .await
            .unwrap();

        assert_eq!(record.data.groom_name, "अमोल");
        assert_eq!(record.data.bride_name, "प्रेरणा पाटील");
        assert_eq!(record.data.style.resolve(StyleField::BrideName).font, "font-yatra");
        assert_eq!(record.data.style.resolve(StyleField::Place).font, "font-gotu");
    }

    #[tokio::test]
    async fn test_merge_requires_existing_document() {
        let store = MemoryInvitationStore::new();
        let owner = Uuid::new_v4();
        let err = store
            .merge(owner, "aB3dE5gH7k", json!({"brideName": "Prerana"}))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::NotFound));
        assert!(store.public_record("aB3dE5gH7k").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_merge_rejects_bad_shape_and_foreign_owner() {
        let store = MemoryInvitationStore::new();
        let owner = Uuid::new_v4();
        store
            .create(owner, "aB3dE5gH7k", &InvitationData::default())
            .await
            .unwrap();

        let err = store
            .merge(owner, "aB3dE5gH7k", json!({"gallery": 5}))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::InvalidDocument(_)));

        let err = store
            .merge(Uuid::new_v4(), "aB3dE5gH7k", json!({}))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::NotFound));
    }

    #[tokio::test]
    async fn test_replace_and_delete() {
        let store = MemoryInvitationStore::new();
        let owner = Uuid::new_v4();
        assert!(matches!(
            store
                .replace(owner, "missing", &InvitationData::default())
                .await,
            Err(StoreError::NotFound)
        ));

        store
            .create(owner, "aB3dE5gH7k", &InvitationData::initial())
            .await
            .unwrap();
        let replaced = store
            .replace(owner, "aB3dE5gH7k", &InvitationData::default())
            .await
            .unwrap();
        assert_eq!(replaced.data, InvitationData::default());

        assert!(store.delete(owner, "aB3dE5gH7k").await.unwrap());
        assert!(!store.delete(owner, "aB3dE5gH7k").await.unwrap());
        assert!(store.public_record("aB3dE5gH7k").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_listing_pages_newest_first() {
        let store = MemoryInvitationStore::new();
        let owner = Uuid::new_v4();
        for id in ["a000000001", "a000000002", "a000000003"] {
            store
                .create(owner, id, &InvitationData::default())
                .await
                .unwrap();
        }
        store
            .create(Uuid::new_v4(), "b000000001", &InvitationData::default())
            .await
            .unwrap();

        let first = store.list_for_owner(owner, None, 2).await.unwrap();
        assert_eq!(first.len(), 2);
        let cursor = PageCursor {
            updated_at: first[1].updated_at,
            id: first[1].id.clone(),
        };
        let rest = store.list_for_owner(owner, Some(&cursor), 2).await.unwrap();
        assert_eq!(rest.len(), 1);
        assert!(first.iter().all(|r| r.id != rest[0].id));

        assert_eq!(store.list_all(None, 10).await.unwrap().len(), 4);
    }

    #[tokio::test]
    async fn test_resolver_over_memory_store() {
        let store = MemoryInvitationStore::new();
        let owner = Uuid::new_v4();
        store
            .create(owner, "aB3dE5gH7k", &InvitationData::initial())
            .await
            .unwrap();
        store
            .insert_public_record(PublicInvitation {
                id: "orphan0001".into(),
                owner_id: None,
                updated_at: Utc::now(),
            })
            .await;

        let resolver = InvitationResolver::new(&store, &store);
        assert!(resolver.resolve("aB3dE5gH7k").await.is_ok());
        assert_eq!(
            resolver.resolve("orphan0001").await,
            Err(LookupError::NotFound)
        );
    }

    #[tokio::test]
    async fn test_user_store() {
        let users = MemoryUserStore::new();
        let user = users.create(new_user("guest@example.com")).await.unwrap();
        assert!(matches!(
            users.create(new_user("guest@example.com")).await,
            Err(StoreError::Conflict(_))
        ));

        let found = users.find_by_email("guest@example.com").await.unwrap().unwrap();
        assert_eq!(found.id, user.id);
        assert!(!found.is_profile_complete());

        let updated = users
            .update_profile(user.id, "Prerana Patil", "9876543210")
            .await
            .unwrap()
            .unwrap();
        assert!(updated.is_profile_complete());
        assert!(users
            .update_profile(Uuid::new_v4(), "x", "y")
            .await
            .unwrap()
            .is_none());
    }
}
