//! Organization repository.
//!
//! The directory store is the system of record for organizations. The
//! ingestion pipeline needs exactly two operations from it: lookup by
//! the `(name, city, state)` composite key and insert. Everything else
//! (pagination, filtering, updates) belongs to the platform's API layer
//! and is out of scope here.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::{Result, StoreError};
use crate::schema::Organization;

/// Store interface consumed by the ingestion pipeline.
///
/// Key matching is exact and case-sensitive: two spellings of the same
/// organization are distinct keys.
#[async_trait]
pub trait DirectoryStore: Send + Sync {
    /// Look up an organization by its composite key.
    async fn find_by_key(
        &self,
        name: &str,
        city: Option<&str>,
        state: Option<&str>,
    ) -> Result<Option<Organization>>;

    /// Insert a new organization, returning its assigned id.
    /// Fails with [`StoreError::Duplicate`] when the composite key is
    /// already taken.
    async fn insert(&self, org: Organization) -> Result<Uuid>;
}

type OrgKey = (String, Option<String>, Option<String>);

fn key_of(org: &Organization) -> OrgKey {
    (org.name.clone(), org.city.clone(), org.state.clone())
}

#[derive(Default)]
struct Inner {
    organizations: HashMap<Uuid, Organization>,
    by_key: HashMap<OrgKey, Uuid>,
}

/// In-memory directory store backed by a composite-key index.
///
/// `insert` checks key uniqueness under the same write lock that adds
/// the record, so concurrent writers racing the pipeline's
/// check-then-insert sequence cannot both land the same key: the loser
/// gets [`StoreError::Duplicate`].
#[derive(Default)]
pub struct MemoryStore {
    inner: RwLock<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a store from an existing set of organizations, e.g. a
    /// snapshot written by a previous run. Later entries win on key
    /// collision.
    pub fn with_organizations(orgs: Vec<Organization>) -> Self {
        let mut inner = Inner::default();
        for org in orgs {
            inner.by_key.insert(key_of(&org), org.id);
            inner.organizations.insert(org.id, org);
        }
        Self {
            inner: RwLock::new(inner),
        }
    }

    /// Snapshot of everything held, in no particular order.
    pub async fn organizations(&self) -> Vec<Organization> {
        self.inner.read().await.organizations.values().cloned().collect()
    }

    /// Total organizations held.
    pub async fn count(&self) -> usize {
        self.inner.read().await.organizations.len()
    }
}

#[async_trait]
impl DirectoryStore for MemoryStore {
    async fn find_by_key(
        &self,
        name: &str,
        city: Option<&str>,
        state: Option<&str>,
    ) -> Result<Option<Organization>> {
        let inner = self.inner.read().await;
        let key: OrgKey = (
            name.to_string(),
            city.map(str::to_string),
            state.map(str::to_string),
        );
        Ok(inner
            .by_key
            .get(&key)
            .and_then(|id| inner.organizations.get(id))
            .cloned())
    }

    async fn insert(&self, org: Organization) -> Result<Uuid> {
        let mut inner = self.inner.write().await;
        let key = key_of(&org);
        if inner.by_key.contains_key(&key) {
            return Err(StoreError::Duplicate(org.name));
        }
        let id = org.id;
        tracing::debug!(org_id = %id, name = %org.name, "Inserted new organization");
        inner.by_key.insert(key, id);
        inner.organizations.insert(id, org);
        Ok(id)
    }
}
