//! Duplicate detection for incoming records.
//!
//! Matching is an exact, case-sensitive comparison on the
//! `(name, city, state)` composite key against the directory store.
//! Two spellings of the same organization are distinct keys; a skip is
//! a normal outcome, not an error.

use uuid::Uuid;

use sevadir_store::{DirectoryStore, Result};

use crate::models::CanonicalRecord;

/// Composite identity of a record for duplicate checks.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CompositeKey {
    pub name: String,
    pub city: Option<String>,
    pub state: Option<String>,
}

impl CompositeKey {
    pub fn of(record: &CanonicalRecord) -> Self {
        Self {
            name: record.name.clone(),
            city: record.city.clone(),
            state: record.state.clone(),
        }
    }
}

/// Outcome of a duplicate check.
#[derive(Debug, PartialEq, Eq)]
pub enum DedupDecision {
    /// Record is new; insert it.
    Insert,
    /// An organization with the same key already exists; skip.
    Skip { existing: Uuid },
}

/// Check one record against the store by composite key.
pub async fn check_record(
    store: &dyn DirectoryStore,
    record: &CanonicalRecord,
) -> Result<DedupDecision> {
    let key = CompositeKey::of(record);
    let existing = store
        .find_by_key(&key.name, key.city.as_deref(), key.state.as_deref())
        .await?;

    Ok(match existing {
        Some(org) => DedupDecision::Skip { existing: org.id },
        None => DedupDecision::Insert,
    })
}
