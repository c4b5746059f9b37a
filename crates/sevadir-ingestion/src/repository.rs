//! Store-facing side of the pipeline.
//!
//! Wraps the directory store with the check-then-insert sequence used
//! for every record: look up the composite key, insert only when no
//! existing organization matches. The transparency score is computed
//! at write time from the entity about to be persisted.

use std::sync::Arc;

use anyhow::Result;
use uuid::Uuid;

use sevadir_store::{transparency_score, DirectoryStore, Organization, StoreError};

use crate::dedup::{self, DedupDecision};
use crate::models::CanonicalRecord;

/// Result of offering one record to the store.
#[derive(Debug)]
pub struct RecordInsertResult {
    pub org_id: Uuid,
    pub was_new: bool,
}

#[derive(Clone)]
pub struct IngestionRepository {
    store: Arc<dyn DirectoryStore>,
}

impl IngestionRepository {
    pub fn new(store: Arc<dyn DirectoryStore>) -> Self {
        Self { store }
    }

    /// Insert a record unless its composite key already exists.
    /// Returns the organization id and whether it was newly inserted.
    pub async fn insert_record(&self, record: &CanonicalRecord) -> Result<RecordInsertResult> {
        match dedup::check_record(self.store.as_ref(), record).await? {
            DedupDecision::Skip { existing } => {
                tracing::debug!(
                    org_id = %existing,
                    name = %record.name,
                    "Organization already exists by composite key, skipping insert"
                );
                Ok(RecordInsertResult {
                    org_id: existing,
                    was_new: false,
                })
            }
            DedupDecision::Insert => {
                let mut org = organization_from_record(record);
                org.transparency_score = transparency_score(&org);

                match self.store.insert(org).await {
                    Ok(org_id) => Ok(RecordInsertResult {
                        org_id,
                        was_new: true,
                    }),
                    // A concurrent writer can land the same key between
                    // the check and the insert; the store's uniqueness
                    // turns that into an ordinary skip.
                    Err(StoreError::Duplicate(_)) => {
                        let existing = self
                            .store
                            .find_by_key(
                                &record.name,
                                record.city.as_deref(),
                                record.state.as_deref(),
                            )
                            .await?
                            .ok_or_else(|| {
                                anyhow::anyhow!(
                                    "duplicate reported but key not found: {}",
                                    record.name
                                )
                            })?;
                        Ok(RecordInsertResult {
                            org_id: existing.id,
                            was_new: false,
                        })
                    }
                    Err(e) => Err(e.into()),
                }
            }
        }
    }
}

/// Map a canonical record onto a fresh store entity.
/// Registration, mission and description arrive through other intake
/// paths; the scraper never fills them.
fn organization_from_record(record: &CanonicalRecord) -> Organization {
    Organization {
        id: Uuid::new_v4(),
        name: record.name.clone(),
        registration_no: None,
        mission: None,
        description: None,
        email: record.email.clone(),
        phone: record.phone.clone(),
        website: record.website.clone(),
        address: record.address.clone(),
        city: record.city.clone(),
        state: record.state.clone(),
        district: record.district.clone(),
        country: record.country.clone(),
        verified: record.verified,
        active: record.active,
        source: record.source.clone(),
        transparency_score: 0,
        created_at: record.scraped_at,
    }
}
