//! Data models for the scrape ingestion pipeline.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Provenance tag recorded on every organization ingested by this
/// pipeline, distinct from records entered through other intake paths.
pub const SOURCE_TAG: &str = "ngo-directory-scrape";

/// Raw fields pulled out of one organization card, before normalisation.
///
/// Every field is optional; absence is `None`, never an empty string.
/// `name`/`address`/`city`/`state` are assigned positionally from the
/// first four spans of a card, so a valid card carries all four.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExtractedFields {
    pub name: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub pincode: Option<String>,
    pub phone: Option<String>,
    pub mobile: Option<String>,
    pub email: Option<String>,
    pub website: Option<String>,
}

/// Normalised, storage-ready representation of one organization.
///
/// Created once per valid card and never mutated afterwards: it is
/// either inserted into the directory store or dropped as a duplicate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanonicalRecord {
    pub name: String,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    /// The upstream site does not expose districts; always `None`.
    pub district: Option<String>,
    pub country: String,
    pub email: Option<String>,
    /// Landline and mobile merged into one display string.
    pub phone: Option<String>,
    pub website: Option<String>,
    pub verified: bool,
    pub active: bool,
    pub source: String,
    /// Wall-clock time of the ingestion run, not per-document.
    pub scraped_at: DateTime<Utc>,
}
