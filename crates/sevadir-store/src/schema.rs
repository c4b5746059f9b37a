//! Schema definitions for directory entities.

/// Organization record held by the directory store.
///
/// Scraped records arrive without `registration_no`, `mission` or
/// `description`; those fields are filled through other intake paths.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct Organization {
    pub id: uuid::Uuid,
    pub name: String,
    pub registration_no: Option<String>,
    pub mission: Option<String>,
    pub description: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub website: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub district: Option<String>,
    pub country: String,
    pub verified: bool,
    pub active: bool,
    /// Intake path that produced this record, e.g. a scrape provenance tag.
    pub source: String,
    pub transparency_score: u8,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl Organization {
    pub fn new(name: String, source: String) -> Self {
        Self {
            id: uuid::Uuid::new_v4(),
            name,
            registration_no: None,
            mission: None,
            description: None,
            email: None,
            phone: None,
            website: None,
            address: None,
            city: None,
            state: None,
            district: None,
            country: "India".to_string(),
            verified: false,
            active: true,
            source,
            transparency_score: 0,
            created_at: chrono::Utc::now(),
        }
    }
}
