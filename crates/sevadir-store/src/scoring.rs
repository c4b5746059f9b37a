//! Transparency score computation.
//!
//! A bounded 0–100 completeness/verification score derived additively
//! from which fields an organization has populated. Pure function of
//! the record snapshot: the same computation runs on freshly ingested
//! records and on any store write path that creates or edits one.

use crate::schema::Organization;

/// Compute the transparency score for an organization.
/// Additive, clamped to 100, never negative.
pub fn transparency_score(org: &Organization) -> u8 {
    let mut score: u32 = 0;

    // Basic info (30 points)
    if !org.name.is_empty() {
        score += 5;
    }
    if filled(&org.mission) {
        score += 10;
    }
    if filled(&org.description) {
        score += 15;
    }

    // Contact info (20 points)
    if filled(&org.email) {
        score += 10;
    }
    if filled(&org.phone) {
        score += 5;
    }
    if filled(&org.website) {
        score += 5;
    }

    // Location (20 points)
    if filled(&org.address) {
        score += 10;
    }
    if filled(&org.city) && filled(&org.state) {
        score += 10;
    }

    // Verification (30 points)
    if filled(&org.registration_no) {
        score += 20;
    }
    if org.verified {
        score += 10;
    }

    score.min(100) as u8
}

/// An empty string counts as absent.
fn filled(field: &Option<String>) -> bool {
    field.as_deref().is_some_and(|s| !s.is_empty())
}
