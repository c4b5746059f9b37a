//! Field normalisation: `ExtractedFields` → `CanonicalRecord`.

use chrono::{DateTime, Utc};

use crate::models::{CanonicalRecord, ExtractedFields, SOURCE_TAG};

/// Country recorded for every record from this source.
pub const DEFAULT_COUNTRY: &str = "India";

/// Merge landline and mobile numbers into a single display string.
pub fn merge_phone(phone: Option<String>, mobile: Option<String>) -> Option<String> {
    match (phone, mobile) {
        (Some(p), Some(m)) => Some(format!("{p} | Mobile: {m}")),
        (Some(p), None) => Some(p),
        (None, Some(m)) => Some(m),
        (None, None) => None,
    }
}

/// Build the canonical record for one extracted card.
///
/// Deterministic over any input that carries the positional fields.
/// Returns `None` when the card is missing its name; the caller counts
/// such cards as malformed.
pub fn canonicalise(fields: ExtractedFields, scraped_at: DateTime<Utc>) -> Option<CanonicalRecord> {
    let name = fields.name?;

    // The entity has no pincode column; fold it into the address.
    let address = match (fields.address, fields.pincode) {
        (Some(addr), Some(pin)) => Some(format!("{addr} - {pin}")),
        (Some(addr), None) => Some(addr),
        (None, Some(pin)) => Some(pin),
        (None, None) => None,
    };

    Some(CanonicalRecord {
        name,
        address,
        city: fields.city,
        state: fields.state,
        district: None,
        country: DEFAULT_COUNTRY.to_string(),
        email: fields.email,
        phone: merge_phone(fields.phone, fields.mobile),
        website: fields.website,
        verified: false,
        active: true,
        source: SOURCE_TAG.to_string(),
        scraped_at,
    })
}
