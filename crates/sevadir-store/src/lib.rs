//! sevadir-store — Directory store abstraction for the Sevadir platform.
//! - Organization entity schema
//! - DirectoryStore trait (composite-key lookup + insert)
//! - In-memory reference store
//! - Transparency score computation

pub mod error;
pub mod organizations;
pub mod schema;
pub mod scoring;

// Re-export commonly used types
pub use error::{Result, StoreError};
pub use organizations::{DirectoryStore, MemoryStore};
pub use schema::Organization;
pub use scoring::transparency_score;
