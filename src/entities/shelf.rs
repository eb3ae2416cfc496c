//! Shelf entity type - top tier of the storage hierarchy

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::core::entity::Entity;
use crate::core::identity::{EntityId, EntityPrefix};

/// A shelf holding zero or more cabinets
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Shelf {
    /// Unique identifier
    pub id: EntityId,

    /// Display name
    pub name: String,

    /// Short code used in location labels (e.g., "S1")
    pub code: String,

    /// Free-form description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Creation timestamp
    pub created: DateTime<Utc>,

    /// Author (who created this shelf)
    pub author: String,
}

impl Entity for Shelf {
    const PREFIX: &'static str = "SHF";
    const COLLECTION: &'static str = "storage/shelves";

    fn id(&self) -> &EntityId {
        &self.id
    }

    fn label(&self) -> &str {
        &self.code
    }

    fn created(&self) -> DateTime<Utc> {
        self.created
    }

    fn author(&self) -> &str {
        &self.author
    }
}

impl Shelf {
    /// Create a new shelf
    pub fn new(name: String, code: String, author: String) -> Self {
        Self {
            id: EntityId::new(EntityPrefix::Shf),
            name,
            code,
            description: None,
            created: Utc::now(),
            author,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shelf_roundtrip() {
        let shelf = Shelf::new("North wall".to_string(), "S1".to_string(), "test".to_string());
        let yaml = serde_yml::to_string(&shelf).unwrap();
        let parsed: Shelf = serde_yml::from_str(&yaml).unwrap();
        assert_eq!(shelf.id, parsed.id);
        assert_eq!(shelf.code, parsed.code);
    }
}
