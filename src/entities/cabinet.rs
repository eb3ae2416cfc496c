//! Cabinet entity type - second tier, owned by a shelf

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::core::entity::Entity;
use crate::core::identity::{EntityId, EntityPrefix};

/// A cabinet on a shelf, holding zero or more folders
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Cabinet {
    /// Unique identifier
    pub id: EntityId,

    /// Parent shelf
    pub shelf: EntityId,

    /// Display name
    pub name: String,

    /// Short code used in location labels (e.g., "C3")
    pub code: String,

    /// Free-form description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Creation timestamp
    pub created: DateTime<Utc>,

    /// Author (who created this cabinet)
    pub author: String,
}

impl Entity for Cabinet {
    const PREFIX: &'static str = "CAB";
    const COLLECTION: &'static str = "storage/cabinets";

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

impl Cabinet {
    /// Create a new cabinet under the given shelf
    pub fn new(shelf: EntityId, name: String, code: String, author: String) -> Self {
        Self {
            id: EntityId::new(EntityPrefix::Cab),
            shelf,
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
    fn test_cabinet_roundtrip() {
        let shelf_id = EntityId::new(EntityPrefix::Shf);
        let cab = Cabinet::new(
            shelf_id.clone(),
            "Steel cabinet".to_string(),
            "C3".to_string(),
            "test".to_string(),
        );
        let yaml = serde_yml::to_string(&cab).unwrap();
        let parsed: Cabinet = serde_yml::from_str(&yaml).unwrap();
        assert_eq!(cab.id, parsed.id);
        assert_eq!(parsed.shelf, shelf_id);
    }
}
