//! Division entity type - end-user divisions, also a PR-number component

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::core::entity::Entity;
use crate::core::identity::{EntityId, EntityPrefix};

/// An end-user division
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Division {
    /// Unique identifier
    pub id: EntityId,

    /// Full division name
    pub name: String,

    /// Abbreviation used in PR numbers (e.g., "IT")
    pub abbreviation: String,

    /// Creation timestamp
    pub created: DateTime<Utc>,

    /// Author (who created this division)
    pub author: String,
}

impl Entity for Division {
    const PREFIX: &'static str = "DIV";
    const COLLECTION: &'static str = "divisions";

    fn id(&self) -> &EntityId {
        &self.id
    }

    fn label(&self) -> &str {
        &self.abbreviation
    }

    fn created(&self) -> DateTime<Utc> {
        self.created
    }

    fn author(&self) -> &str {
        &self.author
    }
}

impl Division {
    /// Create a new division
    pub fn new(name: String, abbreviation: String, author: String) -> Self {
        Self {
            id: EntityId::new(EntityPrefix::Div),
            name,
            abbreviation,
            created: Utc::now(),
            author,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_division_roundtrip() {
        let div = Division::new(
            "Information Technology".to_string(),
            "IT".to_string(),
            "test".to_string(),
        );
        let yaml = serde_yml::to_string(&div).unwrap();
        let parsed: Division = serde_yml::from_str(&yaml).unwrap();
        assert_eq!(div.id, parsed.id);
        assert_eq!(parsed.abbreviation, "IT");
    }
}
