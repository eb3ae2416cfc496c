//! Folder entity type - third tier, owned by a cabinet or a box

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::core::entity::Entity;
use crate::core::identity::{EntityId, EntityPrefix};

/// The parent of a folder - exactly one of a cabinet or a box
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FolderParent {
    Cabinet(EntityId),
    Box(EntityId),
}

impl FolderParent {
    /// Get the parent id regardless of which tier it lives in
    pub fn id(&self) -> &EntityId {
        match self {
            FolderParent::Cabinet(id) | FolderParent::Box(id) => id,
        }
    }

    /// Cabinet parent id, if the folder sits in a cabinet
    pub fn cabinet(&self) -> Option<&EntityId> {
        match self {
            FolderParent::Cabinet(id) => Some(id),
            FolderParent::Box(_) => None,
        }
    }

    /// Box parent id, if the folder sits in a box
    pub fn storage_box(&self) -> Option<&EntityId> {
        match self {
            FolderParent::Box(id) => Some(id),
            FolderParent::Cabinet(_) => None,
        }
    }
}

/// A folder holding zero or more procurement records
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Folder {
    /// Unique identifier
    pub id: EntityId,

    /// Parent node (cabinet or box, never both)
    pub parent: FolderParent,

    /// Display name
    pub name: String,

    /// Short code used in location labels (e.g., "F12")
    pub code: String,

    /// Free-form description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Label color for the physical folder
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,

    /// Creation timestamp
    pub created: DateTime<Utc>,

    /// Author (who created this folder)
    pub author: String,
}

impl Entity for Folder {
    const PREFIX: &'static str = "FLD";
    const COLLECTION: &'static str = "storage/folders";

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

impl Folder {
    /// Create a new folder under the given parent
    pub fn new(parent: FolderParent, name: String, code: String, author: String) -> Self {
        Self {
            id: EntityId::new(EntityPrefix::Fld),
            parent,
            name,
            code,
            description: None,
            color: None,
            created: Utc::now(),
            author,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_folder_cabinet_parent_roundtrip() {
        let cab_id = EntityId::new(EntityPrefix::Cab);
        let folder = Folder::new(
            FolderParent::Cabinet(cab_id.clone()),
            "2024 SVP".to_string(),
            "F12".to_string(),
            "test".to_string(),
        );
        let yaml = serde_yml::to_string(&folder).unwrap();
        assert!(yaml.contains("cabinet:"));
        let parsed: Folder = serde_yml::from_str(&yaml).unwrap();
        assert_eq!(parsed.parent.cabinet(), Some(&cab_id));
        assert_eq!(parsed.parent.storage_box(), None);
    }

    #[test]
    fn test_folder_box_parent_roundtrip() {
        let box_id = EntityId::new(EntityPrefix::Box);
        let folder = Folder::new(
            FolderParent::Box(box_id.clone()),
            "Overflow".to_string(),
            "F90".to_string(),
            "test".to_string(),
        );
        let yaml = serde_yml::to_string(&folder).unwrap();
        assert!(yaml.contains("box:"));
        let parsed: Folder = serde_yml::from_str(&yaml).unwrap();
        assert_eq!(parsed.parent.storage_box(), Some(&box_id));
    }
}
