//! Box entity type - alternate tier holding folders directly

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::core::entity::Entity;
use crate::core::identity::{EntityId, EntityPrefix};

/// A storage box, bypassing the shelf/cabinet tiers
///
/// Named `StorageBox` to avoid clashing with `std::boxed::Box` in the prelude.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageBox {
    /// Unique identifier
    pub id: EntityId,

    /// Display name
    pub name: String,

    /// Short code used in location labels (e.g., "B7")
    pub code: String,

    /// Free-form description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Creation timestamp
    pub created: DateTime<Utc>,

    /// Author (who created this box)
    pub author: String,
}

impl Entity for StorageBox {
    const PREFIX: &'static str = "BOX";
    const COLLECTION: &'static str = "storage/boxes";

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

impl StorageBox {
    /// Create a new box
    pub fn new(name: String, code: String, author: String) -> Self {
        Self {
            id: EntityId::new(EntityPrefix::Box),
            name,
            code,
            description: None,
            created: Utc::now(),
            author,
        }
    }
}
