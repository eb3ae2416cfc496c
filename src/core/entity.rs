//! Entity trait - common interface for all entity types

use chrono::{DateTime, Utc};
use serde::{de::DeserializeOwned, Serialize};

use crate::core::identity::EntityId;

/// Common trait for all PFT entities
pub trait Entity: Serialize + DeserializeOwned + 'static {
    /// The entity type prefix (e.g., "SHF", "REC")
    const PREFIX: &'static str;

    /// Directory of this entity's collection, relative to the project root
    const COLLECTION: &'static str;

    /// Get the entity's unique ID
    fn id(&self) -> &EntityId;

    /// Get a short human-readable label (node code or PR number)
    fn label(&self) -> &str;

    /// Get the creation timestamp
    fn created(&self) -> DateTime<Utc>;

    /// Get the author
    fn author(&self) -> &str;
}

/// Physical custody state of a procurement record
///
/// `active` means the physical file is checked out (borrowed); `archived`
/// means it sits in storage and participates in stack numbering.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "lowercase")]
#[derive(Default)]
pub enum RecordStatus {
    Active,
    #[default]
    Archived,
}

impl std::fmt::Display for RecordStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RecordStatus::Active => write!(f, "borrowed"),
            RecordStatus::Archived => write!(f, "archived"),
        }
    }
}

impl std::str::FromStr for RecordStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "active" | "borrowed" => Ok(RecordStatus::Active),
            "archived" | "available" => Ok(RecordStatus::Archived),
            _ => Err(format!("Unknown status: {}", s)),
        }
    }
}

/// Procurement modality of a record
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[derive(Default)]
pub enum ProcurementType {
    #[default]
    #[serde(rename = "SVP")]
    Svp,
    #[serde(rename = "Regular Bidding")]
    RegularBidding,
}

impl std::fmt::Display for ProcurementType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProcurementType::Svp => write!(f, "SVP"),
            ProcurementType::RegularBidding => write!(f, "Regular Bidding"),
        }
    }
}

impl std::str::FromStr for ProcurementType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "svp" => Ok(ProcurementType::Svp),
            "regular bidding" | "regular-bidding" | "bidding" => {
                Ok(ProcurementType::RegularBidding)
            }
            _ => Err(format!("Unknown procurement type: {}", s)),
        }
    }
}

/// Outcome of the procurement process itself
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, serde::Serialize, serde::Deserialize,
)]
#[derive(Default)]
pub enum ProgressStatus {
    #[default]
    Pending,
    Success,
    Failed,
}

impl std::fmt::Display for ProgressStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProgressStatus::Pending => write!(f, "pending"),
            ProgressStatus::Success => write!(f, "success"),
            ProgressStatus::Failed => write!(f, "failed"),
        }
    }
}

impl std::str::FromStr for ProgressStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pending" => Ok(ProgressStatus::Pending),
            "success" => Ok(ProgressStatus::Success),
            "failed" => Ok(ProgressStatus::Failed),
            _ => Err(format!("Unknown progress status: {}", s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_status_parse_aliases() {
        assert_eq!("active".parse::<RecordStatus>().unwrap(), RecordStatus::Active);
        assert_eq!("borrowed".parse::<RecordStatus>().unwrap(), RecordStatus::Active);
        assert_eq!("available".parse::<RecordStatus>().unwrap(), RecordStatus::Archived);
        assert!("checkedout".parse::<RecordStatus>().is_err());
    }

    #[test]
    fn test_procurement_type_serde_names() {
        let svp = serde_yml::to_string(&ProcurementType::Svp).unwrap();
        assert_eq!(svp.trim(), "SVP");
        let bidding = serde_yml::to_string(&ProcurementType::RegularBidding).unwrap();
        assert_eq!(bidding.trim(), "Regular Bidding");
    }
}
