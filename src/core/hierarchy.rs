//! Storage-hierarchy queries: deletion guard and location labels

use std::fmt;

use crate::core::entity::RecordStatus;
use crate::core::identity::EntityId;
use crate::entities::{Cabinet, Folder, Record, Shelf, StorageBox};

/// Storage node tiers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tier {
    Shelf,
    Cabinet,
    Folder,
    Box,
}

/// Breakdown of a node's direct and transitive children
///
/// Deletion of the node is only permitted when every count is zero; callers
/// must refuse the delete outright and surface the breakdown, never cascade.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DescendantCounts {
    pub cabinets: usize,
    pub folders: usize,
    pub files: usize,
}

impl DescendantCounts {
    /// True when the node has no content and may be deleted
    pub fn is_empty(&self) -> bool {
        self.cabinets == 0 && self.folders == 0 && self.files == 0
    }
}

impl fmt::Display for DescendantCounts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts = Vec::new();
        if self.cabinets > 0 {
            parts.push(format!("{} cabinet(s)", self.cabinets));
        }
        if self.folders > 0 {
            parts.push(format!("{} folder(s)", self.folders));
        }
        if self.files > 0 {
            parts.push(format!("{} file(s)", self.files));
        }
        if parts.is_empty() {
            write!(f, "no children")
        } else {
            write!(f, "{}", parts.join(", "))
        }
    }
}

/// Count everything living under a storage node
///
/// Walks the snapshot tiers relevant to the node's own tier; a shelf counts
/// its cabinets, their folders, and the records in those folders, down to a
/// folder counting only its own records.
pub fn count_descendants(
    tier: Tier,
    id: &EntityId,
    cabinets: &[Cabinet],
    folders: &[Folder],
    records: &[Record],
) -> DescendantCounts {
    let mut counts = DescendantCounts::default();

    match tier {
        Tier::Shelf => {
            for cabinet in cabinets.iter().filter(|c| &c.shelf == id) {
                counts.cabinets += 1;
                for folder in folders
                    .iter()
                    .filter(|f| f.parent.cabinet() == Some(&cabinet.id))
                {
                    counts.folders += 1;
                    counts.files += records_in_folder(records, &folder.id);
                }
            }
        }
        Tier::Cabinet => {
            for folder in folders.iter().filter(|f| f.parent.cabinet() == Some(id)) {
                counts.folders += 1;
                counts.files += records_in_folder(records, &folder.id);
            }
        }
        Tier::Folder => {
            counts.files = records_in_folder(records, id);
        }
        Tier::Box => {
            for folder in folders
                .iter()
                .filter(|f| f.parent.storage_box() == Some(id))
            {
                counts.folders += 1;
                counts.files += records_in_folder(records, &folder.id);
            }
        }
    }

    counts
}

fn records_in_folder(records: &[Record], folder_id: &EntityId) -> usize {
    records
        .iter()
        .filter(|r| r.location.folder() == folder_id)
        .count()
}

/// Count records referencing a division, for the division delete guard
pub fn records_in_division(records: &[Record], division_id: &EntityId) -> usize {
    records
        .iter()
        .filter(|r| {
            r.division.as_ref() == Some(division_id)
                || r.borrower_division.as_ref() == Some(division_id)
        })
        .count()
}

/// Render a record's physical location as a label
///
/// Shelf path: `"{ShelfCode}-{CabinetCode}-{FolderCode}"`. Box path: the
/// box code alone. Unresolved references render as `"?"`.
pub fn location_label(
    record: &Record,
    shelves: &[Shelf],
    cabinets: &[Cabinet],
    folders: &[Folder],
    boxes: &[StorageBox],
) -> String {
    match &record.location {
        crate::entities::Location::Box(path) => boxes
            .iter()
            .find(|b| b.id == path.storage_box)
            .map(|b| b.code.clone())
            .unwrap_or_else(|| "?".to_string()),
        crate::entities::Location::Shelf(path) => {
            let shelf = shelves
                .iter()
                .find(|s| s.id == path.shelf)
                .map(|s| s.code.as_str())
                .unwrap_or("?");
            let cabinet = cabinets
                .iter()
                .find(|c| c.id == path.cabinet)
                .map(|c| c.code.as_str())
                .unwrap_or("?");
            let folder = folders
                .iter()
                .find(|f| f.id == path.folder)
                .map(|f| f.code.as_str())
                .unwrap_or("?");
            format!("{}-{}-{}", shelf, cabinet, folder)
        }
    }
}

/// Count borrowed records, for dashboards
pub fn borrowed_count(records: &[Record]) -> usize {
    records
        .iter()
        .filter(|r| r.status == RecordStatus::Active)
        .count()
}
