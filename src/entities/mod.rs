//! Entity type definitions
//!
//! PFT tracks the following entity types:
//!
//! **Storage hierarchy:**
//! - [`Shelf`] - top tier, owns cabinets
//! - [`Cabinet`] - second tier, owns folders
//! - [`Folder`] - third tier, owns records; parent is a cabinet or a box
//! - [`StorageBox`] - alternate tier, owns folders directly
//!
//! **Records:**
//! - [`Division`] - end-user divisions, also the PR-number prefix source
//! - [`Record`] - the tracked procurement file

pub mod cabinet;
pub mod division;
pub mod folder;
pub mod record;
pub mod shelf;
pub mod storage_box;

pub use cabinet::Cabinet;
pub use division::Division;
pub use folder::{Folder, FolderParent};
pub use record::{
    disposal_date_for, BoxPath, Checklist, Location, Record, RecordValidationError, ShelfPath,
};
pub use shelf::Shelf;
pub use storage_box::StorageBox;
