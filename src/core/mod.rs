//! Core module - fundamental types and utilities

pub mod config;
pub mod entity;
pub mod hierarchy;
pub mod identity;
pub mod prnumber;
pub mod project;
pub mod stack;
pub mod store;

pub use config::Config;
pub use entity::{Entity, ProcurementType, ProgressStatus, RecordStatus};
pub use hierarchy::{
    borrowed_count, count_descendants, location_label, records_in_division, DescendantCounts, Tier,
};
pub use identity::{EntityId, EntityPrefix, IdParseError};
pub use prnumber::{month_code, next_sequence, year_code, PrNumber, PrNumberError};
pub use project::{Project, ProjectError};
pub use stack::{plan_stack_numbers, reconcile_folder, ReconcileOutcome, StackPlan};
pub use store::{Collection, MemStore, StoreError, YamlStore};
