//! Stack-number reconciliation
//!
//! Archived records in a folder carry 1-based stack numbers describing
//! their physical position in the pile; borrowed records carry none. This
//! module recomputes a folder's numbering from a collection snapshot and
//! writes the changes back one record at a time.
//!
//! The ordering comparator is two-branch: records that BOTH already have a
//! stack number compare by that number, every other pair compares by
//! date_added. This is not a strict total order - a numbered record can be
//! interleaved with unnumbered ones through date comparisons. The behavior
//! is load-bearing (callers and fixtures depend on it), so the sort below
//! is a stable insertion sort that applies the comparator as-is instead of
//! `slice::sort_by`, which requires a total order.

use std::cmp::Ordering;

use crate::core::entity::RecordStatus;
use crate::core::identity::EntityId;
use crate::core::store::{Collection, StoreError};
use crate::entities::Record;

/// The two-branch stack comparator
fn stack_order(a: &Record, b: &Record) -> Ordering {
    match (a.stack_number, b.stack_number) {
        (Some(x), Some(y)) => x.cmp(&y),
        _ => a.date_added.cmp(&b.date_added),
    }
}

/// Stable insertion sort; accepts comparators that are not total orders
fn insertion_sort_by<T>(items: &mut [T], cmp: impl Fn(&T, &T) -> Ordering) {
    for i in 1..items.len() {
        let mut j = i;
        while j > 0 && cmp(&items[j - 1], &items[j]) == Ordering::Greater {
            items.swap(j - 1, j);
            j -= 1;
        }
    }
}

/// The writes needed to restore a folder's stack invariant
#[derive(Debug, Default, PartialEq, Eq)]
pub struct StackPlan {
    /// Archived records of the folder, in final stack order
    pub order: Vec<EntityId>,

    /// Records whose stack number must change, with the new number
    pub assign: Vec<(EntityId, u32)>,

    /// Borrowed records still holding a stale stack number
    pub clear: Vec<EntityId>,
}

impl StackPlan {
    /// Whether the folder already satisfies the invariant
    pub fn is_noop(&self) -> bool {
        self.assign.is_empty() && self.clear.is_empty()
    }
}

/// Compute a folder's stack numbering from a records snapshot
///
/// Pure function; works even when the invariant is currently violated, and
/// planning twice over the result yields a no-op (idempotent). Records in
/// other folders are never part of the plan.
pub fn plan_stack_numbers(folder_id: &EntityId, records: &[Record]) -> StackPlan {
    let mut archived: Vec<&Record> = records
        .iter()
        .filter(|r| r.location.folder() == folder_id && r.status == RecordStatus::Archived)
        .collect();

    insertion_sort_by(&mut archived, |a, b| stack_order(a, b));

    let mut plan = StackPlan::default();
    for (index, record) in archived.iter().enumerate() {
        let number = index as u32 + 1;
        plan.order.push(record.id.clone());
        if record.stack_number != Some(number) {
            plan.assign.push((record.id.clone(), number));
        }
    }

    for record in records {
        if record.location.folder() == folder_id
            && record.status == RecordStatus::Active
            && record.stack_number.is_some()
        {
            plan.clear.push(record.id.clone());
        }
    }

    plan
}

/// Outcome of applying a [`StackPlan`]
#[derive(Debug, Default)]
pub struct ReconcileOutcome {
    /// Stack numbers written
    pub assigned: usize,

    /// Stale numbers cleared from borrowed records
    pub cleared: usize,

    /// Per-record write failures; the remaining writes were still issued
    pub failed: Vec<(EntityId, StoreError)>,
}

impl ReconcileOutcome {
    /// Whether anything was written
    pub fn changed(&self) -> bool {
        self.assigned > 0 || self.cleared > 0
    }
}

/// Recompute and persist one folder's stack numbers
///
/// Issues one independent put per changed record. Best-effort: a failed
/// write lands in the outcome and neither stops nor rolls back the others.
pub fn reconcile_folder<S: Collection<Record>>(
    store: &S,
    folder_id: &EntityId,
) -> Result<ReconcileOutcome, StoreError> {
    let records = store.snapshot()?;
    let plan = plan_stack_numbers(folder_id, &records);

    let mut outcome = ReconcileOutcome::default();

    for (id, number) in &plan.assign {
        // plan ids come from the snapshot, the lookup cannot miss
        let Some(record) = records.iter().find(|r| &r.id == id) else {
            continue;
        };
        let mut updated = record.clone();
        updated.stack_number = Some(*number);
        match store.put(&updated) {
            Ok(()) => outcome.assigned += 1,
            Err(e) => outcome.failed.push((id.clone(), e)),
        }
    }

    for id in &plan.clear {
        let Some(record) = records.iter().find(|r| &r.id == id) else {
            continue;
        };
        let mut updated = record.clone();
        updated.stack_number = None;
        match store.put(&updated) {
            Ok(()) => outcome.cleared += 1,
            Err(e) => outcome.failed.push((id.clone(), e)),
        }
    }

    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::identity::EntityPrefix;
    use crate::core::store::MemStore;
    use crate::entities::record::{Location, ShelfPath};
    use chrono::NaiveDate;

    fn folder_location(folder: &EntityId) -> Location {
        Location::Shelf(ShelfPath {
            shelf: EntityId::new(EntityPrefix::Shf),
            cabinet: EntityId::new(EntityPrefix::Cab),
            folder: folder.clone(),
        })
    }

    fn record_in(folder: &EntityId, date: (i32, u32, u32), stack: Option<u32>) -> Record {
        let mut rec = Record::new(
            "IT-JAN-24-001".to_string(),
            "test item".to_string(),
            folder_location(folder),
            NaiveDate::from_ymd_opt(date.0, date.1, date.2).unwrap(),
            "test".to_string(),
        );
        rec.stack_number = stack;
        rec
    }

    fn stack_numbers<S: Collection<Record>>(store: &S, folder: &EntityId) -> Vec<Option<u32>> {
        let mut records: Vec<Record> = store
            .snapshot()
            .unwrap()
            .into_iter()
            .filter(|r| r.location.folder() == folder)
            .collect();
        records.sort_by_key(|r| r.date_added);
        records.iter().map(|r| r.stack_number).collect()
    }

    #[test]
    fn test_two_branch_comparator_fixture() {
        // A: 2024-01-01, no number; B: 2024-02-01, number 1; C: 2024-03-01,
        // no number. B is numbered but every pair here includes an
        // unnumbered record, so all comparisons fall to dates: [A, B, C].
        let folder = EntityId::new(EntityPrefix::Fld);
        let a = record_in(&folder, (2024, 1, 1), None);
        let b = record_in(&folder, (2024, 2, 1), Some(1));
        let c = record_in(&folder, (2024, 3, 1), None);

        let records = vec![c.clone(), b.clone(), a.clone()];
        let plan = plan_stack_numbers(&folder, &records);

        assert_eq!(plan.order, vec![a.id.clone(), b.id.clone(), c.id.clone()]);
        // A takes position 1, so B moves from 1 to 2 and C gets 3
        assert_eq!(
            plan.assign,
            vec![(a.id.clone(), 1), (b.id.clone(), 2), (c.id.clone(), 3)]
        );
    }

    #[test]
    fn test_existing_numbers_win_when_both_present() {
        // Both numbered: numeric order beats date order
        let folder = EntityId::new(EntityPrefix::Fld);
        let newer_but_first = record_in(&folder, (2024, 6, 1), Some(1));
        let older_but_second = record_in(&folder, (2024, 1, 1), Some(2));

        let records = vec![older_but_second.clone(), newer_but_first.clone()];
        let plan = plan_stack_numbers(&folder, &records);

        assert_eq!(
            plan.order,
            vec![newer_but_first.id.clone(), older_but_second.id.clone()]
        );
        assert!(plan.assign.is_empty());
    }

    #[test]
    fn test_contiguity_after_reconcile() {
        let folder = EntityId::new(EntityPrefix::Fld);
        let store: MemStore<Record> = MemStore::new();
        // Gappy, duplicated numbering: 5, 5, none
        store.seed(record_in(&folder, (2024, 1, 1), Some(5)));
        store.seed(record_in(&folder, (2024, 2, 1), Some(5)));
        store.seed(record_in(&folder, (2024, 3, 1), None));

        reconcile_folder(&store, &folder).unwrap();

        let mut numbers: Vec<u32> = store
            .snapshot()
            .unwrap()
            .iter()
            .filter_map(|r| r.stack_number)
            .collect();
        numbers.sort_unstable();
        assert_eq!(numbers, vec![1, 2, 3]);
    }

    #[test]
    fn test_borrowed_records_are_cleared() {
        let folder = EntityId::new(EntityPrefix::Fld);
        let store: MemStore<Record> = MemStore::new();
        let mut borrowed = record_in(&folder, (2024, 1, 1), Some(2));
        borrowed.status = RecordStatus::Active;
        let borrowed_id = borrowed.id.clone();
        store.seed(borrowed);
        store.seed(record_in(&folder, (2024, 2, 1), Some(1)));

        let outcome = reconcile_folder(&store, &folder).unwrap();

        assert_eq!(outcome.cleared, 1);
        assert_eq!(store.get(&borrowed_id).unwrap().stack_number, None);
    }

    #[test]
    fn test_reconcile_is_idempotent() {
        let folder = EntityId::new(EntityPrefix::Fld);
        let store: MemStore<Record> = MemStore::new();
        store.seed(record_in(&folder, (2024, 1, 1), None));
        store.seed(record_in(&folder, (2024, 2, 1), Some(7)));

        let first = reconcile_folder(&store, &folder).unwrap();
        assert!(first.changed());
        let after_first = stack_numbers(&store, &folder);

        let second = reconcile_folder(&store, &folder).unwrap();
        assert!(!second.changed());
        assert_eq!(stack_numbers(&store, &folder), after_first);
    }

    #[test]
    fn test_other_folders_untouched() {
        let folder = EntityId::new(EntityPrefix::Fld);
        let other = EntityId::new(EntityPrefix::Fld);
        let store: MemStore<Record> = MemStore::new();
        store.seed(record_in(&folder, (2024, 1, 1), None));
        let untouched = record_in(&other, (2024, 1, 1), Some(42));
        let untouched_id = untouched.id.clone();
        store.seed(untouched);

        reconcile_folder(&store, &folder).unwrap();

        assert_eq!(store.get(&untouched_id).unwrap().stack_number, Some(42));
    }

    #[test]
    fn test_partial_failure_keeps_other_writes() {
        let folder = EntityId::new(EntityPrefix::Fld);
        let store: MemStore<Record> = MemStore::new();
        let failing = record_in(&folder, (2024, 1, 1), None);
        let failing_id = failing.id.clone();
        let ok = record_in(&folder, (2024, 2, 1), None);
        let ok_id = ok.id.clone();
        store.seed(failing);
        store.seed(ok);
        store.fail_puts_for(&failing_id);

        let outcome = reconcile_folder(&store, &folder).unwrap();

        // Best-effort: the second write still landed
        assert_eq!(outcome.failed.len(), 1);
        assert_eq!(outcome.failed[0].0, failing_id);
        assert_eq!(outcome.assigned, 1);
        assert_eq!(store.get(&ok_id).unwrap().stack_number, Some(2));
        assert_eq!(store.get(&failing_id).unwrap().stack_number, None);
    }
}
