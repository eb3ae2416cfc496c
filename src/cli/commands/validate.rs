//! `pft validate` command - Cross-reference and invariant checks
//!
//! Walks every collection and reports what a snapshot-driven command would
//! silently skip or misrender: undecodable documents, dangling references,
//! invalid record fields, duplicate PR numbers, and folders whose stack
//! numbering drifted. `--fix` reconciles the stack numbering; everything
//! else needs a manual edit.

use console::style;
use miette::Result;
use std::collections::BTreeMap;

use crate::cli::helpers::open_store;
use crate::cli::GlobalOpts;
use crate::core::entity::{Entity, RecordStatus};
use crate::core::stack::{plan_stack_numbers, reconcile_folder};
use crate::core::store::{Collection, YamlStore};
use crate::entities::{Cabinet, Division, Folder, FolderParent, Location, Record, Shelf, StorageBox};

#[derive(clap::Args, Debug)]
pub struct ValidateArgs {
    /// Repair stack numbering by reconciling every folder
    #[arg(long)]
    pub fix: bool,
}

struct Issue {
    subject: String,
    message: String,
    fixable: bool,
}

impl Issue {
    fn new(subject: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            subject: subject.into(),
            message: message.into(),
            fixable: false,
        }
    }

    fn fixable(subject: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            subject: subject.into(),
            message: message.into(),
            fixable: true,
        }
    }
}

pub fn run(args: ValidateArgs, global: &GlobalOpts) -> Result<()> {
    let (_project, store) = open_store(global)?;

    let shelves: Vec<Shelf> = store.snapshot().map_err(|e| miette::miette!("{}", e))?;
    let cabinets: Vec<Cabinet> = store.snapshot().map_err(|e| miette::miette!("{}", e))?;
    let folders: Vec<Folder> = store.snapshot().map_err(|e| miette::miette!("{}", e))?;
    let boxes: Vec<StorageBox> = store.snapshot().map_err(|e| miette::miette!("{}", e))?;
    let divisions: Vec<Division> = store.snapshot().map_err(|e| miette::miette!("{}", e))?;
    let records: Vec<Record> = store.snapshot().map_err(|e| miette::miette!("{}", e))?;

    let mut issues = Vec::new();

    check_malformed(&store, &mut issues);
    check_references(&cabinets, &folders, &boxes, &shelves, &divisions, &records, &mut issues);
    check_record_fields(&records, &mut issues);
    check_duplicate_pr_numbers(&records, &mut issues);
    check_stack_numbering(&folders, &records, &mut issues);

    if issues.is_empty() {
        println!("{} All checks passed.", style("✓").green());
        return Ok(());
    }

    for issue in &issues {
        let marker = if issue.fixable {
            style("!").yellow()
        } else {
            style("✗").red()
        };
        println!("{} {}: {}", marker, style(&issue.subject).cyan(), issue.message);
    }
    println!();

    let fixable = issues.iter().filter(|i| i.fixable).count();

    if args.fix && fixable > 0 {
        let mut repaired = 0;
        for folder in &folders {
            let outcome =
                reconcile_folder(&store, &folder.id).map_err(|e| miette::miette!("{}", e))?;
            if outcome.changed() {
                repaired += 1;
            }
            for (id, err) in &outcome.failed {
                println!("{} Could not repair {}: {}", style("✗").red(), id, err);
            }
        }
        println!(
            "{} Reconciled stack numbering in {} folder(s).",
            style("✓").green(),
            repaired
        );
    }

    let remaining = if args.fix {
        issues.len() - fixable
    } else {
        issues.len()
    };
    if remaining > 0 {
        Err(miette::miette!(
            "{} issue(s) found{}",
            remaining,
            if !args.fix && fixable > 0 {
                format!(" ({} repairable with --fix)", fixable)
            } else {
                String::new()
            }
        ))
    } else {
        Ok(())
    }
}

fn check_malformed(store: &YamlStore, issues: &mut Vec<Issue>) {
    fn check_one<T: Entity>(store: &YamlStore, noun: &str, issues: &mut Vec<Issue>) {
        let count = store.malformed_count::<T>();
        if count > 0 {
            issues.push(Issue::new(
                T::COLLECTION,
                format!(
                    "{} {} document(s) fail to parse and are invisible to every command",
                    count, noun
                ),
            ));
        }
    }

    check_one::<Shelf>(store, "shelf", issues);
    check_one::<Cabinet>(store, "cabinet", issues);
    check_one::<Folder>(store, "folder", issues);
    check_one::<StorageBox>(store, "box", issues);
    check_one::<Division>(store, "division", issues);
    check_one::<Record>(store, "record", issues);
}

fn check_references(
    cabinets: &[Cabinet],
    folders: &[Folder],
    boxes: &[StorageBox],
    shelves: &[Shelf],
    divisions: &[Division],
    records: &[Record],
    issues: &mut Vec<Issue>,
) {
    for cabinet in cabinets {
        if !shelves.iter().any(|s| s.id == cabinet.shelf) {
            issues.push(Issue::new(
                &cabinet.code,
                format!("cabinet references missing shelf {}", cabinet.shelf),
            ));
        }
    }

    for folder in folders {
        match &folder.parent {
            FolderParent::Cabinet(id) => {
                if !cabinets.iter().any(|c| &c.id == id) {
                    issues.push(Issue::new(
                        &folder.code,
                        format!("folder references missing cabinet {}", id),
                    ));
                }
            }
            FolderParent::Box(id) => {
                if !boxes.iter().any(|b| &b.id == id) {
                    issues.push(Issue::new(
                        &folder.code,
                        format!("folder references missing box {}", id),
                    ));
                }
            }
        }
    }

    for record in records {
        match &record.location {
            Location::Shelf(path) => {
                if !shelves.iter().any(|s| s.id == path.shelf) {
                    issues.push(Issue::new(
                        &record.pr_number,
                        format!("record references missing shelf {}", path.shelf),
                    ));
                }
                if !cabinets.iter().any(|c| c.id == path.cabinet) {
                    issues.push(Issue::new(
                        &record.pr_number,
                        format!("record references missing cabinet {}", path.cabinet),
                    ));
                }
                if !folders.iter().any(|f| f.id == path.folder) {
                    issues.push(Issue::new(
                        &record.pr_number,
                        format!("record references missing folder {}", path.folder),
                    ));
                }
            }
            Location::Box(path) => {
                if !boxes.iter().any(|b| b.id == path.storage_box) {
                    issues.push(Issue::new(
                        &record.pr_number,
                        format!("record references missing box {}", path.storage_box),
                    ));
                }
                if !folders.iter().any(|f| f.id == path.folder) {
                    issues.push(Issue::new(
                        &record.pr_number,
                        format!("record references missing folder {}", path.folder),
                    ));
                }
            }
        }
        for division in [&record.division, &record.borrower_division]
            .into_iter()
            .flatten()
        {
            if !divisions.iter().any(|d| &d.id == division) {
                issues.push(Issue::new(
                    &record.pr_number,
                    format!("record references missing division {}", division),
                ));
            }
        }
    }
}

fn check_record_fields(records: &[Record], issues: &mut Vec<Issue>) {
    for record in records {
        if let Err(e) = record.validate() {
            issues.push(Issue::new(&record.pr_number, e.to_string()));
        }
        if record.status == RecordStatus::Active && record.borrowed_by.is_none() {
            issues.push(Issue::new(
                &record.pr_number,
                "record is borrowed but has no borrower",
            ));
        }
    }
}

fn check_duplicate_pr_numbers(records: &[Record], issues: &mut Vec<Issue>) {
    let mut seen: BTreeMap<&str, usize> = BTreeMap::new();
    for record in records {
        *seen.entry(record.pr_number.as_str()).or_insert(0) += 1;
    }
    for (pr_number, count) in seen {
        if count > 1 {
            issues.push(Issue::new(
                pr_number,
                format!("PR number appears on {} records", count),
            ));
        }
    }
}

fn check_stack_numbering(folders: &[Folder], records: &[Record], issues: &mut Vec<Issue>) {
    for folder in folders {
        let plan = plan_stack_numbers(&folder.id, records);
        if !plan.assign.is_empty() {
            issues.push(Issue::fixable(
                &folder.code,
                format!(
                    "{} archived record(s) out of stack order",
                    plan.assign.len()
                ),
            ));
        }
        if !plan.clear.is_empty() {
            issues.push(Issue::fixable(
                &folder.code,
                format!(
                    "{} borrowed record(s) still hold a stack number",
                    plan.clear.len()
                ),
            ));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::identity::{EntityId, EntityPrefix};
    use crate::entities::BoxPath;
    use chrono::NaiveDate;

    fn record_in(folder: &EntityId) -> Record {
        Record::new(
            "GSD-JAN-24-001".to_string(),
            "Test".to_string(),
            Location::Box(BoxPath {
                storage_box: EntityId::new(EntityPrefix::Box),
                folder: folder.clone(),
            }),
            NaiveDate::from_ymd_opt(2024, 1, 10).unwrap(),
            "test".to_string(),
        )
    }

    #[test]
    fn test_duplicate_pr_numbers_flagged() {
        let folder = EntityId::new(EntityPrefix::Fld);
        let a = record_in(&folder);
        let b = record_in(&folder);

        let mut issues = Vec::new();
        check_duplicate_pr_numbers(&[a, b], &mut issues);
        assert_eq!(issues.len(), 1);
        assert!(issues[0].message.contains("2 records"));
    }

    #[test]
    fn test_borrowed_without_borrower_flagged() {
        let folder = EntityId::new(EntityPrefix::Fld);
        let mut record = record_in(&folder);
        record.status = RecordStatus::Active;

        let mut issues = Vec::new();
        check_record_fields(&[record], &mut issues);
        assert_eq!(issues.len(), 1);
    }

    #[test]
    fn test_stack_drift_is_fixable() {
        let folder = Folder::new(
            FolderParent::Box(EntityId::new(EntityPrefix::Box)),
            "Folder".to_string(),
            "F1".to_string(),
            "t".to_string(),
        );
        let mut record = record_in(&folder.id);
        record.stack_number = Some(7);

        let mut issues = Vec::new();
        check_stack_numbering(&[folder], &[record], &mut issues);
        assert_eq!(issues.len(), 1);
        assert!(issues[0].fixable);
    }
}
