//! `pft status` command - Project status dashboard

use console::style;
use miette::Result;
use std::collections::BTreeMap;
use tabled::{builder::Builder, settings::Style};

use crate::cli::helpers::open_store;
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::entity::{ProgressStatus, RecordStatus};
use crate::core::store::Collection;
use crate::entities::{Cabinet, Division, Folder, Record, Shelf, StorageBox};

#[derive(clap::Args, Debug)]
pub struct StatusArgs {
    /// Show per-division breakdown
    #[arg(long)]
    pub detailed: bool,
}

#[derive(serde::Serialize, Default)]
struct StorageMetrics {
    shelves: usize,
    cabinets: usize,
    folders: usize,
    boxes: usize,
}

#[derive(serde::Serialize, Default)]
struct RecordMetrics {
    total: usize,
    archived: usize,
    borrowed: usize,
    by_progress: BTreeMap<String, usize>,
    by_type: BTreeMap<String, usize>,
    disposal_due: usize,
    checklist_complete: usize,
}

#[derive(serde::Serialize, Default)]
struct DivisionMetrics {
    divisions: usize,
    records_per_division: BTreeMap<String, usize>,
    borrowed_per_division: BTreeMap<String, usize>,
}

pub fn run(args: StatusArgs, global: &GlobalOpts) -> Result<()> {
    let (_project, store) = open_store(global)?;

    let shelves: Vec<Shelf> = store.snapshot().map_err(|e| miette::miette!("{}", e))?;
    let cabinets: Vec<Cabinet> = store.snapshot().map_err(|e| miette::miette!("{}", e))?;
    let folders: Vec<Folder> = store.snapshot().map_err(|e| miette::miette!("{}", e))?;
    let boxes: Vec<StorageBox> = store.snapshot().map_err(|e| miette::miette!("{}", e))?;
    let divisions: Vec<Division> = store.snapshot().map_err(|e| miette::miette!("{}", e))?;
    let records: Vec<Record> = store.snapshot().map_err(|e| miette::miette!("{}", e))?;

    let storage = StorageMetrics {
        shelves: shelves.len(),
        cabinets: cabinets.len(),
        folders: folders.len(),
        boxes: boxes.len(),
    };
    let record_metrics = collect_record_metrics(&records);
    let division_metrics = collect_division_metrics(&divisions, &records);

    match global.format {
        OutputFormat::Json => {
            let status = serde_json::json!({
                "storage": storage,
                "records": record_metrics,
                "divisions": division_metrics,
            });
            println!(
                "{}",
                serde_json::to_string_pretty(&status).unwrap_or_default()
            );
        }
        _ => {
            let width = 62;

            println!("{}", style("PFT Project Status").bold().underlined());
            println!("{}", "═".repeat(width));
            println!();

            println!("{}", style("STORAGE").bold());
            println!(
                "  {} shelf(s), {} cabinet(s), {} folder(s), {} box(es)",
                storage.shelves, storage.cabinets, storage.folders, storage.boxes
            );
            println!();

            println!("{}", style("RECORDS").bold());
            println!("  Total:        {}", record_metrics.total);
            println!(
                "  Archived:     {}",
                style(record_metrics.archived).green()
            );
            println!(
                "  Borrowed:     {}",
                style(record_metrics.borrowed).yellow()
            );
            println!(
                "  Disposal due: {}",
                if record_metrics.disposal_due > 0 {
                    style(record_metrics.disposal_due).red()
                } else {
                    style(record_metrics.disposal_due).dim()
                }
            );
            println!(
                "  Complete checklists: {}/{}",
                record_metrics.checklist_complete, record_metrics.total
            );
            println!();

            println!("{}", style("PROGRESS").bold());
            for (progress, count) in &record_metrics.by_progress {
                println!("  {:<10} {}", progress, count);
            }
            println!();

            println!("{}", style("TYPE").bold());
            for (kind, count) in &record_metrics.by_type {
                println!("  {:<16} {}", kind, count);
            }

            if args.detailed && !divisions.is_empty() {
                println!();
                println!("{}", style("DIVISIONS").bold());
                let mut table = Builder::default();
                table.push_record(["DIVISION", "RECORDS", "BORROWED"]);
                for division in &divisions {
                    let total = division_metrics
                        .records_per_division
                        .get(&division.abbreviation)
                        .copied()
                        .unwrap_or(0);
                    let borrowed = division_metrics
                        .borrowed_per_division
                        .get(&division.abbreviation)
                        .copied()
                        .unwrap_or(0);
                    table.push_record([
                        division.abbreviation.clone(),
                        total.to_string(),
                        borrowed.to_string(),
                    ]);
                }
                println!("{}", table.build().with(Style::sharp()));
            }

            println!();
            println!("{}", "═".repeat(width));
        }
    }

    Ok(())
}

fn collect_record_metrics(records: &[Record]) -> RecordMetrics {
    let today = chrono::Local::now().date_naive();
    let mut metrics = RecordMetrics {
        total: records.len(),
        ..Default::default()
    };

    for record in records {
        match record.status {
            RecordStatus::Archived => metrics.archived += 1,
            RecordStatus::Active => metrics.borrowed += 1,
        }
        *metrics
            .by_progress
            .entry(record.progress_status.to_string())
            .or_insert(0) += 1;
        *metrics
            .by_type
            .entry(record.procurement_type.to_string())
            .or_insert(0) += 1;
        if record.disposal_date <= today {
            metrics.disposal_due += 1;
        }
        if record.checklist.complete_count() == record.checklist.len() {
            metrics.checklist_complete += 1;
        }
    }

    // Surface even the zero buckets so the dashboard shape is stable
    for progress in [
        ProgressStatus::Pending,
        ProgressStatus::Success,
        ProgressStatus::Failed,
    ] {
        metrics.by_progress.entry(progress.to_string()).or_insert(0);
    }

    metrics
}

fn collect_division_metrics(divisions: &[Division], records: &[Record]) -> DivisionMetrics {
    let mut metrics = DivisionMetrics {
        divisions: divisions.len(),
        ..Default::default()
    };

    for division in divisions {
        let total = records
            .iter()
            .filter(|r| r.division.as_ref() == Some(&division.id))
            .count();
        let borrowed = records
            .iter()
            .filter(|r| {
                r.status == RecordStatus::Active
                    && (r.division.as_ref() == Some(&division.id)
                        || r.borrower_division.as_ref() == Some(&division.id))
            })
            .count();
        metrics
            .records_per_division
            .insert(division.abbreviation.clone(), total);
        metrics
            .borrowed_per_division
            .insert(division.abbreviation.clone(), borrowed);
    }

    metrics
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{BoxPath, Location};
    use crate::core::identity::{EntityId, EntityPrefix};
    use chrono::NaiveDate;

    fn record_at(date: NaiveDate) -> Record {
        Record::new(
            "GSD-JAN-24-001".to_string(),
            "Test".to_string(),
            Location::Box(BoxPath {
                storage_box: EntityId::new(EntityPrefix::Box),
                folder: EntityId::new(EntityPrefix::Fld),
            }),
            date,
            "test".to_string(),
        )
    }

    #[test]
    fn test_collect_record_metrics() {
        let mut borrowed = record_at(NaiveDate::from_ymd_opt(2024, 1, 10).unwrap());
        borrowed.status = RecordStatus::Active;
        let old = record_at(NaiveDate::from_ymd_opt(2018, 1, 10).unwrap());
        let fresh = record_at(chrono::Local::now().date_naive());

        let metrics = collect_record_metrics(&[borrowed, old, fresh]);
        assert_eq!(metrics.total, 3);
        assert_eq!(metrics.borrowed, 1);
        assert_eq!(metrics.archived, 2);
        // 2018 + 5 years passed long ago
        assert_eq!(metrics.disposal_due, 1);
        assert_eq!(metrics.by_progress.get("pending"), Some(&3));
    }

    #[test]
    fn test_collect_division_metrics() {
        let division = Division::new("General Services".to_string(), "GSD".to_string(), "t".to_string());
        let mut record = record_at(NaiveDate::from_ymd_opt(2024, 1, 10).unwrap());
        record.division = Some(division.id.clone());

        let metrics = collect_division_metrics(&[division], &[record]);
        assert_eq!(metrics.records_per_division.get("GSD"), Some(&1));
        assert_eq!(metrics.borrowed_per_division.get("GSD"), Some(&0));
    }
}
