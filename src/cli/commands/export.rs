//! `pft export` command - CSV export of the record catalogue

use console::style;
use miette::{IntoDiagnostic, Result};
use std::io::Write;
use std::path::PathBuf;

use crate::cli::helpers::open_store;
use crate::cli::GlobalOpts;
use crate::core::entity::RecordStatus;
use crate::core::hierarchy::location_label;
use crate::core::store::Collection;
use crate::entities::{Cabinet, Division, Folder, Record, Shelf, StorageBox};

#[derive(clap::Args, Debug)]
pub struct ExportArgs {
    /// Output file (default: stdout)
    #[arg(long, short = 'o')]
    pub output: Option<PathBuf>,

    /// Only borrowed records
    #[arg(long, conflicts_with = "archived")]
    pub borrowed: bool,

    /// Only archived records
    #[arg(long, conflicts_with = "borrowed")]
    pub archived: bool,
}

const HEADER: [&str; 14] = [
    "pr_number",
    "description",
    "project_name",
    "status",
    "procurement_type",
    "progress_status",
    "division",
    "location",
    "stack_number",
    "date_added",
    "disposal_date",
    "abc_amount",
    "bid_amount",
    "documents_on_file",
];

pub fn run(args: ExportArgs, global: &GlobalOpts) -> Result<()> {
    let (_project, store) = open_store(global)?;

    let records: Vec<Record> = store.snapshot().map_err(|e| miette::miette!("{}", e))?;
    let shelves: Vec<Shelf> = store.snapshot().map_err(|e| miette::miette!("{}", e))?;
    let cabinets: Vec<Cabinet> = store.snapshot().map_err(|e| miette::miette!("{}", e))?;
    let folders: Vec<Folder> = store.snapshot().map_err(|e| miette::miette!("{}", e))?;
    let boxes: Vec<StorageBox> = store.snapshot().map_err(|e| miette::miette!("{}", e))?;
    let divisions: Vec<Division> = store.snapshot().map_err(|e| miette::miette!("{}", e))?;

    let records: Vec<Record> = records
        .into_iter()
        .filter(|r| {
            if args.borrowed {
                r.status == RecordStatus::Active
            } else if args.archived {
                r.status == RecordStatus::Archived
            } else {
                true
            }
        })
        .collect();

    let writer: Box<dyn Write> = match &args.output {
        Some(path) => Box::new(std::fs::File::create(path).into_diagnostic()?),
        None => Box::new(std::io::stdout()),
    };
    let mut csv = csv::Writer::from_writer(writer);

    csv.write_record(HEADER).into_diagnostic()?;
    for record in &records {
        let division = record
            .division
            .as_ref()
            .and_then(|id| divisions.iter().find(|d| &d.id == id))
            .map(|d| d.abbreviation.clone())
            .unwrap_or_default();
        let location = location_label(record, &shelves, &cabinets, &folders, &boxes);

        csv.write_record([
            record.pr_number.clone(),
            record.description.clone(),
            record.project_name.clone().unwrap_or_default(),
            record.status.to_string(),
            record.procurement_type.to_string(),
            record.progress_status.to_string(),
            division,
            location,
            record
                .stack_number
                .map(|n| n.to_string())
                .unwrap_or_default(),
            record.date_added.format("%Y-%m-%d").to_string(),
            record.disposal_date.format("%Y-%m-%d").to_string(),
            record
                .abc_amount
                .map(|a| format!("{:.2}", a))
                .unwrap_or_default(),
            record
                .bid_amount
                .map(|b| format!("{:.2}", b))
                .unwrap_or_default(),
            format!(
                "{}/{}",
                record.checklist.complete_count(),
                record.checklist.len()
            ),
        ])
        .into_diagnostic()?;
    }
    csv.flush().into_diagnostic()?;

    if let Some(path) = &args.output {
        eprintln!(
            "{} Exported {} record(s) to {}",
            style("✓").green(),
            records.len(),
            style(path.display()).cyan()
        );
    }

    Ok(())
}
