//! `pft record` command - Procurement record management
//!
//! Every write path that can disturb a folder's stack numbering finishes
//! with a reconcile of the affected folder(s).

use chrono::{Local, NaiveDate};
use console::style;
use dialoguer::{Confirm, Input, MultiSelect, Select};
use miette::{IntoDiagnostic, Result};

use crate::cli::helpers::{escape_csv, format_short_id, open_store, resolve_entity, resolve_entity_with, truncate_str};
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::entity::{Entity, ProcurementType, ProgressStatus, RecordStatus};
use crate::core::hierarchy::location_label;
use crate::core::prnumber::{month_code, next_sequence, year_code, PrNumber};
use crate::core::stack::{reconcile_folder, ReconcileOutcome};
use crate::core::store::{Collection, YamlStore};
use crate::core::Config;
use crate::entities::{
    BoxPath, Cabinet, Checklist, Division, Folder, FolderParent, Location, Record, Shelf,
    ShelfPath, StorageBox,
};

#[derive(clap::Subcommand, Debug)]
pub enum RecordCommands {
    /// List records with filtering
    List(ListArgs),

    /// File a new record into a folder
    New(NewArgs),

    /// Show a record's details
    Show(ShowArgs),

    /// Edit a record in your editor
    Edit(EditArgs),

    /// Delete records
    Delete(DeleteArgs),

    /// Check a record out to a borrower
    Borrow(BorrowArgs),

    /// Check a borrowed record back in
    Return(ReturnArgs),

    /// Move a record to another folder
    Move(MoveArgs),
}

/// Status filter
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum StatusFilter {
    /// Checked out (status `active`)
    Borrowed,
    /// On the shelf
    Archived,
    /// All statuses
    All,
}

/// Progress filter
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum ProgressFilter {
    Pending,
    Success,
    Failed,
}

/// Procurement modality
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum TypeArg {
    /// Small value procurement
    Svp,
    /// Regular bidding
    Regular,
}

impl From<TypeArg> for ProcurementType {
    fn from(arg: TypeArg) -> Self {
        match arg {
            TypeArg::Svp => ProcurementType::Svp,
            TypeArg::Regular => ProcurementType::RegularBidding,
        }
    }
}

#[derive(clap::Args, Debug)]
pub struct ListArgs {
    /// Filter by status
    #[arg(long, short = 's', default_value = "all")]
    pub status: StatusFilter,

    /// Only records in this folder (ID, code, or name)
    #[arg(long)]
    pub folder: Option<String>,

    /// Only records of this division (ID, abbreviation, or name)
    #[arg(long)]
    pub division: Option<String>,

    /// Filter by progress status
    #[arg(long)]
    pub progress: Option<ProgressFilter>,

    /// Filter by procurement type
    #[arg(long = "type")]
    pub procurement_type: Option<TypeArg>,

    /// Filter by tag
    #[arg(long)]
    pub tag: Option<String>,

    /// Search in PR number, description, and project name
    #[arg(long)]
    pub search: Option<String>,

    /// Only records whose disposal date has passed
    #[arg(long)]
    pub disposal_due: bool,

    /// Limit number of results
    #[arg(long, short = 'n')]
    pub limit: Option<usize>,

    /// Show only count
    #[arg(long)]
    pub count: bool,
}

#[derive(clap::Args, Debug)]
pub struct NewArgs {
    /// Target folder (ID, code, or name)
    #[arg(long)]
    pub folder: Option<String>,

    /// What was procured
    #[arg(long, short = 'd')]
    pub description: Option<String>,

    /// End-user division (ID, abbreviation, or name)
    #[arg(long)]
    pub division: Option<String>,

    /// Explicit PR number; omit to construct one from division and date
    #[arg(long)]
    pub pr_number: Option<String>,

    /// Date the file entered storage (default: today)
    #[arg(long)]
    pub date: Option<NaiveDate>,

    /// Procurement type
    #[arg(long = "type")]
    pub procurement_type: Option<TypeArg>,

    /// Project the procurement belongs to
    #[arg(long)]
    pub project_name: Option<String>,

    /// Approved budget for the contract
    #[arg(long)]
    pub abc: Option<f64>,

    /// Winning bid amount
    #[arg(long)]
    pub bid: Option<f64>,

    /// Mark a checklist document as present (repeatable)
    #[arg(long = "check")]
    pub checks: Vec<String>,

    /// Tags for filtering (repeatable)
    #[arg(long)]
    pub tag: Vec<String>,

    /// Free-form notes
    #[arg(long)]
    pub notes: Option<String>,

    /// Interactive mode (prompt for fields)
    #[arg(long, short = 'i')]
    pub interactive: bool,
}

#[derive(clap::Args, Debug)]
pub struct ShowArgs {
    /// Record ID, PR number, or unique ID prefix
    pub id: String,
}

#[derive(clap::Args, Debug)]
pub struct EditArgs {
    /// Record ID, PR number, or unique ID prefix
    pub id: String,
}

#[derive(clap::Args, Debug)]
pub struct DeleteArgs {
    /// Record IDs, PR numbers, or unique ID prefixes
    #[arg(required = true)]
    pub ids: Vec<String>,

    /// Skip confirmation prompt
    #[arg(long, short = 'y')]
    pub yes: bool,
}

#[derive(clap::Args, Debug)]
pub struct BorrowArgs {
    /// Record ID, PR number, or unique ID prefix
    pub id: String,

    /// Who takes the file
    #[arg(long)]
    pub by: Option<String>,

    /// Borrower's division (ID, abbreviation, or name)
    #[arg(long)]
    pub division: Option<String>,

    /// Checkout date (default: today)
    #[arg(long)]
    pub date: Option<NaiveDate>,
}

#[derive(clap::Args, Debug)]
pub struct ReturnArgs {
    /// Record ID, PR number, or unique ID prefix
    pub id: String,

    /// Return date (default: today)
    #[arg(long)]
    pub date: Option<NaiveDate>,
}

#[derive(clap::Args, Debug)]
pub struct MoveArgs {
    /// Record ID, PR number, or unique ID prefix
    pub id: String,

    /// Destination folder (ID, code, or name)
    #[arg(long)]
    pub folder: String,
}

pub fn run(cmd: RecordCommands, global: &GlobalOpts) -> Result<()> {
    match cmd {
        RecordCommands::List(args) => run_list(args, global),
        RecordCommands::New(args) => run_new(args, global),
        RecordCommands::Show(args) => run_show(args, global),
        RecordCommands::Edit(args) => run_edit(args, global),
        RecordCommands::Delete(args) => run_delete(args, global),
        RecordCommands::Borrow(args) => run_borrow(args, global),
        RecordCommands::Return(args) => run_return(args, global),
        RecordCommands::Move(args) => run_move(args, global),
    }
}

fn load<T: Entity>(store: &YamlStore) -> Result<Vec<T>> {
    store.snapshot().map_err(|e| miette::miette!("{}", e))
}

fn resolve_folder(store: &YamlStore, query: &str) -> Result<Folder> {
    resolve_entity_with(load::<Folder>(store)?, query, "folder", |f| {
        Some(f.name.as_str())
    })
}

fn resolve_division(store: &YamlStore, query: &str) -> Result<Division> {
    resolve_entity_with(load::<Division>(store)?, query, "division", |d| {
        Some(d.name.as_str())
    })
}

/// Build the full location path for a record filed into `folder`
fn location_for(store: &YamlStore, folder: &Folder) -> Result<Location> {
    match &folder.parent {
        FolderParent::Cabinet(cabinet_id) => {
            let cabinets = load::<Cabinet>(store)?;
            let cabinet = cabinets
                .iter()
                .find(|c| &c.id == cabinet_id)
                .ok_or_else(|| {
                    miette::miette!(
                        "Folder '{}' references missing cabinet {}",
                        folder.code,
                        cabinet_id
                    )
                })?;
            Ok(Location::Shelf(ShelfPath {
                shelf: cabinet.shelf.clone(),
                cabinet: cabinet.id.clone(),
                folder: folder.id.clone(),
            }))
        }
        FolderParent::Box(box_id) => Ok(Location::Box(BoxPath {
            storage_box: box_id.clone(),
            folder: folder.id.clone(),
        })),
    }
}

/// Print the outcome of a folder reconcile; write failures are warnings
fn report_reconcile(outcome: &ReconcileOutcome, quiet: bool) {
    if !quiet && outcome.changed() {
        println!(
            "  Stack numbers: {} assigned, {} cleared",
            outcome.assigned, outcome.cleared
        );
    }
    for (id, err) in &outcome.failed {
        eprintln!(
            "{} Stack update failed for {}: {}",
            style("!").yellow(),
            format_short_id(id),
            err
        );
    }
}

fn reconcile_and_report(store: &YamlStore, folder_id: &crate::core::EntityId, quiet: bool) -> Result<()> {
    let outcome = reconcile_folder(store, folder_id).map_err(|e| miette::miette!("{}", e))?;
    report_reconcile(&outcome, quiet);
    Ok(())
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

fn run_list(args: ListArgs, global: &GlobalOpts) -> Result<()> {
    let (_project, store) = open_store(global)?;

    let records = load::<Record>(&store)?;
    let shelves = load::<Shelf>(&store)?;
    let cabinets = load::<Cabinet>(&store)?;
    let folders = load::<Folder>(&store)?;
    let boxes = load::<StorageBox>(&store)?;

    let folder_filter = match &args.folder {
        Some(query) => Some(resolve_folder(&store, query)?.id),
        None => None,
    };
    let division_filter = match &args.division {
        Some(query) => Some(resolve_division(&store, query)?.id),
        None => None,
    };

    let mut records: Vec<Record> = records
        .into_iter()
        .filter(|r| match args.status {
            StatusFilter::Borrowed => r.status == RecordStatus::Active,
            StatusFilter::Archived => r.status == RecordStatus::Archived,
            StatusFilter::All => true,
        })
        .filter(|r| {
            folder_filter
                .as_ref()
                .map_or(true, |id| r.location.folder() == id)
        })
        .filter(|r| {
            division_filter
                .as_ref()
                .map_or(true, |id| r.division.as_ref() == Some(id))
        })
        .filter(|r| match args.progress {
            Some(ProgressFilter::Pending) => r.progress_status == ProgressStatus::Pending,
            Some(ProgressFilter::Success) => r.progress_status == ProgressStatus::Success,
            Some(ProgressFilter::Failed) => r.progress_status == ProgressStatus::Failed,
            None => true,
        })
        .filter(|r| match args.procurement_type {
            Some(t) => r.procurement_type == ProcurementType::from(t),
            None => true,
        })
        .filter(|r| {
            args.tag
                .as_ref()
                .map_or(true, |tag| r.tags.iter().any(|t| t.eq_ignore_ascii_case(tag)))
        })
        .filter(|r| {
            args.search.as_ref().map_or(true, |q| {
                let q = q.to_lowercase();
                r.pr_number.to_lowercase().contains(&q)
                    || r.description.to_lowercase().contains(&q)
                    || r.project_name
                        .as_ref()
                        .is_some_and(|p| p.to_lowercase().contains(&q))
            })
        })
        .filter(|r| !args.disposal_due || r.disposal_date <= today())
        .collect();

    records.sort_by(|a, b| a.date_added.cmp(&b.date_added).then(a.created.cmp(&b.created)));

    if let Some(limit) = args.limit {
        records.truncate(limit);
    }

    if args.count {
        println!("{}", records.len());
        return Ok(());
    }
    if records.is_empty() {
        println!("No records found.");
        return Ok(());
    }

    let format = match global.format {
        OutputFormat::Auto => OutputFormat::Tsv,
        f => f,
    };

    match format {
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&records).into_diagnostic()?;
            println!("{}", json);
        }
        OutputFormat::Yaml => {
            let yaml = serde_yml::to_string(&records).into_diagnostic()?;
            print!("{}", yaml);
        }
        OutputFormat::Csv => {
            println!("id,pr_number,description,status,location,stack,date_added,disposal_date");
            for record in &records {
                let location = location_label(record, &shelves, &cabinets, &folders, &boxes);
                println!(
                    "{},{},{},{},{},{},{},{}",
                    record.id,
                    escape_csv(&record.pr_number),
                    escape_csv(&record.description),
                    record.status,
                    escape_csv(&location),
                    record
                        .stack_number
                        .map(|n| n.to_string())
                        .unwrap_or_default(),
                    record.date_added.format("%Y-%m-%d"),
                    record.disposal_date.format("%Y-%m-%d"),
                );
            }
        }
        OutputFormat::Id => {
            for record in &records {
                println!("{}", record.id);
            }
        }
        OutputFormat::Md => {
            println!("| PR Number | Description | Status | Location | Stack | Date |");
            println!("|---|---|---|---|---|---|");
            for record in &records {
                let location = location_label(record, &shelves, &cabinets, &folders, &boxes);
                println!(
                    "| {} | {} | {} | {} | {} | {} |",
                    record.pr_number,
                    record.description.replace('|', "\\|"),
                    record.status,
                    location,
                    record
                        .stack_number
                        .map(|n| n.to_string())
                        .unwrap_or_else(|| "-".to_string()),
                    record.date_added.format("%Y-%m-%d"),
                );
            }
        }
        _ => {
            println!(
                "{} {} {} {} {} {}",
                format!("{:<18}", style("PR NUMBER").bold()),
                format!("{:<32}", style("DESCRIPTION").bold()),
                format!("{:<10}", style("STATUS").bold()),
                format!("{:<12}", style("LOCATION").bold()),
                format!("{:>5}", style("STACK").bold()),
                format!("{:<12}", style("DATE ADDED").bold()),
            );
            println!("{}", "-".repeat(95));

            for record in &records {
                let location = location_label(record, &shelves, &cabinets, &folders, &boxes);
                let status = match record.status {
                    RecordStatus::Active => style(record.status.to_string()).yellow(),
                    RecordStatus::Archived => style(record.status.to_string()).green(),
                };
                println!(
                    "{:<18} {:<32} {} {:<12} {:>5} {:<12}",
                    style(truncate_str(&record.pr_number, 16)).cyan(),
                    truncate_str(&record.description, 30),
                    format!("{:<10}", status),
                    truncate_str(&location, 10),
                    record
                        .stack_number
                        .map(|n| n.to_string())
                        .unwrap_or_else(|| "-".to_string()),
                    record.date_added.format("%Y-%m-%d"),
                );
            }

            println!();
            println!("{} record(s) found.", style(records.len()).cyan());
        }
    }

    Ok(())
}

fn run_new(args: NewArgs, global: &GlobalOpts) -> Result<()> {
    let (_project, store) = open_store(global)?;
    let config = Config::load();

    let records = load::<Record>(&store)?;

    let folder;
    let description: String;
    let division: Option<Division>;
    let date_added: NaiveDate;
    let procurement_type: ProcurementType;
    let mut checklist = Checklist::standard();

    if args.interactive {
        let folders = load::<Folder>(&store)?;
        if folders.is_empty() {
            return Err(miette::miette!(
                "No folders exist yet. Create one with `pft folder new` first."
            ));
        }
        let folder_labels: Vec<String> = folders
            .iter()
            .map(|f| format!("{} ({})", f.code, f.name))
            .collect();
        let selection = Select::new()
            .with_prompt("Folder")
            .items(&folder_labels)
            .default(0)
            .interact()
            .into_diagnostic()?;
        folder = folders[selection].clone();

        description = Input::new()
            .with_prompt("Description")
            .interact_text()
            .into_diagnostic()?;

        let divisions = load::<Division>(&store)?;
        division = if divisions.is_empty() {
            None
        } else {
            let mut labels: Vec<String> = divisions
                .iter()
                .map(|d| format!("{} ({})", d.abbreviation, d.name))
                .collect();
            labels.push("(none)".to_string());
            let selection = Select::new()
                .with_prompt("Division")
                .items(&labels)
                .default(0)
                .interact()
                .into_diagnostic()?;
            divisions.into_iter().nth(selection)
        };

        let date_input: String = Input::new()
            .with_prompt("Date added (YYYY-MM-DD)")
            .default(today().format("%Y-%m-%d").to_string())
            .interact_text()
            .into_diagnostic()?;
        date_added = date_input
            .parse()
            .map_err(|_| miette::miette!("Invalid date '{}': use YYYY-MM-DD", date_input))?;

        let types = ["SVP", "Regular Bidding"];
        let selection = Select::new()
            .with_prompt("Procurement type")
            .items(&types)
            .default(0)
            .interact()
            .into_diagnostic()?;
        procurement_type = if selection == 0 {
            ProcurementType::Svp
        } else {
            ProcurementType::RegularBidding
        };

        let picked = MultiSelect::new()
            .with_prompt("Documents on file (space to toggle)")
            .items(&Checklist::ITEMS)
            .interact()
            .into_diagnostic()?;
        for index in picked {
            checklist.set(Checklist::ITEMS[index], true);
        }
    } else {
        let folder_query = args
            .folder
            .as_ref()
            .ok_or_else(|| miette::miette!("--folder is required (or use --interactive)"))?;
        folder = resolve_folder(&store, folder_query)?;

        description = args
            .description
            .clone()
            .ok_or_else(|| miette::miette!("--description is required (or use --interactive)"))?;

        division = match &args.division {
            Some(query) => Some(resolve_division(&store, query)?),
            None => None,
        };
        date_added = args.date.unwrap_or_else(today);
        procurement_type = args.procurement_type.map(Into::into).unwrap_or_default();

        for item in &args.checks {
            let known = Checklist::ITEMS
                .iter()
                .find(|known| known.eq_ignore_ascii_case(item))
                .ok_or_else(|| miette::miette!("Unknown checklist document '{}'", item))?;
            checklist.set(known, true);
        }
    }

    let pr_number = match &args.pr_number {
        Some(explicit) => explicit.parse::<PrNumber>().into_diagnostic()?.to_string(),
        None => {
            let division = division.as_ref().ok_or_else(|| {
                miette::miette!("--division is required to construct a PR number")
            })?;
            let year = year_code(date_added);
            let sequence = next_sequence(&division.abbreviation, &year, &records);
            PrNumber::build(
                &division.abbreviation,
                month_code(date_added),
                &year,
                &sequence,
            )
            .into_diagnostic()?
            .to_string()
        }
    };

    let location = location_for(&store, &folder)?;

    let mut record = Record::new(
        pr_number,
        description,
        location,
        date_added,
        config.author(),
    );
    record.division = division.map(|d| d.id);
    record.procurement_type = procurement_type;
    record.project_name = args.project_name;
    record.abc_amount = args.abc;
    record.bid_amount = args.bid;
    record.checklist = checklist;
    record.tags = args.tag;
    record.notes = args.notes;

    record.validate().map_err(|e| miette::miette!("{}", e))?;
    store.put(&record).map_err(|e| miette::miette!("{}", e))?;

    println!(
        "{} Filed record {} into folder {}",
        style("✓").green(),
        style(&record.pr_number).cyan(),
        style(&folder.code).cyan()
    );
    println!(
        "   {}",
        style(store.document_path::<Record>(&record.id).display()).dim()
    );

    reconcile_and_report(&store, &folder.id, global.quiet)?;

    Ok(())
}

fn run_show(args: ShowArgs, global: &GlobalOpts) -> Result<()> {
    let (_project, store) = open_store(global)?;
    let record = resolve_entity(load::<Record>(&store)?, &args.id, "record")?;

    match global.format {
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&record).into_diagnostic()?;
            println!("{}", json);
        }
        OutputFormat::Yaml => {
            let yaml = serde_yml::to_string(&record).into_diagnostic()?;
            print!("{}", yaml);
        }
        OutputFormat::Id => println!("{}", record.id),
        _ => {
            let shelves = load::<Shelf>(&store)?;
            let cabinets = load::<Cabinet>(&store)?;
            let folders = load::<Folder>(&store)?;
            let boxes = load::<StorageBox>(&store)?;
            let divisions = load::<Division>(&store)?;

            let location = location_label(&record, &shelves, &cabinets, &folders, &boxes);
            let division = record
                .division
                .as_ref()
                .and_then(|id| divisions.iter().find(|d| &d.id == id))
                .map(|d| d.abbreviation.clone());

            println!("{}", style("─".repeat(60)).dim());
            println!(
                "{}: {}",
                style("PR Number").bold(),
                style(&record.pr_number).cyan()
            );
            println!(
                "{}: {}",
                style("Description").bold(),
                style(&record.description).yellow()
            );
            println!("{}: {}", style("Status").bold(), record.status);
            println!("{}: {}", style("Type").bold(), record.procurement_type);
            println!("{}: {}", style("Progress").bold(), record.progress_status);
            if let Some(division) = division {
                println!("{}: {}", style("Division").bold(), division);
            }
            if let Some(ref project) = record.project_name {
                println!("{}: {}", style("Project").bold(), project);
            }
            println!("{}", style("─".repeat(60)).dim());

            println!("{}: {}", style("Location").bold(), location);
            if let Some(stack) = record.stack_number {
                println!("{}: {}", style("Stack position").bold(), stack);
            }
            println!(
                "{}: {}",
                style("Date added").bold(),
                record.date_added.format("%Y-%m-%d")
            );
            println!(
                "{}: {}",
                style("Disposal date").bold(),
                record.disposal_date.format("%Y-%m-%d")
            );

            if record.status == RecordStatus::Active {
                println!();
                if let Some(ref by) = record.borrowed_by {
                    println!("{}: {}", style("Borrowed by").bold(), by);
                }
                if let Some(date) = record.borrowed_date {
                    println!(
                        "{}: {}",
                        style("Borrowed on").bold(),
                        date.format("%Y-%m-%d")
                    );
                }
            }

            if let (Some(abc), Some(bid)) = (record.abc_amount, record.bid_amount) {
                println!();
                println!("{}: {:.2}", style("ABC").bold(), abc);
                println!("{}: {:.2}", style("Winning bid").bold(), bid);
            }

            println!();
            println!(
                "{}: {}/{} documents on file",
                style("Checklist").bold(),
                record.checklist.complete_count(),
                record.checklist.len()
            );
            let missing: Vec<&str> = record
                .checklist
                .iter()
                .filter(|(_, present)| !present)
                .map(|(item, _)| item)
                .collect();
            if !missing.is_empty() && missing.len() <= 6 {
                println!("  Missing: {}", missing.join(", "));
            }

            if !record.tags.is_empty() {
                println!();
                println!("{}: {}", style("Tags").bold(), record.tags.join(", "));
            }
            if let Some(ref notes) = record.notes {
                println!();
                println!("{}", style("Notes:").bold());
                println!("{}", notes);
            }

            println!("{}", style("─".repeat(60)).dim());
            print!(
                "{}: {} | {}: {}",
                style("Created by").dim(),
                record.created_by_name,
                style("Created").dim(),
                record.created.format("%Y-%m-%d %H:%M"),
            );
            if let Some(ref editor) = record.edited_by_name {
                print!(" | {}: {}", style("Last edited by").dim(), editor);
            }
            println!();
        }
    }

    Ok(())
}

fn run_edit(args: EditArgs, global: &GlobalOpts) -> Result<()> {
    let (_project, store) = open_store(global)?;
    let config = Config::load();

    let record = resolve_entity(load::<Record>(&store)?, &args.id, "record")?;
    let old_folder = record.location.folder().clone();

    let path = store.document_path::<Record>(&record.id);
    println!(
        "Opening {} in {}...",
        style(path.display()).cyan(),
        style(config.editor()).yellow()
    );
    config.run_editor(&path).into_diagnostic()?;

    // Re-read what the editor wrote and validate it before accepting
    let mut edited: Record = crate::yaml::parse_yaml_file(&path)?;
    edited.validate().map_err(|e| miette::miette!("{}", e))?;
    edited.touch(&config.author());
    store.put(&edited).map_err(|e| miette::miette!("{}", e))?;

    println!(
        "{} Updated record {}",
        style("✓").green(),
        style(&edited.pr_number).cyan()
    );

    reconcile_and_report(&store, &old_folder, global.quiet)?;
    if edited.location.folder() != &old_folder {
        reconcile_and_report(&store, edited.location.folder(), global.quiet)?;
    }

    Ok(())
}

fn run_delete(args: DeleteArgs, global: &GlobalOpts) -> Result<()> {
    let (_project, store) = open_store(global)?;

    let mut targets = Vec::new();
    for query in &args.ids {
        let record = resolve_entity(load::<Record>(&store)?, query, "record")?;
        targets.push(record);
    }

    if !args.yes {
        let names: Vec<&str> = targets.iter().map(|r| r.pr_number.as_str()).collect();
        let confirmed = Confirm::new()
            .with_prompt(format!("Delete {} record(s): {}?", targets.len(), names.join(", ")))
            .default(false)
            .interact()
            .into_diagnostic()?;
        if !confirmed {
            println!("Aborted.");
            return Ok(());
        }
    }

    let mut affected_folders = Vec::new();
    for record in &targets {
        Collection::<Record>::remove(&store, &record.id).map_err(|e| miette::miette!("{}", e))?;
        println!(
            "{} Deleted record {}",
            style("✓").green(),
            style(&record.pr_number).cyan()
        );
        let folder = record.location.folder().clone();
        if !affected_folders.contains(&folder) {
            affected_folders.push(folder);
        }
    }

    for folder_id in &affected_folders {
        reconcile_and_report(&store, folder_id, global.quiet)?;
    }

    Ok(())
}

fn run_borrow(args: BorrowArgs, global: &GlobalOpts) -> Result<()> {
    let (_project, store) = open_store(global)?;
    let config = Config::load();

    let mut record = resolve_entity(load::<Record>(&store)?, &args.id, "record")?;
    if record.status == RecordStatus::Active {
        return Err(miette::miette!(
            "Record '{}' is already checked out to {}",
            record.pr_number,
            record.borrowed_by.as_deref().unwrap_or("someone")
        ));
    }

    let borrower: String = match args.by {
        Some(by) => by,
        None => Input::new()
            .with_prompt("Borrower name")
            .interact_text()
            .into_diagnostic()?,
    };
    let borrower_division = match &args.division {
        Some(query) => Some(resolve_division(&store, query)?.id),
        None => None,
    };

    record.status = RecordStatus::Active;
    record.borrowed_by = Some(borrower.clone());
    record.borrower_division = borrower_division;
    record.borrowed_date = Some(args.date.unwrap_or_else(today));
    record.return_date = None;
    record.touch(&config.author());

    store.put(&record).map_err(|e| miette::miette!("{}", e))?;

    println!(
        "{} Checked out {} to {}",
        style("✓").green(),
        style(&record.pr_number).cyan(),
        style(&borrower).yellow()
    );

    reconcile_and_report(&store, record.location.folder(), global.quiet)?;

    Ok(())
}

fn run_return(args: ReturnArgs, global: &GlobalOpts) -> Result<()> {
    let (_project, store) = open_store(global)?;
    let config = Config::load();

    let mut record = resolve_entity(load::<Record>(&store)?, &args.id, "record")?;
    if record.status != RecordStatus::Active {
        return Err(miette::miette!(
            "Record '{}' is not checked out",
            record.pr_number
        ));
    }

    record.status = RecordStatus::Archived;
    record.borrowed_by = None;
    record.borrower_division = None;
    record.borrowed_date = None;
    record.return_date = Some(args.date.unwrap_or_else(today));
    record.touch(&config.author());

    store.put(&record).map_err(|e| miette::miette!("{}", e))?;

    println!(
        "{} Checked in {}",
        style("✓").green(),
        style(&record.pr_number).cyan()
    );

    reconcile_and_report(&store, record.location.folder(), global.quiet)?;

    Ok(())
}

fn run_move(args: MoveArgs, global: &GlobalOpts) -> Result<()> {
    let (_project, store) = open_store(global)?;
    let config = Config::load();

    let mut record = resolve_entity(load::<Record>(&store)?, &args.id, "record")?;
    let target = resolve_folder(&store, &args.folder)?;

    let old_folder = record.location.folder().clone();
    if old_folder == target.id {
        println!("Record is already in folder '{}'.", target.code);
        return Ok(());
    }

    record.location = location_for(&store, &target)?;
    record.stack_number = None;
    record.touch(&config.author());

    store.put(&record).map_err(|e| miette::miette!("{}", e))?;

    println!(
        "{} Moved {} to folder {}",
        style("✓").green(),
        style(&record.pr_number).cyan(),
        style(&target.code).cyan()
    );

    reconcile_and_report(&store, &old_folder, global.quiet)?;
    reconcile_and_report(&store, &target.id, global.quiet)?;

    Ok(())
}
