//! `pft box` command - Box management
//!
//! Boxes are the alternate top tier: a folder lives either in a cabinet on
//! a shelf, or directly in a box.

use console::style;
use dialoguer::{Confirm, Input};
use miette::{IntoDiagnostic, Result};

use crate::cli::helpers::{open_store, resolve_entity_with};
use crate::cli::table::{CellValue, ColumnDef, TableFormatter, TableRow};
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::hierarchy::{count_descendants, Tier};
use crate::core::store::Collection;
use crate::core::Config;
use crate::entities::{Cabinet, Folder, Record, StorageBox};

#[derive(clap::Subcommand, Debug)]
pub enum BoxCommands {
    /// List boxes
    List(ListArgs),

    /// Create a new box
    New(NewArgs),

    /// Show a box's details
    Show(ShowArgs),

    /// Edit a box in your editor
    Edit(EditArgs),

    /// Delete an empty box
    Delete(DeleteArgs),
}

#[derive(clap::Args, Debug)]
pub struct ListArgs {
    /// Search in name and code
    #[arg(long)]
    pub search: Option<String>,

    /// Show only count
    #[arg(long)]
    pub count: bool,
}

#[derive(clap::Args, Debug)]
pub struct NewArgs {
    /// Box name
    #[arg(long, short = 'n')]
    pub name: Option<String>,

    /// Short code used in location labels (e.g., "B7")
    #[arg(long, short = 'c')]
    pub code: Option<String>,

    /// Free-form description
    #[arg(long, short = 'd')]
    pub description: Option<String>,
}

#[derive(clap::Args, Debug)]
pub struct ShowArgs {
    /// Box ID, code, or unique ID prefix
    pub id: String,
}

#[derive(clap::Args, Debug)]
pub struct EditArgs {
    /// Box ID, code, or unique ID prefix
    pub id: String,
}

#[derive(clap::Args, Debug)]
pub struct DeleteArgs {
    /// Box ID, code, or unique ID prefix
    pub id: String,

    /// Skip confirmation prompt
    #[arg(long, short = 'y')]
    pub yes: bool,
}

const LIST_COLUMNS: [ColumnDef; 5] = [
    ColumnDef::new("id", "ID", 17),
    ColumnDef::new("code", "CODE", 8),
    ColumnDef::new("name", "NAME", 25),
    ColumnDef::new("description", "DESCRIPTION", 30),
    ColumnDef::new("created", "CREATED", 12),
];

pub fn run(cmd: BoxCommands, global: &GlobalOpts) -> Result<()> {
    match cmd {
        BoxCommands::List(args) => run_list(args, global),
        BoxCommands::New(args) => run_new(args, global),
        BoxCommands::Show(args) => run_show(args, global),
        BoxCommands::Edit(args) => run_edit(args, global),
        BoxCommands::Delete(args) => run_delete(args, global),
    }
}

fn run_list(args: ListArgs, global: &GlobalOpts) -> Result<()> {
    let (_project, store) = open_store(global)?;
    let boxes: Vec<StorageBox> = store.snapshot().map_err(|e| miette::miette!("{}", e))?;

    let boxes: Vec<StorageBox> = boxes
        .into_iter()
        .filter(|b| {
            args.search.as_ref().map_or(true, |q| {
                let q = q.to_lowercase();
                b.name.to_lowercase().contains(&q) || b.code.to_lowercase().contains(&q)
            })
        })
        .collect();

    if args.count {
        println!("{}", boxes.len());
        return Ok(());
    }
    if boxes.is_empty() {
        println!("No boxes found.");
        return Ok(());
    }

    match global.format {
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&boxes).into_diagnostic()?;
            println!("{}", json);
        }
        OutputFormat::Yaml => {
            let yaml = serde_yml::to_string(&boxes).into_diagnostic()?;
            print!("{}", yaml);
        }
        format => {
            let rows = boxes
                .iter()
                .map(|b| {
                    TableRow::new(b.id.to_string())
                        .cell("id", CellValue::Id(b.id.to_string()))
                        .cell("code", CellValue::Text(b.code.clone()))
                        .cell("name", CellValue::Text(b.name.clone()))
                        .cell(
                            "description",
                            match &b.description {
                                Some(d) => CellValue::Text(d.clone()),
                                None => CellValue::Empty,
                            },
                        )
                        .cell("created", CellValue::Date(b.created))
                })
                .collect();
            TableFormatter::new(&LIST_COLUMNS, "box").output(rows, format);
        }
    }

    Ok(())
}

fn run_new(args: NewArgs, global: &GlobalOpts) -> Result<()> {
    let (_project, store) = open_store(global)?;
    let config = Config::load();

    let name: String = match args.name {
        Some(name) => name,
        None => Input::new()
            .with_prompt("Box name")
            .interact_text()
            .into_diagnostic()?,
    };
    let code: String = match args.code {
        Some(code) => code,
        None => Input::new()
            .with_prompt("Short code")
            .interact_text()
            .into_diagnostic()?,
    };

    let mut storage_box = StorageBox::new(name, code, config.author());
    storage_box.description = args.description;

    store.put(&storage_box).map_err(|e| miette::miette!("{}", e))?;

    println!(
        "{} Created box {} ({})",
        style("✓").green(),
        style(&storage_box.code).cyan(),
        style(&storage_box.name).yellow()
    );
    println!(
        "   {}",
        style(store.document_path::<StorageBox>(&storage_box.id).display()).dim()
    );

    Ok(())
}

fn run_show(args: ShowArgs, global: &GlobalOpts) -> Result<()> {
    let (_project, store) = open_store(global)?;
    let boxes: Vec<StorageBox> = store.snapshot().map_err(|e| miette::miette!("{}", e))?;
    let storage_box = resolve_entity_with(boxes, &args.id, "box", |b| Some(b.name.as_str()))?;

    match global.format {
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&storage_box).into_diagnostic()?;
            println!("{}", json);
        }
        OutputFormat::Id => println!("{}", storage_box.id),
        _ => {
            let yaml = serde_yml::to_string(&storage_box).into_diagnostic()?;
            print!("{}", yaml);
        }
    }

    Ok(())
}

fn run_edit(args: EditArgs, global: &GlobalOpts) -> Result<()> {
    let (_project, store) = open_store(global)?;
    let config = Config::load();

    let boxes: Vec<StorageBox> = store.snapshot().map_err(|e| miette::miette!("{}", e))?;
    let storage_box = resolve_entity_with(boxes, &args.id, "box", |b| Some(b.name.as_str()))?;

    let path = store.document_path::<StorageBox>(&storage_box.id);
    println!(
        "Opening {} in {}...",
        style(path.display()).cyan(),
        style(config.editor()).yellow()
    );
    config.run_editor(&path).into_diagnostic()?;

    Ok(())
}

fn run_delete(args: DeleteArgs, global: &GlobalOpts) -> Result<()> {
    let (_project, store) = open_store(global)?;

    let boxes: Vec<StorageBox> = store.snapshot().map_err(|e| miette::miette!("{}", e))?;
    let storage_box = resolve_entity_with(boxes, &args.id, "box", |b| Some(b.name.as_str()))?;

    let cabinets: Vec<Cabinet> = store.snapshot().map_err(|e| miette::miette!("{}", e))?;
    let folders: Vec<Folder> = store.snapshot().map_err(|e| miette::miette!("{}", e))?;
    let records: Vec<Record> = store.snapshot().map_err(|e| miette::miette!("{}", e))?;

    let counts = count_descendants(Tier::Box, &storage_box.id, &cabinets, &folders, &records);
    if !counts.is_empty() {
        return Err(miette::miette!(
            "Cannot delete box '{}': it still holds {}. Move or delete its contents first.",
            storage_box.code,
            counts
        ));
    }

    if !args.yes {
        let confirmed = Confirm::new()
            .with_prompt(format!(
                "Delete box '{}' ({})?",
                storage_box.code, storage_box.name
            ))
            .default(false)
            .interact()
            .into_diagnostic()?;
        if !confirmed {
            println!("Aborted.");
            return Ok(());
        }
    }

    Collection::<StorageBox>::remove(&store, &storage_box.id)
        .map_err(|e| miette::miette!("{}", e))?;
    println!(
        "{} Deleted box {}",
        style("✓").green(),
        style(&storage_box.code).cyan()
    );

    Ok(())
}
