//! `pft shelf` command - Shelf management

use console::style;
use dialoguer::{Confirm, Input};
use miette::{IntoDiagnostic, Result};

use crate::cli::helpers::{open_store, resolve_entity_with};
use crate::cli::table::{CellValue, ColumnDef, TableFormatter, TableRow};
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::hierarchy::{count_descendants, Tier};
use crate::core::store::Collection;
use crate::core::Config;
use crate::entities::{Cabinet, Folder, Record, Shelf};

#[derive(clap::Subcommand, Debug)]
pub enum ShelfCommands {
    /// List shelves
    List(ListArgs),

    /// Create a new shelf
    New(NewArgs),

    /// Show a shelf's details
    Show(ShowArgs),

    /// Edit a shelf in your editor
    Edit(EditArgs),

    /// Delete an empty shelf
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
    /// Shelf name
    #[arg(long, short = 'n')]
    pub name: Option<String>,

    /// Short code used in location labels (e.g., "S1")
    #[arg(long, short = 'c')]
    pub code: Option<String>,

    /// Free-form description
    #[arg(long, short = 'd')]
    pub description: Option<String>,
}

#[derive(clap::Args, Debug)]
pub struct ShowArgs {
    /// Shelf ID, code, or unique ID prefix
    pub id: String,
}

#[derive(clap::Args, Debug)]
pub struct EditArgs {
    /// Shelf ID, code, or unique ID prefix
    pub id: String,
}

#[derive(clap::Args, Debug)]
pub struct DeleteArgs {
    /// Shelf ID, code, or unique ID prefix
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

pub fn run(cmd: ShelfCommands, global: &GlobalOpts) -> Result<()> {
    match cmd {
        ShelfCommands::List(args) => run_list(args, global),
        ShelfCommands::New(args) => run_new(args, global),
        ShelfCommands::Show(args) => run_show(args, global),
        ShelfCommands::Edit(args) => run_edit(args, global),
        ShelfCommands::Delete(args) => run_delete(args, global),
    }
}

fn run_list(args: ListArgs, global: &GlobalOpts) -> Result<()> {
    let (_project, store) = open_store(global)?;
    let shelves: Vec<Shelf> = store.snapshot().map_err(|e| miette::miette!("{}", e))?;

    let shelves: Vec<Shelf> = shelves
        .into_iter()
        .filter(|s| {
            args.search.as_ref().map_or(true, |q| {
                let q = q.to_lowercase();
                s.name.to_lowercase().contains(&q) || s.code.to_lowercase().contains(&q)
            })
        })
        .collect();

    if args.count {
        println!("{}", shelves.len());
        return Ok(());
    }
    if shelves.is_empty() {
        println!("No shelves found.");
        return Ok(());
    }

    match global.format {
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&shelves).into_diagnostic()?;
            println!("{}", json);
        }
        OutputFormat::Yaml => {
            let yaml = serde_yml::to_string(&shelves).into_diagnostic()?;
            print!("{}", yaml);
        }
        format => {
            let rows = shelves
                .iter()
                .map(|s| {
                    TableRow::new(s.id.to_string())
                        .cell("id", CellValue::Id(s.id.to_string()))
                        .cell("code", CellValue::Text(s.code.clone()))
                        .cell("name", CellValue::Text(s.name.clone()))
                        .cell(
                            "description",
                            match &s.description {
                                Some(d) => CellValue::Text(d.clone()),
                                None => CellValue::Empty,
                            },
                        )
                        .cell("created", CellValue::Date(s.created))
                })
                .collect();
            TableFormatter::new(&LIST_COLUMNS, "shelf").output(rows, format);
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
            .with_prompt("Shelf name")
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

    let mut shelf = Shelf::new(name, code, config.author());
    shelf.description = args.description;

    store.put(&shelf).map_err(|e| miette::miette!("{}", e))?;

    println!(
        "{} Created shelf {} ({})",
        style("✓").green(),
        style(&shelf.code).cyan(),
        style(&shelf.name).yellow()
    );
    println!(
        "   {}",
        style(store.document_path::<Shelf>(&shelf.id).display()).dim()
    );

    Ok(())
}

fn run_show(args: ShowArgs, global: &GlobalOpts) -> Result<()> {
    let (_project, store) = open_store(global)?;
    let shelves: Vec<Shelf> = store.snapshot().map_err(|e| miette::miette!("{}", e))?;
    let shelf = resolve_entity_with(shelves, &args.id, "shelf", |s| Some(s.name.as_str()))?;

    match global.format {
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&shelf).into_diagnostic()?;
            println!("{}", json);
        }
        OutputFormat::Id => println!("{}", shelf.id),
        _ => {
            let yaml = serde_yml::to_string(&shelf).into_diagnostic()?;
            print!("{}", yaml);
        }
    }

    Ok(())
}

fn run_edit(args: EditArgs, global: &GlobalOpts) -> Result<()> {
    let (_project, store) = open_store(global)?;
    let config = Config::load();

    let shelves: Vec<Shelf> = store.snapshot().map_err(|e| miette::miette!("{}", e))?;
    let shelf = resolve_entity_with(shelves, &args.id, "shelf", |s| Some(s.name.as_str()))?;

    let path = store.document_path::<Shelf>(&shelf.id);
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

    let shelves: Vec<Shelf> = store.snapshot().map_err(|e| miette::miette!("{}", e))?;
    let shelf = resolve_entity_with(shelves, &args.id, "shelf", |s| Some(s.name.as_str()))?;

    let cabinets: Vec<Cabinet> = store.snapshot().map_err(|e| miette::miette!("{}", e))?;
    let folders: Vec<Folder> = store.snapshot().map_err(|e| miette::miette!("{}", e))?;
    let records: Vec<Record> = store.snapshot().map_err(|e| miette::miette!("{}", e))?;

    let counts = count_descendants(Tier::Shelf, &shelf.id, &cabinets, &folders, &records);
    if !counts.is_empty() {
        return Err(miette::miette!(
            "Cannot delete shelf '{}': it still holds {}. Move or delete its contents first.",
            shelf.code,
            counts
        ));
    }

    if !args.yes {
        let confirmed = Confirm::new()
            .with_prompt(format!("Delete shelf '{}' ({})?", shelf.code, shelf.name))
            .default(false)
            .interact()
            .into_diagnostic()?;
        if !confirmed {
            println!("Aborted.");
            return Ok(());
        }
    }

    Collection::<Shelf>::remove(&store, &shelf.id).map_err(|e| miette::miette!("{}", e))?;
    println!("{} Deleted shelf {}", style("✓").green(), style(&shelf.code).cyan());

    Ok(())
}
