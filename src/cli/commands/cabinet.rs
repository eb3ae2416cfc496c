//! `pft cabinet` command - Cabinet management

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
pub enum CabinetCommands {
    /// List cabinets
    List(ListArgs),

    /// Create a new cabinet on a shelf
    New(NewArgs),

    /// Show a cabinet's details
    Show(ShowArgs),

    /// Edit a cabinet in your editor
    Edit(EditArgs),

    /// Delete an empty cabinet
    Delete(DeleteArgs),
}

#[derive(clap::Args, Debug)]
pub struct ListArgs {
    /// Only cabinets on this shelf (ID, code, or name)
    #[arg(long)]
    pub shelf: Option<String>,

    /// Search in name and code
    #[arg(long)]
    pub search: Option<String>,

    /// Show only count
    #[arg(long)]
    pub count: bool,
}

#[derive(clap::Args, Debug)]
pub struct NewArgs {
    /// Parent shelf (ID, code, or name)
    #[arg(long, short = 's')]
    pub shelf: String,

    /// Cabinet name
    #[arg(long, short = 'n')]
    pub name: Option<String>,

    /// Short code used in location labels (e.g., "C3")
    #[arg(long, short = 'c')]
    pub code: Option<String>,

    /// Free-form description
    #[arg(long, short = 'd')]
    pub description: Option<String>,
}

#[derive(clap::Args, Debug)]
pub struct ShowArgs {
    /// Cabinet ID, code, or unique ID prefix
    pub id: String,
}

#[derive(clap::Args, Debug)]
pub struct EditArgs {
    /// Cabinet ID, code, or unique ID prefix
    pub id: String,
}

#[derive(clap::Args, Debug)]
pub struct DeleteArgs {
    /// Cabinet ID, code, or unique ID prefix
    pub id: String,

    /// Skip confirmation prompt
    #[arg(long, short = 'y')]
    pub yes: bool,
}

const LIST_COLUMNS: [ColumnDef; 5] = [
    ColumnDef::new("id", "ID", 17),
    ColumnDef::new("code", "CODE", 8),
    ColumnDef::new("name", "NAME", 25),
    ColumnDef::new("shelf", "SHELF", 8),
    ColumnDef::new("created", "CREATED", 12),
];

pub fn run(cmd: CabinetCommands, global: &GlobalOpts) -> Result<()> {
    match cmd {
        CabinetCommands::List(args) => run_list(args, global),
        CabinetCommands::New(args) => run_new(args, global),
        CabinetCommands::Show(args) => run_show(args, global),
        CabinetCommands::Edit(args) => run_edit(args, global),
        CabinetCommands::Delete(args) => run_delete(args, global),
    }
}

fn resolve_shelf(store: &crate::core::store::YamlStore, query: &str) -> Result<Shelf> {
    let shelves: Vec<Shelf> = store.snapshot().map_err(|e| miette::miette!("{}", e))?;
    resolve_entity_with(shelves, query, "shelf", |s| Some(s.name.as_str()))
}

fn run_list(args: ListArgs, global: &GlobalOpts) -> Result<()> {
    let (_project, store) = open_store(global)?;
    let cabinets: Vec<Cabinet> = store.snapshot().map_err(|e| miette::miette!("{}", e))?;
    let shelves: Vec<Shelf> = store.snapshot().map_err(|e| miette::miette!("{}", e))?;

    let shelf_filter = match &args.shelf {
        Some(query) => Some(resolve_shelf(&store, query)?.id),
        None => None,
    };

    let cabinets: Vec<Cabinet> = cabinets
        .into_iter()
        .filter(|c| shelf_filter.as_ref().map_or(true, |id| &c.shelf == id))
        .filter(|c| {
            args.search.as_ref().map_or(true, |q| {
                let q = q.to_lowercase();
                c.name.to_lowercase().contains(&q) || c.code.to_lowercase().contains(&q)
            })
        })
        .collect();

    if args.count {
        println!("{}", cabinets.len());
        return Ok(());
    }
    if cabinets.is_empty() {
        println!("No cabinets found.");
        return Ok(());
    }

    match global.format {
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&cabinets).into_diagnostic()?;
            println!("{}", json);
        }
        OutputFormat::Yaml => {
            let yaml = serde_yml::to_string(&cabinets).into_diagnostic()?;
            print!("{}", yaml);
        }
        format => {
            let rows = cabinets
                .iter()
                .map(|c| {
                    let shelf_code = shelves
                        .iter()
                        .find(|s| s.id == c.shelf)
                        .map(|s| s.code.clone())
                        .unwrap_or_else(|| "?".to_string());
                    TableRow::new(c.id.to_string())
                        .cell("id", CellValue::Id(c.id.to_string()))
                        .cell("code", CellValue::Text(c.code.clone()))
                        .cell("name", CellValue::Text(c.name.clone()))
                        .cell("shelf", CellValue::Text(shelf_code))
                        .cell("created", CellValue::Date(c.created))
                })
                .collect();
            TableFormatter::new(&LIST_COLUMNS, "cabinet").output(rows, format);
        }
    }

    Ok(())
}

fn run_new(args: NewArgs, global: &GlobalOpts) -> Result<()> {
    let (_project, store) = open_store(global)?;
    let config = Config::load();

    let shelf = resolve_shelf(&store, &args.shelf)?;

    let name: String = match args.name {
        Some(name) => name,
        None => Input::new()
            .with_prompt("Cabinet name")
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

    let mut cabinet = Cabinet::new(shelf.id.clone(), name, code, config.author());
    cabinet.description = args.description;

    store.put(&cabinet).map_err(|e| miette::miette!("{}", e))?;

    println!(
        "{} Created cabinet {} on shelf {}",
        style("✓").green(),
        style(&cabinet.code).cyan(),
        style(&shelf.code).cyan()
    );
    println!(
        "   {}",
        style(store.document_path::<Cabinet>(&cabinet.id).display()).dim()
    );

    Ok(())
}

fn run_show(args: ShowArgs, global: &GlobalOpts) -> Result<()> {
    let (_project, store) = open_store(global)?;
    let cabinets: Vec<Cabinet> = store.snapshot().map_err(|e| miette::miette!("{}", e))?;
    let cabinet = resolve_entity_with(cabinets, &args.id, "cabinet", |c| Some(c.name.as_str()))?;

    match global.format {
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&cabinet).into_diagnostic()?;
            println!("{}", json);
        }
        OutputFormat::Id => println!("{}", cabinet.id),
        _ => {
            let yaml = serde_yml::to_string(&cabinet).into_diagnostic()?;
            print!("{}", yaml);
        }
    }

    Ok(())
}

fn run_edit(args: EditArgs, global: &GlobalOpts) -> Result<()> {
    let (_project, store) = open_store(global)?;
    let config = Config::load();

    let cabinets: Vec<Cabinet> = store.snapshot().map_err(|e| miette::miette!("{}", e))?;
    let cabinet = resolve_entity_with(cabinets, &args.id, "cabinet", |c| Some(c.name.as_str()))?;

    let path = store.document_path::<Cabinet>(&cabinet.id);
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

    let cabinets: Vec<Cabinet> = store.snapshot().map_err(|e| miette::miette!("{}", e))?;
    let cabinet =
        resolve_entity_with(cabinets.clone(), &args.id, "cabinet", |c| Some(c.name.as_str()))?;

    let folders: Vec<Folder> = store.snapshot().map_err(|e| miette::miette!("{}", e))?;
    let records: Vec<Record> = store.snapshot().map_err(|e| miette::miette!("{}", e))?;

    let counts = count_descendants(Tier::Cabinet, &cabinet.id, &cabinets, &folders, &records);
    if !counts.is_empty() {
        return Err(miette::miette!(
            "Cannot delete cabinet '{}': it still holds {}. Move or delete its contents first.",
            cabinet.code,
            counts
        ));
    }

    if !args.yes {
        let confirmed = Confirm::new()
            .with_prompt(format!(
                "Delete cabinet '{}' ({})?",
                cabinet.code, cabinet.name
            ))
            .default(false)
            .interact()
            .into_diagnostic()?;
        if !confirmed {
            println!("Aborted.");
            return Ok(());
        }
    }

    Collection::<Cabinet>::remove(&store, &cabinet.id).map_err(|e| miette::miette!("{}", e))?;
    println!(
        "{} Deleted cabinet {}",
        style("✓").green(),
        style(&cabinet.code).cyan()
    );

    Ok(())
}
