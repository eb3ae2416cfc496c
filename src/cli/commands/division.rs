//! `pft division` command - Division management
//!
//! Divisions are the originating offices whose abbreviations anchor PR
//! numbers. Deleting one is refused while any record still references it.

use console::style;
use dialoguer::{Confirm, Input};
use miette::{IntoDiagnostic, Result};

use crate::cli::helpers::{open_store, resolve_entity_with};
use crate::cli::table::{CellValue, ColumnDef, TableFormatter, TableRow};
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::hierarchy::records_in_division;
use crate::core::store::Collection;
use crate::core::Config;
use crate::entities::{Division, Record};

#[derive(clap::Subcommand, Debug)]
pub enum DivisionCommands {
    /// List divisions
    List(ListArgs),

    /// Create a new division
    New(NewArgs),

    /// Show a division's details
    Show(ShowArgs),

    /// Edit a division in your editor
    Edit(EditArgs),

    /// Delete an unreferenced division
    Delete(DeleteArgs),
}

#[derive(clap::Args, Debug)]
pub struct ListArgs {
    /// Search in name and abbreviation
    #[arg(long)]
    pub search: Option<String>,

    /// Show only count
    #[arg(long)]
    pub count: bool,
}

#[derive(clap::Args, Debug)]
pub struct NewArgs {
    /// Division name
    #[arg(long, short = 'n')]
    pub name: Option<String>,

    /// Abbreviation used in PR numbers (e.g., "GSD")
    #[arg(long, short = 'a')]
    pub abbreviation: Option<String>,
}

#[derive(clap::Args, Debug)]
pub struct ShowArgs {
    /// Division ID, abbreviation, or unique ID prefix
    pub id: String,
}

#[derive(clap::Args, Debug)]
pub struct EditArgs {
    /// Division ID, abbreviation, or unique ID prefix
    pub id: String,
}

#[derive(clap::Args, Debug)]
pub struct DeleteArgs {
    /// Division ID, abbreviation, or unique ID prefix
    pub id: String,

    /// Skip confirmation prompt
    #[arg(long, short = 'y')]
    pub yes: bool,
}

const LIST_COLUMNS: [ColumnDef; 4] = [
    ColumnDef::new("id", "ID", 17),
    ColumnDef::new("abbreviation", "ABBR", 8),
    ColumnDef::new("name", "NAME", 35),
    ColumnDef::new("created", "CREATED", 12),
];

pub fn run(cmd: DivisionCommands, global: &GlobalOpts) -> Result<()> {
    match cmd {
        DivisionCommands::List(args) => run_list(args, global),
        DivisionCommands::New(args) => run_new(args, global),
        DivisionCommands::Show(args) => run_show(args, global),
        DivisionCommands::Edit(args) => run_edit(args, global),
        DivisionCommands::Delete(args) => run_delete(args, global),
    }
}

fn run_list(args: ListArgs, global: &GlobalOpts) -> Result<()> {
    let (_project, store) = open_store(global)?;
    let divisions: Vec<Division> = store.snapshot().map_err(|e| miette::miette!("{}", e))?;

    let divisions: Vec<Division> = divisions
        .into_iter()
        .filter(|d| {
            args.search.as_ref().map_or(true, |q| {
                let q = q.to_lowercase();
                d.name.to_lowercase().contains(&q) || d.abbreviation.to_lowercase().contains(&q)
            })
        })
        .collect();

    if args.count {
        println!("{}", divisions.len());
        return Ok(());
    }
    if divisions.is_empty() {
        println!("No divisions found.");
        return Ok(());
    }

    match global.format {
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&divisions).into_diagnostic()?;
            println!("{}", json);
        }
        OutputFormat::Yaml => {
            let yaml = serde_yml::to_string(&divisions).into_diagnostic()?;
            print!("{}", yaml);
        }
        format => {
            let rows = divisions
                .iter()
                .map(|d| {
                    TableRow::new(d.id.to_string())
                        .cell("id", CellValue::Id(d.id.to_string()))
                        .cell("abbreviation", CellValue::Text(d.abbreviation.clone()))
                        .cell("name", CellValue::Text(d.name.clone()))
                        .cell("created", CellValue::Date(d.created))
                })
                .collect();
            TableFormatter::new(&LIST_COLUMNS, "division").output(rows, format);
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
            .with_prompt("Division name")
            .interact_text()
            .into_diagnostic()?,
    };
    let abbreviation: String = match args.abbreviation {
        Some(abbr) => abbr,
        None => Input::new()
            .with_prompt("Abbreviation")
            .interact_text()
            .into_diagnostic()?,
    };

    let division = Division::new(name, abbreviation, config.author());
    store.put(&division).map_err(|e| miette::miette!("{}", e))?;

    println!(
        "{} Created division {} ({})",
        style("✓").green(),
        style(&division.abbreviation).cyan(),
        style(&division.name).yellow()
    );
    println!(
        "   {}",
        style(store.document_path::<Division>(&division.id).display()).dim()
    );

    Ok(())
}

fn run_show(args: ShowArgs, global: &GlobalOpts) -> Result<()> {
    let (_project, store) = open_store(global)?;
    let divisions: Vec<Division> = store.snapshot().map_err(|e| miette::miette!("{}", e))?;
    let division = resolve_entity_with(divisions, &args.id, "division", |d| Some(d.name.as_str()))?;

    match global.format {
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&division).into_diagnostic()?;
            println!("{}", json);
        }
        OutputFormat::Id => println!("{}", division.id),
        _ => {
            let yaml = serde_yml::to_string(&division).into_diagnostic()?;
            print!("{}", yaml);
        }
    }

    Ok(())
}

fn run_edit(args: EditArgs, global: &GlobalOpts) -> Result<()> {
    let (_project, store) = open_store(global)?;
    let config = Config::load();

    let divisions: Vec<Division> = store.snapshot().map_err(|e| miette::miette!("{}", e))?;
    let division = resolve_entity_with(divisions, &args.id, "division", |d| Some(d.name.as_str()))?;

    let path = store.document_path::<Division>(&division.id);
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

    let divisions: Vec<Division> = store.snapshot().map_err(|e| miette::miette!("{}", e))?;
    let division = resolve_entity_with(divisions, &args.id, "division", |d| Some(d.name.as_str()))?;

    let records: Vec<Record> = store.snapshot().map_err(|e| miette::miette!("{}", e))?;
    let referenced = records_in_division(&records, &division.id);
    if referenced > 0 {
        return Err(miette::miette!(
            "Cannot delete division '{}': {} record(s) still reference it.",
            division.abbreviation,
            referenced
        ));
    }

    if !args.yes {
        let confirmed = Confirm::new()
            .with_prompt(format!(
                "Delete division '{}' ({})?",
                division.abbreviation, division.name
            ))
            .default(false)
            .interact()
            .into_diagnostic()?;
        if !confirmed {
            println!("Aborted.");
            return Ok(());
        }
    }

    Collection::<Division>::remove(&store, &division.id).map_err(|e| miette::miette!("{}", e))?;
    println!(
        "{} Deleted division {}",
        style("✓").green(),
        style(&division.abbreviation).cyan()
    );

    Ok(())
}
