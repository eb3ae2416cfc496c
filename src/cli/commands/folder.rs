//! `pft folder` command - Folder management
//!
//! A folder belongs to exactly one parent: a cabinet (shelf path) or a box
//! (box path). `new` takes `--cabinet` or `--box`, never both.

use console::style;
use dialoguer::{Confirm, Input};
use miette::{IntoDiagnostic, Result};

use crate::cli::helpers::{open_store, resolve_entity_with};
use crate::cli::table::{CellValue, ColumnDef, TableFormatter, TableRow};
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::hierarchy::{count_descendants, Tier};
use crate::core::store::{Collection, YamlStore};
use crate::core::Config;
use crate::entities::{Cabinet, Folder, FolderParent, Record, StorageBox};

#[derive(clap::Subcommand, Debug)]
pub enum FolderCommands {
    /// List folders
    List(ListArgs),

    /// Create a new folder in a cabinet or a box
    New(NewArgs),

    /// Show a folder's details
    Show(ShowArgs),

    /// Edit a folder in your editor
    Edit(EditArgs),

    /// Delete an empty folder
    Delete(DeleteArgs),
}

#[derive(clap::Args, Debug)]
pub struct ListArgs {
    /// Only folders in this cabinet (ID, code, or name)
    #[arg(long, conflicts_with = "storage_box")]
    pub cabinet: Option<String>,

    /// Only folders in this box (ID, code, or name)
    #[arg(long = "box", conflicts_with = "cabinet")]
    pub storage_box: Option<String>,

    /// Search in name and code
    #[arg(long)]
    pub search: Option<String>,

    /// Show only count
    #[arg(long)]
    pub count: bool,
}

#[derive(clap::Args, Debug)]
pub struct NewArgs {
    /// Parent cabinet (ID, code, or name)
    #[arg(long, conflicts_with = "storage_box")]
    pub cabinet: Option<String>,

    /// Parent box (ID, code, or name)
    #[arg(long = "box", conflicts_with = "cabinet")]
    pub storage_box: Option<String>,

    /// Folder name
    #[arg(long, short = 'n')]
    pub name: Option<String>,

    /// Short code used in location labels (e.g., "F12")
    #[arg(long, short = 'c')]
    pub code: Option<String>,

    /// Physical folder color
    #[arg(long)]
    pub color: Option<String>,
}

#[derive(clap::Args, Debug)]
pub struct ShowArgs {
    /// Folder ID, code, or unique ID prefix
    pub id: String,
}

#[derive(clap::Args, Debug)]
pub struct EditArgs {
    /// Folder ID, code, or unique ID prefix
    pub id: String,
}

#[derive(clap::Args, Debug)]
pub struct DeleteArgs {
    /// Folder ID, code, or unique ID prefix
    pub id: String,

    /// Skip confirmation prompt
    #[arg(long, short = 'y')]
    pub yes: bool,
}

const LIST_COLUMNS: [ColumnDef; 6] = [
    ColumnDef::new("id", "ID", 17),
    ColumnDef::new("code", "CODE", 8),
    ColumnDef::new("name", "NAME", 25),
    ColumnDef::new("parent", "PARENT", 10),
    ColumnDef::new("color", "COLOR", 10),
    ColumnDef::new("created", "CREATED", 12),
];

pub fn run(cmd: FolderCommands, global: &GlobalOpts) -> Result<()> {
    match cmd {
        FolderCommands::List(args) => run_list(args, global),
        FolderCommands::New(args) => run_new(args, global),
        FolderCommands::Show(args) => run_show(args, global),
        FolderCommands::Edit(args) => run_edit(args, global),
        FolderCommands::Delete(args) => run_delete(args, global),
    }
}

fn resolve_cabinet(store: &YamlStore, query: &str) -> Result<Cabinet> {
    let cabinets: Vec<Cabinet> = store.snapshot().map_err(|e| miette::miette!("{}", e))?;
    resolve_entity_with(cabinets, query, "cabinet", |c| Some(c.name.as_str()))
}

fn resolve_box(store: &YamlStore, query: &str) -> Result<StorageBox> {
    let boxes: Vec<StorageBox> = store.snapshot().map_err(|e| miette::miette!("{}", e))?;
    resolve_entity_with(boxes, query, "box", |b| Some(b.name.as_str()))
}

fn run_list(args: ListArgs, global: &GlobalOpts) -> Result<()> {
    let (_project, store) = open_store(global)?;
    let folders: Vec<Folder> = store.snapshot().map_err(|e| miette::miette!("{}", e))?;
    let cabinets: Vec<Cabinet> = store.snapshot().map_err(|e| miette::miette!("{}", e))?;
    let boxes: Vec<StorageBox> = store.snapshot().map_err(|e| miette::miette!("{}", e))?;

    let cabinet_filter = match &args.cabinet {
        Some(query) => Some(resolve_cabinet(&store, query)?.id),
        None => None,
    };
    let box_filter = match &args.storage_box {
        Some(query) => Some(resolve_box(&store, query)?.id),
        None => None,
    };

    let folders: Vec<Folder> = folders
        .into_iter()
        .filter(|f| {
            cabinet_filter
                .as_ref()
                .map_or(true, |id| f.parent.cabinet() == Some(id))
        })
        .filter(|f| {
            box_filter
                .as_ref()
                .map_or(true, |id| f.parent.storage_box() == Some(id))
        })
        .filter(|f| {
            args.search.as_ref().map_or(true, |q| {
                let q = q.to_lowercase();
                f.name.to_lowercase().contains(&q) || f.code.to_lowercase().contains(&q)
            })
        })
        .collect();

    if args.count {
        println!("{}", folders.len());
        return Ok(());
    }
    if folders.is_empty() {
        println!("No folders found.");
        return Ok(());
    }

    match global.format {
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&folders).into_diagnostic()?;
            println!("{}", json);
        }
        OutputFormat::Yaml => {
            let yaml = serde_yml::to_string(&folders).into_diagnostic()?;
            print!("{}", yaml);
        }
        format => {
            let rows = folders
                .iter()
                .map(|f| {
                    let parent = match &f.parent {
                        FolderParent::Cabinet(id) => cabinets
                            .iter()
                            .find(|c| &c.id == id)
                            .map(|c| c.code.clone())
                            .unwrap_or_else(|| "?".to_string()),
                        FolderParent::Box(id) => boxes
                            .iter()
                            .find(|b| &b.id == id)
                            .map(|b| b.code.clone())
                            .unwrap_or_else(|| "?".to_string()),
                    };
                    TableRow::new(f.id.to_string())
                        .cell("id", CellValue::Id(f.id.to_string()))
                        .cell("code", CellValue::Text(f.code.clone()))
                        .cell("name", CellValue::Text(f.name.clone()))
                        .cell("parent", CellValue::Text(parent))
                        .cell(
                            "color",
                            match &f.color {
                                Some(c) => CellValue::Text(c.clone()),
                                None => CellValue::Empty,
                            },
                        )
                        .cell("created", CellValue::Date(f.created))
                })
                .collect();
            TableFormatter::new(&LIST_COLUMNS, "folder").output(rows, format);
        }
    }

    Ok(())
}

fn run_new(args: NewArgs, global: &GlobalOpts) -> Result<()> {
    let (_project, store) = open_store(global)?;
    let config = Config::load();

    let (parent, parent_code) = match (&args.cabinet, &args.storage_box) {
        (Some(query), None) => {
            let cabinet = resolve_cabinet(&store, query)?;
            (FolderParent::Cabinet(cabinet.id.clone()), cabinet.code)
        }
        (None, Some(query)) => {
            let storage_box = resolve_box(&store, query)?;
            (FolderParent::Box(storage_box.id.clone()), storage_box.code)
        }
        _ => {
            return Err(miette::miette!(
                "A folder needs exactly one parent: pass --cabinet or --box"
            ))
        }
    };

    let name: String = match args.name {
        Some(name) => name,
        None => Input::new()
            .with_prompt("Folder name")
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

    let mut folder = Folder::new(parent, name, code, config.author());
    folder.color = args.color;

    store.put(&folder).map_err(|e| miette::miette!("{}", e))?;

    println!(
        "{} Created folder {} under {}",
        style("✓").green(),
        style(&folder.code).cyan(),
        style(&parent_code).cyan()
    );
    println!(
        "   {}",
        style(store.document_path::<Folder>(&folder.id).display()).dim()
    );

    Ok(())
}

fn run_show(args: ShowArgs, global: &GlobalOpts) -> Result<()> {
    let (_project, store) = open_store(global)?;
    let folders: Vec<Folder> = store.snapshot().map_err(|e| miette::miette!("{}", e))?;
    let folder = resolve_entity_with(folders, &args.id, "folder", |f| Some(f.name.as_str()))?;

    match global.format {
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&folder).into_diagnostic()?;
            println!("{}", json);
        }
        OutputFormat::Id => println!("{}", folder.id),
        _ => {
            let yaml = serde_yml::to_string(&folder).into_diagnostic()?;
            print!("{}", yaml);
        }
    }

    Ok(())
}

fn run_edit(args: EditArgs, global: &GlobalOpts) -> Result<()> {
    let (_project, store) = open_store(global)?;
    let config = Config::load();

    let folders: Vec<Folder> = store.snapshot().map_err(|e| miette::miette!("{}", e))?;
    let folder = resolve_entity_with(folders, &args.id, "folder", |f| Some(f.name.as_str()))?;

    let path = store.document_path::<Folder>(&folder.id);
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

    let folders: Vec<Folder> = store.snapshot().map_err(|e| miette::miette!("{}", e))?;
    let folder =
        resolve_entity_with(folders.clone(), &args.id, "folder", |f| Some(f.name.as_str()))?;

    let cabinets: Vec<Cabinet> = store.snapshot().map_err(|e| miette::miette!("{}", e))?;
    let records: Vec<Record> = store.snapshot().map_err(|e| miette::miette!("{}", e))?;

    let counts = count_descendants(Tier::Folder, &folder.id, &cabinets, &folders, &records);
    if !counts.is_empty() {
        return Err(miette::miette!(
            "Cannot delete folder '{}': it still holds {}. Move or delete its records first.",
            folder.code,
            counts
        ));
    }

    if !args.yes {
        let confirmed = Confirm::new()
            .with_prompt(format!("Delete folder '{}' ({})?", folder.code, folder.name))
            .default(false)
            .interact()
            .into_diagnostic()?;
        if !confirmed {
            println!("Aborted.");
            return Ok(());
        }
    }

    Collection::<Folder>::remove(&store, &folder.id).map_err(|e| miette::miette!("{}", e))?;
    println!(
        "{} Deleted folder {}",
        style("✓").green(),
        style(&folder.code).cyan()
    );

    Ok(())
}
