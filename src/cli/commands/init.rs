//! `pft init` command - Initialize a new PFT project

use console::style;
use miette::{IntoDiagnostic, Result};
use std::path::Path;

use crate::core::project::{Project, ProjectError, COLLECTION_DIRS};

const GITIGNORE: &str = "# Editor backups\n*.swp\n*~\n\n# Exports\n*.csv\n";

#[derive(clap::Args, Debug)]
pub struct InitArgs {
    /// Directory to initialize (default: current directory)
    #[arg(default_value = ".")]
    pub path: std::path::PathBuf,

    /// Also initialize a git repository
    #[arg(long)]
    pub git: bool,

    /// Force initialization even if .pft/ already exists
    #[arg(long)]
    pub force: bool,
}

pub fn run(args: InitArgs) -> Result<()> {
    let target = match args.path.as_os_str().to_str() {
        Some(".") => std::env::current_dir().into_diagnostic()?,
        _ => args.path.clone(),
    };

    if !target.exists() {
        std::fs::create_dir_all(&target).into_diagnostic()?;
        println!(
            "{} Created directory {}",
            style("✓").green(),
            style(target.display()).cyan()
        );
    }

    if args.git {
        setup_git(&target)?;
    }

    let attempt = if args.force {
        Project::init_force(&target)
    } else {
        Project::init(&target)
    };

    let project = match attempt {
        Ok(project) => project,
        Err(ProjectError::AlreadyExists(at)) => {
            println!(
                "{} PFT project already exists at {}",
                style("!").yellow(),
                style(at.display()).cyan()
            );
            println!();
            println!("Use {} to reinitialize", style("pft init --force").yellow());
            return Ok(());
        }
        Err(e) => return Err(miette::miette!("{}", e)),
    };

    println!(
        "{} Initialized PFT project at {}",
        style("✓").green(),
        style(project.root().display()).cyan()
    );
    println!();
    println!("Created project structure:");
    println!("  {}", style(".pft/").dim());
    println!("  {}", style(".pft/config.yaml").dim());
    for dir in COLLECTION_DIRS {
        println!("  {}", style(format!("{}/", dir)).dim());
    }
    println!();
    println!("Next steps:");
    for (cmd, what) in [
        ("pft shelf new --name \"North Wing\" --code S1", "Create your first shelf"),
        ("pft record new", "File a procurement record"),
        ("pft validate", "Validate project files"),
    ] {
        println!("  {} {}", style(cmd).yellow(), what);
    }

    Ok(())
}

fn setup_git(target: &Path) -> Result<()> {
    if target.join(".git").exists() {
        println!("{} Git repository already exists", style("✓").green());
        return Ok(());
    }

    let output = std::process::Command::new("git")
        .arg("init")
        .current_dir(target)
        .output()
        .into_diagnostic()?;
    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(miette::miette!("Failed to initialize git: {}", stderr));
    }
    println!("{} Initialized git repository", style("✓").green());

    let gitignore = target.join(".gitignore");
    if !gitignore.exists() {
        std::fs::write(&gitignore, GITIGNORE).into_diagnostic()?;
    }
    Ok(())
}
