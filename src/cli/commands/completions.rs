//! Shell completion scripts
//!
//! Writes a completion script for the requested shell to stdout, e.g.
//! `source <(pft completions bash)` in `~/.bashrc`, or
//! `pft completions fish > ~/.config/fish/completions/pft.fish`.

use clap::CommandFactory;
use clap_complete::{generate, Shell};
use miette::Result;
use std::io;

use crate::cli::Cli;

#[derive(clap::Args, Debug)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}

pub fn run(args: CompletionsArgs) -> Result<()> {
    let mut cmd = Cli::command();
    generate(args.shell, &mut cmd, "pft", &mut io::stdout());
    Ok(())
}
