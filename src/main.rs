use clap::Parser;
use miette::Result;
use pft::cli::commands as cmd;
use pft::cli::{Cli, Commands};

fn main() -> Result<()> {
    // Die silently on a broken pipe instead of panicking, so
    // `pft record list | head` behaves like any other Unix tool.
    #[cfg(unix)]
    unsafe {
        libc::signal(libc::SIGPIPE, libc::SIG_DFL);
    }

    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(true)
                .context_lines(2)
                .tab_width(4)
                .build(),
        )
    }))?;

    let cli = Cli::parse();
    let global = cli.global;

    match cli.command {
        Commands::Init(args) => cmd::init::run(args),
        Commands::Shelf(c) => cmd::shelf::run(c, &global),
        Commands::Cabinet(c) => cmd::cabinet::run(c, &global),
        Commands::Folder(c) => cmd::folder::run(c, &global),
        Commands::Box(c) => cmd::boxes::run(c, &global),
        Commands::Division(c) => cmd::division::run(c, &global),
        Commands::Record(c) => cmd::record::run(c, &global),
        Commands::Status(args) => cmd::status::run(args, &global),
        Commands::Export(args) => cmd::export::run(args, &global),
        Commands::Validate(args) => cmd::validate::run(args, &global),
        Commands::Completions(args) => cmd::completions::run(args),
    }
}
