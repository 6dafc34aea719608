use clap::Parser;
use credcycle::cli::{init_logging, Cli, Commands};

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Inspect => credcycle::cli::commands::inspect::execute(&cli),
        Commands::Probe { timeout } => credcycle::cli::commands::probe::execute(&cli, timeout),
        Commands::Version => credcycle::cli::commands::version::execute(),
    };

    if let Err(e) = result {
        credcycle::cli::output::error(&e.to_string());
        std::process::exit(1);
    }
}
