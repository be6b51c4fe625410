use anyhow::Result;
use clap::Parser;

mod cli;
mod commands;
mod logging;

use cli::{Cli, Commands, OutputFormat};
use commands::Rendered;

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init_tracing(cli.verbose);

    let (rendered, output) = match cli.command {
        Commands::Analyze(args) => (commands::analyze(&args)?, args.output),
        Commands::Report {
            result,
            detailed,
            pdf,
            output,
        } => (
            commands::report(&result, OutputFormat::for_report(detailed, pdf))?,
            output,
        ),
        Commands::Rules { weights } => (
            Rendered::Text(commands::rules(weights.as_deref())?),
            None,
        ),
    };

    commands::emit(&rendered, output.as_deref())
}
