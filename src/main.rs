mod cli;
mod db;
mod error;
mod fmt;
mod ingest;
mod models;
mod reports;
mod resolver;
mod settings;
mod store;
mod validator;

use clap::Parser;

use cli::{Cli, Commands, ReportCommands};

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Init { data_dir } => cli::init::run(data_dir),
        Commands::Load {
            categories,
            transactions,
            mode,
        } => cli::load::run(categories.as_deref(), transactions.as_deref(), &mode),
        Commands::Report { command } => match command {
            ReportCommands::Summary { year } => cli::report::summary(year),
            ReportCommands::Monthly { year } => cli::report::monthly(year),
            ReportCommands::Categories { year } => cli::report::categories(year),
        },
        Commands::Demo => cli::demo::run(),
        Commands::Status => cli::status::run(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
