pub mod demo;
pub mod init;
pub mod load;
pub mod report;
pub mod status;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "monthwise", about = "Personal finance CLI: ingest CSV transactions and report monthly summaries.")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Set up monthwise: choose a data directory and initialize the database.
    Init {
        /// Path for monthwise data (default: ~/Documents/monthwise)
        #[arg(long = "data-dir")]
        data_dir: Option<String>,
    },
    /// Load a category taxonomy and/or a transaction batch from CSV.
    Load {
        /// Category CSV with columns id,name,type (replaces the stored taxonomy)
        #[arg(long)]
        categories: Option<String>,
        /// Transaction CSV with columns date,name,category,amount,account
        #[arg(long)]
        transactions: Option<String>,
        /// Transaction write mode: append or replace
        #[arg(long, default_value = "append")]
        mode: String,
    },
    /// Generate reports.
    Report {
        #[command(subcommand)]
        command: ReportCommands,
    },
    /// Load sample categories and transactions to explore the reports.
    Demo,
    /// Show current database and summary statistics.
    Status,
}

#[derive(Subcommand)]
pub enum ReportCommands {
    /// Grand totals and average monthly metrics.
    Summary {
        /// Year filter: YYYY
        #[arg(long)]
        year: Option<i32>,
    },
    /// Monthly income/expenses/net table; defaults to current vs prior year.
    Monthly {
        #[arg(long)]
        year: Option<i32>,
    },
    /// Ranked expense and income totals by category.
    Categories {
        #[arg(long)]
        year: Option<i32>,
    },
}
