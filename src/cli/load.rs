use std::path::PathBuf;

use crate::db::get_connection;
use crate::error::{MonthwiseError, Result};
use crate::ingest::{load_categories, load_transactions};
use crate::settings::db_path;
use crate::store::WriteMode;

pub fn run(categories: Option<&str>, transactions: Option<&str>, mode: &str) -> Result<()> {
    if categories.is_none() && transactions.is_none() {
        return Err(MonthwiseError::Other(
            "nothing to load: pass --categories and/or --transactions".to_string(),
        ));
    }
    let mode = WriteMode::parse(mode)
        .ok_or_else(|| MonthwiseError::Other(format!("unknown mode '{mode}', expected append or replace")))?;

    let mut conn = get_connection(&db_path())?;

    if let Some(path) = categories {
        let n = load_categories(&mut conn, &PathBuf::from(path))?;
        println!("{n} categories loaded (taxonomy replaced)");
    }
    if let Some(path) = transactions {
        let n = load_transactions(&mut conn, &PathBuf::from(path), mode)?;
        println!("{n} transactions loaded");
    }
    Ok(())
}
