use std::path::Path;

use rusqlite::Connection;

use crate::error::Result;
use crate::models::{NewTransaction, RawTable};
use crate::resolver::CategoryIndex;
use crate::store::{replace_categories, upsert_transactions, WriteMode};
use crate::validator::{validate_categories, validate_transactions};

/// Read a headed CSV file into a raw table. No validation happens here;
/// ragged rows are tolerated so the validator can report them properly.
pub fn read_table(path: &Path) -> Result<RawTable> {
    let file = std::fs::File::open(path)?;
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(std::io::BufReader::new(file));
    let headers: Vec<String> = rdr.headers()?.iter().map(|h| h.trim().to_string()).collect();
    let mut rows = Vec::new();
    for result in rdr.records() {
        let record = result?;
        rows.push(record.iter().map(str::to_string).collect());
    }
    Ok(RawTable { headers, rows })
}

/// Validate a taxonomy file and install it, discarding any prior taxonomy.
/// Returns the number of categories stored.
pub fn load_categories(conn: &mut Connection, path: &Path) -> Result<usize> {
    let table = read_table(path)?;
    let categories = validate_categories(&table)?;
    replace_categories(conn, &categories)?;
    Ok(categories.len())
}

/// Validate a transaction file, resolve every row to a category id against
/// the stored taxonomy, and persist the batch. Any validation or resolution
/// failure aborts before a single row is written.
pub fn load_transactions(conn: &mut Connection, path: &Path, mode: WriteMode) -> Result<usize> {
    let table = read_table(path)?;
    let validated = validate_transactions(&table)?;

    let index = CategoryIndex::load(conn)?;
    let mut resolved = Vec::with_capacity(validated.len());
    for t in validated {
        let category_id = index.resolve(&t.category, t.amount)?;
        resolved.push(NewTransaction {
            date: t.date.format("%Y-%m-%d").to_string(),
            name: t.name,
            category_id,
            amount: t.amount,
            account: t.account,
        });
    }

    upsert_transactions(conn, &resolved, mode)
}
