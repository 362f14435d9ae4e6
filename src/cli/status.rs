use crate::db::get_connection;
use crate::error::Result;
use crate::settings::db_path;

pub fn run() -> Result<()> {
    let path = db_path();
    if !path.exists() {
        println!("No database found at {} \u{2014} run `monthwise init` first.", path.display());
        return Ok(());
    }
    let conn = get_connection(&path)?;

    let categories: i64 = conn.query_row("SELECT count(*) FROM categories", [], |r| r.get(0))?;
    let transactions: i64 =
        conn.query_row("SELECT count(*) FROM transactions", [], |r| r.get(0))?;
    let range: (Option<String>, Option<String>) = conn.query_row(
        "SELECT MIN(date), MAX(date) FROM transactions",
        [],
        |r| Ok((r.get(0)?, r.get(1)?)),
    )?;

    println!("Database:     {}", path.display());
    println!("Categories:   {categories}");
    println!("Transactions: {transactions}");
    if let (Some(from), Some(to)) = range {
        println!("Date range:   {from} to {to}");
    }
    Ok(())
}
