use std::collections::HashSet;

use rusqlite::Connection;

use crate::error::{MonthwiseError, Result};
use crate::models::{Category, NewTransaction};

/// How `upsert_transactions` treats the existing transaction table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteMode {
    Append,
    Replace,
}

impl WriteMode {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "append" => Some(Self::Append),
            "replace" => Some(Self::Replace),
            _ => None,
        }
    }
}

/// Atomically discard any stored taxonomy and install the given one. Runs in
/// a single transaction so a reader never sees a half-replaced category set.
pub fn replace_categories(conn: &mut Connection, categories: &[Category]) -> Result<()> {
    let tx = conn.transaction()?;
    tx.execute("DELETE FROM categories", [])?;
    {
        let mut stmt =
            tx.prepare("INSERT INTO categories (id, name, type) VALUES (?1, ?2, ?3)")?;
        for cat in categories {
            stmt.execute(rusqlite::params![cat.id, cat.name, cat.category_type.as_str()])?;
        }
    }
    tx.commit()?;
    Ok(())
}

/// Insert a resolved transaction batch. Every `category_id` is checked
/// against the stored taxonomy before any row is written; an unknown
/// reference aborts the whole batch. `Replace` clears the table first.
pub fn upsert_transactions(
    conn: &mut Connection,
    transactions: &[NewTransaction],
    mode: WriteMode,
) -> Result<usize> {
    let known: HashSet<i64> = {
        let mut stmt = conn.prepare("SELECT id FROM categories")?;
        let ids = stmt
            .query_map([], |row| row.get(0))?
            .collect::<std::result::Result<HashSet<_>, _>>()?;
        ids
    };
    let mut seen = HashSet::new();
    let unknown: Vec<String> = transactions
        .iter()
        .map(|t| t.category_id)
        .filter(|id| !known.contains(id) && seen.insert(*id))
        .map(|id| id.to_string())
        .collect();
    if !unknown.is_empty() {
        return Err(MonthwiseError::ReferentialIntegrity(format!(
            "category id(s) not in stored taxonomy: {}",
            unknown.join(", ")
        )));
    }

    let tx = conn.transaction()?;
    if mode == WriteMode::Replace {
        tx.execute("DELETE FROM transactions", [])?;
    }
    let mut inserted = 0usize;
    {
        let mut stmt = tx.prepare(
            "INSERT INTO transactions (date, name, category_id, amount, account) \
             VALUES (?1, ?2, ?3, ?4, ?5)",
        )?;
        for t in transactions {
            stmt.execute(rusqlite::params![
                t.date,
                t.name,
                t.category_id,
                t.amount,
                t.account
            ])?;
            inserted += 1;
        }
    }
    tx.commit()?;
    Ok(inserted)
}
