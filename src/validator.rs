use std::collections::HashSet;

use chrono::NaiveDate;

use crate::error::{MonthwiseError, Result};
use crate::models::{Category, CategoryType, RawTable};

pub const CATEGORY_COLUMNS: &[&str] = &["id", "name", "type"];
pub const TRANSACTION_COLUMNS: &[&str] = &["date", "name", "category", "amount", "account"];

/// Input date format: month/day/2-digit-year, e.g. `01/15/24`.
pub const DATE_FORMAT: &str = "%m/%d/%y";

/// A transaction row that passed validation but has not been resolved to a
/// category id yet. The raw `category` label is carried for the resolver.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedTransaction {
    pub date: NaiveDate,
    pub name: String,
    pub category: String,
    pub amount: f64,
    pub account: String,
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn check_columns(table: &RawTable, expected: &[&str]) -> Result<()> {
    let missing: Vec<&str> = expected
        .iter()
        .filter(|c| table.column(c).is_none())
        .copied()
        .collect();
    if !missing.is_empty() {
        return Err(MonthwiseError::Schema(missing.join(", ")));
    }
    Ok(())
}

/// A trimmed cell, or `None` when absent or empty.
fn cell(row: &[String], idx: usize) -> Option<&str> {
    row.get(idx).map(|s| s.trim()).filter(|s| !s.is_empty())
}

/// Scan every column of every row for missing values and name the offending
/// columns. Runs after deduplication so dropped duplicates cannot fail it.
fn check_nulls(headers: &[String], rows: &[&Vec<String>]) -> Result<()> {
    let mut with_nulls: Vec<&str> = Vec::new();
    for (idx, header) in headers.iter().enumerate() {
        if rows.iter().any(|row| cell(row, idx).is_none()) {
            with_nulls.push(header);
        }
    }
    if !with_nulls.is_empty() {
        return Err(MonthwiseError::DataIntegrity(format!(
            "column(s): {}",
            with_nulls.join(", ")
        )));
    }
    Ok(())
}

fn join_unique(values: &[String]) -> String {
    let mut seen = HashSet::new();
    let unique: Vec<&str> = values
        .iter()
        .map(|v| v.as_str())
        .filter(|v| seen.insert(*v))
        .collect();
    unique.join(", ")
}

// ---------------------------------------------------------------------------
// Categories
// ---------------------------------------------------------------------------

/// Validate a raw category table: required columns, duplicate normalization,
/// null scan, integer ids, and the income/expense type domain. Whole-batch
/// fail-fast: the first broken rule aborts with nothing returned.
pub fn validate_categories(table: &RawTable) -> Result<Vec<Category>> {
    check_columns(table, CATEGORY_COLUMNS)?;
    let id_idx = table.column("id").unwrap();
    let name_idx = table.column("name").unwrap();
    let type_idx = table.column("type").unwrap();

    // Normalize type to lowercase, then drop duplicates: first by id, then
    // by (name, type), keeping the first occurrence of each.
    let mut seen_ids: HashSet<String> = HashSet::new();
    let mut seen_name_type: HashSet<(String, String)> = HashSet::new();
    let mut kept: Vec<(Option<String>, Option<String>, Option<String>)> = Vec::new();
    for row in &table.rows {
        let id = cell(row, id_idx).map(str::to_string);
        let name = cell(row, name_idx).map(str::to_string);
        let cat_type = cell(row, type_idx).map(|t| t.to_lowercase());

        if let Some(id) = &id {
            // Canonicalize parseable ids so "01" and "1" dedupe together,
            // the way an integer-typed id column would.
            let key = id
                .parse::<i64>()
                .map(|v| v.to_string())
                .unwrap_or_else(|_| id.clone());
            if !seen_ids.insert(key) {
                continue;
            }
        }
        if let (Some(name), Some(cat_type)) = (&name, &cat_type) {
            if !seen_name_type.insert((name.clone(), cat_type.clone())) {
                continue;
            }
        }
        kept.push((id, name, cat_type));
    }

    let mut with_nulls: Vec<&str> = Vec::new();
    for (header, has_null) in [
        ("id", kept.iter().any(|(id, _, _)| id.is_none())),
        ("name", kept.iter().any(|(_, name, _)| name.is_none())),
        ("type", kept.iter().any(|(_, _, t)| t.is_none())),
    ] {
        if has_null {
            with_nulls.push(header);
        }
    }
    if !with_nulls.is_empty() {
        return Err(MonthwiseError::DataIntegrity(format!(
            "column(s): {}",
            with_nulls.join(", ")
        )));
    }

    let bad_ids: Vec<String> = kept
        .iter()
        .filter_map(|(id, _, _)| id.as_deref())
        .filter(|id| id.parse::<i64>().is_err())
        .map(str::to_string)
        .collect();
    if !bad_ids.is_empty() {
        return Err(MonthwiseError::FieldType(format!(
            "ids must be integers, got: {}",
            join_unique(&bad_ids)
        )));
    }

    let bad_types: Vec<String> = kept
        .iter()
        .filter_map(|(_, _, t)| t.as_deref())
        .filter(|t| CategoryType::parse(t).is_none())
        .map(str::to_string)
        .collect();
    if !bad_types.is_empty() {
        return Err(MonthwiseError::InvalidValue(format!(
            "category type(s): {}",
            join_unique(&bad_types)
        )));
    }

    Ok(kept
        .into_iter()
        .map(|(id, name, cat_type)| Category {
            id: id.unwrap().parse().unwrap(),
            name: name.unwrap(),
            category_type: CategoryType::parse(&cat_type.unwrap()).unwrap(),
        })
        .collect())
}

// ---------------------------------------------------------------------------
// Transactions
// ---------------------------------------------------------------------------

/// Validate a raw transaction table: required columns, exact-duplicate-row
/// removal, null scan, strict `mm/dd/yy` date parse, decimal amounts.
pub fn validate_transactions(table: &RawTable) -> Result<Vec<ValidatedTransaction>> {
    check_columns(table, TRANSACTION_COLUMNS)?;
    let date_idx = table.column("date").unwrap();
    let name_idx = table.column("name").unwrap();
    let category_idx = table.column("category").unwrap();
    let amount_idx = table.column("amount").unwrap();
    let account_idx = table.column("account").unwrap();

    // Drop rows that duplicate an earlier row in every column.
    let mut seen: HashSet<&Vec<String>> = HashSet::new();
    let kept: Vec<&Vec<String>> = table.rows.iter().filter(|row| seen.insert(*row)).collect();

    check_nulls(&table.headers, &kept)?;

    let bad_dates: Vec<String> = kept
        .iter()
        .filter_map(|row| cell(row, date_idx))
        .filter(|raw| NaiveDate::parse_from_str(raw, DATE_FORMAT).is_err())
        .map(str::to_string)
        .collect();
    if !bad_dates.is_empty() {
        return Err(MonthwiseError::DateFormat(format!(
            "date must be in mm/dd/yy format, got: {}",
            join_unique(&bad_dates)
        )));
    }

    let bad_amounts: Vec<String> = kept
        .iter()
        .filter_map(|row| cell(row, amount_idx))
        .filter(|raw| raw.parse::<f64>().is_err())
        .map(str::to_string)
        .collect();
    if !bad_amounts.is_empty() {
        return Err(MonthwiseError::FieldType(format!(
            "amounts must be decimal numbers, got: {}",
            join_unique(&bad_amounts)
        )));
    }

    Ok(kept
        .into_iter()
        .map(|row| ValidatedTransaction {
            date: NaiveDate::parse_from_str(cell(row, date_idx).unwrap(), DATE_FORMAT).unwrap(),
            name: cell(row, name_idx).unwrap().to_string(),
            category: cell(row, category_idx).unwrap().to_string(),
            amount: cell(row, amount_idx).unwrap().parse().unwrap(),
            account: cell(row, account_idx).unwrap().to_string(),
        })
        .collect())
}
