use std::collections::HashMap;

use rusqlite::Connection;

use crate::error::{MonthwiseError, Result};

/// Catch-all category for unmatched expense-signed transactions.
pub const FALLBACK_EXPENSE: &str = "Other";
/// Catch-all category for unmatched income-signed transactions.
pub const FALLBACK_INCOME: &str = "Other Income";

/// Immutable name-to-id lookup rebuilt from the store on each run.
/// Resolution is a pure function of this index, a raw label, and a signed
/// amount; it performs no I/O after `load`.
pub struct CategoryIndex {
    by_name: HashMap<String, i64>,
}

impl CategoryIndex {
    pub fn load(conn: &Connection) -> Result<Self> {
        let mut stmt = conn.prepare("SELECT name, id FROM categories")?;
        let by_name: HashMap<String, i64> = stmt
            .query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?
            .collect::<std::result::Result<HashMap<_, _>, _>>()?;
        Ok(Self { by_name })
    }

    #[cfg(test)]
    pub fn from_pairs(pairs: &[(&str, i64)]) -> Self {
        Self {
            by_name: pairs.iter().map(|(n, id)| (n.to_string(), *id)).collect(),
        }
    }

    /// Resolve a raw category label to a category id. Exact case-sensitive
    /// match wins; otherwise fall back by amount sign ("Other Income" for
    /// positive amounts, "Other" for everything else). A missing fallback
    /// category fails rather than producing a null reference.
    pub fn resolve(&self, label: &str, amount: f64) -> Result<i64> {
        if let Some(&id) = self.by_name.get(label) {
            return Ok(id);
        }
        let fallback = if amount > 0.0 { FALLBACK_INCOME } else { FALLBACK_EXPENSE };
        self.by_name.get(fallback).copied().ok_or_else(|| {
            MonthwiseError::Configuration(format!(
                "fallback category '{fallback}' is missing from the taxonomy (needed for '{label}')"
            ))
        })
    }
}
