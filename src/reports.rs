use rusqlite::Connection;

use crate::error::Result;

// ---------------------------------------------------------------------------
// Year filter helper
// ---------------------------------------------------------------------------

fn year_clause(years: Option<&[i32]>) -> String {
    match years {
        Some(ys) if !ys.is_empty() => {
            let list: Vec<String> = ys.iter().map(|y| format!("'{y:04}'")).collect();
            format!("substr(t.date, 1, 4) IN ({})", list.join(", "))
        }
        _ => "1=1".to_string(),
    }
}

pub fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

/// Calendar years present in the stored transactions, ascending.
pub fn years_present(conn: &Connection) -> Result<Vec<i32>> {
    let mut stmt = conn
        .prepare("SELECT DISTINCT substr(date, 1, 4) FROM transactions ORDER BY 1")?;
    let raw: Vec<String> = stmt
        .query_map([], |row| row.get(0))?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(raw.iter().filter_map(|y| y.parse().ok()).collect())
}

// ---------------------------------------------------------------------------
// Summary
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct MonthlyRow {
    /// Bucket key, `YYYY-MM`.
    pub month: String,
    /// Short month name for display, e.g. "Jan".
    pub label: String,
    pub income: f64,
    /// Expense sum, kept negative.
    pub expenses: f64,
    pub abs_expenses: f64,
    pub net_balance: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CategoryTotal {
    /// `None` when the join finds no category row for a transaction.
    pub name: Option<String>,
    /// Absolute total, always non-negative.
    pub total: f64,
}

/// The read-only contract handed to the presentation layer. Recomputed from
/// the store on every call; never cached.
#[derive(Debug, Clone, PartialEq)]
pub struct FinanceSummary {
    pub total_income: f64,
    /// Kept signed (negative or zero).
    pub total_expenses: f64,
    pub net_balance: f64,
    /// Chronological, months with no transactions absent.
    pub months: Vec<MonthlyRow>,
    /// Sorted descending by magnitude.
    pub expenses_by_category: Vec<CategoryTotal>,
    pub income_by_category: Vec<CategoryTotal>,
    pub avg_monthly_income: f64,
    pub avg_monthly_expenses: f64,
    pub avg_monthly_net: f64,
}

/// Compute the full aggregate view, optionally restricted to a set of
/// calendar years. A transaction counts as income when `amount > 0` and as
/// expense otherwise; the sign, not the category's declared type, drives the
/// bucketing. Zero amounts land on the expense side of that rule.
pub fn get_summary(conn: &Connection, years: Option<&[i32]>) -> Result<FinanceSummary> {
    let clause = year_clause(years);

    let sql = format!(
        "SELECT substr(t.date, 1, 7) AS month, \
         SUM(CASE WHEN t.amount > 0 THEN t.amount ELSE 0 END) AS income, \
         SUM(CASE WHEN t.amount <= 0 THEN t.amount ELSE 0 END) AS expenses \
         FROM transactions t WHERE {clause} \
         GROUP BY month ORDER BY month"
    );
    let mut stmt = conn.prepare(&sql)?;
    let raw: Vec<(String, f64, f64)> = stmt
        .query_map([], |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)))?
        .collect::<std::result::Result<Vec<_>, _>>()?;

    let months: Vec<MonthlyRow> = raw
        .into_iter()
        .map(|(month, income, expenses)| {
            let income = round2(income);
            let expenses = round2(expenses);
            MonthlyRow {
                label: month_label(&month).to_string(),
                month,
                income,
                expenses,
                abs_expenses: expenses.abs(),
                net_balance: round2(income + expenses),
            }
        })
        .collect();

    let expenses_by_category = category_totals(conn, &clause, "t.amount <= 0", "-t.amount")?;
    let income_by_category = category_totals(conn, &clause, "t.amount > 0", "t.amount")?;

    let total_income = round2(months.iter().map(|m| m.income).sum());
    let total_expenses = round2(months.iter().map(|m| m.expenses).sum());
    let n = months.len() as f64;
    let (avg_income, avg_expenses, avg_net) = if months.is_empty() {
        (0.0, 0.0, 0.0)
    } else {
        (
            round2(months.iter().map(|m| m.income).sum::<f64>() / n),
            round2(months.iter().map(|m| m.abs_expenses).sum::<f64>() / n),
            round2(months.iter().map(|m| m.net_balance).sum::<f64>() / n),
        )
    };

    Ok(FinanceSummary {
        total_income,
        total_expenses,
        net_balance: round2(total_income + total_expenses),
        months,
        expenses_by_category,
        income_by_category,
        avg_monthly_income: avg_income,
        avg_monthly_expenses: avg_expenses,
        avg_monthly_net: avg_net,
    })
}

fn category_totals(
    conn: &Connection,
    clause: &str,
    sign_filter: &str,
    amount_expr: &str,
) -> Result<Vec<CategoryTotal>> {
    let sql = format!(
        "SELECT c.name, SUM({amount_expr}) AS total \
         FROM transactions t LEFT JOIN categories c ON t.category_id = c.id \
         WHERE {clause} AND {sign_filter} \
         GROUP BY c.name ORDER BY total DESC"
    );
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map([], |row| {
        Ok(CategoryTotal {
            name: row.get(0)?,
            total: round2(row.get(1)?),
        })
    })?;
    Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
}

fn month_label(month: &str) -> &'static str {
    const LABELS: [&str; 12] = [
        "Jan", "Feb", "Mar", "Apr", "May", "Jun",
        "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
    ];
    month
        .get(5..7)
        .and_then(|mm| mm.parse::<usize>().ok())
        .and_then(|mm| mm.checked_sub(1))
        .and_then(|i| LABELS.get(i))
        .copied()
        .unwrap_or("???")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{get_connection, init_db};
    use crate::models::{Category, CategoryType, NewTransaction};
    use crate::store::{replace_categories, upsert_transactions, WriteMode};

    fn test_db() -> (tempfile::TempDir, Connection) {
        let dir = tempfile::tempdir().unwrap();
        let conn = get_connection(&dir.path().join("test.db")).unwrap();
        init_db(&conn).unwrap();
        (dir, conn)
    }

    fn cat(id: i64, name: &str, category_type: CategoryType) -> Category {
        Category { id, name: name.to_string(), category_type }
    }

    fn txn(date: &str, name: &str, category_id: i64, amount: f64) -> NewTransaction {
        NewTransaction {
            date: date.to_string(),
            name: name.to_string(),
            category_id,
            amount,
            account: "Checking".to_string(),
        }
    }

    /// Taxonomy and transactions for the standard scenario: January buys
    /// groceries and gets paid, February has one unmatched gift resolved to
    /// "Other Income".
    fn seed_scenario(conn: &mut Connection) {
        replace_categories(
            conn,
            &[
                cat(1, "Groceries", CategoryType::Expense),
                cat(2, "Salary", CategoryType::Income),
                cat(3, "Other", CategoryType::Expense),
                cat(4, "Other Income", CategoryType::Income),
            ],
        )
        .unwrap();
        upsert_transactions(
            conn,
            &[
                txn("2024-01-15", "Store A", 1, -50.0),
                txn("2024-01-31", "Employer", 2, 2000.0),
                txn("2024-02-05", "Gift", 4, 25.0),
            ],
            WriteMode::Append,
        )
        .unwrap();
    }

    #[test]
    fn test_scenario_monthly_net_balances() {
        let (_dir, mut conn) = test_db();
        seed_scenario(&mut conn);
        let summary = get_summary(&conn, None).unwrap();
        assert_eq!(summary.months.len(), 2);
        assert_eq!(summary.months[0].month, "2024-01");
        assert_eq!(summary.months[0].net_balance, 1950.0);
        assert_eq!(summary.months[1].month, "2024-02");
        assert_eq!(summary.months[1].net_balance, 25.0);
        assert_eq!(summary.total_income, 2025.0);
        assert_eq!(summary.total_expenses, -50.0);
        assert_eq!(summary.net_balance, 1975.0);
    }

    #[test]
    fn test_month_labels() {
        let (_dir, mut conn) = test_db();
        seed_scenario(&mut conn);
        let summary = get_summary(&conn, None).unwrap();
        assert_eq!(summary.months[0].label, "Jan");
        assert_eq!(summary.months[1].label, "Feb");
    }

    #[test]
    fn test_expenses_kept_negative_abs_kept_positive() {
        let (_dir, mut conn) = test_db();
        seed_scenario(&mut conn);
        let summary = get_summary(&conn, None).unwrap();
        assert_eq!(summary.months[0].expenses, -50.0);
        assert_eq!(summary.months[0].abs_expenses, 50.0);
    }

    #[test]
    fn test_category_breakdowns_sorted_descending() {
        let (_dir, mut conn) = test_db();
        replace_categories(
            &mut conn,
            &[
                cat(1, "Groceries", CategoryType::Expense),
                cat(2, "Rent", CategoryType::Expense),
                cat(3, "Salary", CategoryType::Income),
            ],
        )
        .unwrap();
        upsert_transactions(
            &mut conn,
            &[
                txn("2024-01-02", "Store", 1, -120.0),
                txn("2024-01-03", "Landlord", 2, -900.0),
                txn("2024-01-04", "Store", 1, -30.0),
                txn("2024-01-05", "Employer", 3, 3000.0),
            ],
            WriteMode::Append,
        )
        .unwrap();
        let summary = get_summary(&conn, None).unwrap();
        let names: Vec<&str> = summary
            .expenses_by_category
            .iter()
            .map(|c| c.name.as_deref().unwrap())
            .collect();
        assert_eq!(names, vec!["Rent", "Groceries"]);
        assert_eq!(summary.expenses_by_category[0].total, 900.0);
        assert_eq!(summary.expenses_by_category[1].total, 150.0);
        let by_cat: f64 = summary.expenses_by_category.iter().map(|c| c.total).sum();
        assert_eq!(round2(by_cat), summary.total_expenses.abs());
    }

    #[test]
    fn test_sign_rule_overrides_declared_category_type() {
        // A positive amount against an expense category is still income.
        let (_dir, mut conn) = test_db();
        replace_categories(&mut conn, &[cat(1, "Groceries", CategoryType::Expense)]).unwrap();
        upsert_transactions(
            &mut conn,
            &[txn("2024-03-01", "Refund", 1, 40.0)],
            WriteMode::Append,
        )
        .unwrap();
        let summary = get_summary(&conn, None).unwrap();
        assert_eq!(summary.months[0].income, 40.0);
        assert_eq!(summary.months[0].expenses, 0.0);
        assert_eq!(summary.income_by_category[0].name.as_deref(), Some("Groceries"));
    }

    #[test]
    fn test_zero_amount_classified_as_expense() {
        let (_dir, mut conn) = test_db();
        replace_categories(&mut conn, &[cat(1, "Groceries", CategoryType::Expense)]).unwrap();
        upsert_transactions(
            &mut conn,
            &[txn("2024-03-01", "Voided charge", 1, 0.0)],
            WriteMode::Append,
        )
        .unwrap();
        let summary = get_summary(&conn, None).unwrap();
        assert_eq!(summary.months[0].income, 0.0);
        assert_eq!(summary.months[0].expenses, 0.0);
        // The zero row falls on the expense side of the grouping.
        assert_eq!(summary.expenses_by_category.len(), 1);
        assert!(summary.income_by_category.is_empty());
    }

    #[test]
    fn test_monthly_sums_match_grand_totals() {
        let (_dir, mut conn) = test_db();
        seed_scenario(&mut conn);
        let summary = get_summary(&conn, None).unwrap();
        let income: f64 = summary.months.iter().map(|m| m.income).sum();
        let expenses: f64 = summary.months.iter().map(|m| m.expenses).sum();
        assert_eq!(round2(income), summary.total_income);
        assert_eq!(round2(expenses), summary.total_expenses);
        assert_eq!(
            round2(income + expenses),
            summary.total_income + summary.total_expenses
        );
    }

    #[test]
    fn test_average_monthly_metrics() {
        let (_dir, mut conn) = test_db();
        seed_scenario(&mut conn);
        let summary = get_summary(&conn, None).unwrap();
        assert_eq!(summary.avg_monthly_income, round2(2025.0 / 2.0));
        assert_eq!(summary.avg_monthly_expenses, 25.0);
        assert_eq!(summary.avg_monthly_net, round2(1975.0 / 2.0));
    }

    #[test]
    fn test_year_filter_drops_other_years() {
        let (_dir, mut conn) = test_db();
        replace_categories(&mut conn, &[cat(1, "Salary", CategoryType::Income)]).unwrap();
        upsert_transactions(
            &mut conn,
            &[
                txn("2023-06-01", "Employer", 1, 1000.0),
                txn("2024-06-01", "Employer", 1, 1500.0),
            ],
            WriteMode::Append,
        )
        .unwrap();
        let summary = get_summary(&conn, Some(&[2024])).unwrap();
        assert_eq!(summary.months.len(), 1);
        assert_eq!(summary.months[0].month, "2024-06");
        assert_eq!(summary.total_income, 1500.0);
        let both = get_summary(&conn, Some(&[2023, 2024])).unwrap();
        assert_eq!(both.total_income, 2500.0);
    }

    #[test]
    fn test_years_present() {
        let (_dir, mut conn) = test_db();
        replace_categories(&mut conn, &[cat(1, "Salary", CategoryType::Income)]).unwrap();
        upsert_transactions(
            &mut conn,
            &[
                txn("2024-06-01", "Employer", 1, 1500.0),
                txn("2023-06-01", "Employer", 1, 1000.0),
            ],
            WriteMode::Append,
        )
        .unwrap();
        assert_eq!(years_present(&conn).unwrap(), vec![2023, 2024]);
    }

    #[test]
    fn test_empty_store_yields_empty_summary() {
        let (_dir, conn) = test_db();
        let summary = get_summary(&conn, None).unwrap();
        assert!(summary.months.is_empty());
        assert_eq!(summary.total_income, 0.0);
        assert_eq!(summary.net_balance, 0.0);
        assert_eq!(summary.avg_monthly_net, 0.0);
    }

    #[test]
    fn test_repeated_calls_are_identical() {
        let (_dir, mut conn) = test_db();
        seed_scenario(&mut conn);
        let a = get_summary(&conn, None).unwrap();
        let b = get_summary(&conn, None).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_round2() {
        assert_eq!(round2(1.005), 1.0); // falls on fp representation below .005
        assert_eq!(round2(2.675000001), 2.68);
        assert_eq!(round2(-50.004), -50.0);
    }
}
