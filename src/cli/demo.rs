use crate::db::get_connection;
use crate::error::Result;
use crate::models::{Category, CategoryType, NewTransaction};
use crate::settings::db_path;
use crate::store::{replace_categories, upsert_transactions, WriteMode};

const DEMO_CATEGORIES: &[(i64, &str, CategoryType)] = &[
    (1, "Groceries", CategoryType::Expense),
    (2, "Rent", CategoryType::Expense),
    (3, "Utilities", CategoryType::Expense),
    (4, "Dining Out", CategoryType::Expense),
    (5, "Salary", CategoryType::Income),
    (6, "Other", CategoryType::Expense),
    (7, "Other Income", CategoryType::Income),
];

const DEMO_TRANSACTIONS: &[(&str, &str, i64, f64)] = &[
    ("2024-01-01", "Acme Corp payroll", 5, 4200.00),
    ("2024-01-02", "Sunset Apartments", 2, -1450.00),
    ("2024-01-08", "Corner Market", 1, -86.40),
    ("2024-01-14", "City Power & Light", 3, -112.75),
    ("2024-01-21", "Noodle House", 4, -34.20),
    ("2024-02-01", "Acme Corp payroll", 5, 4200.00),
    ("2024-02-02", "Sunset Apartments", 2, -1450.00),
    ("2024-02-11", "Corner Market", 1, -91.13),
    ("2024-02-17", "Marketplace refund", 7, 28.50),
    ("2024-02-24", "Taqueria", 4, -22.80),
    ("2024-03-01", "Acme Corp payroll", 5, 4200.00),
    ("2024-03-02", "Sunset Apartments", 2, -1450.00),
    ("2024-03-09", "Corner Market", 1, -78.92),
    ("2024-03-15", "City Power & Light", 3, -98.30),
    ("2024-03-28", "Garage sale", 7, 60.00),
];

/// Replace the store contents with a small sample dataset.
pub fn run() -> Result<()> {
    let mut conn = get_connection(&db_path())?;

    let categories: Vec<Category> = DEMO_CATEGORIES
        .iter()
        .map(|(id, name, category_type)| Category {
            id: *id,
            name: name.to_string(),
            category_type: *category_type,
        })
        .collect();
    let transactions: Vec<NewTransaction> = DEMO_TRANSACTIONS
        .iter()
        .map(|(date, name, category_id, amount)| NewTransaction {
            date: date.to_string(),
            name: name.to_string(),
            category_id: *category_id,
            amount: *amount,
            account: "Checking".to_string(),
        })
        .collect();

    upsert_transactions(&mut conn, &[], WriteMode::Replace)?;
    replace_categories(&mut conn, &categories)?;
    upsert_transactions(&mut conn, &transactions, WriteMode::Replace)?;

    println!(
        "Demo data loaded: {} categories, {} transactions. Try `monthwise report summary`.",
        categories.len(),
        transactions.len()
    );
    Ok(())
}
