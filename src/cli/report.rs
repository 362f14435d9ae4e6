use colored::Colorize;
use comfy_table::{Cell, Table};

use crate::db::get_connection;
use crate::error::Result;
use crate::fmt::money;
use crate::reports::{self, FinanceSummary};
use crate::settings::db_path;

fn year_filter(year: Option<i32>) -> Option<Vec<i32>> {
    year.map(|y| vec![y])
}

pub fn summary(year: Option<i32>) -> Result<()> {
    let conn = get_connection(&db_path())?;
    let years = year_filter(year);
    let s = reports::get_summary(&conn, years.as_deref())?;

    let mut table = Table::new();
    table.set_header(vec!["Metric", "Amount"]);
    table.add_row(vec![
        Cell::new("Total Income".green().bold()),
        Cell::new(money(s.total_income)),
    ]);
    table.add_row(vec![
        Cell::new("Total Expenses".red().bold()),
        Cell::new(money(s.total_expenses.abs())),
    ]);
    let net_label = if s.net_balance >= 0.0 {
        "Net Balance".green().bold()
    } else {
        "Net Balance".red().bold()
    };
    table.add_row(vec![Cell::new(net_label), Cell::new(money(s.net_balance))]);
    table.add_row(vec![Cell::new(""), Cell::new("")]);
    table.add_row(vec![
        Cell::new("Avg. Monthly Income"),
        Cell::new(money(s.avg_monthly_income)),
    ]);
    table.add_row(vec![
        Cell::new("Avg. Monthly Expenses"),
        Cell::new(money(s.avg_monthly_expenses)),
    ]);
    table.add_row(vec![
        Cell::new("Avg. Monthly Net Balance"),
        Cell::new(money(s.avg_monthly_net)),
    ]);

    println!("Summary\n{table}");
    Ok(())
}

fn monthly_table(s: &FinanceSummary) -> Table {
    let mut table = Table::new();
    table.set_header(vec!["Month", "Income", "Expenses", "Net Balance"]);
    for m in &s.months {
        table.add_row(vec![
            Cell::new(format!("{} ({})", m.label, m.month)),
            Cell::new(money(m.income)),
            Cell::new(money(m.abs_expenses)),
            Cell::new(money(m.net_balance)),
        ]);
    }
    table
}

pub fn monthly(year: Option<i32>) -> Result<()> {
    let conn = get_connection(&db_path())?;

    if let Some(y) = year {
        let s = reports::get_summary(&conn, Some(&[y]))?;
        println!("Monthly \u{2014} {y}\n{}", monthly_table(&s));
        return Ok(());
    }

    // Default view: current (max) year with the prior year for comparison.
    let years = reports::years_present(&conn)?;
    let Some(&current) = years.last() else {
        println!("No transactions stored.");
        return Ok(());
    };
    let s = reports::get_summary(&conn, Some(&[current]))?;
    println!("Monthly \u{2014} {current}\n{}", monthly_table(&s));

    let prior = current - 1;
    if years.contains(&prior) {
        let p = reports::get_summary(&conn, Some(&[prior]))?;
        println!("\nMonthly \u{2014} {prior}\n{}", monthly_table(&p));
    }
    Ok(())
}

pub fn categories(year: Option<i32>) -> Result<()> {
    let conn = get_connection(&db_path())?;
    let years = year_filter(year);
    let s = reports::get_summary(&conn, years.as_deref())?;

    let mut etable = Table::new();
    etable.set_header(vec!["Category", "Spent"]);
    for c in &s.expenses_by_category {
        etable.add_row(vec![
            Cell::new(c.name.as_deref().unwrap_or("(uncategorized)")),
            Cell::new(money(c.total)),
        ]);
    }
    println!("{}\n{etable}", "Spending by Category".red().bold());

    let mut itable = Table::new();
    itable.set_header(vec!["Category", "Earned"]);
    for c in &s.income_by_category {
        itable.add_row(vec![
            Cell::new(c.name.as_deref().unwrap_or("(uncategorized)")),
            Cell::new(money(c.total)),
        ]);
    }
    println!("\n{}\n{itable}", "Income by Category".green().bold());
    Ok(())
}
