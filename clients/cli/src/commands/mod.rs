//! CLI command implementations
//!
//! Every command receives the [`ApiClient`](crate::api::ApiClient) and the
//! caller's [`SessionContext`](crate::session::SessionContext) explicitly.

pub mod auth;
pub mod budget;
pub mod expenses;
pub mod summary;

use common::BudgetStatus;

use crate::output;

/// Clap parser for money arguments; rejects `inf` and `NaN`
pub(crate) fn parse_amount(raw: &str) -> Result<f64, String> {
    let amount: f64 = raw
        .trim()
        .parse()
        .map_err(|_| format!("'{}' is not a number", raw))?;

    if !amount.is_finite() {
        return Err("Amount must be a finite number".to_string());
    }

    Ok(amount)
}

/// Print the spend-versus-budget block shared by `budget show` and `summary`
pub(crate) fn print_status(month: &str, budget: Option<f64>, status: &BudgetStatus) {
    let mut table = output::create_table();
    table.add_row(vec!["Month".to_string(), month.to_string()]);
    table.add_row(vec![
        "Budget".to_string(),
        budget.map(output::format_money).unwrap_or_else(|| "-".to_string()),
    ]);
    table.add_row(vec![
        "Spent".to_string(),
        output::format_money(status.total_spent),
    ]);
    table.add_row(vec![
        "Remaining".to_string(),
        status
            .remaining
            .map(output::format_money)
            .unwrap_or_else(|| "-".to_string()),
    ]);
    table.add_row(vec![
        "Usage".to_string(),
        match budget {
            Some(_) => format!(
                "{}% {}",
                status.usage_percent,
                output::progress_bar(status.bar_percent, 20)
            ),
            None => "-".to_string(),
        },
    ]);

    println!("{}", table);
    println!("{}", output::status_label(status.status));
}
