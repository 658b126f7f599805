//! Monthly summary: total, per-category breakdown and budget status

use anyhow::Result;
use colored::Colorize;
use common::{
    MonthKey,
    budget_status::compute_status,
    summary::{expenses_in_month, totals_by_category},
};

use crate::{api::ApiClient, output, session::SessionContext};

pub async fn run(client: &ApiClient, session: &SessionContext, month: MonthKey) -> Result<()> {
    let token = session.require_token()?;

    let expenses = client.list_expenses(token).await?;
    let budget = client.get_budget(token, month).await?.map(|b| b.amount);

    let in_month = expenses_in_month(&expenses, month);
    let status = compute_status(in_month.iter().map(|e| e.amount), budget);

    if let Some(user) = session.user() {
        println!("{}", format!("Summary for {}", user.display_name).bold());
    }
    println!(
        "{} expenses in {}, total {}",
        in_month.len(),
        month,
        output::format_money(status.total_spent).bold()
    );
    println!();

    let totals = totals_by_category(in_month.iter().copied());
    if !totals.is_empty() {
        let mut table = output::create_table();
        table.set_header(vec!["Category", "Total"]);
        for (category, total) in &totals {
            table.add_row(vec![category.clone(), output::format_money(*total)]);
        }
        println!("{}", table);
        println!();
    }

    super::print_status(&month.to_string(), budget, &status);
    Ok(())
}
