//! Budget commands: show and set the monthly budget

use anyhow::Result;
use clap::Subcommand;
use common::{MonthKey, summary::month_status};

use crate::{api::ApiClient, output, session::SessionContext};

#[derive(Subcommand)]
pub enum BudgetCommands {
    /// Show the budget and spending for a month
    Show {
        /// Month as YYYY-MM (default: current month)
        #[arg(value_parser = MonthKey::parse)]
        month: Option<MonthKey>,
    },

    /// Set the budget for a month
    Set {
        /// Budget amount, zero or greater
        #[arg(value_parser = super::parse_amount)]
        amount: f64,
        /// Month as YYYY-MM (default: current month)
        #[arg(long, short, value_parser = MonthKey::parse)]
        month: Option<MonthKey>,
    },
}

pub async fn run(
    client: &ApiClient,
    session: &mut SessionContext,
    command: BudgetCommands,
) -> Result<()> {
    match command {
        BudgetCommands::Show { month } => {
            show(client, session, month.unwrap_or_else(MonthKey::current)).await
        }
        BudgetCommands::Set { amount, month } => {
            set(client, session, amount, month.unwrap_or_else(MonthKey::current)).await
        }
    }
}

pub async fn show(client: &ApiClient, session: &SessionContext, month: MonthKey) -> Result<()> {
    let token = session.require_token()?;

    let budget = client.get_budget(token, month).await?.map(|b| b.amount);
    let expenses = client.list_expenses(token).await?;
    let status = month_status(&expenses, month, budget);

    super::print_status(&month.to_string(), budget, &status);
    if budget.is_none() {
        output::info(&format!(
            "Set one with `budget budget set <amount> --month {}`",
            month
        ));
    }

    Ok(())
}

pub async fn set(
    client: &ApiClient,
    session: &SessionContext,
    amount: f64,
    month: MonthKey,
) -> Result<()> {
    let token = session.require_token()?;
    let budget = client.set_budget(token, month, amount).await?;

    output::success(&format!(
        "Budget for {} set to {}",
        budget.month,
        output::format_money(budget.amount)
    ));
    Ok(())
}
