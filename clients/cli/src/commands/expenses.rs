//! Expense commands: list, add, delete

use anyhow::Result;
use clap::Subcommand;
use colored::Colorize;
use dialoguer::Confirm;

use crate::{
    api::{ApiClient, NewExpense},
    output,
    session::SessionContext,
    views::{self, ExpenseFilter, ExpenseSort},
};

#[derive(Subcommand)]
pub enum ExpenseCommands {
    /// List your expenses
    List {
        /// Only show this category (exact name)
        #[arg(long)]
        category: Option<String>,
        /// Only show titles containing this text
        #[arg(long)]
        search: Option<String>,
        /// Sort order
        #[arg(long, value_enum, default_value_t = ExpenseSort::DateDesc)]
        sort: ExpenseSort,
    },

    /// Record an expense
    Add {
        /// What the money was spent on
        title: String,
        /// Amount spent
        #[arg(allow_negative_numbers = true, value_parser = super::parse_amount)]
        amount: f64,
        /// Category (default: General)
        #[arg(long, short)]
        category: Option<String>,
        /// Date, YYYY-MM-DD or RFC 3339 (default: now)
        #[arg(long, short)]
        date: Option<String>,
    },

    /// Delete an expense by ID
    Delete {
        /// Expense ID
        id: String,
        /// Skip confirmation prompt
        #[arg(long, short)]
        yes: bool,
    },
}

pub async fn run(
    client: &ApiClient,
    session: &mut SessionContext,
    command: ExpenseCommands,
) -> Result<()> {
    match command {
        ExpenseCommands::List {
            category,
            search,
            sort,
        } => list(client, session, ExpenseFilter { category, search }, sort).await,
        ExpenseCommands::Add {
            title,
            amount,
            category,
            date,
        } => {
            let expense = NewExpense {
                title,
                amount,
                category,
                date,
            };
            add(client, session, &expense).await
        }
        ExpenseCommands::Delete { id, yes } => delete(client, session, &id, yes).await,
    }
}

pub async fn list(
    client: &ApiClient,
    session: &SessionContext,
    filter: ExpenseFilter,
    sort: ExpenseSort,
) -> Result<()> {
    let token = session.require_token()?;
    let expenses = client.list_expenses(token).await?;

    if expenses.is_empty() {
        output::info("No expenses yet. Add one with `budget expenses add <title> <amount>`.");
        return Ok(());
    }

    let selected = views::select_expenses(&expenses, &filter, sort);
    if selected.is_empty() {
        output::info("No expenses match the filters");
        return Ok(());
    }

    let mut table = output::create_table();
    table.set_header(vec!["Date", "Title", "Category", "Amount", "ID"]);
    for expense in &selected {
        table.add_row(vec![
            expense.date.format("%Y-%m-%d").to_string(),
            expense.title.clone(),
            expense.category.clone(),
            output::format_money(expense.amount),
            expense.id.to_string(),
        ]);
    }
    println!("{}", table);

    let total = common::budget_status::total_spent(selected.iter().map(|e| e.amount));
    println!(
        "{} of {} expenses, total {}",
        selected.len(),
        expenses.len(),
        output::format_money(total).bold()
    );
    println!(
        "{}",
        format!("Categories: {}", views::categories(&expenses).join(", ")).dimmed()
    );

    Ok(())
}

pub async fn add(client: &ApiClient, session: &SessionContext, expense: &NewExpense) -> Result<()> {
    let token = session.require_token()?;
    let created = client.create_expense(token, expense).await?;

    output::success(&format!(
        "Recorded {} for {} ({}, {})",
        output::format_money(created.amount),
        created.title,
        created.category,
        created.date.format("%Y-%m-%d")
    ));
    println!("  ID: {}", created.id);

    Ok(())
}

pub async fn delete(client: &ApiClient, session: &SessionContext, id: &str, yes: bool) -> Result<()> {
    let token = session.require_token()?;

    if !yes
        && !Confirm::new()
            .with_prompt(format!("Delete expense {}?", id))
            .default(false)
            .interact()?
    {
        println!("{}", "Cancelled".dimmed());
        return Ok(());
    }

    let message = client.delete_expense(token, id).await?;
    output::success(&message);

    Ok(())
}
