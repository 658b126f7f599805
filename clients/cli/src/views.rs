//! Client-side filtering and ordering of the expense list

use clap::ValueEnum;

use crate::api::Expense;

/// Order of the expense table
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum ExpenseSort {
    #[default]
    DateDesc,
    DateAsc,
    AmountDesc,
    AmountAsc,
}

/// Narrowing applied before display
#[derive(Debug, Clone, Default)]
pub struct ExpenseFilter {
    /// Exact category name
    pub category: Option<String>,
    /// Case-insensitive substring of the title
    pub search: Option<String>,
}

impl ExpenseFilter {
    fn matches(&self, expense: &Expense) -> bool {
        let category_ok = match self.category.as_deref().map(str::trim) {
            Some(category) if !category.is_empty() => expense.category == category,
            _ => true,
        };

        let search_ok = match self.search.as_deref().map(str::trim) {
            Some(query) if !query.is_empty() => expense
                .title
                .to_lowercase()
                .contains(&query.to_lowercase()),
            _ => true,
        };

        category_ok && search_ok
    }
}

/// Apply `filter`, then order by `sort`; ties keep the server order
pub fn select_expenses<'a>(
    expenses: &'a [Expense],
    filter: &ExpenseFilter,
    sort: ExpenseSort,
) -> Vec<&'a Expense> {
    let mut selected: Vec<&Expense> = expenses.iter().filter(|e| filter.matches(e)).collect();

    match sort {
        ExpenseSort::DateDesc => selected.sort_by(|a, b| b.date.cmp(&a.date)),
        ExpenseSort::DateAsc => selected.sort_by(|a, b| a.date.cmp(&b.date)),
        ExpenseSort::AmountDesc => selected.sort_by(|a, b| b.amount.total_cmp(&a.amount)),
        ExpenseSort::AmountAsc => selected.sort_by(|a, b| a.amount.total_cmp(&b.amount)),
    }

    selected
}

/// Distinct categories in first-seen order
pub fn categories(expenses: &[Expense]) -> Vec<&str> {
    let mut names: Vec<&str> = Vec::new();
    for expense in expenses {
        if !names.contains(&expense.category.as_str()) {
            names.push(&expense.category);
        }
    }
    names
}
