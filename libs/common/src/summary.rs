//! Aggregates over a flat expense list
//!
//! The API returns every expense a user owns; narrowing to one month and
//! grouping by category happens in whichever caller needs the summary.

use chrono::{DateTime, Utc};

use crate::budget_status::{self, BudgetStatus};
use crate::month::MonthKey;

/// Category used when an expense has none
pub const DEFAULT_CATEGORY: &str = "General";

/// Anything that looks like an expense for aggregation purposes
pub trait ExpenseEntry {
    fn amount(&self) -> f64;
    fn category(&self) -> &str;
    fn date(&self) -> DateTime<Utc>;
}

/// Normalize a category name, falling back to [`DEFAULT_CATEGORY`] when blank
pub fn normalize_category(category: Option<&str>) -> String {
    match category.map(str::trim) {
        Some(name) if !name.is_empty() => name.to_string(),
        _ => DEFAULT_CATEGORY.to_string(),
    }
}

/// Entries whose date falls inside the given calendar month
pub fn expenses_in_month<E: ExpenseEntry>(entries: &[E], month: MonthKey) -> Vec<&E> {
    entries
        .iter()
        .filter(|entry| month.contains(entry.date()))
        .collect()
}

/// Per-category totals, largest first; ties keep alphabetical order
pub fn totals_by_category<'a, E, I>(entries: I) -> Vec<(String, f64)>
where
    E: ExpenseEntry + 'a,
    I: IntoIterator<Item = &'a E>,
{
    let mut totals: Vec<(String, f64)> = Vec::new();

    for entry in entries {
        let category = normalize_category(Some(entry.category()));
        let amount = budget_status::total_spent([entry.amount()]);
        match totals.iter_mut().find(|(name, _)| *name == category) {
            Some((_, total)) => *total += amount,
            None => totals.push((category, amount)),
        }
    }

    totals.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    totals
}

/// Status of one month given the full expense list and that month's budget
pub fn month_status<E: ExpenseEntry>(
    entries: &[E],
    month: MonthKey,
    budget: Option<f64>,
) -> BudgetStatus {
    let in_month = expenses_in_month(entries, month);
    budget_status::compute_status(in_month.iter().map(|entry| entry.amount()), budget)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::budget_status::Status;
    use chrono::TimeZone;

    struct Entry {
        amount: f64,
        category: &'static str,
        date: DateTime<Utc>,
    }

    impl ExpenseEntry for Entry {
        fn amount(&self) -> f64 {
            self.amount
        }

        fn category(&self) -> &str {
            self.category
        }

        fn date(&self) -> DateTime<Utc> {
            self.date
        }
    }

    fn entry(amount: f64, category: &'static str, y: i32, m: u32, d: u32) -> Entry {
        Entry {
            amount,
            category,
            date: Utc.with_ymd_and_hms(y, m, d, 12, 0, 0).unwrap(),
        }
    }

    fn sample() -> Vec<Entry> {
        vec![
            entry(300.0, "Food", 2025, 6, 3),
            entry(200.0, " Food ", 2025, 6, 10),
            entry(150.0, "", 2025, 6, 12),
            entry(400.0, "Rent", 2025, 6, 1),
            entry(999.0, "Food", 2025, 5, 31),
            entry(50.0, "Food", 2024, 6, 15),
        ]
    }

    #[test]
    fn test_normalize_category() {
        assert_eq!(normalize_category(None), "General");
        assert_eq!(normalize_category(Some("   ")), "General");
        assert_eq!(normalize_category(Some(" Travel ")), "Travel");
    }

    #[test]
    fn test_expenses_in_month_filters_by_month_and_year() {
        let entries = sample();
        let june = MonthKey::parse("2025-06").unwrap();
        let in_june = expenses_in_month(&entries, june);
        assert_eq!(in_june.len(), 4);
        assert!(in_june.iter().all(|e| june.contains(e.date)));
    }

    #[test]
    fn test_totals_by_category_groups_and_sorts() {
        let entries = sample();
        let june = MonthKey::parse("2025-06").unwrap();
        let totals = totals_by_category(expenses_in_month(&entries, june));
        assert_eq!(
            totals,
            vec![
                ("Food".to_string(), 500.0),
                ("Rent".to_string(), 400.0),
                ("General".to_string(), 150.0),
            ]
        );
    }

    #[test]
    fn test_month_status_only_counts_that_month() {
        let entries = sample();
        let june = MonthKey::parse("2025-06").unwrap();
        let status = month_status(&entries, june, Some(1000.0));
        assert_eq!(status.total_spent, 1050.0);
        assert_eq!(status.status, Status::Over);

        let may = MonthKey::parse("2025-05").unwrap();
        let status = month_status(&entries, may, None);
        assert_eq!(status.total_spent, 999.0);
        assert_eq!(status.status, Status::NoBudget);
    }
}
