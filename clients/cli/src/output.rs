//! Output formatting utilities

use colored::{ColoredString, Colorize};
use comfy_table::{ContentArrangement, Table, presets::UTF8_FULL_CONDENSED};
use common::Status;

/// Print a success message
pub fn success(msg: &str) {
    println!("{}", msg.green());
}

/// Print an error message
pub fn error(msg: &str) {
    eprintln!("{}", msg.red());
}

/// Print a warning message
pub fn warning(msg: &str) {
    println!("{}", msg.yellow());
}

/// Print an info message
pub fn info(msg: &str) {
    println!("{}", msg.cyan());
}

/// Create a styled table
pub fn create_table() -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table
}

/// Format an amount with two decimals and thousands separators
pub fn format_money(amount: f64) -> String {
    let sign = if amount < 0.0 { "-" } else { "" };
    let cents = (amount.abs() * 100.0).round() as u64;
    let whole = (cents / 100).to_string();

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, digit) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    format!("{}${}.{:02}", sign, grouped, cents % 100)
}

/// Status label colored by severity
pub fn status_label(status: Status) -> ColoredString {
    match status {
        Status::NoBudget => status.label().dimmed(),
        Status::Ok => status.label().green(),
        Status::Warn => status.label().yellow(),
        Status::Over => status.label().red().bold(),
    }
}

/// Text progress bar for a percentage already clamped to `0..=100`
pub fn progress_bar(bar_percent: i64, width: usize) -> String {
    let filled = (bar_percent.clamp(0, 100) as usize * width + 50) / 100;
    format!("[{}{}]", "#".repeat(filled), "-".repeat(width - filled))
}
