use crate::core::transaction::TransactionKind;
use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use rust_decimal::Decimal;
use std::time::Duration;

/// Defines different styles for text elements.
pub enum StyleType {
    Title,
    Positive,
    Subtle,
}

/// Applies a consistent style to a string.
pub fn style_text(text: &str, style_type: StyleType) -> String {
    let styled = match style_type {
        StyleType::Title => style(text).bold().underlined(),
        StyleType::Positive => style(text).green().bold(),
        StyleType::Subtle => style(text).dim(),
    };
    styled.to_string()
}

/// Formats a monetary amount with two decimals and the currency code.
pub fn format_amount(amount: Decimal, currency: &str) -> String {
    format!("{:.2} {currency}", amount.round_dp(2))
}

/// Creates a new `comfy_table::Table` with standard styling.
pub fn new_styled_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

/// Creates a styled header cell for a table.
pub fn header_cell(text: &str) -> Cell {
    Cell::new(text)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

/// Amount cell colored by kind: income green, expense red with a leading minus.
pub fn amount_cell(kind: TransactionKind, amount: Decimal, currency: &str) -> Cell {
    let (text, color) = match kind {
        TransactionKind::Income => (format!("+{}", format_amount(amount, currency)), Color::Green),
        TransactionKind::Expense => (format!("-{}", format_amount(amount, currency)), Color::Red),
    };
    Cell::new(text).fg(color).set_alignment(CellAlignment::Right)
}

/// Creates a cell for a signed balance with color coding.
pub fn balance_cell(balance: Decimal, currency: &str) -> Cell {
    let color = if balance >= Decimal::ZERO {
        Color::Green
    } else {
        Color::Red
    };
    Cell::new(format_amount(balance, currency))
        .fg(color)
        .set_alignment(CellAlignment::Right)
}

/// Right aligned plain amount cell.
pub fn plain_amount_cell(amount: Decimal, currency: &str) -> Cell {
    Cell::new(format_amount(amount, currency)).set_alignment(CellAlignment::Right)
}

/// Creates a new spinner shown while waiting on storage.
pub fn new_spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    if let Ok(spinner_style) = ProgressStyle::default_spinner().template("{spinner:.green} {msg}")
    {
        pb.set_style(spinner_style);
    }
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}
