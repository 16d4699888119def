use super::ui;
use crate::core::dashboard::{Dashboard, DashboardCache};
use crate::core::filter::FilterSelection;
use crate::store::TransactionStore;
use comfy_table::{Cell, CellAlignment};
use rust_decimal::Decimal;

/// Human readable description of a filter selection.
pub fn describe_filter(filter: &FilterSelection) -> String {
    if filter.is_all() {
        return "all transactions".to_string();
    }
    let mut parts = Vec::new();
    if let Some(kind) = filter.kind {
        parts.push(format!("type={kind}"));
    }
    if let Some(category) = &filter.category {
        parts.push(format!("category={category}"));
    }
    if let Some(month) = filter.month {
        parts.push(format!("month={month}"));
    }
    parts.join(", ")
}

impl Dashboard {
    pub fn display_summary(&self, currency: &str) -> String {
        let mut totals = ui::new_styled_table();
        totals.set_header(vec![
            ui::header_cell("Income"),
            ui::header_cell("Expenses"),
            ui::header_cell("Balance"),
        ]);
        totals.add_row(vec![
            ui::plain_amount_cell(self.totals.income, currency),
            ui::plain_amount_cell(self.totals.expenses, currency),
            ui::balance_cell(self.totals.balance, currency),
        ]);

        let mut output = format!(
            "{}\n\n{}",
            ui::style_text("Totals", ui::StyleType::Title),
            totals
        );

        output.push_str(&format!(
            "\n\n{} {}\n\n",
            ui::style_text("Expenses by category", ui::StyleType::Title),
            ui::style_text(
                &format!("({})", describe_filter(&self.filter)),
                ui::StyleType::Subtle
            )
        ));
        if self.categories.is_empty() {
            output.push_str(&ui::style_text(
                "No expenses for the selected filters",
                ui::StyleType::Subtle,
            ));
        } else {
            let filtered_total: Decimal = self.categories.iter().map(|c| c.total).sum();
            let mut categories = ui::new_styled_table();
            categories.set_header(vec![
                ui::header_cell("Category"),
                ui::header_cell("Total"),
                ui::header_cell("Share (%)"),
            ]);
            for entry in &self.categories {
                let share = entry.total / filtered_total * Decimal::ONE_HUNDRED;
                categories.add_row(vec![
                    Cell::new(&entry.category),
                    ui::plain_amount_cell(entry.total, currency),
                    Cell::new(format!("{:.2}%", share.round_dp(2)))
                        .set_alignment(CellAlignment::Right),
                ]);
            }
            output.push_str(&categories.to_string());
        }

        output.push_str(&format!(
            "\n\n{}\n\n",
            ui::style_text("Monthly trend", ui::StyleType::Title)
        ));
        if self.monthly.is_empty() {
            output.push_str(&ui::style_text("No transactions yet", ui::StyleType::Subtle));
        } else {
            let mut monthly = ui::new_styled_table();
            monthly.set_header(vec![
                ui::header_cell("Month"),
                ui::header_cell("Income"),
                ui::header_cell("Expenses"),
                ui::header_cell("Balance"),
            ]);
            for month in &self.monthly {
                monthly.add_row(vec![
                    Cell::new(month.month.to_string()),
                    ui::plain_amount_cell(month.income, currency),
                    ui::plain_amount_cell(month.expenses, currency),
                    ui::balance_cell(month.balance, currency),
                ]);
            }
            output.push_str(&monthly.to_string());
        }

        output
    }
}

pub async fn run(
    store: &TransactionStore,
    cache: &DashboardCache,
    filter: &FilterSelection,
    currency: &str,
) {
    let transactions = store.transactions();
    let dashboard = cache
        .get_or_derive(store.revision(), &transactions, filter)
        .await;
    println!("{}", dashboard.display_summary(currency));
}
