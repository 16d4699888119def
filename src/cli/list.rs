use super::summary::describe_filter;
use super::ui;
use crate::core::dashboard::{Dashboard, DashboardCache};
use crate::core::filter::FilterSelection;
use crate::store::TransactionStore;
use comfy_table::Cell;

impl Dashboard {
    pub fn display_transactions(&self, currency: &str) -> String {
        let mut output = format!(
            "{} {}\n\n",
            ui::style_text("Transactions", ui::StyleType::Title),
            ui::style_text(
                &format!("({}: {})", describe_filter(&self.filter), self.transactions.len()),
                ui::StyleType::Subtle
            )
        );

        if self.transactions.is_empty() {
            output.push_str(&ui::style_text(
                "No transactions match the selected filters",
                ui::StyleType::Subtle,
            ));
            return output;
        }

        let mut table = ui::new_styled_table();
        table.set_header(vec![
            ui::header_cell("Date"),
            ui::header_cell("Description"),
            ui::header_cell("Category"),
            ui::header_cell("Amount"),
            ui::header_cell("ID"),
        ]);
        for transaction in &self.transactions {
            table.add_row(vec![
                Cell::new(transaction.date.format("%Y-%m-%d")),
                Cell::new(&transaction.description),
                Cell::new(&transaction.category),
                ui::amount_cell(transaction.kind, transaction.amount, currency),
                Cell::new(ui::style_text(
                    &transaction.id.to_string(),
                    ui::StyleType::Subtle,
                )),
            ]);
        }
        output.push_str(&table.to_string());
        output
    }

    pub fn display_months(&self) -> String {
        if self.months.is_empty() {
            return ui::style_text("No transactions yet", ui::StyleType::Subtle);
        }
        self.months
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("\n")
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
    println!("{}", dashboard.display_transactions(currency));
}

pub async fn run_months(store: &TransactionStore, cache: &DashboardCache) {
    let transactions = store.transactions();
    let dashboard = cache
        .get_or_derive(store.revision(), &transactions, &FilterSelection::all())
        .await;
    println!("{}", dashboard.display_months());
}
