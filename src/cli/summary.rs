use super::ui;
use crate::core::{Category, CategoryTotal, SummaryBuilder, User, Window};
use anyhow::Result;
use chrono::{DateTime, Utc};
use comfy_table::Cell;

/// Summary rows for one user, ready for display.
#[derive(Debug)]
pub struct SummaryReport {
    pub user: User,
    pub currency: String,
    pub window: Window,
    pub since: Option<DateTime<Utc>>,
    pub rows: Vec<CategoryTotal>,
}

impl SummaryReport {
    pub fn display_as_table(&self) -> String {
        let currency = self.currency.to_uppercase();

        let mut table = ui::new_styled_table();
        table.set_header(vec![
            ui::header_cell("Category"),
            ui::header_cell("Count"),
            ui::header_cell(&format!("Amount ({currency})")),
        ]);

        for row in &self.rows {
            table.add_row(vec![
                Cell::new(row.category.as_str()),
                ui::count_cell(row.count),
                ui::money_cell(&row.amount),
            ]);
        }

        let mut output = format!(
            "User: {}\n\n",
            ui::style_text(&self.user.id.to_string(), ui::StyleType::Title)
        );
        output.push_str(&table.to_string());

        let period = match self.since {
            Some(since) => format!("{} (since {})", self.window, since.to_rfc3339()),
            None => "all time".to_string(),
        };
        output.push_str(&format!(
            "\n\n{}: {}",
            ui::style_text("Window", ui::StyleType::TotalLabel),
            ui::style_text(&period, ui::StyleType::Subtle)
        ));

        output
    }
}

pub async fn build_report(
    builder: &SummaryBuilder,
    user: &User,
    currency: &str,
    window: Window,
    categories: &[Category],
) -> Result<SummaryReport> {
    let summary = builder.for_window(user, currency, window);
    let rows = summary.report(categories).await?;

    Ok(SummaryReport {
        user: *user,
        currency: summary.currency().to_string(),
        window,
        since: summary.since(),
        rows,
    })
}

pub async fn run(
    builder: &SummaryBuilder,
    user: &User,
    currency: &str,
    window: Window,
    categories: &[Category],
) -> Result<()> {
    let report = build_report(builder, user, currency, window, categories).await?;
    println!("{}", report.display_as_table());
    Ok(())
}
