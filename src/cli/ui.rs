use crate::core::Money;
use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};
use console::style;

/// Defines different styles for text elements.
pub enum StyleType {
    Title,
    TotalLabel,
    Subtle,
}

/// Applies a consistent style to a string.
pub fn style_text(text: &str, style_type: StyleType) -> String {
    let styled = match style_type {
        StyleType::Title => style(text).bold().underlined(),
        StyleType::TotalLabel => style(text).bold(),
        StyleType::Subtle => style(text).dim(),
    };
    styled.to_string()
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

/// Right-aligned transaction count, dimmed when zero.
pub fn count_cell(count: u64) -> Cell {
    let cell = Cell::new(count).set_alignment(CellAlignment::Right);
    if count == 0 { cell.fg(Color::DarkGrey) } else { cell }
}

/// Right-aligned money amount, dimmed when zero and red when negative.
pub fn money_cell(amount: &Money) -> Cell {
    let cell = Cell::new(amount.to_decimal()).set_alignment(CellAlignment::Right);
    if amount.is_zero() {
        cell.fg(Color::DarkGrey)
    } else if amount.cents() < 0 {
        cell.fg(Color::Red)
    } else {
        cell.fg(Color::Green)
    }
}
