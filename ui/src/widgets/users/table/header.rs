//! Table header rendering for the users table.

use egui::Ui;
use egui_extras::TableRow;

use super::columns::USER_COLUMNS;

/// Renders the table header with bold labels.
#[inline]
pub fn render_table_header(header: &mut TableRow<'_, '_>) {
    for column in &USER_COLUMNS {
        header.col(|ui| {
            render_header_cell(ui, column.header);
        });
    }
}

#[inline]
fn render_header_cell(ui: &mut Ui, label: &str) {
    ui.strong(label);
}
