//! Row rendering for the users table.

use egui::{Stroke, Ui};
use egui_extras::TableRow;
use usuarios_business::User;

use super::columns::USER_COLUMNS;
use crate::utils::colors::COLOR_BORDER;

/// Renders a single user row, one cell per column descriptor.
#[inline]
pub fn render_user_row(row: &mut TableRow<'_, '_>, user: &User) {
    for column in &USER_COLUMNS {
        row.col(|ui| {
            (column.cell)(ui, user);
            draw_cell_bottom_border(ui);
        });
    }
}

/// Draws a bottom border line for a cell.
#[inline]
fn draw_cell_bottom_border(ui: &mut Ui) {
    let rect = ui.max_rect();
    ui.painter().hline(
        rect.left()..=rect.right(),
        rect.bottom(),
        Stroke::new(1.0, COLOR_BORDER),
    );
}
