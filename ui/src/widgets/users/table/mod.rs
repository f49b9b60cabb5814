//! Table components for the users table.
//!
//! - `columns`: column descriptors and widths
//! - `header`: table header rendering
//! - `row`: individual row rendering
//! - `cells`: cell rendering functions for each column

mod cells;
pub mod columns;
pub mod header;
pub mod row;

use egui::{Align, Layout, Ui};
use egui_extras::TableBuilder;
use usuarios_business::User;

use columns::{HEADER_HEIGHT, ROW_HEIGHT, USER_COLUMNS};
use header::render_table_header;
use row::render_user_row;

/// Renders one header row and one body row per user.
pub fn users_table(ui: &mut Ui, users: &[User]) {
    let mut builder = TableBuilder::new(ui)
        .id_salt("users_table")
        .striped(true)
        .cell_layout(Layout::left_to_right(Align::Center));
    for column in &USER_COLUMNS {
        builder = builder.column(column.width.column());
    }

    builder
        .header(HEADER_HEIGHT, |mut header| {
            render_table_header(&mut header);
        })
        .body(|body| {
            body.rows(ROW_HEIGHT, users.len(), |mut row| {
                if let Some(user) = users.get(row.index()) {
                    render_user_row(&mut row, user);
                }
            });
        });
}
