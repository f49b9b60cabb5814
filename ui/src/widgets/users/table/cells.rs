//! Cell rendering functions for the users table.

use egui::{RichText, Ui};
use usuarios_business::User;

#[inline]
pub fn render_id_cell(ui: &mut Ui, user: &User) {
    ui.label(RichText::new(user.id.to_string()).monospace());
}

#[inline]
pub fn render_name_cell(ui: &mut Ui, user: &User) {
    ui.label(&user.name);
}

#[inline]
pub fn render_email_cell(ui: &mut Ui, user: &User) {
    ui.label(&user.email);
}
