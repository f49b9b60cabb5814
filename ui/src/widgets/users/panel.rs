//! Main panel for the users table.

use chrono::{DateTime, Utc};
use egui::{Button, Response, Ui};
use log::info;
use usuarios_business::{FetchUsersError, UsersSource, UsersTable, UsersTableView};

use super::controls::{PageIntent, page_controls};
use super::table::users_table;
use crate::utils::colors::COLOR_RED;

pub const TITLE: &str = "Usuarios";
pub const LOADING_TEXT: &str = "Cargando datos...";
pub const ERROR_TEXT: &str = "Error al cargar los datos";
pub const EMPTY_TEXT: &str = "No hay datos disponibles";
pub const RETRY_TEXT: &str = "Reintentar";

/// Displays the users table in exactly one of its loading, error, empty or populated states.
///
/// Pagination controls are shown once the current page has resolved, so a failed or empty
/// page can still be left through Previous or the page-size selector.
pub fn users_panel<S: UsersSource>(
    table: &mut UsersTable<S>,
    now: DateTime<Utc>,
    ui: &mut Ui,
) -> Response {
    let response = ui.vertical(|ui| {
        ui.heading(TITLE);
        ui.add_space(8.0);

        let controls = table.controls();
        let intent = match table.view() {
            UsersTableView::Loading => {
                ui.horizontal(|ui| {
                    ui.spinner();
                    ui.label(LOADING_TEXT);
                });
                None
            }
            UsersTableView::Failed(error) => {
                let retry = render_error(ui, error, controls.refreshing);
                ui.add_space(8.0);
                let paging = page_controls(ui, &controls);
                if retry {
                    Some(PageIntent::Retry)
                } else {
                    paging
                }
            }
            UsersTableView::Empty => {
                ui.label(EMPTY_TEXT);
                ui.add_space(8.0);
                page_controls(ui, &controls)
            }
            UsersTableView::Rows(users) => {
                users_table(ui, users);
                ui.add_space(8.0);
                page_controls(ui, &controls)
            }
        };

        if let Some(intent) = intent {
            apply_intent(table, intent, now);
        }
    });

    response.response
}

/// Returns `true` if the retry button was clicked.
fn render_error(ui: &mut Ui, error: &FetchUsersError, refreshing: bool) -> bool {
    ui.colored_label(COLOR_RED, ERROR_TEXT)
        .on_hover_text(error.to_string());
    ui.add_enabled(!refreshing, Button::new(RETRY_TEXT))
        .clicked()
}

fn apply_intent<S: UsersSource>(
    table: &mut UsersTable<S>,
    intent: PageIntent,
    now: DateTime<Utc>,
) {
    info!("Users table intent: {intent:?}");
    match intent {
        PageIntent::Previous => {
            table.previous(now);
        }
        PageIntent::Next => {
            table.next(now);
        }
        PageIntent::PageSize(size) => {
            table.set_page_size(size, now);
        }
        PageIntent::Retry => table.retry(now),
    }
}
