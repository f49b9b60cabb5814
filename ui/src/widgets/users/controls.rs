//! Pagination controls below the users table.

use egui::{Button, ComboBox, RichText, Ui};
use usuarios_business::{PageControls, PageSize};

use crate::utils::colors::COLOR_MUTED;

/// A user intent collected while rendering and applied after the frame's borrows end.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageIntent {
    Previous,
    Next,
    PageSize(PageSize),
    Retry,
}

/// Renders Previous/Next, the page label and the page-size selector.
pub fn page_controls(ui: &mut Ui, controls: &PageControls) -> Option<PageIntent> {
    let mut intent = None;

    ui.horizontal(|ui| {
        if ui
            .add_enabled(controls.can_previous, Button::new("Anterior"))
            .clicked()
        {
            intent = Some(PageIntent::Previous);
        }

        ui.label(controls.page_label());
        if let Some(total) = controls.total_label() {
            ui.label(total);
        }

        if ui
            .add_enabled(controls.can_next, Button::new("Siguiente"))
            .clicked()
        {
            intent = Some(PageIntent::Next);
        }

        ui.separator();

        let mut selected = controls.page_size;
        ComboBox::from_id_salt("users_page_size")
            .selected_text(selected.label())
            .show_ui(ui, |ui| {
                for size in PageSize::ALL {
                    ui.selectable_value(&mut selected, size, size.label());
                }
            });
        if selected != controls.page_size {
            intent = Some(PageIntent::PageSize(selected));
        }

        if controls.refreshing {
            ui.spinner();
            ui.label(RichText::new("Cargando...").color(COLOR_MUTED));
        }
    });

    intent
}
