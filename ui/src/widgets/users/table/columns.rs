//! Column definitions for the users table.

use egui::Ui;
use egui_extras::Column;
use usuarios_business::User;

use super::cells::{render_email_cell, render_id_cell, render_name_cell};

pub const ID_WIDTH: f32 = 60.0;
pub const NAME_MIN_WIDTH: f32 = 140.0;
pub const EMAIL_MIN_WIDTH: f32 = 180.0;
pub const ROW_HEIGHT: f32 = 30.0;
pub const HEADER_HEIGHT: f32 = 24.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ColumnWidth {
    Exact(f32),
    /// Shares the remaining width, never narrower than the given minimum.
    Remainder { at_least: f32 },
}

impl ColumnWidth {
    pub fn column(self) -> Column {
        match self {
            ColumnWidth::Exact(width) => Column::exact(width),
            ColumnWidth::Remainder { at_least } => Column::remainder().at_least(at_least),
        }
    }
}

/// One table column: stable key, header label and cell renderer.
#[derive(Clone, Copy)]
pub struct UserColumn {
    pub key: &'static str,
    pub header: &'static str,
    pub width: ColumnWidth,
    pub cell: fn(&mut Ui, &User),
}

impl std::fmt::Debug for UserColumn {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UserColumn")
            .field("key", &self.key)
            .field("header", &self.header)
            .field("width", &self.width)
            .finish_non_exhaustive()
    }
}

/// Columns in display order.
pub const USER_COLUMNS: [UserColumn; 3] = [
    UserColumn {
        key: "id",
        header: "ID",
        width: ColumnWidth::Exact(ID_WIDTH),
        cell: render_id_cell,
    },
    UserColumn {
        key: "name",
        header: "Nombre",
        width: ColumnWidth::Remainder {
            at_least: NAME_MIN_WIDTH,
        },
        cell: render_name_cell,
    },
    UserColumn {
        key: "email",
        header: "Correo Electrónico",
        width: ColumnWidth::Remainder {
            at_least: EMAIL_MIN_WIDTH,
        },
        cell: render_email_cell,
    },
];
