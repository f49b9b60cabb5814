//! Users table panel.
//!
//! - `panel`: picks the loading, error, empty or populated rendering
//! - `controls`: Previous/Next buttons, page label and page-size selector
//! - `table`: table rendering components (columns, header, row, cells)

mod controls;
mod panel;
pub mod table;

pub use controls::{PageIntent, page_controls};
pub use panel::users_panel;
