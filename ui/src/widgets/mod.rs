pub mod users;

pub use users::{PageIntent, users_panel};
