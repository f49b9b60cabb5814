//! Users table domain: wire types, API client, pagination and the table view model.

mod config;
pub mod http;
mod pagination;
mod users;
mod users_api;
mod users_table;

pub use config::{BusinessConfig, ConfigError};
pub use pagination::{NextPagePolicy, PageSize, Pagination};
pub use users::{PageRequest, User, UsersPage};
pub use users_api::{FetchUsersError, UsersApi, list_users};
pub use users_table::{PageControls, UsersSource, UsersTable, UsersTableView};
