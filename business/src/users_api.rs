//! Users listing API client.
//!
//! Performs the network IO behind the users table. The query cache calls it through
//! [`UsersApi`]; nothing here retries or caches.

use log::{error, info};
use thiserror::Error;
use ustr::Ustr;
use usuarios_states::{BoxFuture, QueryFn};

use crate::http::Client;
use crate::{BusinessConfig, PageRequest, UsersPage};

/// Why a page could not be loaded. The view shows the same message for all of them.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchUsersError {
    /// The request could not be sent or no response came back.
    #[error("Request failed: {0}")]
    Network(String),
    /// The server answered with a non-2xx status.
    #[error("API returned status: {status}")]
    Server { status: u16 },
    /// The body was not a users page.
    #[error("Failed to parse users page: {0}")]
    Parse(String),
}

/// GET `{users_url}?page={n}&size={m}` with a 1-based `page`.
pub async fn list_users(
    users_url: &str,
    request: PageRequest,
) -> Result<UsersPage, FetchUsersError> {
    info!(
        "Fetching users page {} (size {})",
        request.wire_page(),
        request.page_size
    );

    let response = Client::get(users_url)
        .query("page", request.wire_page())
        .query("size", request.page_size)
        .header("accept", "application/json")
        .send()
        .await
        .map_err(|e| {
            error!("Users request failed: {e}");
            FetchUsersError::Network(e.message)
        })?;

    if !response.is_success() {
        error!("Users API returned status: {}", response.status);
        return Err(FetchUsersError::Server {
            status: response.status,
        });
    }

    let page: UsersPage = response.json().map_err(|e| {
        error!("Failed to parse users page: {e}");
        FetchUsersError::Parse(e.to_string())
    })?;

    info!(
        "Fetched {} users for page {}",
        page.len(),
        request.wire_page()
    );
    Ok(page)
}

/// The remote data source the users table queries.
#[derive(Debug, Clone, Copy)]
pub struct UsersApi {
    users_url: Ustr,
}

impl UsersApi {
    pub fn new(config: &BusinessConfig) -> Self {
        Self {
            users_url: config.users_url(),
        }
    }
}

impl QueryFn<PageRequest> for UsersApi {
    type Output = UsersPage;
    type Error = FetchUsersError;

    fn fetch(&self, key: PageRequest) -> BoxFuture<Result<UsersPage, FetchUsersError>> {
        let users_url = self.users_url;
        Box::pin(async move { list_users(users_url.as_str(), key).await })
    }
}
