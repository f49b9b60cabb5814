//! Wire types for the users listing endpoint.

use serde::{Deserialize, Serialize};

/// A user row as served by `GET /api/users`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: String,
}

/// One page of users.
///
/// The endpoint answers either with an envelope `{ "items": [...], "totalPages": n }` or with a
/// bare array of users. A bare array carries no page count.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "UsersPayload", rename_all = "camelCase")]
pub struct UsersPage {
    pub items: Vec<User>,
    pub total_pages: Option<u32>,
}

impl UsersPage {
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum UsersPayload {
    Envelope {
        items: Vec<User>,
        #[serde(default, rename = "totalPages")]
        total_pages: Option<u32>,
    },
    Bare(Vec<User>),
}

impl From<UsersPayload> for UsersPage {
    fn from(payload: UsersPayload) -> Self {
        match payload {
            UsersPayload::Envelope { items, total_pages } => Self { items, total_pages },
            UsersPayload::Bare(items) => Self {
                items,
                total_pages: None,
            },
        }
    }
}

/// Which page the view asks for. Also the cache key.
///
/// `page_index` is 0-based here and 1-based on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PageRequest {
    pub page_index: u32,
    pub page_size: u32,
}

impl PageRequest {
    pub fn new(page_index: u32, page_size: u32) -> Self {
        Self {
            page_index,
            page_size,
        }
    }

    /// The `page` query parameter.
    pub fn wire_page(&self) -> u32 {
        self.page_index.saturating_add(1)
    }
}
