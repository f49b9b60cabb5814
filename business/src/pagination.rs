//! Pagination state machine for the users table.

use crate::{PageRequest, UsersPage};

/// Page sizes offered by the selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PageSize {
    #[default]
    Five,
    Ten,
    Twenty,
}

impl PageSize {
    pub const ALL: [PageSize; 3] = [PageSize::Five, PageSize::Ten, PageSize::Twenty];

    pub fn rows(self) -> u32 {
        match self {
            PageSize::Five => 5,
            PageSize::Ten => 10,
            PageSize::Twenty => 20,
        }
    }

    pub fn label(self) -> String {
        format!("{} filas", self.rows())
    }
}

/// How the view decides that the current page is the last one.
///
/// `RowCount` treats a page with fewer rows than the page size as the last one.
/// It keeps Next enabled on a last page that happens to be exactly full. `TotalPages` also
/// requires the server's page count to leave room for another page, and falls back to the
/// row count alone when the count is missing. A short page is the last page under both.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NextPagePolicy {
    #[default]
    TotalPages,
    RowCount,
}

impl NextPagePolicy {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "total_pages" => Some(Self::TotalPages),
            "row_count" => Some(Self::RowCount),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Pagination {
    page_index: u32,
    page_size: PageSize,
}

impl Pagination {
    pub fn new(page_index: u32, page_size: PageSize) -> Self {
        Self {
            page_index,
            page_size,
        }
    }

    pub fn page_index(&self) -> u32 {
        self.page_index
    }

    pub fn page_size(&self) -> PageSize {
        self.page_size
    }

    pub fn request(&self) -> PageRequest {
        PageRequest::new(self.page_index, self.page_size.rows())
    }

    pub fn can_go_previous(&self) -> bool {
        self.page_index > 0
    }

    /// Returns `false` (and changes nothing) on the first page.
    pub fn previous(&mut self) -> bool {
        if !self.can_go_previous() {
            return false;
        }
        self.page_index -= 1;
        true
    }

    /// Whether `page`, the result shown for the current request, has a successor.
    pub fn can_go_next(&self, page: &UsersPage, policy: NextPagePolicy) -> bool {
        let full_page = page.len() >= self.page_size.rows() as usize;
        match (policy, page.total_pages) {
            (NextPagePolicy::TotalPages, Some(total)) => {
                full_page && self.page_index.saturating_add(1) < total
            }
            _ => full_page,
        }
    }

    /// Advances unconditionally; callers check [`Pagination::can_go_next`] first.
    pub fn next(&mut self) -> bool {
        match self.page_index.checked_add(1) {
            Some(index) => {
                self.page_index = index;
                true
            }
            None => false,
        }
    }

    /// Switches the page size and goes back to the first page.
    ///
    /// Returns `false` if that is where the view already is.
    pub fn set_page_size(&mut self, page_size: PageSize) -> bool {
        if self.page_size == page_size && self.page_index == 0 {
            return false;
        }
        self.page_size = page_size;
        self.page_index = 0;
        true
    }

    /// 1-based page number for display.
    pub fn page_number(&self) -> u32 {
        self.page_index.saturating_add(1)
    }
}
