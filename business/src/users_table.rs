//! Users table view model.
//!
//! `UsersTable` owns the pagination state and the page cache. The UI forwards user intents
//! (`previous`, `next`, `set_page_size`, `retry`), calls `sync` once per frame and renders
//! `view()` plus `controls()`. Both always read the entry for the *current* request, so a late
//! response for a page the user already left can only fill that page's own cache entry.

use chrono::{DateTime, Utc};
use log::info;
use usuarios_states::{
    Notify, QueryClient, QueryFn, QueryOptions, QueryStatus, SettledOf, StateRuntime,
};

use crate::{
    BusinessConfig, FetchUsersError, NextPagePolicy, PageRequest, PageSize, Pagination, User,
    UsersApi, UsersPage,
};

/// Anything that can load a users page for the table.
pub trait UsersSource: QueryFn<PageRequest, Output = UsersPage, Error = FetchUsersError> {}

impl<T> UsersSource for T where
    T: QueryFn<PageRequest, Output = UsersPage, Error = FetchUsersError>
{
}

/// Exactly one of these is rendered at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UsersTableView<'a> {
    Loading,
    Failed(&'a FetchUsersError),
    Empty,
    Rows(&'a [User]),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageControls {
    pub can_previous: bool,
    pub can_next: bool,
    pub page_size: PageSize,
    /// 1-based.
    pub page_number: u32,
    pub total_pages: Option<u32>,
    /// A fetch for the current page is in flight.
    pub refreshing: bool,
}

impl PageControls {
    pub fn page_label(&self) -> String {
        format!("Página {}", self.page_number)
    }

    pub fn total_label(&self) -> Option<String> {
        self.total_pages
            .filter(|total| *total > 0)
            .map(|total| format!("de {total}"))
    }
}

pub struct UsersTable<S: UsersSource = UsersApi> {
    pagination: Pagination,
    policy: NextPagePolicy,
    query: QueryClient<PageRequest, S>,
    mounted: bool,
}

impl UsersTable<UsersApi> {
    /// Builds the table against the configured API, on the async runtime of the caller.
    pub fn from_config(config: &BusinessConfig) -> usuarios_states::Result<Self> {
        let runtime = StateRuntime::current()?;
        Ok(Self::new(
            UsersApi::new(config),
            config.query_options(),
            config.next_page_policy,
            runtime,
        ))
    }
}

impl<S: UsersSource> UsersTable<S> {
    pub fn new(
        source: S,
        options: QueryOptions,
        policy: NextPagePolicy,
        runtime: StateRuntime<SettledOf<PageRequest, S>>,
    ) -> Self {
        Self {
            pagination: Pagination::default(),
            policy,
            query: QueryClient::new(source, options, runtime),
            mounted: false,
        }
    }

    pub fn set_notify(&mut self, notify: Notify) {
        self.query.set_notify(notify);
    }

    pub fn pagination(&self) -> Pagination {
        self.pagination
    }

    pub fn current_request(&self) -> PageRequest {
        self.pagination.request()
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    /// Requests the first page. Later calls do nothing until the next `teardown`.
    pub fn mount(&mut self, now: DateTime<Utc>) {
        if self.mounted {
            return;
        }
        self.mounted = true;
        self.load(now);
    }

    fn load(&mut self, now: DateTime<Utc>) {
        let request = self.current_request();
        if self.query.request(request, now) {
            info!(
                "Users table requested page {} (size {})",
                request.wire_page(),
                request.page_size
            );
        }
    }

    pub fn previous(&mut self, now: DateTime<Utc>) -> bool {
        if !self.pagination.previous() {
            return false;
        }
        self.load(now);
        true
    }

    /// Does nothing while the Next control is disabled.
    pub fn next(&mut self, now: DateTime<Utc>) -> bool {
        if !self.controls().can_next || !self.pagination.next() {
            return false;
        }
        self.load(now);
        true
    }

    pub fn set_page_size(&mut self, page_size: PageSize, now: DateTime<Utc>) -> bool {
        if !self.pagination.set_page_size(page_size) {
            return false;
        }
        self.load(now);
        true
    }

    /// Fetches the current page again, replacing any fetch in flight for it.
    pub fn retry(&mut self, now: DateTime<Utc>) {
        let request = self.current_request();
        info!("Retrying users page {}", request.wire_page());
        self.query.refetch(request, now);
    }

    /// Applies finished fetches and evicts idle pages. Call once per frame.
    pub fn sync(&mut self, now: DateTime<Utc>) -> usize {
        let applied = self.query.sync(now);
        let active = self.current_request();
        self.query.collect_garbage(now, &active);
        applied
    }

    /// Waits for the next fetch to finish. Only await this while one is pending.
    pub async fn wait_settled(&mut self, now: DateTime<Utc>) -> usize {
        self.query.wait_settled(now).await
    }

    /// Drops every cached page and ignores fetches still in flight.
    pub fn teardown(&mut self) {
        info!("Users table torn down");
        self.query.clear();
        self.mounted = false;
    }

    pub fn view(&self) -> UsersTableView<'_> {
        match self.query.status(&self.current_request()) {
            QueryStatus::Loading => UsersTableView::Loading,
            QueryStatus::Failed { error, .. } => UsersTableView::Failed(error),
            QueryStatus::Ready { data, .. } if data.is_empty() => UsersTableView::Empty,
            QueryStatus::Ready { data, .. } => UsersTableView::Rows(&data.items),
        }
    }

    pub fn controls(&self) -> PageControls {
        let request = self.current_request();
        let (page, refreshing) = match self.query.status(&request) {
            QueryStatus::Ready { data, refreshing } => (Some(data), refreshing),
            QueryStatus::Failed { refreshing, .. } => (None, refreshing),
            QueryStatus::Loading => (None, self.query.is_fetching(&request)),
        };

        PageControls {
            can_previous: self.pagination.can_go_previous(),
            can_next: page.is_some_and(|page| self.pagination.can_go_next(page, self.policy)),
            page_size: self.pagination.page_size(),
            page_number: self.pagination.page_number(),
            total_pages: page.and_then(|page| page.total_pages),
            refreshing,
        }
    }
}

impl<S: UsersSource> std::fmt::Debug for UsersTable<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UsersTable")
            .field("pagination", &self.pagination)
            .field("policy", &self.policy)
            .field("query", &self.query)
            .field("mounted", &self.mounted)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::{Arc, Mutex};

    use chrono::Duration;
    use usuarios_states::BoxFuture;

    use super::*;

    /// In-memory users source. Each request sleeps for its configured delay (10ms by default).
    #[derive(Debug, Clone, Default)]
    struct FakeUsers {
        total: u32,
        /// Page count to report instead of the one derived from `total`.
        reported_pages: Option<u32>,
        delays_ms: HashMap<PageRequest, u64>,
        calls: Arc<Mutex<Vec<PageRequest>>>,
        fail: Arc<AtomicBool>,
    }

    impl FakeUsers {
        fn with_total(total: u32) -> Self {
            Self {
                total,
                ..Self::default()
            }
        }

        fn delay(mut self, request: PageRequest, ms: u64) -> Self {
            self.delays_ms.insert(request, ms);
            self
        }
    }

    impl QueryFn<PageRequest> for FakeUsers {
        type Output = UsersPage;
        type Error = FetchUsersError;

        fn fetch(&self, key: PageRequest) -> BoxFuture<Result<UsersPage, FetchUsersError>> {
            self.calls.lock().unwrap().push(key);

            let delay = self.delays_ms.get(&key).copied().unwrap_or(10);
            let fail = self.fail.load(Ordering::SeqCst);
            let start = key.page_index * key.page_size;
            let end = (start + key.page_size).min(self.total);
            let items = (start..end)
                .map(|i| User {
                    id: i64::from(i) + 1,
                    name: format!("user{}", i + 1),
                    email: format!("user{}@x.com", i + 1),
                })
                .collect();
            let total_pages = self
                .reported_pages
                .unwrap_or_else(|| self.total.div_ceil(key.page_size));

            Box::pin(async move {
                tokio::time::sleep(std::time::Duration::from_millis(delay)).await;
                if fail {
                    Err(FetchUsersError::Server { status: 500 })
                } else {
                    Ok(UsersPage {
                        items,
                        total_pages: Some(total_pages),
                    })
                }
            })
        }
    }

    fn table(source: FakeUsers, policy: NextPagePolicy) -> UsersTable<FakeUsers> {
        UsersTable::new(
            source,
            QueryOptions::default(),
            policy,
            StateRuntime::current().unwrap(),
        )
    }

    fn t0() -> DateTime<Utc> {
        DateTime::<Utc>::UNIX_EPOCH
    }

    fn rows(table: &UsersTable<FakeUsers>) -> Vec<i64> {
        match table.view() {
            UsersTableView::Rows(users) => users.iter().map(|u| u.id).collect(),
            other => panic!("expected rows, got {other:?}"),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn mount_loads_first_page() {
        let mut table = table(FakeUsers::with_total(12), NextPagePolicy::TotalPages);

        table.mount(t0());
        assert_eq!(table.view(), UsersTableView::Loading);

        table.wait_settled(t0()).await;
        assert_eq!(rows(&table), vec![1, 2, 3, 4, 5]);

        let controls = table.controls();
        assert!(!controls.can_previous);
        assert!(controls.can_next);
        assert_eq!(controls.page_label(), "Página 1");
        assert_eq!(controls.total_label().as_deref(), Some("de 3"));
    }

    #[tokio::test(start_paused = true)]
    async fn mount_twice_fetches_once() {
        let source = FakeUsers::with_total(12);
        let calls = source.calls.clone();
        let mut table = table(source, NextPagePolicy::TotalPages);

        table.mount(t0());
        table.mount(t0());
        table.wait_settled(t0()).await;

        assert_eq!(calls.lock().unwrap().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn previous_on_first_page_changes_nothing() {
        let source = FakeUsers::with_total(12);
        let calls = source.calls.clone();
        let mut table = table(source, NextPagePolicy::TotalPages);

        table.mount(t0());
        table.wait_settled(t0()).await;

        assert!(!table.previous(t0()));
        assert_eq!(table.pagination().page_index(), 0);
        assert_eq!(calls.lock().unwrap().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn paging_back_within_window_is_served_from_cache() {
        let source = FakeUsers::with_total(12);
        let calls = source.calls.clone();
        let mut table = table(source, NextPagePolicy::TotalPages);

        table.mount(t0());
        table.wait_settled(t0()).await;

        assert!(table.next(t0()));
        table.wait_settled(t0()).await;
        assert_eq!(rows(&table), vec![6, 7, 8, 9, 10]);

        assert!(table.previous(t0() + Duration::seconds(1)));
        assert_eq!(rows(&table), vec![1, 2, 3, 4, 5]);
        assert!(!table.controls().refreshing);
        assert_eq!(
            *calls.lock().unwrap(),
            vec![PageRequest::new(0, 5), PageRequest::new(1, 5)]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn paging_back_after_window_refreshes_behind_cached_rows() {
        let source = FakeUsers::with_total(12);
        let calls = source.calls.clone();
        let mut table = table(source, NextPagePolicy::TotalPages);

        table.mount(t0());
        table.wait_settled(t0()).await;
        table.next(t0());
        table.wait_settled(t0()).await;

        table.previous(t0() + Duration::seconds(6));
        assert_eq!(rows(&table), vec![1, 2, 3, 4, 5]);
        assert!(table.controls().refreshing);
        assert_eq!(calls.lock().unwrap().len(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn late_response_for_abandoned_page_is_not_shown() {
        // Page size 5 is slow, page size 10 is fast.
        let source = FakeUsers::with_total(30).delay(PageRequest::new(0, 5), 200);
        let mut table = table(source, NextPagePolicy::TotalPages);

        table.mount(t0());
        assert!(table.set_page_size(PageSize::Ten, t0()));

        table.wait_settled(t0()).await;
        assert_eq!(rows(&table).len(), 10);

        // The abandoned request resolves afterwards.
        table.wait_settled(t0()).await;
        assert_eq!(rows(&table).len(), 10);
        assert_eq!(table.current_request(), PageRequest::new(0, 10));
    }

    #[tokio::test(start_paused = true)]
    async fn changing_page_size_goes_back_to_first_page() {
        let mut table = table(FakeUsers::with_total(30), NextPagePolicy::TotalPages);

        table.mount(t0());
        table.wait_settled(t0()).await;
        table.next(t0());
        table.wait_settled(t0()).await;
        assert_eq!(table.pagination().page_index(), 1);

        assert!(table.set_page_size(PageSize::Twenty, t0()));
        assert_eq!(table.pagination().page_index(), 0);
        assert_eq!(table.view(), UsersTableView::Loading);

        table.wait_settled(t0()).await;
        assert_eq!(rows(&table).len(), 20);
    }

    #[tokio::test(start_paused = true)]
    async fn next_is_disabled_while_loading() {
        let mut table = table(FakeUsers::with_total(30), NextPagePolicy::TotalPages);

        table.mount(t0());
        assert!(!table.controls().can_next);
        assert!(!table.next(t0()));
        assert_eq!(table.pagination().page_index(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn short_last_page_disables_next() {
        let mut table = table(FakeUsers::with_total(7), NextPagePolicy::RowCount);

        table.mount(t0());
        table.wait_settled(t0()).await;
        table.next(t0());
        table.wait_settled(t0()).await;

        assert_eq!(rows(&table), vec![6, 7]);
        assert!(!table.controls().can_next);
        assert!(!table.next(t0()));
    }

    #[tokio::test(start_paused = true)]
    async fn short_page_disables_next_despite_reported_page_count() {
        let source = FakeUsers {
            reported_pages: Some(3),
            ..FakeUsers::with_total(2)
        };
        let mut table = table(source, NextPagePolicy::default());

        table.mount(t0());
        table.wait_settled(t0()).await;

        assert_eq!(rows(&table), vec![1, 2]);
        let controls = table.controls();
        assert_eq!(controls.total_pages, Some(3));
        assert!(!controls.can_next);
        assert!(!table.next(t0()));
        assert_eq!(table.pagination().page_index(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn full_last_page_depends_on_policy() {
        for (policy, expect_next) in [
            (NextPagePolicy::TotalPages, false),
            (NextPagePolicy::RowCount, true),
        ] {
            let mut table = table(FakeUsers::with_total(10), policy);

            table.mount(t0());
            table.wait_settled(t0()).await;
            table.next(t0());
            table.wait_settled(t0()).await;

            assert_eq!(rows(&table), vec![6, 7, 8, 9, 10]);
            assert_eq!(table.controls().can_next, expect_next, "policy {policy:?}");
        }
    }

    #[tokio::test(start_paused = true)]
    async fn empty_page_renders_empty_state() {
        let mut table = table(FakeUsers::with_total(0), NextPagePolicy::TotalPages);

        table.mount(t0());
        table.wait_settled(t0()).await;

        assert_eq!(table.view(), UsersTableView::Empty);
        assert_eq!(table.controls().total_label(), None);
    }

    #[tokio::test(start_paused = true)]
    async fn failure_is_shown_until_retry_succeeds() {
        let source = FakeUsers::with_total(12);
        let fail = source.fail.clone();
        fail.store(true, Ordering::SeqCst);
        let mut table = table(source, NextPagePolicy::TotalPages);

        table.mount(t0());
        table.wait_settled(t0()).await;
        assert_eq!(
            table.view(),
            UsersTableView::Failed(&FetchUsersError::Server { status: 500 })
        );
        assert!(!table.controls().can_next);

        fail.store(false, Ordering::SeqCst);
        table.retry(t0());
        assert!(table.controls().refreshing);
        table.wait_settled(t0()).await;

        assert_eq!(rows(&table), vec![1, 2, 3, 4, 5]);
    }

    #[tokio::test(start_paused = true)]
    async fn teardown_ignores_fetches_in_flight() {
        let mut table = table(FakeUsers::with_total(12), NextPagePolicy::TotalPages);

        table.mount(t0());
        table.teardown();
        assert!(!table.is_mounted());

        tokio::time::sleep(std::time::Duration::from_millis(50)).await;
        assert_eq!(table.sync(t0()), 0);
        assert_eq!(table.view(), UsersTableView::Loading);
        assert!(!table.controls().refreshing);
    }
}
