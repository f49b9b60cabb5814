//! Keyed query cache.
//!
//! [`QueryClient`] owns one [`QueryFn`] and a map from request key to cached result. It is
//! driven from the UI thread:
//!
//! 1. `request(key, now)` when the selected key changes. Fresh entries and keys that already
//!    have a fetch in flight are served from the cache; everything else spawns a fetch.
//! 2. `sync(now)` once per frame. Finished fetches are applied to their own key's entry, and
//!    only if they are still the pending task for that key.
//! 3. `status(&key)` to render.
//!
//! Results are matched by key and generation, never by arrival order, so a slow response for
//! an abandoned key can not replace what is on screen.

use std::{collections::HashMap, fmt::Debug, future::Future, hash::Hash, pin::Pin, sync::Arc};

use chrono::{DateTime, Duration, Utc};
use log::{debug, info, warn};
use tokio_util::sync::CancellationToken;

use crate::{StateRuntime, TaskHandle, TaskId};

pub type BoxFuture<T> = Pin<Box<dyn Future<Output = T> + Send + 'static>>;

/// Called from the fetch task after a result was queued, e.g. to request a repaint.
pub type Notify = Arc<dyn Fn() + Send + Sync>;

/// The async operation behind a query.
pub trait QueryFn<K>: Send + Sync + 'static {
    type Output: Send + 'static;
    type Error: std::error::Error + Send + 'static;

    fn fetch(&self, key: K) -> BoxFuture<Result<Self::Output, Self::Error>>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueryOptions {
    /// How long a successful result is served without refetching.
    pub stale_time: Duration,
    /// How long an unused entry is kept before eviction.
    pub gc_time: Duration,
}

impl Default for QueryOptions {
    fn default() -> Self {
        Self {
            stale_time: Duration::seconds(5),
            gc_time: Duration::minutes(5),
        }
    }
}

/// What the cache knows about one key.
#[derive(Debug, PartialEq)]
pub enum QueryStatus<'a, V, E> {
    /// Nothing cached yet.
    Loading,
    /// The last fetch for this key failed.
    Failed { error: &'a E, refreshing: bool },
    /// Cached data, possibly with a background refetch in flight.
    Ready { data: &'a V, refreshing: bool },
}

pub struct Settled<K, V, E> {
    id: TaskId<K>,
    result: Result<V, E>,
}

#[derive(Debug)]
struct Entry<K, V, E> {
    data: Option<V>,
    error: Option<E>,
    /// Time of the last successful fetch. `None` marks the entry stale.
    updated_at: Option<DateTime<Utc>>,
    last_access: DateTime<Utc>,
    in_flight: Option<TaskHandle<K>>,
}

impl<K, V, E> Entry<K, V, E> {
    fn new(now: DateTime<Utc>) -> Self {
        Self {
            data: None,
            error: None,
            updated_at: None,
            last_access: now,
            in_flight: None,
        }
    }

    fn is_fresh(&self, now: DateTime<Utc>, stale_time: Duration) -> bool {
        self.error.is_none()
            && self
                .updated_at
                .is_some_and(|at| now.signed_duration_since(at) < stale_time)
    }

    fn cancel_in_flight(&mut self) {
        if let Some(handle) = self.in_flight.take() {
            handle.cancel();
        }
    }
}

type EntryOf<K, F> = Entry<K, <F as QueryFn<K>>::Output, <F as QueryFn<K>>::Error>;
pub type SettledOf<K, F> = Settled<K, <F as QueryFn<K>>::Output, <F as QueryFn<K>>::Error>;

pub struct QueryClient<K, F>
where
    K: Clone + Eq + Hash + Debug + Send + 'static,
    F: QueryFn<K>,
{
    fetcher: Arc<F>,
    options: QueryOptions,
    runtime: StateRuntime<SettledOf<K, F>>,
    entries: HashMap<K, EntryOf<K, F>>,
    next_generation: u64,
    notify: Option<Notify>,
}

impl<K, F> QueryClient<K, F>
where
    K: Clone + Eq + Hash + Debug + Send + 'static,
    F: QueryFn<K>,
{
    pub fn new(fetcher: F, options: QueryOptions, runtime: StateRuntime<SettledOf<K, F>>) -> Self {
        Self {
            fetcher: Arc::new(fetcher),
            options,
            runtime,
            entries: HashMap::new(),
            next_generation: 0,
            notify: None,
        }
    }

    pub fn set_notify(&mut self, notify: Notify) {
        self.notify = Some(notify);
    }

    /// Marks `key` as accessed and fetches it unless it is fresh or already in flight.
    ///
    /// Returns `true` if a new fetch was spawned.
    pub fn request(&mut self, key: K, now: DateTime<Utc>) -> bool {
        let stale_time = self.options.stale_time;
        let entry = self
            .entries
            .entry(key.clone())
            .or_insert_with(|| Entry::new(now));
        entry.last_access = now;

        if entry.in_flight.is_some() {
            debug!("Query {key:?} already in flight, joining it");
            return false;
        }
        if entry.is_fresh(now, stale_time) {
            debug!("Query {key:?} is fresh, serving from cache");
            return false;
        }

        self.spawn_fetch(key);
        true
    }

    /// Fetches `key` again, superseding any fetch already in flight for it.
    pub fn refetch(&mut self, key: K, now: DateTime<Utc>) {
        let entry = self
            .entries
            .entry(key.clone())
            .or_insert_with(|| Entry::new(now));
        entry.last_access = now;
        entry.cancel_in_flight();

        self.spawn_fetch(key);
    }

    /// Marks `key` stale and drops its pending fetch. Cached data stays visible until the next
    /// request replaces it.
    pub fn invalidate(&mut self, key: &K) {
        if let Some(entry) = self.entries.get_mut(key) {
            entry.cancel_in_flight();
            entry.updated_at = None;
        }
    }

    /// Cancels every pending fetch and forgets all entries. Results still on their way are
    /// discarded when they arrive.
    pub fn clear(&mut self) {
        for entry in self.entries.values_mut() {
            entry.cancel_in_flight();
        }
        self.entries.clear();
    }

    fn spawn_fetch(&mut self, key: K) {
        self.next_generation += 1;
        let id = TaskId::new(key.clone(), self.next_generation);
        let handle = TaskHandle::new(id.clone(), CancellationToken::new());
        let token = handle.cancellation_token();

        let future = self.fetcher.fetch(key.clone());
        let sender = self.runtime.sender();
        let notify = self.notify.clone();

        info!("Fetching query {key:?} (generation {})", id.generation());
        self.runtime.spawn(async move {
            tokio::select! {
                biased;
                () = token.cancelled() => {
                    debug!("Query task {id:?} cancelled");
                }
                result = future => {
                    if sender.send(Settled { id, result }).is_err() {
                        debug!("Query cache dropped before the result arrived");
                        return;
                    }
                    if let Some(notify) = notify {
                        notify();
                    }
                }
            }
        });

        if let Some(entry) = self.entries.get_mut(&key) {
            entry.in_flight = Some(handle);
        }
    }

    /// Applies every result that has arrived. Returns how many were applied.
    pub fn sync(&mut self, now: DateTime<Utc>) -> usize {
        let settled: Vec<_> = self.runtime.drain().collect();
        let mut applied = 0;
        for message in settled {
            if self.apply(message, now) {
                applied += 1;
            }
        }
        applied
    }

    /// Waits for the next result and applies it, together with anything else already queued.
    ///
    /// Only await this while a fetch is pending: cancelled fetches never report back.
    pub async fn wait_settled(&mut self, now: DateTime<Utc>) -> usize {
        let Some(message) = self.runtime.recv().await else {
            return 0;
        };
        let applied = usize::from(self.apply(message, now));
        applied + self.sync(now)
    }

    fn apply(&mut self, message: SettledOf<K, F>, now: DateTime<Utc>) -> bool {
        let Settled { id, result } = message;

        let Some(entry) = self.entries.get_mut(id.key()) else {
            debug!("Discarding result for evicted query {id:?}");
            return false;
        };
        let is_pending = entry
            .in_flight
            .as_ref()
            .is_some_and(|handle| handle.id() == &id);
        if !is_pending {
            debug!("Discarding stale result for query {id:?}");
            return false;
        }

        entry.in_flight = None;
        match result {
            Ok(data) => {
                info!("Query {:?} settled", id.key());
                entry.data = Some(data);
                entry.error = None;
                entry.updated_at = Some(now);
            }
            Err(err) => {
                warn!("Query {:?} failed: {err}", id.key());
                entry.error = Some(err);
                entry.updated_at = None;
            }
        }
        true
    }

    /// Evicts entries idle for longer than `gc_time`. `active` and in-flight keys are kept.
    pub fn collect_garbage(&mut self, now: DateTime<Utc>, active: &K) {
        let gc_time = self.options.gc_time;
        self.entries.retain(|key, entry| {
            let keep = key == active
                || entry.in_flight.is_some()
                || now.signed_duration_since(entry.last_access) < gc_time;
            if !keep {
                debug!("Evicting idle query {key:?}");
            }
            keep
        });
    }

    pub fn status(&self, key: &K) -> QueryStatus<'_, F::Output, F::Error> {
        let Some(entry) = self.entries.get(key) else {
            return QueryStatus::Loading;
        };
        let refreshing = entry.in_flight.is_some();

        match (&entry.error, &entry.data) {
            (Some(error), _) => QueryStatus::Failed { error, refreshing },
            (None, Some(data)) => QueryStatus::Ready { data, refreshing },
            (None, None) => QueryStatus::Loading,
        }
    }

    pub fn is_fetching(&self, key: &K) -> bool {
        self.entries
            .get(key)
            .is_some_and(|entry| entry.in_flight.is_some())
    }

}

impl<K, F> Drop for QueryClient<K, F>
where
    K: Clone + Eq + Hash + Debug + Send + 'static,
    F: QueryFn<K>,
{
    fn drop(&mut self) {
        self.clear();
    }
}

impl<K, F> Debug for QueryClient<K, F>
where
    K: Clone + Eq + Hash + Debug + Send + 'static,
    F: QueryFn<K>,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QueryClient")
            .field("options", &self.options)
            .field("keys", &self.entries.keys().collect::<Vec<_>>())
            .field("next_generation", &self.next_generation)
            .finish()
    }
}
