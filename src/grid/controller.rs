//! Live grid state and the navigations it drives.
//!
//! Pagination and sort edits navigate right away. Filter and search edits go
//! through the debouncer under their own keys, so only the trailing edit of a
//! burst reaches the navigator and neither key cancels the other.
//!
//! Every dispatched navigation takes a fresh request token. A completion only
//! clears `loading` when its token is still the latest one; completions of
//! superseded requests are ignored.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

use crate::domain::grid::{FilterModel, GridQueryState, PaginationModel, SortModel};
use crate::grid::codec::QueryStateCodec;
use crate::grid::debounce::DebounceController;
use crate::grid::navigation::{NavigationError, NavigationResult, Navigator, VisitOptions};
use crate::models::config::GridConfig;

/// Hook notified when the latest navigation fails.
pub type ErrorHook = Arc<dyn Fn(&NavigationError) + Send + Sync>;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ControllerPhase {
    Idle,
    Debouncing,
    Navigating,
    TornDown,
}

struct Inner {
    state: Arc<GridQueryState>,
    base_url: String,
    loading: bool,
    latest_request: u64,
    torn_down: bool,
    error_hook: Option<ErrorHook>,
}

struct Shared<N> {
    grid_id: String,
    navigator: N,
    codec: QueryStateCodec,
    config: GridConfig,
    inner: Mutex<Inner>,
}

impl<N: Navigator> Shared<N> {
    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Stores `next` (if any) and navigates to the URL of the current state.
    /// A debounced dispatch (`next == None`) whose URL matches the last one
    /// dispatched is dropped.
    fn dispatch(self: &Arc<Self>, next: Option<GridQueryState>) -> bool {
        let (url, token) = {
            let mut inner = self.lock();
            if inner.torn_down {
                return false;
            }
            let debounced = next.is_none();
            if let Some(next) = next {
                inner.state = Arc::new(next);
            }
            let url = self.codec.encode(&inner.state, &inner.base_url);
            if debounced && url == inner.base_url {
                log::debug!("Grid {}: {url} is already current", self.grid_id);
                return false;
            }
            inner.latest_request += 1;
            inner.loading = true;
            inner.base_url = url.clone();
            (url, inner.latest_request)
        };

        log::debug!("Grid {}: navigating to {url} (request {token})", self.grid_id);
        let weak: Weak<Self> = Arc::downgrade(self);
        self.navigator.navigate(
            &url,
            VisitOptions::default(),
            Box::new(move |result| {
                if let Some(shared) = weak.upgrade() {
                    shared.finish(token, result);
                }
            }),
        );
        true
    }

    fn finish(&self, token: u64, result: NavigationResult) {
        let hook = {
            let mut inner = self.lock();
            if token != inner.latest_request {
                log::debug!(
                    "Grid {}: ignoring completion of superseded request {token}",
                    self.grid_id
                );
                return;
            }
            inner.loading = false;
            inner.error_hook.clone()
        };

        if let Err(err) = result {
            log::warn!("Grid {}: navigation {token} failed: {err}", self.grid_id);
            if let Some(hook) = hook {
                hook(&err);
            }
        }
    }
}

/// Owns the grid's [`GridQueryState`] and keeps it in step with the URL.
pub struct GridStateController<N: Navigator> {
    shared: Arc<Shared<N>>,
    debounce: DebounceController,
    filter_key: String,
    search_key: String,
}

impl<N: Navigator> GridStateController<N> {
    /// Seeds the controller by decoding `url`.
    pub fn mount(grid_id: impl Into<String>, url: &str, navigator: N, config: GridConfig) -> Self {
        let grid_id = grid_id.into();
        let codec = QueryStateCodec::new(config.default_page_size());
        let state = codec.decode(url);
        log::debug!("Grid {grid_id}: mounted with {state:?}");

        Self {
            filter_key: format!("{grid_id}:filters"),
            search_key: format!("{grid_id}:search"),
            shared: Arc::new(Shared {
                grid_id,
                navigator,
                codec,
                config,
                inner: Mutex::new(Inner {
                    state: Arc::new(state),
                    base_url: url.to_string(),
                    loading: false,
                    latest_request: 0,
                    torn_down: false,
                    error_hook: None,
                }),
            }),
            debounce: DebounceController::new(),
        }
    }

    /// Current intent; replaced by a new value on every edit.
    pub fn state(&self) -> Arc<GridQueryState> {
        Arc::clone(&self.shared.lock().state)
    }

    pub fn is_loading(&self) -> bool {
        self.shared.lock().loading
    }

    /// Token of the most recently dispatched navigation (0 before any).
    pub fn latest_request(&self) -> u64 {
        self.shared.lock().latest_request
    }

    pub fn phase(&self) -> ControllerPhase {
        let (torn_down, loading) = {
            let inner = self.shared.lock();
            (inner.torn_down, inner.loading)
        };
        if torn_down {
            ControllerPhase::TornDown
        } else if self.debounce.is_pending(&self.filter_key)
            || self.debounce.is_pending(&self.search_key)
        {
            ControllerPhase::Debouncing
        } else if loading {
            ControllerPhase::Navigating
        } else {
            ControllerPhase::Idle
        }
    }

    /// The URL reflecting the current state.
    pub fn current_url(&self) -> String {
        let inner = self.shared.lock();
        self.shared.codec.encode(&inner.state, &inner.base_url)
    }

    /// Registers the extension point for surfacing navigation failures.
    pub fn on_navigation_error(&self, hook: impl Fn(&NavigationError) + Send + Sync + 'static) {
        self.shared.lock().error_hook = Some(Arc::new(hook));
    }

    /// Navigates unless `next` equals the current pagination or switches to
    /// a page size outside the configured options. A size that came in
    /// through the URL stays usable for paging.
    pub fn set_pagination(&self, next: PaginationModel) -> bool {
        let next_state = {
            let inner = self.shared.lock();
            if inner.torn_down || inner.state.pagination == next {
                return false;
            }
            if next.page_size != inner.state.pagination.page_size
                && !self.shared.config.allows_page_size(next.page_size)
            {
                log::warn!(
                    "Grid {}: page size {} is not one of {:?}",
                    self.shared.grid_id,
                    next.page_size,
                    self.shared.config.page_size_options
                );
                return false;
            }
            inner.state.as_ref().clone().with_pagination(next)
        };
        self.navigate_now(next_state)
    }

    /// Navigates whenever the sort changes, including back to unsorted.
    pub fn set_sort(&self, next: Option<SortModel>) -> bool {
        let next_state = {
            let inner = self.shared.lock();
            if inner.torn_down || inner.state.sort == next {
                return false;
            }
            inner.state.as_ref().clone().with_sort(next)
        };
        self.navigate_now(next_state)
    }

    /// Dispatches right away. The new URL already carries any pending filter
    /// or search edit, so their timers are dropped.
    fn navigate_now(&self, next_state: GridQueryState) -> bool {
        self.debounce.cancel(&self.filter_key);
        self.debounce.cancel(&self.search_key);
        self.shared.dispatch(Some(next_state))
    }

    /// Applies the filters immediately and navigates after the quiet period.
    pub fn set_filter(&self, next: FilterModel) -> bool {
        {
            let mut inner = self.shared.lock();
            if inner.torn_down || inner.state.filters == next {
                return false;
            }
            if inner.state.filters.without_inactive() == next.without_inactive() {
                // Value-less rows never reach the URL; keep them without
                // resetting the page or navigating.
                let mut state = inner.state.as_ref().clone();
                state.filters = next;
                inner.state = Arc::new(state);
                return false;
            }
            inner.state = Arc::new(inner.state.as_ref().clone().with_filters(next));
        }
        self.schedule_navigation(self.filter_key.clone())
    }

    /// Applies the search term immediately and navigates after the quiet
    /// period. An empty term removes `search` from the URL.
    pub fn set_search(&self, term: impl Into<String>) -> bool {
        let term = term.into();
        {
            let mut inner = self.shared.lock();
            if inner.torn_down || inner.state.search == term.trim() {
                return false;
            }
            inner.state = Arc::new(inner.state.as_ref().clone().with_search(term));
        }
        self.schedule_navigation(self.search_key.clone())
    }

    fn schedule_navigation(&self, key: String) -> bool {
        let weak = Arc::downgrade(&self.shared);
        self.debounce.schedule(
            key,
            move || {
                if let Some(shared) = weak.upgrade() {
                    shared.dispatch(None);
                }
            },
            self.shared.config.debounce(),
        )
    }

    /// Discards the current state after the URL changed outside the grid,
    /// e.g. on back/forward navigation.
    pub fn sync_from_url(&self, url: &str) {
        self.debounce.cancel(&self.filter_key);
        self.debounce.cancel(&self.search_key);

        let mut inner = self.shared.lock();
        if inner.torn_down {
            return;
        }
        inner.state = Arc::new(self.shared.codec.decode(url));
        inner.base_url = url.to_string();
    }

    /// Cancels pending debounced navigations; the controller ignores every
    /// later edit.
    pub fn teardown(&self) {
        self.debounce.teardown();
        let mut inner = self.shared.lock();
        if !inner.torn_down {
            log::debug!("Grid {}: torn down", self.shared.grid_id);
            inner.torn_down = true;
        }
    }
}

impl<N: Navigator> Drop for GridStateController<N> {
    fn drop(&mut self) {
        self.teardown();
    }
}
