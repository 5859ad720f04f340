//! Browser state management.
//!
//! [`BrowserState`] is owned by the event loop and only changes through the
//! operations below. Operations that need network I/O do not perform it:
//! they return [`FetchRequest`]s, and the loop feeds the matching
//! [`FetchOutcome`] back through [`BrowserState::apply`].
//!
//! Every request carries a [`RequestToken`]. Each slot (top rated per kind,
//! search, detail) remembers the token it last issued and ignores outcomes
//! carrying any other, so a slow response can never overwrite a newer one.

use std::collections::HashMap;

use moviehub_api::tmdb::{ContentItem, MediaKind, RemoteFetchError, TOP_RATED_LIMIT};
use ratatui::widgets::TableState;

use super::route::Route;

/// Minimum trimmed query length (in characters) that triggers a search.
pub const MIN_SEARCH_LEN: usize = 3;

/// Detail error shown when the item does not exist upstream.
const NOT_FOUND_MESSAGE: &str = "Item not found";

/// Detail error shown for every other failure.
const LOAD_FAILED_MESSAGE: &str = "Failed to load details";

/// Returns `true` when `query` is long enough to replace the top rated list.
#[must_use]
pub fn is_search_active(query: &str) -> bool {
    query.trim().chars().count() >= MIN_SEARCH_LEN
}

/// Identifier of an issued request; later requests get larger tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct RequestToken(u64);

/// Network work requested by a state operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchRequest {
    /// Top rated list for `kind`.
    TopRated {
        /// Resource group.
        kind: MediaKind,
        /// Slot token.
        token: RequestToken,
    },
    /// Search `kind` with `query`.
    Search {
        /// Resource group.
        kind: MediaKind,
        /// Raw query text.
        query: String,
        /// Slot token.
        token: RequestToken,
    },
    /// Single item by identifier.
    Details {
        /// Resource group.
        kind: MediaKind,
        /// TMDB identifier.
        id: u64,
        /// Slot token.
        token: RequestToken,
    },
}

/// Result of a performed [`FetchRequest`].
#[derive(Debug)]
pub enum FetchOutcome {
    /// Completed top rated fetch.
    TopRated {
        /// Resource group.
        kind: MediaKind,
        /// Token of the originating request.
        token: RequestToken,
        /// Fetched items or the failure.
        result: Result<Vec<ContentItem>, RemoteFetchError>,
    },
    /// Completed search.
    Search {
        /// Query the search was issued with.
        query: String,
        /// Token of the originating request.
        token: RequestToken,
        /// Matching items or the failure.
        result: Result<Vec<ContentItem>, RemoteFetchError>,
    },
    /// Completed details fetch.
    Details {
        /// Resource group.
        kind: MediaKind,
        /// TMDB identifier.
        id: u64,
        /// Token of the originating request.
        token: RequestToken,
        /// The item or the failure.
        result: Result<ContentItem, RemoteFetchError>,
    },
}

/// Top rated lists for both kinds.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TopRatedLists {
    /// Top rated movies.
    pub movies: Vec<ContentItem>,
    /// Top rated TV shows.
    pub tv_shows: Vec<ContentItem>,
}

impl TopRatedLists {
    /// List for `kind`.
    #[must_use]
    pub fn get(&self, kind: MediaKind) -> &[ContentItem] {
        match kind {
            MediaKind::Movie => &self.movies,
            MediaKind::Tv => &self.tv_shows,
        }
    }

    /// Mutable list for `kind`.
    pub const fn get_mut(&mut self, kind: MediaKind) -> &mut Vec<ContentItem> {
        match kind {
            MediaKind::Movie => &mut self.movies,
            MediaKind::Tv => &mut self.tv_shows,
        }
    }
}

/// Listing state saved when a detail page is opened.
#[derive(Debug, Clone, PartialEq)]
pub struct NavigationSnapshot {
    /// Active tab.
    pub active_tab: MediaKind,
    /// Raw query text.
    pub search_query: String,
    /// Search results.
    pub search_results: Vec<ContentItem>,
    /// Top rated lists.
    pub top_rated: TopRatedLists,
    /// Selected card.
    pub selected: Option<usize>,
}

/// Lifecycle of a detail page.
#[derive(Debug, Clone, PartialEq)]
pub enum DetailStatus {
    /// Fetch in flight.
    Loading,
    /// Item fetched.
    Ready(ContentItem),
    /// Fetch failed; holds the message to show.
    Failed(String),
}

/// An open detail page.
#[derive(Debug, Clone, PartialEq)]
pub struct DetailView {
    /// Resource group.
    pub kind: MediaKind,
    /// TMDB identifier.
    pub id: u64,
    /// Current status.
    pub status: DetailStatus,
}

/// Which screen is shown.
#[derive(Debug, Clone, PartialEq)]
pub enum Screen {
    /// Tabbed listing.
    Listing,
    /// Detail page.
    Detail(DetailView),
}

/// State for the browser TUI.
#[allow(clippy::module_name_repetitions)]
#[derive(Debug)]
pub struct BrowserState {
    /// Content kind shown by the listing.
    active_tab: MediaKind,
    /// Raw search box text.
    search_query: String,
    /// Results of the last completed search.
    search_results: Vec<ContentItem>,
    /// Top rated lists per kind.
    top_rated: TopRatedLists,
    /// Current screen.
    screen: Screen,
    /// Listing state to restore on back-navigation.
    snapshot: Option<NavigationSnapshot>,
    /// Table state for the card list (handles selection and scroll).
    pub table_state: TableState,
    /// Transient message shown in the footer.
    status_message: Option<String>,
    /// Last issued token value.
    next_token: u64,
    /// Latest top rated token per kind; present while that fetch is in flight.
    top_rated_pending: HashMap<MediaKind, RequestToken>,
    /// Latest search token; present while the search is in flight.
    search_pending: Option<RequestToken>,
    /// Latest details token; present while the fetch is in flight.
    detail_pending: Option<RequestToken>,
}

impl BrowserState {
    /// Creates an empty listing on `initial_tab`.
    #[must_use]
    pub fn new(initial_tab: MediaKind) -> Self {
        Self {
            active_tab: initial_tab,
            search_query: String::new(),
            search_results: Vec::new(),
            top_rated: TopRatedLists::default(),
            screen: Screen::Listing,
            snapshot: None,
            table_state: TableState::default(),
            status_message: None,
            next_token: 0,
            top_rated_pending: HashMap::new(),
            search_pending: None,
            detail_pending: None,
        }
    }

    // --- Accessors ---

    /// Active tab.
    #[must_use]
    pub const fn active_tab(&self) -> MediaKind {
        self.active_tab
    }

    /// Raw search box text.
    #[must_use]
    pub fn search_query(&self) -> &str {
        &self.search_query
    }

    /// Results of the last completed search.
    #[must_use]
    pub fn search_results(&self) -> &[ContentItem] {
        &self.search_results
    }

    /// Top rated lists.
    #[must_use]
    pub const fn top_rated(&self) -> &TopRatedLists {
        &self.top_rated
    }

    /// Current screen.
    #[must_use]
    pub const fn screen(&self) -> &Screen {
        &self.screen
    }

    /// Saved listing state, if a detail page was opened from the listing.
    #[must_use]
    pub const fn snapshot(&self) -> Option<&NavigationSnapshot> {
        self.snapshot.as_ref()
    }

    /// Footer message, if any.
    #[must_use]
    pub fn status_message(&self) -> Option<&str> {
        self.status_message.as_deref()
    }

    /// Sets or clears the footer message.
    pub fn set_status_message(&mut self, message: Option<String>) {
        self.status_message = message;
    }

    /// `true` while the top rated list of the active tab is being fetched.
    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.top_rated_pending.contains_key(&self.active_tab)
    }

    /// `true` while a search is in flight.
    #[must_use]
    pub const fn is_searching(&self) -> bool {
        self.search_pending.is_some()
    }

    /// Items the listing shows: search results while a search is active,
    /// otherwise the active tab's top rated list.
    #[must_use]
    pub fn display_items(&self) -> &[ContentItem] {
        if is_search_active(&self.search_query) {
            &self.search_results
        } else {
            self.top_rated.get(self.active_tab)
        }
    }

    /// Currently selected card.
    #[must_use]
    pub fn selected_item(&self) -> Option<&ContentItem> {
        self.display_items().get(self.table_state.selected()?)
    }

    /// Location of the current screen.
    #[must_use]
    pub const fn current_route(&self) -> Route {
        match &self.screen {
            Screen::Listing => Route::Listing,
            Screen::Detail(view) => Route::Detail {
                kind: view.kind,
                id: view.id,
            },
        }
    }

    // --- Fetch operations ---

    const fn issue_token(&mut self) -> RequestToken {
        self.next_token = self.next_token.wrapping_add(1);
        RequestToken(self.next_token)
    }

    /// Issues a top rated fetch for the active tab.
    pub fn fetch_top_rated(&mut self) -> FetchRequest {
        let token = self.issue_token();
        let kind = self.active_tab;
        self.top_rated_pending.insert(kind, token);
        FetchRequest::TopRated { kind, token }
    }

    /// Switches tabs.
    ///
    /// Issues a top rated fetch for the new tab, drops the old tab's search
    /// results and, when a search is active, re-runs it against the new tab.
    /// Selecting the current tab does nothing.
    pub fn set_active_tab(&mut self, tab: MediaKind) -> Vec<FetchRequest> {
        if tab == self.active_tab {
            return Vec::new();
        }
        self.active_tab = tab;
        let mut requests = vec![self.fetch_top_rated()];
        // Results always belong to the active tab's kind.
        self.search_results.clear();
        self.search_pending = None;
        if is_search_active(&self.search_query) {
            let query = self.search_query.clone();
            requests.extend(self.run_search(&query));
        }
        self.table_state.select(None);
        self.sync_selection();
        requests
    }

    /// Replaces the search box text. Searching is driven by the debouncer.
    pub fn set_search_query(&mut self, text: impl Into<String>) {
        self.search_query = text.into();
        self.sync_selection();
    }

    /// Appends a typed character to the search box.
    pub fn push_query_char(&mut self, c: char) {
        self.search_query.push(c);
        self.sync_selection();
    }

    /// Deletes the last character of the search box.
    pub fn pop_query_char(&mut self) {
        self.search_query.pop();
        self.sync_selection();
    }

    /// Runs a settled query.
    ///
    /// Too-short queries clear the results and cancel any search in flight.
    pub fn run_search(&mut self, query: &str) -> Option<FetchRequest> {
        if !is_search_active(query) {
            self.search_results.clear();
            self.search_pending = None;
            self.sync_selection();
            return None;
        }
        let token = self.issue_token();
        self.search_pending = Some(token);
        Some(FetchRequest::Search {
            kind: self.active_tab,
            query: String::from(query),
            token,
        })
    }

    /// Clears the search box, its results and any search in flight.
    pub fn clear_search(&mut self) {
        self.search_query.clear();
        self.search_results.clear();
        self.search_pending = None;
        self.sync_selection();
    }

    /// Applies a completed fetch. Outcomes of superseded requests are dropped.
    pub fn apply(&mut self, outcome: FetchOutcome) {
        match outcome {
            FetchOutcome::TopRated {
                kind,
                token,
                result,
            } => self.apply_top_rated(kind, token, result),
            FetchOutcome::Search {
                query,
                token,
                result,
            } => self.apply_search(&query, token, result),
            FetchOutcome::Details {
                kind,
                id,
                token,
                result,
            } => self.apply_details(kind, id, token, result),
        }
        self.sync_selection();
    }

    fn apply_top_rated(
        &mut self,
        kind: MediaKind,
        token: RequestToken,
        result: Result<Vec<ContentItem>, RemoteFetchError>,
    ) {
        if self.top_rated_pending.get(&kind) != Some(&token) {
            tracing::debug!(%kind, ?token, "discarding stale top rated response");
            return;
        }
        self.top_rated_pending.remove(&kind);
        match result {
            Ok(mut items) => {
                items.truncate(TOP_RATED_LIMIT);
                if let Some(snapshot) = &mut self.snapshot {
                    snapshot.top_rated.get_mut(kind).clone_from(&items);
                }
                *self.top_rated.get_mut(kind) = items;
            }
            Err(e) => {
                tracing::warn!(%kind, error = %e, "failed to fetch top rated list");
            }
        }
    }

    fn apply_search(
        &mut self,
        query: &str,
        token: RequestToken,
        result: Result<Vec<ContentItem>, RemoteFetchError>,
    ) {
        if self.search_pending != Some(token) {
            tracing::debug!(query, ?token, "discarding stale search response");
            return;
        }
        self.search_pending = None;
        let items = result.unwrap_or_else(|e| {
            tracing::warn!(query, error = %e, "search failed");
            Vec::new()
        });
        if let Some(snapshot) = &mut self.snapshot
            && snapshot.search_query == self.search_query
        {
            snapshot.search_results.clone_from(&items);
        }
        self.search_results = items;
    }

    fn apply_details(
        &mut self,
        kind: MediaKind,
        id: u64,
        token: RequestToken,
        result: Result<ContentItem, RemoteFetchError>,
    ) {
        if self.detail_pending != Some(token) {
            tracing::debug!(%kind, id, ?token, "discarding stale details response");
            return;
        }
        self.detail_pending = None;
        let Screen::Detail(view) = &mut self.screen else {
            return;
        };
        view.status = match result {
            Ok(item) => DetailStatus::Ready(item),
            Err(e) => {
                tracing::warn!(%kind, id, error = %e, "failed to load details");
                let message = if e.is_not_found() {
                    NOT_FOUND_MESSAGE
                } else {
                    LOAD_FAILED_MESSAGE
                };
                DetailStatus::Failed(String::from(message))
            }
        };
    }

    // --- Navigation ---

    /// Saves the listing state for back-navigation, replacing any earlier snapshot.
    pub fn snapshot_before_detail(&mut self) {
        self.snapshot = Some(NavigationSnapshot {
            active_tab: self.active_tab,
            search_query: self.search_query.clone(),
            search_results: self.search_results.clone(),
            top_rated: self.top_rated.clone(),
            selected: self.table_state.selected(),
        });
    }

    /// Restores and consumes the saved listing state.
    ///
    /// Returns `false` when there is no snapshot.
    pub fn restore_from_snapshot(&mut self) -> bool {
        let Some(snapshot) = self.snapshot.take() else {
            return false;
        };
        self.active_tab = snapshot.active_tab;
        self.search_query = snapshot.search_query;
        self.search_results = snapshot.search_results;
        self.top_rated = snapshot.top_rated;
        self.table_state.select(snapshot.selected);
        self.sync_selection();
        true
    }

    /// Opens the detail page of `item`.
    pub fn open_detail(&mut self, item: &ContentItem) -> FetchRequest {
        self.enter_detail(item.kind(), item.id())
    }

    /// Opens the detail page of the selected card.
    pub fn open_selected(&mut self) -> Option<FetchRequest> {
        let (kind, id) = self.selected_item().map(|item| (item.kind(), item.id()))?;
        Some(self.enter_detail(kind, id))
    }

    /// Navigates to `route`.
    pub fn open_route(&mut self, route: Route) -> Option<FetchRequest> {
        match route {
            Route::Listing => {
                self.go_back();
                None
            }
            Route::Detail { kind, id } => Some(self.enter_detail(kind, id)),
        }
    }

    fn enter_detail(&mut self, kind: MediaKind, id: u64) -> FetchRequest {
        if self.screen == Screen::Listing {
            self.snapshot_before_detail();
        }
        self.screen = Screen::Detail(DetailView {
            kind,
            id,
            status: DetailStatus::Loading,
        });
        let token = self.issue_token();
        self.detail_pending = Some(token);
        FetchRequest::Details { kind, id, token }
    }

    /// Leaves the detail page, restoring the listing it was opened from.
    pub fn go_back(&mut self) {
        if self.screen == Screen::Listing {
            return;
        }
        self.screen = Screen::Listing;
        self.detail_pending = None;
        self.restore_from_snapshot();
    }

    // --- Selection ---

    /// Clamps the selection to the displayed items.
    pub fn sync_selection(&mut self) {
        let len = self.display_items().len();
        if len == 0 {
            self.table_state.select(None);
            return;
        }
        let last = len.saturating_sub(1);
        let selected = self.table_state.selected().unwrap_or(0).min(last);
        self.table_state.select(Some(selected));
    }

    /// Moves the selection up.
    pub fn move_up(&mut self) {
        if let Some(current) = self.table_state.selected() {
            self.table_state.select(Some(current.saturating_sub(1)));
        }
    }

    /// Moves the selection down.
    pub fn move_down(&mut self) {
        let len = self.display_items().len();
        if let Some(current) = self.table_state.selected() {
            let next = current.saturating_add(1);
            if next < len {
                self.table_state.select(Some(next));
            }
        }
    }
}
