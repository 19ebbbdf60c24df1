//! Paged list responses and the list screen state built from them.

use serde::Deserialize;

fn first_page() -> u32 {
    1
}

/// One page as returned by list endpoints.
///
/// Accepts `{ items, page, totalPages }` and the `data` spelling some
/// endpoints use for the item array. Missing paging fields describe a single
/// complete page.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    /// Records on this page.
    #[serde(default = "Vec::new", alias = "data")]
    pub items: Vec<T>,
    /// One-based page number.
    #[serde(default = "first_page")]
    pub page: u32,
    /// Total pages available.
    #[serde(default = "first_page")]
    pub total_pages: u32,
}

impl<T> Page<T> {
    /// Whether a later page exists.
    pub const fn has_more(&self) -> bool {
        self.page < self.total_pages
    }
}

/// Unpaged list body: either a bare array or a page wrapper.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum Listing<T> {
    /// `[ ... ]`
    Bare(Vec<T>),
    /// `{ items|data: [ ... ], ... }`
    Wrapped(Page<T>),
}

impl<T> Listing<T> {
    /// Records in server order.
    pub fn into_items(self) -> Vec<T> {
        match self {
            Self::Bare(items) => items,
            Self::Wrapped(page) => page.items,
        }
    }
}

/// What the list is currently fetching.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ListPhase {
    /// Nothing in flight.
    #[default]
    Idle,
    /// First load, list empty.
    Loading,
    /// Pull-to-refresh; existing items stay visible.
    Refreshing,
    /// Fetching the next page for infinite scroll.
    LoadingMore,
}

/// Items of a paged list plus the fetch in flight.
///
/// Each `begin_*` call returns the page number to request, or `None` when
/// the fetch should not happen. The caller then reports the outcome with
/// [`PagedList::apply`] or [`PagedList::fail`].
#[derive(Debug, Clone)]
pub struct PagedList<T> {
    items: Vec<T>,
    page: u32,
    total_pages: u32,
    phase: ListPhase,
}

impl<T> Default for PagedList<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            page: 0,
            total_pages: 0,
            phase: ListPhase::Idle,
        }
    }
}

impl<T> PagedList<T> {
    /// Empty list, nothing loaded.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loaded items in display order.
    pub fn items(&self) -> &[T] {
        &self.items
    }

    /// Current fetch.
    pub const fn phase(&self) -> ListPhase {
        self.phase
    }

    /// Whether a fetch is in flight.
    pub fn is_busy(&self) -> bool {
        self.phase != ListPhase::Idle
    }

    /// Whether another page can be requested.
    pub const fn has_more(&self) -> bool {
        self.page < self.total_pages
    }

    /// Start the initial load.
    pub fn begin_load(&mut self) -> Option<u32> {
        self.start(ListPhase::Loading, 1)
    }

    /// Start a pull-to-refresh from the first page.
    pub fn begin_refresh(&mut self) -> Option<u32> {
        self.start(ListPhase::Refreshing, 1)
    }

    /// Start fetching the next page. Ignored while busy or at the end.
    pub fn begin_load_more(&mut self) -> Option<u32> {
        if !self.has_more() {
            return None;
        }
        self.start(ListPhase::LoadingMore, self.page + 1)
    }

    fn start(&mut self, phase: ListPhase, page: u32) -> Option<u32> {
        if self.is_busy() {
            return None;
        }
        self.phase = phase;
        Some(page)
    }

    /// Merge a fetched page: load and refresh replace the items, load-more
    /// appends. Ignored when nothing was in flight.
    pub fn apply(&mut self, page: Page<T>) {
        match self.phase {
            ListPhase::Idle => return,
            ListPhase::Loading | ListPhase::Refreshing => self.items = page.items,
            ListPhase::LoadingMore => self.items.extend(page.items),
        }
        self.page = page.page;
        self.total_pages = page.total_pages;
        self.phase = ListPhase::Idle;
    }

    /// Abandon the fetch in flight, keeping the items already shown.
    pub fn fail(&mut self) {
        self.phase = ListPhase::Idle;
    }
}
