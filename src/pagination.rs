//! Page-window arithmetic and page-number tokens for list views.
//!
//! Everything here is a pure function of `(current_page, per_page, total)`,
//! safe to call on every request.

use serde::{Serialize, Serializer};

/// Default number of rows shown on a list page.
pub const DEFAULT_ITEMS_PER_PAGE: usize = 20;

/// Page sizes a client may request. Anything else falls back to
/// [`DEFAULT_ITEMS_PER_PAGE`].
pub const ALLOWED_PAGE_SIZES: [usize; 4] = [10, 20, 50, 100];

/// Up to this many pages every page number is rendered.
const ALL_PAGES_THRESHOLD: usize = 7;

/// Width of the sliding window around the current page.
const WINDOW_SIZE: usize = 5;

/// Requested page and page size, before clamping against the row count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub page: usize,
    pub per_page: usize,
}

impl Pagination {
    pub fn new(page: usize, per_page: usize) -> Self {
        Self { page, per_page }
    }

    /// Resolves the requested page against the number of matching rows.
    pub fn window(&self, total: usize) -> PageWindow {
        PageWindow::new(self.page, self.per_page, total)
    }
}

/// A single entry of the page navigation bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageToken {
    Page(usize),
    Ellipsis,
}

impl Serialize for PageToken {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            PageToken::Page(page) => serializer.serialize_u64(*page as u64),
            PageToken::Ellipsis => serializer.serialize_str("..."),
        }
    }
}

/// Row window of one page after clamping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageWindow {
    /// Current page, clamped to `[1, total_pages]`.
    pub page: usize,
    pub per_page: usize,
    pub total: usize,
    /// Never zero: an empty result still has one (empty) page.
    pub total_pages: usize,
    /// Number of rows preceding the current page.
    pub skip: usize,
}

impl PageWindow {
    pub fn new(current_page: usize, per_page: usize, total: usize) -> Self {
        let per_page = per_page.max(1);
        let total_pages = total.div_ceil(per_page).max(1);
        let page = current_page.clamp(1, total_pages);

        Self {
            page,
            per_page,
            total,
            total_pages,
            skip: (page - 1) * per_page,
        }
    }
}

/// Builds the compressed list of page numbers shown under a table.
///
/// Small page counts are listed in full. Larger ones always show the first
/// and last page plus a window of [`WINDOW_SIZE`] pages around the current
/// one; skipped ranges collapse into [`PageToken::Ellipsis`].
pub fn page_tokens(current_page: usize, total_pages: usize) -> Vec<PageToken> {
    let last_page = total_pages.max(1);
    let current_page = current_page.clamp(1, last_page);

    if last_page <= ALL_PAGES_THRESHOLD {
        return (1..=last_page).map(PageToken::Page).collect();
    }

    let half = WINDOW_SIZE / 2;
    let window_start = current_page
        .saturating_sub(half)
        .clamp(1, last_page + 1 - WINDOW_SIZE);
    let window_end = window_start + WINDOW_SIZE - 1;

    let mut pages = Vec::with_capacity(WINDOW_SIZE + 4);

    if window_start > 1 {
        pages.push(PageToken::Page(1));
        if window_start > 2 {
            pages.push(PageToken::Ellipsis);
        }
    }
    pages.extend((window_start..=window_end).map(PageToken::Page));
    if window_end < last_page {
        if window_end < last_page - 1 {
            pages.push(PageToken::Ellipsis);
        }
        pages.push(PageToken::Page(last_page));
    }

    pages
}

/// One page of items together with its navigation metadata.
#[derive(Debug, PartialEq, Serialize)]
pub struct Paginated<T> {
    pub items: Vec<T>,
    pub pages: Vec<PageToken>,
    pub page: usize,
    pub per_page: usize,
    pub total: usize,
    pub total_pages: usize,
}

impl<T> Paginated<T> {
    pub fn new(items: Vec<T>, window: PageWindow) -> Self {
        let pages = page_tokens(window.page, window.total_pages);

        Self {
            items,
            pages,
            page: window.page,
            per_page: window.per_page,
            total: window.total,
            total_pages: window.total_pages,
        }
    }

    /// An empty first page, used when the data source could not be read.
    pub fn empty(per_page: usize) -> Self {
        Self::new(Vec::new(), PageWindow::new(1, per_page, 0))
    }
}
