//! Client-side pagination over an in-memory list.

use std::ops::Range;

use serde::Serialize;
use thiserror::Error;

/// Page sizes offered by the table view.
pub const PAGE_SIZE_OPTIONS: [usize; 4] = [5, 10, 25, 50];
pub const DEFAULT_PAGE_SIZE: usize = 10;
/// Width of the page-number window.
pub const MAX_VISIBLE_PAGES: usize = 5;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PaginationError {
    #[error("unsupported page size: {0}")]
    UnsupportedPageSize(usize),
}

/// Sliding window of page numbers centered on `current_page` and clamped to
/// `1..=total_pages`.
fn get_pages(total_pages: usize, current_page: usize, max_visible: usize) -> Vec<usize> {
    if total_pages == 0 || max_visible == 0 {
        return vec![];
    }

    let mut start = current_page.saturating_sub(max_visible / 2).max(1);
    let end = (start + max_visible - 1).min(total_pages);

    if end + 1 - start < max_visible {
        start = (end + 1).saturating_sub(max_visible).max(1);
    }

    (start..=end).collect()
}

/// Pagination state of the enquiry table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pager {
    page_size: usize,
    current_page: usize,
    total_pages: usize,
    total_items: usize,
}

impl Default for Pager {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            current_page: 1,
            total_pages: 0,
            total_items: 0,
        }
    }
}

impl Pager {
    pub fn new(page_size: usize) -> Result<Self, PaginationError> {
        let mut pager = Self::default();
        pager.set_page_size(page_size)?;
        Ok(pager)
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn current_page(&self) -> usize {
        self.current_page
    }

    pub fn total_pages(&self) -> usize {
        self.total_pages
    }

    pub fn total_items(&self) -> usize {
        self.total_items
    }

    /// Recomputes the page count for `total_items` and clamps the current
    /// page into range (page 1 when there is nothing to show).
    pub fn update(&mut self, total_items: usize) {
        self.total_items = total_items;
        self.total_pages = total_items.div_ceil(self.page_size);
        if self.current_page > self.total_pages {
            self.current_page = self.total_pages.max(1);
        }
    }

    /// Moves to `page` when it exists. Returns whether the page changed.
    pub fn go_to(&mut self, page: usize) -> bool {
        if page >= 1 && page <= self.total_pages {
            self.current_page = page;
            true
        } else {
            false
        }
    }

    pub fn next(&mut self) -> bool {
        self.go_to(self.current_page + 1)
    }

    pub fn previous(&mut self) -> bool {
        self.go_to(self.current_page.saturating_sub(1))
    }

    pub fn reset(&mut self) {
        self.current_page = 1;
    }

    /// Changes the page size and goes back to the first page.
    pub fn set_page_size(&mut self, page_size: usize) -> Result<(), PaginationError> {
        if !PAGE_SIZE_OPTIONS.contains(&page_size) {
            return Err(PaginationError::UnsupportedPageSize(page_size));
        }
        self.page_size = page_size;
        self.current_page = 1;
        self.update(self.total_items);
        Ok(())
    }

    /// Page numbers to show, at most [`MAX_VISIBLE_PAGES`].
    pub fn page_numbers(&self) -> Vec<usize> {
        get_pages(self.total_pages, self.current_page, MAX_VISIBLE_PAGES)
    }

    /// Zero-based index range of the items on the current page.
    pub fn range(&self) -> Range<usize> {
        let start = ((self.current_page - 1) * self.page_size).min(self.total_items);
        let end = (start + self.page_size).min(self.total_items);
        start..end
    }

    /// One-based index of the first item on the current page (0 when empty).
    pub fn start_index(&self) -> usize {
        if self.total_items == 0 {
            0
        } else {
            self.range().start + 1
        }
    }

    /// One-based index of the last item on the current page.
    pub fn end_index(&self) -> usize {
        self.range().end
    }

    /// Cuts the current page out of `items`.
    pub fn paginate<T: Clone>(&self, items: &[T]) -> Paginated<T> {
        let range = self.range();
        let items = items.get(range).map(<[T]>::to_vec).unwrap_or_default();

        Paginated {
            items,
            pages: self.page_numbers(),
            page: self.current_page,
            total_pages: self.total_pages,
            start_index: self.start_index(),
            end_index: self.end_index(),
            total_items: self.total_items,
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Paginated<T> {
    pub items: Vec<T>,
    pub pages: Vec<usize>,
    pub page: usize,
    pub total_pages: usize,
    pub start_index: usize,
    pub end_index: usize,
    pub total_items: usize,
}

impl<T> Paginated<T> {
    /// Converts the items of the page, keeping the page metadata.
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Paginated<U> {
        Paginated {
            items: self.items.into_iter().map(f).collect(),
            pages: self.pages,
            page: self.page,
            total_pages: self.total_pages,
            start_index: self.start_index,
            end_index: self.end_index,
            total_items: self.total_items,
        }
    }
}
